// インメモリ同期アダプタモジュール

use crate::features::auth::models::OwnerIdentity;
use crate::features::subscriptions::models::{Subscription, SubscriptionDraft};
use crate::services::sync::{CollectionEvent, CollectionSubscription, SyncAdapter};
use crate::shared::errors::{AppError, AppResult};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use uuid::Uuid;

/// 共有されるリモート側の状態
#[derive(Default)]
struct MemoryState {
    /// オーナーIDごとのコレクション（挿入順を保持）
    collections: HashMap<String, Vec<Subscription>>,
    /// オーナーIDごとの購読者チャネル
    subscribers: HashMap<String, Vec<(u64, mpsc::UnboundedSender<CollectionEvent>)>>,
    /// 購読者IDの採番カウンタ
    next_subscriber_id: u64,
    /// 書き込みを失敗させるフラグ（障害系テスト用）
    fail_writes: bool,
    /// 認証を失敗させるフラグ（障害系テスト用）
    fail_auth: bool,
}

/// インメモリのリモートコレクションを模した同期アダプタ
///
/// オーナー別パーティションと複数の書き込みクライアントを再現し、
/// 変更のたびにコレクション全体のスナップショットを購読者へ配信する。
/// IDと作成・更新日時はこのアダプタ（＝サーバー側）が採番する。
pub struct MemorySyncAdapter {
    /// 全クライアントで共有されるリモート状態
    state: Arc<Mutex<MemoryState>>,
    /// このクライアントが認証されるオーナーUID
    owner_uid: String,
}

impl MemorySyncAdapter {
    /// 指定したオーナーUIDで認証されるアダプタを作成する
    ///
    /// # 引数
    /// * `owner_uid` - authenticate()が返すオーナーUID
    ///
    /// # 戻り値
    /// 新しいリモート状態を持つアダプタ
    pub fn new(owner_uid: &str) -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState::default())),
            owner_uid: owner_uid.to_string(),
        }
    }

    /// 同じリモート状態を共有する別クライアントを作成する
    ///
    /// 複数の書き込みクライアントや別オーナーの同時接続を再現する。
    ///
    /// # 引数
    /// * `owner_uid` - 新しいクライアントが認証されるオーナーUID
    ///
    /// # 戻り値
    /// リモート状態を共有するアダプタ
    pub fn connect_as(&self, owner_uid: &str) -> Self {
        Self {
            state: Arc::clone(&self.state),
            owner_uid: owner_uid.to_string(),
        }
    }

    /// 書き込み失敗を注入する（障害系テスト用）
    pub fn set_fail_writes(&self, fail: bool) {
        self.state.lock().unwrap().fail_writes = fail;
    }

    /// 認証失敗を注入する（障害系テスト用）
    pub fn set_fail_auth(&self, fail: bool) {
        self.state.lock().unwrap().fail_auth = fail;
    }

    /// オーナーの現在の購読者数を返す
    pub fn subscriber_count(&self, owner_id: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .subscribers
            .get(owner_id)
            .map_or(0, |subscribers| subscribers.len())
    }

    /// オーナーの購読者へ最新スナップショットを配信する
    fn notify(state: &mut MemoryState, owner_id: &str) {
        let snapshot = state.collections.get(owner_id).cloned().unwrap_or_default();
        if let Some(subscribers) = state.subscribers.get_mut(owner_id) {
            // 閉じられたチャネルは配信時に取り除く
            subscribers.retain(|(_, sender)| {
                sender
                    .send(CollectionEvent::Snapshot(snapshot.clone()))
                    .is_ok()
            });
        }
    }
}

#[async_trait]
impl SyncAdapter for MemorySyncAdapter {
    async fn authenticate(&self) -> AppResult<OwnerIdentity> {
        let state = self.state.lock().unwrap();
        if state.fail_auth {
            return Err(AppError::auth("認証ハンドシェイクに失敗しました"));
        }
        Ok(OwnerIdentity {
            id: self.owner_uid.clone(),
            is_anonymous: true,
        })
    }

    fn subscribe_to_collection(&self, owner_id: &str) -> AppResult<CollectionSubscription> {
        let (sender, receiver) = mpsc::unbounded_channel();

        let subscriber_id = {
            let mut state = self.state.lock().unwrap();
            let subscriber_id = state.next_subscriber_id;
            state.next_subscriber_id += 1;

            // 購読開始時に現在のスナップショットを即時配信する
            let snapshot = state.collections.get(owner_id).cloned().unwrap_or_default();
            let _ = sender.send(CollectionEvent::Snapshot(snapshot));

            state
                .subscribers
                .entry(owner_id.to_string())
                .or_default()
                .push((subscriber_id, sender));
            subscriber_id
        };

        let shared = Arc::clone(&self.state);
        let owner_key = owner_id.to_string();
        let unsubscribe = Box::new(move || {
            let mut state = shared.lock().unwrap();
            if let Some(subscribers) = state.subscribers.get_mut(&owner_key) {
                subscribers.retain(|(id, _)| *id != subscriber_id);
            }
        });

        Ok(CollectionSubscription::new(receiver, unsubscribe))
    }

    async fn insert(&self, owner_id: &str, draft: &SubscriptionDraft) -> AppResult<String> {
        let mut state = self.state.lock().unwrap();
        if state.fail_writes {
            return Err(AppError::persistence(
                "リモートへの書き込みが拒否されました",
            ));
        }

        let now = Utc::now();
        let record = Subscription {
            id: Uuid::new_v4().to_string(),
            client_name: draft.client_name.clone(),
            service: draft.service.clone(),
            email: draft.email.clone(),
            password: draft.password.clone(),
            price: draft.price,
            start_date: draft.start_date,
            duration_months: draft.duration_months,
            renewal_date: draft.renewal_date,
            created_at: Some(now),
            updated_at: Some(now),
        };
        let id = record.id.clone();

        state
            .collections
            .entry(owner_id.to_string())
            .or_default()
            .push(record);
        Self::notify(&mut state, owner_id);
        Ok(id)
    }

    async fn replace(&self, owner_id: &str, id: &str, draft: &SubscriptionDraft) -> AppResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_writes {
            return Err(AppError::persistence(
                "リモートへの書き込みが拒否されました",
            ));
        }

        let records = state.collections.entry(owner_id.to_string()).or_default();
        let Some(record) = records.iter_mut().find(|record| record.id == id) else {
            return Err(AppError::persistence(format!(
                "置換対象のレコードが存在しません: id={id}"
            )));
        };

        record.client_name = draft.client_name.clone();
        record.service = draft.service.clone();
        record.email = draft.email.clone();
        record.password = draft.password.clone();
        record.price = draft.price;
        record.start_date = draft.start_date;
        record.duration_months = draft.duration_months;
        record.renewal_date = draft.renewal_date;
        record.updated_at = Some(Utc::now());

        Self::notify(&mut state, owner_id);
        Ok(())
    }

    async fn remove(&self, owner_id: &str, id: &str) -> AppResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_writes {
            return Err(AppError::persistence(
                "リモートへの書き込みが拒否されました",
            ));
        }

        let Some(records) = state.collections.get_mut(owner_id) else {
            // コレクション自体が無い場合も削除済みとして成功
            return Ok(());
        };

        let before = records.len();
        records.retain(|record| record.id != id);
        if records.len() != before {
            Self::notify(&mut state, owner_id);
        }
        Ok(())
    }
}
