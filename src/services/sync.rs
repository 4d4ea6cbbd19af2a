// リモート永続化層との同期境界モジュール

use crate::features::auth::models::OwnerIdentity;
use crate::features::subscriptions::models::{Subscription, SubscriptionDraft};
use crate::shared::errors::AppResult;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// 変更ストリームが配信するイベント
#[derive(Debug, Clone)]
pub enum CollectionEvent {
    /// オーナーのコレクション全体のスナップショット
    ///
    /// 差分ではなく常に全件が届く。受信順に適用し、後から届いたものが優先。
    Snapshot(Vec<Subscription>),
    /// ストリーム側で発生したエラー
    Error(String),
}

/// 変更ストリーム購読のハンドル
///
/// サインアウトや終了時にはrelease()で明示的に解除する。解除しないまま
/// 放置するとリモート側の購読がリークするため、Dropでも解除される。
pub struct CollectionSubscription {
    events: mpsc::UnboundedReceiver<CollectionEvent>,
    unsubscribe: Option<Box<dyn FnOnce() + Send>>,
}

impl CollectionSubscription {
    /// 新しい購読ハンドルを作成する
    ///
    /// # 引数
    /// * `events` - イベント受信チャネル
    /// * `unsubscribe` - 購読解除処理
    ///
    /// # 戻り値
    /// 購読ハンドル
    pub fn new(
        events: mpsc::UnboundedReceiver<CollectionEvent>,
        unsubscribe: Box<dyn FnOnce() + Send>,
    ) -> Self {
        Self {
            events,
            unsubscribe: Some(unsubscribe),
        }
    }

    /// 次のイベントを待ち受ける
    ///
    /// # 戻り値
    /// 次のイベント。ストリームが閉じられた場合はNone
    pub async fn next_event(&mut self) -> Option<CollectionEvent> {
        self.events.recv().await
    }

    /// 届いているイベントがあれば取り出す（待機しない）
    ///
    /// # 戻り値
    /// 届いていたイベント、なければNone
    pub fn try_next_event(&mut self) -> Option<CollectionEvent> {
        self.events.try_recv().ok()
    }

    /// 購読を解除する
    pub fn release(mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
            log::debug!("変更ストリームの購読を解除しました");
        }
    }
}

impl Drop for CollectionSubscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

/// リモート永続化層との境界トレイト
///
/// ストアの操作をリモートAPIへ翻訳する。具体的な永続化技術は
/// この境界の向こう側にあり、コアは関知しない。同時書き込みの
/// 競合解決も永続化層に委ねる（last-write-winsを許容）。
#[async_trait]
pub trait SyncAdapter: Send + Sync {
    /// オーナー認証のハンドシェイクを行う
    ///
    /// # 戻り値
    /// 認証されたオーナー、または失敗時は認証エラー
    async fn authenticate(&self) -> AppResult<OwnerIdentity>;

    /// オーナーのコレクションの変更ストリームを購読する
    ///
    /// # 引数
    /// * `owner_id` - 対象オーナーのID
    ///
    /// # 戻り値
    /// 購読ハンドル、または失敗時はエラー
    fn subscribe_to_collection(&self, owner_id: &str) -> AppResult<CollectionSubscription>;

    /// レコードを挿入する
    ///
    /// # 引数
    /// * `owner_id` - 対象オーナーのID
    /// * `draft` - 検証済みの書き込みデータ
    ///
    /// # 戻り値
    /// 採番されたID、または失敗時は永続化エラー
    async fn insert(&self, owner_id: &str, draft: &SubscriptionDraft) -> AppResult<String>;

    /// 既存レコードを丸ごと置き換える
    ///
    /// # 引数
    /// * `owner_id` - 対象オーナーのID
    /// * `id` - 置換対象のレコードID
    /// * `draft` - 検証済みの書き込みデータ
    ///
    /// # 戻り値
    /// 成功時はOk(())、失敗時は永続化エラー
    async fn replace(&self, owner_id: &str, id: &str, draft: &SubscriptionDraft) -> AppResult<()>;

    /// レコードを削除する
    ///
    /// 存在しないIDの削除は達成済みとして成功を返す。
    ///
    /// # 引数
    /// * `owner_id` - 対象オーナーのID
    /// * `id` - 削除対象のレコードID
    ///
    /// # 戻り値
    /// 成功時はOk(())、失敗時は永続化エラー
    async fn remove(&self, owner_id: &str, id: &str) -> AppResult<()>;
}
