use crate::features::auth::models::OwnerIdentity;
use crate::features::subscriptions::models::{Subscription, SubscriptionDto};
use crate::features::subscriptions::query::{self, CollectionStats};
use crate::services::sync::{CollectionEvent, SyncAdapter};
use crate::shared::errors::{AppError, AppResult};
use chrono::NaiveDate;
use std::sync::Arc;

/// 1人のオーナーのサブスクリプションコレクションを管理するストア
///
/// ローカルの一覧は信頼できる唯一の情報源ではなく、リモートの
/// スナップショットを反映した実体化ビューにすぎない。変更ストリームの
/// 通知を受けるたびにreconcile()で全件置き換える。ビューの変更は
/// 単一の論理スレッド上で行う前提のため、内部ロックは持たない。
pub struct SubscriptionStore<A: SyncAdapter> {
    /// 同期アダプタ
    adapter: Arc<A>,
    /// このストアが属するオーナーID
    owner_id: String,
    /// リモートスナップショットを反映した実体化ビュー（created_at降順）
    snapshot: Vec<Subscription>,
}

impl<A: SyncAdapter> SubscriptionStore<A> {
    /// 認証済みオーナーのストアを作成する
    ///
    /// # 引数
    /// * `adapter` - 同期アダプタ
    /// * `owner` - 認証済みオーナー
    ///
    /// # 戻り値
    /// 空のビューを持つストア
    pub fn new(adapter: Arc<A>, owner: &OwnerIdentity) -> Self {
        Self {
            adapter,
            owner_id: owner.id.clone(),
            snapshot: Vec::new(),
        }
    }

    /// このストアが属するオーナーIDを返す
    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    /// サブスクリプションを作成する
    ///
    /// 入力を検証し、更新日を導出してからリモートへ挿入する。
    /// 作成されたレコードは変更ストリームがスナップショットを届けた
    /// 時点で一覧に現れる（楽観的な先行挿入は行わない）。
    ///
    /// # 引数
    /// * `dto` - 作成用DTO
    ///
    /// # 戻り値
    /// 採番されたID、または失敗時はエラー
    pub async fn create(&self, dto: SubscriptionDto) -> AppResult<String> {
        let draft = dto.into_draft()?;
        let id = self.adapter.insert(&self.owner_id, &draft).await?;
        log::info!(
            "サブスクリプションを作成しました: owner_id={}, id={}",
            self.owner_id,
            id
        );
        Ok(id)
    }

    /// サブスクリプションを更新する（全フィールド置換）
    ///
    /// 現在のビューに存在するIDのみ更新できる。更新日は入力から
    /// 再導出される。
    ///
    /// # 引数
    /// * `id` - 更新対象のレコードID
    /// * `dto` - 更新用DTO
    ///
    /// # 戻り値
    /// 成功時はOk(())、失敗時はエラー
    pub async fn update(&self, id: &str, dto: SubscriptionDto) -> AppResult<()> {
        if !self.contains(id) {
            return Err(AppError::not_found(format!(
                "ID {id} のサブスクリプション"
            )));
        }

        let draft = dto.into_draft()?;
        self.adapter.replace(&self.owner_id, id, &draft).await?;
        log::info!(
            "サブスクリプションを更新しました: owner_id={}, id={}",
            self.owner_id,
            id
        );
        Ok(())
    }

    /// サブスクリプションを削除する（冪等）
    ///
    /// ローカルビューの存在確認はせず、常にそのままリモートへ依頼する。
    /// スナップショット未反映のレコードも削除でき、存在しないIDの削除は
    /// リモート側が達成済みとして成功を返す。
    ///
    /// # 引数
    /// * `id` - 削除対象のレコードID
    ///
    /// # 戻り値
    /// 成功時はOk(())、失敗時はエラー
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.adapter.remove(&self.owner_id, id).await?;
        log::info!(
            "サブスクリプションを削除しました: owner_id={}, id={}",
            self.owner_id,
            id
        );
        Ok(())
    }

    /// リモートスナップショットでローカルビューを全件置き換える
    ///
    /// created_at降順（欠損は最古扱い）に並べ替える。読み取り結果が
    /// 変わる唯一の経路であり、同じスナップショットを繰り返し適用しても
    /// 結果は変わらない。後から届いたスナップショットが常に優先される。
    ///
    /// # 引数
    /// * `records` - リモートから届いたコレクション全体
    pub fn reconcile(&mut self, mut records: Vec<Subscription>) {
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        log::debug!(
            "スナップショットを反映しました: owner_id={}, 件数={}",
            self.owner_id,
            records.len()
        );
        self.snapshot = records;
    }

    /// 変更ストリームのイベントを1件適用する
    ///
    /// # 引数
    /// * `event` - 変更ストリームから受信したイベント
    ///
    /// # 戻り値
    /// 成功時はOk(())、ストリームエラーの場合は永続化エラー
    pub fn apply_event(&mut self, event: CollectionEvent) -> AppResult<()> {
        match event {
            CollectionEvent::Snapshot(records) => {
                self.reconcile(records);
                Ok(())
            }
            CollectionEvent::Error(message) => {
                log::error!("変更ストリームでエラーが発生しました: {}", message);
                Err(AppError::persistence(message))
            }
        }
    }

    /// 現在の実体化ビューを取得する
    pub fn snapshot(&self) -> &[Subscription] {
        &self.snapshot
    }

    /// IDが現在のビューに存在するかを返す
    pub fn contains(&self, id: &str) -> bool {
        self.snapshot.iter().any(|record| record.id == id)
    }

    /// クライアント名またはサービス名で絞り込む
    ///
    /// # 引数
    /// * `term` - 検索語（空なら全件）
    ///
    /// # 戻り値
    /// 一致したサブスクリプションの参照リスト
    pub fn search(&self, term: &str) -> Vec<&Subscription> {
        query::search(&self.snapshot, term)
    }

    /// ダッシュボード統計を計算する
    ///
    /// # 引数
    /// * `today` - 基準日（通常は今日）
    ///
    /// # 戻り値
    /// ビュー全体の統計
    pub fn stats(&self, today: NaiveDate) -> CollectionStats {
        query::aggregate(&self.snapshot, today)
    }
}
