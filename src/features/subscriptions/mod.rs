/// サブスクリプション機能モジュール
///
/// このモジュールは、サブスクリプション管理の中核を提供します：
/// - 更新日の導出と残り日数の計算
/// - 残り日数からの状態判定
/// - リモートスナップショットと整合するストアの作成・更新・削除
/// - 検索とダッシュボード統計の導出ビュー
pub mod dates;
pub mod models;
pub mod query;
pub mod status;
pub mod store;

// 公開インターフェース
pub use models::{
    Subscription, SubscriptionDraft, SubscriptionDto, ALLOWED_DURATION_MONTHS,
};
pub use query::{aggregate, search, CollectionStats, DASHBOARD_EXPIRING_DAYS};
pub use status::{SubscriptionStatus, STATUS_EXPIRING_DAYS};
pub use store::SubscriptionStore;
