pub mod features;
pub mod services;
pub mod shared;

use log::info;
use shared::config::environment::EnvironmentConfig;

// よく使う型の再エクスポート
pub use features::auth::models::{AuthState, OwnerIdentity};
pub use features::auth::service::AuthService;
pub use features::subscriptions::models::{
    Subscription, SubscriptionDraft, SubscriptionDto, ALLOWED_DURATION_MONTHS,
};
pub use features::subscriptions::query::{CollectionStats, DASHBOARD_EXPIRING_DAYS};
pub use features::subscriptions::status::{SubscriptionStatus, STATUS_EXPIRING_DAYS};
pub use features::subscriptions::store::SubscriptionStore;
pub use services::memory::MemorySyncAdapter;
pub use services::sync::{CollectionEvent, CollectionSubscription, SyncAdapter};
pub use shared::errors::{AppError, AppResult, ErrorSeverity};

/// ログシステムを初期化
///
/// UIシェルが起動時に1回だけ呼び出す。環境変数（および.envファイル）
/// からログレベルを決定する。
pub fn initialize_logging_system() {
    // 環境設定を取得
    let env_config = EnvironmentConfig::from_env();

    // ログレベルを設定
    let log_level = match env_config.log_level.to_lowercase().as_str() {
        "error" => log::LevelFilter::Error,
        "warn" => log::LevelFilter::Warn,
        "info" => log::LevelFilter::Info,
        "debug" => log::LevelFilter::Debug,
        "trace" => log::LevelFilter::Trace,
        _ => log::LevelFilter::Info,
    };

    // env_loggerを初期化
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp_secs()
        .format_module_path(false)
        .format_target(false)
        .init();

    info!(
        "ログシステムを初期化しました: level={}, environment={:?}",
        env_config.log_level, env_config.environment
    );
}
