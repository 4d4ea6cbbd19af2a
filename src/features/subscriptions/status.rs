use serde::{Deserialize, Serialize};

/// 行バッジで「まもなく更新」と判定する残り日数の上限（両端含む）
///
/// ダッシュボード集計のDASHBOARD_EXPIRING_DAYS(5日)とは用途の異なる
/// 独立したしきい値であり、統一しない。
pub const STATUS_EXPIRING_DAYS: i64 = 3;

/// 更新日から導出されるサブスクリプションの状態
///
/// 保存はせず、読み取りのたびに残り日数から再評価する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubscriptionStatus {
    /// 有効（残り日数に余裕がある）
    Active,
    /// まもなく更新（緊急の更新期間内）
    Expiring,
    /// 期限切れ（更新日を過ぎている）
    Expired,
}

impl SubscriptionStatus {
    /// 残り日数から状態を判定する
    ///
    /// # 引数
    /// * `days_left` - 更新日までの残り日数（負の値は更新日超過）
    ///
    /// # 戻り値
    /// 判定された状態
    pub fn classify(days_left: i64) -> Self {
        if days_left < 0 {
            SubscriptionStatus::Expired
        } else if days_left <= STATUS_EXPIRING_DAYS {
            SubscriptionStatus::Expiring
        } else {
            SubscriptionStatus::Active
        }
    }
}
