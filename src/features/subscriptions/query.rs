use crate::features::subscriptions::models::Subscription;
use chrono::NaiveDate;
use serde::Serialize;

/// ダッシュボードの「まもなく更新」集計に使う残り日数の上限（両端含む）
///
/// 行バッジのSTATUS_EXPIRING_DAYS(3日)より広い5日で集計する。
/// 2つのしきい値は用途の異なる独立した値であり、統一しない。
pub const DASHBOARD_EXPIRING_DAYS: i64 = 5;

/// ダッシュボード統計
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionStats {
    /// 状態にかかわらず全レコードの価格を合算した月間売上
    pub total_monthly_revenue: f64,
    /// 残り日数が0以上のサブスクリプション数
    pub active_count: usize,
    /// 残り日数が0〜5日のサブスクリプション数
    pub expiring_count: usize,
}

/// クライアント名またはサービス名で部分一致検索する
///
/// 大文字小文字は区別しない。空の検索語は一覧全体をそのままの順で返す。
/// 一覧自体は変更しない。
///
/// # 引数
/// * `subscriptions` - 検索対象の一覧
/// * `term` - 検索語
///
/// # 戻り値
/// 一致したサブスクリプションの参照リスト
pub fn search<'a>(subscriptions: &'a [Subscription], term: &str) -> Vec<&'a Subscription> {
    if term.is_empty() {
        return subscriptions.iter().collect();
    }

    let needle = term.to_lowercase();
    subscriptions
        .iter()
        .filter(|sub| {
            sub.client_name.to_lowercase().contains(&needle)
                || sub.service.to_lowercase().contains(&needle)
        })
        .collect()
}

/// 一覧全体からダッシュボード統計を計算する
///
/// 月間売上は検索条件や状態にかかわらず全レコードを合算する。
///
/// # 引数
/// * `subscriptions` - 集計対象の一覧（絞り込み前の全件）
/// * `today` - 基準日（通常は今日）
///
/// # 戻り値
/// ダッシュボード統計
pub fn aggregate(subscriptions: &[Subscription], today: NaiveDate) -> CollectionStats {
    let mut stats = CollectionStats {
        total_monthly_revenue: 0.0,
        active_count: 0,
        expiring_count: 0,
    };

    for sub in subscriptions {
        stats.total_monthly_revenue += sub.price;

        let days = sub.days_left(today);
        if days >= 0 {
            stats.active_count += 1;
        }
        if (0..=DASHBOARD_EXPIRING_DAYS).contains(&days) {
            stats.expiring_count += 1;
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::subscriptions::status::SubscriptionStatus;
    use chrono::Duration;

    fn subscription(id: &str, client_name: &str, service: &str, days_left: i64) -> Subscription {
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        Subscription {
            id: id.to_string(),
            client_name: client_name.to_string(),
            service: service.to_string(),
            email: "cuenta@servicio.com".to_string(),
            password: "secreto".to_string(),
            price: 10.0,
            start_date: today - Duration::days(30),
            duration_months: 1,
            renewal_date: today + Duration::days(days_left),
            created_at: None,
            updated_at: None,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    #[test]
    fn test_search_empty_term_returns_all_in_order() {
        let subs = vec![
            subscription("1", "山田太郎", "Netflix", 10),
            subscription("2", "佐藤花子", "Spotify", 10),
            subscription("3", "鈴木一郎", "Disney+", 10),
        ];

        let results = search(&subs, "");

        let ids: Vec<&str> = results.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let subs = vec![
            subscription("1", "山田太郎", "Netflix", 10),
            subscription("2", "佐藤花子", "Spotify", 10),
        ];

        assert_eq!(search(&subs, "NETFLIX").len(), 1);
        assert_eq!(search(&subs, "netflix").len(), 1);
        assert_eq!(search(&subs, "spot").len(), 1);
    }

    #[test]
    fn test_search_matches_either_field() {
        let subs = vec![
            subscription("1", "Carlos Pérez", "Netflix", 10),
            subscription("2", "María netflix", "HBO Max", 10),
            subscription("3", "山田太郎", "Prime Video", 10),
        ];

        // クライアント名とサービス名のどちらに一致しても返る
        let results = search(&subs, "netflix");
        let ids: Vec<&str> = results.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);

        assert!(search(&subs, "carlos").len() == 1);
        assert!(search(&subs, "存在しない").is_empty());
    }

    #[test]
    fn test_aggregate_revenue_includes_expired() {
        let subs = vec![
            subscription("1", "山田太郎", "Netflix", 10),
            subscription("2", "佐藤花子", "Spotify", -5),
        ];

        let stats = aggregate(&subs, today());

        // 売上は期限切れも含めて合算する
        assert_eq!(stats.total_monthly_revenue, 20.0);
        assert_eq!(stats.active_count, 1);
    }

    #[test]
    fn test_aggregate_expiring_uses_five_day_threshold() {
        let subs = vec![
            subscription("0", "a", "s", 0),
            subscription("3", "b", "s", 3),
            subscription("4", "c", "s", 4),
            subscription("5", "d", "s", 5),
            subscription("6", "e", "s", 6),
            subscription("-1", "f", "s", -1),
        ];

        let stats = aggregate(&subs, today());

        // 0〜5日の4件（期限切れと6日は含まない）
        assert_eq!(stats.expiring_count, 4);
        assert_eq!(stats.active_count, 5);
    }

    #[test]
    fn test_dashboard_and_badge_thresholds_diverge() {
        let sub = subscription("1", "山田太郎", "Netflix", 4);

        let stats = aggregate(std::slice::from_ref(&sub), today());

        // 残り4日はダッシュボードの「まもなく更新」には数えられるが、
        // 行バッジとしては有効のまま。2つのしきい値は統一しない。
        assert_eq!(stats.expiring_count, 1);
        assert_eq!(sub.status_on(today()), SubscriptionStatus::Active);
    }
}
