// 日付計算モジュール

use chrono::{Local, Months, NaiveDate};

/// 開始日に月数を加算して更新日を求める
///
/// 加算先の月に同じ日が存在しない場合は、その月の末日に丸める
/// （例: 1月31日 + 1ヶ月 → 2月28日、うるう年なら2月29日）。
///
/// # 引数
/// * `date` - 基準日
/// * `months` - 加算する月数
///
/// # 戻り値
/// 加算後の日付。カレンダーで表現できない範囲になる場合はNone
pub fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}

/// 基準日から対象日までの残り日数を符号付きで求める
///
/// 同日なら0、翌日なら1、前日なら-1。負の値は対象日が過去であることを表す。
/// 両引数とも日付単位（時刻なし）のため、端数の丸めは発生しない。
///
/// # 引数
/// * `target` - 対象日
/// * `today` - 基準日（通常は今日）
///
/// # 戻り値
/// 残り日数
pub fn days_until(target: NaiveDate, today: NaiveDate) -> i64 {
    target.signed_duration_since(today).num_days()
}

/// ローカルタイムゾーンでの今日の日付を取得する
///
/// # 戻り値
/// 今日の日付
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
