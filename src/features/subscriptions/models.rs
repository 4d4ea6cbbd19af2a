use crate::features::subscriptions::dates;
use crate::features::subscriptions::status::SubscriptionStatus;
use crate::shared::errors::{AppError, AppResult};
use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// 許可される契約期間（月数）
pub const ALLOWED_DURATION_MONTHS: [u32; 5] = [1, 2, 3, 6, 12];

/// メールアドレスの形式チェック用パターン
static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+$").expect("メールアドレスパターンが不正です"));

/// サブスクリプションデータモデル
///
/// 1人のオーナーのコレクションに属するレコード。`id`は永続化層が
/// 作成時に採番し、以後変更されない。`password`は再販先のクライアントへ
/// そのまま渡す必要があるため、ハッシュ化せず復元可能な平文のまま保持する
/// （モデル元システムから引き継いだ既知の制限）。
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Subscription {
    pub id: String,
    pub client_name: String,
    pub service: String,
    pub email: String,
    pub password: String,
    pub price: f64,
    pub start_date: NaiveDate,
    pub duration_months: u32,
    /// start_date + duration_months から導出され、書き込み時に保存される
    pub renewal_date: NaiveDate,
    /// サーバー採番の作成日時（既定の並び順に使用、欠損は最古扱い）
    pub created_at: Option<DateTime<Utc>>,
    /// サーバー採番の更新日時（書き込みのたびに更新）
    pub updated_at: Option<DateTime<Utc>>,
}

impl Subscription {
    /// 基準日から更新日までの残り日数を求める
    ///
    /// # 引数
    /// * `today` - 基準日（通常は今日）
    ///
    /// # 戻り値
    /// 残り日数（負の値は更新日超過）
    pub fn days_left(&self, today: NaiveDate) -> i64 {
        dates::days_until(self.renewal_date, today)
    }

    /// 基準日時点の状態を判定する
    ///
    /// # 引数
    /// * `today` - 基準日（通常は今日）
    ///
    /// # 戻り値
    /// 判定された状態
    pub fn status_on(&self, today: NaiveDate) -> SubscriptionStatus {
        SubscriptionStatus::classify(self.days_left(today))
    }
}

/// サブスクリプション作成・編集用DTO
///
/// 編集フォームは全フィールドを再送信するため、作成と更新で共用する。
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SubscriptionDto {
    pub client_name: String,
    pub service: String,
    pub email: String,
    pub password: String,
    pub price: f64,
    pub start_date: NaiveDate,
    pub duration_months: u32,
}

/// バリデーション済みの書き込みデータ
///
/// 永続化層へ渡す唯一の形。フィールド検証と`renewal_date`の導出を
/// ひとつの変換にまとめることで、導出元フィールドとの不整合を防ぐ。
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionDraft {
    pub client_name: String,
    pub service: String,
    pub email: String,
    pub password: String,
    pub price: f64,
    pub start_date: NaiveDate,
    pub duration_months: u32,
    pub renewal_date: NaiveDate,
}

impl SubscriptionDto {
    /// 入力を検証し、更新日を導出して書き込みデータへ変換する
    ///
    /// 永続化の直前に必ずこの変換を通す。
    ///
    /// # 戻り値
    /// 検証済みの書き込みデータ、または失敗時はバリデーションエラー
    pub fn into_draft(self) -> AppResult<SubscriptionDraft> {
        if self.client_name.trim().is_empty() {
            return Err(AppError::validation("クライアント名を入力してください"));
        }
        if self.service.trim().is_empty() {
            return Err(AppError::validation("サービス名を入力してください"));
        }
        if self.email.trim().is_empty() {
            return Err(AppError::validation(
                "アカウントのメールアドレスを入力してください",
            ));
        }
        if !EMAIL_PATTERN.is_match(&self.email) {
            return Err(AppError::validation("メールアドレスの形式が不正です"));
        }
        if self.password.is_empty() {
            return Err(AppError::validation("パスワードを入力してください"));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(AppError::validation(
                "価格は0以上の数値である必要があります",
            ));
        }
        if !ALLOWED_DURATION_MONTHS.contains(&self.duration_months) {
            return Err(AppError::validation(
                "契約期間は1・2・3・6・12ヶ月のいずれかである必要があります",
            ));
        }

        let renewal_date = dates::add_months(self.start_date, self.duration_months)
            .ok_or_else(|| AppError::validation("更新日を計算できない開始日です"))?;

        Ok(SubscriptionDraft {
            client_name: self.client_name,
            service: self.service,
            email: self.email,
            password: self.password,
            price: self.price,
            start_date: self.start_date,
            duration_months: self.duration_months,
            renewal_date,
        })
    }
}
