use serde::{Deserialize, Serialize};

/// 認証済みオーナーの識別情報
///
/// コレクションはオーナーごとに厳密に分離され、すべてのストア・
/// アダプタ操作にこのIDを明示的に渡す。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerIdentity {
    /// オーナーID（永続化層が発行する一意な識別子）
    pub id: String,
    /// 匿名認証かどうか
    pub is_anonymous: bool,
}

/// 認証状態を表す構造体
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthState {
    /// 認証済みオーナー
    pub owner: Option<OwnerIdentity>,
    /// 認証処理中フラグ
    pub is_loading: bool,
}
