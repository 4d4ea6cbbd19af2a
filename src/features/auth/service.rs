use crate::features::auth::models::{AuthState, OwnerIdentity};
use crate::services::sync::SyncAdapter;
use crate::shared::errors::{AppError, AppResult};
use std::sync::{Arc, Mutex};

/// オーナー認証サービス
///
/// リモート永続化層とのハンドシェイクでオーナーを確立する。
/// ストアの生成には認証済みのOwnerIdentityが必要なため、オーナーが
/// 確立するまで永続化操作が始まることはなく、未認証での呼び出しは
/// current_owner()が認証エラーとして拒否する。
pub struct AuthService<A: SyncAdapter> {
    /// 同期アダプタ
    adapter: Arc<A>,
    /// 認証状態
    state: Mutex<AuthState>,
}

impl<A: SyncAdapter> AuthService<A> {
    /// 新しいAuthServiceを作成する
    ///
    /// # 引数
    /// * `adapter` - 同期アダプタ
    ///
    /// # 戻り値
    /// AuthServiceインスタンス
    pub fn new(adapter: Arc<A>) -> Self {
        Self {
            adapter,
            state: Mutex::new(AuthState::default()),
        }
    }

    /// 認証ハンドシェイクを実行してオーナーを確立する
    ///
    /// # 戻り値
    /// 認証されたオーナー、または失敗時は認証エラー
    pub async fn sign_in(&self) -> AppResult<OwnerIdentity> {
        {
            let mut state = self.state.lock().unwrap();
            state.is_loading = true;
        }

        let result = self.adapter.authenticate().await;

        let mut state = self.state.lock().unwrap();
        state.is_loading = false;
        match result {
            Ok(owner) => {
                state.owner = Some(owner.clone());
                log::info!("オーナー認証が完了しました: owner_id={}", owner.id);
                Ok(owner)
            }
            Err(e) => {
                state.owner = None;
                log::error!("オーナー認証に失敗しました: {}", e);
                Err(e)
            }
        }
    }

    /// 認証済みオーナーを取得する
    ///
    /// # 戻り値
    /// 認証済みオーナー、未認証の場合は認証エラー
    pub fn current_owner(&self) -> AppResult<OwnerIdentity> {
        let state = self.state.lock().unwrap();
        state
            .owner
            .clone()
            .ok_or_else(|| AppError::auth("オーナーが確立されていません"))
    }

    /// 認証済みかどうかを返す
    pub fn is_authenticated(&self) -> bool {
        self.state.lock().unwrap().owner.is_some()
    }

    /// 認証処理中かどうかを返す
    pub fn is_loading(&self) -> bool {
        self.state.lock().unwrap().is_loading
    }

    /// サインアウトして認証状態を破棄する
    ///
    /// 変更ストリームの購読ハンドルは呼び出し側が併せてrelease()すること。
    pub fn sign_out(&self) {
        let mut state = self.state.lock().unwrap();
        if let Some(owner) = state.owner.take() {
            log::info!("サインアウトしました: owner_id={}", owner.id);
        }
    }
}
