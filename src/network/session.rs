//! 会话凭据 (AuthSession)
//!
//! 站点实例各持一份；只有 login 的成功路径写入，失败不残留
//! 半成品状态。本层内不处理过期：过期由后续特权调用失败暴露，
//! 是否重新登录由调用方决定。

use parking_lot::RwLock;
use tokio::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct AuthSession {
    /// API 握手分配的临时会话标识
    session_id: RwLock<Option<String>>,
    /// 登录成功后签发的请求签名
    auth_token: RwLock<Option<String>>,
    /// 表单登录站点以 Cookie 推定的登录标志
    cookie_login: RwLock<bool>,
    /// 登录单飞锁：并发调用方串行执行，后到者持锁后复查状态
    login_gate: Mutex<()>,
}

impl AuthSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session_id(&self) -> Option<String> {
        self.session_id.read().clone()
    }

    pub fn set_session_id(&self, id: String) {
        *self.session_id.write() = Some(id);
    }

    pub fn auth_token(&self) -> Option<String> {
        self.auth_token.read().clone()
    }

    pub fn set_auth_token(&self, token: String) {
        *self.auth_token.write() = Some(token);
    }

    pub fn mark_cookie_login(&self) {
        *self.cookie_login.write() = true;
    }

    pub fn is_authenticated(&self) -> bool {
        *self.cookie_login.read() || self.auth_token.read().is_some()
    }

    /// 获取登录单飞锁；持锁期间其他登录调用等待而非并发执行
    pub async fn lock_login(&self) -> MutexGuard<'_, ()> {
        self.login_gate.lock().await
    }
}
