//! 认证状态机与本地会话存储

use crate::client::ApiClient;
use crate::request::HttpClient;
use crate::storage::{
    KEY_AUTH_TOKEN, KEY_CACHED_USER, KeyValueStore, LEGACY_PROFILE_KEYS, LEGACY_TOKEN_KEYS,
};
use crate::{Role, User};

/// 认证阶段
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AuthPhase {
    /// 正在通过 `/api/auth/me` 恢复会话
    #[default]
    Loading,
    Authenticated(User),
    Anonymous,
}

impl AuthPhase {
    pub fn is_loading(&self) -> bool {
        matches!(self, AuthPhase::Loading)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthPhase::Authenticated(_))
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            AuthPhase::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.user().map(|u| u.role)
    }
}

/// 注册结果
///
/// 后端注册接口不一定返回 token；没有 token 时本地不保存会话，需要再登录。
#[derive(Debug, Clone, PartialEq)]
pub enum SignUpOutcome {
    SignedIn(User),
    LoginRequired(User),
}

impl SignUpOutcome {
    pub fn user(&self) -> &User {
        match self {
            SignUpOutcome::SignedIn(user) | SignUpOutcome::LoginRequired(user) => user,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        matches!(self, SignUpOutcome::SignedIn(_))
    }
}

// =========================================================
// 本地存储
// =========================================================

/// 读取 token，遗留键上的 token 会迁移到 `authToken`
pub fn stored_token<S: KeyValueStore>(store: &S) -> Option<String> {
    if let Some(token) = store.get(KEY_AUTH_TOKEN).filter(|t| !t.is_empty()) {
        return Some(token);
    }

    let (key, token) = LEGACY_TOKEN_KEYS
        .iter()
        .find_map(|k| store.get(k).filter(|t| !t.is_empty()).map(|t| (*k, t)))?;

    log::debug!("migrating token from legacy key '{}'", key);
    store.set(KEY_AUTH_TOKEN, &token);
    store.delete(key);
    Some(token)
}

pub fn store_token<S: KeyValueStore>(store: &S, token: &str) {
    store.set(KEY_AUTH_TOKEN, token);
}

pub fn cache_user<S: KeyValueStore>(store: &S, user: &User) {
    match serde_json::to_string(user) {
        Ok(json) => store.set(KEY_CACHED_USER, &json),
        Err(e) => log::warn!("failed to cache user: {}", e),
    }
}

/// 损坏的缓存视为不存在
pub fn cached_user<S: KeyValueStore>(store: &S) -> Option<User> {
    let raw = store.get(KEY_CACHED_USER)?;
    serde_json::from_str(&raw).ok()
}

/// 清除 token、缓存用户与所有遗留键
pub fn clear<S: KeyValueStore>(store: &S) {
    store.delete(KEY_AUTH_TOKEN);
    store.delete(KEY_CACHED_USER);
    for key in LEGACY_TOKEN_KEYS.iter().chain(LEGACY_PROFILE_KEYS.iter()) {
        store.delete(key);
    }
}

// =========================================================
// 会话恢复
// =========================================================

/// 会话恢复结果
#[derive(Debug, Clone, PartialEq)]
pub struct Restored {
    pub phase: AuthPhase,
    /// 后端不可达，使用了缓存用户
    pub offline: bool,
}

impl Restored {
    fn online(phase: AuthPhase) -> Self {
        Self {
            phase,
            offline: false,
        }
    }
}

/// 启动时恢复会话
///
/// - 没有 token：匿名，丢弃缓存用户
/// - `/me` 返回非 2xx：丢弃 token，匿名
/// - 后端不可达：有缓存用户则使用并标记离线，否则匿名
/// - 成功：已认证，刷新缓存
pub async fn restore_session<C: HttpClient, S: KeyValueStore>(
    client: &ApiClient<C, S>,
) -> Restored {
    let store = client.store();

    if client.token().is_none() {
        store.delete(KEY_CACHED_USER);
        return Restored::online(AuthPhase::Anonymous);
    }

    match client.current_user().await {
        Ok(user) => {
            cache_user(store, &user);
            Restored::online(AuthPhase::Authenticated(user))
        }
        Err(e) if e.is_unreachable() => match cached_user(store) {
            Some(user) => {
                log::warn!("backend unreachable, restoring cached user {}", user.email);
                Restored {
                    phase: AuthPhase::Authenticated(user),
                    offline: true,
                }
            }
            None => Restored {
                phase: AuthPhase::Anonymous,
                offline: true,
            },
        },
        Err(e) => {
            log::warn!("discarding stored token: {}", e);
            clear(store);
            Restored::online(AuthPhase::Anonymous)
        }
    }
}
