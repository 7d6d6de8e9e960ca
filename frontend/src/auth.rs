//! 认证模块
//!
//! 管理用户认证状态，与路由系统解耦。
//! 路由服务通过注入的认证阶段信号来执行守卫。

use crate::api::ClinicApi;
use leptos::prelude::*;
use leptos::task::spawn_local;
use vetdesk_shared::protocol::SignUpRequest;
use vetdesk_shared::session::{SignUpOutcome, restore_session};
use vetdesk_shared::{ApiResult, AuthPhase, User};

/// 认证状态
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub phase: AuthPhase,
    /// 会话是在后端不可达时从缓存恢复的
    pub offline: bool,
}

/// 认证上下文
///
/// 包含读写信号，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 认证状态（只读）
    pub state: ReadSignal<AuthState>,
    /// 设置认证状态（写入）
    pub set_state: WriteSignal<AuthState>,
}

impl AuthContext {
    pub fn new() -> Self {
        let (state, set_state) = signal(AuthState::default());
        Self { state, set_state }
    }

    /// 获取认证阶段信号（用于路由服务注入）
    pub fn phase_signal(&self) -> Signal<AuthPhase> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.phase.clone()))
    }

    /// 当前用户（响应式）
    pub fn user(&self) -> Option<User> {
        self.state.with(|s| s.phase.user().cloned())
    }

    /// 当前用户（非响应式，用于事件处理与一次性加载）
    pub fn user_untracked(&self) -> Option<User> {
        self.state.with_untracked(|s| s.phase.user().cloned())
    }

    fn authenticate(&self, user: User) {
        self.set_state.set(AuthState {
            phase: AuthPhase::Authenticated(user),
            offline: false,
        });
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 初始化认证状态
///
/// 通过 `/api/auth/me` 校验本地 token，完成后离开 Loading 阶段。
pub fn init_auth(ctx: AuthContext, api: ClinicApi) {
    spawn_local(async move {
        let restored = restore_session(&api).await;
        log::info!(
            "session restored: {}{}",
            match &restored.phase {
                AuthPhase::Authenticated(user) => user.role.as_str(),
                _ => "anonymous",
            },
            if restored.offline { " (offline)" } else { "" }
        );
        ctx.set_state.set(AuthState {
            phase: restored.phase,
            offline: restored.offline,
        });
    });
}

/// 登录并保存状态
pub async fn sign_in(ctx: AuthContext, api: &ClinicApi, email: &str, password: &str) -> ApiResult<User> {
    let user = api.sign_in(email, password).await?;
    ctx.authenticate(user.clone());
    Ok(user)
}

/// 注册；后端返回 token 时直接进入已登录状态，否则保持匿名
pub async fn sign_up(
    ctx: AuthContext,
    api: &ClinicApi,
    req: &SignUpRequest,
) -> ApiResult<SignUpOutcome> {
    let outcome = api.sign_up(req).await?;
    if let SignUpOutcome::SignedIn(user) = &outcome {
        ctx.authenticate(user.clone());
    }
    Ok(outcome)
}

/// 注销并清除状态
///
/// 导航由路由服务监听认证状态变化后自动处理。
pub fn sign_out(ctx: AuthContext, api: &ClinicApi) {
    api.sign_out();
    ctx.set_state.set(AuthState {
        phase: AuthPhase::Anonymous,
        offline: false,
    });
}

/// 资料更新后同步内存中的用户
pub fn refresh_user(ctx: AuthContext, user: User) {
    ctx.set_state.update(|state| {
        if state.phase.is_authenticated() {
            state.phase = AuthPhase::Authenticated(user);
        }
    });
}
