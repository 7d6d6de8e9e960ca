//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 实现了"监听 -> 验证 -> 处理 -> 加载"的导航流程。

use leptos::prelude::*;
use vetdesk_shared::access::RouteAccess;
use vetdesk_shared::{AccessError, AuthPhase};
use wasm_bindgen::prelude::*;

use super::route::{AppRoute, Resolution, resolve};

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态（内部工具函数）
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（内部工具函数，用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

fn write_history(path: &str, use_push: bool) {
    if use_push {
        push_history_state(path);
    } else {
        replace_history_state(path);
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 认证阶段通过注入的信号获得，与认证系统解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前路由（只读信号）
    current_route: ReadSignal<AppRoute>,
    /// 设置当前路由（写入信号）
    set_route: WriteSignal<AppRoute>,
    /// 认证阶段（注入的信号）
    auth_phase: Signal<AuthPhase>,
    /// 角色不符被拒绝时的回调（通常弹出提示）
    on_denied: Callback<AccessError>,
}

impl RouterService {
    fn new(auth_phase: Signal<AuthPhase>, on_denied: Callback<AccessError>) -> Self {
        let initial_route = AppRoute::from_path(&current_path());
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
            auth_phase,
            on_denied,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// 会话是否仍在恢复中
    pub fn is_auth_loading(&self) -> bool {
        self.auth_phase.with(AuthPhase::is_loading)
    }

    /// **核心方法：导航与守卫**
    ///
    /// 流程：请求 -> 验证(Guard) -> 处理 -> 加载
    pub fn navigate(&self, path: &str) {
        self.navigate_to_route(AppRoute::from_path(path), true);
    }

    /// 导航到指定路由
    ///
    /// # Arguments
    /// * `target_route` - 目标路由
    /// * `use_push` - true 使用 pushState, false 使用 replaceState
    fn navigate_to_route(&self, target_route: AppRoute, use_push: bool) {
        let phase = self.auth_phase.get_untracked();
        self.apply(resolve(target_route, &phase), use_push);
    }

    fn apply(&self, resolution: Resolution, use_push: bool) {
        match resolution {
            Resolution::Show(route) => {
                write_history(&route.to_path(), use_push);
                self.set_route.set(route);
            }
            Resolution::Redirect(route, denied) => {
                log::info!("[Router] Redirecting to {}", route);
                write_history(&route.to_path(), use_push);
                self.set_route.set(route);
                if let Some(err) = denied {
                    log::warn!("[Router] Access denied: {}", err);
                    self.on_denied.run(err);
                }
            }
        }
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let router = *self;

        let closure = Closure::<dyn Fn()>::new(move || {
            // popstate 时也执行守卫逻辑，重定向使用 replaceState
            let target_route = AppRoute::from_path(&current_path());
            let phase = router.auth_phase.get_untracked();
            match resolve(target_route, &phase) {
                Resolution::Show(route) => router.set_route.set(route),
                redirect => router.apply(redirect, false),
            }
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 认证阶段变化时对当前路由重新执行守卫
    ///
    /// 覆盖三种情形：会话恢复完成、登录后离开登录页、登出后离开受保护页面。
    fn setup_auth_redirect(&self) {
        let router = *self;

        Effect::new(move |_| {
            let phase = router.auth_phase.get();
            let route = router.current_route.get_untracked();

            if let redirect @ Resolution::Redirect(..) = resolve(route, &phase) {
                log::debug!("[Router] Auth state changed, re-checking current route.");
                router.apply(redirect, false);
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(auth_phase: Signal<AuthPhase>, on_denied: Callback<AccessError>) -> RouterService {
    let router = RouterService::new(auth_phase, on_denied);

    router.init_popstate_listener();
    router.setup_auth_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

/// 导航函数（返回一个可调用的闭包）
pub fn use_navigate() -> impl Fn(&str) + Clone + Copy {
    let router = use_router();
    move |to: &str| {
        router.navigate(to);
    }
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 认证阶段信号
    auth_phase: Signal<AuthPhase>,
    /// 访问被拒绝时的回调
    on_denied: Callback<AccessError>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router(auth_phase, on_denied);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件；会话恢复期间受保护页面显示加载态。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();
    // 只关心是否仍在加载，资料刷新等认证状态变化不应重建页面
    let auth_loading = Memo::new(move |_| router.is_auth_loading());

    move || {
        let current = router.current_route().get();
        if auth_loading.get() && current.access() != RouteAccess::Public {
            return view! {
                <div class="flex items-center justify-center min-h-[60vh]">
                    <span class="loading loading-spinner loading-lg text-primary"></span>
                </div>
            }
            .into_any();
        }
        matcher(current)
    }
}

/// 站内链接：拦截点击，通过路由服务导航
#[component]
pub fn Link(
    /// 目标路径
    #[prop(into)]
    to: String,
    #[prop(optional, into)] class: String,
    /// 子内容
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let target = to.clone();
    let on_click = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        router.navigate(&target);
    };

    view! {
        <a href=to class=class on:click=on_click>
            {children()}
        </a>
    }
}
