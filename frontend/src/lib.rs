//! VetDesk 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由定义与守卫决策（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `api`: 诊所后端客户端与离线兜底
//! - `auth`: 认证状态管理
//! - `notify`: toast 与离线横幅
//! - `components`: 页面与 UI 组件层

mod api;
mod auth;
mod notify;
mod components {
    pub mod appointments;
    pub mod book_appointment;
    pub mod doctor_appointment;
    pub mod doctor_schedule;
    pub mod home;
    pub mod icons;
    pub mod login;
    pub mod navigation;
    pub mod pet_form;
    pub mod pets;
    pub mod profile;
    pub mod register;
    pub mod staff_dashboard;
    pub mod widgets;
}

use crate::api::build_api;
use crate::auth::{AuthContext, init_auth};
use crate::components::appointments::AppointmentsPage;
use crate::components::book_appointment::BookAppointmentPage;
use crate::components::doctor_appointment::DoctorAppointmentPage;
use crate::components::doctor_schedule::DoctorSchedulePage;
use crate::components::home::HomePage;
use crate::components::login::LoginPage;
use crate::components::navigation::NavBar;
use crate::components::pet_form::PetFormPage;
use crate::components::pets::PetsPage;
use crate::components::profile::ProfilePage;
use crate::components::register::RegisterPage;
use crate::components::staff_dashboard::StaffDashboardPage;
use crate::notify::{NotifyContext, OfflineBanner, Toast};

use leptos::prelude::*;
use log::LevelFilter;
use vetdesk_shared::AccessError;

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装，替代 gloo-* 系列 crate，
// 以减小 WASM 二进制体积。
pub(crate) mod web {
    mod console;
    mod dialog;
    mod http;
    pub mod route;
    pub mod router;
    mod storage;

    pub use console::init as init_console_logger;
    pub use dialog::confirm;
    pub use http::FetchClient;
    pub use storage::LocalStorage;
}

use web::route::AppRoute;
use web::router::{Link, Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Home => view! { <HomePage /> }.into_any(),
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::Pets => view! { <PetsPage /> }.into_any(),
        AppRoute::AddPet => view! { <PetFormPage /> }.into_any(),
        AppRoute::EditPet(id) => view! { <PetFormPage pet_id=id /> }.into_any(),
        AppRoute::Appointments => view! { <AppointmentsPage /> }.into_any(),
        AppRoute::BookAppointment => view! { <BookAppointmentPage /> }.into_any(),
        AppRoute::DoctorSchedule => view! { <DoctorSchedulePage /> }.into_any(),
        AppRoute::DoctorAppointment(id) => view! { <DoctorAppointmentPage id=id /> }.into_any(),
        AppRoute::StaffDashboard => view! { <StaffDashboardPage /> }.into_any(),
        AppRoute::Profile => view! { <ProfilePage /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-[70vh]">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                    <Link to="/" class="btn btn-primary mt-6">"Back to home"</Link>
                </div>
            </div>
        }
        .into_any(),
    }
}

/// 安装控制台日志，debug 构建输出到 Debug 级别
pub fn init_logging() {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    web::init_console_logger(level);
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建认证上下文与 API 客户端
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);
    let api = build_api();
    provide_context(api.clone());

    let notify = NotifyContext::new();
    provide_context(notify);

    // 2. 用本地 token 恢复会话
    init_auth(auth_ctx, api);

    // 会话是离线恢复的，就一直显示离线横幅，直到页面拿到在线数据
    Effect::new(move |_| {
        if auth_ctx.state.with(|s| s.offline) {
            notify.set_offline(true);
        }
    });

    // 3. 获取认证阶段信号，用于注入路由服务（解耦！）
    let auth_phase = auth_ctx.phase_signal();
    let on_denied = Callback::new(move |e: AccessError| notify.error(e.to_string()));

    view! {
        // 4. 路由器组件：注入认证信号实现守卫
        <Router auth_phase=auth_phase on_denied=on_denied>
            <div class="min-h-screen bg-base-200 font-sans">
                <NavBar />
                <OfflineBanner />
                <Toast />
                <main>
                    <RouterOutlet matcher=route_matcher />
                </main>
            </div>
        </Router>
    }
}
