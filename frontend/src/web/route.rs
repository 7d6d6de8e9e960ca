//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由、访问要求以及守卫结果。

use std::fmt::Display;
use vetdesk_shared::access::{GuardDecision, RouteAccess, check_route};
use vetdesk_shared::{AccessError, AuthPhase, Role};

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    #[default]
    Home,
    Login,
    Register,
    Pets,
    AddPet,
    EditPet(String),
    Appointments,
    BookAppointment,
    DoctorSchedule,
    DoctorAppointment(String),
    StaffDashboard,
    Profile,
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举，忽略查询串与结尾的 `/`
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Self::Home,
            ["login"] => Self::Login,
            ["register"] => Self::Register,
            ["pets"] => Self::Pets,
            ["pets", "add"] => Self::AddPet,
            ["pets", "edit", id] => Self::EditPet(id.to_string()),
            ["appointments"] => Self::Appointments,
            ["appointments", "book"] => Self::BookAppointment,
            ["doctor", "schedule"] => Self::DoctorSchedule,
            ["doctor", "appointment", id] => Self::DoctorAppointment(id.to_string()),
            ["staff", "dashboard"] => Self::StaffDashboard,
            ["profile"] => Self::Profile,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Login => "/login".to_string(),
            Self::Register => "/register".to_string(),
            Self::Pets => "/pets".to_string(),
            Self::AddPet => "/pets/add".to_string(),
            Self::EditPet(id) => format!("/pets/edit/{}", id),
            Self::Appointments => "/appointments".to_string(),
            Self::BookAppointment => "/appointments/book".to_string(),
            Self::DoctorSchedule => "/doctor/schedule".to_string(),
            Self::DoctorAppointment(id) => format!("/doctor/appointment/{}", id),
            Self::StaffDashboard => "/staff/dashboard".to_string(),
            Self::Profile => "/profile".to_string(),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// **核心守卫逻辑：定义该路由的访问要求**
    pub fn access(&self) -> RouteAccess {
        match self {
            Self::Home | Self::NotFound => RouteAccess::Public,
            Self::Login | Self::Register => RouteAccess::AnonymousOnly,
            Self::Pets
            | Self::AddPet
            | Self::EditPet(_)
            | Self::Appointments
            | Self::BookAppointment => RouteAccess::Role(Role::PetOwner),
            Self::DoctorSchedule | Self::DoctorAppointment(_) => RouteAccess::Role(Role::Doctor),
            Self::StaffDashboard => RouteAccess::Role(Role::Staff),
            Self::Profile => RouteAccess::SignedIn,
        }
    }

    /// 各角色登录后的落地页
    pub fn landing(role: Role) -> Self {
        Self::from_path(role.landing_path())
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

/// 守卫求值结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// 直接展示目标路由（会话恢复中也先展示，由出口渲染加载态）
    Show(AppRoute),
    /// 重定向，角色不符时附带提示
    Redirect(AppRoute, Option<AccessError>),
}

/// 对目标路由执行守卫
pub fn resolve(target: AppRoute, phase: &AuthPhase) -> Resolution {
    match check_route(target.access(), phase) {
        GuardDecision::Allow | GuardDecision::Wait => Resolution::Show(target),
        GuardDecision::RedirectToLogin => {
            Resolution::Redirect(AppRoute::auth_failure_redirect(), None)
        }
        GuardDecision::RedirectToLanding(role) => Resolution::Redirect(AppRoute::landing(role), None),
        GuardDecision::Denied(err) => Resolution::Redirect(AppRoute::Home, Some(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vetdesk_shared::User;

    fn signed_in(role: Role) -> AuthPhase {
        AuthPhase::Authenticated(User {
            id: "u1".into(),
            email: "u1@example.com".into(),
            first_name: "Test".into(),
            last_name: "User".into(),
            phone: None,
            role,
            created_at: None,
        })
    }

    #[test]
    fn paths_round_trip_through_routes() {
        let routes = [
            AppRoute::Home,
            AppRoute::Login,
            AppRoute::Register,
            AppRoute::Pets,
            AppRoute::AddPet,
            AppRoute::EditPet("p1".into()),
            AppRoute::Appointments,
            AppRoute::BookAppointment,
            AppRoute::DoctorSchedule,
            AppRoute::DoctorAppointment("a1".into()),
            AppRoute::StaffDashboard,
            AppRoute::Profile,
        ];
        for route in routes {
            assert_eq!(AppRoute::from_path(&route.to_path()), route);
        }
    }

    #[test]
    fn parsing_ignores_query_and_trailing_slash() {
        assert_eq!(AppRoute::from_path("/pets/"), AppRoute::Pets);
        assert_eq!(AppRoute::from_path("/pets?tab=1"), AppRoute::Pets);
        assert_eq!(
            AppRoute::from_path("/doctor/appointment/abc#notes"),
            AppRoute::DoctorAppointment("abc".into())
        );
        assert_eq!(AppRoute::from_path("/pets/edit"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path("/unknown"), AppRoute::NotFound);
    }

    #[test]
    fn landing_routes_match_roles() {
        assert_eq!(AppRoute::landing(Role::PetOwner), AppRoute::Pets);
        assert_eq!(AppRoute::landing(Role::Doctor), AppRoute::DoctorSchedule);
        assert_eq!(AppRoute::landing(Role::Staff), AppRoute::StaffDashboard);
    }

    #[test]
    fn anonymous_users_are_sent_to_login() {
        assert_eq!(
            resolve(AppRoute::Profile, &AuthPhase::Anonymous),
            Resolution::Redirect(AppRoute::Login, None)
        );
        assert_eq!(
            resolve(AppRoute::Home, &AuthPhase::Anonymous),
            Resolution::Show(AppRoute::Home)
        );
    }

    #[test]
    fn wrong_role_is_denied_with_message() {
        let resolution = resolve(AppRoute::StaffDashboard, &signed_in(Role::Doctor));
        match resolution {
            Resolution::Redirect(AppRoute::Home, Some(err)) => {
                assert_eq!(err.to_string(), "Only staff members can access this page");
            }
            other => panic!("unexpected resolution: {:?}", other),
        }
    }

    #[test]
    fn signed_in_users_skip_login() {
        assert_eq!(
            resolve(AppRoute::Login, &signed_in(Role::Doctor)),
            Resolution::Redirect(AppRoute::DoctorSchedule, None)
        );
        assert_eq!(
            resolve(AppRoute::DoctorAppointment("a1".into()), &signed_in(Role::Doctor)),
            Resolution::Show(AppRoute::DoctorAppointment("a1".into()))
        );
    }

    #[test]
    fn loading_session_still_shows_target() {
        assert_eq!(
            resolve(AppRoute::Pets, &AuthPhase::Loading),
            Resolution::Show(AppRoute::Pets)
        );
    }
}
