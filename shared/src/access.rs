//! 访问守卫
//!
//! 页面级守卫只看认证阶段和角色；资源级守卫（宠物归属、预约归属、状态流转）
//! 在页面加载到具体记录后再检查。

use crate::error::AccessError;
use crate::session::AuthPhase;
use crate::{Appointment, AppointmentStatus, Pet, Role, User};

/// 路由的访问要求
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    Public,
    /// 登录、注册：已登录用户跳转到自己的落地页
    AnonymousOnly,
    SignedIn,
    Role(Role),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    /// 会话仍在恢复中，暂不渲染
    Wait,
    RedirectToLogin,
    RedirectToLanding(Role),
    /// 角色不符：提示后回到首页
    Denied(AccessError),
}

pub fn check_route(access: RouteAccess, phase: &AuthPhase) -> GuardDecision {
    match (access, phase) {
        (RouteAccess::Public, _) => GuardDecision::Allow,
        (_, AuthPhase::Loading) => GuardDecision::Wait,
        (RouteAccess::AnonymousOnly, AuthPhase::Authenticated(user)) => {
            GuardDecision::RedirectToLanding(user.role)
        }
        (RouteAccess::AnonymousOnly, AuthPhase::Anonymous) => GuardDecision::Allow,
        (_, AuthPhase::Anonymous) => GuardDecision::RedirectToLogin,
        (RouteAccess::SignedIn, AuthPhase::Authenticated(_)) => GuardDecision::Allow,
        (RouteAccess::Role(required), AuthPhase::Authenticated(user)) => {
            if user.role == required {
                GuardDecision::Allow
            } else {
                GuardDecision::Denied(AccessError::WrongRole { required })
            }
        }
    }
}

/// 只能编辑自己的宠物
pub fn ensure_pet_owner(pet: &Pet, user: &User) -> Result<(), AccessError> {
    if pet.owner_id == user.id {
        Ok(())
    } else {
        Err(AccessError::NotPetOwner)
    }
}

/// 医生只能打开分配给自己的预约
pub fn ensure_assigned_doctor(appointment: &Appointment, user: &User) -> Result<(), AccessError> {
    if user.role == Role::Doctor && appointment.doctor_ref() == user.id {
        Ok(())
    } else {
        Err(AccessError::NotAssignedDoctor)
    }
}

pub fn ensure_transition(
    appointment: &Appointment,
    next: AppointmentStatus,
) -> Result<(), AccessError> {
    if appointment.status.can_transition_to(next) {
        Ok(())
    } else {
        Err(AccessError::InvalidTransition)
    }
}

/// 诊断记录在预约完成或取消后不可编辑
pub fn ensure_details_editable(appointment: &Appointment) -> Result<(), AccessError> {
    if appointment.status.is_closed() {
        Err(AccessError::DetailsLocked)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(id: &str, role: Role) -> User {
        User {
            id: id.into(),
            email: format!("{}@example.com", id),
            first_name: "Test".into(),
            last_name: "User".into(),
            phone: None,
            role,
            created_at: None,
        }
    }

    fn appointment(doctor_id: &str, status: AppointmentStatus) -> Appointment {
        Appointment {
            id: "a1".into(),
            pet_id: "p1".into(),
            doctor_id: doctor_id.into(),
            appointment_date: Utc::now(),
            description: None,
            status,
            created_at: None,
            pet: None,
            doctor: None,
            details: None,
        }
    }

    #[test]
    fn route_guard_decisions() {
        let owner = AuthPhase::Authenticated(user("u1", Role::PetOwner));
        let doctor = AuthPhase::Authenticated(user("d1", Role::Doctor));
        let staff_only = RouteAccess::Role(Role::Staff);

        assert_eq!(check_route(RouteAccess::Public, &AuthPhase::Loading), GuardDecision::Allow);
        assert_eq!(check_route(staff_only, &AuthPhase::Loading), GuardDecision::Wait);
        assert_eq!(
            check_route(staff_only, &AuthPhase::Anonymous),
            GuardDecision::RedirectToLogin
        );
        assert_eq!(
            check_route(staff_only, &owner),
            GuardDecision::Denied(AccessError::WrongRole {
                required: Role::Staff
            })
        );
        assert_eq!(
            check_route(RouteAccess::Role(Role::Doctor), &doctor),
            GuardDecision::Allow
        );
        assert_eq!(
            check_route(RouteAccess::AnonymousOnly, &doctor),
            GuardDecision::RedirectToLanding(Role::Doctor)
        );
        assert_eq!(
            check_route(RouteAccess::AnonymousOnly, &AuthPhase::Anonymous),
            GuardDecision::Allow
        );
        assert_eq!(check_route(RouteAccess::SignedIn, &owner), GuardDecision::Allow);
    }

    #[test]
    fn editing_someone_elses_pet_is_rejected() {
        let pet = Pet {
            id: "p1".into(),
            owner_id: "u1".into(),
            name: "Rex".into(),
            species: "dog".into(),
            breed: None,
            date_of_birth: None,
            gender: "male".into(),
            created_at: None,
        };
        assert_eq!(ensure_pet_owner(&pet, &user("u1", Role::PetOwner)), Ok(()));

        let err = ensure_pet_owner(&pet, &user("u2", Role::PetOwner)).unwrap_err();
        assert_eq!(err.to_string(), "You can only edit your own pets");
    }

    #[test]
    fn doctor_cannot_open_another_doctors_appointment() {
        let appt = appointment("d1", AppointmentStatus::Scheduled);
        assert_eq!(ensure_assigned_doctor(&appt, &user("d1", Role::Doctor)), Ok(()));
        assert_eq!(
            ensure_assigned_doctor(&appt, &user("d2", Role::Doctor)),
            Err(AccessError::NotAssignedDoctor)
        );
        // 同 ID 但角色不是医生
        assert!(ensure_assigned_doctor(&appt, &user("d1", Role::Staff)).is_err());
    }

    #[test]
    fn transitions_and_detail_locks() {
        let scheduled = appointment("d1", AppointmentStatus::Scheduled);
        let completed = appointment("d1", AppointmentStatus::Completed);

        assert!(ensure_transition(&scheduled, AppointmentStatus::InProgress).is_ok());
        assert_eq!(
            ensure_transition(&scheduled, AppointmentStatus::Completed),
            Err(AccessError::InvalidTransition)
        );
        assert!(ensure_details_editable(&scheduled).is_ok());
        assert_eq!(
            ensure_details_editable(&completed),
            Err(AccessError::DetailsLocked)
        );
    }
}
