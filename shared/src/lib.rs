//! VetDesk 共享层
//!
//! 前端与测试共用的纯 Rust 逻辑，不依赖 DOM：
//! - 领域模型 (`User` / `Pet` / `Appointment` / `AppointmentDetails`)
//! - `protocol`: REST 端点契约
//! - `client`: API 客户端门面
//! - `session` / `access`: 认证状态机与访问守卫
//! - `schedule` / `stats` / `fallback`: 预约分组、统计与离线数据集

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod access;
pub mod client;
pub mod config;
pub mod error;
pub mod fallback;
pub mod protocol;
pub mod request;
pub mod schedule;
pub mod serde_helper;
pub mod session;
pub mod stats;
pub mod storage;
pub mod validation;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::{AccessError, ApiError, ApiResult, FormError, Operation};
pub use session::AuthPhase;
pub use stats::Stats;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5001";
pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const HEADER_REQUEST_ID: &str = "X-Request-Id";

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    PetOwner,
    Doctor,
    Staff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::PetOwner => "pet_owner",
            Role::Doctor => "doctor",
            Role::Staff => "staff",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::PetOwner => "Pet Owner",
            Role::Doctor => "Doctor",
            Role::Staff => "Staff",
        }
    }

    /// 用于访问拒绝提示，如 "Only doctors can access this page"
    pub fn plural(&self) -> &'static str {
        match self {
            Role::PetOwner => "pet owners",
            Role::Doctor => "doctors",
            Role::Staff => "staff members",
        }
    }

    /// 登录后的默认落地页
    pub fn landing_path(&self) -> &'static str {
        match self {
            Role::PetOwner => "/pets",
            Role::Doctor => "/doctor/schedule",
            Role::Staff => "/staff/dashboard",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(alias = "_id")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn full_name(&self) -> String {
        join_name(&self.first_name, &self.last_name)
    }

    /// 医生显示为 "Dr. 名 姓"
    pub fn display_name(&self) -> String {
        match self.role {
            Role::Doctor => format!("Dr. {}", self.full_name()),
            _ => self.full_name(),
        }
    }
}

/// 嵌入在预约中的人员摘要（宠物主人或医生）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonSummary {
    #[serde(default, alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl PersonSummary {
    pub fn full_name(&self) -> String {
        join_name(&self.first_name, &self.last_name)
    }
}

impl From<&User> for PersonSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: Some(user.email.clone()),
            phone: user.phone.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub owner_id: String,
    pub name: String,
    #[serde(rename = "type", alias = "species")]
    pub species: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    #[serde(
        default,
        with = "serde_helper::lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub gender: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// 嵌入在预约中的宠物摘要（后端 populate 之后的形态）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PetSummary {
    #[serde(default, alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type", alias = "species")]
    pub species: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    #[serde(
        default,
        with = "serde_helper::lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub gender: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<PersonSummary>,
}

impl PetSummary {
    pub fn from_pet(pet: &Pet, owner: Option<&User>) -> Self {
        Self {
            id: pet.id.clone(),
            name: pet.name.clone(),
            species: pet.species.clone(),
            breed: pet.breed.clone(),
            date_of_birth: pet.date_of_birth,
            gender: pet.gender.clone(),
            owner: owner.map(PersonSummary::from),
        }
    }
}

/// 预约状态
///
/// 线性生命周期：scheduled -> in_progress -> completed，
/// 或 scheduled -> cancelled。不存在回退。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// 终态：completed / cancelled
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    pub fn can_transition_to(&self, next: AppointmentStatus) -> bool {
        matches!(
            (self, next),
            (Self::Scheduled, Self::InProgress)
                | (Self::Scheduled, Self::Cancelled)
                | (Self::InProgress, Self::Completed)
        )
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppointmentDetails {
    #[serde(default, alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub appointment_id: String,
    #[serde(default)]
    pub diagnosis: Option<String>,
    #[serde(default)]
    pub treatment: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub pet_id: String,
    #[serde(default)]
    pub doctor_id: String,
    #[serde(alias = "appointmentDate")]
    pub appointment_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: AppointmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    // 以下字段仅在后端 populate 时存在
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pet: Option<PetSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor: Option<PersonSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<AppointmentDetails>,
}

impl Appointment {
    /// 宠物 ID：优先 `pet_id`，缺失时取嵌入对象的 ID
    pub fn pet_ref(&self) -> &str {
        match (&self.pet_id, &self.pet) {
            (id, _) if !id.is_empty() => id.as_str(),
            (_, Some(pet)) => pet.id.as_str(),
            _ => "",
        }
    }

    /// 医生 ID：优先 `doctor_id`，缺失时取嵌入对象的 ID
    pub fn doctor_ref(&self) -> &str {
        match (&self.doctor_id, &self.doctor) {
            (id, _) if !id.is_empty() => id.as_str(),
            (_, Some(doctor)) => doctor.id.as_str(),
            _ => "",
        }
    }

    pub fn description_text(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.trim().is_empty())
    }

    pub fn pet_name(&self) -> &str {
        self.pet.as_ref().map(|p| p.name.as_str()).unwrap_or("Unknown pet")
    }

    pub fn owner_name(&self) -> Option<String> {
        self.pet
            .as_ref()
            .and_then(|p| p.owner.as_ref())
            .map(PersonSummary::full_name)
    }

    pub fn doctor_name(&self) -> Option<String> {
        self.doctor
            .as_ref()
            .map(|d| format!("Dr. {}", d.full_name()))
    }
}

fn join_name(first: &str, last: &str) -> String {
    match (first.trim(), last.trim()) {
        ("", "") => String::new(),
        (f, "") => f.to_string(),
        ("", l) => l.to_string(),
        (f, l) => format!("{} {}", f, l),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appointment_accepts_populated_backend_shape() {
        let raw = r#"{
            "_id": "a1",
            "appointmentDate": "2025-03-04T09:30:00.000Z",
            "description": "",
            "status": "in_progress",
            "pet": {
                "_id": "p1", "name": "Rex", "type": "dog", "gender": "male",
                "owner": { "_id": "u1", "first_name": "Ada", "last_name": "Lovelace" }
            },
            "doctor": { "_id": "d1", "first_name": "John", "last_name": "Dolittle" }
        }"#;

        let appt: Appointment = serde_json::from_str(raw).unwrap();
        assert_eq!(appt.pet_ref(), "p1");
        assert_eq!(appt.doctor_ref(), "d1");
        assert_eq!(appt.status, AppointmentStatus::InProgress);
        assert_eq!(appt.description_text(), None);
        assert_eq!(appt.owner_name().as_deref(), Some("Ada Lovelace"));
        assert_eq!(appt.doctor_name().as_deref(), Some("Dr. John Dolittle"));
    }

    #[test]
    fn explicit_ids_win_over_embedded_objects() {
        let raw = r#"{
            "id": "a1", "pet_id": "p9", "doctor_id": "d9",
            "appointment_date": "2025-03-04T09:30:00Z", "status": "scheduled",
            "doctor": { "_id": "d1" }
        }"#;
        let appt: Appointment = serde_json::from_str(raw).unwrap();
        assert_eq!(appt.pet_ref(), "p9");
        assert_eq!(appt.doctor_ref(), "d9");
    }

    #[test]
    fn pet_uses_type_on_the_wire() {
        let raw = r#"{"_id":"p1","owner_id":"u1","name":"Tom","species":"cat",
                      "date_of_birth":"2020-05-01T00:00:00.000Z","gender":"male"}"#;
        let pet: Pet = serde_json::from_str(raw).unwrap();
        assert_eq!(pet.species, "cat");
        assert_eq!(pet.date_of_birth, NaiveDate::from_ymd_opt(2020, 5, 1));

        let json = serde_json::to_value(&pet).unwrap();
        assert_eq!(json["type"], "cat");
        assert_eq!(json["date_of_birth"], "2020-05-01");
    }

    #[test]
    fn status_lifecycle_is_linear() {
        use AppointmentStatus::*;
        assert!(Scheduled.can_transition_to(InProgress));
        assert!(Scheduled.can_transition_to(Cancelled));
        assert!(InProgress.can_transition_to(Completed));
        assert!(!InProgress.can_transition_to(Cancelled));
        assert!(!Completed.can_transition_to(Scheduled));
        assert!(!Cancelled.can_transition_to(InProgress));
        assert!(Completed.is_closed() && Cancelled.is_closed());
    }

    #[test]
    fn doctor_display_name_is_prefixed() {
        let user = User {
            id: "d1".into(),
            email: "d@clinic.test".into(),
            first_name: "Jane".into(),
            last_name: "Herriot".into(),
            phone: None,
            role: Role::Doctor,
            created_at: None,
        };
        assert_eq!(user.display_name(), "Dr. Jane Herriot");
        assert_eq!(Role::Doctor.landing_path(), "/doctor/schedule");
    }
}
