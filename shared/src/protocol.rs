use crate::stats::Stats;
use crate::{Appointment, AppointmentDetails, AppointmentStatus, Pet, Role, User, serde_helper};
use chrono::{DateTime, NaiveDate, Utc};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// Whether the bearer token must be attached.
    const REQUIRES_AUTH: bool = true;

    /// The URL path, including any query string.
    fn path(&self) -> String;

    /// The JSON body, if the endpoint takes one.
    fn body(&self) -> Result<Option<String>, serde_json::Error> {
        Ok(None)
    }
}

fn json_body<T: Serialize>(value: &T) -> Result<Option<String>, serde_json::Error> {
    serde_json::to_string(value).map(Some)
}

/// 拼接查询参数，跳过空值
fn with_query(path: &str, params: &[(&str, Option<String>)]) -> String {
    let query: Vec<String> = params
        .iter()
        .filter_map(|(k, v)| v.as_ref().map(|v| format!("{}={}", k, v)))
        .collect();
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query.join("&"))
    }
}

// =========================================================
// Auth
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

impl ApiRequest for SignInRequest {
    type Response = AuthResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const REQUIRES_AUTH: bool = false;

    fn path(&self) -> String {
        "/api/auth/login".to_string()
    }

    fn body(&self) -> Result<Option<String>, serde_json::Error> {
        json_body(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: Role,
}

impl ApiRequest for SignUpRequest {
    type Response = AuthResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const REQUIRES_AUTH: bool = false;

    fn path(&self) -> String {
        "/api/auth/register".to_string()
    }

    fn body(&self) -> Result<Option<String>, serde_json::Error> {
        json_body(self)
    }
}

/// 登录/注册响应；注册接口可能不返回 token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    pub user: User,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CurrentUserRequest;

impl ApiRequest for CurrentUserRequest {
    type Response = User;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/api/auth/me".to_string()
    }
}

// =========================================================
// Users
// =========================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListUsersRequest {
    pub role: Option<Role>,
}

impl ApiRequest for ListUsersRequest {
    type Response = Vec<User>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        with_query("/api/users", &[("role", self.role.map(|r| r.to_string()))])
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetUserRequest {
    pub id: String,
}

impl ApiRequest for GetUserRequest {
    type Response = User;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/api/users/{}", self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub id: String,
    pub changes: ProfileUpdate,
}

impl ApiRequest for UpdateProfileRequest {
    type Response = User;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        format!("/api/users/{}", self.id)
    }

    fn body(&self) -> Result<Option<String>, serde_json::Error> {
        json_body(&self.changes)
    }
}

// =========================================================
// Pets
// =========================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPetsRequest {
    pub owner_id: Option<String>,
}

impl ApiRequest for ListPetsRequest {
    type Response = Vec<Pet>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        with_query("/api/pets", &[("owner_id", self.owner_id.clone())])
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetPetRequest {
    pub id: String,
}

impl ApiRequest for GetPetRequest {
    type Response = Pet;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/api/pets/{}", self.id)
    }
}

/// Create a new pet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPet {
    pub owner_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub species: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    #[serde(
        default,
        with = "serde_helper::lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_of_birth: Option<NaiveDate>,
    pub gender: String,
}

impl ApiRequest for NewPet {
    type Response = Pet;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/api/pets".to_string()
    }

    fn body(&self) -> Result<Option<String>, serde_json::Error> {
        json_body(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetUpdate {
    pub name: String,
    #[serde(rename = "type")]
    pub species: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    #[serde(
        default,
        with = "serde_helper::lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_of_birth: Option<NaiveDate>,
    pub gender: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePetRequest {
    pub id: String,
    pub changes: PetUpdate,
}

impl ApiRequest for UpdatePetRequest {
    type Response = Pet;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        format!("/api/pets/{}", self.id)
    }

    fn body(&self) -> Result<Option<String>, serde_json::Error> {
        json_body(&self.changes)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletePetRequest {
    pub id: String,
}

impl ApiRequest for DeletePetRequest {
    // 响应体内容不关心
    type Response = IgnoredAny;
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("/api/pets/{}", self.id)
    }
}

// =========================================================
// Appointments
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppointmentFilter {
    pub doctor_id: Option<String>,
    pub pet_ids: Vec<String>,
}

impl AppointmentFilter {
    pub fn for_doctor(doctor_id: impl Into<String>) -> Self {
        Self {
            doctor_id: Some(doctor_id.into()),
            pet_ids: Vec::new(),
        }
    }

    pub fn for_pets(pet_ids: Vec<String>) -> Self {
        Self {
            doctor_id: None,
            pet_ids,
        }
    }

    pub fn matches(&self, appointment: &Appointment) -> bool {
        let doctor_ok = self
            .doctor_id
            .as_deref()
            .is_none_or(|d| appointment.doctor_ref() == d);
        let pet_ok =
            self.pet_ids.is_empty() || self.pet_ids.iter().any(|p| p == appointment.pet_ref());
        doctor_ok && pet_ok
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListAppointmentsRequest {
    pub filter: AppointmentFilter,
}

impl ApiRequest for ListAppointmentsRequest {
    type Response = Vec<Appointment>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        let pet_ids = (!self.filter.pet_ids.is_empty()).then(|| self.filter.pet_ids.join(","));
        with_query(
            "/api/appointments",
            &[
                ("doctor_id", self.filter.doctor_id.clone()),
                ("pet_ids", pet_ids),
            ],
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetAppointmentRequest {
    pub id: String,
}

impl ApiRequest for GetAppointmentRequest {
    type Response = Appointment;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/api/appointments/{}", self.id)
    }
}

/// Book a new appointment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAppointment {
    pub pet_id: String,
    pub doctor_id: String,
    pub appointment_date: DateTime<Utc>,
    pub description: String,
    pub status: AppointmentStatus,
}

impl ApiRequest for NewAppointment {
    type Response = Appointment;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/api/appointments".to_string()
    }

    fn body(&self) -> Result<Option<String>, serde_json::Error> {
        json_body(self)
    }
}

/// 部分更新，仅序列化出现的字段
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppointmentUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appointment_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl AppointmentUpdate {
    pub fn status(status: AppointmentStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAppointmentRequest {
    pub id: String,
    pub changes: AppointmentUpdate,
}

impl ApiRequest for UpdateAppointmentRequest {
    type Response = Appointment;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        format!("/api/appointments/{}", self.id)
    }

    fn body(&self) -> Result<Option<String>, serde_json::Error> {
        json_body(&self.changes)
    }
}

/// 诊断记录；空字段以 `null` 发送
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailsInput {
    pub diagnosis: Option<String>,
    pub treatment: Option<String>,
    pub notes: Option<String>,
}

impl DetailsInput {
    /// 把空白字符串规整为 None
    pub fn from_text(diagnosis: &str, treatment: &str, notes: &str) -> Self {
        fn non_blank(s: &str) -> Option<String> {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Self {
            diagnosis: non_blank(diagnosis),
            treatment: non_blank(treatment),
            notes: non_blank(notes),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveDetailsRequest {
    pub appointment_id: String,
    pub details: DetailsInput,
}

impl ApiRequest for SaveDetailsRequest {
    type Response = AppointmentDetails;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        format!("/api/appointments/{}/details", self.appointment_id)
    }

    fn body(&self) -> Result<Option<String>, serde_json::Error> {
        json_body(&self.details)
    }
}

// =========================================================
// Statistics
// =========================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StatsRequest;

impl ApiRequest for StatsRequest {
    type Response = Stats;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/api/stats".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_paths_include_only_present_filters() {
        assert_eq!(ListUsersRequest::default().path(), "/api/users");
        assert_eq!(
            ListUsersRequest {
                role: Some(Role::Doctor)
            }
            .path(),
            "/api/users?role=doctor"
        );
        assert_eq!(
            ListPetsRequest {
                owner_id: Some("u1".into())
            }
            .path(),
            "/api/pets?owner_id=u1"
        );

        let req = ListAppointmentsRequest {
            filter: AppointmentFilter {
                doctor_id: Some("d1".into()),
                pet_ids: vec!["p1".into(), "p2".into()],
            },
        };
        assert_eq!(req.path(), "/api/appointments?doctor_id=d1&pet_ids=p1,p2");
        assert_eq!(
            ListAppointmentsRequest::default().path(),
            "/api/appointments"
        );
    }

    #[test]
    fn partial_update_serializes_only_status() {
        let req = UpdateAppointmentRequest {
            id: "a1".into(),
            changes: AppointmentUpdate::status(AppointmentStatus::Cancelled),
        };
        assert_eq!(req.path(), "/api/appointments/a1");
        assert_eq!(
            req.body().unwrap().as_deref(),
            Some(r#"{"status":"cancelled"}"#)
        );
    }

    #[test]
    fn details_blank_fields_are_sent_as_null() {
        let details = DetailsInput::from_text("Otitis", "  ", "");
        let req = SaveDetailsRequest {
            appointment_id: "a1".into(),
            details,
        };
        assert_eq!(req.path(), "/api/appointments/a1/details");
        let body: serde_json::Value = serde_json::from_str(&req.body().unwrap().unwrap()).unwrap();
        assert_eq!(body["diagnosis"], "Otitis");
        assert!(body["treatment"].is_null());
        assert!(body["notes"].is_null());
    }

    #[test]
    fn auth_endpoints_do_not_require_token() {
        assert!(!SignInRequest::REQUIRES_AUTH);
        assert!(!SignUpRequest::REQUIRES_AUTH);
        assert!(CurrentUserRequest::REQUIRES_AUTH);
        assert!(StatsRequest::REQUIRES_AUTH);
    }
}
