use crate::Role;
use serde::Deserialize;
use thiserror::Error;

// =========================================================
// 传输层错误
// =========================================================

/// `HttpClient` 实现返回的底层错误（连接失败、请求构建失败等）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// =========================================================
// API 错误
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// 需要认证但本地没有 token，请求未发出
    #[error("authentication required")]
    MissingToken,
    /// 后端不可达
    #[error("network error: {0}")]
    Network(String),
    /// 非 2xx 响应
    #[error("request failed with status {status}")]
    Status {
        status: u16,
        message: Option<String>,
    },
    #[error("invalid response body: {0}")]
    Decode(String),
    #[error("invalid request body: {0}")]
    Encode(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// 后端错误响应体 `{"message": "..."}`
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl ApiError {
    /// 根据状态码和响应体构造错误，尽量保留服务端消息
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty());
        ApiError::Status { status, message }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 后端不可达，是唯一允许切换到离线数据的情形
    pub fn is_unreachable(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::MissingToken) || self.status() == Some(401)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status {
                message: Some(m), ..
            } => Some(m),
            _ => None,
        }
    }

    /// 面向用户的提示文案
    ///
    /// 除登录/注册会透出服务端消息外，其余一律折叠为按操作区分的通用文案。
    pub fn user_message(&self, op: Operation) -> String {
        match self {
            ApiError::MissingToken => "You must be logged in to continue".to_string(),
            _ if op.shows_server_message() => self
                .server_message()
                .map(str::to_string)
                .unwrap_or_else(|| op.failure_message()),
            _ => op.failure_message(),
        }
    }
}

impl From<TransportError> for ApiError {
    fn from(e: TransportError) -> Self {
        ApiError::Network(e.message)
    }
}

/// 用户动作，用于生成失败提示
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    SignIn,
    SignUp,
    FetchUsers,
    FetchProfile,
    UpdateProfile,
    FetchPets,
    FetchPet,
    CreatePet,
    UpdatePet,
    DeletePet,
    FetchAppointments,
    FetchAppointment,
    BookAppointment,
    CancelAppointment,
    StartAppointment,
    CompleteAppointment,
    SaveDetails,
    FetchStats,
}

impl Operation {
    fn shows_server_message(&self) -> bool {
        matches!(self, Operation::SignIn | Operation::SignUp)
    }

    pub fn failure_message(&self) -> String {
        let what = match self {
            Operation::SignIn => return "Login failed. Please try again later.".to_string(),
            Operation::SignUp => {
                return "Registration failed. Please try again later.".to_string();
            }
            Operation::FetchUsers => "fetch doctors",
            Operation::FetchProfile => "fetch profile",
            Operation::UpdateProfile => "update profile",
            Operation::FetchPets => "fetch pets",
            Operation::FetchPet => "fetch pet details",
            Operation::CreatePet => "add pet",
            Operation::UpdatePet => "update pet",
            Operation::DeletePet => "delete pet",
            Operation::FetchAppointments => "fetch appointments",
            Operation::FetchAppointment => "fetch appointment details",
            Operation::BookAppointment => "book appointment",
            Operation::CancelAppointment => "cancel appointment",
            Operation::StartAppointment => "start appointment",
            Operation::CompleteAppointment => "complete appointment",
            Operation::SaveDetails => "save appointment details",
            Operation::FetchStats => "fetch statistics",
        };
        format!("Failed to {}. Please try again later.", what)
    }
}

// =========================================================
// 表单与访问控制错误
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please fill in all required fields")]
    MissingFields(Vec<&'static str>),
    #[error("Please enter both email and password")]
    MissingCredentials,
    #[error("First name and last name are required")]
    MissingName,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Appointments can only be booked on upcoming weekdays")]
    DateNotBookable,
    #[error("Please choose one of the available time slots")]
    SlotNotAvailable,
    #[error("Please enter a valid date of birth")]
    InvalidBirthDate,
    #[error("Date of birth cannot be in the future")]
    BirthDateInFuture,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("You must be logged in to view this page")]
    NotSignedIn,
    #[error("Only {} can access this page", .required.plural())]
    WrongRole { required: Role },
    #[error("You can only edit your own pets")]
    NotPetOwner,
    #[error("You don't have access to this appointment")]
    NotAssignedDoctor,
    #[error("This appointment can no longer be changed")]
    InvalidTransition,
    #[error("Completed appointments can no longer be edited")]
    DetailsLocked,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_is_extracted_from_body() {
        let err = ApiError::from_status(400, r#"{"message":"Email already registered"}"#);
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.server_message(), Some("Email already registered"));
        assert_eq!(
            err.user_message(Operation::SignUp),
            "Email already registered"
        );
        // 非登录/注册操作不透出服务端消息
        assert_eq!(
            err.user_message(Operation::FetchPets),
            "Failed to fetch pets. Please try again later."
        );
    }

    #[test]
    fn non_json_body_keeps_status_only() {
        let err = ApiError::from_status(502, "<html>Bad Gateway</html>");
        assert_eq!(
            err,
            ApiError::Status {
                status: 502,
                message: None
            }
        );
        assert_eq!(
            err.user_message(Operation::SignIn),
            "Login failed. Please try again later."
        );
    }

    #[test]
    fn classification_helpers() {
        assert!(ApiError::Network("refused".into()).is_unreachable());
        assert!(ApiError::MissingToken.is_unauthorized());
        assert!(ApiError::from_status(401, "").is_unauthorized());
        assert!(ApiError::from_status(404, "").is_not_found());
        assert!(!ApiError::Decode("eof".into()).is_unreachable());
    }

    #[test]
    fn wrong_role_message_names_the_role() {
        let err = AccessError::WrongRole {
            required: Role::Staff,
        };
        assert_eq!(err.to_string(), "Only staff members can access this page");
    }
}
