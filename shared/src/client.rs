use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::protocol::*;
use crate::request::{HttpClient, HttpRequest};
use crate::session::{self, SignUpOutcome};
use crate::storage::KeyValueStore;
use crate::{
    Appointment, AppointmentDetails, AppointmentStatus, HEADER_AUTHORIZATION, HEADER_CONTENT_TYPE,
    HEADER_REQUEST_ID, Pet, Role, Stats, User,
};
use uuid::Uuid;

#[cfg(test)]
mod tests;

/// 后端 REST API 的统一门面
///
/// HTTP 实现与本地存储均通过 trait 注入：浏览器中是 fetch + localStorage，
/// 测试中是内存 mock。
#[derive(Clone)]
pub struct ApiClient<C, S> {
    http: C,
    store: S,
    config: ClientConfig,
}

impl<C: HttpClient, S: KeyValueStore> ApiClient<C, S> {
    pub fn new(http: C, store: S, config: ClientConfig) -> Self {
        Self {
            http,
            store,
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn token(&self) -> Option<String> {
        session::stored_token(&self.store)
    }

    // =========================================================
    // 核心发送逻辑
    // =========================================================

    /// 发送任意端点请求
    ///
    /// 需要认证的端点在没有 token 时直接失败，不会发出请求。
    pub async fn send<R: ApiRequest>(&self, req: &R) -> ApiResult<R::Response> {
        let url = self.config.url(&req.path());
        let request_id = Uuid::new_v4().to_string();

        let mut http = HttpRequest::new(&url, R::METHOD).with_header(HEADER_REQUEST_ID, &request_id);

        if R::REQUIRES_AUTH {
            let token = self.token().ok_or(ApiError::MissingToken)?;
            http = http.with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token));
        }

        if let Some(body) = req.body().map_err(|e| ApiError::Encode(e.to_string()))? {
            http = http
                .with_header(HEADER_CONTENT_TYPE, "application/json")
                .with_body(body);
        }

        log::debug!("[{}] {} {}", request_id, R::METHOD.as_str(), url);

        let resp = self.http.send(http).await.map_err(|e| {
            log::warn!("[{}] {} {} unreachable: {}", request_id, R::METHOD.as_str(), url, e);
            ApiError::from(e)
        })?;

        if !resp.is_success() {
            log::debug!("[{}] status {}", request_id, resp.status);
            return Err(ApiError::from_status(resp.status, &resp.body));
        }

        resp.json()
    }

    // =========================================================
    // Auth
    // =========================================================

    pub async fn sign_in(&self, email: &str, password: &str) -> ApiResult<User> {
        let req = SignInRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let resp = self.send(&req).await?;
        let token = resp
            .token
            .ok_or_else(|| ApiError::Decode("login response has no token".to_string()))?;
        session::store_token(&self.store, &token);
        session::cache_user(&self.store, &resp.user);
        Ok(resp.user)
    }

    pub async fn sign_up(&self, req: &SignUpRequest) -> ApiResult<SignUpOutcome> {
        let resp = self.send(req).await?;
        match resp.token.filter(|t| !t.is_empty()) {
            Some(token) => {
                session::store_token(&self.store, &token);
                session::cache_user(&self.store, &resp.user);
                Ok(SignUpOutcome::SignedIn(resp.user))
            }
            None => {
                log::info!("registered {} without a session token", resp.user.email);
                Ok(SignUpOutcome::LoginRequired(resp.user))
            }
        }
    }

    /// 仅清理本地状态，不请求后端
    pub fn sign_out(&self) {
        session::clear(&self.store);
    }

    pub async fn current_user(&self) -> ApiResult<User> {
        self.send(&CurrentUserRequest).await
    }

    // =========================================================
    // Users
    // =========================================================

    pub async fn list_users(&self, role: Option<Role>) -> ApiResult<Vec<User>> {
        self.send(&ListUsersRequest { role }).await
    }

    pub async fn get_user(&self, id: &str) -> ApiResult<User> {
        self.send(&GetUserRequest { id: id.to_string() }).await
    }

    pub async fn update_profile(&self, id: &str, changes: ProfileUpdate) -> ApiResult<User> {
        let user = self
            .send(&UpdateProfileRequest {
                id: id.to_string(),
                changes,
            })
            .await?;
        session::cache_user(&self.store, &user);
        Ok(user)
    }

    // =========================================================
    // Pets
    // =========================================================

    pub async fn list_pets(&self, owner_id: Option<&str>) -> ApiResult<Vec<Pet>> {
        self.send(&ListPetsRequest {
            owner_id: owner_id.map(str::to_string),
        })
        .await
    }

    pub async fn get_pet(&self, id: &str) -> ApiResult<Pet> {
        self.send(&GetPetRequest { id: id.to_string() }).await
    }

    pub async fn create_pet(&self, pet: &NewPet) -> ApiResult<Pet> {
        self.send(pet).await
    }

    pub async fn update_pet(&self, id: &str, changes: PetUpdate) -> ApiResult<Pet> {
        self.send(&UpdatePetRequest {
            id: id.to_string(),
            changes,
        })
        .await
    }

    pub async fn delete_pet(&self, id: &str) -> ApiResult<()> {
        self.send(&DeletePetRequest { id: id.to_string() })
            .await
            .map(|_| ())
    }

    // =========================================================
    // Appointments
    // =========================================================

    pub async fn list_appointments(&self, filter: AppointmentFilter) -> ApiResult<Vec<Appointment>> {
        self.send(&ListAppointmentsRequest { filter }).await
    }

    pub async fn get_appointment(&self, id: &str) -> ApiResult<Appointment> {
        self.send(&GetAppointmentRequest { id: id.to_string() })
            .await
    }

    pub async fn create_appointment(&self, appointment: &NewAppointment) -> ApiResult<Appointment> {
        self.send(appointment).await
    }

    pub async fn update_appointment(
        &self,
        id: &str,
        changes: AppointmentUpdate,
    ) -> ApiResult<Appointment> {
        self.send(&UpdateAppointmentRequest {
            id: id.to_string(),
            changes,
        })
        .await
    }

    pub async fn set_appointment_status(
        &self,
        id: &str,
        status: AppointmentStatus,
    ) -> ApiResult<Appointment> {
        self.update_appointment(id, AppointmentUpdate::status(status))
            .await
    }

    pub async fn cancel_appointment(&self, id: &str) -> ApiResult<Appointment> {
        self.set_appointment_status(id, AppointmentStatus::Cancelled)
            .await
    }

    pub async fn start_appointment(&self, id: &str) -> ApiResult<Appointment> {
        self.set_appointment_status(id, AppointmentStatus::InProgress)
            .await
    }

    pub async fn complete_appointment(&self, id: &str) -> ApiResult<Appointment> {
        self.set_appointment_status(id, AppointmentStatus::Completed)
            .await
    }

    /// 创建或更新诊断记录（后端 upsert）
    pub async fn save_appointment_details(
        &self,
        appointment_id: &str,
        details: DetailsInput,
    ) -> ApiResult<AppointmentDetails> {
        self.send(&SaveDetailsRequest {
            appointment_id: appointment_id.to_string(),
            details,
        })
        .await
    }

    // =========================================================
    // Statistics
    // =========================================================

    pub async fn stats(&self) -> ApiResult<Stats> {
        self.send(&StatsRequest).await
    }
}
