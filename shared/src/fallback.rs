//! 离线数据集
//!
//! 后端不可达时，只读页面可以显式切换到这份内置样例数据，
//! 结果带 `Sourced::Offline` 标记，由界面提示用户当前为离线数据。
//! 写操作永远不会走这里。

use crate::error::ApiResult;
use crate::protocol::AppointmentFilter;
use crate::schedule::{TimeSlot, local_date, local_instant};
use crate::stats::Stats;
use crate::{
    Appointment, AppointmentDetails, AppointmentStatus, PersonSummary, Pet, PetSummary, Role, User,
};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

// =========================================================
// 数据来源标记
// =========================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Sourced<T> {
    Live(T),
    Offline(T),
}

impl<T> Sourced<T> {
    pub fn is_offline(&self) -> bool {
        matches!(self, Sourced::Offline(_))
    }

    pub fn get(&self) -> &T {
        match self {
            Sourced::Live(v) | Sourced::Offline(v) => v,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Sourced::Live(v) | Sourced::Offline(v) => v,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Sourced<U> {
        match self {
            Sourced::Live(v) => Sourced::Live(f(v)),
            Sourced::Offline(v) => Sourced::Offline(f(v)),
        }
    }
}

/// 仅在后端不可达且开关打开时使用离线数据，其它错误原样返回
pub fn with_fallback<T>(
    result: ApiResult<T>,
    enabled: bool,
    fallback: impl FnOnce() -> T,
) -> ApiResult<Sourced<T>> {
    match result {
        Ok(value) => Ok(Sourced::Live(value)),
        Err(e) if enabled && e.is_unreachable() => {
            log::warn!("backend unreachable, serving offline data: {}", e);
            Ok(Sourced::Offline(fallback()))
        }
        Err(e) => Err(e),
    }
}

// =========================================================
// 样例数据
// =========================================================

/// 相对于 "今天" 生成的不可变样例数据
#[derive(Debug, Clone)]
pub struct FallbackDataset {
    pub users: Vec<User>,
    pub pets: Vec<Pet>,
    pub appointments: Vec<Appointment>,
    today: NaiveDate,
}

fn user(id: &str, email: &str, first: &str, last: &str, role: Role) -> User {
    User {
        id: id.to_string(),
        email: email.to_string(),
        first_name: first.to_string(),
        last_name: last.to_string(),
        phone: None,
        role,
        created_at: None,
    }
}

fn pet(id: &str, owner_id: &str, name: &str, species: &str, breed: &str, gender: &str) -> Pet {
    Pet {
        id: id.to_string(),
        owner_id: owner_id.to_string(),
        name: name.to_string(),
        species: species.to_string(),
        breed: Some(breed.to_string()),
        date_of_birth: None,
        gender: gender.to_string(),
        created_at: None,
    }
}

impl FallbackDataset {
    pub fn seeded<Tz: TimeZone>(now: DateTime<Utc>, tz: &Tz) -> Self {
        let today = local_date(now, tz);
        let at = |days: i64, hour: u32, minute: u32| {
            local_instant(today + Duration::days(days), TimeSlot { hour, minute }, tz)
                .unwrap_or(now)
        };
        let appt = |id: &str, pet_id: &str, doctor_id: &str, date, status, desc: &str| Appointment {
            id: id.to_string(),
            pet_id: pet_id.to_string(),
            doctor_id: doctor_id.to_string(),
            appointment_date: date,
            description: Some(desc.to_string()),
            status,
            created_at: None,
            pet: None,
            doctor: None,
            details: None,
        };

        let users = vec![
            user("owner-1", "emma.wilson@example.com", "Emma", "Wilson", Role::PetOwner),
            user("owner-2", "liam.chen@example.com", "Liam", "Chen", Role::PetOwner),
            user("doctor-1", "sarah.miller@clinic.example", "Sarah", "Miller", Role::Doctor),
            user("doctor-2", "james.patel@clinic.example", "James", "Patel", Role::Doctor),
            user("staff-1", "olivia.brown@clinic.example", "Olivia", "Brown", Role::Staff),
        ];

        let mut pets = vec![
            pet("pet-1", "owner-1", "Buddy", "dog", "Golden Retriever", "male"),
            pet("pet-2", "owner-1", "Whiskers", "cat", "Siamese", "female"),
            pet("pet-3", "owner-2", "Kiwi", "bird", "Budgerigar", "unknown"),
        ];
        pets[0].date_of_birth = NaiveDate::from_ymd_opt(2019, 4, 12);
        pets[1].date_of_birth = NaiveDate::from_ymd_opt(2021, 9, 3);

        use AppointmentStatus::*;
        let mut appointments = vec![
            appt("appt-1", "pet-1", "doctor-1", at(0, 10, 0), Scheduled, "Annual check-up"),
            appt("appt-2", "pet-2", "doctor-1", at(0, 14, 30), InProgress, "Skin irritation"),
            appt("appt-3", "pet-3", "doctor-2", at(0, 11, 0), Cancelled, "Wing clipping"),
            appt("appt-4", "pet-3", "doctor-2", at(1, 9, 30), Scheduled, "Beak inspection"),
            appt("appt-5", "pet-1", "doctor-1", at(-2, 15, 0), Completed, "Vaccination"),
        ];
        appointments[4].details = Some(AppointmentDetails {
            id: "details-5".to_string(),
            appointment_id: "appt-5".to_string(),
            diagnosis: Some("Healthy".to_string()),
            treatment: Some("Rabies booster administered".to_string()),
            notes: Some("Next booster due in one year".to_string()),
            created_at: None,
        });

        Self {
            users,
            pets,
            appointments,
            today,
        }
    }

    pub fn users(&self, role: Option<Role>) -> Vec<User> {
        self.users
            .iter()
            .filter(|u| role.is_none_or(|r| u.role == r))
            .cloned()
            .collect()
    }

    pub fn user(&self, id: &str) -> Option<User> {
        self.users.iter().find(|u| u.id == id).cloned()
    }

    pub fn pets(&self, owner_id: Option<&str>) -> Vec<Pet> {
        self.pets
            .iter()
            .filter(|p| owner_id.is_none_or(|o| p.owner_id == o))
            .cloned()
            .collect()
    }

    pub fn pet(&self, id: &str) -> Option<Pet> {
        self.pets.iter().find(|p| p.id == id).cloned()
    }

    /// 按过滤条件返回预约，并填充宠物/主人/医生摘要
    pub fn appointments(&self, filter: &AppointmentFilter) -> Vec<Appointment> {
        self.appointments
            .iter()
            .filter(|a| filter.matches(a))
            .map(|a| self.populate(a))
            .collect()
    }

    pub fn appointment(&self, id: &str) -> Option<Appointment> {
        self.appointments
            .iter()
            .find(|a| a.id == id)
            .map(|a| self.populate(a))
    }

    pub fn stats<Tz: TimeZone>(&self, tz: &Tz) -> Stats {
        Stats::from_records(&self.users, &self.pets, &self.appointments, self.today, tz)
    }

    fn populate(&self, appointment: &Appointment) -> Appointment {
        let mut populated = appointment.clone();
        populated.pet = self.pets.iter().find(|p| p.id == appointment.pet_id).map(|p| {
            let owner = self.users.iter().find(|u| u.id == p.owner_id);
            PetSummary::from_pet(p, owner)
        });
        populated.doctor = self
            .users
            .iter()
            .find(|u| u.id == appointment.doctor_id)
            .map(PersonSummary::from);
        populated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ApiClient;
    use crate::config::ClientConfig;
    use crate::error::ApiError;
    use crate::request::MockHttpClient;
    use crate::storage::{KEY_AUTH_TOKEN, KeyValueStore, MemoryStore};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 5, 8, 0, 0).unwrap()
    }

    fn offline_client() -> ApiClient<MockHttpClient, MemoryStore> {
        let store = MemoryStore::new();
        store.set(KEY_AUTH_TOKEN, "tok");
        ApiClient::new(
            MockHttpClient::new(),
            store,
            ClientConfig::new("http://down.test", true),
        )
    }

    #[test]
    fn seeded_data_is_relative_to_today() {
        let data = FallbackDataset::seeded(now(), &Utc);
        let today = now().date_naive();
        let todays = data
            .appointments
            .iter()
            .filter(|a| a.appointment_date.date_naive() == today)
            .count();
        assert_eq!(todays, 3);
        assert_eq!(data.users(Some(Role::Doctor)).len(), 2);
        assert_eq!(data.pets(Some("owner-1")).len(), 2);
    }

    #[test]
    fn appointments_are_filtered_and_populated() {
        let data = FallbackDataset::seeded(now(), &Utc);

        let for_doctor = data.appointments(&AppointmentFilter::for_doctor("doctor-2"));
        assert_eq!(for_doctor.len(), 2);

        let for_pets = data.appointments(&AppointmentFilter::for_pets(vec!["pet-1".into()]));
        assert_eq!(for_pets.len(), 2);
        let first = &for_pets[0];
        assert_eq!(first.pet_name(), "Buddy");
        assert_eq!(first.owner_name().as_deref(), Some("Emma Wilson"));
        assert_eq!(first.doctor_name().as_deref(), Some("Dr. Sarah Miller"));
    }

    #[tokio::test]
    async fn unreachable_stats_match_fallback_counts() {
        let client = offline_client();
        let data = FallbackDataset::seeded(now(), &Utc);

        let result = with_fallback(client.stats().await, true, || data.stats(&Utc)).unwrap();

        assert!(result.is_offline());
        let stats = result.into_inner();
        let active: Vec<_> = data
            .appointments
            .iter()
            .filter(|a| a.status != AppointmentStatus::Cancelled)
            .collect();
        let today = now().date_naive();
        assert_eq!(stats.total_appointments, active.len() as u64);
        assert_eq!(
            stats.today_appointments,
            active
                .iter()
                .filter(|a| a.appointment_date.date_naive() == today)
                .count() as u64
        );
        assert_eq!(stats.total_pets, data.pets.len() as u64);
        assert_eq!(stats.total_owners, data.users(Some(Role::PetOwner)).len() as u64);
        assert_eq!(
            stats,
            Stats {
                total_appointments: 4,
                today_appointments: 2,
                total_pets: 3,
                total_owners: 2,
            }
        );
    }

    #[tokio::test]
    async fn disabled_fallback_surfaces_error() {
        let client = offline_client();
        let data = FallbackDataset::seeded(now(), &Utc);

        let err = with_fallback(client.list_pets(None).await, false, || data.pets(None)).unwrap_err();

        assert!(err.is_unreachable());
    }

    #[tokio::test]
    async fn empty_offline_result_stays_offline() {
        let client = offline_client();
        let data = FallbackDataset::seeded(now(), &Utc);

        let pets = with_fallback(client.list_pets(Some("nobody")).await, true, || {
            data.pets(Some("nobody"))
        })
        .unwrap();
        assert!(pets.get().is_empty());

        // 没有宠物就不再查预约，但来源标记要保留下来
        let appointments = pets.map(|_| Vec::<Appointment>::new());
        assert_eq!(appointments, Sourced::Offline(Vec::new()));
    }

    #[test]
    fn only_unreachable_errors_fall_back() {
        let status: ApiResult<Vec<Pet>> = Err(ApiError::from_status(500, ""));
        assert!(with_fallback(status, true, Vec::new).is_err());

        let missing: ApiResult<Vec<Pet>> = Err(ApiError::MissingToken);
        assert_eq!(
            with_fallback(missing, true, Vec::new).unwrap_err(),
            ApiError::MissingToken
        );

        let live = with_fallback(Ok(vec![1, 2]), true, Vec::new).unwrap();
        assert_eq!(live, Sourced::Live(vec![1, 2]));
    }
}
