use crate::schedule::local_date;
use crate::{Appointment, AppointmentStatus, Pet, Role, User};
use chrono::{NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

/// 诊所统计数据
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Stats {
    pub total_appointments: u64,
    pub today_appointments: u64,
    pub total_pets: u64,
    pub total_owners: u64,
}

impl Stats {
    /// 从原始记录计算统计，已取消的预约不计入
    pub fn from_records<Tz: TimeZone>(
        users: &[User],
        pets: &[Pet],
        appointments: &[Appointment],
        today: NaiveDate,
        tz: &Tz,
    ) -> Self {
        let active = appointments
            .iter()
            .filter(|a| a.status != AppointmentStatus::Cancelled);

        Self {
            total_appointments: active.clone().count() as u64,
            today_appointments: active
                .filter(|a| local_date(a.appointment_date, tz) == today)
                .count() as u64,
            total_pets: pets.len() as u64,
            total_owners: users.iter().filter(|u| u.role == Role::PetOwner).count() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_default_to_zero() {
        let stats: Stats = serde_json::from_str(r#"{"totalPets": 7}"#).unwrap();
        assert_eq!(
            stats,
            Stats {
                total_pets: 7,
                ..Stats::default()
            }
        );
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["todayAppointments"], 0);
    }
}
