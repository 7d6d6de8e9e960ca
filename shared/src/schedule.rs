//! 预约时间规则
//!
//! - 固定时段表：09:00 到 16:30，每 30 分钟一个时段
//! - 可预约日期：今天之后的工作日
//! - 按角色对预约列表分组 (today / upcoming / past)

use crate::Appointment;
use crate::AppointmentStatus;
use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc, Weekday};
use std::fmt;

pub const FIRST_SLOT_HOUR: u32 = 9;
pub const LAST_SLOT_END_HOUR: u32 = 17;
pub const SLOT_MINUTES: u32 = 30;

// =========================================================
// 时段
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeSlot {
    pub hour: u32,
    pub minute: u32,
}

impl TimeSlot {
    pub fn label(&self) -> String {
        format!("{:02}:{:02}", self.hour, self.minute)
    }

    /// 只接受时段表中的值
    pub fn parse(raw: &str) -> Option<Self> {
        let (h, m) = raw.trim().split_once(':')?;
        let slot = TimeSlot {
            hour: h.parse().ok()?,
            minute: m.parse().ok()?,
        };
        daily_slots().contains(&slot).then_some(slot)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

pub fn daily_slots() -> Vec<TimeSlot> {
    let start = FIRST_SLOT_HOUR * 60;
    let end = LAST_SLOT_END_HOUR * 60;
    (start..end)
        .step_by(SLOT_MINUTES as usize)
        .map(|m| TimeSlot {
            hour: m / 60,
            minute: m % 60,
        })
        .collect()
}

/// 仅允许今天之后的工作日
pub fn is_bookable_date(date: NaiveDate, today: NaiveDate) -> bool {
    date > today && !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// 将本地日期 + 时段转换为 UTC 时间点
///
/// 夏令时切换造成的不存在时刻返回 None，重复时刻取较早者。
pub fn local_instant<Tz: TimeZone>(date: NaiveDate, slot: TimeSlot, tz: &Tz) -> Option<DateTime<Utc>> {
    let naive = date.and_hms_opt(slot.hour, slot.minute, 0)?;
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// 预约在本地时区的日期
pub fn local_date<Tz: TimeZone>(instant: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

// =========================================================
// 分组
// =========================================================

/// 按时间分组后的预约列表
///
/// `today` 与 `upcoming` 升序，`past` 降序（最近的在前）。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Agenda {
    pub today: Vec<Appointment>,
    pub upcoming: Vec<Appointment>,
    pub past: Vec<Appointment>,
}

impl Agenda {
    fn sorted(mut self) -> Self {
        self.today.sort_by_key(|a| a.appointment_date);
        self.upcoming.sort_by_key(|a| a.appointment_date);
        self.past
            .sort_by_key(|a| std::cmp::Reverse(a.appointment_date));
        self
    }
}

fn collect<'a>(
    appointments: impl IntoIterator<Item = &'a Appointment>,
    pred: impl Fn(&Appointment) -> bool,
) -> Vec<Appointment> {
    appointments
        .into_iter()
        .filter(|a| pred(*a))
        .cloned()
        .collect()
}

/// 宠物主人视图
///
/// upcoming：未来且未结束；past：已过去或已结束（取消/完成）。
pub fn owner_agenda(appointments: &[Appointment], now: DateTime<Utc>) -> Agenda {
    Agenda {
        today: Vec::new(),
        upcoming: collect(appointments, |a| {
            a.appointment_date > now && !a.status.is_closed()
        }),
        past: collect(appointments, |a| {
            a.appointment_date < now || a.status.is_closed()
        }),
    }
    .sorted()
}

/// 医生视图，先去掉已取消的预约
///
/// - today：当天且未完成
/// - upcoming：非当天且在未来
/// - past：(已过去且非当天) 或已完成
pub fn doctor_agenda<Tz: TimeZone>(
    appointments: &[Appointment],
    now: DateTime<Utc>,
    tz: &Tz,
) -> Agenda {
    let today = local_date(now, tz);
    let active: Vec<&Appointment> = appointments
        .iter()
        .filter(|a| a.status != AppointmentStatus::Cancelled)
        .collect();
    let is_today = |a: &Appointment| local_date(a.appointment_date, tz) == today;

    Agenda {
        today: collect(active.iter().copied(), |a| {
            is_today(a) && a.status != AppointmentStatus::Completed
        }),
        upcoming: collect(active.iter().copied(), |a| {
            !is_today(a) && a.appointment_date > now
        }),
        past: collect(active.iter().copied(), |a| {
            (a.appointment_date < now && !is_today(a)) || a.status == AppointmentStatus::Completed
        }),
    }
    .sorted()
}

/// 前台视图：排除已取消，不展示历史
pub fn staff_agenda<Tz: TimeZone>(
    appointments: &[Appointment],
    now: DateTime<Utc>,
    tz: &Tz,
) -> Agenda {
    let today = local_date(now, tz);
    let is_today = |a: &Appointment| local_date(a.appointment_date, tz) == today;
    let active = |a: &Appointment| a.status != AppointmentStatus::Cancelled;

    Agenda {
        today: collect(appointments, |a| is_today(a) && active(a)),
        upcoming: collect(appointments, |a| {
            !is_today(a) && a.appointment_date > now && active(a)
        }),
        past: Vec::new(),
    }
    .sorted()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset};

    fn appt(id: &str, at: DateTime<Utc>, status: AppointmentStatus) -> Appointment {
        Appointment {
            id: id.into(),
            pet_id: "p1".into(),
            doctor_id: "d1".into(),
            appointment_date: at,
            description: None,
            status,
            created_at: None,
            pet: None,
            doctor: None,
            details: None,
        }
    }

    fn ids(list: &[Appointment]) -> Vec<&str> {
        list.iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn grid_has_sixteen_half_hour_slots() {
        let slots = daily_slots();
        assert_eq!(slots.len(), 16);
        assert_eq!(slots[0].label(), "09:00");
        assert_eq!(slots[15].label(), "16:30");
        assert_eq!(TimeSlot::parse("13:30"), Some(TimeSlot { hour: 13, minute: 30 }));
        assert_eq!(TimeSlot::parse("17:00"), None);
        assert_eq!(TimeSlot::parse("09:15"), None);
        assert_eq!(TimeSlot::parse("nine"), None);
    }

    #[test]
    fn only_future_weekdays_are_bookable() {
        // 2025-03-05 是周三
        let today = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
        assert!(!is_bookable_date(today, today));
        assert!(is_bookable_date(today + Duration::days(1), today));
        assert!(!is_bookable_date(today + Duration::days(3), today)); // Sat
        assert!(!is_bookable_date(today + Duration::days(4), today)); // Sun
        assert!(is_bookable_date(today + Duration::days(5), today));
        assert!(!is_bookable_date(today - Duration::days(1), today));
    }

    #[test]
    fn local_slot_is_converted_to_utc() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 3, 6).unwrap();
        let at = local_instant(date, TimeSlot { hour: 9, minute: 30 }, &tz).unwrap();
        assert_eq!(at, Utc.with_ymd_and_hms(2025, 3, 6, 7, 30, 0).unwrap());
    }

    #[test]
    fn owner_agenda_moves_closed_appointments_to_past() {
        let now = Utc.with_ymd_and_hms(2025, 3, 5, 12, 0, 0).unwrap();
        let list = vec![
            appt("future", now + Duration::days(2), AppointmentStatus::Scheduled),
            appt("soon", now + Duration::hours(1), AppointmentStatus::Scheduled),
            appt("cancelled", now + Duration::days(1), AppointmentStatus::Cancelled),
            appt("old", now - Duration::days(3), AppointmentStatus::Completed),
            appt("missed", now - Duration::days(1), AppointmentStatus::Scheduled),
        ];

        let agenda = owner_agenda(&list, now);

        assert_eq!(ids(&agenda.upcoming), vec!["soon", "future"]);
        assert_eq!(ids(&agenda.past), vec!["cancelled", "missed", "old"]);
        assert!(agenda.today.is_empty());
    }

    #[test]
    fn doctor_agenda_groups_by_local_day() {
        let tz = Utc;
        let now = Utc.with_ymd_and_hms(2025, 3, 5, 12, 0, 0).unwrap();
        let list = vec![
            appt("morning", now - Duration::hours(2), AppointmentStatus::InProgress),
            appt("afternoon", now + Duration::hours(3), AppointmentStatus::Scheduled),
            appt("done-today", now - Duration::hours(1), AppointmentStatus::Completed),
            appt("cancelled", now + Duration::hours(1), AppointmentStatus::Cancelled),
            appt("tomorrow", now + Duration::days(1), AppointmentStatus::Scheduled),
            appt("yesterday", now - Duration::days(1), AppointmentStatus::Completed),
        ];

        let agenda = doctor_agenda(&list, now, &tz);

        assert_eq!(ids(&agenda.today), vec!["morning", "afternoon"]);
        assert_eq!(ids(&agenda.upcoming), vec!["tomorrow"]);
        assert_eq!(ids(&agenda.past), vec!["done-today", "yesterday"]);
    }

    #[test]
    fn staff_agenda_hides_cancelled() {
        let tz = Utc;
        let now = Utc.with_ymd_and_hms(2025, 3, 5, 12, 0, 0).unwrap();
        let list = vec![
            appt("today", now + Duration::hours(1), AppointmentStatus::Scheduled),
            appt("today-done", now - Duration::hours(1), AppointmentStatus::Completed),
            appt("today-cancelled", now + Duration::hours(2), AppointmentStatus::Cancelled),
            appt("next-week", now + Duration::days(7), AppointmentStatus::Scheduled),
            appt("later-cancelled", now + Duration::days(2), AppointmentStatus::Cancelled),
        ];

        let agenda = staff_agenda(&list, now, &tz);

        assert_eq!(ids(&agenda.today), vec!["today-done", "today"]);
        assert_eq!(ids(&agenda.upcoming), vec!["next-week"]);
        assert!(agenda.past.is_empty());
    }
}
