//! 表单校验
//!
//! 表单字段保持输入框里的原始字符串，提交时统一校验并转换为请求结构。

use crate::error::FormError;
use crate::protocol::{NewAppointment, NewPet, PetUpdate, ProfileUpdate, SignUpRequest};
use crate::schedule::{TimeSlot, is_bookable_date, local_instant};
use crate::{AppointmentStatus, Pet, Role, User};
use chrono::{NaiveDate, TimeZone};

/// (value, label)
pub const SPECIES_OPTIONS: [(&str, &str); 5] = [
    ("dog", "Dog"),
    ("cat", "Cat"),
    ("bird", "Bird"),
    ("rabbit", "Rabbit"),
    ("other", "Other"),
];

pub const GENDER_OPTIONS: [(&str, &str); 3] =
    [("male", "Male"), ("female", "Female"), ("unknown", "Unknown")];

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn optional(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn require(fields: &[(&'static str, &str)]) -> Result<(), FormError> {
    let missing: Vec<&'static str> = fields
        .iter()
        .filter(|(_, v)| blank(v))
        .map(|(k, _)| *k)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(FormError::MissingFields(missing))
    }
}

// =========================================================
// Auth
// =========================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

impl SignInForm {
    pub fn validate(&self) -> Result<(), FormError> {
        if blank(&self.email) || self.password.is_empty() {
            return Err(FormError::MissingCredentials);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignUpForm {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub role: Role,
}

impl SignUpForm {
    pub fn validate(&self) -> Result<SignUpRequest, FormError> {
        require(&[
            ("email", self.email.as_str()),
            ("password", self.password.as_str()),
            ("first_name", self.first_name.as_str()),
            ("last_name", self.last_name.as_str()),
        ])?;

        let email = self.email.trim();
        let valid_email = email
            .split_once('@')
            .is_some_and(|(user, domain)| !user.is_empty() && domain.contains('.'));
        if !valid_email {
            return Err(FormError::InvalidEmail);
        }

        Ok(SignUpRequest {
            email: email.to_string(),
            password: self.password.clone(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            phone: optional(&self.phone),
            role: self.role,
        })
    }
}

// =========================================================
// Profile
// =========================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

impl ProfileForm {
    pub fn from_user(user: &User) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            phone: user.phone.clone().unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<ProfileUpdate, FormError> {
        if blank(&self.first_name) || blank(&self.last_name) {
            return Err(FormError::MissingName);
        }
        Ok(ProfileUpdate {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            phone: optional(&self.phone),
        })
    }
}

// =========================================================
// Pets
// =========================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PetForm {
    pub name: String,
    pub species: String,
    pub breed: String,
    /// `YYYY-MM-DD`，可为空
    pub date_of_birth: String,
    pub gender: String,
}

impl PetForm {
    pub fn from_pet(pet: &Pet) -> Self {
        Self {
            name: pet.name.clone(),
            species: pet.species.clone(),
            breed: pet.breed.clone().unwrap_or_default(),
            date_of_birth: pet
                .date_of_birth
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            gender: pet.gender.clone(),
        }
    }

    pub fn validate(&self, today: NaiveDate) -> Result<PetUpdate, FormError> {
        require(&[
            ("name", self.name.as_str()),
            ("type", self.species.as_str()),
            ("gender", self.gender.as_str()),
        ])?;

        let date_of_birth = match self.date_of_birth.trim() {
            "" => None,
            raw => Some(
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map_err(|_| FormError::InvalidBirthDate)?,
            ),
        };
        if date_of_birth.is_some_and(|d| d > today) {
            return Err(FormError::BirthDateInFuture);
        }

        Ok(PetUpdate {
            name: self.name.trim().to_string(),
            species: self.species.trim().to_string(),
            breed: optional(&self.breed),
            date_of_birth,
            gender: self.gender.trim().to_string(),
        })
    }

    pub fn to_new_pet(&self, owner_id: &str, today: NaiveDate) -> Result<NewPet, FormError> {
        let pet = self.validate(today)?;
        Ok(NewPet {
            owner_id: owner_id.to_string(),
            name: pet.name,
            species: pet.species,
            breed: pet.breed,
            date_of_birth: pet.date_of_birth,
            gender: pet.gender,
        })
    }
}

// =========================================================
// Booking
// =========================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingForm {
    pub pet_id: String,
    pub doctor_id: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`，取自时段表
    pub slot: String,
    pub description: String,
}

impl BookingForm {
    /// 缺少任一必填项都会阻止提交
    pub fn validate<Tz: TimeZone>(
        &self,
        today: NaiveDate,
        tz: &Tz,
    ) -> Result<NewAppointment, FormError> {
        require(&[
            ("pet", self.pet_id.as_str()),
            ("doctor", self.doctor_id.as_str()),
            ("date", self.date.as_str()),
            ("time", self.slot.as_str()),
        ])?;

        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d")
            .map_err(|_| FormError::DateNotBookable)?;
        if !is_bookable_date(date, today) {
            return Err(FormError::DateNotBookable);
        }

        let slot = TimeSlot::parse(&self.slot).ok_or(FormError::SlotNotAvailable)?;
        let appointment_date = local_instant(date, slot, tz).ok_or(FormError::SlotNotAvailable)?;

        Ok(NewAppointment {
            pet_id: self.pet_id.clone(),
            doctor_id: self.doctor_id.clone(),
            appointment_date,
            description: self.description.trim().to_string(),
            status: AppointmentStatus::Scheduled,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn today() -> NaiveDate {
        // 周三
        NaiveDate::from_ymd_opt(2025, 3, 5).unwrap()
    }

    fn booking() -> BookingForm {
        BookingForm {
            pet_id: "p1".into(),
            doctor_id: "d1".into(),
            date: "2025-03-06".into(),
            slot: "14:30".into(),
            description: "  Limping  ".into(),
        }
    }

    #[test]
    fn booking_with_missing_field_is_blocked() {
        let form = BookingForm {
            doctor_id: String::new(),
            slot: " ".into(),
            ..booking()
        };
        assert_eq!(
            form.validate(today(), &Utc),
            Err(FormError::MissingFields(vec!["doctor", "time"]))
        );
        assert_eq!(
            FormError::MissingFields(vec!["doctor"]).to_string(),
            "Please fill in all required fields"
        );
    }

    #[test]
    fn valid_booking_builds_request() {
        let req = booking().validate(today(), &Utc).unwrap();
        assert_eq!(
            req.appointment_date,
            Utc.with_ymd_and_hms(2025, 3, 6, 14, 30, 0).unwrap()
        );
        assert_eq!(req.description, "Limping");
        assert_eq!(req.status, AppointmentStatus::Scheduled);
    }

    #[test]
    fn booking_rejects_today_weekend_and_off_grid_slots() {
        let on_today = BookingForm {
            date: "2025-03-05".into(),
            ..booking()
        };
        assert_eq!(on_today.validate(today(), &Utc), Err(FormError::DateNotBookable));

        let saturday = BookingForm {
            date: "2025-03-08".into(),
            ..booking()
        };
        assert_eq!(saturday.validate(today(), &Utc), Err(FormError::DateNotBookable));

        let late = BookingForm {
            slot: "17:00".into(),
            ..booking()
        };
        assert_eq!(late.validate(today(), &Utc), Err(FormError::SlotNotAvailable));
    }

    #[test]
    fn pet_form_requires_name_type_gender() {
        let form = PetForm {
            name: "Rex".into(),
            ..PetForm::default()
        };
        assert_eq!(
            form.validate(today()),
            Err(FormError::MissingFields(vec!["type", "gender"]))
        );
    }

    #[test]
    fn pet_form_rejects_future_birth_date() {
        let form = PetForm {
            name: "Rex".into(),
            species: "dog".into(),
            breed: " ".into(),
            date_of_birth: "2025-03-06".into(),
            gender: "male".into(),
        };
        assert_eq!(form.validate(today()), Err(FormError::BirthDateInFuture));

        let form = PetForm {
            date_of_birth: "2020-01-01".into(),
            ..form
        };
        let pet = form.to_new_pet("u1", today()).unwrap();
        assert_eq!(pet.owner_id, "u1");
        assert_eq!(pet.breed, None);
        assert_eq!(pet.date_of_birth, NaiveDate::from_ymd_opt(2020, 1, 1));
    }

    #[test]
    fn pet_form_rejects_impossible_birth_date() {
        let form = PetForm {
            name: "Rex".into(),
            species: "dog".into(),
            date_of_birth: "2020-02-30".into(),
            gender: "male".into(),
            ..PetForm::default()
        };
        assert_eq!(form.validate(today()), Err(FormError::InvalidBirthDate));

        let form = PetForm {
            date_of_birth: "2020-05-01T00:00:00.000Z".into(),
            ..form
        };
        assert_eq!(form.validate(today()), Err(FormError::InvalidBirthDate));

        let form = PetForm {
            date_of_birth: "  ".into(),
            ..form
        };
        assert_eq!(form.validate(today()).unwrap().date_of_birth, None);
    }

    #[test]
    fn sign_up_and_profile_checks() {
        let form = SignUpForm {
            email: "ada@example".into(),
            password: "pw".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            ..SignUpForm::default()
        };
        assert_eq!(form.validate(), Err(FormError::InvalidEmail));

        let form = SignUpForm {
            email: " ada@example.com ".into(),
            ..form
        };
        let req = form.validate().unwrap();
        assert_eq!(req.email, "ada@example.com");
        assert_eq!(req.phone, None);
        assert_eq!(req.role, Role::PetOwner);

        let profile = ProfileForm {
            first_name: "Ada".into(),
            ..ProfileForm::default()
        };
        assert_eq!(profile.validate(), Err(FormError::MissingName));
        assert_eq!(
            SignInForm::default().validate(),
            Err(FormError::MissingCredentials)
        );
    }
}
