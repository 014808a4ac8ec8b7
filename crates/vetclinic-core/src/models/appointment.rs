//! Appointment models and form validation.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::selection::{Choice, Selection};

/// Field-presence validation failure. The operation is aborted, nothing is
/// partially applied.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Campos obrigatórios não preenchidos: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

/// Kind of appointment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AppointmentType {
    Consultation,
    Return,
    Vaccination,
    Surgery,
    Exam,
}

impl Choice for AppointmentType {
    fn label(&self) -> &'static str {
        match self {
            AppointmentType::Consultation => "Consulta",
            AppointmentType::Return => "Retorno",
            AppointmentType::Vaccination => "Vacinação",
            AppointmentType::Surgery => "Cirurgia",
            AppointmentType::Exam => "Exame",
        }
    }

    fn options() -> &'static [Self] {
        &[
            AppointmentType::Consultation,
            AppointmentType::Return,
            AppointmentType::Vaccination,
            AppointmentType::Surgery,
            AppointmentType::Exam,
        ]
    }
}

/// Appointment status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

/// A saved appointment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    /// Local UUID
    pub id: String,
    /// Patient ID
    pub animal_id: String,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub appointment_type: Selection<AppointmentType>,
    /// Attending veterinarian
    pub veterinarian: String,
    /// Weight in kg measured at the appointment
    pub weight_kg: f64,
    /// Body temperature in °C
    pub temperature_c: f64,
    /// Beats per minute
    pub heart_rate: Option<u32>,
    /// Breaths per minute
    pub respiratory_rate: Option<u32>,
    pub anamnesis: Option<String>,
    pub diagnosis: Option<String>,
    pub treatment: Option<String>,
    pub status: AppointmentStatus,
    /// Creation timestamp
    pub created_at: String,
}

/// Appointment form as filled in by the user. Every field may be absent
/// until the form is saved.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppointmentForm {
    /// Set when editing an existing appointment
    pub id: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub appointment_type: Option<Selection<AppointmentType>>,
    pub veterinarian: Option<String>,
    pub weight_kg: Option<f64>,
    pub temperature_c: Option<f64>,
    pub heart_rate: Option<u32>,
    pub respiratory_rate: Option<u32>,
    pub anamnesis: Option<String>,
    pub diagnosis: Option<String>,
    pub treatment: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

impl AppointmentForm {
    /// Names of required fields that are absent, in form order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.date.is_none() {
            missing.push("data");
        }
        if self.appointment_type.as_ref().map_or(true, Selection::is_blank) {
            missing.push("tipo");
        }
        if non_blank(&self.veterinarian).is_none() {
            missing.push("veterinário");
        }
        if self.weight_kg.is_none() {
            missing.push("peso");
        }
        if self.temperature_c.is_none() {
            missing.push("temperatura");
        }
        missing
    }

    /// Check required fields: date, type, veterinarian, weight, temperature.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingFields(missing))
        }
    }

    /// Build the appointment this form describes.
    pub fn to_appointment(&self, animal_id: &str) -> Result<Appointment, ValidationError> {
        self.validate()?;
        let missing = |field| ValidationError::MissingFields(vec![field]);

        Ok(Appointment {
            id: self
                .id
                .clone()
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            animal_id: animal_id.to_string(),
            date: self.date.ok_or_else(|| missing("data"))?,
            time: self.time,
            appointment_type: self
                .appointment_type
                .clone()
                .ok_or_else(|| missing("tipo"))?,
            veterinarian: non_blank(&self.veterinarian).ok_or_else(|| missing("veterinário"))?,
            weight_kg: self.weight_kg.ok_or_else(|| missing("peso"))?,
            temperature_c: self.temperature_c.ok_or_else(|| missing("temperatura"))?,
            heart_rate: self.heart_rate,
            respiratory_rate: self.respiratory_rate,
            anamnesis: non_blank(&self.anamnesis),
            diagnosis: non_blank(&self.diagnosis),
            treatment: non_blank(&self.treatment),
            status: AppointmentStatus::Scheduled,
            created_at: chrono::Utc::now().to_rfc3339(),
        })
    }
}

impl From<&Appointment> for AppointmentForm {
    fn from(appointment: &Appointment) -> Self {
        Self {
            id: Some(appointment.id.clone()),
            date: Some(appointment.date),
            time: appointment.time,
            appointment_type: Some(appointment.appointment_type.clone()),
            veterinarian: Some(appointment.veterinarian.clone()),
            weight_kg: Some(appointment.weight_kg),
            temperature_c: Some(appointment.temperature_c),
            heart_rate: appointment.heart_rate,
            respiratory_rate: appointment.respiratory_rate,
            anamnesis: appointment.anamnesis.clone(),
            diagnosis: appointment.diagnosis.clone(),
            treatment: appointment.treatment.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_form() -> AppointmentForm {
        AppointmentForm {
            date: NaiveDate::from_ymd_opt(2024, 5, 10),
            appointment_type: Some(AppointmentType::Consultation.into()),
            veterinarian: Some("Dra. Marina".into()),
            weight_kg: Some(12.4),
            temperature_c: Some(38.6),
            ..Default::default()
        }
    }

    #[test]
    fn test_complete_form_is_valid() {
        let form = complete_form();
        assert!(form.validate().is_ok());
        let appointment = form.to_appointment("animal-1").unwrap();
        assert_eq!(appointment.animal_id, "animal-1");
        assert_eq!(appointment.status, AppointmentStatus::Scheduled);
    }

    #[test]
    fn test_each_required_field_blocks() {
        fn check(field: &'static str, clear: impl Fn(&mut AppointmentForm)) {
            let mut form = complete_form();
            clear(&mut form);
            let before = form.clone();
            assert_eq!(
                form.to_appointment("animal-1"),
                Err(ValidationError::MissingFields(vec![field]))
            );
            assert_eq!(form, before);
        }

        check("data", |f| f.date = None);
        check("tipo", |f| f.appointment_type = None);
        check("veterinário", |f| f.veterinarian = Some("  ".into()));
        check("peso", |f| f.weight_kg = None);
        check("temperatura", |f| f.temperature_c = None);
    }

    #[test]
    fn test_blank_custom_type_is_missing() {
        let mut form = complete_form();
        form.appointment_type = Some(Selection::Custom(" ".into()));
        assert_eq!(form.missing_fields(), vec!["tipo"]);
    }

    #[test]
    fn test_empty_form_lists_all_fields() {
        let err = AppointmentForm::default().validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Campos obrigatórios não preenchidos: data, tipo, veterinário, peso, temperatura"
        );
    }
}
