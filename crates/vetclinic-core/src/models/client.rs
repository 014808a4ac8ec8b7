//! Client (tutor) and animal (patient) models.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A tutor responsible for one or more animals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Client {
    /// Local UUID
    pub id: String,
    /// Full name
    pub name: String,
    /// Brazilian taxpayer ID, as typed
    pub cpf: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    /// Additional notes
    pub notes: Option<String>,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

impl Client {
    /// Create a new client with required fields.
    pub fn new(name: String) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            cpf: None,
            phone: None,
            email: None,
            address: None,
            notes: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// CPF with punctuation stripped.
    pub fn cpf_digits(&self) -> Option<String> {
        self.cpf
            .as_ref()
            .map(|cpf| cpf.chars().filter(char::is_ascii_digit).collect())
    }

    /// Touch the updated_at timestamp.
    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}

/// Biological sex of an animal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Sex {
    Male,
    Female,
    Unknown,
}

impl Sex {
    pub fn label(&self) -> &'static str {
        match self {
            Sex::Male => "Macho",
            Sex::Female => "Fêmea",
            Sex::Unknown => "Não informado",
        }
    }

    /// Parse a label; anything unrecognised is `Unknown`.
    pub fn from_label(text: &str) -> Self {
        match text.trim().to_lowercase().as_str() {
            "macho" => Sex::Male,
            "fêmea" | "femea" => Sex::Female,
            _ => Sex::Unknown,
        }
    }
}

/// A patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Animal {
    /// Local UUID
    pub id: String,
    /// Owning client ID
    pub client_id: String,
    /// Patient name
    pub name: String,
    /// Species (e.g., "Canina", "Felina")
    pub species: String,
    pub breed: Option<String>,
    pub sex: Sex,
    /// Date of birth
    pub birth_date: Option<NaiveDate>,
    /// Last recorded weight in kg
    pub weight_kg: Option<f64>,
    /// Additional notes
    pub notes: Option<String>,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

impl Animal {
    /// Create a new animal owned by `client_id`.
    pub fn new(client_id: String, name: String, species: String) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            client_id,
            name,
            species,
            breed: None,
            sex: Sex::Unknown,
            birth_date: None,
            weight_kg: None,
            notes: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Age on `today` as "3 anos", "1 ano e 2 meses" or "5 meses".
    pub fn age_label(&self, today: NaiveDate) -> Option<String> {
        let birth = self.birth_date?;
        if birth > today {
            return None;
        }

        let mut months = (today.year() - birth.year()) * 12 + today.month() as i32
            - birth.month() as i32;
        if today.day() < birth.day() {
            months -= 1;
        }

        let years = months / 12;
        let months = months % 12;
        let year_part = match years {
            0 => None,
            1 => Some("1 ano".to_string()),
            n => Some(format!("{} anos", n)),
        };
        let month_part = match months {
            0 => None,
            1 => Some("1 mês".to_string()),
            n => Some(format!("{} meses", n)),
        };

        Some(match (year_part, month_part) {
            (Some(y), Some(m)) => format!("{} e {}", y, m),
            (Some(y), None) => y,
            (None, Some(m)) => m,
            (None, None) => "menos de 1 mês".to_string(),
        })
    }

    /// Touch the updated_at timestamp.
    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}
