//! Prescription drafts.

use serde::{Deserialize, Serialize};

use super::medication::MedicationRecord;
use crate::prescription::{PrescriptionError, PrescriptionResult};

/// A prescription being composed. Submitted as a whole, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrescriptionDraft {
    /// Unique draft ID
    pub draft_id: String,
    /// Tutor the prescription is addressed to
    pub client_id: String,
    /// Patient the prescription is for
    pub animal_id: String,
    /// Ordered line items
    pub medications: Vec<MedicationRecord>,
    /// Free text printed after all medications
    pub general_observations: String,
    /// Creation timestamp
    pub created_at: String,
}

impl PrescriptionDraft {
    /// Create an empty draft for a patient.
    pub fn new(client_id: String, animal_id: String) -> Self {
        Self {
            draft_id: uuid::Uuid::new_v4().to_string(),
            client_id,
            animal_id,
            medications: Vec::new(),
            general_observations: String::new(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Observations text if it carries anything printable.
    pub fn observations(&self) -> Option<&str> {
        let text = self.general_observations.trim();
        (!text.is_empty()).then_some(text)
    }

    /// Get a line item by ID.
    pub fn medication(&self, id: &str) -> Option<&MedicationRecord> {
        self.medications.iter().find(|m| m.id == id)
    }

    /// Check the draft can be submitted.
    pub fn validate(&self) -> PrescriptionResult<()> {
        if self.medications.is_empty() {
            return Err(PrescriptionError::EmptyDraft);
        }
        Ok(())
    }
}
