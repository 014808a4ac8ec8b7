//! Clinic settings edited on the settings screens.

use serde::{Deserialize, Serialize};

/// Clinic identity and registered staff.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClinicSettings {
    /// Clinic trade name, printed on every document header
    pub clinic_name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    /// Responsible veterinarian, signs prescriptions by default
    pub responsible_vet: String,
    /// Regional veterinary council registration (e.g., "CRMV-SP 12345")
    pub crmv: String,
    /// Veterinarians selectable in appointment forms
    pub veterinarians: Vec<String>,
}

impl Default for ClinicSettings {
    fn default() -> Self {
        Self {
            clinic_name: "Clínica Veterinária".into(),
            address: String::new(),
            phone: String::new(),
            email: String::new(),
            responsible_vet: String::new(),
            crmv: String::new(),
            veterinarians: Vec::new(),
        }
    }
}

impl ClinicSettings {
    /// Contact line under the clinic name: address, phone and email joined.
    pub fn contact_line(&self) -> String {
        [&self.address, &self.phone, &self.email]
            .iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" | ")
    }

    /// Whether a name is a registered veterinarian.
    pub fn has_veterinarian(&self, name: &str) -> bool {
        let name = name.trim();
        self.responsible_vet.trim() == name || self.veterinarians.iter().any(|v| v.trim() == name)
    }
}
