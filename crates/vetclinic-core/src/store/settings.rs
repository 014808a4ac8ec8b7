//! Clinic settings operations.

use tracing::info;

use super::{Store, StoreError, StoreResult};
use crate::models::ClinicSettings;

impl Store {
    /// Current clinic settings.
    pub fn settings(&self) -> ClinicSettings {
        self.settings.clone()
    }

    /// Replace the clinic settings. The clinic name is required.
    pub fn update_settings(&mut self, settings: ClinicSettings) -> StoreResult<()> {
        if settings.clinic_name.trim().is_empty() {
            return Err(StoreError::Constraint("clinic name is required".into()));
        }
        info!(clinic = %settings.clinic_name, "Settings updated");
        self.settings = settings;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_settings() {
        let mut store = Store::new();
        let mut settings = store.settings();
        settings.clinic_name = "Clínica Bicho Feliz".into();
        store.update_settings(settings).unwrap();
        assert_eq!(store.settings().clinic_name, "Clínica Bicho Feliz");
    }

    #[test]
    fn test_blank_clinic_name_rejected() {
        let mut store = Store::new();
        let mut settings = store.settings();
        settings.clinic_name = " ".into();
        assert!(store.update_settings(settings).is_err());
        assert_eq!(store.settings().clinic_name, "Clínica Veterinária");
    }
}
