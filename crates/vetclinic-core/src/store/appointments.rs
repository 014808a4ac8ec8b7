//! Appointment operations.

use tracing::{info, warn};

use super::{Store, StoreError, StoreResult};
use crate::models::{Appointment, AppointmentForm, AppointmentStatus};

impl Store {
    /// Validate a filled-in form and save it for an animal.
    ///
    /// A form with an `id` replaces that appointment; otherwise a new one
    /// is created. Missing required fields abort the save and leave the
    /// form and the store unchanged.
    pub fn save_appointment(
        &mut self,
        animal_id: &str,
        form: &AppointmentForm,
    ) -> StoreResult<Appointment> {
        if let Err(err) = form.validate() {
            warn!(animal_id, %err, "Appointment not saved");
            return Err(err.into());
        }
        if !self.animals.iter().any(|a| a.id == animal_id) {
            return Err(StoreError::NotFound(animal_id.to_string()));
        }

        let mut appointment = form.to_appointment(animal_id)?;
        match form.id.as_deref() {
            Some(id) => {
                let slot = self
                    .appointments
                    .iter_mut()
                    .find(|a| a.id == id)
                    .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
                if slot.animal_id != animal_id {
                    warn!(appointment_id = id, animal_id, "Appointment belongs to another animal");
                    return Err(StoreError::Constraint(format!(
                        "appointment {id} belongs to another animal"
                    )));
                }
                appointment.status = slot.status;
                appointment.created_at = slot.created_at.clone();
                *slot = appointment.clone();
                info!(appointment_id = id, "Appointment updated");
            }
            None => {
                self.appointments.push(appointment.clone());
                info!(appointment_id = %appointment.id, animal_id, "Appointment created");
            }
        }

        // The patient's weight is the one measured at its most recent visit.
        let latest = self
            .appointments
            .iter()
            .filter(|a| a.animal_id == animal_id)
            .max_by_key(|a| (a.date, a.time))
            .map(|a| a.id.clone());
        if latest.as_deref() == Some(appointment.id.as_str()) {
            if let Some(animal) = self.animals.iter_mut().find(|a| a.id == animal_id) {
                animal.weight_kg = Some(appointment.weight_kg);
                animal.touch();
            }
        }

        Ok(appointment)
    }

    /// Get an appointment by ID.
    pub fn get_appointment(&self, id: &str) -> Option<Appointment> {
        self.appointments.iter().find(|a| a.id == id).cloned()
    }

    /// Set an appointment's status.
    pub fn set_appointment_status(&mut self, id: &str, status: AppointmentStatus) -> StoreResult<()> {
        let appointment = self
            .appointments
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        appointment.status = status;
        Ok(())
    }

    /// Delete an appointment.
    pub fn delete_appointment(&mut self, id: &str) -> bool {
        super::remove_where(&mut self.appointments, |a| a.id == id) > 0
    }

    /// Appointments of an animal, most recent first.
    pub fn list_appointments_for_animal(&self, animal_id: &str) -> Vec<Appointment> {
        let mut appointments: Vec<Appointment> = self
            .appointments
            .iter()
            .filter(|a| a.animal_id == animal_id)
            .cloned()
            .collect();
        appointments.sort_by(|a, b| (b.date, b.time).cmp(&(a.date, a.time)));
        appointments
    }

    /// All appointments in insertion order.
    pub fn list_all_appointments(&self) -> Vec<Appointment> {
        self.appointments.clone()
    }
}
