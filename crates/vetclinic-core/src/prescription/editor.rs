//! Editing session for one prescription.
//!
//! Domain data (`PrescriptionDraft`) and per-row view state (which rows are
//! expanded) are kept apart so the draft can be submitted as-is.

use std::collections::HashSet;

use tracing::debug;

use super::{PrescriptionError, PrescriptionResult};
use crate::models::{MedicationRecord, PrescriptionDraft};

/// View state of the medication list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorViewState {
    expanded: HashSet<String>,
}

impl EditorViewState {
    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    /// Flip a row between expanded and collapsed. Returns the new state.
    pub fn toggle(&mut self, id: &str) -> bool {
        if !self.expanded.remove(id) {
            self.expanded.insert(id.to_string());
            true
        } else {
            false
        }
    }

    fn expand(&mut self, id: &str) {
        self.expanded.insert(id.to_string());
    }

    fn forget(&mut self, id: &str) {
        self.expanded.remove(id);
    }
}

/// A prescription being composed.
#[derive(Debug, Clone)]
pub struct PrescriptionEditor {
    draft: PrescriptionDraft,
    view: EditorViewState,
}

impl PrescriptionEditor {
    /// Start a new prescription for a patient.
    pub fn new(client_id: String, animal_id: String) -> Self {
        Self {
            draft: PrescriptionDraft::new(client_id, animal_id),
            view: EditorViewState::default(),
        }
    }

    pub fn draft(&self) -> &PrescriptionDraft {
        &self.draft
    }

    pub fn view(&self) -> &EditorViewState {
        &self.view
    }

    /// Append an empty line item, expanded for editing. Returns its ID.
    pub fn add_medication(&mut self) -> String {
        let record = MedicationRecord::new();
        let id = record.id.clone();
        self.draft.medications.push(record);
        self.view.expand(&id);
        debug!(draft_id = %self.draft.draft_id, medication_id = %id, "Added line item");
        id
    }

    /// Delete a line item.
    pub fn remove_medication(&mut self, id: &str) -> PrescriptionResult<MedicationRecord> {
        let index = self
            .draft
            .medications
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| PrescriptionError::MedicationNotFound(id.to_string()))?;
        self.view.forget(id);
        Ok(self.draft.medications.remove(index))
    }

    /// Apply a form edit to a line item, then recompute its derived fields.
    pub fn update_medication<F>(&mut self, id: &str, edit: F) -> PrescriptionResult<&MedicationRecord>
    where
        F: FnOnce(&mut MedicationRecord),
    {
        let record = self
            .draft
            .medications
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| PrescriptionError::MedicationNotFound(id.to_string()))?;
        edit(record);
        // The ID is the row's identity; edits may not change it.
        record.id = id.to_string();
        record.refresh();
        Ok(record)
    }

    /// Expand or collapse a row.
    pub fn toggle_expanded(&mut self, id: &str) -> PrescriptionResult<bool> {
        if self.draft.medication(id).is_none() {
            return Err(PrescriptionError::MedicationNotFound(id.to_string()));
        }
        Ok(self.view.toggle(id))
    }

    pub fn set_general_observations(&mut self, text: impl Into<String>) {
        self.draft.general_observations = text.into();
    }

    /// Validate and hand over the draft. On failure the editor is untouched.
    pub fn submit(&self) -> PrescriptionResult<PrescriptionDraft> {
        self.draft.validate()?;
        debug!(
            draft_id = %self.draft.draft_id,
            medications = self.draft.medications.len(),
            "Prescription submitted"
        );
        Ok(self.draft.clone())
    }
}
