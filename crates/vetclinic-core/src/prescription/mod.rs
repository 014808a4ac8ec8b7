//! Prescription composition.
//!
//! Pipeline: Editor → Submit (validate) → Group by use type → Document
//! assembly ([`crate::export`]) → PDF

mod editor;
mod grouping;
mod instructions;

pub use editor::*;
pub use grouping::*;
pub use instructions::*;

use thiserror::Error;

/// Prescription errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PrescriptionError {
    #[error("A receita não possui medicamentos")]
    EmptyDraft,

    #[error("Medication not found: {0}")]
    MedicationNotFound(String),
}

pub type PrescriptionResult<T> = Result<T, PrescriptionError>;
