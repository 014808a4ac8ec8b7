//! In-memory record store.
//!
//! Every read returns owned copies; callers change records only through
//! the store's update operations.

mod appointments;
mod clients;
mod financial;
mod seed;
mod settings;

pub use clients::*;
pub use financial::*;

use thiserror::Error;

use crate::models::{
    Animal, Appointment, ClinicSettings, Client, FinancialEntry, SaleItem, ValidationError,
};

/// Store errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// All clinic records held by the current session.
#[derive(Debug, Clone, Default)]
pub struct Store {
    clients: Vec<Client>,
    animals: Vec<Animal>,
    appointments: Vec<Appointment>,
    sale_items: Vec<SaleItem>,
    entries: Vec<FinancialEntry>,
    settings: ClinicSettings,
}

impl Store {
    /// Create an empty store with default settings.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Replace the record matching `is_target`, or report `id` as not found.
fn replace_where<T, F>(records: &mut [T], record: T, id: &str, is_target: F) -> StoreResult<()>
where
    F: Fn(&T) -> bool,
{
    let slot = records
        .iter_mut()
        .find(|r| is_target(r))
        .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
    *slot = record;
    Ok(())
}

/// Remove the records matching `is_target`. Returns how many were removed.
fn remove_where<T, F>(records: &mut Vec<T>, is_target: F) -> usize
where
    F: Fn(&T) -> bool,
{
    let before = records.len();
    records.retain(|r| !is_target(r));
    before - records.len()
}
