//! Domain models for the veterinary clinic.

mod appointment;
mod client;
mod financial;
mod medication;
mod prescription;
mod selection;
mod settings;

pub use appointment::*;
pub use client::*;
pub use financial::*;
pub use medication::*;
pub use prescription::*;
pub use selection::*;
pub use settings::*;
