//! VetClinic Core Library
//!
//! Client-side core of a veterinary clinic: tutors and patients,
//! appointments, point of sale, and prescription documents.
//!
//! # Architecture
//!
//! ```text
//! Prescription editor (rows, expand/collapse)
//!                 │
//!          submit (≥ 1 medication)
//!                 │
//!     ┌───────────▼────────────┐
//!     │  Group by use type     │
//!     │  first-seen order      │
//!     │  unset → "Outros"      │
//!     └───────────┬────────────┘
//!                 │
//!     ┌───────────▼────────────┐
//!     │  Document assembly     │
//!     │  header, info, blocks  │
//!     │  pagination            │
//!     │  signature: last page  │
//!     └───────────┬────────────┘
//!                 │
//!             PDF bytes ──► receita_{tutor}_{animal}_{timestamp}.pdf
//! ```
//!
//! # Modules
//!
//! - [`models`]: Domain types (Client, Animal, MedicationRecord, etc.)
//! - [`prescription`]: Editor, grouping, instruction text
//! - [`export`]: Document layout and PDF rendering
//! - [`store`]: In-memory records with cascading deletes and search
//! - [`pos`]: Cart and checkout
//! - [`config`]: Page geometry and export settings

pub mod config;
pub mod export;
pub mod models;
pub mod pos;
pub mod prescription;
pub mod store;

// Re-export commonly used types
pub use config::CoreConfig;
pub use export::{assemble_document, render_prescription, DocumentContext, PrescriptionDocument};
pub use models::{
    Animal, Appointment, AppointmentForm, Client, ClinicSettings, MedicationRecord,
    PrescriptionDraft, Selection,
};
pub use pos::Cart;
pub use prescription::{group_by_use_type, MedicationGroup, PrescriptionEditor};
pub use store::Store;

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, NaiveTime};
use tracing::info;
use tracing_subscriber::EnvFilter;

use models::{
    AppointmentStatus, Choice, EntryKind, FinancialEntry, PaymentMethod, PharmacyType,
    SaleItem, Sex,
};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum VetClinicError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Validation(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Store error: {0}")]
    Store(String),
}

impl From<store::StoreError> for VetClinicError {
    fn from(e: store::StoreError) -> Self {
        match e {
            store::StoreError::NotFound(id) => VetClinicError::NotFound(id),
            store::StoreError::Constraint(msg) => VetClinicError::InvalidInput(msg),
            store::StoreError::Validation(err) => VetClinicError::Validation(err.to_string()),
        }
    }
}

impl From<prescription::PrescriptionError> for VetClinicError {
    fn from(e: prescription::PrescriptionError) -> Self {
        match e {
            prescription::PrescriptionError::MedicationNotFound(id) => VetClinicError::NotFound(id),
            other => VetClinicError::Validation(other.to_string()),
        }
    }
}

impl From<export::ExportError> for VetClinicError {
    fn from(e: export::ExportError) -> Self {
        match e {
            export::ExportError::Prescription(err) => err.into(),
            export::ExportError::NotFound(id) => VetClinicError::NotFound(id),
            other => VetClinicError::Export(other.to_string()),
        }
    }
}

impl From<pos::PosError> for VetClinicError {
    fn from(e: pos::PosError) -> Self {
        match e {
            pos::PosError::Store(err) => err.into(),
            err @ pos::PosError::EmptyCart => VetClinicError::Validation(err.to_string()),
            other => VetClinicError::InvalidInput(other.to_string()),
        }
    }
}

impl From<config::ConfigError> for VetClinicError {
    fn from(e: config::ConfigError) -> Self {
        VetClinicError::Config(e.to_string())
    }
}

impl From<serde_json::Error> for VetClinicError {
    fn from(e: serde_json::Error) -> Self {
        VetClinicError::Serialization(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for VetClinicError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        VetClinicError::Store(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Install the tracing subscriber. `RUST_LOG` overrides the default
/// filter; calls after the first are ignored.
#[uniffi::export]
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();
}

/// Open an empty core, reading configuration from `config_path` when given.
#[uniffi::export]
pub fn open_core(config_path: Option<String>) -> Result<Arc<VetClinicCore>, VetClinicError> {
    let config = match config_path {
        Some(path) => CoreConfig::load(path)?,
        None => CoreConfig::default(),
    };
    Ok(Arc::new(VetClinicCore::new(Store::new(), config)))
}

/// Open a core preloaded with demonstration records.
#[uniffi::export]
pub fn open_core_with_sample_data() -> Arc<VetClinicCore> {
    Arc::new(VetClinicCore::new(
        Store::with_sample_data(),
        CoreConfig::default(),
    ))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe store wrapper for FFI.
#[derive(uniffi::Object)]
pub struct VetClinicCore {
    store: Arc<Mutex<Store>>,
    cart: Mutex<Cart>,
    config: CoreConfig,
}

impl VetClinicCore {
    pub fn new(store: Store, config: CoreConfig) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            cart: Mutex::new(Cart::new()),
            config,
        }
    }

    /// Build and validate the draft described by the FFI record.
    fn build_draft(&self, input: FfiPrescriptionDraft) -> Result<PrescriptionDraft, VetClinicError> {
        let mut editor = PrescriptionEditor::new(input.client_id, input.animal_id);
        for medication in input.medications {
            let id = editor.add_medication();
            let fields = MedicationFields::parse(medication)?;
            editor.update_medication(&id, |record| fields.apply(record))?;
        }
        editor.set_general_observations(input.general_observations);
        Ok(editor.submit()?)
    }

    fn render(&self, input: FfiPrescriptionDraft) -> Result<export::RenderedPrescription, VetClinicError> {
        let veterinarian = input.veterinarian.clone();
        let draft = self.build_draft(input)?;

        let store = self.store.lock()?;
        let mut context = DocumentContext::from_store(&store, &draft)?;
        context.veterinarian = veterinarian;

        let now = chrono::Local::now().naive_local();
        Ok(render_prescription(&draft, &context, &self.config, now)?)
    }
}

#[uniffi::export]
impl VetClinicCore {
    // =========================================================================
    // Client Operations
    // =========================================================================

    /// Create a new client. The `id` of the input is ignored.
    pub fn create_client(&self, input: FfiClient) -> Result<FfiClient, VetClinicError> {
        let mut store = self.store.lock()?;
        let mut client = Client::new(input.name.trim().to_string());
        input.apply_to(&mut client);
        store.insert_client(client.clone())?;
        Ok(client.into())
    }

    /// Get a client by ID.
    pub fn get_client(&self, id: String) -> Result<Option<FfiClient>, VetClinicError> {
        let store = self.store.lock()?;
        Ok(store.get_client(&id).map(|c| c.into()))
    }

    /// Update an existing client.
    pub fn update_client(&self, input: FfiClient) -> Result<FfiClient, VetClinicError> {
        let mut store = self.store.lock()?;
        let mut client = store
            .get_client(&input.id)
            .ok_or_else(|| VetClinicError::NotFound(input.id.clone()))?;
        client.name = input.name.trim().to_string();
        input.apply_to(&mut client);
        store.update_client(client)?;
        let updated = store
            .get_client(&input.id)
            .ok_or_else(|| VetClinicError::NotFound(input.id.clone()))?;
        Ok(updated.into())
    }

    /// Delete a client, its animals and their appointments.
    pub fn delete_client(&self, id: String) -> Result<bool, VetClinicError> {
        let mut store = self.store.lock()?;
        Ok(store.delete_client(&id))
    }

    /// List all clients.
    pub fn list_clients(&self) -> Result<Vec<FfiClient>, VetClinicError> {
        let store = self.store.lock()?;
        Ok(store.list_clients().into_iter().map(|c| c.into()).collect())
    }

    /// Search clients by name, CPF or phone.
    pub fn search_clients(
        &self,
        query: String,
        limit: u32,
    ) -> Result<Vec<FfiClientMatch>, VetClinicError> {
        let store = self.store.lock()?;
        let matches = store.search_clients(&query, limit as usize);
        Ok(matches
            .into_iter()
            .map(|m| FfiClientMatch {
                client: m.client.into(),
                score: m.score,
            })
            .collect())
    }

    // =========================================================================
    // Animal Operations
    // =========================================================================

    /// Register an animal for an existing client. The `id` of the input is
    /// ignored.
    pub fn create_animal(&self, input: FfiAnimal) -> Result<FfiAnimal, VetClinicError> {
        let mut store = self.store.lock()?;
        let mut animal = Animal::new(
            input.client_id.clone(),
            input.name.trim().to_string(),
            input.species.trim().to_string(),
        );
        input.apply_to(&mut animal)?;
        store.insert_animal(animal.clone())?;
        Ok(animal.into())
    }

    /// Get an animal by ID.
    pub fn get_animal(&self, id: String) -> Result<Option<FfiAnimal>, VetClinicError> {
        let store = self.store.lock()?;
        Ok(store.get_animal(&id).map(|a| a.into()))
    }

    /// Update an existing animal.
    pub fn update_animal(&self, input: FfiAnimal) -> Result<FfiAnimal, VetClinicError> {
        let mut store = self.store.lock()?;
        let mut animal = store
            .get_animal(&input.id)
            .ok_or_else(|| VetClinicError::NotFound(input.id.clone()))?;
        animal.name = input.name.trim().to_string();
        animal.species = input.species.trim().to_string();
        input.apply_to(&mut animal)?;
        store.update_animal(animal.clone())?;
        Ok(animal.into())
    }

    /// Delete an animal and its appointments.
    pub fn delete_animal(&self, id: String) -> Result<bool, VetClinicError> {
        let mut store = self.store.lock()?;
        Ok(store.delete_animal(&id))
    }

    /// List the animals of a client.
    pub fn list_animals(&self, client_id: String) -> Result<Vec<FfiAnimal>, VetClinicError> {
        let store = self.store.lock()?;
        Ok(store
            .list_animals_for_client(&client_id)
            .into_iter()
            .map(|a| a.into())
            .collect())
    }

    // =========================================================================
    // Appointment Operations
    // =========================================================================

    /// Validate and save an appointment form. Nothing is saved when a
    /// required field is missing.
    pub fn save_appointment(
        &self,
        animal_id: String,
        form: FfiAppointmentForm,
    ) -> Result<FfiAppointment, VetClinicError> {
        let form = form.parse()?;
        let mut store = self.store.lock()?;
        let appointment = store.save_appointment(&animal_id, &form)?;
        Ok(appointment.into())
    }

    /// Appointments of an animal, most recent first.
    pub fn list_appointments(&self, animal_id: String) -> Result<Vec<FfiAppointment>, VetClinicError> {
        let store = self.store.lock()?;
        Ok(store
            .list_appointments_for_animal(&animal_id)
            .into_iter()
            .map(|a| a.into())
            .collect())
    }

    /// Mark an appointment as completed.
    pub fn complete_appointment(&self, id: String) -> Result<(), VetClinicError> {
        let mut store = self.store.lock()?;
        Ok(store.set_appointment_status(&id, AppointmentStatus::Completed)?)
    }

    /// Mark an appointment as cancelled.
    pub fn cancel_appointment(&self, id: String) -> Result<(), VetClinicError> {
        let mut store = self.store.lock()?;
        Ok(store.set_appointment_status(&id, AppointmentStatus::Cancelled)?)
    }

    // =========================================================================
    // Prescription Operations
    // =========================================================================

    /// Generated instructions and total quantity for a row being edited.
    pub fn preview_medication(
        &self,
        medication: FfiMedication,
    ) -> Result<FfiMedicationPreview, VetClinicError> {
        let mut record = MedicationRecord::new();
        MedicationFields::parse(medication)?.apply(&mut record);
        record.refresh();
        Ok(FfiMedicationPreview {
            display_name: prescription::display_name(&record.name, &record.concentration),
            instructions: record.instructions,
            quantity: record.quantity,
        })
    }

    /// Render a prescription to PDF bytes.
    pub fn generate_prescription_pdf(
        &self,
        draft: FfiPrescriptionDraft,
    ) -> Result<FfiRenderedPrescription, VetClinicError> {
        let rendered = self.render(draft)?;
        Ok(FfiRenderedPrescription {
            filename: rendered.filename,
            page_count: rendered.page_count as u32,
            pdf: rendered.bytes,
        })
    }

    /// Render a prescription and save it in the export directory. Returns
    /// the file path.
    pub fn export_prescription_pdf(
        &self,
        draft: FfiPrescriptionDraft,
    ) -> Result<String, VetClinicError> {
        let rendered = self.render(draft)?;
        let path = export::export_to_file(&rendered, &self.config.export_dir)?;
        Ok(path.to_string_lossy().into_owned())
    }

    // =========================================================================
    // Point of Sale Operations
    // =========================================================================

    /// Active catalog items.
    pub fn list_sale_items(&self) -> Result<Vec<FfiSaleItem>, VetClinicError> {
        let store = self.store.lock()?;
        Ok(store.list_sale_items().into_iter().map(|i| i.into()).collect())
    }

    /// Add a catalog item to the cart.
    pub fn add_to_cart(&self, sku: String, quantity: u32) -> Result<FfiCart, VetClinicError> {
        let item = {
            let store = self.store.lock()?;
            store
                .get_sale_item(&sku)
                .filter(|i| i.active)
                .ok_or_else(|| VetClinicError::NotFound(sku.clone()))?
        };
        let mut cart = self.cart.lock()?;
        cart.add_item(&item, quantity)?;
        Ok(FfiCart::from(&*cart))
    }

    /// Change the quantity of a cart line.
    pub fn set_cart_quantity(&self, sku: String, quantity: u32) -> Result<FfiCart, VetClinicError> {
        let mut cart = self.cart.lock()?;
        cart.set_quantity(&sku, quantity)?;
        Ok(FfiCart::from(&*cart))
    }

    /// Remove a cart line.
    pub fn remove_from_cart(&self, sku: String) -> Result<FfiCart, VetClinicError> {
        let mut cart = self.cart.lock()?;
        cart.remove_item(&sku)?;
        Ok(FfiCart::from(&*cart))
    }

    /// Set the cart discount in cents.
    pub fn set_cart_discount(&self, discount_cents: i64) -> Result<FfiCart, VetClinicError> {
        let mut cart = self.cart.lock()?;
        cart.set_discount(discount_cents)?;
        Ok(FfiCart::from(&*cart))
    }

    /// Identify the client being charged.
    pub fn set_cart_client(&self, client_id: Option<String>) -> Result<FfiCart, VetClinicError> {
        if let Some(id) = &client_id {
            let store = self.store.lock()?;
            if store.get_client(id).is_none() {
                return Err(VetClinicError::NotFound(id.clone()));
            }
        }
        let mut cart = self.cart.lock()?;
        cart.client_id = client_id;
        Ok(FfiCart::from(&*cart))
    }

    /// Current cart contents and totals.
    pub fn get_cart(&self) -> Result<FfiCart, VetClinicError> {
        let cart = self.cart.lock()?;
        Ok(FfiCart::from(&*cart))
    }

    /// Empty the cart without recording anything.
    pub fn clear_cart(&self) -> Result<(), VetClinicError> {
        self.cart.lock()?.clear();
        Ok(())
    }

    /// Close the sale with a payment method label (e.g., "PIX").
    ///
    /// A sale discounted to zero returns an entry with a zero amount that is
    /// not written to the ledger.
    pub fn checkout(&self, payment_method: String) -> Result<FfiFinancialEntry, VetClinicError> {
        let method = PaymentMethod::from_label(&payment_method)
            .copied()
            .ok_or_else(|| {
                VetClinicError::InvalidInput(format!("unknown payment method {}", payment_method))
            })?;
        let mut cart = self.cart.lock()?;
        let mut store = self.store.lock()?;
        let entry = cart.checkout(&mut store, method)?;
        Ok(entry.into())
    }

    // =========================================================================
    // Financial Operations
    // =========================================================================

    /// Record an expense in the ledger.
    pub fn record_expense(
        &self,
        description: String,
        amount_cents: i64,
    ) -> Result<FfiFinancialEntry, VetClinicError> {
        let mut store = self.store.lock()?;
        let entry = FinancialEntry::new(EntryKind::Expense, description, amount_cents);
        store.record_entry(entry.clone())?;
        Ok(entry.into())
    }

    /// All ledger entries, oldest first.
    pub fn list_entries(&self) -> Result<Vec<FfiFinancialEntry>, VetClinicError> {
        let store = self.store.lock()?;
        Ok(store.list_entries().into_iter().map(|e| e.into()).collect())
    }

    /// Ledger totals as JSON.
    pub fn financial_summary_json(&self) -> Result<String, VetClinicError> {
        let store = self.store.lock()?;
        Ok(store.financial_summary().to_json()?)
    }

    // =========================================================================
    // Settings Operations
    // =========================================================================

    pub fn get_settings(&self) -> Result<FfiClinicSettings, VetClinicError> {
        let store = self.store.lock()?;
        Ok(store.settings().into())
    }

    pub fn update_settings(&self, settings: FfiClinicSettings) -> Result<(), VetClinicError> {
        let mut store = self.store.lock()?;
        store.update_settings(settings.into())?;
        info!("Settings updated");
        Ok(())
    }

    /// Directory exported PDFs are written to.
    pub fn export_dir(&self) -> String {
        self.config.export_dir.to_string_lossy().into_owned()
    }
}

// =========================================================================
// FFI Types
// =========================================================================

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_date(text: &str) -> Result<NaiveDate, VetClinicError> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|_| VetClinicError::InvalidInput(format!("invalid date {}", text)))
}

fn parse_time(text: &str) -> Result<NaiveTime, VetClinicError> {
    NaiveTime::parse_from_str(text.trim(), "%H:%M")
        .map_err(|_| VetClinicError::InvalidInput(format!("invalid time {}", text)))
}

/// FFI-safe client.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiClient {
    pub id: String,
    pub name: String,
    pub cpf: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

impl FfiClient {
    fn apply_to(&self, client: &mut Client) {
        client.cpf = non_blank(self.cpf.clone());
        client.phone = non_blank(self.phone.clone());
        client.email = non_blank(self.email.clone());
        client.address = non_blank(self.address.clone());
        client.notes = non_blank(self.notes.clone());
    }
}

impl From<Client> for FfiClient {
    fn from(client: Client) -> Self {
        Self {
            id: client.id,
            name: client.name,
            cpf: client.cpf,
            phone: client.phone,
            email: client.email,
            address: client.address,
            notes: client.notes,
        }
    }
}

/// FFI-safe search hit.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiClientMatch {
    pub client: FfiClient,
    pub score: f64,
}

/// FFI-safe animal. Dates are `YYYY-MM-DD`.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAnimal {
    pub id: String,
    pub client_id: String,
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    /// "Macho", "Fêmea" or "Não informado"
    pub sex: String,
    pub birth_date: Option<String>,
    pub weight_kg: Option<f64>,
    pub notes: Option<String>,
}

impl FfiAnimal {
    fn apply_to(&self, animal: &mut Animal) -> Result<(), VetClinicError> {
        animal.birth_date = match non_blank(self.birth_date.clone()) {
            Some(text) => Some(parse_date(&text)?),
            None => None,
        };
        animal.breed = non_blank(self.breed.clone());
        animal.sex = Sex::from_label(&self.sex);
        animal.weight_kg = self.weight_kg;
        animal.notes = non_blank(self.notes.clone());
        Ok(())
    }
}

impl From<Animal> for FfiAnimal {
    fn from(animal: Animal) -> Self {
        Self {
            id: animal.id,
            client_id: animal.client_id,
            name: animal.name,
            species: animal.species,
            breed: animal.breed,
            sex: animal.sex.label().to_string(),
            birth_date: animal.birth_date.map(|d| d.format("%Y-%m-%d").to_string()),
            weight_kg: animal.weight_kg,
            notes: animal.notes,
        }
    }
}

/// FFI-safe appointment form. Dates are `YYYY-MM-DD`, times `HH:MM`.
#[derive(Debug, Clone, Default, uniffi::Record)]
pub struct FfiAppointmentForm {
    pub id: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub appointment_type: Option<String>,
    pub veterinarian: Option<String>,
    pub weight_kg: Option<f64>,
    pub temperature_c: Option<f64>,
    pub heart_rate: Option<u32>,
    pub respiratory_rate: Option<u32>,
    pub anamnesis: Option<String>,
    pub diagnosis: Option<String>,
    pub treatment: Option<String>,
}

impl FfiAppointmentForm {
    fn parse(self) -> Result<AppointmentForm, VetClinicError> {
        let date = match non_blank(self.date) {
            Some(text) => Some(parse_date(&text)?),
            None => None,
        };
        let time = match non_blank(self.time) {
            Some(text) => Some(parse_time(&text)?),
            None => None,
        };
        Ok(AppointmentForm {
            id: non_blank(self.id),
            date,
            time,
            appointment_type: self.appointment_type.as_deref().and_then(Selection::parse),
            veterinarian: self.veterinarian,
            weight_kg: self.weight_kg,
            temperature_c: self.temperature_c,
            heart_rate: self.heart_rate,
            respiratory_rate: self.respiratory_rate,
            anamnesis: self.anamnesis,
            diagnosis: self.diagnosis,
            treatment: self.treatment,
        })
    }
}

/// FFI-safe saved appointment.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAppointment {
    pub id: String,
    pub animal_id: String,
    pub date: String,
    pub time: Option<String>,
    pub appointment_type: String,
    pub veterinarian: String,
    pub weight_kg: f64,
    pub temperature_c: f64,
    pub heart_rate: Option<u32>,
    pub respiratory_rate: Option<u32>,
    pub anamnesis: Option<String>,
    pub diagnosis: Option<String>,
    pub treatment: Option<String>,
    /// "scheduled", "completed" or "cancelled"
    pub status: String,
}

impl From<Appointment> for FfiAppointment {
    fn from(appointment: Appointment) -> Self {
        let status = match appointment.status {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        };
        Self {
            id: appointment.id,
            animal_id: appointment.animal_id,
            date: appointment.date.format("%Y-%m-%d").to_string(),
            time: appointment.time.map(|t| t.format("%H:%M").to_string()),
            appointment_type: appointment.appointment_type.label(),
            veterinarian: appointment.veterinarian,
            weight_kg: appointment.weight_kg,
            temperature_c: appointment.temperature_c,
            heart_rate: appointment.heart_rate,
            respiratory_rate: appointment.respiratory_rate,
            anamnesis: appointment.anamnesis,
            diagnosis: appointment.diagnosis,
            treatment: appointment.treatment,
            status: status.to_string(),
        }
    }
}

/// FFI-safe medication row. Selectable fields carry the option label, or
/// free text for a custom value.
#[derive(Debug, Clone, Default, uniffi::Record)]
pub struct FfiMedication {
    pub use_type: Option<String>,
    /// Defaults to "Farmácia veterinária"
    pub pharmacy_type: Option<String>,
    pub name: String,
    pub concentration: String,
    pub form: Option<String>,
    pub dose: String,
    pub frequency: Option<String>,
    pub period: Option<String>,
    pub use_custom_instructions: bool,
    /// Only read when `use_custom_instructions` is set
    pub instructions: String,
    pub notes: Option<String>,
}

/// Parsed medication row, ready to be applied to a record.
struct MedicationFields {
    input: FfiMedication,
    pharmacy_type: PharmacyType,
}

impl MedicationFields {
    fn parse(input: FfiMedication) -> Result<Self, VetClinicError> {
        let pharmacy_type = match non_blank(input.pharmacy_type.clone()) {
            Some(label) => PharmacyType::from_label(&label).copied().ok_or_else(|| {
                VetClinicError::InvalidInput(format!("unknown pharmacy type {}", label))
            })?,
            None => PharmacyType::default(),
        };
        Ok(Self {
            input,
            pharmacy_type,
        })
    }

    fn apply(self, record: &mut MedicationRecord) {
        let input = self.input;
        record.use_type = input.use_type.as_deref().and_then(Selection::parse);
        record.pharmacy_type = self.pharmacy_type;
        record.name = input.name;
        record.concentration = input.concentration;
        record.form = input.form.as_deref().and_then(Selection::parse);
        record.dose = input.dose;
        record.frequency = input.frequency.as_deref().and_then(Selection::parse);
        record.period = input.period.as_deref().and_then(Selection::parse);
        record.use_custom_instructions = input.use_custom_instructions;
        if input.use_custom_instructions {
            record.instructions = input.instructions;
        }
        record.notes = non_blank(input.notes);
    }
}

/// Derived text for a row being edited.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedicationPreview {
    pub display_name: String,
    pub instructions: String,
    pub quantity: String,
}

/// FFI-safe prescription submission.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPrescriptionDraft {
    pub client_id: String,
    pub animal_id: String,
    pub medications: Vec<FfiMedication>,
    pub general_observations: String,
    /// Signing veterinarian; the clinic's responsible vet when unset
    pub veterinarian: Option<String>,
}

/// Rendered prescription PDF.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRenderedPrescription {
    pub filename: String,
    pub page_count: u32,
    pub pdf: Vec<u8>,
}

/// FFI-safe catalog item.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSaleItem {
    pub sku: String,
    pub name: String,
    pub is_service: bool,
    pub unit_price_cents: i64,
}

impl From<SaleItem> for FfiSaleItem {
    fn from(item: SaleItem) -> Self {
        Self {
            sku: item.sku,
            name: item.name,
            is_service: item.kind == models::SaleItemKind::Service,
            unit_price_cents: item.unit_price_cents,
        }
    }
}

/// FFI-safe cart line.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCartLine {
    pub sku: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price_cents: i64,
    pub total_cents: i64,
}

/// FFI-safe cart snapshot.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCart {
    pub lines: Vec<FfiCartLine>,
    pub client_id: Option<String>,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
}

impl From<&Cart> for FfiCart {
    fn from(cart: &Cart) -> Self {
        Self {
            lines: cart
                .lines()
                .iter()
                .map(|l| FfiCartLine {
                    sku: l.sku.clone(),
                    name: l.name.clone(),
                    quantity: l.quantity,
                    unit_price_cents: l.unit_price_cents,
                    total_cents: l.total_cents(),
                })
                .collect(),
            client_id: cart.client_id.clone(),
            subtotal_cents: cart.subtotal_cents(),
            discount_cents: cart.discount_cents(),
            total_cents: cart.total_cents(),
        }
    }
}

/// FFI-safe ledger entry.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiFinancialEntry {
    pub id: String,
    pub is_income: bool,
    pub description: String,
    pub amount_cents: i64,
    pub payment_method: Option<String>,
    pub client_id: Option<String>,
    pub discount_cents: i64,
    pub recorded_at: String,
}

impl From<FinancialEntry> for FfiFinancialEntry {
    fn from(entry: FinancialEntry) -> Self {
        Self {
            id: entry.id,
            is_income: entry.kind == EntryKind::Income,
            description: entry.description,
            amount_cents: entry.amount_cents,
            payment_method: entry.payment_method.map(|m| m.label().to_string()),
            client_id: entry.client_id,
            discount_cents: entry.discount_cents,
            recorded_at: entry.recorded_at,
        }
    }
}

/// FFI-safe clinic settings.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiClinicSettings {
    pub clinic_name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub responsible_vet: String,
    pub crmv: String,
    pub veterinarians: Vec<String>,
}

impl From<ClinicSettings> for FfiClinicSettings {
    fn from(settings: ClinicSettings) -> Self {
        Self {
            clinic_name: settings.clinic_name,
            address: settings.address,
            phone: settings.phone,
            email: settings.email,
            responsible_vet: settings.responsible_vet,
            crmv: settings.crmv,
            veterinarians: settings.veterinarians,
        }
    }
}

impl From<FfiClinicSettings> for ClinicSettings {
    fn from(settings: FfiClinicSettings) -> Self {
        Self {
            clinic_name: settings.clinic_name,
            address: settings.address,
            phone: settings.phone,
            email: settings.email,
            responsible_vet: settings.responsible_vet,
            crmv: settings.crmv,
            veterinarians: settings.veterinarians,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_client_and_animal(core: &VetClinicCore) -> (String, String) {
        let client = core.list_clients().unwrap().remove(0);
        let animal = core.list_animals(client.id.clone()).unwrap().remove(0);
        (client.id, animal.id)
    }

    fn medication(name: &str, use_type: Option<&str>) -> FfiMedication {
        FfiMedication {
            use_type: use_type.map(String::from),
            name: name.into(),
            concentration: "10mg".into(),
            form: Some("Comprimido".into()),
            dose: "1".into(),
            frequency: Some("a cada 12 horas".into()),
            period: Some("durante 7 dias".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_client_roundtrip() {
        let core = open_core(None).unwrap();
        let created = core
            .create_client(FfiClient {
                id: String::new(),
                name: " Maria Lima ".into(),
                cpf: Some("123.456.789-00".into()),
                phone: Some("  ".into()),
                email: None,
                address: None,
                notes: None,
            })
            .unwrap();
        assert_eq!(created.name, "Maria Lima");
        assert!(created.phone.is_none());

        let fetched = core.get_client(created.id.clone()).unwrap().unwrap();
        assert_eq!(fetched.cpf.as_deref(), Some("123.456.789-00"));
        assert!(core.delete_client(created.id).unwrap());
    }

    #[test]
    fn test_animal_requires_client() {
        let core = open_core(None).unwrap();
        let result = core.create_animal(FfiAnimal {
            id: String::new(),
            client_id: "missing".into(),
            name: "Rex".into(),
            species: "Canina".into(),
            breed: None,
            sex: "Macho".into(),
            birth_date: None,
            weight_kg: None,
            notes: None,
        });
        assert!(matches!(result, Err(VetClinicError::NotFound(_))));
    }

    #[test]
    fn test_invalid_birth_date() {
        let core = open_core_with_sample_data();
        let (client_id, _) = sample_client_and_animal(&core);
        let result = core.create_animal(FfiAnimal {
            id: String::new(),
            client_id,
            name: "Rex".into(),
            species: "Canina".into(),
            breed: None,
            sex: String::new(),
            birth_date: Some("31/02/2020".into()),
            weight_kg: None,
            notes: None,
        });
        assert!(matches!(result, Err(VetClinicError::InvalidInput(_))));
    }

    #[test]
    fn test_appointment_validation_error() {
        let core = open_core_with_sample_data();
        let (_, animal_id) = sample_client_and_animal(&core);
        let before = core.list_appointments(animal_id.clone()).unwrap().len();

        let form = FfiAppointmentForm {
            date: Some("2026-10-19".into()),
            appointment_type: Some("Consulta".into()),
            ..Default::default()
        };
        match core.save_appointment(animal_id.clone(), form) {
            Err(VetClinicError::Validation(msg)) => assert!(msg.contains("veterinário")),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(core.list_appointments(animal_id).unwrap().len(), before);
    }

    #[test]
    fn test_save_appointment() {
        let core = open_core_with_sample_data();
        let (_, animal_id) = sample_client_and_animal(&core);
        let saved = core
            .save_appointment(
                animal_id.clone(),
                FfiAppointmentForm {
                    date: Some("2026-10-19".into()),
                    time: Some("09:30".into()),
                    appointment_type: Some("retorno".into()),
                    veterinarian: Some("Dra. Paula".into()),
                    weight_kg: Some(8.2),
                    temperature_c: Some(38.4),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(saved.appointment_type, "Retorno");
        assert_eq!(saved.time.as_deref(), Some("09:30"));
        assert_eq!(saved.status, "scheduled");

        let animal = core.get_animal(animal_id).unwrap().unwrap();
        assert_eq!(animal.weight_kg, Some(8.2));
    }

    #[test]
    fn test_preview_medication() {
        let core = open_core(None).unwrap();
        let preview = core
            .preview_medication(medication("Carprofeno", Some("Uso oral")))
            .unwrap();
        assert_eq!(preview.display_name, "Carprofeno 10mg");
        assert_eq!(
            preview.instructions,
            "Administrar 1 comprimido, a cada 12 horas, durante 7 dias."
        );
        assert_eq!(preview.quantity, "14 comprimidos");
    }

    #[test]
    fn test_unknown_pharmacy_type_rejected() {
        let core = open_core(None).unwrap();
        let mut input = medication("Carprofeno", None);
        input.pharmacy_type = Some("Farmácia lunar".into());
        assert!(matches!(
            core.preview_medication(input),
            Err(VetClinicError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_generate_prescription_pdf() {
        let core = open_core_with_sample_data();
        let (client_id, animal_id) = sample_client_and_animal(&core);
        let rendered = core
            .generate_prescription_pdf(FfiPrescriptionDraft {
                client_id,
                animal_id,
                medications: vec![
                    medication("Carprofeno", Some("Uso oral")),
                    medication("Dipirona", None),
                ],
                general_observations: "Retorno em 7 dias.".into(),
                veterinarian: None,
            })
            .unwrap();
        assert!(rendered.pdf.starts_with(b"%PDF"));
        assert_eq!(rendered.page_count, 1);
        assert!(rendered.filename.starts_with("receita_"));
        assert!(rendered.filename.ends_with(".pdf"));
    }

    #[test]
    fn test_empty_prescription_rejected() {
        let core = open_core_with_sample_data();
        let (client_id, animal_id) = sample_client_and_animal(&core);
        let result = core.generate_prescription_pdf(FfiPrescriptionDraft {
            client_id,
            animal_id,
            medications: Vec::new(),
            general_observations: String::new(),
            veterinarian: None,
        });
        assert!(matches!(result, Err(VetClinicError::Validation(_))));
    }

    #[test]
    fn test_checkout_flow() {
        let core = open_core_with_sample_data();
        let sku = core.list_sale_items().unwrap()[0].sku.clone();

        let cart = core.add_to_cart(sku.clone(), 2).unwrap();
        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.total_cents, cart.lines[0].unit_price_cents * 2);

        assert!(matches!(
            core.checkout("Cheque".into()),
            Err(VetClinicError::InvalidInput(_))
        ));

        let entries_before = core.list_entries().unwrap().len();
        let entry = core.checkout("pix".into()).unwrap();
        assert!(entry.is_income);
        assert_eq!(entry.payment_method.as_deref(), Some("PIX"));
        assert_eq!(core.list_entries().unwrap().len(), entries_before + 1);
        assert!(core.get_cart().unwrap().lines.is_empty());

        assert!(matches!(
            core.checkout("PIX".into()),
            Err(VetClinicError::Validation(_))
        ));
    }

    #[test]
    fn test_unknown_sku() {
        let core = open_core_with_sample_data();
        assert!(matches!(
            core.add_to_cart("NOPE".into(), 1),
            Err(VetClinicError::NotFound(_))
        ));
    }

    #[test]
    fn test_settings_update() {
        let core = open_core(None).unwrap();
        let mut settings = core.get_settings().unwrap();
        settings.clinic_name = "Clínica Patas".into();
        core.update_settings(settings).unwrap();
        assert_eq!(core.get_settings().unwrap().clinic_name, "Clínica Patas");

        let mut blank = core.get_settings().unwrap();
        blank.clinic_name = " ".into();
        assert!(core.update_settings(blank).is_err());
    }

    #[test]
    fn test_financial_summary_json() {
        let core = open_core_with_sample_data();
        core.record_expense("Energia".into(), 10_000).unwrap();
        let json = core.financial_summary_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["expense_cents"].as_i64().unwrap() >= 10_000);
    }

    #[test]
    fn test_init_logging_twice() {
        init_logging();
        init_logging();
    }
}
