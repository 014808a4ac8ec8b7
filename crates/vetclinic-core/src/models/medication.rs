//! Prescription line items.

use serde::{Deserialize, Serialize};

use super::selection::{Choice, Selection};

/// Label of the bucket that collects records without a use type.
pub const DEFAULT_USE_TYPE: &str = "Outros";

/// How the medication is meant to be used. Groups the printed prescription.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum UseType {
    Continuous,
    AsNeeded,
    PostSurgical,
    Oral,
    Topical,
}

impl Choice for UseType {
    fn label(&self) -> &'static str {
        match self {
            UseType::Continuous => "Uso contínuo",
            UseType::AsNeeded => "Uso se necessário",
            UseType::PostSurgical => "Pós-cirúrgico",
            UseType::Oral => "Uso oral",
            UseType::Topical => "Uso tópico",
        }
    }

    fn options() -> &'static [Self] {
        &[
            UseType::Continuous,
            UseType::AsNeeded,
            UseType::PostSurgical,
            UseType::Oral,
            UseType::Topical,
        ]
    }
}

/// Where the tutor should buy the medication.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PharmacyType {
    #[default]
    Veterinary,
    Human,
    Compounding,
}

impl Choice for PharmacyType {
    fn label(&self) -> &'static str {
        match self {
            PharmacyType::Veterinary => "Farmácia veterinária",
            PharmacyType::Human => "Farmácia humana",
            PharmacyType::Compounding => "Farmácia de manipulação",
        }
    }

    fn options() -> &'static [Self] {
        &[
            PharmacyType::Veterinary,
            PharmacyType::Human,
            PharmacyType::Compounding,
        ]
    }
}

/// Pharmaceutical form.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PharmaceuticalForm {
    Tablet,
    Capsule,
    OralSolution,
    OralSuspension,
    Drops,
    Ointment,
    Injectable,
}

impl PharmaceuticalForm {
    /// Unit of one administration, singular and plural.
    pub fn unit(&self) -> (&'static str, &'static str) {
        match self {
            PharmaceuticalForm::Tablet => ("comprimido", "comprimidos"),
            PharmaceuticalForm::Capsule => ("cápsula", "cápsulas"),
            PharmaceuticalForm::OralSolution
            | PharmaceuticalForm::OralSuspension
            | PharmaceuticalForm::Injectable => ("ml", "ml"),
            PharmaceuticalForm::Drops => ("gota", "gotas"),
            PharmaceuticalForm::Ointment => ("aplicação", "aplicações"),
        }
    }

    /// Whether a dispensed total can be expressed in administration units.
    pub fn is_countable(&self) -> bool {
        !matches!(self, PharmaceuticalForm::Ointment)
    }

    /// Whether totals round up to whole units.
    pub fn is_discrete(&self) -> bool {
        matches!(
            self,
            PharmaceuticalForm::Tablet | PharmaceuticalForm::Capsule | PharmaceuticalForm::Drops
        )
    }
}

impl Choice for PharmaceuticalForm {
    fn label(&self) -> &'static str {
        match self {
            PharmaceuticalForm::Tablet => "Comprimido",
            PharmaceuticalForm::Capsule => "Cápsula",
            PharmaceuticalForm::OralSolution => "Solução oral",
            PharmaceuticalForm::OralSuspension => "Suspensão oral",
            PharmaceuticalForm::Drops => "Gotas",
            PharmaceuticalForm::Ointment => "Pomada",
            PharmaceuticalForm::Injectable => "Injetável",
        }
    }

    fn options() -> &'static [Self] {
        &[
            PharmaceuticalForm::Tablet,
            PharmaceuticalForm::Capsule,
            PharmaceuticalForm::OralSolution,
            PharmaceuticalForm::OralSuspension,
            PharmaceuticalForm::Drops,
            PharmaceuticalForm::Ointment,
            PharmaceuticalForm::Injectable,
        ]
    }
}

/// Administration frequency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Frequency {
    Every6Hours,
    Every8Hours,
    Every12Hours,
    Every24Hours,
    SingleDose,
}

impl Frequency {
    /// Administrations per day. `None` for a single dose.
    pub fn per_day(&self) -> Option<u32> {
        match self {
            Frequency::Every6Hours => Some(4),
            Frequency::Every8Hours => Some(3),
            Frequency::Every12Hours => Some(2),
            Frequency::Every24Hours => Some(1),
            Frequency::SingleDose => None,
        }
    }
}

impl Choice for Frequency {
    fn label(&self) -> &'static str {
        match self {
            Frequency::Every6Hours => "a cada 6 horas",
            Frequency::Every8Hours => "a cada 8 horas",
            Frequency::Every12Hours => "a cada 12 horas",
            Frequency::Every24Hours => "a cada 24 horas",
            Frequency::SingleDose => "dose única",
        }
    }

    fn options() -> &'static [Self] {
        &[
            Frequency::Every6Hours,
            Frequency::Every8Hours,
            Frequency::Every12Hours,
            Frequency::Every24Hours,
            Frequency::SingleDose,
        ]
    }
}

/// Treatment period.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Period {
    Days3,
    Days5,
    Days7,
    Days10,
    Days14,
    Days30,
    Continuous,
}

impl Period {
    /// Length in days. `None` for continuous use.
    pub fn days(&self) -> Option<u32> {
        match self {
            Period::Days3 => Some(3),
            Period::Days5 => Some(5),
            Period::Days7 => Some(7),
            Period::Days10 => Some(10),
            Period::Days14 => Some(14),
            Period::Days30 => Some(30),
            Period::Continuous => None,
        }
    }
}

impl Choice for Period {
    fn label(&self) -> &'static str {
        match self {
            Period::Days3 => "durante 3 dias",
            Period::Days5 => "durante 5 dias",
            Period::Days7 => "durante 7 dias",
            Period::Days10 => "durante 10 dias",
            Period::Days14 => "durante 14 dias",
            Period::Days30 => "durante 30 dias",
            Period::Continuous => "uso contínuo",
        }
    }

    fn options() -> &'static [Self] {
        &[
            Period::Days3,
            Period::Days5,
            Period::Days7,
            Period::Days10,
            Period::Days14,
            Period::Days30,
            Period::Continuous,
        ]
    }
}

/// One prescribed item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicationRecord {
    /// Opaque identifier (UUID)
    pub id: String,
    /// Use type; unset records print under "Outros"
    pub use_type: Option<Selection<UseType>>,
    /// Pharmacy type badge
    pub pharmacy_type: PharmacyType,
    /// Commercial or active-ingredient name
    pub name: String,
    /// Concentration (e.g., "75mg", "100mg/ml")
    pub concentration: String,
    /// Pharmaceutical form
    pub form: Option<Selection<PharmaceuticalForm>>,
    /// Dose per administration, as typed (e.g., "1", "0,5", "1/2")
    pub dose: String,
    pub frequency: Option<Selection<Frequency>>,
    pub period: Option<Selection<Period>>,
    /// When true `instructions` is typed by the vet and never regenerated
    pub use_custom_instructions: bool,
    /// Instruction text printed under the header line
    pub instructions: String,
    /// Optional note printed after the instructions
    pub notes: Option<String>,
    /// Computed total-quantity display string, empty when unknown
    pub quantity: String,
}

impl MedicationRecord {
    /// Create an empty line item.
    pub fn new() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            use_type: None,
            pharmacy_type: PharmacyType::default(),
            name: String::new(),
            concentration: String::new(),
            form: None,
            dose: String::new(),
            frequency: None,
            period: None,
            use_custom_instructions: false,
            instructions: String::new(),
            notes: None,
            quantity: String::new(),
        }
    }

    /// Use-type label, "" when unset.
    pub fn use_type_label(&self) -> String {
        super::selection::label_of(&self.use_type)
    }

    /// Note text if it carries anything printable.
    pub fn note(&self) -> Option<&str> {
        self.notes
            .as_deref()
            .map(str::trim)
            .filter(|note| !note.is_empty())
    }

    /// Recompute derived fields after an edit.
    pub fn refresh(&mut self) {
        self.quantity = crate::prescription::compute_quantity(self);
        if !self.use_custom_instructions {
            self.instructions = crate::prescription::generate_instructions(self);
        }
    }
}

impl Default for MedicationRecord {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_is_empty() {
        let record = MedicationRecord::new();
        assert_eq!(record.id.len(), 36);
        assert!(record.name.is_empty());
        assert!(record.use_type.is_none());
        assert_eq!(record.pharmacy_type, PharmacyType::Veterinary);
        assert_eq!(record.use_type_label(), "");
    }

    #[test]
    fn test_refresh_generates_instructions_and_quantity() {
        let mut record = MedicationRecord::new();
        record.name = "Carprofeno".into();
        record.form = Some(PharmaceuticalForm::Tablet.into());
        record.dose = "1".into();
        record.frequency = Some(Frequency::Every12Hours.into());
        record.period = Some(Period::Days7.into());
        record.refresh();

        assert_eq!(
            record.instructions,
            "Administrar 1 comprimido, a cada 12 horas, durante 7 dias."
        );
        assert_eq!(record.quantity, "14 comprimidos");
    }

    #[test]
    fn test_refresh_keeps_custom_instructions() {
        let mut record = MedicationRecord::new();
        record.use_custom_instructions = true;
        record.instructions = "Dar junto com a ração.".into();
        record.dose = "2".into();
        record.refresh();
        assert_eq!(record.instructions, "Dar junto com a ração.");
    }

    #[test]
    fn test_blank_note_is_none() {
        let mut record = MedicationRecord::new();
        record.notes = Some("  ".into());
        assert!(record.note().is_none());
        record.notes = Some(" Em jejum ".into());
        assert_eq!(record.note(), Some("Em jejum"));
    }
}
