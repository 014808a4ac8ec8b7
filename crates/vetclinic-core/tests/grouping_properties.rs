//! Property tests for use-type grouping and pagination.

use chrono::NaiveDate;
use proptest::prelude::*;
use proptest::test_runner::Config;
use vetclinic_core::models::{
    Animal, Choice, ClinicSettings, Client, MedicationRecord, PrescriptionDraft, Selection,
    UseType, DEFAULT_USE_TYPE,
};
use vetclinic_core::{assemble_document, group_by_use_type, CoreConfig, DocumentContext};

/// Use type per record: an option index, a custom label, or unset.
fn use_type_strategy() -> impl Strategy<Value = Option<Selection<UseType>>> {
    prop_oneof![
        4 => (0..UseType::options().len()).prop_map(|i| Some(Selection::Predefined(UseType::options()[i]))),
        1 => prop::sample::select(vec!["Uso veterinário", "  ", "Uso oral"])
            .prop_map(|text| Some(Selection::Custom(text.to_string()))),
        2 => Just(None),
    ]
}

fn records(use_types: Vec<Option<Selection<UseType>>>) -> Vec<MedicationRecord> {
    use_types
        .into_iter()
        .enumerate()
        .map(|(i, use_type)| {
            let mut record = MedicationRecord::new();
            record.name = format!("Medicamento {}", i);
            record.use_type = use_type;
            record
        })
        .collect()
}

fn bucket_label(record: &MedicationRecord) -> String {
    let label = record.use_type_label();
    if label.is_empty() {
        DEFAULT_USE_TYPE.to_string()
    } else {
        label
    }
}

proptest! {
    #![proptest_config(Config::with_cases(128))]
    #[test]
    fn grouping_preserves_every_record(
        use_types in prop::collection::vec(use_type_strategy(), 0..30)
    ) {
        let medications = records(use_types);
        let groups = group_by_use_type(&medications, DEFAULT_USE_TYPE);

        let total: usize = groups.iter().map(|g| g.medications.len()).sum();
        prop_assert_eq!(total, medications.len());

        for group in &groups {
            prop_assert!(!group.medications.is_empty());
            for record in &group.medications {
                prop_assert_eq!(bucket_label(record), group.use_type.clone());
            }
        }
    }

    #[test]
    fn grouping_keeps_input_order(
        use_types in prop::collection::vec(use_type_strategy(), 0..30)
    ) {
        let medications = records(use_types);
        let groups = group_by_use_type(&medications, DEFAULT_USE_TYPE);
        let position = |record: &MedicationRecord| {
            medications.iter().position(|m| m.id == record.id).unwrap()
        };

        // Records keep their relative order inside a bucket.
        for group in &groups {
            let positions: Vec<usize> = group.medications.iter().map(|m| position(*m)).collect();
            prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }

        // Buckets follow the first appearance of their label.
        let mut first_seen: Vec<String> = Vec::new();
        for record in &medications {
            let label = bucket_label(record);
            if !first_seen.contains(&label) {
                first_seen.push(label);
            }
        }
        let labels: Vec<String> = groups.iter().map(|g| g.use_type.clone()).collect();
        prop_assert_eq!(labels, first_seen);
    }
}

fn context() -> DocumentContext {
    let client = Client::new("Ana Souza".into());
    let animal = Animal::new(client.id.clone(), "Thor".into(), "Canina".into());
    DocumentContext {
        settings: ClinicSettings {
            responsible_vet: "Dra. Marina Alves".into(),
            crmv: "CRMV-SP 12345".into(),
            ..Default::default()
        },
        client,
        animal,
        veterinarian: None,
    }
}

proptest! {
    #![proptest_config(Config::with_cases(48))]
    #[test]
    fn signature_appears_once_on_last_page(
        count in 1usize..80,
        observations in prop::sample::select(vec![0usize, 1, 40, 400]),
    ) {
        let context = context();
        let mut draft = PrescriptionDraft::new(context.client.id.clone(), context.animal.id.clone());
        for i in 0..count {
            let mut record = MedicationRecord::new();
            record.name = format!("Medicamento {}", i);
            record.instructions = "Administrar conforme orientação.".into();
            draft.medications.push(record);
        }
        draft.general_observations = "Repouso absoluto. ".repeat(observations);

        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let document = assemble_document(&draft, &context, &CoreConfig::default(), today);

        let total = document.page_count();
        prop_assert!(total >= 1);
        let signed: Vec<usize> = document
            .pages
            .iter()
            .filter(|p| p.signature.is_some())
            .map(|p| p.number)
            .collect();
        prop_assert_eq!(signed, vec![total]);
        prop_assert_eq!(document.medications().count(), count);
        for (index, page) in document.pages.iter().enumerate() {
            prop_assert_eq!(page.number, index + 1);
            prop_assert_eq!(page.total, total);
        }
    }
}
