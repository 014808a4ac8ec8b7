//! End-to-end prescription tests: editor, document layout, PDF export.

use chrono::NaiveDate;
use vetclinic_core::export::{export_to_file, Block, ExportError};
use vetclinic_core::models::{
    Choice, Frequency, PharmaceuticalForm, Period, PharmacyType, Selection, UseType,
};
use vetclinic_core::prescription::{PrescriptionEditor, PrescriptionError};
use vetclinic_core::{
    assemble_document, render_prescription, CoreConfig, DocumentContext, PrescriptionDraft, Store,
};

fn at() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 19)
        .unwrap()
        .and_hms_opt(10, 30, 0)
        .unwrap()
}

/// Editor for the first sample client's first animal.
fn editor(store: &Store) -> PrescriptionEditor {
    let client = store.list_clients().remove(0);
    let animal = store.list_animals_for_client(&client.id).remove(0);
    PrescriptionEditor::new(client.id, animal.id)
}

fn add(editor: &mut PrescriptionEditor, name: &str, use_type: Option<UseType>) {
    let id = editor.add_medication();
    editor
        .update_medication(&id, |m| {
            m.name = name.into();
            m.concentration = "50mg".into();
            m.use_type = use_type.map(Selection::Predefined);
            m.form = Some(PharmaceuticalForm::Tablet.into());
            m.dose = "1/2".into();
            m.frequency = Some(Frequency::Every12Hours.into());
            m.period = Some(Period::Days10.into());
        })
        .unwrap();
}

fn submitted(store: &Store) -> PrescriptionDraft {
    let mut editor = editor(store);
    add(&mut editor, "Carprofeno", Some(UseType::Oral));
    add(&mut editor, "Dipirona", None);
    add(&mut editor, "Omeprazol", Some(UseType::Oral));
    add(&mut editor, "Clorexidina", Some(UseType::Topical));
    editor.set_general_observations("Retornar em 10 dias para reavaliação.");
    editor.submit().unwrap()
}

#[test]
fn test_groups_in_first_seen_order_with_per_group_numbering() {
    let store = Store::with_sample_data();
    let draft = submitted(&store);
    let context = DocumentContext::from_store(&store, &draft).unwrap();
    let document = assemble_document(&draft, &context, &CoreConfig::default(), at().date());

    let titles: Vec<&str> = document
        .pages
        .iter()
        .flat_map(|p| &p.blocks)
        .filter_map(|b| match b {
            Block::GroupTitle(title) => Some(title.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(titles, vec!["Uso oral", "Outros", "Uso tópico"]);

    let headings: Vec<String> = document.medications().map(|m| m.heading()).collect();
    assert_eq!(
        headings,
        vec![
            "1. Carprofeno 50mg",
            "2. Omeprazol 50mg",
            "1. Dipirona 50mg",
            "1. Clorexidina 50mg",
        ]
    );

    let first = document.medications().next().unwrap();
    assert_eq!(first.pharmacy_badge, PharmacyType::Veterinary.label());
    assert_eq!(first.quantity_badge.as_deref(), Some("10 comprimidos"));
}

#[test]
fn test_signature_only_on_last_page() {
    let store = Store::with_sample_data();
    let mut editor = editor(&store);
    for i in 0..40 {
        add(&mut editor, &format!("Medicamento {}", i), Some(UseType::Continuous));
    }
    let draft = editor.submit().unwrap();
    let context = DocumentContext::from_store(&store, &draft).unwrap();
    let document = assemble_document(&draft, &context, &CoreConfig::default(), at().date());

    assert!(document.page_count() > 1);
    let total = document.page_count();
    for page in &document.pages {
        assert_eq!(page.total, total);
        assert_eq!(page.signature.is_some(), page.number == total);
    }
    assert_eq!(document.medications().count(), 40);

    let signature = document.pages[total - 1].signature.as_ref().unwrap();
    assert_eq!(signature.veterinarian, "Dra. Marina Alves");
    assert_eq!(signature.date_line, "São Paulo, 19 de outubro de 2026");
}

#[test]
fn test_empty_draft_produces_nothing() {
    let store = Store::with_sample_data();
    let editor = editor(&store);
    assert_eq!(editor.submit(), Err(PrescriptionError::EmptyDraft));

    let draft = editor.draft().clone();
    let context = DocumentContext::from_store(&store, &draft).unwrap();
    let result = render_prescription(&draft, &context, &CoreConfig::default(), at());
    assert!(matches!(
        result,
        Err(ExportError::Prescription(PrescriptionError::EmptyDraft))
    ));
}

#[test]
fn test_unknown_patient_is_not_found() {
    let store = Store::with_sample_data();
    let mut draft = submitted(&store);
    draft.animal_id = "missing".into();
    assert!(matches!(
        DocumentContext::from_store(&store, &draft),
        Err(ExportError::NotFound(id)) if id == "missing"
    ));
}

#[test]
fn test_render_and_export_pdf() {
    let store = Store::with_sample_data();
    let draft = submitted(&store);
    let context = DocumentContext::from_store(&store, &draft).unwrap();

    let rendered = render_prescription(&draft, &context, &CoreConfig::default(), at()).unwrap();
    assert!(rendered.bytes.starts_with(b"%PDF"));
    assert_eq!(rendered.page_count, 1);
    assert_eq!(rendered.filename, "receita_ana-souza_thor_20261019_103000.pdf");

    let dir = tempfile::tempdir().unwrap();
    let path = export_to_file(&rendered, &dir.path().join("receitas")).unwrap();
    assert!(path.exists());
    assert_eq!(std::fs::read(&path).unwrap(), rendered.bytes);
}
