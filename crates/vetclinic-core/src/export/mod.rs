//! Prescription document export.

mod document;
mod pdf;

pub use document::*;
pub use pdf::*;

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use thiserror::Error;
use tracing::info;

use crate::config::CoreConfig;
use crate::models::PrescriptionDraft;
use crate::prescription::PrescriptionError;

/// Export errors.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error(transparent)]
    Prescription(#[from] PrescriptionError),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ExportResult<T> = Result<T, ExportError>;

/// A rendered prescription ready to be saved or shared.
#[derive(Debug, Clone)]
pub struct RenderedPrescription {
    pub filename: String,
    pub page_count: usize,
    pub bytes: Vec<u8>,
}

/// Lowercase ASCII slug: accents folded, other characters collapsed to "-".
pub fn slugify(text: &str) -> String {
    let mut slug = String::new();
    for ch in text.trim().to_lowercase().chars() {
        let folded = match ch {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            'ñ' => 'n',
            c => c,
        };
        if folded.is_ascii_alphanumeric() {
            slug.push(folded);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-').to_string();
    if slug.is_empty() {
        "sem-nome".to_string()
    } else {
        slug
    }
}

/// File name for an exported prescription:
/// `receita_{client}_{animal}_{YYYYMMDD_HHMMSS}.pdf`.
pub fn export_filename(client_name: &str, animal_name: &str, at: NaiveDateTime) -> String {
    format!(
        "receita_{}_{}_{}.pdf",
        slugify(client_name),
        slugify(animal_name),
        at.format("%Y%m%d_%H%M%S")
    )
}

/// Validate a draft, lay it out and render it.
///
/// An empty draft is rejected before anything is produced.
pub fn render_prescription(
    draft: &PrescriptionDraft,
    context: &DocumentContext,
    config: &CoreConfig,
    now: NaiveDateTime,
) -> ExportResult<RenderedPrescription> {
    draft.validate()?;

    let document = assemble_document(draft, context, config, now.date());
    let bytes = render_pdf(&document, config)?;
    let filename = export_filename(&context.client.name, &context.animal.name, now);

    info!(
        draft_id = %draft.draft_id,
        medications = draft.medications.len(),
        pages = document.page_count(),
        %filename,
        "Prescription rendered"
    );

    Ok(RenderedPrescription {
        filename,
        page_count: document.page_count(),
        bytes,
    })
}

/// Write a rendered prescription into `dir`, creating it if needed.
pub fn export_to_file(rendered: &RenderedPrescription, dir: &Path) -> ExportResult<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(&rendered.filename);
    std::fs::write(&path, &rendered.bytes)?;
    info!(path = %path.display(), bytes = rendered.bytes.len(), "Prescription saved");
    Ok(path)
}
