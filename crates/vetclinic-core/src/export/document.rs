//! Prescription document layout.
//!
//! Turns a submitted draft into a renderer-independent, paginated
//! description. Text is wrapped and measured here so the PDF renderer only
//! draws what it is given.

use std::collections::VecDeque;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::{ExportError, ExportResult};
use crate::config::CoreConfig;
use crate::models::{Animal, Choice, ClinicSettings, Client, PrescriptionDraft, Sex};
use crate::prescription::{display_name, form_label, group_by_use_type};
use crate::store::Store;

/// Title line printed under the clinic header.
pub const DOCUMENT_TITLE: &str = "Receituário";

const MONTHS: [&str; 12] = [
    "janeiro", "fevereiro", "março", "abril", "maio", "junho", "julho", "agosto", "setembro",
    "outubro", "novembro", "dezembro",
];

// Heights in body lines
const HEADER_LINES: usize = 3;
const TITLE_LINES: usize = 2;
const SIGNATURE_LINES: usize = 6;
const BLOCK_SPACING: usize = 1;

/// Everything the document needs besides the draft.
#[derive(Debug, Clone)]
pub struct DocumentContext {
    pub settings: ClinicSettings,
    pub client: Client,
    pub animal: Animal,
    /// Signing veterinarian; the responsible vet when unset
    pub veterinarian: Option<String>,
}

impl DocumentContext {
    /// Look up the draft's client and animal in the store.
    pub fn from_store(store: &Store, draft: &PrescriptionDraft) -> ExportResult<Self> {
        let client = store
            .get_client(&draft.client_id)
            .ok_or_else(|| ExportError::NotFound(draft.client_id.clone()))?;
        let animal = store
            .get_animal(&draft.animal_id)
            .ok_or_else(|| ExportError::NotFound(draft.animal_id.clone()))?;
        Ok(Self {
            settings: store.settings(),
            client,
            animal,
            veterinarian: None,
        })
    }

    fn signing_vet(&self) -> String {
        self.veterinarian
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(self.settings.responsible_vet.trim())
            .to_string()
    }
}

/// Clinic identity printed at the top of every page.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ClinicHeader {
    pub name: String,
    pub contact: String,
    pub crmv: String,
}

/// Two-column patient (left) and tutor (right) block. Each row is a
/// label/value pair; unfilled optional fields are left out.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InfoBlock {
    pub patient: Vec<(String, String)>,
    pub tutor: Vec<(String, String)>,
}

impl InfoBlock {
    /// Height in body lines, including the trailing spacing.
    pub fn line_count(&self) -> usize {
        self.patient.len().max(self.tutor.len()) + BLOCK_SPACING
    }
}

/// One rendered medication.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MedicationBlock {
    /// Position inside its use-type group, from 1
    pub sequence: usize,
    /// Name and concentration, resolved for display
    pub display_name: String,
    /// Pharmaceutical form label, "" when unset
    pub form: String,
    pub pharmacy_badge: String,
    /// Total quantity badge, when one was computed
    pub quantity_badge: Option<String>,
    pub instruction_lines: Vec<String>,
    pub note_lines: Vec<String>,
    /// Chunk carried over from the previous page
    pub continued: bool,
}

impl MedicationBlock {
    /// Header line text, e.g. "1. Carprofeno 75mg".
    pub fn heading(&self) -> String {
        if self.continued {
            format!("{}. {} (continuação)", self.sequence, self.display_name)
        } else {
            format!("{}. {}", self.sequence, self.display_name)
        }
    }

    /// Keep the first `room` text lines, instructions before notes, and
    /// return the rest as a continuation.
    fn split_off(&mut self, room: usize) -> MedicationBlock {
        let kept_instructions = room.min(self.instruction_lines.len());
        let kept_notes = room - kept_instructions;
        MedicationBlock {
            instruction_lines: self.instruction_lines.split_off(kept_instructions),
            note_lines: self.note_lines.split_off(kept_notes.min(self.note_lines.len())),
            continued: true,
            ..self.clone()
        }
    }
}

/// A unit of body content.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub enum Block {
    GroupTitle(String),
    Medication(MedicationBlock),
    /// General observations; `continued` marks a chunk carried over from
    /// the previous page
    Observations { lines: Vec<String>, continued: bool },
}

impl Block {
    /// Height in body lines, including the trailing spacing.
    pub fn line_count(&self) -> usize {
        match self {
            Block::GroupTitle(_) => 1 + BLOCK_SPACING,
            Block::Medication(m) => 1 + m.instruction_lines.len() + m.note_lines.len() + BLOCK_SPACING,
            Block::Observations { lines, .. } => 1 + lines.len() + BLOCK_SPACING,
        }
    }

    /// Lines of text under the block's heading.
    fn text_lines(&self) -> usize {
        match self {
            Block::GroupTitle(_) => 0,
            Block::Medication(m) => m.instruction_lines.len() + m.note_lines.len(),
            Block::Observations { lines, .. } => lines.len(),
        }
    }

    /// Smallest piece of the block that can start a page: the whole block,
    /// or its heading with one line of text when it can be split.
    fn min_lines(&self) -> usize {
        if self.text_lines() > 1 {
            1 + 1 + BLOCK_SPACING
        } else {
            self.line_count()
        }
    }

    /// Split into a head keeping `room` text lines and a continued tail.
    /// The block is handed back whole when it has no more than `room`
    /// lines of text, or cannot be split.
    fn split(self, room: usize) -> Result<(Block, Block), Block> {
        if room == 0 || room >= self.text_lines() {
            return Err(self);
        }
        match self {
            Block::Medication(mut head) => {
                let tail = head.split_off(room);
                Ok((Block::Medication(head), Block::Medication(tail)))
            }
            Block::Observations { mut lines, continued } => {
                let tail = lines.split_off(room);
                Ok((
                    Block::Observations { lines, continued },
                    Block::Observations {
                        lines: tail,
                        continued: true,
                    },
                ))
            }
            title @ Block::GroupTitle(_) => Err(title),
        }
    }
}

/// Signature area closing the document.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SignatureBlock {
    pub veterinarian: String,
    pub crmv: String,
    /// "São Paulo, 19 de outubro de 2026"
    pub date_line: String,
}

/// One page of the document.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Page {
    /// From 1
    pub number: usize,
    pub total: usize,
    pub blocks: Vec<Block>,
    /// Present only on the last page
    pub signature: Option<SignatureBlock>,
}

/// A paginated prescription.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PrescriptionDocument {
    pub header: ClinicHeader,
    pub title: String,
    pub info: InfoBlock,
    pub pages: Vec<Page>,
}

impl PrescriptionDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All medications in print order. A medication continued across
    /// pages is yielded once, by its first chunk.
    pub fn medications(&self) -> impl Iterator<Item = &MedicationBlock> {
        self.pages.iter().flat_map(|p| &p.blocks).filter_map(|b| match b {
            Block::Medication(m) if !m.continued => Some(m),
            _ => None,
        })
    }
}

/// The signature block a page carries: only the last page gets one.
pub fn signature_for_page(
    number: usize,
    total: usize,
    signature: &SignatureBlock,
) -> Option<SignatureBlock> {
    (number == total).then(|| signature.clone())
}

/// Format a date as "19 de outubro de 2026".
pub fn format_long_date(date: NaiveDate) -> String {
    format!(
        "{} de {} de {}",
        date.day(),
        MONTHS[date.month0() as usize],
        date.year()
    )
}

/// Word-wrap text to at most `max_chars` characters per line. Explicit line
/// breaks are kept; words longer than a line are split.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        let mut current_len = 0;

        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();

            while word.len() > max_chars {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let rest = word.split_off(max_chars);
                lines.push(word.into_iter().collect());
                word = rest;
            }

            if current_len > 0 && current_len + 1 + word.len() > max_chars {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current_len += word.len();
            current.extend(word);
        }

        if current_len > 0 {
            lines.push(current);
        }
    }

    lines
}

fn build_header(settings: &ClinicSettings) -> ClinicHeader {
    ClinicHeader {
        name: settings.clinic_name.trim().to_string(),
        contact: settings.contact_line(),
        crmv: settings.crmv.trim().to_string(),
    }
}

fn push_row(rows: &mut Vec<(String, String)>, label: &str, value: Option<String>) {
    if let Some(value) = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        rows.push((label.to_string(), value));
    }
}

fn build_info(context: &DocumentContext, today: NaiveDate) -> InfoBlock {
    let animal = &context.animal;
    let client = &context.client;

    let mut patient = Vec::new();
    push_row(&mut patient, "Paciente", Some(animal.name.clone()));
    push_row(&mut patient, "Espécie", Some(animal.species.clone()));
    push_row(&mut patient, "Raça", animal.breed.clone());
    let sex = (animal.sex != Sex::Unknown).then(|| animal.sex.label().to_string());
    push_row(&mut patient, "Sexo", sex);
    push_row(&mut patient, "Idade", animal.age_label(today));
    push_row(
        &mut patient,
        "Peso",
        animal.weight_kg.map(|w| format!("{} kg", w).replace('.', ",")),
    );

    let mut tutor = Vec::new();
    push_row(&mut tutor, "Tutor", Some(client.name.clone()));
    push_row(&mut tutor, "CPF", client.cpf.clone());
    push_row(&mut tutor, "Telefone", client.phone.clone());
    push_row(&mut tutor, "Endereço", client.address.clone());

    InfoBlock { patient, tutor }
}

/// Lay the draft's content out as a flat sequence of body blocks.
fn build_blocks(draft: &PrescriptionDraft, config: &CoreConfig) -> Vec<Block> {
    let columns = config.page.wrap_columns;
    let mut blocks = Vec::new();

    for group in group_by_use_type(&draft.medications, &config.default_use_type) {
        blocks.push(Block::GroupTitle(group.use_type.clone()));

        for (index, record) in group.medications.iter().enumerate() {
            let quantity = record.quantity.trim();
            blocks.push(Block::Medication(MedicationBlock {
                sequence: index + 1,
                display_name: display_name(&record.name, &record.concentration),
                form: form_label(record),
                pharmacy_badge: record.pharmacy_type.label().to_string(),
                quantity_badge: (!quantity.is_empty()).then(|| quantity.to_string()),
                instruction_lines: wrap_text(&record.instructions, columns),
                note_lines: record
                    .note()
                    .map(|note| wrap_text(&format!("Obs.: {}", note), columns))
                    .unwrap_or_default(),
                continued: false,
            }));
        }
    }

    if let Some(observations) = draft.observations() {
        blocks.push(Block::Observations {
            lines: wrap_text(observations, columns),
            continued: false,
        });
    }

    blocks
}

/// Body lines available per page once the repeated header is placed.
fn body_capacity(config: &CoreConfig, info: &InfoBlock) -> usize {
    let page = &config.page;
    let usable_mm = page.height_mm - 2.0 * page.margin_mm;
    let total_lines = (usable_mm / page.line_height_mm).floor().max(0.0) as usize;
    total_lines
        .saturating_sub(HEADER_LINES + TITLE_LINES + info.line_count())
        .max(SIGNATURE_LINES + 2)
}

/// Split blocks into pages of at most `capacity` lines.
///
/// A group title always travels with the block after it, or with that
/// block's first chunk when the block is taller than a page. Observations
/// longer than the space left are continued on the next page. A medication
/// taller than a page is continued the same way.
fn paginate(blocks: Vec<Block>, capacity: usize) -> Vec<Vec<Block>> {
    let mut pages: Vec<Vec<Block>> = Vec::new();
    let mut current: Vec<Block> = Vec::new();
    let mut used = 0;
    let mut queue: VecDeque<Block> = blocks.into();

    while let Some(block) = queue.pop_front() {
        let mut needed = block.line_count();
        if matches!(block, Block::GroupTitle(_)) {
            let space = capacity.saturating_sub(needed);
            needed += queue.front().map_or(0, |next| {
                if next.line_count() <= space {
                    next.line_count()
                } else {
                    next.min_lines()
                }
            });
        }

        if used + needed <= capacity {
            used += block.line_count();
            current.push(block);
            continue;
        }

        let after_title = matches!(current.last(), Some(Block::GroupTitle(_)));
        let splittable = match &block {
            Block::Observations { .. } => true,
            Block::Medication(_) => after_title || block.line_count() > capacity,
            Block::GroupTitle(_) => false,
        };
        let block = if splittable {
            let room = capacity.saturating_sub(used + 1 + BLOCK_SPACING);
            match block.split(room) {
                Ok((head, tail)) => {
                    current.push(head);
                    queue.push_front(tail);
                    pages.push(std::mem::take(&mut current));
                    used = 0;
                    continue;
                }
                Err(block) => block,
            }
        } else {
            block
        };

        if current.is_empty() {
            used = block.line_count();
            current.push(block);
        } else {
            pages.push(std::mem::take(&mut current));
            used = 0;
            queue.push_front(block);
        }
    }

    pages.push(current);
    pages
}

/// Assemble the paginated prescription for a submitted draft.
///
/// Pure: the signature date is `today` as passed in.
pub fn assemble_document(
    draft: &PrescriptionDraft,
    context: &DocumentContext,
    config: &CoreConfig,
    today: NaiveDate,
) -> PrescriptionDocument {
    let header = build_header(&context.settings);
    let info = build_info(context, today);
    let capacity = body_capacity(config, &info);

    let mut page_blocks = paginate(build_blocks(draft, config), capacity);

    // The signature needs room at the bottom of the last page.
    let last_used: usize = page_blocks
        .last()
        .map(|blocks| blocks.iter().map(Block::line_count).sum())
        .unwrap_or(0);
    if last_used + SIGNATURE_LINES > capacity {
        page_blocks.push(Vec::new());
    }

    let city = config.city.trim();
    let date = format_long_date(today);
    let signature = SignatureBlock {
        veterinarian: context.signing_vet(),
        crmv: context.settings.crmv.trim().to_string(),
        date_line: if city.is_empty() {
            date
        } else {
            format!("{}, {}", city, date)
        },
    };

    let total = page_blocks.len();
    let pages = page_blocks
        .into_iter()
        .enumerate()
        .map(|(index, blocks)| Page {
            number: index + 1,
            total,
            blocks,
            signature: signature_for_page(index + 1, total, &signature),
        })
        .collect();

    PrescriptionDocument {
        header,
        title: DOCUMENT_TITLE.to_string(),
        info,
        pages,
    }
}
