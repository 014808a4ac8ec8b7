//! PDF rendering of an assembled prescription.

use std::io::BufWriter;

use printpdf::*;

use super::document::{Block, InfoBlock, MedicationBlock, Page, PrescriptionDocument, SignatureBlock};
use super::{ExportError, ExportResult};
use crate::config::CoreConfig;

const COLOR_TEXT: (u8, u8, u8) = (33, 33, 33);
const COLOR_MUTED: (u8, u8, u8) = (110, 110, 110);
const COLOR_ACCENT: (u8, u8, u8) = (0, 105, 92);

fn rgb(color: (u8, u8, u8)) -> Color {
    Color::Rgb(Rgb::new(
        color.0 as f32 / 255.0,
        color.1 as f32 / 255.0,
        color.2 as f32 / 255.0,
        None,
    ))
}

/// Fonts and geometry shared by every page.
struct Painter {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    left: f32,
    right: f32,
    top: f32,
    bottom: f32,
    line: f32,
    body_pt: f32,
}

impl Painter {
    fn text(&self, layer: &PdfLayerReference, text: &str, size: f32, x: f32, y: f32, bold: bool, color: (u8, u8, u8)) {
        let font = if bold { &self.bold } else { &self.regular };
        layer.set_fill_color(rgb(color));
        layer.use_text(text, size, Mm(x), Mm(y), font);
    }

    fn rule(&self, layer: &PdfLayerReference, y: f32) {
        layer.set_outline_color(rgb(COLOR_MUTED));
        layer.set_outline_thickness(0.5);
        layer.add_line(Line {
            points: vec![
                (Point::new(Mm(self.left), Mm(y)), false),
                (Point::new(Mm(self.right), Mm(y)), false),
            ],
            is_closed: false,
        });
    }

    /// Header, title and info block. Returns the y where the body starts.
    fn page_top(&self, layer: &PdfLayerReference, doc: &PrescriptionDocument) -> f32 {
        let mut y = self.top;

        self.text(layer, &doc.header.name, self.body_pt + 4.0, self.left, y, true, COLOR_ACCENT);
        y -= self.line;
        if !doc.header.contact.is_empty() {
            self.text(layer, &doc.header.contact, self.body_pt - 2.0, self.left, y, false, COLOR_MUTED);
        }
        y -= self.line;
        self.rule(layer, y + self.line * 0.4);
        y -= self.line;

        let center = (self.left + self.right) / 2.0;
        let title_x = center - doc.title.chars().count() as f32 * 1.4;
        self.text(layer, &doc.title, self.body_pt + 4.0, title_x, y, true, COLOR_TEXT);
        y -= self.line * 2.0;

        self.info(layer, &doc.info, y);
        y - self.line * doc.info.line_count() as f32
    }

    fn info(&self, layer: &PdfLayerReference, info: &InfoBlock, y: f32) {
        let column = (self.right - self.left) / 2.0;
        for (offset, rows) in [(0.0, &info.patient), (column, &info.tutor)] {
            let mut row_y = y;
            for (label, value) in rows {
                let x = self.left + offset;
                self.text(layer, &format!("{}:", label), self.body_pt, x, row_y, true, COLOR_TEXT);
                self.text(layer, value, self.body_pt, x + 22.0, row_y, false, COLOR_TEXT);
                row_y -= self.line;
            }
        }
    }

    fn medication(&self, layer: &PdfLayerReference, block: &MedicationBlock, mut y: f32) -> f32 {
        self.text(layer, &block.heading(), self.body_pt + 1.0, self.left, y, true, COLOR_TEXT);

        // Badges right-aligned on the heading line
        if !block.continued {
            let mut badges = vec![block.pharmacy_badge.clone()];
            if let Some(quantity) = &block.quantity_badge {
                badges.push(quantity.clone());
            }
            let badge_text = format!("[{}]", badges.join("] ["));
            let badge_x = self.right - badge_text.chars().count() as f32 * 1.5;
            self.text(layer, &badge_text, self.body_pt - 2.0, badge_x, y, false, COLOR_ACCENT);
        }
        y -= self.line;

        for line in &block.instruction_lines {
            self.text(layer, line, self.body_pt, self.left + 5.0, y, false, COLOR_TEXT);
            y -= self.line;
        }
        for line in &block.note_lines {
            self.text(layer, line, self.body_pt - 1.0, self.left + 5.0, y, false, COLOR_MUTED);
            y -= self.line;
        }
        y - self.line
    }

    fn body(&self, layer: &PdfLayerReference, page: &Page, mut y: f32) {
        for block in &page.blocks {
            match block {
                Block::GroupTitle(title) => {
                    self.text(layer, &title.to_uppercase(), self.body_pt, self.left, y, true, COLOR_ACCENT);
                    y -= self.line * 2.0;
                }
                Block::Medication(medication) => {
                    y = self.medication(layer, medication, y);
                }
                Block::Observations { lines, continued } => {
                    let title = if *continued {
                        "Observações gerais (continuação)"
                    } else {
                        "Observações gerais"
                    };
                    self.text(layer, title, self.body_pt, self.left, y, true, COLOR_TEXT);
                    y -= self.line;
                    for line in lines {
                        self.text(layer, line, self.body_pt, self.left, y, false, COLOR_TEXT);
                        y -= self.line;
                    }
                    y -= self.line;
                }
            }
        }
    }

    fn signature(&self, layer: &PdfLayerReference, signature: &SignatureBlock) {
        let center = (self.left + self.right) / 2.0;
        let mut y = self.bottom + self.line * 5.0;

        self.text(layer, &signature.date_line, self.body_pt, self.left, y, false, COLOR_TEXT);
        y -= self.line * 2.0;

        layer.set_outline_color(rgb(COLOR_TEXT));
        layer.set_outline_thickness(0.5);
        layer.add_line(Line {
            points: vec![
                (Point::new(Mm(center - 35.0), Mm(y)), false),
                (Point::new(Mm(center + 35.0), Mm(y)), false),
            ],
            is_closed: false,
        });
        y -= self.line;

        for line in [&signature.veterinarian, &signature.crmv] {
            if !line.is_empty() {
                let x = center - line.chars().count() as f32 * 0.9;
                self.text(layer, line, self.body_pt, x, y, false, COLOR_TEXT);
                y -= self.line;
            }
        }
    }

    fn footer(&self, layer: &PdfLayerReference, page: &Page) {
        let text = format!("Página {} de {}", page.number, page.total);
        let x = self.right - text.chars().count() as f32 * 1.5;
        self.text(layer, &text, self.body_pt - 2.0, x, self.bottom - self.line, false, COLOR_MUTED);
    }
}

/// Render the document to PDF bytes.
pub fn render_pdf(doc: &PrescriptionDocument, config: &CoreConfig) -> ExportResult<Vec<u8>> {
    let page_cfg = &config.page;
    let width = Mm(page_cfg.width_mm as f32);
    let height = Mm(page_cfg.height_mm as f32);

    let (pdf, first_page, first_layer) = PdfDocument::new(doc.title.as_str(), width, height, "Layer 1");
    let painter = Painter {
        regular: pdf
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ExportError::Pdf(format!("font error: {e}")))?,
        bold: pdf
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ExportError::Pdf(format!("font error: {e}")))?,
        left: page_cfg.margin_mm as f32,
        right: (page_cfg.width_mm - page_cfg.margin_mm) as f32,
        top: (page_cfg.height_mm - page_cfg.margin_mm) as f32,
        bottom: page_cfg.margin_mm as f32,
        line: page_cfg.line_height_mm as f32,
        body_pt: page_cfg.body_font_pt as f32,
    };

    for (index, page) in doc.pages.iter().enumerate() {
        let (page_index, layer_index) = if index == 0 {
            (first_page, first_layer)
        } else {
            pdf.add_page(width, height, format!("Página {}", page.number))
        };
        let layer = pdf.get_page(page_index).get_layer(layer_index);

        let body_top = painter.page_top(&layer, doc);
        painter.body(&layer, page, body_top);
        if let Some(signature) = &page.signature {
            painter.signature(&layer, signature);
        }
        painter.footer(&layer, page);
    }

    let mut buf = BufWriter::new(Vec::new());
    pdf.save(&mut buf)
        .map_err(|e| ExportError::Pdf(format!("save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| ExportError::Pdf(format!("buffer error: {e}")))
}
