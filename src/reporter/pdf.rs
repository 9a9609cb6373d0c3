// file: src/reporter/pdf.rs
// description: low-level PDF layout helper over printpdf
// reference: https://docs.rs/printpdf

use crate::error::{PipelineError, Result};
use printpdf::image_crate::codecs::png::PngDecoder;
use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerIndex, PdfLayerReference, PdfPageIndex,
};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::warn;

const PAGE_WIDTH: f64 = 210.0;
const PAGE_HEIGHT: f64 = 297.0;
const MARGIN: f64 = 20.0;
const BODY_LINE_HEIGHT: f64 = 6.0;
const BODY_WRAP_CHARS: usize = 95;

fn assembly_err(err: impl std::fmt::Display) -> PipelineError {
    PipelineError::ReportAssembly(err.to_string())
}

/// Cursor-based page writer: text flows top to bottom, breaking to a new
/// page when the bottom margin is reached.
pub struct PdfBuilder {
    doc: PdfDocumentReference,
    page: PdfPageIndex,
    layer: PdfLayerIndex,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    cursor: f64,
}

impl PdfBuilder {
    pub fn new(title: &str) -> Result<Self> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH as f32), Mm(PAGE_HEIGHT as f32), "Layer 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(assembly_err)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(assembly_err)?;

        Ok(Self {
            doc,
            page,
            layer,
            regular,
            bold,
            cursor: PAGE_HEIGHT - MARGIN,
        })
    }

    fn layer(&self) -> PdfLayerReference {
        self.doc.get_page(self.page).get_layer(self.layer)
    }

    fn new_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH as f32), Mm(PAGE_HEIGHT as f32), "Layer 1");
        self.page = page;
        self.layer = layer;
        self.cursor = PAGE_HEIGHT - MARGIN;
    }

    fn ensure_space(&mut self, needed: f64) {
        if self.cursor - needed < MARGIN {
            self.new_page();
        }
    }

    pub fn title(&mut self, text: &str) {
        self.ensure_space(14.0);
        self.layer()
            .use_text(text, 24.0, Mm(MARGIN as f32), Mm(self.cursor as f32), &self.bold);
        self.cursor -= 14.0;
    }

    pub fn heading(&mut self, text: &str) {
        self.ensure_space(18.0);
        self.cursor -= 4.0;
        self.layer()
            .use_text(text, 16.0, Mm(MARGIN as f32), Mm(self.cursor as f32), &self.bold);
        self.cursor -= 9.0;
    }

    /// Body text, wrapped to the printable width.
    pub fn paragraph(&mut self, text: &str) {
        for raw_line in text.lines() {
            for line in wrap_line(raw_line, BODY_WRAP_CHARS) {
                self.ensure_space(BODY_LINE_HEIGHT);
                self.layer()
                    .use_text(line, 11.0, Mm(MARGIN as f32), Mm(self.cursor as f32), &self.regular);
                self.cursor -= BODY_LINE_HEIGHT;
            }
        }
    }

    pub fn bullet(&mut self, text: &str) {
        let mut first = true;
        for line in wrap_line(text, BODY_WRAP_CHARS - 4) {
            self.ensure_space(BODY_LINE_HEIGHT);
            let prefix = if first { "- " } else { "  " };
            self.layer().use_text(
                format!("{}{}", prefix, line),
                11.0,
                Mm((MARGIN + 3.0) as f32),
                Mm(self.cursor as f32),
                &self.regular,
            );
            self.cursor -= BODY_LINE_HEIGHT;
            first = false;
        }
    }

    /// Two-column key/value rows.
    pub fn table(&mut self, rows: &[(String, String)]) {
        for (key, value) in rows {
            self.ensure_space(BODY_LINE_HEIGHT + 1.0);
            self.layer()
                .use_text(
                    key,
                    11.0,
                    Mm((MARGIN + 3.0) as f32),
                    Mm(self.cursor as f32),
                    &self.bold,
                );
            self.layer().use_text(
                value,
                11.0,
                Mm((MARGIN + 80.0) as f32),
                Mm(self.cursor as f32),
                &self.regular,
            );
            self.cursor -= BODY_LINE_HEIGHT + 1.0;
        }
    }

    pub fn spacer(&mut self, height: f64) {
        self.cursor -= height;
        if self.cursor < MARGIN {
            self.new_page();
        }
    }

    /// Embeds a PNG, scaled to the printable width.
    ///
    /// An unreadable image is skipped with a warning; chart omission is an
    /// accepted degraded mode and must not abort report assembly.
    pub fn image(&mut self, path: &Path) {
        let embedded = self.try_embed_image(path);
        if let Err(e) = embedded {
            warn!("Skipping chart image {}: {}", path.display(), e);
        }
    }

    fn try_embed_image(&mut self, path: &Path) -> Result<()> {
        let file = File::open(path)?;
        let decoder = PngDecoder::new(BufReader::new(file)).map_err(assembly_err)?;
        let image = Image::try_from(decoder).map_err(assembly_err)?;

        let width_px = image.image.width.0 as f64;
        let height_px = image.image.height.0 as f64;

        // Scale so the image spans the printable width.
        let printable = PAGE_WIDTH - 2.0 * MARGIN;
        let dpi = width_px / (printable / 25.4);
        let height_mm = height_px / dpi * 25.4;

        self.ensure_space(height_mm + 4.0);
        self.cursor -= height_mm;

        image.add_to_layer(
            self.layer(),
            ImageTransform {
                translate_x: Some(Mm(MARGIN as f32)),
                translate_y: Some(Mm(self.cursor as f32)),
                dpi: Some(dpi as f32),
                ..Default::default()
            },
        );
        self.cursor -= 4.0;
        Ok(())
    }

    pub fn save(self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.doc
            .save(&mut BufWriter::new(file))
            .map_err(assembly_err)?;
        Ok(())
    }
}

/// Greedy word wrap; a single over-long word stays on its own line.
fn wrap_line(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(current);
            current = word.to_string();
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
