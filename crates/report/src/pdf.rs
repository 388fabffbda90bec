//! Drawing a [`ReportLayout`] with `printpdf`.

use crate::layout::{Block, ReportLayout};
use crate::{ReportError, ReportResult};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Rect, Rgb,
};
use std::io::BufWriter;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN_X: f32 = 15.0;
const BANNER_X: f32 = 10.0;
const TOP: f32 = 277.0;
const BOTTOM: f32 = 20.0;
const LINE: f32 = 7.0;
const GAP: f32 = 10.0;
const LAYER_NAME: &str = "Layer 1";
const PT_TO_MM: f32 = 25.4 / 72.0;
/// Average Helvetica advance width as a fraction of the font size. Builtin fonts carry no
/// metrics in printpdf, so centring is approximate.
const HELVETICA_ADVANCE: f32 = 0.5;
const HELVETICA_BOLD_ADVANCE: f32 = 0.55;

/// Light red used behind the disclaimer.
const DISCLAIMER_FILL: (f32, f32, f32) = (1.0, 0.953, 0.953);
/// Slightly stronger red used behind urgent warnings.
const URGENT_FILL: (f32, f32, f32) = (0.996, 0.949, 0.949);

/// Render the layout to PDF bytes.
pub fn render_pdf(layout: &ReportLayout) -> ReportResult<Vec<u8>> {
    let (doc, page, layer) = PdfDocument::new(
        &layout.title,
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        LAYER_NAME,
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ReportError::Pdf(format!("font error: {e}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ReportError::Pdf(format!("font error: {e}")))?;

    let mut pen = Pen {
        layer: doc.get_page(page).get_layer(layer),
        doc: &doc,
        y: TOP,
        pages: 1,
        regular,
        bold,
    };

    pen.centered(&layout.title, 20.0, &FontWeight::Bold);
    pen.advance(15.0);
    pen.centered(&layout.generated_on, 12.0, &FontWeight::Regular);
    pen.advance(20.0);

    for block in &layout.blocks {
        pen.block(block);
    }

    tracing::debug!("Rendered report with {} page(s)", pen.pages);

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ReportError::Pdf(format!("save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| ReportError::Pdf(format!("buffer error: {e}")))
}

enum FontWeight {
    Regular,
    Bold,
}

/// Left edge that centres `text` on the page, never left of the margin.
fn centered_x(text: &str, size: f32, weight: &FontWeight) -> f32 {
    let advance = match weight {
        FontWeight::Regular => HELVETICA_ADVANCE,
        FontWeight::Bold => HELVETICA_BOLD_ADVANCE,
    };
    let width = text.chars().count() as f32 * size * advance * PT_TO_MM;
    ((PAGE_WIDTH - width) / 2.0).max(MARGIN_X)
}

/// Drawing cursor. `y` is the baseline of the next line, in millimetres from the page bottom.
struct Pen<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
    pages: usize,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Pen<'_> {
    fn block(&mut self, block: &Block) {
        match block {
            Block::Disclaimer { heading, lines } => {
                let body = lines.len() as f32 * 5.0;
                self.ensure(body + 25.0);
                self.shade(DISCLAIMER_FILL, body + 20.0);
                self.text(heading, 10.0, &FontWeight::Bold);
                self.advance(7.0);
                for line in lines {
                    self.text(line, 10.0, &FontWeight::Regular);
                    self.advance(5.0);
                }
                self.advance(15.0);
            }
            Block::Section(text) => {
                self.ensure(LINE + 10.0);
                self.text(text, 14.0, &FontWeight::Bold);
                self.advance(10.0);
            }
            Block::Subsection(text) => {
                self.ensure(LINE + 8.0);
                self.text(text, 12.0, &FontWeight::Bold);
                self.advance(8.0);
            }
            Block::Paragraph(lines) | Block::ListItem(lines) => {
                for line in lines {
                    self.ensure(LINE);
                    self.text(line, 11.0, &FontWeight::Regular);
                    self.advance(LINE);
                }
            }
            Block::Gap => self.advance(GAP),
            Block::Urgent { heading, items } => {
                let count: usize = items.iter().map(Vec::len).sum();
                let height = count as f32 * LINE + 15.0;
                self.ensure(height);
                self.shade(URGENT_FILL, height);
                self.text(heading, 12.0, &FontWeight::Bold);
                self.advance(12.0);
                for line in items.iter().flatten() {
                    self.ensure(LINE);
                    self.text(line, 11.0, &FontWeight::Regular);
                    self.advance(LINE);
                }
            }
        }
    }

    fn text(&self, text: &str, size: f32, weight: &FontWeight) {
        self.text_at(text, size, weight, MARGIN_X);
    }

    fn centered(&self, text: &str, size: f32, weight: &FontWeight) {
        self.text_at(text, size, weight, centered_x(text, size, weight));
    }

    fn text_at(&self, text: &str, size: f32, weight: &FontWeight, x: f32) {
        let font = match weight {
            FontWeight::Regular => &self.regular,
            FontWeight::Bold => &self.bold,
        };
        self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
    }

    /// Filled rectangle spanning the banner width, from just above the cursor down `height` mm.
    fn shade(&self, (r, g, b): (f32, f32, f32), height: f32) {
        let top = self.y + 5.0;
        let bottom = (top - height).max(BOTTOM - 10.0);
        self.layer.set_fill_color(Color::Rgb(Rgb::new(r, g, b, None)));
        self.layer.add_rect(Rect::new(
            Mm(BANNER_X),
            Mm(bottom),
            Mm(PAGE_WIDTH - BANNER_X),
            Mm(top),
        ));
        self.layer
            .set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
    }

    fn advance(&mut self, mm: f32) {
        self.y -= mm;
    }

    /// Start a new page unless `needed` millimetres fit above the bottom margin.
    fn ensure(&mut self, needed: f32) {
        if self.y - needed >= BOTTOM || self.y >= TOP {
            return;
        }
        let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER_NAME);
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = TOP;
        self.pages += 1;
    }
}
