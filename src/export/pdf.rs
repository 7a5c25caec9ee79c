//! Printable report: a title, the header line, then one line per row.

use crate::table::RatingsTable;
use anyhow::{anyhow, Context, Result};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument};
use std::{fs::File, io::BufWriter, path::Path};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 10.0;
const BOTTOM_MARGIN: f32 = 15.0;
const CELL_WIDTH: f32 = 200.0;
/// Horizontal padding inside a left-aligned cell.
const CELL_PADDING: f32 = 1.0;
const PT_TO_MM: f32 = 0.3528;
/// Average Helvetica glyph advance, in em.
const AVG_GLYPH_EM: f32 = 0.5;

const SEPARATOR: &str = " | ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Regular,
    Bold,
}

/// A single line of text at its final position. Coordinates are in mm from
/// the top-left corner of the page.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub face: Face,
    pub size_pt: f32,
    pub x: f32,
    pub baseline: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Center,
}

/// Top-to-bottom line placement with an automatic page break.
struct Cursor {
    pages: Vec<Vec<PlacedLine>>,
    y: f32,
}

impl Cursor {
    fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            y: MARGIN,
        }
    }

    fn cell(&mut self, height: f32, text: String, face: Face, size_pt: f32, align: Align) {
        if self.y + height > PAGE_HEIGHT - BOTTOM_MARGIN {
            self.pages.push(Vec::new());
            self.y = MARGIN;
        }
        let x = match align {
            Align::Left => MARGIN + CELL_PADDING,
            Align::Center => MARGIN + ((CELL_WIDTH - text_width(&text, size_pt)) / 2.0).max(0.0),
        };
        // vertically centred in the cell
        let baseline = self.y + height / 2.0 + 0.3 * size_pt * PT_TO_MM;
        if let Some(page) = self.pages.last_mut() {
            page.push(PlacedLine {
                text,
                face,
                size_pt,
                x,
                baseline,
            });
        }
        self.y += height;
    }

    fn gap(&mut self, height: f32) {
        self.y += height;
    }
}

fn text_width(text: &str, size_pt: f32) -> f32 {
    text.chars().count() as f32 * size_pt * PT_TO_MM * AVG_GLYPH_EM
}

/// Lay the report out into pages of positioned lines.
pub fn layout(title: &str, table: &RatingsTable) -> Vec<Vec<PlacedLine>> {
    let mut cursor = Cursor::new();

    cursor.cell(10.0, title.to_string(), Face::Bold, 16.0, Align::Center);
    cursor.gap(10.0);

    cursor.cell(10.0, table.headers.join(SEPARATOR), Face::Bold, 12.0, Align::Left);
    cursor.gap(5.0);

    for row in &table.rows {
        cursor.cell(8.0, row.join(SEPARATOR), Face::Regular, 10.0, Align::Left);
    }

    cursor.pages
}

/// Render `table` as an A4 PDF at `path`.
pub fn write(path: &Path, title: &str, table: &RatingsTable) -> Result<()> {
    let pages = layout(title, table);

    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| anyhow!("loading Helvetica: {e:?}"))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| anyhow!("loading Helvetica-Bold: {e:?}"))?;

    for (n, lines) in pages.iter().enumerate() {
        let layer = if n == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            doc.get_page(page).get_layer(layer)
        };
        for line in lines {
            let font: &IndirectFontRef = match line.face {
                Face::Regular => &regular,
                Face::Bold => &bold,
            };
            layer.use_text(
                line.text.as_str(),
                line.size_pt,
                Mm(line.x),
                Mm(PAGE_HEIGHT - line.baseline),
                font,
            );
        }
    }

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|e| anyhow!("writing {}: {e:?}", path.display()))?;
    Ok(())
}
