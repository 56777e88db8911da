//! PDF report generation.
//!
//! This module lays out the sales report with genpdf: a title, the
//! generation date, one paragraph per summary line and a framed table of
//! all records.

use crate::error::ReportError;
use crate::models::ReportTable;
use chrono::NaiveDate;
use genpdf::elements::{Break, FrameCellDecorator, Paragraph, TableLayout};
use genpdf::fonts::{FontData, FontFamily};
use genpdf::style::Style;
use genpdf::{Alignment, Element, SimplePageDecorator};
use std::path::Path;
use tracing::debug;

const PAGE_MARGIN_MM: i32 = 15;
const BODY_FONT_SIZE: u8 = 10;
const TITLE_FONT_SIZE: u8 = 18;
const TABLE_COLUMN_WEIGHTS: [usize; 4] = [1, 5, 2, 2];

/// Everything that goes into the PDF.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    pub title: String,
    pub generated_on: NaiveDate,
    pub summary: Vec<String>,
    pub table: ReportTable,
}

impl ReportDocument {
    /// Create a document dated today.
    pub fn new(title: impl Into<String>, summary: Vec<String>, table: ReportTable) -> Self {
        Self {
            title: title.into(),
            generated_on: chrono::Local::now().date_naive(),
            summary,
            table,
        }
    }
}

fn render_error(err: genpdf::error::Error) -> ReportError {
    ReportError::Render(err.to_string())
}

fn build_table(table: &ReportTable) -> Result<TableLayout, ReportError> {
    let mut layout = TableLayout::new(TABLE_COLUMN_WEIGHTS.to_vec());
    layout.set_cell_decorator(FrameCellDecorator::new(true, true, false));

    for (index, cells) in table.to_cells().into_iter().enumerate() {
        let mut row = layout.row();
        for cell in cells {
            let paragraph = Paragraph::new(cell).padded(1);
            if index == 0 {
                row.push_element(paragraph.styled(Style::new().bold()));
            } else {
                row.push_element(paragraph);
            }
        }
        row.push().map_err(render_error)?;
    }

    Ok(layout)
}

/// Render `report` to PDF bytes using `fonts`.
pub fn render_pdf(
    report: &ReportDocument,
    fonts: FontFamily<FontData>,
) -> Result<Vec<u8>, ReportError> {
    let mut document = genpdf::Document::new(fonts);
    document.set_title(report.title.clone());
    document.set_minimal_conformance();
    document.set_font_size(BODY_FONT_SIZE);
    document.set_line_spacing(1.25);

    let mut decorator = SimplePageDecorator::new();
    decorator.set_margins(PAGE_MARGIN_MM);
    document.set_page_decorator(decorator);

    document.push(
        Paragraph::new(report.title.clone())
            .aligned(Alignment::Center)
            .styled(Style::new().bold().with_font_size(TITLE_FONT_SIZE)),
    );
    document.push(
        Paragraph::new(format!("Generated on {}", report.generated_on.format("%Y-%m-%d")))
            .aligned(Alignment::Center)
            .styled(Style::new().italic()),
    );
    document.push(Break::new(1));

    for line in &report.summary {
        document.push(Paragraph::new(line.clone()));
    }
    document.push(Break::new(1));

    document.push(build_table(&report.table)?);

    let mut bytes = Vec::new();
    document.render(&mut bytes).map_err(render_error)?;
    debug!("Rendered PDF report ({} bytes)", bytes.len());

    Ok(bytes)
}

/// Write rendered PDF bytes to `path`.
pub fn write_pdf(path: &Path, bytes: &[u8]) -> Result<(), ReportError> {
    std::fs::write(path, bytes).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}
