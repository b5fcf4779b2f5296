//! Exportable plant report.
//!
//! [`Report`] holds the content (inputs, estimate, conversation) as a list
//! of layout-free blocks; a [`ReportRenderer`] turns it into bytes.

mod pdf;
mod text;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::assistant::Conversation;
use crate::hydro::{PlantParameters, PowerEstimate};

pub use pdf::PdfRenderer;
pub use text::TextRenderer;

/// Download name of the PDF report.
pub const PDF_FILE_NAME: &str = "hydrogpt_report.pdf";
/// Media type of the PDF report.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";
/// Download name of the plain-text report.
pub const TEXT_FILE_NAME: &str = "hydrogpt_report.txt";
/// Media type of the plain-text report.
pub const TEXT_MEDIA_TYPE: &str = "text/plain; charset=utf-8";

/// Report title line.
pub const REPORT_TITLE: &str = "HydroGPT technical report";
/// Heading above the conversation transcript.
pub const CONVERSATION_HEADING: &str = "Conversation with HydroGPT";

/// Report writing failure.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write report to `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Layout-free unit of report content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Centered document title.
    Title(String),
    /// Section heading.
    Heading(String),
    /// Consecutive lines; renderers wrap long lines.
    Paragraph(Vec<String>),
    /// Vertical gap.
    Spacer,
}

/// Report content: raw inputs, the estimate and the conversation in
/// chronological order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    blocks: Vec<Block>,
}

impl Report {
    /// Assembles the report for one plant.
    pub fn new(
        plant: &PlantParameters,
        estimate: &PowerEstimate,
        conversation: &Conversation,
    ) -> Self {
        let mut blocks = vec![
            Block::Title(REPORT_TITLE.to_string()),
            Block::Spacer,
            Block::Paragraph(vec![
                format!("Average flow rate: {} l/s", plant.flow_rate_lps()),
                format!("Available head: {} m", plant.head_m()),
                format!("Network losses: {}%", plant.loss_percent()),
                format!("Piezometric head: {} m", plant.piezometric_head_m()),
                format!("Estimated power: {:.2} kW", estimate.power_kw),
            ]),
        ];

        if !conversation.is_empty() {
            blocks.push(Block::Spacer);
            blocks.push(Block::Heading(CONVERSATION_HEADING.to_string()));
            for ex in conversation.exchanges() {
                let mut lines = vec![format!("You: {}", ex.question)];
                let mut reply = ex.reply.lines();
                lines.push(format!("HydroGPT: {}", reply.next().unwrap_or("")));
                lines.extend(reply.map(str::to_string));
                blocks.push(Block::Paragraph(lines));
                blocks.push(Block::Spacer);
            }
        }

        Self { blocks }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }
}

/// Turns a [`Report`] into a downloadable artifact.
pub trait ReportRenderer {
    /// Suggested download file name.
    fn file_name(&self) -> &'static str;
    /// Media type of the rendered bytes.
    fn media_type(&self) -> &'static str;
    /// Renders the report in memory.
    fn render(&self, report: &Report) -> Vec<u8>;
}

/// Picks the text renderer for `.txt` paths and the PDF renderer otherwise.
pub fn renderer_for_path(path: &Path) -> Box<dyn ReportRenderer> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("txt") => Box::new(TextRenderer),
        _ => Box::new(PdfRenderer::default()),
    }
}

/// Renders `report` and writes it to `path`.
///
/// # Errors
///
/// Returns [`ReportError::Io`] if the file cannot be written.
pub fn write_report(
    renderer: &dyn ReportRenderer,
    report: &Report,
    path: &Path,
) -> Result<(), ReportError> {
    let bytes = renderer.render(report);
    fs::write(path, &bytes).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        path = %path.display(),
        media_type = renderer.media_type(),
        bytes = bytes.len(),
        "report written"
    );
    Ok(())
}
