use super::{Block, Report, ReportRenderer, TEXT_FILE_NAME, TEXT_MEDIA_TYPE};

/// Plain UTF-8 rendering, one line per report line.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextRenderer;

impl ReportRenderer for TextRenderer {
    fn file_name(&self) -> &'static str {
        TEXT_FILE_NAME
    }

    fn media_type(&self) -> &'static str {
        TEXT_MEDIA_TYPE
    }

    fn render(&self, report: &Report) -> Vec<u8> {
        let mut out = String::new();
        for block in report.blocks() {
            match block {
                Block::Title(t) => {
                    out.push_str(t);
                    out.push('\n');
                    out.push_str(&"=".repeat(t.chars().count()));
                    out.push('\n');
                }
                Block::Heading(h) => {
                    out.push_str(h);
                    out.push('\n');
                    out.push_str(&"-".repeat(h.chars().count()));
                    out.push('\n');
                }
                Block::Paragraph(lines) => {
                    for line in lines {
                        out.push_str(line);
                        out.push('\n');
                    }
                }
                Block::Spacer => out.push('\n'),
            }
        }
        out.into_bytes()
    }
}
