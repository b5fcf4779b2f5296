//! Minimal PDF 1.4 writer for the report.
//!
//! Uses the standard Type1 Helvetica fonts (no embedding) with
//! WinAnsiEncoding, so output stays 7-bit: Latin-1 characters are written as
//! octal escapes and anything else is replaced. Lines are measured with the
//! Helvetica AFM advance widths, so wrapping and centring match what a
//! viewer draws.

use super::{Block, PDF_FILE_NAME, PDF_MEDIA_TYPE, Report, ReportRenderer};

/// A4 portrait, in points.
const PAGE_WIDTH: f64 = 595.0;
const PAGE_HEIGHT: f64 = 842.0;
const MARGIN: f64 = 50.0;

const TITLE_SIZE: f64 = 14.0;
const HEADING_SIZE: f64 = 12.0;
const BODY_SIZE: f64 = 11.0;
const LINE_SPACING: f64 = 1.4;
const SPACER_HEIGHT: f64 = 10.0;

/// Horizontal space between the margins.
const USABLE_WIDTH: f64 = PAGE_WIDTH - 2.0 * MARGIN;

/// Helvetica advance widths for `' '..='~'`, in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

/// Helvetica-Bold advance widths for `' '..='~'`, in 1/1000 em.
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // '0'..'?'
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 'P'..'_'
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // '`'..'o'
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // 'p'..'~'
];

/// Upper bound for Latin-1 lowercase letters (U+00DF..U+00FF) other than
/// `æ`, whose widths are not tabulated here.
const LATIN1_LOWER_WIDTH: u16 = 611;
/// Upper bound for every other Latin-1 glyph.
const LATIN1_OTHER_WIDTH: u16 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(self) -> &'static str {
        match self {
            Self::Regular => "F1",
            Self::Bold => "F2",
        }
    }

    /// Advance width of one glyph as written to the page, in 1/1000 em.
    fn glyph_width(self, c: char) -> u16 {
        let table = match self {
            Self::Regular => &HELVETICA_WIDTHS,
            Self::Bold => &HELVETICA_BOLD_WIDTHS,
        };
        let c = win_ansi(c);
        match c {
            ' '..='~' => table[c as usize - 0x20],
            '\u{DF}'..='\u{FF}' if c != '\u{E6}' => LATIN1_LOWER_WIDTH,
            _ => LATIN1_OTHER_WIDTH,
        }
    }

    /// Width of `text` set at `size`, in points.
    fn text_width(self, text: &str, size: f64) -> f64 {
        let units: u32 = text.chars().map(|c| u32::from(self.glyph_width(c))).sum();
        f64::from(units) * size / 1000.0
    }
}

#[derive(Debug, Clone)]
struct PlacedLine {
    text: String,
    font: Font,
    size: f64,
    x: f64,
    y: f64,
}

/// Paginated A4 PDF rendering.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfRenderer;

impl ReportRenderer for PdfRenderer {
    fn file_name(&self) -> &'static str {
        PDF_FILE_NAME
    }

    fn media_type(&self) -> &'static str {
        PDF_MEDIA_TYPE
    }

    fn render(&self, report: &Report) -> Vec<u8> {
        let pages = self.layout(report);
        assemble(&pages).into_bytes()
    }
}

impl PdfRenderer {
    /// Positions every line, starting a new page when the bottom margin is hit.
    fn layout(&self, report: &Report) -> Vec<Vec<PlacedLine>> {
        let mut cursor = Cursor::new();
        for block in report.blocks() {
            match block {
                Block::Title(t) => cursor.place_wrapped(t, Font::Bold, TITLE_SIZE, true),
                Block::Heading(h) => cursor.place_wrapped(h, Font::Bold, HEADING_SIZE, false),
                Block::Paragraph(lines) => {
                    for line in lines {
                        cursor.place_wrapped(line, Font::Regular, BODY_SIZE, false);
                    }
                }
                Block::Spacer => cursor.gap(SPACER_HEIGHT),
            }
        }
        cursor.pages
    }
}

struct Cursor {
    pages: Vec<Vec<PlacedLine>>,
    y: f64,
}

impl Cursor {
    fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn page_has_content(&self) -> bool {
        self.pages.last().is_some_and(|p| !p.is_empty())
    }

    fn place_wrapped(&mut self, text: &str, font: Font, size: f64, centered: bool) {
        for line in wrap(text, font, size, USABLE_WIDTH) {
            self.place(line, font, size, centered);
        }
    }

    fn place(&mut self, text: String, font: Font, size: f64, centered: bool) {
        let height = size * LINE_SPACING;
        if self.y - height < MARGIN && self.page_has_content() {
            self.pages.push(Vec::new());
            self.y = PAGE_HEIGHT - MARGIN;
        }
        self.y -= height;
        let x = if centered {
            let width = font.text_width(&text, size);
            ((PAGE_WIDTH - width) / 2.0).max(MARGIN)
        } else {
            MARGIN
        };
        let y = self.y;
        if let Some(page) = self.pages.last_mut() {
            page.push(PlacedLine {
                text,
                font,
                size,
                x,
                y,
            });
        }
    }

    /// Vertical gap; dropped at the top of a fresh page.
    fn gap(&mut self, height: f64) {
        if self.page_has_content() {
            self.y -= height;
        }
    }
}

/// Greedy word wrap to `max_width` points; words wider than a line are
/// split between glyphs. A single glyph always gets a line of its own.
fn wrap(line: &str, font: Font, size: f64, max_width: f64) -> Vec<String> {
    let width = |s: &str| font.text_width(s, size);
    let mut out = Vec::new();
    let mut current = String::new();

    for word in line.split_whitespace() {
        let mut word = word.to_string();
        if width(&word) > max_width {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            let mut piece = String::new();
            for c in word.chars() {
                piece.push(c);
                if width(&piece) > max_width && piece.chars().count() > 1 {
                    piece.pop();
                    out.push(std::mem::replace(&mut piece, c.to_string()));
                }
            }
            word = piece;
        }
        if !current.is_empty() && width(&current) + width(" ") + width(&word) > max_width {
            out.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }
    if !current.is_empty() || out.is_empty() {
        out.push(current);
    }
    out
}

/// Glyph written for `c` under WinAnsiEncoding.
fn win_ansi(c: char) -> char {
    match c {
        '\t' => ' ',
        ' '..='~' | '\u{A0}'..='\u{FF}' => c,
        '\u{2018}' | '\u{2019}' => '\'',
        '\u{201C}' | '\u{201D}' => '"',
        '\u{2013}' | '\u{2014}' => '-',
        _ => '?',
    }
}

/// Escapes text for a PDF literal string in WinAnsiEncoding.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars().map(win_ansi) {
        match c {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            ' '..='~' => out.push(c),
            _ => out.push_str(&format!("\\{:03o}", u32::from(c))),
        }
    }
    out
}

fn content_stream(lines: &[PlacedLine]) -> String {
    lines
        .iter()
        .map(|l| {
            format!(
                "BT /{} {:.0} Tf {:.2} {:.2} Td ({}) Tj ET",
                l.font.resource(),
                l.size,
                l.x,
                l.y,
                escape(&l.text)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Serialises pages into a complete PDF file.
///
/// Object layout: 1 catalog, 2 page tree, 3 regular font, 4 bold font, then
/// a (page, content) pair per page.
fn assemble(pages: &[Vec<PlacedLine>]) -> String {
    let page_obj = |i: usize| 5 + 2 * i;
    let kids = (0..pages.len())
        .map(|i| format!("{} 0 R", page_obj(i)))
        .collect::<Vec<_>>()
        .join(" ");

    let mut objects = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        format!("<< /Type /Pages /Kids [{kids}] /Count {} >>", pages.len()),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>"
            .to_string(),
    ];
    for (i, lines) in pages.iter().enumerate() {
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH:.0} {PAGE_HEIGHT:.0}] \
             /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
            page_obj(i) + 1
        ));
        let stream = content_stream(lines);
        objects.push(format!(
            "<< /Length {} >>\nstream\n{stream}\nendstream",
            stream.len()
        ));
    }

    let mut out = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.push_str(&format!("{} 0 obj\n{body}\nendobj\n", i + 1));
    }

    let xref_offset = out.len();
    out.push_str(&format!("xref\n0 {}\n", objects.len() + 1));
    out.push_str("0000000000 65535 f \n");
    for off in offsets {
        out.push_str(&format!("{off:010} 00000 n \n"));
    }
    out.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
        objects.len() + 1
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::{Conversation, Exchange};
    use crate::hydro::PlantParameters;

    fn render(conv: &Conversation) -> String {
        let plant = PlantParameters::default();
        let report = Report::new(&plant, &plant.estimate(), conv);
        String::from_utf8(PdfRenderer::default().render(&report)).expect("PDF output is ASCII")
    }

    fn long_conversation(n: usize) -> Conversation {
        let mut conv = Conversation::new();
        for i in 0..n {
            conv.push(Exchange {
                question: format!("Question number {i}?"),
                reply: "Reduce leakage first, then size the turbine. ".repeat(6),
            });
        }
        conv
    }

    #[test]
    fn has_header_trailer_and_text() {
        let pdf = render(&Conversation::new());
        assert!(pdf.starts_with("%PDF-1.4\n"));
        assert!(pdf.ends_with("%%EOF\n"));
        assert!(pdf.contains("(HydroGPT technical report) Tj"));
        assert!(pdf.contains("(Estimated power: 22.52 kW) Tj"));
        assert!(pdf.contains("/Count 1"));
    }

    #[test]
    fn xref_offsets_point_at_objects() {
        let pdf = render(&long_conversation(3));
        let startxref = pdf
            .rsplit("startxref\n")
            .next()
            .and_then(|s| s.lines().next())
            .and_then(|s| s.parse::<usize>().ok())
            .expect("startxref offset");
        assert!(pdf[startxref..].starts_with("xref\n"));

        let entries: Vec<usize> = pdf[startxref..]
            .lines()
            .filter(|l| l.ends_with(" 00000 n "))
            .map(|l| l[..10].parse().expect("10-digit offset"))
            .collect();
        assert!(!entries.is_empty());
        for (i, off) in entries.iter().enumerate() {
            assert!(
                pdf[*off..].starts_with(&format!("{} 0 obj\n", i + 1)),
                "object {} misplaced",
                i + 1
            );
        }
    }

    #[test]
    fn stream_length_matches_content() {
        let pdf = render(&Conversation::new());
        let after = pdf.split("<< /Length ").nth(1).expect("content stream");
        let (len, rest) = after.split_once(" >>\nstream\n").expect("stream header");
        let len: usize = len.parse().expect("numeric length");
        assert!(rest[len..].starts_with("\nendstream"));
    }

    #[test]
    fn long_transcript_spans_pages() {
        let pdf = render(&long_conversation(40));
        let count: usize = pdf
            .split("/Count ")
            .nth(1)
            .and_then(|s| s.split_whitespace().next())
            .and_then(|s| s.parse().ok())
            .expect("page count");
        assert!(count > 1, "expected several pages, got {count}");
        assert_eq!(pdf.matches("/Type /Page ").count(), count);
    }

    #[test]
    fn escape_handles_delimiters_and_latin1() {
        assert_eq!(escape("a (b) \\ c"), "a \\(b\\) \\\\ c");
        assert_eq!(escape("perdite è"), "perdite \\350");
        assert_eq!(escape("l’acqua – ok"), "l'acqua - ok");
        assert_eq!(escape("水"), "?");
    }

    #[test]
    fn glyph_widths_follow_helvetica_metrics() {
        assert_eq!(Font::Regular.glyph_width(' '), 278);
        assert_eq!(Font::Regular.glyph_width('W'), 944);
        assert_eq!(Font::Regular.glyph_width('i'), 222);
        assert_eq!(Font::Bold.glyph_width('i'), 278);
        assert_eq!(Font::Regular.glyph_width('~'), 584);
        assert_eq!(Font::Regular.glyph_width('\u{2019}'), 191);
        assert!((Font::Regular.text_width("WW", 10.0) - 18.88).abs() < 1e-9);
    }

    #[test]
    fn wrap_measures_glyph_widths() {
        // "alpha beta" is 46.7 pt at 10 pt; adding " gamma" does not fit in 50.
        let lines = wrap("alpha beta gamma delta", Font::Regular, 10.0, 50.0);
        assert_eq!(lines, ["alpha beta", "gamma", "delta"]);
        assert!(
            wrap(&"W".repeat(25), Font::Regular, 10.0, 50.0)
                .iter()
                .all(|l| Font::Regular.text_width(l, 10.0) <= 50.0)
        );
        assert_eq!(wrap("", Font::Regular, 10.0, 50.0), [""]);
    }

    #[test]
    fn placed_lines_stay_inside_margins() {
        let mut conv = Conversation::new();
        conv.push(Exchange {
            question: "WHY IS THE WATER HAMMER SO LOUD AT THE WWTP INTAKE?".repeat(3),
            reply: format!(
                "{} {} {}",
                "W".repeat(200),
                "MMMM WWWW ÆÆÆÆ ".repeat(30),
                "perdite è accettabili ".repeat(20)
            ),
        });
        let plant = PlantParameters::default();
        let report = Report::new(&plant, &plant.estimate(), &conv);

        let pages = PdfRenderer.layout(&report);
        let lines: Vec<&PlacedLine> = pages.iter().flatten().collect();
        assert!(lines.len() > 10);
        for line in lines {
            let width = line.font.text_width(&line.text, line.size);
            assert!(width <= USABLE_WIDTH, "{width} pt: {:?}", line.text);
            assert!(line.x >= MARGIN);
            assert!(line.x + width <= PAGE_WIDTH - MARGIN + 1e-9);
        }
    }

    #[test]
    fn title_is_centred_on_its_measured_width() {
        let plant = PlantParameters::default();
        let report = Report::new(&plant, &plant.estimate(), &Conversation::new());
        let pages = PdfRenderer.layout(&report);
        let title = &pages[0][0];
        let width = Font::Bold.text_width(&title.text, TITLE_SIZE);
        assert!((title.x + width / 2.0 - PAGE_WIDTH / 2.0).abs() < 1e-9);
    }
}
