//! TUI layout and widget rendering.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Wrap};

use super::runtime::{App, Field, Mode};
use super::style;

/// Renders the full TUI frame.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Min(12),   // sidebar + chart
            Constraint::Length(4), // estimate
            Constraint::Length(8), // conversation
            Constraint::Length(3), // question box
            Constraint::Length(1), // footer
        ])
        .split(frame.area());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(38), Constraint::Min(30)])
        .split(chunks[1]);

    render_header(frame, app, chunks[0]);
    render_inputs(frame, app, body[0]);
    render_chart(frame, app, body[1]);
    render_estimate(frame, app, chunks[2]);
    render_conversation(frame, app, chunks[3]);
    render_question(frame, app, chunks[4]);
    render_footer(frame, app, chunks[5]);
}

/// Header bar: title, preset and assistant availability.
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let assistant = if app.has_assistant() {
        "assistant online"
    } else {
        "assistant offline"
    };
    let header = Line::from(vec![
        Span::styled(
            " HYDROGPT ",
            Style::default()
                .fg(style::HEADER_FG)
                .bg(style::HEADER_BG)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            &app.preset_name,
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" │ {assistant} ")),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

/// Sidebar with the four editable plant inputs.
fn render_inputs(frame: &mut Frame, app: &App, area: Rect) {
    let lines: Vec<Line> = Field::ALL
        .iter()
        .map(|&field| {
            let text = format!(" {:<24}{:>9.1} ", field.label(), app.value(field));
            if field == app.selected {
                Line::from(Span::styled(
                    text,
                    Style::default()
                        .fg(style::SELECTED_FG)
                        .bg(style::SELECTED_BG),
                ))
            } else {
                Line::from(text)
            }
        })
        .collect();

    let block = Block::default()
        .title(" Plant data ")
        .borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Power-versus-head curve with the current operating point.
fn render_chart(frame: &mut Frame, app: &App, area: Rect) {
    let curve_data: Vec<(f64, f64)> = app.curve.iter().map(|p| (p.head_m, p.power_kw)).collect();
    let marker_data = [(app.plant.head_m(), app.estimate.power_kw)];

    let all: Vec<(f64, f64)> = curve_data.iter().chain(&marker_data).copied().collect();
    let x_bounds = style::auto_bounds_x(&all);
    let y_bounds = style::auto_bounds_y(&all);

    let datasets = vec![
        Dataset::default()
            .name("Power")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(style::CURVE_COLOR))
            .data(&curve_data),
        Dataset::default()
            .name("Plant")
            .marker(symbols::Marker::Block)
            .style(Style::default().fg(style::MARKER_COLOR))
            .data(&marker_data),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(" Power vs head ")
                .borders(Borders::ALL),
        )
        .x_axis(
            Axis::default()
                .title("head (m)")
                .bounds(x_bounds)
                .labels(vec![
                    format!("{:.0}", x_bounds[0]),
                    format!("{:.0}", x_bounds[1]),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("kW")
                .bounds(y_bounds)
                .labels(vec![
                    format!("{:.1}", y_bounds[0]),
                    format!("{:.1}", y_bounds[1]),
                ]),
        );

    frame.render_widget(chart, area);
}

fn render_estimate(frame: &mut Frame, app: &App, area: Rect) {
    let peak = app
        .curve
        .peak_power_kw()
        .map_or_else(|| "-".to_string(), |kw| format!("{kw:.2} kW"));
    let lines = vec![
        Line::from(Span::styled(
            format!("  Estimated power: {:.2} kW", app.estimate.power_kw),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!(
            "  effective head={:.2} m  efficiency={:.2}  curve peak={peak}",
            app.estimate.effective_head_m,
            app.plant.efficiency(),
        )),
    ];
    let block = Block::default().title(" Estimate ").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Conversation, most recent exchange first.
fn render_conversation(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::new();
    for ex in app.conversation.latest_first() {
        lines.push(Line::from(vec![
            Span::styled("You: ", Style::default().fg(style::USER_FG)),
            Span::raw(ex.question.as_str()),
        ]));
        let mut reply = ex.reply.lines();
        lines.push(Line::from(vec![
            Span::styled("HydroGPT: ", Style::default().fg(style::ASSISTANT_FG)),
            Span::raw(reply.next().unwrap_or_default()),
        ]));
        lines.extend(reply.map(Line::from));
    }
    if lines.is_empty() {
        lines.push(Line::from("  No questions yet. Press i to ask HydroGPT."));
    }

    let block = Block::default()
        .title(" Conversation ")
        .borders(Borders::ALL);
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn render_question(frame: &mut Frame, app: &App, area: Rect) {
    let (title, border) = match app.mode {
        Mode::Input => (
            " Question (Enter: send, Esc: cancel) ",
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Mode::Normal => (" Question ", Style::default().fg(style::FOOTER_FG)),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border);
    frame.render_widget(Paragraph::new(app.input.as_str()).block(block), area);
}

/// Footer with the status line or keybinding hints.
fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let footer = match app.status {
        Some(ref status) => Span::styled(
            format!(" {status}"),
            Style::default().fg(style::STATUS_FG),
        ),
        None => Span::styled(
            " q:Quit  ↑/↓:Field  ←/→:Adjust  1/2/3:Preset  r:Reset  e:Export  i:Ask",
            Style::default().fg(style::FOOTER_FG),
        ),
    };
    frame.render_widget(Paragraph::new(Line::from(footer)), area);
}
