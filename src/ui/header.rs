use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph};

use crate::format::{format_elapsed, format_ratio};
use crate::system::snapshot::SystemSnapshot;
use crate::ui::theme::Theme;

pub const PLACEHOLDER: &str = "n/a";

pub fn render(frame: &mut Frame, area: Rect, snapshot: &SystemSnapshot, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
        ])
        .split(area);

    render_host(frame, chunks[0], snapshot, theme);
    render_gauge(frame, chunks[1], " CPU ", snapshot.cpu.as_ref().map(|c| c.aggregate), theme);
    render_gauge(frame, chunks[2], " MEM ", snapshot.memory_utilization, theme);
}

fn render_host(frame: &mut Frame, area: Rect, snapshot: &SystemSnapshot, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let secondary = Style::default().fg(theme.text_secondary);
    let brand = Line::from(vec![
        Span::styled(
            " procpulse ",
            Style::default()
                .fg(theme.header_accent_fg)
                .bg(theme.header_accent_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(or_placeholder(snapshot.os_name.clone()), secondary),
        Span::raw("  "),
        Span::styled(or_placeholder(snapshot.kernel.clone()), secondary),
    ]);
    let counts = Line::from(vec![
        Span::styled(
            format!(
                " Up {}",
                or_placeholder(snapshot.uptime_secs.map(format_elapsed))
            ),
            secondary,
        ),
        Span::raw("  "),
        Span::styled(
            format!(
                "Procs {} ({} running)",
                or_placeholder(snapshot.total_processes.map(|n| n.to_string())),
                or_placeholder(snapshot.running_processes.map(|n| n.to_string())),
            ),
            secondary,
        ),
    ]);

    frame.render_widget(Paragraph::new(vec![brand, counts]), inner);
}

fn render_gauge(frame: &mut Frame, area: Rect, title: &str, ratio: Option<f64>, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            title.to_string(),
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ));

    let filled = ratio.map_or(theme.gauge_filled, |r| theme.heat(r));
    let gauge = Gauge::default()
        .block(block)
        .gauge_style(Style::default().fg(filled).bg(theme.gauge_unfilled))
        .ratio(ratio.unwrap_or(0.0).clamp(0.0, 1.0))
        .label(or_placeholder(ratio.map(format_ratio)));

    frame.render_widget(gauge, area);
}

/// One line of per-core utilization, `cpu0 12.5%  cpu1 n/a ...`.
pub fn render_cores(frame: &mut Frame, area: Rect, snapshot: &SystemSnapshot, theme: &Theme) {
    let Some(cpu) = &snapshot.cpu else {
        let line = Line::from(Span::styled(
            format!(" cores {PLACEHOLDER}"),
            Style::default().fg(theme.text_placeholder),
        ));
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    let mut spans = vec![Span::raw(" ")];
    for (core, ratio) in &cpu.per_core {
        let (text, color) = match ratio {
            Some(r) => (format_ratio(*r), theme.heat(*r)),
            None => (PLACEHOLDER.to_string(), theme.text_placeholder),
        };
        spans.push(Span::styled(
            format!("cpu{core} "),
            Style::default().fg(theme.text_secondary),
        ));
        spans.push(Span::styled(text, Style::default().fg(color)));
        spans.push(Span::raw("  "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

pub fn or_placeholder(value: Option<String>) -> String {
    value.unwrap_or_else(|| PLACEHOLDER.to_string())
}
