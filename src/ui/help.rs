use std::time::Duration;

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::app::App;

/// Overlay with the active view settings on top and the keybinds below.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let settings = [
        ("Sort by", app.sort_key.label().to_string()),
        ("Refresh", format_interval(app.refresh_rate)),
        ("CPU window", format_interval(app.sample_window)),
        ("Theme", theme.name.to_string()),
    ];
    let entries = app.help_entries();

    let label_width = settings
        .iter()
        .map(|(label, _)| label.chars().count())
        .chain(entries.iter().map(|(key, _)| key.chars().count()))
        .max()
        .unwrap_or(0);
    let text_width = settings
        .iter()
        .map(|(_, value)| value.chars().count())
        .chain(entries.iter().map(|(_, desc)| desc.chars().count()))
        .max()
        .unwrap_or(0);

    let mut lines: Vec<Line> = settings
        .iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(
                    format!(" {label:<label_width$}  "),
                    Style::default().fg(theme.text_secondary),
                ),
                Span::styled(
                    value.clone(),
                    Style::default()
                        .fg(theme.text_primary)
                        .add_modifier(Modifier::BOLD),
                ),
            ])
        })
        .collect();
    lines.push(Line::default());
    lines.extend(entries.iter().map(|(key, desc)| {
        Line::from(vec![
            Span::styled(
                format!(" {key:<label_width$}  "),
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(*desc, Style::default().fg(theme.pill_desc_fg)),
        ])
    }));

    // borders + leading space + gap + trailing space
    let width = (label_width + text_width + 6) as u16;
    let overlay = centered_rect(
        width.min(area.width.saturating_sub(4)),
        (lines.len() as u16 + 2).min(area.height.saturating_sub(2)),
        area,
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            " Help ",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ))
        .title_bottom(
            Line::from(Span::styled(
                " Esc closes ",
                Style::default().fg(theme.text_secondary),
            ))
            .right_aligned(),
        );
    let inner = block.inner(overlay);

    frame.render_widget(Clear, overlay);
    frame.render_widget(block, overlay);
    frame.render_widget(
        Paragraph::new(lines).style(Style::default().bg(theme.surface_bg)),
        inner,
    );
}

/// `250 ms`, `1.0 s`, `2.5 s`.
fn format_interval(interval: Duration) -> String {
    if interval < Duration::from_secs(1) {
        format!("{} ms", interval.as_millis())
    } else {
        format!("{:.1} s", interval.as_secs_f64())
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [overlay] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    overlay
}
