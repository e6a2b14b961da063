use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders, Cell, Row, Table, TableState};

use crate::format::{format_elapsed, format_kb, format_ratio, truncate_unicode};
use crate::system::process::{ProcessRow, SortKey};
use crate::ui::header::{PLACEHOLDER, or_placeholder};
use crate::ui::theme::Theme;

pub const COLUMNS: [&str; 6] = ["PID", "USER", "CPU%", "RES", "TIME", "COMMAND"];

const USER_WIDTH: usize = 12;

/// Display text for each column of a row, placeholders for unknown fields.
pub fn row_cells(row: &ProcessRow) -> [String; 6] {
    [
        row.pid.to_string(),
        truncate_unicode(&or_placeholder(row.user.clone()), USER_WIDTH),
        or_placeholder(row.cpu_ratio.map(format_ratio)),
        or_placeholder(row.resident_kb.map(format_kb)),
        or_placeholder(row.uptime_secs.map(format_elapsed)),
        or_placeholder(row.command.clone().filter(|c| !c.is_empty())),
    ]
}

fn sort_column(key: SortKey) -> usize {
    match key {
        SortKey::Pid => 0,
        SortKey::Cpu => 2,
        SortKey::Memory => 3,
        SortKey::Uptime => 4,
    }
}

pub fn render(
    frame: &mut Frame,
    area: Rect,
    rows: &[ProcessRow],
    selected_index: usize,
    sort_key: SortKey,
    theme: &Theme,
) {
    let sorted = sort_column(sort_key);
    let header = Row::new(COLUMNS.iter().enumerate().map(|(i, name)| {
        let style = if i == sorted {
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD)
        };
        Cell::from(*name).style(style)
    }));

    let body: Vec<Row> = rows
        .iter()
        .map(|row| {
            let cells = row_cells(row);
            let cpu_style = match row.cpu_ratio {
                Some(r) => Style::default().fg(theme.heat(r)),
                None => Style::default().fg(theme.text_placeholder),
            };
            Row::new(cells.into_iter().enumerate().map(|(i, text)| {
                let style = if i == 2 {
                    cpu_style
                } else if text == PLACEHOLDER {
                    Style::default().fg(theme.text_placeholder)
                } else {
                    Style::default().fg(theme.text_primary)
                };
                Cell::from(text).style(style)
            }))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            format!(" Processes ({}) ", rows.len()),
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ));

    let table = Table::new(
        body,
        [
            Constraint::Length(7),
            Constraint::Length(USER_WIDTH as u16),
            Constraint::Length(7),
            Constraint::Length(9),
            Constraint::Length(10),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(
        Style::default()
            .fg(theme.selection_fg)
            .bg(theme.selection_bg)
            .add_modifier(Modifier::BOLD),
    );

    let mut state = TableState::default();
    if !rows.is_empty() {
        state.select(Some(selected_index.min(rows.len() - 1)));
    }
    frame.render_stateful_widget(table, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_cells_format_known_fields() {
        let row = ProcessRow {
            pid: 42,
            user: Some("alice".to_string()),
            command: Some("/bin/bash -l".to_string()),
            resident_kb: Some(5120),
            cpu_ratio: Some(0.5),
            uptime_secs: Some(75),
        };
        insta::assert_snapshot!(
            row_cells(&row).join(" | "),
            @"42 | alice | 50.0% | 5.0 MB | 0:1:15 | /bin/bash -l"
        );
    }

    #[test]
    fn row_cells_use_placeholder_for_unknown_fields() {
        let cells = row_cells(&ProcessRow::empty(7));
        assert_eq!(cells[0], "7");
        assert!(cells[1..].iter().all(|c| c == PLACEHOLDER));
    }

    #[test]
    fn empty_command_shows_placeholder() {
        let row = ProcessRow {
            command: Some(String::new()),
            ..ProcessRow::empty(2)
        };
        assert_eq!(row_cells(&row)[5], PLACEHOLDER);
    }
}
