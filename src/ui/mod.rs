pub mod header;
pub mod help;
pub mod process_table;
pub mod statusbar;
pub mod theme;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Paragraph;

use crate::app::App;

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    header::render(frame, chunks[0], &app.snapshot, &app.theme);
    header::render_cores(frame, chunks[1], &app.snapshot, &app.theme);

    if app.loaded {
        process_table::render(
            frame,
            chunks[2],
            app.visible_rows(),
            app.selected_index,
            app.sort_key,
            &app.theme,
        );
    } else {
        frame.render_widget(
            Paragraph::new(" Sampling /proc ...").style(Style::default().fg(app.theme.text_secondary)),
            chunks[2],
        );
    }

    statusbar::render(
        frame,
        chunks[3],
        &app.keybinds,
        app.sort_key,
        app.status_message.as_ref(),
        &app.theme,
    );

    // Help overlay last so it draws on top
    if app.show_help() {
        help::render(frame, frame.area(), app);
    }
}
