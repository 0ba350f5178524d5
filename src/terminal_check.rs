use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Paragraph, Wrap},
};

/// Smallest terminal the table layout still fits in.
pub const MIN_WIDTH: u16 = 80;
pub const MIN_HEIGHT: u16 = 20;

pub fn is_too_small(area: Rect) -> bool {
    area.width < MIN_WIDTH || area.height < MIN_HEIGHT
}

pub fn draw_too_small_warning(f: &mut Frame, area: Rect) {
    let warning = Paragraph::new(format!(
        "Terminal too small!\n\nCurrent: {}x{}\nMinimum required: {}x{}\n\nPlease resize the window.",
        area.width, area.height, MIN_WIDTH, MIN_HEIGHT
    ))
    .alignment(Alignment::Center)
    .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
    .wrap(Wrap { trim: true });

    let [_, middle, _] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(7), Constraint::Fill(1)]).areas(area);

    f.render_widget(warning, middle);
}
