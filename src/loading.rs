use crate::{float::FloatContent, hint::Shortcut, shortcuts, theme::Theme};
use ratatui::{
    Frame,
    crossterm::event::KeyEvent,
    layout::{Alignment, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use std::time::{Duration, Instant};

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];
const FRAME: Duration = Duration::from_millis(120);

/// Spinner shown while the records file is read in the background.
pub struct LoadingFloat {
    message: String,
    started: Instant,
}

impl LoadingFloat {
    pub fn new(msg: &str) -> Self {
        Self {
            message: msg.to_string(),
            started: Instant::now(),
        }
    }

    fn spinner_at(elapsed: Duration) -> &'static str {
        let step = (elapsed.as_millis() / FRAME.as_millis()) as usize;
        SPINNER[step % SPINNER.len()]
    }
}

impl FloatContent for LoadingFloat {
    fn draw(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        frame.render_widget(Clear, area);

        let status = Line::from(vec![
            Span::styled(
                Self::spinner_at(self.started.elapsed()),
                Style::default().fg(theme.title_color()),
            ),
            Span::raw(" "),
            Span::styled(
                self.message.as_str(),
                Style::default().fg(theme.info_color()).add_modifier(Modifier::BOLD),
            ),
        ]);
        let hint = Line::from("q to cancel").fg(theme.unfocused_color());

        let p = Paragraph::new(vec![status, hint])
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .title(" Loading ")
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(theme.border_color())),
            );
        frame.render_widget(p, area);
    }

    fn handle_key_event(&mut self, _key: &KeyEvent) -> bool {
        false
    }

    fn is_finished(&self) -> bool {
        false
    }

    fn get_shortcut_list(&self) -> (&str, Box<[Shortcut]>) {
        ("Loading", shortcuts!(("Cancel", ["q"])))
    }
}
