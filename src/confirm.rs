use crate::{float::FloatContent, hint::Shortcut, theme::Theme};
use ratatui::{Frame, layout::Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAnswer {
    Yes,
    No,
}

/// Yes/no popup for deleting a record or quitting. After a `Yes` the app may
/// mark it pending; both answers are then disabled until the app closes it.
pub struct Confirm {
    title: &'static str,
    prompt: String,
    yes_label: &'static str,
    pending: bool,
    answer: Option<ConfirmAnswer>,
}

impl Confirm {
    pub fn delete(lines: &[String]) -> Self {
        Self {
            title: " Delete Record ",
            prompt: format!("Delete this record? This cannot be undone.\n\n{}", lines.join("\n")),
            yes_label: "Delete",
            pending: false,
            answer: None,
        }
    }

    pub fn quit() -> Self {
        Self {
            title: " Exit Confirmation ",
            prompt: "Are you sure you want to exit?".into(),
            yes_label: "Yes",
            pending: false,
            answer: None,
        }
    }

    pub fn take_answer(&mut self) -> Option<ConfirmAnswer> {
        self.answer.take()
    }

    pub fn set_pending(&mut self) {
        self.pending = true;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

impl FloatContent for Confirm {
    fn draw(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        use ratatui::{
            layout::Alignment,
            style::{Modifier, Style},
            widgets::{Block, BorderType, Borders, Clear, Paragraph},
        };

        // a running delete must not hide the table: browsing continues
        if !self.pending {
            let overlay = Block::default().style(Style::default().bg(theme.overlay_bg()));
            frame.render_widget(overlay, frame.area());
        }
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(self.title)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.danger_color()));

        let footer = if self.pending {
            "Working...".to_string()
        } else {
            format!("[y] {:<18}[n] No", self.yes_label)
        };
        let text = format!("{}\n\n\n{footer}", self.prompt);

        let p = Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .fg(theme.info_color())
                    .add_modifier(Modifier::BOLD),
            )
            .block(block);
        frame.render_widget(p, area);
    }

    fn handle_key_event(&mut self, key: &ratatui::crossterm::event::KeyEvent) -> bool {
        use ratatui::crossterm::event::KeyCode::*;
        if self.pending {
            return false;
        }
        match key.code {
            Char('y') => self.answer = Some(ConfirmAnswer::Yes),
            Char('n') | Esc => self.answer = Some(ConfirmAnswer::No),
            _ => {}
        }
        self.answer.is_some()
    }

    fn is_finished(&self) -> bool {
        !self.pending && self.answer.is_some()
    }

    fn get_shortcut_list(&self) -> (&str, Box<[Shortcut]>) {
        if self.pending {
            return ("Working", Vec::new().into_boxed_slice());
        }
        (
            self.title.trim(),
            crate::shortcuts!(("Confirm", ["y"]), ("Cancel", ["n", "Esc"])),
        )
    }
}
