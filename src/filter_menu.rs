use crate::{
    float::FloatContent,
    hint::Shortcut,
    search::{SearchAction, SearchBar},
    shortcuts,
    theme::Theme,
};
use ratatui::{
    crossterm::event::{KeyCode, KeyEvent, KeyModifiers},
    layout::{Constraint, Layout, Rect},
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChoice {
    Apply(String),
    ClearAll,
    Cancel,
}

/// Popup editing the filter of one column. It closes only through one of
/// its own choices; the caller reads `choice()` once `is_finished()`.
pub struct FilterMenu {
    pub field: String,
    header: String,
    input: SearchBar,
    choice: Option<FilterChoice>,
}

impl FilterMenu {
    pub fn new(field: &str, header: &str, current: Option<&str>) -> Self {
        let mut input = SearchBar::with_text(current.unwrap_or(""));
        input.activate();
        Self {
            field: field.to_string(),
            header: header.to_string(),
            input,
            choice: None,
        }
    }

    pub fn choice(&self) -> Option<&FilterChoice> {
        self.choice.as_ref()
    }
}

impl FloatContent for FilterMenu {
    fn draw(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        frame.render_widget(Clear, area);
        let outer = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.border_color()))
            .title(format!(" Filter: {} ", self.header))
            .title_alignment(Alignment::Center);
        let inner = outer.inner(area);
        frame.render_widget(outer, area);

        let [input_area, help_area] =
            Layout::vertical([Constraint::Length(3), Constraint::Min(1)]).areas(inner);
        self.input.draw(frame, input_area, "Contains", "");
        let help = Paragraph::new("[Enter] Apply    [Ctrl+x] Clear all    [Esc] Cancel")
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.unfocused_color()));
        frame.render_widget(help, help_area);
    }

    fn handle_key_event(&mut self, key: &KeyEvent) -> bool {
        if key.code == KeyCode::Char('x') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.choice = Some(FilterChoice::ClearAll);
            return true;
        }
        if key.code == KeyCode::Esc {
            self.choice = Some(FilterChoice::Cancel);
            return true;
        }
        match self.input.handle_key(key) {
            SearchAction::Exit => {
                // Ctrl+c empties the input and exits: same as applying nothing
                self.choice = Some(FilterChoice::Apply(self.input.term()));
                true
            }
            SearchAction::Update | SearchAction::None => false,
        }
    }

    fn is_finished(&self) -> bool {
        self.choice.is_some()
    }

    fn get_shortcut_list(&self) -> (&str, Box<[Shortcut]>) {
        (
            "Column Filter",
            shortcuts!(
                ("Apply", ["Enter"]),
                ("Clear all filters", ["Ctrl+x"]),
                ("Cancel", ["Esc"])
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_applies_typed_text() {
        let mut menu = FilterMenu::new("status", "Status", Some("Op"));
        menu.handle_key_event(&KeyEvent::from(KeyCode::Char('e')));
        menu.handle_key_event(&KeyEvent::from(KeyCode::Char('n')));
        assert!(!menu.is_finished());
        assert!(menu.handle_key_event(&KeyEvent::from(KeyCode::Enter)));
        assert_eq!(menu.choice(), Some(&FilterChoice::Apply("Open".into())));
    }

    #[test]
    fn esc_cancels_and_ctrl_x_clears() {
        let mut menu = FilterMenu::new("status", "Status", None);
        menu.handle_key_event(&KeyEvent::from(KeyCode::Esc));
        assert_eq!(menu.choice(), Some(&FilterChoice::Cancel));

        let mut menu = FilterMenu::new("status", "Status", None);
        menu.handle_key_event(&KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL));
        assert_eq!(menu.choice(), Some(&FilterChoice::ClearAll));
    }
}
