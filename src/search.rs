use ratatui::{
    prelude::*,
    symbols::border,
    widgets::{Block, Paragraph},
};
use unicode_width::UnicodeWidthChar;

/// Actions triggered by text input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchAction {
    None,
    Exit,
    Update,
}

/// Single-line text input with a cursor, used for the search bar and the
/// column filter popup.
#[derive(Default)]
pub struct SearchBar {
    in_search: bool,
    input: Vec<char>,
    cursor: usize,
}

impl SearchBar {
    pub fn with_text(text: &str) -> Self {
        let input: Vec<char> = text.chars().collect();
        Self {
            in_search: false,
            cursor: input.len(),
            input,
        }
    }

    pub fn activate(&mut self) {
        self.in_search = true;
    }
    pub fn deactivate(&mut self) {
        self.in_search = false;
    }
    pub fn clear(&mut self) {
        self.input.clear();
        self.cursor = 0;
    }
    pub fn term(&self) -> String {
        self.input.iter().collect()
    }
    pub fn active(&self) -> bool {
        self.in_search
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect, title: &str, placeholder: &str) {
        let hint = if self.in_search || !self.input.is_empty() {
            self.term()
        } else {
            placeholder.to_string()
        };
        let p = Paragraph::new(hint).block(
            Block::bordered()
                .title(format!(" {title} "))
                .border_set(border::ROUNDED),
        );
        frame.render_widget(p, area);

        if self.in_search {
            let w: u16 = self
                .input
                .iter()
                .take(self.cursor)
                .map(|c| c.width().unwrap_or(1) as u16)
                .sum();
            frame.set_cursor_position(Position::new(area.x + 1 + w, area.y + 1));
        }
    }

    /// Every edit reports `Update` so the table can re-filter live.
    pub fn handle_key(&mut self, key: &ratatui::crossterm::event::KeyEvent) -> SearchAction {
        use ratatui::crossterm::event::{KeyCode, KeyModifiers};
        match key.code {
            KeyCode::Esc | KeyCode::Enter => return SearchAction::Exit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.clear();
                return SearchAction::Exit;
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.clear();
            }
            KeyCode::Backspace => {
                if self.cursor == 0 {
                    return SearchAction::None;
                }
                self.cursor -= 1;
                self.input.remove(self.cursor);
            }
            KeyCode::Delete => {
                if self.cursor >= self.input.len() {
                    return SearchAction::None;
                }
                self.input.remove(self.cursor);
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                return SearchAction::None;
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.input.len());
                return SearchAction::None;
            }
            KeyCode::Home => {
                self.cursor = 0;
                return SearchAction::None;
            }
            KeyCode::End => {
                self.cursor = self.input.len();
                return SearchAction::None;
            }
            KeyCode::Char(ch) => {
                self.input.insert(self.cursor, ch);
                self.cursor += 1;
            }
            _ => return SearchAction::None,
        }
        SearchAction::Update
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn press(bar: &mut SearchBar, code: KeyCode) -> SearchAction {
        bar.handle_key(&KeyEvent::from(code))
    }

    #[test]
    fn edits_at_cursor() {
        let mut bar = SearchBar::with_text("pmp");
        press(&mut bar, KeyCode::Left);
        press(&mut bar, KeyCode::Left);
        assert_eq!(press(&mut bar, KeyCode::Char('u')), SearchAction::Update);
        assert_eq!(bar.term(), "pump");
        press(&mut bar, KeyCode::End);
        press(&mut bar, KeyCode::Backspace);
        assert_eq!(bar.term(), "pum");
        assert_eq!(press(&mut bar, KeyCode::Enter), SearchAction::Exit);
    }

    #[test]
    fn ctrl_c_clears_and_exits() {
        let mut bar = SearchBar::with_text("valve");
        let action = bar.handle_key(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(action, SearchAction::Exit);
        assert!(bar.term().is_empty());
    }
}
