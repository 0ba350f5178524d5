use crate::{hint::Shortcut, theme::Theme};
use ratatui::{
    Frame,
    crossterm::event::{KeyCode, KeyEvent},
    layout::{Constraint, Flex, Layout, Rect},
};

/// Anything drawn as a popup above the table.
pub trait FloatContent {
    fn draw(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);
    /// Returns true when the popup wants to close.
    fn handle_key_event(&mut self, key: &KeyEvent) -> bool;
    fn is_finished(&self) -> bool;
    fn get_shortcut_list(&self) -> (&str, Box<[Shortcut]>);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatMode {
    /// Share of the parent area, in percent
    Percent(u16, u16),
    /// Fixed size in terminal cells
    Absolute(u16, u16),
}

impl FloatMode {
    fn constraints(self, parent: Rect) -> (Constraint, Constraint) {
        match self {
            FloatMode::Percent(w, h) => (Constraint::Percentage(w), Constraint::Percentage(h)),
            FloatMode::Absolute(w, h) => (
                Constraint::Length(w.min(parent.width)),
                Constraint::Length(h.min(parent.height)),
            ),
        }
    }

    /// Centered rectangle inside `parent`.
    pub fn place(self, parent: Rect) -> Rect {
        let (w, h) = self.constraints(parent);
        let [column] = Layout::horizontal([w]).flex(Flex::Center).areas(parent);
        let [area] = Layout::vertical([h]).flex(Flex::Center).areas(column);
        area
    }
}

pub struct Float<Content: FloatContent + ?Sized> {
    pub content: Box<Content>,
    mode: FloatMode,
}

impl<Content: FloatContent + ?Sized> Float<Content> {
    pub fn new(content: Box<Content>, width_percent: u16, height_percent: u16) -> Self {
        Self {
            content,
            mode: FloatMode::Percent(width_percent.min(100), height_percent.min(100)),
        }
    }

    pub fn new_absolute(content: Box<Content>, width: u16, height: u16) -> Self {
        Self {
            content,
            mode: FloatMode::Absolute(width, height),
        }
    }

    pub fn draw(&mut self, frame: &mut Frame, parent_area: Rect, theme: &Theme) {
        let area = self.mode.place(parent_area);
        self.content.draw(frame, area, theme);
    }

    /// True once the content is done; a finished float swallows its closing key.
    pub fn handle_key_event(&mut self, key: &KeyEvent) -> bool {
        let closing = matches!(key.code, KeyCode::Enter | KeyCode::Char('q') | KeyCode::Esc);
        if closing && self.content.is_finished() {
            return true;
        }
        self.content.handle_key_event(key)
    }

    pub fn get_shortcut_list(&self) -> (&str, Box<[Shortcut]>) {
        self.content.get_shortcut_list()
    }
}
