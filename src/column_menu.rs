use crate::{float::FloatContent, hint::Shortcut, shortcuts, theme::Theme};
use assetdesk::ColumnSpec;
use ratatui::{
    crossterm::event::{KeyCode, KeyEvent},
    layout::Rect,
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, List, ListItem},
};

#[derive(Debug, Clone)]
struct Entry {
    id: String,
    header: String,
    visible: bool,
}

/// Checkbox list of columns. Toggles are queued and picked up by the app
/// with [`ColumnMenu::take_toggles`] so the table updates while the popup
/// stays open.
#[derive(Debug, Clone)]
pub struct ColumnMenu {
    entries: Vec<Entry>,
    cursor: usize,
    scroll: usize,
    last_visible_height: usize,
    toggles: Vec<String>,
    finished: bool,
}

impl ColumnMenu {
    pub fn new<'a>(columns: impl IntoIterator<Item = &'a ColumnSpec>) -> Self {
        let entries = columns
            .into_iter()
            .map(|c| Entry {
                id: c.id.clone(),
                header: c.header.clone(),
                visible: c.visible,
            })
            .collect();
        Self {
            entries,
            cursor: 0,
            scroll: 0,
            last_visible_height: 0,
            toggles: Vec::new(),
            finished: false,
        }
    }

    pub fn take_toggles(&mut self) -> Vec<String> {
        std::mem::take(&mut self.toggles)
    }

    fn ensure_cursor_in_view(&mut self) {
        if self.last_visible_height == 0 {
            return;
        }
        let end = self
            .scroll
            .saturating_add(self.last_visible_height.saturating_sub(1));
        if self.cursor < self.scroll {
            self.scroll = self.cursor;
        } else if self.cursor > end {
            self.scroll = self.cursor.saturating_sub(self.last_visible_height - 1);
        }
    }

    fn move_down(&mut self) {
        if self.cursor + 1 < self.entries.len() {
            self.cursor += 1;
            self.ensure_cursor_in_view();
        }
    }

    fn move_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.ensure_cursor_in_view();
        }
    }

    fn toggle_current(&mut self) {
        if let Some(entry) = self.entries.get_mut(self.cursor) {
            entry.visible = !entry.visible;
            self.toggles.push(entry.id.clone());
        }
    }
}

impl FloatContent for ColumnMenu {
    fn draw(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        frame.render_widget(Clear, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.focused_color()))
            .title(" Columns ")
            .title_alignment(Alignment::Center);

        self.last_visible_height = (area.height.saturating_sub(2) as usize).max(1);
        self.ensure_cursor_in_view();

        let items: Vec<_> = self
            .entries
            .iter()
            .enumerate()
            .skip(self.scroll)
            .take(self.last_visible_height)
            .map(|(i, entry)| {
                let mark = if entry.visible { "[x]" } else { "[ ]" };
                let mut item = ListItem::new(format!("{mark} {}", entry.header));
                if i == self.cursor {
                    item = item.style(
                        Style::default()
                            .fg(theme.selection_fg())
                            .bg(theme.selection_bg())
                            .add_modifier(Modifier::BOLD),
                    );
                }
                item
            })
            .collect();

        frame.render_widget(List::new(items).block(block), area);
    }

    fn handle_key_event(&mut self, key: &KeyEvent) -> bool {
        use KeyCode::*;
        match key.code {
            Char('q') | Esc | Enter => self.finished = true,
            Char('j') | Down => self.move_down(),
            Char('k') | Up => self.move_up(),
            Char(' ') => self.toggle_current(),
            _ => {}
        }
        self.finished
    }

    fn is_finished(&self) -> bool {
        self.finished
    }

    fn get_shortcut_list(&self) -> (&str, Box<[Shortcut]>) {
        (
            "Column Visibility",
            shortcuts!(
                ("Move selection", ["j", "k", "↑", "↓"]),
                ("Show / hide", ["Space"]),
                ("Close", ["Enter", "q", "Esc"])
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn space_queues_toggle_for_cursor_column() {
        let cols = vec![ColumnSpec::new("tag", "Tag"), ColumnSpec::new("risk", "Risk")];
        let mut menu = ColumnMenu::new(&cols);
        menu.handle_key_event(&KeyEvent::from(KeyCode::Down));
        menu.handle_key_event(&KeyEvent::from(KeyCode::Char(' ')));
        menu.handle_key_event(&KeyEvent::from(KeyCode::Char(' ')));
        assert_eq!(menu.take_toggles(), ["risk", "risk"]);
        assert!(menu.take_toggles().is_empty());
        assert!(menu.handle_key_event(&KeyEvent::from(KeyCode::Enter)));
    }
}
