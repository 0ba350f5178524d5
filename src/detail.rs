use crate::{float::FloatContent, hint::Shortcut, theme::Theme};
use assetdesk::{ColumnSpec, Record};
use ratatui::{Frame, layout::Rect};

/// Every column of one record, hidden columns included.
pub struct DataDetail {
    lines: Vec<String>,
    scroll: u16,
    finished: bool,
}

impl DataDetail {
    pub fn new(columns: &[ColumnSpec], record: &Record) -> Self {
        let width = columns.iter().map(|c| c.header.len()).max().unwrap_or(0);
        let mut lines: Vec<String> = columns
            .iter()
            .map(|c| format!("{:<width$} : {}", c.header, c.display(record)))
            .collect();
        // fields without a column still show up
        for (field, value) in record.iter() {
            if !columns.iter().any(|c| c.accessor == field) {
                lines.push(format!("{field:<width$} : {value}"));
            }
        }
        Self {
            lines,
            scroll: 0,
            finished: false,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl FloatContent for DataDetail {
    fn draw(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        use ratatui::{
            layout::Alignment,
            style::Style,
            widgets::{Block, Borders, Clear, Paragraph},
        };

        let overlay = Block::default().style(Style::default().bg(theme.overlay_bg()));
        frame.render_widget(overlay, frame.area());
        frame.render_widget(Clear, area);

        let max_scroll = (self.lines.len() as u16).saturating_sub(area.height.saturating_sub(2));
        self.scroll = self.scroll.min(max_scroll);

        let text = Paragraph::new(self.lines.join("\n"))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Record Detail ")
                    .border_type(ratatui::widgets::BorderType::Rounded),
            )
            .style(Style::default().fg(theme.table_text()))
            .alignment(Alignment::Left)
            .scroll((self.scroll, 0));

        frame.render_widget(text, area);
    }

    fn handle_key_event(&mut self, key: &ratatui::crossterm::event::KeyEvent) -> bool {
        use ratatui::crossterm::event::KeyCode::*;
        match key.code {
            Char('q') | Esc | Enter => self.finished = true,
            Char('j') | Down => self.scroll = self.scroll.saturating_add(1),
            Char('k') | Up => self.scroll = self.scroll.saturating_sub(1),
            _ => {}
        }
        self.finished
    }

    fn is_finished(&self) -> bool {
        self.finished
    }

    fn get_shortcut_list(&self) -> (&str, Box<[Shortcut]>) {
        (
            "Detail",
            crate::shortcuts!(("Scroll", ["j", "k"]), ("Close", ["Enter", "q", "Esc"])),
        )
    }
}
