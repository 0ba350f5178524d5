use crate::{
    cli::Args,
    column_menu::ColumnMenu,
    confirm::{Confirm, ConfirmAnswer},
    data::write_export,
    detail::DataDetail,
    filter_menu::{FilterChoice, FilterMenu},
    float::Float,
    hint::Shortcut,
    search::{SearchAction, SearchBar},
    shortcuts,
    store::RecordStore,
    terminal_check::{draw_too_small_warning, is_too_small},
    theme::Theme,
    toast::{ToastKind, Toasts},
};
use anyhow::Result;
use assetdesk::{
    ColumnSpec, DeleteSettled, ExportOutcome, Record, RowId, SortOrder, TableEngine, TableHooks,
};
use log::{debug, info};
use ratatui::{
    crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    layout::{Constraint, Layout, Rect},
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row},
};
use std::{
    path::PathBuf,
    sync::mpsc::{Receiver, Sender, channel},
    time::Duration,
};
use unicode_width::UnicodeWidthStr;

/// Messages from table hooks and background tasks back to the UI loop.
pub enum AppEvent {
    Details(Record),
    DeleteSettled(DeleteSettled),
}

pub struct App {
    theme: Theme,
    engine: TableEngine,
    dataset_name: String,
    input_path: PathBuf,
    export_dir: PathBuf,
    search: SearchBar,
    /// Index into the visible columns
    col_cursor: usize,
    /// Index into the rows of the current page
    row_cursor: usize,
    filter_menu: Option<Float<FilterMenu>>,
    column_menu: Option<Float<ColumnMenu>>,
    delete_confirm: Option<Float<Confirm>>,
    confirm_quit: Option<Float<Confirm>>,
    detail_float: Option<Float<DataDetail>>,
    toasts: Toasts,
    events_tx: Sender<AppEvent>,
    events_rx: Receiver<AppEvent>,
    runtime: tokio::runtime::Handle,
}

impl App {
    pub fn new(
        args: &Args,
        records: Vec<Record>,
        columns: Vec<ColumnSpec>,
        store: Option<RecordStore>,
        runtime: tokio::runtime::Handle,
    ) -> Self {
        let (events_tx, events_rx) = channel();

        let details_tx = events_tx.clone();
        let mut hooks = TableHooks::default().on_view_details(move |record| {
            let _ = details_tx.send(AppEvent::Details(record.clone()));
        });
        if let Some(store) = store {
            hooks = hooks.on_delete(move |record| {
                let store = store.clone();
                async move { store.delete(record).await }
            });
        }

        let engine = TableEngine::new(records, columns)
            .with_page_size(args.page_size)
            .with_hooks(hooks);

        Self {
            theme: Theme::Default,
            engine,
            dataset_name: args.dataset_name(),
            input_path: args.read.clone(),
            export_dir: args.export_dir.clone(),
            search: SearchBar::default(),
            col_cursor: 0,
            row_cursor: 0,
            filter_menu: None,
            column_menu: None,
            delete_confirm: None,
            confirm_quit: None,
            detail_float: None,
            toasts: Toasts::default(),
            events_tx,
            events_rx,
            runtime,
        }
    }

    pub fn run(
        &mut self,
        term: &mut Terminal<ratatui::backend::CrosstermBackend<std::io::Stdout>>,
    ) -> Result<()> {
        loop {
            self.drain_events();
            term.draw(|f| self.draw(f))?;
            if !event::poll(Duration::from_millis(50))? {
                continue;
            }
            if let Event::Key(k) = event::read()? {
                if k.kind == KeyEventKind::Release {
                    continue;
                }
                if !self.handle_key(k) {
                    break;
                }
            }
        }
        Ok(())
    }

    fn drain_events(&mut self) {
        while let Ok(ev) = self.events_rx.try_recv() {
            match ev {
                AppEvent::Details(record) => {
                    let detail = DataDetail::new(self.engine.columns(), &record);
                    self.detail_float = Some(Float::new(Box::new(detail), 60, 60));
                }
                AppEvent::DeleteSettled(settled) => {
                    // the popup goes away whatever the outcome
                    self.delete_confirm = None;
                    match self.engine.settle_delete(settled) {
                        Ok(record) => {
                            let summary = self.summary(&record).join(", ");
                            self.toasts.push(ToastKind::Success, format!("Deleted {summary}"));
                        }
                        Err(e) => self.toasts.push(ToastKind::Error, e.to_string()),
                    }
                    self.clamp_cursors();
                }
            }
        }
    }

    /// Returns false when the app should exit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if let Some(ref mut float) = self.detail_float {
            if float.handle_key_event(&key) {
                self.detail_float = None;
            }
            return true;
        }

        if let Some(ref mut float) = self.confirm_quit {
            float.handle_key_event(&key);
            if let Some(answer) = float.content.take_answer() {
                self.confirm_quit = None;
                return answer != ConfirmAnswer::Yes;
            }
            return true;
        }

        if let Some(ref mut float) = self.filter_menu {
            if float.handle_key_event(&key) {
                let field = float.content.field.clone();
                let choice = float.content.choice().cloned();
                self.filter_menu = None;
                match choice {
                    Some(FilterChoice::Apply(text)) => {
                        self.engine.set_filter(&field, &text);
                    }
                    Some(FilterChoice::ClearAll) => self.engine.clear_filters(),
                    Some(FilterChoice::Cancel) | None => {}
                }
                self.clamp_cursors();
            }
            return true;
        }

        if let Some(ref mut float) = self.column_menu {
            let finished = float.handle_key_event(&key);
            for id in float.content.take_toggles() {
                self.engine.toggle_column_visibility(&id);
            }
            if finished {
                self.column_menu = None;
            }
            self.clamp_cursors();
            return true;
        }

        // A pending delete keeps its popup on screen but lets keys through.
        if let Some(ref mut float) = self.delete_confirm {
            if !float.content.is_pending() {
                float.handle_key_event(&key);
                match float.content.take_answer() {
                    Some(ConfirmAnswer::Yes) => self.start_delete(),
                    Some(ConfirmAnswer::No) => {
                        self.engine.cancel_delete();
                        self.delete_confirm = None;
                    }
                    None => {}
                }
                return true;
            }
        }

        if self.search.active() {
            match self.search.handle_key(&key) {
                SearchAction::Exit => {
                    self.search.deactivate();
                    self.apply_search();
                }
                SearchAction::Update => self.apply_search(),
                SearchAction::None => {}
            }
            return true;
        }

        self.handle_key_table(key.code)
    }

    fn handle_key_table(&mut self, code: KeyCode) -> bool {
        use KeyCode::*;
        match code {
            Char('q') => {
                self.confirm_quit = Some(Float::new_absolute(Box::new(Confirm::quit()), 44, 8));
            }
            Char('/') => self.search.activate(),
            Left | Char('h') => self.col_cursor = self.col_cursor.saturating_sub(1),
            Right | Char('l') => {
                let n = self.engine.visible_columns().len();
                self.col_cursor = (self.col_cursor + 1).min(n.saturating_sub(1));
            }
            Up | Char('k') => self.row_cursor = self.row_cursor.saturating_sub(1),
            Down | Char('j') => {
                let n = self.engine.view().rows.len();
                self.row_cursor = (self.row_cursor + 1).min(n.saturating_sub(1));
            }
            Char('n') | PageDown => {
                self.engine.next_page();
                self.row_cursor = 0;
            }
            Char('p') | PageUp => {
                self.engine.previous_page();
                self.row_cursor = 0;
            }
            Char('g') | Home => {
                self.engine.go_to_page(1);
                self.row_cursor = 0;
            }
            Char('G') | End => {
                self.engine.go_to_page(self.engine.page_count());
                self.row_cursor = 0;
            }
            Char('s') => {
                if let Some(field) = self.current_column().map(|c| c.accessor.clone()) {
                    self.engine.set_sort(&field);
                }
            }
            Char('f') => self.open_filter_menu(),
            Char('x') => {
                self.engine.clear_filters();
                self.clamp_cursors();
            }
            Char('c') => {
                let menu = ColumnMenu::new(self.engine.columns());
                self.column_menu = Some(Float::new_absolute(Box::new(menu), 40, 16));
            }
            Enter => {
                if let Some(id) = self.current_row() {
                    self.engine.view_details(id);
                }
            }
            Char('d') => self.request_delete(),
            Char('e') => self.export(),
            _ => {}
        }
        true
    }

    fn apply_search(&mut self) {
        let term = self.search.term();
        self.engine.set_search_term(&term);
        self.clamp_cursors();
    }

    fn open_filter_menu(&mut self) {
        let Some(col) = self.current_column() else {
            return;
        };
        let (field, header, filterable) = (col.accessor.clone(), col.header.clone(), col.filterable);
        if !filterable {
            self.toasts
                .push(ToastKind::Info, format!("{header} cannot be filtered"));
            return;
        }
        let menu = FilterMenu::new(&field, &header, self.engine.filter(&field));
        self.filter_menu = Some(Float::new_absolute(Box::new(menu), 50, 7));
    }

    fn request_delete(&mut self) {
        let Some(id) = self.current_row() else {
            return;
        };
        if self.engine.hooks().on_delete.is_none() {
            self.toasts.push(ToastKind::Info, "Deleting is disabled (read-only)");
            return;
        }
        if !self.engine.request_delete(id) {
            return;
        }
        let lines = self
            .engine
            .record(id)
            .map(|r| self.summary(r))
            .unwrap_or_default();
        let height = lines.len() as u16 + 9;
        self.delete_confirm = Some(Float::new_absolute(Box::new(Confirm::delete(&lines)), 56, height));
    }

    fn start_delete(&mut self) {
        let Some(pending) = self.engine.confirm_delete() else {
            self.delete_confirm = None;
            return;
        };
        if let Some(float) = self.delete_confirm.as_mut() {
            float.content.set_pending();
        }
        info!("deleting row {}", pending.row);
        let tx = self.events_tx.clone();
        self.runtime.spawn(async move {
            let settled = pending.run().await;
            let _ = tx.send(AppEvent::DeleteSettled(settled));
        });
    }

    fn export(&mut self) {
        match self.engine.export_csv() {
            ExportOutcome::Delegated => {}
            ExportOutcome::Csv(payload) => {
                match write_export(&self.export_dir, &self.dataset_name, &payload) {
                    Ok(path) => self
                        .toasts
                        .push(ToastKind::Success, format!("Exported to {}", path.display())),
                    Err(e) => self.toasts.push(ToastKind::Error, format!("{e:#}")),
                }
            }
        }
    }

    /// Up to three visible cells, used in confirmations and toasts.
    fn summary(&self, record: &Record) -> Vec<String> {
        self.engine
            .visible_columns()
            .iter()
            .take(3)
            .map(|c| format!("{}: {}", c.header, c.display(record)))
            .collect()
    }

    fn current_column(&self) -> Option<&ColumnSpec> {
        self.engine.visible_columns().get(self.col_cursor).copied()
    }

    fn current_row(&self) -> Option<RowId> {
        self.engine.view().rows.get(self.row_cursor).map(|r| r.id)
    }

    fn clamp_cursors(&mut self) {
        let cols = self.engine.visible_columns().len();
        self.col_cursor = self.col_cursor.min(cols.saturating_sub(1));
        let rows = self.engine.view().rows.len();
        self.row_cursor = self.row_cursor.min(rows.saturating_sub(1));
        debug!("cursor at column {} row {}", self.col_cursor, self.row_cursor);
    }

    fn get_current_shortcuts(&self) -> (&str, Box<[Shortcut]>) {
        if let Some(ref float) = self.detail_float {
            return float.get_shortcut_list();
        }
        if let Some(ref float) = self.confirm_quit {
            return float.get_shortcut_list();
        }
        if let Some(ref float) = self.filter_menu {
            return float.get_shortcut_list();
        }
        if let Some(ref float) = self.column_menu {
            return float.get_shortcut_list();
        }
        if let Some(ref float) = self.delete_confirm {
            if !float.content.is_pending() {
                return float.get_shortcut_list();
            }
        }
        if self.search.active() {
            return (
                "Search",
                shortcuts!(("Done", ["Enter", "Esc"]), ("Clear", ["Ctrl+u"]), ("Clear and exit", ["Ctrl+c"])),
            );
        }
        (
            "Table",
            shortcuts!(
                ("Search", ["/"]),
                ("Column", ["h", "l"]),
                ("Row", ["j", "k"]),
                ("Page", ["n", "p"]),
                ("Sort", ["s"]),
                ("Filter", ["f"]),
                ("Clear filters", ["x"]),
                ("Columns", ["c"]),
                ("Details", ["Enter"]),
                ("Delete", ["d"]),
                ("Export", ["e"]),
                ("Quit", ["q"])
            ),
        )
    }

    fn draw(&mut self, f: &mut Frame) {
        let area = f.area();
        if is_too_small(area) {
            draw_too_small_warning(f, area);
            return;
        }

        let (_, shortcuts) = self.get_current_shortcuts();
        let lines = crate::hint::create_shortcut_list(shortcuts, area.width);
        let hint_height = (lines.len() as u16 + 2).clamp(3, 8);

        let [header, top, body, hint] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(hint_height),
        ])
        .areas(area);

        let title = Paragraph::new(format!(
            "assetdesk  |  File: {}  |  {} of {} records",
            self.input_path.display(),
            self.engine.filtered_len(),
            self.engine.len()
        ))
        .style(Style::default().fg(self.theme.title_color()));
        f.render_widget(title, header);

        let [search_area, info_area] =
            Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(top);
        self.search.draw(f, search_area, "Search", "Press / to search");
        self.draw_state_info(f, info_area);

        self.draw_table(f, body);

        let hint_block = Block::default()
            .borders(Borders::ALL)
            .border_type(ratatui::widgets::BorderType::Rounded)
            .title(" Shortcuts ");
        f.render_widget(Paragraph::new(lines).block(hint_block), hint);

        if let Some(ref mut float) = self.column_menu {
            float.draw(f, area, &self.theme);
        }
        if let Some(ref mut float) = self.filter_menu {
            float.draw(f, area, &self.theme);
        }
        if let Some(ref mut float) = self.delete_confirm {
            float.draw(f, area, &self.theme);
        }
        if let Some(ref mut float) = self.detail_float {
            float.draw(f, area, &self.theme);
        }
        if let Some(ref mut float) = self.confirm_quit {
            float.draw(f, area, &self.theme);
        }
        self.toasts.draw(f, body, &self.theme);
    }

    fn draw_state_info(&self, f: &mut Frame, area: Rect) {
        let sort = match self.engine.sort() {
            Some((field, order)) => format!("{field} {}", order.label()),
            None => "none".into(),
        };
        let filters = self
            .engine
            .active_filters()
            .map(|(field, q)| format!("{field}~{q}"))
            .collect::<Vec<_>>();
        let filters = if filters.is_empty() {
            "none".into()
        } else {
            filters.join(" ")
        };
        let p = Paragraph::new(format!("Sort: {sort}  |  Filters: {filters}"))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(ratatui::widgets::BorderType::Rounded)
                    .title(" View "),
            );
        f.render_widget(p, area);
    }

    fn draw_table(&mut self, f: &mut Frame, area: Rect) {
        let columns = self.engine.visible_columns();
        let view = self.engine.view();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(ratatui::widgets::BorderType::Rounded)
            .title(format!(
                " {} - {} rows  |  Page {}/{} ",
                self.dataset_name, view.total, view.page, view.page_count
            ));

        if columns.is_empty() {
            let p = Paragraph::new("All columns are hidden. Press c to choose columns.")
                .alignment(Alignment::Center)
                .block(block);
            f.render_widget(p, area);
            return;
        }

        let header = Row::new(columns.iter().enumerate().map(|(i, c)| {
            let arrow = match self.engine.sort_order(&c.accessor) {
                Some(SortOrder::Ascend) => " ▲",
                Some(SortOrder::Descend) => " ▼",
                None => "",
            };
            let marker = if self.engine.filter(&c.accessor).is_some() { " *" } else { "" };
            let bg = if i == self.col_cursor {
                self.theme.title_color()
            } else {
                self.theme.border_color()
            };
            Cell::from(format!("{}{arrow}{marker}", c.header)).style(
                Style::default()
                    .fg(self.theme.table_header())
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            )
        }));

        let rows = view.rows.iter().enumerate().map(|(i, row)| {
            let style = if i == self.row_cursor {
                Style::default()
                    .bg(self.theme.selection_bg())
                    .fg(self.theme.selection_fg())
                    .add_modifier(Modifier::BOLD)
            } else if i % 2 == 0 {
                Style::default().bg(self.theme.table_row_even())
            } else {
                Style::default().bg(self.theme.table_row_odd())
            };
            Row::new(columns.iter().map(|c| Cell::from(c.display(row.record)))).style(style)
        });

        let widths = auto_widths(&columns, view.rows.iter().map(|r| r.record));
        let table = ratatui::widgets::Table::new(rows, widths)
            .header(header)
            .block(block);
        f.render_widget(table, area);

        if view.rows.is_empty() {
            let msg = Paragraph::new("No matching records.")
                .alignment(Alignment::Center)
                .style(Style::default().fg(self.theme.unfocused_color()));
            let inner = Rect::new(area.x + 1, area.y + 3, area.width.saturating_sub(2), 1);
            f.render_widget(msg, inner);
        }
    }
}

/// Each column gets the width of its widest cell on the page, 4..=40.
fn auto_widths<'a>(
    columns: &[&ColumnSpec],
    records: impl Iterator<Item = &'a Record> + Clone,
) -> Vec<Constraint> {
    columns
        .iter()
        .map(|c| {
            let widest = records
                .clone()
                .map(|r| c.display(r).width())
                .max()
                .unwrap_or(0)
                .max(c.header.width() + 4);
            Constraint::Length(widest.clamp(4, 40) as u16)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_follow_content_with_bounds() {
        let cols = [
            ColumnSpec::new("tag", "Tag"),
            ColumnSpec::new("note", "Note"),
        ];
        let cols: Vec<_> = cols.iter().collect();
        let records = [
            Record::new().with("tag", "P").with("note", "x".repeat(80)),
        ];
        let widths = auto_widths(&cols, records.iter());
        assert_eq!(widths, [Constraint::Length(7), Constraint::Length(40)]);
    }
}
