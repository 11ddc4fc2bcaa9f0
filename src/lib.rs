use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

use ratatui::widgets::{
    Block, Borders, Clear, List, ListItem, ListState, Paragraph, StatefulWidget,
};

pub mod binning;
pub mod config;
pub mod database;
pub mod hints;
pub mod history;
pub mod plot;
pub mod plot_modal;
pub mod table;
pub mod widgets;

pub use config::{AppConfig, ConfigManager, Theme};

use database::Database;
use hints::Hints;
use history::QueryHistory;
use plot::PlotPool;
use plot_modal::{PlotFocus, PlotModal};
use table::ResultTable;
use widgets::chart::render_pane;
use widgets::controls::Controls;
use widgets::sql_input::SqlInput;

/// Application name used for the config directory and other app-specific paths
pub const APP_NAME: &str = "sqlitui";

pub enum AppEvent {
    Key(KeyEvent),
    Open(PathBuf),
    Exit,
    Crash(String),
    Resize(u16, u16), // resized (width, height)
}

/// Which region of the screen receives navigation keys.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Tables,
    Sql,
    Plot,
}

/// What the table picker currently points at.
///
/// `CustomQueryResult` replaces the original viewer's trick of inserting and
/// immediately removing a synthetic "Custom" dropdown entry: after a custom
/// query no table name is highlighted, but the loaded result is live.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum TableSelection {
    #[default]
    None,
    Named(String),
    CustomQueryResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptPurpose {
    OpenDatabase,
    ExportCsv,
}

/// Single-line path prompt shown as an overlay for open/export actions.
#[derive(Debug)]
pub struct PathPrompt {
    pub active: bool,
    pub purpose: PromptPurpose,
    pub input: String,
}

impl Default for PathPrompt {
    fn default() -> Self {
        Self {
            active: false,
            purpose: PromptPurpose::OpenDatabase,
            input: String::new(),
        }
    }
}

impl PathPrompt {
    pub fn open(&mut self, purpose: PromptPurpose) {
        self.active = true;
        self.purpose = purpose;
        self.input.clear();
    }

    pub fn close(&mut self) {
        self.active = false;
        self.input.clear();
    }

    pub fn title(&self) -> &'static str {
        match self.purpose {
            PromptPurpose::OpenDatabase => " Open Database ",
            PromptPurpose::ExportCsv => " Save as CSV ",
        }
    }
}

/// One line of status feedback; errors render in the theme's error color.
struct StatusLine {
    text: String,
    error: bool,
}

pub struct App {
    db: Option<Database>,
    table: Option<ResultTable>,
    table_names: Vec<String>,
    table_list_state: ListState,
    selection: TableSelection,
    view_lines: Vec<String>,
    result_scroll: u16,
    pub plot_modal: PlotModal,
    pub plots: PlotPool,
    history: QueryHistory,
    hints: Hints,
    sql_input: SqlInput,
    prompt: PathPrompt,
    status: Option<StatusLine>,
    focus: Focus,
    events: Sender<AppEvent>,
    theme: Theme,
}

impl App {
    pub fn new(events: Sender<AppEvent>) -> App {
        let theme = Theme::from_config(&AppConfig::default().theme).unwrap_or_default();
        Self::new_with_config(events, theme, Hints::default_path())
    }

    pub fn new_with_config(events: Sender<AppEvent>, theme: Theme, hints_path: PathBuf) -> App {
        App {
            db: None,
            table: None,
            table_names: Vec::new(),
            table_list_state: ListState::default(),
            selection: TableSelection::None,
            view_lines: Vec::new(),
            result_scroll: 0,
            plot_modal: PlotModal::new(),
            plots: PlotPool::new(),
            history: QueryHistory::new(),
            hints: Hints::load(&hints_path),
            sql_input: SqlInput::new(),
            prompt: PathPrompt::default(),
            status: None,
            focus: Focus::Tables,
            events,
            theme,
        }
    }

    pub fn send_event(&mut self, event: AppEvent) {
        let _ = self.events.send(event);
    }

    pub fn database_path(&self) -> Option<&Path> {
        self.db.as_ref().map(Database::path)
    }

    pub fn current_table(&self) -> Option<&ResultTable> {
        self.table.as_ref()
    }

    pub fn selection(&self) -> &TableSelection {
        &self.selection
    }

    pub fn view_lines(&self) -> &[String] {
        &self.view_lines
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_ref().map(|s| s.text.as_str())
    }

    fn set_status_info(&mut self, text: impl Into<String>) {
        self.status = Some(StatusLine {
            text: text.into(),
            error: false,
        });
    }

    fn set_status_error(&mut self, text: impl Into<String>) {
        self.status = Some(StatusLine {
            text: text.into(),
            error: true,
        });
    }

    pub fn history(&self) -> &QueryHistory {
        &self.history
    }

    pub fn sql_input(&mut self) -> &mut SqlInput {
        &mut self.sql_input
    }

    pub fn hints(&self) -> &Hints {
        &self.hints
    }

    /// Prompt for a database path on startup when none was given on the
    /// command line.
    pub fn prompt_for_database(&mut self) {
        self.prompt.open(PromptPurpose::OpenDatabase);
    }

    /// Handles one event; may return a follow-up event for the main loop.
    pub fn event(&mut self, event: &AppEvent) -> Option<AppEvent> {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Open(path) => {
                self.open_database(path.clone());
                None
            }
            AppEvent::Resize(_, _) => None,
            AppEvent::Exit | AppEvent::Crash(_) => None,
        }
    }

    /// Opens (or replaces) the database connection. On failure the previous
    /// connection and its derived state are kept.
    pub fn open_database(&mut self, path: PathBuf) {
        match Database::open(&path) {
            Ok(db) => {
                self.table_names = db.table_names().unwrap_or_default();
                self.db = Some(db);
                self.table = None;
                self.view_lines.clear();
                self.result_scroll = 0;
                self.plot_modal.clear_columns();
                self.selection = TableSelection::None;
                self.table_list_state.select(None);
                self.status = None;
            }
            Err(_) => self.show_view_message("Failed to open selected database."),
        }
    }

    /// Runs the SQL in the editor. The query is recorded in history before
    /// any validation, so rejected and failed queries show up there too.
    pub fn run_sql(&mut self) {
        let sql = self.sql_input.text();
        self.history.push(sql.clone());

        if !database::is_select(&sql) {
            self.show_view_message("Only SELECT queries are allowed.");
            return;
        }

        let Some(db) = &self.db else {
            self.show_view_message("Query failed or returned no results.");
            return;
        };

        match db.run_query(&sql) {
            Ok(result) if !result.is_empty() => {
                self.load_table(result, TableSelection::CustomQueryResult);
                self.sql_input.clear();
            }
            _ => self.show_view_message("Query failed or returned no results."),
        }
    }

    /// Loads all rows of a named table into the view.
    pub fn select_table(&mut self, name: String) {
        let Some(db) = &self.db else {
            return;
        };
        match db.run_query(&database::select_all(&name)) {
            Ok(result) => self.load_table(result, TableSelection::Named(name)),
            Err(_) => self.show_view_message("Query failed or returned no results."),
        }
    }

    fn load_table(&mut self, result: ResultTable, selection: TableSelection) {
        self.view_lines = result.text_lines();
        self.result_scroll = 0;
        self.plot_modal.set_columns(&result.headers);
        match &selection {
            TableSelection::Named(name) => {
                let idx = self.table_names.iter().position(|n| n == name);
                self.table_list_state.select(idx);
            }
            _ => self.table_list_state.select(None),
        }
        self.selection = selection;
        self.table = Some(result);
        self.status = None;
    }

    /// Clears the result view and replaces it with a message. The cached
    /// table is deliberately left alone: export and plotting keep working
    /// on the last successful result, as in the original viewer.
    fn show_view_message(&mut self, message: &str) {
        self.view_lines = vec![message.to_string()];
        self.result_scroll = 0;
    }

    /// Opens the CSV save prompt, unless there is nothing to export.
    pub fn request_export(&mut self) {
        if self.table.as_ref().is_none_or(|t| t.rows.is_empty()) {
            self.set_status_error("No displayed table data to export.");
            return;
        }
        self.prompt.open(PromptPurpose::ExportCsv);
    }

    /// Writes the cached table to the given path, appending ".csv" if absent.
    pub fn export_csv(&mut self, raw_path: &str) {
        let Some(result) = &self.table else {
            self.set_status_error("No displayed table data to export.");
            return;
        };
        let mut path = raw_path.to_string();
        if !path.ends_with(".csv") {
            path.push_str(".csv");
        }
        match File::create(&path).and_then(|mut f| result.write_csv(&mut f)) {
            Ok(()) => self.set_status_info(format!("CSV export complete: {}", path)),
            Err(_) => self.set_status_error(format!("Failed to open file for writing: {}", path)),
        }
    }

    /// Builds a plot from the current controls and inserts it into the pane
    /// pool, evicting the oldest pane when three are already open.
    pub fn plot(&mut self) {
        let request = self.plot_modal.request();
        let Some(result) = &self.table else {
            self.set_status_error("Invalid X column selection.");
            return;
        };
        match plot::build_plot(result, &request) {
            Ok(pane) => {
                let y_dropped = pane.y_dropped;
                self.plots.insert(pane);
                if y_dropped {
                    self.set_status_info("Y column dropped (count mismatch); plotted X only.");
                } else {
                    self.status = None;
                }
            }
            Err(e) => self.set_status_error(e.to_string()),
        }
    }

    fn next_focus(&mut self) {
        self.set_focus(match self.focus {
            Focus::Tables => Focus::Sql,
            Focus::Sql => Focus::Plot,
            Focus::Plot => Focus::Tables,
        });
    }

    fn prev_focus(&mut self) {
        self.set_focus(match self.focus {
            Focus::Tables => Focus::Plot,
            Focus::Sql => Focus::Tables,
            Focus::Plot => Focus::Sql,
        });
    }

    fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        self.sql_input.set_focused(focus == Focus::Sql);
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Option<AppEvent> {
        if self.prompt.active {
            self.prompt_key(key);
            return None;
        }

        if self.focus == Focus::Sql {
            match key.code {
                KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.run_sql()
                }
                KeyCode::Esc => self.set_focus(Focus::Tables),
                KeyCode::Tab => self.next_focus(),
                KeyCode::BackTab => self.prev_focus(),
                _ => self.sql_input.input(*key),
            }
            return None;
        }

        match key.code {
            KeyCode::Char('q') => return Some(AppEvent::Exit),
            KeyCode::Tab => self.next_focus(),
            KeyCode::BackTab => self.prev_focus(),
            KeyCode::Char('h') => self.hints.toggle(),
            KeyCode::Char('o') => self.prompt.open(PromptPurpose::OpenDatabase),
            KeyCode::Char('e') => self.request_export(),
            KeyCode::Char('p') => self.plot(),
            KeyCode::PageDown => self.result_scroll = self.result_scroll.saturating_add(10),
            KeyCode::PageUp => self.result_scroll = self.result_scroll.saturating_sub(10),
            _ => match self.focus {
                Focus::Tables => self.tables_key(key),
                Focus::Plot => self.plot_controls_key(key),
                Focus::Sql => {}
            },
        }
        None
    }

    fn tables_key(&mut self, key: &KeyEvent) {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                if self.table_names.is_empty() {
                    return;
                }
                let i = self
                    .table_list_state
                    .selected()
                    .map_or(0, |i| (i + 1).min(self.table_names.len() - 1));
                self.table_list_state.select(Some(i));
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if self.table_names.is_empty() {
                    return;
                }
                let i = self
                    .table_list_state
                    .selected()
                    .map_or(0, |i| i.saturating_sub(1));
                self.table_list_state.select(Some(i));
            }
            KeyCode::Enter => {
                if let Some(i) = self.table_list_state.selected() {
                    if let Some(name) = self.table_names.get(i).cloned() {
                        self.select_table(name);
                    }
                }
            }
            _ => {}
        }
    }

    fn plot_controls_key(&mut self, key: &KeyEvent) {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.plot_modal.next_row(),
            KeyCode::Up | KeyCode::Char('k') => self.plot_modal.prev_row(),
            KeyCode::Right => self.plot_modal.cycle_right(),
            KeyCode::Left => self.plot_modal.cycle_left(),
            _ => {}
        }
    }

    fn prompt_key(&mut self, key: &KeyEvent) {
        match key.code {
            KeyCode::Esc => self.prompt.close(),
            KeyCode::Backspace => {
                self.prompt.input.pop();
            }
            KeyCode::Enter => {
                let input = self.prompt.input.trim().to_string();
                let purpose = self.prompt.purpose;
                self.prompt.close();
                if input.is_empty() {
                    return;
                }
                match purpose {
                    PromptPurpose::OpenDatabase => {
                        self.send_event(AppEvent::Open(PathBuf::from(input)))
                    }
                    PromptPurpose::ExportCsv => self.export_csv(&input),
                }
            }
            KeyCode::Char(c) => self.prompt.input.push(c),
            _ => {}
        }
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let hints_height = if self.hints.visible {
            self.hints.lines.len().min(6) as u16 + 2
        } else {
            0
        };

        let mut constraints = vec![
            Constraint::Length(1), // database path row
            Constraint::Fill(1),   // tables / results / plots
            Constraint::Length(5), // recent queries
            Constraint::Length(5), // sql editor
        ];
        if self.hints.visible {
            constraints.push(Constraint::Length(hints_height));
        }
        if self.status.is_some() {
            constraints.push(Constraint::Length(1));
        }
        constraints.push(Constraint::Length(1)); // controls bar

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        self.render_path_row(rows[0], buf);
        self.render_main(rows[1], buf);
        self.render_history(rows[2], buf);
        self.sql_input.render(rows[3], buf, &self.theme);

        let mut next = 4;
        if self.hints.visible {
            self.render_hints(rows[next], buf);
            next += 1;
        }
        if let Some(status) = &self.status {
            let role = if status.error {
                "status_error"
            } else {
                "text_secondary"
            };
            Paragraph::new(status.text.as_str())
                .style(Style::default().fg(self.theme.get(role)))
                .render(rows[next], buf);
            next += 1;
        }

        let controls = Controls::new()
            .with_row_count(self.table.as_ref().map(|t| t.rows.len()))
            .with_sql_active(self.focus == Focus::Sql)
            .with_hints_label(self.hints.toggle_label())
            .with_bg(self.theme.get("controls_bg"));
        (&controls).render(rows[next], buf);

        if self.prompt.active {
            self.render_prompt(area, buf);
        }
    }
}

impl App {
    fn render_path_row(&self, area: Rect, buf: &mut Buffer) {
        let text = match self.database_path() {
            Some(path) => format!("Database: {}", path.display()),
            None => "No database open (press o to select a file)".to_string(),
        };
        Paragraph::new(text)
            .style(Style::default().fg(self.theme.get("table_header")))
            .render(area, buf);
    }

    fn render_main(&mut self, area: Rect, buf: &mut Buffer) {
        let mut constraints = vec![Constraint::Length(30), Constraint::Fill(1)];
        if !self.plots.is_empty() {
            constraints.push(Constraint::Percentage(42));
        }
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Fill(1), Constraint::Length(6)])
            .split(columns[0]);

        self.render_table_list(left[0], buf);
        self.render_plot_controls(left[1], buf);
        self.render_results(columns[1], buf);

        if !self.plots.is_empty() {
            self.render_plots(columns[2], buf);
        }
    }

    fn render_table_list(&mut self, area: Rect, buf: &mut Buffer) {
        let border = if self.focus == Focus::Tables {
            self.theme.get("border_active")
        } else {
            self.theme.get("border")
        };
        let items: Vec<ListItem> = self
            .table_names
            .iter()
            .map(|name| ListItem::new(name.as_str()))
            .collect();
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border))
                    .title(" Tables "),
            )
            .highlight_style(
                Style::default()
                    .fg(self.theme.get("border_active"))
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        StatefulWidget::render(list, area, buf, &mut self.table_list_state);
    }

    fn render_plot_controls(&self, area: Rect, buf: &mut Buffer) {
        let border = if self.focus == Focus::Plot {
            self.theme.get("border_active")
        } else {
            self.theme.get("border")
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(" Plot Controls ");
        let inner = block.inner(area);
        block.render(area, buf);

        let modal = &self.plot_modal;
        let y_disabled = modal.dims == plot::PlotDims::OneD;
        let rows = [
            (
                PlotFocus::Kind,
                format!("Plot Type:  {}", modal.kind.as_str()),
                false,
            ),
            (
                PlotFocus::Dims,
                format!("Dimensions: {}", modal.dims.as_str()),
                false,
            ),
            (
                PlotFocus::XColumn,
                format!(
                    "X Column:   {}",
                    modal.column_name(modal.x_index).unwrap_or("(none)")
                ),
                false,
            ),
            (
                PlotFocus::YColumn,
                if y_disabled {
                    "Y Column:   -".to_string()
                } else {
                    format!(
                        "Y Column:   {}",
                        modal.column_name(modal.y_index).unwrap_or("(none)")
                    )
                },
                y_disabled,
            ),
        ];

        for (i, (row_focus, text, disabled)) in rows.iter().enumerate() {
            if i as u16 >= inner.height {
                break;
            }
            let style = if *disabled {
                Style::default().fg(self.theme.get("border"))
            } else if self.focus == Focus::Plot && modal.focus == *row_focus {
                Style::default().fg(self.theme.get("border_active"))
            } else {
                Style::default().fg(self.theme.get("text_primary"))
            };
            Paragraph::new(text.as_str()).style(style).render(
                Rect::new(inner.x, inner.y + i as u16, inner.width, 1),
                buf,
            );
        }
    }

    fn render_results(&self, area: Rect, buf: &mut Buffer) {
        let lines: Vec<Line> = self
            .view_lines
            .iter()
            .map(|l| Line::from(l.as_str()))
            .collect();
        Paragraph::new(lines)
            .scroll((self.result_scroll, 0))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.theme.get("border")))
                    .title(" Results "),
            )
            .render(area, buf);
    }

    fn render_plots(&self, area: Rect, buf: &mut Buffer) {
        let count = self.plots.len().max(1);
        let constraints = vec![Constraint::Ratio(1, count as u32); count];
        let slots = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);
        for (pane, slot) in self.plots.iter().zip(slots.iter()) {
            render_pane(*slot, buf, pane, &self.theme);
        }
    }

    fn render_history(&self, area: Rect, buf: &mut Buffer) {
        let visible = area.height.saturating_sub(2) as usize;
        let skip = self.history.len().saturating_sub(visible);
        let lines: Vec<Line> = self
            .history
            .iter()
            .skip(skip)
            .map(Line::from)
            .collect();
        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.theme.get("border")))
                    .title(" Recent Queries "),
            )
            .render(area, buf);
    }

    fn render_hints(&self, area: Rect, buf: &mut Buffer) {
        let lines: Vec<Line> = self
            .hints
            .lines
            .iter()
            .map(|l| Line::from(l.as_str()))
            .collect();
        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.theme.get("border")))
                    .title(" Example SQL Queries "),
            )
            .render(area, buf);
    }

    fn render_prompt(&self, area: Rect, buf: &mut Buffer) {
        let width = (area.width / 2).clamp(20, 60).min(area.width);
        // keep the popup inside the buffer on tiny terminals
        let popup = Rect::new(
            area.x + (area.width.saturating_sub(width)) / 2,
            area.y + area.height.saturating_sub(3) / 2,
            width,
            3u16.min(area.height),
        )
        .intersection(area);
        Clear.render(popup, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.get("border_active")))
            .title(self.prompt.title());
        let inner = block.inner(popup);
        block.render(popup, buf);
        Paragraph::new(format!("{}\u{2588}", self.prompt.input)).render(inner, buf);
    }
}
