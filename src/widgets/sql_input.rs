//! Multi-line SQL editor wrapping tui-textarea.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Widget},
};
use tui_textarea::{Input, Key, TextArea};

use crate::config::Theme;

pub struct SqlInput {
    textarea: TextArea<'static>,
    focused: bool,
}

impl Default for SqlInput {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlInput {
    pub fn new() -> Self {
        let mut widget = Self {
            textarea: TextArea::default(),
            focused: false,
        };
        widget.apply_styles();
        widget
    }

    fn apply_styles(&mut self) {
        self.textarea.set_cursor_line_style(Style::default());
        let cursor = if self.focused {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        self.textarea.set_cursor_style(cursor);
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        self.apply_styles();
    }

    /// Current editor contents as a single SQL string.
    pub fn text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.textarea.lines().iter().all(|l| l.is_empty())
    }

    /// Replaces the editor contents.
    pub fn set_text(&mut self, text: &str) {
        self.textarea = TextArea::new(text.lines().map(str::to_string).collect());
        self.apply_styles();
    }

    pub fn clear(&mut self) {
        self.textarea = TextArea::default();
        self.apply_styles();
    }

    /// Feeds a key into the editor (insertion, cursor movement, selection).
    pub fn input(&mut self, key: KeyEvent) {
        self.textarea.input(key_event_to_input(&key));
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let border = if self.focused {
            theme.get("border_active")
        } else {
            theme.get("border")
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(" Execute SQL ");
        let inner = block.inner(area);
        block.render(area, buf);
        (&self.textarea).render(inner, buf);
    }
}

/// Convert a crossterm KeyEvent into tui_textarea's Input. The textarea is
/// built against ratatui's re-exported crossterm, so the direct crossterm
/// event types do not convert via `From`.
fn key_event_to_input(event: &KeyEvent) -> Input {
    let key = match event.code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Enter => Key::Enter,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Tab => Key::Tab,
        KeyCode::Delete => Key::Delete,
        KeyCode::Esc => Key::Esc,
        _ => Key::Null,
    };

    Input {
        key,
        ctrl: event.modifiers.contains(KeyModifiers::CONTROL),
        alt: event.modifiers.contains(KeyModifiers::ALT),
        shift: event.modifiers.contains(KeyModifiers::SHIFT),
    }
}
