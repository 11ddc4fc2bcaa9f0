use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    widgets::{Paragraph, Widget},
};

pub struct Controls {
    pub row_count: Option<usize>,
    pub sql_active: bool,
    pub hints_label: &'static str,
    pub bg: Color,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            row_count: None,
            sql_active: false,
            hints_label: "",
            bg: Color::DarkGray,
        }
    }
}

impl Controls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_row_count(mut self, row_count: Option<usize>) -> Self {
        self.row_count = row_count;
        self
    }

    pub fn with_sql_active(mut self, sql_active: bool) -> Self {
        self.sql_active = sql_active;
        self
    }

    pub fn with_hints_label(mut self, hints_label: &'static str) -> Self {
        self.hints_label = hints_label;
        self
    }

    pub fn with_bg(mut self, bg: Color) -> Self {
        self.bg = bg;
        self
    }
}

impl Widget for &Controls {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let controls: [(&str, &str); 8] = [
            ("Tab", "Focus"),
            ("^R", "Run SQL"),
            ("p", "Plot"),
            ("e", "Export CSV"),
            ("o", "Open DB"),
            ("h", self.hints_label),
            ("Enter", "Load Table"),
            ("q", "Quit"),
        ];

        let mut constraints = controls.iter().fold(vec![], |mut acc, (key, action)| {
            acc.push(Constraint::Length(key.chars().count() as u16 + 2));
            acc.push(Constraint::Length(action.chars().count() as u16 + 1));
            acc
        });

        // Add space for row count if available
        if self.row_count.is_some() {
            constraints.push(Constraint::Length(15)); // Space for "Rows: 12345"
        }
        constraints.push(Constraint::Fill(1)); // Fill the remaining space

        let layout = Layout::new(Direction::Horizontal, constraints).split(area);
        let color = self.bg;

        for (i, (key, action)) in controls.iter().enumerate() {
            let j = i * 2;
            Paragraph::new(*key)
                .style(Style::default().bold())
                .centered()
                .render(layout[j], buf);
            // Highlight the Run SQL label while the editor has focus
            let action_style = if *key == "^R" && self.sql_active {
                Style::default().bg(color).fg(Color::Cyan)
            } else {
                Style::default().bg(color)
            };
            Paragraph::new(*action)
                .style(action_style)
                .render(layout[j + 1], buf);
        }

        let mut fill_start_idx = controls.len() * 2;
        if let Some(count) = self.row_count {
            let row_count_text = format!("Rows: {}", count);
            Paragraph::new(row_count_text)
                .style(Style::default().bg(color).fg(Color::White))
                .right_aligned()
                .render(layout[fill_start_idx], buf);
            fill_start_idx += 1;
        }

        Paragraph::new("")
            .style(Style::default().bg(color))
            .render(layout[fill_start_idx], buf);
    }
}
