//! Plot control state: kind, dimensionality, and X/Y column selection.

use crate::plot::{PlotDims, PlotKind, PlotRequest};

/// Focus row within the plot controls panel.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PlotFocus {
    #[default]
    Kind,
    Dims,
    XColumn,
    YColumn,
}

/// State of the plot controls.
///
/// Column selection is 1-indexed; index 0 means "no selection". The option
/// list is rebuilt from the loaded table's headers after every successful
/// query, so stale columns from a previous result can never be selected.
#[derive(Debug, Default)]
pub struct PlotModal {
    pub kind: PlotKind,
    pub dims: PlotDims,
    pub x_index: usize,
    pub y_index: usize,
    pub columns: Vec<String>,
    pub focus: PlotFocus,
}

impl PlotModal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the column options with the new table's headers and resets
    /// both selectors to "no selection".
    pub fn set_columns(&mut self, headers: &[String]) {
        self.columns = headers.to_vec();
        self.x_index = 0;
        self.y_index = 0;
    }

    /// Clears all column options (no table loaded).
    pub fn clear_columns(&mut self) {
        self.columns.clear();
        self.x_index = 0;
        self.y_index = 0;
    }

    /// Column name behind a 1-based selector value.
    pub fn column_name(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.columns.get(i))
            .map(String::as_str)
    }

    pub fn set_dims(&mut self, dims: PlotDims) {
        self.dims = dims;
        if dims == PlotDims::OneD {
            // Y selector is disabled and blanked in 1D mode.
            self.y_index = 0;
        }
    }

    /// Moves focus to the next row, skipping the Y selector in 1D mode.
    pub fn next_row(&mut self) {
        self.focus = match self.focus {
            PlotFocus::Kind => PlotFocus::Dims,
            PlotFocus::Dims => PlotFocus::XColumn,
            PlotFocus::XColumn if self.dims == PlotDims::TwoD => PlotFocus::YColumn,
            PlotFocus::XColumn => PlotFocus::Kind,
            PlotFocus::YColumn => PlotFocus::Kind,
        };
    }

    pub fn prev_row(&mut self) {
        self.focus = match self.focus {
            PlotFocus::Kind if self.dims == PlotDims::TwoD => PlotFocus::YColumn,
            PlotFocus::Kind => PlotFocus::XColumn,
            PlotFocus::Dims => PlotFocus::Kind,
            PlotFocus::XColumn => PlotFocus::Dims,
            PlotFocus::YColumn => PlotFocus::XColumn,
        };
    }

    /// Cycles the focused row's value forward (right arrow).
    pub fn cycle_right(&mut self) {
        match self.focus {
            PlotFocus::Kind => self.kind = self.kind.toggled(),
            PlotFocus::Dims => self.set_dims(self.dims.toggled()),
            PlotFocus::XColumn => {
                if self.x_index < self.columns.len() {
                    self.x_index += 1;
                }
            }
            PlotFocus::YColumn => {
                if self.dims == PlotDims::TwoD && self.y_index < self.columns.len() {
                    self.y_index += 1;
                }
            }
        }
    }

    /// Cycles the focused row's value backward (left arrow).
    pub fn cycle_left(&mut self) {
        match self.focus {
            PlotFocus::Kind => self.kind = self.kind.toggled(),
            PlotFocus::Dims => self.set_dims(self.dims.toggled()),
            PlotFocus::XColumn => self.x_index = self.x_index.saturating_sub(1),
            PlotFocus::YColumn => {
                if self.dims == PlotDims::TwoD {
                    self.y_index = self.y_index.saturating_sub(1);
                }
            }
        }
    }

    /// Snapshot of the current selection for the plot builder.
    pub fn request(&self) -> PlotRequest {
        PlotRequest {
            kind: self.kind,
            dims: self.dims,
            x_index: self.x_index,
            y_index: self.y_index,
        }
    }
}
