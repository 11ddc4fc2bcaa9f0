//! Plot building: numeric series extraction, histogram binning, and the
//! bounded pool of rendered plot panes.

use std::collections::VecDeque;

use color_eyre::eyre::eyre;
use color_eyre::Result;

use crate::binning::{axis_label, bin_count, entries_caption, freedman_diaconis};
use crate::table::ResultTable;

/// Maximum number of plot panes kept open at once.
pub const MAX_PANES: usize = 3;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PlotKind {
    #[default]
    Histogram,
    Scatter,
}

impl PlotKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Histogram => "Histogram",
            Self::Scatter => "Scatter",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Histogram => Self::Scatter,
            Self::Scatter => Self::Histogram,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PlotDims {
    #[default]
    OneD,
    TwoD,
}

impl PlotDims {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OneD => "1D",
            Self::TwoD => "2D",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::OneD => Self::TwoD,
            Self::TwoD => Self::OneD,
        }
    }
}

/// Snapshot of the plot controls at the moment the user asked for a plot.
/// Column indices are the 1-based selector values; 0 means no selection.
#[derive(Debug, Clone, Copy)]
pub struct PlotRequest {
    pub kind: PlotKind,
    pub dims: PlotDims,
    pub x_index: usize,
    pub y_index: usize,
}

/// Binned or point data behind one rendered pane.
#[derive(Debug, Clone)]
pub enum PlotData {
    Histogram1D {
        /// (bin center, count) per bin.
        bins: Vec<(f64, u64)>,
        bin_width: f64,
        min: f64,
        max: f64,
    },
    Histogram2D {
        /// counts[y][x], row 0 at the bottom of the value range.
        counts: Vec<Vec<u64>>,
        x_min: f64,
        x_max: f64,
        y_min: f64,
        y_max: f64,
    },
    Scatter {
        points: Vec<(f64, f64)>,
    },
}

/// One open plot pane.
#[derive(Debug, Clone)]
pub struct PlotPane {
    pub id: u64,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub data: PlotData,
    /// True when a 2D request fell back to the X series alone because the
    /// valid-value counts of the two columns did not match.
    pub y_dropped: bool,
}

impl PlotPane {
    pub fn name(&self) -> String {
        format!("plot_{}", self.id)
    }
}

/// Builds a plot pane from the current result table and the control state.
///
/// Non-numeric and empty cells are skipped independently per column. When a
/// 2D request ends up with X and Y series of different lengths, the plot
/// falls back to the 1D form on the X series alone, mirroring the behavior
/// of the original viewer.
pub fn build_plot(table: &ResultTable, request: &PlotRequest) -> Result<PlotPane> {
    let x_col = request
        .x_index
        .checked_sub(1)
        .filter(|i| *i < table.headers.len())
        .ok_or_else(|| eyre!("Invalid X column selection."))?;

    let y_col = match request.dims {
        PlotDims::TwoD => request
            .y_index
            .checked_sub(1)
            .filter(|i| *i < table.headers.len()),
        PlotDims::OneD => None,
    };

    let xs = table.numeric_column(x_col);
    if xs.is_empty() {
        return Err(eyre!("No numeric data in selected X column."));
    }
    let ys = y_col.map(|i| table.numeric_column(i));

    let x_name = &table.headers[x_col];
    let paired = matches!(&ys, Some(ys) if ys.len() == xs.len());
    let y_dropped = ys.is_some() && !paired;

    let pane = match (request.kind, paired) {
        (PlotKind::Histogram, false) => {
            let (bins, width, min, max) = bin_series(&xs);
            PlotPane {
                id: 0,
                title: axis_label(x_name),
                x_label: axis_label(x_name),
                y_label: entries_caption(width, x_name),
                data: PlotData::Histogram1D {
                    bins,
                    bin_width: width,
                    min,
                    max,
                },
                y_dropped,
            }
        }
        (PlotKind::Histogram, true) => {
            let ys = ys.as_deref().unwrap_or(&[]);
            let y_name = &table.headers[y_col.unwrap_or(0)];
            let (x_width, x_min, x_max) = series_bins(&xs);
            let (y_width, y_min, y_max) = series_bins(ys);
            let nx = bin_count(x_min, x_max, x_width);
            let ny = bin_count(y_min, y_max, y_width);

            let mut counts = vec![vec![0u64; nx]; ny];
            for (&x, &y) in xs.iter().zip(ys) {
                let bx = bin_index(x, x_min, x_max, nx);
                let by = bin_index(y, y_min, y_max, ny);
                counts[by][bx] += 1;
            }

            PlotPane {
                id: 0,
                title: format!(
                    "2D Histogram of {} vs {}",
                    axis_label(x_name),
                    axis_label(y_name)
                ),
                x_label: axis_label(x_name),
                y_label: axis_label(y_name),
                data: PlotData::Histogram2D {
                    counts,
                    x_min,
                    x_max,
                    y_min,
                    y_max,
                },
                y_dropped,
            }
        }
        (PlotKind::Scatter, false) => PlotPane {
            id: 0,
            title: x_name.clone(),
            x_label: "Index".to_string(),
            y_label: x_name.clone(),
            data: PlotData::Scatter {
                points: xs.iter().enumerate().map(|(i, &v)| (i as f64, v)).collect(),
            },
            y_dropped,
        },
        (PlotKind::Scatter, true) => {
            let ys = ys.as_deref().unwrap_or(&[]);
            let y_name = &table.headers[y_col.unwrap_or(0)];
            PlotPane {
                id: 0,
                title: "2D Scatter Plot".to_string(),
                x_label: x_name.clone(),
                y_label: y_name.clone(),
                data: PlotData::Scatter {
                    points: xs.iter().copied().zip(ys.iter().copied()).collect(),
                },
                y_dropped,
            }
        }
    };

    Ok(pane)
}

/// Freedman-Diaconis width plus the series extent.
fn series_bins(data: &[f64]) -> (f64, f64, f64) {
    let width = freedman_diaconis(data);
    let min = data.iter().copied().fold(f64::INFINITY, f64::min);
    let max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (width, min, max)
}

/// Bins a series into (center, count) pairs.
fn bin_series(data: &[f64]) -> (Vec<(f64, u64)>, f64, f64, f64) {
    let (width, min, max) = series_bins(data);
    let n = bin_count(min, max, width);
    let span_width = if max > min { (max - min) / n as f64 } else { width };

    let mut counts = vec![0u64; n];
    for &v in data {
        counts[bin_index(v, min, max, n)] += 1;
    }

    let bins = counts
        .into_iter()
        .enumerate()
        .map(|(i, c)| (min + (i as f64 + 0.5) * span_width, c))
        .collect();
    (bins, width, min, max)
}

fn bin_index(v: f64, min: f64, max: f64, n: usize) -> usize {
    if max <= min {
        return 0;
    }
    let idx = ((v - min) / (max - min) * n as f64) as usize;
    idx.min(n - 1)
}

/// Bounded FIFO pool of open plot panes.
///
/// Holds at most [`MAX_PANES`] panes; the oldest is closed before a new one
/// is inserted when the pool is full. Pane names come from a counter owned
/// by the pool rather than any ambient randomness.
#[derive(Debug, Default)]
pub struct PlotPool {
    panes: VecDeque<PlotPane>,
    next_pane_id: u64,
}

impl PlotPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a pane, evicting the oldest first when at capacity.
    /// Returns the id assigned to the new pane.
    pub fn insert(&mut self, mut pane: PlotPane) -> u64 {
        if self.panes.len() >= MAX_PANES {
            self.panes.pop_front();
        }
        self.next_pane_id += 1;
        pane.id = self.next_pane_id;
        let id = pane.id;
        self.panes.push_back(pane);
        id
    }

    pub fn len(&self) -> usize {
        self.panes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panes.is_empty()
    }

    /// Panes oldest-first.
    pub fn iter(&self) -> impl Iterator<Item = &PlotPane> {
        self.panes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numeric_table() -> ResultTable {
        let rows = (0..40)
            .map(|i| vec![format!("{}", i), format!("{}", i * 2), "word".to_string()])
            .collect();
        ResultTable::new(
            vec!["x__ns".to_string(), "y".to_string(), "label".to_string()],
            rows,
        )
    }

    fn sample_pane(i: u64) -> PlotPane {
        PlotPane {
            id: i,
            title: String::new(),
            x_label: String::new(),
            y_label: String::new(),
            data: PlotData::Scatter { points: vec![] },
            y_dropped: false,
        }
    }

    #[test]
    fn invalid_x_selection_aborts() {
        let table = numeric_table();
        let request = PlotRequest {
            kind: PlotKind::Histogram,
            dims: PlotDims::OneD,
            x_index: 0,
            y_index: 0,
        };
        let err = build_plot(&table, &request).unwrap_err();
        assert_eq!(err.to_string(), "Invalid X column selection.");

        let request = PlotRequest {
            x_index: 99,
            ..request
        };
        assert!(build_plot(&table, &request).is_err());
    }

    #[test]
    fn histogram_1d_bins_and_labels() {
        let table = numeric_table();
        let request = PlotRequest {
            kind: PlotKind::Histogram,
            dims: PlotDims::OneD,
            x_index: 1,
            y_index: 0,
        };
        let pane = build_plot(&table, &request).unwrap();
        assert_eq!(pane.x_label, "x (ns)");
        assert!(pane.y_label.starts_with("Entries / "));
        match pane.data {
            PlotData::Histogram1D {
                ref bins,
                bin_width,
                min,
                max,
            } => {
                assert!(!bins.is_empty());
                assert!(bin_width > 0.0);
                assert_eq!(min, 0.0);
                assert_eq!(max, 39.0);
                let total: u64 = bins.iter().map(|(_, c)| c).sum();
                assert_eq!(total, 40);
            }
            _ => panic!("expected a 1D histogram"),
        }
    }

    #[test]
    fn histogram_2d_counts_everything() {
        let table = numeric_table();
        let request = PlotRequest {
            kind: PlotKind::Histogram,
            dims: PlotDims::TwoD,
            x_index: 1,
            y_index: 2,
        };
        let pane = build_plot(&table, &request).unwrap();
        assert!(pane.title.starts_with("2D Histogram of"));
        assert!(!pane.y_dropped);
        match pane.data {
            PlotData::Histogram2D { ref counts, .. } => {
                let total: u64 = counts.iter().flatten().sum();
                assert_eq!(total, 40);
            }
            _ => panic!("expected a 2D histogram"),
        }
    }

    #[test]
    fn scatter_1d_uses_row_index() {
        let table = numeric_table();
        let request = PlotRequest {
            kind: PlotKind::Scatter,
            dims: PlotDims::OneD,
            x_index: 2,
            y_index: 0,
        };
        let pane = build_plot(&table, &request).unwrap();
        assert_eq!(pane.x_label, "Index");
        match pane.data {
            PlotData::Scatter { ref points } => {
                assert_eq!(points[0], (0.0, 0.0));
                assert_eq!(points[3], (3.0, 6.0));
            }
            _ => panic!("expected a scatter"),
        }
    }

    #[test]
    fn mismatched_series_falls_back_to_1d() {
        // Column "label" never parses, so the Y series is empty while X has
        // 40 values; the builder must fall back to 1D on X alone.
        let table = numeric_table();
        let request = PlotRequest {
            kind: PlotKind::Histogram,
            dims: PlotDims::TwoD,
            x_index: 1,
            y_index: 3,
        };
        let pane = build_plot(&table, &request).unwrap();
        assert!(pane.y_dropped);
        assert!(matches!(pane.data, PlotData::Histogram1D { .. }));
    }

    #[test]
    fn pool_caps_at_three() {
        let mut pool = PlotPool::new();
        for i in 0..4 {
            pool.insert(sample_pane(i));
        }
        assert_eq!(pool.len(), MAX_PANES);
        // oldest (first-inserted) pane was evicted
        let ids: Vec<u64> = pool.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 3, 4]);
    }

    #[test]
    fn pool_names_are_sequential() {
        let mut pool = PlotPool::new();
        let a = pool.insert(sample_pane(0));
        let b = pool.insert(sample_pane(0));
        assert_eq!(a, 1);
        assert_eq!(b, 2);
        assert_eq!(pool.iter().next().unwrap().name(), "plot_1");
    }
}
