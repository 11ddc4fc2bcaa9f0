//! Renders one plot pane: 1D histograms and scatters via `Chart` datasets,
//! 2D histograms as a shaded density grid written into the buffer.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Widget},
};

use crate::binning::format_number;
use crate::config::Theme;
use crate::plot::{PlotData, PlotPane};

/// Intensity ramp for the 2D histogram grid, lightest to densest.
const DENSITY_RAMP: [char; 5] = [' ', '\u{2591}', '\u{2592}', '\u{2593}', '\u{2588}'];

/// Renders a pane with its border, title, and chart body.
pub fn render_pane(area: Rect, buf: &mut Buffer, pane: &PlotPane, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.get("border")))
        .title(format!(" {}: {} ", pane.name(), pane.title));
    let inner = block.inner(area);
    block.render(area, buf);

    if inner.width < 8 || inner.height < 4 {
        return;
    }

    match &pane.data {
        PlotData::Histogram1D { bins, min, max, .. } => {
            let data: Vec<(f64, f64)> = bins.iter().map(|&(x, c)| (x, c as f64)).collect();
            let max_count = data.iter().map(|&(_, c)| c).fold(0.0, f64::max);
            render_xy_chart(
                inner,
                buf,
                &data,
                GraphType::Bar,
                symbols::Marker::HalfBlock,
                theme.get("plot_marker"),
                (*min, *max, 0.0, max_count.max(1.0)),
                &pane.x_label,
                &pane.y_label,
                theme,
            );
        }
        PlotData::Scatter { points } => {
            let (x_min, x_max, y_min, y_max) = point_extent(points);
            render_xy_chart(
                inner,
                buf,
                points,
                GraphType::Scatter,
                symbols::Marker::Dot,
                theme.get("plot_marker_alt"),
                (x_min, x_max, y_min, y_max),
                &pane.x_label,
                &pane.y_label,
                theme,
            );
        }
        PlotData::Histogram2D {
            counts,
            x_min,
            x_max,
            y_min,
            y_max,
        } => {
            render_density_grid(
                inner,
                buf,
                counts,
                (*x_min, *x_max, *y_min, *y_max),
                &pane.x_label,
                &pane.y_label,
                theme,
            );
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn render_xy_chart(
    area: Rect,
    buf: &mut Buffer,
    data: &[(f64, f64)],
    graph_type: GraphType,
    marker: symbols::Marker,
    color: Color,
    extent: (f64, f64, f64, f64),
    x_label: &str,
    y_label: &str,
    theme: &Theme,
) {
    if data.is_empty() {
        Paragraph::new("No valid data points")
            .style(Style::default().fg(theme.get("text_secondary")))
            .centered()
            .render(area, buf);
        return;
    }

    let (x_min, x_max, y_min, y_max) = pad_degenerate(extent);
    let axis_label_style = Style::default().fg(theme.get("text_primary"));

    let x_labels = vec![
        Span::styled(format_number(x_min), axis_label_style),
        Span::styled(format_number((x_min + x_max) / 2.0), axis_label_style),
        Span::styled(format_number(x_max), axis_label_style),
    ];
    let y_labels = vec![
        Span::styled(format_number(y_min), axis_label_style),
        Span::styled(format_number((y_min + y_max) / 2.0), axis_label_style),
        Span::styled(format_number(y_max), axis_label_style),
    ];

    let datasets = vec![Dataset::default()
        .marker(marker)
        .graph_type(graph_type)
        .style(Style::default().fg(color))
        .data(data)];

    let x_axis = Axis::default()
        .title(x_label.to_string())
        .bounds([x_min, x_max])
        .style(Style::default().fg(theme.get("text_primary")))
        .labels(x_labels);
    let y_axis = Axis::default()
        .title(y_label.to_string())
        .bounds([y_min, y_max])
        .style(Style::default().fg(theme.get("text_primary")))
        .labels(y_labels);

    Chart::new(datasets)
        .x_axis(x_axis)
        .y_axis(y_axis)
        .legend_position(None)
        .render(area, buf);
}

/// Draws a 2D histogram as shaded cells, densest bins brightest. The bottom
/// line names both axes since the grid fills the whole body.
fn render_density_grid(
    area: Rect,
    buf: &mut Buffer,
    counts: &[Vec<u64>],
    extent: (f64, f64, f64, f64),
    x_label: &str,
    y_label: &str,
    theme: &Theme,
) {
    let (x_min, x_max, y_min, y_max) = extent;
    let grid_height = area.height.saturating_sub(1);
    if grid_height == 0 || counts.is_empty() || counts[0].is_empty() {
        return;
    }

    let ny = counts.len();
    let nx = counts[0].len();
    let max_count = counts.iter().flatten().copied().max().unwrap_or(0);

    for row in 0..grid_height {
        for col in 0..area.width {
            // screen row 0 is the top, bin row 0 the bottom of the range
            let by = ((grid_height - 1 - row) as usize * ny) / grid_height as usize;
            let bx = (col as usize * nx) / area.width as usize;
            let count = counts[by.min(ny - 1)][bx.min(nx - 1)];
            if count == 0 {
                continue;
            }
            let level = 1 + (count - 1) as usize * (DENSITY_RAMP.len() - 2)
                / max_count.max(1) as usize;
            let symbol = DENSITY_RAMP[level.min(DENSITY_RAMP.len() - 1)];
            let cell = &mut buf[(area.x + col, area.y + row)];
            cell.set_char(symbol);
            cell.set_fg(theme.get("plot_marker"));
        }
    }

    let caption = format!(
        "x: {} [{}, {}]   y: {} [{}, {}]",
        x_label,
        format_number(x_min),
        format_number(x_max),
        y_label,
        format_number(y_min),
        format_number(y_max),
    );
    Paragraph::new(caption)
        .style(Style::default().fg(theme.get("text_secondary")))
        .render(
            Rect::new(area.x, area.y + grid_height, area.width, 1),
            buf,
        );
}

fn point_extent(points: &[(f64, f64)]) -> (f64, f64, f64, f64) {
    points.iter().fold(
        (
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::INFINITY,
            f64::NEG_INFINITY,
        ),
        |(x0, x1, y0, y1), &(x, y)| (x0.min(x), x1.max(x), y0.min(y), y1.max(y)),
    )
}

fn pad_degenerate((x_min, x_max, y_min, y_max): (f64, f64, f64, f64)) -> (f64, f64, f64, f64) {
    let (x_min, x_max) = if x_max > x_min {
        (x_min, x_max)
    } else {
        (x_min - 0.5, x_min + 0.5)
    };
    let (y_min, y_max) = if y_max > y_min {
        (y_min, y_max)
    } else {
        (y_min - 0.5, y_min + 0.5)
    };
    (x_min, x_max, y_min, y_max)
}
