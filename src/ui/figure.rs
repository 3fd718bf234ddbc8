use std::ops::RangeInclusive;

use eframe::egui::{self, Color32, RichText, ScrollArea, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Line, MarkerShape, Plot,
    PlotPoint, PlotPoints, Points, Polygon, Text,
};

use crate::charts::{Figure, FigureContent, PairGrid, Violin};
use crate::color::{column_palette, contrasting_text, coolwarm};
use crate::data::stats::{BoxSummary, Histogram};
use crate::state::AppState;

/// Half of the widest violin, in category units.
const VIOLIN_HALF_WIDTH: f64 = 0.4;
const INNER_BOX: Color32 = Color32::from_gray(40);

// ---------------------------------------------------------------------------
// Figure window
// ---------------------------------------------------------------------------

/// Show the open figure in its own native window until the user closes it.
///
/// Backends without multi-viewport support get an egui window instead.
pub fn show_figure_window(ctx: &egui::Context, state: &mut AppState) {
    let Some(figure) = &state.figure else {
        return;
    };

    let mut close = false;
    ctx.show_viewport_immediate(
        egui::ViewportId::from_hash_of("figure_window"),
        egui::ViewportBuilder::default()
            .with_title(figure.title())
            .with_inner_size([960.0, 640.0]),
        |ctx, class| {
            if matches!(class, egui::ViewportClass::Embedded) {
                let mut open = true;
                egui::Window::new(figure.title())
                    .open(&mut open)
                    .default_size([800.0, 520.0])
                    .show(ctx, |ui: &mut Ui| draw_figure(ui, figure));
                close = !open;
            } else {
                egui::CentralPanel::default().show(ctx, |ui: &mut Ui| draw_figure(ui, figure));
                if ctx.input(|i| i.viewport().close_requested()) {
                    close = true;
                }
            }
        },
    );

    if close {
        log::debug!("Closed {} window", figure.kind);
        state.close_figure();
    }
}

pub fn draw_figure(ui: &mut Ui, figure: &Figure) {
    match &figure.content {
        FigureContent::Boxes(boxes) => {
            title(ui, figure.title());
            boxplot(ui, &figure.columns, boxes);
        }
        FigureContent::Violins {
            violins,
            max_density,
        } => {
            title(ui, figure.title());
            violinplot(ui, &figure.columns, violins, *max_density);
        }
        FigureContent::Correlation(matrix) => {
            title(ui, figure.title());
            heatmap(ui, &figure.columns, matrix);
        }
        FigureContent::Pairs(grid) => pairplot(ui, &figure.columns, grid),
    }
}

fn title(ui: &mut Ui, text: &str) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(text);
    });
}

// ---------------------------------------------------------------------------
// Axis helpers
// ---------------------------------------------------------------------------

/// Label integer grid marks with column names; every other mark is blank.
fn category_formatter(
    names: Vec<String>,
    sign: f64,
) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark: GridMark, _range: &RangeInclusive<f64>| {
        let v = mark.value * sign;
        if v < -0.01 || (v - v.round()).abs() > 0.01 {
            return String::new();
        }
        names.get(v.round() as usize).cloned().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Boxplot
// ---------------------------------------------------------------------------

fn boxplot(ui: &mut Ui, columns: &[String], boxes: &[Option<BoxSummary>]) {
    let colors = column_palette(columns.len());

    Plot::new("boxplot")
        .legend(Legend::default())
        .x_axis_formatter(category_formatter(columns.to_vec(), 1.0))
        .y_axis_label("Value")
        .show(ui, |plot_ui| {
            for (i, (name, summary)) in columns.iter().zip(boxes).enumerate() {
                let Some(b) = summary else {
                    continue;
                };
                let x = i as f64;
                let color = colors[i];

                let elem = BoxElem::new(
                    x,
                    BoxSpread::new(b.lower_whisker, b.q1, b.median, b.q3, b.upper_whisker),
                )
                .name(name)
                .box_width(0.6)
                .whisker_width(0.3)
                .fill(color.gamma_multiply(0.5))
                .stroke(Stroke::new(1.5, color));
                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(name).color(color));

                if !b.outliers.is_empty() {
                    let points: PlotPoints = b.outliers.iter().map(|&v| [x, v]).collect();
                    plot_ui.points(
                        Points::new(points)
                            .shape(MarkerShape::Diamond)
                            .radius(3.0)
                            .color(color),
                    );
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Violinplot
// ---------------------------------------------------------------------------

fn violinplot(ui: &mut Ui, columns: &[String], violins: &[Option<Violin>], max_density: f64) {
    let colors = column_palette(columns.len());

    Plot::new("violinplot")
        .legend(Legend::default())
        .x_axis_formatter(category_formatter(columns.to_vec(), 1.0))
        .y_axis_label("Value")
        .show(ui, |plot_ui| {
            for (i, (name, violin)) in columns.iter().zip(violins).enumerate() {
                let Some(violin) = violin else {
                    continue;
                };
                let x = i as f64;
                let color = colors[i];

                if let Some(d) = violin.density.as_ref().filter(|_| max_density > 0.0) {
                    let half = |p: f64| p / max_density * VIOLIN_HALF_WIDTH;
                    let right = d.support.iter().zip(&d.density).map(|(&y, &p)| [x + half(p), y]);
                    let left = d
                        .support
                        .iter()
                        .zip(&d.density)
                        .rev()
                        .map(|(&y, &p)| [x - half(p), y]);
                    let outline: PlotPoints = right.chain(left).collect();
                    plot_ui.polygon(
                        Polygon::new(outline)
                            .name(name)
                            .fill_color(color.gamma_multiply(0.6))
                            .stroke(Stroke::new(1.0, color)),
                    );
                }

                let s = &violin.summary;
                plot_ui.line(
                    Line::new(vec![[x, s.lower_whisker], [x, s.upper_whisker]])
                        .color(INNER_BOX)
                        .width(1.5),
                );
                plot_ui.line(Line::new(vec![[x, s.q1], [x, s.q3]]).color(INNER_BOX).width(6.0));
                plot_ui.points(
                    Points::new(vec![[x, s.median]])
                        .radius(3.0)
                        .color(Color32::WHITE),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Correlation heatmap
// ---------------------------------------------------------------------------

/// Row `i` sits at `y = -i` so the first column is at the top.
fn heatmap(ui: &mut Ui, columns: &[String], matrix: &[Vec<f64>]) {
    let n = columns.len();
    let extent = n as f64 - 0.5;

    Plot::new("heatmap")
        .data_aspect(1.0)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .include_x(-0.5)
        .include_x(extent)
        .include_y(0.5)
        .include_y(-extent)
        .x_axis_formatter(category_formatter(columns.to_vec(), 1.0))
        .y_axis_formatter(category_formatter(columns.to_vec(), -1.0))
        .show(ui, |plot_ui| {
            for (i, row) in matrix.iter().enumerate() {
                for (j, &r) in row.iter().enumerate() {
                    if r.is_nan() {
                        continue;
                    }
                    let (x, y) = (j as f64, -(i as f64));
                    let fill = coolwarm(r);
                    let cell = vec![
                        [x - 0.5, y - 0.5],
                        [x + 0.5, y - 0.5],
                        [x + 0.5, y + 0.5],
                        [x - 0.5, y + 0.5],
                    ];
                    plot_ui.polygon(
                        Polygon::new(cell)
                            .fill_color(fill)
                            .stroke(Stroke::new(0.5, Color32::WHITE)),
                    );
                    plot_ui.text(Text::new(
                        PlotPoint::new(x, y),
                        RichText::new(format!("{r:.2}")).color(contrasting_text(fill)),
                    ));
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Pairplot
// ---------------------------------------------------------------------------

fn histogram_bars(hist: &Histogram, color: Color32) -> BarChart {
    let width = hist.bin_width();
    let bars = hist
        .counts
        .iter()
        .zip(hist.edges.windows(2))
        .map(|(&count, edge)| {
            Bar::new((edge[0] + edge[1]) / 2.0, count as f64)
                .width(width)
                .fill(color)
        })
        .collect();
    BarChart::new(bars).color(color)
}

fn pairplot(ui: &mut Ui, columns: &[String], grid: &PairGrid) {
    let n = columns.len();
    let color = column_palette(1)[0];
    let avail = ui.available_size();
    let cell = ((avail.x.min(avail.y) - 48.0) / n as f32).clamp(120.0, 260.0);

    ScrollArea::both()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("pairplot_grid")
                .spacing([4.0, 4.0])
                .show(ui, |ui: &mut Ui| {
                    for row in 0..n {
                        for col in 0..n {
                            let mut plot = Plot::new(("pairplot", row, col))
                                .width(cell)
                                .height(cell)
                                .allow_drag(false)
                                .allow_zoom(false)
                                .allow_scroll(false)
                                .allow_boxed_zoom(false);
                            if row + 1 == n {
                                plot = plot.x_axis_label(columns[col].clone());
                            }
                            if col == 0 {
                                plot = plot.y_axis_label(columns[row].clone());
                            }

                            plot.show(ui, |plot_ui| {
                                if row == col {
                                    if let Some(hist) = &grid.histograms[col] {
                                        plot_ui.bar_chart(histogram_bars(hist, color));
                                    }
                                } else {
                                    let points: PlotPoints =
                                        grid.scatter[row][col].iter().copied().collect();
                                    plot_ui.points(Points::new(points).radius(2.0).color(color));
                                }
                            });
                        }
                        ui.end_row();
                    }
                });
        });
}
