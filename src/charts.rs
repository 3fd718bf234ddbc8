use std::fmt;

use crate::data::model::DataFrame;
use crate::data::stats::{correlation_matrix, gaussian_kde, BoxSummary, Density, Histogram};

/// Grid resolution of each violin's density curve.
const VIOLIN_GRID: usize = 100;
/// Bandwidths the violin extends past the extreme observations.
const VIOLIN_CUT: f64 = 2.0;

// ---------------------------------------------------------------------------
// Chart kinds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Boxplot,
    Pairplot,
    Heatmap,
    Violinplot,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::Boxplot,
        ChartKind::Pairplot,
        ChartKind::Heatmap,
        ChartKind::Violinplot,
    ];

    /// Window title of the rendered figure.
    pub fn title(self) -> &'static str {
        match self {
            ChartKind::Boxplot => "Boxplot of numeric columns",
            ChartKind::Pairplot => "Pairplot",
            ChartKind::Heatmap => "Correlation heatmap",
            ChartKind::Violinplot => "Violinplot of numeric columns",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ChartKind::Boxplot => "Boxplot",
            ChartKind::Pairplot => "Pairplot",
            ChartKind::Heatmap => "Heatmap",
            ChartKind::Violinplot => "Violinplot",
        };
        f.write_str(label)
    }
}

// ---------------------------------------------------------------------------
// Figure data
// ---------------------------------------------------------------------------

/// One violin: its inner box and, when the data has spread, its density.
#[derive(Debug, Clone, PartialEq)]
pub struct Violin {
    pub summary: BoxSummary,
    pub density: Option<Density>,
}

/// Data of an n × n scatter matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct PairGrid {
    /// Diagonal: one histogram per column.
    pub histograms: Vec<Option<Histogram>>,
    /// `scatter[row][col]`: points `[x = col value, y = row value]`.
    pub scatter: Vec<Vec<Vec<[f64; 2]>>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FigureContent {
    /// `None` for a column without any value.
    Boxes(Vec<Option<BoxSummary>>),
    Violins {
        violins: Vec<Option<Violin>>,
        /// Largest density over all violins, shared so widths compare by area.
        max_density: f64,
    },
    Correlation(Vec<Vec<f64>>),
    Pairs(PairGrid),
}

/// Everything needed to draw a chart, computed once per visualize action.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub kind: ChartKind,
    pub columns: Vec<String>,
    pub content: FigureContent,
}

impl Figure {
    /// Compute the figure for `kind` over an already numeric-only frame.
    pub fn build(kind: ChartKind, numeric: &DataFrame) -> Self {
        let columns: Vec<String> = numeric.columns().iter().map(|c| c.name.clone()).collect();
        let present: Vec<Vec<f64>> = numeric.columns().iter().map(|c| c.present_values()).collect();

        let content = match kind {
            ChartKind::Boxplot => FigureContent::Boxes(
                present.iter().map(|v| BoxSummary::from_values(v)).collect(),
            ),
            ChartKind::Violinplot => {
                let violins: Vec<Option<Violin>> = present
                    .iter()
                    .map(|v| {
                        Some(Violin {
                            summary: BoxSummary::from_values(v)?,
                            density: gaussian_kde(v, VIOLIN_GRID, VIOLIN_CUT),
                        })
                    })
                    .collect();
                let max_density = violins
                    .iter()
                    .flatten()
                    .filter_map(|v| v.density.as_ref())
                    .map(Density::max_density)
                    .fold(0.0, f64::max);
                FigureContent::Violins {
                    violins,
                    max_density,
                }
            }
            ChartKind::Heatmap => {
                let raw: Vec<Vec<Option<f64>>> =
                    numeric.columns().iter().map(|c| c.numeric_values()).collect();
                FigureContent::Correlation(correlation_matrix(&raw))
            }
            ChartKind::Pairplot => FigureContent::Pairs(pair_grid(numeric)),
        };

        log::debug!("Built {kind} figure over {} columns", columns.len());
        Self {
            kind,
            columns,
            content,
        }
    }

    pub fn title(&self) -> &'static str {
        self.kind.title()
    }
}

fn pair_grid(numeric: &DataFrame) -> PairGrid {
    let raw: Vec<Vec<Option<f64>>> = numeric.columns().iter().map(|c| c.numeric_values()).collect();
    let histograms = numeric
        .columns()
        .iter()
        .map(|c| Histogram::sturges(&c.present_values()))
        .collect();

    let scatter = raw
        .iter()
        .map(|ys| {
            raw.iter()
                .map(|xs| {
                    xs.iter()
                        .zip(ys)
                        .filter_map(|pair| match pair {
                            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some([*x, *y]),
                            _ => None,
                        })
                        .collect()
                })
                .collect()
        })
        .collect();

    PairGrid {
        histograms,
        scatter,
    }
}
