//! Descriptive statistics behind the charts.
//!
//! Conventions follow numpy/scipy defaults: linear-interpolated quantiles,
//! sample standard deviation (ddof = 1), Scott's rule for kernel bandwidth.

/// Quantile of an ascending, NaN-free slice by linear interpolation.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            let frac = pos - lo as f64;
            sorted[lo] + (sorted[hi] - sorted[lo]) * frac
        }
    }
}

fn sorted_finite(values: &[f64]) -> Vec<f64> {
    let mut v: Vec<f64> = values.iter().copied().filter(|x| x.is_finite()).collect();
    v.sort_by(f64::total_cmp);
    v
}

pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation; `NaN` below two observations.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

// ---------------------------------------------------------------------------
// Box summary
// ---------------------------------------------------------------------------

/// Tukey box: quartiles, 1.5 × IQR whiskers and the points beyond them.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxSummary {
    /// `None` when there is no finite value.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let sorted = sorted_finite(values);
        if sorted.is_empty() {
            return None;
        }
        let q1 = quantile(&sorted, 0.25);
        let median = quantile(&sorted, 0.5);
        let q3 = quantile(&sorted, 0.75);
        let iqr = q3 - q1;
        let lo_fence = q1 - 1.5 * iqr;
        let hi_fence = q3 + 1.5 * iqr;

        // Whiskers stop at the most extreme observation inside the fences.
        let lower_whisker = sorted
            .iter()
            .copied()
            .find(|&v| v >= lo_fence)
            .unwrap_or(q1);
        let upper_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= hi_fence)
            .unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < lower_whisker || v > upper_whisker)
            .collect();

        Some(Self {
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
            outliers,
        })
    }
}

// ---------------------------------------------------------------------------
// Kernel density
// ---------------------------------------------------------------------------

/// A Gaussian KDE evaluated on an even grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Density {
    pub support: Vec<f64>,
    pub density: Vec<f64>,
}

impl Density {
    pub fn max_density(&self) -> f64 {
        self.density.iter().copied().fold(0.0, f64::max)
    }
}

/// Gaussian kernel density with Scott's bandwidth.
///
/// The grid spans the data extended by `cut` bandwidths on both sides.
/// Returns `None` for fewer than two values or zero spread.
pub fn gaussian_kde(values: &[f64], grid_size: usize, cut: f64) -> Option<Density> {
    let data = sorted_finite(values);
    let n = data.len();
    if n < 2 || grid_size < 2 {
        return None;
    }
    let sd = std_dev(&data);
    if sd.is_nan() || sd <= 0.0 {
        return None;
    }
    let bandwidth = sd * (n as f64).powf(-0.2);
    let lo = data[0] - cut * bandwidth;
    let hi = data[n - 1] + cut * bandwidth;
    let step = (hi - lo) / (grid_size - 1) as f64;

    let norm = 1.0 / (n as f64 * bandwidth * (2.0 * std::f64::consts::PI).sqrt());
    let support: Vec<f64> = (0..grid_size).map(|i| lo + i as f64 * step).collect();
    let density = support
        .iter()
        .map(|&x| {
            let s: f64 = data
                .iter()
                .map(|&xi| {
                    let z = (x - xi) / bandwidth;
                    (-0.5 * z * z).exp()
                })
                .sum();
            s * norm
        })
        .collect();

    Some(Density { support, density })
}

// ---------------------------------------------------------------------------
// Correlation
// ---------------------------------------------------------------------------

/// Pearson correlation over the rows where both sides are present.
///
/// `NaN` when fewer than two rows overlap or either side is constant.
pub fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| match (x, y) {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some((*x, *y)),
            _ => None,
        })
        .collect();
    if pairs.len() < 2 {
        return f64::NAN;
    }
    let n = pairs.len() as f64;
    let mx = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let my = pairs.iter().map(|p| p.1).sum::<f64>() / n;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mx;
        let dy = y - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
}

/// Symmetric matrix of pairwise Pearson coefficients.
pub fn correlation_matrix(columns: &[Vec<Option<f64>>]) -> Vec<Vec<f64>> {
    let n = columns.len();
    let mut matrix = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        for j in i..n {
            let r = pearson(&columns[i], &columns[j]);
            // The diagonal is exactly one unless the column is constant.
            let r = if i == j && !r.is_nan() { 1.0 } else { r };
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }
    matrix
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `counts.len() + 1` ascending bin edges.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Equal-width bins, Sturges' rule for the count. `None` if empty.
    pub fn sturges(values: &[f64]) -> Option<Self> {
        let data = sorted_finite(values);
        let n = data.len();
        if n == 0 {
            return None;
        }
        let bins = ((n as f64).log2().ceil() as usize + 1).max(1);
        let (mut lo, mut hi) = (data[0], data[n - 1]);
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }
        let width = (hi - lo) / bins as f64;
        let edges: Vec<f64> = (0..=bins).map(|i| lo + i as f64 * width).collect();

        let mut counts = vec![0usize; bins];
        for v in data {
            // The last bin is closed on the right.
            let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }
        Some(Self { edges, counts })
    }

    pub fn bin_width(&self) -> f64 {
        match self.edges.as_slice() {
            [first, second, ..] => second - first,
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn quantiles_interpolate_linearly() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert!(approx(quantile(&v, 0.25), 1.75));
        assert!(approx(quantile(&v, 0.5), 2.5));
        assert!(approx(quantile(&v, 0.75), 3.25));
        assert!(quantile(&[], 0.5).is_nan());
    }

    #[test]
    fn box_summary_separates_outliers() {
        let v = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let b = BoxSummary::from_values(&v).unwrap();
        assert!(approx(b.q1, 2.25));
        assert!(approx(b.median, 3.5));
        assert!(approx(b.q3, 4.75));
        assert_eq!(b.lower_whisker, 1.0);
        assert_eq!(b.upper_whisker, 5.0);
        assert_eq!(b.outliers, vec![100.0]);
    }

    #[test]
    fn box_summary_of_nothing_is_none() {
        assert!(BoxSummary::from_values(&[]).is_none());
        assert!(BoxSummary::from_values(&[f64::NAN]).is_none());
    }

    #[test]
    fn kde_integrates_to_about_one() {
        let v = [0.0, 1.0, 1.5, 2.0, 4.0, 4.5];
        let d = gaussian_kde(&v, 400, 3.0).unwrap();
        let step = d.support[1] - d.support[0];
        let area: f64 = d.density.iter().sum::<f64>() * step;
        assert!((area - 1.0).abs() < 0.01, "area = {area}");
        assert!(d.max_density() > 0.0);
    }

    #[test]
    fn kde_needs_spread() {
        assert!(gaussian_kde(&[2.0, 2.0, 2.0], 50, 2.0).is_none());
        assert!(gaussian_kde(&[2.0], 50, 2.0).is_none());
    }

    #[test]
    fn pearson_uses_pairwise_complete_rows() {
        let a = [Some(1.0), Some(2.0), None, Some(4.0)];
        let b = [Some(2.0), Some(4.0), Some(100.0), Some(8.0)];
        assert!(approx(pearson(&a, &b), 1.0));

        let c = [Some(3.0), Some(2.0), Some(0.0), Some(0.0)];
        assert!(approx(pearson(&a, &c), -1.0));
    }

    #[test]
    fn correlation_of_constant_column_is_undefined() {
        let cols = vec![
            vec![Some(1.0), Some(2.0), Some(3.0)],
            vec![Some(5.0), Some(5.0), Some(5.0)],
        ];
        let m = correlation_matrix(&cols);
        assert_eq!(m[0][0], 1.0);
        assert!(m[1][1].is_nan());
        assert!(m[0][1].is_nan());
        assert!(m[1][0].is_nan());
    }

    #[test]
    fn histogram_counts_every_value() {
        let v: Vec<f64> = (0..16).map(f64::from).collect();
        let h = Histogram::sturges(&v).unwrap();
        assert_eq!(h.counts.len(), 5);
        assert_eq!(h.edges.len(), 6);
        assert_eq!(h.counts.iter().sum::<usize>(), 16);
        assert!(approx(h.bin_width(), 3.0));
    }

    #[test]
    fn histogram_of_constant_values_has_unit_range() {
        let h = Histogram::sturges(&[7.0, 7.0]).unwrap();
        assert!(approx(h.edges[0], 6.5));
        assert!(approx(*h.edges.last().unwrap(), 7.5));
        assert_eq!(h.counts.iter().sum::<usize>(), 2);
    }
}
