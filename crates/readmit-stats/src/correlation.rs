//! Pearson correlation with a two-sided significance test

use crate::distribution::student_t_two_sided;

/// Pearson correlation between two paired samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correlation {
    /// The correlation coefficient, in `[-1.0, 1.0]`.
    pub coefficient: f64,
    /// Two-sided p-value for the null hypothesis of zero correlation.
    ///
    /// Uses `t = r * sqrt((n - 2) / (1 - r²))` with `n - 2` degrees of freedom.
    /// `None` when fewer than three pairs are available.
    pub p_value: Option<f64>,
    /// Number of pairs.
    pub sample_size: usize,
}

/// Computes the Pearson correlation of `xs` and `ys`.
///
/// Returns `None` when the coefficient is undefined: fewer than two pairs, or
/// either sample is constant (zero variance).
///
/// # Panics
///
/// Panics if `xs` and `ys` differ in length.
///
/// # Examples
///
/// ```
/// use readmit_stats::correlation::pearson;
///
/// let corr = pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).unwrap();
/// assert!((corr.coefficient - 1.0).abs() < 1e-12);
/// assert_eq!(corr.p_value, Some(0.0));
///
/// // constant sample: undefined
/// assert!(pearson(&[1.0, 2.0, 3.0], &[0.5, 0.5, 0.5]).is_none());
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<Correlation> {
    assert_eq!(xs.len(), ys.len(), "samples must have the same length");
    let sample_size = xs.len();
    if sample_size < 2 || is_constant(xs) || is_constant(ys) {
        return None;
    }

    let n = sample_size as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    let coefficient = (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0);

    let p_value = (sample_size >= 3).then(|| {
        let df = n - 2.0;
        let denom = 1.0 - coefficient * coefficient;
        if denom <= 0.0 {
            0.0
        } else {
            student_t_two_sided(coefficient * (df / denom).sqrt(), df)
        }
    });

    Some(Correlation {
        coefficient,
        p_value,
        sample_size,
    })
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}
