//! Gauss-Newton confidence intervals on the fitted rate.
//!
//! The fit is a one-parameter nonlinear least squares in θ = ln Q with
//! Jacobian ∂C/∂θ = C, so the Gauss-Newton variance of θ̂ collapses to
//!
//! ```text
//! se(θ̂)² = s² / Σ Cᵢ²        s² = SSR / max(N − 1, 1)
//! ```
//!
//! Exponentiating a symmetric band in θ gives a multiplicative interval in
//! Q, which is the natural shape for a strictly positive rate.

/// Confidence interval with its intermediate statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalEstimate {
    /// Lower bound (kg/hr).
    pub lower_kg_hr: f64,
    /// Upper bound (kg/hr).
    pub upper_kg_hr: f64,
    /// Interval half-width relative to the estimate.
    pub relative_error: f64,
    /// Standard error of the fitted log rate.
    pub se_log_q: f64,
}

/// Estimator mapping fit residuals to a confidence interval on Q.
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceEstimator {
    z: f64,
    clamp_factor: f64,
}

impl ConfidenceEstimator {
    /// Creates an estimator for quantile `z` with bounds clamped to
    /// `[Q / clamp_factor, Q * clamp_factor]`.
    pub fn new(z: f64, clamp_factor: f64) -> Self {
        Self { z, clamp_factor }
    }

    /// Interval for estimate `q_kg_hr` given the fitted predictions and the
    /// observations they were fitted to (any common scaling of the two is
    /// fine; the standard error is scale free).
    ///
    /// A non-converged fit understates its residuals, so its standard error
    /// is doubled before the band is formed. A zero estimate has no signal
    /// to propagate and returns a degenerate interval at zero.
    pub fn interval(
        &self,
        q_kg_hr: f64,
        predictions: &[f64],
        observations: &[f64],
        converged: bool,
    ) -> IntervalEstimate {
        if q_kg_hr <= 0.0 {
            return IntervalEstimate {
                lower_kg_hr: 0.0,
                upper_kg_hr: 0.0,
                relative_error: 0.0,
                se_log_q: 0.0,
            };
        }

        let n = predictions.len();
        let ssr: f64 = predictions
            .iter()
            .zip(observations)
            .map(|(&p, &o)| (p - o) * (p - o))
            .sum();
        let jtj: f64 = predictions.iter().map(|&p| p * p).sum();
        let s2 = ssr / (n.saturating_sub(1).max(1)) as f64;

        // The clamp translates to a ceiling on the log standard error.
        let max_se = self.clamp_factor.ln() / self.z;

        let mut se = if jtj > 0.0 { (s2 / jtj).sqrt() } else { max_se };
        if !converged {
            se *= 2.0;
        }
        if !se.is_finite() {
            se = max_se;
        }
        se = se.min(max_se);

        let half = (self.z * se).exp();
        let lower = q_kg_hr / half;
        let upper = q_kg_hr * half;

        IntervalEstimate {
            lower_kg_hr: lower,
            upper_kg_hr: upper,
            relative_error: (upper - lower) / (2.0 * q_kg_hr),
            se_log_q: se,
        }
    }
}
