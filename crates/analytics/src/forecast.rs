//! ARIMA(1,1,1) stock-level projection.
//!
//! The input is the *current* per-product stock sequence in store load
//! order, not a time series of one product through time; the projection
//! reproduces that observed behavior of the system it models (see
//! DESIGN.md). The fit is conditional sum-of-squares over the
//! first-differenced series with a bounded deterministic parameter search,
//! so identical inputs always produce identical forecasts.

use shelfline_core::{CoreError, CoreResult};

/// Minimum sequence length the fit accepts: differencing consumes one
/// point and the ARMA(1,1) recursion needs a few residuals to condition on.
const MIN_POINTS: usize = 4;

/// Stationarity/invertibility bound for the coefficient search.
const COEF_BOUND: f64 = 0.99;

/// Fitted ARIMA(1,1,1) coefficients (no constant, matching the reference
/// behavior for d = 1).
#[derive(Debug, Clone, Copy, PartialEq)]
struct ArmaFit {
    phi: f64,
    theta: f64,
}

/// Project `steps` future stock levels from `series`.
///
/// Fails with `InvalidInput` for `steps == 0` and `Forecast` when the
/// series is too short or the numerical fit degenerates; a raw numerical
/// panic never escapes.
pub fn forecast_stock(series: &[f64], steps: usize) -> CoreResult<Vec<f64>> {
    if steps == 0 {
        return Err(CoreError::invalid_input("forecast steps must be >= 1"));
    }
    if series.len() < MIN_POINTS {
        return Err(CoreError::forecast(format!(
            "need at least {MIN_POINTS} data points, got {}",
            series.len()
        )));
    }
    if series.iter().any(|v| !v.is_finite()) {
        return Err(CoreError::forecast("series contains non-finite values"));
    }

    // d = 1: model the first differences.
    let diffs: Vec<f64> = series.windows(2).map(|w| w[1] - w[0]).collect();

    let fit = fit_arma(&diffs)?;
    tracing::debug!(phi = fit.phi, theta = fit.theta, n = series.len(), "arma fit");

    // Residuals under the fitted coefficients, conditioned on e[0] = 0.
    let residuals = residuals(&diffs, fit);
    let last_diff = *diffs.last().unwrap_or(&0.0);
    let last_residual = *residuals.last().unwrap_or(&0.0);

    // Recursive forecast on the differenced scale: the MA term contributes
    // only to the first step, after which future shocks are zero.
    let mut diff_forecast = Vec::with_capacity(steps);
    let mut prev = fit.phi * last_diff + fit.theta * last_residual;
    diff_forecast.push(prev);
    for _ in 1..steps {
        prev *= fit.phi;
        diff_forecast.push(prev);
    }

    // Integrate back to levels.
    let mut level = *series.last().unwrap_or(&0.0);
    let mut forecast = Vec::with_capacity(steps);
    for d in diff_forecast {
        level += d;
        if !level.is_finite() {
            return Err(CoreError::forecast("forecast diverged to a non-finite value"));
        }
        forecast.push(level);
    }

    Ok(forecast)
}

/// Conditional-sum-of-squares fit of ARMA(1,1) coefficients.
///
/// Coarse grid over `(-COEF_BOUND, COEF_BOUND)^2` followed by two local
/// refinement passes. Deterministic and bounded; no iterative optimizer
/// that could fail to converge.
fn fit_arma(diffs: &[f64]) -> CoreResult<ArmaFit> {
    let mut best = ArmaFit { phi: 0.0, theta: 0.0 };
    let mut best_sse = css(diffs, best);

    let mut center = best;
    let mut step = 0.1;
    for pass in 0..3 {
        let radius = if pass == 0 { COEF_BOUND } else { step * 5.0 };
        let mut phi = (center.phi - radius).max(-COEF_BOUND);
        while phi <= (center.phi + radius).min(COEF_BOUND) {
            let mut theta = (center.theta - radius).max(-COEF_BOUND);
            while theta <= (center.theta + radius).min(COEF_BOUND) {
                let candidate = ArmaFit { phi, theta };
                let sse = css(diffs, candidate);
                if sse < best_sse {
                    best_sse = sse;
                    best = candidate;
                }
                theta += step;
            }
            phi += step;
        }
        center = best;
        step /= 5.0;
    }

    if !best_sse.is_finite() {
        return Err(CoreError::forecast("model fit did not produce a finite objective"));
    }
    Ok(best)
}

/// Sum of squared one-step-ahead errors, conditioning on e[0] = 0.
fn css(diffs: &[f64], fit: ArmaFit) -> f64 {
    let mut sse = 0.0;
    let mut prev_e = 0.0;
    for t in 1..diffs.len() {
        let e = diffs[t] - fit.phi * diffs[t - 1] - fit.theta * prev_e;
        sse += e * e;
        prev_e = e;
    }
    sse
}

fn residuals(diffs: &[f64], fit: ArmaFit) -> Vec<f64> {
    let mut out = vec![0.0];
    for t in 1..diffs.len() {
        let prev_e = *out.last().unwrap_or(&0.0);
        out.push(diffs[t] - fit.phi * diffs[t - 1] - fit.theta * prev_e);
    }
    out
}
