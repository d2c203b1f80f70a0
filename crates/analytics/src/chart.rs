//! Chart rendering for the prediction surfaces.
//!
//! Charts are rendered to an in-memory SVG document and base64-encoded so
//! the serving layer can return them inline; nothing is written to disk.

use base64::Engine;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;

use shelfline_core::{CoreError, CoreResult};

const WIDTH: u32 = 800;
const HEIGHT: u32 = 500;

/// An encoded chart ready to embed in a response.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ChartImage {
    /// Always `image/svg+xml` for this renderer.
    pub media_type: &'static str,
    /// Base64-encoded document body.
    pub data: String,
}

impl ChartImage {
    fn encode(svg: String) -> Self {
        Self {
            media_type: "image/svg+xml",
            data: base64::engine::general_purpose::STANDARD.encode(svg.as_bytes()),
        }
    }
}

/// Scatter of `(price, quantity_sold)` training pairs, the fitted demand
/// line, and a dashed vertical marker at `highlight_price`.
pub fn demand_chart(
    samples: &[(f64, f64)],
    slope: f64,
    intercept: f64,
    highlight_price: f64,
    title: &str,
) -> CoreResult<ChartImage> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_error)?;

        let (x_min, x_max) = padded_bounds(
            samples.iter().map(|(x, _)| *x).chain([highlight_price]),
        );
        let predicted = [slope * x_min + intercept, slope * x_max + intercept];
        let (y_min, y_max) = padded_bounds(
            samples.iter().map(|(_, y)| *y).chain(predicted),
        );

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 24))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(draw_error)?;

        chart
            .configure_mesh()
            .x_desc("Price")
            .y_desc("Quantity Sold")
            .draw()
            .map_err(draw_error)?;

        chart
            .draw_series(
                samples
                    .iter()
                    .map(|(x, y)| Circle::new((*x, *y), 4, BLUE.filled())),
            )
            .map_err(draw_error)?
            .label("Actual Sales")
            .legend(|(x, y)| Circle::new((x + 8, y), 4, BLUE.filled()));

        chart
            .draw_series(LineSeries::new(
                [(x_min, predicted[0]), (x_max, predicted[1])],
                RED.stroke_width(2),
            ))
            .map_err(draw_error)?
            .label("Fitted Demand")
            .legend(|(x, y)| PathElement::new([(x, y), (x + 16, y)], RED.stroke_width(2)));

        chart
            .draw_series(DashedLineSeries::new(
                [(highlight_price, y_min), (highlight_price, y_max)],
                6,
                4,
                GREEN.stroke_width(2).into(),
            ))
            .map_err(draw_error)?
            .label(format!("Price {highlight_price:.2}"))
            .legend(|(x, y)| PathElement::new([(x, y), (x + 16, y)], GREEN.stroke_width(2)));

        chart
            .configure_series_labels()
            .border_style(BLACK)
            .background_style(WHITE.mix(0.8))
            .draw()
            .map_err(draw_error)?;

        root.present().map_err(draw_error)?;
    }

    Ok(ChartImage::encode(svg))
}

/// Current stock sequence (solid, indices `0..n`) and forecast (dashed,
/// indices `n..n+k`).
pub fn forecast_chart(history: &[f64], forecast: &[f64]) -> CoreResult<ChartImage> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_error)?;

        let x_max = (history.len() + forecast.len()).max(1) as f64;
        let (y_min, y_max) = padded_bounds(history.iter().chain(forecast).copied());

        let mut chart = ChartBuilder::on(&root)
            .caption("Stock Forecast", ("sans-serif", 24))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(0.0..x_max, y_min..y_max)
            .map_err(draw_error)?;

        chart
            .configure_mesh()
            .x_desc("Index")
            .y_desc("Stock Level")
            .draw()
            .map_err(draw_error)?;

        chart
            .draw_series(LineSeries::new(
                history.iter().enumerate().map(|(i, v)| (i as f64, *v)),
                BLUE.stroke_width(2),
            ))
            .map_err(draw_error)?
            .label("Current Stock")
            .legend(|(x, y)| PathElement::new([(x, y), (x + 16, y)], BLUE.stroke_width(2)));

        // Anchor the dashed segment at the last observed point so the two
        // lines join up visually.
        let mut projected: Vec<(f64, f64)> = Vec::with_capacity(forecast.len() + 1);
        if let Some(last) = history.last() {
            projected.push(((history.len() - 1) as f64, *last));
        }
        projected.extend(
            forecast
                .iter()
                .enumerate()
                .map(|(i, v)| ((history.len() + i) as f64, *v)),
        );

        chart
            .draw_series(DashedLineSeries::new(projected, 6, 4, RED.stroke_width(2).into()))
            .map_err(draw_error)?
            .label("Forecasted Stock")
            .legend(|(x, y)| PathElement::new([(x, y), (x + 16, y)], RED.stroke_width(2)));

        chart
            .configure_series_labels()
            .border_style(BLACK)
            .background_style(WHITE.mix(0.8))
            .draw()
            .map_err(draw_error)?;

        root.present().map_err(draw_error)?;
    }

    Ok(ChartImage::encode(svg))
}

/// Axis bounds with a small margin; degenerate (empty or flat) inputs get
/// a unit-wide window so the chart still renders.
fn padded_bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if !(min.is_finite() && max.is_finite()) {
        return (0.0, 1.0);
    }
    let span = (max - min).max(1.0);
    (min - span * 0.05, max + span * 0.05)
}

fn draw_error(e: impl std::fmt::Display) -> CoreError {
    CoreError::internal(format!("chart rendering failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demand_chart_produces_encoded_svg() {
        let samples = vec![(50.0, 20.0), (100.0, 40.0), (80.0, 35.0)];
        let chart = demand_chart(&samples, 0.4, 0.0, 75.0, "Sales Prediction").unwrap();
        assert_eq!(chart.media_type, "image/svg+xml");
        assert!(!chart.data.is_empty());

        let decoded = base64::engine::general_purpose::STANDARD
            .decode(chart.data.as_bytes())
            .unwrap();
        let svg = String::from_utf8(decoded).unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn forecast_chart_handles_flat_history() {
        let chart = forecast_chart(&[30.0; 6], &[30.0, 30.0]).unwrap();
        assert!(!chart.data.is_empty());
    }
}
