use shelfline_core::{CoreError, CoreResult};
use shelfline_inventory::ProductRecord;

/// Univariate least-squares regression of historical quantity sold on price.
///
/// Trained once from a snapshot of the store at process start; purchases
/// made afterwards never feed back into it (deliberate lifecycle, see
/// DESIGN.md). The fit parameters are immutable after training, so
/// concurrent `predict` calls need no synchronization.
#[derive(Debug, Clone, PartialEq)]
pub struct DemandModel {
    slope: f64,
    intercept: f64,
    /// Training pairs `(price, quantity_sold)`, kept for chart rendering.
    samples: Vec<(f64, f64)>,
}

impl DemandModel {
    /// Fit ordinary least squares over all records with a present
    /// `quantity_sold`.
    ///
    /// Fails with `InsufficientTrainingData` when fewer than 2 usable
    /// points exist, or when every price is identical (the slope would be
    /// undefined). The caller keeps no model in that case and must answer
    /// predictions with `ModelNotTrained`.
    pub fn train(records: &[ProductRecord]) -> CoreResult<Self> {
        let samples: Vec<(f64, f64)> = records
            .iter()
            .filter_map(|r| r.quantity_sold.map(|q| (r.price, q as f64)))
            .collect();

        if samples.len() < 2 {
            return Err(CoreError::insufficient_training_data(format!(
                "need at least 2 records with quantity_sold, got {}",
                samples.len()
            )));
        }

        let n = samples.len() as f64;
        let mean_x = samples.iter().map(|(x, _)| x).sum::<f64>() / n;
        let mean_y = samples.iter().map(|(_, y)| y).sum::<f64>() / n;

        let sxx: f64 = samples.iter().map(|(x, _)| (x - mean_x) * (x - mean_x)).sum();
        if sxx <= f64::EPSILON {
            return Err(CoreError::insufficient_training_data(
                "price variance is zero; the slope is undefined",
            ));
        }

        let sxy: f64 = samples
            .iter()
            .map(|(x, y)| (x - mean_x) * (y - mean_y))
            .sum();

        let slope = sxy / sxx;
        let intercept = mean_y - slope * mean_x;

        tracing::info!(points = samples.len(), slope, intercept, "demand model trained");

        Ok(Self {
            slope,
            intercept,
            samples,
        })
    }

    /// Estimated quantity sold at `price`.
    ///
    /// Unconstrained affine function: negative estimates are expected for
    /// prices beyond the training range and are not clamped.
    pub fn predict(&self, price: f64) -> f64 {
        self.slope * price + self.intercept
    }

    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Training pairs used for the scatter layer of the chart.
    pub fn samples(&self) -> &[(f64, f64)] {
        &self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(price: f64, sold: Option<u64>) -> ProductRecord {
        ProductRecord::new(format!("p{price}"), "X", price, 1, false, sold).unwrap()
    }

    #[test]
    fn two_point_fit_passes_through_both_points() {
        // (50, 20) and (100, 40): slope 0.4, intercept 0.
        let model = DemandModel::train(&[record(50.0, Some(20)), record(100.0, Some(40))]).unwrap();
        assert!((model.predict(50.0) - 20.0).abs() < 1e-9);
        assert!((model.predict(100.0) - 40.0).abs() < 1e-9);
        assert!((model.slope() - 0.4).abs() < 1e-9);
        assert!(model.intercept().abs() < 1e-9);
    }

    #[test]
    fn predictions_may_be_negative() {
        // Downward-sloping demand: high enough price goes negative.
        let model = DemandModel::train(&[record(10.0, Some(100)), record(20.0, Some(50))]).unwrap();
        assert!(model.predict(1000.0) < 0.0);
    }

    #[test]
    fn records_without_quantity_sold_are_excluded() {
        let err = DemandModel::train(&[
            record(50.0, Some(20)),
            record(100.0, None),
            record(150.0, None),
        ])
        .unwrap_err();
        assert!(matches!(err, CoreError::InsufficientTrainingData(_)));
    }

    #[test]
    fn zero_price_variance_is_untrainable() {
        let err = DemandModel::train(&[record(50.0, Some(20)), record(50.0, Some(40))]).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientTrainingData(_)));
    }

    #[test]
    fn retraining_on_the_same_data_reproduces_the_coefficients() {
        let data = vec![
            record(50.0, Some(20)),
            record(100.0, Some(40)),
            record(80.0, Some(35)),
            record(150.0, Some(60)),
        ];
        let a = DemandModel::train(&data).unwrap();
        let b = DemandModel::train(&data).unwrap();
        assert_eq!(a.slope(), b.slope());
        assert_eq!(a.intercept(), b.intercept());
        assert_eq!(a.predict(75.0), b.predict(75.0));
    }

    #[cfg(test)]
    mod proptest_tests {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: the trained model is an affine function of price,
            /// so prediction differences equal the slope times the price
            /// difference.
            #[test]
            fn predictions_are_affine_in_price(
                a in 0.0f64..500.0,
                b in 0.0f64..500.0,
            ) {
                let model = DemandModel::train(&[
                    record(50.0, Some(20)),
                    record(100.0, Some(40)),
                    record(150.0, Some(45)),
                ]).unwrap();

                let lhs = model.predict(a) - model.predict(b);
                let rhs = model.slope() * (a - b);
                prop_assert!((lhs - rhs).abs() < 1e-6);
            }
        }
    }
}
