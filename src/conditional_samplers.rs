//! Stochastic binary draws from per-unit conditional probabilities.
//!
//! Within one layer of the bipartite model every unit is conditionally
//! independent of its siblings, so a whole layer is resampled as a sequence of
//! independent Bernoulli trials. Draws consume the generator in row-major
//! element order, which is what makes seeded runs bit-reproducible.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use rand::{Rng, RngCore};

/// Bernoulli sampler over `{0, 1}`-encoded units.
pub struct BernoulliConditional;

impl BernoulliConditional {
    /// Draws one binary value per unit, `1.0` with the given probability.
    pub fn sample(&self, rng: &mut dyn RngCore, probabilities: ArrayView1<f64>) -> Array1<f64> {
        probabilities.iter().map(|&p| draw_unit(rng, p)).collect()
    }

    /// Draws an entire batch of layer configurations, row by row.
    ///
    /// Rows are independent chains; the flattened draw order is row-major.
    pub fn sample_batch(
        &self,
        rng: &mut dyn RngCore,
        probabilities: ArrayView2<f64>,
    ) -> Array2<f64> {
        let drawn: Vec<f64> = probabilities.iter().map(|&p| draw_unit(rng, p)).collect();
        Array2::from_shape_vec(probabilities.raw_dim(), drawn)
            .expect("draw count matches layer shape")
    }
}

fn draw_unit(rng: &mut dyn RngCore, p: f64) -> f64 {
    debug_assert!(
        (0.0..=1.0).contains(&p),
        "conditional probability {p} outside [0, 1]"
    );
    let draw: f64 = rng.random();
    if draw < p { 1.0 } else { 0.0 }
}
