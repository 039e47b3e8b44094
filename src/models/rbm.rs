//! Bipartite binary Restricted Boltzmann Machine.
//!
//! Energy `E(v, h) = -v·a - h·b - v·W·h` over visible units `v` and hidden
//! units `h`, both `{0, 1}`-encoded. There are no intra-layer connections, so
//! conditioned on one layer the units of the other are independent and their
//! conditionals reduce to per-unit sigmoids. The partition function is never
//! computed; training and sampling only ever touch the conditionals and the
//! hidden-marginalized free energy.

use crate::conditional_samplers::BernoulliConditional;
use crate::models::ebm::AbstractEnergyModel;
use crate::numerics::{sigmoid, softplus};
use ndarray::{Array1, Array2, ArrayView2, Axis};
use rand::RngCore;
use rand_distr::{Distribution, Normal};

/// Standard deviation of the randomly initialized weights.
const INIT_WEIGHT_STD: f64 = 0.01;

/// A binary-binary RBM.
///
/// Parameters are owned by the value and mutated only by the contrastive
/// divergence trainer; every sampling method takes `&self`.
#[derive(Clone, Debug)]
pub struct Rbm {
    /// Pairwise visible-hidden interaction strengths, shape `(n_vis, n_hid)`.
    pub weights: Array2<f64>,
    /// Per-unit visible offsets, length `n_vis`.
    pub visible_bias: Array1<f64>,
    /// Per-unit hidden offsets, length `n_hid`.
    pub hidden_bias: Array1<f64>,
}

impl Rbm {
    /// Creates a model with `N(0, 0.01²)` weights and zero biases.
    pub fn new(n_vis: usize, n_hid: usize, rng: &mut dyn RngCore) -> Self {
        if n_vis == 0 || n_hid == 0 {
            panic!("RBM layer sizes must be positive (got {n_vis} visible, {n_hid} hidden)");
        }
        let normal = Normal::new(0.0, INIT_WEIGHT_STD).expect("valid init std");
        let weights = Array2::from_shape_fn((n_vis, n_hid), |_| normal.sample(rng));
        Self {
            weights,
            visible_bias: Array1::zeros(n_vis),
            hidden_bias: Array1::zeros(n_hid),
        }
    }

    /// Number of visible units.
    pub fn n_visible(&self) -> usize {
        self.weights.nrows()
    }

    /// Number of hidden units.
    pub fn n_hidden(&self) -> usize {
        self.weights.ncols()
    }

    fn assert_visible_width(&self, batch: ArrayView2<f64>) {
        if batch.ncols() != self.n_visible() {
            panic!(
                "visible batch width {} does not match the model's {} visible units",
                batch.ncols(),
                self.n_visible()
            );
        }
    }

    fn assert_hidden_width(&self, batch: ArrayView2<f64>) {
        if batch.ncols() != self.n_hidden() {
            panic!(
                "hidden batch width {} does not match the model's {} hidden units",
                batch.ncols(),
                self.n_hidden()
            );
        }
    }

    /// Hidden conditionals for a batch of visible rows.
    ///
    /// `P(h_j = 1 | v) = sigmoid((v·W)_j + b_j)`, evaluated row-wise.
    pub fn hidden_probabilities(&self, visible: ArrayView2<f64>) -> Array2<f64> {
        self.assert_visible_width(visible);
        let pre = visible.dot(&self.weights) + &self.hidden_bias;
        pre.mapv(sigmoid)
    }

    /// Visible conditionals for a batch of hidden rows.
    ///
    /// `P(v_i = 1 | h) = sigmoid((h·Wᵀ)_i + a_i)`; the transpose keeps the two
    /// conditional directions consistent with one weight matrix.
    pub fn visible_probabilities(&self, hidden: ArrayView2<f64>) -> Array2<f64> {
        self.assert_hidden_width(hidden);
        let pre = hidden.dot(&self.weights.t()) + &self.visible_bias;
        pre.mapv(sigmoid)
    }

    /// Draws a binary hidden batch from `P(h | v)`.
    pub fn sample_hidden(&self, rng: &mut dyn RngCore, visible: ArrayView2<f64>) -> Array2<f64> {
        let probs = self.hidden_probabilities(visible);
        BernoulliConditional.sample_batch(rng, probs.view())
    }

    /// Draws a binary visible batch from `P(v | h)`.
    pub fn sample_visible(&self, rng: &mut dyn RngCore, hidden: ArrayView2<f64>) -> Array2<f64> {
        let probs = self.visible_probabilities(hidden);
        BernoulliConditional.sample_batch(rng, probs.view())
    }

    /// Hidden-marginalized free energy of each visible row.
    ///
    /// `F(v) = -v·a - Σ_j softplus((v·W)_j + b_j)`. This is the tractable
    /// diagnostic surface; gradients never come from it.
    pub fn free_energy(&self, visible: ArrayView2<f64>) -> Array1<f64> {
        self.assert_visible_width(visible);
        let pre = visible.dot(&self.weights) + &self.hidden_bias;
        let hidden_term = pre.mapv(softplus).sum_axis(Axis(1));
        let visible_term = visible.dot(&self.visible_bias);
        -(visible_term + hidden_term)
    }

    /// Batch mean of [`Rbm::free_energy`].
    pub fn mean_free_energy(&self, visible: ArrayView2<f64>) -> f64 {
        self.free_energy(visible)
            .mean()
            .expect("free energy of an empty batch")
    }

    /// One hidden/visible pass; returns visible probabilities, not draws.
    pub fn reconstruct(&self, rng: &mut dyn RngCore, visible: ArrayView2<f64>) -> Array2<f64> {
        let hidden = self.sample_hidden(rng, visible);
        self.visible_probabilities(hidden.view())
    }

    /// Mean squared reconstruction gap per row, averaged over the batch.
    pub fn reconstruction_error(&self, rng: &mut dyn RngCore, visible: ArrayView2<f64>) -> f64 {
        let reconstructed = self.reconstruct(rng, visible);
        let diff = &reconstructed - &visible;
        diff.mapv(|x| x * x)
            .sum_axis(Axis(1))
            .mean()
            .expect("reconstruction error of an empty batch")
    }

    /// Draws `n_chains` visible rows from the bias-only model
    /// `P(v_i = 1) = sigmoid(a_i)`, ignoring the weights.
    ///
    /// Gives diagnostic chains a random but bias-respecting starting point.
    pub fn init_visible(&self, rng: &mut dyn RngCore, n_chains: usize) -> Array2<f64> {
        let unit_probs = self.visible_bias.mapv(sigmoid);
        let tiled = unit_probs
            .broadcast((n_chains, self.n_visible()))
            .expect("bias row broadcasts over chains");
        BernoulliConditional.sample_batch(rng, tiled)
    }
}

impl AbstractEnergyModel for Rbm {
    /// One visible row paired with one hidden row.
    type Configuration = (Array1<f64>, Array1<f64>);

    fn energy(&self, configuration: &Self::Configuration) -> f64 {
        let (visible, hidden) = configuration;
        if visible.len() != self.n_visible() || hidden.len() != self.n_hidden() {
            panic!(
                "configuration ({}, {}) does not match RBM layers ({}, {})",
                visible.len(),
                hidden.len(),
                self.n_visible(),
                self.n_hidden()
            );
        }
        let interaction = visible.dot(&self.weights).dot(hidden);
        -(visible.dot(&self.visible_bias) + hidden.dot(&self.hidden_bias) + interaction)
    }
}
