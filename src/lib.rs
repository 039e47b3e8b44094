//! Energy-based models whose Gibbs chains mix badly, on purpose.
//!
//! Two models share one sampling and observation layer: a binary RBM trained
//! by contrastive divergence, and a two-spin toy model whose multimodal
//! target can be worked out by hand. Both expose exact per-site conditionals
//! to a block Gibbs sweep, and both make the resulting chains easy to trace,
//! tally, and replay from a seed.

pub mod conditional_samplers;
pub mod error;
pub mod gibbs;
pub mod models;
pub mod numerics;
pub mod observers;
pub mod training;

pub use conditional_samplers::BernoulliConditional;
pub use error::ConfigError;
pub use gibbs::{AbstractGibbsSampler, PairGibbs, RbmGibbs, SamplingSchedule};
pub use models::ebm::AbstractEnergyModel;
pub use models::rbm::Rbm;
pub use models::spin_pair::{PairState, Spin, SpinPair};
pub use observers::{
    AbstractObserver, PairOccupancy, PairOccupancyObserver, StateObserver, generate_trace,
    measure_occupancy, observe_chain, summarize_trace,
};
pub use training::{CdSpec, fit, train_epoch, train_step};
