use crate::error::ConfigError;
use crate::models::rbm::Rbm;
use crate::models::spin_pair::{PairState, SpinPair};
use ndarray::Array2;
use rand::RngCore;

/// How long to run a chain and how often to emit from it.
///
/// Warmup sweeps are burned before the first emission; after that the chain
/// advances `steps_per_sample` full sweeps between consecutive emissions.
/// A zero warmup is legal, empty or stalled emission phases are not.
pub struct SamplingSchedule {
    n_warmup: usize,
    n_samples: usize,
    steps_per_sample: usize,
}

impl SamplingSchedule {
    pub fn new(
        n_warmup: usize,
        n_samples: usize,
        steps_per_sample: usize,
    ) -> Result<Self, ConfigError> {
        if n_samples == 0 {
            return Err(ConfigError::ZeroSampleCount);
        }
        if steps_per_sample == 0 {
            return Err(ConfigError::ZeroStepsPerSample);
        }
        Ok(Self {
            n_warmup,
            n_samples,
            steps_per_sample,
        })
    }

    pub fn n_warmup(&self) -> usize {
        self.n_warmup
    }

    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    pub fn steps_per_sample(&self) -> usize {
        self.steps_per_sample
    }

    /// Total sweeps a chain following this schedule performs.
    pub fn total_steps(&self) -> usize {
        self.n_warmup + self.n_samples * self.steps_per_sample
    }
}

/// A Markov kernel that advances a chain state in place.
///
/// One `step` is a full sweep updating every site of the state exactly once,
/// in a fixed order, each site drawn from its exact conditional given the
/// current values of the others. Draw order is part of the contract: the same
/// seed must replay the same trajectory.
pub trait AbstractGibbsSampler {
    type Model;
    type State: Clone;

    /// Performs one full sweep.
    fn step(&self, rng: &mut dyn RngCore, model: &Self::Model, state: &mut Self::State);

    /// Performs `n_steps` consecutive sweeps.
    fn run(
        &self,
        rng: &mut dyn RngCore,
        model: &Self::Model,
        state: &mut Self::State,
        n_steps: usize,
    ) {
        for _ in 0..n_steps {
            self.step(rng, model, state);
        }
    }
}

/// Block Gibbs over an RBM's two layers.
///
/// The state is a batch of visible rows; each row is an independent chain.
/// A sweep draws the whole hidden layer given the visibles, then the whole
/// visible layer given those hiddens. Hidden draws are transient.
pub struct RbmGibbs;

impl AbstractGibbsSampler for RbmGibbs {
    type Model = Rbm;
    type State = Array2<f64>;

    fn step(&self, rng: &mut dyn RngCore, model: &Self::Model, state: &mut Self::State) {
        let hidden = model.sample_hidden(rng, state.view());
        *state = model.sample_visible(rng, hidden.view());
    }
}

/// Site-by-site Gibbs over the spin pair: `a` given `b`, then `b` given the
/// freshly drawn `a`.
pub struct PairGibbs;

impl AbstractGibbsSampler for PairGibbs {
    type Model = SpinPair;
    type State = PairState;

    fn step(&self, rng: &mut dyn RngCore, model: &Self::Model, state: &mut Self::State) {
        state.a = model.draw_site(rng, state.b);
        state.b = model.draw_site(rng, state.a);
    }
}
