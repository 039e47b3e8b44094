//! Two coupled `{-1, +1}` spins.
//!
//! The smallest model that mixes badly: `E(a, b) = -w·a·b` concentrates mass
//! on the aligned pair states as `w` grows, while single-site Gibbs updates
//! must pass through a misaligned state to move between them. The exact
//! distribution stays enumerable by hand, which makes the failure measurable.

use crate::models::ebm::AbstractEnergyModel;
use crate::numerics::sigmoid;
use rand::{Rng, RngCore};

/// Orientation of a single spin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Spin {
    Up,
    Down,
}

impl Spin {
    /// The `+1.0` or `-1.0` this spin contributes to the energy.
    pub fn value(self) -> f64 {
        match self {
            Spin::Up => 1.0,
            Spin::Down => -1.0,
        }
    }

    /// Fair-coin spin.
    pub fn random(rng: &mut dyn RngCore) -> Self {
        if rng.random::<f64>() < 0.5 {
            Spin::Up
        } else {
            Spin::Down
        }
    }
}

/// Joint orientation of both sites.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PairState {
    pub a: Spin,
    pub b: Spin,
}

impl PairState {
    /// Uniform draw over the four pair states.
    pub fn random(rng: &mut dyn RngCore) -> Self {
        Self {
            a: Spin::random(rng),
            b: Spin::random(rng),
        }
    }

    /// Whether both sites point the same way.
    pub fn aligned(self) -> bool {
        self.a == self.b
    }
}

/// Ferromagnetic (or antiferromagnetic, for `w < 0`) coupling of two spins.
#[derive(Clone, Copy, Debug)]
pub struct SpinPair {
    /// Interaction strength `w` in `E(a, b) = -w·a·b`.
    pub coupling: f64,
}

impl SpinPair {
    pub fn new(coupling: f64) -> Self {
        Self { coupling }
    }

    /// `P(site = +1 | neighbor)`.
    ///
    /// For `±1` spins the energy gap between the two orientations of one site
    /// is `2·w·neighbor`, hence the factor of two inside the sigmoid.
    pub fn prob_up_given(&self, neighbor: Spin) -> f64 {
        sigmoid(2.0 * self.coupling * neighbor.value())
    }

    /// Resamples a single site from its exact conditional.
    pub fn draw_site(&self, rng: &mut dyn RngCore, neighbor: Spin) -> Spin {
        let draw: f64 = rng.random();
        if draw < self.prob_up_given(neighbor) {
            Spin::Up
        } else {
            Spin::Down
        }
    }
}

impl AbstractEnergyModel for SpinPair {
    type Configuration = PairState;

    fn energy(&self, configuration: &Self::Configuration) -> f64 {
        -self.coupling * configuration.a.value() * configuration.b.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn energy_favors_alignment() {
        let model = SpinPair::new(1.5);
        let aligned = PairState {
            a: Spin::Up,
            b: Spin::Up,
        };
        let opposed = PairState {
            a: Spin::Up,
            b: Spin::Down,
        };
        assert_eq!(model.energy(&aligned), -1.5);
        assert_eq!(model.energy(&opposed), 1.5);
    }

    #[test]
    fn zero_coupling_gives_fair_conditional() {
        let model = SpinPair::new(0.0);
        assert_eq!(model.prob_up_given(Spin::Up), 0.5);
        assert_eq!(model.prob_up_given(Spin::Down), 0.5);
    }

    #[test]
    fn conditional_matches_closed_form() {
        let model = SpinPair::new(0.75);
        let expected = 1.0 / (1.0 + (-1.5f64).exp());
        approx::assert_abs_diff_eq!(
            model.prob_up_given(Spin::Up),
            expected,
            epsilon = 1e-12
        );
        approx::assert_abs_diff_eq!(
            model.prob_up_given(Spin::Down),
            1.0 - expected,
            epsilon = 1e-12
        );
    }

    #[test]
    fn saturated_coupling_pins_the_draw() {
        let model = SpinPair::new(50.0);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            assert_eq!(model.draw_site(&mut rng, Spin::Up), Spin::Up);
            assert_eq!(model.draw_site(&mut rng, Spin::Down), Spin::Down);
        }
    }

    #[test]
    fn random_states_are_reproducible() {
        let mut a = StdRng::seed_from_u64(11);
        let mut b = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            assert_eq!(PairState::random(&mut a), PairState::random(&mut b));
        }
    }
}
