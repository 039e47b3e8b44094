use crate::gibbs::{AbstractGibbsSampler, PairGibbs, SamplingSchedule};
use crate::models::spin_pair::{PairState, Spin, SpinPair};
use rand::RngCore;

/// Observer that folds an accumulator over the emitted states of a chain.
///
/// `observe` is called once per emission with the carry from the previous
/// call; the output of each call is collected by [`observe_chain`].
pub trait AbstractObserver<S> {
    type Carry;
    type Output;

    fn init(&self) -> Self::Carry;

    fn observe(
        &self,
        state: &S,
        carry: Self::Carry,
        iteration: usize,
    ) -> (Self::Carry, Self::Output);
}

/// Observer that returns a copy of each emitted state.
pub struct StateObserver;

impl<S: Clone> AbstractObserver<S> for StateObserver {
    type Carry = ();
    type Output = S;

    fn init(&self) -> Self::Carry {}

    fn observe(&self, state: &S, carry: Self::Carry, _iteration: usize) -> (Self::Carry, S) {
        (carry, state.clone())
    }
}

/// Running tally of where a spin-pair chain has been.
///
/// Joint states and single sites are both tallied: `both_up`, `both_down`
/// and `mixed` partition the emissions, while `a_up` and `b_up` count each
/// variable's visits to `+1` on its own. A mode flip is counted when an
/// aligned emission has the opposite sign of the previous aligned emission;
/// misaligned emissions in between do not reset the comparison. A changed
/// emission is one that differs from its immediate predecessor at either
/// site.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PairOccupancy {
    pub both_up: usize,
    pub both_down: usize,
    pub mixed: usize,
    pub a_up: usize,
    pub b_up: usize,
    pub mode_flips: usize,
    pub changed_emissions: usize,
}

impl PairOccupancy {
    /// Number of emissions tallied so far.
    pub fn total(&self) -> usize {
        self.both_up + self.both_down + self.mixed
    }

    pub fn fraction_both_up(&self) -> f64 {
        self.fraction(self.both_up)
    }

    pub fn fraction_both_down(&self) -> f64 {
        self.fraction(self.both_down)
    }

    pub fn fraction_mixed(&self) -> f64 {
        self.fraction(self.mixed)
    }

    /// Fraction of emissions spent in the better-visited aligned mode.
    pub fn dominant_fraction(&self) -> f64 {
        self.fraction(self.both_up.max(self.both_down))
    }

    /// Fraction of emissions in which `a` took its more common value.
    pub fn dominant_fraction_a(&self) -> f64 {
        self.fraction(self.a_up.max(self.total() - self.a_up))
    }

    /// Fraction of emissions in which `b` took its more common value.
    pub fn dominant_fraction_b(&self) -> f64 {
        self.fraction(self.b_up.max(self.total() - self.b_up))
    }

    /// Mode flips per emission.
    pub fn flip_rate(&self) -> f64 {
        self.fraction(self.mode_flips)
    }

    /// Fraction of emissions that differ from their predecessor.
    pub fn change_rate(&self) -> f64 {
        self.fraction(self.changed_emissions)
    }

    fn fraction(&self, count: usize) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        count as f64 / total as f64
    }
}

/// Observer that tallies occupancy, mode flips and state changes of a
/// spin-pair chain.
pub struct PairOccupancyObserver;

impl AbstractObserver<PairState> for PairOccupancyObserver {
    /// The running tally, the sign of the last aligned emission, and the
    /// previous emission.
    type Carry = (PairOccupancy, Option<Spin>, Option<PairState>);
    type Output = PairOccupancy;

    fn init(&self) -> Self::Carry {
        (PairOccupancy::default(), None, None)
    }

    fn observe(
        &self,
        state: &PairState,
        carry: Self::Carry,
        _iteration: usize,
    ) -> (Self::Carry, Self::Output) {
        let (mut tally, mut last_mode, previous) = carry;
        if state.a == Spin::Up {
            tally.a_up += 1;
        }
        if state.b == Spin::Up {
            tally.b_up += 1;
        }
        if let Some(previous) = previous {
            if previous != *state {
                tally.changed_emissions += 1;
            }
        }
        if state.aligned() {
            if let Some(previous_mode) = last_mode {
                if previous_mode != state.a {
                    tally.mode_flips += 1;
                }
            }
            last_mode = Some(state.a);
            match state.a {
                Spin::Up => tally.both_up += 1,
                Spin::Down => tally.both_down += 1,
            }
        } else {
            tally.mixed += 1;
        }
        ((tally, last_mode, Some(*state)), tally)
    }
}

/// Runs a chain under a schedule and collects one observer output per
/// emission.
///
/// Warmup sweeps produce no output, and the initial state is never emitted;
/// the first output reflects the state after `steps_per_sample` post-warmup
/// sweeps.
pub fn observe_chain<G, O>(
    rng: &mut dyn RngCore,
    sampler: &G,
    model: &G::Model,
    schedule: &SamplingSchedule,
    observer: &O,
    mut state: G::State,
) -> Vec<O::Output>
where
    G: AbstractGibbsSampler,
    O: AbstractObserver<G::State>,
{
    sampler.run(rng, model, &mut state, schedule.n_warmup());
    let mut carry = observer.init();
    let mut outputs = Vec::with_capacity(schedule.n_samples());
    for iteration in 0..schedule.n_samples() {
        sampler.run(rng, model, &mut state, schedule.steps_per_sample());
        let (next_carry, output) = observer.observe(&state, carry, iteration);
        carry = next_carry;
        outputs.push(output);
    }
    outputs
}

/// Collects the raw emitted states of a chain.
pub fn generate_trace<G>(
    rng: &mut dyn RngCore,
    sampler: &G,
    model: &G::Model,
    schedule: &SamplingSchedule,
    state: G::State,
) -> Vec<G::State>
where
    G: AbstractGibbsSampler,
{
    observe_chain(rng, sampler, model, schedule, &StateObserver, state)
}

/// Runs a spin-pair chain and returns its final occupancy tally.
pub fn measure_occupancy(
    rng: &mut dyn RngCore,
    model: &SpinPair,
    schedule: &SamplingSchedule,
    initial: PairState,
) -> PairOccupancy {
    let tallies = observe_chain(
        rng,
        &PairGibbs,
        model,
        schedule,
        &PairOccupancyObserver,
        initial,
    );
    *tallies.last().expect("schedule emits at least one sample")
}

/// Tallies a trace that was already collected.
pub fn summarize_trace(trace: &[PairState]) -> PairOccupancy {
    let observer = PairOccupancyObserver;
    let mut carry = observer.init();
    let mut tally = PairOccupancy::default();
    for (iteration, state) in trace.iter().enumerate() {
        let (next_carry, output) = observer.observe(state, carry, iteration);
        carry = next_carry;
        tally = output;
    }
    tally
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn pair(a: Spin, b: Spin) -> PairState {
        PairState { a, b }
    }

    #[test]
    fn state_observer_echoes_states() {
        let observer = StateObserver;
        let state = pair(Spin::Up, Spin::Down);
        let (_, output) = observer.observe(&state, (), 0);
        assert_eq!(output, state);
    }

    #[test]
    fn occupancy_tally_matches_hand_count() {
        let tally = summarize_trace(&[
            pair(Spin::Up, Spin::Up),
            pair(Spin::Up, Spin::Up),
            pair(Spin::Down, Spin::Down),
            pair(Spin::Up, Spin::Down),
            pair(Spin::Down, Spin::Down),
        ]);
        assert_eq!(tally.both_up, 2);
        assert_eq!(tally.both_down, 2);
        assert_eq!(tally.mixed, 1);
        assert_eq!(tally.a_up, 3);
        assert_eq!(tally.b_up, 2);
        assert_eq!(tally.mode_flips, 1);
        assert_eq!(tally.changed_emissions, 3);
        assert_eq!(tally.total(), 5);
        approx::assert_abs_diff_eq!(tally.dominant_fraction(), 0.4, epsilon = 1e-12);
        approx::assert_abs_diff_eq!(tally.dominant_fraction_a(), 0.6, epsilon = 1e-12);
        approx::assert_abs_diff_eq!(tally.dominant_fraction_b(), 0.6, epsilon = 1e-12);
    }

    #[test]
    fn misaligned_emissions_do_not_flip_the_mode() {
        let tally = summarize_trace(&[
            pair(Spin::Up, Spin::Up),
            pair(Spin::Up, Spin::Down),
            pair(Spin::Up, Spin::Up),
        ]);
        assert_eq!(tally.mode_flips, 0);
        assert_eq!(tally.changed_emissions, 2);
    }

    #[test]
    fn empty_tally_has_zero_fractions() {
        let tally = PairOccupancy::default();
        assert_eq!(tally.total(), 0);
        assert_eq!(tally.dominant_fraction(), 0.0);
        assert_eq!(tally.flip_rate(), 0.0);
        assert_eq!(tally.change_rate(), 0.0);
    }

    #[test]
    fn chain_emits_one_output_per_scheduled_sample() {
        let mut rng = StdRng::seed_from_u64(21);
        let model = SpinPair::new(0.0);
        let schedule = SamplingSchedule::new(2, 10, 3).unwrap();
        let trace = generate_trace(
            &mut rng,
            &PairGibbs,
            &model,
            &schedule,
            pair(Spin::Up, Spin::Up),
        );
        assert_eq!(trace.len(), 10);
    }

    #[test]
    fn traces_replay_under_the_same_seed() {
        let model = SpinPair::new(0.3);
        let schedule = SamplingSchedule::new(5, 20, 1).unwrap();
        let start = pair(Spin::Down, Spin::Up);

        let mut rng = StdRng::seed_from_u64(8);
        let first = generate_trace(&mut rng, &PairGibbs, &model, &schedule, start);
        let mut rng = StdRng::seed_from_u64(8);
        let second = generate_trace(&mut rng, &PairGibbs, &model, &schedule, start);

        assert_eq!(first, second);
    }

    #[test]
    fn pinned_model_never_leaves_its_mode() {
        let mut rng = StdRng::seed_from_u64(13);
        let model = SpinPair::new(50.0);
        let schedule = SamplingSchedule::new(0, 100, 1).unwrap();
        let tally = measure_occupancy(&mut rng, &model, &schedule, pair(Spin::Up, Spin::Up));
        assert_eq!(tally.both_up, 100);
        assert_eq!(tally.mode_flips, 0);
        approx::assert_abs_diff_eq!(tally.dominant_fraction(), 1.0, epsilon = 1e-12);
    }
}
