/// Base trait for energy-based models.
///
/// An energy function assigns a scalar to every joint configuration; the model
/// distribution is the Boltzmann form `p(x) ∝ exp(-E(x))`, which is never
/// normalized here. Sampling works entirely through the models' conditionals;
/// the joint energy exists for diagnostics and tests.
pub trait AbstractEnergyModel {
    /// The joint-configuration type this model scores.
    type Configuration;

    /// Evaluates the energy of one configuration.
    ///
    /// Pure in the parameters and the configuration; no hidden state.
    fn energy(&self, configuration: &Self::Configuration) -> f64;
}
