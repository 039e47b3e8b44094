use thiserror::Error;

/// Rejection of an invalid hyperparameter at configuration time.
///
/// Shape mismatches between configurations and model parameters are caller
/// programming errors and panic instead.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The CD chain length `k` was zero.
    #[error("contrastive divergence requires at least one Gibbs step (k = 0)")]
    ZeroChainLength,
    /// A sampling schedule requested zero emitted samples.
    #[error("sampling schedule requires at least one sample")]
    ZeroSampleCount,
    /// A sampling schedule requested zero Gibbs steps between samples.
    #[error("sampling schedule requires at least one step per sample")]
    ZeroStepsPerSample,
    /// A training batch carried no rows.
    #[error("training batch must contain at least one configuration")]
    EmptyBatch,
    /// A training run was handed no batches at all.
    #[error("training requires at least one batch of data")]
    EmptyDataset,
}
