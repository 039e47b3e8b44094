//! Overflow-safe scalar nonlinearities shared by the conditionals and the
//! free energy.
//!
//! Weight magnitudes grow without bound during unstable CD training, so both
//! functions must stay finite (and probabilities inside `[0, 1]`) for
//! arbitrarily large pre-activations.

/// Logistic sigmoid, evaluated without overflowing the exponential.
///
/// The two branches keep the exponent non-positive, so `exp` never produces
/// infinity and the result is exact at the saturated ends.
pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// `ln(1 + exp(x))`, evaluated as `max(x, 0) + ln1p(exp(-|x|))`.
///
/// The naive form overflows near `x = 710`; this one is finite for every
/// finite input and degrades to `x` itself at large magnitudes.
pub fn softplus(x: f64) -> f64 {
    x.max(0.0) + (-x.abs()).exp().ln_1p()
}
