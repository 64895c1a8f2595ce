use thiserror::Error;

use crate::coefficients::FilterMode;

/// Errors raised while preparing the filter or computing its coefficients.
///
/// None of these ever reach the audio output: a failed `prepare` leaves the processor in
/// pass-through, and a failed coefficient computation keeps the previous set live.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum FilterError {
    /// Sample rate was zero, negative or not finite
    #[error("sample rate must be positive and finite, got {0} Hz")]
    InvalidSampleRate(f32),

    /// Asked to prepare for zero channels
    #[error("cannot prepare a filter for zero channels")]
    NoChannels,

    /// The computed coefficient set contained NaN or infinity
    #[error("{mode:?} coefficients for {cutoff_hz} Hz are not finite")]
    NonFiniteCoefficients {
        /// Response that was being computed.
        mode: FilterMode,
        /// Cutoff after clamping.
        cutoff_hz: f32,
    },
}
