use biquad::{Biquad, Coefficients, DirectForm2Transposed};

use crate::coefficients::{coefficients_are_finite, FilterMode, IDENTITY};
use crate::error::FilterError;

/// Per-channel filter memory plus the coefficient set currently driving it.
///
/// Each channel owns its own [`DirectForm2Transposed`] so one channel's history can never leak
/// into another. All channels always run the same coefficients.
pub struct FilterBank {
    channels: Vec<DirectForm2Transposed<f32>>,
    coefficients: Coefficients<f32>,
}

impl FilterBank {
    /// Allocates `channel_count` pass-through filters with zeroed history.
    pub fn new(channel_count: usize) -> Self {
        Self {
            channels: (0..channel_count)
                .map(|_| DirectForm2Transposed::<f32>::new(IDENTITY))
                .collect(),
            coefficients: IDENTITY,
        }
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn coefficients(&self) -> Coefficients<f32> {
        self.coefficients
    }

    /// Replace the coefficients on every channel without touching history.
    ///
    /// A non-finite set is refused and the current one stays in place.
    pub fn install(
        &mut self,
        coefficients: Coefficients<f32>,
        mode: FilterMode,
        cutoff_hz: f32,
    ) -> Result<(), FilterError> {
        if !coefficients_are_finite(&coefficients) {
            return Err(FilterError::NonFiniteCoefficients { mode, cutoff_hz });
        }

        self.coefficients = coefficients;
        for filter in self.channels.iter_mut() {
            filter.update_coefficients(coefficients);
        }

        Ok(())
    }

    /// Zero the history of every channel, keeping the coefficients.
    pub fn reset(&mut self) {
        for filter in self.channels.iter_mut() {
            *filter = DirectForm2Transposed::<f32>::new(self.coefficients);
        }
    }

    /// Filter the first `channels` channels of `buffer` in place.
    ///
    /// Channels past the bank's size or past `channels` are left as they are.
    pub fn process(&mut self, buffer: &mut [&mut [f32]], channels: usize) {
        for (filter, samples) in self
            .channels
            .iter_mut()
            .zip(buffer.iter_mut())
            .take(channels)
        {
            for sample in samples.iter_mut() {
                *sample = filter.run(*sample);
            }
        }
    }
}
