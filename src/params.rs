use nih_plug::prelude::*;

use crate::controls::{
    ParameterSnapshot, ParameterSource, CUTOFF_MAX_HZ, CUTOFF_MIN_HZ, DEFAULT_CUTOFF_HZ,
};

#[derive(Params)]
pub struct FilterParams {
    /// Filter on/off. Off passes audio through untouched.
    #[id = "active"]
    pub active: BoolParam,

    #[id = "cutoff"]
    pub cutoff: FloatParam,

    // Filter type radio group
    #[id = "radio_low"]
    pub radio_low: BoolParam,
    #[id = "radio_high"]
    pub radio_high: BoolParam,
}

impl Default for FilterParams {
    fn default() -> Self {
        let defaults = ParameterSnapshot::default();

        Self {
            active: BoolParam::new("On/Off", defaults.active),

            cutoff: FloatParam::new(
                "Cutoff Frequency",
                DEFAULT_CUTOFF_HZ,
                FloatRange::Skewed {
                    min: CUTOFF_MIN_HZ,
                    max: CUTOFF_MAX_HZ,
                    factor: FloatRange::skew_factor(-2.0),
                },
            )
            .with_value_to_string(formatters::v2s_f32_hz_then_khz(1))
            .with_string_to_value(formatters::s2v_f32_hz_then_khz()),

            radio_low: BoolParam::new("Low-pass", defaults.low_selected),
            radio_high: BoolParam::new("High-pass", defaults.high_selected),
        }
    }
}

impl ParameterSource for FilterParams {
    /// nih_plug applies automation on the audio thread before `process`, so these reads all see
    /// the same state.
    fn snapshot(&self) -> ParameterSnapshot {
        ParameterSnapshot {
            active: self.active.value(),
            cutoff_hz: self.cutoff.value(),
            low_selected: self.radio_low.value(),
            high_selected: self.radio_high.value(),
        }
    }
}
