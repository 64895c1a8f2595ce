use nih_plug::prelude::*;
use std::sync::Arc;

pub mod coefficients;
pub mod controls;
pub mod error;
pub mod filter_bank;
pub mod params;
pub mod processor;
pub mod resolver;

pub use coefficients::FilterMode;
pub use controls::{FilterControls, ParameterSnapshot, ParameterSource};
pub use error::FilterError;
pub use params::FilterParams;
pub use processor::{BlockOutcome, FilterProcessor};

/// A switchable low-pass/high-pass filter with one cutoff control and an on/off switch.
pub struct FilterOne {
    params: Arc<FilterParams>,

    processor: FilterProcessor,
    /// Channels on the main input bus. Output channels past this are silenced.
    input_channels: usize,
}

impl Default for FilterOne {
    fn default() -> Self {
        // The processor is sized in `initialize`
        Self {
            params: Arc::new(FilterParams::default()),

            processor: FilterProcessor::new(),
            input_channels: 0,
        }
    }
}

impl Plugin for FilterOne {
    const NAME: &'static str = "Filter One";
    const VENDOR: &'static str = "Filter One";
    const URL: &'static str = "";
    const EMAIL: &'static str = "";

    const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    const AUDIO_IO_LAYOUTS: &'static [AudioIOLayout] = &[
        AudioIOLayout {
            main_input_channels: NonZeroU32::new(2),
            main_output_channels: NonZeroU32::new(2),
            ..AudioIOLayout::const_default()
        },
        AudioIOLayout {
            main_input_channels: NonZeroU32::new(1),
            main_output_channels: NonZeroU32::new(1),
            ..AudioIOLayout::const_default()
        },
    ];

    // Blocks get split at automation points, so per-block coefficient updates land on the
    // right sample
    const SAMPLE_ACCURATE_AUTOMATION: bool = true;

    type SysExMessage = ();
    type BackgroundTask = ();

    fn params(&self) -> Arc<dyn Params> {
        self.params.clone()
    }

    fn initialize(
        &mut self,
        audio_io_layout: &AudioIOLayout,
        buffer_config: &BufferConfig,
        _context: &mut impl InitContext<Self>,
    ) -> bool {
        let output_channels = audio_io_layout
            .main_output_channels
            .map_or(0, NonZeroU32::get) as usize;
        self.input_channels = audio_io_layout
            .main_input_channels
            .map_or(0, NonZeroU32::get) as usize;

        match self.processor.prepare(
            buffer_config.sample_rate,
            buffer_config.max_buffer_size as usize,
            output_channels,
        ) {
            Ok(()) => {
                nih_log!(
                    "Filter prepared: {} Hz, {} in / {} out, up to {} samples per block",
                    buffer_config.sample_rate,
                    self.input_channels,
                    output_channels,
                    buffer_config.max_buffer_size
                );
                true
            }
            Err(err) => {
                nih_error!("Refusing to initialize filter: {err}");
                false
            }
        }
    }

    fn reset(&mut self) {
        self.processor.reset();
    }

    fn deactivate(&mut self) {
        self.processor.release();
    }

    fn process(
        &mut self,
        buffer: &mut Buffer,
        _aux: &mut AuxiliaryBuffers,
        _context: &mut impl ProcessContext<Self>,
    ) -> ProcessStatus {
        let snapshot = self.params.snapshot();
        self.processor
            .process(buffer.as_slice(), self.input_channels, &snapshot);

        ProcessStatus::Normal
    }
}

impl ClapPlugin for FilterOne {
    const CLAP_ID: &'static str = "com.filter-one.filter-one";
    const CLAP_DESCRIPTION: Option<&'static str> =
        Some("Second-order low-pass/high-pass filter with a single cutoff control");
    const CLAP_MANUAL_URL: Option<&'static str> = None;
    const CLAP_SUPPORT_URL: Option<&'static str> = None;
    const CLAP_FEATURES: &'static [ClapFeature] = &[
        ClapFeature::AudioEffect,
        ClapFeature::Filter,
        ClapFeature::Stereo,
        ClapFeature::Mono,
    ];
}

impl Vst3Plugin for FilterOne {
    const VST3_CLASS_ID: [u8; 16] = *b"FilterOneLpHpAaA";
    const VST3_SUBCATEGORIES: &'static [Vst3SubCategory] =
        &[Vst3SubCategory::Fx, Vst3SubCategory::Filter];
}

nih_export_clap!(FilterOne);
nih_export_vst3!(FilterOne);
