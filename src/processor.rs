use nih_plug::nih_debug_assert;

use crate::controls::ParameterSnapshot;
use crate::error::FilterError;
use crate::filter_bank::FilterBank;
use crate::resolver::{BlockAction, ModeResolver};

/// What happened to a block handed to [`FilterProcessor::process`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockOutcome {
    Filtered,
    /// The filter is switched off; the block was left as it came in.
    Bypassed,
    /// `prepare` has not succeeded (or `release` was called); the block was left as it came in.
    Unprepared,
}

struct Prepared {
    sample_rate: f32,
    max_block_size: usize,
    bank: FilterBank,
}

/// The real-time filter pipeline: owns the per-channel state, resolves parameters once per block
/// and filters the buffer in place.
///
/// Everything that allocates happens in [`prepare`](Self::prepare). [`process`](Self::process)
/// never allocates, locks or logs.
#[derive(Default)]
pub struct FilterProcessor {
    resolver: ModeResolver,
    prepared: Option<Prepared>,
}

impl FilterProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// (Re)allocate filter state for `channel_count` channels at `sample_rate` with zeroed
    /// history.
    ///
    /// On error the processor is left unprepared and `process` passes audio through.
    pub fn prepare(
        &mut self,
        sample_rate: f32,
        max_block_size: usize,
        channel_count: usize,
    ) -> Result<(), FilterError> {
        self.prepared = None;
        self.resolver.reset();

        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(FilterError::InvalidSampleRate(sample_rate));
        }
        if channel_count == 0 {
            return Err(FilterError::NoChannels);
        }

        self.prepared = Some(Prepared {
            sample_rate,
            max_block_size,
            bank: FilterBank::new(channel_count),
        });

        Ok(())
    }

    /// Zero the filter history without reallocating, for when the host restarts the stream.
    pub fn reset(&mut self) {
        if let Some(prepared) = self.prepared.as_mut() {
            prepared.bank.reset();
        }
    }

    /// Drop all filter state. `process` is a pass-through until `prepare` runs again.
    pub fn release(&mut self) {
        self.prepared = None;
        self.resolver.reset();
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared.is_some()
    }

    pub fn sample_rate(&self) -> Option<f32> {
        self.prepared.as_ref().map(|p| p.sample_rate)
    }

    pub fn max_block_size(&self) -> Option<usize> {
        self.prepared.as_ref().map(|p| p.max_block_size)
    }

    pub fn channel_count(&self) -> usize {
        self.prepared
            .as_ref()
            .map_or(0, |p| p.bank.channel_count())
    }

    /// Process one block in place.
    ///
    /// `buffer` holds one slice per output channel. Only the first `input_channels` of them
    /// carry input; the rest are silenced before anything else happens.
    pub fn process(
        &mut self,
        buffer: &mut [&mut [f32]],
        input_channels: usize,
        snapshot: &ParameterSnapshot,
    ) -> BlockOutcome {
        for channel in buffer.iter_mut().skip(input_channels) {
            channel.fill(0.0);
        }

        let Some(prepared) = self.prepared.as_mut() else {
            return BlockOutcome::Unprepared;
        };

        nih_debug_assert!(
            buffer
                .iter()
                .all(|channel| channel.len() <= prepared.max_block_size),
            "block is larger than the prepared maximum"
        );

        match self
            .resolver
            .apply(snapshot, prepared.sample_rate, &mut prepared.bank)
        {
            BlockAction::Bypass => BlockOutcome::Bypassed,
            BlockAction::Filter => {
                prepared.bank.process(buffer, input_channels);
                BlockOutcome::Filtered
            }
        }
    }
}
