use crate::coefficients::{clamp_cutoff, compute, FilterMode};
use crate::controls::ParameterSnapshot;
use crate::error::FilterError;
use crate::filter_bank::FilterBank;

/// What the block processor should do with the current block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockAction {
    Filter,
    Bypass,
}

/// Turn the two radio flags into a mode.
///
/// Exactly one flag set picks that mode. Both or neither keeps `current`, which covers hosts
/// that write the two flags one after the other during automation.
pub fn select_mode(low_selected: bool, high_selected: bool, current: FilterMode) -> FilterMode {
    match (low_selected, high_selected) {
        (true, false) => FilterMode::LowPass,
        (false, true) => FilterMode::HighPass,
        _ => current,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct FilterTarget {
    mode: FilterMode,
    cutoff_hz: f32,
}

/// Decides once per block whether the filter runs and whether its coefficients need replacing.
#[derive(Debug, Default)]
pub struct ModeResolver {
    mode: FilterMode,
    /// The target whose coefficients are live in the bank, if any.
    installed: Option<FilterTarget>,
}

impl ModeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently resolved mode.
    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    /// Forget the installed coefficients so the next active block recomputes them. The resolved
    /// mode is kept.
    pub fn reset(&mut self) {
        self.installed = None;
    }

    /// Resolve `snapshot` and, when the target changed, install fresh coefficients into `bank`.
    ///
    /// Filter history is never touched here. If computing or installing fails the previous
    /// coefficients stay live and the next block tries again.
    pub fn apply(
        &mut self,
        snapshot: &ParameterSnapshot,
        sample_rate: f32,
        bank: &mut FilterBank,
    ) -> BlockAction {
        if !snapshot.active {
            return BlockAction::Bypass;
        }

        self.mode = select_mode(snapshot.low_selected, snapshot.high_selected, self.mode);
        let target = FilterTarget {
            mode: self.mode,
            cutoff_hz: clamp_cutoff(sample_rate, snapshot.cutoff_hz),
        };

        if self.installed != Some(target) && Self::install(target, sample_rate, bank).is_ok() {
            self.installed = Some(target);
        }

        BlockAction::Filter
    }

    fn install(
        target: FilterTarget,
        sample_rate: f32,
        bank: &mut FilterBank,
    ) -> Result<(), FilterError> {
        let coefficients = compute(sample_rate, target.cutoff_hz, target.mode)?;
        bank.install(coefficients, target.mode, target.cutoff_hz)
    }
}
