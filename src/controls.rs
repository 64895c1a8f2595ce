//! Control values consumed by the audio thread at the start of every block.
//!
//! Inside a host the values come from [`FilterParams`](crate::params::FilterParams). Anything
//! else that drives the filter from another thread can use [`FilterControls`], which publishes
//! the same values lock-free.

use atomic_float::AtomicF32;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use crate::coefficients::FilterMode;

pub const CUTOFF_MIN_HZ: f32 = 20.0;
pub const CUTOFF_MAX_HZ: f32 = 20_000.0;
pub const DEFAULT_CUTOFF_HZ: f32 = 500.0;

const LOW_SELECTED: u8 = 0b01;
const HIGH_SELECTED: u8 = 0b10;

/// One block's worth of control values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSnapshot {
    /// When false the block passes through untouched.
    pub active: bool,
    pub cutoff_hz: f32,
    pub low_selected: bool,
    pub high_selected: bool,
}

impl Default for ParameterSnapshot {
    fn default() -> Self {
        Self {
            active: true,
            cutoff_hz: DEFAULT_CUTOFF_HZ,
            low_selected: true,
            high_selected: false,
        }
    }
}

/// Anything that can hand the audio thread a coherent [`ParameterSnapshot`] without blocking.
pub trait ParameterSource {
    fn snapshot(&self) -> ParameterSnapshot;
}

/// Lock-free control values shared between a control thread and the audio thread.
///
/// `active` and `cutoff_hz` are independent scalars and get one atomic each. The two mode flags
/// only make sense together, so they share a single byte and are always read in one load.
pub struct FilterControls {
    active: AtomicBool,
    cutoff_hz: AtomicF32,
    mode_flags: AtomicU8,
}

impl Default for FilterControls {
    fn default() -> Self {
        let defaults = ParameterSnapshot::default();
        let controls = Self {
            active: AtomicBool::new(defaults.active),
            cutoff_hz: AtomicF32::new(defaults.cutoff_hz),
            mode_flags: AtomicU8::new(0),
        };
        controls.set_mode_flags(defaults.low_selected, defaults.high_selected);

        controls
    }
}

impl FilterControls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::Release);
    }

    pub fn set_cutoff_hz(&self, cutoff_hz: f32) {
        self.cutoff_hz.store(cutoff_hz, Ordering::Release);
    }

    /// Store both radio flags at once. Ambiguous combinations are allowed and resolved later.
    pub fn set_mode_flags(&self, low_selected: bool, high_selected: bool) {
        let mut flags = 0;
        if low_selected {
            flags |= LOW_SELECTED;
        }
        if high_selected {
            flags |= HIGH_SELECTED;
        }

        self.mode_flags.store(flags, Ordering::Release);
    }

    /// Select a mode the way a radio group would: one flag on, the other off.
    pub fn select_mode(&self, mode: FilterMode) {
        match mode {
            FilterMode::LowPass => self.set_mode_flags(true, false),
            FilterMode::HighPass => self.set_mode_flags(false, true),
        }
    }
}

impl ParameterSource for FilterControls {
    fn snapshot(&self) -> ParameterSnapshot {
        let flags = self.mode_flags.load(Ordering::Acquire);

        ParameterSnapshot {
            active: self.active.load(Ordering::Acquire),
            cutoff_hz: self.cutoff_hz.load(Ordering::Acquire),
            low_selected: flags & LOW_SELECTED != 0,
            high_selected: flags & HIGH_SELECTED != 0,
        }
    }
}
