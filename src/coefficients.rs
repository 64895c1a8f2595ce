use std::f64::consts::{FRAC_1_SQRT_2, PI};

use biquad::Coefficients;

use crate::error::FilterError;

/// Cutoffs are never pushed above this fraction of Nyquist, keeping the poles away from z = -1.
const MAX_NYQUIST_RATIO: f64 = 0.99;
/// Lowest cutoff the calculator will design for.
const MIN_CUTOFF_HZ: f64 = 1.0;

/// Pass-through coefficients, used until the first real set is installed.
pub const IDENTITY: Coefficients<f32> = Coefficients {
    a1: 0.0,
    a2: 0.0,
    b0: 1.0,
    b1: 0.0,
    b2: 0.0,
};

/// The two responses the plugin can switch between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    #[default]
    LowPass,
    HighPass,
}

/// Clamp a requested cutoff into the range the calculator can design for at this sample rate.
pub fn clamp_cutoff(sample_rate: f32, cutoff_hz: f32) -> f32 {
    clamp_cutoff_f64(f64::from(sample_rate), f64::from(cutoff_hz)) as f32
}

fn clamp_cutoff_f64(sample_rate: f64, cutoff_hz: f64) -> f64 {
    let hi = sample_rate * 0.5 * MAX_NYQUIST_RATIO;
    let lo = MIN_CUTOFF_HZ.min(hi * 0.5);

    // `max` first so a NaN cutoff lands on `lo`; never panics on a bad sample rate
    cutoff_hz.max(lo).min(hi)
}

/// Compute a second-order Butterworth low-pass or high-pass (RBJ cookbook, Q = 1/sqrt(2)).
///
/// The cutoff is clamped below Nyquist first, so any finite positive sample rate produces a
/// usable set. Everything is computed in `f64` and rounded once, which keeps low cutoffs at high
/// sample rates accurate. Safe to call from the audio thread.
pub fn compute(
    sample_rate: f32,
    cutoff_hz: f32,
    mode: FilterMode,
) -> Result<Coefficients<f32>, FilterError> {
    if !(sample_rate.is_finite() && sample_rate > 0.0) {
        return Err(FilterError::InvalidSampleRate(sample_rate));
    }

    let sr = f64::from(sample_rate);
    let freq = clamp_cutoff_f64(sr, f64::from(cutoff_hz));

    let omega = 2.0 * PI * freq / sr;
    let cosw = omega.cos();
    let sinw = omega.sin();
    let alpha = sinw / (2.0 * FRAC_1_SQRT_2);

    let (b0, b1, b2) = match mode {
        FilterMode::LowPass => ((1.0 - cosw) / 2.0, 1.0 - cosw, (1.0 - cosw) / 2.0),
        FilterMode::HighPass => ((1.0 + cosw) / 2.0, -(1.0 + cosw), (1.0 + cosw) / 2.0),
    };
    let a0 = 1.0 + alpha;

    let coefficients = Coefficients {
        a1: (-2.0 * cosw / a0) as f32,
        a2: ((1.0 - alpha) / a0) as f32,
        b0: (b0 / a0) as f32,
        b1: (b1 / a0) as f32,
        b2: (b2 / a0) as f32,
    };

    if coefficients_are_finite(&coefficients) {
        Ok(coefficients)
    } else {
        Err(FilterError::NonFiniteCoefficients {
            mode,
            cutoff_hz: freq as f32,
        })
    }
}

pub fn coefficients_are_finite(coefficients: &Coefficients<f32>) -> bool {
    [
        coefficients.a1,
        coefficients.a2,
        coefficients.b0,
        coefficients.b1,
        coefficients.b2,
    ]
    .iter()
    .all(|c| c.is_finite())
}

/// Linear magnitude of the response at `frequency_hz`.
pub fn magnitude_at(coefficients: &Coefficients<f32>, frequency_hz: f32, sample_rate: f32) -> f32 {
    let w = 2.0 * PI * f64::from(frequency_hz) / f64::from(sample_rate);
    let (b0, b1, b2) = (
        f64::from(coefficients.b0),
        f64::from(coefficients.b1),
        f64::from(coefficients.b2),
    );
    let (a1, a2) = (f64::from(coefficients.a1), f64::from(coefficients.a2));

    let num_re = b0 + b1 * w.cos() + b2 * (2.0 * w).cos();
    let num_im = -(b1 * w.sin() + b2 * (2.0 * w).sin());
    let den_re = 1.0 + a1 * w.cos() + a2 * (2.0 * w).cos();
    let den_im = -(a1 * w.sin() + a2 * (2.0 * w).sin());

    ((num_re * num_re + num_im * num_im) / (den_re * den_re + den_im * den_im)).sqrt() as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use biquad::{ToHertz, Q_BUTTERWORTH_F32};

    const SAMPLE_RATES: [f32; 6] = [8_000.0, 22_050.0, 44_100.0, 48_000.0, 96_000.0, 192_000.0];

    fn assert_close(actual: f32, expected: f32, tol: f32, what: &str) {
        assert!(
            (actual - expected).abs() <= tol,
            "{what}: expected {expected}, got {actual}"
        );
    }

    #[test]
    fn finite_for_every_valid_pair() {
        for &sr in &SAMPLE_RATES {
            let mut cutoff = 1.0_f32;
            while cutoff < sr / 2.0 {
                for mode in [FilterMode::LowPass, FilterMode::HighPass] {
                    let c = compute(sr, cutoff, mode).unwrap();
                    assert!(coefficients_are_finite(&c), "{sr} Hz / {cutoff} Hz / {mode:?}");
                }
                cutoff *= 1.5;
            }
        }
    }

    #[test]
    fn out_of_range_cutoffs_are_clamped_not_rejected() {
        for &sr in &SAMPLE_RATES {
            for cutoff in [
                -100.0,
                0.0,
                sr / 2.0,
                sr,
                1.0e9,
                f32::INFINITY,
                f32::NEG_INFINITY,
                f32::NAN,
            ] {
                for mode in [FilterMode::LowPass, FilterMode::HighPass] {
                    let c = compute(sr, cutoff, mode).unwrap();
                    assert!(coefficients_are_finite(&c), "{sr} Hz / {cutoff} Hz / {mode:?}");
                }
            }
        }
    }

    #[test]
    fn clamp_stays_below_nyquist() {
        assert!(clamp_cutoff(44_100.0, 30_000.0) < 22_050.0);
        assert_eq!(clamp_cutoff(44_100.0, 1_000.0), 1_000.0);
        assert_eq!(clamp_cutoff(44_100.0, f32::NAN), 1.0);
        assert_eq!(clamp_cutoff(44_100.0, -5.0), 1.0);
        // Tiny sample rates must not invert the clamp range
        let c = clamp_cutoff(1.0, 20.0);
        assert!(c > 0.0 && c < 0.5, "got {c}");
    }

    #[test]
    fn rejects_invalid_sample_rates() {
        for sr in [0.0, -44_100.0, f32::NAN, f32::INFINITY] {
            let err = compute(sr, 1_000.0, FilterMode::LowPass).unwrap_err();
            assert!(matches!(err, FilterError::InvalidSampleRate(_)), "{sr}: {err:?}");
        }
    }

    #[test]
    fn matches_closed_form_lowpass() {
        let c = compute(44_100.0, 1_000.0, FilterMode::LowPass).unwrap();

        let w = 2.0 * PI * 1_000.0 / 44_100.0;
        let alpha = w.sin() / (2.0 * FRAC_1_SQRT_2);
        let a0 = 1.0 + alpha;
        assert_close(c.b0, ((1.0 - w.cos()) / 2.0 / a0) as f32, 1e-7, "b0");
        assert_close(c.b1, ((1.0 - w.cos()) / a0) as f32, 1e-7, "b1");
        assert_close(c.b2, ((1.0 - w.cos()) / 2.0 / a0) as f32, 1e-7, "b2");
        assert_close(c.a1, (-2.0 * w.cos() / a0) as f32, 1e-7, "a1");
        assert_close(c.a2, ((1.0 - alpha) / a0) as f32, 1e-7, "a2");
    }

    #[test]
    fn agrees_with_biquad_crate() {
        for (mode, kind) in [
            (FilterMode::LowPass, biquad::Type::LowPass),
            (FilterMode::HighPass, biquad::Type::HighPass),
        ] {
            let ours = compute(48_000.0, 2_500.0, mode).unwrap();
            let theirs = Coefficients::<f32>::from_params(
                kind,
                48_000.0_f32.hz(),
                2_500.0_f32.hz(),
                Q_BUTTERWORTH_F32,
            )
            .unwrap();

            assert_close(ours.b0, theirs.b0, 1e-5, "b0");
            assert_close(ours.b1, theirs.b1, 1e-5, "b1");
            assert_close(ours.b2, theirs.b2, 1e-5, "b2");
            assert_close(ours.a1, theirs.a1, 1e-5, "a1");
            assert_close(ours.a2, theirs.a2, 1e-5, "a2");
        }
    }

    #[test]
    fn modes_are_not_swapped() {
        let sr = 44_100.0;
        let lp = compute(sr, 1_000.0, FilterMode::LowPass).unwrap();
        let hp = compute(sr, 1_000.0, FilterMode::HighPass).unwrap();

        // DC gain
        assert_close(magnitude_at(&lp, 0.0, sr), 1.0, 1e-4, "low-pass DC");
        assert_close(magnitude_at(&hp, 0.0, sr), 0.0, 1e-4, "high-pass DC");

        // Near Nyquist
        assert!(magnitude_at(&lp, 20_000.0, sr) < 0.01);
        assert_close(magnitude_at(&hp, 20_000.0, sr), 1.0, 1e-2, "high-pass HF");

        // Butterworth: -3 dB at the cutoff for both responses
        assert_close(magnitude_at(&lp, 1_000.0, sr), FRAC_1_SQRT_2 as f32, 1e-3, "lp fc");
        assert_close(magnitude_at(&hp, 1_000.0, sr), FRAC_1_SQRT_2 as f32, 1e-3, "hp fc");
    }

    #[test]
    fn identity_is_flat() {
        for freq in [0.0, 100.0, 10_000.0] {
            assert_close(magnitude_at(&IDENTITY, freq, 44_100.0), 1.0, 1e-6, "identity");
        }
    }

    #[test]
    fn non_finite_detection() {
        let mut c = IDENTITY;
        assert!(coefficients_are_finite(&c));
        c.a2 = f32::NAN;
        assert!(!coefficients_are_finite(&c));
        c.a2 = 0.0;
        c.b1 = f32::INFINITY;
        assert!(!coefficients_are_finite(&c));
    }
}
