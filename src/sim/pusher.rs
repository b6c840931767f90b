//! Pusher actuator motion
//!
//! The pusher is a velocity-controlled actuator, not a free body: every tick
//! its pose and velocity are derived from elapsed time alone and commanded
//! onto the kinematic body. Collision feedback never deflects it.

/// Commanded pose and velocity along the push axis for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PusherMotion {
    /// Offset of the pusher center along the push axis
    pub offset: f32,
    /// Signed velocity along the push axis
    pub velocity: f32,
}

/// Ease-in-out shaping; removes velocity discontinuities at the turning points
fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - 2.0 * (1.0 - t) * (1.0 - t)
    }
}

/// Slope of [`ease_in_out`]: zero at both ends, peak of 2 at mid-stroke
fn ease_slope(t: f32) -> f32 {
    if t < 0.5 { 4.0 * t } else { 4.0 * (1.0 - t) }
}

/// Derive the pusher's commanded offset and velocity from elapsed time.
///
/// The cycle folds into a triangle phase `tau` in `[0, 1]` (out on the first
/// half-period, back on the second), eased so the stroke reverses smoothly.
/// The offset sweeps `[base - amplitude, base + amplitude]`; the velocity is
/// the time derivative of that eased displacement, so it crosses zero exactly
/// at the two stroke extrema and peaks mid-stroke.
pub fn pusher_motion(elapsed: f32, base: f32, amplitude: f32, period: f32) -> PusherMotion {
    let half = period * 0.5;
    let cycle = elapsed.rem_euclid(period);
    let (tau, dir) = if cycle < half {
        (cycle / half, 1.0)
    } else {
        ((period - cycle) / half, -1.0)
    };

    let offset = base + ease_in_out(tau) * 2.0 * amplitude - amplitude;
    let velocity = dir * 2.0 * amplitude * ease_slope(tau) / half;

    PusherMotion { offset, velocity }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{PUSHER_AMPLITUDE, PUSHER_BASE, PUSHER_PERIOD};

    fn motion(t: f32) -> PusherMotion {
        pusher_motion(t, PUSHER_BASE, PUSHER_AMPLITUDE, PUSHER_PERIOD)
    }

    #[test]
    fn test_motion_is_periodic() {
        for i in 0..200 {
            let t = i as f32 * 0.037;
            let a = motion(t);
            let b = motion(t + PUSHER_PERIOD);
            assert!((a.offset - b.offset).abs() < 1e-4, "offset drifts at t={t}");
            assert!((a.velocity - b.velocity).abs() < 1e-3, "velocity drifts at t={t}");
        }
    }

    #[test]
    fn test_offset_stays_within_stroke() {
        for i in 0..500 {
            let t = i as f32 * 0.013;
            let m = motion(t);
            assert!(m.offset >= PUSHER_BASE - PUSHER_AMPLITUDE - 1e-5);
            assert!(m.offset <= PUSHER_BASE + PUSHER_AMPLITUDE + 1e-5);
        }
    }

    #[test]
    fn test_velocity_zero_at_stroke_extrema() {
        // Retracted extremum at t = 0, extended at t = P/2
        let retracted = motion(0.0);
        assert!((retracted.offset - (PUSHER_BASE - PUSHER_AMPLITUDE)).abs() < 1e-5);
        assert_eq!(retracted.velocity, 0.0);

        let extended = motion(PUSHER_PERIOD * 0.5);
        assert!((extended.offset - (PUSHER_BASE + PUSHER_AMPLITUDE)).abs() < 1e-5);
        assert_eq!(extended.velocity, 0.0);
    }

    #[test]
    fn test_velocity_sign_matches_stroke_direction() {
        // Forward half-cycle pushes toward +z, return half-cycle retracts
        assert!(motion(PUSHER_PERIOD * 0.25).velocity > 0.0);
        assert!(motion(PUSHER_PERIOD * 0.75).velocity < 0.0);
    }

    #[test]
    fn test_velocity_peaks_mid_stroke() {
        let peak = motion(PUSHER_PERIOD * 0.25).velocity;
        for i in 1..50 {
            let t = i as f32 * PUSHER_PERIOD / 100.0;
            assert!(motion(t).velocity <= peak + 1e-5);
        }
    }

    #[test]
    fn test_velocity_approximates_displacement_derivative() {
        let h = 1e-3;
        for i in 0..40 {
            let t = 0.05 + i as f32 * 0.045;
            // Skip samples straddling the fold points where the slope is only
            // one-sided
            let cycle = t.rem_euclid(PUSHER_PERIOD);
            if (cycle - 1.0).abs() < 0.01 || cycle < 0.01 || cycle > PUSHER_PERIOD - 0.01 {
                continue;
            }
            let numeric = (motion(t + h).offset - motion(t - h).offset) / (2.0 * h);
            assert!(
                (motion(t).velocity - numeric).abs() < 0.05,
                "derivative mismatch at t={t}"
            );
        }
    }
}
