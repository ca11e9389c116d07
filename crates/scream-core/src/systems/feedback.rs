//! Feedback system - maps simulation state to presentation scalars.
//!
//! Everything here is advisory output for the host renderer and mixer:
//! bar fills, the proximity warning, breathing volume, the low-sanity
//! vignette, and hallucination flashes. Nothing feeds back into gameplay.

use rand::Rng;

use crate::components::{FearState, Stamina};

/// The proximity warning and breathing swell engage inside this range.
pub const WARNING_RANGE: f32 = 10.0;

/// Ambient breathing loop volume with no ghost nearby.
const BASE_BREATHING_VOLUME: f32 = 0.4;
/// Extra breathing volume per unit of ghost closeness.
const BREATHING_SWELL_RATE: f32 = 0.06;

/// Vignette is always faintly present; it darkens below this sanity.
const VIGNETTE_SANITY_THRESHOLD: f32 = 50.0;
const BASE_VIGNETTE_ALPHA: f32 = 100.0 / 255.0;

/// Below this sanity the hallucination flashes start rolling.
const HALLUCINATION_SANITY_THRESHOLD: f32 = 30.0;
/// Probability per tick of a hallucination flash while below threshold.
const HALLUCINATION_CHANCE: f32 = 0.01;
/// How long one flash stays on screen.
const HALLUCINATION_FLASH_DURATION: f32 = 0.1;
const HALLUCINATION_FLASH_ALPHA: f32 = 50.0 / 255.0;

/// Heartbeat pulse only shows above this intensity.
const HEARTBEAT_PULSE_THRESHOLD: f32 = 0.3;

/// Carry-over state for the flash timer.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FeedbackState {
    flash_remaining: f32,
}

/// Presentation scalars for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FeedbackFrame {
    /// Sanity bar fill in `[0, 1]`.
    pub sanity_fraction: f32,
    /// Stamina bar fill in `[0, 1]`.
    pub stamina_fraction: f32,
    /// Proximity warning strength: 0 beyond 10 units, up to 1 on contact.
    pub warning_intensity: f32,
    /// Breathing loop volume in `[0.4, 1.0]`.
    pub breathing_volume: f32,
    /// Screen vignette alpha in `[0, 1]`.
    pub vignette_alpha: f32,
    /// Additive vignette scale pulse from the heartbeat.
    pub vignette_pulse: f32,
    /// Hallucination flash overlay alpha, zero when no flash is live.
    pub flash_alpha: f32,
}

/// Compute this frame's presentation scalars.
pub fn feedback_system(
    state: &mut FeedbackState,
    dt: f32,
    sim_time: f64,
    fear: &FearState,
    stamina: &Stamina,
    ghost_distance: f32,
    rng: &mut impl Rng,
) -> FeedbackFrame {
    state.flash_remaining = (state.flash_remaining - dt).max(0.0);
    if fear.sanity < HALLUCINATION_SANITY_THRESHOLD && rng.gen::<f32>() < HALLUCINATION_CHANCE {
        state.flash_remaining = HALLUCINATION_FLASH_DURATION;
    }

    let (warning_intensity, breathing_volume) = if ghost_distance < WARNING_RANGE {
        (
            1.0 - ghost_distance / WARNING_RANGE,
            (BASE_BREATHING_VOLUME + (WARNING_RANGE - ghost_distance) * BREATHING_SWELL_RATE)
                .min(1.0),
        )
    } else {
        (0.0, BASE_BREATHING_VOLUME)
    };

    let vignette_alpha = if fear.sanity < VIGNETTE_SANITY_THRESHOLD {
        (((150.0 + (VIGNETTE_SANITY_THRESHOLD - fear.sanity) * 2.0) / 255.0).min(1.0))
            .max(BASE_VIGNETTE_ALPHA)
    } else {
        BASE_VIGNETTE_ALPHA
    };

    let vignette_pulse = if fear.heartbeat_intensity > HEARTBEAT_PULSE_THRESHOLD {
        (sim_time * 8.0).sin() as f32 * fear.heartbeat_intensity * 0.02
    } else {
        0.0
    };

    FeedbackFrame {
        sanity_fraction: fear.sanity_fraction(),
        stamina_fraction: stamina.fraction(),
        warning_intensity,
        breathing_volume,
        vignette_alpha,
        vignette_pulse,
        flash_alpha: if state.flash_remaining > 0.0 {
            HALLUCINATION_FLASH_ALPHA
        } else {
            0.0
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn frame(fear: &FearState, distance: f32) -> FeedbackFrame {
        let mut state = FeedbackState::default();
        let mut rng = StdRng::seed_from_u64(11);
        feedback_system(
            &mut state,
            0.016,
            1.0,
            fear,
            &Stamina::new(),
            distance,
            &mut rng,
        )
    }

    #[test]
    fn test_warning_zero_beyond_range() {
        let fear = FearState::new();
        assert_eq!(frame(&fear, 10.0).warning_intensity, 0.0);
        assert_eq!(frame(&fear, 25.0).warning_intensity, 0.0);
        assert_eq!(frame(&fear, 25.0).breathing_volume, BASE_BREATHING_VOLUME);
    }

    #[test]
    fn test_warning_scales_linearly_inside_range() {
        let fear = FearState::new();
        let f = frame(&fear, 5.0);
        assert!((f.warning_intensity - 0.5).abs() < 0.001);
        // 0.4 + 5 * 0.06 = 0.7
        assert!((f.breathing_volume - 0.7).abs() < 0.001);
    }

    #[test]
    fn test_breathing_volume_caps_at_one() {
        let fear = FearState::new();
        let f = frame(&fear, 0.0);
        assert_eq!(f.breathing_volume, 1.0);
        assert!((f.warning_intensity - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_vignette_rests_at_base_above_threshold() {
        let fear = FearState::new();
        let f = frame(&fear, 20.0);
        assert!((f.vignette_alpha - BASE_VIGNETTE_ALPHA).abs() < 0.001);
    }

    #[test]
    fn test_vignette_darkens_with_low_sanity() {
        let mut fear = FearState::new();
        fear.sanity = 40.0;
        let mid = frame(&fear, 20.0).vignette_alpha;
        fear.sanity = 10.0;
        let low = frame(&fear, 20.0).vignette_alpha;
        assert!(low > mid);
        assert!(low <= 1.0);

        fear.sanity = 0.0;
        assert_eq!(frame(&fear, 20.0).vignette_alpha, (150.0 + 100.0) / 255.0);
    }

    #[test]
    fn test_heartbeat_pulse_gated_on_intensity() {
        let mut fear = FearState::new();
        fear.heartbeat_intensity = 0.2;
        assert_eq!(frame(&fear, 20.0).vignette_pulse, 0.0);
        fear.heartbeat_intensity = 0.9;
        // sin(8.0) is nonzero, so the pulse shows.
        assert!(frame(&fear, 20.0).vignette_pulse.abs() > 0.0);
    }

    #[test]
    fn test_hallucination_flash_fires_and_expires() {
        let mut fear = FearState::new();
        fear.sanity = 10.0;
        let mut state = FeedbackState::default();
        let mut rng = StdRng::seed_from_u64(2);

        let mut flashed = false;
        for _ in 0..2000 {
            let f = feedback_system(
                &mut state,
                0.016,
                0.0,
                &fear,
                &Stamina::new(),
                20.0,
                &mut rng,
            );
            if f.flash_alpha > 0.0 {
                flashed = true;
            }
        }
        assert!(flashed, "no hallucination flash in 2000 low-sanity ticks");

        // With sanity restored the timer runs out and stays out.
        fear.sanity = 100.0;
        for _ in 0..20 {
            feedback_system(
                &mut state,
                0.016,
                0.0,
                &fear,
                &Stamina::new(),
                20.0,
                &mut rng,
            );
        }
        let f = feedback_system(
            &mut state,
            0.016,
            0.0,
            &fear,
            &Stamina::new(),
            20.0,
            &mut rng,
        );
        assert_eq!(f.flash_alpha, 0.0);
    }

    #[test]
    fn test_bar_fractions_track_state() {
        let mut fear = FearState::new();
        fear.sanity = 25.0;
        let mut stamina = Stamina::new();
        stamina.value = 50.0;
        let mut state = FeedbackState::default();
        let mut rng = StdRng::seed_from_u64(1);
        let f = feedback_system(&mut state, 0.016, 0.0, &fear, &stamina, 20.0, &mut rng);
        assert!((f.sanity_fraction - 0.25).abs() < 0.001);
        assert!((f.stamina_fraction - 0.5).abs() < 0.001);
    }
}
