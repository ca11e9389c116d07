//! Flicker system - per-fixture malfunctions and the house-wide blackout.
//!
//! Fixtures keep flickering even after the session ends; only the
//! blackout beat is gated on active play by the engine.

use rand::Rng;

use crate::components::{LightState, DIM_INTENSITY};

/// Probability per tick of the scripted scare beat that kills every
/// fixture at once.
const BLACKOUT_CHANCE: f32 = 0.001;

/// Blackout darkness duration band.
const BLACKOUT_DURATION_MIN: f32 = 0.5;
const BLACKOUT_DURATION_MAX: f32 = 2.0;

/// Per-fixture malfunction darkness duration band.
const MALFUNCTION_DURATION_MIN: f32 = 0.1;
const MALFUNCTION_DURATION_MAX: f32 = 2.0;

/// What the renderer needs to draw one fixture this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightFrame {
    pub is_on: bool,
    pub intensity: f32,
}

/// Advance every fixture by one tick. Higher ambient fear makes
/// malfunctions more likely.
pub fn flicker_system(
    lights: &mut [LightState],
    dt: f32,
    ambient_fear: f32,
    rng: &mut impl Rng,
) {
    for light in lights.iter_mut() {
        light.flicker_phase += dt;

        // Malfunction roll only while lit.
        if light.is_on
            && rng.gen::<f32>() < light.malfunction_chance * (1.0 + ambient_fear * 0.5)
        {
            light.force_off(rng.gen_range(MALFUNCTION_DURATION_MIN..MALFUNCTION_DURATION_MAX));
        }

        if !light.is_on {
            light.off_duration -= dt;
            if light.off_duration <= 0.0 {
                light.is_on = true;
            }
        }
    }
}

/// Roll the house-wide blackout beat; on a hit, every fixture goes dark
/// for the same random duration. Independent of per-fixture malfunctions.
pub fn blackout_system(lights: &mut [LightState], rng: &mut impl Rng) -> bool {
    if rng.gen::<f32>() >= BLACKOUT_CHANCE {
        return false;
    }
    let duration = rng.gen_range(BLACKOUT_DURATION_MIN..BLACKOUT_DURATION_MAX);
    for light in lights.iter_mut() {
        light.force_off(duration);
    }
    true
}

/// Rendered intensity of one fixture: sine flicker plus noise while lit,
/// a fixed dim glow while dark.
pub fn rendered_intensity(light: &LightState, rng: &mut impl Rng) -> f32 {
    if light.is_on {
        let flicker = (light.flicker_phase * 20.0).sin() * 0.3 + rng.gen_range(-0.1..0.1);
        (light.base_intensity + flicker).max(0.2)
    } else {
        DIM_INTENSITY
    }
}

/// Build the per-fixture render snapshot for this frame.
pub fn light_frames(lights: &[LightState], rng: &mut impl Rng) -> Vec<LightFrame> {
    lights
        .iter()
        .map(|light| LightFrame {
            is_on: light.is_on,
            intensity: rendered_intensity(light, rng),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn lights(n: usize, rng: &mut StdRng) -> Vec<LightState> {
        (0..n).map(|_| LightState::spawn(0.8, rng)).collect()
    }

    #[test]
    fn test_dark_fixture_recovers_when_countdown_expires() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut fixtures = lights(1, &mut rng);
        fixtures[0].force_off(0.5);

        flicker_system(&mut fixtures, 0.3, 0.0, &mut rng);
        assert!(!fixtures[0].is_on);
        flicker_system(&mut fixtures, 0.3, 0.0, &mut rng);
        assert!(fixtures[0].is_on);
    }

    #[test]
    fn test_malfunctions_occur_over_time() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut fixtures = lights(8, &mut rng);
        let mut saw_dark = false;
        // 2% per fixture per tick: 500 ticks over 8 fixtures will hit.
        for _ in 0..500 {
            flicker_system(&mut fixtures, 0.016, 0.0, &mut rng);
            saw_dark |= fixtures.iter().any(|l| !l.is_on);
        }
        assert!(saw_dark);
    }

    #[test]
    fn test_ambient_fear_raises_malfunction_rate() {
        let count_outages = |fear: f32, seed: u64| {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut fixtures = lights(8, &mut rng);
            let mut outages = 0u32;
            for _ in 0..2000 {
                let lit_before = fixtures.iter().filter(|l| l.is_on).count();
                flicker_system(&mut fixtures, 0.016, fear, &mut rng);
                let lit_after = fixtures.iter().filter(|l| l.is_on).count();
                outages += lit_before.saturating_sub(lit_after) as u32;
            }
            outages
        };
        // Averaged over seeds to keep the comparison stable.
        let calm: u32 = (0..5).map(|s| count_outages(0.0, s)).sum();
        let scared: u32 = (0..5).map(|s| count_outages(1.0, s)).sum();
        assert!(scared > calm, "calm={calm} scared={scared}");
    }

    #[test]
    fn test_blackout_forces_every_fixture_off() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut fixtures = lights(8, &mut rng);
        // Drive the roll until it hits; p=0.001 per call.
        let mut fired = false;
        for _ in 0..20_000 {
            if blackout_system(&mut fixtures, &mut rng) {
                fired = true;
                break;
            }
        }
        assert!(fired, "blackout never fired in 20k rolls");
        assert!(fixtures.iter().all(|l| !l.is_on));
        let d = fixtures[0].off_duration;
        assert!((BLACKOUT_DURATION_MIN..BLACKOUT_DURATION_MAX).contains(&d));
        assert!(fixtures.iter().all(|l| l.off_duration == d));
    }

    #[test]
    fn test_rendered_intensity_floor_and_dim() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut light = LightState::spawn(0.8, &mut rng);
        for _ in 0..200 {
            light.flicker_phase += 0.016;
            let v = rendered_intensity(&light, &mut rng);
            assert!(v >= 0.2, "lit intensity {v} below floor");
        }
        light.force_off(1.0);
        assert_eq!(rendered_intensity(&light, &mut rng), DIM_INTENSITY);
    }

    #[test]
    fn test_light_frames_match_fixtures() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut fixtures = lights(3, &mut rng);
        fixtures[1].force_off(1.0);
        let frames = light_frames(&fixtures, &mut rng);
        assert_eq!(frames.len(), 3);
        assert!(frames[0].is_on);
        assert!(!frames[1].is_on);
        assert_eq!(frames[1].intensity, DIM_INTENSITY);
    }
}
