use rand::{Rng as _, SeedableRng as _, rngs::SmallRng};

/// Largest simulated disturbance magnitude, in percent of full speed.
const NOISE_LIMIT: i8 = 5;

/// Speed feedback source.
///
/// Implementations are synchronous, non-blocking and infallible.
/// A real tachometer driver implements this in place of [SimSpeedo]
/// without touching the controller.
pub trait SpeedSense {
    /// Produce a speed reading, scaled to percent of full speed.
    ///
    /// `last_output` is the most recent raw controller output.
    fn measure(&mut self, last_output: f32) -> f32;
}

/// Simulated speedometer.
///
/// Models a motor that follows the control output within one control
/// period, disturbed by bounded uniform noise.
pub struct SimSpeedo {
    rng: Option<SmallRng>,
}

impl SimSpeedo {
    pub const fn new() -> Self {
        Self { rng: None }
    }
}

impl SpeedSense for SimSpeedo {
    fn measure(&mut self, last_output: f32) -> f32 {
        let rng = self
            .rng
            .get_or_insert_with(|| SmallRng::seed_from_u64(0x6D6F_7463));
        let noise = rng.random_range(-NOISE_LIMIT..=NOISE_LIMIT);
        (last_output + noise as f32).clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noise_is_bounded() {
        let mut speedo = SimSpeedo::new();
        for _ in 0..10_000 {
            let r = speedo.measure(50.0);
            assert!((r - 50.0).abs() <= NOISE_LIMIT as f32, "noise bound: {r}");
        }
    }

    #[test]
    fn clamped_at_range_ends() {
        let mut speedo = SimSpeedo::new();
        for _ in 0..10_000 {
            let lo = speedo.measure(0.0);
            assert!((0.0..=NOISE_LIMIT as f32).contains(&lo));
            let hi = speedo.measure(100.0);
            assert!((100.0 - NOISE_LIMIT as f32..=100.0).contains(&hi));
        }
    }

    #[test]
    fn seeded_sequence_is_deterministic() {
        let mut a = SimSpeedo::new();
        let mut b = SimSpeedo::new();
        for _ in 0..100 {
            assert_eq!(a.measure(50.0), b.measure(50.0));
        }
    }

    #[test]
    fn noise_actually_varies() {
        let mut speedo = SimSpeedo::new();
        let first = speedo.measure(50.0);
        let varies = (0..100).any(|_| speedo.measure(50.0) != first);
        assert!(varies, "disturbance stuck at {first}");
    }
}

// vim: ts=4 sw=4 expandtab
