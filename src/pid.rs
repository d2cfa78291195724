/// Lower output saturation bound, in percent.
pub const OUT_MIN: f32 = 0.0;
/// Upper output saturation bound, in percent.
pub const OUT_MAX: f32 = 100.0;

#[derive(Clone)]
pub struct PidParams {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
}

/// Integrator limits, in error-seconds.
#[derive(Clone)]
pub struct PidIlim {
    pub neg: f32,
    pub pos: f32,
}

pub struct Pid {
    i: f32,
    prev_e: f32,
}

impl Pid {
    pub const fn new() -> Self {
        Self {
            i: 0.0,
            prev_e: 0.0,
        }
    }

    /// Run one controller step.
    ///
    /// `dt` is the time since the previous call, in seconds.
    /// The caller invokes this at a fixed rate.
    pub fn run(&mut self, params: &PidParams, ilim: &PidIlim, sp: f32, r: f32, dt: f32) -> f32 {
        // deviation
        let e = sp - r;

        // P term
        let p = params.kp * e;

        // I term
        let mut i = self.i + e * dt;
        i = i.min(ilim.pos);
        i = i.max(ilim.neg);
        self.i = i;

        // D term
        let de = (e - self.prev_e) / dt;
        self.prev_e = e;
        let d = params.kd * de;

        (p + params.ki * i + d).clamp(OUT_MIN, OUT_MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 0.002;

    const PARAMS: PidParams = PidParams {
        kp: 1.0,
        ki: 0.1,
        kd: 0.01,
    };

    const ILIM: PidIlim = PidIlim {
        neg: -1000.0,
        pos: 1000.0,
    };

    #[test]
    fn zero_error_zero_output() {
        let mut pid = Pid::new();
        let y = pid.run(&PARAMS, &ILIM, 50.0, 50.0, DT);
        assert!((y - 0.0).abs() < 0.001);
    }

    #[test]
    fn proportional_response() {
        let params = PidParams {
            kp: 2.0,
            ki: 0.0,
            kd: 0.0,
        };
        let mut pid = Pid::new();
        let y = pid.run(&params, &ILIM, 50.0, 40.0, DT);
        assert!((y - 20.0).abs() < 0.001);
    }

    #[test]
    fn integral_accumulates() {
        let params = PidParams {
            kp: 0.0,
            ki: 1.0,
            kd: 0.0,
        };
        let mut pid = Pid::new();
        let y1 = pid.run(&params, &ILIM, 50.0, 40.0, DT);
        let y2 = pid.run(&params, &ILIM, 50.0, 40.0, DT);
        assert!(y2 > y1, "integral should accumulate: {y2} > {y1}");
    }

    #[test]
    fn integral_is_limited() {
        let params = PidParams {
            kp: 0.0,
            ki: 1.0,
            kd: 0.0,
        };
        let ilim = PidIlim {
            neg: -0.5,
            pos: 0.5,
        };
        let mut pid = Pid::new();
        let mut y = 0.0;
        for _ in 0..100_000 {
            y = pid.run(&params, &ilim, 100.0, 0.0, DT);
        }
        // With i clamped to 0.5 the I contribution stays at ki * 0.5.
        assert!((y - 0.5).abs() < 0.001, "windup not limited: {y}");
    }

    #[test]
    fn derivative_responds_to_change() {
        let params = PidParams {
            kp: 0.0,
            ki: 0.0,
            kd: 0.01,
        };
        let mut pid = Pid::new();
        let y1 = pid.run(&params, &ILIM, 50.0, 0.0, DT);
        // Error shrinks: negative slope, output pulled towards the minimum.
        let y2 = pid.run(&params, &ILIM, 50.0, 40.0, DT);
        assert!(y2 < y1, "derivative should brake: {y2} < {y1}");
    }

    #[test]
    fn output_clamped_high() {
        let mut pid = Pid::new();
        let y = pid.run(&PARAMS, &ILIM, 100.0, 0.0, DT);
        assert!((y - OUT_MAX).abs() < f32::EPSILON);
    }

    #[test]
    fn output_clamped_low() {
        let mut pid = Pid::new();
        let y = pid.run(&PARAMS, &ILIM, 0.0, 100.0, DT);
        assert!((y - OUT_MIN).abs() < f32::EPSILON);
    }

    #[test]
    fn output_clamped_from_any_state() {
        let mut pid = Pid::new();
        // Drive the internal state around with adversarial inputs and
        // check the output bound after every single step.
        let inputs = [
            (100.0, 0.0),
            (0.0, 100.0),
            (100.0, 100.0),
            (0.0, 0.0),
            (73.0, 12.0),
            (12.0, 73.0),
        ];
        for _ in 0..10_000 {
            for (sp, r) in inputs {
                let y = pid.run(&PARAMS, &ILIM, sp, r, DT);
                assert!((OUT_MIN..=OUT_MAX).contains(&y), "output out of bounds: {y}");
                assert!(y.is_finite());
            }
        }
    }

    #[test]
    fn steady_state_holds_output() {
        let params = PidParams {
            kp: 1.0,
            ki: 0.1,
            kd: 0.0,
        };
        let mut pid = Pid::new();
        // Converged: measurement equals setpoint, integrator carries the load.
        for _ in 0..1000 {
            pid.run(&params, &ILIM, 50.0, 45.0, DT);
        }
        let y1 = pid.run(&params, &ILIM, 50.0, 50.0, DT);
        let y2 = pid.run(&params, &ILIM, 50.0, 50.0, DT);
        // With zero error only the I term remains and it no longer moves.
        assert!((y1 - y2).abs() < 0.001);
        assert!(y1 > 0.0);
    }
}

// vim: ts=4 sw=4 expandtab
