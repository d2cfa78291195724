/// PWM carrier period, in timer ticks.
/// With 0.5 us per tick this is 100 us, a 10 kHz carrier.
pub const PERIOD_TICKS: u16 = 200;

/// Shortest drivable phase, in timer ticks.
///
/// The carrier ISR cannot service a compare that fires again within
/// its own entry latency. Nonzero phases below this are widened;
/// full-off and full-on duty park the pin instead of toggling.
pub const MIN_PHASE_TICKS: u16 = 8;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PwmPhase {
    On,
    Off,
}

/// What the output stage has to do for the period slice that just began.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PwmDrive {
    /// Drive the pin to `high` and toggle after `ticks`.
    Phase { high: bool, ticks: u16 },
    /// Park the pin at a constant level for one full period.
    Hold { high: bool },
}

/// Toggle-based PWM generator state.
///
/// This only models the period split and the phase bookkeeping.
/// The output pin itself is toggled by the timer compare hardware.
pub struct Pwm {
    phase: PwmPhase,
    on_ticks: u16,
    off_ticks: u16,
}

impl Pwm {
    pub const fn new() -> Self {
        Self {
            phase: PwmPhase::On,
            on_ticks: PERIOD_TICKS / 2,
            off_ticks: PERIOD_TICKS / 2,
        }
    }

    /// Recompute the period split from a duty cycle percentage.
    ///
    /// The new split takes effect at the next phase boundary.
    pub fn set_duty(&mut self, percent: f32) {
        let percent = percent.clamp(0.0, 100.0);
        let on = (percent * PERIOD_TICKS as f32 / 100.0 + 0.5) as u16;
        let on = on.min(PERIOD_TICKS);
        // 0 and full scale park the pin. Anything in between keeps
        // both phases long enough for the ISR to re-arm in time.
        let on = if on > 0 && on < MIN_PHASE_TICKS {
            MIN_PHASE_TICKS
        } else if on > PERIOD_TICKS - MIN_PHASE_TICKS && on < PERIOD_TICKS {
            PERIOD_TICKS - MIN_PHASE_TICKS
        } else {
            on
        };
        self.on_ticks = on;
        self.off_ticks = PERIOD_TICKS - on;
    }

    /// Handle one carrier compare event.
    ///
    /// Flips the phase and returns the drive action for the period
    /// slice that just began. At the duty extremes the phase is
    /// pinned instead, so the pin rests at a constant level and
    /// toggling resumes cleanly once the duty leaves the extreme.
    pub fn advance(&mut self) -> PwmDrive {
        if self.on_ticks == 0 {
            self.phase = PwmPhase::Off;
            PwmDrive::Hold { high: false }
        } else if self.off_ticks == 0 {
            self.phase = PwmPhase::On;
            PwmDrive::Hold { high: true }
        } else {
            self.phase = match self.phase {
                PwmPhase::On => PwmPhase::Off,
                PwmPhase::Off => PwmPhase::On,
            };
            match self.phase {
                PwmPhase::On => PwmDrive::Phase {
                    high: true,
                    ticks: self.on_ticks,
                },
                PwmPhase::Off => PwmDrive::Phase {
                    high: false,
                    ticks: self.off_ticks,
                },
            }
        }
    }

    #[allow(dead_code)]
    pub fn phase(&self) -> PwmPhase {
        self.phase
    }

    #[allow(dead_code)]
    pub fn on_ticks(&self) -> u16 {
        self.on_ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_sums_to_period() {
        let mut pwm = Pwm::new();
        let mut p = 0.0;
        while p <= 100.0 {
            pwm.set_duty(p);
            assert_eq!(
                pwm.on_ticks + pwm.off_ticks,
                PERIOD_TICKS,
                "split broken at {p}"
            );
            p += 0.25;
        }
    }

    #[test]
    fn split_monotone_in_duty() {
        let mut pwm = Pwm::new();
        let mut prev_on = 0;
        let mut p = 0.0;
        while p <= 100.0 {
            pwm.set_duty(p);
            assert!(pwm.on_ticks >= prev_on, "on_ticks not monotone at {p}");
            prev_on = pwm.on_ticks;
            p += 0.25;
        }
    }

    #[test]
    fn duty_endpoints() {
        let mut pwm = Pwm::new();
        pwm.set_duty(0.0);
        assert_eq!(pwm.on_ticks, 0);
        assert_eq!(pwm.off_ticks, PERIOD_TICKS);
        pwm.set_duty(100.0);
        assert_eq!(pwm.on_ticks, PERIOD_TICKS);
        assert_eq!(pwm.off_ticks, 0);
        pwm.set_duty(50.0);
        assert_eq!(pwm.on_ticks, PERIOD_TICKS / 2);
    }

    #[test]
    fn out_of_range_duty_clamped() {
        let mut pwm = Pwm::new();
        pwm.set_duty(-10.0);
        assert_eq!(pwm.on_ticks, 0);
        pwm.set_duty(150.0);
        assert_eq!(pwm.on_ticks, PERIOD_TICKS);
    }

    #[test]
    fn phase_alternates() {
        let mut pwm = Pwm::new();
        pwm.set_duty(25.0);
        assert_eq!(pwm.phase(), PwmPhase::On);
        assert_eq!(
            pwm.advance(),
            PwmDrive::Phase {
                high: false,
                ticks: 150
            }
        );
        assert_eq!(pwm.phase(), PwmPhase::Off);
        assert_eq!(
            pwm.advance(),
            PwmDrive::Phase {
                high: true,
                ticks: 50
            }
        );
        assert_eq!(pwm.phase(), PwmPhase::On);
        assert_eq!(
            pwm.advance(),
            PwmDrive::Phase {
                high: false,
                ticks: 150
            }
        );
    }

    #[test]
    fn duty_reload_at_phase_boundary() {
        let mut pwm = Pwm::new();
        pwm.set_duty(50.0);
        pwm.advance(); // -> Off, 100
        // Mid-period duty update: only affects upcoming phases.
        pwm.set_duty(10.0);
        assert_eq!(
            pwm.advance(),
            PwmDrive::Phase {
                high: true,
                ticks: 20
            }
        );
        assert_eq!(
            pwm.advance(),
            PwmDrive::Phase {
                high: false,
                ticks: 180
            }
        );
    }

    #[test]
    fn zero_duty_parks_low() {
        let mut pwm = Pwm::new();
        pwm.set_duty(0.0);
        // Every carrier event keeps the pin held low. No 0 or
        // 1 tick sliver phase is ever emitted.
        for _ in 0..5 {
            assert_eq!(pwm.advance(), PwmDrive::Hold { high: false });
        }
    }

    #[test]
    fn full_duty_parks_high() {
        let mut pwm = Pwm::new();
        pwm.set_duty(100.0);
        for _ in 0..5 {
            assert_eq!(pwm.advance(), PwmDrive::Hold { high: true });
        }
    }

    #[test]
    fn phases_never_shorter_than_service_latency() {
        let mut pwm = Pwm::new();
        let mut p = 0.0;
        while p <= 100.0 {
            pwm.set_duty(p);
            for _ in 0..4 {
                if let PwmDrive::Phase { ticks, .. } = pwm.advance() {
                    assert!(
                        ticks >= MIN_PHASE_TICKS,
                        "unserviceable {ticks} tick phase at {p}"
                    );
                }
            }
            p += 0.125;
        }
    }

    #[test]
    fn resume_from_park_drives_on_phase() {
        let mut pwm = Pwm::new();
        pwm.set_duty(0.0);
        assert_eq!(pwm.advance(), PwmDrive::Hold { high: false });
        // Duty returns mid-range: the next event starts a regular
        // On phase, driving the pin up from the parked level.
        pwm.set_duty(50.0);
        assert_eq!(
            pwm.advance(),
            PwmDrive::Phase {
                high: true,
                ticks: 100
            }
        );
        assert_eq!(
            pwm.advance(),
            PwmDrive::Phase {
                high: false,
                ticks: 100
            }
        );
    }
}

// vim: ts=4 sw=4 expandtab
