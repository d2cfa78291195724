use crate::{
    analog, ports,
    mutex::{CriticalSection, IrqCtx, MutexCell, MutexRefCell},
    pid::{Pid, PidIlim, PidParams},
    pwm::Pwm,
    setpoint,
    speedo::{SimSpeedo, SpeedSense as _},
    state::SysState,
    timer,
};

#[cfg(feature = "debug")]
use crate::debug::Debug;

/// Control tick period, in seconds.
const CONTROL_DT: f32 = 0.002;

/// Speed controller gains. Tuned against the simulated load.
const PID_PARAMS: PidParams = PidParams {
    kp: 1.0,
    ki: 0.1,
    kd: 0.01,
};

/// Integrator bounds: enough authority to hold full output (100 / ki).
const PID_ILIM: PidIlim = PidIlim {
    neg: -1000.0,
    pos: 1000.0,
};

pub struct System {
    state: MutexCell<SysState>,
    desired: MutexCell<u8>,
    last_y: MutexCell<f32>,
    pid: MutexRefCell<Pid>,
    speedo: MutexRefCell<SimSpeedo>,
    pwm: MutexRefCell<Pwm>,
}

pub static SYSTEM: System = System::new();

impl System {
    pub const fn new() -> Self {
        Self {
            state: MutexCell::new(SysState::Idle),
            desired: MutexCell::new(0),
            last_y: MutexCell::new(0.0),
            pid: MutexRefCell::new(Pid::new()),
            speedo: MutexRefCell::new(SimSpeedo::new()),
            pwm: MutexRefCell::new(Pwm::new()),
        }
    }

    pub fn init(&self, cs: CriticalSection<'_>) {
        ports::set_indicators(cs, self.state.get(cs));
    }
}

/// PWM carrier compare match.
///
/// Advance the phase bookkeeping and program the output stage with
/// the drive action of the period slice that just began.
pub fn irq_handler_timer1_compa(c: &IrqCtx) {
    let cs = c.cs();
    let drive = SYSTEM.pwm.borrow_mut(cs).advance();
    timer::apply_pwm_drive(cs, drive);
}

/// Control tick: run the speed controller.
pub fn irq_handler_timer0_compa(c: &IrqCtx) {
    let cs = c.cs();

    let sp = SYSTEM.desired.get(cs) as f32;
    let r = SYSTEM.speedo.borrow_mut(cs).measure(SYSTEM.last_y.get(cs));

    let y = SYSTEM
        .pid
        .borrow_mut(cs)
        .run(&PID_PARAMS, &PID_ILIM, sp, r, CONTROL_DT);
    SYSTEM.last_y.set(cs, y);

    // The supervisory policy applies after the raw controller output
    // has been stored: the attenuation must not feed back into the
    // speed measurement or the next PID step.
    let y_applied = SYSTEM.state.get(cs).apply_policy(y);
    SYSTEM.pwm.borrow_mut(cs).set_duty(y_applied);

    #[cfg(feature = "debug")]
    {
        Debug::Measured.log_pct(cs, r);
        Debug::PidY.log_pct(cs, y);
        Debug::AppliedY.log_pct(cs, y_applied);
    }
}

/// Acquisition cycle complete: new setpoint sample is ready.
pub fn irq_handler_adc(c: &IrqCtx) {
    let cs = c.cs();

    let desired = setpoint::setpoint_from_adc(analog::adc_read(cs));
    let overload = ports::read_overload(cs);
    SYSTEM.desired.set(cs, desired);

    let state = SysState::from_inputs(desired, overload);
    SYSTEM.state.set(cs, state);
    ports::set_indicators(cs, state);

    timer::rearm_acq_compare(cs);

    #[cfg(feature = "debug")]
    {
        Debug::Setpoint.log_pct(cs, desired as f32);
        Debug::State.log_u8(cs, state as u8);
    }
}

// vim: ts=4 sw=4 expandtab
