/// Output attenuation factor while the system is in [SysState::Overload].
pub const OVERLOAD_ATTEN: f32 = 0.8;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum SysState {
    /// No speed requested. The motor rests.
    Idle,
    /// Up and running.
    Normal,
    /// Speed requested while the overload input is active.
    Overload,
}

impl SysState {
    /// Supervisory transition function.
    ///
    /// The state is a pure function of the current inputs.
    /// A zero setpoint always wins over an active overload input.
    pub fn from_inputs(desired_pct: u8, overload: bool) -> Self {
        if desired_pct == 0 {
            SysState::Idle
        } else if overload {
            SysState::Overload
        } else {
            SysState::Normal
        }
    }

    /// Apply the supervisory output policy to a controller output percentage.
    pub fn apply_policy(&self, y: f32) -> f32 {
        match self {
            SysState::Overload => y * OVERLOAD_ATTEN,
            SysState::Idle | SysState::Normal => y,
        }
    }

    /// Index of the indicator LED owned by this state.
    pub const fn indicator(&self) -> u8 {
        match self {
            SysState::Idle => 0,
            SysState::Normal => 1,
            SysState::Overload => 2,
        }
    }
}


// vim: ts=4 sw=4 expandtab
