/// Full scale value of the 10 bit setpoint ADC.
pub const ADC_FULL_SCALE: u16 = 0x3FF;

/// Map a raw ADC reading linearly to a speed percentage.
///
/// 0 maps to 0 % and full scale maps to exactly 100 %.
pub fn setpoint_from_adc(raw: u16) -> u8 {
    let raw = raw.min(ADC_FULL_SCALE);
    ((raw as u32 * 100) / ADC_FULL_SCALE as u32) as u8
}


// vim: ts=4 sw=4 expandtab
