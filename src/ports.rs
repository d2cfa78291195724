#![allow(unused_unsafe)]

use crate::{
    hw::mcu,
    mutex::{CriticalSection, MutexCell},
    state::SysState,
};

#[allow(non_snake_case)]
pub struct PortPeriph {
    pub PORTB: mcu::PORTB,
    pub PORTC: mcu::PORTC,
    pub PORTD: mcu::PORTD,
}

pub static PORT_PERIPH: MutexCell<Option<PortPeriph>> = MutexCell::new(None);

fn pin_input(_bit: usize) -> u8 {
    0
}
fn pin_output(bit: usize) -> u8 {
    1 << bit
}
fn pin_low(_bit: usize) -> u8 {
    0
}
fn pin_floating(_bit: usize) -> u8 {
    0
}

pub fn ports_init(cs: CriticalSection<'_>, pp: PortPeriph) {
    // SAFETY: Called with interrupts disabled during system init.
    unsafe {
        pp.PORTB.portb().write(|w| {
            w.bits(
                pin_low(0) | // DNC
                pin_low(1) | // OC1A: PWM output
                pin_low(2) | // ISP !SS
                pin_low(3) | // ISP MOSI
                pin_low(4) | // ISP MISO
                pin_low(5) | // ISP SCK
                pin_floating(6) | // XTAL1
                pin_floating(7), // XTAL2
            )
        });
        pp.PORTB.ddrb().write(|w| {
            w.bits(
                pin_output(0) | // DNC
                pin_output(1) | // OC1A: PWM output
                pin_input(2) | // ISP !SS
                pin_input(3) | // ISP MOSI
                pin_input(4) | // ISP MISO
                pin_input(5) | // ISP SCK
                pin_input(6) | // XTAL1
                pin_input(7), // XTAL2
            )
        });

        pp.PORTC.portc().write(|w| {
            w.bits(
                pin_floating(0) | // setpoint, single ended ADC
                pin_low(1) | // DNC
                pin_low(2) | // DNC
                pin_low(3) | // DNC
                pin_low(4) | // DNC
                pin_low(5) | // DNC
                pin_floating(6), // RESET
            )
        });
        pp.PORTC.ddrc().write(|w| {
            w.bits(
                pin_input(0) | // setpoint, single ended ADC
                pin_output(1) | // DNC
                pin_output(2) | // DNC
                pin_output(3) | // DNC
                pin_output(4) | // DNC
                pin_output(5) | // DNC
                pin_input(6), // RESET
            )
        });

        pp.PORTD.portd().write(|w| {
            w.bits(
                pin_floating(0) | // UART RXD
                pin_low(1) | // UART TXD
                pin_floating(2) | // overload sense, external driver
                pin_low(3) | // DNC
                pin_low(4) | // DNC
                pin_low(5) | // LED: idle
                pin_low(6) | // LED: normal
                pin_low(7), // LED: overload
            )
        });
        pp.PORTD.ddrd().write(|w| {
            w.bits(
                pin_input(0) | // UART RXD
                pin_output(1) | // UART TXD
                pin_input(2) | // overload sense, external driver
                pin_output(3) | // DNC
                pin_output(4) | // DNC
                pin_output(5) | // LED: idle
                pin_output(6) | // LED: normal
                pin_output(7), // LED: overload
            )
        });
    }

    PORT_PERIPH.replace(cs, Some(pp));
}

/// Sample the overload sense input.
#[inline]
pub fn read_overload(cs: CriticalSection<'_>) -> bool {
    PORT_PERIPH
        .as_ref_unwrap(cs)
        .PORTD
        .pind()
        .read()
        .pd2()
        .bit_is_set()
}

/// Drive the indicator LEDs to reflect the system state.
///
/// One LED per state. The write is idempotent, the LEDs are
/// simply refreshed on every acquisition cycle.
#[rustfmt::skip]
pub fn set_indicators(cs: CriticalSection<'_>, state: SysState) {
    let led = state.indicator();
    PORT_PERIPH
        .as_ref_unwrap(cs)
        .PORTD
        .portd()
        .modify(|_, w| {
            w.pd5().bit(led == 0)
             .pd6().bit(led == 1)
             .pd7().bit(led == 2)
        });
}

// vim: ts=4 sw=4 expandtab
