#![cfg_attr(target_arch = "avr", no_std)]
#![cfg_attr(target_arch = "avr", no_main)]
#![cfg_attr(target_arch = "avr", feature(abi_avr_interrupt))]
#![cfg_attr(target_arch = "avr", feature(asm_experimental_arch))]

// Pure control logic. Builds for the host, too, to run the test suites there.
mod pid;
mod pwm;
mod setpoint;
mod speedo;
mod state;

// Hardware glue.
#[cfg(target_arch = "avr")]
mod analog;
#[cfg(all(target_arch = "avr", feature = "debug"))]
mod debug;
#[cfg(target_arch = "avr")]
mod hw;
#[cfg(target_arch = "avr")]
mod mutex;
#[cfg(target_arch = "avr")]
mod ports;
#[cfg(target_arch = "avr")]
mod system;
#[cfg(target_arch = "avr")]
mod timer;
#[cfg(all(target_arch = "avr", feature = "debug"))]
mod uart;

#[cfg(target_arch = "avr")]
use crate::{
    analog::{AdcPeriph, adc_init},
    hw::{Peripherals, interrupt},
    mutex::{CriticalSection, unwrap_option},
    ports::{PortPeriph, ports_init},
    system::SYSTEM,
    timer::{TimerPeriph, timer_init},
};

#[cfg(target_arch = "avr")]
fn wdt_init() {
    // SAFETY: The asm code only accesses the WDT registers
    //         which are not accessed from anywhere else in the program.
    unsafe {
        // Enable WDT with timeout 32 ms
        core::arch::asm!(
            "wdr",
            "ldi {tmp}, 0x18", // WDCE=1, WDE=1
            "sts {WDTCSR}, {tmp}",
            "ldi {tmp}, 0x09", // WDE=1, WDP2=0, WDP1=0, WDP0=1
            "sts {WDTCSR}, {tmp}",
            tmp = out(reg_upper) _,
            WDTCSR = const 0x60,
            options(nostack, preserves_flags)
        );
    }
}

#[cfg(target_arch = "avr")]
fn wdt_poke() {
    avr_device::asm::wdr();
}

#[cfg(target_arch = "avr")]
#[avr_device::entry]
fn main() -> ! {
    wdt_init();

    let dp = unwrap_option(Peripherals::take());

    // SAFETY: Interrupts are still disabled after reset.
    //         This cs covers the whole hardware init phase.
    let cs = unsafe { CriticalSection::new() };

    ports_init(
        cs,
        PortPeriph {
            PORTB: dp.PORTB,
            PORTC: dp.PORTC,
            PORTD: dp.PORTD,
        },
    );
    timer_init(
        cs,
        TimerPeriph {
            TC0: dp.TC0,
            TC1: dp.TC1,
        },
    );
    adc_init(cs, AdcPeriph { ADC: dp.ADC });
    #[cfg(feature = "debug")]
    crate::uart::uart_init(cs, crate::uart::UartPeriph { USART0: dp.USART0 });

    SYSTEM.init(cs);

    // Idle sleep between interrupts.
    dp.CPU.smcr().write(|w| w.se().set_bit());

    // SAFETY: All static peripheral cells have been initialized.
    unsafe { interrupt::enable() };

    // All work happens in the ISRs.
    loop {
        avr_device::asm::sleep();
        wdt_poke();
    }
}

#[cfg(not(target_arch = "avr"))]
fn main() {}

// vim: ts=4 sw=4 expandtab
