pub use avr_device::atmega328p as mcu;
pub use avr_device::atmega328p::Peripherals;
pub use avr_device::interrupt::{self, Mutex};

use crate::mutex::IrqCtx;

macro_rules! define_isr {
    ($name:ident, $handler:path) => {
        #[avr_device::interrupt(atmega328p)]
        fn $name() {
            // SAFETY: We are inside of an interrupt handler.
            // Therefore, it is safe to construct an `IrqCtx`.
            let c = unsafe { IrqCtx::new() };
            $handler(&c);
        }
    };
}

define_isr!(TIMER1_COMPA, crate::system::irq_handler_timer1_compa);
define_isr!(TIMER0_COMPA, crate::system::irq_handler_timer0_compa);
define_isr!(ADC, crate::system::irq_handler_adc);
#[cfg(feature = "debug")]
define_isr!(USART_UDRE, crate::uart::irq_handler_usart_udre);

// vim: ts=4 sw=4 expandtab
