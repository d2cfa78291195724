use crate::{
    debug,
    hw::mcu,
    mutex::{CriticalSection, IrqCtx, MutexCell},
};

const FCPU: u32 = 16_000_000;
const BAUD: u32 = 19_200;
const UBRR: u16 = (FCPU / (16 * BAUD) - 1) as u16;

#[allow(non_snake_case)]
pub struct UartPeriph {
    pub USART0: mcu::USART0,
}

pub static UART_PERIPH: MutexCell<Option<UartPeriph>> = MutexCell::new(None);

#[rustfmt::skip]
pub fn uart_init(cs: CriticalSection<'_>, up: UartPeriph) {
    // 19200 baud, 8N1, transmit only.
    // The data-register-empty interrupt paces the debug value stream.
    up.USART0.ubrr0().write(|w| w.set(UBRR));
    up.USART0.ucsr0c().write(|w| w.ucsz0().chr8());
    up.USART0.ucsr0b().write(|w| {
        w.txen0().set_bit()
         .udrie0().set_bit()
    });
    UART_PERIPH.replace(cs, Some(up));
}

/// USART data register empty interrupt.
pub fn irq_handler_usart_udre(c: &IrqCtx) {
    let cs = c.cs();
    let data = debug::next_tx_byte(cs);
    UART_PERIPH
        .as_ref_unwrap(cs)
        .USART0
        .udr0()
        .write(|w| w.set(data));
}

// vim: ts=4 sw=4 expandtab
