use crate::{
    hw::mcu,
    mutex::{CriticalSection, MutexCell},
};

#[allow(non_snake_case)]
pub struct AdcPeriph {
    pub ADC: mcu::ADC,
}

pub static ADC_PERIPH: MutexCell<Option<AdcPeriph>> = MutexCell::new(None);

#[rustfmt::skip]
pub fn adc_init(cs: CriticalSection<'_>, ap: AdcPeriph) {
    // Setpoint potentiometer on ADC0 (PC0), AVcc reference.
    // The channel never changes, so the mux is set up once.
    ap.ADC.admux().write(|w| {
        w.refs().avcc()
         .mux().adc0()
    });
    // Conversions are hardware triggered by the TC1 OCR1B compare match.
    ap.ADC.adcsrb().write(|w| w.adts().tc1_cmb());
    ap.ADC.didr0().write(|w| w.adc0d().set_bit());
    ap.ADC.adcsra().write(|w| {
        w.adps().prescaler_128()
         .adate().set_bit()
         .adie().set_bit()
         .adif().set_bit()
         .aden().set_bit()
    });
    ADC_PERIPH.replace(cs, Some(ap));
}

/// Read the result of the completed conversion.
#[inline]
pub fn adc_read(cs: CriticalSection<'_>) -> u16 {
    ADC_PERIPH.as_ref_unwrap(cs).ADC.adc().read().bits()
}

// vim: ts=4 sw=4 expandtab
