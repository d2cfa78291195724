use crate::{
    hw::mcu,
    mutex::{CriticalSection, MutexCell},
    pwm::{self, PwmDrive},
};

#[allow(non_snake_case)]
pub struct TimerPeriph {
    pub TC0: mcu::TC0,
    pub TC1: mcu::TC1,
}

pub static TIMER_PERIPH: MutexCell<Option<TimerPeriph>> = MutexCell::new(None);

/// Control tick period: 2 ms, in TC0 ticks (16 us each).
const CONTROL_PERIOD_TICKS: u8 = 125;

/// Acquisition period: 20 ms, in TC1 ticks (0.5 us each).
pub const ACQ_PERIOD_TICKS: u16 = 40_000;

/// Minimum lead time for a carrier compare re-arm, in TC1 ticks.
///
/// A compare point closer than this may already have slipped past
/// the counter by the time the ISR returns. A missed match would
/// only fire again after a full 16 bit counter wrap (32.8 ms), so
/// such a point is re-armed relative to the counter instead.
const MIN_LEAD_TICKS: u16 = 8;

/// Put OC1A at a fixed level, now.
///
/// Leaves COM1A in the corresponding constant-level mode.
fn force_pin_level(tp: &TimerPeriph, high: bool) {
    if high {
        tp.TC1.tccr1a().write(|w| w.com1a().match_set());
    } else {
        tp.TC1.tccr1a().write(|w| w.com1a().match_clear());
    }
    // The forced compare match applies the level but raises no interrupt.
    tp.TC1.tccr1c().write(|w| w.foc1a().set_bit());
}

#[rustfmt::skip]
pub fn timer_init(cs: CriticalSection<'_>, tp: TimerPeriph) {
    // Timer 1 configuration:
    // Free running, CS: 8 -> 0.5 us per timer tick.
    // OC1A toggles the PWM output pin on every compare match.
    // OCR1B compare paces the acquisition cycle and hardware
    // triggers the ADC. Only OCIE1A raises an interrupt directly;
    // the acquisition work runs in the ADC conversion-complete ISR.
    tp.TC1.tcnt1().write(|w| w.set(0));
    // The software phase bookkeeping starts in the On phase.
    force_pin_level(&tp, true);
    tp.TC1.tccr1a().write(|w| w.com1a().match_toggle());
    tp.TC1.ocr1a().write(|w| w.set(pwm::PERIOD_TICKS / 2));
    tp.TC1.ocr1b().write(|w| w.set(ACQ_PERIOD_TICKS));
    tp.TC1.tifr1().write(|w| {
        w.ocf1a().set_bit()
         .ocf1b().set_bit()
    });
    tp.TC1.timsk1().write(|w| w.ocie1a().set_bit());
    tp.TC1.tccr1b().write(|w| w.cs1().prescale_8());

    // Timer 0 configuration:
    // CTC at 2 ms, CS: 256 -> 16 us per timer tick.
    tp.TC0.tcnt0().write(|w| w.set(0));
    tp.TC0.ocr0a().write(|w| w.set(CONTROL_PERIOD_TICKS - 1));
    tp.TC0.tccr0a().write(|w| w.wgm0().ctc());
    tp.TC0.tifr0().write(|w| w.ocf0a().set_bit());
    tp.TC0.timsk0().write(|w| w.ocie0a().set_bit());
    tp.TC0.tccr0b().write(|w| w.cs0().prescale_256());

    TIMER_PERIPH.replace(cs, Some(tp));
}

/// Apply one carrier drive action to the OC1A output stage.
pub fn apply_pwm_drive(cs: CriticalSection<'_>, drive: PwmDrive) {
    let tp = TIMER_PERIPH.as_ref_unwrap(cs);
    match drive {
        PwmDrive::Hold { high } => {
            // Park the pin. The compare keeps firing once per
            // period, so toggling resumes seamlessly when the duty
            // leaves the extreme.
            force_pin_level(tp, high);
            let now = tp.TC1.tcnt1().read().bits();
            tp.TC1
                .ocr1a()
                .write(|w| w.set(now.wrapping_add(pwm::PERIOD_TICKS)));
        }
        PwmDrive::Phase { high, ticks } => {
            // Force the level of the phase that just began. After an
            // on-time service this is a no-op. After a late service
            // it resynchronizes the pin with the phase bookkeeping.
            force_pin_level(tp, high);
            tp.TC1.tccr1a().write(|w| w.com1a().match_toggle());

            // Keep the carrier cadence: the next toggle is scheduled
            // relative to the previous compare point, not relative
            // to ISR entry.
            let target = tp.TC1.ocr1a().read().bits().wrapping_add(ticks);
            let now = tp.TC1.tcnt1().read().bits();
            // Served late: the cadence point is unreachable.
            // Re-arm from the counter, stretching this one phase.
            let target = if (target.wrapping_sub(now) as i16) < MIN_LEAD_TICKS as i16 {
                now.wrapping_add(ticks.max(MIN_LEAD_TICKS))
            } else {
                target
            };
            tp.TC1.ocr1a().write(|w| w.set(target));
        }
    }
}

/// Re-arm the acquisition compare for the next 20 ms cycle.
pub fn rearm_acq_compare(cs: CriticalSection<'_>) {
    let tp = TIMER_PERIPH.as_ref_unwrap(cs);
    tp.TC1
        .ocr1b()
        .modify(|r, w| w.set(r.bits().wrapping_add(ACQ_PERIOD_TICKS)));
    // Clear the compare flag. The ADC trigger fires on its edge.
    tp.TC1.tifr1().write(|w| w.ocf1b().set_bit());
}

// vim: ts=4 sw=4 expandtab
