use core::{
    cell::{Cell, UnsafeCell},
    marker::PhantomData,
    ops::{Deref, DerefMut},
    ptr::NonNull,
};

pub use crate::hw::Mutex;
pub use avr_device::interrupt::CriticalSection;

/// Optimization and reordering fence.
#[inline(always)]
pub fn fence() {
    core::sync::atomic::fence(core::sync::atomic::Ordering::SeqCst);
}

/// Interrupt context handle.
///
/// Holding one proves that the code runs inside an ISR.
/// All shared state accessors take the [CriticalSection] derived from it.
pub struct IrqCtx<'cs>(CriticalSection<'cs>);

impl<'cs> IrqCtx<'cs> {
    /// Create a new interrupt context.
    ///
    /// # SAFETY
    ///
    /// This may only be called from an interrupt service routine.
    #[inline(always)]
    pub unsafe fn new() -> Self {
        // SAFETY: ISRs run with the global interrupt flag cleared and
        //         none of our handlers re-enables it. Therefore no
        //         concurrent access can happen for the duration of
        //         this context.
        let cs = unsafe { CriticalSection::new() };
        fence();
        Self(cs)
    }

    /// Get the [CriticalSection] that belongs to this context.
    #[inline(always)]
    pub fn cs(&self) -> CriticalSection<'cs> {
        self.0
    }
}

impl Drop for IrqCtx<'_> {
    #[inline(always)]
    fn drop(&mut self) {
        fence();
    }
}

pub struct RefMut<'cs, T> {
    inner: NonNull<T>,
    _cs: PhantomData<&'cs mut T>,
}

impl<'cs, T> RefMut<'cs, T> {
    #[inline]
    fn new(inner: NonNull<T>) -> Self {
        Self {
            inner,
            _cs: PhantomData,
        }
    }
}

impl<T> Deref for RefMut<'_, T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &Self::Target {
        // SAFETY: The borrow guard ensures exclusive access.
        unsafe { self.inner.as_ref() }
    }
}

impl<T> DerefMut for RefMut<'_, T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        // SAFETY: The borrow guard ensures exclusive access.
        unsafe { self.inner.as_mut() }
    }
}

impl<T> Drop for RefMut<'_, T> {
    #[inline]
    fn drop(&mut self) {
        // SAFETY: Releasing the borrow acquired in `borrow_mut`.
        unsafe {
            global_refcnt_dec_mut();
        }
    }
}

static mut GLOBAL_REFCNT: i8 = 0;
const GLOBAL_REFCNT_WRITE: i8 = -1;

#[inline(never)]
unsafe fn global_refcnt_inc_mut() {
    // SAFETY: Plain read. Interrupts are disabled in all callers.
    let count = unsafe { GLOBAL_REFCNT };
    if count != 0 {
        // MutexRefCell (mut): Already borrowed.
        reset_system();
    }
    unsafe {
        GLOBAL_REFCNT = GLOBAL_REFCNT_WRITE;
    }
}

#[inline(always)]
unsafe fn global_refcnt_dec_mut() {
    unsafe {
        GLOBAL_REFCNT = 0;
    }
}

pub struct MutexRefCell<T> {
    inner: Mutex<UnsafeCell<T>>,
}

impl<T> MutexRefCell<T> {
    #[inline]
    pub const fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(UnsafeCell::new(value)),
        }
    }

    #[inline]
    pub fn borrow_mut<'cs>(&'cs self, cs: CriticalSection<'cs>) -> RefMut<'cs, T> {
        // SAFETY: The global refcount resets the system on a nested
        //         mutable borrow. Within one borrow the access is
        //         exclusive, protected by the CriticalSection.
        unsafe {
            global_refcnt_inc_mut();
            RefMut::new(NonNull::new_unchecked(self.inner.borrow(cs).get()))
        }
    }
}

pub struct MutexCell<T> {
    inner: Mutex<Cell<T>>,
}

impl<T> MutexCell<T> {
    #[inline]
    pub const fn new(inner: T) -> Self {
        Self {
            inner: Mutex::new(Cell::new(inner)),
        }
    }

    #[inline]
    pub fn replace(&self, cs: CriticalSection<'_>, inner: T) -> T {
        self.inner.borrow(cs).replace(inner)
    }

    #[inline]
    pub fn as_ref<'cs>(&self, cs: CriticalSection<'cs>) -> &'cs T {
        // SAFETY: The CriticalSection proves exclusive access and
        //         bounds the lifetime of the returned reference.
        unsafe { &*self.inner.borrow(cs).as_ptr() as _ }
    }
}

impl<T> MutexCell<Option<T>> {
    #[inline]
    pub fn as_ref_unwrap<'cs>(&self, cs: CriticalSection<'cs>) -> &'cs T {
        unwrap_option(self.as_ref(cs).as_ref())
    }
}

impl<T: Copy> MutexCell<T> {
    #[inline]
    pub fn get(&self, cs: CriticalSection<'_>) -> T {
        self.inner.borrow(cs).get()
    }

    #[inline]
    pub fn set(&self, cs: CriticalSection<'_>, inner: T) {
        self.inner.borrow(cs).set(inner);
    }
}

/// Cheaper Option::unwrap() alternative.
///
/// This is cheaper, because it doesn't call into the panic unwind path.
/// Therefore, it does not impose caller-saves overhead onto the calling function.
#[inline(always)]
pub fn unwrap_option<T>(value: Option<T>) -> T {
    match value {
        Some(value) => value,
        None => reset_system(),
    }
}

/// Reset the system.
#[inline(always)]
#[allow(clippy::empty_loop)]
pub fn reset_system() -> ! {
    loop {
        // Wait for the watchdog timer to trigger and reset the system.
        // We don't need to disable interrupts here.
        // No interrupt will reset the watchdog timer.
    }
}

#[inline(always)]
#[panic_handler]
fn panic(_: &core::panic::PanicInfo) -> ! {
    reset_system();
}

// vim: ts=4 sw=4 expandtab
