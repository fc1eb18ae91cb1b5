use core::ops::{Deref, DerefMut};

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::MutexGuard;

/// RAII guard granting exclusive access to the gated resource.
///
/// Holding the guard is holding the readiness token. Dropping it releases the
/// token on every exit path, including early returns through `?`.
pub struct GateGuard<'a, M: RawMutex, T> {
    inner: MutexGuard<'a, M, T>,
}

impl<'a, M: RawMutex, T> GateGuard<'a, M, T> {
    /// Wrap a held lock. Only called by `ReadinessGate`.
    pub(crate) fn new(inner: MutexGuard<'a, M, T>) -> Self {
        Self { inner }
    }

    /// Release the token explicitly.
    #[inline]
    pub fn release(self) {}
}

impl<M: RawMutex, T> Deref for GateGuard<'_, M, T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<M: RawMutex, T> DerefMut for GateGuard<'_, M, T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut T {
        &mut self.inner
    }
}
