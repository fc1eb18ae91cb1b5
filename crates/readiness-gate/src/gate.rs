use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use embedded_hal_async::delay::DelayNs;
use portable_atomic::{AtomicBool, Ordering};

use crate::error::GateError;
use crate::guard::GateGuard;

/// Bounds of the coarse polling phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollBudget {
    /// Sleep between two readiness checks, in milliseconds.
    pub step_ms: u32,
    /// Total time the coarse phase may spend sleeping, in milliseconds.
    pub budget_ms: u32,
}

impl PollBudget {
    pub const fn new(step_ms: u32, budget_ms: u32) -> Self {
        Self { step_ms, budget_ms }
    }
}

impl Default for PollBudget {
    fn default() -> Self {
        Self::new(10, 250)
    }
}

/// Two-phase exclusive-access gate.
///
/// The gate owns the resource and lends it out through [`GateGuard`]. It is
/// created closed; [`acquire`](Self::acquire) refuses to hand out the
/// resource until [`open`](Self::open) has been called, while
/// [`acquire_unchecked`](Self::acquire_unchecked) is available to bring-up
/// code that runs before that.
pub struct ReadinessGate<M: RawMutex, T> {
    resource: Mutex<M, T>,
    open: AtomicBool,
}

impl<M: RawMutex, T> ReadinessGate<M, T> {
    /// Create a closed gate around `resource`.
    pub const fn new(resource: T) -> Self {
        Self { resource: Mutex::new(resource), open: AtomicBool::new(false) }
    }

    /// Admit ordinary callers.
    pub fn open(&self) {
        self.open.store(true, Ordering::Release);
    }

    /// Stop admitting ordinary callers. A guard already handed out stays
    /// valid until dropped.
    pub fn close(&self) {
        self.open.store(false, Ordering::Release);
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    /// Returns `true` if the gate is open and nobody holds the token.
    ///
    /// This is a non-blocking best-effort check using `try_lock`.
    pub fn is_ready(&self) -> bool {
        self.is_open() && self.resource.try_lock().is_ok()
    }

    /// Take the token if it is free right now.
    pub fn try_acquire(&self) -> Option<GateGuard<'_, M, T>> {
        if !self.is_open() {
            return None;
        }
        self.resource.try_lock().ok().map(GateGuard::new)
    }

    /// Acquire the token.
    ///
    /// The coarse phase sleeps `budget.step_ms` on `delay` between readiness
    /// checks until the gate is ready or `budget.budget_ms` has been spent. A
    /// gate that is ready on the first check costs no delay at all. Once
    /// readiness has been observed the fine phase waits on the lock with no
    /// upper bound, since a competing holder is expected to finish shortly.
    pub async fn acquire<D: DelayNs>(
        &self,
        delay: &mut D,
        budget: PollBudget,
    ) -> Result<GateGuard<'_, M, T>, GateError> {
        let step_ms = budget.step_ms.max(1);
        let mut waited_ms = 0u32;

        while !self.is_ready() {
            if waited_ms >= budget.budget_ms {
                return Err(if self.is_open() {
                    GateError::Timeout { waited_ms }
                } else {
                    GateError::Closed
                });
            }
            delay.delay_ms(step_ms).await;
            waited_ms = waited_ms.saturating_add(step_ms);
        }

        Ok(self.acquire_unchecked().await)
    }

    /// Wait for the token without checking whether the gate is open and
    /// without a time bound.
    pub async fn acquire_unchecked(&self) -> GateGuard<'_, M, T> {
        GateGuard::new(self.resource.lock().await)
    }

    /// Consume the gate and give the resource back.
    pub fn into_inner(self) -> T {
        self.resource.into_inner()
    }
}
