use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};
use std::cell::RefCell;
use std::rc::Rc;

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embedded_hal_async::delay::DelayNs;
use futures::future::join;
use readiness_gate::{GateError, PollBudget, ReadinessGate};

// ---------------------------------------------------------------------------
// Mock delay
// ---------------------------------------------------------------------------

/// Yields once to the executor so other futures get polled.
struct YieldNow(bool);

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 {
            Poll::Ready(())
        } else {
            self.0 = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

/// Records every requested sleep (in ns) and yields instead of sleeping.
#[derive(Clone, Default)]
struct MockDelay {
    slept: Rc<RefCell<Vec<u32>>>,
}

impl MockDelay {
    fn total_ms(&self) -> u32 {
        self.slept.borrow().iter().sum::<u32>() / 1_000_000
    }

    fn calls(&self) -> usize {
        self.slept.borrow().len()
    }
}

impl DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.slept.borrow_mut().push(ns);
        YieldNow(false).await;
    }
}

// ---------------------------------------------------------------------------
// Helper
// ---------------------------------------------------------------------------

fn open_gate(value: u32) -> ReadinessGate<NoopRawMutex, u32> {
    let gate = ReadinessGate::new(value);
    gate.open();
    gate
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[futures_test::test]
async fn acquire_when_ready_costs_no_delay() {
    let gate = open_gate(42);
    let mut delay = MockDelay::default();

    let guard = gate.acquire(&mut delay, PollBudget::default()).await.unwrap();
    assert_eq!(*guard, 42);
    assert_eq!(delay.calls(), 0);
}

#[futures_test::test]
async fn new_gate_is_closed() {
    let gate: ReadinessGate<NoopRawMutex, u32> = ReadinessGate::new(1);
    let mut delay = MockDelay::default();

    assert!(!gate.is_open());
    assert!(!gate.is_ready());
    assert!(gate.try_acquire().is_none());

    let result = gate.acquire(&mut delay, PollBudget::default()).await;
    assert_eq!(result.err(), Some(GateError::Closed));
    assert_eq!(delay.total_ms(), 250);
}

#[futures_test::test]
async fn held_gate_times_out_after_budget() {
    let gate = open_gate(0);
    let mut delay = MockDelay::default();

    let _held = gate.try_acquire().unwrap();
    assert!(!gate.is_ready());

    let result = gate.acquire(&mut delay, PollBudget::new(10, 250)).await;
    assert_eq!(result.err(), Some(GateError::Timeout { waited_ms: 250 }));
    assert_eq!(delay.calls(), 25);
    assert!(delay.slept.borrow().iter().all(|&ns| ns == 10_000_000));
}

#[futures_test::test]
async fn release_makes_gate_ready_again() {
    let gate = open_gate(0);

    let guard = gate.try_acquire().unwrap();
    assert!(!gate.is_ready());
    guard.release();
    assert!(gate.is_ready());
}

#[futures_test::test]
async fn guard_gives_mutable_access() {
    let gate = open_gate(1);
    let mut delay = MockDelay::default();

    {
        let mut guard =
            gate.acquire(&mut delay, PollBudget::default()).await.unwrap();
        *guard += 1;
    }

    assert_eq!(gate.into_inner(), 2);
}

#[futures_test::test]
async fn unchecked_acquire_ignores_closed_state() {
    let gate: ReadinessGate<NoopRawMutex, u32> = ReadinessGate::new(7);

    let guard = gate.acquire_unchecked().await;
    assert_eq!(*guard, 7);
}

#[futures_test::test]
async fn waiter_gets_token_after_holder_releases() {
    let gate = open_gate(0);
    let log = RefCell::new(Vec::new());

    let holder = async {
        let mut delay = MockDelay::default();
        let mut guard =
            gate.acquire(&mut delay, PollBudget::default()).await.unwrap();
        log.borrow_mut().push("holder in");
        // Hold the token across a few suspension points.
        for _ in 0..3 {
            delay.delay_us(100).await;
        }
        *guard += 1;
        log.borrow_mut().push("holder out");
    };

    let waiter = async {
        let mut delay = MockDelay::default();
        let mut guard =
            gate.acquire(&mut delay, PollBudget::default()).await.unwrap();
        log.borrow_mut().push("waiter in");
        *guard += 10;
        log.borrow_mut().push("waiter out");
        delay
    };

    let ((), waiter_delay) = join(holder, waiter).await;

    assert_eq!(
        *log.borrow(),
        vec!["holder in", "holder out", "waiter in", "waiter out"]
    );
    assert!(waiter_delay.calls() > 0);
    assert_eq!(gate.into_inner(), 11);
}

#[futures_test::test]
async fn close_rejects_new_callers() {
    let gate = open_gate(0);
    let mut delay = MockDelay::default();

    gate.close();
    let result = gate.acquire(&mut delay, PollBudget::new(10, 20)).await;
    assert_eq!(result.err(), Some(GateError::Closed));
    assert_eq!(delay.calls(), 2);
}
