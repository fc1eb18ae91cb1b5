#![no_std]
//! Exclusive-access gate for a shared bus.
//!
//! The gate owns the resource it protects and hands it out through an RAII
//! [`GateGuard`]. Acquisition happens in two phases: a coarse, bounded poll
//! that sleeps on the caller's delay until the gate looks ready, followed by
//! an unbounded wait on the underlying async mutex. A gate starts out closed
//! and only becomes acquirable once [`ReadinessGate::open`] has been called,
//! which lets bring-up code run before ordinary callers are admitted.

mod error;
mod gate;
mod guard;

pub use error::GateError;
pub use gate::{PollBudget, ReadinessGate};
pub use guard::GateGuard;
