// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Deadline-bounded polling of readiness checks.

pub mod deadline;
pub mod poller;
pub mod signal;

pub use deadline::Deadline;
pub use poller::{PollSession, Poller};
pub use signal::interrupted;
