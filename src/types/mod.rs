// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Resource identities and readiness snapshots.

pub mod resource;
pub mod status;

pub use resource::{PodOwner, ResourceKind, ResourceRef, WorkloadKind};
pub use status::{Readiness, ReadinessStatus};
