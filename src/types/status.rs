// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Readiness predicates for the workload kinds we know how to wait on.

use std::fmt;

use k8s_openapi::api::apps::v1::{DaemonSet, Deployment, StatefulSet};
use k8s_openapi::api::batch::v1::Job;

/// Snapshot of the status fields a readiness predicate needs.
///
/// Missing counters and generations are read as 0, a missing
/// `spec.replicas` as the API default of 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessStatus {
    Deployment {
        generation: i64,
        observed_generation: i64,
        desired_replicas: i32,
        replicas: i32,
        updated_replicas: i32,
        unavailable_replicas: i32,
    },
    StatefulSet {
        generation: i64,
        observed_generation: i64,
        desired_replicas: i32,
        replicas: i32,
        ready_replicas: i32,
    },
    DaemonSet {
        desired_number_scheduled: i32,
        number_ready: i32,
    },
    Job {
        succeeded: i32,
    },
}

impl ReadinessStatus {
    pub fn is_ready(&self) -> bool {
        match *self {
            ReadinessStatus::Deployment {
                generation,
                observed_generation,
                desired_replicas,
                replicas,
                updated_replicas,
                unavailable_replicas,
            } => {
                unavailable_replicas == 0
                    && (updated_replicas == 0 || updated_replicas == desired_replicas)
                    && replicas == desired_replicas
                    && observed_generation == generation
            }
            ReadinessStatus::StatefulSet {
                generation,
                observed_generation,
                desired_replicas,
                replicas,
                ready_replicas,
            } => {
                replicas == desired_replicas
                    && ready_replicas == desired_replicas
                    && observed_generation == generation
            }
            ReadinessStatus::DaemonSet {
                desired_number_scheduled,
                number_ready,
            } => desired_number_scheduled == number_ready,
            ReadinessStatus::Job { succeeded } => succeeded > 0,
        }
    }
}

impl fmt::Display for ReadinessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadinessStatus::Deployment {
                generation,
                observed_generation,
                desired_replicas,
                replicas,
                updated_replicas,
                unavailable_replicas,
            } => write!(
                f,
                "{}/{} replicas, {} updated, {} unavailable, generation {}/{}",
                replicas,
                desired_replicas,
                updated_replicas,
                unavailable_replicas,
                observed_generation,
                generation
            ),
            ReadinessStatus::StatefulSet {
                generation,
                observed_generation,
                desired_replicas,
                replicas,
                ready_replicas,
            } => write!(
                f,
                "{}/{} replicas, {} ready, generation {}/{}",
                replicas, desired_replicas, ready_replicas, observed_generation, generation
            ),
            ReadinessStatus::DaemonSet {
                desired_number_scheduled,
                number_ready,
            } => write!(
                f,
                "{}/{} nodes ready",
                number_ready, desired_number_scheduled
            ),
            ReadinessStatus::Job { succeeded } => write!(f, "{} succeeded", succeeded),
        }
    }
}

/// Objects that can be reduced to a [`ReadinessStatus`]
pub trait Readiness {
    fn readiness(&self) -> ReadinessStatus;

    fn is_ready(&self) -> bool {
        self.readiness().is_ready()
    }
}

impl Readiness for Deployment {
    fn readiness(&self) -> ReadinessStatus {
        let status = self.status.clone().unwrap_or_default();
        ReadinessStatus::Deployment {
            generation: self.metadata.generation.unwrap_or(0),
            observed_generation: status.observed_generation.unwrap_or(0),
            desired_replicas: self.spec.as_ref().and_then(|s| s.replicas).unwrap_or(1),
            replicas: status.replicas.unwrap_or(0),
            updated_replicas: status.updated_replicas.unwrap_or(0),
            unavailable_replicas: status.unavailable_replicas.unwrap_or(0),
        }
    }
}

impl Readiness for StatefulSet {
    fn readiness(&self) -> ReadinessStatus {
        let status = self.status.as_ref();
        ReadinessStatus::StatefulSet {
            generation: self.metadata.generation.unwrap_or(0),
            observed_generation: status.and_then(|s| s.observed_generation).unwrap_or(0),
            desired_replicas: self.spec.as_ref().and_then(|s| s.replicas).unwrap_or(1),
            replicas: status.map(|s| s.replicas).unwrap_or(0),
            ready_replicas: status.and_then(|s| s.ready_replicas).unwrap_or(0),
        }
    }
}

impl Readiness for DaemonSet {
    fn readiness(&self) -> ReadinessStatus {
        let status = self.status.as_ref();
        ReadinessStatus::DaemonSet {
            desired_number_scheduled: status.map(|s| s.desired_number_scheduled).unwrap_or(0),
            number_ready: status.map(|s| s.number_ready).unwrap_or(0),
        }
    }
}

impl Readiness for Job {
    fn readiness(&self) -> ReadinessStatus {
        ReadinessStatus::Job {
            succeeded: self
                .status
                .as_ref()
                .and_then(|s| s.succeeded)
                .unwrap_or(0),
        }
    }
}
