// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::fmt;

use k8s_openapi::api::core::v1::Pod;
use kube::ResourceExt;

/// Kinds of objects that can be waited on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Service,
    Job,
    Pod,
    Container,
    Deployment,
    StatefulSet,
    DaemonSet,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            ResourceKind::Service => "Service",
            ResourceKind::Job => "Job",
            ResourceKind::Pod => "Pod",
            ResourceKind::Container => "Container",
            ResourceKind::Deployment => "Deployment",
            ResourceKind::StatefulSet => "StatefulSet",
            ResourceKind::DaemonSet => "DaemonSet",
        };
        f.write_str(kind)
    }
}

/// A single cluster object to check
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceRef {
    pub kind: ResourceKind,
    pub namespace: String,
    pub name: String,
}

impl ResourceRef {
    pub fn new(kind: ResourceKind, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind,
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}/{}", self.kind, self.namespace, self.name)
    }
}

/// Controllers that have a readiness predicate of their own.
///
/// Every variant maps to one `k8s-openapi` type implementing
/// [`Readiness`](crate::types::Readiness), see
/// [`ReadinessClient::is_ready`](crate::kubernetes::ReadinessClient::is_ready).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkloadKind {
    Deployment,
    StatefulSet,
    DaemonSet,
    Job,
}

impl WorkloadKind {
    /// Map an owner reference `kind` onto a workload, if it is one we can check
    pub fn from_owner_kind(kind: &str) -> Option<Self> {
        match kind {
            "StatefulSet" => Some(WorkloadKind::StatefulSet),
            "DaemonSet" => Some(WorkloadKind::DaemonSet),
            "Job" => Some(WorkloadKind::Job),
            "Deployment" => Some(WorkloadKind::Deployment),
            _ => None,
        }
    }
}

impl From<WorkloadKind> for ResourceKind {
    fn from(kind: WorkloadKind) -> Self {
        match kind {
            WorkloadKind::Deployment => ResourceKind::Deployment,
            WorkloadKind::StatefulSet => ResourceKind::StatefulSet,
            WorkloadKind::DaemonSet => ResourceKind::DaemonSet,
            WorkloadKind::Job => ResourceKind::Job,
        }
    }
}

/// The controller a pod has to wait on, derived from its first owner reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PodOwner {
    /// Owned directly by a checkable workload
    Workload { kind: WorkloadKind, name: String },
    /// Owned by a ReplicaSet, which needs one more hop to reach its Deployment
    ReplicaSet { name: String },
    /// No owner, or an owner kind we do not know how to check
    Unmanaged,
}

impl PodOwner {
    /// Only the first owner reference is consulted.
    pub fn of(pod: &Pod) -> Self {
        let Some(owner) = pod.owner_references().first() else {
            return PodOwner::Unmanaged;
        };

        if owner.kind == "ReplicaSet" {
            return PodOwner::ReplicaSet {
                name: owner.name.clone(),
            };
        }

        match WorkloadKind::from_owner_kind(&owner.kind) {
            // Pods are never owned by a Deployment directly
            Some(WorkloadKind::Deployment) | None => PodOwner::Unmanaged,
            Some(kind) => PodOwner::Workload {
                kind,
                name: owner.name.clone(),
            },
        }
    }
}
