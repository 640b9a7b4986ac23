// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Pod discovery by name prefix and owner-based pod readiness

use std::collections::HashSet;

use k8s_openapi::api::apps::v1::ReplicaSet;
use k8s_openapi::api::core::v1::{ContainerStatus, Pod};
use kube::{api::ListParams, ResourceExt};
use tracing::{debug, info, instrument, warn};

use crate::constants::POD_LIST_PAGE_SIZE;
use crate::error::Result;
use crate::kubernetes::ReadinessClient;
use crate::types::{PodOwner, WorkloadKind};

impl ReadinessClient {
    /// Check a pod by waiting on the controller that owns it.
    ///
    /// Pods without an owner, or with an owner kind we cannot check, are
    /// ready. A ReplicaSet that cannot be traced back to its Deployment is not.
    #[instrument(skip(self, pod), fields(pod = %pod.name_any()))]
    pub async fn is_pod_ready(&self, pod: &Pod) -> bool {
        let namespace = pod.namespace().unwrap_or_default();

        match PodOwner::of(pod) {
            PodOwner::Workload { kind, name } => self.is_ready(kind, &namespace, &name).await,
            PodOwner::ReplicaSet { name } => {
                match self.deployment_for_replica_set(&namespace, &name).await {
                    Some(deployment) => {
                        self.is_ready(WorkloadKind::Deployment, &namespace, &deployment)
                            .await
                    }
                    None => false,
                }
            }
            PodOwner::Unmanaged => {
                debug!("Pod {} has no controller to wait on", pod.name_any());
                true
            }
        }
    }

    /// Follow the first owner reference of a ReplicaSet to its Deployment
    async fn deployment_for_replica_set(&self, namespace: &str, name: &str) -> Option<String> {
        let replica_set = match self.get::<ReplicaSet>(namespace, name).await {
            Ok(rs) => rs,
            Err(e) => {
                warn!("Error while getting ReplicaSet {}/{}: {}", namespace, name, e);
                return None;
            }
        };

        match replica_set.owner_references().first() {
            Some(owner) if owner.kind == "Deployment" => Some(owner.name.clone()),
            Some(owner) => {
                warn!(
                    "ReplicaSet {}/{} is owned by {} {}, not a Deployment",
                    namespace, name, owner.kind, owner.name
                );
                None
            }
            None => {
                warn!("ReplicaSet {}/{} has no owning Deployment", namespace, name);
                None
            }
        }
    }

    /// List every pod in the namespace whose name starts with `prefix`.
    ///
    /// Generated pod names carry a random suffix, so the whole namespace is
    /// paged through and filtered client side.
    #[instrument(skip(self))]
    pub async fn pods_by_prefix(&self, namespace: &str, prefix: &str) -> Result<Vec<Pod>> {
        self.pods_matching(namespace, |pod| pod.name_any().starts_with(prefix))
            .await
    }

    /// List every pod in the namespace reporting a status for `container`
    #[instrument(skip(self))]
    pub async fn pods_with_container(&self, namespace: &str, container: &str) -> Result<Vec<Pod>> {
        self.pods_matching(namespace, |pod| container_status(pod, container).is_some())
            .await
    }

    /// A container is ready when the controller of the first pod running it is
    #[instrument(skip(self))]
    pub async fn is_container_ready(&self, namespace: &str, container: &str) -> bool {
        match self.pods_with_container(namespace, container).await {
            Ok(pods) => match pods.first() {
                Some(pod) => {
                    debug!("Found container {} in pod {}", container, pod.name_any());
                    self.is_pod_ready(pod).await
                }
                None => {
                    info!("No pod runs a container named {} yet", container);
                    false
                }
            },
            Err(e) => {
                warn!("Error while listing pods in {}: {}", namespace, e);
                false
            }
        }
    }

    /// A container has completed once any pod reports it terminated with
    /// reason `Completed`
    #[instrument(skip(self))]
    pub async fn is_container_completed(&self, namespace: &str, container: &str) -> bool {
        let pods = match self.pods_with_container(namespace, container).await {
            Ok(pods) => pods,
            Err(e) => {
                warn!("Error while listing pods in {}: {}", namespace, e);
                return false;
            }
        };

        let completed = pods.iter().any(|pod| {
            container_status(pod, container)
                .and_then(|status| status.state.as_ref())
                .and_then(|state| state.terminated.as_ref())
                .is_some_and(|terminated| terminated.reason.as_deref() == Some("Completed"))
        });
        if !completed {
            info!("Container {} has not completed yet", container);
        }
        completed
    }

    /// Page through all pods of a namespace, keeping those `filter` accepts.
    /// A pod showing up on two pages is kept once.
    async fn pods_matching<F>(&self, namespace: &str, filter: F) -> Result<Vec<Pod>>
    where
        F: Fn(&Pod) -> bool,
    {
        let mut matched = Vec::new();
        let mut seen = HashSet::new();
        let mut continue_token: Option<String> = None;
        let mut pages = 0u32;

        loop {
            let mut params = ListParams::default().limit(POD_LIST_PAGE_SIZE);
            if let Some(ref token) = continue_token {
                params = params.continue_token(token);
            }

            let page = self.list::<Pod>(namespace, &params).await?;
            pages += 1;

            for pod in page.items {
                if filter(&pod) && seen.insert(pod.name_any()) {
                    matched.push(pod);
                }
            }

            match page.metadata.continue_ {
                Some(token) if !token.is_empty() => continue_token = Some(token),
                _ => break,
            }
        }

        debug!(
            "Matched {} pod(s) in {} over {} page(s)",
            matched.len(),
            namespace,
            pages
        );
        Ok(matched)
    }
}

fn container_status<'a>(pod: &'a Pod, container: &str) -> Option<&'a ContainerStatus> {
    pod.status
        .as_ref()?
        .container_statuses
        .as_ref()?
        .iter()
        .find(|status| status.name == container)
}
