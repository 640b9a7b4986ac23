// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Drives readiness checks until they pass or their deadline runs out.

use std::future::Future;
use std::time::Duration;

use k8s_openapi::api::core::v1::Pod;
use kube::ResourceExt;
use tokio::task::JoinSet;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::error::{ReadinessError, Result};
use crate::kubernetes::ReadinessClient;
use crate::types::{ResourceKind, ResourceRef, WorkloadKind};
use crate::wait::Deadline;

/// One target being polled at a fixed interval until a deadline
#[derive(Debug, Clone)]
pub struct PollSession {
    pub target: ResourceRef,
    pub interval: Duration,
    pub deadline: Deadline,
}

impl PollSession {
    pub fn new(target: ResourceRef, interval: Duration, deadline: Deadline) -> Self {
        Self {
            target,
            interval,
            deadline,
        }
    }

    /// Poll `check` until it yields a value.
    ///
    /// Each check is cut off when the deadline passes, so the wait never
    /// overshoots the deadline by more than one interval.
    pub async fn wait_for<T, F, Fut>(&self, mut check: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Option<T>>,
    {
        let mut attempts = 0u32;

        loop {
            let remaining = self.deadline.remaining();
            if remaining.is_zero() {
                warn!(
                    "Timed out waiting for {} to be ready after {} attempt(s)",
                    self.target, attempts
                );
                return Err(ReadinessError::Timeout(self.target.clone()));
            }

            attempts += 1;
            match timeout(remaining, check()).await {
                Ok(Some(value)) => return Ok(value),
                Ok(None) => debug!("{} is not ready yet (attempt {})", self.target, attempts),
                Err(_) => warn!("Readiness check of {} ran into the deadline", self.target),
            }

            sleep(self.interval.min(self.deadline.remaining())).await;
        }
    }

    /// Poll a boolean readiness check until it passes
    pub async fn wait_until<F, Fut>(&self, mut check: F) -> Result<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = bool>,
    {
        self.wait_for(|| {
            let ready = check();
            async move { ready.await.then_some(()) }
        })
        .await?;

        info!("{} is ready", self.target);
        Ok(())
    }
}

/// Waits for every target of a [`Config`]
pub struct Poller {
    client: ReadinessClient,
    config: Config,
}

impl Poller {
    pub fn new(client: ReadinessClient, config: Config) -> Self {
        Self { client, config }
    }

    fn target(&self, kind: ResourceKind, name: &str) -> ResourceRef {
        ResourceRef::new(kind, self.config.namespace.as_str(), name)
    }

    /// Wait for all configured targets. Services, jobs, workloads and
    /// containers are waited on one after the other; pods concurrently.
    pub async fn run(&self) -> Result<()> {
        let targets = &self.config.targets;

        self.wait_for_services(&targets.services).await?;
        self.wait_for_jobs(&targets.jobs).await?;
        self.wait_for_workloads(WorkloadKind::Deployment, &targets.deployments)
            .await?;
        self.wait_for_workloads(WorkloadKind::StatefulSet, &targets.statefulsets)
            .await?;
        self.wait_for_workloads(WorkloadKind::DaemonSet, &targets.daemonsets)
            .await?;
        self.wait_for_containers(&targets.containers).await?;
        self.wait_for_completed_containers(&targets.completed_containers)
            .await?;
        self.wait_for_pods(&targets.pods).await?;

        Ok(())
    }

    /// Services share one deadline, started when the first one is checked
    #[instrument(skip(self))]
    pub async fn wait_for_services(&self, names: &[String]) -> Result<()> {
        let deadline = Deadline::after(self.config.timeout);
        let namespace = self.config.namespace.as_str();

        for name in names {
            let session = PollSession::new(
                self.target(ResourceKind::Service, name),
                self.config.poll_interval,
                deadline,
            );
            session
                .wait_until(|| {
                    self.client
                        .is_service_ready(namespace, name, self.config.service_policy)
                })
                .await?;
        }

        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn wait_for_jobs(&self, names: &[String]) -> Result<()> {
        self.wait_for_workloads(WorkloadKind::Job, names).await
    }

    /// Wait for workloads of one kind, sequentially and under one deadline
    pub async fn wait_for_workloads(&self, kind: WorkloadKind, names: &[String]) -> Result<()> {
        let deadline = Deadline::after(self.config.timeout);
        let namespace = self.config.namespace.as_str();

        for name in names {
            let session = PollSession::new(
                self.target(kind.into(), name),
                self.config.poll_interval,
                deadline,
            );
            session
                .wait_until(|| self.client.is_ready(kind, namespace, name))
                .await?;
        }

        Ok(())
    }

    /// Containers share one deadline, like the other sequential groups
    #[instrument(skip(self))]
    pub async fn wait_for_containers(&self, names: &[String]) -> Result<()> {
        let deadline = Deadline::after(self.config.timeout);
        let namespace = self.config.namespace.as_str();

        for name in names {
            PollSession::new(
                self.target(ResourceKind::Container, name),
                self.config.poll_interval,
                deadline,
            )
            .wait_until(|| self.client.is_container_ready(namespace, name))
            .await?;
        }

        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn wait_for_completed_containers(&self, names: &[String]) -> Result<()> {
        let deadline = Deadline::after(self.config.timeout);
        let namespace = self.config.namespace.as_str();

        for name in names {
            PollSession::new(
                self.target(ResourceKind::Container, name),
                self.config.poll_interval,
                deadline,
            )
            .wait_until(|| self.client.is_container_completed(namespace, name))
            .await?;
        }

        Ok(())
    }

    /// Wait for every pod matching any of the given name prefixes.
    ///
    /// Each matching pod gets its own task. Discovery and the pod waits of
    /// one prefix share a deadline, started when discovery begins. The first
    /// timeout aborts the remaining tasks.
    #[instrument(skip(self))]
    pub async fn wait_for_pods(&self, prefixes: &[String]) -> Result<()> {
        let mut tasks = JoinSet::new();

        for prefix in prefixes {
            let deadline = Deadline::after(self.config.timeout);
            for pod in self.discover_pods(prefix, deadline).await? {
                let session = PollSession::new(
                    self.target(ResourceKind::Pod, &pod.name_any()),
                    self.config.poll_interval,
                    deadline,
                );
                let client = self.client.clone();
                tasks.spawn(async move { session.wait_until(|| client.is_pod_ready(&pod)).await });
            }
        }

        while let Some(joined) = tasks.join_next().await {
            joined.map_err(|e| ReadinessError::TaskFailed(e.to_string()))??;
        }

        Ok(())
    }

    /// Poll until at least one pod carries the given name prefix
    async fn discover_pods(&self, prefix: &str, deadline: Deadline) -> Result<Vec<Pod>> {
        let namespace = self.config.namespace.as_str();
        let session = PollSession::new(
            self.target(ResourceKind::Pod, prefix),
            self.config.poll_interval,
            deadline,
        );

        let pods = session
            .wait_for(|| async {
                match self.client.pods_by_prefix(namespace, prefix).await {
                    Ok(pods) if !pods.is_empty() => Some(pods),
                    Ok(_) => {
                        info!("No pods with prefix '{}' in {} yet", prefix, namespace);
                        None
                    }
                    Err(e) => {
                        warn!("Failed to list pods in {}: {}", namespace, e);
                        None
                    }
                }
            })
            .await?;

        info!(
            "Waiting for {} pod(s) with prefix '{}'",
            pods.len(),
            prefix
        );
        Ok(pods)
    }
}
