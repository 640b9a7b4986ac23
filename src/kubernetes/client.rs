// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Read-only facade over the Kubernetes API used by every readiness check

use std::fmt::Debug;
use std::future::Future;
use std::time::Duration;

use k8s_openapi::api::apps::v1::{DaemonSet, Deployment, StatefulSet};
use k8s_openapi::api::batch::v1::Job;
use k8s_openapi::NamespaceResourceScope;
use kube::{
    api::{ListParams, ObjectList},
    Api, Client, Resource,
};
use serde::de::DeserializeOwned;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

use crate::error::{ReadinessError, Result};
use crate::types::{Readiness, WorkloadKind};

/// Shared, read-only handle on the cluster.
///
/// Every API call goes through [`ReadinessClient::bounded`], so a hung
/// request turns into a [`ReadinessError::RequestTimeout`] instead of
/// stalling the poll loop.
#[derive(Clone)]
pub struct ReadinessClient {
    client: Client,
    request_timeout: Duration,
}

impl ReadinessClient {
    pub fn new(client: Client, request_timeout: Duration) -> Self {
        Self {
            client,
            request_timeout,
        }
    }

    fn api<K>(&self, namespace: &str) -> Api<K>
    where
        K: Resource<Scope = NamespaceResourceScope>,
        <K as Resource>::DynamicType: Default,
    {
        Api::namespaced(self.client.clone(), namespace)
    }

    async fn bounded<T>(&self, request: impl Future<Output = kube::Result<T>>) -> Result<T> {
        match timeout(self.request_timeout, request).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(ReadinessError::RequestTimeout(self.request_timeout)),
        }
    }

    /// Fetch a single namespaced object
    pub async fn get<K>(&self, namespace: &str, name: &str) -> Result<K>
    where
        K: Resource<Scope = NamespaceResourceScope> + Clone + DeserializeOwned + Debug,
        <K as Resource>::DynamicType: Default,
    {
        let api = self.api::<K>(namespace);
        self.bounded(api.get(name)).await
    }

    /// List one page of namespaced objects
    pub async fn list<K>(&self, namespace: &str, params: &ListParams) -> Result<ObjectList<K>>
    where
        K: Resource<Scope = NamespaceResourceScope> + Clone + DeserializeOwned + Debug,
        <K as Resource>::DynamicType: Default,
    {
        let api = self.api::<K>(namespace);
        self.bounded(api.list(params)).await
    }

    /// Fetch a workload and evaluate its readiness predicate.
    ///
    /// Fetch errors are logged and reported as not ready.
    #[instrument(skip(self))]
    pub async fn is_workload_ready<K>(&self, namespace: &str, name: &str) -> bool
    where
        K: Resource<Scope = NamespaceResourceScope> + Readiness + Clone + DeserializeOwned + Debug,
        <K as Resource>::DynamicType: Default,
    {
        let kind = K::kind(&Default::default()).to_string();

        let workload = match self.get::<K>(namespace, name).await {
            Ok(w) => w,
            Err(e) => {
                warn!("Error while getting {} {}/{}: {}", kind, namespace, name, e);
                return false;
            }
        };

        let status = workload.readiness();
        if status.is_ready() {
            info!("{} {}/{} is ready ({})", kind, namespace, name, status);
            true
        } else {
            debug!("{} {}/{} is NOT ready ({})", kind, namespace, name, status);
            false
        }
    }

    /// Dispatch to the predicate of the given workload kind
    pub async fn is_ready(&self, kind: WorkloadKind, namespace: &str, name: &str) -> bool {
        match kind {
            WorkloadKind::Deployment => self.is_workload_ready::<Deployment>(namespace, name).await,
            WorkloadKind::StatefulSet => {
                self.is_workload_ready::<StatefulSet>(namespace, name).await
            }
            WorkloadKind::DaemonSet => self.is_workload_ready::<DaemonSet>(namespace, name).await,
            WorkloadKind::Job => self.is_workload_ready::<Job>(namespace, name).await,
        }
    }
}
