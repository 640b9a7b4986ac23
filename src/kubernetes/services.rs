// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Service readiness, judged by the pods backing the service

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::{Endpoints, Pod, Service};
use kube::{api::ListParams, ResourceExt};
use tracing::{debug, info, instrument, warn};

use crate::config::ServicePolicy;
use crate::error::Result;
use crate::kubernetes::ReadinessClient;

/// Render a service selector as a label selector query
fn label_selector(selector: &BTreeMap<String, String>) -> String {
    selector
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(",")
}

impl ReadinessClient {
    /// Check a service through the pods backing it.
    ///
    /// An empty set of backing pods is never ready.
    #[instrument(skip(self))]
    pub async fn is_service_ready(
        &self,
        namespace: &str,
        name: &str,
        policy: ServicePolicy,
    ) -> bool {
        let service = match self.get::<Service>(namespace, name).await {
            Ok(s) => s,
            Err(e) => {
                warn!("Error while getting Service {}/{}: {}", namespace, name, e);
                return false;
            }
        };

        let pods = match self.service_pods(namespace, &service).await {
            Ok(p) => p,
            Err(e) => {
                warn!("Error while getting pods for Service {}/{}: {}", namespace, name, e);
                return false;
            }
        };

        if pods.is_empty() {
            info!("No pods found that are selected by Service {}/{}", namespace, name);
            return false;
        }

        match policy {
            ServicePolicy::First => {
                debug!("Found pod {} selected by Service {}", pods[0].name_any(), name);
                self.is_pod_ready(&pods[0]).await
            }
            ServicePolicy::Any => {
                for pod in &pods {
                    if self.is_pod_ready(pod).await {
                        return true;
                    }
                }
                false
            }
            ServicePolicy::All => {
                for pod in &pods {
                    if !self.is_pod_ready(pod).await {
                        debug!("Pod {} of Service {} is NOT ready", pod.name_any(), name);
                        return false;
                    }
                }
                true
            }
        }
    }

    /// Pods behind a service: by label selector, or through its Endpoints
    /// when the service has no selector.
    async fn service_pods(&self, namespace: &str, service: &Service) -> Result<Vec<Pod>> {
        let selector = service
            .spec
            .as_ref()
            .and_then(|s| s.selector.as_ref())
            .filter(|s| !s.is_empty());

        match selector {
            Some(selector) => {
                let params = ListParams::default().labels(&label_selector(selector));
                Ok(self.list::<Pod>(namespace, &params).await?.items)
            }
            None => {
                debug!("No selector on Service {}, checking Endpoints", service.name_any());
                self.endpoint_pods(namespace, &service.name_any()).await
            }
        }
    }

    /// Resolve the pods addressed by the first subset of the Endpoints object
    /// whose name starts with the service name
    async fn endpoint_pods(&self, namespace: &str, service_name: &str) -> Result<Vec<Pod>> {
        let endpoints = self
            .list::<Endpoints>(namespace, &ListParams::default())
            .await?;

        let Some(endpoint) = endpoints
            .items
            .into_iter()
            .find(|e| e.name_any().starts_with(service_name))
        else {
            debug!("No Endpoints found for Service {}", service_name);
            return Ok(Vec::new());
        };

        let addresses = endpoint
            .subsets
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|subset| subset.addresses)
            .unwrap_or_default();

        let mut pods = Vec::new();
        for address in addresses {
            let Some(pod_name) = address.target_ref.and_then(|r| r.name) else {
                continue;
            };
            debug!("Found pod {} selected by Service {}", pod_name, service_name);
            match self.get::<Pod>(namespace, &pod_name).await {
                Ok(pod) => pods.push(pod),
                Err(e) => warn!("Error while getting pod {}/{}: {}", namespace, pod_name, e),
            }
        }

        Ok(pods)
    }
}
