// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking Kubernetes API responses.

use http::{Request, Response};
use kube::client::Body;
use kube::Client;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;
use tower::Service;

type Canned = (u16, String);

/// A mock HTTP service that returns predefined responses based on request paths.
///
/// Several responses registered for the same path are served in order, the
/// last one is repeated once the others are used up.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<String, VecDeque<Canned>>>>,
    delays: Arc<Mutex<HashMap<String, Duration>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            delays: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a response for GET requests matching the exact path
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back((status, body.to_string()));
        self
    }

    /// Hold back responses for the given path
    pub fn with_delay(self, path: &str, delay: Duration) -> Self {
        self.delays.lock().unwrap().insert(path.to_string(), delay);
        self
    }

    /// Path and query of every request received so far
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    fn find_response(&self, path: &str) -> Option<Canned> {
        let mut responses = self.responses.lock().unwrap();
        let queue = responses.get_mut(path)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let path = req.uri().path().to_string();
        let path_and_query = req
            .uri()
            .path_and_query()
            .map(|pq| pq.to_string())
            .unwrap_or_else(|| path.clone());
        self.requests.lock().unwrap().push(path_and_query);

        let response = if req.method() == http::Method::GET {
            self.find_response(&path)
        } else {
            None
        };
        let delay = self.delays.lock().unwrap().get(&path).copied();

        Box::pin(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            let (status, body) =
                response.unwrap_or_else(|| (404, not_found_json("object", &path)));
            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

fn metadata(name: &str, namespace: &str) -> Value {
    json!({
        "name": name,
        "namespace": namespace,
        "uid": format!("{}-uid", name),
        "generation": 1
    })
}

fn owner_reference(api_version: &str, kind: &str, name: &str) -> Value {
    json!({
        "apiVersion": api_version,
        "kind": kind,
        "name": name,
        "uid": format!("{}-uid", name),
        "controller": true
    })
}

fn empty_template() -> Value {
    json!({ "metadata": {}, "spec": { "containers": [] } })
}

/// Create a pod, optionally owned by a controller of the given kind
pub fn pod_value(name: &str, namespace: &str, owner: Option<(&str, &str)>) -> Value {
    let mut meta = metadata(name, namespace);
    if let Some((kind, owner_name)) = owner {
        let api_version = if kind == "Job" { "batch/v1" } else { "apps/v1" };
        meta["ownerReferences"] = json!([owner_reference(api_version, kind, owner_name)]);
    }
    json!({
        "apiVersion": "v1",
        "kind": "Pod",
        "metadata": meta,
        "spec": { "containers": [] },
        "status": { "phase": "Running" }
    })
}

/// Create a pod running one container in the given state, e.g.
/// `{"running": {}}` or `{"terminated": {"exitCode": 0, "reason": "Completed"}}`
pub fn pod_with_container(
    name: &str,
    namespace: &str,
    owner: Option<(&str, &str)>,
    container: &str,
    state: Value,
) -> Value {
    let mut pod = pod_value(name, namespace, owner);
    pod["spec"]["containers"] = json!([{ "name": container, "image": "busybox" }]);
    pod["status"]["containerStatuses"] = json!([{
        "name": container,
        "image": "busybox",
        "imageID": "",
        "ready": state.get("running").is_some(),
        "restartCount": 0,
        "state": state
    }]);
    pod
}

pub fn pod_json(name: &str, namespace: &str, owner: Option<(&str, &str)>) -> String {
    pod_value(name, namespace, owner).to_string()
}

/// Create a pod list page, with a continue token when more pages follow
pub fn pod_list_json(pods: Vec<Value>, continue_token: Option<&str>) -> String {
    let mut list_meta = json!({ "resourceVersion": "1" });
    if let Some(token) = continue_token {
        list_meta["continue"] = json!(token);
    }
    json!({
        "apiVersion": "v1",
        "kind": "PodList",
        "metadata": list_meta,
        "items": pods
    })
    .to_string()
}

pub fn statefulset_json(
    name: &str,
    namespace: &str,
    desired: i32,
    replicas: i32,
    ready: i32,
) -> String {
    json!({
        "apiVersion": "apps/v1",
        "kind": "StatefulSet",
        "metadata": metadata(name, namespace),
        "spec": {
            "replicas": desired,
            "serviceName": name,
            "selector": {},
            "template": empty_template()
        },
        "status": {
            "replicas": replicas,
            "readyReplicas": ready,
            "observedGeneration": 1
        }
    })
    .to_string()
}

pub fn deployment_json(
    name: &str,
    namespace: &str,
    desired: i32,
    replicas: i32,
    unavailable: i32,
) -> String {
    json!({
        "apiVersion": "apps/v1",
        "kind": "Deployment",
        "metadata": metadata(name, namespace),
        "spec": {
            "replicas": desired,
            "selector": {},
            "template": empty_template()
        },
        "status": {
            "replicas": replicas,
            "readyReplicas": replicas - unavailable,
            "updatedReplicas": replicas,
            "unavailableReplicas": unavailable,
            "observedGeneration": 1
        }
    })
    .to_string()
}

/// Create a ReplicaSet, optionally owned by a Deployment
pub fn replicaset_json(name: &str, namespace: &str, deployment: Option<&str>) -> String {
    let mut meta = metadata(name, namespace);
    if let Some(deployment) = deployment {
        meta["ownerReferences"] = json!([owner_reference("apps/v1", "Deployment", deployment)]);
    }
    json!({
        "apiVersion": "apps/v1",
        "kind": "ReplicaSet",
        "metadata": meta,
        "spec": { "selector": {} },
        "status": { "replicas": 1 }
    })
    .to_string()
}

pub fn daemonset_json(name: &str, namespace: &str, desired: i32, ready: i32) -> String {
    json!({
        "apiVersion": "apps/v1",
        "kind": "DaemonSet",
        "metadata": metadata(name, namespace),
        "spec": { "selector": {}, "template": empty_template() },
        "status": {
            "currentNumberScheduled": desired,
            "desiredNumberScheduled": desired,
            "numberMisscheduled": 0,
            "numberReady": ready
        }
    })
    .to_string()
}

pub fn job_json(name: &str, namespace: &str, succeeded: i32) -> String {
    json!({
        "apiVersion": "batch/v1",
        "kind": "Job",
        "metadata": metadata(name, namespace),
        "spec": { "template": empty_template() },
        "status": { "succeeded": succeeded }
    })
    .to_string()
}

/// Create a service, selector-less when `selector` is empty
pub fn service_json(name: &str, namespace: &str, selector: &[(&str, &str)]) -> String {
    let mut spec = json!({ "ports": [{ "port": 9042 }] });
    if !selector.is_empty() {
        let labels: BTreeMap<&str, &str> = selector.iter().copied().collect();
        spec["selector"] = json!(labels);
    }
    json!({
        "apiVersion": "v1",
        "kind": "Service",
        "metadata": metadata(name, namespace),
        "spec": spec
    })
    .to_string()
}

/// Create an Endpoints object whose single subset targets the given pods
pub fn endpoints_value(name: &str, namespace: &str, pod_names: &[&str]) -> Value {
    let addresses: Vec<Value> = pod_names
        .iter()
        .enumerate()
        .map(|(i, pod)| {
            json!({
                "ip": format!("10.0.0.{}", i + 1),
                "targetRef": { "kind": "Pod", "name": pod, "namespace": namespace }
            })
        })
        .collect();
    let subset = if addresses.is_empty() {
        json!({})
    } else {
        json!({ "addresses": addresses })
    };
    json!({
        "apiVersion": "v1",
        "kind": "Endpoints",
        "metadata": metadata(name, namespace),
        "subsets": [subset]
    })
}

pub fn endpoints_list_json(endpoints: Vec<Value>) -> String {
    json!({
        "apiVersion": "v1",
        "kind": "EndpointsList",
        "metadata": { "resourceVersion": "1" },
        "items": endpoints
    })
    .to_string()
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": format!("{} \"{}\" not found", resource, name),
        "reason": "NotFound",
        "code": 404
    })
    .to_string()
}
