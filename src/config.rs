// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::constants::{poll, NAMESPACE_ENV};
use crate::error::{ReadinessError, Result};

/// Command line of the readiness gate
#[derive(Parser, Debug)]
#[command(name = "kube-readiness")]
#[command(author, version, about = "Wait until Kubernetes resources are ready")]
pub struct Args {
    /// Namespace the resources live in. Falls back to the client's namespace.
    #[arg(long, env = NAMESPACE_ENV)]
    pub namespace: Option<String>,

    /// Service to wait for (repeatable, comma-separated)
    #[arg(long = "service-name", value_name = "NAME", value_delimiter = ',')]
    pub service_names: Vec<String>,

    /// Job to wait for until it has succeeded
    #[arg(long = "job-name", value_name = "NAME", value_delimiter = ',')]
    pub job_names: Vec<String>,

    /// Pod name prefix; every matching pod is waited on concurrently
    #[arg(long = "pod-name", value_name = "PREFIX", value_delimiter = ',')]
    pub pod_names: Vec<String>,

    #[arg(long = "deployment-name", value_name = "NAME", value_delimiter = ',')]
    pub deployment_names: Vec<String>,

    #[arg(long = "statefulset-name", value_name = "NAME", value_delimiter = ',')]
    pub statefulset_names: Vec<String>,

    #[arg(long = "daemonset-name", value_name = "NAME", value_delimiter = ',')]
    pub daemonset_names: Vec<String>,

    /// Container name; ready once the controller of a pod running it is
    #[arg(long = "container-name", value_name = "NAME", value_delimiter = ',')]
    pub container_names: Vec<String>,

    /// Container name to wait for until it has terminated as `Completed`
    #[arg(
        long = "completed-container-name",
        value_name = "NAME",
        value_delimiter = ','
    )]
    pub completed_container_names: Vec<String>,

    /// Overall wait budget: minutes, or a number suffixed with s, m or h
    #[arg(long, default_value = "60", value_parser = parse_timeout)]
    pub timeout: Duration,

    /// Upper bound for a single Kubernetes API call, in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = poll::REQUEST_TIMEOUT_SECS)]
    pub request_timeout: u64,

    /// Which of a service's pods must be ready
    #[arg(long, value_enum, default_value = "first")]
    pub service_policy: ServicePolicy,
}

/// How the readiness of a service's pods is combined
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ServicePolicy {
    /// Only the first pod found is inspected
    #[default]
    First,
    /// At least one pod is ready
    Any,
    /// Every pod is ready
    All,
}

/// Names of the resources to wait for, per kind
#[derive(Debug, Clone, Default)]
pub struct Targets {
    pub services: Vec<String>,
    pub jobs: Vec<String>,
    pub pods: Vec<String>,
    pub deployments: Vec<String>,
    pub statefulsets: Vec<String>,
    pub daemonsets: Vec<String>,
    pub containers: Vec<String>,
    pub completed_containers: Vec<String>,
}

impl Targets {
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
            && self.jobs.is_empty()
            && self.pods.is_empty()
            && self.deployments.is_empty()
            && self.statefulsets.is_empty()
            && self.daemonsets.is_empty()
            && self.containers.is_empty()
            && self.completed_containers.is_empty()
    }
}

/// Settings for one run, built once at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub namespace: String,
    pub targets: Targets,
    pub timeout: Duration,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub service_policy: ServicePolicy,
}

impl Config {
    /// Validate parsed arguments. `default_namespace` is used when neither
    /// `--namespace` nor the environment name one.
    pub fn from_args(args: Args, default_namespace: &str) -> Result<Self> {
        if args.request_timeout == 0 {
            return Err(ReadinessError::ConfigError(
                "--request-timeout must be greater than zero".to_string(),
            ));
        }

        let namespace = args
            .namespace
            .filter(|ns| !ns.is_empty())
            .unwrap_or_else(|| default_namespace.to_string());

        Ok(Config {
            namespace,
            targets: Targets {
                services: non_empty(args.service_names),
                jobs: non_empty(args.job_names),
                pods: non_empty(args.pod_names),
                deployments: non_empty(args.deployment_names),
                statefulsets: non_empty(args.statefulset_names),
                daemonsets: non_empty(args.daemonset_names),
                containers: non_empty(args.container_names),
                completed_containers: non_empty(args.completed_container_names),
            },
            timeout: args.timeout,
            poll_interval: Duration::from_secs(poll::INTERVAL_SECS),
            request_timeout: Duration::from_secs(args.request_timeout),
            service_policy: args.service_policy,
        })
    }
}

fn non_empty(names: Vec<String>) -> Vec<String> {
    names
        .into_iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect()
}

/// Parse a timeout given in minutes (`15`) or with a unit (`90s`, `10m`, `2h`)
pub fn parse_timeout(value: &str) -> std::result::Result<Duration, String> {
    let value = value.trim();
    let (number, unit) = match value.find(|c: char| !c.is_ascii_digit()) {
        Some(idx) => value.split_at(idx),
        None => (value, "m"),
    };

    let number: u64 = number
        .parse()
        .map_err(|_| format!("invalid timeout '{}'", value))?;
    let multiplier = match unit {
        "s" => 1,
        "m" | "min" => 60,
        "h" => 3600,
        _ => return Err(format!("unknown unit '{}' in timeout '{}'", unit, value)),
    };

    match number.checked_mul(multiplier) {
        Some(0) => Err("timeout must be greater than zero".to_string()),
        Some(secs) => Ok(Duration::from_secs(secs)),
        None => Err(format!("timeout '{}' is too large", value)),
    }
}
