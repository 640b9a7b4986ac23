// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use kube::Client;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use kube_readiness::config::{Args, Config};
use kube_readiness::error::ReadinessError;
use kube_readiness::kubernetes::ReadinessClient;
use kube_readiness::wait::{interrupted, Poller};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    // Create Kubernetes client
    let client = Client::try_default().await?;
    let config = Config::from_args(args, client.default_namespace())?;
    info!(
        "Configuration loaded: namespace={}, timeout={:?}, service_policy={:?}",
        config.namespace, config.timeout, config.service_policy
    );

    if config.targets.is_empty() {
        warn!("No resources to wait for");
        return Ok(ExitCode::SUCCESS);
    }

    let poller = Poller::new(
        ReadinessClient::new(client, config.request_timeout),
        config,
    );

    tokio::select! {
        result = poller.run() => match result {
            Ok(()) => {
                info!("All resources are ready");
                Ok(ExitCode::SUCCESS)
            }
            Err(e @ ReadinessError::Timeout(_)) => {
                warn!("{}", e);
                Ok(ExitCode::FAILURE)
            }
            Err(e) => {
                error!("Readiness check failed: {}", e);
                Ok(ExitCode::FAILURE)
            }
        },
        _ = interrupted(tokio::signal::ctrl_c()) => {
            warn!("Interrupted, giving up on readiness check");
            Ok(ExitCode::from(130))
        }
    }
}
