// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::time::Duration;

use thiserror::Error;

use crate::types::ResourceRef;

#[derive(Error, Debug)]
pub enum ReadinessError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Kubernetes API request did not complete within {0:?}")]
    RequestTimeout(Duration),

    #[error("Timed out waiting for {0} to be ready")]
    Timeout(ResourceRef),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Wait task failed: {0}")]
    TaskFailed(String),
}

pub type Result<T> = std::result::Result<T, ReadinessError>;
