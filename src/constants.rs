// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Environment variable consulted when `--namespace` is not given
pub const NAMESPACE_ENV: &str = "NAMESPACE";

/// Polling configuration
pub mod poll {
    /// Fixed delay between two readiness checks of the same target
    pub const INTERVAL_SECS: u64 = 1;
    /// Upper bound for a single Kubernetes API call
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
}

/// Page size used when listing pods to match name prefixes
pub const POD_LIST_PAGE_SIZE: u32 = 300;
