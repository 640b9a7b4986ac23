// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::future::Future;
use std::io;

use tracing::warn;

/// Resolve once `signal` reports an interrupt.
///
/// A signal handler that cannot be installed never resolves, so the
/// readiness wait keeps running instead of being reported as interrupted.
pub async fn interrupted<F>(signal: F)
where
    F: Future<Output = io::Result<()>>,
{
    if let Err(e) = signal.await {
        warn!("Unable to listen for interrupts: {}", e);
        std::future::pending::<()>().await;
    }
}
