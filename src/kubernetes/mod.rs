// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes access: the client facade, pod resolution and service resolution.

pub mod client;
pub mod pods;
pub mod services;

pub use client::ReadinessClient;
