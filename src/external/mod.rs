// ABOUTME: External API client modules (Sportmonks football data)
// ABOUTME: Cache-first access to upstream providers through the resilient HTTP client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Soccer Scout Contributors

//! External API Clients

/// Sportmonks football API client
pub mod sportmonks;

pub use sportmonks::SportmonksClient;
