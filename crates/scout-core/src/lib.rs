// ABOUTME: Core types and constants for the soccer scouting platform
// ABOUTME: Foundation crate with error handling and constants shared by every other crate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Soccer Scout Contributors

#![deny(unsafe_code)]

//! # Scout Core
//!
//! Foundation crate providing shared types and constants for the scouting
//! platform. It is designed to change infrequently so the provider and server
//! crates can compile incrementally on top of it.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `ProviderError`
//! - **constants**: Cache TTLs, HTTP client defaults, and service identifiers

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;
