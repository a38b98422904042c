// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module
//!
//! - `coalescing` - prefix coalescing of child addresses
//! - `determinism` - generator output does not depend on input order

mod coalescing;
mod determinism;
