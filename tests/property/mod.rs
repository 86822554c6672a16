// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module
//!
//! This module contains property-based tests using proptest to verify the
//! synchronization rules of the combinators and the determinism of the
//! evaluation engine.

mod combinator_laws;
