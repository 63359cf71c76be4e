//! Voice Cart Core - Shared types library.
//!
//! This crate provides the domain types used across all Voice Cart components:
//! - `skill` - Intent routing, product resolution and the commerce session manager
//! - `cli` - Command-line tools for driving the skill against a live backend
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps it
//! lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for SKUs, quantities, ids and the
//!   resolution/cart records exchanged between components

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
