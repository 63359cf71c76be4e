//! Voice Cart skill library.
//!
//! This crate provides the skill backend as a library, allowing it to be
//! tested and reused by the CLI.
//!
//! # Layers
//!
//! - [`intents`] - Intent router, the entry contract for one dialogue turn
//! - [`resolver`] - Product resolution (slot match first, catalog search second)
//! - [`magento`] - Commerce session manager over the Magento REST API

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod intents;
pub mod magento;
pub mod resolver;
pub mod routes;
pub mod state;
