//! Core types for Voice Cart.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod product;
pub mod quantity;
pub mod sku;

pub use id::*;
pub use product::{CartAdditionResult, ResolutionRequest, SearchResult};
pub use quantity::{Quantity, QuantityError};
pub use sku::{Sku, SkuError};
