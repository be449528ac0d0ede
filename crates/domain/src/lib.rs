//! # devicehub-domain
//!
//! Pure domain model for the devicehub device inventory.
//!
//! ## Responsibilities
//! - Foundational types: typed device identifier, error taxonomy
//! - Define the **Device** aggregate and its lifecycle **states**
//! - Contain all invariant enforcement: non-blank identity fields,
//!   in-use devices cannot be renamed or deleted
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;

pub mod device;
