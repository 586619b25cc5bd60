//! # Breedmatch Core
//!
//! The domain layer of the breed-match proxy.
//! This crate contains request validation, prompt construction and the port
//! traits, with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;

pub use error::DomainError;
