//! Authentication primitives.
//!
//! - [`jwt`] -- stateless access-token generation and validation.

pub mod jwt;
