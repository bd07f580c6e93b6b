//! Common library for the Spicestore backend
//!
//! This crate provides shared functionality used across the Spicestore
//! services, including database connectivity and error handling.

pub mod database;
pub mod error;
