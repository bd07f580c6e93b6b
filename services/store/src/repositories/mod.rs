//! Database repositories for the storefront service

pub mod spice;
pub mod user;

pub use spice::SpiceRepository;
pub use user::{UserRepository, is_unique_violation};
