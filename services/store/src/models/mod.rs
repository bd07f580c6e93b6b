//! Storefront service models

pub mod spice;
pub mod user;

// Re-export for convenience
pub use spice::{NewSpice, Spice, UpdateSpice};
pub use user::{NewUser, Role, User, UserView};
