//! Public API: the [`Colorizer`] builder and the crate error type.

mod builder;
mod error;

pub use builder::Colorizer;
pub use error::EnhanceError;
