pub mod client;
pub mod error;
pub mod types;

pub use client::{TmdbClient, IMAGE_BASE_URL};
pub use error::TmdbError;
