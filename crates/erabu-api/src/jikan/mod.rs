pub mod client;
pub mod error;
pub mod pacer;
pub mod types;

pub use client::JikanClient;
pub use error::JikanError;
pub use pacer::RequestPacer;
