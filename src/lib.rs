pub mod client;
pub mod config;
pub mod error;
pub mod extractor;
pub mod model;
pub mod server;

pub use error::{ApiError, ExtractError, StorageError};
pub use extractor::{Extractor, PlatformExtractor, Upstream};
pub use model::{MediaMeta, MediaResult, MediaSource, MediaType, Platform};
