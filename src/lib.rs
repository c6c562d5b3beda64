//! Client SDK for the ViSearch image search API.
//!
//! [`ViSearch`] is the entry point. It is built from [`Credentials`] and a
//! [`ClientConfig`], and exposes the data, search and tracking operations
//! through the [`DataOperations`], [`SearchOperations`] and
//! [`TrackOperations`] traits. All calls are blocking.
//!
//! ```no_run
//! use visearch::prelude::*;
//!
//! # fn main() -> visearch::Result<()> {
//! let client = ViSearch::new(
//!     Credentials::new("access_key", "secret_key"),
//!     ClientConfig::default(),
//! )?;
//!
//! client.insert(&[Image::new("shoe-1", "http://example.com/shoe-1.jpg")])?;
//!
//! let similar = client.search(&SearchParams::new("shoe-1"))?;
//! for image in &similar.result {
//!     println!("{} {:?}", image.im_name, image.score);
//! }
//! # Ok(())
//! # }
//! ```

pub use crate::api::auth::Credentials;
pub use crate::core::client::ViSearch;
pub use crate::core::services::traits::{DataOperations, SearchOperations, TrackOperations};
pub use crate::error::ViSearchError;
pub use crate::storage::config::ClientConfig;

/// Main architecture layers (dependency flow: CLI → Core → API)
pub mod cli; // Command-line interface
pub mod core; // Operation facades and the ViSearch client
pub mod storage; // Client configuration and the CLI settings file

/// Support modules (used across layers)
pub mod api; // HTTP transport and response mapping
pub mod display; // Output formatting
pub mod error; // Error handling
pub mod utils; // Shared utilities and helpers

pub type Result<T> = std::result::Result<T, ViSearchError>;

/// Everything needed to build a client and call it.
pub mod prelude {
    pub use crate::api::auth::Credentials;
    pub use crate::api::models::{
        ImageResult, InsertStatus, InsertTrans, PagedSearchGroupResult, PagedSearchResult,
        RemoveStatus,
    };
    pub use crate::api::params::{ImageSource, RequestParams};
    pub use crate::core::client::ViSearch;
    pub use crate::core::services::traits::{DataOperations, SearchOperations, TrackOperations};
    pub use crate::core::services::types::{
        BaseSearchParams, BoundingBox, ColorSearchParams, Image, SearchParams, UploadSearchParams,
        UploadSource,
    };
    pub use crate::error::ViSearchError;
    pub use crate::storage::config::ClientConfig;
}
