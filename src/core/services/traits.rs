use crate::Result;
use crate::api::models::{
    InsertStatus, InsertTrans, PagedSearchGroupResult, PagedSearchResult, RemoveStatus,
};
use crate::api::params::RequestParams;
use crate::core::services::types::{ColorSearchParams, Image, SearchParams, UploadSearchParams};

/// Data API: `/insert`, `/insert/status`, `/remove`
pub trait DataOperations: Send + Sync {
    /// Index a batch of images.
    fn insert(&self, images: &[Image]) -> Result<InsertTrans> {
        self.insert_with_params(images, &RequestParams::new())
    }

    /// Index a batch of images, sending `custom` alongside the image fields.
    fn insert_with_params(&self, images: &[Image], custom: &RequestParams) -> Result<InsertTrans>;

    /// Progress of an insert transaction.
    fn insert_status(&self, trans_id: &str) -> Result<InsertStatus> {
        self.insert_status_with_errors(trans_id, None, None)
    }

    /// Progress of an insert transaction, with one page of its error list.
    fn insert_status_with_errors(
        &self,
        trans_id: &str,
        error_page: Option<u32>,
        error_limit: Option<u32>,
    ) -> Result<InsertStatus>;

    /// Remove images by `im_name`.
    fn remove(&self, im_names: &[String]) -> Result<RemoveStatus>;
}

/// Search API: `/search`, `/recommendation`, `/colorsearch`,
/// `/uploadsearch`, `/similarproducts`
pub trait SearchOperations: Send + Sync {
    fn search(&self, params: &SearchParams) -> Result<PagedSearchResult>;

    fn recommendation(&self, params: &SearchParams) -> Result<PagedSearchResult>;

    fn color_search(&self, params: &ColorSearchParams) -> Result<PagedSearchResult>;

    fn upload_search(&self, params: &UploadSearchParams) -> Result<PagedSearchResult>;

    /// Detect objects in the query image and search each of them.
    fn similar_products_search(&self, params: &UploadSearchParams)
    -> Result<PagedSearchGroupResult>;
}

/// Tracking API
pub trait TrackOperations: Send + Sync {
    fn send_event(&self, params: &RequestParams) -> Result<()>;
}
