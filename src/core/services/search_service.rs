use super::traits::SearchOperations;
use super::types::{ColorSearchParams, SearchParams, UploadSearchParams};
use crate::Result;
use crate::api::mapper::ResponseMapper;
use crate::api::models::{ApiResponse, PagedSearchGroupResult, PagedSearchResult};
use crate::api::params::RequestParams;
use crate::api::transport::HttpTransport;
use std::sync::Arc;
use tracing::debug;

const SEARCH_PATH: &str = "/search";
const RECOMMENDATION_PATH: &str = "/recommendation";
const COLOR_SEARCH_PATH: &str = "/colorsearch";
const UPLOAD_SEARCH_PATH: &str = "/uploadsearch";
const SIMILAR_PRODUCTS_PATH: &str = "/similarproducts";

/// Search API service
pub struct SearchService {
    transport: Arc<dyn HttpTransport>,
    mapper: Arc<ResponseMapper>,
}

impl SearchService {
    pub fn new(transport: Arc<dyn HttpTransport>, mapper: Arc<ResponseMapper>) -> Self {
        Self { transport, mapper }
    }

    // `/search` and `/recommendation` take the same query; only the path differs.
    fn get_search<T: ApiResponse>(&self, path: &str, params: RequestParams) -> Result<T> {
        debug!(path, fields = params.len(), "search");
        let body = self.transport.get(path, &params)?;
        self.mapper.map(path, &body)
    }

    // Multipart when an image is attached, plain form otherwise.
    fn post_upload<T: ApiResponse>(&self, path: &str, upload: &UploadSearchParams) -> Result<T> {
        let params = upload.to_params()?;
        let body = match upload.image() {
            Some(image) => {
                debug!(path, image = ?image, "upload search with image");
                self.transport.post_image(path, &params, image)?
            }
            None => {
                debug!(path, "upload search by reference");
                self.transport.post(path, &params)?
            }
        };
        self.mapper.map(path, &body)
    }
}

impl SearchOperations for SearchService {
    fn search(&self, params: &SearchParams) -> Result<PagedSearchResult> {
        self.get_search(SEARCH_PATH, params.to_params()?)
    }

    fn recommendation(&self, params: &SearchParams) -> Result<PagedSearchResult> {
        self.get_search(RECOMMENDATION_PATH, params.to_params()?)
    }

    fn color_search(&self, params: &ColorSearchParams) -> Result<PagedSearchResult> {
        self.get_search(COLOR_SEARCH_PATH, params.to_params()?)
    }

    fn upload_search(&self, params: &UploadSearchParams) -> Result<PagedSearchResult> {
        self.post_upload(UPLOAD_SEARCH_PATH, params)
    }

    fn similar_products_search(
        &self,
        params: &UploadSearchParams,
    ) -> Result<PagedSearchGroupResult> {
        self.post_upload(SIMILAR_PRODUCTS_PATH, params)
    }
}
