//! The `ViSearch` facade: one object exposing data, search and tracking
//! operations, bound to a search endpoint and a tracking endpoint.

use crate::Result;
use crate::api::auth::Credentials;
use crate::api::mapper::ResponseMapper;
use crate::api::models::{
    InsertStatus, InsertTrans, PagedSearchGroupResult, PagedSearchResult, RemoveStatus,
    SearchResponse,
};
use crate::api::params::RequestParams;
use crate::api::transport::ViSearchHttpClient;
use crate::core::services::data_service::DataService;
use crate::core::services::search_service::SearchService;
use crate::core::services::track_service::TrackService;
use crate::core::services::traits::{DataOperations, SearchOperations, TrackOperations};
use crate::core::services::types::{ColorSearchParams, Image, SearchParams, UploadSearchParams};
use crate::storage::config::ClientConfig;
use std::sync::Arc;
use tracing::{debug, warn};

/// Tracking `action` values, one per search-family call.
pub mod actions {
    pub const SEARCH: &str = "search";
    pub const RECOMMENDATION: &str = "recommendation";
    pub const COLOR_SEARCH: &str = "colorsearch";
    pub const UPLOAD_SEARCH: &str = "uploadsearch";
    pub const SIMILAR_PRODUCTS_SEARCH: &str = "similarproductssearch";
}

/// ViSearch API client.
///
/// Every search-family call that returns a request id is followed by a
/// tracking event `{action, reqid}` sent to the tracking endpoint. A failing
/// tracking call is logged and never affects the search result.
///
/// ```no_run
/// use visearch::prelude::*;
///
/// # fn main() -> visearch::Result<()> {
/// let client = ViSearch::new(Credentials::new("access", "secret"), ClientConfig::default())?;
/// let result = client.search(&SearchParams::new("shoe-1"))?;
/// println!("{} results", result.result.len());
/// # Ok(())
/// # }
/// ```
pub struct ViSearch {
    data: Box<dyn DataOperations>,
    search: Box<dyn SearchOperations>,
    track: Box<dyn TrackOperations>,
}

impl ViSearch {
    /// Build a client with its two transports and a shared response mapper.
    ///
    /// Fails with a `ConfigError` if an endpoint is invalid, a key is empty
    /// or a pool size is zero. No request is made.
    pub fn new(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let search_transport = Arc::new(ViSearchHttpClient::new(
            &config.endpoint,
            credentials.clone(),
            &config,
        )?);
        let track_transport = Arc::new(ViSearchHttpClient::new(
            &config.tracking_endpoint,
            credentials,
            &config,
        )?);
        let mapper = Arc::new(ResponseMapper::new());

        debug!(
            endpoint = %config.endpoint,
            tracking_endpoint = %config.tracking_endpoint,
            "created ViSearch client"
        );

        Ok(Self::with_operations(
            Box::new(DataService::new(search_transport.clone(), mapper.clone())),
            Box::new(SearchService::new(search_transport, mapper)),
            Box::new(TrackService::new(track_transport)),
        ))
    }

    /// Assemble a client from arbitrary operation implementations.
    pub fn with_operations(
        data: Box<dyn DataOperations>,
        search: Box<dyn SearchOperations>,
        track: Box<dyn TrackOperations>,
    ) -> Self {
        Self {
            data,
            search,
            track,
        }
    }

    fn track_search<R: SearchResponse>(&self, action: &str, result: &R) {
        let Some(req_id) = result.req_id().filter(|id| !id.is_empty()) else {
            return;
        };

        let mut params = RequestParams::new();
        params.insert("action", action).insert("reqid", req_id);

        if let Err(e) = self.track.send_event(&params) {
            warn!(action, req_id, error = %e, "failed to send tracking event");
        }
    }

    fn tracked<R: SearchResponse>(&self, action: &str, result: Result<R>) -> Result<R> {
        if let Ok(result) = &result {
            self.track_search(action, result);
        }
        result
    }
}

impl DataOperations for ViSearch {
    fn insert_with_params(&self, images: &[Image], custom: &RequestParams) -> Result<InsertTrans> {
        self.data.insert_with_params(images, custom)
    }

    fn insert_status_with_errors(
        &self,
        trans_id: &str,
        error_page: Option<u32>,
        error_limit: Option<u32>,
    ) -> Result<InsertStatus> {
        self.data
            .insert_status_with_errors(trans_id, error_page, error_limit)
    }

    fn remove(&self, im_names: &[String]) -> Result<RemoveStatus> {
        self.data.remove(im_names)
    }
}

impl SearchOperations for ViSearch {
    fn search(&self, params: &SearchParams) -> Result<PagedSearchResult> {
        self.tracked(actions::SEARCH, self.search.search(params))
    }

    fn recommendation(&self, params: &SearchParams) -> Result<PagedSearchResult> {
        self.tracked(actions::RECOMMENDATION, self.search.recommendation(params))
    }

    fn color_search(&self, params: &ColorSearchParams) -> Result<PagedSearchResult> {
        self.tracked(actions::COLOR_SEARCH, self.search.color_search(params))
    }

    fn upload_search(&self, params: &UploadSearchParams) -> Result<PagedSearchResult> {
        self.tracked(actions::UPLOAD_SEARCH, self.search.upload_search(params))
    }

    fn similar_products_search(
        &self,
        params: &UploadSearchParams,
    ) -> Result<PagedSearchGroupResult> {
        self.tracked(
            actions::SIMILAR_PRODUCTS_SEARCH,
            self.search.similar_products_search(params),
        )
    }
}

impl TrackOperations for ViSearch {
    fn send_event(&self, params: &RequestParams) -> Result<()> {
        self.track.send_event(params)
    }
}
