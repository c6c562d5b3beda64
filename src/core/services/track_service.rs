use super::traits::TrackOperations;
use crate::Result;
use crate::api::params::RequestParams;
use crate::api::transport::HttpTransport;
use std::sync::Arc;
use tracing::debug;

const TRACK_PATH: &str = "/__aq.gif";

/// Tracking API service. The endpoint answers with a pixel; the body is
/// discarded.
pub struct TrackService {
    transport: Arc<dyn HttpTransport>,
}

impl TrackService {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }
}

impl TrackOperations for TrackService {
    fn send_event(&self, params: &RequestParams) -> Result<()> {
        debug!(action = params.get_first("action"), "sending tracking event");
        self.transport.get(TRACK_PATH, params)?;
        Ok(())
    }
}
