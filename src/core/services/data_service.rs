use super::traits::DataOperations;
use super::types::Image;
use crate::Result;
use crate::api::mapper::ResponseMapper;
use crate::api::models::{InsertStatus, InsertStatusList, InsertTrans, RemoveStatus};
use crate::api::params::RequestParams;
use crate::api::transport::HttpTransport;
use crate::error::{ParamError, ServiceError};
use crate::utils::validation::require_non_empty;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::sync::Arc;
use tracing::debug;

const INSERT_PATH: &str = "/insert";
const INSERT_STATUS_PATH: &str = "/insert/status";
const REMOVE_PATH: &str = "/remove";

/// Everything but RFC 3986 unreserved characters is escaped in a path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// `/insert/status/{trans_id}` with the id confined to one path segment.
fn insert_status_path(trans_id: &str) -> Result<String> {
    require_non_empty("trans_id", trans_id)?;
    if trans_id == "." || trans_id == ".." {
        return Err(ParamError::Invalid {
            field: "trans_id".to_string(),
            reason: format!("'{}' is not a transaction id", trans_id),
        }
        .into());
    }
    Ok(format!(
        "{}/{}",
        INSERT_STATUS_PATH,
        utf8_percent_encode(trans_id, PATH_SEGMENT)
    ))
}

/// Data API service
pub struct DataService {
    transport: Arc<dyn HttpTransport>,
    mapper: Arc<ResponseMapper>,
}

impl DataService {
    pub fn new(transport: Arc<dyn HttpTransport>, mapper: Arc<ResponseMapper>) -> Self {
        Self { transport, mapper }
    }
}

impl DataOperations for DataService {
    fn insert_with_params(&self, images: &[Image], custom: &RequestParams) -> Result<InsertTrans> {
        if images.is_empty() {
            return Err(ParamError::Missing {
                field: "images".to_string(),
            }
            .into());
        }

        let mut params = RequestParams::new();
        for (index, image) in images.iter().enumerate() {
            image.write_params(index, &mut params)?;
        }
        params.extend(custom.clone());

        debug!(count = images.len(), "inserting images");
        let body = self.transport.post(INSERT_PATH, &params)?;
        self.mapper.map(INSERT_PATH, &body)
    }

    fn insert_status_with_errors(
        &self,
        trans_id: &str,
        error_page: Option<u32>,
        error_limit: Option<u32>,
    ) -> Result<InsertStatus> {
        let path = insert_status_path(trans_id)?;
        let mut params = RequestParams::new();
        params
            .insert_opt("error_page", error_page)
            .insert_opt("error_limit", error_limit);

        let body = self.transport.get(&path, &params)?;
        let list: InsertStatusList = self.mapper.map(&path, &body)?;
        list.result.into_iter().next().ok_or_else(|| {
            ServiceError::EmptyResult {
                method: "insert/status".to_string(),
            }
            .into()
        })
    }

    fn remove(&self, im_names: &[String]) -> Result<RemoveStatus> {
        if im_names.is_empty() {
            return Err(ParamError::Missing {
                field: "im_name".to_string(),
            }
            .into());
        }

        let mut params = RequestParams::new();
        for (index, im_name) in im_names.iter().enumerate() {
            require_non_empty("im_name", im_name)?;
            params.insert(format!("im_name[{}]", index), im_name);
        }

        let body = self.transport.post(REMOVE_PATH, &params)?;
        self.mapper.map(REMOVE_PATH, &body)
    }
}
