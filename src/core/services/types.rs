use crate::api::params::{ImageSource, RequestParams};
use crate::error::ParamError;
use crate::utils::validation::{normalize_hex_color, require_non_empty};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// An image to index, with optional metadata columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Image {
    pub im_name: String,
    pub im_url: Option<String>,
    pub metadata: BTreeMap<String, String>,
}

impl Image {
    pub fn new(im_name: impl Into<String>, im_url: impl Into<String>) -> Self {
        Self {
            im_name: im_name.into(),
            im_url: Some(im_url.into()),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Append this image's fields as `im_name[index]`, `im_url[index]`, `<key>[index]`.
    pub fn write_params(&self, index: usize, params: &mut RequestParams) -> Result<(), ParamError> {
        require_non_empty("im_name", &self.im_name)?;
        params.insert(format!("im_name[{}]", index), &self.im_name);
        if let Some(url) = &self.im_url {
            params.insert(format!("im_url[{}]", index), url);
        }
        for (key, value) in &self.metadata {
            params.insert(format!("{}[{}]", key, index), value);
        }
        Ok(())
    }
}

/// Paging, filtering and scoring options shared by every search call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BaseSearchParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    /// Metadata fields to return (`fl`)
    pub fl: Vec<String>,
    /// Metadata filters, sent as `fq=key:value`
    pub fq: BTreeMap<String, String>,
    pub score: bool,
    pub score_min: Option<f32>,
    pub score_max: Option<f32>,
    pub get_all_fl: bool,
    pub qinfo: bool,
    pub facets: Vec<String>,
    pub facets_limit: Option<u32>,
    pub facets_show_count: bool,
    pub dedup: Option<bool>,
    /// Extra pairs passed through untouched
    pub custom: RequestParams,
}

impl BaseSearchParams {
    pub fn to_params(&self) -> Result<RequestParams, ParamError> {
        if let (Some(min), Some(max)) = (self.score_min, self.score_max) {
            if min > max {
                return Err(ParamError::Invalid {
                    field: "score_min".to_string(),
                    reason: format!("score_min {} is greater than score_max {}", min, max),
                });
            }
        }

        let mut params = RequestParams::new();
        params
            .insert_opt("page", self.page)
            .insert_opt("limit", self.limit)
            .insert_all("fl", &self.fl)
            .insert_all("fq", self.fq.iter().map(|(k, v)| format!("{}:{}", k, v)));
        if self.score {
            params.insert("score", true);
        }
        params
            .insert_opt("score_min", self.score_min)
            .insert_opt("score_max", self.score_max);
        if self.get_all_fl {
            params.insert("get_all_fl", true);
        }
        if self.qinfo {
            params.insert("qinfo", true);
        }
        params
            .insert_all("facets", &self.facets)
            .insert_opt("facets_limit", self.facets_limit);
        if self.facets_show_count {
            params.insert("facets_show_count", true);
        }
        params.insert_opt("dedup", self.dedup);
        params.extend(self.custom.clone());
        Ok(params)
    }
}

/// Search by an image already indexed in the app.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchParams {
    pub im_name: String,
    pub base: BaseSearchParams,
}

impl SearchParams {
    pub fn new(im_name: impl Into<String>) -> Self {
        Self {
            im_name: im_name.into(),
            base: BaseSearchParams::default(),
        }
    }

    pub fn to_params(&self) -> Result<RequestParams, ParamError> {
        require_non_empty("im_name", &self.im_name)?;
        let mut params = self.base.to_params()?;
        params.insert("im_name", &self.im_name);
        Ok(params)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorSearchParams {
    /// Six digit hex color, with or without a leading `#`
    pub color: String,
    pub base: BaseSearchParams,
}

impl ColorSearchParams {
    pub fn new(color: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            base: BaseSearchParams::default(),
        }
    }

    pub fn to_params(&self) -> Result<RequestParams, ParamError> {
        let color = normalize_hex_color(&self.color)?;
        let mut params = self.base.to_params()?;
        params.insert("color", color);
        Ok(params)
    }
}

/// What an upload search is run against.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadSource {
    Image(ImageSource),
    Url(String),
    /// Id of an image uploaded in an earlier search
    ImId(String),
}

/// Region of the query image to search with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl BoundingBox {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.x1, self.y1, self.x2, self.y2)
    }
}

impl FromStr for BoundingBox {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParamError::Invalid {
            field: "box".to_string(),
            reason: format!("'{}' is not in x1,y1,x2,y2 form", s),
        };
        let coords = s
            .split(',')
            .map(|part| part.trim().parse::<i32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| invalid())?;
        match coords.as_slice() {
            [x1, y1, x2, y2] => Ok(BoundingBox::new(*x1, *y1, *x2, *y2)),
            _ => Err(invalid()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadSearchParams {
    pub source: UploadSource,
    pub bounding_box: Option<BoundingBox>,
    /// Object detection type, e.g. `all` or `top`
    pub detection: Option<String>,
    pub base: BaseSearchParams,
}

impl UploadSearchParams {
    pub fn new(source: UploadSource) -> Self {
        Self {
            source,
            bounding_box: None,
            detection: None,
            base: BaseSearchParams::default(),
        }
    }

    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self::new(UploadSource::Image(ImageSource::file(path)))
    }

    pub fn from_bytes(data: impl Into<Vec<u8>>, filename: impl Into<String>) -> Self {
        Self::new(UploadSource::Image(ImageSource::bytes(data, filename)))
    }

    pub fn from_url(im_url: impl Into<String>) -> Self {
        Self::new(UploadSource::Url(im_url.into()))
    }

    pub fn from_im_id(im_id: impl Into<String>) -> Self {
        Self::new(UploadSource::ImId(im_id.into()))
    }

    /// The image to send as a multipart part, if any.
    pub fn image(&self) -> Option<&ImageSource> {
        match &self.source {
            UploadSource::Image(image) => Some(image),
            _ => None,
        }
    }

    /// Text fields of the request; the image itself is not included.
    pub fn to_params(&self) -> Result<RequestParams, ParamError> {
        let mut params = self.base.to_params()?;
        match &self.source {
            UploadSource::Image(_) => {}
            UploadSource::Url(url) => {
                require_non_empty("im_url", url)?;
                params.insert("im_url", url);
            }
            UploadSource::ImId(im_id) => {
                require_non_empty("im_id", im_id)?;
                params.insert("im_id", im_id);
            }
        }
        params
            .insert_opt("box", self.bounding_box)
            .insert_opt("detection", self.detection.as_deref());
        Ok(params)
    }
}
