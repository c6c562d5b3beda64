use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Implemented by every type a response body can be mapped into.
///
/// The serde attributes on the type are its wire codec; this impl is what
/// makes the type known to [`ResponseMapper`](crate::api::mapper::ResponseMapper).
pub trait ApiResponse: serde::de::DeserializeOwned {
    const TYPE_NAME: &'static str;
}

/// Results that carry the request id used for search tracking.
pub trait SearchResponse {
    fn req_id(&self) -> Option<&str>;
}

macro_rules! api_response {
    ($($ty:ty),+ $(,)?) => {
        $(impl ApiResponse for $ty {
            const TYPE_NAME: &'static str = stringify!($ty);
        })+
    };
}

/// Custom deserializer: ids arrive as numbers or strings
fn deserialize_lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::String(s) if !s.is_empty() => Ok(Some(s)),
        _ => Ok(None),
    }
}

/// Custom deserializer: timestamps like `2015-05-19T03:39:19.000+0000`.
/// Anything unparsable is treated as absent.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|s| parse_timestamp(&s)))
}

pub(crate) fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

/// Custom deserializer: `error` is an array, a single string, or null
fn deserialize_messages<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    fn text(value: Value) -> String {
        match value {
            Value::String(s) => s,
            other => other.to_string(),
        }
    }

    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items.into_iter().map(text).collect(),
        other => vec![text(other)],
    })
}

// Envelope shared by every response
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ResponseEnvelope {
    pub status: String,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default, deserialize_with = "deserialize_messages")]
    pub error: Vec<String>,
}

impl ResponseEnvelope {
    /// `OK` and `warning` both carry a usable result.
    pub fn is_success(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok") || self.status.eq_ignore_ascii_case("warning")
    }
}

// Data API models
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct InsertTrans {
    #[serde(default, deserialize_with = "deserialize_lenient_id")]
    pub trans_id: Option<String>,
    #[serde(default)]
    pub total: Option<u32>,
    #[serde(default)]
    pub error_list: Vec<InsertError>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct InsertError {
    #[serde(default)]
    pub error_code: Option<i32>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub im_name: Option<String>,
    #[serde(default)]
    pub index: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct InsertStatus {
    #[serde(default, deserialize_with = "deserialize_lenient_id")]
    pub trans_id: Option<String>,
    #[serde(default)]
    pub processed_percent: Option<u32>,
    #[serde(default)]
    pub total: Option<u32>,
    #[serde(default)]
    pub success_count: Option<u32>,
    #[serde(default)]
    pub fail_count: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub update_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub error_page: Option<u32>,
    #[serde(default)]
    pub error_limit: Option<u32>,
    #[serde(default)]
    pub error_list: Vec<InsertError>,
}

impl InsertStatus {
    pub fn is_complete(&self) -> bool {
        self.processed_percent == Some(100)
    }
}

/// `/insert/status` wraps the status in a one-element `result` list.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct InsertStatusList {
    #[serde(default)]
    pub result: Vec<InsertStatus>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct RemoveStatus {
    #[serde(default)]
    pub total: Option<u32>,
}

// Search API models
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ImageResult {
    pub im_name: String,
    #[serde(default)]
    pub im_url: Option<String>,
    #[serde(default)]
    pub score: Option<f32>,
    #[serde(default, rename = "value_map")]
    pub metadata: HashMap<String, Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Facet {
    pub key: String,
    #[serde(default)]
    pub items: Vec<FacetItem>,
    #[serde(default)]
    pub range: Option<FacetRange>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FacetItem {
    pub value: String,
    #[serde(default)]
    pub count: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FacetRange {
    #[serde(default)]
    pub min: Option<Value>,
    #[serde(default)]
    pub max: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct PagedSearchResult {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub total: Option<u32>,
    #[serde(default)]
    pub result: Vec<ImageResult>,
    #[serde(default)]
    pub facets: Vec<Facet>,
    #[serde(default, rename = "qinfo")]
    pub query_info: HashMap<String, Value>,
    #[serde(default, rename = "reqid", deserialize_with = "deserialize_lenient_id")]
    pub req_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GroupImageResult {
    #[serde(default)]
    pub group_by_value: Option<String>,
    #[serde(default)]
    pub result: Vec<ImageResult>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ObjectResult {
    #[serde(default, rename = "type")]
    pub object_type: Option<String>,
    #[serde(default)]
    pub score: Option<f32>,
    /// `[x1, y1, x2, y2]` in pixels of the uploaded image
    #[serde(default, rename = "box")]
    pub bounding_box: Vec<i32>,
    #[serde(default)]
    pub total: Option<u32>,
    #[serde(default)]
    pub result: Vec<ImageResult>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct PagedSearchGroupResult {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub total: Option<u32>,
    #[serde(default)]
    pub group_by_key: Option<String>,
    #[serde(default)]
    pub group_results: Vec<GroupImageResult>,
    #[serde(default)]
    pub objects: Vec<ObjectResult>,
    #[serde(default, rename = "reqid", deserialize_with = "deserialize_lenient_id")]
    pub req_id: Option<String>,
}

impl SearchResponse for PagedSearchResult {
    fn req_id(&self) -> Option<&str> {
        self.req_id.as_deref()
    }
}

impl SearchResponse for PagedSearchGroupResult {
    fn req_id(&self) -> Option<&str> {
        self.req_id.as_deref()
    }
}

api_response!(
    ResponseEnvelope,
    InsertTrans,
    InsertStatusList,
    RemoveStatus,
    PagedSearchResult,
    PagedSearchGroupResult,
);

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_envelope_error_shapes() {
        let envelope: ResponseEnvelope =
            serde_json::from_str(r#"{"status":"fail","error":["a","b"]}"#).unwrap();
        assert_eq!(envelope.error, vec!["a", "b"]);
        assert!(!envelope.is_success());

        let envelope: ResponseEnvelope =
            serde_json::from_str(r#"{"status":"fail","error":"single"}"#).unwrap();
        assert_eq!(envelope.error, vec!["single"]);

        let envelope: ResponseEnvelope =
            serde_json::from_str(r#"{"status":"OK","error":null}"#).unwrap();
        assert!(envelope.error.is_empty());
        assert!(envelope.is_success());
    }

    #[test]
    fn test_envelope_status_is_mandatory() {
        let result = serde_json::from_str::<ResponseEnvelope>(r#"{"method":"search"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_insert_trans_id_number_or_string() {
        let trans: InsertTrans =
            serde_json::from_str(r#"{"status":"OK","trans_id":12345,"total":2}"#).unwrap();
        assert_eq!(trans.trans_id.as_deref(), Some("12345"));
        assert_eq!(trans.total, Some(2));
        assert!(trans.error_list.is_empty());

        let trans: InsertTrans = serde_json::from_str(r#"{"trans_id":"abc"}"#).unwrap();
        assert_eq!(trans.trans_id.as_deref(), Some("abc"));
    }

    #[test]
    fn test_insert_status_timestamps() {
        let json = r#"{
            "trans_id": 1,
            "processed_percent": 100,
            "start_time": "2015-05-19T03:39:19.000+0000",
            "update_time": "not a time",
            "error_list": [{"error_code": 201, "error_message": "Could not download", "im_name": "a", "index": 0}]
        }"#;
        let status: InsertStatus = serde_json::from_str(json).unwrap();
        assert!(status.is_complete());

        let start = status.start_time.expect("start_time should parse");
        assert_eq!(start.year(), 2015);
        assert_eq!(start.hour(), 3);
        assert!(status.update_time.is_none());
        assert_eq!(status.error_list[0].error_code, Some(201));
    }

    #[test]
    fn test_parse_timestamp_rfc3339() {
        let ts = parse_timestamp("2020-01-02T03:04:05Z").expect("should parse");
        assert_eq!(ts.day(), 2);
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_search_result_renames_and_ignores_unknown_fields() {
        let json = r#"{
            "status": "OK",
            "method": "search",
            "page": 1,
            "limit": 10,
            "total": 2,
            "result": [
                {"im_name": "shoe-1", "score": 0.93, "value_map": {"brand": "acme", "price": 10}},
                {"im_name": "shoe-2"}
            ],
            "qinfo": {"im_name": "shoe-0"},
            "reqid": "r1",
            "brand_new_field": true
        }"#;

        let result: PagedSearchResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.total, Some(2));
        assert_eq!(result.result.len(), 2);
        assert_eq!(result.result[0].metadata["brand"], "acme");
        assert!(result.result[1].score.is_none());
        assert_eq!(result.query_info["im_name"], "shoe-0");
        assert_eq!(SearchResponse::req_id(&result), Some("r1"));
        assert!(result.facets.is_empty());
    }

    #[test]
    fn test_image_result_im_name_is_mandatory() {
        let result = serde_json::from_str::<ImageResult>(r#"{"score": 0.5}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_facets() {
        let json = r#"{
            "facets": [
                {"key": "brand", "items": [{"value": "acme", "count": 3}]},
                {"key": "price", "range": {"min": 1, "max": 99.5}}
            ]
        }"#;
        let result: PagedSearchResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.facets[0].items[0].count, Some(3));
        let range = result.facets[1].range.as_ref().expect("range expected");
        assert_eq!(range.max, Some(serde_json::json!(99.5)));
    }

    #[test]
    fn test_group_result_objects() {
        let json = r#"{
            "group_by_key": "sku",
            "group_results": [{"group_by_value": "s1", "result": [{"im_name": "a"}]}],
            "objects": [{"type": "top", "score": 0.8, "box": [1, 2, 30, 40], "result": [{"im_name": "b"}]}],
            "reqid": 42
        }"#;
        let result: PagedSearchGroupResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.group_results[0].result[0].im_name, "a");
        assert_eq!(result.objects[0].object_type.as_deref(), Some("top"));
        assert_eq!(result.objects[0].bounding_box, vec![1, 2, 30, 40]);
        assert_eq!(SearchResponse::req_id(&result), Some("42"));
    }

    #[test]
    fn test_type_names() {
        assert_eq!(PagedSearchResult::TYPE_NAME, "PagedSearchResult");
        assert_eq!(InsertTrans::TYPE_NAME, "InsertTrans");
    }
}
