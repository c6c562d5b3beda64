//! Request parameters and image payloads
//!
//! [`RequestParams`] is the multi-valued key/value mapping every transport
//! call takes. A key may appear more than once (`fl`, `fq`, `facets`) and
//! each occurrence is sent as its own query or form field.

use std::fmt;
use std::path::{Path, PathBuf};

/// Multi-valued string mapping used for query strings, form bodies and
/// the text fields of multipart requests. Insertion order is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    pairs: Vec<(String, String)>,
}

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value under `key`, keeping any values already stored there.
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        self.pairs.push((key.into(), value.to_string()));
        self
    }

    pub fn insert_opt<T: ToString>(&mut self, key: &str, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            self.insert(key, value);
        }
        self
    }

    pub fn insert_all<I, T>(&mut self, key: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        for value in values {
            self.insert(key, value);
        }
        self
    }

    /// Append every pair from `other`.
    pub fn extend(&mut self, other: RequestParams) -> &mut Self {
        self.pairs.extend(other.pairs);
        self
    }

    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_first(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Flat pair slice, as accepted by `RequestBuilder::query` and `form`.
    pub fn as_pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RequestParams
where
    K: Into<String>,
    V: ToString,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = RequestParams::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

impl IntoIterator for RequestParams {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.into_iter()
    }
}

/// The binary `image` part of a multipart request.
///
/// Exactly one source backs the part, so a request can never carry both a
/// file and a buffer, or neither.
#[derive(Clone, PartialEq, Eq)]
pub enum ImageSource {
    File(PathBuf),
    Bytes { data: Vec<u8>, filename: String },
}

impl ImageSource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        ImageSource::File(path.into())
    }

    pub fn bytes(data: impl Into<Vec<u8>>, filename: impl Into<String>) -> Self {
        ImageSource::Bytes {
            data: data.into(),
            filename: filename.into(),
        }
    }

    /// File name sent in the part's `Content-Disposition`.
    pub fn filename(&self) -> Option<&str> {
        match self {
            ImageSource::File(path) => path.file_name().and_then(|n| n.to_str()),
            ImageSource::Bytes { filename, .. } => Some(filename.as_str()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            ImageSource::File(path) => Some(path.as_path()),
            ImageSource::Bytes { .. } => None,
        }
    }
}

// Buffers can be megabytes; print their size instead of the content.
impl fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::File(path) => f.debug_tuple("File").field(path).finish(),
            ImageSource::Bytes { data, filename } => f
                .debug_struct("Bytes")
                .field("len", &data.len())
                .field("filename", filename)
                .finish(),
        }
    }
}
