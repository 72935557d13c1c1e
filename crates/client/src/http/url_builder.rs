//! URL building for JSON:API resource endpoints

use url::Url;

use crate::ClientResult;

/// Builds resource URLs below the API base, e.g.
/// `{base}/node/article/{id}/field_tags`.
#[derive(Debug)]
pub struct UrlBuilder<'a> {
    base: &'a Url,
    parts: Vec<String>,
}

impl<'a> UrlBuilder<'a> {
    pub fn new(base: &'a Url) -> Self {
        Self {
            base,
            parts: Vec::new(),
        }
    }

    /// Add a resource path such as `node/article`, taken as-is.
    pub fn resource_path(mut self, path: &str) -> Self {
        let path = path.trim_matches('/');
        if !path.is_empty() {
            self.parts.push(path.to_string());
        }
        self
    }

    /// Add a single path segment, percent-encoded.
    pub fn segment(mut self, segment: &str) -> Self {
        if !segment.is_empty() {
            self.parts.push(urlencoding::encode(segment).into_owned());
        }
        self
    }

    pub fn build(self) -> ClientResult<Url> {
        let base = self.base.as_str().trim_end_matches('/');
        if self.parts.is_empty() {
            return Ok(Url::parse(base)?);
        }
        Ok(Url::parse(&format!("{}/{}", base, self.parts.join("/")))?)
    }
}
