use tracing::debug;

use crate::Document;

/// Outcome of a request that reached the server: a status code and, when the
/// body was a JSON:API document, the parsed document.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonApiResponse {
    status: u16,
    document: Option<Document>,
}

impl JsonApiResponse {
    pub fn new(status: u16, document: Option<Document>) -> Self {
        Self { status, document }
    }

    /// Parse a response body. A body that is empty or not a JSON:API
    /// document leaves the response without a document.
    pub fn from_body(status: u16, body: &[u8]) -> Self {
        if body.is_empty() {
            return Self::new(status, None);
        }

        let document = match Document::from_slice(body) {
            Ok(document) => Some(document),
            Err(err) => {
                debug!(status, error = %err, "response body is not a JSON:API document");
                None
            }
        };
        Self::new(status, document)
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn into_document(self) -> Option<Document> {
        self.document
    }

    /// Whether the status is one of `codes` and a document without top-level
    /// errors came back.
    pub fn is_successful(&self, codes: &[u16]) -> bool {
        codes.contains(&self.status)
            && self
                .document
                .as_ref()
                .is_some_and(|document| !document.has_errors())
    }

    /// The document when the response was a successful `200`.
    pub fn successful_document(&self) -> Option<&Document> {
        if self.is_successful(&[200]) {
            self.document()
        } else {
            None
        }
    }
}
