use url::Url;

use super::Method;
use crate::Credentials;

/// A fully serialized request, ready to hand to a [`super::Transport`].
#[derive(Debug, Clone, PartialEq)]
pub struct JsonApiRequest {
    method: Method,
    url: Url,
    headers: Vec<(String, String)>,
    query: Vec<(String, String)>,
    basic_auth: Option<Credentials>,
}

impl JsonApiRequest {
    pub fn new(
        method: Method,
        url: Url,
        headers: Vec<(String, String)>,
        query: Vec<(String, String)>,
        basic_auth: Option<Credentials>,
    ) -> Self {
        Self {
            method,
            url,
            headers,
            query,
            basic_auth,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The target URL without query string.
    pub fn base_url(&self) -> &Url {
        &self.url
    }

    /// The target URL with every query pair encoded.
    pub fn url(&self) -> Url {
        let mut url = self.url.clone();
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }
        url
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Decoded query pairs in the order they are sent.
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn basic_auth(&self) -> Option<&Credentials> {
        self.basic_auth.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_encodes_brackets() {
        let request = JsonApiRequest::new(
            Method::GET,
            Url::parse("https://cms.test/jsonapi/node/article").unwrap(),
            Vec::new(),
            vec![("fields[node--article]".to_string(), "title,body".to_string())],
            None,
        );

        let url = request.url();
        assert_eq!(
            url.as_str(),
            "https://cms.test/jsonapi/node/article?fields%5Bnode--article%5D=title%2Cbody"
        );
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(pairs, request.query());
    }
}
