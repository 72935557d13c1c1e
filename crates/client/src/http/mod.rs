//! HTTP plumbing: requests, responses and the transport seam

mod request;
mod response;
mod transport;
mod url_builder;

pub use request::JsonApiRequest;
pub use response::JsonApiResponse;
pub use transport::{HttpTransport, Transport};
pub use url_builder::UrlBuilder;

pub use reqwest::Method;
