//! HTTP request and response messages.

use rest_synth_types::HttpVerb;
use serde::{Deserialize, Serialize};

pub const CONTENT_TYPE_JSON: &str = "application/json";

/// An outgoing request built by the build-request frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpRequest {
    pub method: HttpVerb,
    /// Path (joined with the transport's base URL) or absolute URL.
    pub url: String,
    pub headers: Vec<(String, String)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    pub fn new(method: HttpVerb, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: vec![("Accept".to_string(), CONTENT_TYPE_JSON.to_string())],
            body: None,
        }
    }

    /// Attach a JSON body and the matching content type.
    pub fn with_json_body(mut self, body: Vec<u8>) -> Self {
        self.headers
            .push(("Content-Type".to_string(), CONTENT_TYPE_JSON.to_string()));
        self.body = Some(body);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// URL without its query string.
    pub fn path(&self) -> &str {
        self.url.split('?').next().unwrap_or(&self.url)
    }
}

/// A response returned by a transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        Self {
            status,
            headers: vec![("Content-Type".to_string(), CONTENT_TYPE_JSON.to_string())],
            body: value.to_string().into_bytes(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Body as lossy UTF-8, for error messages.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_body_sets_content_type() {
        let request = HttpRequest::new(HttpVerb::Post, "/widgets").with_json_body(b"{}".to_vec());
        assert_eq!(request.header("content-type"), Some(CONTENT_TYPE_JSON));
        assert_eq!(request.header("Accept"), Some(CONTENT_TYPE_JSON));

        let bare = HttpRequest::new(HttpVerb::Get, "/widgets/1?verbose=true");
        assert!(bare.body.is_none());
        assert!(bare.header("Content-Type").is_none());
        assert_eq!(bare.path(), "/widgets/1");
    }

    #[test]
    fn test_response_success_range() {
        assert!(HttpResponse::new(204, Vec::new()).is_success());
        assert!(!HttpResponse::new(302, Vec::new()).is_success());
        assert!(!HttpResponse::new(500, "boom").is_success());
        assert_eq!(HttpResponse::new(500, "boom").body_text(), "boom");
    }
}
