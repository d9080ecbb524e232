use crate::{results::SimpleResult, util};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedResult {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub cookies: Vec<String>,
    pub body: String,
}

impl ExtractedResult {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// The `Set-Cookie` value for the cookie called `name`.
    pub fn set_cookie(&self, name: &str) -> Option<&str> {
        self.cookies
            .iter()
            .find(|cookie| cookie.split('=').next() == Some(name))
            .map(String::as_str)
    }
}

impl From<SimpleResult> for ExtractedResult {
    fn from(result: SimpleResult) -> Self {
        let status = result.status().as_u16();
        let headers = util::extract_headers(result.headers());
        let cookies = util::extract_set_cookies(result.headers());

        Self {
            status,
            headers,
            cookies,
            body: result.into_body(),
        }
    }
}
