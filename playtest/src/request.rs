use crate::error::Error;
use std::collections::{BTreeMap, HashMap};

/// Request headers keyed by the exact header name, no case folding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    data: HashMap<String, Vec<String>>,
}

impl Headers {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    pub fn from_map(data: HashMap<String, Vec<String>>) -> Self {
        Self { data }
    }

    /// Every value recorded for `key`.
    ///
    /// Callers that treat the header as optional must check
    /// [`Headers::contains_key`] first: a missing key is an error.
    pub fn get_all(&self, key: &str) -> Result<&[String], Error> {
        self.data
            .get(key)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::HeaderNotFound(key.into()))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.data
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.data.keys()
    }

    pub(crate) fn append<S1: Into<String>, S2: Into<String>>(&mut self, key: S1, value: S2) {
        self.data.entry(key.into()).or_default().push(value.into());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub max_age: Option<i64>,
    pub path: String,
    pub domain: Option<String>,
    pub secure: bool,
    pub http_only: bool,
}

impl Cookie {
    pub fn new<S1: Into<String>, S2: Into<String>>(name: S1, value: S2) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            max_age: None,
            path: String::from("/"),
            domain: None,
            secure: false,
            http_only: true,
        }
    }

    /// A cookie that tells the client to drop `name`.
    pub fn discarding<S: Into<String>>(name: S) -> Self {
        Self {
            max_age: Some(0),
            ..Self::new(name, "")
        }
    }

    pub fn to_set_cookie(&self) -> String {
        let mut header = format!("{}={}", self.name, self.value);

        if let Some(max_age) = self.max_age {
            header.push_str(&format!("; Max-Age={}", max_age));
        }
        header.push_str(&format!("; Path={}", self.path));
        if let Some(domain) = &self.domain {
            header.push_str(&format!("; Domain={}", domain));
        }
        if self.secure {
            header.push_str("; Secure");
        }
        if self.http_only {
            header.push_str("; HttpOnly");
        }

        header
    }
}

/// Parses the value of a `Cookie` request header (`a=1; b=2`).
pub fn parse_cookie_header(header: &str) -> Vec<Cookie> {
    header
        .split(';')
        .filter_map(|pair| {
            let mut parts = pair.trim().splitn(2, '=');
            let name = parts.next()?.trim();
            let value = parts.next().unwrap_or("").trim();

            if name.is_empty() {
                None
            } else {
                Some(Cookie::new(name, value))
            }
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cookies {
    data: HashMap<String, Cookie>,
}

impl Cookies {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Cookie> {
        self.data.get(name)
    }

    pub(crate) fn insert(&mut self, cookie: Cookie) {
        self.data.insert(cookie.name.clone(), cookie);
    }
}

impl std::iter::FromIterator<Cookie> for Cookies {
    fn from_iter<I: IntoIterator<Item = Cookie>>(cookies: I) -> Self {
        let mut result = Cookies::new();
        for cookie in cookies {
            result.insert(cookie);
        }
        result
    }
}

pub trait RequestHeader {
    fn method(&self) -> &str;
    fn path(&self) -> &str;
    fn uri(&self) -> String;
    fn query_string(&self) -> &BTreeMap<String, Vec<String>>;
    fn headers(&self) -> &Headers;
    fn cookies(&self) -> &Cookies;
    fn host(&self) -> &str;
    fn secure(&self) -> bool;
}

pub trait Request: RequestHeader {
    type Body;

    fn body(&self) -> &Self::Body;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_header_is_an_error() {
        let mut headers = Headers::new();
        headers.append("Accept", "text/html");

        assert!(matches!(
            headers.get_all("accept"),
            Err(Error::HeaderNotFound(key)) if key == "accept"
        ));
        assert!(headers.get_all("X-Missing").is_err());
        assert_eq!(headers.get_all("Accept").unwrap(), ["text/html"]);
    }

    #[test]
    fn headers_keep_every_value_in_order() {
        let mut headers = Headers::new();
        headers.append("Accept", "text/html");
        headers.append("Accept", "application/json");

        assert_eq!(
            headers.get_all("Accept").unwrap(),
            ["text/html", "application/json"]
        );
        assert_eq!(headers.get("Accept"), Some("text/html"));
        assert!(headers.keys().any(|key| key == "Accept"));
    }

    #[test]
    fn missing_cookie_is_absent() {
        let cookies: Cookies = vec![Cookie::new("PLAY_SESSION", "abc")].into_iter().collect();

        assert_eq!(cookies.get("PLAY_SESSION").map(|c| c.value.as_str()), Some("abc"));
        assert!(cookies.get("PLAY_FLASH").is_none());
        assert!(Cookies::new().get("anything").is_none());
    }

    #[test]
    fn parses_cookie_header() {
        let cookies: Cookies = parse_cookie_header("a=1; b=x=y;; c").into_iter().collect();

        assert_eq!(cookies.get("a").unwrap().value, "1");
        assert_eq!(cookies.get("b").unwrap().value, "x=y");
        assert_eq!(cookies.get("c").unwrap().value, "");
    }

    #[test]
    fn renders_set_cookie() {
        assert_eq!(
            Cookie::new("PLAY_SESSION", "v").to_set_cookie(),
            "PLAY_SESSION=v; Path=/; HttpOnly"
        );
        assert_eq!(
            Cookie::discarding("PLAY_SESSION").to_set_cookie(),
            "PLAY_SESSION=; Max-Age=0; Path=/; HttpOnly"
        );
    }
}
