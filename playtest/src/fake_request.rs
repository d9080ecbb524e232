use crate::{
    request::{Cookie, Cookies, Headers, Request, RequestHeader},
    uri,
};
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct FakeRequest<B> {
    method: String,
    path: String,
    params: BTreeMap<String, Vec<String>>,
    headers: Headers,
    cookies: Cookies,
    body: B,
    scheme: String,
    host: String,
}

impl<B: Default> FakeRequest<B> {
    pub fn new<S1: Into<String>, S2: Into<String>>(method: S1, path: S2) -> Self {
        Self::with_parts(method, path, B::default())
    }
}

impl<B> FakeRequest<B> {
    pub fn with_parts<S1: Into<String>, S2: Into<String>>(method: S1, path: S2, body: B) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            params: BTreeMap::new(),
            headers: Headers::new(),
            cookies: Cookies::new(),
            body,
            scheme: String::from("http"),
            host: String::from("localhost"),
        }
    }

    pub fn with_body<T>(self, body: T) -> FakeRequest<T> {
        FakeRequest {
            method: self.method,
            path: self.path,
            params: self.params,
            headers: self.headers,
            cookies: self.cookies,
            body,
            scheme: self.scheme,
            host: self.host,
        }
    }

    pub fn with_param<K: Into<String>, V: ToString>(mut self, key: K, value: V) -> Self {
        self.params
            .entry(key.into())
            .or_default()
            .push(value.to_string());
        self
    }

    pub fn with_header<S1: Into<String>, S2: Into<String>>(mut self, key: S1, value: S2) -> Self {
        self.headers.append(key, value);
        self
    }

    pub fn with_cookie(mut self, cookie: Cookie) -> Self {
        self.cookies.insert(cookie);
        self
    }

    pub fn with_scheme<S: Into<String>>(mut self, scheme: S) -> Self {
        self.scheme = scheme.into();
        self
    }

    pub fn with_host<S: Into<String>>(mut self, host: S) -> Self {
        self.host = host.into();
        self
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }
}

impl<B> RequestHeader for FakeRequest<B> {
    fn method(&self) -> &str {
        &self.method
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn uri(&self) -> String {
        uri::build(&self.scheme, &self.host, &self.path, &self.params)
    }

    fn query_string(&self) -> &BTreeMap<String, Vec<String>> {
        &self.params
    }

    fn headers(&self) -> &Headers {
        &self.headers
    }

    fn cookies(&self) -> &Cookies {
        &self.cookies
    }

    fn host(&self) -> &str {
        &self.host
    }

    fn secure(&self) -> bool {
        self.scheme == "https"
    }
}

impl<B> Request for FakeRequest<B> {
    type Body = B;

    fn body(&self) -> &B {
        &self.body
    }
}
