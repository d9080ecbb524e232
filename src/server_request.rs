use crate::error::Error;
use hyper::{body, header, Body};
use login_app::{forms, FormBody};
use playtest::{parse_cookie_header, uri, util, Cookies, Headers, Request, RequestHeader};
use std::collections::{BTreeMap, HashMap};
use url::form_urlencoded;

#[derive(Debug)]
pub struct ServerRequest {
    method: String,
    path: String,
    query: BTreeMap<String, Vec<String>>,
    headers: Headers,
    cookies: Cookies,
    host: String,
    body: FormBody,
}

impl ServerRequest {
    pub async fn read(request: hyper::Request<Body>) -> Result<Self, Error> {
        let (parts, request_body) = request.into_parts();

        let mut query = BTreeMap::<String, Vec<String>>::new();
        if let Some(query_string) = parts.uri.query() {
            for (key, value) in form_urlencoded::parse(query_string.as_bytes()).into_owned() {
                query.entry(key).or_default().push(value);
            }
        }

        // it currently ignores header values with opaque characters
        let mut header_values = HashMap::<String, Vec<String>>::new();
        for (name, value) in parts.headers.iter() {
            if let Ok(value) = value.to_str() {
                header_values
                    .entry(util::canonical_header_name(name.as_str()))
                    .or_default()
                    .push(String::from(value));
            }
        }

        let cookies = parts
            .headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(parse_cookie_header)
            .collect();

        let host = parts
            .headers
            .get(header::HOST)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("localhost")
            .to_string();

        let bytes = body::to_bytes(request_body).await?;

        Ok(Self {
            method: parts.method.to_string(),
            path: parts.uri.path().to_string(),
            query,
            headers: Headers::from_map(header_values),
            cookies,
            host,
            body: forms::parse_form(&bytes),
        })
    }
}

impl RequestHeader for ServerRequest {
    fn method(&self) -> &str {
        &self.method
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn uri(&self) -> String {
        uri::build("http", &self.host, &self.path, &self.query)
    }

    fn query_string(&self) -> &BTreeMap<String, Vec<String>> {
        &self.query
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
        false
    }
}

impl Request for ServerRequest {
    type Body = FormBody;

    fn body(&self) -> &FormBody {
        &self.body
    }
}
