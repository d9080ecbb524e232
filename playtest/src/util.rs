use hyper::{header::SET_COOKIE, HeaderMap};
use std::collections::HashMap;

/// `content-type` -> `Content-Type`
pub fn canonical_header_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

/// Header values by canonical name; a repeated header has its values joined
/// with `, `. Values with opaque characters are skipped.
pub fn extract_headers(header_map: &HeaderMap) -> HashMap<String, String> {
    let mut headers = HashMap::<String, String>::new();

    for (name, value) in header_map.iter() {
        if let Ok(value) = value.to_str() {
            headers
                .entry(canonical_header_name(name.as_str()))
                .and_modify(|values| {
                    values.push_str(", ");
                    values.push_str(value);
                })
                .or_insert_with(|| String::from(value));
        }
    }

    headers
}

/// Every `Set-Cookie` value, in the order the result set them.
pub fn extract_set_cookies(header_map: &HeaderMap) -> Vec<String> {
    header_map
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .map(String::from)
        .collect()
}
