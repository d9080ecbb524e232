use std::collections::BTreeMap;
use url::form_urlencoded;

fn encode(text: &str) -> String {
    form_urlencoded::byte_serialize(text.as_bytes()).collect()
}

/// Builds `scheme://host/path?k=v&...` from the parts of a request.
///
/// Only the parameter keys and values are percent-encoded. A key with several
/// values contributes one `key=value` fragment per value.
pub fn build(
    scheme: &str,
    host: &str,
    path: &str,
    params: &BTreeMap<String, Vec<String>>,
) -> String {
    let separator = if path.starts_with('/') { "" } else { "/" };
    let query = params
        .iter()
        .flat_map(|(key, values)| {
            let key = encode(key);
            values
                .iter()
                .map(move |value| format!("{}={}", key, encode(value)))
        })
        .collect::<Vec<_>>()
        .join("&");

    if query.is_empty() {
        format!("{}://{}{}{}", scheme, host, separator, path)
    } else {
        format!("{}://{}{}{}?{}", scheme, host, separator, path, query)
    }
}
