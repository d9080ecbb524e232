use hmac::{Hmac, Mac};
use playtest::{Cookie, Error, RequestHeader};
use sha2::Sha256;
use std::collections::BTreeMap;
use url::form_urlencoded;

pub const SESSION_COOKIE: &str = "PLAY_SESSION";
pub const FLASH_COOKIE: &str = "PLAY_FLASH";

type HmacSha256 = Hmac<Sha256>;

fn encode_data(data: &BTreeMap<String, String>) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(data)
        .finish()
}

fn decode_data(encoded: &str) -> BTreeMap<String, String> {
    form_urlencoded::parse(encoded.as_bytes())
        .into_owned()
        .collect()
}

fn mac(secret: &str, data: &str) -> Result<HmacSha256, Error> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| Error::InvalidConfiguration("unusable application secret".into()))?;
    mac.update(data.as_bytes());
    Ok(mac)
}

/// Signed client-side session: `hex(hmac)-data`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    data: BTreeMap<String, String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<S1: Into<String>, S2: Into<String>>(mut self, key: S1, value: S2) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn encode(&self, secret: &str) -> Result<String, Error> {
        let data = encode_data(&self.data);
        let signature = hex::encode(mac(secret, &data)?.finalize().into_bytes());

        Ok(format!("{}-{}", signature, data))
    }

    /// A missing or tampered signature yields an empty session.
    pub fn decode(value: &str, secret: &str) -> Self {
        let mut parts = value.splitn(2, '-');
        let (signature, data) = match (parts.next(), parts.next()) {
            (Some(signature), Some(data)) => (signature, data),
            _ => return Self::new(),
        };
        let signature = match hex::decode(signature) {
            Ok(signature) => signature,
            Err(_) => return Self::new(),
        };

        let verified = match mac(secret, data) {
            Ok(mac) => mac.verify_slice(&signature).is_ok(),
            Err(_) => false,
        };

        if verified {
            Self {
                data: decode_data(data),
            }
        } else {
            Self::new()
        }
    }

    pub fn from_request<R: RequestHeader + ?Sized>(request: &R, secret: &str) -> Self {
        request
            .cookies()
            .get(SESSION_COOKIE)
            .map(|cookie| Self::decode(&cookie.value, secret))
            .unwrap_or_default()
    }

    pub fn to_cookie(&self, secret: &str) -> Result<Cookie, Error> {
        Ok(Cookie::new(SESSION_COOKIE, self.encode(secret)?))
    }

    pub fn discard() -> Cookie {
        Cookie::discarding(SESSION_COOKIE)
    }
}

/// Unsigned values that survive exactly one redirect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flash {
    data: BTreeMap<String, String>,
}

impl Flash {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<S1: Into<String>, S2: Into<String>>(mut self, key: S1, value: S2) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn from_request<R: RequestHeader + ?Sized>(request: &R) -> Self {
        request
            .cookies()
            .get(FLASH_COOKIE)
            .map(|cookie| Self {
                data: decode_data(&cookie.value),
            })
            .unwrap_or_default()
    }

    pub fn to_cookie(&self) -> Cookie {
        Cookie::new(FLASH_COOKIE, encode_data(&self.data))
    }

    pub fn discard() -> Cookie {
        Cookie::discarding(FLASH_COOKIE)
    }
}
