use crate::{error::Error, request::Cookie};
use hyper::{
    header::{self, HeaderValue},
    Response, StatusCode,
};

pub type SimpleResult = Response<String>;

pub const HTML: &str = "text/html; charset=utf-8";

fn with_body(status: StatusCode, content_type: &str, body: String) -> Result<SimpleResult, Error> {
    Ok(Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, content_type)
        .body(body)?)
}

pub fn ok_html<S: Into<String>>(body: S) -> Result<SimpleResult, Error> {
    with_body(StatusCode::OK, HTML, body.into())
}

pub fn bad_request_html<S: Into<String>>(body: S) -> Result<SimpleResult, Error> {
    with_body(StatusCode::BAD_REQUEST, HTML, body.into())
}

pub fn not_found() -> Result<SimpleResult, Error> {
    Ok(Response::builder()
        .status(StatusCode::NOT_FOUND)
        .body(String::new())?)
}

/// `302 Found` pointing at `location`.
pub fn redirect(location: &str) -> Result<SimpleResult, Error> {
    Ok(Response::builder()
        .status(StatusCode::FOUND)
        .header(header::LOCATION, location)
        .body(String::new())?)
}

pub fn with_cookie(mut result: SimpleResult, cookie: &Cookie) -> Result<SimpleResult, Error> {
    let value = HeaderValue::from_str(&cookie.to_set_cookie())?;
    result.headers_mut().append(header::SET_COOKIE, value);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ExtractedResult;

    #[test]
    fn html_results_only_carry_content_type() {
        let extracted = ExtractedResult::from(ok_html("<p>hi</p>").unwrap());

        assert_eq!(extracted.status, 200);
        assert_eq!(extracted.headers.len(), 1);
        assert_eq!(extracted.header("Content-Type"), Some(HTML));
        assert_eq!(extracted.body, "<p>hi</p>");
    }

    #[test]
    fn redirect_with_cookie() {
        let result = with_cookie(redirect("/").unwrap(), &Cookie::new("PLAY_SESSION", "x")).unwrap();
        let extracted = ExtractedResult::from(result);

        assert_eq!(extracted.status, 302);
        assert_eq!(extracted.header("Location"), Some("/"));
        assert_eq!(
            extracted.header("Set-Cookie"),
            Some("PLAY_SESSION=x; Path=/; HttpOnly")
        );
        assert_eq!(extracted.body, "");
    }

    #[test]
    fn every_cookie_survives_extraction() {
        let result = with_cookie(redirect("/login").unwrap(), &Cookie::discarding("PLAY_SESSION")).unwrap();
        let result = with_cookie(result, &Cookie::new("PLAY_FLASH", "success=bye")).unwrap();
        let extracted = ExtractedResult::from(result);

        assert_eq!(extracted.cookies.len(), 2);
        assert_eq!(
            extracted.set_cookie("PLAY_SESSION"),
            Some("PLAY_SESSION=; Max-Age=0; Path=/; HttpOnly")
        );
        assert_eq!(
            extracted.set_cookie("PLAY_FLASH"),
            Some("PLAY_FLASH=success=bye; Path=/; HttpOnly")
        );
        assert!(extracted.set_cookie("PLAY").is_none());
    }
}
