use axum::{
    http::{HeaderMap, HeaderValue, Uri, header},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::headers::{Cookie, HeaderMapExt};
use tracing::warn;

use quill_types::flash::Flash;

pub const SESSION_COOKIE_NAME: &str = "quill_session";
pub const FLASH_COOKIE_NAME: &str = "quill_flash";

pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .typed_get::<Cookie>()
        .and_then(|cookies| cookies.get(name).map(str::to_string))
        .filter(|value| !value.is_empty())
}

/// `Max-Age` is omitted when `max_age` is `None`, making it a browser-session cookie.
pub fn set_cookie(name: &str, value: &str, max_age: Option<u64>, secure: bool) -> Option<HeaderValue> {
    let mut cookie = format!("{name}={value}; Path=/; HttpOnly; SameSite=Lax");
    if let Some(seconds) = max_age {
        cookie.push_str(&format!("; Max-Age={seconds}"));
    }
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
        .map_err(|e| warn!("Refusing to set cookie {}: {}", name, e))
        .ok()
}

pub fn clear_cookie(name: &str, secure: bool) -> Option<HeaderValue> {
    set_cookie(name, "", Some(0), secure)
}

/// Same-site path to return to, taken from `Referer`. Absolute referers are
/// reduced to their path so a redirect can never leave the site.
pub fn back_location(headers: &HeaderMap) -> String {
    headers
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .and_then(|referer| referer.parse::<Uri>().ok())
        .and_then(|uri| uri.path_and_query().map(|pq| pq.as_str().to_string()))
        .filter(|path| path.starts_with('/') && !path.starts_with("//"))
        .unwrap_or_else(|| "/blogs".to_string())
}

/// 303 to `to`, carrying `flash` to the next rendered view.
pub fn redirect_with(flash: Flash, to: &str) -> Response {
    let mut response = Redirect::to(to).into_response();
    if let Some(cookie) = set_cookie(FLASH_COOKIE_NAME, &flash.encode(), None, false) {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_header(name: header::HeaderName, value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn back_uses_referer_path_only() {
        let headers = with_header(header::REFERER, "http://localhost:3000/blogs/42?x=1");
        assert_eq!(back_location(&headers), "/blogs/42?x=1");
    }

    #[test]
    fn back_defaults_to_listing() {
        assert_eq!(back_location(&HeaderMap::new()), "/blogs");
        let headers = with_header(header::REFERER, "//evil.example/phish");
        assert_eq!(back_location(&headers), "/blogs");
    }

    #[test]
    fn reads_named_cookie() {
        let headers = with_header(header::COOKIE, "a=1; quill_session=tok; b=2");
        assert_eq!(read_cookie(&headers, SESSION_COOKIE_NAME).as_deref(), Some("tok"));
        assert_eq!(read_cookie(&headers, FLASH_COOKIE_NAME), None);
    }

    #[test]
    fn cleared_cookie_expires_immediately() {
        let value = clear_cookie(SESSION_COOKIE_NAME, true).unwrap();
        let value = value.to_str().unwrap();
        assert!(value.starts_with("quill_session=;"));
        assert!(value.contains("Max-Age=0"));
        assert!(value.ends_with("; Secure"));
    }

    #[test]
    fn redirect_carries_flash_cookie() {
        let response = redirect_with(Flash::success("Logged you out!"), "/blogs");
        assert_eq!(response.status(), axum::http::StatusCode::SEE_OTHER);
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("quill_flash="));
    }
}
