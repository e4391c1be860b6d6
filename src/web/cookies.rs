//! Minimal cookie helpers.
//!
//! The portal sets exactly two cookies (session token and flash notice),
//! so this stays a pair of string builders plus a header parser rather
//! than a full cookie-jar dependency.

use axum::http::HeaderMap;

pub const SESSION_COOKIE: &str = "rolegate_session";

/// Extract a named cookie value from the request headers.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all("cookie")
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|cookie| {
            let parts: Vec<&str> = cookie.trim().splitn(2, '=').collect();
            if parts.len() == 2 && parts[0] == name {
                Some(parts[1].to_string())
            } else {
                None
            }
        })
}

pub fn session_cookie(token: &str, max_age_secs: i64) -> String {
    format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}",
        SESSION_COOKIE, token, max_age_secs
    )
}

pub fn clear_session_cookie() -> String {
    format!("{}=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0", SESSION_COOKIE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_cookie(raw: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("cookie", HeaderValue::from_str(raw).unwrap());
        headers
    }

    #[test]
    fn finds_cookie_among_many() {
        let headers = headers_with_cookie("a=1; rolegate_session=tok123; b=2");
        assert_eq!(
            cookie_value(&headers, SESSION_COOKIE),
            Some("tok123".to_string())
        );
        assert_eq!(cookie_value(&headers, "a"), Some("1".to_string()));
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn no_cookie_header_means_none() {
        assert_eq!(cookie_value(&HeaderMap::new(), SESSION_COOKIE), None);
    }

    #[test]
    fn session_cookie_is_http_only() {
        let cookie = session_cookie("tok", 3600);
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=3600"));
        assert!(cookie.starts_with("rolegate_session=tok"));
    }
}
