//! One-shot flash notices.
//!
//! A notice rides to the next page in a short-lived cookie: the
//! redirecting handler sets it, the next HTML render consumes it and
//! clears the cookie. The payload is base64url so messages survive
//! cookie value restrictions.

use axum::{
    http::{header, HeaderMap},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

use super::cookies::cookie_value;

pub const FLASH_COOKIE: &str = "rolegate_flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
}

impl Level {
    fn as_str(&self) -> &'static str {
        match self {
            Level::Success => "success",
            Level::Error => "error",
        }
    }

    fn parse(value: &str) -> Option<Level> {
        match value {
            "success" => Some(Level::Success),
            "error" => Some(Level::Error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub level: Level,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }

    pub fn encode(&self) -> String {
        URL_SAFE_NO_PAD.encode(format!("{}:{}", self.level.as_str(), self.message))
    }

    pub fn decode(raw: &str) -> Option<Flash> {
        let bytes = URL_SAFE_NO_PAD.decode(raw).ok()?;
        let decoded = String::from_utf8(bytes).ok()?;
        let (level, message) = decoded.split_once(':')?;
        Some(Flash {
            level: Level::parse(level)?,
            message: message.to_string(),
        })
    }

    pub fn set_cookie(&self) -> String {
        format!(
            "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age=60",
            FLASH_COOKIE,
            self.encode()
        )
    }

    pub fn clear_cookie() -> String {
        format!("{}=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0", FLASH_COOKIE)
    }
}

/// Read the pending flash notice, if any, without clearing it. Renders
/// that consume the notice must also send [`Flash::clear_cookie`].
pub fn peek(headers: &HeaderMap) -> Option<Flash> {
    Flash::decode(&cookie_value(headers, FLASH_COOKIE)?)
}

/// The standard "recover locally" response: set the notice and redirect.
pub fn flash_redirect(flash: Flash, to: &str) -> Response {
    (
        AppendHeaders([(header::SET_COOKIE, flash.set_cookie())]),
        Redirect::to(to),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn encode_decode_round_trip() {
        let flash = Flash::error("You can't delete your own account.");
        assert_eq!(Flash::decode(&flash.encode()), Some(flash));

        let flash = Flash::success("Registration successful.");
        assert_eq!(Flash::decode(&flash.encode()), Some(flash));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert_eq!(Flash::decode("not base64 at all!!!"), None);
        assert_eq!(Flash::decode(&URL_SAFE_NO_PAD.encode("nocolon")), None);
        assert_eq!(Flash::decode(&URL_SAFE_NO_PAD.encode("fatal:boom")), None);
    }

    #[test]
    fn peek_reads_the_flash_cookie() {
        let flash = Flash::success("Logged out successfully.");
        let mut headers = HeaderMap::new();
        headers.insert(
            "cookie",
            HeaderValue::from_str(&format!("{}={}", FLASH_COOKIE, flash.encode())).unwrap(),
        );
        assert_eq!(peek(&headers), Some(flash));
        assert_eq!(peek(&HeaderMap::new()), None);
    }
}
