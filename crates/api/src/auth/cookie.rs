//! The HTTP-only cookie that carries the access token.

use axum_extra::extract::cookie::{Cookie, SameSite};

use super::jwt::JwtConfig;

/// Name of the cookie holding the access token.
pub const AUTH_COOKIE: &str = "token";

/// Cookie carrying `token`, alive for the token's lifetime.
pub fn auth_cookie(token: String, config: &JwtConfig) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure)
        .path("/")
        .max_age(time::Duration::days(config.expiry_days))
        .build()
}

/// An already-expired, empty auth cookie. Setting it clears the browser's copy.
pub fn clear_auth_cookie(config: &JwtConfig) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, ""))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure)
        .path("/")
        .max_age(time::Duration::ZERO)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secure: bool) -> JwtConfig {
        JwtConfig {
            secret: "cookie-test".into(),
            expiry_days: 30,
            cookie_secure: secure,
        }
    }

    #[test]
    fn auth_cookie_attributes() {
        let cookie = auth_cookie("abc".into(), &config(false));
        assert_eq!(cookie.name(), "token");
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::days(30)));
        assert_ne!(cookie.secure(), Some(true));
    }

    #[test]
    fn secure_flag_follows_config() {
        assert_eq!(auth_cookie("abc".into(), &config(true)).secure(), Some(true));
    }

    #[test]
    fn clearing_cookie_is_expired_and_empty() {
        let cookie = clear_auth_cookie(&config(false));
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
        assert!(cookie.to_string().contains("Max-Age=0"));
    }
}
