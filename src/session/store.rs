//! Cookie-backed token store scoped to a single request.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::{IntoResponseParts, ResponseParts},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::convert::Infallible;

use crate::config::GatewayConfig;

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

/// Attributes applied to the auth cookies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookiePolicy {
    pub secure: bool,
    pub access_max_age_secs: i64,
    pub refresh_max_age_secs: i64,
}

impl CookiePolicy {
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self {
            secure: config.secure_cookies(),
            access_max_age_secs: config.session.access_max_age_secs,
            refresh_max_age_secs: config.session.refresh_max_age_secs,
        }
    }

    fn cookie(&self, name: &'static str, value: String, max_age: time::Duration) -> Cookie<'static> {
        Cookie::build((name, value))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .max_age(max_age)
            .build()
    }
}

impl Default for CookiePolicy {
    fn default() -> Self {
        Self::from_config(&GatewayConfig::default())
    }
}

/// Per-request view of the auth cookies.
///
/// Reads come from the request's `Cookie` header; writes become `Set-Cookie`
/// headers when the session is returned as part of a response.
#[derive(Debug, Clone)]
pub struct Session {
    jar: CookieJar,
    policy: CookiePolicy,
}

impl Session {
    pub fn new(jar: CookieJar, policy: CookiePolicy) -> Self {
        Self { jar, policy }
    }

    /// The access token, if a non-empty one was sent.
    pub fn access_token(&self) -> Option<String> {
        self.jar
            .get(ACCESS_TOKEN_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Store tokens. The refresh cookie is only written when a token is given.
    pub fn set_tokens(mut self, access: &str, refresh: Option<&str>) -> Self {
        let access_cookie = self.policy.cookie(
            ACCESS_TOKEN_COOKIE,
            access.to_string(),
            time::Duration::seconds(self.policy.access_max_age_secs),
        );
        self.jar = self.jar.add(access_cookie);

        if let Some(refresh) = refresh.filter(|r| !r.is_empty()) {
            let refresh_cookie = self.policy.cookie(
                REFRESH_TOKEN_COOKIE,
                refresh.to_string(),
                time::Duration::seconds(self.policy.refresh_max_age_secs),
            );
            self.jar = self.jar.add(refresh_cookie);
        }
        self
    }

    /// Expire both cookies, whether or not the request carried them.
    pub fn clear_tokens(mut self) -> Self {
        for name in [ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE] {
            let expired = self.policy.cookie(name, String::new(), time::Duration::ZERO);
            self.jar = self.jar.add(expired);
        }
        self
    }

    pub fn into_jar(self) -> CookieJar {
        self.jar
    }
}

impl<S> FromRequestParts<S> for Session
where
    CookiePolicy: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        Ok(Session::new(jar, CookiePolicy::from_ref(state)))
    }
}

impl IntoResponseParts for Session {
    type Error = Infallible;

    fn into_response_parts(self, res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        self.jar.into_response_parts(res)
    }
}
