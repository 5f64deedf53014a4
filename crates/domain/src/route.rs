//! Navigation surface: auth screens plus one management screen per entity.
//! One-time tokens travel in the `token` query parameter.

use thiserror::Error;
use url::{Url, form_urlencoded};

use crate::models::EntityKind;

const TOKEN_PARAM: &str = "token";

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("missing `token` query parameter for /{0}")]
    MissingToken(&'static str),
    #[error("unknown route: {0}")]
    UnknownPath(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppRoute {
    Login,
    Signup,
    ForgotPassword,
    ResetPassword { token: String },
    AcceptInvitation { token: String },
    Entity(EntityKind),
}

impl AppRoute {
    /// Parse an absolute link (as found in an email) or a bare path.
    pub fn parse(input: &str) -> Result<Self, RouteError> {
        let url = match Url::parse(input) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                Url::parse("http://localhost/")?.join(input)?
            }
            Err(e) => return Err(e.into()),
        };
        Self::from_url(&url)
    }

    pub fn from_url(url: &Url) -> Result<Self, RouteError> {
        let path = url.path().trim_matches('/');
        let token = || {
            url.query_pairs()
                .find(|(key, _)| key == TOKEN_PARAM)
                .map(|(_, value)| value.into_owned())
                .filter(|value| !value.is_empty())
        };

        match path {
            "" | "login" => Ok(Self::Login),
            "signup" => Ok(Self::Signup),
            "forgot-password" => Ok(Self::ForgotPassword),
            "reset-password" => token()
                .map(|token| Self::ResetPassword { token })
                .ok_or(RouteError::MissingToken("reset-password")),
            "accept-invitation" => token()
                .map(|token| Self::AcceptInvitation { token })
                .ok_or(RouteError::MissingToken("accept-invitation")),
            other => EntityKind::from_slug(other)
                .map(Self::Entity)
                .ok_or_else(|| RouteError::UnknownPath(other.to_string())),
        }
    }

    /// Path plus query string, tokens percent-encoded.
    pub fn to_path(&self) -> String {
        let with_token = |segment: &str, token: &str| {
            let query = form_urlencoded::Serializer::new(String::new())
                .append_pair(TOKEN_PARAM, token)
                .finish();
            format!("/{segment}?{query}")
        };

        match self {
            Self::Login => "/login".to_string(),
            Self::Signup => "/signup".to_string(),
            Self::ForgotPassword => "/forgot-password".to_string(),
            Self::ResetPassword { token } => with_token("reset-password", token),
            Self::AcceptInvitation { token } => with_token("accept-invitation", token),
            Self::Entity(kind) => format!("/{}", kind.definition().slug),
        }
    }

    /// Entity screens need a signed-in session; the auth screens do not.
    pub fn requires_session(&self) -> bool {
        matches!(self, Self::Entity(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reset_link_with_token() {
        let route =
            AppRoute::parse("https://admin.example.com/reset-password?token=abc%2B123").unwrap();
        assert_eq!(
            route,
            AppRoute::ResetPassword {
                token: "abc+123".to_string()
            }
        );
        assert!(!route.requires_session());
    }

    #[test]
    fn test_missing_token_is_an_error() {
        let err = AppRoute::parse("/accept-invitation").unwrap_err();
        assert!(matches!(err, RouteError::MissingToken("accept-invitation")));
        let err = AppRoute::parse("/accept-invitation?token=").unwrap_err();
        assert!(matches!(err, RouteError::MissingToken(_)));
    }

    #[test]
    fn test_entity_routes() {
        let route = AppRoute::parse("/asset-categories").unwrap();
        assert_eq!(route, AppRoute::Entity(EntityKind::AssetCategory));
        assert!(route.requires_session());
        assert_eq!(route.to_path(), "/asset-categories");
        assert!(matches!(
            AppRoute::parse("/nope"),
            Err(RouteError::UnknownPath(p)) if p == "nope"
        ));
    }

    #[test]
    fn test_to_path_roundtrips_token() {
        let route = AppRoute::AcceptInvitation {
            token: "a b&c".to_string(),
        };
        let path = route.to_path();
        assert_eq!(AppRoute::parse(&path).unwrap(), route);
    }
}
