use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use forum_shared::types::{Author, USER_AVATAR_HEADER, USER_ID_HEADER, USER_NAME_HEADER, UserId};

const DEFAULT_NAME: &str = "New User";
const DEFAULT_AVATAR_URL: &str = "https://placehold.co/100x100.png";

/// The authenticated caller, as asserted by the identity gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub name: String,
    pub avatar_url: String,
}

impl Identity {
    pub fn author(&self) -> Author {
        Author {
            id: self.user_id.to_string(),
            name: self.name.clone(),
            avatar_url: self.avatar_url.clone(),
        }
    }
}

/// Extracts the optional caller identity from the request headers.
///
/// A missing or blank `x-user-id` yields `None`; handlers decide whether
/// the route requires a user.
#[derive(Debug, Clone)]
pub struct MaybeIdentity(pub Option<Identity>);

impl MaybeIdentity {
    pub fn user_id(&self) -> Option<&UserId> {
        self.0.as_ref().map(|identity| &identity.user_id)
    }

    pub fn author(&self) -> Option<Author> {
        self.0.as_ref().map(Identity::author)
    }
}

fn header_value(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for MaybeIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = header_value(parts, USER_ID_HEADER)
            .and_then(UserId::new)
            .map(|user_id| Identity {
                user_id,
                name: header_value(parts, USER_NAME_HEADER)
                    .unwrap_or_else(|| DEFAULT_NAME.to_string()),
                avatar_url: header_value(parts, USER_AVATAR_HEADER)
                    .unwrap_or_else(|| DEFAULT_AVATAR_URL.to_string()),
            });
        Ok(MaybeIdentity(identity))
    }
}
