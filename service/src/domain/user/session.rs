//! [`Session`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::DateTimeOf;
use derive_more::{AsRef, Display, FromStr};
use serde::{Deserialize, Serialize};

#[cfg(doc)]
use crate::domain::User;
use crate::domain::user;

/// User session carried as [JWT] claims.
///
/// [JWT]: https://datatracker.ietf.org/doc/html/rfc7519
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct Session {
    /// ID of the [`User`] this [`Session`] belongs to.
    pub user_id: user::Id,

    /// [`user::Role`] of the [`User`] this [`Session`] belongs to.
    pub role: user::Role,

    /// [`DateTime`] when this [`Session`] expires.
    #[serde(rename = "exp", with = "common::datetime::serde::unix_timestamp")]
    pub expires_at: ExpirationDateTime,
}

/// Access token of a [`Session`].
#[derive(AsRef, Clone, Debug, Display, FromStr)]
pub struct Token(String);

impl Token {
    /// Creates a new [`Token`] without checking its contents.
    ///
    /// # Safety
    ///
    /// The provided `token` must be a valid [`Token`] representation.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub const unsafe fn new_unchecked(token: String) -> Self {
        Self(token)
    }
}

/// Marker type indicating [`Session`] expiration.
#[derive(Clone, Copy, Debug)]
pub struct Expiration;

/// [`DateTime`] of a [`Session`] expiration.
pub type ExpirationDateTime = DateTimeOf<(Session, Expiration)>;

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::DateTime;
    use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};

    use crate::domain::user;

    use super::Session;

    #[test]
    fn claims_round_trip_through_a_token() {
        let session = Session {
            user_id: user::Id::new(),
            role: user::Role::Agency,
            expires_at: (DateTime::now() + Duration::from_secs(30 * 60))
                .coerce(),
        };

        let token = jsonwebtoken::encode(
            &Header::default(),
            &session,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();
        let decoded = jsonwebtoken::decode::<Session>(
            &token,
            &DecodingKey::from_secret(b"test-secret"),
            &Validation::default(),
        )
        .unwrap()
        .claims;

        assert_eq!(decoded.user_id, session.user_id);
        assert_eq!(decoded.role, user::Role::Agency);
        assert_eq!(
            decoded.expires_at.coerce::<()>().unix_timestamp(),
            session.expires_at.coerce::<()>().unix_timestamp(),
        );
    }
}
