// database/tokens/model.rs - model for the tokens collection

use crate::error::DbError;
use chrono::{DateTime as ChronoDateTime, TimeZone, Utc};
use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

// Fixed identity of the one token record; every refresh replaces it
pub const CURRENT_TOKEN_KEY: &str = "current";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenModel {
    #[serde(rename = "_id")]
    pub key: String,
    pub id_token: String,
    pub issued_at: DateTime,
    pub expires_at: DateTime,
}

/// Upstream gateway token as the rest of the system sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken {
    pub token: String,
    pub issued_at: ChronoDateTime<Utc>,
    pub expires_at: ChronoDateTime<Utc>,
}

impl AuthToken {
    pub fn is_valid_at(&self, now: ChronoDateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

impl From<&AuthToken> for TokenModel {
    fn from(token: &AuthToken) -> Self {
        TokenModel {
            key: CURRENT_TOKEN_KEY.to_string(),
            id_token: token.token.clone(),
            issued_at: DateTime::from_millis(token.issued_at.timestamp_millis()),
            expires_at: DateTime::from_millis(token.expires_at.timestamp_millis()),
        }
    }
}

impl TryFrom<TokenModel> for AuthToken {
    type Error = DbError;

    fn try_from(model: TokenModel) -> Result<Self, Self::Error> {
        Ok(AuthToken {
            token: model.id_token,
            issued_at: to_chrono(model.issued_at)?,
            expires_at: to_chrono(model.expires_at)?,
        })
    }
}

pub(crate) fn to_chrono(date: DateTime) -> Result<ChronoDateTime<Utc>, DbError> {
    let millis = date.timestamp_millis();
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or(DbError::Timestamp(millis))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn model_conversion_keeps_millisecond_precision() {
        let issued_at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let token = AuthToken {
            token: "id-token".to_string(),
            issued_at,
            expires_at: issued_at + Duration::minutes(55),
        };

        let model = TokenModel::from(&token);
        assert_eq!(model.key, CURRENT_TOKEN_KEY);

        let restored = AuthToken::try_from(model).unwrap();
        assert_eq!(restored, token);
    }

    #[test]
    fn token_is_invalid_from_its_expiry_onwards() {
        let now = Utc::now();
        let token = AuthToken {
            token: "t".to_string(),
            issued_at: now - Duration::minutes(55),
            expires_at: now,
        };

        assert!(token.is_valid_at(now - Duration::seconds(1)));
        assert!(!token.is_valid_at(now));
    }
}
