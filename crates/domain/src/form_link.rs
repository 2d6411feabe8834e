use std::fmt::{Display, Formatter};

use formdesk_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Prefix shared by every form link.
pub const FORM_LINK_PREFIX: &str = "FORM-";

/// Number of random characters following the prefix.
pub const FORM_LINK_TOKEN_LENGTH: usize = 8;

/// Characters a form link token may contain.
pub const FORM_LINK_ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Public token used to address and share a form configuration.
///
/// Always `FORM-` followed by eight characters from `A-Z0-9`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FormLink(String);

impl FormLink {
    /// Parses and validates a complete form link such as `FORM-7K2QX9AB`.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let Some(token) = value.strip_prefix(FORM_LINK_PREFIX) else {
            return Err(AppError::Validation(format!(
                "form link '{value}' must start with '{FORM_LINK_PREFIX}'"
            )));
        };

        if token.len() != FORM_LINK_TOKEN_LENGTH
            || !token.bytes().all(|byte| FORM_LINK_ALPHABET.contains(&byte))
        {
            return Err(AppError::Validation(format!(
                "form link '{value}' must end with {FORM_LINK_TOKEN_LENGTH} uppercase alphanumeric characters"
            )));
        }

        Ok(Self(value))
    }

    /// Builds a form link from its token part.
    pub fn from_token(token: &str) -> AppResult<Self> {
        Self::new(format!("{FORM_LINK_PREFIX}{token}"))
    }

    /// Returns the full link value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for FormLink {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

impl TryFrom<String> for FormLink {
    type Error = AppError;

    fn try_from(value: String) -> AppResult<Self> {
        Self::new(value)
    }
}

impl From<FormLink> for String {
    fn from(value: FormLink) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{FORM_LINK_PREFIX, FormLink};

    #[test]
    fn accepts_prefixed_uppercase_token() {
        let link = FormLink::new("FORM-7K2QX9AB");
        assert!(link.is_ok());
        assert_eq!(
            link.map(|value| value.to_string()).unwrap_or_default(),
            "FORM-7K2QX9AB"
        );
    }

    #[test]
    fn rejects_lowercase_and_wrong_length_tokens() {
        assert!(FormLink::new("FORM-7k2qx9ab").is_err());
        assert!(FormLink::new("FORM-7K2QX9A").is_err());
        assert!(FormLink::new("FORM-7K2QX9ABC").is_err());
        assert!(FormLink::new("LINK-7K2QX9AB").is_err());
    }

    #[test]
    fn from_token_adds_prefix() {
        let link = FormLink::from_token("ABCDEFGH").unwrap_or_else(|_| unreachable!());
        assert!(link.as_str().starts_with(FORM_LINK_PREFIX));
    }

    #[test]
    fn deserializing_validates_the_link() {
        let valid = serde_json::from_str::<FormLink>(r#""FORM-7K2QX9AB""#);
        let invalid = serde_json::from_str::<FormLink>(r#""FORM-lower123""#);

        assert!(valid.is_ok_and(|link| link.as_str() == "FORM-7K2QX9AB"));
        assert!(invalid.is_err());
        assert_eq!(
            serde_json::to_string(&FormLink::new("FORM-7K2QX9AB").unwrap_or_else(|_| unreachable!()))
                .unwrap_or_default(),
            r#""FORM-7K2QX9AB""#
        );
    }

    proptest! {
        #[test]
        fn every_alphabet_token_is_a_valid_link(token in "[A-Z0-9]{8}") {
            prop_assert!(FormLink::from_token(token.as_str()).is_ok());
        }

        #[test]
        fn tokens_outside_the_alphabet_are_rejected(token in "[a-z_\\-]{8}") {
            prop_assert!(FormLink::from_token(token.as_str()).is_err());
        }
    }
}
