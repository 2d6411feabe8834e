use formdesk_core::{AppError, AppResult};
use formdesk_domain::{FORM_LINK_ALPHABET, FORM_LINK_TOKEN_LENGTH, FormLink};

use crate::form_config_ports::FormLinkGenerator;

// Largest multiple of the alphabet size that fits in a byte; bytes at or above
// it are discarded so every character is equally likely.
const ACCEPTED_BYTE_LIMIT: u8 = (u8::MAX as usize / FORM_LINK_ALPHABET.len()
    * FORM_LINK_ALPHABET.len()) as u8;

/// Form link generator backed by the operating system RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomFormLinkGenerator;

impl RandomFormLinkGenerator {
    /// Creates a generator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl FormLinkGenerator for RandomFormLinkGenerator {
    fn generate(&self) -> AppResult<FormLink> {
        let mut token = String::with_capacity(FORM_LINK_TOKEN_LENGTH);

        while token.len() < FORM_LINK_TOKEN_LENGTH {
            let mut bytes = [0u8; 16];
            getrandom::fill(&mut bytes).map_err(|error| {
                AppError::Internal(format!("failed to generate form link: {error}"))
            })?;

            for byte in bytes {
                if token.len() == FORM_LINK_TOKEN_LENGTH {
                    break;
                }

                if byte < ACCEPTED_BYTE_LIMIT {
                    let index = usize::from(byte) % FORM_LINK_ALPHABET.len();
                    token.push(char::from(FORM_LINK_ALPHABET[index]));
                }
            }
        }

        FormLink::from_token(token.as_str())
    }
}
