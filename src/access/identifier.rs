use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    errors::{AppError, AppResult},
    i18n::{MessageKey, Translate},
};

static UUID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9A-Fa-f]{8}(-[0-9A-Fa-f]{4}){3}-[0-9A-Fa-f]{12}$")
        .expect("UUID_REGEX is a valid regex pattern")
});

pub fn is_valid_identifier(raw: &str) -> bool {
    UUID_REGEX.is_match(raw)
}

/// Checks the canonical 8-4-4-4-12 form and returns the lowercase id used
/// for lookups.
pub fn parse_identifier(raw: &str, translator: &dyn Translate) -> AppResult<String> {
    if !is_valid_identifier(raw) {
        return Err(AppError::InvalidIdentifier(
            translator.translate(MessageKey::InvalidIdentifier),
        ));
    }
    Ok(raw.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{Locale, Translator};

    #[test]
    fn test_canonical_uuids_are_accepted() {
        assert!(is_valid_identifier("550e8400-e29b-41d4-a716-446655440000"));
        assert!(is_valid_identifier("550E8400-E29B-41D4-A716-446655440000"));
    }

    #[test]
    fn test_non_canonical_forms_are_rejected() {
        for raw in [
            "invalid-uuid",
            "",
            "550e8400e29b41d4a716446655440000",
            "{550e8400-e29b-41d4-a716-446655440000}",
            "550e8400-e29b-41d4-a716-44665544000g",
            " 550e8400-e29b-41d4-a716-446655440000",
            "550e8400-e29b-41d4-a716-446655440000\n",
        ] {
            assert!(!is_valid_identifier(raw), "{:?} should be rejected", raw);
        }
    }

    #[test]
    fn test_parse_normalizes_case() {
        let translator = Translator::new(Locale::En);
        let id = parse_identifier("550E8400-E29B-41D4-A716-446655440000", &translator).unwrap();
        assert_eq!(id, "550e8400-e29b-41d4-a716-446655440000");
    }

    #[test]
    fn test_parse_error_is_translated() {
        let translator = Translator::new(Locale::Fr);
        match parse_identifier("invalid-uuid", &translator) {
            Err(AppError::InvalidIdentifier(msg)) => {
                assert_eq!(msg, "L'identifiant n'est pas un UUID valide")
            }
            other => panic!("Expected InvalidIdentifier, got {:?}", other),
        }
    }
}
