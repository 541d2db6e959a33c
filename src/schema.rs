//! Validation rules for the output submission record
//!
//! [`validate`] is pure: it reads a [`FieldValues`] snapshot and either builds
//! an [`OutputSubmission`] or reports every failing field at once.

use regex::Regex;
use std::sync::LazyLock;

use crate::errors::{FieldError, FieldErrors};
use crate::models::{AsapFunded, FieldName, FieldValues, OutputSubmission, OutputType};

pub const TITLE_REQUIRED: &str = "Please enter a title!!!";
pub const URL_REQUIRED: &str = "Please enter a valid URL.";
pub const URL_FORMAT: &str = "This url seems to be invalid. It should start with https://";
pub const TYPE_REQUIRED: &str = "Please choose a type";
pub const ASAP_FUNDED_REQUIRED: &str =
    "Please select the option that represents if this output has been funded by ASAP";

// Scheme, then a dot-separated host, then a permissive tail of path, query and
// fragment characters. `\w` is spelled out so it stays ASCII-only.
static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^https?://[A-Za-z0-9_.\-]+(?:\.[A-Za-z0-9_.\-]+)+[A-Za-z0-9_\-.~:/?#%\[\]@!$&'()*+,;=]+$",
    )
    .expect("URL_REGEX: invalid regex pattern")
});

/// Validate the whole record.
pub fn validate(values: &FieldValues) -> Result<OutputSubmission, FieldErrors> {
    let mut errors = FieldErrors::new();
    for field in FieldName::ALL {
        if let Err(err) = validate_field(field, values.get(field)) {
            errors.insert(err);
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    // Every field passed, so the typed conversions below cannot fail; they are
    // still matched to keep this function free of panics.
    let title = values.title.clone().unwrap_or_default();
    let url = values.url.clone().unwrap_or_default();
    let output_type = values.output_type.as_deref().and_then(OutputType::parse);
    let asap_funded = values.asap_funded.as_deref().and_then(AsapFunded::parse);

    match (output_type, asap_funded) {
        (Some(output_type), Some(asap_funded)) => Ok(OutputSubmission {
            title,
            url,
            usage_notes: values.usage_notes.clone(),
            output_type,
            asap_funded,
        }),
        _ => Err(errors),
    }
}

/// Validate one field's raw value in isolation.
pub fn validate_field(field: FieldName, value: Option<&str>) -> Result<(), FieldError> {
    match field {
        FieldName::Title => validate_title(value),
        FieldName::Url => validate_url(value),
        FieldName::UsageNotes => Ok(()),
        FieldName::Type => match value.and_then(OutputType::parse) {
            Some(_) => Ok(()),
            None => Err(FieldError::Required {
                field,
                message: TYPE_REQUIRED,
            }),
        },
        FieldName::AsapFunded => match value.and_then(AsapFunded::parse) {
            Some(_) => Ok(()),
            None => Err(FieldError::Required {
                field,
                message: ASAP_FUNDED_REQUIRED,
            }),
        },
    }
}

fn validate_title(value: Option<&str>) -> Result<(), FieldError> {
    match value {
        Some(title) if !title.trim().is_empty() => Ok(()),
        _ => Err(FieldError::Required {
            field: FieldName::Title,
            message: TITLE_REQUIRED,
        }),
    }
}

fn validate_url(value: Option<&str>) -> Result<(), FieldError> {
    let url = value.unwrap_or_default();
    if url.is_empty() {
        return Err(FieldError::Required {
            field: FieldName::Url,
            message: URL_REQUIRED,
        });
    }
    if !URL_REGEX.is_match(url) {
        return Err(FieldError::Format {
            field: FieldName::Url,
            message: URL_FORMAT,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> FieldValues {
        FieldValues::new()
            .with(FieldName::Title, "My Paper")
            .with(FieldName::Url, "http://example.com")
            .with(FieldName::UsageNotes, "")
            .with(FieldName::Type, "Published")
            .with(FieldName::AsapFunded, "Yes")
    }

    #[test]
    fn test_non_empty_titles_pass() {
        for title in ["X", "My Paper", "  padded  ", "ü"] {
            assert!(validate_field(FieldName::Title, Some(title)).is_ok(), "{title:?}");
        }
    }

    #[test]
    fn test_blank_titles_fail_with_required_message() {
        for title in [None, Some(""), Some("   "), Some("\t\n")] {
            let err = validate_field(FieldName::Title, title).unwrap_err();
            assert!(matches!(err, FieldError::Required { .. }));
            assert_eq!(err.message(), TITLE_REQUIRED);
        }
    }

    #[test]
    fn test_accepted_urls() {
        for url in [
            "http://example.com",
            "https://example.com",
            "https://www.example.com/path/to?q=1&r=2#frag",
            "https://sub.domain.example.org/a_b-c~d",
            "https://doi.org/10.1000/182",
            "http://localhost.localdomain:8080/x",
        ] {
            assert!(validate_field(FieldName::Url, Some(url)).is_ok(), "{url}");
        }
    }

    #[test]
    fn test_malformed_urls_fail_with_format_message() {
        for url in [
            "ftp://example.com",
            "example.com",
            "https://",
            "https://localhost",
            "https://exa mple.com",
            " ",
            "www.example.com/https://",
        ] {
            let err = validate_field(FieldName::Url, Some(url)).unwrap_err();
            assert!(matches!(err, FieldError::Format { .. }), "{url}");
            assert_eq!(err.message(), URL_FORMAT);
        }
    }

    #[test]
    fn test_empty_url_is_required_not_format() {
        for url in [None, Some("")] {
            let err = validate_field(FieldName::Url, url).unwrap_err();
            assert!(matches!(err, FieldError::Required { .. }));
            assert_eq!(err.message(), URL_REQUIRED);
        }
    }

    #[test]
    fn test_usage_notes_never_fail() {
        for notes in [None, Some(""), Some("anything at all\nmulti-line")] {
            assert!(validate_field(FieldName::UsageNotes, notes).is_ok());
        }
    }

    #[test]
    fn test_type_accepts_only_enumerated_values() {
        assert!(validate_field(FieldName::Type, Some("Published")).is_ok());
        assert!(validate_field(FieldName::Type, Some("Preprint")).is_ok());
        for bad in [None, Some(""), Some("published"), Some("Journal")] {
            let err = validate_field(FieldName::Type, bad).unwrap_err();
            assert_eq!(err.message(), TYPE_REQUIRED);
        }
    }

    #[test]
    fn test_asap_funded_accepts_only_enumerated_values() {
        for ok in ["Yes", "No", "Not Sure"] {
            assert!(validate_field(FieldName::AsapFunded, Some(ok)).is_ok());
        }
        for bad in [None, Some(""), Some("yes"), Some("Maybe")] {
            let err = validate_field(FieldName::AsapFunded, bad).unwrap_err();
            assert!(matches!(err, FieldError::Required { .. }));
            assert_eq!(err.message(), ASAP_FUNDED_REQUIRED);
        }
    }

    #[test]
    fn test_complete_record_builds_submission() {
        let record = validate(&complete()).unwrap();
        assert_eq!(record.title, "My Paper");
        assert_eq!(record.url, "http://example.com");
        assert_eq!(record.usage_notes.as_deref(), Some(""));
        assert_eq!(record.output_type, OutputType::Published);
        assert_eq!(record.asap_funded, AsapFunded::Yes);
    }

    #[test]
    fn test_empty_record_reports_all_required_fields() {
        let errors = validate(&FieldValues::new()).unwrap_err();
        let fields: Vec<_> = errors.fields().collect();
        assert_eq!(
            fields,
            vec![
                FieldName::Title,
                FieldName::Url,
                FieldName::Type,
                FieldName::AsapFunded
            ]
        );
        assert!(errors.iter().all(|e| matches!(e, FieldError::Required { .. })));
    }

    #[test]
    fn test_validate_is_idempotent() {
        let samples = [
            FieldValues::new(),
            complete(),
            complete().with(FieldName::Url, "ftp://example.com"),
            complete().with(FieldName::Title, " "),
        ];
        for values in samples {
            assert_eq!(validate(&values), validate(&values));
        }
    }
}
