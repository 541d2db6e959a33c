//! Form state for the output submission form
//!
//! [`FormState`] owns the raw field values together with per-field
//! touched/dirty flags and the most recently computed errors. Errors are never
//! patched incrementally: every validation pass rebuilds them from the whole
//! record.

use std::collections::BTreeMap;
use std::str::FromStr;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::errors::{FieldError, FieldErrors, FormError};
use crate::models::{FieldName, FieldValues, OutputSubmission};
use crate::schema;
use crate::submit::SubmissionHandler;

/// When field edits trigger validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Validate when a field loses focus
    #[default]
    OnBlur,
    /// Validate on every edit
    OnChange,
    /// Validate only when submitting
    OnSubmit,
}

impl ValidationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationMode::OnBlur => "on-blur",
            ValidationMode::OnChange => "on-change",
            ValidationMode::OnSubmit => "on-submit",
        }
    }
}

#[derive(Error, Debug)]
#[error("Unknown validation mode '{0}'. Expected one of: on-blur, on-change, on-submit")]
pub struct ParseValidationModeError(String);

impl FromStr for ValidationMode {
    type Err = ParseValidationModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "on-blur" | "onblur" | "blur" => Ok(ValidationMode::OnBlur),
            "on-change" | "onchange" | "change" => Ok(ValidationMode::OnChange),
            "on-submit" | "onsubmit" | "submit" => Ok(ValidationMode::OnSubmit),
            other => Err(ParseValidationModeError(other.to_string())),
        }
    }
}

/// Lifecycle of a form instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Empty,
    Editing,
    Validating,
    Valid,
    Invalid,
    Submitted,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct FieldState {
    touched: bool,
    dirty: bool,
}

/// Mutable state of one output form
#[derive(Debug, Clone)]
pub struct FormState {
    values: FieldValues,
    fields: BTreeMap<FieldName, FieldState>,
    errors: FieldErrors,
    phase: FormPhase,
    mode: ValidationMode,
    submit_count: usize,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new(ValidationMode::default())
    }
}

impl FormState {
    pub fn new(mode: ValidationMode) -> Self {
        Self {
            values: FieldValues::new(),
            fields: FieldName::ALL
                .into_iter()
                .map(|name| (name, FieldState::default()))
                .collect(),
            errors: FieldErrors::new(),
            phase: FormPhase::Empty,
            mode,
            submit_count: 0,
        }
    }

    /// Seed initial values. Seeded fields stay pristine; blank seeds leave
    /// the form `Empty`.
    pub fn with_defaults(mut self, values: FieldValues) -> Self {
        let has_content = FieldName::ALL
            .into_iter()
            .any(|name| values.get(name).is_some_and(|v| !v.is_empty()));
        if has_content {
            self.phase = FormPhase::Editing;
        }
        self.values = values;
        self
    }

    pub fn set_field(&mut self, name: FieldName, value: impl Into<String>) {
        if self.is_submitted() {
            warn!(field = %name, "Ignoring edit on submitted form");
            return;
        }
        self.values.set(name, value);
        self.after_edit(name);
    }

    pub fn clear_field(&mut self, name: FieldName) {
        if self.is_submitted() {
            warn!(field = %name, "Ignoring edit on submitted form");
            return;
        }
        self.values.clear(name);
        self.after_edit(name);
    }

    fn after_edit(&mut self, name: FieldName) {
        self.field_state_mut(name).dirty = true;
        self.phase = FormPhase::Editing;
        // Once a submit has failed, Editing is only transient.
        if self.mode == ValidationMode::OnChange || self.submit_count > 0 {
            let _ = self.run_validation();
        }
    }

    /// Mark a field as left by the user.
    pub fn blur(&mut self, name: FieldName) {
        if self.is_submitted() {
            return;
        }
        let state = self.field_state_mut(name);
        if !state.touched {
            debug!(field = %name, "Field touched");
            state.touched = true;
        }
        if self.mode == ValidationMode::OnBlur {
            let _ = self.run_validation();
        }
    }

    /// Re-validate the whole record and refresh every field's error.
    pub fn validate(&mut self) -> Result<OutputSubmission, FieldErrors> {
        if self.is_submitted() {
            return schema::validate(&self.values);
        }
        self.run_validation()
    }

    fn run_validation(&mut self) -> Result<OutputSubmission, FieldErrors> {
        self.phase = FormPhase::Validating;
        let result = schema::validate(&self.values);
        match &result {
            Ok(_) => {
                self.errors = FieldErrors::new();
                self.phase = FormPhase::Valid;
            }
            Err(errors) => {
                debug!(failing = errors.len(), "Validation failed");
                self.errors = errors.clone();
                self.phase = FormPhase::Invalid;
            }
        }
        result
    }

    /// Validate and, when the record passes, hand it to `handler`.
    pub async fn submit(
        &mut self,
        handler: &dyn SubmissionHandler,
    ) -> Result<OutputSubmission, FormError> {
        if self.is_submitted() {
            return Err(FormError::AlreadySubmitted);
        }

        self.submit_count += 1;
        for state in self.fields.values_mut() {
            state.touched = true;
        }

        let record = match self.run_validation() {
            Ok(record) => record,
            Err(errors) => {
                info!(
                    attempt = self.submit_count,
                    failing = errors.len(),
                    "Submit rejected by validation"
                );
                return Err(FormError::Invalid(errors));
            }
        };

        handler
            .submit(&record)
            .await
            .map_err(FormError::Submission)?;

        self.phase = FormPhase::Submitted;
        info!(attempt = self.submit_count, "Form submitted");
        Ok(record)
    }

    /// Return to the empty state, keeping the validation mode
    pub fn reset(&mut self) {
        *self = Self::new(self.mode);
    }

    pub fn values(&self) -> &FieldValues {
        &self.values
    }

    pub fn value(&self, name: FieldName) -> Option<&str> {
        self.values.get(name)
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, name: FieldName) -> Option<&FieldError> {
        self.errors.get(name)
    }

    pub fn is_touched(&self, name: FieldName) -> bool {
        self.fields.get(&name).is_some_and(|s| s.touched)
    }

    pub fn is_dirty(&self, name: FieldName) -> bool {
        self.fields.get(&name).is_some_and(|s| s.dirty)
    }

    pub fn is_submitted(&self) -> bool {
        self.phase == FormPhase::Submitted
    }

    pub fn submit_count(&self) -> usize {
        self.submit_count
    }

    fn field_state_mut(&mut self, name: FieldName) -> &mut FieldState {
        self.fields.entry(name).or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AsapFunded, OutputType};
    use crate::schema::{
        ASAP_FUNDED_REQUIRED, TITLE_REQUIRED, TYPE_REQUIRED, URL_FORMAT, URL_REQUIRED,
    };
    use crate::submit::testing::{FailingSubmitter, RecordingSubmitter};

    fn fill(form: &mut FormState, entries: &[(FieldName, &str)]) {
        for (name, value) in entries {
            form.set_field(*name, *value);
        }
    }

    #[tokio::test]
    async fn test_empty_submit_shows_all_required_errors() {
        let mut form = FormState::default();
        let handler = RecordingSubmitter::default();
        fill(&mut form, &[(FieldName::Title, ""), (FieldName::Url, "")]);

        let err = form.submit(&handler).await.unwrap_err();
        assert!(matches!(err, FormError::Invalid(_)));
        assert_eq!(form.phase(), FormPhase::Invalid);
        assert_eq!(form.error(FieldName::Title).unwrap().message(), TITLE_REQUIRED);
        assert_eq!(form.error(FieldName::Url).unwrap().message(), URL_REQUIRED);
        assert_eq!(form.error(FieldName::Type).unwrap().message(), TYPE_REQUIRED);
        assert_eq!(
            form.error(FieldName::AsapFunded).unwrap().message(),
            ASAP_FUNDED_REQUIRED
        );
        assert_eq!(form.errors().len(), 4);
        assert!(handler.received().is_empty());
    }

    #[tokio::test]
    async fn test_valid_submit_hands_exact_record_to_handler() {
        let mut form = FormState::default();
        let handler = RecordingSubmitter::default();
        fill(
            &mut form,
            &[
                (FieldName::Title, "My Paper"),
                (FieldName::Url, "http://example.com"),
                (FieldName::UsageNotes, ""),
                (FieldName::Type, "Published"),
                (FieldName::AsapFunded, "Yes"),
            ],
        );

        let record = form.submit(&handler).await.unwrap();
        let expected = OutputSubmission {
            title: "My Paper".to_string(),
            url: "http://example.com".to_string(),
            usage_notes: Some(String::new()),
            output_type: OutputType::Published,
            asap_funded: AsapFunded::Yes,
        };
        assert_eq!(record, expected);
        assert_eq!(handler.received(), vec![expected]);
        assert_eq!(form.phase(), FormPhase::Submitted);
    }

    #[tokio::test]
    async fn test_bad_scheme_fails_only_url() {
        let mut form = FormState::default();
        let handler = RecordingSubmitter::default();
        fill(
            &mut form,
            &[
                (FieldName::Title, "X"),
                (FieldName::Url, "ftp://example.com"),
                (FieldName::Type, "Preprint"),
                (FieldName::AsapFunded, "No"),
            ],
        );

        assert!(form.submit(&handler).await.is_err());
        let failing: Vec<_> = form.errors().fields().collect();
        assert_eq!(failing, vec![FieldName::Url]);
        assert!(matches!(
            form.error(FieldName::Url),
            Some(FieldError::Format { message: URL_FORMAT, .. })
        ));
        assert!(handler.received().is_empty());
    }

    #[test]
    fn test_blur_validates_whole_record() {
        let mut form = FormState::default();
        form.blur(FieldName::Title);

        assert!(form.is_touched(FieldName::Title));
        assert!(!form.is_touched(FieldName::Url));
        assert_eq!(form.phase(), FormPhase::Invalid);
        for name in [
            FieldName::Title,
            FieldName::Url,
            FieldName::Type,
            FieldName::AsapFunded,
        ] {
            assert!(form.error(name).is_some(), "{name} should have an error");
        }
        assert!(form.error(FieldName::UsageNotes).is_none());
    }

    #[test]
    fn test_phase_transitions() {
        let mut form = FormState::default();
        assert_eq!(form.phase(), FormPhase::Empty);

        form.set_field(FieldName::Title, "T");
        assert_eq!(form.phase(), FormPhase::Editing);
        assert!(form.is_dirty(FieldName::Title));
        assert!(form.errors().is_empty());

        form.blur(FieldName::Title);
        assert_eq!(form.phase(), FormPhase::Invalid);

        form.set_field(FieldName::Url, "https://example.com");
        assert_eq!(form.phase(), FormPhase::Editing);
        // errors stay until the next blur in on-blur mode
        assert!(form.error(FieldName::Url).is_some());

        form.set_field(FieldName::Type, "Preprint");
        form.set_field(FieldName::AsapFunded, "Not Sure");
        form.blur(FieldName::AsapFunded);
        assert_eq!(form.phase(), FormPhase::Valid);
        assert!(form.errors().is_empty());
    }

    #[test]
    fn test_on_submit_mode_ignores_blur() {
        let mut form = FormState::new(ValidationMode::OnSubmit);
        form.blur(FieldName::Title);
        assert!(form.is_touched(FieldName::Title));
        assert!(form.errors().is_empty());
        assert_eq!(form.phase(), FormPhase::Empty);
    }

    #[test]
    fn test_on_change_mode_validates_each_edit() {
        let mut form = FormState::new(ValidationMode::OnChange);
        form.set_field(FieldName::Url, "ftp://x");
        assert!(matches!(
            form.error(FieldName::Url),
            Some(FieldError::Format { .. })
        ));
        form.set_field(FieldName::Url, "https://example.com");
        assert!(form.error(FieldName::Url).is_none());
    }

    #[tokio::test]
    async fn test_edits_revalidate_after_failed_submit() {
        let mut form = FormState::default();
        let handler = RecordingSubmitter::default();
        assert!(form.submit(&handler).await.is_err());
        assert!(form.error(FieldName::Title).is_some());

        form.set_field(FieldName::Title, "Fixed");
        assert!(form.error(FieldName::Title).is_none());
        assert_eq!(form.phase(), FormPhase::Invalid);

        // Each edit lands straight in Valid or Invalid, never Editing
        form.set_field(FieldName::Url, "https://example.com");
        form.set_field(FieldName::Type, "Published");
        assert_eq!(form.phase(), FormPhase::Invalid);
        form.set_field(FieldName::AsapFunded, "No");
        assert_eq!(form.phase(), FormPhase::Valid);
        form.clear_field(FieldName::Type);
        assert_eq!(form.phase(), FormPhase::Invalid);
    }

    #[test]
    fn test_blank_defaults_keep_form_empty() {
        let form = FormState::default().with_defaults(FieldValues::new().with_blank_text_fields());
        assert_eq!(form.phase(), FormPhase::Empty);
        assert_eq!(form.value(FieldName::UsageNotes), Some(""));
    }

    #[tokio::test]
    async fn test_submitted_form_is_terminal() {
        let mut form = FormState::default().with_defaults(
            FieldValues::new()
                .with(FieldName::Title, "T")
                .with(FieldName::Url, "https://example.com")
                .with(FieldName::Type, "Preprint")
                .with(FieldName::AsapFunded, "No"),
        );
        let handler = RecordingSubmitter::default();
        form.submit(&handler).await.unwrap();

        form.set_field(FieldName::Title, "changed");
        assert_eq!(form.value(FieldName::Title), Some("T"));
        assert!(matches!(
            form.submit(&handler).await,
            Err(FormError::AlreadySubmitted)
        ));
        assert_eq!(handler.received().len(), 1);
    }

    #[tokio::test]
    async fn test_handler_failure_leaves_form_retryable() {
        let mut form = FormState::default().with_defaults(
            FieldValues::new()
                .with(FieldName::Title, "T")
                .with(FieldName::Url, "https://example.com")
                .with(FieldName::Type, "Published")
                .with(FieldName::AsapFunded, "Yes"),
        );

        let err = form.submit(&FailingSubmitter).await.unwrap_err();
        assert!(matches!(err, FormError::Submission(_)));
        assert_eq!(form.phase(), FormPhase::Valid);

        let handler = RecordingSubmitter::default();
        form.submit(&handler).await.unwrap();
        assert_eq!(form.submit_count(), 2);
    }

    #[test]
    fn test_defaults_are_pristine_and_reset_clears() {
        let mut form = FormState::default()
            .with_defaults(FieldValues::new().with(FieldName::Title, "Seeded"));
        assert!(!form.is_dirty(FieldName::Title));
        assert_eq!(form.value(FieldName::Title), Some("Seeded"));

        form.blur(FieldName::Title);
        form.reset();
        assert_eq!(form.phase(), FormPhase::Empty);
        assert_eq!(form.value(FieldName::Title), None);
        assert!(!form.is_touched(FieldName::Title));
        assert!(form.errors().is_empty());
    }

    #[test]
    fn test_validation_mode_parsing() {
        assert_eq!("on-blur".parse::<ValidationMode>().unwrap(), ValidationMode::OnBlur);
        assert_eq!("ON_CHANGE".parse::<ValidationMode>().unwrap(), ValidationMode::OnChange);
        assert_eq!("submit".parse::<ValidationMode>().unwrap(), ValidationMode::OnSubmit);
        assert!("whenever".parse::<ValidationMode>().is_err());
    }
}
