use serde::{Deserialize, Serialize};
use std::fmt;

/// Fields of the output form, in validation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldName {
    Title,
    Url,
    UsageNotes,
    Type,
    AsapFunded,
}

impl FieldName {
    pub const ALL: [FieldName; 5] = [
        FieldName::Title,
        FieldName::Url,
        FieldName::UsageNotes,
        FieldName::Type,
        FieldName::AsapFunded,
    ];

    /// Name used in the serialized record
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::Title => "title",
            FieldName::Url => "url",
            FieldName::UsageNotes => "usageNotes",
            FieldName::Type => "type",
            FieldName::AsapFunded => "asapFunded",
        }
    }

    /// Label shown next to the control
    pub fn label(&self) -> &'static str {
        match self {
            FieldName::Title => "Title (required)",
            FieldName::Url => "URL (required)",
            FieldName::UsageNotes => "Usage notes (optional)",
            FieldName::Type => "Type (required)",
            FieldName::AsapFunded => "Has this output been funded by ASAP (required)",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputType {
    Published,
    Preprint,
}

impl OutputType {
    pub const ALL: [OutputType; 2] = [OutputType::Preprint, OutputType::Published];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputType::Published => "Published",
            OutputType::Preprint => "Preprint",
        }
    }

    /// Exact-match parse; anything else is treated as unset
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AsapFunded {
    Yes,
    No,
    #[serde(rename = "Not Sure")]
    NotSure,
}

impl AsapFunded {
    pub const ALL: [AsapFunded; 3] = [AsapFunded::Yes, AsapFunded::No, AsapFunded::NotSure];

    pub fn as_str(&self) -> &'static str {
        match self {
            AsapFunded::Yes => "Yes",
            AsapFunded::No => "No",
            AsapFunded::NotSure => "Not Sure",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == value)
    }
}

/// A validated output record, as handed to the submission handler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputSubmission {
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_notes: Option<String>,
    #[serde(rename = "type")]
    pub output_type: OutputType,
    pub asap_funded: AsapFunded,
}

/// Raw form content before validation. `None` means the field was never set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValues {
    pub title: Option<String>,
    pub url: Option<String>,
    pub usage_notes: Option<String>,
    pub output_type: Option<String>,
    pub asap_funded: Option<String>,
}

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: FieldName) -> Option<&str> {
        self.slot(name).as_deref()
    }

    pub fn set(&mut self, name: FieldName, value: impl Into<String>) {
        *self.slot_mut(name) = Some(value.into());
    }

    pub fn clear(&mut self, name: FieldName) {
        *self.slot_mut(name) = None;
    }

    pub fn with(mut self, name: FieldName, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Fill unset free-text fields with `""`, the value an untouched text
    /// control holds. Choice fields stay unset.
    pub fn with_blank_text_fields(mut self) -> Self {
        for name in [FieldName::Title, FieldName::Url, FieldName::UsageNotes] {
            self.slot_mut(name).get_or_insert_with(String::new);
        }
        self
    }

    fn slot(&self, name: FieldName) -> &Option<String> {
        match name {
            FieldName::Title => &self.title,
            FieldName::Url => &self.url,
            FieldName::UsageNotes => &self.usage_notes,
            FieldName::Type => &self.output_type,
            FieldName::AsapFunded => &self.asap_funded,
        }
    }

    fn slot_mut(&mut self, name: FieldName) -> &mut Option<String> {
        match name {
            FieldName::Title => &mut self.title,
            FieldName::Url => &mut self.url,
            FieldName::UsageNotes => &mut self.usage_notes,
            FieldName::Type => &mut self.output_type,
            FieldName::AsapFunded => &mut self.asap_funded,
        }
    }
}
