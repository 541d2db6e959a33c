use clap::Parser;

use crate::models::{FieldName, FieldValues};

#[derive(Parser, Debug)]
#[command(name = "output-form")]
#[command(about = "Register a research output: title, URL, usage notes, type and ASAP funding")]
#[command(version)]
pub struct Cli {
    /// Validate and submit without the interactive TUI
    #[arg(long)]
    pub cli: bool,

    /// Output title
    #[arg(long)]
    pub title: Option<String>,

    /// Output URL (http:// or https://)
    #[arg(long)]
    pub url: Option<String>,

    /// Free-form usage notes
    #[arg(long)]
    pub usage_notes: Option<String>,

    /// Output type (Published, Preprint)
    #[arg(long = "type", value_name = "TYPE")]
    pub output_type: Option<String>,

    /// Funded by ASAP (Yes, No, "Not Sure")
    #[arg(long)]
    pub asap_funded: Option<String>,
}

impl Cli {
    /// Field values given on the command line. Text fields not given are
    /// blank, as in a freshly mounted form.
    pub fn field_values(&self) -> FieldValues {
        let mut values = FieldValues::new().with_blank_text_fields();
        let given = [
            (FieldName::Title, &self.title),
            (FieldName::Url, &self.url),
            (FieldName::UsageNotes, &self.usage_notes),
            (FieldName::Type, &self.output_type),
            (FieldName::AsapFunded, &self.asap_funded),
        ];
        for (name, value) in given {
            if let Some(value) = value {
                values.set(name, value.clone());
            }
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_fields() {
        let cli = Cli::try_parse_from([
            "output-form",
            "--cli",
            "--title",
            "My Paper",
            "--url",
            "https://example.com",
            "--type",
            "Published",
            "--asap-funded",
            "Not Sure",
        ])
        .unwrap();

        assert!(cli.cli);
        let values = cli.field_values();
        assert_eq!(values.get(FieldName::Title), Some("My Paper"));
        assert_eq!(values.get(FieldName::Type), Some("Published"));
        assert_eq!(values.get(FieldName::AsapFunded), Some("Not Sure"));
        assert_eq!(values.get(FieldName::UsageNotes), Some(""));
    }

    #[test]
    fn test_no_arguments_means_empty_tui() {
        let cli = Cli::try_parse_from(["output-form"]).unwrap();
        assert!(!cli.cli);
        assert_eq!(
            cli.field_values(),
            FieldValues::new().with_blank_text_fields()
        );
    }
}
