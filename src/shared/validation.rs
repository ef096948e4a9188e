use lazy_static::lazy_static;
use regex::Regex;
use validator::{ValidationError, ValidationErrors};

use crate::shared::constants::MAX_FILE_NAME_LENGTH;

lazy_static! {
    /// Regex for validating stored file names
    /// Word characters (Unicode aware, so Cyrillic letters pass) and hyphens,
    /// optionally followed by dot-separated extensions.
    /// Emptiness is reported by the length rule, so the empty string matches here.
    /// - Valid: "report", "test.mp3", "aaa.test.png", "отчет_2020.txt", "my-file.tar.gz"
    /// - Invalid: "bad name.txt", ".hidden", "file.", "a..b", "a/b.txt"
    pub static ref FILE_NAME_REGEX: Regex =
        Regex::new(r"^(?:[\w\-]+(?:\.[\w\-]+)*)?$").unwrap();
}

/// Bound file names so they always fit a keyword term in the index
pub fn validate_file_name_length(name: &str) -> Result<(), ValidationError> {
    if name.chars().count() > MAX_FILE_NAME_LENGTH {
        return Err(ValidationError::new("length").with_message(
            format!(
                "name of file must not exceed {} characters",
                MAX_FILE_NAME_LENGTH
            )
            .into(),
        ));
    }
    Ok(())
}

/// Flatten field errors into their messages, ordered by field name
pub fn validation_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect()
}
