//! Paste submission validation against configured limits.

use crate::config::PasteLimits;
use crate::models::paste::PasteSubmission;
use thiserror::Error;

/// A user-correctable problem with a paste submission.
///
/// Every variant maps to HTTP 400.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing the \"files\" parameter.")]
    MissingFiles,

    #[error("Paste exceeds the file limit of \"{limit}\" files.")]
    TooManyFiles { limit: usize },

    #[error("The file at index \"{index}\" is missing the content parameter.")]
    MissingContent { index: usize },

    #[error("The file at index \"{index}\" has no content.")]
    EmptyContent { index: usize },

    #[error("The file at index \"{index}\" exceeds content size limits of \"{limit}\" characters.")]
    ContentTooLarge { index: usize, limit: usize },
}

/// Check a submission against `limits`.
///
/// Checks run in a fixed order and stop at the first failure: the `files`
/// key, the file count, then each file in list order (missing content, empty
/// content, oversized content). An empty `files` list passes.
///
/// # Returns
/// `Ok(())` when the submission is within limits.
///
/// # Errors
/// Returns the first [`ValidationError`] encountered.
pub fn validate_paste(
    submission: &PasteSubmission,
    limits: &PasteLimits,
) -> Result<(), ValidationError> {
    let files = submission
        .files
        .as_ref()
        .ok_or(ValidationError::MissingFiles)?;

    if files.len() > limits.file_limit {
        return Err(ValidationError::TooManyFiles {
            limit: limits.file_limit,
        });
    }

    for (index, file) in files.iter().enumerate() {
        let content = match &file.content {
            None => return Err(ValidationError::MissingContent { index }),
            Some(None) => return Err(ValidationError::EmptyContent { index }),
            Some(Some(content)) => content,
        };

        if content.is_empty() {
            return Err(ValidationError::EmptyContent { index });
        }

        // Limits count characters, not bytes.
        if content.chars().count() > limits.char_limit {
            return Err(ValidationError::ContentTooLarge {
                index,
                limit: limits.char_limit,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::paste::FileSubmission;

    fn limits(char_limit: usize, file_limit: usize) -> PasteLimits {
        PasteLimits {
            char_limit,
            file_limit,
        }
    }

    fn submission(files: Vec<FileSubmission>) -> PasteSubmission {
        PasteSubmission {
            files: Some(files),
            ..PasteSubmission::default()
        }
    }

    fn parse(json: &str) -> PasteSubmission {
        serde_json::from_str(json).expect("submission json")
    }

    #[test]
    fn accepts_files_within_limits() {
        let paste = submission(vec![
            FileSubmission::with_content("hello"),
            FileSubmission::with_content("world"),
        ]);
        assert_eq!(validate_paste(&paste, &limits(10, 2)), Ok(()));
    }

    #[test]
    fn missing_files_is_reported_before_anything_else() {
        let paste = parse(r#"{"password": "x"}"#);
        assert_eq!(
            validate_paste(&paste, &limits(0, 0)),
            Err(ValidationError::MissingFiles)
        );
    }

    #[test]
    fn file_limit_wins_regardless_of_contents() {
        let cases = [
            vec![FileSubmission::default(); 3],
            vec![FileSubmission::with_content(""); 3],
            vec![FileSubmission::with_content("x".repeat(100)); 3],
            vec![FileSubmission::with_content("ok"); 3],
        ];
        for files in cases {
            assert_eq!(
                validate_paste(&submission(files), &limits(5, 2)),
                Err(ValidationError::TooManyFiles { limit: 2 })
            );
        }
    }

    #[test]
    fn reports_the_first_failing_file_in_list_order() {
        let paste = submission(vec![
            FileSubmission::with_content("fine"),
            FileSubmission::with_content(""),
            FileSubmission::default(),
        ]);
        assert_eq!(
            validate_paste(&paste, &limits(10, 5)),
            Err(ValidationError::EmptyContent { index: 1 })
        );

        let paste = submission(vec![
            FileSubmission::with_content("fine"),
            FileSubmission::default(),
            FileSubmission::with_content(""),
        ]);
        assert_eq!(
            validate_paste(&paste, &limits(10, 5)),
            Err(ValidationError::MissingContent { index: 1 })
        );
    }

    #[test]
    fn distinguishes_missing_from_null_content() {
        let missing = parse(r#"{"files": [{"filename": "a.txt"}]}"#);
        assert_eq!(
            validate_paste(&missing, &limits(10, 5)),
            Err(ValidationError::MissingContent { index: 0 })
        );

        let null = parse(r#"{"files": [{"content": null}]}"#);
        assert_eq!(
            validate_paste(&null, &limits(10, 5)),
            Err(ValidationError::EmptyContent { index: 0 })
        );
    }

    #[test]
    fn content_limit_counts_characters_not_bytes() {
        let multibyte = "é".repeat(4);
        assert_eq!(multibyte.len(), 8);
        let paste = submission(vec![FileSubmission::with_content(multibyte)]);
        assert_eq!(validate_paste(&paste, &limits(4, 1)), Ok(()));

        let paste = submission(vec![
            FileSubmission::with_content("ok"),
            FileSubmission::with_content("12345"),
        ]);
        assert_eq!(
            validate_paste(&paste, &limits(4, 2)),
            Err(ValidationError::ContentTooLarge { index: 1, limit: 4 })
        );
    }

    #[test]
    fn empty_file_list_passes_validation() {
        assert_eq!(validate_paste(&submission(Vec::new()), &limits(10, 1)), Ok(()));
    }

    #[test]
    fn messages_match_api_wording() {
        assert_eq!(
            ValidationError::MissingFiles.to_string(),
            "Missing the \"files\" parameter."
        );
        assert_eq!(
            ValidationError::TooManyFiles { limit: 5 }.to_string(),
            "Paste exceeds the file limit of \"5\" files."
        );
        assert_eq!(
            ValidationError::MissingContent { index: 2 }.to_string(),
            "The file at index \"2\" is missing the content parameter."
        );
        assert_eq!(
            ValidationError::EmptyContent { index: 0 }.to_string(),
            "The file at index \"0\" has no content."
        );
        assert_eq!(
            ValidationError::ContentTooLarge {
                index: 1,
                limit: 300_000
            }
            .to_string(),
            "The file at index \"1\" exceeds content size limits of \"300000\" characters."
        );
    }
}
