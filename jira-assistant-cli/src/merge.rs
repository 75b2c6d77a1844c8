//! `merge-adf` command

use crate::error::CliResult;
use jira_assistant::adf;
use std::path::Path;

/// Merge `enhanced` after `original` and write the result to `output`
pub fn run_merge_adf(original: &Path, enhanced: &Path, output: &Path) -> CliResult<()> {
    let merged = adf::merge_files(original, enhanced, output)?;
    tracing::info!("Merged document has {} blocks", merged.content.len());

    println!("Wrote merged ADF to {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit_codes::{EXIT_ERROR, EXIT_WARNING};
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_merge() {
        let temp = TempDir::new().unwrap();
        let original = temp.path().join("original.json");
        let enhanced = temp.path().join("enhanced.json");
        let output = temp.path().join("merged.json");
        std::fs::write(&original, json!({"type": "doc", "version": 1, "content": []}).to_string())
            .unwrap();
        std::fs::write(
            &enhanced,
            json!({"content": [{"type": "paragraph", "content": []}]}).to_string(),
        )
        .unwrap();

        run_merge_adf(&original, &enhanced, &output).unwrap();
        assert!(output.exists());
    }

    #[test]
    fn test_invalid_document_is_exit_2() {
        let temp = TempDir::new().unwrap();
        let original = temp.path().join("original.json");
        let enhanced = temp.path().join("enhanced.json");
        std::fs::write(&original, "\"just a string\"").unwrap();
        std::fs::write(&enhanced, "{\"content\": []}").unwrap();

        let err = run_merge_adf(&original, &enhanced, &temp.path().join("out.json")).unwrap_err();
        assert_eq!(err.exit_code, EXIT_ERROR);
        assert!(err.message.contains("original"));
    }

    #[test]
    fn test_missing_file_is_exit_1() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.json");

        let err = run_merge_adf(&missing, &missing, &temp.path().join("out.json")).unwrap_err();
        assert_eq!(err.exit_code, EXIT_WARNING);
    }
}
