//! `generate-estimation` command

use crate::error::CliResult;
use jira_assistant::adf;
use std::path::Path;

/// Write the estimation comment (or the bare document) to `output`
pub fn run_generate_estimation(
    points: &str,
    explanation: &str,
    output: &Path,
    document_only: bool,
) -> CliResult<()> {
    if document_only {
        adf::write_json(output, &adf::build_estimation_document(points, explanation))?;
    } else {
        adf::write_estimation(points, explanation, output)?;
    }
    tracing::debug!("Estimation of {} points written", points);

    println!("Wrote estimation ADF to {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn read(path: &Path) -> serde_json::Value {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_writes_comment_payload() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("nested/est.json");

        run_generate_estimation("8", "Two services change", &output, false).unwrap();

        let written = read(&output);
        assert_eq!(written["body"]["type"], "doc");
        assert_eq!(written["body"]["content"][1]["content"][1]["text"], "8");
    }

    #[test]
    fn test_document_only() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("doc.json");

        run_generate_estimation("3-5", "Unclear scope", &output, true).unwrap();

        let written = read(&output);
        assert_eq!(written["type"], "doc");
        assert!(written.get("body").is_none());
    }
}
