//! Description prompt templates exposed as `prompt://` resources
//!
//! Templates live as `generate-description-<kind>.md` files in a single
//! directory. Listing never fails: a missing directory simply has no
//! templates. Reading resolves a `prompt://<file>` URI to one of those files
//! and refuses anything that would leave the directory.

use crate::classifier::TEMPLATE_PREFIX;
use crate::error::{JiraAssistantError, Result};
use serde::Serialize;
use std::path::{Component, Path, PathBuf};

/// URI scheme for template resources
pub const PROMPT_URI_SCHEME: &str = "prompt://";

/// MIME type of every template
pub const TEMPLATE_MIME_TYPE: &str = "text/markdown";

/// A template file available as a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptTemplate {
    /// File name inside the templates directory
    pub file_name: String,
    /// `prompt://<file_name>`
    pub uri: String,
    /// Human readable name, e.g. `Prompt Template: Tech Debt`
    pub name: String,
    /// One-line description
    pub description: String,
    /// File size in bytes
    pub size: u64,
}

/// Read-only view of the templates directory
#[derive(Debug, Clone)]
pub struct PromptTemplates {
    dir: PathBuf,
}

impl PromptTemplates {
    /// Create a view of `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The templates directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// All templates, sorted by file name
    pub fn list(&self) -> Vec<PromptTemplate> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!("No templates in {}: {}", self.dir.display(), e);
                return Vec::new();
            }
        };

        let mut templates: Vec<PromptTemplate> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|entry| {
                let file_name = entry.file_name().into_string().ok()?;
                if !is_template_file(&file_name) {
                    return None;
                }
                let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
                Some(describe(file_name, size))
            })
            .collect();

        templates.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        templates
    }

    /// Path of a template file if it exists in the directory
    pub fn path_for(&self, file_name: &str) -> Option<PathBuf> {
        if !is_plain_file_name(file_name) {
            return None;
        }
        let path = self.dir.join(file_name);
        path.is_file().then_some(path)
    }

    /// Contents of the template addressed by a `prompt://` URI
    pub fn read(&self, uri: &str) -> Result<String> {
        let file_name = uri
            .strip_prefix(PROMPT_URI_SCHEME)
            .ok_or_else(|| JiraAssistantError::Template(format!("Unknown resource URI: {uri}")))?;

        let path = self.path_for(file_name).ok_or_else(|| {
            JiraAssistantError::Template(format!("Prompt template not found: {file_name}"))
        })?;

        Ok(std::fs::read_to_string(path)?)
    }
}

fn is_template_file(file_name: &str) -> bool {
    file_name.starts_with(TEMPLATE_PREFIX) && file_name.ends_with(".md")
}

fn is_plain_file_name(file_name: &str) -> bool {
    let mut components = Path::new(file_name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

fn describe(file_name: String, size: u64) -> PromptTemplate {
    let title = title_case(
        &file_name
            .trim_start_matches(TEMPLATE_PREFIX)
            .trim_end_matches(".md")
            .replace('-', " "),
    );

    PromptTemplate {
        uri: format!("{PROMPT_URI_SCHEME}{file_name}"),
        name: format!("Prompt Template: {title}"),
        description: format!("AI prompt template for {title} ticket descriptions"),
        file_name,
        size,
    }
}

fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn templates_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("generate-description-story.md"), "# Story\n").unwrap();
        std::fs::write(dir.path().join("generate-description-tech-debt.md"), "# Debt\n").unwrap();
        std::fs::write(dir.path().join("generate-description-bug.md"), "# Bug\n").unwrap();
        std::fs::write(dir.path().join("notes.md"), "ignored").unwrap();
        std::fs::write(dir.path().join("generate-description-story.txt"), "ignored").unwrap();
        dir
    }

    #[test]
    fn test_list_is_sorted_and_filtered() {
        let dir = templates_dir();
        let templates = PromptTemplates::new(dir.path()).list();

        let uris: Vec<_> = templates.iter().map(|t| t.uri.as_str()).collect();
        assert_eq!(
            uris,
            vec![
                "prompt://generate-description-bug.md",
                "prompt://generate-description-story.md",
                "prompt://generate-description-tech-debt.md",
            ]
        );
        assert_eq!(templates[2].name, "Prompt Template: Tech Debt");
        assert_eq!(templates[0].size, 6);
    }

    #[test]
    fn test_missing_directory_lists_nothing() {
        let dir = TempDir::new().unwrap();
        let templates = PromptTemplates::new(dir.path().join("absent"));
        assert!(templates.list().is_empty());
    }

    #[test]
    fn test_read_by_uri() {
        let dir = templates_dir();
        let templates = PromptTemplates::new(dir.path());
        assert_eq!(
            templates.read("prompt://generate-description-bug.md").unwrap(),
            "# Bug\n"
        );
    }

    #[test]
    fn test_read_rejects_bad_uris() {
        let dir = templates_dir();
        let templates = PromptTemplates::new(dir.path());

        let err = templates.read("file:///etc/passwd").unwrap_err();
        assert!(err.to_string().contains("Unknown resource URI"));

        let err = templates.read("prompt://generate-description-epic.md").unwrap_err();
        assert!(err.to_string().contains("not found"));

        assert!(templates.read("prompt://../secret.md").is_err());
        assert!(templates.read("prompt://").is_err());
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("tech debt"), "Tech Debt");
        assert_eq!(title_case("DEFAULT"), "Default");
    }
}
