//! Heuristic selection of description templates
//!
//! Free-text ticket fields are matched against an ordered list of regular
//! expressions; the first rule that matches decides the category. Rule order
//! matters: version upgrades win over the word "fix", and investigation
//! wording wins over the word "issue".

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// File name prefix shared by all description templates
pub const TEMPLATE_PREFIX: &str = "generate-description-";

/// Template used when an issue type is not recognised
pub const DEFAULT_TEMPLATE_FILE: &str = "generate-description-default.md";

/// The content-template families a ticket can be written against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateCategory {
    /// User-facing feature work
    Story,
    /// Defect reports
    Bug,
    /// Time-boxed research
    Spike,
    /// Upgrades, refactoring and cleanup
    #[default]
    TechDebt,
}

impl TemplateCategory {
    /// All categories in declaration order
    pub const ALL: [TemplateCategory; 4] = [
        TemplateCategory::Story,
        TemplateCategory::Bug,
        TemplateCategory::Spike,
        TemplateCategory::TechDebt,
    ];

    /// Lower-case name used in template file names
    pub const fn as_str(self) -> &'static str {
        match self {
            TemplateCategory::Story => "story",
            TemplateCategory::Bug => "bug",
            TemplateCategory::Spike => "spike",
            TemplateCategory::TechDebt => "tech-debt",
        }
    }

    /// Template file for this category, e.g. `generate-description-bug.md`
    pub const fn template_file_name(self) -> &'static str {
        match self {
            TemplateCategory::Story => "generate-description-story.md",
            TemplateCategory::Bug => "generate-description-bug.md",
            TemplateCategory::Spike => "generate-description-spike.md",
            TemplateCategory::TechDebt => "generate-description-tech-debt.md",
        }
    }
}

impl fmt::Display for TemplateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown category name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown template category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for TemplateCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TemplateCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// One entry of the ordered rule list
#[derive(Debug, Clone)]
pub struct ClassificationRule {
    /// Category chosen when the pattern matches
    pub category: TemplateCategory,
    /// Pattern applied to the lower-cased ticket text
    pub pattern: Regex,
}

impl ClassificationRule {
    fn new(category: TemplateCategory, pattern: &str) -> Self {
        Self {
            category,
            // Patterns are compile-time literals covered by the tests below
            pattern: Regex::new(pattern).unwrap_or_else(|e| panic!("invalid rule {pattern}: {e}")),
        }
    }

    /// Whether this rule matches already lower-cased text
    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

static RULES: Lazy<Vec<ClassificationRule>> = Lazy::new(|| {
    use TemplateCategory::*;

    vec![
        ClassificationRule::new(
            TechDebt,
            r"upgrade|migration|migrate|modernize|spring boot [0-9]|java [0-9]+|update.*version|dependency.*update",
        ),
        ClassificationRule::new(
            Spike,
            r"spike|research|investigate|exploration|evaluate|assess|poc|proof of concept|feasibility|study|compare|analysis",
        ),
        ClassificationRule::new(
            Bug,
            r"\bbug\b|defect|broken|\berror\b|\bfail|not working|\bcrash|exception|incorrect|\bfix\b.*\bissue",
        ),
        ClassificationRule::new(
            Story,
            r"\bfeature\b|enhancement|user story|capability|enable|allow|add support|new functionality|implement.*feature",
        ),
        ClassificationRule::new(
            TechDebt,
            r"refactor|technical debt|\bimprove|optimization|\bupdate\b|\bcleanup\b|\bdebt\b",
        ),
    ]
});

/// Ordered, first-match-wins ticket classifier
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateClassifier;

impl TemplateClassifier {
    /// The rules in evaluation order
    pub fn rules() -> &'static [ClassificationRule] {
        &RULES
    }

    /// Index of the first rule matching `text`, which must already be lower-cased
    pub fn matching_rule(text: &str) -> Option<usize> {
        RULES.iter().position(|rule| rule.matches(text))
    }

    /// Classify a ticket from its summary and description
    pub fn classify(summary: &str, description: &str) -> TemplateCategory {
        let text = format!("{summary} {description}").to_lowercase();
        let category = Self::matching_rule(&text)
            .map(|index| RULES[index].category)
            .unwrap_or_default();
        tracing::debug!("Classified {:?} as {}", summary, category);
        category
    }
}

/// Classify a ticket from its summary and description
pub fn classify(summary: &str, description: &str) -> TemplateCategory {
    TemplateClassifier::classify(summary, description)
}

/// Template file for an explicit issue type, compared case-insensitively
pub fn template_file_for_issue_type(issue_type: &str) -> &'static str {
    match issue_type.trim().to_lowercase().as_str() {
        "story" | "new feature" | "feature" => TemplateCategory::Story.template_file_name(),
        "bug" | "defect" => TemplateCategory::Bug.template_file_name(),
        "spike" | "research" | "investigation" => TemplateCategory::Spike.template_file_name(),
        "technical debt" | "improvement" | "tech debt" | "tech-debt" | "refactor" => {
            TemplateCategory::TechDebt.template_file_name()
        }
        _ => DEFAULT_TEMPLATE_FILE,
    }
}

/// Short template name from a template file path, e.g. `story` for
/// `.prompts/generate-description-story.md`
pub fn template_name(path: &str) -> String {
    let file_name = std::path::Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string());
    file_name
        .replace(TEMPLATE_PREFIX, "")
        .replace(".md", "")
}
