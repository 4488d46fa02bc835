//! Metadata hints extracted from a document's file path.
//!
//! Detects a feature name from a `features/<name>/` path segment, an epic
//! number from `epic-5` / `epic_5`, and a story identifier from `story-5.2` /
//! `story_5_2` (normalized to dotted form). Used by registration to seed
//! metadata before frontmatter and caller-supplied values take precedence.

use once_cell::sync::Lazy;
use regex::Regex;

static FEATURE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"features[/\\]([^/\\]+)").unwrap());
static EPIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)epic[-_](\d+)").unwrap());
static STORY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)story[-_](\d+)[._](\d+)").unwrap());

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathHints {
    pub feature: Option<String>,
    pub epic: Option<i64>,
    pub story: Option<String>,
}

/// Extracts feature/epic/story hints from a document's path string.
pub fn extract_path_hints(path: &str) -> PathHints {
    let feature = FEATURE_RE
        .captures(path)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_owned());

    let epic = EPIC_RE
        .captures(path)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<i64>().ok());

    let story = STORY_RE.captures(path).map(|caps| format!("{}.{}", &caps[1], &caps[2]));

    PathHints { feature, epic, story }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_feature_from_features_segment() {
        let hints = extract_path_hints("docs/features/auth-system/PRD.md");
        assert_eq!(hints.feature.as_deref(), Some("auth-system"));
    }

    #[test]
    fn extracts_epic_with_hyphen_or_underscore() {
        assert_eq!(extract_path_hints("docs/epic-5/x.md").epic, Some(5));
        assert_eq!(extract_path_hints("docs/epic_5/x.md").epic, Some(5));
    }

    #[test]
    fn extracts_story_and_normalizes_separator() {
        assert_eq!(
            extract_path_hints("docs/story-5.2.md").story.as_deref(),
            Some("5.2")
        );
        assert_eq!(
            extract_path_hints("docs/story_5_2.md").story.as_deref(),
            Some("5.2")
        );
    }

    #[test]
    fn full_example_path() {
        let hints =
            extract_path_hints("docs/features/auth-system/stories/epic-5/story-5.2.md");
        assert_eq!(hints.feature.as_deref(), Some("auth-system"));
        assert_eq!(hints.epic, Some(5));
        assert_eq!(hints.story.as_deref(), Some("5.2"));
    }

    #[test]
    fn no_hints_in_plain_path() {
        let hints = extract_path_hints("docs/README.md");
        assert_eq!(hints, PathHints::default());
    }
}
