//! YAML frontmatter extraction from a document's raw content.
//!
//! Not a standalone parsing layer: this exists purely to feed registration's
//! metadata merge, mirroring the reference manager's inline frontmatter
//! extraction rather than a dedicated frontmatter module.

use serde_json::Value;

/// Extracts the YAML frontmatter block from `content`, if present, as a JSON
/// object. A document starts with `---`, and the frontmatter is the slice
/// between the first two `---` delimiters.
///
/// Returns `Value::Null` (not an error) when there is no frontmatter, the
/// delimiters are malformed, or the frontmatter fails to parse as YAML --
/// registration treats a document with no usable frontmatter the same as one
/// with none at all.
pub fn extract_frontmatter(content: &str) -> Value {
    if !content.starts_with("---") {
        return Value::Null;
    }

    let mut parts = content.splitn(3, "---");
    let _before = parts.next();
    let Some(frontmatter_block) = parts.next() else {
        return Value::Null;
    };
    if parts.next().is_none() {
        return Value::Null;
    }

    serde_yaml::from_str::<serde_json::Value>(frontmatter_block).unwrap_or(Value::Null)
}
