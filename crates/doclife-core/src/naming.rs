//! Filename naming convention -- pure generate/parse/validate/suggest functions.
//!
//! Four shapes are recognised, matching the reference naming convention:
//!
//! - Standard: `{DOCTYPE}_{subject}_{date}_v{version}.{ext}`
//! - ADR: `ADR-{NNN}_{subject}_{date}.{ext}`
//! - Postmortem: `Postmortem_{date}_{subject}.{ext}`
//! - Runbook: `Runbook_{subject}_{date}_v{version}.{ext}`
//!
//! `parse` tries ADR, then Postmortem, then Runbook, then Standard, in that
//! order, since the ADR/Postmortem/Runbook shapes are special cases of the
//! more general standard shape and must be checked first.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::enums::DocumentType;

static ADR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^ADR-(\d{3})_(.+)_(\d{4}-\d{2}-\d{2})\.(\w+)$").unwrap()
});
static POSTMORTEM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Postmortem_(\d{4}-\d{2}-\d{2})_(.+)\.(\w+)$").unwrap()
});
static RUNBOOK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Runbook_(.+)_(\d{4}-\d{2}-\d{2})_v(\d+(?:\.\d+)?)\.(\w+)$").unwrap()
});
static STANDARD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z_]+)_(.+)_(\d{4}-\d{2}-\d{2})_v(\d+(?:\.\d+)?)\.(\w+)$").unwrap()
});

static VERSION_HINT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"_v(\d+(?:\.\d+)?)").unwrap());
static ADR_NUMBER_HINT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"ADR-(\d{3})").unwrap());

/// A filename successfully parsed under one of the four naming shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFilename {
    pub shape: FilenameShape,
    pub doc_type: Option<DocumentType>,
    pub subject: String,
    pub date: String,
    pub version: Option<String>,
    pub adr_number: Option<String>,
    pub extension: String,
}

/// Which of the four naming shapes a filename matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilenameShape {
    Adr,
    Postmortem,
    Runbook,
    Standard,
}

/// Error returned when a filename does not match any recognised shape.
#[derive(Debug, thiserror::Error)]
#[error("filename {0:?} does not match any recognised naming convention")]
pub struct NamingError(String);

/// Parses a filename (basename only, no directory component) into its parts.
///
/// Tries ADR, Postmortem, Runbook, then Standard, in that order -- the first
/// three shapes are special cases that a naive standard-shape regex could
/// otherwise also match.
pub fn parse_filename(filename: &str) -> Result<ParsedFilename, NamingError> {
    if let Some(caps) = ADR_RE.captures(filename) {
        return Ok(ParsedFilename {
            shape: FilenameShape::Adr,
            doc_type: Some(DocumentType::Adr),
            subject: caps[2].to_owned(),
            date: caps[3].to_owned(),
            version: None,
            adr_number: Some(caps[1].to_owned()),
            extension: caps[4].to_owned(),
        });
    }
    if let Some(caps) = POSTMORTEM_RE.captures(filename) {
        return Ok(ParsedFilename {
            shape: FilenameShape::Postmortem,
            doc_type: Some(DocumentType::Postmortem),
            subject: caps[2].to_owned(),
            date: caps[1].to_owned(),
            version: None,
            adr_number: None,
            extension: caps[3].to_owned(),
        });
    }
    if let Some(caps) = RUNBOOK_RE.captures(filename) {
        return Ok(ParsedFilename {
            shape: FilenameShape::Runbook,
            doc_type: Some(DocumentType::Runbook),
            subject: caps[1].to_owned(),
            date: caps[2].to_owned(),
            version: Some(caps[3].to_owned()),
            adr_number: None,
            extension: caps[4].to_owned(),
        });
    }
    if let Some(caps) = STANDARD_RE.captures(filename) {
        let doc_type = caps[1].to_lowercase().parse::<DocumentType>().ok();
        return Ok(ParsedFilename {
            shape: FilenameShape::Standard,
            doc_type,
            subject: caps[2].to_owned(),
            date: caps[3].to_owned(),
            version: Some(caps[4].to_owned()),
            adr_number: None,
            extension: caps[5].to_owned(),
        });
    }

    Err(NamingError(filename.to_owned()))
}

/// Normalises a free-form subject into the lowercase, hyphen-separated form
/// used in generated filenames: lowercase, spaces/underscores/slashes become
/// hyphens, non-alphanumeric-hyphen characters are stripped, and repeated
/// hyphens collapse to one.
pub fn normalize_subject(subject: &str) -> String {
    let lower = subject.to_lowercase();
    let mut normalized = String::with_capacity(lower.len());
    for c in lower.chars() {
        match c {
            ' ' | '_' | '/' | '\\' => normalized.push('-'),
            c if c.is_alphanumeric() || c == '-' => normalized.push(c),
            _ => {}
        }
    }
    let mut collapsed = String::with_capacity(normalized.len());
    let mut last_was_hyphen = false;
    for c in normalized.chars() {
        if c == '-' {
            if !last_was_hyphen {
                collapsed.push(c);
            }
            last_was_hyphen = true;
        } else {
            collapsed.push(c);
            last_was_hyphen = false;
        }
    }
    collapsed.trim_matches('-').to_owned()
}

/// Generates a compliant filename for the given document type.
///
/// Postmortem and Runbook types use their dedicated shapes; every other type
/// uses the standard shape. ADRs need a sequence number this function has no
/// slot for -- use [`generate_adr_filename`] instead.
pub fn generate_filename(
    doc_type: DocumentType,
    subject: &str,
    date: &str,
    version: &str,
    extension: &str,
) -> String {
    let subject = normalize_subject(subject);
    match doc_type {
        DocumentType::Postmortem => format!("Postmortem_{date}_{subject}.{extension}"),
        DocumentType::Runbook => format!("Runbook_{subject}_{date}_v{version}.{extension}"),
        _ => format!(
            "{}_{subject}_{date}_v{version}.{extension}",
            doc_type.as_str()
        ),
    }
}

/// Generates a compliant ADR filename (ADRs need a 3-digit number, which the
/// generic [`generate_filename`] has no slot for).
pub fn generate_adr_filename(number: u32, subject: &str, date: &str, extension: &str) -> String {
    let subject = normalize_subject(subject);
    format!("ADR-{number:03}_{subject}_{date}.{extension}")
}

/// Returns `Ok(())` if the filename matches a recognised shape, or an error
/// message describing why it doesn't.
pub fn validate_filename(filename: &str) -> Result<(), String> {
    parse_filename(filename)
        .map(|_| ())
        .map_err(|e| e.to_string())
}

/// Given a possibly non-compliant filename, extracts whatever version or ADR
/// number hints can be found and regenerates a compliant name.
///
/// Falls back to version `"1.0"` / ADR number `1` when no hint is present.
pub fn suggest_filename(
    current_filename: &str,
    doc_type: DocumentType,
    subject: &str,
    date: &str,
) -> String {
    let extension = current_filename
        .rsplit('.')
        .next()
        .unwrap_or("md")
        .to_owned();

    if doc_type == DocumentType::Adr {
        let number = ADR_NUMBER_HINT_RE
            .captures(current_filename)
            .and_then(|c| c[1].parse::<u32>().ok())
            .unwrap_or(1);
        return generate_adr_filename(number, subject, date, &extension);
    }

    let version = VERSION_HINT_RE
        .captures(current_filename)
        .map(|c| c[1].to_owned())
        .unwrap_or_else(|| "1.0".to_owned());

    generate_filename(doc_type, subject, date, &version, &extension)
}
