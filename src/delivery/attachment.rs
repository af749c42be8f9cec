//! Attachment normalization — canonical `file://` locators and the primary
//! attachment surfaced for single-file channels.
//!
//! Pure string handling, no filesystem access.

use crate::delivery::types::{AttachmentInput, AttachmentRef, PrimaryAttachment};

/// Scheme prefix added to bare filesystem paths.
pub const FILE_SCHEME: &str = "file://";

/// MIME type assumed for the primary attachment when none is given.
pub const DEFAULT_MIME_TYPE: &str = "application/pdf";

/// Normalize caller attachments into scheme-qualified refs, order preserved.
pub fn normalize(inputs: &[AttachmentInput]) -> Vec<AttachmentRef> {
    inputs
        .iter()
        .map(|input| match input {
            AttachmentInput::Path(path) => AttachmentRef {
                locator: qualify(path),
                mime_type: None,
            },
            AttachmentInput::Described { path, mime_type } => AttachmentRef {
                locator: qualify(path),
                mime_type: mime_type.clone().filter(|m| !m.trim().is_empty()),
            },
        })
        .collect()
}

/// Surface the first attachment's locator, MIME type and filename.
///
/// `None` when there is no attachment or the first one has a blank path.
pub fn primary(attachments: &[AttachmentRef]) -> Option<PrimaryAttachment> {
    let first = attachments.first()?;
    let path = first
        .locator
        .split_once("://")
        .map_or(first.locator.as_str(), |(_, rest)| rest);
    if path.trim().is_empty() {
        return None;
    }
    Some(PrimaryAttachment {
        locator: first.locator.clone(),
        mime_type: first
            .mime_type
            .clone()
            .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string()),
        filename: filename(&first.locator).to_string(),
    })
}

/// Prefix `file://` unless the locator already carries a scheme.
pub fn qualify(locator: &str) -> String {
    if has_scheme(locator) {
        locator.to_string()
    } else {
        format!("{FILE_SCHEME}{locator}")
    }
}

/// Substring after the last `/` (the whole locator if there is none).
pub fn filename(locator: &str) -> &str {
    locator.rsplit('/').next().unwrap_or(locator)
}

/// Filesystem path behind a `file://` locator, if it is one.
pub fn local_path(locator: &str) -> Option<&str> {
    locator.strip_prefix(FILE_SCHEME)
}

/// `scheme://` where scheme is `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`.
pub fn has_scheme(locator: &str) -> bool {
    let Some((scheme, _)) = locator.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
