//! Shared types for the delivery engine.

use serde::{Deserialize, Serialize};

use crate::delivery::attachment;
use crate::error::ChannelError;

// ── Attachments ─────────────────────────────────────────────────────

/// Attachment as handed in by the caller: a bare path or a described file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttachmentInput {
    Path(String),
    Described {
        path: String,
        #[serde(default, rename = "mimeType", skip_serializing_if = "Option::is_none")]
        mime_type: Option<String>,
    },
}

impl AttachmentInput {
    /// Described attachment with an explicit MIME type.
    pub fn with_mime(path: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self::Described {
            path: path.into(),
            mime_type: Some(mime_type.into()),
        }
    }
}

impl From<&str> for AttachmentInput {
    fn from(path: &str) -> Self {
        Self::Path(path.to_string())
    }
}

impl From<String> for AttachmentInput {
    fn from(path: String) -> Self {
        Self::Path(path)
    }
}

/// A normalized attachment: scheme-qualified locator plus optional MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentRef {
    pub locator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl From<&AttachmentRef> for AttachmentInput {
    fn from(att: &AttachmentRef) -> Self {
        Self::Described {
            path: att.locator.clone(),
            mime_type: att.mime_type.clone(),
        }
    }
}

/// The first attachment, surfaced for channels that carry a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryAttachment {
    pub locator: String,
    /// Explicit MIME type, defaulted when the caller gave none.
    pub mime_type: String,
    /// Substring of the locator after the last `/`.
    pub filename: String,
}

// ── Request ─────────────────────────────────────────────────────────

/// Everything one delivery sequence needs. Not mutated once built.
#[derive(Debug, Clone)]
pub struct DeliveryRequest {
    /// Recipient addresses, order preserved. May be empty.
    pub recipients: Vec<String>,
    pub subject: String,
    /// HTML-capable body text.
    pub body: String,
    pub attachments: Vec<AttachmentRef>,
    pub primary: Option<PrimaryAttachment>,
}

impl DeliveryRequest {
    /// Normalize the caller's inputs into a request.
    pub fn new(
        recipients: &[String],
        subject: &str,
        body: &str,
        attachments: &[AttachmentInput],
    ) -> Self {
        let attachments = attachment::normalize(attachments);
        let primary = attachment::primary(&attachments);
        Self {
            recipients: recipients.to_vec(),
            subject: subject.to_string(),
            body: body.to_string(),
            attachments,
            primary,
        }
    }
}

// ── Channel outcome ─────────────────────────────────────────────────

/// Identifier of a delivery channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelId {
    /// Single-attachment share aimed at the mail app.
    Direct,
    /// Generic share sheet; the user picks the destination.
    Chooser,
    /// `mailto:` URI handed to the system dispatcher. Carries no files.
    Mailto,
}

impl ChannelId {
    /// Status string reported when this channel delivers.
    pub fn status(&self) -> &'static str {
        match self {
            ChannelId::Direct => "shared",
            ChannelId::Chooser => "shared_chooser",
            ChannelId::Mailto => "mailto",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChannelId::Direct => "direct",
            ChannelId::Chooser => "chooser",
            ChannelId::Mailto => "mailto",
        }
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of one channel attempt.
#[derive(Debug)]
pub enum ChannelOutcome {
    Delivered(ChannelId),
    Unavailable,
    Failed(ChannelError),
}

// ── Delivery result ─────────────────────────────────────────────────

/// Why a delivery failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// No channel on the device could be engaged.
    NotAvailable,
    /// An engaged channel rejected with a backend error.
    Error,
}

/// The only value returned to the caller of `send`.
///
/// Serializes as `{"ok": true, "status": ..}` or
/// `{"ok": false, "reason": .., "detail": ..}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryResult {
    Ok {
        status: String,
    },
    Failed {
        reason: FailureReason,
        detail: Option<String>,
    },
}

impl Serialize for DeliveryResult {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        match self {
            DeliveryResult::Ok { status } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("ok", &true)?;
                map.serialize_entry("status", status)?;
                map.end()
            }
            DeliveryResult::Failed { reason, detail } => {
                let len = if detail.is_some() { 3 } else { 2 };
                let mut map = serializer.serialize_map(Some(len))?;
                map.serialize_entry("ok", &false)?;
                map.serialize_entry("reason", reason)?;
                if let Some(detail) = detail {
                    map.serialize_entry("detail", detail)?;
                }
                map.end()
            }
        }
    }
}

impl DeliveryResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, DeliveryResult::Ok { .. })
    }

    /// Status of a successful delivery.
    pub fn status(&self) -> Option<&str> {
        match self {
            DeliveryResult::Ok { status } => Some(status),
            DeliveryResult::Failed { .. } => None,
        }
    }
}
