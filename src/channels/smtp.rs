//! SMTP direct channel — mails the primary attachment via lettre.
//!
//! Desktop stand-in for "share straight to the mail app": the file is sent as
//! a multipart message with an HTML body and a single attachment.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::channels::{DirectShare, DirectShareRequest};
use crate::config::SmtpConfig;
use crate::delivery::attachment::{DEFAULT_MIME_TYPE, local_path};
use crate::error::ChannelError;

const CHANNEL_NAME: &str = "smtp";

/// Direct share over SMTP. Unavailable when no SMTP host is configured.
pub struct SmtpDirectShare {
    config: Option<SmtpConfig>,
}

impl SmtpDirectShare {
    pub fn new(config: Option<SmtpConfig>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl DirectShare for SmtpDirectShare {
    fn name(&self) -> &str {
        CHANNEL_NAME
    }

    async fn is_available(&self) -> bool {
        self.config.is_some()
    }

    async fn share_single(&self, request: DirectShareRequest) -> Result<String, ChannelError> {
        let Some(config) = self.config.clone() else {
            return Err(ChannelError::Unavailable {
                name: CHANNEL_NAME.into(),
            });
        };
        if request.recipients.is_empty() {
            return Err(send_failed("no recipients to address"));
        }

        let content = read_attachment(&request.locator).await?;
        let email = build_message(&config, &request, content)?;
        let recipients = request.recipients.join(", ");

        tokio::task::spawn_blocking(move || {
            let creds = Credentials::new(config.username.clone(), config.password.clone());
            let transport = SmtpTransport::relay(&config.host)
                .map_err(|e| send_failed(format!("SMTP relay error: {e}")))?
                .port(config.port)
                .credentials(creds)
                .build();
            transport
                .send(&email)
                .map_err(|e| send_failed(format!("SMTP send failed: {e}")))
        })
        .await
        .map_err(|e| send_failed(format!("SMTP task failed: {e}")))??;

        tracing::info!("Report mailed to {recipients}");
        Ok("sent".to_string())
    }
}

/// Read the file behind a `file://` locator.
pub async fn read_attachment(locator: &str) -> Result<Vec<u8>, ChannelError> {
    let path = local_path(locator).ok_or_else(|| {
        ChannelError::InvalidAttachment(format!("{locator} is not a local file"))
    })?;
    Ok(tokio::fs::read(path).await?)
}

/// Assemble the outgoing message: HTML body plus the single attachment.
pub fn build_message(
    config: &SmtpConfig,
    request: &DirectShareRequest,
    content: Vec<u8>,
) -> Result<Message, ChannelError> {
    let from: Mailbox = config
        .from_address
        .parse()
        .map_err(|e| send_failed(format!("Invalid from address: {e}")))?;

    let mut builder = Message::builder().from(from).subject(request.subject.as_str());
    for recipient in &request.recipients {
        let to: Mailbox = recipient
            .parse()
            .map_err(|e| send_failed(format!("Invalid to address {recipient}: {e}")))?;
        builder = builder.to(to);
    }

    let mime_type = if request.mime_type.trim().is_empty() {
        DEFAULT_MIME_TYPE
    } else {
        request.mime_type.as_str()
    };
    let content_type = ContentType::parse(mime_type).map_err(|e| {
        ChannelError::InvalidAttachment(format!("Invalid MIME type {mime_type}: {e}"))
    })?;

    let attachment = Attachment::new(request.filename.clone()).body(content, content_type);

    builder
        .multipart(
            MultiPart::mixed()
                .singlepart(SinglePart::html(request.message.clone()))
                .singlepart(attachment),
        )
        .map_err(|e| send_failed(format!("Failed to build email: {e}")))
}

fn send_failed(reason: impl Into<String>) -> ChannelError {
    ChannelError::SendFailed {
        name: CHANNEL_NAME.into(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn config() -> SmtpConfig {
        SmtpConfig {
            host: "smtp.example.com".into(),
            port: 587,
            username: "me@example.com".into(),
            password: "secret".into(),
            from_address: "me@example.com".into(),
        }
    }

    fn request(recipients: &[&str]) -> DirectShareRequest {
        DirectShareRequest {
            locator: "file:///tmp/report.pdf".into(),
            mime_type: "application/pdf".into(),
            filename: "report.pdf".into(),
            recipients: recipients.iter().map(|r| r.to_string()).collect(),
            subject: "Expense report".into(),
            message: "<p>Attached.</p>".into(),
            title: "Expense report".into(),
        }
    }

    #[test]
    fn message_carries_subject_recipients_and_attachment() {
        let message = build_message(
            &config(),
            &request(&["boss@company.ch", "hr@company.ch"]),
            b"%PDF-1.4".to_vec(),
        )
        .unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: Expense report"));
        assert!(raw.contains("boss@company.ch"));
        assert!(raw.contains("hr@company.ch"));
        assert!(raw.contains("report.pdf"));
        assert!(raw.contains("application/pdf"));
        assert!(raw.contains("text/html"));
    }

    #[test]
    fn invalid_recipient_is_rejected() {
        let err = build_message(&config(), &request(&["not an address"]), vec![]).unwrap_err();
        assert!(matches!(err, ChannelError::SendFailed { .. }));
    }

    #[test]
    fn blank_mime_type_uses_default() {
        let mut req = request(&["boss@company.ch"]);
        req.mime_type = String::new();
        let message = build_message(&config(), &req, vec![1, 2, 3]).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("application/pdf"));
    }

    #[test]
    fn bad_mime_type_is_invalid_attachment() {
        let mut req = request(&["boss@company.ch"]);
        req.mime_type = "not a mime".into();
        let err = build_message(&config(), &req, vec![]).unwrap_err();
        assert!(matches!(err, ChannelError::InvalidAttachment(_)));
    }

    #[tokio::test]
    async fn reads_local_attachment() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"%PDF-1.4 test").unwrap();
        let locator = format!("file://{}", file.path().display());

        let content = read_attachment(&locator).await.unwrap();
        assert_eq!(content, b"%PDF-1.4 test");
    }

    #[tokio::test]
    async fn non_local_locator_is_rejected() {
        let err = read_attachment("content://media/1").await.unwrap_err();
        assert!(matches!(err, ChannelError::InvalidAttachment(_)));
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let locator = format!("file://{}/missing.pdf", dir.path().display());
        let err = read_attachment(&locator).await.unwrap_err();
        assert!(matches!(err, ChannelError::Io(_)));
    }

    #[tokio::test]
    async fn unconfigured_channel_is_unavailable() {
        let channel = SmtpDirectShare::new(None);
        assert!(!channel.is_available().await);
        let err = channel
            .share_single(request(&["boss@company.ch"]))
            .await
            .unwrap_err();
        assert!(matches!(err, ChannelError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn empty_recipients_fail_before_io() {
        let channel = SmtpDirectShare::new(Some(config()));
        let err = channel.share_single(request(&[])).await.unwrap_err();
        assert!(matches!(err, ChannelError::SendFailed { .. }));
    }
}
