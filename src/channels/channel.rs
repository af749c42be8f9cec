//! Collaborator traits the delivery sequencer drives.
//!
//! Each trait is one external capability of the device. Implementations
//! resolve once the hand-off finished (or the user dismissed the surface) and
//! reject with a `ChannelError` otherwise.

use async_trait::async_trait;

use crate::error::ChannelError;

/// Options for a direct single-file share aimed at the mail app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectShareRequest {
    pub locator: String,
    pub mime_type: String,
    pub filename: String,
    pub recipients: Vec<String>,
    pub subject: String,
    /// HTML-capable message body.
    pub message: String,
    /// Title of any surface the platform shows.
    pub title: String,
}

/// Options for the generic share chooser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChooserRequest {
    pub title: String,
    pub subject: String,
    pub message: String,
    /// Every attachment locator, in order.
    pub locators: Vec<String>,
}

/// Share a single file straight to the device's email capability.
#[async_trait]
pub trait DirectShare: Send + Sync {
    fn name(&self) -> &str;

    /// Whether the channel can be engaged at all.
    async fn is_available(&self) -> bool {
        true
    }

    /// Hand the file off. Resolves with a provider status string.
    async fn share_single(&self, request: DirectShareRequest) -> Result<String, ChannelError>;
}

/// Platform share sheet: the user picks any capable app.
#[async_trait]
pub trait ShareChooser: Send + Sync {
    fn name(&self) -> &str;

    async fn is_available(&self) -> bool {
        true
    }

    /// Open the chooser. User dismissal rejects like any other failure.
    async fn open(&self, request: ChooserRequest) -> Result<String, ChannelError>;
}

/// System URL dispatcher.
#[async_trait]
pub trait UrlDispatcher: Send + Sync {
    fn name(&self) -> &str;

    async fn is_available(&self) -> bool {
        true
    }

    /// Resolves once the OS accepted the URL, rejects if nothing handles it.
    async fn open_url(&self, url: &str) -> Result<(), ChannelError>;
}
