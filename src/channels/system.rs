//! OS hand-off via the `open` crate.

use async_trait::async_trait;

use crate::channels::UrlDispatcher;
use crate::error::ChannelError;

/// Hands URLs (here `mailto:`) to whatever the OS has registered for them.
pub struct SystemUrlDispatcher;

impl SystemUrlDispatcher {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemUrlDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UrlDispatcher for SystemUrlDispatcher {
    fn name(&self) -> &str {
        "system"
    }

    async fn open_url(&self, url: &str) -> Result<(), ChannelError> {
        open_with_system("system", url.to_string()).await
    }
}

/// Open `target` with the system handler on a blocking task.
pub async fn open_with_system(channel: &str, target: String) -> Result<(), ChannelError> {
    let shown = target.clone();
    tokio::task::spawn_blocking(move || open::that(&target))
        .await
        .map_err(|e| ChannelError::SendFailed {
            name: channel.to_string(),
            reason: format!("open task failed: {e}"),
        })?
        .map_err(|e| ChannelError::SendFailed {
            name: channel.to_string(),
            reason: format!("no handler for {}: {e}", scheme_of(&shown)),
        })?;
    tracing::debug!(channel, "Handed off to system handler");
    Ok(())
}

/// Scheme part for log and error messages; keeps message bodies out of them.
fn scheme_of(target: &str) -> &str {
    target
        .split_once(':')
        .map(|(scheme, _)| scheme)
        .unwrap_or(target)
}
