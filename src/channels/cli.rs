//! Terminal chooser — lists the attachments and, once the user confirms,
//! opens them with the system handler so they can be shared from there.

use std::io::IsTerminal;

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::channels::system::open_with_system;
use crate::channels::{ChooserRequest, ShareChooser};
use crate::delivery::attachment::local_path;
use crate::error::ChannelError;

const CHANNEL_NAME: &str = "cli-chooser";

/// Share chooser for terminal sessions.
pub struct CliChooser {
    interactive: bool,
}

impl CliChooser {
    /// `interactive: false` opens the attachments without asking.
    pub fn new(interactive: bool) -> Self {
        Self { interactive }
    }
}

#[async_trait]
impl ShareChooser for CliChooser {
    fn name(&self) -> &str {
        CHANNEL_NAME
    }

    async fn is_available(&self) -> bool {
        !self.interactive || std::io::stdin().is_terminal()
    }

    async fn open(&self, request: ChooserRequest) -> Result<String, ChannelError> {
        if request.locators.is_empty() {
            return Err(ChannelError::InvalidAttachment("nothing to share".into()));
        }

        eprintln!("\n📎 {}", request.title);
        eprintln!("   Subject: {}", request.subject);
        for (i, locator) in request.locators.iter().enumerate() {
            eprintln!("   {}. {}", i + 1, locator);
        }

        if self.interactive {
            eprint!("Open with the system handler to share? [y/N] ");
            let mut stdin = BufReader::new(tokio::io::stdin());
            if !read_confirmation(&mut stdin).await? {
                return Err(ChannelError::Cancelled {
                    name: CHANNEL_NAME.into(),
                });
            }
        }

        for locator in &request.locators {
            let target = local_path(locator).unwrap_or(locator).to_string();
            open_with_system(CHANNEL_NAME, target).await?;
        }

        Ok("opened".to_string())
    }
}

/// Read one line; only an explicit yes confirms. EOF counts as no.
pub async fn read_confirmation<R>(reader: &mut R) -> Result<bool, ChannelError>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    if reader.read_line(&mut line).await? == 0 {
        return Ok(false);
    }
    Ok(matches!(
        line.trim().to_lowercase().as_str(),
        "y" | "yes" | "s" | "si" | "sì"
    ))
}
