//! Delivery sequencer — walks the platform's channel table in order until a
//! channel delivers or the table runs out.
//!
//! Flow:
//! 1. Normalize attachments; no primary attachment → stop, nothing invoked
//! 2. Try the profile's entry channel (direct mail-app share)
//! 3. On any failure follow the channel's `fallback` edge
//! 4. Map the terminal state through the reporter
//!
//! Channel attempts are strictly sequential: each one is awaited to completion
//! before the next is considered. Cancellation by the user counts as an
//! ordinary failure.

use std::sync::Arc;

use tracing::{Instrument, debug, info, warn};
use uuid::Uuid;

use crate::channels::{
    ChooserRequest, DirectShare, DirectShareRequest, ShareChooser, UrlDispatcher,
};
use crate::delivery::capability::{ChannelCapability, PlatformProfile};
use crate::delivery::mailto::build_mailto;
use crate::delivery::report::{TerminalState, report};
use crate::delivery::types::{
    AttachmentInput, ChannelId, ChannelOutcome, DeliveryRequest, DeliveryResult,
    PrimaryAttachment,
};
use crate::error::ChannelError;

/// Hands a generated document to whatever on the device can email it.
///
/// Holds no per-delivery state; concurrent `send` calls are independent.
pub struct DocumentMailer {
    profile: PlatformProfile,
    direct: Arc<dyn DirectShare>,
    chooser: Arc<dyn ShareChooser>,
    dispatcher: Arc<dyn UrlDispatcher>,
}

impl DocumentMailer {
    pub fn new(
        profile: impl Into<PlatformProfile>,
        direct: Arc<dyn DirectShare>,
        chooser: Arc<dyn ShareChooser>,
        dispatcher: Arc<dyn UrlDispatcher>,
    ) -> Self {
        Self {
            profile: profile.into(),
            direct,
            chooser,
            dispatcher,
        }
    }

    pub fn profile(&self) -> &PlatformProfile {
        &self.profile
    }

    /// Send `attachments` to `recipients`, falling back through the
    /// platform's channels. Never fails; the outcome is in the result.
    pub async fn send(
        &self,
        recipients: &[String],
        subject: &str,
        body: &str,
        attachments: &[AttachmentInput],
    ) -> DeliveryResult {
        let request = DeliveryRequest::new(recipients, subject, body, attachments);
        let span = tracing::info_span!(
            "delivery",
            delivery_id = %Uuid::new_v4(),
            platform = %self.profile.name,
        );
        report(self.deliver(&request).instrument(span).await)
    }

    /// Run the fallback sequence for an already normalized request.
    pub async fn deliver(&self, request: &DeliveryRequest) -> TerminalState {
        let Some(primary) = request.primary.as_ref() else {
            warn!("No attachment to deliver, nothing attempted");
            return TerminalState::NoPrimaryAttachment;
        };

        info!(
            recipients = request.recipients.len(),
            attachments = request.attachments.len(),
            file = %primary.filename,
            "Starting delivery"
        );

        let mut visited: Vec<ChannelId> = Vec::new();
        let mut last_failure: Option<(ChannelId, ChannelError)> = None;
        let mut next = Some(self.profile.entry());

        while let Some(id) = next {
            if visited.contains(&id) {
                warn!(channel = %id, "Fallback cycle in channel table, stopping");
                break;
            }
            visited.push(id);

            let Some(capability) = self.profile.capability(id).copied() else {
                warn!(channel = %id, "Channel missing from profile, stopping");
                break;
            };

            debug!(channel = %id, "Attempting channel");
            match self.attempt(&capability, request, primary).await {
                ChannelOutcome::Delivered(channel) => {
                    info!(channel = %channel, status = channel.status(), "Delivered");
                    return TerminalState::Delivered(channel);
                }
                ChannelOutcome::Unavailable => {
                    warn!(channel = %id, "Channel not available, falling back");
                    last_failure = Some((
                        id,
                        ChannelError::Unavailable {
                            name: id.label().to_string(),
                        },
                    ));
                }
                ChannelOutcome::Failed(e) => {
                    warn!(channel = %id, error = %e, "Channel failed, falling back");
                    last_failure = Some((id, e));
                }
            }

            next = capability.fallback;
        }

        match last_failure {
            Some((channel, error)) => TerminalState::Exhausted { channel, error },
            None => TerminalState::NoChannel,
        }
    }

    /// One channel attempt. Suspends until the collaborator resolves.
    async fn attempt(
        &self,
        capability: &ChannelCapability,
        request: &DeliveryRequest,
        primary: &PrimaryAttachment,
    ) -> ChannelOutcome {
        let id = capability.id;
        if capability.probe && !self.probe(id).await {
            return ChannelOutcome::Unavailable;
        }

        let recipients = if capability.recipient_targeting {
            request.recipients.clone()
        } else {
            Vec::new()
        };

        let result = match id {
            ChannelId::Direct => {
                let mime_type = if capability.content_type_hint {
                    primary.mime_type.clone()
                } else {
                    String::new()
                };
                self.direct
                    .share_single(DirectShareRequest {
                        locator: primary.locator.clone(),
                        mime_type,
                        filename: primary.filename.clone(),
                        recipients,
                        subject: request.subject.clone(),
                        message: request.body.clone(),
                        title: request.subject.clone(),
                    })
                    .await
                    .map(|status| {
                        debug!(provider = self.direct.name(), %status, "Direct share resolved")
                    })
            }
            ChannelId::Chooser => {
                let locators = if capability.multiple_attachments {
                    request.attachments.iter().map(|a| a.locator.clone()).collect()
                } else {
                    vec![primary.locator.clone()]
                };
                self.chooser
                    .open(ChooserRequest {
                        title: request.subject.clone(),
                        subject: request.subject.clone(),
                        message: request.body.clone(),
                        locators,
                    })
                    .await
                    .map(|status| {
                        debug!(provider = self.chooser.name(), %status, "Chooser resolved")
                    })
            }
            ChannelId::Mailto => {
                let uri = build_mailto(&recipients, &request.subject, &request.body);
                self.dispatcher.open_url(&uri).await
            }
        };

        match result {
            Ok(()) => ChannelOutcome::Delivered(id),
            Err(e) => ChannelOutcome::Failed(e),
        }
    }

    async fn probe(&self, id: ChannelId) -> bool {
        let available = match id {
            ChannelId::Direct => self.direct.is_available().await,
            ChannelId::Chooser => self.chooser.is_available().await,
            ChannelId::Mailto => self.dispatcher.is_available().await,
        };
        debug!(channel = %id, available, "Probed channel");
        available
    }
}
