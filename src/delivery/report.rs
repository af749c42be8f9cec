//! Result reporter — maps where the sequence stopped to a `DeliveryResult`.

use crate::delivery::types::{ChannelId, DeliveryResult, FailureReason};
use crate::error::ChannelError;

/// Where a delivery sequence stopped.
#[derive(Debug)]
pub enum TerminalState {
    /// No primary attachment; no channel was engaged.
    NoPrimaryAttachment,
    /// The profile offered nothing to try.
    NoChannel,
    Delivered(ChannelId),
    /// Every channel on the path failed; `channel` was the last one tried.
    Exhausted {
        channel: ChannelId,
        error: ChannelError,
    },
}

/// Map a terminal state to the caller-visible result.
///
/// A sequence that ends on the chooser surfaced a backend rejection and
/// reports `Error`; everything else that fails reports `NotAvailable`.
pub fn report(state: TerminalState) -> DeliveryResult {
    match state {
        TerminalState::Delivered(channel) => DeliveryResult::Ok {
            status: channel.status().to_string(),
        },
        TerminalState::NoPrimaryAttachment | TerminalState::NoChannel => DeliveryResult::Failed {
            reason: FailureReason::NotAvailable,
            detail: None,
        },
        TerminalState::Exhausted { channel, error } => {
            let reason = match channel {
                ChannelId::Chooser => FailureReason::Error,
                ChannelId::Direct | ChannelId::Mailto => FailureReason::NotAvailable,
            };
            DeliveryResult::Failed {
                reason,
                detail: Some(error.to_string()),
            }
        }
    }
}
