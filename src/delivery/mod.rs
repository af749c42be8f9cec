//! Document delivery fallback engine.
//!
//! A generated report is handed to the first device channel that can email
//! it:
//! 1. `attachment` — normalize inputs to `file://` locators, pick the primary
//! 2. `capability` — per-platform channel table and fallback edges
//! 3. `sequencer` — `DocumentMailer::send`, the fallback state machine
//! 4. `report` — terminal state → `DeliveryResult`
//!
//! Nothing is kept between calls.

pub mod attachment;
pub mod capability;
pub mod mailto;
pub mod report;
pub mod sequencer;
pub mod types;

pub use capability::{ChannelCapability, Platform, PlatformProfile};
pub use sequencer::DocumentMailer;
pub use types::*;
