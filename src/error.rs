//! Error types for the report mailer.

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors raised by a delivery channel.
///
/// The sequencer never returns these to the caller; they end up as the opaque
/// `detail` of a failed delivery result.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("Channel {name} is not available on this device")]
    Unavailable { name: String },

    #[error("Channel {name} was dismissed by the user")]
    Cancelled { name: String },

    #[error("Failed to hand off on channel {name}: {reason}")]
    SendFailed { name: String, reason: String },

    #[error("Invalid attachment: {0}")]
    InvalidAttachment(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
