//! Delivery channels — collaborator traits and desktop implementations.

pub mod channel;
pub mod cli;
pub mod smtp;
pub mod system;

pub use channel::*;
pub use cli::CliChooser;
pub use smtp::SmtpDirectShare;
pub use system::SystemUrlDispatcher;
