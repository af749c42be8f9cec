//! Report mailer — hands generated expense reports to whatever can email them.

pub mod channels;
pub mod config;
pub mod delivery;
pub mod error;
