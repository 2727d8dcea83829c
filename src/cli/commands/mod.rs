//! CLI command implementations

pub mod campaigns;
pub mod export;
pub mod init;
pub mod validate;
