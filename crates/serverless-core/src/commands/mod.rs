//! Drivers for the `serverless` subcommands
//!
//! Each driver runs one linear resolve, validate, execute, render sequence
//! against a `ServerlessService`.

pub mod deploy;
pub mod init;
pub mod metadata;
pub mod watch;

pub use deploy::{rewrite_transcript, run_deploy};
pub use init::run_init;
pub use metadata::run_get_metadata;
pub use watch::run_watch;
