//! Serverless Core - functions project lifecycle for CLI binaries
//!
//! This library implements the `serverless` command family: creating a local
//! functions project, deploying it, watching it, and reading its metadata.
//! The binary supplies branding through `ProductConfig` and a
//! `ServerlessService` that reaches the functions platform.
//!
//! # Architecture
//!
//! - **Model** - `project` holds the `project.yml` model and the scaffolder
//! - **Resolution** - `language` maps keywords to runtimes; `filters` rewrites include/exclude
//! - **Platform seam** - `service` defines `ServerlessService` and the process/HTTP implementation
//! - **Drivers** - `commands` runs each subcommand end to end
//!
//! # Example Usage
//!
//! ```ignore
//! use serverless_core::{commands, project::DiskFs, NimService, ServerlessConfig};
//!
//! let service = NimService::new(ServerlessConfig::from_config(&MyProduct));
//! let args = vec!["./proj".to_string()];
//! commands::run_init(&service, DiskFs, &MyProduct, &args, "python", false, &mut std::io::stdout()).await?;
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod filters;
pub mod language;
pub mod options;
pub mod output;
pub mod product;
pub mod project;
pub mod service;

// Re-export main types for convenience
pub use config::ServerlessConfig;
pub use error::{Result, ServerlessError};
pub use options::CommandOptions;
pub use output::{ExecResult, ServerlessOutput};
pub use product::ProductConfig;
pub use project::{DiskFs, ProjectSpec};
pub use service::{NimService, ServerlessService};
