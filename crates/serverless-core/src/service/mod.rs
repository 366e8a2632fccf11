//! The functions platform as seen by the serverless commands
//!
//! This module provides:
//! - The `ServerlessService` trait the drivers are written against
//! - `NimService`, which runs the backend executable and talks to the API host
//! - A local project reader used by the experimental `get-metadata` path

pub mod nim;
pub mod reader;
pub mod version;

use crate::error::Result;
use crate::options::ExecRequest;
use crate::output::{ExecResult, ServerlessOutput};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;

pub use nim::NimService;
pub use reader::read_project;

/// Credentials for the functions namespace the user is connected to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerlessCredentials {
    #[serde(rename = "apihost")]
    pub api_host: String,
    pub auth: String,
    #[serde(default)]
    pub namespace: String,
}

/// One variant of a runtime offered by the host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeVariant {
    pub kind: String,
    #[serde(default)]
    pub default: bool,
    #[serde(default)]
    pub deprecated: bool,
}

/// What the API host reports about itself
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostInfo {
    /// Runtime name (e.g. `nodejs`) to its variants
    #[serde(default)]
    pub runtimes: BTreeMap<String, Vec<RuntimeVariant>>,
}

/// Descriptor handed to the local project reader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerlessProject {
    pub project_path: PathBuf,
}

/// Operations the serverless commands need from the platform
#[allow(async_fn_in_trait)]
pub trait ServerlessService {
    /// Verify the backend is installed and recent enough
    async fn check_status(&self) -> Result<()>;

    fn read_credentials(&self) -> Result<ServerlessCredentials>;

    async fn get_host_info(&self, api_host: &str) -> Result<HostInfo>;

    /// Run a backend operation to completion and capture its transcript
    async fn exec(&self, request: &ExecRequest) -> ExecResult;

    /// Run a backend operation, relaying its output to `out` as it is produced
    async fn exec_streaming(&self, request: &ExecRequest, out: &mut impl Write) -> Result<()>;

    /// Read a project without involving the backend
    fn read_project(&self, project: &ServerlessProject, args: &[String])
        -> Result<ServerlessOutput>;
}
