//! Product configuration trait for CLI binaries
//!
//! The binary implements this trait to brand the messages the serverless
//! commands produce and to name the environment variables it honours.

use std::path::Path;

/// Configuration trait for the CLI product embedding the serverless commands
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for the CLI command, env vars, config dir)
    fn name(&self) -> &'static str;

    /// Environment variable name for overriding the backend executable
    fn backend_env(&self) -> &'static str;

    /// Environment variable name for overriding the credentials file
    fn credentials_env(&self) -> &'static str;

    /// Line substituted for the backend's "Deployed actions" transcript line
    fn deployed_functions_banner(&self) -> String {
        format!(
            "Deployed functions ('{} serverless functions get <funcName> --url' for URL):",
            self.name()
        )
    }

    /// Message printed after a project has been scaffolded
    fn next_steps(&self, project: &Path) -> Vec<String> {
        vec![
            format!(
                "A local functions project directory '{}' was created for you.",
                project.display()
            ),
            "You may deploy it by running the command shown on the next line:".to_string(),
            format!("  {} serverless deploy {}", self.name(), project.display()),
        ]
    }

    /// User agent string for HTTP requests
    fn user_agent(&self) -> &'static str {
        self.name()
    }
}
