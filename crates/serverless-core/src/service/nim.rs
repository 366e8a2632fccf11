//! `ServerlessService` backed by the backend executable and the API host

use super::{
    reader, version, HostInfo, ServerlessCredentials, ServerlessProject, ServerlessService,
};
use crate::config::ServerlessConfig;
use crate::error::{Result, ServerlessError};
use crate::options::ExecRequest;
use crate::output::{ExecResult, ServerlessOutput};
use std::io::Write;
use std::process::{Output, Stdio};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use url::Url;

/// Runs backend operations as child processes and queries the API host over HTTP
pub struct NimService {
    config: ServerlessConfig,
    client: reqwest::Client,
}

impl NimService {
    pub fn new(config: ServerlessConfig) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { config, client }
    }

    fn command(&self, request: &ExecRequest) -> Command {
        let mut cmd = Command::new(&self.config.backend);
        cmd.args(request.to_argv());
        cmd
    }

    /// Build the host info URL, preserving any base path on the host
    fn host_info_url(api_host: &str) -> Result<Url> {
        let with_scheme = if api_host.contains("://") {
            api_host.to_string()
        } else {
            format!("https://{}", api_host)
        };
        let mut url =
            Url::parse(&with_scheme).map_err(|_| ServerlessError::InvalidHost(api_host.into()))?;
        url.path_segments_mut()
            .map_err(|_| ServerlessError::InvalidHost(api_host.into()))?
            .pop_if_empty()
            .push("api")
            .push("v1");
        Ok(url)
    }
}

/// Turn a finished backend process into a transcript plus optional error
fn interpret_output(output: &Output) -> ExecResult {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

    let parsed: ServerlessOutput = match serde_json::from_str(stdout.trim()) {
        Ok(parsed) => parsed,
        Err(e) => {
            let lines = stdout.lines().map(str::to_string).collect();
            let message = if stderr.is_empty() {
                format!("unexpected output from serverless backend: {}", e)
            } else {
                stderr
            };
            return ExecResult::failed(
                ServerlessOutput::from_captured(lines),
                ServerlessError::Backend(message),
            );
        }
    };

    if !parsed.error.is_empty() {
        let message = parsed.error.clone();
        return ExecResult::failed(parsed, ServerlessError::Backend(message));
    }
    if !output.status.success() {
        let message = if stderr.is_empty() {
            format!(
                "serverless backend exited with code {}",
                output.status.code().unwrap_or(-1)
            )
        } else {
            stderr
        };
        return ExecResult::failed(parsed, ServerlessError::Backend(message));
    }
    ExecResult::ok(parsed)
}

impl ServerlessService for NimService {
    async fn check_status(&self) -> Result<()> {
        let output = Command::new(&self.config.backend)
            .arg("--version")
            .output()
            .await
            .map_err(|_| {
                ServerlessError::Backend(format!(
                    "serverless support is not installed (backend '{}' not found)",
                    self.config.backend.display()
                ))
            })?;

        if !output.status.success() {
            return Err(ServerlessError::Backend(format!(
                "serverless backend '{}' is not working",
                self.config.backend.display()
            )));
        }

        let installed = String::from_utf8_lossy(&output.stdout).trim().to_string();
        tracing::debug!(version = %installed, "serverless backend found");
        version::check_backend_version(&installed, &self.config.min_backend_version)
    }

    fn read_credentials(&self) -> Result<ServerlessCredentials> {
        let path = &self.config.credentials_file;
        let content = std::fs::read_to_string(path).map_err(|e| ServerlessError::fs(path, e))?;
        Ok(serde_json::from_str(&content)?)
    }

    async fn get_host_info(&self, api_host: &str) -> Result<HostInfo> {
        let url = Self::host_info_url(api_host)?;
        tracing::debug!(%url, "fetching host info");

        let response = self.client.get(url.clone()).send().await?;
        if !response.status().is_success() {
            return Err(ServerlessError::Backend(format!(
                "failed to fetch host info from {}: HTTP {}",
                url,
                response.status()
            )));
        }
        Ok(response.json::<HostInfo>().await?)
    }

    async fn exec(&self, request: &ExecRequest) -> ExecResult {
        tracing::info!(operation = %request.operation, argv = ?request.redacted_argv(), "running serverless backend");

        match self.command(request).stdin(Stdio::null()).output().await {
            Ok(output) => interpret_output(&output),
            Err(e) => ExecResult::failed(
                ServerlessOutput::default(),
                ServerlessError::Backend(format!(
                    "failed to run serverless backend '{}': {}",
                    self.config.backend.display(),
                    e
                )),
            ),
        }
    }

    async fn exec_streaming(&self, request: &ExecRequest, out: &mut impl Write) -> Result<()> {
        tracing::info!(operation = %request.operation, argv = ?request.redacted_argv(), "streaming serverless backend");

        let mut child = self
            .command(request)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                ServerlessError::Backend(format!(
                    "failed to run serverless backend '{}': {}",
                    self.config.backend.display(),
                    e
                ))
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ServerlessError::Internal("backend stdout not captured".into()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| ServerlessError::Internal("backend stderr not captured".into()))?;

        let mut stdout_reader = BufReader::new(stdout).lines();
        let mut stderr_reader = BufReader::new(stderr).lines();
        let mut stdout_open = true;
        let mut stderr_open = true;

        // Drain both pipes before waiting, or a chatty backend blocks on a full one
        while stdout_open || stderr_open {
            tokio::select! {
                line = stdout_reader.next_line(), if stdout_open => {
                    match line {
                        Ok(Some(line)) => {
                            writeln!(out, "{}", line).map_err(ServerlessError::Output)?;
                            out.flush().map_err(ServerlessError::Output)?;
                        }
                        Ok(None) => stdout_open = false,
                        Err(e) => {
                            tracing::warn!("error reading backend stdout: {}", e);
                            stdout_open = false;
                        }
                    }
                }
                line = stderr_reader.next_line(), if stderr_open => {
                    match line {
                        Ok(Some(line)) => eprintln!("{}", line),
                        Ok(None) => stderr_open = false,
                        Err(e) => {
                            tracing::warn!("error reading backend stderr: {}", e);
                            stderr_open = false;
                        }
                    }
                }
            }
        }

        let status = child
            .wait()
            .await
            .map_err(|e| ServerlessError::Backend(format!("failed to wait for backend: {}", e)))?;
        if !status.success() {
            return Err(ServerlessError::Backend(format!(
                "serverless backend exited with code {}",
                status.code().unwrap_or(-1)
            )));
        }
        Ok(())
    }

    fn read_project(
        &self,
        project: &ServerlessProject,
        args: &[String],
    ) -> Result<ServerlessOutput> {
        reader::read_project(project, args)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::commands::run_watch;
    use crate::options::CommandOptions;
    use std::os::unix::process::ExitStatusExt;
    use std::path::{Path, PathBuf};
    use std::process::ExitStatus;
    use std::time::Duration;

    fn service_with_backend(backend: PathBuf) -> NimService {
        NimService::new(ServerlessConfig {
            backend,
            credentials_file: "/nonexistent/credentials.json".into(),
            min_backend_version: "1.0.0".into(),
            user_agent: "fnctl-test".into(),
        })
    }

    /// Install `body` as an executable shell script backend
    fn script_backend(dir: &Path, body: &str) -> NimService {
        use std::os::unix::fs::PermissionsExt;

        let script = dir.join("backend.sh");
        std::fs::write(&script, format!("#!/bin/sh\n{}", body)).unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        service_with_backend(script)
    }

    fn watch_request() -> ExecRequest {
        ExecRequest::new("watch", &["proj".to_string()], Default::default())
    }

    fn output(code: i32, stdout: &str, stderr: &str) -> Output {
        Output {
            status: ExitStatus::from_raw(code << 8),
            stdout: stdout.as_bytes().to_vec(),
            stderr: stderr.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_host_info_url() {
        assert_eq!(
            NimService::host_info_url("https://faas.example.com").unwrap().as_str(),
            "https://faas.example.com/api/v1"
        );
        assert_eq!(
            NimService::host_info_url("faas.example.com/").unwrap().as_str(),
            "https://faas.example.com/api/v1"
        );
    }

    #[test]
    fn test_successful_output() {
        let result = interpret_output(&output(0, r#"{"captured":["ok"]}"#, ""));
        assert!(result.error.is_none());
        assert_eq!(result.output.captured, vec!["ok"]);
    }

    #[test]
    fn test_error_field_keeps_transcript() {
        let result = interpret_output(&output(
            1,
            r#"{"captured":["Deploying project 'p'"],"error":"build failed"}"#,
            "",
        ));
        assert_eq!(result.output.captured.len(), 1);
        assert_eq!(result.error.unwrap().to_string(), "build failed");
    }

    #[test]
    fn test_nonzero_exit_uses_stderr() {
        let result = interpret_output(&output(2, "{}", "no credentials\n"));
        assert!(result.output.captured.is_empty());
        assert_eq!(result.error.unwrap().to_string(), "no credentials");
    }

    #[test]
    fn test_unparsable_stdout_becomes_transcript() {
        let result = interpret_output(&output(0, "line one\nline two\n", ""));
        assert_eq!(result.output.captured, vec!["line one", "line two"]);
        assert!(result.error.is_some());
    }

    #[tokio::test]
    async fn test_missing_backend_fails_status_and_exec() {
        let service = service_with_backend("/nonexistent/fnctl-backend".into());

        assert!(service.check_status().await.is_err());
        assert!(service.read_credentials().is_err());

        let request = ExecRequest::new("deploy", &["proj".to_string()], Default::default());
        let result = service.exec(&request).await;
        assert!(result.output.captured.is_empty());
        assert!(result.error.is_some());
    }

    #[tokio::test]
    async fn test_watch_relays_backend_lines_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let service = script_backend(
            dir.path(),
            "echo \"Deploying project '$2'\"\n\
             echo \"Deployed actions ('sls action get <actionName> --url' for URL):\"\n\
             echo 'build warning' >&2\n",
        );

        let mut out = Vec::new();
        run_watch(
            &service,
            &["proj".to_string()],
            &mut CommandOptions::new(),
            &mut out,
        )
        .await
        .unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Deploying project 'proj'\n\
             Deployed actions ('sls action get <actionName> --url' for URL):\n"
        );
    }

    #[tokio::test]
    async fn test_streaming_nonzero_exit_is_backend_error() {
        let dir = tempfile::tempdir().unwrap();
        let service = script_backend(dir.path(), "echo started\nexit 3\n");

        let mut out = Vec::new();
        let result = service.exec_streaming(&watch_request(), &mut out).await;

        assert_eq!(String::from_utf8(out).unwrap(), "started\n");
        assert!(matches!(
            result,
            Err(ServerlessError::Backend(ref m)) if m == "serverless backend exited with code 3"
        ));
    }

    #[tokio::test]
    async fn test_streaming_drains_stderr_after_stdout_closes() {
        let dir = tempfile::tempdir().unwrap();
        // Far more stderr than a pipe buffer holds, written after stdout is closed
        let service = script_backend(
            dir.path(),
            "echo before\n\
             exec 1>&-\n\
             i=0\n\
             while [ $i -lt 4096 ]; do\n\
               echo \"stderr filler line $i padded out to overflow the pipe buffer\" >&2\n\
               i=$((i + 1))\n\
             done\n\
             exit 3\n",
        );

        let mut out = Vec::new();
        let result = tokio::time::timeout(
            Duration::from_secs(30),
            service.exec_streaming(&watch_request(), &mut out),
        )
        .await
        .expect("backend exit was never observed");

        assert_eq!(String::from_utf8(out).unwrap(), "before\n");
        assert!(matches!(result, Err(ServerlessError::Backend(ref m)) if m.contains("code 3")));
    }

    #[tokio::test]
    async fn test_missing_backend_fails_streaming() {
        let service = service_with_backend("/nonexistent/fnctl-backend".into());
        let result = service.exec_streaming(&watch_request(), &mut Vec::new()).await;
        assert!(matches!(result, Err(ServerlessError::Backend(_))));
    }
}
