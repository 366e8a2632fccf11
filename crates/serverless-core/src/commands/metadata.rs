//! `serverless get-metadata <directory>`

use crate::error::{ensure_one_arg, Result};
use crate::filters::adjust_include_and_exclude;
use crate::options::{
    CommandOptions, ExecRequest, FLAG_JSON, FLAG_PROJECT_READER, METADATA_BOOL_FLAGS,
    METADATA_STRING_FLAGS,
};
use crate::output::print_output;
use crate::service::{ServerlessProject, ServerlessService};
use std::io::Write;
use std::path::PathBuf;

/// Print the metadata of the project directory in `args`.
///
/// The hidden `--project-reader` flag reads the project locally instead of
/// asking the backend.
pub async fn run_get_metadata<S: ServerlessService>(
    service: &S,
    args: &[String],
    options: &mut CommandOptions,
    out: &mut impl Write,
) -> Result<()> {
    let directory = ensure_one_arg(args)?;
    adjust_include_and_exclude(options);

    let output = if options.get_bool(FLAG_PROJECT_READER) {
        let project = ServerlessProject {
            project_path: PathBuf::from(directory),
        };
        tracing::debug!(path = %project.project_path.display(), "reading project locally");
        service.read_project(&project, args)?
    } else {
        options.set_bool(FLAG_JSON, true);
        let request = ExecRequest::new(
            "get-metadata",
            args,
            options.select(METADATA_BOOL_FLAGS, METADATA_STRING_FLAGS),
        );
        service.exec(&request).await.into_result()?
    };

    print_output(out, &output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServerlessError;
    use crate::options::FLAG_ENV;
    use crate::service::fake::FakeService;

    #[tokio::test]
    async fn test_legacy_path_uses_backend() {
        let service = FakeService {
            exec_lines: vec!["{\"packages\":[]}".to_string()],
            ..Default::default()
        };
        let mut options = CommandOptions::new().with_string(FLAG_ENV, Some(".env".into()));
        let mut out = Vec::new();
        run_get_metadata(&service, &["proj".to_string()], &mut options, &mut out)
            .await
            .unwrap();

        assert!(!service.called("read_project"));
        let requests = service.requests.borrow();
        assert_eq!(
            requests[0].to_argv(),
            vec!["get-metadata", "proj", "--json", "--env", ".env", "--exclude", "web"]
        );
        assert_eq!(String::from_utf8(out).unwrap(), "{\"packages\":[]}\n");
    }

    #[tokio::test]
    async fn test_project_reader_bypasses_backend() {
        let service = FakeService::default();
        let mut options = CommandOptions::new().with_bool(FLAG_PROJECT_READER, true);
        let mut out = Vec::new();
        run_get_metadata(&service, &["proj".to_string()], &mut options, &mut out)
            .await
            .unwrap();

        assert!(service.called("read_project"));
        assert!(!service.called("exec"));
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\n  \"path\": \"proj\"\n}\n"
        );
    }

    #[tokio::test]
    async fn test_backend_error_is_returned() {
        let service = FakeService {
            exec_lines: vec!["partial".to_string()],
            exec_error: Some("no such project".into()),
            ..Default::default()
        };
        let mut out = Vec::new();
        let result =
            run_get_metadata(&service, &["proj".to_string()], &mut CommandOptions::new(), &mut out)
                .await;
        assert!(matches!(result, Err(ServerlessError::Backend(_))));
        assert!(out.is_empty());
    }
}
