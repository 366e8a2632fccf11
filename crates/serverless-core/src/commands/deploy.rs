//! `serverless deploy <directory>`

use crate::error::{ensure_one_arg, Result};
use crate::filters::adjust_include_and_exclude;
use crate::options::{CommandOptions, ExecRequest, DEPLOY_BOOL_FLAGS, DEPLOY_STRING_FLAGS};
use crate::output::print_output;
use crate::product::ProductConfig;
use crate::service::ServerlessService;
use std::io::Write;

const DEPLOYING_PROJECT: &str = "Deploying project";
const DEPLOYED: &str = "Deployed";
const DEPLOYED_ACTIONS: &str = "Deployed actions";

/// Adapt the backend's deploy transcript to this CLI's wording.
///
/// Depends on the backend's exact phrasing; each line is handled on its own.
pub fn rewrite_transcript(lines: Vec<String>, deployed_banner: &str) -> Vec<String> {
    lines
        .into_iter()
        .map(|line| {
            if line.contains(DEPLOYING_PROJECT) {
                line.replacen(DEPLOYING_PROJECT, DEPLOYED, 1)
            } else if line.contains(DEPLOYED_ACTIONS) {
                deployed_banner.to_string()
            } else {
                line
            }
        })
        .collect()
}

/// Deploy the project directory in `args`.
///
/// When the backend fails after producing a transcript, the transcript is
/// printed before the error is returned.
pub async fn run_deploy<S, C>(
    service: &S,
    product: &C,
    args: &[String],
    options: &mut CommandOptions,
    out: &mut impl Write,
) -> Result<()>
where
    S: ServerlessService,
    C: ProductConfig,
{
    ensure_one_arg(args)?;
    adjust_include_and_exclude(options);

    let request = ExecRequest::new(
        "deploy",
        args,
        options.select(DEPLOY_BOOL_FLAGS, DEPLOY_STRING_FLAGS),
    );
    let mut result = service.exec(&request).await;

    if let Some(err) = result.error.take() {
        if result.output.captured.is_empty() {
            return Err(err);
        }
        let lines = rewrite_transcript(result.output.captured, &product.deployed_functions_banner());
        let _ = writeln!(out, "{}", lines.join("\n"));
        return Err(err);
    }

    let mut output = result.output;
    output.captured = rewrite_transcript(output.captured, &product.deployed_functions_banner());
    print_output(out, &output)
}
