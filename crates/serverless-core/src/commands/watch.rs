//! `serverless watch <directory>`

use crate::error::{ensure_one_arg, Result};
use crate::filters::adjust_include_and_exclude;
use crate::options::{CommandOptions, ExecRequest, WATCH_BOOL_FLAGS, WATCH_STRING_FLAGS};
use crate::service::ServerlessService;
use std::io::Write;

/// Watch the project directory in `args`, deploying incrementally on change.
///
/// Backend output is relayed as-is until the backend exits or the process
/// is interrupted.
pub async fn run_watch<S: ServerlessService>(
    service: &S,
    args: &[String],
    options: &mut CommandOptions,
    out: &mut impl Write,
) -> Result<()> {
    ensure_one_arg(args)?;
    adjust_include_and_exclude(options);

    let request = ExecRequest::new(
        "watch",
        args,
        options.select(WATCH_BOOL_FLAGS, WATCH_STRING_FLAGS),
    );
    service.exec_streaming(&request, out).await
}
