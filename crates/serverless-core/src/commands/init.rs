//! `serverless init <path>`

use crate::error::{ensure_one_arg, Result, ServerlessError};
use crate::language::resolve_language;
use crate::product::ProductConfig;
use crate::project::{ProjectFs, ScaffoldedProject, Scaffolder};
use crate::service::ServerlessService;
use std::io::Write;
use std::path::Path;

/// Create a functions project at the single path in `args`
pub async fn run_init<S, F, C>(
    service: &S,
    fs: F,
    product: &C,
    args: &[String],
    language: &str,
    overwrite: bool,
    out: &mut impl Write,
) -> Result<ScaffoldedProject>
where
    S: ServerlessService,
    F: ProjectFs,
    C: ProductConfig,
{
    let project = Path::new(ensure_one_arg(args)?);

    // Resolve first so an unsupported language leaves the filesystem alone
    let resolved = resolve_language(service, language).await?;
    tracing::info!(path = %project.display(), kind = %resolved.kind, "initializing functions project");

    let created = Scaffolder::new(fs).create(project, &resolved, overwrite)?;

    for line in product.next_steps(project) {
        writeln!(out, "{}", line).map_err(ServerlessError::Output)?;
    }
    Ok(created)
}
