//! Backend version compatibility

use crate::error::{Result, ServerlessError};
use semver::Version;

/// Compare the installed backend version against the minimum supported one.
/// Versions that can't be parsed are let through.
pub fn check_backend_version(installed: &str, minimum: &str) -> Result<()> {
    let (Some(installed_ver), Some(minimum_ver)) = (parse_version(installed), parse_version(minimum))
    else {
        return Ok(());
    };

    if installed_ver < minimum_ver {
        return Err(ServerlessError::Backend(format!(
            "serverless backend version {} is installed but {} or newer is required",
            installed_ver, minimum_ver
        )));
    }
    Ok(())
}

/// Parse a version string, tolerating a leading `v` and surrounding text
/// such as `nim 4.2.7`
pub fn parse_version(version_str: &str) -> Option<Version> {
    let token = version_str.split_whitespace().last()?;
    let cleaned = token.strip_prefix('v').unwrap_or(token);
    Version::parse(cleaned).ok()
}
