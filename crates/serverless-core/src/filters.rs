//! Include/exclude rewriting for the reserved `web` folder
//!
//! The backend treats a bare `web` as the project's web-content folder and
//! `web/` as a package named `web`. Project folders may contain a `web`
//! subfolder that should not be deployed unless the user asks for it, so
//! `web` is always appended to the exclusions.

use crate::options::{CommandOptions, FLAG_EXCLUDE, FLAG_INCLUDE};

/// Name of the folder with special default-exclusion handling
pub const RESERVED_FOLDER: &str = "web";

/// Rewrite the include and exclude options in place
pub fn adjust_include_and_exclude(options: &mut CommandOptions) {
    if let Some(includes) = options.get_string(FLAG_INCLUDE).filter(|s| !s.is_empty()) {
        let includes = qualify_reserved_with_slash(includes);
        options.set_string(FLAG_INCLUDE, includes);
    }

    let excludes = match options.get_string(FLAG_EXCLUDE).filter(|s| !s.is_empty()) {
        Some(excludes) => format!("{},{}", qualify_reserved_with_slash(excludes), RESERVED_FOLDER),
        None => RESERVED_FOLDER.to_string(),
    };
    options.set_string(FLAG_EXCLUDE, excludes);
}

/// Turn every token that is exactly `web` into `web/`
pub fn qualify_reserved_with_slash(list: &str) -> String {
    list.split(',')
        .map(|token| {
            if token == RESERVED_FOLDER {
                format!("{}/", RESERVED_FOLDER)
            } else {
                token.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}
