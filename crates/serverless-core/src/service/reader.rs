//! Local project reader
//!
//! Builds a project description without the backend: the declared config in
//! `project.yml` merged with whatever packages and functions are found under
//! `packages/`. Functions discovered on disk get their runtime from the
//! extension of their source file.

use super::ServerlessProject;
use crate::error::{Result, ServerlessError};
use crate::language::runtime_for_extension;
use crate::output::ServerlessOutput;
use crate::project::spec::{Function, Package, ProjectSpec, PROJECT_FILE};
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

const PACKAGES_DIR: &str = "packages";

/// Read a project and return it as the output entity
pub fn read_project(project: &ServerlessProject, _args: &[String]) -> Result<ServerlessOutput> {
    let root = &project.project_path;
    if !root.is_dir() {
        return Err(ServerlessError::fs(
            root,
            std::io::Error::new(std::io::ErrorKind::NotFound, "not a project directory"),
        ));
    }

    let mut spec = if root.join(PROJECT_FILE).is_file() {
        ProjectSpec::load(root)?
    } else {
        ProjectSpec::default()
    };

    let packages_dir = root.join(PACKAGES_DIR);
    if packages_dir.is_dir() {
        merge_discovered(&mut spec, &packages_dir)?;
    }

    tracing::debug!(packages = spec.packages.len(), "project read locally");
    Ok(ServerlessOutput::from_entity(serde_json::json!({
        "project": root.display().to_string(),
        "spec": serde_json::to_value(&spec)?,
    })))
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

fn children(dir: &Path) -> impl Iterator<Item = walkdir::Result<DirEntry>> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e))
}

fn walk_error(err: walkdir::Error) -> ServerlessError {
    let path = err.path().map(Path::to_path_buf).unwrap_or_default();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "filesystem loop"));
    ServerlessError::fs(path, source)
}

/// Add packages and functions present on disk but absent from the config
fn merge_discovered(spec: &mut ProjectSpec, packages_dir: &Path) -> Result<()> {
    for pkg_entry in children(packages_dir) {
        let pkg_entry = pkg_entry.map_err(walk_error)?;
        if !pkg_entry.file_type().is_dir() {
            continue;
        }
        let pkg_name = pkg_entry.file_name().to_string_lossy().to_string();

        let index = match spec.packages.iter().position(|p| p.name == pkg_name) {
            Some(index) => index,
            None => {
                spec.packages.push(Package {
                    name: pkg_name,
                    ..Default::default()
                });
                spec.packages.len() - 1
            }
        };
        let package = &mut spec.packages[index];

        for fn_entry in children(pkg_entry.path()) {
            let fn_entry = fn_entry.map_err(walk_error)?;
            let Some((name, runtime)) = discover_function(&fn_entry) else {
                continue;
            };
            if package.function(&name).is_none() {
                package.functions.push(Function {
                    name,
                    runtime: runtime.unwrap_or_default(),
                    ..Default::default()
                });
            }
        }
    }
    Ok(())
}

/// A function is either a single source file or a directory holding sources
fn discover_function(entry: &DirEntry) -> Option<(String, Option<String>)> {
    let path = entry.path();
    if entry.file_type().is_file() {
        let runtime = runtime_for_path(path)?;
        let name = path.file_stem()?.to_string_lossy().to_string();
        return Some((name, Some(runtime)));
    }
    if entry.file_type().is_dir() {
        let name = entry.file_name().to_string_lossy().to_string();
        let runtime = WalkDir::new(path)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_hidden(e) && e.file_name() != "node_modules")
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .find_map(|e| runtime_for_path(e.path()));
        return Some((name, runtime));
    }
    None
}

fn runtime_for_path(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?;
    runtime_for_extension(ext).map(|runtime| format!("{}:default", runtime))
}
