//! Functions project model and scaffolding
//!
//! This module provides:
//! - The `project.yml` model (`ProjectSpec`, `Package`, `Function`)
//! - `Scaffolder`, which lays out a new project through replaceable filesystem primitives
//! - The static sample sources and tooling files a new project starts with

pub mod scaffold;
pub mod spec;
pub mod templates;

pub use scaffold::{prepare_project_area, DiskFs, ProjectFs, ScaffoldedProject, Scaffolder};
pub use spec::{Function, Limits, Package, ProjectSpec, PROJECT_FILE, SAMPLE_PACKAGE};
