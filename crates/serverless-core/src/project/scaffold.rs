//! On-disk scaffolding of a new functions project

use super::spec::{Function, ProjectSpec, PROJECT_FILE, SAMPLE_PACKAGE};
use super::templates;
use crate::error::{Result, ServerlessError};
use crate::language::{file_extension_for_runtime, ResolvedLanguage};
use std::fs::{DirBuilder, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Name of the generated sample function
pub const SAMPLE_FUNCTION: &str = "hello";

#[cfg(unix)]
const FILE_MODE: u32 = 0o664;
#[cfg(unix)]
const DIR_MODE: u32 = 0o775;

/// The two filesystem primitives scaffolding goes through
pub trait ProjectFs {
    /// Create or truncate a file with fixed permissions
    fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Create a directory, and with `parents` any missing ancestors
    fn make_dir(&self, path: &Path, parents: bool) -> io::Result<()>;
}

/// `ProjectFs` writing to the real filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFs;

impl ProjectFs for DiskFs {
    fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(FILE_MODE);
        }
        options.open(path)?.write_all(contents)
    }

    fn make_dir(&self, path: &Path, parents: bool) -> io::Result<()> {
        let mut builder = DirBuilder::new();
        builder.recursive(parents);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(DIR_MODE);
        }
        builder.create(path)
    }
}

/// Make room for a project. A missing path or an empty directory is fine;
/// anything else needs `overwrite`, in which case it is removed.
pub fn prepare_project_area(project: &Path, overwrite: bool) -> Result<()> {
    let meta = match std::fs::symlink_metadata(project) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(ServerlessError::fs(project, e)),
    };

    if meta.is_dir() {
        let mut entries = std::fs::read_dir(project).map_err(|e| ServerlessError::fs(project, e))?;
        if entries.next().is_none() {
            return Ok(());
        }
    }

    if !overwrite {
        return Err(ServerlessError::PathConflict(project.to_path_buf()));
    }

    tracing::info!(path = %project.display(), "removing existing project area");
    let removed = if meta.is_dir() {
        std::fs::remove_dir_all(project)
    } else {
        std::fs::remove_file(project)
    };
    removed.map_err(|e| ServerlessError::fs(project, e))
}

/// Put the sample function into the `sample` package of `config`
pub fn register_sample(config: &mut ProjectSpec, kind: &str) -> Result<()> {
    let package = config
        .package_mut(SAMPLE_PACKAGE)
        .ok_or_else(|| ServerlessError::Internal("could not find sample package in config".into()))?;
    package.functions = vec![Function {
        name: SAMPLE_FUNCTION.to_string(),
        runtime: kind.to_string(),
        web: true,
        web_secure: false,
        ..Default::default()
    }];
    Ok(())
}

/// What `Scaffolder::create` produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldedProject {
    pub root: PathBuf,
    /// Directory of the sample function
    pub function_dir: PathBuf,
    /// Every file written, in write order
    pub files: Vec<PathBuf>,
}

/// Writes a project skeleton through a `ProjectFs`
pub struct Scaffolder<F: ProjectFs> {
    fs: F,
    files: Vec<PathBuf>,
}

impl<F: ProjectFs> Scaffolder<F> {
    pub fn new(fs: F) -> Self {
        Self {
            fs,
            files: Vec::new(),
        }
    }

    fn mkdir(&self, path: &Path, parents: bool) -> Result<()> {
        self.fs
            .make_dir(path, parents)
            .map_err(|e| ServerlessError::fs(path, e))
    }

    fn write(&mut self, path: PathBuf, contents: &[u8]) -> Result<()> {
        self.fs
            .write_file(&path, contents)
            .map_err(|e| ServerlessError::fs(&path, e))?;
        self.files.push(path);
        Ok(())
    }

    /// Scaffold a project for an already resolved language.
    ///
    /// Nothing is rolled back if a step fails part way.
    pub fn create(
        mut self,
        project: &Path,
        language: &ResolvedLanguage,
        overwrite: bool,
    ) -> Result<ScaffoldedProject> {
        let sample_package = project.join("packages").join(SAMPLE_PACKAGE);

        prepare_project_area(project, overwrite)?;
        self.mkdir(&sample_package, true)?;

        let mut config = ProjectSpec::template();
        let function_dir = self.generate_sample(&mut config, language, &sample_package)?;

        let yaml = config.to_yaml()?;
        self.write(project.join(PROJECT_FILE), yaml.as_bytes())?;

        let mut ignores = templates::GITIGNORE.to_string();
        if language.typescript {
            ignores.push_str(templates::GITIGNORE_TYPESCRIPT);
        }
        self.write(project.join(".gitignore"), ignores.as_bytes())?;

        if language.typescript {
            self.write(
                function_dir.join("package.json"),
                templates::TYPESCRIPT_PACKAGE_JSON.as_bytes(),
            )?;
            self.write(
                function_dir.join("tsconfig.json"),
                templates::TYPESCRIPT_TSCONFIG.as_bytes(),
            )?;
            self.write(
                function_dir.join(".include"),
                templates::TYPESCRIPT_INCLUDE.as_bytes(),
            )?;
        }

        Ok(ScaffoldedProject {
            root: project.to_path_buf(),
            function_dir,
            files: self.files,
        })
    }

    /// Write the sample source and register it in `config`; returns the function directory
    fn generate_sample(
        &mut self,
        config: &mut ProjectSpec,
        language: &ResolvedLanguage,
        sample_package: &Path,
    ) -> Result<PathBuf> {
        let suffix = if language.typescript {
            "ts"
        } else {
            file_extension_for_runtime(language.runtime())
        };
        let file_name = format!("{}.{}", SAMPLE_FUNCTION, suffix);

        let function_dir = sample_package.join(SAMPLE_FUNCTION);
        self.mkdir(&function_dir, true)?;

        let file = if language.typescript {
            let src_dir = function_dir.join("src");
            self.mkdir(&src_dir, false)?;
            src_dir.join(file_name)
        } else {
            function_dir.join(file_name)
        };
        self.write(file, language.sample.as_bytes())?;

        register_sample(config, &language.kind)?;
        Ok(function_dir)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::language::lookup;
    use std::cell::RefCell;
    use std::fs;

    /// Records every primitive call without touching the disk
    #[derive(Default)]
    pub(crate) struct SpyFs {
        pub ops: RefCell<Vec<String>>,
        pub written: RefCell<Vec<(PathBuf, Vec<u8>)>>,
    }

    impl ProjectFs for &SpyFs {
        fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
            self.ops.borrow_mut().push(format!("write {}", path.display()));
            self.written
                .borrow_mut()
                .push((path.to_path_buf(), contents.to_vec()));
            Ok(())
        }

        fn make_dir(&self, path: &Path, parents: bool) -> io::Result<()> {
            self.ops
                .borrow_mut()
                .push(format!("mkdir {} {}", path.display(), parents));
            Ok(())
        }
    }

    fn resolved(keyword: &str) -> ResolvedLanguage {
        let mapping = lookup(keyword).unwrap();
        ResolvedLanguage {
            kind: format!("{}:default", mapping.runtime),
            sample: mapping.sample,
            typescript: mapping.typescript,
        }
    }

    #[test]
    fn test_all_writes_go_through_primitives() {
        let spy = SpyFs::default();
        let root = PathBuf::from("/nonexistent/fnctl-spy/proj");
        let created = Scaffolder::new(&spy)
            .create(&root, &resolved("python"), false)
            .unwrap();

        let ops = spy.ops.borrow();
        assert_eq!(
            *ops,
            vec![
                "mkdir /nonexistent/fnctl-spy/proj/packages/sample true",
                "mkdir /nonexistent/fnctl-spy/proj/packages/sample/hello true",
                "write /nonexistent/fnctl-spy/proj/packages/sample/hello/hello.py",
                "write /nonexistent/fnctl-spy/proj/project.yml",
                "write /nonexistent/fnctl-spy/proj/.gitignore",
            ]
        );
        assert_eq!(created.files.len(), 3);
        assert!(!root.exists());
    }

    #[test]
    fn test_typescript_layout() {
        let spy = SpyFs::default();
        let root = PathBuf::from("/nonexistent/fnctl-spy/ts");
        Scaffolder::new(&spy)
            .create(&root, &resolved("typescript"), false)
            .unwrap();

        let ops = spy.ops.borrow();
        assert!(ops.contains(&"mkdir /nonexistent/fnctl-spy/ts/packages/sample/hello/src false".to_string()));
        let written = spy.written.borrow();
        let include = written
            .iter()
            .find(|(p, _)| p.ends_with("hello/.include"))
            .unwrap();
        assert_eq!(include.1, b"lib\n");
    }

    #[test]
    fn test_sample_package_lookup_cannot_fail_on_template() {
        let mut config = ProjectSpec::template();
        register_sample(&mut config, "nodejs:default").unwrap();
        let hello = config.package(SAMPLE_PACKAGE).unwrap().function("hello").unwrap();
        assert!(hello.web);
        assert!(!hello.web_secure);

        // Only a hand-built config without the sample package reaches the internal error
        let mut empty = ProjectSpec::default();
        assert!(matches!(
            register_sample(&mut empty, "nodejs:default"),
            Err(ServerlessError::Internal(_))
        ));
    }

    #[test]
    fn test_disk_scaffold_javascript() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("proj");
        let created = Scaffolder::new(DiskFs)
            .create(&root, &resolved("js"), false)
            .unwrap();

        assert_eq!(created.function_dir, root.join("packages/sample/hello"));
        let source = fs::read_to_string(root.join("packages/sample/hello/hello.js")).unwrap();
        assert_eq!(source, templates::JAVASCRIPT_SAMPLE);

        let config = ProjectSpec::load(&root).unwrap();
        let hello = config.package("sample").unwrap().function("hello").unwrap();
        assert_eq!(hello.runtime, "nodejs:default");

        let ignores = fs::read_to_string(root.join(".gitignore")).unwrap();
        assert_eq!(ignores, templates::GITIGNORE);
    }

    #[cfg(unix)]
    #[test]
    fn test_disk_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("f");
        DiskFs.write_file(&file, b"x").unwrap();
        let mode = fs::metadata(&file).unwrap().permissions().mode() & 0o777;
        // umask can only clear bits
        assert_eq!(mode & !FILE_MODE, 0);

        let sub = dir.path().join("a/b");
        DiskFs.make_dir(&sub, true).unwrap();
        let mode = fs::metadata(&sub).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode & !DIR_MODE, 0);
        assert_ne!(mode & 0o700, 0);
    }

    #[test]
    fn test_prepare_area() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        assert!(prepare_project_area(&missing, false).is_ok());

        let empty = dir.path().join("empty");
        fs::create_dir(&empty).unwrap();
        assert!(prepare_project_area(&empty, false).is_ok());
        assert!(empty.exists());

        let full = dir.path().join("full");
        fs::create_dir(&full).unwrap();
        fs::write(full.join("keep.txt"), "data").unwrap();
        assert!(matches!(
            prepare_project_area(&full, false),
            Err(ServerlessError::PathConflict(_))
        ));
        assert!(full.join("keep.txt").exists());

        prepare_project_area(&full, true).unwrap();
        assert!(!full.exists());
    }
}
