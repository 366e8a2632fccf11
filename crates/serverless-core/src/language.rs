//! Language keywords, runtimes, and the runtime availability check

use crate::error::{Result, ServerlessError};
use crate::project::templates;
use crate::service::ServerlessService;
use std::fmt;

/// Language used when `--language` is not given
pub const DEFAULT_LANGUAGE: &str = "javascript";

/// Runtime behind the default language; always accepted without a host check
pub const DEFAULT_RUNTIME: &str = "nodejs";

/// Tag appended to every runtime in generated configs
pub const DEFAULT_TAG: &str = "default";

/// One row of the language table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageMapping {
    /// Lower-case keywords accepted on the command line
    pub keywords: &'static [&'static str],
    /// Canonical runtime name as the host reports it
    pub runtime: &'static str,
    pub sample: &'static str,
    /// TypeScript needs a compile step and its own tooling files
    pub typescript: bool,
}

pub const LANGUAGES: &[LanguageMapping] = &[
    LanguageMapping {
        keywords: &["javascript", "js"],
        runtime: "nodejs",
        sample: templates::JAVASCRIPT_SAMPLE,
        typescript: false,
    },
    LanguageMapping {
        keywords: &["typescript", "ts"],
        runtime: "nodejs",
        sample: templates::TYPESCRIPT_SAMPLE,
        typescript: true,
    },
    LanguageMapping {
        keywords: &["python", "py"],
        runtime: "python",
        sample: templates::PYTHON_SAMPLE,
        typescript: false,
    },
    LanguageMapping {
        keywords: &["go", "golang"],
        runtime: "go",
        sample: templates::GO_SAMPLE,
        typescript: false,
    },
    LanguageMapping {
        keywords: &["php"],
        runtime: "php",
        sample: templates::PHP_SAMPLE,
        typescript: false,
    },
];

/// Find the table row for a keyword (case-insensitive)
pub fn lookup(language: &str) -> Option<&'static LanguageMapping> {
    let language = language.to_lowercase();
    LANGUAGES
        .iter()
        .find(|mapping| mapping.keywords.contains(&language.as_str()))
}

/// File extension for a runtime's sample; runtimes not listed use their own name
pub fn file_extension_for_runtime(runtime: &str) -> &str {
    match runtime {
        "nodejs" => "js",
        "python" => "py",
        other => other,
    }
}

/// Inverse of `file_extension_for_runtime`, also mapping `ts` to `nodejs`
pub fn runtime_for_extension(ext: &str) -> Option<&'static str> {
    match ext {
        "js" | "ts" => Some("nodejs"),
        "py" => Some("python"),
        _ => LANGUAGES
            .iter()
            .map(|mapping| mapping.runtime)
            .find(|runtime| *runtime == ext),
    }
}

/// Outcome of asking the host whether it offers a runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeValidation {
    Valid,
    Invalid,
    /// The host could not be asked
    Unknown,
}

impl RuntimeValidation {
    /// Creating a project must not require connectivity, so unknown counts as valid
    pub fn is_accepted(self) -> bool {
        !matches!(self, RuntimeValidation::Invalid)
    }
}

impl fmt::Display for RuntimeValidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RuntimeValidation::Valid => "valid",
            RuntimeValidation::Invalid => "invalid",
            RuntimeValidation::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

/// Ask the host whether it offers `runtime`
pub async fn validate_runtime<S: ServerlessService>(service: &S, runtime: &str) -> RuntimeValidation {
    if runtime == DEFAULT_RUNTIME {
        return RuntimeValidation::Valid;
    }

    if let Err(e) = service.check_status().await {
        tracing::debug!("runtime check skipped, backend unavailable: {}", e);
        return RuntimeValidation::Unknown;
    }
    let creds = match service.read_credentials() {
        Ok(creds) => creds,
        Err(e) => {
            tracing::debug!("runtime check skipped, no credentials: {}", e);
            return RuntimeValidation::Unknown;
        }
    };
    let info = match service.get_host_info(&creds.api_host).await {
        Ok(info) => info,
        Err(e) => {
            tracing::debug!("runtime check skipped, host unreachable: {}", e);
            return RuntimeValidation::Unknown;
        }
    };

    if info.runtimes.contains_key(runtime) {
        RuntimeValidation::Valid
    } else {
        RuntimeValidation::Invalid
    }
}

/// A language keyword resolved to what `init` needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLanguage {
    /// Runtime kind, `<runtime>:<tag>`
    pub kind: String,
    pub sample: &'static str,
    pub typescript: bool,
}

impl ResolvedLanguage {
    /// Runtime part of the kind
    pub fn runtime(&self) -> &str {
        self.kind.split(':').next().unwrap_or(&self.kind)
    }
}

/// Resolve a user-supplied language keyword to a runtime kind and sample
pub async fn resolve_language<S: ServerlessService>(
    service: &S,
    language: &str,
) -> Result<ResolvedLanguage> {
    let language = language.to_lowercase();
    let mapping =
        lookup(&language).ok_or_else(|| ServerlessError::UnsupportedLanguage(language.clone()))?;

    let validation = validate_runtime(service, mapping.runtime).await;
    tracing::debug!(runtime = mapping.runtime, %validation, "runtime check");
    if !validation.is_accepted() {
        return Err(ServerlessError::UnsupportedLanguage(language));
    }

    Ok(ResolvedLanguage {
        kind: format!("{}:{}", mapping.runtime, DEFAULT_TAG),
        sample: mapping.sample,
        typescript: mapping.typescript,
    })
}
