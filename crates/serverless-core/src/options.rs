//! Flag values collected by the CLI and the allow-lists each command forwards

use std::collections::BTreeMap;

pub const FLAG_ENV: &str = "env";
pub const FLAG_BUILD_ENV: &str = "build-env";
pub const FLAG_APIHOST: &str = "apihost";
pub const FLAG_AUTH: &str = "auth";
pub const FLAG_INSECURE: &str = "insecure";
pub const FLAG_VERBOSE_BUILD: &str = "verbose-build";
pub const FLAG_VERBOSE_ZIP: &str = "verbose-zip";
pub const FLAG_YARN: &str = "yarn";
pub const FLAG_REMOTE_BUILD: &str = "remote-build";
pub const FLAG_INCREMENTAL: &str = "incremental";
pub const FLAG_INCLUDE: &str = "include";
pub const FLAG_EXCLUDE: &str = "exclude";
pub const FLAG_JSON: &str = "json";
pub const FLAG_PROJECT_READER: &str = "project-reader";

pub const DEPLOY_BOOL_FLAGS: &[&str] = &[
    FLAG_INSECURE,
    FLAG_VERBOSE_BUILD,
    FLAG_VERBOSE_ZIP,
    FLAG_YARN,
    FLAG_REMOTE_BUILD,
    FLAG_INCREMENTAL,
];

pub const DEPLOY_STRING_FLAGS: &[&str] = &[
    FLAG_ENV,
    FLAG_BUILD_ENV,
    FLAG_APIHOST,
    FLAG_AUTH,
    FLAG_INCLUDE,
    FLAG_EXCLUDE,
];

/// Watch is already incremental, so `--incremental` is not offered
pub const WATCH_BOOL_FLAGS: &[&str] = &[
    FLAG_INSECURE,
    FLAG_VERBOSE_BUILD,
    FLAG_VERBOSE_ZIP,
    FLAG_YARN,
    FLAG_REMOTE_BUILD,
];

pub const WATCH_STRING_FLAGS: &[&str] = DEPLOY_STRING_FLAGS;

pub const METADATA_BOOL_FLAGS: &[&str] = &[FLAG_JSON, FLAG_PROJECT_READER];

pub const METADATA_STRING_FLAGS: &[&str] = &[FLAG_ENV, FLAG_INCLUDE, FLAG_EXCLUDE];

/// String flags whose values never appear in logs
pub const SECRET_FLAGS: &[&str] = &[FLAG_AUTH, FLAG_APIHOST];

const REDACTED: &str = "<redacted>";

/// Boolean and string flag values for one command invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOptions {
    bools: BTreeMap<String, bool>,
    strings: BTreeMap<String, String>,
}

impl CommandOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style boolean setter
    pub fn with_bool(mut self, name: &str, value: bool) -> Self {
        self.set_bool(name, value);
        self
    }

    /// Builder-style string setter; `None` leaves the flag unset
    pub fn with_string(mut self, name: &str, value: Option<String>) -> Self {
        if let Some(value) = value {
            self.set_string(name, value);
        }
        self
    }

    pub fn set_bool(&mut self, name: &str, value: bool) {
        self.bools.insert(name.to_string(), value);
    }

    pub fn set_string(&mut self, name: &str, value: impl Into<String>) {
        self.strings.insert(name.to_string(), value.into());
    }

    pub fn get_bool(&self, name: &str) -> bool {
        self.bools.get(name).copied().unwrap_or(false)
    }

    pub fn get_string(&self, name: &str) -> Option<&str> {
        self.strings.get(name).map(String::as_str)
    }

    /// Pick out the allow-listed flags worth forwarding: booleans that are
    /// set and strings that are non-empty, in allow-list order
    pub fn select(&self, bools: &[&str], strings: &[&str]) -> ForwardedFlags {
        ForwardedFlags {
            bools: bools
                .iter()
                .filter(|name| self.get_bool(name))
                .map(|name| name.to_string())
                .collect(),
            strings: strings
                .iter()
                .filter_map(|name| {
                    self.get_string(name)
                        .filter(|value| !value.is_empty())
                        .map(|value| (name.to_string(), value.to_string()))
                })
                .collect(),
        }
    }
}

/// Flags selected for one backend invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForwardedFlags {
    pub bools: Vec<String>,
    pub strings: Vec<(String, String)>,
}

impl ForwardedFlags {
    /// Render as command line arguments (`--flag`, `--key value`)
    pub fn to_args(&self) -> Vec<String> {
        let mut args: Vec<String> = self.bools.iter().map(|b| format!("--{}", b)).collect();
        for (key, value) in &self.strings {
            args.push(format!("--{}", key));
            args.push(value.clone());
        }
        args
    }

    /// Copy with the values of secret flags masked
    pub fn redacted(&self) -> Self {
        Self {
            bools: self.bools.clone(),
            strings: self
                .strings
                .iter()
                .map(|(key, value)| {
                    if SECRET_FLAGS.contains(&key.as_str()) {
                        (key.clone(), REDACTED.to_string())
                    } else {
                        (key.clone(), value.clone())
                    }
                })
                .collect(),
        }
    }
}

/// A single request to the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecRequest {
    /// Backend operation, e.g. `deploy`
    pub operation: String,
    /// Positional arguments (the project directory)
    pub args: Vec<String>,
    pub flags: ForwardedFlags,
}

impl ExecRequest {
    pub fn new(operation: &str, args: &[String], flags: ForwardedFlags) -> Self {
        Self {
            operation: operation.to_string(),
            args: args.to_vec(),
            flags,
        }
    }

    /// Full argument vector passed to the backend executable
    pub fn to_argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(1 + self.args.len());
        argv.push(self.operation.clone());
        argv.extend(self.args.iter().cloned());
        argv.extend(self.flags.to_args());
        argv
    }

    /// Argument vector safe to log
    pub fn redacted_argv(&self) -> Vec<String> {
        let mut argv = vec![self.operation.clone()];
        argv.extend(self.args.iter().cloned());
        argv.extend(self.flags.redacted().to_args());
        argv
    }
}
