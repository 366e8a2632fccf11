//! Project spec model (`project.yml`)

use crate::error::{Result, ServerlessError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Name of the config file at the root of every functions project
pub const PROJECT_FILE: &str = "project.yml";

/// Package created by `init`
pub const SAMPLE_PACKAGE: &str = "sample";

/// Root descriptor of a functions project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_namespace: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, serde_yaml::Value>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub environment: BTreeMap<String, String>,

    /// Packages in declaration order
    #[serde(default)]
    pub packages: Vec<Package>,
}

/// Named grouping of functions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub name: String,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub shared: bool,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub environment: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, serde_yaml::Value>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, serde_yaml::Value>,

    #[serde(default)]
    pub functions: Vec<Function>,
}

/// A single deployable unit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Function {
    pub name: String,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub binary: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,

    /// Runtime kind, `<language>:<tag>`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub runtime: String,

    #[serde(default)]
    pub web: bool,

    #[serde(default)]
    pub web_secure: bool,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, serde_yaml::Value>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub environment: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, serde_yaml::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<Limits>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs: Option<u64>,
}

impl ProjectSpec {
    /// Minimal in-memory config for a fresh project: one empty `sample` package
    pub fn template() -> Self {
        Self {
            packages: vec![Package {
                name: SAMPLE_PACKAGE.to_string(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    /// First package with the given name
    pub fn package(&self, name: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.name == name)
    }

    pub fn package_mut(&mut self, name: &str) -> Option<&mut Package> {
        self.packages.iter_mut().find(|p| p.name == name)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load `project.yml` from a project directory
    pub fn load(project_dir: &Path) -> Result<Self> {
        let path = project_dir.join(PROJECT_FILE);
        let content =
            std::fs::read_to_string(&path).map_err(|e| ServerlessError::fs(&path, e))?;
        Self::from_yaml(&content)
    }
}

impl Package {
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }
}
