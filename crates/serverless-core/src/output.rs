//! Backend output shape and its text rendering

use crate::error::{Result, ServerlessError};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Structured output of one backend invocation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerlessOutput {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub table: Vec<serde_json::Map<String, serde_json::Value>>,

    /// Line-oriented transcript
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub captured: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub formatted: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error: String,
}

impl ServerlessOutput {
    pub fn from_captured(lines: Vec<String>) -> Self {
        Self {
            captured: lines,
            ..Default::default()
        }
    }

    pub fn from_entity(entity: serde_json::Value) -> Self {
        Self {
            entity: Some(entity),
            ..Default::default()
        }
    }
}

/// Transcript of a backend invocation paired with its terminal error, if any
#[derive(Debug, Default)]
pub struct ExecResult {
    pub output: ServerlessOutput,
    pub error: Option<ServerlessError>,
}

impl ExecResult {
    pub fn ok(output: ServerlessOutput) -> Self {
        Self {
            output,
            error: None,
        }
    }

    pub fn failed(output: ServerlessOutput, error: ServerlessError) -> Self {
        Self {
            output,
            error: Some(error),
        }
    }

    /// Drop the transcript when there is an error
    pub fn into_result(self) -> Result<ServerlessOutput> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.output),
        }
    }
}

/// Render output as text: captured lines, else formatted lines, else the
/// table or entity as pretty JSON
pub fn print_output(out: &mut impl Write, output: &ServerlessOutput) -> Result<()> {
    let text = if !output.captured.is_empty() {
        output.captured.join("\n")
    } else if !output.formatted.is_empty() {
        output.formatted.join("\n")
    } else if !output.table.is_empty() {
        serde_json::to_string_pretty(&output.table)?
    } else if let Some(entity) = &output.entity {
        serde_json::to_string_pretty(entity)?
    } else {
        return Ok(());
    };

    writeln!(out, "{}", text).map_err(ServerlessError::Output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(output: &ServerlessOutput) -> String {
        let mut buf = Vec::new();
        print_output(&mut buf, output).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_captured_wins() {
        let mut output = ServerlessOutput::from_captured(vec!["a".into(), "b".into()]);
        output.formatted = vec!["ignored".into()];
        assert_eq!(render(&output), "a\nb\n");
    }

    #[test]
    fn test_entity_as_json() {
        let output = ServerlessOutput::from_entity(json!({"packages": []}));
        assert_eq!(render(&output), "{\n  \"packages\": []\n}\n");
    }

    #[test]
    fn test_empty_prints_nothing() {
        assert_eq!(render(&ServerlessOutput::default()), "");
    }

    #[test]
    fn test_parse_backend_json() {
        let output: ServerlessOutput =
            serde_json::from_str(r#"{"captured":["Deploying project 'p'"],"error":"boom"}"#)
                .unwrap();
        assert_eq!(output.captured.len(), 1);
        assert_eq!(output.error, "boom");
        assert!(output.entity.is_none());
    }
}
