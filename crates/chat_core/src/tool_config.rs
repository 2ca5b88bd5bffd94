use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed name of the admin-configurable tool this frontend belongs to.
pub const TOOL_NAME: &str = "requirementsCompliance";

/// Extensible per-tool configuration object. Currently carries no settings;
/// unknown keys are accepted and dropped on the next save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EmptyConfig {}

/// Admin-side configuration for the tool. Every field apart from `name` may
/// be absent or null; validation only enforces the name literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<EmptyConfig>,
}

#[derive(Debug, Error)]
pub enum ToolConfigError {
    #[error("unsupported tool name: {0:?}")]
    UnknownTool(String),
    #[error("malformed tool config: {0}")]
    Parse(String),
}

impl ToolConfig {
    /// Parses and validates a serialized configuration, as done on both load
    /// and save of the admin surface.
    pub fn from_json(text: &str) -> Result<Self, ToolConfigError> {
        let parsed: ToolConfig =
            serde_json::from_str(text).map_err(|err| ToolConfigError::Parse(err.to_string()))?;
        parsed.validate()?;
        Ok(parsed)
    }

    pub fn validate(&self) -> Result<(), ToolConfigError> {
        if self.name != TOOL_NAME {
            return Err(ToolConfigError::UnknownTool(self.name.clone()));
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, ToolConfigError> {
        self.validate()?;
        serde_json::to_string_pretty(self).map_err(|err| ToolConfigError::Parse(err.to_string()))
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(false)
    }
}

impl Default for ToolConfig {
    /// The defaults written when no admin configuration exists yet.
    fn default() -> Self {
        Self {
            name: TOOL_NAME.to_owned(),
            label: Some(TOOL_NAME.to_owned()),
            description: Some(String::new()),
            enabled: Some(false),
            config: Some(EmptyConfig {}),
        }
    }
}
