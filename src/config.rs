use serde::{Deserialize, Serialize};

/// Settings for a [`crate::service::SelectService`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectConfig {
    /// Label attached to the service's log events.
    pub name: String,
    /// Emit the statement text with every debug event.
    pub log_statements: bool,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            name: "sqlite".to_string(),
            log_statements: false,
        }
    }
}

impl SelectConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_log_statements(mut self, enabled: bool) -> Self {
        self.log_statements = enabled;
        self
    }
}
