use crate::EditorError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Top-level view of the playground
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewTab {
    #[default]
    Code,
    Preview,
}

impl ViewTab {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewTab::Code => "code",
            ViewTab::Preview => "preview",
        }
    }
}

impl fmt::Display for ViewTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewTab {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "code" => Ok(ViewTab::Code),
            "preview" => Ok(ViewTab::Preview),
            other => Err(EditorError::UnknownTab(other.to_string())),
        }
    }
}
