use crate::core::{ProxyError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// When the factory (re)generates proxy artifacts for a class it has not
/// loaded yet. Fixed for the lifetime of a factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AutogenerateMode {
    /// Artifacts are generated ahead of time; a missing artifact is fatal.
    Never,
    /// Regenerate on every cold resolution.
    #[default]
    Always,
    /// Generate only when the artifact is missing.
    FileNotExists,
    /// Materialize the proxy class in-process, never touching storage.
    Eval,
}

/// What the factory does to make a proxy class available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationAction {
    Load,
    GenerateAndLoad,
    GenerateInProcess,
}

impl AutogenerateMode {
    pub const ALL: [AutogenerateMode; 4] = [
        Self::Never,
        Self::Always,
        Self::FileNotExists,
        Self::Eval,
    ];

    /// Whether `decide` depends on the artifact existing. Other modes
    /// must not touch storage just to answer that.
    pub fn probes_artifact(self) -> bool {
        matches!(self, Self::FileNotExists)
    }

    pub fn decide(self, artifact_exists: bool) -> GenerationAction {
        match self {
            Self::Never => GenerationAction::Load,
            Self::Always => GenerationAction::GenerateAndLoad,
            Self::FileNotExists if artifact_exists => GenerationAction::Load,
            Self::FileNotExists => GenerationAction::GenerateAndLoad,
            Self::Eval => GenerationAction::GenerateInProcess,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Never => "never",
            Self::Always => "always",
            Self::FileNotExists => "file_not_exists",
            Self::Eval => "eval",
        }
    }
}

impl fmt::Display for AutogenerateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AutogenerateMode {
    type Err = ProxyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "never" | "0" | "false" => Ok(Self::Never),
            "always" | "1" | "true" => Ok(Self::Always),
            "file_not_exists" | "file-not-exists" | "2" => Ok(Self::FileNotExists),
            "eval" | "3" => Ok(Self::Eval),
            other => Err(ProxyError::Config(format!(
                "Unknown autogenerate mode '{}'",
                other
            ))),
        }
    }
}

impl TryFrom<u8> for AutogenerateMode {
    type Error = ProxyError;

    fn try_from(code: u8) -> Result<Self> {
        Self::ALL
            .get(code as usize)
            .copied()
            .ok_or_else(|| ProxyError::Config(format!("Unknown autogenerate mode code {}", code)))
    }
}

impl From<bool> for AutogenerateMode {
    fn from(autogenerate: bool) -> Self {
        if autogenerate { Self::Always } else { Self::Never }
    }
}
