//! Programming languages offered by the editor.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Language the submitted code is written in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Python, the editor default.
    #[default]
    Python,
    /// Java.
    Java,
    /// C++.
    Cpp,
}

/// Error returned when parsing an unsupported language name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported language: {0}")]
pub struct UnsupportedLanguage(pub String);

impl Language {
    /// Lowercase identifier, also used to tag fenced code blocks.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Java => "java",
            Self::Cpp => "cpp",
        }
    }

    /// Label shown in the language picker.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Python => "Python",
            Self::Java => "Java",
            Self::Cpp => "C++",
        }
    }

    /// Line comment token toggled by `Ctrl+/`.
    ///
    /// # Examples
    /// ```
    /// use coderush::domain::Language;
    ///
    /// assert_eq!(Language::Python.comment_token(), "#");
    /// assert_eq!(Language::Cpp.comment_token(), "//");
    /// ```
    pub const fn comment_token(self) -> &'static str {
        match self {
            Self::Python => "#",
            Self::Java | Self::Cpp => "//",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = UnsupportedLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "python" => Ok(Self::Python),
            "java" => Ok(Self::Java),
            "cpp" | "c++" => Ok(Self::Cpp),
            _ => Err(UnsupportedLanguage(s.to_owned())),
        }
    }
}
