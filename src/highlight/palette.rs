//! Color palettes for token classes.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::TokenKind;

/// Color theme selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn palette(&self) -> Palette {
        match self {
            Self::Dark => Palette::dark(),
            Self::Light => Palette::light(),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            other => Err(format!("unknown theme '{other}' (expected dark or light)")),
        }
    }
}

/// Hex colors for each token class plus the code background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub keyword: &'static str,
    pub string: &'static str,
    pub comment: &'static str,
    pub number: &'static str,
    pub operator: &'static str,
    pub function_name: &'static str,
    pub variable: &'static str,
    pub builtin: &'static str,
    pub decorator: &'static str,
    pub class_name: &'static str,
    pub default: &'static str,
    pub background: &'static str,
}

impl Palette {
    /// VS Code "Dark Modern" colors.
    pub const fn dark() -> Self {
        Self {
            keyword: "#C586C0",
            string: "#CE9178",
            comment: "#6A9955",
            number: "#B5CEA8",
            operator: "#D4D4D4",
            function_name: "#DCDCAA",
            variable: "#9CDCFE",
            builtin: "#4EC9B0",
            decorator: "#4EC9B0",
            class_name: "#4EC9B0",
            default: "#D4D4D4",
            background: "#1E1E1E",
        }
    }

    /// VS Code "Light Modern" colors.
    pub const fn light() -> Self {
        Self {
            keyword: "#AF00DB",
            string: "#A31515",
            comment: "#008000",
            number: "#098658",
            operator: "#000000",
            function_name: "#795E26",
            variable: "#001080",
            builtin: "#267F99",
            decorator: "#267F99",
            class_name: "#267F99",
            default: "#000000",
            background: "#FFFFFF",
        }
    }

    pub fn color(&self, kind: TokenKind) -> &'static str {
        match kind {
            TokenKind::Keyword => self.keyword,
            TokenKind::String => self.string,
            TokenKind::Comment => self.comment,
            TokenKind::Number => self.number,
            TokenKind::Operator => self.operator,
            TokenKind::FunctionName => self.function_name,
            TokenKind::Variable => self.variable,
            TokenKind::Builtin => self.builtin,
            TokenKind::Decorator => self.decorator,
            TokenKind::ClassName => self.class_name,
            TokenKind::Default => self.default,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::dark()
    }
}
