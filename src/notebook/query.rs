//! Read-only queries over a validated notebook.

use serde::Serialize;
use serde_json::Value;

use super::model::{CellType, Notebook};

/// Language assumed when the notebook declares none.
pub const DEFAULT_LANGUAGE: &str = "python";

/// Tally of cells by type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CellCounts {
    pub total: usize,
    pub code: usize,
    pub markdown: usize,
    pub raw: usize,
}

impl Notebook {
    /// Primary programming language of the notebook.
    ///
    /// Prefers `metadata.kernelspec.language`, then
    /// `metadata.language_info.name`, then [`DEFAULT_LANGUAGE`].
    pub fn primary_language(&self) -> &str {
        let declared = |section: &str, key: &str| {
            self.metadata
                .get(section)
                .and_then(|value| value.get(key))
                .and_then(Value::as_str)
                .filter(|name| !name.is_empty())
        };

        declared("kernelspec", "language")
            .or_else(|| declared("language_info", "name"))
            .unwrap_or(DEFAULT_LANGUAGE)
    }

    /// Count cells of each type.
    pub fn count_cells_by_type(&self) -> CellCounts {
        let mut counts = CellCounts {
            total: self.cells.len(),
            ..CellCounts::default()
        };
        for cell in &self.cells {
            match cell.cell_type() {
                CellType::Code => counts.code += 1,
                CellType::Markdown => counts.markdown += 1,
                CellType::Raw => counts.raw += 1,
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use crate::notebook::parse;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_language_prefers_kernelspec() {
        let notebook = parse(&json!({
            "nbformat": 4,
            "metadata": {
                "kernelspec": {"name": "ir", "display_name": "R", "language": "R"},
                "language_info": {"name": "python"},
            },
            "cells": [],
        }))
        .unwrap();
        assert_eq!(notebook.primary_language(), "R");
    }

    #[test]
    fn test_language_falls_back_to_language_info() {
        let notebook = parse(&json!({
            "nbformat": 4,
            "metadata": {"kernelspec": {"name": "julia"}, "language_info": {"name": "julia"}},
            "cells": [],
        }))
        .unwrap();
        assert_eq!(notebook.primary_language(), "julia");
    }

    #[test]
    fn test_language_default() {
        let notebook = parse(&json!({"nbformat": 4, "cells": []})).unwrap();
        assert_eq!(notebook.primary_language(), DEFAULT_LANGUAGE);
    }

    #[test]
    fn test_count_cells_by_type() {
        let notebook = parse(&json!({
            "nbformat": 4,
            "cells": [
                {"cell_type": "code", "source": ""},
                {"cell_type": "markdown", "source": ""},
                {"cell_type": "code", "source": ""},
                {"cell_type": "raw", "source": ""},
            ],
        }))
        .unwrap();
        assert_eq!(
            notebook.count_cells_by_type(),
            CellCounts {
                total: 4,
                code: 2,
                markdown: 1,
                raw: 1,
            }
        );
    }
}
