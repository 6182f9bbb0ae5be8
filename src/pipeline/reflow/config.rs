//! Configuration for the reflow pipeline.

use crate::core::constants::DEFAULT_PAGE_PARALLEL_THRESHOLD;
use crate::core::validation::{validate_finite, validate_non_empty};
use crate::core::{ReflowError, ReflowResult};
use crate::processors::{ColumnLayout, NameConfig, StructureConfig, TextConfig};
use serde::{Deserialize, Serialize};

/// Thread usage for the per-page stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParallelPolicy {
    /// Size of the global rayon pool. `None` keeps rayon's default
    /// (one thread per core).
    #[serde(default)]
    pub max_threads: Option<usize>,

    /// Documents with more pages than this run the per-page stage in parallel.
    /// Default: 4
    #[serde(default = "ParallelPolicy::default_page_threshold")]
    pub page_threshold: usize,
}

impl ParallelPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_threads(mut self, max_threads: Option<usize>) -> Self {
        self.max_threads = max_threads;
        self
    }

    pub fn with_page_threshold(mut self, threshold: usize) -> Self {
        self.page_threshold = threshold;
        self
    }

    fn default_page_threshold() -> usize {
        DEFAULT_PAGE_PARALLEL_THRESHOLD
    }
}

impl Default for ParallelPolicy {
    fn default() -> Self {
        Self {
            max_threads: None,
            page_threshold: Self::default_page_threshold(),
        }
    }
}

/// Candidate layouts for pages rendered at 300 dpi (2550 x 3300 pixels),
/// in tie-break preference order.
///
/// Only the triple and quadruple layouts subtract a left margin; the double
/// layout splits at `centre / 1150` measured from the page edge.
pub fn default_layouts() -> Vec<ColumnLayout> {
    vec![
        ColumnLayout::new("double_col", 0.0, 1150.0, vec![700.0, 1850.0]),
        ColumnLayout::new("triple_col", 125.0, 767.0, vec![508.0, 1275.0, 2042.0]),
        ColumnLayout::new(
            "quadruple_col",
            125.0,
            575.0,
            vec![412.0, 987.0, 1562.0, 2137.0],
        ),
    ]
}

/// Complete pipeline configuration. Every field has a default, so an empty
/// file is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReflowConfig {
    /// Candidate column layouts; earlier entries win ties.
    #[serde(default = "default_layouts")]
    pub layouts: Vec<ColumnLayout>,
    #[serde(default)]
    pub structure: StructureConfig,
    #[serde(default)]
    pub text: TextConfig,
    #[serde(default)]
    pub names: NameConfig,
    #[serde(default)]
    pub parallel: ParallelPolicy,
}

impl ReflowConfig {
    /// Checks every section, reporting the first problem found.
    pub fn validate(&self) -> ReflowResult<()> {
        validate_non_empty(&self.layouts, "layouts")
            .map_err(|e| ReflowError::config_error(e.to_string()))?;
        for layout in &self.layouts {
            layout
                .validate()
                .map_err(|e| ReflowError::config_error(e.to_string()))?;
        }

        let structure = &self.structure;
        validate_finite(structure.title_font_size_cutoff, "structure.title_font_size_cutoff")
            .and_then(|_| validate_finite(structure.subheading_zscore, "structure.subheading_zscore"))
            .map_err(|e| ReflowError::config_error(e.to_string()))?;
        if structure.header_cutoff <= structure.footer_cutoff {
            return Err(ReflowError::config_error_with_context(
                "structure.header_cutoff",
                &structure.header_cutoff.to_string(),
                "must be greater than structure.footer_cutoff",
            ));
        }

        self.text.validate()?;
        self.names
            .validate()
            .map_err(|e| ReflowError::config_error(e.to_string()))?;

        if self.parallel.max_threads == Some(0) {
            return Err(ReflowError::config_error_with_context(
                "parallel.max_threads",
                "0",
                "must be at least 1 when set",
            ));
        }
        Ok(())
    }
}

impl Default for ReflowConfig {
    fn default() -> Self {
        Self {
            layouts: default_layouts(),
            structure: StructureConfig::default(),
            text: TextConfig::default(),
            names: NameConfig::default(),
            parallel: ParallelPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ReflowConfig::default();
        assert!(config.validate().is_ok());
        let names: Vec<_> = config.layouts.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["double_col", "triple_col", "quadruple_col"]);
    }

    #[test]
    fn test_double_column_split_has_no_margin() {
        let layouts = default_layouts();
        let double = &layouts[0];
        assert_eq!(double.left_margin, 0.0);
        assert_eq!(double.column_for(1149.0), 0);
        assert_eq!(double.column_for(1200.0), 1);
        // Triple still measures from its margin: (880 - 125) / 767 < 1.
        assert_eq!(layouts[1].column_for(880.0), 0);
        assert_eq!(layouts[1].column_for(900.0), 1);
    }

    #[test]
    fn test_empty_layouts_rejected() {
        let config = ReflowConfig {
            layouts: Vec::new(),
            ..ReflowConfig::default()
        };
        assert!(matches!(config.validate(), Err(ReflowError::ConfigError { .. })));
    }

    #[test]
    fn test_mismatched_centres_rejected() {
        let mut config = ReflowConfig::default();
        config.layouts[0].ideal_centres.pop();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_cutoffs_rejected() {
        let mut config = ReflowConfig::default();
        config.structure.header_cutoff = 50;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_threads_rejected() {
        let config = ReflowConfig {
            parallel: ParallelPolicy::new().with_max_threads(Some(0)),
            ..ReflowConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
