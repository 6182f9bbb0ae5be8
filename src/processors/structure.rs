//! Structural role classification.
//!
//! No native font metrics survive OCR, so glyph size is approximated from
//! density: the fragment's area divided by its character count. Titles are
//! recognised by an absolute threshold on that proxy. Subheadings must be
//! larger than their page's average AND stand out against the whole
//! document, measured as a z-score because documents differ widely in how
//! much their type sizes vary.
//!
//! Document statistics need every page visited first, so [`StructureClassifier::classify`]
//! runs in two passes: measure everything, then classify.

use crate::domain::{Document, DocumentStats, Fragment, PageStats, Role};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::constants::{
    DEFAULT_FOOTER_CUTOFF, DEFAULT_HEADER_CUTOFF, DEFAULT_SUBHEADING_ZSCORE,
    DEFAULT_TITLE_FONT_SIZE_CUTOFF,
};

/// Thresholds for furniture removal and role classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureConfig {
    /// A fragment whose top edge exceeds this value is page furniture.
    #[serde(default = "StructureConfig::default_header_cutoff")]
    pub header_cutoff: i32,
    /// A fragment whose bottom edge is below this value is page furniture.
    #[serde(default = "StructureConfig::default_footer_cutoff")]
    pub footer_cutoff: i32,
    /// Font-size proxy above which a fragment is a title.
    #[serde(default = "StructureConfig::default_title_font_size_cutoff")]
    pub title_font_size_cutoff: f64,
    /// Minimum document z-score for a subheading.
    #[serde(default = "StructureConfig::default_subheading_zscore")]
    pub subheading_zscore: f64,
}

impl StructureConfig {
    fn default_header_cutoff() -> i32 {
        DEFAULT_HEADER_CUTOFF
    }

    fn default_footer_cutoff() -> i32 {
        DEFAULT_FOOTER_CUTOFF
    }

    fn default_title_font_size_cutoff() -> f64 {
        DEFAULT_TITLE_FONT_SIZE_CUTOFF
    }

    fn default_subheading_zscore() -> f64 {
        DEFAULT_SUBHEADING_ZSCORE
    }
}

impl Default for StructureConfig {
    fn default() -> Self {
        Self {
            header_cutoff: DEFAULT_HEADER_CUTOFF,
            footer_cutoff: DEFAULT_FOOTER_CUTOFF,
            title_font_size_cutoff: DEFAULT_TITLE_FONT_SIZE_CUTOFF,
            subheading_zscore: DEFAULT_SUBHEADING_ZSCORE,
        }
    }
}

/// Area per character, with the character count floored at 1.
pub fn font_size_estimate(fragment: &Fragment) -> f64 {
    fragment.rect.area() as f64 / fragment.char_count().max(1) as f64
}

/// Mean of `(value, weight)` pairs.
///
/// Falls back to the unweighted mean when all weights are zero, and to 0 for
/// an empty input.
pub fn weighted_mean(samples: &[(f64, usize)]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let total_weight: usize = samples.iter().map(|(_, w)| w).sum();
    if total_weight == 0 {
        return samples.iter().map(|(v, _)| v).sum::<f64>() / samples.len() as f64;
    }
    samples.iter().map(|(v, w)| v * *w as f64).sum::<f64>() / total_weight as f64
}

/// Sample standard deviation (n - 1); `None` for fewer than two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(variance.sqrt())
}

/// Document z-score of a font size, rounded to two decimals.
///
/// Zero, undefined or non-finite deviation yields negative infinity so the
/// fragment can never qualify as a subheading.
pub fn font_size_zscore(font_size: f64, document: &DocumentStats) -> f64 {
    match document.font_size_std {
        Some(std) if std > 0.0 && std.is_finite() => {
            let z = (font_size - document.weighted_mean_font_size) / std;
            (z * 100.0).round() / 100.0
        }
        _ => f64::NEG_INFINITY,
    }
}

/// Classifies one fragment. The first matching rule wins:
/// 1. above the title threshold: title
/// 2. above the page mean and at least the subheading z-score: subheading
/// 3. otherwise body
pub fn classify_role(
    font_size: f64,
    page: &PageStats,
    document: &DocumentStats,
    config: &StructureConfig,
) -> Role {
    if font_size > config.title_font_size_cutoff {
        Role::Title
    } else if font_size > page.weighted_mean_font_size
        && font_size_zscore(font_size, document) >= config.subheading_zscore
    {
        Role::Subheading
    } else {
        Role::Body
    }
}

/// Header/footer filter and role classifier.
#[derive(Debug, Clone, Default)]
pub struct StructureClassifier {
    config: StructureConfig,
}

impl StructureClassifier {
    pub fn new(config: StructureConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StructureConfig {
        &self.config
    }

    /// Returns true if the fragment lies in the header or footer band.
    pub fn is_page_furniture(&self, fragment: &Fragment) -> bool {
        fragment.rect.top > self.config.header_cutoff
            || fragment.rect.bottom < self.config.footer_cutoff
    }

    /// Flags and removes page furniture, returning the retained fragments.
    pub fn remove_page_furniture(&self, fragments: Vec<Fragment>) -> Vec<Fragment> {
        fragments
            .into_iter()
            .filter_map(|mut fragment| {
                fragment.is_page_furniture = self.is_page_furniture(&fragment);
                if fragment.is_page_furniture {
                    debug!(
                        "page {}: dropping furniture fragment {} {:?}",
                        fragment.page_number, fragment.sequence, fragment.text
                    );
                    None
                } else {
                    Some(fragment)
                }
            })
            .collect()
    }

    /// Computes font statistics and assigns a role to every fragment.
    pub fn classify(&self, document: &mut Document) {
        // Pass 1: font sizes, page means, document mean and deviation.
        let mut all_samples = Vec::with_capacity(document.fragment_count());
        for page in &mut document.pages {
            let mut page_samples = Vec::with_capacity(page.fragments.len());
            for fragment in &mut page.fragments {
                let size = font_size_estimate(fragment);
                fragment.font_size = Some(size);
                page_samples.push((size, fragment.char_count()));
            }
            page.stats = Some(PageStats {
                weighted_mean_font_size: weighted_mean(&page_samples),
            });
            all_samples.extend(page_samples);
        }

        let sizes: Vec<f64> = all_samples.iter().map(|(size, _)| *size).collect();
        let document_stats = DocumentStats {
            weighted_mean_font_size: weighted_mean(&all_samples),
            font_size_std: sample_std(&sizes),
        };
        document.stats = Some(document_stats);
        debug!(
            "document {}: mean font size {:.1}, std {:?}",
            document.id, document_stats.weighted_mean_font_size, document_stats.font_size_std
        );

        // Pass 2: classification against the finished statistics.
        for page in &mut document.pages {
            let page_stats = page.stats.unwrap_or(PageStats {
                weighted_mean_font_size: 0.0,
            });
            for fragment in &mut page.fragments {
                let size = fragment.font_size.unwrap_or(0.0);
                fragment.role = Some(classify_role(
                    size,
                    &page_stats,
                    &document_stats,
                    &self.config,
                ));
            }
        }
    }
}
