//! Column layout inference.
//!
//! A page may be set in two, three or four columns and the count is not
//! known in advance. Each candidate [`ColumnLayout`] maps a fragment's
//! horizontal centre to a column and carries the ideal centre of every
//! column. The layout whose ideal centres sit closest to the fragments, summed
//! over the page, wins and its column predictions are kept.
//!
//! Inference is page-local: nothing ties the choice on one page to the choice
//! on another page of the same document.

use crate::core::validation::{validate_finite, validate_positive};
use crate::core::{ReflowError, ReflowResult};
use crate::domain::Fragment;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A candidate column layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnLayout {
    /// Name used in logs and results, e.g. `double_col`.
    pub name: String,
    pub column_count: usize,
    /// Offset subtracted from a centre before dividing by the column width.
    #[serde(default)]
    pub left_margin: f64,
    pub column_width: f64,
    /// Empirical centre of each column, left to right.
    pub ideal_centres: Vec<f64>,
}

impl ColumnLayout {
    pub fn new(
        name: impl Into<String>,
        left_margin: f64,
        column_width: f64,
        ideal_centres: Vec<f64>,
    ) -> Self {
        Self {
            name: name.into(),
            column_count: ideal_centres.len(),
            left_margin,
            column_width,
            ideal_centres,
        }
    }

    /// Checks the layout is usable for inference.
    pub fn validate(&self) -> ReflowResult<()> {
        validate_positive(self.column_count, &format!("{}.column_count", self.name))?;
        validate_finite(self.left_margin, &format!("{}.left_margin", self.name))?;
        validate_finite(self.column_width, &format!("{}.column_width", self.name))?;
        validate_positive(self.column_width, &format!("{}.column_width", self.name))?;
        if self.ideal_centres.len() != self.column_count {
            return Err(ReflowError::invalid_input(format!(
                "layout '{}' declares {} columns but lists {} ideal centres",
                self.name,
                self.column_count,
                self.ideal_centres.len()
            )));
        }
        for (i, centre) in self.ideal_centres.iter().enumerate() {
            validate_finite(*centre, &format!("{}.ideal_centres[{}]", self.name, i))?;
        }
        Ok(())
    }

    /// Predicted column for a horizontal centre, clamped to `[0, column_count - 1]`.
    ///
    /// Monotonic non-decreasing in `centre_x`.
    pub fn column_for(&self, centre_x: f64) -> usize {
        let last = self.column_count.saturating_sub(1);
        let raw = ((centre_x - self.left_margin) / self.column_width).floor();
        if raw.is_nan() || raw <= 0.0 {
            0
        } else if raw >= last as f64 {
            last
        } else {
            raw as usize
        }
    }

    /// Distance from `centre_x` to the ideal centre of its predicted column.
    pub fn deviation(&self, centre_x: f64) -> f64 {
        let column = self.column_for(centre_x);
        self.ideal_centres
            .get(column)
            .map_or(0.0, |ideal| (centre_x - ideal).abs())
    }

    /// Total deviation over a page's fragment centres.
    pub fn total_error(&self, centres: &[f64]) -> f64 {
        centres.iter().map(|&c| self.deviation(c)).sum()
    }
}

/// The layout selected for a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutChoice {
    /// Position of the layout in the configured candidate list.
    pub index: usize,
    pub name: String,
    pub column_count: usize,
    /// Total deviation of the winning layout.
    pub error: f64,
}

/// Chooses a column layout per page and assigns fragment columns.
#[derive(Debug, Clone)]
pub struct LayoutInference {
    layouts: Vec<ColumnLayout>,
}

impl LayoutInference {
    /// Creates the inference stage.
    ///
    /// The order of `layouts` is the tie-break preference: when two layouts
    /// have the same total error, the one listed first wins.
    pub fn new(layouts: Vec<ColumnLayout>) -> Self {
        Self { layouts }
    }

    pub fn layouts(&self) -> &[ColumnLayout] {
        &self.layouts
    }

    /// Returns the minimum-error layout for the given centres.
    ///
    /// Returns `None` only when no candidate layouts are configured.
    pub fn choose_layout(&self, centres: &[f64]) -> Option<LayoutChoice> {
        let mut best: Option<LayoutChoice> = None;
        for (index, layout) in self.layouts.iter().enumerate() {
            let error = layout.total_error(centres);
            debug!("layout {} error {:.1}", layout.name, error);
            let better = best.as_ref().is_none_or(|current| error < current.error);
            if better {
                best = Some(LayoutChoice {
                    index,
                    name: layout.name.clone(),
                    column_count: layout.column_count,
                    error,
                });
            }
        }
        best
    }

    /// Sets `column` on every fragment of a page using the winning layout.
    pub fn assign_columns(&self, page: &mut [Fragment]) -> Option<LayoutChoice> {
        let centres: Vec<f64> = page.iter().map(Fragment::center_x).collect();
        let choice = self.choose_layout(&centres)?;
        let layout = &self.layouts[choice.index];
        for fragment in page.iter_mut() {
            fragment.column = Some(layout.column_for(fragment.center_x()));
        }
        Some(choice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processors::PixelRect;

    fn fragment_centred_at(x: i32) -> Fragment {
        let rect = PixelRect::new(x - 5, 0, x + 5, 10).unwrap();
        Fragment::new("doc", 0, 0, rect, "text")
    }

    fn scenario_layouts() -> Vec<ColumnLayout> {
        vec![
            ColumnLayout::new("double_col", 0.0, 200.0, vec![100.0, 300.0]),
            ColumnLayout::new("triple_col", 0.0, 160.0, vec![80.0, 240.0, 400.0]),
        ]
    }

    #[test]
    fn test_two_column_page_selects_double_layout() {
        let layouts = scenario_layouts();
        let centres = [90.0, 110.0, 290.0, 310.0];
        assert_eq!(layouts[0].total_error(&centres), 40.0);
        assert_eq!(layouts[1].total_error(&centres), 160.0);

        let inference = LayoutInference::new(layouts);
        let mut page: Vec<Fragment> = [90, 110, 290, 310]
            .into_iter()
            .map(fragment_centred_at)
            .collect();
        let choice = inference.assign_columns(&mut page).unwrap();

        assert_eq!(choice.name, "double_col");
        assert_eq!(choice.error, 40.0);
        let columns: Vec<Option<usize>> = page.iter().map(|f| f.column).collect();
        assert_eq!(columns, vec![Some(0), Some(0), Some(1), Some(1)]);
    }

    #[test]
    fn test_chosen_layout_has_minimum_error() {
        let inference = LayoutInference::new(vec![
            ColumnLayout::new("double_col", 0.0, 200.0, vec![100.0, 300.0]),
            ColumnLayout::new("triple_col", 0.0, 160.0, vec![80.0, 240.0, 400.0]),
            ColumnLayout::new("quadruple_col", 10.0, 100.0, vec![60.0, 160.0, 260.0, 360.0]),
        ]);
        let pages: [&[f64]; 3] = [
            &[80.0, 85.0, 240.0, 250.0, 400.0],
            &[55.0, 165.0, 255.0, 370.0],
            &[],
        ];
        for centres in pages {
            let choice = inference.choose_layout(centres).unwrap();
            for layout in inference.layouts() {
                assert!(choice.error <= layout.total_error(centres));
            }
        }
    }

    #[test]
    fn test_ties_prefer_first_listed_layout() {
        let a = ColumnLayout::new("first", 0.0, 100.0, vec![50.0, 150.0]);
        let b = ColumnLayout::new("second", 0.0, 100.0, vec![50.0, 150.0]);
        let inference = LayoutInference::new(vec![a.clone(), b.clone()]);
        assert_eq!(inference.choose_layout(&[40.0, 160.0]).unwrap().name, "first");

        let reversed = LayoutInference::new(vec![b, a]);
        assert_eq!(reversed.choose_layout(&[40.0, 160.0]).unwrap().name, "second");
    }

    #[test]
    fn test_column_for_is_clamped_and_monotonic() {
        let layout = ColumnLayout::new("triple_col", 30.0, 130.0, vec![95.0, 225.0, 355.0]);
        assert_eq!(layout.column_for(-500.0), 0);
        assert_eq!(layout.column_for(10.0), 0);
        assert_eq!(layout.column_for(5000.0), 2);

        let mut previous = 0;
        for x in (-100..1000).step_by(7) {
            let column = layout.column_for(f64::from(x));
            assert!(column < layout.column_count);
            assert!(column >= previous);
            previous = column;
        }
    }

    #[test]
    fn test_empty_candidate_list_chooses_nothing() {
        let inference = LayoutInference::new(Vec::new());
        let mut page = vec![fragment_centred_at(50)];
        assert!(inference.assign_columns(&mut page).is_none());
        assert!(page[0].column.is_none());
    }

    #[test]
    fn test_layout_validation() {
        assert!(ColumnLayout::new("ok", 0.0, 100.0, vec![50.0]).validate().is_ok());
        assert!(ColumnLayout::new("zero_width", 0.0, 0.0, vec![50.0]).validate().is_err());
        assert!(ColumnLayout::new("no_columns", 0.0, 100.0, vec![]).validate().is_err());

        let mut mismatched = ColumnLayout::new("mismatch", 0.0, 100.0, vec![50.0, 150.0]);
        mismatched.column_count = 3;
        assert!(mismatched.validate().is_err());
    }
}
