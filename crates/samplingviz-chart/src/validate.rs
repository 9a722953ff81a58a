//! Checking a reader's bin selection against an exercise's expected range.

use samplingviz_stats::histogram::HistogramBin;
use serde::{Deserialize, Serialize};

use crate::interaction::BinBar;

pub const PASS_COLOR: &str = "#c3fac4";
pub const FAIL_COLOR: &str = "#fac6c3";
pub const DEFAULT_FAIL_MESSAGE: &str = "You did not select the right bins.";
pub const DEFAULT_TOLERANCE: f64 = 1e-4;

/// Which side of the expected interval the reader must select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(rename_all = "snake_case")]
pub enum Required {
    /// Bins inside `[lo, hi]` must be selected, bins outside must not.
    Inside,
    /// Bins outside `[lo, hi]` must be selected, bins inside must not.
    Outside,
}

/// Position of a bin relative to an exercise interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::IsVariant)]
#[serde(rename_all = "snake_case")]
pub enum BinClass {
    Inside,
    Outside,
    /// Straddles a boundary. Such bins are never checked.
    Partial,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub lo: f64,
    pub hi: f64,
    pub required: Required,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default = "default_message")]
    pub message: String,
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

fn default_message() -> String {
    DEFAULT_FAIL_MESSAGE.to_owned()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, derive_more::IsVariant)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    Pass,
    Fail {
        /// Index of the first offending bin.
        bin: usize,
        class: BinClass,
        /// Whether the offending bin was selected.
        selected: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pub exercise: String,
    #[serde(flatten)]
    pub verdict: Verdict,
    pub status_color: &'static str,
    /// Message to alert the reader with, on failure.
    pub alert: Option<String>,
}

impl Exercise {
    #[must_use]
    pub fn new(id: &str, lo: f64, hi: f64, required: Required) -> Self {
        Self {
            id: id.to_owned(),
            lo,
            hi,
            required,
            tolerance: DEFAULT_TOLERANCE,
            message: DEFAULT_FAIL_MESSAGE.to_owned(),
        }
    }

    /// A bar starting at `hi` or ending below `lo` lies outside. A bar ending
    /// exactly at `hi` is inside for `Required::Inside` but partial for
    /// `Required::Outside`, where the inside interval is half-open.
    #[must_use]
    pub fn classify(&self, bin: &HistogramBin) -> BinClass {
        let tol = self.tolerance;
        if bin.x1() < self.lo - tol || bin.x0() >= self.hi - tol {
            return BinClass::Outside;
        }
        let below_hi = match self.required {
            Required::Inside => bin.x1() <= self.hi + tol,
            Required::Outside => bin.x1() < self.hi - tol,
        };
        if bin.x0() >= self.lo - tol && below_hi {
            BinClass::Inside
        } else {
            BinClass::Partial
        }
    }

    /// Whether a bin of the given class must be selected. `None` means unchecked.
    #[must_use]
    pub fn must_select(&self, class: BinClass) -> Option<bool> {
        match (class, self.required) {
            (BinClass::Partial, _) => None,
            (BinClass::Inside, Required::Inside) | (BinClass::Outside, Required::Outside) => {
                Some(true)
            }
            (BinClass::Inside, Required::Outside) | (BinClass::Outside, Required::Inside) => {
                Some(false)
            }
        }
    }

    /// Scans `bars` in order and stops at the first violation.
    #[must_use]
    pub fn check(&self, bars: &[BinBar]) -> ValidationResult {
        let violation = bars.iter().find_map(|bar| {
            let class = self.classify(&bar.bin);
            let selected = bar.is_selected();
            let required = self.must_select(class)?;
            (required != selected).then_some(Verdict::Fail {
                bin: bar.index,
                class,
                selected,
            })
        });

        match violation {
            Some(verdict) => {
                tracing::info!(exercise = %self.id, ?verdict, "exercise failed");
                ValidationResult {
                    exercise: self.id.clone(),
                    verdict,
                    status_color: FAIL_COLOR,
                    alert: Some(self.message.clone()),
                }
            }
            None => {
                tracing::info!(exercise = %self.id, "exercise passed");
                ValidationResult {
                    exercise: self.id.clone(),
                    verdict: Verdict::Pass,
                    status_color: PASS_COLOR,
                    alert: None,
                }
            }
        }
    }
}
