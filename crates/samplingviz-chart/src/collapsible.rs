//! Expand/collapse state of long data tables.

use crate::table::{DataTable, RowGroup, TableRow};

const SHOW_ALL_LABEL: &str = "Show all";
const COLLAPSE_LABEL: &str = "Collapse";
const DEFAULT_LABEL: &str = "Show more";

/// How much of a collapsible table is revealed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum ExpansionLevel {
    /// Only rows outside collapsible groups are shown.
    #[default]
    Collapsed,
    /// The first collapsible group is shown.
    PartlyExpanded,
    /// Every collapsible group is shown.
    FullyExpanded,
}

/// The three-level expand button of a collapsible table.
///
/// Each press advances `Collapsed -> PartlyExpanded -> FullyExpanded -> Collapsed`
/// and relabels the button accordingly.
#[derive(Debug, Clone)]
pub struct CollapsibleTable {
    level: ExpansionLevel,
    initial_label: String,
}

impl Default for CollapsibleTable {
    fn default() -> Self {
        Self::new(None)
    }
}

impl CollapsibleTable {
    /// Creates a collapsed table whose button initially reads `label`
    /// (or "Show more" when the page provides none).
    #[must_use]
    pub fn new(label: Option<&str>) -> Self {
        Self {
            level: ExpansionLevel::Collapsed,
            initial_label: label.unwrap_or(DEFAULT_LABEL).to_owned(),
        }
    }

    #[must_use]
    pub fn for_table(table: &DataTable) -> Self {
        Self::new(table.button_label.as_deref())
    }

    /// Presses the expand button.
    pub fn press(&mut self) -> ExpansionLevel {
        self.level = match self.level {
            ExpansionLevel::Collapsed => ExpansionLevel::PartlyExpanded,
            ExpansionLevel::PartlyExpanded => ExpansionLevel::FullyExpanded,
            ExpansionLevel::FullyExpanded => ExpansionLevel::Collapsed,
        };
        tracing::debug!(level = ?self.level, "table expansion changed");
        self.level
    }

    #[must_use]
    pub fn button_label(&self) -> &str {
        match self.level {
            ExpansionLevel::Collapsed => &self.initial_label,
            ExpansionLevel::PartlyExpanded => SHOW_ALL_LABEL,
            ExpansionLevel::FullyExpanded => COLLAPSE_LABEL,
        }
    }

    /// Whether rows of `group` are currently shown.
    #[must_use]
    pub fn is_visible(&self, group: RowGroup) -> bool {
        match (group, self.level) {
            (RowGroup::Always, _) | (_, ExpansionLevel::FullyExpanded) => true,
            (RowGroup::Collapsible(i), ExpansionLevel::PartlyExpanded) => i == 0,
            (RowGroup::Collapsible(_), ExpansionLevel::Collapsed) => false,
        }
    }

    /// Visible data rows of `table` with their row index, in document order.
    ///
    /// The button row itself is not included.
    pub fn visible_rows<'a>(
        &'a self,
        table: &'a DataTable,
    ) -> impl Iterator<Item = (usize, &'a TableRow)> + 'a {
        table
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| !row.is_structural() && self.is_visible(row.group))
    }
}
