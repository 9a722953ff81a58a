//! Numeric data extraction from HTML tables.

use scraper::{ElementRef, Html, Selector};

/// Number of structural (non-data) cells in a collapsible table.
///
/// This is part of the page's table contract: the expand button row
/// contributes three cells that must not be read as data.
pub const COLLAPSIBLE_STRUCTURAL_CELLS: usize = 3;

/// Class marking the cell (or row) that hosts a collapsible table's button.
const ROW_BUTTON_CLASS: &str = "row-button";
/// Class marking a row group hidden until the table is expanded.
const COLLAPSIBLE_CLASS: &str = "collapsible";

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum TableError {
    #[display("table '{table_id}' not found in document")]
    NotFound { table_id: String },
}

/// The row group a table row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum RowGroup {
    /// Always visible.
    Always,
    /// Hidden until the table is expanded past the given level.
    Collapsible(usize),
}

/// Location of a cell within a [`DataTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableCell {
    pub text: String,
    /// Parsed value. `None` for cells that are not numeric or are structural.
    pub value: Option<f64>,
    pub structural: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub group: RowGroup,
    pub cells: Vec<TableCell>,
}

impl TableRow {
    /// A row consisting only of structural cells, such as the expand button row.
    #[must_use]
    pub fn is_structural(&self) -> bool {
        !self.cells.is_empty() && self.cells.iter().all(|c| c.structural)
    }
}

/// Cells of an HTML table, with the numeric value of each data cell attached.
#[derive(Debug, Clone, PartialEq)]
pub struct DataTable {
    pub id: String,
    pub rows: Vec<TableRow>,
    /// Text of the expand button, for collapsible tables.
    pub button_label: Option<String>,
}

impl DataTable {
    /// Numeric cell values in document order.
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        self.numeric_cells().map(|(_, v)| v).collect()
    }

    /// Every numeric data cell together with its location.
    pub fn numeric_cells(&self) -> impl Iterator<Item = (CellRef, f64)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, r)| {
            r.cells
                .iter()
                .enumerate()
                .filter_map(move |(col, cell)| cell.value.map(|v| (CellRef { row, col }, v)))
        })
    }

    #[must_use]
    pub fn cell(&self, at: CellRef) -> Option<&TableCell> {
        self.rows.get(at.row)?.cells.get(at.col)
    }

    #[must_use]
    pub fn structural_cells(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|r| &r.cells)
            .filter(|c| c.structural)
            .count()
    }

    /// Number of collapsible row groups.
    #[must_use]
    pub fn num_groups(&self) -> usize {
        self.rows
            .iter()
            .filter_map(|r| match r.group {
                RowGroup::Collapsible(i) => Some(i + 1),
                RowGroup::Always => None,
            })
            .max()
            .unwrap_or(0)
    }
}

/// Reads every `td` of the table with id `table_id` out of `html`.
///
/// Cells whose text has no numeric prefix are kept but carry no value. With
/// `collapsible` set, cells hosting the expand button are marked structural
/// and never yield a value.
pub fn extract_table(
    html: &str,
    table_id: &str,
    collapsible: bool,
) -> Result<DataTable, TableError> {
    let document = Html::parse_document(html);
    let table_selector = selector("table");
    let table = document
        .select(&table_selector)
        .find(|t| t.value().id() == Some(table_id))
        .ok_or_else(|| TableError::NotFound {
            table_id: table_id.to_owned(),
        })?;

    let tbody_selector = selector("tbody");
    let groups = table
        .select(&tbody_selector)
        .filter(|tbody| has_class(*tbody, COLLAPSIBLE_CLASS))
        .map(|tbody| tbody.id())
        .collect::<Vec<_>>();

    let row_selector = selector("tr");
    let cell_selector = selector("td");
    let button_selector = selector("button");
    let row_button_selector = selector(".row-button");

    let mut button_label = None;
    let rows = table
        .select(&row_selector)
        .map(|row| {
            let group = row
                .ancestors()
                .filter_map(ElementRef::wrap)
                .find(|el| el.value().name() == "tbody")
                .and_then(|tbody| groups.iter().position(|&id| id == tbody.id()))
                .map_or(RowGroup::Always, RowGroup::Collapsible);
            // Every cell of the row hosting the expand button is structural
            let structural = collapsible
                && (has_class(row, ROW_BUTTON_CLASS)
                    || row.select(&row_button_selector).next().is_some()
                    || row.select(&button_selector).next().is_some());
            if structural && button_label.is_none() {
                button_label = row
                    .select(&button_selector)
                    .next()
                    .map(|b| b.text().collect::<String>().trim().to_owned());
            }
            let cells = row
                .select(&cell_selector)
                .map(|cell| {
                    let text = cell.text().collect::<String>();
                    let value = if structural {
                        None
                    } else {
                        parse_leading_number(&text)
                    };
                    TableCell {
                        text: text.trim().to_owned(),
                        value,
                        structural,
                    }
                })
                .collect();
            TableRow { group, cells }
        })
        .collect::<Vec<_>>();

    let table = DataTable {
        id: table_id.to_owned(),
        rows,
        button_label,
    };

    if collapsible && table.structural_cells() != COLLAPSIBLE_STRUCTURAL_CELLS {
        tracing::warn!(
            table_id,
            found = table.structural_cells(),
            expected = COLLAPSIBLE_STRUCTURAL_CELLS,
            "unexpected number of structural cells in collapsible table"
        );
    }
    tracing::debug!(
        table_id,
        values = table.numeric_cells().count(),
        groups = groups.len(),
        "extracted table"
    );
    Ok(table)
}

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("static selector must be valid")
}

fn has_class(element: ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

/// Parses the longest numeric prefix of `text`, ignoring leading whitespace.
///
/// Mirrors how the page reads cells: `"43.5 dkg"` is `43.5`, `"n/a"` is not a number.
/// Only finite values are accepted.
#[must_use]
pub fn parse_leading_number(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let candidate_len = text
        .char_indices()
        .find(|&(_, c)| !matches!(c, '0'..='9' | '+' | '-' | '.' | 'e' | 'E'))
        .map_or(text.len(), |(i, _)| i);
    let candidate = &text[..candidate_len];
    (1..=candidate.len())
        .rev()
        .filter_map(|len| candidate[..len].parse::<f64>().ok())
        .find(|v| v.is_finite())
}
