#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Strict multiplication table with a header row, a header column and a heat
//! map over the body.
//!
//! Unlike the windowed grid this table is built in full, so requests are
//! validated against [`TableLimits`] before any work happens. Both axes are
//! walked inclusively from start to end in whichever direction the request
//! runs.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use wordgrid_core::{table::axis_step, GridRange, MAX_TABLE_CELLS, RANGE_BOUND};

/// Message shown in place of a live preview for oversized requests.
pub const TOO_LARGE_TO_PREVIEW: &str = "Table too large to preview.";

/// Bounds enforced on table requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableLimits {
    /// Largest accepted magnitude of any bound.
    pub bound: i64,
    /// Largest accepted `|x_end - x_start| * |y_end - y_start|`.
    pub max_cells: u64,
}

impl Default for TableLimits {
    fn default() -> Self {
        Self {
            bound: RANGE_BOUND,
            max_cells: MAX_TABLE_CELLS,
        }
    }
}

/// Names one of the four bounds of a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoundField {
    /// First x value.
    XStart,
    /// Last x value.
    XEnd,
    /// First y value.
    YStart,
    /// Last y value.
    YEnd,
}

impl fmt::Display for BoundField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::XStart => "x start",
            Self::XEnd => "x end",
            Self::YStart => "y start",
            Self::YEnd => "y end",
        };
        f.write_str(name)
    }
}

/// Reasons a table request is refused.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TableRequestError {
    /// A bound lies below the accepted minimum.
    #[error("{field} is {value}, minimum is {min}")]
    BelowMinimum {
        /// Offending bound.
        field: BoundField,
        /// Supplied value.
        value: i64,
        /// Smallest accepted value.
        min: i64,
    },
    /// A bound lies above the accepted maximum.
    #[error("{field} is {value}, maximum is {max}")]
    AboveMaximum {
        /// Offending bound.
        field: BoundField,
        /// Supplied value.
        value: i64,
        /// Largest accepted value.
        max: i64,
    },
    /// The table would contain too many cells.
    #[error("table size is very large ({cells} cells, limit {limit})")]
    TooLarge {
        /// Requested cell count.
        cells: u64,
        /// Largest accepted cell count.
        limit: u64,
    },
}

/// Unvalidated table request as typed by the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRequest {
    /// First x value.
    pub x_start: i64,
    /// Last x value.
    pub x_end: i64,
    /// First y value.
    pub y_start: i64,
    /// Last y value.
    pub y_end: i64,
}

impl TableRequest {
    /// Creates a request.
    #[must_use]
    pub const fn new(x_start: i64, x_end: i64, y_start: i64, y_end: i64) -> Self {
        Self {
            x_start,
            x_end,
            y_start,
            y_end,
        }
    }

    /// Size figure compared against [`TableLimits::max_cells`].
    #[must_use]
    pub const fn cell_count(&self) -> u64 {
        self.x_start
            .abs_diff(self.x_end)
            .saturating_mul(self.y_start.abs_diff(self.y_end))
    }

    /// Short human label, e.g. `[1, 5] x [2, 4]`.
    #[must_use]
    pub fn label(&self) -> String {
        format!(
            "[{}, {}] x [{}, {}]",
            self.x_start, self.x_end, self.y_start, self.y_end
        )
    }

    /// Checks every bound and the overall size.
    ///
    /// Bounds are checked in field order before the size, so the first
    /// offending field is reported.
    pub fn validate(&self, limits: &TableLimits) -> Result<GridRange, TableRequestError> {
        let fields = [
            (BoundField::XStart, self.x_start),
            (BoundField::XEnd, self.x_end),
            (BoundField::YStart, self.y_start),
            (BoundField::YEnd, self.y_end),
        ];
        // A negative bound admits nothing.
        let min = limits.bound.saturating_neg();
        for (field, value) in fields {
            if value < min {
                return Err(TableRequestError::BelowMinimum { field, value, min });
            }
            if value > limits.bound {
                return Err(TableRequestError::AboveMaximum {
                    field,
                    value,
                    max: limits.bound,
                });
            }
        }

        let cells = self.cell_count();
        if cells > limits.max_cells {
            return Err(TableRequestError::TooLarge {
                cells,
                limit: limits.max_cells,
            });
        }

        Ok(GridRange::new(
            self.x_start,
            self.x_end,
            self.y_start,
            self.y_end,
        ))
    }
}

/// Walks `start..=end` toward `end`, whichever direction that is.
pub fn inclusive_axis(start: i64, end: i64) -> impl Iterator<Item = i64> {
    let step = axis_step(start, end);
    (0..=start.abs_diff(end)).map(move |offset| start + step * offset as i64)
}

/// Fully built product table.
#[derive(Clone, Debug, PartialEq)]
pub struct ProductTable {
    columns: Vec<i64>,
    rows: Vec<i64>,
    values: Vec<i64>,
    min: i64,
    max: i64,
}

impl ProductTable {
    /// Builds every header and body value of `range`.
    ///
    /// The range is expected to have passed [`TableRequest::validate`]; the
    /// table is allocated in full.
    #[must_use]
    pub fn build(range: GridRange) -> Self {
        let columns: Vec<i64> = inclusive_axis(range.x_start(), range.x_end()).collect();
        let rows: Vec<i64> = inclusive_axis(range.y_start(), range.y_end()).collect();
        let values: Vec<i64> = rows
            .iter()
            .flat_map(|y| columns.iter().map(move |x| x.saturating_mul(*y)))
            .collect();
        let min = values.iter().copied().min().unwrap_or_default();
        let max = values.iter().copied().max().unwrap_or_default();
        debug!(
            columns = columns.len(),
            rows = rows.len(),
            min,
            max,
            "built product table"
        );
        Self {
            columns,
            rows,
            values,
            min,
            max,
        }
    }

    /// Header row: the x value of each column.
    #[must_use]
    pub fn column_headers(&self) -> &[i64] {
        &self.columns
    }

    /// Header column: the y value of each row.
    #[must_use]
    pub fn row_headers(&self) -> &[i64] {
        &self.rows
    }

    /// Smallest body value.
    #[must_use]
    pub fn min(&self) -> i64 {
        self.min
    }

    /// Largest body value.
    #[must_use]
    pub fn max(&self) -> i64 {
        self.max
    }

    /// Body value at the given row and column index.
    #[must_use]
    pub fn value(&self, row: usize, column: usize) -> Option<i64> {
        if column >= self.columns.len() {
            return None;
        }
        self.values.get(row * self.columns.len() + column).copied()
    }

    /// Position of `value` between the smallest and largest body values.
    ///
    /// Returns `0.0` when every body value is the same.
    #[must_use]
    pub fn heat(&self, value: i64) -> f64 {
        if self.max == self.min {
            return 0.0;
        }
        (value - self.min) as f64 / (self.max - self.min) as f64
    }

    /// Body rows in display order.
    pub fn body(&self) -> impl Iterator<Item = BodyRow<'_>> + '_ {
        let width = self.columns.len().max(1);
        self.rows
            .iter()
            .zip(self.values.chunks(width))
            .map(move |(y, values)| BodyRow {
                y: *y,
                values,
                table: self,
            })
    }
}

/// One body row of a [`ProductTable`].
#[derive(Clone, Copy, Debug)]
pub struct BodyRow<'a> {
    y: i64,
    values: &'a [i64],
    table: &'a ProductTable,
}

impl<'a> BodyRow<'a> {
    /// Row header value.
    #[must_use]
    pub fn y(&self) -> i64 {
        self.y
    }

    /// Body values of the row.
    #[must_use]
    pub fn values(&self) -> &'a [i64] {
        self.values
    }

    /// Body values paired with their heat amounts.
    pub fn heated(&self) -> impl Iterator<Item = (i64, f64)> + 'a {
        let table = self.table;
        self.values.iter().map(move |value| (*value, table.heat(*value)))
    }
}

/// Outcome of a live preview.
#[derive(Clone, Debug, PartialEq)]
pub enum Preview {
    /// The request fits and the table was built.
    Table(ProductTable),
    /// The request exceeds the cell limit; show [`TOO_LARGE_TO_PREVIEW`].
    TooLarge,
}

/// Live preview of `request`.
///
/// Oversized requests are not errors here; they degrade to
/// [`Preview::TooLarge`]. Out-of-range bounds are still reported.
pub fn preview(request: &TableRequest, limits: &TableLimits) -> Result<Preview, TableRequestError> {
    match request.validate(limits) {
        Ok(range) => Ok(Preview::Table(ProductTable::build(range))),
        Err(TableRequestError::TooLarge { cells, .. }) => {
            debug!(cells, "preview suppressed");
            Ok(Preview::TooLarge)
        }
        Err(error) => Err(error),
    }
}
