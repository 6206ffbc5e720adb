//! Contracts for the windowed product table.

use std::{fmt, ops::Range, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{CELL_HEIGHT, CELL_WIDTH};

/// Commands that express all permissible table mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum TableCommand {
    /// Replaces the active table with a fresh instance spanning `range`.
    ///
    /// Every previously materialized cell is discarded without destroy events,
    /// mirroring a surface that is cleared before a new table is attached.
    Attach {
        /// Logical coordinate range covered by the new table.
        range: GridRange,
    },
    /// Reports the latest viewport readout observed by the adapter.
    Scroll {
        /// Scroll offsets and visible extent of the viewport.
        viewport: Viewport,
        /// Monotonic timestamp of the observation.
        at: Duration,
    },
    /// Requests that a cell be realized on the display surface.
    CreateCell {
        /// Cell to insert into the materialized set.
        cell: MaterializedCell,
    },
    /// Requests that a realized cell be removed from the display surface.
    DestroyCell {
        /// Identity of the cell to remove.
        key: CellKey,
    },
}

/// Events broadcast by the table world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum TableEvent {
    /// Confirms that a new table replaced the previous one.
    Attached {
        /// Logical coordinate range covered by the table.
        range: GridRange,
        /// Scrollable content extent the surface should reserve.
        content_size: ContentSize,
    },
    /// Announces a new viewport readout.
    ViewportScrolled {
        /// Scroll offsets and visible extent of the viewport.
        viewport: Viewport,
        /// Monotonic timestamp of the observation.
        at: Duration,
    },
    /// Confirms that a cell entered the materialized set.
    CellCreated {
        /// Cell that was inserted.
        cell: MaterializedCell,
    },
    /// Confirms that a cell left the materialized set.
    CellDestroyed {
        /// Cell that was removed.
        cell: MaterializedCell,
    },
}

/// Location of a single table cell expressed in logical coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    x: i64,
    y: i64,
}

impl CellCoord {
    /// Creates a new logical coordinate.
    #[must_use]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Logical x coordinate (the column factor).
    #[must_use]
    pub const fn x(&self) -> i64 {
        self.x
    }

    /// Logical y coordinate (the row factor).
    #[must_use]
    pub const fn y(&self) -> i64 {
        self.y
    }

    /// Value displayed by the cell at this coordinate.
    #[must_use]
    pub const fn product(&self) -> i64 {
        self.x.saturating_mul(self.y)
    }
}

/// Stable identity of a materialized cell.
///
/// Two cells share a key exactly when they share a coordinate, so inserting
/// a cell whose key is already present never produces a duplicate node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellKey(CellCoord);

impl CellKey {
    /// Coordinate identified by the key.
    #[must_use]
    pub const fn coord(&self) -> CellCoord {
        self.0
    }
}

impl From<CellCoord> for CellKey {
    fn from(coord: CellCoord) -> Self {
        Self(coord)
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cell_{}_{}", self.0.x, self.0.y)
    }
}

/// Pixel dimensions of a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellSize {
    width: u32,
    height: u32,
}

impl CellSize {
    /// Creates a cell size; zero dimensions are raised to one pixel.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width: if width == 0 { 1 } else { width },
            height: if height == 0 { 1 } else { height },
        }
    }

    /// Cell width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Cell height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
}

impl Default for CellSize {
    fn default() -> Self {
        Self::new(CELL_WIDTH, CELL_HEIGHT)
    }
}

/// Axis-aligned logical range of a table.
///
/// Either axis may run in descending order. Direction is normalized once into
/// a step of `+1` or `-1`; an axis whose start equals its end has a step of
/// `+1` and no extent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridRange {
    x_start: i64,
    x_end: i64,
    y_start: i64,
    y_end: i64,
}

impl GridRange {
    /// Creates a new range. No validation is performed.
    #[must_use]
    pub const fn new(x_start: i64, x_end: i64, y_start: i64, y_end: i64) -> Self {
        Self {
            x_start,
            x_end,
            y_start,
            y_end,
        }
    }

    /// First x coordinate of the range.
    #[must_use]
    pub const fn x_start(&self) -> i64 {
        self.x_start
    }

    /// Final x coordinate of the range.
    #[must_use]
    pub const fn x_end(&self) -> i64 {
        self.x_end
    }

    /// First y coordinate of the range.
    #[must_use]
    pub const fn y_start(&self) -> i64 {
        self.y_start
    }

    /// Final y coordinate of the range.
    #[must_use]
    pub const fn y_end(&self) -> i64 {
        self.y_end
    }

    /// Coordinate that anchors pixel offset zero.
    #[must_use]
    pub const fn origin(&self) -> CellCoord {
        CellCoord::new(self.x_start, self.y_start)
    }

    /// Direction of travel along the x axis.
    #[must_use]
    pub const fn x_step(&self) -> i64 {
        axis_step(self.x_start, self.x_end)
    }

    /// Direction of travel along the y axis.
    #[must_use]
    pub const fn y_step(&self) -> i64 {
        axis_step(self.y_start, self.y_end)
    }

    /// Number of columns in the half-open range `[x_start, x_end)`.
    #[must_use]
    pub const fn columns(&self) -> u64 {
        self.x_start.abs_diff(self.x_end)
    }

    /// Number of rows in the half-open range `[y_start, y_end)`.
    #[must_use]
    pub const fn rows(&self) -> u64 {
        self.y_start.abs_diff(self.y_end)
    }

    /// Number of body cells spanned by the range.
    #[must_use]
    pub const fn cell_count(&self) -> u64 {
        self.columns().saturating_mul(self.rows())
    }

    /// X coordinate found `column` steps away from the start.
    #[must_use]
    pub const fn x_at(&self, column: i64) -> i64 {
        self.x_start.saturating_add(self.x_step().saturating_mul(column))
    }

    /// Y coordinate found `row` steps away from the start.
    #[must_use]
    pub const fn y_at(&self, row: i64) -> i64 {
        self.y_start.saturating_add(self.y_step().saturating_mul(row))
    }
}

/// Normalizes the direction between two axis bounds into `+1` or `-1`.
#[must_use]
pub const fn axis_step(start: i64, end: i64) -> i64 {
    if end < start {
        -1
    } else {
        1
    }
}

/// Scroll offsets and visible extent of a scrolling container, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    scroll_top: f64,
    scroll_left: f64,
    height: f64,
    width: f64,
}

impl Viewport {
    /// Creates a viewport readout.
    #[must_use]
    pub const fn new(scroll_top: f64, scroll_left: f64, height: f64, width: f64) -> Self {
        Self {
            scroll_top,
            scroll_left,
            height,
            width,
        }
    }

    /// Vertical scroll offset.
    #[must_use]
    pub const fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    /// Horizontal scroll offset.
    #[must_use]
    pub const fn scroll_left(&self) -> f64 {
        self.scroll_left
    }

    /// Visible height of the container.
    #[must_use]
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// Visible width of the container.
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Pixel box currently visible through the viewport.
    #[must_use]
    pub const fn bounds(&self) -> PixelRect {
        PixelRect::new(self.scroll_left, self.scroll_top, self.width, self.height)
    }
}

/// Axis-aligned pixel rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl PixelRect {
    /// Creates a rectangle from its upper-left corner and extent.
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Left edge.
    #[must_use]
    pub const fn left(&self) -> f64 {
        self.left
    }

    /// Top edge.
    #[must_use]
    pub const fn top(&self) -> f64 {
        self.top
    }

    /// Right edge, exclusive.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Bottom edge, exclusive.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Half-open overlap test.
    ///
    /// The rectangles do not intersect when one lies fully before or fully
    /// after the other on either axis; touching edges do not count as overlap.
    #[must_use]
    pub fn intersects(&self, other: &PixelRect) -> bool {
        let separated = self.right() <= other.left
            || self.left >= other.right()
            || self.bottom() <= other.top
            || self.top >= other.bottom();
        !separated
    }
}

/// Integer pixel offset of a cell relative to the table origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelPoint {
    left: i64,
    top: i64,
}

impl PixelPoint {
    /// Creates a new pixel offset.
    #[must_use]
    pub const fn new(left: i64, top: i64) -> Self {
        Self { left, top }
    }

    /// Horizontal offset.
    #[must_use]
    pub const fn left(&self) -> i64 {
        self.left
    }

    /// Vertical offset.
    #[must_use]
    pub const fn top(&self) -> i64 {
        self.top
    }
}

/// Scrollable content extent reserved for a table, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentSize {
    /// Total content width.
    pub width: u64,
    /// Total content height.
    pub height: u64,
}

/// Half-open row and column index ranges visible through a viewport.
///
/// Indices count cells from the table origin, not logical coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisibleWindow {
    /// First visible row index.
    pub first_row: i64,
    /// Row index one past the last visible row.
    pub last_row: i64,
    /// First visible column index.
    pub first_column: i64,
    /// Column index one past the last visible column.
    pub last_column: i64,
}

impl VisibleWindow {
    /// Visible row indices.
    #[must_use]
    pub fn rows(&self) -> Range<i64> {
        self.first_row..self.last_row.max(self.first_row)
    }

    /// Visible column indices.
    #[must_use]
    pub fn columns(&self) -> Range<i64> {
        self.first_column..self.last_column.max(self.first_column)
    }

    /// Number of cells covered by the window.
    #[must_use]
    pub fn cell_count(&self) -> u64 {
        let rows = self.rows();
        let columns = self.columns();
        rows.start
            .abs_diff(rows.end)
            .saturating_mul(columns.start.abs_diff(columns.end))
    }

    /// Reports whether the window covers no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cell_count() == 0
    }

    /// Intersects the window with the index space `[0, columns) x [0, rows)`.
    #[must_use]
    pub fn clamped(&self, columns: u64, rows: u64) -> Self {
        let column_limit = i64::try_from(columns).unwrap_or(i64::MAX);
        let row_limit = i64::try_from(rows).unwrap_or(i64::MAX);
        let first_row = self.first_row.clamp(0, row_limit);
        let first_column = self.first_column.clamp(0, column_limit);
        Self {
            first_row,
            last_row: self.last_row.clamp(first_row, row_limit),
            first_column,
            last_column: self.last_column.clamp(first_column, column_limit),
        }
    }
}

/// A realized table cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterializedCell {
    coord: CellCoord,
    position: PixelPoint,
    size: CellSize,
}

impl MaterializedCell {
    /// Creates a cell at `coord` laid out at `position`.
    #[must_use]
    pub const fn new(coord: CellCoord, position: PixelPoint, size: CellSize) -> Self {
        Self {
            coord,
            position,
            size,
        }
    }

    /// Stable identity of the cell.
    #[must_use]
    pub fn key(&self) -> CellKey {
        CellKey::from(self.coord)
    }

    /// Logical coordinate of the cell.
    #[must_use]
    pub const fn coord(&self) -> CellCoord {
        self.coord
    }

    /// Displayed value, the product of the coordinates.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.coord.product()
    }

    /// Pixel offset of the cell's upper-left corner.
    #[must_use]
    pub const fn position(&self) -> PixelPoint {
        self.position
    }

    /// Pixel box occupied by the cell.
    #[must_use]
    pub fn bounds(&self) -> PixelRect {
        PixelRect::new(
            self.position.left as f64,
            self.position.top as f64,
            f64::from(self.size.width()),
            f64::from(self.size.height()),
        )
    }
}
