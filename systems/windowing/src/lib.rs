#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure windowing system that keeps the materialized table cells in step with
//! the viewport.
//!
//! The system reacts to [`TableEvent::Attached`] by emitting the bounded
//! initial construction and to [`TableEvent::ViewportScrolled`] by
//! reconciling the materialized set against the visible window. Scroll
//! triggers closer together than the configured interval are dropped.

use std::{
    collections::{BTreeMap, BTreeSet},
    time::Duration,
};

use tracing::debug;
use wordgrid_core::{
    table::axis_step, CellCoord, CellKey, CellSize, GridRange, MaterializedCell, PixelPoint,
    TableCommand, TableEvent, Viewport, VisibleWindow, MAX_INITIAL_COLUMNS, MAX_INITIAL_ROWS,
    RECONCILE_INTERVAL,
};
use wordgrid_world::table::query::MaterializedView;

/// Configuration parameters required to construct the windowing system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    cell_size: CellSize,
    reconcile_interval: Duration,
    clamp_to_range: bool,
    max_initial_columns: u64,
    max_initial_rows: u64,
}

impl Config {
    /// Creates a configuration with explicit values.
    #[must_use]
    pub const fn new(
        cell_size: CellSize,
        reconcile_interval: Duration,
        clamp_to_range: bool,
        max_initial_columns: u64,
        max_initial_rows: u64,
    ) -> Self {
        Self {
            cell_size,
            reconcile_interval,
            clamp_to_range,
            max_initial_columns,
            max_initial_rows,
        }
    }

    /// Pixel size of a cell.
    #[must_use]
    pub const fn cell_size(&self) -> CellSize {
        self.cell_size
    }

    /// Reports whether visible windows are intersected with the logical range.
    #[must_use]
    pub const fn clamp_to_range(&self) -> bool {
        self.clamp_to_range
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(
            CellSize::default(),
            RECONCILE_INTERVAL,
            true,
            MAX_INITIAL_COLUMNS,
            MAX_INITIAL_ROWS,
        )
    }
}

/// Computes the row and column indices visible through `viewport`.
///
/// First indices are floored and last indices are ceiled, giving a half-open
/// window. The result is not clamped to any logical range.
#[must_use]
pub fn compute_visible_window(viewport: &Viewport, cell_size: CellSize) -> VisibleWindow {
    let height = f64::from(cell_size.height());
    let width = f64::from(cell_size.width());
    VisibleWindow {
        first_row: (viewport.scroll_top() / height).floor() as i64,
        last_row: ((viewport.scroll_top() + viewport.height()) / height).ceil() as i64,
        first_column: (viewport.scroll_left() / width).floor() as i64,
        last_column: ((viewport.scroll_left() + viewport.width()) / width).ceil() as i64,
    }
}

/// Pixel layout of a table anchored at its range origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableLayout {
    range: GridRange,
    cell_size: CellSize,
}

impl TableLayout {
    /// Creates a layout for `range`.
    #[must_use]
    pub const fn new(range: GridRange, cell_size: CellSize) -> Self {
        Self { range, cell_size }
    }

    /// Logical range laid out.
    #[must_use]
    pub const fn range(&self) -> GridRange {
        self.range
    }

    /// Pixel offset of `coord` relative to the range origin.
    ///
    /// Offsets grow along the direction of each axis, so descending ranges
    /// lay out left to right and top to bottom like ascending ones.
    #[must_use]
    pub fn position_of(&self, coord: CellCoord) -> PixelPoint {
        let origin = self.range.origin();
        let column = (coord.x() - origin.x()).saturating_mul(self.range.x_step());
        let row = (coord.y() - origin.y()).saturating_mul(self.range.y_step());
        PixelPoint::new(
            column.saturating_mul(i64::from(self.cell_size.width())),
            row.saturating_mul(i64::from(self.cell_size.height())),
        )
    }

    /// Realizes the cell at `coord`.
    #[must_use]
    pub fn cell_at(&self, coord: CellCoord) -> MaterializedCell {
        MaterializedCell::new(coord, self.position_of(coord), self.cell_size)
    }

    /// Realizes every cell of the index window.
    pub fn materialize_window(
        &self,
        window: VisibleWindow,
    ) -> impl Iterator<Item = MaterializedCell> + '_ {
        let columns = window.columns();
        let rows = window.rows();
        materialize_range(
            self,
            self.range.x_at(columns.start),
            self.range.x_at(columns.end),
            self.range.y_at(rows.start),
            self.range.y_at(rows.end),
        )
    }
}

/// Produces one cell per coordinate of the rectangle `[x_start, x_end) x [y_start, y_end)`.
///
/// Each axis is walked from its start toward its end, whichever direction
/// that is; the end is excluded. Cells are yielded column by column. Values
/// are the coordinate products and positions come from `layout`.
pub fn materialize_range(
    layout: &TableLayout,
    x_start: i64,
    x_end: i64,
    y_start: i64,
    y_end: i64,
) -> impl Iterator<Item = MaterializedCell> + '_ {
    walk(x_start, x_end).flat_map(move |x| {
        walk(y_start, y_end).map(move |y| layout.cell_at(CellCoord::new(x, y)))
    })
}

fn walk(start: i64, end: i64) -> impl Iterator<Item = i64> {
    let step = axis_step(start, end);
    let count = start.abs_diff(end);
    (0..count).map(move |offset| start + step * offset as i64)
}

/// Fixed-window rate limit for scroll-triggered reconciliation.
///
/// A trigger is admitted when no trigger was admitted before or when at
/// least `interval` elapsed since the last admitted one. Dropped triggers do
/// not move the window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Throttle {
    interval: Duration,
    last_admitted: Option<Duration>,
}

impl Throttle {
    /// Creates an open gate.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_admitted: None,
        }
    }

    /// Decides whether the trigger observed at `at` runs.
    pub fn admit(&mut self, at: Duration) -> bool {
        if let Some(last) = self.last_admitted {
            if at.saturating_sub(last) < self.interval {
                return false;
            }
        }
        self.last_admitted = Some(at);
        true
    }

    /// Reopens the gate.
    pub fn reset(&mut self) {
        self.last_admitted = None;
    }
}

/// Materialized set as seen by the system while it emits a batch.
///
/// Commands are only applied by the world after the batch is complete, so
/// creates and destroys issued earlier in the batch are tracked here.
struct PendingSet<'a> {
    view: MaterializedView<'a>,
    created: BTreeMap<CellKey, MaterializedCell>,
    destroyed: BTreeSet<CellKey>,
}

impl<'a> PendingSet<'a> {
    fn new(view: MaterializedView<'a>) -> Self {
        Self {
            view,
            created: BTreeMap::new(),
            destroyed: BTreeSet::new(),
        }
    }

    fn contains(&self, key: CellKey) -> bool {
        self.created.contains_key(&key)
            || (self.view.contains(key) && !self.destroyed.contains(&key))
    }

    fn create(&mut self, cell: MaterializedCell, out: &mut Vec<TableCommand>) {
        let key = cell.key();
        if self.contains(key) {
            return;
        }
        if !self.destroyed.remove(&key) {
            let _ = self.created.insert(key, cell);
        }
        out.push(TableCommand::CreateCell { cell });
    }

    fn destroy(&mut self, key: CellKey, out: &mut Vec<TableCommand>) {
        if self.created.remove(&key).is_none() {
            let _ = self.destroyed.insert(key);
        }
        out.push(TableCommand::DestroyCell { key });
    }

    fn cells(&self) -> Vec<MaterializedCell> {
        self.view
            .iter()
            .filter(|cell| !self.destroyed.contains(&cell.key()))
            .chain(self.created.values())
            .copied()
            .collect()
    }
}

/// Pure system that reconciles materialized cells against the viewport.
#[derive(Debug)]
pub struct Windowing {
    config: Config,
    throttle: Throttle,
    layout: Option<TableLayout>,
}

impl Default for Windowing {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Windowing {
    /// Creates a new windowing system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            throttle: Throttle::new(config.reconcile_interval),
            layout: None,
        }
    }

    /// Consumes world events and the materialized view to emit table commands.
    pub fn handle(
        &mut self,
        events: &[TableEvent],
        materialized: MaterializedView<'_>,
        out: &mut Vec<TableCommand>,
    ) {
        let mut pending = PendingSet::new(materialized);
        for event in events {
            match event {
                TableEvent::Attached { range, .. } => {
                    self.layout = Some(TableLayout::new(*range, self.config.cell_size));
                    self.throttle.reset();
                    self.construct_initial(&mut pending, out);
                }
                TableEvent::ViewportScrolled { viewport, at } => {
                    if !self.throttle.admit(*at) {
                        debug!(?at, "reconcile throttled");
                        continue;
                    }
                    self.reconcile_pending(viewport, &mut pending, out);
                }
                TableEvent::CellCreated { .. } | TableEvent::CellDestroyed { .. } => {}
            }
        }
    }

    /// Reconciles the materialized set against `viewport`, bypassing the throttle.
    ///
    /// Newly visible cells are created before cells that left the viewport
    /// are destroyed, so a shift smaller than one cell never leaves a gap.
    pub fn reconcile(
        &self,
        viewport: &Viewport,
        materialized: MaterializedView<'_>,
        out: &mut Vec<TableCommand>,
    ) {
        let mut pending = PendingSet::new(materialized);
        self.reconcile_pending(viewport, &mut pending, out);
    }

    /// Visible window for `viewport`, clamped when configured to.
    #[must_use]
    pub fn visible_window(&self, viewport: &Viewport) -> Option<VisibleWindow> {
        let layout = self.layout.as_ref()?;
        let window = compute_visible_window(viewport, self.config.cell_size);
        if self.config.clamp_to_range {
            let (columns, rows) = extent(&layout.range);
            Some(window.clamped(columns, rows))
        } else {
            Some(window)
        }
    }

    fn construct_initial(&self, pending: &mut PendingSet<'_>, out: &mut Vec<TableCommand>) {
        let Some(layout) = self.layout.as_ref() else {
            return;
        };
        let (columns, rows) = extent(&layout.range());
        let window = VisibleWindow {
            first_row: 0,
            last_row: clamp_index(rows.min(self.config.max_initial_rows)),
            first_column: 0,
            last_column: clamp_index(columns.min(self.config.max_initial_columns)),
        };
        for cell in layout.materialize_window(window) {
            pending.create(cell, out);
        }
        debug!(cells = window.cell_count(), "initial construction");
    }

    fn reconcile_pending(
        &self,
        viewport: &Viewport,
        pending: &mut PendingSet<'_>,
        out: &mut Vec<TableCommand>,
    ) {
        let (Some(layout), Some(window)) = (self.layout.as_ref(), self.visible_window(viewport))
        else {
            return;
        };

        let before = out.len();
        for cell in layout.materialize_window(window) {
            pending.create(cell, out);
        }
        let created = out.len() - before;

        let bounds = viewport.bounds();
        let stale: Vec<CellKey> = pending
            .cells()
            .into_iter()
            .filter(|cell| !cell.bounds().intersects(&bounds))
            .map(|cell| cell.key())
            .collect();
        let destroyed = stale.len();
        for key in stale {
            pending.destroy(key, out);
        }

        debug!(?window, created, destroyed, "reconciled");
    }
}

/// Columns and rows a table spans, an empty axis counting as one.
fn extent(range: &GridRange) -> (u64, u64) {
    (range.columns().max(1), range.rows().max(1))
}

fn clamp_index(count: u64) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_viewport_shows_four_cells() {
        let window = compute_visible_window(&Viewport::new(0.0, 0.0, 64.0, 104.0), CellSize::default());
        assert_eq!(window.rows(), 0..2);
        assert_eq!(window.columns(), 0..2);
        assert_eq!(window.cell_count(), 4);
    }

    #[test]
    fn partial_cells_round_outward() {
        let window =
            compute_visible_window(&Viewport::new(40.0, 60.0, 64.0, 104.0), CellSize::default());
        assert_eq!(window.rows(), 1..4);
        assert_eq!(window.columns(), 1..4);
    }

    #[test]
    fn negative_scroll_yields_negative_indices() {
        let window =
            compute_visible_window(&Viewport::new(-10.0, 0.0, 32.0, 52.0), CellSize::default());
        assert_eq!(window.first_row, -1);
        assert_eq!(window.last_row, 1);
    }

    #[test]
    fn materialize_range_covers_half_open_rectangle() {
        let layout = TableLayout::new(GridRange::new(1, 10, 1, 10), CellSize::default());
        let cells: Vec<_> = materialize_range(&layout, 2, 5, 3, 5).collect();

        assert_eq!(cells.len(), 3 * 2);
        for cell in &cells {
            assert_eq!(cell.value(), cell.coord().x() * cell.coord().y());
        }
        assert_eq!(cells[0].coord(), CellCoord::new(2, 3));
        assert_eq!(cells[0].position(), PixelPoint::new(52, 64));
        assert_eq!(cells[1].coord(), CellCoord::new(2, 4));
    }

    #[test]
    fn materialize_range_walks_descending_axes() {
        let layout = TableLayout::new(GridRange::new(10, 0, 0, 5), CellSize::default());
        let cells: Vec<_> = materialize_range(&layout, 10, 7, 0, 1).collect();

        let xs: Vec<i64> = cells.iter().map(|cell| cell.coord().x()).collect();
        assert_eq!(xs, vec![10, 9, 8]);
        assert_eq!(cells[2].position(), PixelPoint::new(104, 0));
    }

    #[test]
    fn empty_rectangle_materializes_nothing() {
        let layout = TableLayout::new(GridRange::new(1, 10, 1, 10), CellSize::default());
        assert_eq!(materialize_range(&layout, 4, 4, 1, 9).count(), 0);
    }

    #[test]
    fn throttle_collapses_bursts() {
        let mut throttle = Throttle::new(RECONCILE_INTERVAL);
        assert!(throttle.admit(Duration::from_millis(1_000)));
        assert!(!throttle.admit(Duration::from_millis(1_010)));
        assert!(!throttle.admit(Duration::from_millis(1_040)));
        assert!(throttle.admit(Duration::from_millis(1_050)));
        assert!(throttle.admit(Duration::from_millis(1_110)));
    }

    #[test]
    fn throttle_reset_reopens_gate() {
        let mut throttle = Throttle::new(RECONCILE_INTERVAL);
        assert!(throttle.admit(Duration::from_millis(5)));
        throttle.reset();
        assert!(throttle.admit(Duration::from_millis(6)));
    }
}
