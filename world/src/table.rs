//! Authoritative state of the windowed product table.

use std::collections::{btree_map::Entry, BTreeMap};

use tracing::debug;
use wordgrid_core::{
    CellKey, CellSize, ContentSize, GridRange, MaterializedCell, TableCommand, TableEvent,
    Viewport, MAX_INITIAL_COLUMNS, MAX_INITIAL_ROWS,
};

/// Represents the authoritative table state.
///
/// The materialized cell set is owned exclusively by the world and changes
/// only through [`apply`]. Attaching a new range discards every cell of the
/// previous table.
#[derive(Debug)]
pub struct TableWorld {
    cell_size: CellSize,
    range: Option<GridRange>,
    viewport: Option<Viewport>,
    cells: BTreeMap<CellKey, MaterializedCell>,
}

impl TableWorld {
    /// Creates an empty world laying cells out with `cell_size`.
    #[must_use]
    pub fn new(cell_size: CellSize) -> Self {
        Self {
            cell_size,
            range: None,
            viewport: None,
            cells: BTreeMap::new(),
        }
    }
}

impl Default for TableWorld {
    fn default() -> Self {
        Self::new(CellSize::default())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut TableWorld, command: TableCommand, out_events: &mut Vec<TableEvent>) {
    match command {
        TableCommand::Attach { range } => {
            world.cells.clear();
            world.range = Some(range);
            world.viewport = None;
            out_events.push(TableEvent::Attached {
                range,
                content_size: content_size(range, world.cell_size),
            });
        }
        TableCommand::Scroll { viewport, at } => {
            if world.range.is_none() {
                debug!(?viewport, "scroll ignored, no table attached");
                return;
            }
            world.viewport = Some(viewport);
            out_events.push(TableEvent::ViewportScrolled { viewport, at });
        }
        TableCommand::CreateCell { cell } => {
            if world.range.is_none() {
                return;
            }
            if let Entry::Vacant(slot) = world.cells.entry(cell.key()) {
                let _ = slot.insert(cell);
                out_events.push(TableEvent::CellCreated { cell });
            }
        }
        TableCommand::DestroyCell { key } => {
            if let Some(cell) = world.cells.remove(&key) {
                out_events.push(TableEvent::CellDestroyed { cell });
            }
        }
    }
}

/// Scrollable extent reserved for a table, never smaller than the initial
/// construction bounds.
fn content_size(range: GridRange, cell_size: CellSize) -> ContentSize {
    let columns = range.columns().saturating_add(1).max(MAX_INITIAL_COLUMNS);
    let rows = range.rows().saturating_add(1).max(MAX_INITIAL_ROWS);
    ContentSize {
        width: columns.saturating_mul(u64::from(cell_size.width())),
        height: rows.saturating_mul(u64::from(cell_size.height())),
    }
}

/// Query functions that provide read-only access to the table state.
pub mod query {
    use std::collections::BTreeMap;

    use super::TableWorld;
    use wordgrid_core::{CellKey, GridRange, MaterializedCell, Viewport};

    /// Logical range of the attached table, if any.
    #[must_use]
    pub fn range(world: &TableWorld) -> Option<GridRange> {
        world.range
    }

    /// Most recent viewport readout accepted by the world.
    #[must_use]
    pub fn viewport(world: &TableWorld) -> Option<Viewport> {
        world.viewport
    }

    /// Exposes a read-only view of the materialized cell set.
    #[must_use]
    pub fn materialized(world: &TableWorld) -> MaterializedView<'_> {
        MaterializedView {
            cells: &world.cells,
        }
    }

    /// Read-only view into the materialized cell set, ordered by key.
    #[derive(Clone, Copy, Debug)]
    pub struct MaterializedView<'a> {
        cells: &'a BTreeMap<CellKey, MaterializedCell>,
    }

    impl<'a> MaterializedView<'a> {
        /// Reports whether a cell with `key` is realized.
        #[must_use]
        pub fn contains(&self, key: CellKey) -> bool {
            self.cells.contains_key(&key)
        }

        /// Iterator over realized cells in key order.
        pub fn iter(&self) -> impl Iterator<Item = &'a MaterializedCell> + 'a {
            self.cells.values()
        }

        /// Number of realized cells.
        #[must_use]
        pub fn len(&self) -> usize {
            self.cells.len()
        }

        /// Reports whether no cell is realized.
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.cells.is_empty()
        }
    }
}
