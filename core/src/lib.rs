#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the wordgrid engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative worlds, and pure systems. Two independent components share
//! the same shape:
//!
//! * the windowed product table, driven by [`TableCommand`] and reporting
//!   [`TableEvent`] values, and
//! * the tile board game, driven by [`GameCommand`] and reporting
//!   [`GameEvent`] values.
//!
//! Adapters submit commands describing desired mutations, a world executes
//! them through its `apply` entry point and broadcasts events. Systems consume
//! event streams, query immutable views, and respond exclusively with new
//! command batches.

pub mod table;
pub mod tiles;

use std::time::Duration;

pub use table::{
    CellCoord, CellKey, CellSize, ContentSize, GridRange, MaterializedCell, PixelPoint, PixelRect,
    TableCommand, TableEvent, Viewport, VisibleWindow,
};
pub use tiles::{
    Dictionary, GameCommand, GameEvent, PieceSet, PieceSpec, PlacementError, PlayError,
    ReturnError, SquareKind, Tile, TileFace, TileId, TileSource, WordStatus, DEFAULT_BOARD_LAYOUT,
};

/// Width of a single materialized table cell measured in pixels.
pub const CELL_WIDTH: u32 = 52;

/// Height of a single materialized table cell measured in pixels.
pub const CELL_HEIGHT: u32 = 32;

/// Upper bound on columns built by the first full-table construction.
pub const MAX_INITIAL_COLUMNS: u64 = 25;

/// Upper bound on rows built by the first full-table construction.
pub const MAX_INITIAL_ROWS: u64 = 25;

/// Minimum spacing between two scroll-triggered reconciliations.
pub const RECONCILE_INTERVAL: Duration = Duration::from_millis(50);

/// Largest table, in body cells, that may be requested.
pub const MAX_TABLE_CELLS: u64 = 50_000;

/// Magnitude bound applied to every table range input.
pub const RANGE_BOUND: i64 = 100;

/// Number of tiles a full rack holds.
pub const RACK_SIZE: usize = 7;

/// Shortest word accepted by the dictionary check.
pub const MIN_WORD_LENGTH: usize = 2;

/// Bonus awarded for playing a word that uses a full rack worth of letters.
pub const FULL_RACK_BONUS: u32 = 50;

#[cfg(test)]
mod tests {
    use super::{
        CellCoord, CellKey, GridRange, PlacementError, SquareKind, TileFace, TileSource,
        Viewport,
    };
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn cell_key_round_trips_through_bincode() {
        assert_round_trip(&CellKey::from(CellCoord::new(-4, 9)));
    }

    #[test]
    fn grid_range_round_trips_through_bincode() {
        assert_round_trip(&GridRange::new(5, -5, 1, 10));
    }

    #[test]
    fn viewport_round_trips_through_bincode() {
        assert_round_trip(&Viewport::new(12.5, 40.0, 480.0, 640.0));
    }

    #[test]
    fn tile_contracts_round_trip_through_bincode() {
        assert_round_trip(&TileFace::Blank);
        assert_round_trip(&SquareKind::DoubleWord);
        assert_round_trip(&TileSource::Board { column: 3 });
        assert_round_trip(&PlacementError::NotAdjacent);
    }
}
