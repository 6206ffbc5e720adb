#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Application context for wordgrid front ends.
//!
//! Sessions own a world, the systems reacting to it and a rendering
//! surface, and pump commands until the systems fall quiet. Asset loading
//! and configuration live here as well so front ends stay thin.

pub mod assets;
pub mod config;
mod game_session;
mod table_session;

pub use assets::{AssetError, AssetLoader, AssetSource, FsAssetSource};
pub use config::{AppConfig, ConfigError, TableSettings, TileSettings};
pub use game_session::GameSession;
pub use table_session::TableSession;

use wordgrid_rendering::text::{HeatCell, TablePresentation};
use wordgrid_system_product_table::ProductTable;

/// Renderable form of a strict product table with heat colors applied.
#[must_use]
pub fn present_table(table: &ProductTable) -> TablePresentation {
    TablePresentation {
        column_headers: table.column_headers().to_vec(),
        rows: table
            .body()
            .map(|row| {
                let cells = row
                    .heated()
                    .map(|(value, amount)| HeatCell::new(value, amount))
                    .collect();
                (row.y(), cells)
            })
            .collect(),
    }
}
