#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative state management for wordgrid.
//!
//! The crate hosts two independent worlds. [`TableWorld`] owns the set of
//! materialized product-table cells and [`GameWorld`] owns the bag, board,
//! rack and scores of the tile game. Both are mutated exclusively through
//! their `apply` entry points and observed through their `query` modules.

pub mod table;
pub mod tiles;

pub use table::TableWorld;
pub use tiles::GameWorld;
