#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for wordgrid adapters.
//!
//! Core logic never talks to a concrete toolkit. Table cells are pushed to a
//! [`DisplaySurface`], draggable tiles and drop zones are registered with a
//! [`DragDropSurface`], and textual front ends use the presenters in
//! [`text`].

mod surface;
pub mod text;

pub use surface::{RecordingSurface, SurfaceOp};

use anyhow::Result as AnyResult;
use glam::Vec2;
use wordgrid_core::{CellKey, ContentSize, MaterializedCell, SquareKind, Tile, TileSource};

/// RGBA color used when presenting cells and tiles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Byte RGB channels, alpha discarded.
    #[must_use]
    pub fn to_rgb_u8(self) -> [u8; 3] {
        [
            channel_to_u8(self.red),
            channel_to_u8(self.green),
            channel_to_u8(self.blue),
        ]
    }

    /// Lower-case `#rrggbb` form.
    #[must_use]
    pub fn to_hex(self) -> String {
        let [red, green, blue] = self.to_rgb_u8();
        format!("#{red:02x}{green:02x}{blue:02x}")
    }

    /// Linear interpolation between two colors in byte space.
    ///
    /// Each channel is `a + amount * (b - a)` truncated toward zero; `amount`
    /// is clamped to `0.0..=1.0`.
    #[must_use]
    pub fn lerp(self, other: Self, amount: f64) -> Self {
        let amount = if amount.is_nan() {
            0.0
        } else {
            amount.clamp(0.0, 1.0)
        };
        let from = self.to_rgb_u8();
        let to = other.to_rgb_u8();
        let mix = |index: usize| {
            let start = f64::from(from[index]);
            let end = f64::from(to[index]);
            (start + amount * (end - start)).trunc() as u8
        };
        Self::from_rgb_u8(mix(0), mix(1), mix(2))
    }
}

fn channel_to_u8(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Color of the smallest product in a heat map.
pub const HEAT_COLD: Color = Color::from_rgb_u8(0x00, 0xff, 0x00);
/// Color of the largest product in a heat map.
pub const HEAT_HOT: Color = Color::from_rgb_u8(0xff, 0x00, 0x00);

/// Maps a heat amount in `0.0..=1.0` onto the green-to-red scale.
#[must_use]
pub fn heat_color(amount: f64) -> Color {
    HEAT_COLD.lerp(HEAT_HOT, amount)
}

/// Background color of a board square.
#[must_use]
pub fn square_color(kind: SquareKind) -> Color {
    match kind {
        SquareKind::Plain => Color::from_rgb_u8(0xf5, 0xe6, 0xc8),
        SquareKind::DoubleLetter => Color::from_rgb_u8(0x9f, 0xd3, 0xf2),
        SquareKind::TripleLetter => Color::from_rgb_u8(0x2f, 0x7f, 0xc1),
        SquareKind::DoubleWord => Color::from_rgb_u8(0xf2, 0xa0, 0xa8),
    }
}

/// Image file showing the printed face of `tile`.
///
/// Blank tiles keep the blank image even after a letter was declared.
#[must_use]
pub fn tile_image(tile: &Tile) -> String {
    match tile.face() {
        wordgrid_core::TileFace::Letter(letter) => format!("Scrabble_Tile_{letter}.jpg"),
        wordgrid_core::TileFace::Blank => "Scrabble_Tile_Blank.jpg".to_owned(),
    }
}

/// Positioned node describing one realized table cell.
#[derive(Clone, Debug, PartialEq)]
pub struct CellNode {
    /// Identity of the cell on the surface.
    pub key: CellKey,
    /// Text shown inside the cell.
    pub text: String,
    /// Upper-left corner relative to the content origin.
    pub position: Vec2,
    /// Extent of the node.
    pub size: Vec2,
}

impl CellNode {
    /// Describes `cell` as an absolutely positioned node.
    #[must_use]
    pub fn from_cell(cell: &MaterializedCell) -> Self {
        let bounds = cell.bounds();
        Self {
            key: cell.key(),
            text: cell.value().to_string(),
            position: Vec2::new(bounds.left() as f32, bounds.top() as f32),
            size: Vec2::new(
                (bounds.right() - bounds.left()) as f32,
                (bounds.bottom() - bounds.top()) as f32,
            ),
        }
    }
}

/// Scrollable surface hosting absolutely positioned table cells.
pub trait DisplaySurface {
    /// Reserves the scrollable extent of the content.
    fn resize_content(&mut self, size: ContentSize) -> AnyResult<()>;

    /// Inserts a node. Nodes with an existing key are replaced.
    fn create_node(&mut self, node: CellNode) -> AnyResult<()>;

    /// Removes the node with `key`; missing nodes are ignored.
    fn remove_node(&mut self, key: CellKey) -> AnyResult<()>;

    /// Removes every node.
    fn clear(&mut self) -> AnyResult<()>;
}

/// Drop zone exposed to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DropTarget {
    /// A board square.
    Square {
        /// Column of the square.
        column: u32,
        /// Scoring type shown on the square.
        kind: SquareKind,
    },
    /// The rack, accepting tiles back from the board.
    Rack,
}

/// Capability of surfaces that support dragging tiles between zones.
pub trait DragDropSurface {
    /// Makes the tile at `source` draggable.
    fn register_drag_source(&mut self, source: TileSource, tile: Tile) -> AnyResult<()>;

    /// Makes `target` accept drops.
    fn register_drop_target(&mut self, target: DropTarget) -> AnyResult<()>;

    /// Forgets every registration ahead of a redraw.
    fn clear_registrations(&mut self) -> AnyResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use wordgrid_core::{CellCoord, CellSize, PixelPoint, TileFace, TileId};

    #[test]
    fn hex_uses_lower_case_byte_channels() {
        assert_eq!(Color::from_rgb_u8(0x1a, 0x2b, 0x3c).to_hex(), "#1a2b3c");
    }

    #[test]
    fn heat_scale_truncates_midpoints() {
        assert_eq!(heat_color(0.0).to_hex(), "#00ff00");
        assert_eq!(heat_color(1.0).to_hex(), "#ff0000");
        assert_eq!(heat_color(0.5).to_hex(), "#7f7f00");
        assert_eq!(heat_color(f64::NAN).to_hex(), "#00ff00");
    }

    #[test]
    fn premium_squares_stand_out_from_plain_ones() {
        let plain = square_color(SquareKind::Plain);
        for kind in [
            SquareKind::DoubleLetter,
            SquareKind::TripleLetter,
            SquareKind::DoubleWord,
        ] {
            assert_ne!(square_color(kind), plain);
        }
        assert_eq!(square_color(SquareKind::DoubleWord).to_hex(), "#f2a0a8");
    }

    #[test]
    fn cell_node_mirrors_cell_layout() {
        let cell = MaterializedCell::new(
            CellCoord::new(3, 4),
            PixelPoint::new(104, 96),
            CellSize::default(),
        );
        let node = CellNode::from_cell(&cell);

        assert_eq!(node.text, "12");
        assert_eq!(node.position, Vec2::new(104.0, 96.0));
        assert_eq!(node.size, Vec2::new(52.0, 32.0));
    }

    #[test]
    fn blank_tiles_keep_blank_image() {
        let blank = Tile::new(TileId::new(1), TileFace::Blank, 0).with_chosen_letter('E');
        let letter = Tile::new(TileId::new(2), TileFace::Letter('Q'), 10);

        assert_eq!(tile_image(&blank), "Scrabble_Tile_Blank.jpg");
        assert_eq!(tile_image(&letter), "Scrabble_Tile_Q.jpg");
    }
}
