//! Single-row board of typed squares.

use wordgrid_core::{PlacementError, SquareKind, Tile, DEFAULT_BOARD_LAYOUT};

/// Square of the board together with the tile it holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Square {
    /// Scoring type of the square.
    pub kind: SquareKind,
    /// Tile resting on the square, if any.
    pub tile: Option<Tile>,
}

/// Board of typed squares addressed by `(x, y)`.
///
/// Only a single row exists, so every valid address has `y == 0`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    squares: Vec<Square>,
}

impl Default for Board {
    fn default() -> Self {
        Self::with_layout(&DEFAULT_BOARD_LAYOUT)
    }
}

impl Board {
    /// Number of rows on the board.
    pub const ROWS: u32 = 1;

    /// Creates an empty board with the provided square layout.
    #[must_use]
    pub fn with_layout(layout: &[SquareKind]) -> Self {
        Self {
            squares: layout
                .iter()
                .map(|&kind| Square { kind, tile: None })
                .collect(),
        }
    }

    /// Number of squares in the row.
    #[must_use]
    pub fn width(&self) -> u32 {
        u32::try_from(self.squares.len()).unwrap_or(u32::MAX)
    }

    /// Squares in column order.
    #[must_use]
    pub fn squares(&self) -> &[Square] {
        &self.squares
    }

    /// Tile at `(x, y)`, if any.
    #[must_use]
    pub fn get_tile(&self, x: u32, y: u32) -> Option<&Tile> {
        self.square(x, y).and_then(|square| square.tile.as_ref())
    }

    /// Puts `tile` on the empty square at `(x, y)`.
    pub fn place_tile(&mut self, x: u32, y: u32, tile: Tile) -> Result<(), PlacementError> {
        let square = self.square_mut(x, y).ok_or(PlacementError::OutOfBounds)?;
        if square.tile.is_some() {
            return Err(PlacementError::Occupied);
        }
        square.tile = Some(tile);
        Ok(())
    }

    /// Lifts the tile at `(x, y)` off the board.
    pub fn take_tile(&mut self, x: u32, y: u32) -> Option<Tile> {
        self.square_mut(x, y).and_then(|square| square.tile.take())
    }

    /// Empties every square, returning the lifted tiles in column order.
    pub fn clear(&mut self) -> Vec<Tile> {
        self.squares
            .iter_mut()
            .filter_map(|square| square.tile.take())
            .collect()
    }

    /// Reports whether any square holds a tile.
    #[must_use]
    pub fn has_any_tile(&self) -> bool {
        self.squares.iter().any(|square| square.tile.is_some())
    }

    /// Number of tiles on the board.
    #[must_use]
    pub fn tile_count(&self) -> usize {
        self.squares.iter().filter(|square| square.tile.is_some()).count()
    }

    /// Checks whether a tile may be dropped on `column`.
    ///
    /// `lifted` names a square whose tile is being moved; it counts as empty
    /// for the adjacency rule. The first tile on an otherwise empty board may
    /// go anywhere.
    pub fn accepts(&self, column: u32, lifted: Option<u32>) -> Result<(), PlacementError> {
        let square = self.square(column, 0).ok_or(PlacementError::OutOfBounds)?;
        if square.tile.is_some() {
            return Err(PlacementError::Occupied);
        }

        let occupied_elsewhere = self
            .squares
            .iter()
            .enumerate()
            .any(|(index, square)| square.tile.is_some() && Some(index) != lifted.map(as_index));
        if !occupied_elsewhere {
            return Ok(());
        }

        if self.has_adjacent_tile_ignoring(column, 0, lifted) {
            Ok(())
        } else {
            Err(PlacementError::NotAdjacent)
        }
    }

    /// Word spelled by the first contiguous run of tiles, scanning from the
    /// left. Tiles after the first gap are ignored.
    #[must_use]
    pub fn word(&self) -> String {
        self.first_run()
            .map(|(_, tile)| tile.letter().unwrap_or('?'))
            .collect()
    }

    /// Sums letter-multiplied tile values of the word run.
    ///
    /// Tiles after the first gap do not score. Double-word squares feed
    /// [`Board::word_multiplier`] but the multiplier is not applied to the
    /// returned sum.
    #[must_use]
    pub fn calculate_score(&self) -> u32 {
        self.first_run()
            .map(|(kind, tile)| tile.value().saturating_mul(kind.letter_multiplier()))
            .fold(0_u32, u32::saturating_add)
    }

    /// Product of the word multipliers of the squares covered by the word run.
    #[must_use]
    pub fn word_multiplier(&self) -> u32 {
        self.first_run()
            .map(|(kind, _)| kind.word_multiplier())
            .fold(1_u32, u32::saturating_mul)
    }

    fn first_run(&self) -> impl Iterator<Item = (SquareKind, Tile)> + '_ {
        self.squares
            .iter()
            .skip_while(|square| square.tile.is_none())
            .map_while(|square| square.tile.map(|tile| (square.kind, tile)))
    }

    fn has_adjacent_tile_ignoring(&self, x: u32, y: u32, lifted: Option<u32>) -> bool {
        const DIRECTIONS: [(i64, i64); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

        DIRECTIONS.iter().any(|(dx, dy)| {
            let nx = i64::from(x) + dx;
            let ny = i64::from(y) + dy;
            let (Ok(nx), Ok(ny)) = (u32::try_from(nx), u32::try_from(ny)) else {
                return false;
            };
            if lifted == Some(nx) && ny == 0 {
                return false;
            }
            self.get_tile(nx, ny).is_some()
        })
    }

    fn square(&self, x: u32, y: u32) -> Option<&Square> {
        if y >= Self::ROWS {
            return None;
        }
        self.squares.get(as_index(x))
    }

    fn square_mut(&mut self, x: u32, y: u32) -> Option<&mut Square> {
        if y >= Self::ROWS {
            return None;
        }
        self.squares.get_mut(as_index(x))
    }
}

fn as_index(column: u32) -> usize {
    usize::try_from(column).unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use wordgrid_core::{TileFace, TileId};

    use super::*;

    fn tile(letter: char, value: u32) -> Tile {
        Tile::new(TileId::new(u32::from(letter)), TileFace::Letter(letter), value)
    }

    fn board_with(tiles: &[(u32, char, u32)]) -> Board {
        let mut board = Board::default();
        for &(column, letter, value) in tiles {
            board
                .place_tile(column, 0, tile(letter, value))
                .expect("square is free");
        }
        board
    }

    #[test]
    fn first_tile_may_go_anywhere() {
        let board = Board::default();
        for column in 0..board.width() {
            assert_eq!(board.accepts(column, None), Ok(()));
        }
    }

    #[test]
    fn later_tiles_must_touch_an_existing_tile() {
        let board = board_with(&[(5, 'A', 1)]);
        assert_eq!(board.accepts(7, None), Err(PlacementError::NotAdjacent));
        assert_eq!(board.accepts(6, None), Ok(()));
        assert_eq!(board.accepts(4, None), Ok(()));
        assert_eq!(board.accepts(5, None), Err(PlacementError::Occupied));
        assert_eq!(board.accepts(15, None), Err(PlacementError::OutOfBounds));
    }

    #[test]
    fn moving_the_only_tile_is_unrestricted() {
        let board = board_with(&[(5, 'A', 1)]);
        assert_eq!(board.accepts(11, Some(5)), Ok(()));
    }

    #[test]
    fn lifted_tile_is_not_its_own_neighbour() {
        let board = board_with(&[(3, 'C', 3), (4, 'A', 1)]);
        assert_eq!(board.accepts(5, Some(4)), Err(PlacementError::NotAdjacent));
        assert_eq!(board.accepts(2, Some(4)), Ok(()));
    }

    #[test]
    fn word_stops_at_first_gap() {
        let board = board_with(&[(1, 'C', 3), (2, 'A', 1), (3, 'T', 1), (5, 'S', 1)]);
        assert_eq!(board.word(), "CAT");
    }

    #[test]
    fn empty_board_spells_nothing() {
        assert_eq!(Board::default().word(), "");
        assert_eq!(Board::default().calculate_score(), 0);
    }

    #[test]
    fn score_applies_letter_multipliers_only() {
        // TL at 0, DW at 2.
        let board = board_with(&[(0, 'C', 3), (1, 'A', 1), (2, 'T', 1)]);
        assert_eq!(board.calculate_score(), 3 * 3 + 1 + 1);
        assert_eq!(board.word_multiplier(), 2);
    }

    #[test]
    fn score_ignores_tiles_after_a_gap() {
        let board = board_with(&[(3, 'A', 1), (4, 'T', 1), (6, 'Q', 10)]);
        assert_eq!(board.calculate_score(), 2);
        assert_eq!(board.word(), "AT");
    }

    #[test]
    fn clear_returns_every_tile() {
        let mut board = board_with(&[(3, 'A', 1), (4, 'T', 1)]);
        assert_eq!(board.clear().len(), 2);
        assert!(!board.has_any_tile());
    }

    #[test]
    fn second_row_is_out_of_bounds() {
        let mut board = Board::default();
        assert_eq!(
            board.place_tile(0, 1, tile('A', 1)),
            Err(PlacementError::OutOfBounds)
        );
        assert!(!board.has_any_tile());
    }
}
