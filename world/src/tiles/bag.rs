//! Pool of undrawn tiles.

use rand::Rng;
use tracing::warn;
use wordgrid_core::{PieceSet, Tile, TileFace, TileId};

/// Shuffled sequence of undrawn tiles. Draws take from the end.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bag {
    tiles: Vec<Tile>,
}

impl Bag {
    /// Expands the frequency table into tiles and shuffles them.
    ///
    /// Entries with an unrecognized face code are skipped. Tile identifiers
    /// are assigned in expansion order, before shuffling.
    pub fn from_pieces<R: Rng + ?Sized>(pieces: &PieceSet, rng: &mut R) -> Self {
        let mut tiles = Vec::with_capacity(pieces.total_tiles());
        let mut next_id = 0_u32;
        for piece in &pieces.pieces {
            let Some(face) = TileFace::from_code(&piece.letter) else {
                warn!(letter = %piece.letter, "skipping piece with unknown face");
                continue;
            };
            for _ in 0..piece.amount {
                tiles.push(Tile::new(TileId::new(next_id), face, piece.value));
                next_id = next_id.saturating_add(1);
            }
        }

        let mut bag = Self { tiles };
        bag.shuffle(rng);
        bag
    }

    /// Applies a uniform Fisher–Yates permutation.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for index in (1..self.tiles.len()).rev() {
            let swap_index = rng.gen_range(0..=index);
            self.tiles.swap(index, swap_index);
        }
    }

    /// Removes and returns the last `count` tiles, or every remaining tile
    /// when fewer are left.
    pub fn draw(&mut self, count: usize) -> Vec<Tile> {
        let split = self.tiles.len().saturating_sub(count);
        self.tiles.split_off(split)
    }

    /// Number of tiles still in the bag.
    #[must_use]
    pub fn tiles_left(&self) -> usize {
        self.tiles.len()
    }

    /// Tiles in draw order, last drawn first.
    #[cfg(test)]
    pub(crate) fn tiles(&self) -> &[Tile] {
        &self.tiles
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use wordgrid_core::PieceSpec;

    use super::*;

    fn pieces() -> PieceSet {
        PieceSet {
            pieces: vec![
                PieceSpec {
                    letter: "A".to_owned(),
                    amount: 9,
                    value: 1,
                },
                PieceSpec {
                    letter: "Z".to_owned(),
                    amount: 1,
                    value: 10,
                },
                PieceSpec {
                    letter: "Blank".to_owned(),
                    amount: 2,
                    value: 0,
                },
                PieceSpec {
                    letter: "??".to_owned(),
                    amount: 4,
                    value: 3,
                },
            ],
        }
    }

    #[test]
    fn expansion_skips_unknown_faces() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let bag = Bag::from_pieces(&pieces(), &mut rng);
        assert_eq!(bag.tiles_left(), 12);
        assert_eq!(bag.tiles().iter().filter(|tile| tile.is_blank()).count(), 2);
    }

    #[test]
    fn draw_removes_exactly_the_requested_tiles() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut bag = Bag::from_pieces(&pieces(), &mut rng);
        let expected: Vec<Tile> = bag.tiles()[5..].to_vec();

        let drawn = bag.draw(7);

        assert_eq!(drawn, expected);
        assert_eq!(bag.tiles_left(), 5);
    }

    #[test]
    fn draw_past_exhaustion_returns_the_remainder() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut bag = Bag::from_pieces(&pieces(), &mut rng);

        assert_eq!(bag.draw(20).len(), 12);
        assert!(bag.draw(3).is_empty());
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let mut bag = Bag::from_pieces(&pieces(), &mut rng);
        let mut before: Vec<u32> = bag.tiles().iter().map(|tile| tile.id().get()).collect();

        bag.shuffle(&mut rng);

        let mut after: Vec<u32> = bag.tiles().iter().map(|tile| tile.id().get()).collect();
        before.sort_unstable();
        after.sort_unstable();
        assert_eq!(before, after);
    }

    #[test]
    fn same_seed_yields_same_order() {
        let first = Bag::from_pieces(&pieces(), &mut ChaCha8Rng::seed_from_u64(3));
        let second = Bag::from_pieces(&pieces(), &mut ChaCha8Rng::seed_from_u64(3));
        assert_eq!(first, second);
    }
}
