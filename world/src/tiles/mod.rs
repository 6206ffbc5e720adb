//! Authoritative state of the tile board game.

pub mod bag;
pub mod board;

use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};
use wordgrid_core::{
    Dictionary, GameCommand, GameEvent, PieceSet, PlacementError, PlayError, ReturnError, Tile,
    TileSource, WordStatus, FULL_RACK_BONUS, MIN_WORD_LENGTH, RACK_SIZE,
};

use self::{bag::Bag, board::Board};

#[derive(Clone, Debug)]
struct GameAssets {
    pieces: Arc<PieceSet>,
    dictionary: Arc<Dictionary>,
}

/// Represents the authoritative game state.
///
/// Rack, board and bag are only mutated by [`apply`], one command at a time.
/// Until a [`GameCommand::Start`] arrives the world holds no tiles and refuses
/// every placement.
#[derive(Debug)]
pub struct GameWorld {
    assets: Option<GameAssets>,
    rng: ChaCha8Rng,
    bag: Bag,
    board: Board,
    rack: Vec<Tile>,
    score: u32,
}

impl GameWorld {
    /// Creates an idle world awaiting [`GameCommand::Start`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            assets: None,
            rng: ChaCha8Rng::seed_from_u64(0),
            bag: Bag::default(),
            board: Board::default(),
            rack: Vec::new(),
            score: 0,
        }
    }

    fn restart(&mut self, out_events: &mut Vec<GameEvent>) {
        let Some(assets) = self.assets.as_ref() else {
            return;
        };

        self.bag = Bag::from_pieces(&assets.pieces, &mut self.rng);
        self.board = Board::default();
        self.rack.clear();
        self.score = 0;
        info!(tiles = self.bag.tiles_left(), "game started");
        out_events.push(GameEvent::GameStarted {
            tiles_in_bag: self.bag.tiles_left(),
        });
        self.refill_rack(out_events);
    }

    fn refill_rack(&mut self, out_events: &mut Vec<GameEvent>) {
        let needed = RACK_SIZE.saturating_sub(self.rack.len());
        if needed == 0 {
            return;
        }

        let drawn = self.bag.draw(needed);
        if drawn.is_empty() {
            debug!("bag exhausted, rack left short");
            return;
        }
        self.rack.extend_from_slice(&drawn);
        out_events.push(GameEvent::RackRefilled { drawn });
    }

    fn source_tile(&self, source: TileSource) -> Option<Tile> {
        match source {
            TileSource::Rack { index } => self.rack.get(index).copied(),
            TileSource::Board { column } => self.board.get_tile(column, 0).copied(),
        }
    }

    fn place(
        &mut self,
        source: TileSource,
        column: u32,
        chosen_letter: Option<char>,
    ) -> Result<Tile, PlacementError> {
        if self.assets.is_none() {
            return Err(PlacementError::NotStarted);
        }

        let tile = self
            .source_tile(source)
            .ok_or(PlacementError::MissingTile)?;
        let lifted = match source {
            TileSource::Board { column } => Some(column),
            TileSource::Rack { .. } => None,
        };
        self.board.accepts(column, lifted)?;

        let tile = if tile.needs_letter() {
            let letter = chosen_letter.ok_or(PlacementError::UndeclaredBlank)?;
            tile.with_chosen_letter(normalize_letter(letter)?)
        } else {
            tile
        };

        match source {
            TileSource::Rack { index } => {
                let _ = self.rack.remove(index);
            }
            TileSource::Board { column } => {
                let _ = self.board.take_tile(column, 0);
            }
        }
        self.board.place_tile(column, 0, tile)?;
        Ok(tile)
    }

    fn play(&mut self, out_events: &mut Vec<GameEvent>) {
        let word = self.board.word();
        let status = self
            .assets
            .as_ref()
            .map_or(WordStatus::NoWord, |assets| {
                classify_word(&word, &assets.dictionary)
            });

        if status != WordStatus::Valid {
            let reason = if word.is_empty() {
                PlayError::NoWord
            } else if word.chars().count() < MIN_WORD_LENGTH {
                PlayError::TooShort
            } else {
                PlayError::NotInDictionary
            };
            warn!(%word, ?reason, "play rejected");
            out_events.push(GameEvent::PlayRejected { word, reason });
            return;
        }

        let score = self.board.calculate_score();
        let bonus = if word.chars().count() == RACK_SIZE {
            FULL_RACK_BONUS
        } else {
            0
        };
        self.score = self.score.saturating_add(score).saturating_add(bonus);
        info!(%word, score, bonus, total = self.score, "word played");
        out_events.push(GameEvent::WordPlayed {
            word,
            score,
            bonus,
            total: self.score,
        });

        self.refill_rack(out_events);
        let _ = self.board.clear();
        out_events.push(GameEvent::BoardCleared);
    }
}

impl Default for GameWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut GameWorld, command: GameCommand, out_events: &mut Vec<GameEvent>) {
    match command {
        GameCommand::Start {
            pieces,
            dictionary,
            seed,
        } => {
            world.assets = Some(GameAssets { pieces, dictionary });
            world.rng = ChaCha8Rng::seed_from_u64(seed);
            world.restart(out_events);
        }
        GameCommand::PlaceTile {
            source,
            column,
            chosen_letter,
        } => match world.place(source, column, chosen_letter) {
            Ok(tile) => out_events.push(GameEvent::TilePlaced {
                tile,
                source,
                column,
            }),
            Err(reason) => {
                debug!(?source, column, ?reason, "placement rejected");
                out_events.push(GameEvent::PlacementRejected {
                    source,
                    column,
                    reason,
                });
            }
        },
        GameCommand::ReturnTile { column } => {
            if column >= world.board.width() {
                out_events.push(GameEvent::ReturnRejected {
                    column,
                    reason: ReturnError::OutOfBounds,
                });
                return;
            }
            match world.board.take_tile(column, 0) {
                Some(tile) => {
                    let tile = tile.undeclared();
                    world.rack.push(tile);
                    out_events.push(GameEvent::TileReturned { tile, column });
                }
                None => out_events.push(GameEvent::ReturnRejected {
                    column,
                    reason: ReturnError::EmptySquare,
                }),
            }
        }
        GameCommand::PlayWord => world.play(out_events),
        GameCommand::NewHand => {
            if world.assets.is_some() {
                world.refill_rack(out_events);
            }
        }
        GameCommand::Reset => {
            if world.assets.is_none() {
                debug!("reset ignored, no game in progress");
                return;
            }
            world.restart(out_events);
        }
    }
}

/// Classifies `word` against `dictionary`.
#[must_use]
pub fn classify_word(word: &str, dictionary: &Dictionary) -> WordStatus {
    if word.is_empty() {
        WordStatus::NoWord
    } else if word.chars().count() < MIN_WORD_LENGTH || !dictionary.contains(word) {
        WordStatus::Invalid
    } else {
        WordStatus::Valid
    }
}

fn normalize_letter(letter: char) -> Result<char, PlacementError> {
    if letter.is_ascii_alphabetic() {
        Ok(letter.to_ascii_uppercase())
    } else {
        Err(PlacementError::InvalidLetter)
    }
}

/// Query functions that provide read-only access to the game state.
pub mod query {
    use wordgrid_core::{PlacementError, Tile, TileSource, WordStatus};

    use super::{board::Square, classify_word, GameWorld};

    /// Reports whether a game is in progress.
    #[must_use]
    pub fn is_started(world: &GameWorld) -> bool {
        world.assets.is_some()
    }

    /// Tiles on the rack in rack order.
    #[must_use]
    pub fn rack(world: &GameWorld) -> &[Tile] {
        &world.rack
    }

    /// Number of tiles left in the bag.
    #[must_use]
    pub fn tiles_left(world: &GameWorld) -> usize {
        world.bag.tiles_left()
    }

    /// Running total score.
    #[must_use]
    pub fn total_score(world: &GameWorld) -> u32 {
        world.score
    }

    /// Tiles currently held by the bag, the rack and the board combined.
    #[must_use]
    pub fn tiles_in_play(world: &GameWorld) -> usize {
        world.bag.tiles_left() + world.rack.len() + world.board.tile_count()
    }

    /// Exposes a read-only view of the board.
    #[must_use]
    pub fn board_view(world: &GameWorld) -> BoardView<'_> {
        BoardView { world }
    }

    /// Captures the values a front end displays after every action.
    #[must_use]
    pub fn summary(world: &GameWorld) -> GameSummary {
        let view = board_view(world);
        GameSummary {
            rack: world.rack.clone(),
            squares: world.board.squares().to_vec(),
            tiles_left: world.bag.tiles_left(),
            total_score: world.score,
            round_score: world.board.calculate_score(),
            word: view.word(),
            word_status: view.word_status(),
        }
    }

    /// Read-only view of the board and its drop rules.
    #[derive(Clone, Copy, Debug)]
    pub struct BoardView<'a> {
        world: &'a GameWorld,
    }

    impl<'a> BoardView<'a> {
        /// Number of squares in the row.
        #[must_use]
        pub fn width(&self) -> u32 {
            self.world.board.width()
        }

        /// Squares in column order.
        #[must_use]
        pub fn squares(&self) -> &'a [Square] {
            self.world.board.squares()
        }

        /// Tile resting on `column`, if any.
        #[must_use]
        pub fn tile(&self, column: u32) -> Option<&'a Tile> {
            self.world.board.get_tile(column, 0)
        }

        /// Accept predicate for dropping the tile from `source` on `column`.
        ///
        /// Mirrors the world's own checks except for blank-letter declaration,
        /// which is resolved after a drop is accepted.
        pub fn accepts(&self, source: TileSource, column: u32) -> Result<(), PlacementError> {
            if self.world.assets.is_none() {
                return Err(PlacementError::NotStarted);
            }
            let lifted = match source {
                TileSource::Rack { index } => {
                    if self.world.rack.get(index).is_none() {
                        return Err(PlacementError::MissingTile);
                    }
                    None
                }
                TileSource::Board { column: from } => {
                    if self.tile(from).is_none() {
                        return Err(PlacementError::MissingTile);
                    }
                    Some(from)
                }
            };
            self.world.board.accepts(column, lifted)
        }

        /// Word spelled by the first run of tiles.
        #[must_use]
        pub fn word(&self) -> String {
            self.world.board.word()
        }

        /// Round score of the current word.
        #[must_use]
        pub fn score(&self) -> u32 {
            self.world.board.calculate_score()
        }

        /// Validity classification of the current word.
        #[must_use]
        pub fn word_status(&self) -> WordStatus {
            let word = self.word();
            match self.world.assets.as_ref() {
                Some(assets) => classify_word(&word, &assets.dictionary),
                None if word.is_empty() => WordStatus::NoWord,
                None => WordStatus::Invalid,
            }
        }
    }

    /// Snapshot of everything a front end displays.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct GameSummary {
        /// Tiles on the rack.
        pub rack: Vec<Tile>,
        /// Board squares in column order.
        pub squares: Vec<Square>,
        /// Tiles left in the bag.
        pub tiles_left: usize,
        /// Running total score.
        pub total_score: u32,
        /// Score of the word currently on the board.
        pub round_score: u32,
        /// Word currently on the board.
        pub word: String,
        /// Classification of the current word.
        pub word_status: WordStatus,
    }
}
