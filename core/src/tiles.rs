//! Contracts for the single-row tile board game.

use std::{collections::HashSet, sync::Arc};

use serde::{Deserialize, Serialize};

/// Commands that express all permissible game mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum GameCommand {
    /// Starts a new game from loaded assets.
    Start {
        /// Tile frequency table used to fill the bag.
        pieces: Arc<PieceSet>,
        /// Words accepted by the validity check.
        dictionary: Arc<Dictionary>,
        /// Seed for the bag shuffle.
        seed: u64,
    },
    /// Moves a tile from the rack or another square onto the board.
    PlaceTile {
        /// Where the dragged tile came from.
        source: TileSource,
        /// Board square receiving the tile.
        column: u32,
        /// Letter declared for an undeclared blank tile.
        chosen_letter: Option<char>,
    },
    /// Moves a tile from the board back onto the rack.
    ReturnTile {
        /// Board square holding the tile.
        column: u32,
    },
    /// Scores the word on the board.
    PlayWord,
    /// Tops the rack up from the bag.
    NewHand,
    /// Restarts the game with the previously loaded assets.
    Reset,
}

/// Events broadcast by the game world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    /// Confirms that a new game began.
    GameStarted {
        /// Tiles placed in the bag before the first draw.
        tiles_in_bag: usize,
    },
    /// Reports the tiles drawn onto the rack.
    RackRefilled {
        /// Tiles that were drawn, in draw order.
        drawn: Vec<Tile>,
    },
    /// Confirms that a tile landed on the board.
    TilePlaced {
        /// Tile as it now sits on the board.
        tile: Tile,
        /// Where the tile came from.
        source: TileSource,
        /// Square that received the tile.
        column: u32,
    },
    /// Reports that a drop was refused without mutating state.
    PlacementRejected {
        /// Where the dragged tile came from.
        source: TileSource,
        /// Square the tile was dropped on.
        column: u32,
        /// Why the drop was refused.
        reason: PlacementError,
    },
    /// Confirms that a tile moved from the board back onto the rack.
    TileReturned {
        /// Tile as it now sits on the rack.
        tile: Tile,
        /// Square the tile left.
        column: u32,
    },
    /// Reports that a return request was refused.
    ReturnRejected {
        /// Square named by the request.
        column: u32,
        /// Why the request was refused.
        reason: ReturnError,
    },
    /// Confirms that a word was scored.
    WordPlayed {
        /// Word spelled on the board.
        word: String,
        /// Tile score of the word.
        score: u32,
        /// Bonus added on top of the tile score.
        bonus: u32,
        /// Running total after the play.
        total: u32,
    },
    /// Reports that a play was refused without mutating state.
    PlayRejected {
        /// Word found on the board, possibly empty.
        word: String,
        /// Why the play was refused.
        reason: PlayError,
    },
    /// Confirms that every square was emptied.
    BoardCleared,
}

/// Unique identifier assigned to a tile when the bag is filled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(u32);

impl TileId {
    /// Creates a new tile identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Printed face of a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileFace {
    /// A fixed upper-case letter.
    Letter(char),
    /// A wildcard whose letter is chosen when it is placed.
    Blank,
}

impl TileFace {
    /// Spelling of the blank face in piece definitions.
    pub const BLANK_CODE: &'static str = "Blank";

    /// Parses a piece definition letter such as `"Q"` or `"Blank"`.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        if code == Self::BLANK_CODE {
            return Some(Self::Blank);
        }

        let mut chars = code.chars();
        match (chars.next(), chars.next()) {
            (Some(letter), None) if letter.is_ascii_alphabetic() => {
                Some(Self::Letter(letter.to_ascii_uppercase()))
            }
            _ => None,
        }
    }
}

/// A lettered tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    id: TileId,
    face: TileFace,
    value: u32,
    chosen_letter: Option<char>,
}

impl Tile {
    /// Creates an undeclared tile.
    #[must_use]
    pub const fn new(id: TileId, face: TileFace, value: u32) -> Self {
        Self {
            id,
            face,
            value,
            chosen_letter: None,
        }
    }

    /// Identifier of the tile.
    #[must_use]
    pub const fn id(&self) -> TileId {
        self.id
    }

    /// Printed face of the tile.
    #[must_use]
    pub const fn face(&self) -> TileFace {
        self.face
    }

    /// Point value of the tile.
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.value
    }

    /// Letter declared for a blank tile, if any.
    #[must_use]
    pub const fn chosen_letter(&self) -> Option<char> {
        self.chosen_letter
    }

    /// Reports whether the tile is a wildcard.
    #[must_use]
    pub const fn is_blank(&self) -> bool {
        matches!(self.face, TileFace::Blank)
    }

    /// Reports whether the tile is a blank still waiting for a letter.
    #[must_use]
    pub const fn needs_letter(&self) -> bool {
        self.is_blank() && self.chosen_letter.is_none()
    }

    /// Letter the tile contributes to a word.
    ///
    /// Blank tiles contribute their chosen letter, or nothing while undeclared.
    #[must_use]
    pub const fn letter(&self) -> Option<char> {
        match self.face {
            TileFace::Letter(letter) => Some(letter),
            TileFace::Blank => self.chosen_letter,
        }
    }

    /// Returns a copy with `letter` declared. Lettered tiles are unchanged.
    #[must_use]
    pub const fn with_chosen_letter(self, letter: char) -> Self {
        match self.face {
            TileFace::Blank => Self {
                chosen_letter: Some(letter),
                ..self
            },
            TileFace::Letter(_) => self,
        }
    }

    /// Returns a copy with any declared letter cleared.
    #[must_use]
    pub const fn undeclared(self) -> Self {
        Self {
            chosen_letter: None,
            ..self
        }
    }
}

/// Scoring type of a board square.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SquareKind {
    /// No bonus.
    Plain,
    /// Doubles the letter value of the tile placed on it.
    DoubleLetter,
    /// Triples the letter value of the tile placed on it.
    TripleLetter,
    /// Doubles the word score.
    DoubleWord,
}

impl SquareKind {
    /// Parses a board layout code (`""`, `"DL"`, `"TL"`, `"DW"`).
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "" => Some(Self::Plain),
            "DL" => Some(Self::DoubleLetter),
            "TL" => Some(Self::TripleLetter),
            "DW" => Some(Self::DoubleWord),
            _ => None,
        }
    }

    /// Layout code of the square; empty for plain squares.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Plain => "",
            Self::DoubleLetter => "DL",
            Self::TripleLetter => "TL",
            Self::DoubleWord => "DW",
        }
    }

    /// Multiplier applied to the value of a tile on this square.
    #[must_use]
    pub const fn letter_multiplier(self) -> u32 {
        match self {
            Self::DoubleLetter => 2,
            Self::TripleLetter => 3,
            Self::Plain | Self::DoubleWord => 1,
        }
    }

    /// Multiplier this square contributes to the word score when covered.
    #[must_use]
    pub const fn word_multiplier(self) -> u32 {
        match self {
            Self::DoubleWord => 2,
            _ => 1,
        }
    }
}

/// Square layout of the default single-row board.
pub const DEFAULT_BOARD_LAYOUT: [SquareKind; 15] = [
    SquareKind::TripleLetter,
    SquareKind::Plain,
    SquareKind::DoubleWord,
    SquareKind::Plain,
    SquareKind::Plain,
    SquareKind::Plain,
    SquareKind::DoubleLetter,
    SquareKind::Plain,
    SquareKind::DoubleLetter,
    SquareKind::Plain,
    SquareKind::Plain,
    SquareKind::Plain,
    SquareKind::DoubleWord,
    SquareKind::Plain,
    SquareKind::TripleLetter,
];

/// Classification of the word currently spelled on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WordStatus {
    /// The board holds no tiles.
    NoWord,
    /// The word is too short or missing from the dictionary.
    Invalid,
    /// The word may be played.
    Valid,
}

/// Origin of a dragged tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileSource {
    /// A tile taken from the rack at `index`.
    Rack {
        /// Position of the tile on the rack.
        index: usize,
    },
    /// A tile moved from another board square.
    Board {
        /// Square currently holding the tile.
        column: u32,
    },
}

/// Reasons a tile drop may be refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// No game is in progress.
    NotStarted,
    /// The target square lies outside the board.
    OutOfBounds,
    /// The target square already holds a tile.
    Occupied,
    /// The board holds tiles and none of them neighbours the target.
    NotAdjacent,
    /// The source names no tile.
    MissingTile,
    /// A blank tile was dropped without a declared letter.
    UndeclaredBlank,
    /// The declared letter is not one of `A` through `Z`.
    InvalidLetter,
}

/// Reasons a return-to-rack request may be refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReturnError {
    /// The square lies outside the board.
    OutOfBounds,
    /// The square holds no tile.
    EmptySquare,
}

/// Reasons a play may be refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayError {
    /// The board spells nothing.
    NoWord,
    /// The word is shorter than the minimum length.
    TooShort,
    /// The word is missing from the dictionary.
    NotInDictionary,
}

/// Frequency table entry for one tile face.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceSpec {
    /// Face code, a single letter or `"Blank"`.
    pub letter: String,
    /// Number of copies placed in the bag.
    pub amount: u32,
    /// Point value of each copy.
    pub value: u32,
}

/// Tile frequency table loaded from the pieces definition.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceSet {
    /// Entries in definition order.
    pub pieces: Vec<PieceSpec>,
}

impl PieceSet {
    /// Total number of tiles described by the table.
    #[must_use]
    pub fn total_tiles(&self) -> usize {
        self.pieces
            .iter()
            .map(|piece| usize::try_from(piece.amount).unwrap_or(0))
            .sum()
    }
}

/// Set of playable words, stored upper-case.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dictionary {
    words: HashSet<String>,
}

impl Dictionary {
    /// Parses a newline-separated word list; tokens are trimmed and upper-cased.
    #[must_use]
    pub fn from_word_list(text: &str) -> Self {
        text.lines().collect()
    }

    /// Reports whether `word` is playable, ignoring case.
    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.trim().to_uppercase())
    }

    /// Number of distinct words.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Reports whether the dictionary holds no words.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for Dictionary {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let words = iter
            .into_iter()
            .map(|word| word.trim().to_uppercase())
            .filter(|word| !word.is_empty())
            .collect();
        Self { words }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_codes_parse() {
        assert_eq!(TileFace::from_code("q"), Some(TileFace::Letter('Q')));
        assert_eq!(TileFace::from_code("Blank"), Some(TileFace::Blank));
        assert_eq!(TileFace::from_code("QU"), None);
        assert_eq!(TileFace::from_code("7"), None);
    }

    #[test]
    fn blank_tile_spells_its_chosen_letter() {
        let blank = Tile::new(TileId::new(0), TileFace::Blank, 0);
        assert!(blank.needs_letter());
        assert_eq!(blank.letter(), None);

        let declared = blank.with_chosen_letter('K');
        assert_eq!(declared.letter(), Some('K'));
        assert_eq!(declared.undeclared().letter(), None);
    }

    #[test]
    fn lettered_tile_ignores_declarations() {
        let tile = Tile::new(TileId::new(1), TileFace::Letter('A'), 1);
        assert_eq!(tile.with_chosen_letter('Z').letter(), Some('A'));
    }

    #[test]
    fn dictionary_normalizes_case_and_whitespace() {
        let dictionary = Dictionary::from_word_list("cat\r\n Dog \n\nbird");
        assert_eq!(dictionary.len(), 3);
        assert!(dictionary.contains("CAT"));
        assert!(dictionary.contains("dog"));
        assert!(!dictionary.contains(""));
    }

    #[test]
    fn piece_set_parses_reference_json() {
        let json = r#"{"pieces":[{"letter":"A","amount":9,"value":1},{"letter":"Blank","amount":2,"value":0}]}"#;
        let pieces: PieceSet = serde_json::from_str(json).expect("pieces parse");
        assert_eq!(pieces.total_tiles(), 11);
        assert_eq!(pieces.pieces[1].letter, TileFace::BLANK_CODE);
    }

    #[test]
    fn square_codes_round_trip() {
        for kind in DEFAULT_BOARD_LAYOUT {
            assert_eq!(SquareKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(SquareKind::DoubleWord.word_multiplier(), 2);
        assert_eq!(SquareKind::TripleLetter.letter_multiplier(), 3);
    }
}
