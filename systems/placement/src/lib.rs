#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure tile-drop system responsible for emitting placement and return commands.
//!
//! Adapters report gestures as [`PlacementInput`]; the system checks them
//! against the world's board view and, for blank tiles, suspends on a
//! [`BlankLetterPrompt`] before committing. A cancelled prompt produces no
//! command, leaving the tile where it was.

use tracing::debug;
use wordgrid_core::{GameCommand, GameEvent, PlacementError, Tile, TileSource};
use wordgrid_world::tiles::query::BoardView;

/// Asks the player which letter a blank tile stands for.
pub trait BlankLetterPrompt {
    /// Returns the chosen letter, or `None` when the player cancels.
    fn choose(&mut self, tile: &Tile) -> Option<char>;
}

impl<F> BlankLetterPrompt for F
where
    F: FnMut(&Tile) -> Option<char>,
{
    fn choose(&mut self, tile: &Tile) -> Option<char> {
        self(tile)
    }
}

/// Drop of a dragged tile onto a board square.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DropRequest {
    /// Where the dragged tile comes from.
    pub source: TileSource,
    /// Target board column.
    pub column: u32,
}

impl DropRequest {
    /// Creates a new drop descriptor.
    #[must_use]
    pub const fn new(source: TileSource, column: u32) -> Self {
        Self { source, column }
    }
}

/// Highlight state for a potential drop target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DropPreview {
    /// Drop being previewed.
    pub request: DropRequest,
    /// Indicates whether the board would accept the drop.
    pub placeable: bool,
}

/// Input snapshot distilled from adapter gestures.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlacementInput {
    /// Tile dropped on a board square during this step.
    pub dropped: Option<DropRequest>,
    /// Board column whose tile was dragged back onto the rack.
    pub returned: Option<u32>,
}

impl PlacementInput {
    /// Input carrying a single board drop.
    #[must_use]
    pub const fn drop(request: DropRequest) -> Self {
        Self {
            dropped: Some(request),
            returned: None,
        }
    }

    /// Input carrying a single return to the rack.
    #[must_use]
    pub const fn return_to_rack(column: u32) -> Self {
        Self {
            dropped: None,
            returned: Some(column),
        }
    }
}

/// What the system did with a drop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropOutcome {
    /// A placement command was emitted.
    Submitted,
    /// The board refused the drop; the tile reverts.
    Rejected(PlacementError),
    /// The blank-letter prompt was cancelled; the tile reverts.
    Cancelled,
}

/// Tile-drop system that turns gestures into game commands.
#[derive(Debug, Default)]
pub struct Placement {
    started: bool,
}

impl Placement {
    /// Creates a new placement system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self { started: false }
    }

    /// Consumes world events and adapter input to emit placement commands.
    ///
    /// `rack` should mirror the world's `query::rack`. The prompt is only
    /// consulted for accepted drops of undeclared blank tiles.
    pub fn handle<P>(
        &mut self,
        events: &[GameEvent],
        board: BoardView<'_>,
        rack: &[Tile],
        input: PlacementInput,
        prompt: &mut P,
        out: &mut Vec<GameCommand>,
    ) -> Option<DropOutcome>
    where
        P: BlankLetterPrompt + ?Sized,
    {
        for event in events {
            if let GameEvent::GameStarted { .. } = event {
                self.started = true;
            }
        }

        if !self.started {
            return input
                .dropped
                .map(|_| DropOutcome::Rejected(PlacementError::NotStarted));
        }

        if let Some(column) = input.returned {
            if board.tile(column).is_some() {
                out.push(GameCommand::ReturnTile { column });
            }
        }

        input
            .dropped
            .map(|request| self.submit_drop(request, board, rack, prompt, out))
    }

    /// Evaluates whether `request` would be accepted, for hover highlighting.
    #[must_use]
    pub fn preview(&self, board: BoardView<'_>, request: DropRequest) -> DropPreview {
        DropPreview {
            request,
            placeable: board.accepts(request.source, request.column).is_ok(),
        }
    }

    fn submit_drop<P>(
        &self,
        request: DropRequest,
        board: BoardView<'_>,
        rack: &[Tile],
        prompt: &mut P,
        out: &mut Vec<GameCommand>,
    ) -> DropOutcome
    where
        P: BlankLetterPrompt + ?Sized,
    {
        if let Err(reason) = board.accepts(request.source, request.column) {
            debug!(?request, ?reason, "drop refused");
            return DropOutcome::Rejected(reason);
        }

        let tile = match request.source {
            TileSource::Rack { index } => rack.get(index).copied(),
            TileSource::Board { column } => board.tile(column).copied(),
        };
        let Some(tile) = tile else {
            return DropOutcome::Rejected(PlacementError::MissingTile);
        };

        let chosen_letter = if tile.needs_letter() {
            match prompt.choose(&tile) {
                Some(letter) => Some(letter),
                None => {
                    debug!(?request, "blank letter prompt cancelled");
                    return DropOutcome::Cancelled;
                }
            }
        } else {
            None
        };

        out.push(GameCommand::PlaceTile {
            source: request.source,
            column: request.column,
            chosen_letter,
        });
        DropOutcome::Submitted
    }
}

/// Prompt that always cancels; useful where no player can answer.
#[derive(Clone, Copy, Debug, Default)]
pub struct CancelPrompt;

impl BlankLetterPrompt for CancelPrompt {
    fn choose(&mut self, _tile: &Tile) -> Option<char> {
        None
    }
}
