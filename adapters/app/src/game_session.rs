//! Tile game wired to a drag and drop surface.

use anyhow::{Context, Result};
use tracing::{debug, info};
use wordgrid_core::{GameCommand, GameEvent, PlacementError, TileSource};
use wordgrid_rendering::{
    text::{event_message, HudPresentation, SquarePresentation},
    DragDropSurface, DropTarget,
};
use wordgrid_system_placement::{
    BlankLetterPrompt, CancelPrompt, DropOutcome, DropRequest, Placement, PlacementInput,
};
use wordgrid_world::{
    self as world,
    tiles::query::{self, GameSummary},
    GameWorld,
};

use crate::assets::{AssetLoader, AssetSource};

/// Explicit context owning the game world, the placement system and a surface.
///
/// After every action the surface's drag sources and drop targets are
/// registered afresh from the world state, and player-facing messages are
/// queued for the front end.
#[derive(Debug)]
pub struct GameSession<S> {
    world: GameWorld,
    placement: Placement,
    surface: S,
    unseen: Vec<GameEvent>,
    messages: Vec<String>,
    played_tiles: usize,
}

impl<S: DragDropSurface> GameSession<S> {
    /// Creates an idle session drawing onto `surface`.
    pub fn new(surface: S) -> Self {
        Self {
            world: GameWorld::new(),
            placement: Placement::new(),
            surface,
            unseen: Vec::new(),
            messages: Vec::new(),
            played_tiles: 0,
        }
    }

    /// Loads the assets through `loader` and starts a game shuffled by `seed`.
    ///
    /// Asset failures abort the start and leave the session untouched.
    pub fn start<A: AssetSource>(&mut self, loader: &mut AssetLoader<A>, seed: u64) -> Result<()> {
        let (pieces, dictionary) = loader.load().context("failed to load game assets")?;
        info!(seed, "starting game");
        self.played_tiles = 0;
        self.submit(GameCommand::Start {
            pieces,
            dictionary,
            seed,
        })
    }

    /// Drops a dragged tile on a board square.
    pub fn drop_tile<P>(&mut self, request: DropRequest, prompt: &mut P) -> Result<DropOutcome>
    where
        P: BlankLetterPrompt + ?Sized,
    {
        let outcome = self
            .run_placement(PlacementInput::drop(request), prompt)?
            .unwrap_or(DropOutcome::Rejected(PlacementError::MissingTile));
        if let DropOutcome::Rejected(reason) = outcome {
            self.messages.extend(event_message(&GameEvent::PlacementRejected {
                source: request.source,
                column: request.column,
                reason,
            }));
        }
        Ok(outcome)
    }

    /// Drags the tile on `column` back onto the rack.
    pub fn return_tile(&mut self, column: u32) -> Result<()> {
        let _ = self.run_placement(PlacementInput::return_to_rack(column), &mut CancelPrompt)?;
        Ok(())
    }

    /// Scores the word on the board.
    pub fn play_word(&mut self) -> Result<()> {
        self.submit(GameCommand::PlayWord)
    }

    /// Tops the rack up from the bag.
    pub fn new_hand(&mut self) -> Result<()> {
        self.submit(GameCommand::NewHand)
    }

    /// Restarts with the cached assets.
    pub fn reset(&mut self) -> Result<()> {
        self.played_tiles = 0;
        self.submit(GameCommand::Reset)
    }

    /// Snapshot of the world for the front end.
    pub fn summary(&self) -> GameSummary {
        query::summary(&self.world)
    }

    /// Renderable snapshot of the board, rack and scores.
    pub fn hud(&self) -> HudPresentation {
        let summary = self.summary();
        HudPresentation {
            rack: summary.rack,
            squares: summary
                .squares
                .iter()
                .map(|square| SquarePresentation {
                    kind: square.kind,
                    tile: square.tile,
                })
                .collect(),
            tiles_left: summary.tiles_left,
            total_score: summary.total_score,
            round_score: summary.round_score,
            word: summary.word,
            word_status: summary.word_status,
        }
    }

    /// Drains the messages queued since the last call.
    pub fn take_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.messages)
    }

    /// Tiles cleared off the board by played words since the last start.
    pub fn played_tiles(&self) -> usize {
        self.played_tiles
    }

    /// Authoritative game state.
    pub fn world(&self) -> &GameWorld {
        &self.world
    }

    /// Surface receiving the registrations.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    fn run_placement<P>(
        &mut self,
        input: PlacementInput,
        prompt: &mut P,
    ) -> Result<Option<DropOutcome>>
    where
        P: BlankLetterPrompt + ?Sized,
    {
        let unseen = std::mem::take(&mut self.unseen);
        let mut commands = Vec::new();
        let outcome = self.placement.handle(
            &unseen,
            query::board_view(&self.world),
            query::rack(&self.world),
            input,
            prompt,
            &mut commands,
        );
        for command in commands {
            self.submit(command)?;
        }
        Ok(outcome)
    }

    fn submit(&mut self, command: GameCommand) -> Result<()> {
        let on_board = query::board_view(&self.world)
            .squares()
            .iter()
            .filter(|square| square.tile.is_some())
            .count();
        let mut events = Vec::new();
        world::tiles::apply(&mut self.world, command, &mut events);
        for event in &events {
            if let GameEvent::WordPlayed { .. } = event {
                self.played_tiles += on_board;
            }
            self.messages.extend(event_message(event));
        }
        debug!(events = events.len(), "game pump");
        self.unseen.extend(events);
        self.register_surface()
            .context("failed to refresh drag and drop registrations")
    }

    fn register_surface(&mut self) -> Result<()> {
        self.surface.clear_registrations()?;
        for (index, tile) in query::rack(&self.world).iter().enumerate() {
            self.surface
                .register_drag_source(TileSource::Rack { index }, *tile)?;
        }
        let board = query::board_view(&self.world);
        for (column, square) in (0_u32..).zip(board.squares()) {
            match square.tile {
                Some(tile) => self
                    .surface
                    .register_drag_source(TileSource::Board { column }, tile)?,
                None => self.surface.register_drop_target(DropTarget::Square {
                    column,
                    kind: square.kind,
                })?,
            }
        }
        self.surface.register_drop_target(DropTarget::Rack)
    }
}
