//! Windowed product table wired to a display surface.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::debug;
use wordgrid_core::{GridRange, TableCommand, TableEvent, Viewport};
use wordgrid_rendering::{CellNode, DisplaySurface};
use wordgrid_system_windowing::{Config, Windowing};
use wordgrid_world::{self as world, table::query, TableWorld};

/// Explicit context owning the table world, the windowing system and a surface.
///
/// Every call pumps commands through the world until the windowing system
/// has nothing more to say, mirroring each world event onto the surface.
#[derive(Debug)]
pub struct TableSession<S> {
    world: TableWorld,
    windowing: Windowing,
    surface: S,
}

impl<S: DisplaySurface> TableSession<S> {
    /// Creates a session drawing onto `surface`.
    pub fn new(config: Config, surface: S) -> Self {
        Self {
            world: TableWorld::new(config.cell_size()),
            windowing: Windowing::new(config),
            surface,
        }
    }

    /// Replaces the current table with `range` and reconciles against `viewport`.
    pub fn attach(&mut self, range: GridRange, viewport: Viewport, at: Duration) -> Result<()> {
        self.pump(vec![
            TableCommand::Attach { range },
            TableCommand::Scroll { viewport, at },
        ])
        .with_context(|| format!("failed to attach table {range:?}"))
    }

    /// Reports a viewport readout observed at `at`.
    pub fn scroll(&mut self, viewport: Viewport, at: Duration) -> Result<()> {
        self.pump(vec![TableCommand::Scroll { viewport, at }])
            .context("failed to reconcile after scroll")
    }

    /// Surface receiving the cells.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the surface.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Authoritative table state.
    pub fn world(&self) -> &TableWorld {
        &self.world
    }

    fn pump(&mut self, commands: Vec<TableCommand>) -> Result<()> {
        let mut pending = commands;
        while !pending.is_empty() {
            let mut events = Vec::new();
            for command in pending.drain(..) {
                world::table::apply(&mut self.world, command, &mut events);
            }
            for event in &events {
                self.present(event)?;
            }

            let mut follow_up = Vec::new();
            self.windowing
                .handle(&events, query::materialized(&self.world), &mut follow_up);
            debug!(events = events.len(), commands = follow_up.len(), "table pump");
            pending = follow_up;
        }
        Ok(())
    }

    fn present(&mut self, event: &TableEvent) -> Result<()> {
        match event {
            TableEvent::Attached { content_size, .. } => {
                self.surface.clear()?;
                self.surface.resize_content(*content_size)
            }
            TableEvent::CellCreated { cell } => self.surface.create_node(CellNode::from_cell(cell)),
            TableEvent::CellDestroyed { cell } => self.surface.remove_node(cell.key()),
            TableEvent::ViewportScrolled { .. } => Ok(()),
        }
    }
}
