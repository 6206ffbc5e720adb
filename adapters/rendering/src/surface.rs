//! In-memory surface that keeps the node tree and an operation log.

use std::collections::BTreeMap;

use anyhow::Result as AnyResult;
use wordgrid_core::{CellKey, ContentSize, Tile, TileSource};

use crate::{CellNode, DisplaySurface, DragDropSurface, DropTarget};

/// Operation applied to a [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceOp {
    /// Content extent changed.
    Resized(ContentSize),
    /// A node was inserted.
    Created(CellKey),
    /// A node was removed.
    Removed(CellKey),
    /// Every node was removed.
    Cleared,
}

/// Surface backed by plain collections, used by headless front ends and tests.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    content_size: Option<ContentSize>,
    nodes: BTreeMap<CellKey, CellNode>,
    log: Vec<SurfaceOp>,
    drag_sources: Vec<(TileSource, Tile)>,
    drop_targets: Vec<DropTarget>,
}

impl RecordingSurface {
    /// Creates an empty surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently reserved content extent.
    #[must_use]
    pub fn content_size(&self) -> Option<ContentSize> {
        self.content_size
    }

    /// Nodes currently on the surface, ordered by key.
    pub fn nodes(&self) -> impl Iterator<Item = &CellNode> {
        self.nodes.values()
    }

    /// Node with `key`, if present.
    #[must_use]
    pub fn node(&self, key: CellKey) -> Option<&CellNode> {
        self.nodes.get(&key)
    }

    /// Number of nodes on the surface.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Every operation applied so far.
    #[must_use]
    pub fn log(&self) -> &[SurfaceOp] {
        &self.log
    }

    /// Drains the operation log.
    pub fn take_log(&mut self) -> Vec<SurfaceOp> {
        std::mem::take(&mut self.log)
    }

    /// Registered drag sources in registration order.
    #[must_use]
    pub fn drag_sources(&self) -> &[(TileSource, Tile)] {
        &self.drag_sources
    }

    /// Registered drop targets in registration order.
    #[must_use]
    pub fn drop_targets(&self) -> &[DropTarget] {
        &self.drop_targets
    }
}

impl DisplaySurface for RecordingSurface {
    fn resize_content(&mut self, size: ContentSize) -> AnyResult<()> {
        self.content_size = Some(size);
        self.log.push(SurfaceOp::Resized(size));
        Ok(())
    }

    fn create_node(&mut self, node: CellNode) -> AnyResult<()> {
        let key = node.key;
        let _ = self.nodes.insert(key, node);
        self.log.push(SurfaceOp::Created(key));
        Ok(())
    }

    fn remove_node(&mut self, key: CellKey) -> AnyResult<()> {
        if self.nodes.remove(&key).is_some() {
            self.log.push(SurfaceOp::Removed(key));
        }
        Ok(())
    }

    fn clear(&mut self) -> AnyResult<()> {
        self.nodes.clear();
        self.log.push(SurfaceOp::Cleared);
        Ok(())
    }
}

impl DragDropSurface for RecordingSurface {
    fn register_drag_source(&mut self, source: TileSource, tile: Tile) -> AnyResult<()> {
        self.drag_sources.push((source, tile));
        Ok(())
    }

    fn register_drop_target(&mut self, target: DropTarget) -> AnyResult<()> {
        self.drop_targets.push(target);
        Ok(())
    }

    fn clear_registrations(&mut self) -> AnyResult<()> {
        self.drag_sources.clear();
        self.drop_targets.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wordgrid_core::{CellCoord, CellSize, MaterializedCell, PixelPoint};

    fn node(x: i64, y: i64) -> CellNode {
        CellNode::from_cell(&MaterializedCell::new(
            CellCoord::new(x, y),
            PixelPoint::new(x * 52, y * 32),
            CellSize::default(),
        ))
    }

    #[test]
    fn removing_missing_nodes_is_not_logged() -> AnyResult<()> {
        let mut surface = RecordingSurface::new();
        surface.create_node(node(1, 1))?;
        surface.remove_node(node(2, 2).key)?;
        surface.remove_node(node(1, 1).key)?;

        assert_eq!(
            surface.take_log(),
            vec![
                SurfaceOp::Created(node(1, 1).key),
                SurfaceOp::Removed(node(1, 1).key),
            ]
        );
        assert_eq!(surface.node_count(), 0);
        assert!(surface.log().is_empty());
        Ok(())
    }

    #[test]
    fn recreating_a_key_replaces_the_node() -> AnyResult<()> {
        let mut surface = RecordingSurface::new();
        surface.create_node(node(3, 3))?;
        surface.create_node(node(3, 3))?;

        assert_eq!(surface.node_count(), 1);
        assert_eq!(surface.node(node(3, 3).key).map(|n| n.text.as_str()), Some("9"));
        Ok(())
    }
}
