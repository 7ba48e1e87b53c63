// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Zoom block storage.
//!
//! An insertion-ordered collection of zoom blocks. The store does no
//! range validation; edits are clamped before they get here.

use super::zoom_block::{ZoomBlock, ZoomBlockId, ZoomBlockPatch};

/// Ordered collection of zoom blocks owned by the editor session.
#[derive(Debug, Default)]
pub struct ZoomBlockStore {
    blocks: Vec<ZoomBlock>,
    next_id: u64,
}

impl ZoomBlockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a block with a fresh id and append it.
    pub fn add(&mut self, start_time: f64, end_time: f64, scale: f64) -> ZoomBlockId {
        self.next_id += 1;
        let id = ZoomBlockId(self.next_id);
        self.blocks.push(ZoomBlock::new(id, start_time, end_time, scale));
        id
    }

    /// Merge `patch` into the block with `id`.
    ///
    /// Returns `false` and leaves the store untouched if no such block exists.
    pub fn update(&mut self, id: ZoomBlockId, patch: &ZoomBlockPatch) -> bool {
        match self.blocks.iter_mut().find(|b| b.id() == id) {
            Some(block) => {
                block.apply(patch);
                true
            }
            None => false,
        }
    }

    /// Remove the block with `id`, keeping the order of the rest.
    pub fn remove(&mut self, id: ZoomBlockId) -> bool {
        let before = self.blocks.len();
        self.blocks.retain(|b| b.id() != id);
        self.blocks.len() != before
    }

    pub fn get(&self, id: ZoomBlockId) -> Option<&ZoomBlock> {
        self.blocks.iter().find(|b| b.id() == id)
    }

    /// All blocks in insertion order.
    pub fn list(&self) -> &[ZoomBlock] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_and_ordered() {
        let mut store = ZoomBlockStore::new();
        let a = store.add(0.0, 1.0, 1.5);
        let b = store.add(0.5, 2.0, 1.5);
        let c = store.add(3.0, 4.0, 1.5);

        assert!(a != b && b != c && a != c);
        let ids: Vec<_> = store.list().iter().map(|b| b.id()).collect();
        assert_eq!(ids, vec![a, b, c]);
    }

    #[test]
    fn test_ids_not_reused_after_remove() {
        let mut store = ZoomBlockStore::new();
        let a = store.add(0.0, 1.0, 1.5);
        assert!(store.remove(a));
        let b = store.add(0.0, 1.0, 1.5);
        assert_ne!(a, b);
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut store = ZoomBlockStore::new();
        let a = store.add(0.0, 1.0, 1.5);
        let before = store.list().to_vec();

        assert!(!store.update(ZoomBlockId(999), &ZoomBlockPatch::position(1.0, 1.0)));
        assert_eq!(store.list(), &before[..]);
        assert!(store.update(a, &ZoomBlockPatch::position(1.0, 2.0)));
        assert_eq!(store.get(a).map(|b| (b.x, b.y)), Some((1.0, 2.0)));
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut store = ZoomBlockStore::new();
        let a = store.add(0.0, 1.0, 1.5);
        let b = store.add(1.0, 2.0, 1.5);
        let c = store.add(2.0, 3.0, 1.5);

        assert!(store.remove(b));
        assert!(!store.remove(b));
        let ids: Vec<_> = store.list().iter().map(|b| b.id()).collect();
        assert_eq!(ids, vec![a, c]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_store_accepts_unclamped_records() {
        let mut store = ZoomBlockStore::new();
        let a = store.add(0.0, 1.0, 1.5);
        let patch = ZoomBlockPatch {
            scale: Some(9.0),
            ..Default::default()
        };
        assert!(store.update(a, &patch));
        assert_eq!(store.get(a).map(|b| b.scale), Some(9.0));
    }
}
