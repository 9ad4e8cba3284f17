//! Bounded undo/redo history of image snapshots.
//!
//! The history never touches pixel data. It only decides which snapshot
//! the caller should display next. Snapshots are cheap to hold because
//! [`PixelBuffer`] clones share storage.

use std::collections::VecDeque;

use crate::buffer::PixelBuffer;

/// Default number of snapshots kept on each stack.
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Two bounded stacks of snapshots.
///
/// A fresh edit clears the redo stack. When a stack exceeds its capacity
/// the oldest snapshot is dropped.
#[derive(Debug, Clone)]
pub struct EditHistory<T = PixelBuffer> {
    undo_stack: VecDeque<T>,
    redo_stack: VecDeque<T>,
    capacity: usize,
}

impl<T> Default for EditHistory<T> {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl<T> EditHistory<T> {
    /// Create a history keeping at most `capacity` snapshots per stack.
    ///
    /// A capacity of 0 is raised to 1.
    pub fn new(capacity: usize) -> Self {
        if capacity == 0 {
            log::debug!("history capacity 0 raised to 1");
        }
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Record the snapshot that an edit is about to replace.
    pub fn push(&mut self, previous: T) {
        Self::push_bounded(&mut self.undo_stack, previous, self.capacity);
        self.redo_stack.clear();
    }

    /// Step back. Returns the snapshot to display, or `None` when there is
    /// nothing to undo (in which case `current` is dropped unchanged).
    pub fn undo(&mut self, current: T) -> Option<T> {
        let previous = self.undo_stack.pop_back()?;
        Self::push_bounded(&mut self.redo_stack, current, self.capacity);
        Some(previous)
    }

    /// Step forward again after an undo.
    pub fn redo(&mut self, current: T) -> Option<T> {
        let next = self.redo_stack.pop_back()?;
        Self::push_bounded(&mut self.undo_stack, current, self.capacity);
        Some(next)
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// The snapshot `undo` would return, without popping it.
    pub fn peek_undo(&self) -> Option<&T> {
        self.undo_stack.back()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn push_bounded(stack: &mut VecDeque<T>, item: T, capacity: usize) {
        stack.push_back(item);
        while stack.len() > capacity {
            stack.pop_front();
        }
    }
}
