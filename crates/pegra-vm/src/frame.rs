//! Call frame arena.
//!
//! Implements the cactus stack pattern: frames are append-only, with a
//! current pointer that moves along creator links. Scope shifts walk the
//! same links to reach ancestor frames.

use pegra_core::RuleId;

/// One active rule invocation.
#[derive(Debug)]
pub struct Frame<V> {
    /// The rule being matched.
    pub rule: RuleId,
    /// Input position where this invocation started.
    pub start: usize,
    /// Creator frame index.
    pub parent: Option<u32>,
    /// User value slot, readable and writable by actions.
    pub value: Option<V>,
}

/// Append-only arena for frames.
///
/// Frames are never deallocated during a run; "pop" just moves the current
/// pointer back to the creator. Actions hold indices into the arena, so
/// slots must stay valid for the whole run.
#[derive(Debug)]
pub struct FrameArena<V> {
    frames: Vec<Frame<V>>,
    current: Option<u32>,
}

impl<V> FrameArena<V> {
    pub fn new() -> Self {
        Self {
            frames: Vec::new(),
            current: None,
        }
    }

    /// Push a frame for the given rule invocation, returning its index.
    pub fn push(&mut self, rule: RuleId, start: usize) -> u32 {
        let idx = self.frames.len() as u32;
        self.frames.push(Frame {
            rule,
            start,
            parent: self.current,
            value: None,
        });
        self.current = Some(idx);
        idx
    }

    /// Restore the current pointer, conceptually popping back to an
    /// earlier frame.
    #[inline]
    pub fn restore(&mut self, frame_index: Option<u32>) {
        self.current = frame_index;
    }

    /// Current frame index.
    #[inline]
    pub fn current(&self) -> Option<u32> {
        self.current
    }

    pub fn get(&self, index: u32) -> &Frame<V> {
        &self.frames[index as usize]
    }

    pub fn get_mut(&mut self, index: u32) -> &mut Frame<V> {
        &mut self.frames[index as usize]
    }

    /// Frame `shift` creator links above the current frame, or `None` when
    /// the chain is too shallow.
    pub fn ancestor(&self, shift: u8) -> Option<u32> {
        let mut idx = self.current?;
        for _ in 0..shift {
            idx = self.frames[idx as usize].parent?;
        }
        Some(idx)
    }

    /// Depth of the current frame chain.
    pub fn chain_depth(&self) -> u32 {
        let mut depth = 0;
        let mut idx = self.current;
        while let Some(i) = idx {
            depth += 1;
            idx = self.frames[i as usize].parent;
        }
        depth
    }
}

impl<V> Default for FrameArena<V> {
    fn default() -> Self {
        Self::new()
    }
}
