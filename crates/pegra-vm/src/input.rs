//! Input buffer with a virtual end-of-input sentinel.

/// The subject of a match run, as a character buffer.
///
/// Positions are character indices. The position one past the last
/// character is the end-of-input sentinel: `Any` matches only real
/// characters, `EndOfInput` matches exactly at the sentinel and advances
/// past it.
#[derive(Clone, Debug)]
pub struct Input {
    chars: Vec<char>,
}

impl Input {
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
        }
    }

    /// Number of real characters.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Character at the position, `None` at or past the sentinel.
    pub fn char_at(&self, pos: usize) -> Option<char> {
        self.chars.get(pos).copied()
    }

    /// Whether the position is the end-of-input sentinel.
    pub fn at_sentinel(&self, pos: usize) -> bool {
        pos == self.chars.len()
    }

    /// Text between two positions, clamped to the real characters.
    pub fn slice(&self, start: usize, end: usize) -> String {
        let end = end.min(self.chars.len());
        let start = start.min(end);
        self.chars[start..end].iter().collect()
    }
}
