// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use crate::combination::CoverCursor;
use stowage_core::num::SolverNumeric;

/// A stack of per-depth enumeration cursors.
///
/// Level `d` produces the candidates of the location decided at depth `d`.
/// Popping a level only lowers `depth`; the cursor and its buffers stay in
/// `levels` and are reused by the next push at that depth.
#[derive(Clone, Debug)]
pub struct SearchStack<T> {
    levels: Vec<CoverCursor<T>>,
    depth: usize,
}

impl<T> Default for SearchStack<T>
where
    T: SolverNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SearchStack<T>
where
    T: SolverNumeric,
{
    /// Creates a new, empty `SearchStack`.
    #[inline]
    pub fn new() -> Self {
        Self {
            levels: Vec::new(),
            depth: 0,
        }
    }

    /// Clears the stack and prepares it for up to `num_locations + 1` levels,
    /// keeping allocated capacity.
    #[inline]
    pub fn reset_for(&mut self, num_locations: usize) {
        self.reset();
        let wanted = num_locations.saturating_add(1);
        if self.levels.len() < wanted {
            self.levels.reserve(wanted - self.levels.len());
        }
    }

    /// Returns the current search depth (number of levels).
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Pushes a new level and returns its cursor, closed until opened.
    #[inline]
    pub fn push_frame(&mut self) -> &mut CoverCursor<T> {
        if self.depth == self.levels.len() {
            self.levels.push(CoverCursor::new());
        }
        let cursor = &mut self.levels[self.depth];
        self.depth += 1;
        cursor.close();
        cursor
    }

    /// Pops the current level.
    #[inline]
    pub fn pop_frame(&mut self) -> Option<()> {
        self.depth = self.depth.checked_sub(1)?;
        Some(())
    }

    /// The cursor of the current level.
    #[inline]
    pub fn current_mut(&mut self) -> Option<&mut CoverCursor<T>> {
        match self.depth {
            0 => None,
            d => self.levels.get_mut(d - 1),
        }
    }

    /// Drops all levels, but keeps the cursors for reuse.
    #[inline]
    pub fn reset(&mut self) {
        self.depth = 0;
    }
}

impl<T> std::fmt::Display for SearchStack<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchStack(depth: {}, cursors: {})",
            self.depth,
            self.levels.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combination::CursorStep;

    type IntegerType = i64;

    #[test]
    fn test_new_stack_is_empty() {
        let mut s = SearchStack::<IntegerType>::new();
        assert_eq!(s.depth(), 0);
        assert!(s.current_mut().is_none());
        assert_eq!(s.pop_frame(), None);
        assert_eq!(format!("{}", s), "SearchStack(depth: 0, cursors: 0)");
    }

    #[test]
    fn test_levels_resume_where_they_paused() {
        let sizes = [2, 1];
        let mut s = SearchStack::<IntegerType>::new();
        s.reset_for(2);
        s.push_frame().open(3, &sizes, &[5, 5]);
        let top = s.current_mut().unwrap();
        assert_eq!(top.advance(&sizes, None, usize::MAX), CursorStep::Candidate(2));
        assert_eq!(top.counts(), &[1, 1]);

        s.push_frame().open(2, &sizes, &[4, 4]);
        assert_eq!(s.depth(), 2);
        let child = s.current_mut().unwrap();
        assert_eq!(child.advance(&sizes, None, usize::MAX), CursorStep::Candidate(1));

        s.pop_frame();
        let parent = s.current_mut().unwrap();
        assert_eq!(parent.advance(&sizes, None, usize::MAX), CursorStep::Candidate(3));
        assert_eq!(parent.counts(), &[0, 3]);
    }

    #[test]
    fn test_pushed_level_starts_closed() {
        let sizes = [1];
        let mut s = SearchStack::<IntegerType>::new();
        s.push_frame().open(1, &sizes, &[1]);
        s.pop_frame();
        let reused = s.push_frame();
        assert_eq!(reused.advance(&sizes, None, usize::MAX), CursorStep::Exhausted);
        assert!(!reused.is_barren());
    }

    #[test]
    fn test_reset_keeps_cursors() {
        let mut s = SearchStack::<IntegerType>::new();
        s.reset_for(1);
        s.push_frame();
        s.push_frame();
        s.reset();
        assert_eq!(s.depth(), 0);
        assert_eq!(format!("{}", s), "SearchStack(depth: 0, cursors: 2)");
    }
}
