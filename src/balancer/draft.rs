//! Draft order for outfield players
//!
//! The cursor walks the squad indices, turning around at either end. On a
//! turn it reverses direction and immediately steps back, so with two squads
//! the sequence is 0, 1, 0, 1, ...

/// Direction the cursor is currently moving in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftDirection {
    Ascending,
    Descending,
}

/// Infinite iterator of squad indices for the draft
#[derive(Debug, Clone)]
pub struct DraftCursor {
    current: usize,
    direction: DraftDirection,
    last: usize,
}

impl DraftCursor {
    /// Cursor over `squad_count` squads, starting at squad 0 moving up
    pub fn new(squad_count: usize) -> Self {
        Self::starting_at(squad_count, 0)
    }

    /// Cursor starting at `start` (wrapped into range) moving up
    pub fn starting_at(squad_count: usize, start: usize) -> Self {
        Self {
            current: start % squad_count.max(1),
            direction: DraftDirection::Ascending,
            last: squad_count.saturating_sub(1),
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn direction(&self) -> DraftDirection {
        self.direction
    }

    fn advance(&mut self) {
        if self.last == 0 {
            return;
        }

        match self.direction {
            DraftDirection::Ascending => {
                if self.current == self.last {
                    self.direction = DraftDirection::Descending;
                    self.current -= 1;
                } else {
                    self.current += 1;
                }
            }
            DraftDirection::Descending => {
                if self.current == 0 {
                    self.direction = DraftDirection::Ascending;
                    self.current += 1;
                } else {
                    self.current -= 1;
                }
            }
        }
    }
}

impl Iterator for DraftCursor {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let squad = self.current;
        self.advance();
        Some(squad)
    }
}
