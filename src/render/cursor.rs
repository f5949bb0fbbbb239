/// Running vertical offset of a composition.
///
/// The offset only moves down: [`RenderCursor::advance`] saturates instead of wrapping and
/// [`RenderCursor::advance_to`] ignores targets above the current position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderCursor {
    y: u32,
}

impl RenderCursor {
    pub fn new(start: u32) -> Self {
        Self { y: start }
    }

    pub fn y(&self) -> u32 {
        self.y
    }

    pub fn advance(&mut self, by: u32) -> u32 {
        self.y = self.y.saturating_add(by);
        self.y
    }

    pub fn advance_to(&mut self, y: u32) -> u32 {
        self.y = self.y.max(y);
        self.y
    }

    /// `true` when `by` more rows still end at or above `limit`.
    pub fn fits(&self, by: u32, limit: u32) -> bool {
        u64::from(self.y) + u64::from(by) <= u64::from(limit)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cursor.rs"]
mod tests;
