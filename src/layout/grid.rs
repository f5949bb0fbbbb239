use crate::config::{GRID_COLUMNS, GridConfig};
use crate::foundation::core::PixelRect;

/// Two-column photo grid geometry.
///
/// Image `i` goes to column `i % 2`, row `i / 2`. Placement depends only on the index, so the
/// same input order always produces the same layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridLayout {
    pub cell_width: u32,
    pub cell_height: u32,
    pub gap: u32,
}

impl GridLayout {
    pub fn from_config(cfg: &GridConfig) -> Self {
        Self {
            cell_width: cfg.cell_width(),
            cell_height: cfg.cell_height,
            gap: cfg.gap,
        }
    }

    /// `ceil(count / 2)`.
    pub fn rows(&self, count: usize) -> u32 {
        count.div_ceil(GRID_COLUMNS as usize) as u32
    }

    pub fn cell_rect(&self, index: usize) -> PixelRect {
        let col = (index % GRID_COLUMNS as usize) as u32;
        let row = (index / GRID_COLUMNS as usize) as u32;
        let x = self.gap + col * (self.cell_width + self.gap);
        let y = row * (self.cell_height + self.gap) + self.gap;
        PixelRect::new(x, y, self.cell_width, self.cell_height)
    }

    pub fn place(&self, count: usize) -> Vec<PixelRect> {
        (0..count).map(|i| self.cell_rect(i)).collect()
    }

    /// Vertical offset just below the grid block (last row plus one trailing gap); `0` when empty.
    pub fn bottom(&self, count: usize) -> u32 {
        let rows = self.rows(count);
        if rows == 0 {
            return 0;
        }
        rows * (self.cell_height + self.gap) + self.gap
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/grid.rs"]
mod tests;
