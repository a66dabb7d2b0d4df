//! Sprite sheet geometry: how a sheet is partitioned into grid cells

use crate::{Grid, SamplingConfig};

/// Position and extent of a single cell within a sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    /// Row-major index of the cell
    pub index: u32,
    /// Row of the cell (0 = top)
    pub row: u32,
    /// Column of the cell (0 = left)
    pub col: u32,
    /// Left edge in sheet pixels
    pub x: u32,
    /// Top edge in sheet pixels
    pub y: u32,
    /// Cell width in pixels
    pub width: u32,
    /// Cell height in pixels
    pub height: u32,
}

impl CellRect {
    /// Returns true if the sheet pixel lies inside this cell
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

/// Logical partition of a sprite sheet into equally sized cells.
///
/// Cell size is the integer quotient of the sheet size by the grid shape;
/// leftover pixels on the right and bottom edges belong to no cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetLayout {
    /// Sheet width in pixels
    pub sheet_width: u32,
    /// Sheet height in pixels
    pub sheet_height: u32,
    /// Grid shape
    pub grid: Grid,
}

impl SheetLayout {
    /// Creates a layout for a sheet of the given size
    pub fn new(sheet_width: u32, sheet_height: u32, grid: Grid) -> Self {
        Self {
            sheet_width,
            sheet_height,
            grid,
        }
    }

    /// Layout of the sheet that `config` produces
    pub fn for_config(config: &SamplingConfig) -> Self {
        let (width, height) = config.sheet_dimensions();
        Self::new(width, height, config.grid)
    }

    /// Width of every cell
    pub fn cell_width(&self) -> u32 {
        self.sheet_width / self.grid.columns
    }

    /// Height of every cell
    pub fn cell_height(&self) -> u32 {
        self.sheet_height / self.grid.rows
    }

    /// Returns true if cells have a non-zero area
    pub fn is_degenerate(&self) -> bool {
        self.cell_width() == 0 || self.cell_height() == 0
    }

    /// Number of cells
    pub fn cell_count(&self) -> u64 {
        self.grid.capacity()
    }

    /// Gets the cell at a row-major index
    pub fn cell(&self, index: u32) -> Option<CellRect> {
        if u64::from(index) >= self.cell_count() {
            return None;
        }

        let row = index / self.grid.columns;
        let col = index % self.grid.columns;
        let width = self.cell_width();
        let height = self.cell_height();

        Some(CellRect {
            index,
            row,
            col,
            x: col * width,
            y: row * height,
            width,
            height,
        })
    }

    /// Iterates cells row by row, left to right within a row.
    ///
    /// A degenerate layout has no cells.
    pub fn cells(&self) -> impl Iterator<Item = CellRect> + '_ {
        let count = if self.is_degenerate() {
            0
        } else {
            u32::try_from(self.cell_count()).unwrap_or(u32::MAX)
        };
        (0..count).filter_map(move |i| self.cell(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FrameSize;

    #[test]
    fn test_cells_are_row_major() {
        let layout = SheetLayout::new(300, 200, Grid::new(3, 2).unwrap());
        let order: Vec<(u32, u32)> = layout.cells().map(|c| (c.row, c.col)).collect();
        assert_eq!(order, vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]);

        let last = layout.cell(5).unwrap();
        assert_eq!((last.x, last.y, last.width, last.height), (200, 100, 100, 100));
        assert!(layout.cell(6).is_none());
    }

    #[test]
    fn test_remainder_pixels_are_discarded() {
        let layout = SheetLayout::new(103, 50, Grid::new(4, 3).unwrap());
        assert_eq!(layout.cell_width(), 25);
        assert_eq!(layout.cell_height(), 16);

        let far = layout.cell(11).unwrap();
        assert_eq!(far.x + far.width, 100);
        assert_eq!(far.y + far.height, 48);
    }

    #[test]
    fn test_cells_tile_used_area_exactly() {
        let config = SamplingConfig::new(
            10.0,
            FrameSize::new(7, 5).unwrap(),
            Grid::new(4, 3).unwrap(),
        )
        .unwrap();
        let layout = SheetLayout::for_config(&config);
        assert_eq!((layout.sheet_width, layout.sheet_height), (28, 15));
        assert_eq!((layout.cell_width(), layout.cell_height()), (7, 5));

        // every sheet pixel belongs to exactly one cell
        for y in 0..layout.sheet_height {
            for x in 0..layout.sheet_width {
                let owners = layout.cells().filter(|c| c.contains(x, y)).count();
                assert_eq!(owners, 1, "pixel ({x}, {y})");
            }
        }

        // re-tiling the cells reproduces their original positions
        for cell in layout.cells() {
            assert_eq!(cell.x, cell.col * 7);
            assert_eq!(cell.y, cell.row * 5);
            assert_eq!(cell.index, cell.row * 4 + cell.col);
        }
    }

    #[test]
    fn test_degenerate_layout() {
        let layout = SheetLayout::new(3, 10, Grid::new(4, 2).unwrap());
        assert!(layout.is_degenerate());
        assert!(!SheetLayout::new(8, 10, Grid::new(4, 2).unwrap()).is_degenerate());
        assert_eq!(layout.cells().count(), 0);
    }

    #[test]
    fn test_huge_grid_counts_without_overflow() {
        let layout = SheetLayout::new(64, 64, Grid::new(100_000, 100_000).unwrap());
        assert_eq!(layout.cell_count(), 10_000_000_000);
        assert!(layout.is_degenerate());
        assert_eq!(layout.cells().count(), 0);
    }
}
