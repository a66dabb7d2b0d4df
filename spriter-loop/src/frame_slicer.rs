//! Slicing a sprite sheet back into individual frames

use crate::blank_detector::BlankThresholds;
use crate::{Error, Result};
use image::{imageops, RgbaImage};
use spriter_core::{Grid, SheetLayout};

/// One cell of a sprite sheet
#[derive(Debug, Clone)]
pub struct Frame {
    /// Cell pixels
    pub image: RgbaImage,
    /// Row of the cell within the sheet
    pub row: u32,
    /// Column of the cell within the sheet
    pub col: u32,
}

impl Frame {
    /// Classifies this frame as blank; see [`BlankThresholds::is_blank`]
    pub fn is_blank(&self, thresholds: &BlankThresholds) -> bool {
        thresholds.is_blank(&self.image)
    }
}

/// Crops every cell of `sheet` into a [`Frame`], row-major.
///
/// Cell size is the integer quotient of the sheet size by the grid shape;
/// remainder pixels on the right and bottom are ignored.
pub fn slice_sheet(sheet: &RgbaImage, grid: Grid) -> Result<Vec<Frame>> {
    let layout = SheetLayout::new(sheet.width(), sheet.height(), grid);
    if layout.is_degenerate() {
        return Err(Error::ImageLoad(format!(
            "sheet of {}x{} is too small for a {} grid",
            sheet.width(),
            sheet.height(),
            grid
        )));
    }

    let frames = layout
        .cells()
        .map(|cell| Frame {
            image: imageops::crop_imm(sheet, cell.x, cell.y, cell.width, cell.height).to_image(),
            row: cell.row,
            col: cell.col,
        })
        .collect();

    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    /// Sheet whose cells are filled with a color encoding their index
    fn indexed_sheet(cell_w: u32, cell_h: u32, grid: Grid, extra: u32) -> RgbaImage {
        let width = cell_w * grid.columns + extra;
        let height = cell_h * grid.rows + extra;
        RgbaImage::from_fn(width, height, |x, y| {
            let col = x / cell_w;
            let row = y / cell_h;
            if col >= grid.columns || row >= grid.rows {
                return Rgba([255, 0, 255, 255]);
            }
            let index = (row * grid.columns + col) as u8;
            Rgba([index * 10 + 5, 100, 200, 255])
        })
    }

    #[test]
    fn test_slice_row_major() {
        let grid = Grid::new(3, 2).unwrap();
        let sheet = indexed_sheet(8, 6, grid, 0);
        let frames = slice_sheet(&sheet, grid).unwrap();

        assert_eq!(frames.len(), 6);
        for (i, frame) in frames.iter().enumerate() {
            assert_eq!(frame.image.dimensions(), (8, 6));
            assert_eq!(frame.row, i as u32 / 3);
            assert_eq!(frame.col, i as u32 % 3);
            // every pixel in the cell carries the cell's own index
            assert!(frame
                .image
                .pixels()
                .all(|p| p.0 == [i as u8 * 10 + 5, 100, 200, 255]));
        }
    }

    #[test]
    fn test_slice_discards_remainder() {
        let grid = Grid::new(2, 2).unwrap();
        let sheet = indexed_sheet(10, 10, grid, 3);
        assert_eq!(sheet.dimensions(), (23, 23));

        let frames = slice_sheet(&sheet, grid).unwrap();
        assert_eq!(frames.len(), 4);
        for frame in &frames {
            assert_eq!(frame.image.dimensions(), (11, 11));
        }
    }

    #[test]
    fn test_slice_retiles_to_original() {
        let grid = Grid::new(4, 3).unwrap();
        let sheet = indexed_sheet(5, 7, grid, 0);
        let frames = slice_sheet(&sheet, grid).unwrap();

        let mut rebuilt = RgbaImage::new(sheet.width(), sheet.height());
        for frame in &frames {
            imageops::replace(
                &mut rebuilt,
                &frame.image,
                (frame.col * 5) as i64,
                (frame.row * 7) as i64,
            );
        }
        assert_eq!(rebuilt, sheet);
    }

    #[test]
    fn test_sheet_too_small() {
        let sheet = RgbaImage::new(3, 3);
        let err = slice_sheet(&sheet, Grid::new(4, 4).unwrap()).unwrap_err();
        assert!(matches!(err, Error::ImageLoad(_)));
    }
}
