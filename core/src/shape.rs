use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Shape stencils that mask the square board down to the active play area.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Square,
    Triangle,
    Diamond,
    Cross,
    Plus,
    Hexagon,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 6] = [
        Self::Square,
        Self::Triangle,
        Self::Diamond,
        Self::Cross,
        Self::Plus,
        Self::Hexagon,
    ];

    /// Parses a shape name. Unknown names fall back to `Square`, which keeps
    /// the whole board in play instead of rejecting the input.
    pub fn from_name(name: &str) -> Self {
        match name {
            "triangle" => Self::Triangle,
            "diamond" => Self::Diamond,
            "cross" => Self::Cross,
            "plus" => Self::Plus,
            "hexagon" => Self::Hexagon,
            _ => Self::Square,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Triangle => "triangle",
            Self::Diamond => "diamond",
            Self::Cross => "cross",
            Self::Plus => "plus",
            Self::Hexagon => "hexagon",
        }
    }
}

impl Default for ShapeKind {
    fn default() -> Self {
        Self::Square
    }
}

/// Builds the occupancy mask for `kind` on a `grid_size` by `grid_size`
/// board. Deterministic, purely a function of its inputs.
///
/// The center is `grid_size / 2`; on even sizes it rounds down, so shapes
/// sit slightly toward the top-left. The settings preview shows the same
/// bias, it is not corrected here.
pub fn generate_shape_mask(grid_size: Coord, kind: ShapeKind) -> ShapeMask {
    let size = grid_size as usize;
    let center = size / 2;
    let mut mask = Array2::from_elem([size, size], false);

    match kind {
        ShapeKind::Square => {
            mask.fill(true);
        }
        ShapeKind::Triangle => {
            // top half, one wider per row
            for row in 0..size.div_ceil(2) {
                let start = center.saturating_sub(row);
                let end = (center + row + 1).min(size);
                for col in start..end {
                    mask[[row, col]] = true;
                }
            }
        }
        ShapeKind::Diamond => {
            for row in 0..size {
                let dist = row.abs_diff(center);
                let width = size.saturating_sub(2 * dist);
                for col in dist..dist + width {
                    mask[[row, col]] = true;
                }
            }
        }
        ShapeKind::Cross => {
            for i in 0..size {
                mask[[i, i]] = true;
                mask[[i, size - 1 - i]] = true;
            }
        }
        ShapeKind::Plus => {
            for i in 0..size {
                mask[[center, i]] = true;
                mask[[i, center]] = true;
            }
        }
        ShapeKind::Hexagon => {
            let flat = size / 3;
            for row in 0..size {
                let dist = row.abs_diff(center);
                let width = if dist <= flat {
                    size
                } else {
                    size.saturating_sub(2 * (dist - flat)).max(1)
                };
                let start = (size - width) / 2;
                for col in start..start + width {
                    mask[[row, col]] = true;
                }
            }
        }
    }

    ShapeMask::new_unchecked(mask)
}

/// Number of cells `kind` keeps in play on a `grid_size` board.
pub fn shape_cell_count(grid_size: Coord, kind: ShapeKind) -> CellCount {
    generate_shape_mask(grid_size, kind).active_cells()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn active_ids(grid_size: Coord, kind: ShapeKind) -> Vec<CellId> {
        generate_shape_mask(grid_size, kind)
            .iter_active_ids()
            .collect()
    }

    #[test]
    fn mask_covers_whole_board_and_is_deterministic() {
        for grid_size in 6..=10 {
            for kind in ShapeKind::ALL {
                let mask = generate_shape_mask(grid_size, kind);
                assert_eq!(mask.total_cells(), mult(grid_size, grid_size));
                assert_eq!(mask, generate_shape_mask(grid_size, kind));
            }
        }
    }

    #[test]
    fn square_marks_every_cell() {
        let mask = generate_shape_mask(8, ShapeKind::Square);
        assert_eq!(mask.active_cells(), 64);
    }

    #[test]
    fn plus_on_seven_is_center_row_and_column() {
        let mask = generate_shape_mask(7, ShapeKind::Plus);
        assert_eq!(mask.active_cells(), 13);
        for i in 0..7 {
            assert!(mask[coords_to_id(3, i, 7)]);
            assert!(mask[coords_to_id(i, 3, 7)]);
        }
        assert!(!mask[coords_to_id(0, 0, 7)]);
    }

    #[test]
    fn cross_on_five_is_both_diagonals() {
        let expected: Vec<CellId> = [
            (0, 0),
            (0, 4),
            (1, 1),
            (1, 3),
            (2, 2),
            (3, 1),
            (3, 3),
            (4, 0),
            (4, 4),
        ]
        .iter()
        .map(|&(row, col)| coords_to_id(row, col, 5))
        .collect();
        assert_eq!(active_ids(5, ShapeKind::Cross), expected);
    }

    #[test]
    fn triangle_widens_toward_center_row() {
        let mask = generate_shape_mask(7, ShapeKind::Triangle);
        assert!(mask[coords_to_id(0, 3, 7)]);
        assert!(!mask[coords_to_id(0, 2, 7)]);
        for col in 1..=5 {
            assert!(mask[coords_to_id(2, col, 7)]);
        }
        // bottom half stays empty
        for col in 0..7 {
            assert!(!mask[coords_to_id(5, col, 7)]);
        }
    }

    #[test]
    fn diamond_on_even_grid_keeps_source_bias() {
        // center rounds down, the top row ends up empty
        let mask = generate_shape_mask(6, ShapeKind::Diamond);
        for col in 0..6 {
            assert!(!mask[coords_to_id(0, col, 6)]);
        }
        for col in 0..6 {
            assert!(mask[coords_to_id(3, col, 6)]);
        }
        assert!(mask[coords_to_id(1, 2, 6)]);
        assert!(!mask[coords_to_id(1, 1, 6)]);
    }

    #[test]
    fn hexagon_has_full_width_band_around_center() {
        let mask = generate_shape_mask(9, ShapeKind::Hexagon);
        for row in 1..=7 {
            for col in 0..9 {
                assert!(mask[coords_to_id(row, col, 9)]);
            }
        }
        // rows beyond the flat band taper by two per step
        assert!(!mask[coords_to_id(0, 0, 9)]);
        assert!(mask[coords_to_id(0, 1, 9)]);
        assert!(mask[coords_to_id(0, 7, 9)]);
        assert!(!mask[coords_to_id(0, 8, 9)]);
    }

    #[test]
    fn cell_count_matches_mask_population() {
        for grid_size in 6..=10 {
            for kind in ShapeKind::ALL {
                let mask = generate_shape_mask(grid_size, kind);
                assert_eq!(
                    shape_cell_count(grid_size, kind),
                    mask.iter_active_ids().count() as CellCount,
                );
            }
        }
    }

    #[test]
    fn unknown_shape_name_falls_back_to_square() {
        assert_eq!(ShapeKind::from_name("hexagon"), ShapeKind::Hexagon);
        assert_eq!(ShapeKind::from_name("dodecahedron"), ShapeKind::Square);
        assert_eq!(ShapeKind::from_name(""), ShapeKind::Square);
    }

    #[test]
    fn from_mask_rejects_non_square_grids() {
        let err = ShapeMask::from_mask(Array2::from_elem([2, 3], true));
        assert_eq!(err, Err(GameError::InvalidMaskShape));
    }
}
