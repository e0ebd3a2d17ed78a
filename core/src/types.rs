/// Single grid axis used for the board dimension and row/column positions.
pub type Coord = u8;

/// Flat 0-based row-major index of a cell on the square board.
pub type CellId = u16;

/// Count type used for cell totals and mask occupancy counts.
pub type CellCount = u16;

/// Millisecond timestamps and durations, supplied by the embedding shell.
pub type TimeMs = u64;

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Splits a flat cell id into `(row, col)` on a `grid_size` wide board.
pub const fn id_to_coords(id: CellId, grid_size: Coord) -> (Coord, Coord) {
    let size = grid_size as CellId;
    ((id / size) as Coord, (id % size) as Coord)
}

pub const fn coords_to_id(row: Coord, col: Coord, grid_size: Coord) -> CellId {
    row as CellId * grid_size as CellId + col as CellId
}

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for (Coord, Coord) {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0 as usize, self.1 as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_round_trips_through_coords() {
        for id in 0..mult(7, 7) {
            let (row, col) = id_to_coords(id, 7);
            assert_eq!(coords_to_id(row, col, 7), id);
        }
    }

    #[test]
    fn row_major_order() {
        assert_eq!(id_to_coords(0, 10), (0, 0));
        assert_eq!(id_to_coords(9, 10), (0, 9));
        assert_eq!(id_to_coords(42, 10), (4, 2));
        assert_eq!(coords_to_id(4, 2, 10), 42);
    }
}
