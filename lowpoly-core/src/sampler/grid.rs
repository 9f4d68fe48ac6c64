use crate::{coord::Coord, Scalar};

/// Uniform bucket grid over accepted points.
/// With cell size not smaller than the largest separation, every point that can be in conflict
/// with a candidate lives in the 3x3 block of cells around it.
#[derive(Debug, Clone)]
pub(crate) struct PointsGrid {
    cell_size: Scalar,
    columns: usize,
    rows: usize,
    cells: Vec<Vec<usize>>,
}

impl PointsGrid {
    pub fn new(width: Scalar, height: Scalar, cell_size: Scalar) -> Self {
        let cell_size = cell_size.max(1.0);
        let columns = (width.max(0.0) / cell_size) as usize + 1;
        let rows = (height.max(0.0) / cell_size) as usize + 1;
        Self {
            cell_size,
            columns,
            rows,
            cells: vec![vec![]; columns * rows],
        }
    }

    #[inline]
    fn cell_of(&self, point: Coord) -> (usize, usize) {
        let col = ((point.x / self.cell_size).max(0.0) as usize).min(self.columns - 1);
        let row = ((point.y / self.cell_size).max(0.0) as usize).min(self.rows - 1);
        (col, row)
    }

    pub fn insert(&mut self, index: usize, point: Coord) {
        let (col, row) = self.cell_of(point);
        self.cells[row * self.columns + col].push(index);
    }

    /// Returns indices of points stored in cells around given point.
    pub fn neighbors(&self, point: Coord) -> impl Iterator<Item = usize> + '_ {
        let (col, row) = self.cell_of(point);
        let fx = col.saturating_sub(1);
        let fy = row.saturating_sub(1);
        let tx = (col + 1).min(self.columns - 1);
        let ty = (row + 1).min(self.rows - 1);
        (fy..=ty)
            .flat_map(move |y| (fx..=tx).map(move |x| y * self.columns + x))
            .flat_map(move |i| self.cells[i].iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbors_cover_separation() {
        let mut grid = PointsGrid::new(100.0, 100.0, 10.0);
        grid.insert(0, Coord::new(5.0, 5.0));
        grid.insert(1, Coord::new(19.0, 19.0));
        grid.insert(2, Coord::new(45.0, 45.0));
        grid.insert(3, Coord::new(100.0, 100.0));
        let mut found = grid.neighbors(Coord::new(12.0, 12.0)).collect::<Vec<_>>();
        found.sort_unstable();
        assert_eq!(found, vec![0, 1]);
        assert_eq!(grid.neighbors(Coord::new(99.0, 95.0)).collect::<Vec<_>>(), vec![3]);
    }
}
