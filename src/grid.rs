/// Dimensions of a dense row-major grid (heightfield, ink channels, pixels).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Index of `(x, y)` with both coordinates clamped to the grid edge.
    #[inline]
    pub fn clamped_index(&self, x: isize, y: isize) -> usize {
        let x = x.clamp(0, self.width as isize - 1) as usize;
        let y = y.clamp(0, self.height as isize - 1) as usize;
        self.index(x, y)
    }

    /// Edge-clamped sample of `field`.
    #[inline]
    pub fn sample(&self, field: &[f32], x: isize, y: isize) -> f32 {
        field[self.clamped_index(x, y)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamped_index_extends_edges() {
        let g = Grid::new(4, 3);
        assert_eq!(g.len(), 12);
        assert_eq!(g.clamped_index(-1, -1), 0);
        assert_eq!(g.clamped_index(4, 0), 3);
        assert_eq!(g.clamped_index(2, 7), g.index(2, 2));
    }
}
