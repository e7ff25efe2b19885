// Dense row-major DP storage.
// Rows are parasite edges, columns are host edges or location indexes.
#[derive(Debug, Clone)]
pub(crate) struct PairTable<T> {
    columns: usize,
    cells: Vec<T>,
}

impl<T: Clone> PairTable<T> {
    pub(crate) fn new(rows: usize, columns: usize, fill: T) -> Self {
        Self {
            columns,
            cells: vec![fill; rows * columns],
        }
    }

    #[inline]
    pub(crate) fn get(&self, row: usize, column: usize) -> &T {
        debug_assert!(column < self.columns);
        &self.cells[row * self.columns + column]
    }

    #[inline]
    pub(crate) fn set(&mut self, row: usize, column: usize, value: T) {
        debug_assert!(column < self.columns);
        self.cells[row * self.columns + column] = value;
    }
}
