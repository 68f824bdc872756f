/// Dense row-major `f64` matrix.
///
/// Holds the sampled parameter and objective-function tables. The column
/// count is kept explicitly so a matrix with zero columns still knows how
/// many rows it has.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Create a matrix from row-major data, checking `data.len() == rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, String> {
        if data.len() != rows * cols {
            return Err(format!(
                "expected {} values for a {}x{} matrix, got {}",
                rows * cols,
                rows,
                cols,
                data.len()
            ));
        }
        Ok(Self { rows, cols, data })
    }

    /// Build a matrix from a list of equally sized rows.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, String> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(format!(
                    "row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    cols
                ));
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// A matrix with `rows` rows and no columns.
    pub fn empty_columns(rows: usize) -> Self {
        Self {
            rows,
            cols: 0,
            data: Vec::new(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        (0..self.rows).map(move |r| self.row(r))
    }

    pub fn column(&self, col: usize) -> impl Iterator<Item = f64> + '_ {
        (0..self.rows).map(move |r| self.get(r, col))
    }

    /// New matrix made of the given columns, in the given order.
    pub fn select_columns(&self, cols: &[usize]) -> Self {
        let mut data = Vec::with_capacity(self.rows * cols.len());
        for r in 0..self.rows {
            data.extend(cols.iter().map(|&c| self.get(r, c)));
        }
        Self {
            rows: self.rows,
            cols: cols.len(),
            data,
        }
    }

    /// New matrix keeping the rows where `mask` is true, order preserved.
    pub fn filter_rows(&self, mask: &[bool]) -> Self {
        let mut data = Vec::new();
        let mut rows = 0;
        for (r, _) in mask.iter().enumerate().filter(|(_, keep)| **keep) {
            data.extend_from_slice(self.row(r));
            rows += 1;
        }
        Self {
            rows,
            cols: self.cols,
            data,
        }
    }
}
