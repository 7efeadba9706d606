//! Two-state label grids and the row-major index convention
//!
//! Every linear pixel index in the crate is row-major (`row * cols + col`).
//! Traversal orders are expressed as permutations of these indices, so the
//! optimizers never unravel indices any other way.

use bitvec::prelude::*;
use ndarray::Array2;

use crate::io::error::{DenoiseError, Result, invalid_parameter, shape_mismatch};

/// Foreground label
pub const POSITIVE: i8 = 1;
/// Background label
pub const NEGATIVE: i8 = -1;

/// Orthogonal neighbourhood offsets (up, down, left, right)
pub const NEIGHBOUR_OFFSETS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Grid position
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Coord {
    /// Row index
    pub row: usize,
    /// Column index
    pub col: usize,
}

impl Coord {
    /// Create a coordinate
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Grid dimensions and the linear index convention
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shape {
    /// Number of rows
    pub rows: usize,
    /// Number of columns
    pub cols: usize,
}

impl Shape {
    /// Create a shape
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Total number of pixels
    pub const fn len(&self) -> usize {
        self.rows * self.cols
    }

    /// Whether the shape holds no pixels
    pub const fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Whether a coordinate lies inside the grid
    pub const fn contains(&self, coord: Coord) -> bool {
        coord.row < self.rows && coord.col < self.cols
    }

    /// Row-major linear index of a coordinate
    pub const fn index_of(&self, coord: Coord) -> usize {
        coord.row * self.cols + coord.col
    }

    /// Coordinate of a row-major linear index
    pub const fn coord_of(&self, index: usize) -> Coord {
        Coord::new(index / self.cols, index % self.cols)
    }

    /// In-bounds orthogonal neighbours of a coordinate, without wraparound
    pub fn neighbours(&self, coord: Coord) -> impl Iterator<Item = Coord> + use<> {
        let shape = *self;
        NEIGHBOUR_OFFSETS.into_iter().filter_map(move |(dr, dc)| {
            let row = coord.row.checked_add_signed(dr)?;
            let col = coord.col.checked_add_signed(dc)?;
            let neighbour = Coord::new(row, col);
            shape.contains(neighbour).then_some(neighbour)
        })
    }

    /// Dimensions as a `(rows, cols)` tuple
    pub const fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }
}

/// Two-dimensional field of `+1`/`-1` labels
///
/// Construction validates every cell, so an existing grid always holds exactly
/// two label values and at least one pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelGrid {
    cells: Array2<i8>,
}

impl LabelGrid {
    /// Wrap an existing array after validating its labels
    ///
    /// # Errors
    ///
    /// Returns an error if the array is empty or any cell is not `+1`/`-1`
    pub fn from_array(cells: Array2<i8>) -> Result<Self> {
        let (rows, cols) = cells.dim();
        if rows == 0 || cols == 0 {
            return Err(DenoiseError::InvalidSourceData {
                reason: format!("Label grid must be non-empty, got {rows}x{cols}"),
            });
        }

        if let Some(((row, col), &value)) = cells
            .indexed_iter()
            .find(|(_, v)| **v != POSITIVE && **v != NEGATIVE)
        {
            return Err(DenoiseError::InvalidLabel {
                value,
                position: (row, col),
            });
        }

        Ok(Self { cells })
    }

    /// Build a grid from row-major values
    ///
    /// # Errors
    ///
    /// Returns an error if `values.len() != rows * cols`, the grid is empty,
    /// or any value is not `+1`/`-1`
    pub fn from_vec(rows: usize, cols: usize, values: Vec<i8>) -> Result<Self> {
        let len = values.len();
        let cells = Array2::from_shape_vec((rows, cols), values).map_err(|e| {
            invalid_parameter(
                "values",
                &len,
                &format!("cannot form a {rows}x{cols} grid: {e}"),
            )
        })?;
        Self::from_array(cells)
    }

    /// Build a grid from nested rows
    ///
    /// # Errors
    ///
    /// Returns an error if rows are ragged, empty, or contain invalid labels
    pub fn from_rows<R: AsRef<[i8]>>(rows: &[R]) -> Result<Self> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut values = Vec::with_capacity(rows.len() * cols);
        for (index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(invalid_parameter(
                    "rows",
                    &index,
                    &format!("row has {} labels, expected {cols}", row.len()),
                ));
            }
            values.extend_from_slice(row);
        }
        Self::from_vec(rows.len(), cols, values)
    }

    /// Grid with every pixel set to one label
    ///
    /// # Errors
    ///
    /// Returns an error if the shape is empty or the label is invalid
    pub fn filled(rows: usize, cols: usize, label: i8) -> Result<Self> {
        Self::from_array(Array2::from_elem((rows, cols), label))
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.cells.nrows()
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cells.ncols()
    }

    /// Grid dimensions
    pub fn shape(&self) -> Shape {
        let (rows, cols) = self.cells.dim();
        Shape::new(rows, cols)
    }

    /// Number of pixels
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false; grids are validated non-empty on construction
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Label at a coordinate, if in bounds
    pub fn get(&self, coord: Coord) -> Option<i8> {
        self.cells.get((coord.row, coord.col)).copied()
    }

    /// Label at a coordinate known to be in bounds
    pub(crate) fn label(&self, coord: Coord) -> i8 {
        self.get(coord).unwrap_or(NEGATIVE)
    }

    /// Negate the label at a coordinate; returns false if out of bounds
    pub fn flip(&mut self, coord: Coord) -> bool {
        self.cells
            .get_mut((coord.row, coord.col))
            .map(|v| *v = -*v)
            .is_some()
    }

    /// Sum of the in-bounds orthogonal neighbour labels
    pub fn neighbour_sum(&self, coord: Coord) -> i32 {
        self.shape()
            .neighbours(coord)
            .map(|n| i32::from(self.label(n)))
            .sum()
    }

    /// Number of pixels holding `label`
    pub fn count(&self, label: i8) -> usize {
        self.cells.iter().filter(|&&v| v == label).count()
    }

    /// Labels in row-major order
    pub fn values(&self) -> impl Iterator<Item = i8> + '_ {
        self.cells.iter().copied()
    }

    /// Packed row-major state, one bit per pixel (`true` = `+1`)
    ///
    /// Two grids of the same shape are equal exactly when their keys are.
    pub fn state_key(&self) -> BitVec {
        self.cells.iter().map(|&v| v == POSITIVE).collect()
    }

    /// Number of pixels whose labels differ
    ///
    /// # Errors
    ///
    /// Returns an error if the shapes differ
    pub fn hamming_distance(&self, other: &Self) -> Result<usize> {
        ensure_same_shape("hamming_distance", self, other)?;
        Ok(self
            .cells
            .iter()
            .zip(other.cells.iter())
            .filter(|(a, b)| a != b)
            .count())
    }

    /// Build a grid from row-major labels already known to be `+1`/`-1`
    pub(crate) fn from_trusted(shape: Shape, values: &[i8]) -> Self {
        let cells = Array2::from_shape_fn(shape.dims(), |(row, col)| {
            values
                .get(shape.index_of(Coord::new(row, col)))
                .copied()
                .unwrap_or(NEGATIVE)
        });
        Self { cells }
    }
}

/// Fail with a shape mismatch unless both grids share dimensions
///
/// # Errors
///
/// Returns [`DenoiseError::ShapeMismatch`] if the shapes differ
pub fn ensure_same_shape(
    operation: &'static str,
    expected: &LabelGrid,
    found: &LabelGrid,
) -> Result<()> {
    let (expected, found) = (expected.shape(), found.shape());
    if expected == found {
        Ok(())
    } else {
        Err(shape_mismatch(operation, expected.dims(), found.dims()))
    }
}
