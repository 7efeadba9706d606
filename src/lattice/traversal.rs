//! Sweep orders over the lattice
//!
//! A [`TraversalPlan`] is a fully materialized permutation of row-major pixel
//! indices, rotated so that the sweep begins at a chosen start pixel. The plan
//! is built once per optimization run and replayed for every sweep.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::io::error::{DenoiseError, Result, invalid_parameter};
use crate::lattice::grid::{Coord, Shape};

/// Order in which one sweep visits the pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TraversalOrder {
    /// Raster order, row by row
    #[default]
    RowMajor,
    /// Column by column, top to bottom
    ColumnMajor,
    /// Increasing `row + col`, ties broken by row then column
    Diagonal,
    /// Uniform random permutation drawn once per run
    Random,
}

impl TraversalOrder {
    /// Every supported order
    pub const ALL: [Self; 4] = [
        Self::RowMajor,
        Self::ColumnMajor,
        Self::Diagonal,
        Self::Random,
    ];

    /// Canonical name accepted by [`FromStr`]
    pub const fn name(self) -> &'static str {
        match self {
            Self::RowMajor => "row-major",
            Self::ColumnMajor => "column-major",
            Self::Diagonal => "diagonal",
            Self::Random => "random",
        }
    }
}

impl fmt::Display for TraversalOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TraversalOrder {
    type Err = DenoiseError;

    /// Accepts the canonical names and the short forms `H`, `V`, `D`
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "row-major" | "row" | "horizontal" | "h" => Ok(Self::RowMajor),
            "column-major" | "column" | "vertical" | "v" => Ok(Self::ColumnMajor),
            "diagonal" | "d" => Ok(Self::Diagonal),
            "random" | "r" => Ok(Self::Random),
            _ => Err(DenoiseError::UnknownTraversalOrder {
                value: s.to_string(),
            }),
        }
    }
}

/// Materialized visit order for one sweep
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraversalPlan {
    shape: Shape,
    indices: Vec<usize>,
}

impl TraversalPlan {
    /// Build the sweep order for a grid
    ///
    /// The random source is only consumed for [`TraversalOrder::Random`], so
    /// two calls with equal arguments and equally seeded generators return
    /// equal plans.
    ///
    /// # Errors
    ///
    /// Returns an error if `start` lies outside the grid
    pub fn new<R: Rng + ?Sized>(
        shape: Shape,
        order: TraversalOrder,
        start: Coord,
        rng: &mut R,
    ) -> Result<Self> {
        if !shape.contains(start) {
            return Err(invalid_parameter(
                "start",
                &format!("({}, {})", start.row, start.col),
                &format!("outside {}x{} grid", shape.rows, shape.cols),
            ));
        }

        let mut indices = base_order(shape, order);
        if order == TraversalOrder::Random {
            indices.shuffle(rng);
        }

        let start_index = shape.index_of(start);
        let offset = indices
            .iter()
            .position(|&index| index == start_index)
            .unwrap_or(0);
        indices.rotate_left(offset);

        Ok(Self { shape, indices })
    }

    /// Row-major linear indices in visit order
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Coordinates in visit order
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        self.indices
            .iter()
            .map(move |&index| self.shape.coord_of(index))
    }

    /// Grid shape the plan covers
    pub const fn shape(&self) -> Shape {
        self.shape
    }

    /// Number of visits per sweep
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether the plan visits nothing
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

fn base_order(shape: Shape, order: TraversalOrder) -> Vec<usize> {
    match order {
        TraversalOrder::RowMajor | TraversalOrder::Random => (0..shape.len()).collect(),
        TraversalOrder::ColumnMajor => (0..shape.cols)
            .flat_map(|col| (0..shape.rows).map(move |row| shape.index_of(Coord::new(row, col))))
            .collect(),
        TraversalOrder::Diagonal => {
            let mut coords: Vec<Coord> = (0..shape.len()).map(|i| shape.coord_of(i)).collect();
            coords.sort_by_key(|c| (c.row + c.col, c.row, c.col));
            coords.into_iter().map(|c| shape.index_of(c)).collect()
        }
    }
}
