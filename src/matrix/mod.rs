//! Matrix module: the column- and row-sparse pair and dense helpers.

pub mod dense;
pub mod lines;
pub mod sparse_column;
pub mod sparse_row;

pub use dense::DenseMatrix;
pub use lines::LineRef;
pub use sparse_column::SparseColumnMatrix;
pub use sparse_row::SparseRowMatrix;
