pub mod gaussian;
pub mod hoi;
pub mod ordinal;

// Unified re-exports for common estimators so tests and users can import
// hoinfo::estimators::approaches::* ergonomically.
pub use gaussian::copnorm::{GaussianCopula, Identity};
pub use gaussian::gaussian::GaussianEntropy;
pub use hoi::engine::{HoiEngine, HoiInput, OInfoTable};
pub use ordinal::ordinal::PermutationEntropy;
pub use ordinal::ordinal_map::PermutationEntropyMap;
