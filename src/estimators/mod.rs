pub mod approaches;
pub mod config;
pub mod entropy;
pub mod o_information;
pub mod traits;

pub use traits::{GlobalValue, LocalValues, Normalizer};
