// mod.rs - Data structures and input readers

pub mod matrix;
pub mod readers;

// Re-export main types for convenience
pub use matrix::{CharacterMatrix, RawMatrix, ResolvedMatrix, State, StateValue};
pub use readers::{CldfReader, FastaReader, HarvestReader, MatrixReader, ReaderRegistry};
