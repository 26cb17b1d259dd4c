//! Ancestry — probabilistic cat family trees
//!
//! A founding couple expands generation by generation into a mutable
//! family graph with inherited genetics, incremental edits, and chart
//! projections for rendering.

pub mod cat;
pub mod chart;
pub mod error;
pub mod storage;
pub mod tree;
pub mod worker;

pub use cat::{Cat, CatGenetics, CatParams, Gender, MutationPool, PaletteMode};
pub use error::{Result, TreeError};
pub use storage::TreeStore;
pub use tree::{
    estimate_cat_count, FoundingCoupleInput, SerializedAncestryTree, TreeGenerationConfig,
    TreeManager,
};
pub use worker::{spawn_generation, GenerationHandle, GenerationRequest};
