//! The family tree engine: configuration, the authoritative graph store,
//! the manager facade, and generation-by-generation expansion.

mod config;
mod generation;
mod manager;
mod store;

pub use config::{
    estimate_cat_count, OffspringOptions, SizeEstimate, TreeGenerationConfig, REFUSE_THRESHOLD,
    WARN_THRESHOLD,
};
pub use manager::{
    AncestryTree, BreedingPair, FounderInput, FoundingCoupleInput, OffspringRequest,
    SerializedAncestryTree, TreeManager,
};
pub use store::{GraphStore, Relationship};
