//! Cat data model: identity, appearance, genetics, names, and the
//! mutation pool the engine draws new trait values from.

mod cat;
mod genetics;
mod names;
mod pool;

pub use cat::{new_cat_id, Cat, CatId, CatName, CatParams, CatSource, Gender, LifeStage, ParentKind};
pub use genetics::{CatGenetics, GeneticTrait, TortiePolicy, MUTATION_RATE};
pub use names::{generate_warrior_name, update_name_for_life_stage, WARRIOR_SUFFIXES};
pub use pool::{MutationPool, PaletteMode};
