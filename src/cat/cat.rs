//! Cat — a node in the family graph
//!
//! A cat carries its identity, display name, drawable appearance bundle,
//! genetics, and the relational links (parents, partners, children) that
//! the graph store keeps consistent.

use super::genetics::CatGenetics;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique, immutable cat identifier (uuid v4 string)
pub type CatId = String;

pub fn new_cat_id() -> CatId {
    Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    F,
    M,
}

impl Gender {
    pub fn opposite(self) -> Gender {
        match self {
            Gender::F => Gender::M,
            Gender::M => Gender::F,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::F => write!(f, "F"),
            Gender::M => write!(f, "M"),
        }
    }
}

/// Cosmetic age category. Display-only; never consulted by generation math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifeStage {
    Kit,
    Apprentice,
    Warrior,
    Leader,
    Elder,
}

/// How a cat entered the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatSource {
    /// Imported from an external creation-history profile
    History,
    /// Produced by the generation algorithm
    Generated,
    /// Added through a discrete edit operation
    Edited,
}

/// Which parent slot an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParentKind {
    Mother,
    Father,
}

impl ParentKind {
    pub fn gender(self) -> Gender {
        match self {
            ParentKind::Mother => Gender::F,
            ParentKind::Father => Gender::M,
        }
    }
}

impl fmt::Display for ParentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParentKind::Mother => write!(f, "mother"),
            ParentKind::Father => write!(f, "father"),
        }
    }
}

/// A warrior name. `full` is always `capitalize(prefix) + suffix`; the
/// engine never parses it back apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatName {
    pub prefix: String,
    pub suffix: String,
    pub full: String,
}

/// Drawable appearance bundle. Opaque to the engine: it is produced by the
/// genetics resolver or the mutation pool and handed to renderers unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatParams {
    pub sprite_number: u32,
    pub pelt_name: String,
    pub colour: String,
    pub eye_colour: String,
    pub skin_colour: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub white_patches: Option<String>,
    pub is_tortie: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tortie_mask: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accessories: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scars: Vec<String>,
    pub shading: bool,
    pub reverse: bool,
}

impl Default for CatParams {
    fn default() -> Self {
        Self {
            sprite_number: 0,
            pelt_name: String::new(),
            colour: String::new(),
            eye_colour: String::new(),
            skin_colour: String::new(),
            white_patches: None,
            is_tortie: false,
            tortie_mask: None,
            accessories: Vec::new(),
            scars: Vec::new(),
            shading: true,
            reverse: false,
        }
    }
}

/// A node in the family graph.
///
/// Relational invariants (enforced by the graph store, not by direct field
/// writes): `partner_ids` is symmetric, `children_ids` is consistent with
/// the children's `mother_id`/`father_id`, and parents resolve to cats of
/// the matching gender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cat {
    pub id: CatId,
    pub name: CatName,
    pub gender: Gender,
    pub life_stage: LifeStage,
    pub params: CatParams,
    #[serde(default)]
    pub mother_id: Option<CatId>,
    #[serde(default)]
    pub father_id: Option<CatId>,
    #[serde(default)]
    pub partner_ids: Vec<CatId>,
    #[serde(default)]
    pub children_ids: Vec<CatId>,
    pub genetics: CatGenetics,
    pub source: CatSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_profile_id: Option<String>,
    pub generation: u32,
}

impl Cat {
    pub fn is_founder(&self) -> bool {
        self.generation == 0 && self.mother_id.is_none() && self.father_id.is_none()
    }

    /// A cat with two partners is considered fully partnered by the
    /// generation algorithm's reuse search.
    pub fn has_full_partner_complement(&self) -> bool {
        self.partner_ids.len() >= 2
    }

    pub fn summary(&self) -> String {
        format!(
            "{} ({}) gen {} | pelt {} {} | partners {} | children {}",
            self.name.full,
            self.gender,
            self.generation,
            self.params.colour,
            self.params.pelt_name,
            self.partner_ids.len(),
            self.children_ids.len()
        )
    }
}
