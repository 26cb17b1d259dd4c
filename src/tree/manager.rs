//! TreeManager: the public facade over the family graph
//!
//! Owns the graph store, the mutation pool, the rng, and the generation
//! bookkeeping. All cat creation funnels through [`TreeManager::create_cat`]
//! so names, life stages, and links stay consistent. Bulk generation lives
//! in `tree::generation`; this file carries the discrete operations:
//! founders, single litters, partner edits, parent addition, and the
//! serialized wire form.

use super::config::TreeGenerationConfig;
use super::store::GraphStore;
use crate::cat::{
    generate_warrior_name, new_cat_id, Cat, CatGenetics, CatId, CatName, CatParams, CatSource,
    Gender, LifeStage, MutationPool, ParentKind,
};
use crate::error::{Result, TreeError};
use chrono::Utc;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// A (mother, father) tuple consumed by one generation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreedingPair {
    pub mother_id: CatId,
    pub father_id: CatId,
}

/// One side of the founding couple.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FounderInput {
    pub params: CatParams,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<CatName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_profile_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoundingCoupleInput {
    pub mother: FounderInput,
    pub father: FounderInput,
}

/// Explicit request for a single litter. Overrides ride along on the
/// request instead of temporarily mutating the stored config.
#[derive(Debug, Clone)]
pub struct OffspringRequest {
    pub mother_id: CatId,
    pub father_id: CatId,
    pub generation: u32,
    /// Overrides the gender draw for the first child of the litter
    pub forced_gender: Option<Gender>,
    /// Overrides the configured `[min_children, max_children]` draw
    pub litter_size: Option<u32>,
}

impl OffspringRequest {
    pub fn new(mother_id: impl Into<CatId>, father_id: impl Into<CatId>, generation: u32) -> Self {
        Self {
            mother_id: mother_id.into(),
            father_id: father_id.into(),
            generation,
            forced_gender: None,
            litter_size: None,
        }
    }
}

/// The live tree owned by a manager.
#[derive(Debug, Clone)]
pub struct AncestryTree {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub creator_name: Option<String>,
    pub founding_mother_id: CatId,
    pub founding_father_id: CatId,
    pub store: GraphStore,
    pub config: TreeGenerationConfig,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Wire/storage form of a tree. The JSON shape is an external contract,
/// hence the camelCase field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedAncestryTree {
    pub id: String,
    pub slug: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_name: Option<String>,
    pub founding_mother_id: CatId,
    pub founding_father_id: CatId,
    pub cats: Vec<Cat>,
    pub config: TreeGenerationConfig,
    pub created_at: i64,
    pub updated_at: i64,
}

impl SerializedAncestryTree {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse persisted JSON, migrating the legacy scalar `partnerId` field
    /// of old saves into the `partnerIds` array.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut value: serde_json::Value = serde_json::from_str(json)?;
        if let Some(cats) = value.get_mut("cats").and_then(|c| c.as_array_mut()) {
            for cat in cats {
                let legacy = cat.get("partnerId").cloned();
                let has_list = cat
                    .get("partnerIds")
                    .map(|v| v.is_array())
                    .unwrap_or(false);
                if !has_list {
                    if let (Some(obj), Some(partner)) = (cat.as_object_mut(), legacy) {
                        let list = if partner.is_null() {
                            Vec::new()
                        } else {
                            vec![partner]
                        };
                        obj.insert("partnerIds".to_string(), serde_json::Value::Array(list));
                    }
                }
            }
        }
        Ok(serde_json::from_value(value)?)
    }
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn base36(mut value: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

fn generate_slug<R: Rng + ?Sized>(rng: &mut R) -> String {
    let tag: String = (0..6)
        .map(|_| char::from_digit(rng.gen_range(0..36), 36).unwrap_or('0'))
        .collect();
    format!("tree-{}-{}", base36(now_millis() as u64), tag)
}

pub struct TreeManager {
    pub(crate) tree: AncestryTree,
    pub(crate) used_names: HashSet<String>,
    pub(crate) pool: MutationPool,
    pub(crate) couples_per_generation: Vec<Vec<BreedingPair>>,
    pub(crate) rng: StdRng,
}

impl TreeManager {
    pub fn new(pool: MutationPool) -> Self {
        Self::with_rng(pool, StdRng::from_entropy())
    }

    /// Deterministic manager for reproducible generation and tests.
    pub fn seeded(pool: MutationPool, seed: u64) -> Self {
        Self::with_rng(pool, StdRng::seed_from_u64(seed))
    }

    fn with_rng(pool: MutationPool, mut rng: StdRng) -> Self {
        let now = now_millis();
        let tree = AncestryTree {
            id: Uuid::new_v4().to_string(),
            slug: generate_slug(&mut rng),
            name: "Unnamed Tree".to_string(),
            creator_name: None,
            founding_mother_id: String::new(),
            founding_father_id: String::new(),
            store: GraphStore::new(),
            config: TreeGenerationConfig::default(),
            created_at: now,
            updated_at: now,
        };
        Self {
            tree,
            used_names: HashSet::new(),
            pool,
            couples_per_generation: Vec::new(),
            rng,
        }
    }

    pub fn tree(&self) -> &AncestryTree {
        &self.tree
    }

    pub fn get_cat(&self, id: &str) -> Option<&Cat> {
        self.tree.store.get(id)
    }

    pub fn all_cats(&self) -> impl Iterator<Item = &Cat> {
        self.tree.store.all()
    }

    pub fn cat_count(&self) -> usize {
        self.tree.store.len()
    }

    pub fn mutation_pool(&self) -> &MutationPool {
        &self.pool
    }

    /// Replace the configuration. Rejected (and left unchanged) when any
    /// value is out of range; values are never clamped here.
    pub fn set_config(&mut self, config: TreeGenerationConfig) -> Result<()> {
        config.validate()?;
        self.tree.config = config;
        self.touch();
        Ok(())
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.tree.name = name.into();
        self.touch();
    }

    pub fn set_creator_name(&mut self, creator: impl Into<String>) {
        self.tree.creator_name = Some(creator.into());
        self.touch();
    }

    pub(crate) fn touch(&mut self) {
        self.tree.updated_at = now_millis();
    }

    fn validate_founder(input: &FounderInput, side: &str) -> Result<()> {
        if input.params.pelt_name.trim().is_empty() || input.params.colour.trim().is_empty() {
            return Err(TreeError::InvalidInput(format!(
                "founding {side} is missing appearance genetics"
            )));
        }
        Ok(())
    }

    /// Create the two generation-0 cats and make them partners. Any
    /// previous tree contents are discarded.
    pub fn initialize_founding_couple(
        &mut self,
        input: FoundingCoupleInput,
    ) -> Result<(CatId, CatId)> {
        Self::validate_founder(&input.mother, "mother")?;
        Self::validate_founder(&input.father, "father")?;

        self.tree.store.clear();
        self.used_names.clear();
        self.couples_per_generation.clear();

        let mother_genetics = CatGenetics::from_params(&input.mother.params);
        let mother_source = if input.mother.history_profile_id.is_some() {
            CatSource::History
        } else {
            CatSource::Generated
        };
        let mother_id = self.create_cat(NewCat {
            params: input.mother.params,
            gender: Gender::F,
            generation: 0,
            mother_id: None,
            father_id: None,
            genetics: mother_genetics,
            source: mother_source,
            history_profile_id: input.mother.history_profile_id,
            name: input.mother.name,
        })?;

        let father_genetics = CatGenetics::from_params(&input.father.params);
        let father_source = if input.father.history_profile_id.is_some() {
            CatSource::History
        } else {
            CatSource::Generated
        };
        let father_id = self.create_cat(NewCat {
            params: input.father.params,
            gender: Gender::M,
            generation: 0,
            mother_id: None,
            father_id: None,
            genetics: father_genetics,
            source: father_source,
            history_profile_id: input.father.history_profile_id,
            name: input.father.name,
        })?;

        self.tree.store.link_partners(&mother_id, &father_id)?;
        self.tree.founding_mother_id = mother_id.clone();
        self.tree.founding_father_id = father_id.clone();
        self.touch();

        info!("initialized founding couple {mother_id} / {father_id}");
        Ok((mother_id, father_id))
    }

    /// Generate one litter for a breeding pair. The request carries any
    /// per-call overrides; the stored config is not touched.
    pub fn generate_offspring(&mut self, request: OffspringRequest) -> Result<Vec<CatId>> {
        let (mother_genetics, mother_generation) = {
            let mother = self.tree.store.require(&request.mother_id)?;
            if mother.gender != Gender::F {
                return Err(TreeError::InvalidInput(format!(
                    "cat {} is not female and cannot be a mother",
                    request.mother_id
                )));
            }
            (mother.genetics.clone(), mother.generation)
        };
        let (father_genetics, father_generation) = {
            let father = self.tree.store.require(&request.father_id)?;
            if father.gender != Gender::M {
                return Err(TreeError::InvalidInput(format!(
                    "cat {} is not male and cannot be a father",
                    request.father_id
                )));
            }
            (father.genetics.clone(), father.generation)
        };

        let expected_generation = mother_generation.max(father_generation) + 1;
        if request.generation != expected_generation {
            return Err(TreeError::InvalidInput(format!(
                "children of this pair belong to generation {expected_generation}, got {}",
                request.generation
            )));
        }

        let config = self.tree.config.clone();
        let litter_size = match request.litter_size {
            Some(size) => size,
            None => self
                .rng
                .gen_range(config.min_children..=config.max_children),
        };

        let mut children = Vec::with_capacity(litter_size as usize);
        for i in 0..litter_size {
            let gender = match (i, request.forced_gender) {
                (0, Some(forced)) => forced,
                _ => {
                    if self.rng.gen_bool(config.gender_ratio) {
                        Gender::M
                    } else {
                        Gender::F
                    }
                }
            };

            let genetics = CatGenetics::inherit(
                &mother_genetics,
                &father_genetics,
                gender,
                &self.pool,
                config.tortie_policy,
                &mut self.rng,
            );
            let sprite = self.pool.random_sprite(&mut self.rng);
            let mut params = genetics.to_params(sprite, &self.pool, &mut self.rng);
            self.apply_offspring_options(&mut params);

            let child_id = self.create_cat(NewCat {
                params,
                gender,
                generation: request.generation,
                mother_id: Some(request.mother_id.clone()),
                father_id: Some(request.father_id.clone()),
                genetics,
                source: CatSource::Generated,
                history_profile_id: None,
                name: None,
            })?;
            self.tree.store.link_child(&request.mother_id, &child_id)?;
            self.tree.store.link_child(&request.father_id, &child_id)?;
            children.push(child_id);
        }

        self.touch();
        debug!(
            "litter of {} for {} x {} at generation {}",
            children.len(),
            request.mother_id,
            request.father_id,
            request.generation
        );
        Ok(children)
    }

    /// Link an existing cat as partner, or invent an outsider from the
    /// supplied appearance. Optionally breeds one litter for the new pair.
    pub fn assign_partner(
        &mut self,
        cat_id: &str,
        partner_params: Option<CatParams>,
        partner_id: Option<&str>,
        generate_children: bool,
    ) -> Result<CatId> {
        let (cat_gender, cat_generation, cat_stage) = {
            let cat = self.tree.store.require(cat_id)?;
            (cat.gender, cat.generation, cat.life_stage)
        };

        let (partner_id, partner_generation) = match partner_id {
            Some(existing_id) => {
                let partner = self.tree.store.require(existing_id)?;
                if partner.gender != cat_gender.opposite() {
                    return Err(TreeError::InvalidInput(format!(
                        "partner {existing_id} must be of the opposite gender"
                    )));
                }
                (existing_id.to_string(), partner.generation)
            }
            None => {
                let params = partner_params.ok_or_else(|| {
                    TreeError::InvalidInput(
                        "partner genetics are required when no existing cat is named".to_string(),
                    )
                })?;
                let genetics = CatGenetics::from_params(&params);
                let id = self.create_cat(NewCat {
                    params,
                    gender: cat_gender.opposite(),
                    generation: cat_generation,
                    mother_id: None,
                    father_id: None,
                    genetics,
                    source: CatSource::Edited,
                    history_profile_id: None,
                    name: None,
                })?;
                if let Some(partner) = self.tree.store.get_mut(&id) {
                    partner.life_stage = cat_stage;
                }
                (id, cat_generation)
            }
        };

        self.tree.store.link_partners(cat_id, &partner_id)?;
        self.touch();

        // The litter lands one level below the deeper of the two partners
        // so generation monotonicity holds for cross-generation couples.
        let litter_generation = cat_generation.max(partner_generation) + 1;
        if generate_children && litter_generation <= self.tree.config.depth {
            let (mother_id, father_id) = if cat_gender == Gender::F {
                (cat_id.to_string(), partner_id.clone())
            } else {
                (partner_id.clone(), cat_id.to_string())
            };
            self.generate_offspring(OffspringRequest::new(
                mother_id,
                father_id,
                litter_generation,
            ))?;
        }

        Ok(partner_id)
    }

    /// Swap the most recently linked partner for a freshly invented
    /// outsider. Existing children keep their original parents; only the
    /// partner links change.
    pub fn replace_partner(&mut self, cat_id: &str, new_partner_params: CatParams) -> Result<CatId> {
        let (cat_gender, cat_generation, cat_stage, last_partner) = {
            let cat = self.tree.store.require(cat_id)?;
            (
                cat.gender,
                cat.generation,
                cat.life_stage,
                cat.partner_ids.last().cloned(),
            )
        };

        if let Some(old_partner_id) = &last_partner {
            self.tree.store.unlink_partners(cat_id, old_partner_id)?;
            debug!("unlinked partner {old_partner_id} from {cat_id}");
        }

        let genetics = CatGenetics::from_params(&new_partner_params);
        let partner_id = self.create_cat(NewCat {
            params: new_partner_params,
            gender: cat_gender.opposite(),
            generation: cat_generation,
            mother_id: None,
            father_id: None,
            genetics,
            source: CatSource::Edited,
            history_profile_id: None,
            name: None,
        })?;
        if let Some(partner) = self.tree.store.get_mut(&partner_id) {
            partner.life_stage = cat_stage;
        }
        self.tree.store.link_partners(cat_id, &partner_id)?;
        self.touch();
        Ok(partner_id)
    }

    /// Add a missing mother or father as an invented outsider one
    /// generation above the target (never below generation 0).
    pub fn add_parent(
        &mut self,
        cat_id: &str,
        parent_params: CatParams,
        kind: ParentKind,
    ) -> Result<CatId> {
        let (child_generation, other_parent_id) = {
            let child = self.tree.store.require(cat_id)?;
            let occupied = match kind {
                ParentKind::Mother => child.mother_id.is_some(),
                ParentKind::Father => child.father_id.is_some(),
            };
            if occupied {
                return Err(TreeError::AlreadyHasParent {
                    cat_id: cat_id.to_string(),
                    slot: kind,
                });
            }
            let other = match kind {
                ParentKind::Mother => child.father_id.clone(),
                ParentKind::Father => child.mother_id.clone(),
            };
            (child.generation, other)
        };

        let genetics = CatGenetics::from_params(&parent_params);
        let parent_id = self.create_cat(NewCat {
            params: parent_params,
            gender: kind.gender(),
            generation: child_generation.saturating_sub(1),
            mother_id: None,
            father_id: None,
            genetics,
            source: CatSource::Edited,
            history_profile_id: None,
            name: None,
        })?;

        match kind {
            ParentKind::Mother => {
                self.tree.store.require_mut(cat_id)?.mother_id = Some(parent_id.clone());
            }
            ParentKind::Father => {
                self.tree.store.require_mut(cat_id)?.father_id = Some(parent_id.clone());
            }
        }
        self.tree.store.link_child(&parent_id, cat_id)?;

        // When the other parent is known, the two become partners.
        if let Some(other_id) = other_parent_id {
            self.tree.store.link_partners(&parent_id, &other_id)?;
            self.tree.store.link_child(&other_id, cat_id)?;
        }

        self.touch();
        Ok(parent_id)
    }

    pub fn serialize(&self) -> SerializedAncestryTree {
        SerializedAncestryTree {
            id: self.tree.id.clone(),
            slug: self.tree.slug.clone(),
            name: self.tree.name.clone(),
            creator_name: self.tree.creator_name.clone(),
            founding_mother_id: self.tree.founding_mother_id.clone(),
            founding_father_id: self.tree.founding_father_id.clone(),
            cats: self.tree.store.all().cloned().collect(),
            config: self.tree.config.clone(),
            created_at: self.tree.created_at,
            updated_at: self.tree.updated_at,
        }
    }

    /// Rehydrate a manager from a persisted tree. The persisted config is
    /// validated like any other config input; a save carrying out-of-range
    /// values is rejected here instead of misbehaving on the next edit.
    pub fn deserialize(data: SerializedAncestryTree, pool: MutationPool) -> Result<Self> {
        data.config.validate()?;
        let mut manager = Self::new(pool);
        let mut store = GraphStore::new();
        let mut used_names = HashSet::new();
        for cat in data.cats {
            used_names.insert(cat.name.full.to_lowercase());
            store.add_cat(cat)?;
        }
        manager.tree = AncestryTree {
            id: data.id,
            slug: data.slug,
            name: data.name,
            creator_name: data.creator_name,
            founding_mother_id: data.founding_mother_id,
            founding_father_id: data.founding_father_id,
            store,
            config: data.config,
            created_at: data.created_at,
            updated_at: data.updated_at,
        };
        manager.used_names = used_names;
        Ok(manager)
    }

    fn apply_offspring_options(&mut self, params: &mut CatParams) {
        let options = self.tree.config.offspring_options;
        if options.accessory_chance > 0.0 && self.rng.gen_bool(options.accessory_chance) {
            let count = self.rng.gen_range(1..=options.max_accessories) as usize;
            params.accessories = self.pool.pick_accessories(count, &mut self.rng);
        }
        if options.scar_chance > 0.0 && self.rng.gen_bool(options.scar_chance) {
            let count = self.rng.gen_range(1..=options.max_scars) as usize;
            params.scars = self.pool.pick_scars(count, &mut self.rng);
        }
    }

    /// Insert a brand-new cat. Founders are warriors; generated cats roll
    /// one of the younger life stages for name variety.
    pub(crate) fn create_cat(&mut self, new_cat: NewCat) -> Result<CatId> {
        let life_stage = if new_cat.generation == 0 {
            LifeStage::Warrior
        } else {
            [LifeStage::Kit, LifeStage::Apprentice, LifeStage::Warrior]
                [self.rng.gen_range(0..3)]
        };
        let name = match new_cat.name {
            Some(name) => name,
            None => generate_warrior_name(life_stage, &self.used_names, &mut self.rng),
        };
        self.used_names.insert(name.full.to_lowercase());

        let cat = Cat {
            id: new_cat_id(),
            name,
            gender: new_cat.gender,
            life_stage,
            params: new_cat.params,
            mother_id: new_cat.mother_id,
            father_id: new_cat.father_id,
            partner_ids: Vec::new(),
            children_ids: Vec::new(),
            genetics: new_cat.genetics,
            source: new_cat.source,
            history_profile_id: new_cat.history_profile_id,
            generation: new_cat.generation,
        };
        let id = cat.id.clone();
        self.tree.store.add_cat(cat)?;
        Ok(id)
    }
}

/// Everything needed to mint one cat.
pub(crate) struct NewCat {
    pub params: CatParams,
    pub gender: Gender,
    pub generation: u32,
    pub mother_id: Option<CatId>,
    pub father_id: Option<CatId>,
    pub genetics: CatGenetics,
    pub source: CatSource,
    pub history_profile_id: Option<String>,
    pub name: Option<CatName>,
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(super) fn founder_params(pelt: &str, colour: &str) -> CatParams {
        CatParams {
            pelt_name: pelt.into(),
            colour: colour.into(),
            eye_colour: "AMBER".into(),
            skin_colour: "PINK".into(),
            ..CatParams::default()
        }
    }

    pub(super) fn founding_input() -> FoundingCoupleInput {
        FoundingCoupleInput {
            mother: FounderInput {
                params: founder_params("Tabby", "GINGER"),
                name: None,
                history_profile_id: None,
            },
            father: FounderInput {
                params: founder_params("SingleColour", "BLACK"),
                name: None,
                history_profile_id: None,
            },
        }
    }

    fn seeded_manager() -> TreeManager {
        TreeManager::seeded(MutationPool::standard(), 42)
    }

    #[test]
    fn test_founders_are_generation_zero_roots() {
        let mut manager = seeded_manager();
        let (mother_id, father_id) = manager
            .initialize_founding_couple(founding_input())
            .unwrap();

        let mother = manager.get_cat(&mother_id).unwrap();
        let father = manager.get_cat(&father_id).unwrap();
        assert!(mother.is_founder());
        assert!(father.is_founder());
        assert_eq!(mother.gender, Gender::F);
        assert_eq!(father.gender, Gender::M);
        assert_eq!(mother.partner_ids, vec![father_id.clone()]);
        assert_eq!(father.partner_ids, vec![mother_id.clone()]);
        assert_eq!(manager.tree().founding_mother_id, mother_id);
        assert_eq!(manager.cat_count(), 2);
    }

    #[test]
    fn test_blank_founder_genetics_rejected() {
        let mut manager = seeded_manager();
        let mut input = founding_input();
        input.father.params.pelt_name = String::new();
        assert!(matches!(
            manager.initialize_founding_couple(input),
            Err(TreeError::InvalidInput(_))
        ));
        assert_eq!(manager.cat_count(), 0);
    }

    #[test]
    fn test_forced_gender_single_offspring() {
        let mut manager = seeded_manager();
        let (mother_id, father_id) = manager
            .initialize_founding_couple(founding_input())
            .unwrap();

        let mut request = OffspringRequest::new(mother_id.clone(), father_id.clone(), 1);
        request.forced_gender = Some(Gender::F);
        request.litter_size = Some(1);
        let children = manager.generate_offspring(request).unwrap();

        assert_eq!(children.len(), 1);
        let child = manager.get_cat(&children[0]).unwrap();
        assert_eq!(child.gender, Gender::F);
        assert_eq!(child.generation, 1);
        assert_eq!(child.mother_id.as_deref(), Some(mother_id.as_str()));
        assert_eq!(child.father_id.as_deref(), Some(father_id.as_str()));
        assert!(manager
            .get_cat(&mother_id)
            .unwrap()
            .children_ids
            .contains(&children[0]));
        assert!(manager
            .get_cat(&father_id)
            .unwrap()
            .children_ids
            .contains(&children[0]));
        assert_eq!(manager.cat_count(), 3);
    }

    #[test]
    fn test_generate_offspring_rejects_wrong_generation() {
        let mut manager = seeded_manager();
        let (mother_id, father_id) = manager
            .initialize_founding_couple(founding_input())
            .unwrap();
        let request = OffspringRequest::new(mother_id, father_id, 5);
        assert!(matches!(
            manager.generate_offspring(request),
            Err(TreeError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_generate_offspring_unknown_parent() {
        let mut manager = seeded_manager();
        manager.initialize_founding_couple(founding_input()).unwrap();
        let request = OffspringRequest::new("ghost", "phantom", 1);
        assert!(matches!(
            manager.generate_offspring(request),
            Err(TreeError::NotFound(_))
        ));
    }

    #[test]
    fn test_assign_partner_without_children() {
        let mut manager = seeded_manager();
        let (mother_id, _) = manager
            .initialize_founding_couple(founding_input())
            .unwrap();
        let before = manager.cat_count();

        let partner_id = manager
            .assign_partner(&mother_id, Some(founder_params("Bengal", "GOLDEN")), None, false)
            .unwrap();

        assert_eq!(manager.cat_count(), before + 1);
        let partner = manager.get_cat(&partner_id).unwrap();
        assert_eq!(partner.gender, Gender::M);
        assert_eq!(partner.generation, 0);
        assert_eq!(partner.source, CatSource::Edited);
        assert!(partner.children_ids.is_empty());
        assert!(partner.partner_ids.contains(&mother_id));
        assert!(manager
            .get_cat(&mother_id)
            .unwrap()
            .partner_ids
            .contains(&partner_id));
        // Two partners now: the founding father and the new outsider
        assert_eq!(manager.get_cat(&mother_id).unwrap().partner_ids.len(), 2);
    }

    #[test]
    fn test_assign_partner_requires_genetics_or_id() {
        let mut manager = seeded_manager();
        let (mother_id, _) = manager
            .initialize_founding_couple(founding_input())
            .unwrap();
        assert!(matches!(
            manager.assign_partner(&mother_id, None, None, false),
            Err(TreeError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_assign_partner_across_generations_breeds_below_both() {
        let mut manager = seeded_manager();
        let (mother_id, father_id) = manager
            .initialize_founding_couple(founding_input())
            .unwrap();
        let mut request = OffspringRequest::new(mother_id.clone(), father_id.clone(), 1);
        request.forced_gender = Some(Gender::F);
        request.litter_size = Some(1);
        let daughter_id = manager.generate_offspring(request).unwrap().remove(0);

        // Pairing a generation-1 cat with a generation-0 one puts the
        // litter at generation 2, below the deeper partner
        let partner_id = manager
            .assign_partner(&daughter_id, None, Some(&father_id), true)
            .unwrap();
        assert_eq!(partner_id, father_id);

        let daughter = manager.get_cat(&daughter_id).unwrap();
        assert!(daughter.partner_ids.contains(&father_id));
        assert!(!daughter.children_ids.is_empty());
        for child_id in &daughter.children_ids {
            assert_eq!(manager.get_cat(child_id).unwrap().generation, 2);
        }
        manager.tree().store.check_integrity().unwrap();
    }

    #[test]
    fn test_failed_partner_assignment_leaves_graph_unchanged() {
        let mut manager = seeded_manager();
        let (mother_id, father_id) = manager
            .initialize_founding_couple(founding_input())
            .unwrap();
        let mut request = OffspringRequest::new(mother_id.clone(), father_id, 1);
        request.forced_gender = Some(Gender::F);
        request.litter_size = Some(1);
        let daughter_id = manager.generate_offspring(request).unwrap().remove(0);
        let before = manager.serialize();

        // Same-gender partner is rejected before any link is written
        assert!(matches!(
            manager.assign_partner(&daughter_id, None, Some(&mother_id), true),
            Err(TreeError::InvalidInput(_))
        ));
        assert_eq!(manager.serialize().cats, before.cats);
    }

    #[test]
    fn test_replace_partner_keeps_children_parentage() {
        let mut manager = seeded_manager();
        let (mother_id, father_id) = manager
            .initialize_founding_couple(founding_input())
            .unwrap();
        let mut request = OffspringRequest::new(mother_id.clone(), father_id.clone(), 1);
        request.litter_size = Some(3);
        let children = manager.generate_offspring(request).unwrap();

        let new_partner_id = manager
            .replace_partner(&mother_id, founder_params("Marbled", "SILVER"))
            .unwrap();

        // Old partner link removed on both sides, new one symmetric
        let mother = manager.get_cat(&mother_id).unwrap();
        assert_eq!(mother.partner_ids, vec![new_partner_id.clone()]);
        let old_father = manager.get_cat(&father_id).unwrap();
        assert!(!old_father.partner_ids.contains(&mother_id));

        // Children still reference the original father
        for child_id in &children {
            let child = manager.get_cat(child_id).unwrap();
            assert_eq!(child.father_id.as_deref(), Some(father_id.as_str()));
            assert_eq!(child.mother_id.as_deref(), Some(mother_id.as_str()));
        }
        // And the old father keeps his children list
        assert_eq!(old_father.children_ids.len(), 3);
        // The invented replacement has none
        assert!(manager
            .get_cat(&new_partner_id)
            .unwrap()
            .children_ids
            .is_empty());
    }

    #[test]
    fn test_add_parent_rejected_when_slot_filled() {
        let mut manager = seeded_manager();
        let (mother_id, father_id) = manager
            .initialize_founding_couple(founding_input())
            .unwrap();
        let mut request = OffspringRequest::new(mother_id, father_id, 1);
        request.litter_size = Some(1);
        let children = manager.generate_offspring(request).unwrap();
        let before = manager.cat_count();

        let result = manager.add_parent(&children[0], founder_params("Tabby", "BROWN"), ParentKind::Father);
        assert!(matches!(result, Err(TreeError::AlreadyHasParent { .. })));
        assert_eq!(manager.cat_count(), before);
    }

    #[test]
    fn test_add_parent_to_founder_links_other_parent() {
        let mut manager = seeded_manager();
        let (mother_id, _) = manager
            .initialize_founding_couple(founding_input())
            .unwrap();

        let father_id = manager
            .add_parent(&mother_id, founder_params("Classic", "CREAM"), ParentKind::Father)
            .unwrap();
        let grandfather = manager.get_cat(&father_id).unwrap();
        assert_eq!(grandfather.gender, Gender::M);
        assert_eq!(grandfather.generation, 0); // never below the founders' level
        assert!(grandfather.children_ids.contains(&mother_id));
        assert_eq!(
            manager.get_cat(&mother_id).unwrap().father_id.as_deref(),
            Some(father_id.as_str())
        );

        // Adding the mother afterwards partners her with the new father
        let grandmother_id = manager
            .add_parent(&mother_id, founder_params("Smoke", "LILAC"), ParentKind::Mother)
            .unwrap();
        let grandmother = manager.get_cat(&grandmother_id).unwrap();
        assert!(grandmother.partner_ids.contains(&father_id));
        assert!(manager
            .get_cat(&father_id)
            .unwrap()
            .partner_ids
            .contains(&grandmother_id));

        // The father slot is filled now; a second attempt is rejected
        let before = manager.cat_count();
        assert!(matches!(
            manager.add_parent(&mother_id, founder_params("Tabby", "BROWN"), ParentKind::Father),
            Err(TreeError::AlreadyHasParent { .. })
        ));
        assert_eq!(manager.cat_count(), before);
    }

    #[test]
    fn test_set_config_rejects_and_preserves_previous() {
        let mut manager = seeded_manager();
        let good = TreeGenerationConfig {
            depth: 2,
            ..TreeGenerationConfig::default()
        };
        manager.set_config(good.clone()).unwrap();
        let bad = TreeGenerationConfig {
            min_children: 9,
            max_children: 1,
            ..TreeGenerationConfig::default()
        };
        assert!(manager.set_config(bad).is_err());
        assert_eq!(manager.tree().config, good);
    }

    #[test]
    fn test_serialize_round_trip() {
        let mut manager = seeded_manager();
        let (mother_id, father_id) = manager
            .initialize_founding_couple(founding_input())
            .unwrap();
        let mut request = OffspringRequest::new(mother_id, father_id, 1);
        request.litter_size = Some(2);
        manager.generate_offspring(request).unwrap();
        manager.set_name("Thunderclan Line");

        let serialized = manager.serialize();
        let json = serialized.to_json().unwrap();
        let parsed = SerializedAncestryTree::from_json(&json).unwrap();
        assert_eq!(parsed, serialized);

        let rehydrated = TreeManager::deserialize(parsed, MutationPool::standard()).unwrap();
        assert_eq!(rehydrated.serialize(), serialized);
        rehydrated.tree().store.check_integrity().unwrap();
    }

    #[test]
    fn test_deserialize_migrates_legacy_partner_id() {
        let mut manager = seeded_manager();
        let (mother_id, father_id) = manager
            .initialize_founding_couple(founding_input())
            .unwrap();
        let serialized = manager.serialize();

        // Rewrite the save into the legacy scalar-partner shape
        let mut value = serde_json::to_value(&serialized).unwrap();
        for cat in value["cats"].as_array_mut().unwrap() {
            let partner = cat["partnerIds"][0].clone();
            let obj = cat.as_object_mut().unwrap();
            obj.remove("partnerIds");
            obj.insert("partnerId".to_string(), partner);
        }
        let legacy_json = serde_json::to_string(&value).unwrap();

        let parsed = SerializedAncestryTree::from_json(&legacy_json).unwrap();
        let mother = parsed.cats.iter().find(|c| c.id == mother_id).unwrap();
        assert_eq!(mother.partner_ids, vec![father_id]);
    }

    #[test]
    fn test_deserialize_rejects_out_of_range_config() {
        let mut manager = seeded_manager();
        manager.initialize_founding_couple(founding_input()).unwrap();
        let mut serialized = manager.serialize();
        // Shape-valid save with a probability outside 0..=1
        serialized.config.gender_ratio = 1.5;
        assert!(matches!(
            TreeManager::deserialize(serialized, MutationPool::standard()),
            Err(TreeError::InvalidConfig(_))
        ));
    }
}
