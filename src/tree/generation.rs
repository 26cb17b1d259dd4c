//! Generation-by-generation tree expansion
//!
//! Builds on the discrete operations in `tree::manager`: each step breeds
//! every couple of the previous generation, then rolls partners for the
//! new children to form the next generation's breeding pairs. Partners
//! are mostly invented outsiders; occasionally an unrelated cat of the
//! same generation is reused so the graph gets cross-links.

use super::manager::{BreedingPair, NewCat, OffspringRequest, TreeManager};
use super::store::Relationship;
use crate::cat::{update_name_for_life_stage, CatGenetics, CatId, CatSource, LifeStage};
use crate::error::{Result, TreeError};
use log::{info, warn};
use rand::Rng;

/// Chance that a partnered cat gets a second partner instead of one.
const MULTIPLE_PARTNERS_CHANCE: f64 = 0.20;

/// Chance to reuse an existing same-generation cat as partner rather
/// than inventing an outsider.
const PARTNER_REUSE_CHANCE: f64 = 0.11;

impl TreeManager {
    /// Reset the tree down to the founding couple so a fresh full run
    /// starts from a clean graph. Everything except the two founders is
    /// dropped, and their links are reset to each other.
    pub fn prepare_for_full_tree(&mut self) -> Result<()> {
        let mother_id = self.tree.founding_mother_id.clone();
        let father_id = self.tree.founding_father_id.clone();
        if mother_id.is_empty() || father_id.is_empty() {
            return Err(TreeError::InvalidInput(
                "founding couple has not been initialized".to_string(),
            ));
        }
        let mut mother = self.tree.store.require(&mother_id)?.clone();
        let mut father = self.tree.store.require(&father_id)?.clone();
        for founder in [&mut mother, &mut father] {
            founder.children_ids.clear();
            founder.mother_id = None;
            founder.father_id = None;
        }
        mother.partner_ids = vec![father_id.clone()];
        father.partner_ids = vec![mother_id.clone()];

        self.tree.store.clear();
        self.used_names.clear();
        self.used_names.insert(mother.name.full.to_lowercase());
        self.used_names.insert(father.name.full.to_lowercase());
        self.tree.store.add_cat(mother)?;
        self.tree.store.add_cat(father)?;
        self.couples_per_generation = vec![vec![BreedingPair {
            mother_id,
            father_id,
        }]];
        self.touch();
        Ok(())
    }

    /// Expand one generation. Requires generation `n - 1` to have been
    /// generated already (the founders count as generation 0 after
    /// [`TreeManager::prepare_for_full_tree`]). Returns the number of cats
    /// created, invented partners included.
    pub fn generate_generation(&mut self, generation: u32) -> Result<usize> {
        let depth = self.tree.config.depth;
        if generation == 0 || generation > depth {
            return Err(TreeError::InvalidInput(format!(
                "generation must be in 1..={depth}, got {generation}"
            )));
        }
        let ready = self.couples_per_generation.len() as u32;
        if ready < generation {
            return Err(TreeError::InvalidInput(format!(
                "generation {} has not been generated yet",
                generation - 1
            )));
        }
        if ready > generation {
            return Err(TreeError::InvalidInput(format!(
                "generation {generation} has already been generated"
            )));
        }

        let parents = self.couples_per_generation[generation as usize - 1].clone();
        let mut next_couples = Vec::new();
        let mut created = 0usize;

        for pair in parents {
            let children = self.generate_offspring(OffspringRequest::new(
                pair.mother_id.clone(),
                pair.father_id.clone(),
                generation,
            ))?;
            created += children.len();

            // The last generation stays childless; no partners needed.
            if generation >= depth {
                continue;
            }
            for child_id in children {
                if !self.rng.gen_bool(self.tree.config.partner_chance) {
                    continue;
                }
                self.promote_to_warrior(&child_id)?;
                let partner_count = if self.rng.gen_bool(MULTIPLE_PARTNERS_CHANCE) {
                    2
                } else {
                    1
                };
                for _ in 0..partner_count {
                    let (partner_id, invented) = self.pick_partner(&child_id, generation)?;
                    if invented {
                        created += 1;
                    }
                    self.tree.store.link_partners(&child_id, &partner_id)?;
                    next_couples.push(self.ordered_pair(&child_id, &partner_id)?);
                }
            }
        }

        info!(
            "generation {generation}: {created} cats, {} breeding pairs for the next",
            next_couples.len()
        );
        self.couples_per_generation.push(next_couples);
        self.touch();
        Ok(created)
    }

    /// Run the whole expansion from the founders to the configured depth.
    /// Refuses outright when the size estimate is past the hard limit.
    pub fn generate_full_tree(&mut self) -> Result<()> {
        let estimate = self.tree.config.check_size()?;
        if estimate.oversized_warning {
            warn!(
                "estimated tree size {} exceeds the comfort threshold",
                estimate.estimated
            );
        }
        self.prepare_for_full_tree()?;
        for generation in 1..=self.tree.config.depth {
            self.generate_generation(generation)?;
        }
        Ok(())
    }

    /// Pick a partner for `cat_id`: usually a freshly invented outsider,
    /// sometimes an unrelated existing cat of the same generation. Returns
    /// the partner id and whether a new cat was created.
    fn pick_partner(&mut self, cat_id: &str, generation: u32) -> Result<(CatId, bool)> {
        if self.rng.gen_bool(PARTNER_REUSE_CHANCE) {
            if let Some(existing_id) = self.find_reusable_partner(cat_id, generation)? {
                self.promote_to_warrior(&existing_id)?;
                return Ok((existing_id, false));
            }
        }

        let gender = self.tree.store.require(cat_id)?.gender.opposite();
        let params = self
            .pool
            .invent_outsider(&self.tree.config.palette_modes, &mut self.rng);
        let genetics = CatGenetics::from_params(&params);
        let partner_id = self.create_cat(NewCat {
            params,
            gender,
            generation,
            mother_id: None,
            father_id: None,
            genetics,
            source: CatSource::Generated,
            history_profile_id: None,
            name: None,
        })?;
        self.promote_to_warrior(&partner_id)?;
        Ok((partner_id, true))
    }

    /// Search the current generation for a free, opposite-gender cat that
    /// is not a sibling or half-sibling of `cat_id`.
    fn find_reusable_partner(&mut self, cat_id: &str, generation: u32) -> Result<Option<CatId>> {
        let cat = self.tree.store.require(cat_id)?.clone();
        let wanted_gender = cat.gender.opposite();
        let candidates: Vec<CatId> = self
            .tree
            .store
            .all()
            .filter(|candidate| {
                candidate.gender == wanted_gender
                    && candidate.generation == generation
                    && !candidate.has_full_partner_complement()
                    && !candidate.partner_ids.contains(&cat.id)
                    && self.tree.store.relationship(&cat, candidate) != Relationship::Sibling
            })
            .map(|candidate| candidate.id.clone())
            .collect();
        if candidates.is_empty() {
            return Ok(None);
        }
        let index = self.rng.gen_range(0..candidates.len());
        Ok(Some(candidates[index].clone()))
    }

    /// Kits and apprentices age up to warriors before breeding, taking a
    /// warrior suffix onto their established prefix.
    fn promote_to_warrior(&mut self, cat_id: &str) -> Result<()> {
        let (stage, name) = {
            let cat = self.tree.store.require(cat_id)?;
            (cat.life_stage, cat.name.clone())
        };
        if !matches!(stage, LifeStage::Kit | LifeStage::Apprentice) {
            return Ok(());
        }
        let new_name = update_name_for_life_stage(&name, LifeStage::Warrior, &mut self.rng);
        self.used_names.remove(&name.full.to_lowercase());
        self.used_names.insert(new_name.full.to_lowercase());
        let cat = self.tree.store.require_mut(cat_id)?;
        cat.life_stage = LifeStage::Warrior;
        cat.name = new_name;
        Ok(())
    }

    fn ordered_pair(&self, a: &str, b: &str) -> Result<BreedingPair> {
        let cat_a = self.tree.store.require(a)?;
        Ok(if cat_a.gender == crate::cat::Gender::F {
            BreedingPair {
                mother_id: a.to_string(),
                father_id: b.to_string(),
            }
        } else {
            BreedingPair {
                mother_id: b.to_string(),
                father_id: a.to_string(),
            }
        })
    }
}
