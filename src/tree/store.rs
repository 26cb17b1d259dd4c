//! GraphStore: the authoritative in-memory family graph
//!
//! Owns every cat and enforces the relational invariants on each mutating
//! call. Outside code never writes link fields directly; it goes through
//! the symmetric-link helpers here. Iteration preserves insertion order so
//! serialized output is stable.

use crate::cat::{Cat, CatId, Gender};
use crate::error::{Result, TreeError};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    cats: HashMap<CatId, Cat>,
    order: Vec<CatId>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cats.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.cats.contains_key(id)
    }

    /// Insert a new cat. Fails on id collision; the store is unchanged.
    pub fn add_cat(&mut self, cat: Cat) -> Result<()> {
        if self.cats.contains_key(&cat.id) {
            return Err(TreeError::DuplicateId(cat.id));
        }
        self.order.push(cat.id.clone());
        self.cats.insert(cat.id.clone(), cat);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Cat> {
        self.cats.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Cat> {
        self.cats.get_mut(id)
    }

    pub fn require(&self, id: &str) -> Result<&Cat> {
        self.cats
            .get(id)
            .ok_or_else(|| TreeError::NotFound(id.to_string()))
    }

    pub fn require_mut(&mut self, id: &str) -> Result<&mut Cat> {
        self.cats
            .get_mut(id)
            .ok_or_else(|| TreeError::NotFound(id.to_string()))
    }

    /// All cats in insertion order.
    pub fn all(&self) -> impl Iterator<Item = &Cat> {
        self.order.iter().filter_map(|id| self.cats.get(id))
    }

    pub fn clear(&mut self) {
        self.cats.clear();
        self.order.clear();
    }

    /// Make `a` and `b` partners. Symmetric and idempotent; either id
    /// missing fails without touching the other record.
    pub fn link_partners(&mut self, a: &str, b: &str) -> Result<()> {
        if a == b {
            return Err(TreeError::InvalidInput(
                "a cat cannot partner itself".to_string(),
            ));
        }
        if !self.cats.contains_key(a) {
            return Err(TreeError::NotFound(a.to_string()));
        }
        if !self.cats.contains_key(b) {
            return Err(TreeError::NotFound(b.to_string()));
        }
        if let Some(cat) = self.cats.get_mut(a) {
            if !cat.partner_ids.iter().any(|id| id == b) {
                cat.partner_ids.push(b.to_string());
            }
        }
        if let Some(cat) = self.cats.get_mut(b) {
            if !cat.partner_ids.iter().any(|id| id == a) {
                cat.partner_ids.push(a.to_string());
            }
        }
        Ok(())
    }

    /// Remove the partner link between `a` and `b` from both sides.
    pub fn unlink_partners(&mut self, a: &str, b: &str) -> Result<()> {
        if !self.cats.contains_key(a) {
            return Err(TreeError::NotFound(a.to_string()));
        }
        if !self.cats.contains_key(b) {
            return Err(TreeError::NotFound(b.to_string()));
        }
        if let Some(cat) = self.cats.get_mut(a) {
            cat.partner_ids.retain(|id| id != b);
        }
        if let Some(cat) = self.cats.get_mut(b) {
            cat.partner_ids.retain(|id| id != a);
        }
        Ok(())
    }

    /// Append `child_id` to the parent's children list if absent.
    pub fn link_child(&mut self, parent_id: &str, child_id: &str) -> Result<()> {
        if !self.cats.contains_key(child_id) {
            return Err(TreeError::NotFound(child_id.to_string()));
        }
        let parent = self.require_mut(parent_id)?;
        if !parent.children_ids.iter().any(|id| id == child_id) {
            parent.children_ids.push(child_id.to_string());
        }
        Ok(())
    }

    /// Verify the relational invariants over the whole graph: parent
    /// genders and back-references, child lists naming real children,
    /// partner symmetry, and generation monotonicity for cats with both
    /// parents known.
    pub fn check_integrity(&self) -> Result<()> {
        for cat in self.all() {
            if let Some(mother_id) = &cat.mother_id {
                let mother = self.require(mother_id)?;
                if mother.gender != Gender::F {
                    return Err(TreeError::InvalidInput(format!(
                        "mother {} of {} is not female",
                        mother_id, cat.id
                    )));
                }
                if !mother.children_ids.iter().any(|id| id == &cat.id) {
                    return Err(TreeError::InvalidInput(format!(
                        "mother {} missing child back-reference to {}",
                        mother_id, cat.id
                    )));
                }
            }
            if let Some(father_id) = &cat.father_id {
                let father = self.require(father_id)?;
                if father.gender != Gender::M {
                    return Err(TreeError::InvalidInput(format!(
                        "father {} of {} is not male",
                        father_id, cat.id
                    )));
                }
                if !father.children_ids.iter().any(|id| id == &cat.id) {
                    return Err(TreeError::InvalidInput(format!(
                        "father {} missing child back-reference to {}",
                        father_id, cat.id
                    )));
                }
            }
            // Generation-0 cats are exempt: parents added above the
            // founders share their level instead of going negative.
            if let (Some(mother_id), Some(father_id), 1..) =
                (&cat.mother_id, &cat.father_id, cat.generation)
            {
                let mother = self.require(mother_id)?;
                let father = self.require(father_id)?;
                let expected = mother.generation.max(father.generation) + 1;
                if cat.generation != expected {
                    return Err(TreeError::InvalidInput(format!(
                        "cat {} has generation {}, expected {}",
                        cat.id, cat.generation, expected
                    )));
                }
            }
            for partner_id in &cat.partner_ids {
                let partner = self.require(partner_id)?;
                if !partner.partner_ids.iter().any(|id| id == &cat.id) {
                    return Err(TreeError::InvalidInput(format!(
                        "partner link {} -> {} is one-sided",
                        cat.id, partner_id
                    )));
                }
            }
            for child_id in &cat.children_ids {
                let child = self.require(child_id)?;
                let as_mother = child.mother_id.as_deref() == Some(cat.id.as_str());
                let as_father = child.father_id.as_deref() == Some(cat.id.as_str());
                if as_mother == as_father {
                    return Err(TreeError::InvalidInput(format!(
                        "cat {} lists child {} that does not name it as exactly one parent",
                        cat.id, child_id
                    )));
                }
            }
        }
        Ok(())
    }

    fn parent_ids(cat: &Cat) -> impl Iterator<Item = &CatId> {
        cat.mother_id.iter().chain(cat.father_id.iter())
    }

    fn grandparent_ids(&self, cat: &Cat) -> Vec<&CatId> {
        Self::parent_ids(cat)
            .filter_map(|id| self.get(id))
            .flat_map(Self::parent_ids)
            .collect()
    }

    /// Classify how closely two cats are related. Sharing at least one
    /// parent counts as siblings (half-siblings included).
    pub fn relationship(&self, a: &Cat, b: &Cat) -> Relationship {
        if a.id == b.id {
            return Relationship::Sibling;
        }
        if Self::parent_ids(a).any(|id| Self::parent_ids(b).any(|other| other == id)) {
            return Relationship::Sibling;
        }
        let grandparents_a = self.grandparent_ids(a);
        if !grandparents_a.is_empty() {
            let grandparents_b = self.grandparent_ids(b);
            if grandparents_a
                .iter()
                .any(|id| grandparents_b.iter().any(|other| other == id))
            {
                return Relationship::Cousin;
            }
        }
        Relationship::Unrelated
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relationship {
    Sibling,
    Cousin,
    Unrelated,
}
