//! Read-only projections of a serialized tree for visualization
//!
//! The node shape matches what a family-chart style renderer expects:
//! flat nodes carrying display data plus relation id lists. Everything
//! here works on [`SerializedAncestryTree`] so a tree loaded straight
//! from storage can be charted without rehydrating a manager.

use crate::cat::{Cat, CatId};
use crate::tree::SerializedAncestryTree;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyChartData {
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub cat_data: Cat,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyChartRels {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mother: Option<CatId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub father: Option<CatId>,
    pub spouses: Vec<CatId>,
    pub children: Vec<CatId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyChartNode {
    pub id: CatId,
    pub data: FamilyChartData,
    pub rels: FamilyChartRels,
}

fn index(tree: &SerializedAncestryTree) -> HashMap<&str, &Cat> {
    tree.cats.iter().map(|cat| (cat.id.as_str(), cat)).collect()
}

fn parent_ids(cat: &Cat) -> impl Iterator<Item = &CatId> {
    cat.mother_id.iter().chain(cat.father_id.iter())
}

/// One chart node per cat, in the tree's stored order. Avatars are
/// looked up per cat id when a map is supplied.
pub fn convert_to_family_chart(
    tree: &SerializedAncestryTree,
    avatars: Option<&HashMap<CatId, String>>,
) -> Vec<FamilyChartNode> {
    tree.cats
        .iter()
        .map(|cat| FamilyChartNode {
            id: cat.id.clone(),
            data: FamilyChartData {
                first_name: cat.name.prefix.clone(),
                last_name: cat.name.suffix.clone(),
                gender: cat.gender.to_string(),
                avatar: avatars.and_then(|map| map.get(&cat.id).cloned()),
                cat_data: cat.clone(),
            },
            rels: FamilyChartRels {
                mother: cat.mother_id.clone(),
                father: cat.father_id.clone(),
                spouses: cat.partner_ids.clone(),
                children: cat.children_ids.clone(),
            },
        })
        .collect()
}

pub fn find_cat_by_id<'a>(tree: &'a SerializedAncestryTree, id: &str) -> Option<&'a Cat> {
    tree.cats.iter().find(|cat| cat.id == id)
}

/// Cats sharing at least one parent with the given cat, half-siblings
/// included. Unknown ids yield an empty list.
pub fn get_siblings<'a>(tree: &'a SerializedAncestryTree, id: &str) -> Vec<&'a Cat> {
    let Some(cat) = find_cat_by_id(tree, id) else {
        return Vec::new();
    };
    let own_parents: HashSet<&CatId> = parent_ids(cat).collect();
    if own_parents.is_empty() {
        return Vec::new();
    }
    tree.cats
        .iter()
        .filter(|other| other.id != cat.id && parent_ids(other).any(|p| own_parents.contains(p)))
        .collect()
}

/// Cats grouped by generation, ordered from the founders down.
pub fn cats_by_generation(tree: &SerializedAncestryTree) -> BTreeMap<u32, Vec<&Cat>> {
    let mut grouped: BTreeMap<u32, Vec<&Cat>> = BTreeMap::new();
    for cat in &tree.cats {
        grouped.entry(cat.generation).or_default().push(cat);
    }
    grouped
}

/// All descendants of a cat, breadth-first through children links.
pub fn get_descendants<'a>(tree: &'a SerializedAncestryTree, id: &str) -> Vec<&'a Cat> {
    let by_id = index(tree);
    let mut seen: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<&str> = VecDeque::new();
    let mut result = Vec::new();
    if let Some(root) = by_id.get(id) {
        queue.extend(root.children_ids.iter().map(|c| c.as_str()));
    }
    while let Some(next_id) = queue.pop_front() {
        if !seen.insert(next_id) {
            continue;
        }
        if let Some(cat) = by_id.get(next_id) {
            result.push(*cat);
            queue.extend(cat.children_ids.iter().map(|c| c.as_str()));
        }
    }
    result
}

/// All ancestors of a cat, breadth-first through parent links.
pub fn get_ancestors<'a>(tree: &'a SerializedAncestryTree, id: &str) -> Vec<&'a Cat> {
    let by_id = index(tree);
    let mut seen: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<&str> = VecDeque::new();
    let mut result = Vec::new();
    if let Some(root) = by_id.get(id) {
        queue.extend(parent_ids(root).map(|p| p.as_str()));
    }
    while let Some(next_id) = queue.pop_front() {
        if !seen.insert(next_id) {
            continue;
        }
        if let Some(cat) = by_id.get(next_id) {
            result.push(*cat);
            queue.extend(parent_ids(cat).map(|p| p.as_str()));
        }
    }
    result
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartRelationship {
    Sibling,
    Cousin,
    Unrelated,
}

/// Classify two cats by shared parents or grandparents. Unknown ids are
/// unrelated.
pub fn relationship_between(
    tree: &SerializedAncestryTree,
    a_id: &str,
    b_id: &str,
) -> ChartRelationship {
    let by_id = index(tree);
    let (Some(a), Some(b)) = (by_id.get(a_id), by_id.get(b_id)) else {
        return ChartRelationship::Unrelated;
    };
    if a.id == b.id {
        return ChartRelationship::Sibling;
    }
    let parents_a: HashSet<&CatId> = parent_ids(a).collect();
    if parent_ids(b).any(|p| parents_a.contains(p)) {
        return ChartRelationship::Sibling;
    }
    let grandparents = |cat: &Cat| -> HashSet<CatId> {
        parent_ids(cat)
            .filter_map(|p| by_id.get(p.as_str()))
            .flat_map(|parent| parent_ids(parent).cloned())
            .collect()
    };
    let grandparents_a = grandparents(a);
    if !grandparents_a.is_empty() && grandparents(b).iter().any(|g| grandparents_a.contains(g)) {
        return ChartRelationship::Cousin;
    }
    ChartRelationship::Unrelated
}
