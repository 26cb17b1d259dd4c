//! Genetics: the allele model behind inherited appearance
//!
//! Each heritable trait carries two alleles (maternal, paternal) plus the
//! expressed value actually drawn by the renderer. Inheritance passes one
//! random allele per parent, applies a small mutation chance per allele,
//! then resolves expression: dominant pelts beat recessive ones, white
//! patches are codominant, tortie is gated by [`TortiePolicy`].

use super::cat::{CatParams, Gender};
use super::pool::MutationPool;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Per-allele probability of drawing a fresh pool value instead of the
/// inherited one. Tortie flips at half this rate.
pub const MUTATION_RATE: f64 = 0.05;

const DOMINANT_PELTS: &[&str] = &[
    "Tabby", "Mackerel", "Classic", "Ticked", "Spotted", "Rosette", "Sokoke",
    "Marbled", "Bengal", "Speckled", "Agouti",
];

const RECESSIVE_PELTS: &[&str] = &["SingleColour", "Single", "Solid"];

/// Whether tortie expression is restricted by gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TortiePolicy {
    /// Sex-linked convention: carrier females express at 50%, carrier
    /// males at 0.3%.
    SexLinked,
    /// Both genders use the female expression rule.
    Unrestricted,
}

impl Default for TortiePolicy {
    fn default() -> Self {
        TortiePolicy::SexLinked
    }
}

/// One heritable trait: two alleles and the expressed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneticTrait<T> {
    pub allele1: T,
    pub allele2: T,
    pub expressed: T,
}

impl<T: Clone> GeneticTrait<T> {
    /// Both alleles set to the same value, as for founders built from a
    /// finished appearance bundle.
    pub fn homozygous(value: T) -> Self {
        Self {
            allele1: value.clone(),
            allele2: value.clone(),
            expressed: value,
        }
    }

    fn pick_allele<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        if rng.gen_bool(0.5) {
            self.allele1.clone()
        } else {
            self.allele2.clone()
        }
    }
}

/// Full genetics bundle for one cat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatGenetics {
    pub pelt: GeneticTrait<String>,
    pub colour: GeneticTrait<String>,
    pub eye_colour: GeneticTrait<String>,
    pub skin_colour: GeneticTrait<String>,
    pub white_patches: GeneticTrait<Option<String>>,
    pub is_tortie: GeneticTrait<bool>,
}

impl CatGenetics {
    /// Build homozygous genetics from a finished appearance bundle.
    /// Used for founders and for outsiders invented from supplied params.
    pub fn from_params(params: &CatParams) -> Self {
        Self {
            pelt: GeneticTrait::homozygous(params.pelt_name.clone()),
            colour: GeneticTrait::homozygous(params.colour.clone()),
            eye_colour: GeneticTrait::homozygous(params.eye_colour.clone()),
            skin_colour: GeneticTrait::homozygous(params.skin_colour.clone()),
            white_patches: GeneticTrait::homozygous(params.white_patches.clone()),
            is_tortie: GeneticTrait::homozygous(params.is_tortie),
        }
    }

    /// Resolve a child's genetics from its parents.
    ///
    /// Each parent contributes one random allele per trait; each allele then
    /// mutates into a fresh pool draw with probability [`MUTATION_RATE`].
    /// Every heritable trait always ends up set.
    pub fn inherit<R: Rng + ?Sized>(
        mother: &CatGenetics,
        father: &CatGenetics,
        child_gender: Gender,
        pool: &MutationPool,
        policy: TortiePolicy,
        rng: &mut R,
    ) -> Self {
        let pelt_a1 = mutate_or(mother.pelt.pick_allele(rng), &pool.pelts, rng);
        let pelt_a2 = mutate_or(father.pelt.pick_allele(rng), &pool.pelts, rng);

        let colour_a1 = mutate_or(mother.colour.pick_allele(rng), &pool.colours, rng);
        let colour_a2 = mutate_or(father.colour.pick_allele(rng), &pool.colours, rng);

        let eye_a1 = mutate_or(mother.eye_colour.pick_allele(rng), &pool.eye_colours, rng);
        let eye_a2 = mutate_or(father.eye_colour.pick_allele(rng), &pool.eye_colours, rng);

        let skin_a1 = mutate_or(mother.skin_colour.pick_allele(rng), &pool.skin_colours, rng);
        let skin_a2 = mutate_or(father.skin_colour.pick_allele(rng), &pool.skin_colours, rng);

        let white_a1 = mutate_white(mother.white_patches.pick_allele(rng), &pool.white_patches, rng);
        let white_a2 = mutate_white(father.white_patches.pick_allele(rng), &pool.white_patches, rng);

        let tortie_a1 = mutate_tortie(mother.is_tortie.pick_allele(rng), rng);
        let tortie_a2 = mutate_tortie(father.is_tortie.pick_allele(rng), rng);

        Self {
            pelt: GeneticTrait {
                expressed: expressed_pelt(&pelt_a1, &pelt_a2, rng),
                allele1: pelt_a1,
                allele2: pelt_a2,
            },
            colour: GeneticTrait {
                expressed: expressed_simple(&colour_a1, &colour_a2, rng),
                allele1: colour_a1,
                allele2: colour_a2,
            },
            eye_colour: GeneticTrait {
                expressed: expressed_simple(&eye_a1, &eye_a2, rng),
                allele1: eye_a1,
                allele2: eye_a2,
            },
            skin_colour: GeneticTrait {
                expressed: expressed_simple(&skin_a1, &skin_a2, rng),
                allele1: skin_a1,
                allele2: skin_a2,
            },
            white_patches: GeneticTrait {
                expressed: expressed_white_patches(&white_a1, &white_a2, rng),
                allele1: white_a1,
                allele2: white_a2,
            },
            is_tortie: GeneticTrait {
                expressed: expressed_tortie(tortie_a1, tortie_a2, child_gender, policy, rng),
                allele1: tortie_a1,
                allele2: tortie_a2,
            },
        }
    }

    /// Project the expressed genetics into a drawable appearance bundle.
    /// A tortie expression also draws a mask from the pool.
    pub fn to_params<R: Rng + ?Sized>(
        &self,
        sprite_number: u32,
        pool: &MutationPool,
        rng: &mut R,
    ) -> CatParams {
        let tortie_mask = if self.is_tortie.expressed {
            pool.tortie_masks.choose(rng).cloned()
        } else {
            None
        };
        CatParams {
            sprite_number,
            pelt_name: self.pelt.expressed.clone(),
            colour: self.colour.expressed.clone(),
            eye_colour: self.eye_colour.expressed.clone(),
            skin_colour: self.skin_colour.expressed.clone(),
            white_patches: self.white_patches.expressed.clone(),
            is_tortie: self.is_tortie.expressed,
            tortie_mask,
            ..CatParams::default()
        }
    }
}

fn mutate_or<R: Rng + ?Sized>(inherited: String, pool: &[String], rng: &mut R) -> String {
    if !pool.is_empty() && rng.gen_bool(MUTATION_RATE) {
        pool.choose(rng).cloned().unwrap_or(inherited)
    } else {
        inherited
    }
}

fn mutate_white<R: Rng + ?Sized>(
    inherited: Option<String>,
    pool: &[String],
    rng: &mut R,
) -> Option<String> {
    if !pool.is_empty() && rng.gen_bool(MUTATION_RATE) {
        if rng.gen_bool(0.5) {
            pool.choose(rng).cloned()
        } else {
            None
        }
    } else {
        inherited
    }
}

fn mutate_tortie<R: Rng + ?Sized>(inherited: bool, rng: &mut R) -> bool {
    if rng.gen_bool(MUTATION_RATE * 0.5) {
        !inherited
    } else {
        inherited
    }
}

fn expressed_pelt<R: Rng + ?Sized>(allele1: &str, allele2: &str, rng: &mut R) -> String {
    let a1_dominant = DOMINANT_PELTS.contains(&allele1);
    let a2_dominant = DOMINANT_PELTS.contains(&allele2);
    let a1_recessive = RECESSIVE_PELTS.contains(&allele1);
    let a2_recessive = RECESSIVE_PELTS.contains(&allele2);

    if a1_dominant && a2_recessive {
        return allele1.to_string();
    }
    if a2_dominant && a1_recessive {
        return allele2.to_string();
    }
    // Both dominant, both recessive, or unknown: coin flip
    if rng.gen_bool(0.5) {
        allele1.to_string()
    } else {
        allele2.to_string()
    }
}

fn expressed_simple<R: Rng + ?Sized>(allele1: &str, allele2: &str, rng: &mut R) -> String {
    if rng.gen_bool(0.5) {
        allele1.to_string()
    } else {
        allele2.to_string()
    }
}

// White patches are codominant; with two patterned alleles either may show.
fn expressed_white_patches<R: Rng + ?Sized>(
    allele1: &Option<String>,
    allele2: &Option<String>,
    rng: &mut R,
) -> Option<String> {
    match (allele1, allele2) {
        (None, None) => None,
        (Some(a), None) => Some(a.clone()),
        (None, Some(b)) => Some(b.clone()),
        (Some(a), Some(b)) => {
            if rng.gen_bool(0.5) {
                Some(a.clone())
            } else {
                Some(b.clone())
            }
        }
    }
}

fn expressed_tortie<R: Rng + ?Sized>(
    allele1: bool,
    allele2: bool,
    gender: Gender,
    policy: TortiePolicy,
    rng: &mut R,
) -> bool {
    if !allele1 && !allele2 {
        return false;
    }
    match (policy, gender) {
        (TortiePolicy::SexLinked, Gender::M) => rng.gen_bool(0.003),
        _ => rng.gen_bool(0.5),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn params(pelt: &str, colour: &str) -> CatParams {
        CatParams {
            pelt_name: pelt.into(),
            colour: colour.into(),
            eye_colour: "AMBER".into(),
            skin_colour: "PINK".into(),
            ..CatParams::default()
        }
    }

    #[test]
    fn test_from_params_is_homozygous() {
        let genetics = CatGenetics::from_params(&params("Tabby", "GINGER"));
        assert_eq!(genetics.pelt.allele1, "Tabby");
        assert_eq!(genetics.pelt.allele2, "Tabby");
        assert_eq!(genetics.pelt.expressed, "Tabby");
        assert_eq!(genetics.colour.expressed, "GINGER");
        assert!(!genetics.is_tortie.expressed);
    }

    #[test]
    fn test_inherit_alleles_come_from_parents_or_pool() {
        let mut rng = StdRng::seed_from_u64(7);
        let pool = MutationPool::standard();
        let mother = CatGenetics::from_params(&params("Tabby", "GINGER"));
        let father = CatGenetics::from_params(&params("SingleColour", "BLACK"));

        for _ in 0..200 {
            let child =
                CatGenetics::inherit(&mother, &father, Gender::F, &pool, TortiePolicy::SexLinked, &mut rng);
            for allele in [&child.colour.allele1, &child.colour.allele2] {
                let inherited = allele == "GINGER" || allele == "BLACK";
                assert!(inherited || pool.colours.contains(allele));
            }
            // Expression always picks one of the two alleles
            assert!(
                child.colour.expressed == child.colour.allele1
                    || child.colour.expressed == child.colour.allele2
            );
        }
    }

    #[test]
    fn test_dominant_pelt_beats_recessive() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            assert_eq!(expressed_pelt("Tabby", "SingleColour", &mut rng), "Tabby");
            assert_eq!(expressed_pelt("Solid", "Bengal", &mut rng), "Bengal");
        }
    }

    #[test]
    fn test_tortie_sex_linked_expression() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut male_torties = 0;
        let mut female_torties = 0;
        for _ in 0..2000 {
            if expressed_tortie(true, false, Gender::M, TortiePolicy::SexLinked, &mut rng) {
                male_torties += 1;
            }
            if expressed_tortie(true, false, Gender::F, TortiePolicy::SexLinked, &mut rng) {
                female_torties += 1;
            }
        }
        assert!(male_torties < 40, "male torties should be rare, got {male_torties}");
        assert!(female_torties > 700, "carrier females express around half the time");
    }

    #[test]
    fn test_tortie_unrestricted_policy() {
        let mut rng = StdRng::seed_from_u64(17);
        let mut male_torties = 0;
        for _ in 0..1000 {
            if expressed_tortie(true, true, Gender::M, TortiePolicy::Unrestricted, &mut rng) {
                male_torties += 1;
            }
        }
        assert!(male_torties > 300);
    }

    #[test]
    fn test_non_carrier_never_tortie() {
        let mut rng = StdRng::seed_from_u64(19);
        for _ in 0..100 {
            assert!(!expressed_tortie(false, false, Gender::F, TortiePolicy::SexLinked, &mut rng));
        }
    }

    #[test]
    fn test_to_params_draws_tortie_mask() {
        let mut rng = StdRng::seed_from_u64(23);
        let pool = MutationPool::standard();
        let mut genetics = CatGenetics::from_params(&params("Tabby", "GINGER"));
        genetics.is_tortie = GeneticTrait::homozygous(true);
        let params = genetics.to_params(3, &pool, &mut rng);
        assert!(params.is_tortie);
        assert!(params.tortie_mask.is_some());
        assert_eq!(params.sprite_number, 3);
    }
}
