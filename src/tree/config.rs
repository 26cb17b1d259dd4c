//! Generation configuration, validation, and the pre-flight size estimate
//!
//! Configs are validated at the API boundary: out-of-range values are
//! rejected, never clamped. The size estimator reproduces the generation
//! model in expectation so oversized runs can be refused before any work.

use crate::cat::{PaletteMode, TortiePolicy};
use crate::error::{Result, TreeError};
use serde::{Deserialize, Serialize};

/// Estimated totals above this produce a warning.
pub const WARN_THRESHOLD: u64 = 1_000;
/// Estimated totals above this refuse generation outright.
pub const REFUSE_THRESHOLD: u64 = 5_000;

/// Expected partners per partnered child: 1 with p=0.8, 2 with p=0.2.
const AVG_PARTNERS_PER_CHILD: f64 = 1.2;
/// Share of partner slots filled by brand-new outsiders.
const OUTSIDER_SHARE: f64 = 0.89;

const ALLOWED_CHANCES: &[f64] = &[0.0, 0.25, 0.5, 0.75, 1.0];

/// Accessory/scar rolls for generated (non-founder) cats, independent of
/// genetics inheritance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OffspringOptions {
    pub accessory_chance: f64,
    pub max_accessories: u32,
    pub scar_chance: f64,
    pub max_scars: u32,
}

impl Default for OffspringOptions {
    fn default() -> Self {
        Self {
            accessory_chance: 0.25,
            max_accessories: 1,
            scar_chance: 0.25,
            max_scars: 1,
        }
    }
}

impl OffspringOptions {
    pub fn validate(&self) -> Result<()> {
        let chance_ok = |v: f64| ALLOWED_CHANCES.iter().any(|c| (c - v).abs() < 1e-9);
        if !chance_ok(self.accessory_chance) {
            return Err(TreeError::InvalidConfig(format!(
                "accessory_chance must be one of {ALLOWED_CHANCES:?}, got {}",
                self.accessory_chance
            )));
        }
        if !chance_ok(self.scar_chance) {
            return Err(TreeError::InvalidConfig(format!(
                "scar_chance must be one of {ALLOWED_CHANCES:?}, got {}",
                self.scar_chance
            )));
        }
        if !(1..=4).contains(&self.max_accessories) {
            return Err(TreeError::InvalidConfig(format!(
                "max_accessories must be 1..=4, got {}",
                self.max_accessories
            )));
        }
        if !(1..=4).contains(&self.max_scars) {
            return Err(TreeError::InvalidConfig(format!(
                "max_scars must be 1..=4, got {}",
                self.max_scars
            )));
        }
        Ok(())
    }
}

/// Parameters of the probabilistic branching model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeGenerationConfig {
    /// Number of generations to produce below the founders (1..=30)
    pub depth: u32,
    /// Probability a newly generated child is male (0..=1)
    pub gender_ratio: f64,
    pub min_children: u32,
    pub max_children: u32,
    /// Probability a child receives at least one partner (0..=1)
    pub partner_chance: f64,
    /// Enabled palette modes for outsider invention; empty means `off`
    #[serde(default)]
    pub palette_modes: Vec<PaletteMode>,
    #[serde(default)]
    pub offspring_options: OffspringOptions,
    /// Whether tortie expression is sex-linked
    #[serde(default)]
    pub tortie_policy: TortiePolicy,
}

impl Default for TreeGenerationConfig {
    fn default() -> Self {
        Self {
            depth: 3,
            gender_ratio: 0.5,
            min_children: 1,
            max_children: 5,
            partner_chance: 0.5,
            palette_modes: Vec::new(),
            offspring_options: OffspringOptions::default(),
            tortie_policy: TortiePolicy::default(),
        }
    }
}

impl TreeGenerationConfig {
    pub fn validate(&self) -> Result<()> {
        if !(1..=30).contains(&self.depth) {
            return Err(TreeError::InvalidConfig(format!(
                "depth must be 1..=30, got {}",
                self.depth
            )));
        }
        if !(0.0..=1.0).contains(&self.gender_ratio) {
            return Err(TreeError::InvalidConfig(format!(
                "gender_ratio must be 0..=1, got {}",
                self.gender_ratio
            )));
        }
        if !(0.0..=1.0).contains(&self.partner_chance) {
            return Err(TreeError::InvalidConfig(format!(
                "partner_chance must be 0..=1, got {}",
                self.partner_chance
            )));
        }
        if self.min_children > 50 || self.max_children > 50 {
            return Err(TreeError::InvalidConfig(format!(
                "children counts must be 0..=50, got {}..{}",
                self.min_children, self.max_children
            )));
        }
        if self.min_children > self.max_children {
            return Err(TreeError::InvalidConfig(format!(
                "min_children ({}) exceeds max_children ({})",
                self.min_children, self.max_children
            )));
        }
        self.offspring_options.validate()
    }

    pub fn avg_children(&self) -> f64 {
        (self.min_children + self.max_children) as f64 / 2.0
    }

    /// Expected total cats for this config.
    pub fn estimated_cat_count(&self) -> u64 {
        estimate_cat_count(self.depth, self.avg_children(), self.partner_chance)
    }

    /// Pre-flight size gate: refuses configs whose expected size exceeds
    /// [`REFUSE_THRESHOLD`], flags a warning above [`WARN_THRESHOLD`].
    pub fn check_size(&self) -> Result<SizeEstimate> {
        let estimated = self.estimated_cat_count();
        if estimated > REFUSE_THRESHOLD {
            return Err(TreeError::TreeTooLarge {
                estimated,
                limit: REFUSE_THRESHOLD,
            });
        }
        Ok(SizeEstimate {
            estimated,
            oversized_warning: estimated > WARN_THRESHOLD,
        })
    }
}

/// Result of the pre-flight size check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeEstimate {
    pub estimated: u64,
    pub oversized_warning: bool,
}

/// Expected cat count without running generation:
/// `2 + sum over generations of (children + outsider partners)`.
pub fn estimate_cat_count(depth: u32, avg_children: f64, partner_chance: f64) -> u64 {
    let mut total = 2.0;
    let mut breeding_pairs = 1.0;
    for _ in 0..depth {
        let children = breeding_pairs * avg_children;
        let outsiders = (children * partner_chance * AVG_PARTNERS_PER_CHILD * OUTSIDER_SHARE).round();
        total += children + outsiders;
        breeding_pairs = children * partner_chance * AVG_PARTNERS_PER_CHILD;
        if breeding_pairs < f64::EPSILON {
            break;
        }
    }
    total.round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimator_sanity() {
        // 2 founders + 2 children, no partners
        assert_eq!(estimate_cat_count(1, 2.0, 0.0), 4);
    }

    #[test]
    fn test_estimator_counts_outsider_partners() {
        // One generation, 10 children, everyone partnered:
        // 10 * 1.2 * 0.89 = 10.68 -> 11 outsiders
        assert_eq!(estimate_cat_count(1, 10.0, 1.0), 2 + 10 + 11);
    }

    #[test]
    fn test_estimator_stops_on_empty_breeding_pool() {
        let shallow = estimate_cat_count(1, 3.0, 0.0);
        let deep = estimate_cat_count(30, 3.0, 0.0);
        assert_eq!(shallow, deep);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(TreeGenerationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_inverted_children_range() {
        let config = TreeGenerationConfig {
            min_children: 4,
            max_children: 2,
            ..TreeGenerationConfig::default()
        };
        assert!(matches!(config.validate(), Err(TreeError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_out_of_range_depth_and_ratio() {
        let config = TreeGenerationConfig {
            depth: 0,
            ..TreeGenerationConfig::default()
        };
        assert!(config.validate().is_err());

        let config = TreeGenerationConfig {
            depth: 31,
            ..TreeGenerationConfig::default()
        };
        assert!(config.validate().is_err());

        let config = TreeGenerationConfig {
            gender_ratio: 1.5,
            ..TreeGenerationConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_off_grid_accessory_chance() {
        let options = OffspringOptions {
            accessory_chance: 0.3,
            ..OffspringOptions::default()
        };
        assert!(options.validate().is_err());
        let options = OffspringOptions {
            accessory_chance: 0.75,
            max_scars: 5,
            ..OffspringOptions::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_size_gate_refuses_huge_configs() {
        let config = TreeGenerationConfig {
            depth: 10,
            min_children: 5,
            max_children: 5,
            partner_chance: 1.0,
            ..TreeGenerationConfig::default()
        };
        assert!(matches!(
            config.check_size(),
            Err(TreeError::TreeTooLarge { .. })
        ));
    }

    #[test]
    fn test_size_gate_warns_above_threshold() {
        let config = TreeGenerationConfig {
            depth: 6,
            min_children: 3,
            max_children: 3,
            partner_chance: 0.8,
            ..TreeGenerationConfig::default()
        };
        let estimate = config.check_size().expect("within hard limit");
        assert!(estimate.oversized_warning);
        assert!(estimate.estimated > WARN_THRESHOLD);
        assert!(estimate.estimated <= REFUSE_THRESHOLD);
    }
}
