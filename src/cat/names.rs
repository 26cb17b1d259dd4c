//! Warrior name generation
//!
//! Names are `capitalize(prefix) + suffix`. Kits, apprentices, and leaders
//! carry fixed life-stage suffixes; warriors and elders draw from the
//! suffix table. Uniqueness is best-effort against a used-name set with a
//! random fallback suffix after too many collisions.

use super::cat::{CatName, LifeStage};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

const PREFIXES: &[&str] = &[
    // Sky and weather
    "Sun", "Moon", "Star", "Storm", "Thunder", "Lightning", "Rain", "Snow", "Frost", "Ice",
    "Hail", "Cloud", "Sky", "Dawn", "Dusk", "Twilight", "Night", "Shadow", "Dark", "Light",
    "Bright", "Blaze", "Fire", "Flame", "Ember", "Ash", "Smoke", "Wind", "Breeze", "Gale",
    "Mist", "Fog", "Dew", "Spark", "Flash", "Gleam", "Glow", "Ray", "Beam", "Shine",
    // Flora
    "Oak", "Willow", "Birch", "Pine", "Cedar", "Maple", "Elm", "Alder", "Rowan", "Holly",
    "Ivy", "Fern", "Moss", "Lichen", "Bramble", "Thorn", "Briar", "Rose", "Lily", "Daisy",
    "Violet", "Poppy", "Blossom", "Petal", "Leaf", "Branch", "Twig", "Root", "Bark",
    "Clover", "Heather", "Sage", "Mint", "Sorrel", "Nettle", "Reed", "Bracken", "Hazel",
    "Acorn", "Berry", "Cherry", "Apple", "Laurel", "Aspen", "Beech", "Yarrow", "Tansy",
    "Fennel", "Catmint", "Dandelion", "Buttercup", "Bluebell", "Foxglove",
    // Fauna
    "Mouse", "Vole", "Shrew", "Rabbit", "Hare", "Squirrel", "Mole", "Finch", "Sparrow",
    "Robin", "Wren", "Thrush", "Dove", "Lark", "Swallow", "Swift", "Jay", "Magpie",
    "Cricket", "Moth", "Beetle", "Frog", "Trout", "Pike", "Minnow", "Fox", "Wolf", "Hawk",
    "Eagle", "Falcon", "Owl", "Crow", "Raven", "Badger", "Otter", "Weasel", "Stoat",
    "Lion", "Tiger", "Adder", "Heron", "Crane", "Kestrel", "Kite", "Buzzard",
    // Colours
    "Black", "White", "Gray", "Silver", "Golden", "Amber", "Russet", "Copper", "Bronze",
    "Tawny", "Ginger", "Red", "Crimson", "Rust", "Cream", "Pale", "Sandy", "Dusty",
    "Ashen", "Smoky", "Ebony", "Jet", "Blue", "Azure", "Spotted", "Striped", "Dappled",
    "Speckled", "Mottled",
    // Terrain
    "Stone", "Rock", "Boulder", "Pebble", "Flint", "Slate", "Sand", "Dust", "Mud", "Clay",
    "Crag", "Cliff", "Ridge", "Peak", "Hollow", "Pool", "Pond", "Lake", "River", "Stream",
    "Creek", "Brook", "Spring", "Marsh", "Shore", "Wave", "Ripple",
    // Descriptive
    "Quick", "Fleet", "Nimble", "Sleek", "Strong", "Brave", "Bold", "Fierce", "Wild",
    "Sharp", "Keen", "Clever", "Wise", "Sly", "Small", "Little", "Tiny", "Tall", "Long",
    "Soft", "Fuzzy", "Shaggy", "Ragged", "Torn", "Broken", "Crooked", "Half", "One",
    "Lost", "Running", "Quiet", "Silent", "Still", "Calm", "Gentle", "Kind", "Sweet",
    "Proud", "Noble", "Loyal",
];

const SUFFIXES: &[&str] = &[
    // Body
    "fur", "pelt", "coat", "tail", "claw", "fang", "tooth", "whisker", "ear", "eye",
    "eyes", "nose", "face", "foot", "heart", "spirit", "stripe", "spot", "patch", "mark",
    "mask", "blaze", "tip", "tuft", "streak", "dapple", "speckle", "freckle",
    // Plants
    "leaf", "petal", "bloom", "blossom", "flower", "thorn", "briar", "berry", "seed",
    "branch", "moss", "fern", "reed", "vine", "sprout", "willow", "holly",
    // Weather and sky
    "storm", "cloud", "rain", "snow", "frost", "mist", "wind", "breeze", "flame", "fire",
    "ember", "shadow", "light", "glow", "shine", "shimmer", "gleam", "whisper", "howl",
    // Water and earth
    "stream", "brook", "pool", "wave", "ripple", "splash", "drop", "fall", "stone",
    "rock", "pebble",
    // Movement
    "flight", "leap", "spring", "dash", "strike", "call", "cry", "song", "step", "dance",
    "wing", "feather", "talon",
];

/// Suffixes drawn when a kit ages up to warrior mid-generation.
pub const WARRIOR_SUFFIXES: &[&str] = &[
    "fur", "pelt", "tail", "claw", "heart", "stripe", "leaf", "storm", "wing", "shine",
];

const MAX_NAME_ATTEMPTS: usize = 100;

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

fn life_stage_suffix<R: Rng + ?Sized>(stage: LifeStage, rng: &mut R) -> String {
    match stage {
        LifeStage::Kit => "kit".to_string(),
        LifeStage::Apprentice => "paw".to_string(),
        LifeStage::Leader => "star".to_string(),
        LifeStage::Warrior | LifeStage::Elder => SUFFIXES
            .choose(rng)
            .map(|s| s.to_string())
            .unwrap_or_else(|| "fur".to_string()),
    }
}

fn assemble(prefix: &str, suffix: &str) -> CatName {
    CatName {
        prefix: prefix.to_string(),
        suffix: suffix.to_string(),
        full: capitalize(prefix) + suffix,
    }
}

/// Generate a warrior name appropriate for the life stage, avoiding names
/// already in `used` (case-insensitive on the full name).
pub fn generate_warrior_name<R: Rng + ?Sized>(
    stage: LifeStage,
    used: &HashSet<String>,
    rng: &mut R,
) -> CatName {
    for _ in 0..MAX_NAME_ATTEMPTS {
        let prefix = PREFIXES.choose(rng).copied().unwrap_or("Dust");
        let suffix = life_stage_suffix(stage, rng);
        let name = assemble(prefix, &suffix);
        if !used.contains(&name.full.to_lowercase()) {
            return name;
        }
    }

    // Every combination we tried was taken; bolt a short random tag onto
    // the suffix so `full == capitalize(prefix) + suffix` still holds.
    let prefix = PREFIXES.choose(rng).copied().unwrap_or("Dust");
    let tag: String = (0..4)
        .map(|_| char::from_digit(rng.gen_range(0..36), 36).unwrap_or('x'))
        .collect();
    let suffix = format!("{}{}", life_stage_suffix(stage, rng), tag);
    assemble(prefix, &suffix)
}

/// Re-suffix a name when a cat changes life stage, keeping its prefix.
pub fn update_name_for_life_stage<R: Rng + ?Sized>(
    current: &CatName,
    new_stage: LifeStage,
    rng: &mut R,
) -> CatName {
    let suffix = match new_stage {
        LifeStage::Kit => "kit".to_string(),
        LifeStage::Apprentice => "paw".to_string(),
        LifeStage::Leader => "star".to_string(),
        LifeStage::Warrior | LifeStage::Elder => {
            if current.suffix == "kit" || current.suffix == "paw" {
                WARRIOR_SUFFIXES
                    .choose(rng)
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "fur".to_string())
            } else {
                current.suffix.clone()
            }
        }
    };
    assemble(&current.prefix, &suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_full_name_is_prefix_plus_suffix() {
        let mut rng = StdRng::seed_from_u64(1);
        let used = HashSet::new();
        for _ in 0..50 {
            let name = generate_warrior_name(LifeStage::Warrior, &used, &mut rng);
            assert_eq!(name.full, capitalize(&name.prefix) + &name.suffix);
        }
    }

    #[test]
    fn test_life_stage_suffixes() {
        let mut rng = StdRng::seed_from_u64(2);
        let used = HashSet::new();
        let kit = generate_warrior_name(LifeStage::Kit, &used, &mut rng);
        assert_eq!(kit.suffix, "kit");
        let apprentice = generate_warrior_name(LifeStage::Apprentice, &used, &mut rng);
        assert_eq!(apprentice.suffix, "paw");
        let leader = generate_warrior_name(LifeStage::Leader, &used, &mut rng);
        assert_eq!(leader.suffix, "star");
    }

    #[test]
    fn test_avoids_used_names() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut used = HashSet::new();
        for _ in 0..200 {
            let name = generate_warrior_name(LifeStage::Warrior, &used, &mut rng);
            assert!(!used.contains(&name.full.to_lowercase()));
            used.insert(name.full.to_lowercase());
        }
    }

    #[test]
    fn test_exhausted_kit_names_get_unique_tag() {
        let mut rng = StdRng::seed_from_u64(4);
        // Mark every possible kit name as used; only the tagged fallback remains.
        let used: HashSet<String> = PREFIXES
            .iter()
            .map(|p| (capitalize(p) + "kit").to_lowercase())
            .collect();
        let name = generate_warrior_name(LifeStage::Kit, &used, &mut rng);
        assert!(name.suffix.starts_with("kit"));
        assert!(name.suffix.len() > 3);
        assert!(!used.contains(&name.full.to_lowercase()));
    }

    #[test]
    fn test_aging_up_replaces_kit_suffix() {
        let mut rng = StdRng::seed_from_u64(5);
        let kit = assemble("Bramble", "kit");
        let warrior = update_name_for_life_stage(&kit, LifeStage::Warrior, &mut rng);
        assert_eq!(warrior.prefix, "Bramble");
        assert_ne!(warrior.suffix, "kit");
        assert!(WARRIOR_SUFFIXES.contains(&warrior.suffix.as_str()));
        // Warriors keep an established suffix
        let kept = update_name_for_life_stage(&warrior, LifeStage::Elder, &mut rng);
        assert_eq!(kept.suffix, warrior.suffix);
    }
}
