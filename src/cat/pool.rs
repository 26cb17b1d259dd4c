//! MutationPool: the closed set of drawable trait values
//!
//! Constructed once per session from a sprite-catalog collaborator and
//! read-only thereafter. The pool is consulted whenever a brand-new
//! outsider is invented and whenever inheritance mutates an allele.

use super::cat::CatParams;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Named colour restriction used when inventing outsider genetics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteMode {
    Off,
    Mood,
    Bold,
    Darker,
    Blackout,
}

impl PaletteMode {
    pub const ALL: [PaletteMode; 5] = [
        PaletteMode::Off,
        PaletteMode::Mood,
        PaletteMode::Bold,
        PaletteMode::Darker,
        PaletteMode::Blackout,
    ];

    /// Sample one mode uniformly from the enabled set, `Off` when empty.
    pub fn sample<R: Rng + ?Sized>(enabled: &[PaletteMode], rng: &mut R) -> PaletteMode {
        enabled.choose(rng).copied().unwrap_or(PaletteMode::Off)
    }

    fn allows(self, colour: &str) -> bool {
        match self {
            PaletteMode::Off => true,
            PaletteMode::Blackout => {
                colour.contains("BLACK") || colour.contains("DARK") || colour.contains("GHOST")
            }
            PaletteMode::Darker => {
                !colour.contains("WHITE")
                    && !colour.contains("PALE")
                    && !colour.contains("LIGHT")
                    && !colour.contains("CREAM")
                    && !colour.contains("SILVER")
            }
            PaletteMode::Mood => {
                colour.contains("GREY")
                    || colour.contains("SILVER")
                    || colour.contains("LILAC")
                    || colour.contains("WHITE")
                    || colour.contains("GHOST")
            }
            PaletteMode::Bold => {
                colour.contains("GINGER")
                    || colour.contains("GOLDEN")
                    || colour.contains("SIENNA")
                    || colour.contains("BLACK")
            }
        }
    }

    /// Restrict a colour list to this mode, falling back to the full list
    /// when the restriction would leave nothing to draw from.
    pub fn restrict(self, colours: &[String]) -> Vec<String> {
        let filtered: Vec<String> = colours
            .iter()
            .filter(|c| self.allows(c))
            .cloned()
            .collect();
        if filtered.is_empty() {
            colours.to_vec()
        } else {
            filtered
        }
    }
}

/// Candidate trait values for inventing genetics and mutating alleles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationPool {
    pub pelts: Vec<String>,
    pub colours: Vec<String>,
    pub eye_colours: Vec<String>,
    pub skin_colours: Vec<String>,
    pub white_patches: Vec<String>,
    pub sprite_numbers: Vec<u32>,
    pub accessories: Vec<String>,
    pub scars: Vec<String>,
    pub tortie_masks: Vec<String>,
}

impl Default for MutationPool {
    fn default() -> Self {
        Self {
            pelts: Vec::new(),
            colours: Vec::new(),
            eye_colours: Vec::new(),
            skin_colours: Vec::new(),
            white_patches: Vec::new(),
            sprite_numbers: (0..10).collect(),
            accessories: Vec::new(),
            scars: Vec::new(),
            tortie_masks: Vec::new(),
        }
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl MutationPool {
    /// The sprite catalog's fallback trait lists. Lets the CLI and tests run
    /// without a catalog collaborator wired in.
    pub fn standard() -> Self {
        Self {
            pelts: strings(&[
                "SingleColour", "TwoColour", "Tabby", "Marbled", "Rosette", "Smoke", "Ticked",
                "Speckled", "Bengal", "Mackerel", "Classic", "Sokoke", "Agouti", "Singlestripe",
                "Masked",
            ]),
            colours: strings(&[
                "WHITE", "PALEGREY", "SILVER", "GREY", "DARKGREY", "GHOST", "BLACK", "CREAM",
                "PALEGINGER", "GOLDEN", "GINGER", "DARKGINGER", "SIENNA", "LIGHTBROWN", "LILAC",
                "BROWN", "GOLDEN-BROWN", "DARKBROWN", "CHOCOLATE",
            ]),
            eye_colours: strings(&[
                "YELLOW", "AMBER", "HAZEL", "PALEGREEN", "GREEN", "BLUE", "DARKBLUE", "GREY",
                "CYAN", "EMERALD", "HEATHERBLUE", "SUNLITICE", "COPPER", "SAGE", "COBALT",
                "PALEBLUE", "PALEYELLOW", "GOLD", "GREENYELLOW", "BRONZE", "SILVER",
            ]),
            skin_colours: strings(&[
                "BLACK", "PINK", "DARKBROWN", "BROWN", "LIGHTBROWN", "DARK", "DARKGREY", "GREY",
                "DARKSALMON", "SALMON", "PEACH", "DARKMARBLED", "MARBLED", "LIGHTMARBLED",
                "DARKBLUE", "BLUE", "LIGHTBLUE", "RED",
            ]),
            white_patches: strings(&[
                "FULLWHITE", "ANY", "TUXEDO", "LITTLE", "VAN", "ANYTWO", "MOON", "PHANTOM",
                "POWDER", "BLEACHED", "SAVANNAH", "FADESPOTS", "PEBBLESHINE", "EXTRA", "ONEEAR",
                "BROKEN", "LIGHTTUXEDO", "BUZZARDFANG", "LIGHTSONG", "VITILIGO", "BLACKSTAR",
                "PIEBALD", "CURVED", "PETAL", "SHIBAINU", "OWL", "TIP", "FANCY", "FRECKLES",
                "RINGTAIL", "HALFFACE", "PANTSTWO", "GOATEE", "PAWS", "MITAINE", "BROKENBLAZE",
                "SCOURGE", "DIVA", "BEARD", "TAIL", "BLAZE", "PRINCE", "BIB", "VEE", "UNDERS",
                "HONEY", "FAROFA", "DAMIEN", "MISTER", "BELLY", "TAILTIP", "TOES", "TOPCOVER",
                "APRON", "CAPSADDLE", "MASKMANTLE", "SQUEAKS", "STAR", "TOESTAIL", "RAVENPAW",
                "PANTS", "REVERSEPANTS", "SKUNK", "KARPATI", "HALFWHITE", "APPALOOSA",
                "DAPPLEPAW", "HEART",
            ]),
            sprite_numbers: (0..=20).collect(),
            accessories: strings(&[
                "MAPLE LEAF", "HOLLY", "BLUE BERRIES", "FORGET ME NOTS", "RYE STALK", "LAUREL",
                "BLUEBELLS", "NETTLE", "POPPY", "LAVENDER", "HERBS", "PETALS", "DRY HERBS",
                "OAK LEAVES", "CATMINT", "MAPLE SEED", "JUNIPER", "RED FEATHERS",
                "BLUE FEATHERS", "JAY FEATHERS", "MOTH WINGS", "CICADA WINGS", "CRIMSONCOLLAR",
                "BLUECOLLAR", "YELLOWCOLLAR", "CYANCOLLAR", "REDCOLLAR", "LIMECOLLAR",
            ]),
            scars: strings(&[
                "ONE", "TWO", "THREE", "TAILSCAR", "SNOUT", "CHEEK", "SIDE", "THROAT", "TAILBASE",
                "BELLY", "LEGBITE", "NECKBITE", "FACE", "MANLEG", "BRIGHTHEART", "MANTAIL",
                "BRIDGE", "RIGHTBLIND", "LEFTBLIND", "BOTHBLIND", "BEAKCHEEK", "BEAKLOWER",
                "CATBITE", "RATBITE", "QUILLCHUNK", "QUILLSCRATCH",
            ]),
            tortie_masks: strings(&[
                "ONE", "TWO", "THREE", "FOUR", "REDTAIL", "DELILAH", "MINIMALONE", "MINIMALTWO",
                "MINIMALTHREE", "MINIMALFOUR", "HALF", "OREO", "SWOOP", "MOTTLED", "SIDEMASK",
                "EYEDOT", "BANDANA", "PACMAN", "STREAMSTRIKE", "ORIOLE", "CHIMERA", "DAUB",
                "EMBER", "BLANKET", "ROBIN", "BRINDLE", "PAIGE", "ROSETAIL", "SAFI", "SMUDGED",
                "DAPPLENIGHT", "STREAK", "MASK", "CHEST", "ARMTAIL", "SMOKE", "GRUMPYFACE",
            ]),
        }
    }

    /// Invent a full appearance bundle for an outsider cat, drawing every
    /// trait from the pool. One palette mode from the enabled set restricts
    /// the colour draw.
    pub fn invent_outsider<R: Rng + ?Sized>(
        &self,
        palette_modes: &[PaletteMode],
        rng: &mut R,
    ) -> CatParams {
        let mode = PaletteMode::sample(palette_modes, rng);
        let colours = mode.restrict(&self.colours);

        let is_tortie = !self.tortie_masks.is_empty() && rng.gen_bool(0.08);
        let tortie_mask = if is_tortie {
            self.tortie_masks.choose(rng).cloned()
        } else {
            None
        };
        let white_patches = if !self.white_patches.is_empty() && rng.gen_bool(0.5) {
            self.white_patches.choose(rng).cloned()
        } else {
            None
        };

        CatParams {
            sprite_number: self.sprite_numbers.choose(rng).copied().unwrap_or(0),
            pelt_name: self
                .pelts
                .choose(rng)
                .cloned()
                .unwrap_or_else(|| "Tabby".to_string()),
            colour: colours
                .choose(rng)
                .cloned()
                .unwrap_or_else(|| "BLACK".to_string()),
            eye_colour: self
                .eye_colours
                .choose(rng)
                .cloned()
                .unwrap_or_else(|| "AMBER".to_string()),
            skin_colour: self
                .skin_colours
                .choose(rng)
                .cloned()
                .unwrap_or_else(|| "PINK".to_string()),
            white_patches,
            is_tortie,
            tortie_mask,
            ..CatParams::default()
        }
    }

    /// Draw up to `count` distinct accessories.
    pub fn pick_accessories<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<String> {
        pick_distinct(&self.accessories, count, rng)
    }

    /// Draw up to `count` distinct scars.
    pub fn pick_scars<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<String> {
        pick_distinct(&self.scars, count, rng)
    }

    pub fn random_sprite<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        self.sprite_numbers.choose(rng).copied().unwrap_or(0)
    }
}

fn pick_distinct<R: Rng + ?Sized>(values: &[String], count: usize, rng: &mut R) -> Vec<String> {
    values
        .choose_multiple(rng, count.min(values.len()))
        .cloned()
        .collect()
}
