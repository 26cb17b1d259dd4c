//! Ancestry CLI — cat family tree generator
//!
//! Commands:
//!   ancestry generate — generate a full tree and save it
//!   ancestry estimate — estimate tree size for a config
//!   ancestry list     — list saved trees
//!   ancestry show     — show one tree generation by generation
//!   ancestry chart    — export a tree as family-chart JSON
//!   ancestry demo     — run a full demo (generate, edit, chart)

use ancestry_core::cat::{CatParams, Gender, MutationPool, ParentKind};
use ancestry_core::chart::{cats_by_generation, convert_to_family_chart, get_siblings};
use ancestry_core::storage::TreeStore;
use ancestry_core::tree::{
    estimate_cat_count, FounderInput, FoundingCoupleInput, OffspringRequest, TreeGenerationConfig,
    TreeManager, REFUSE_THRESHOLD, WARN_THRESHOLD,
};
use ancestry_core::worker::{spawn_generation, GenerationRequest};
use std::env;

const STORE_FILE: &str = "ancestry-store.json";

fn print_usage() {
    println!(
        r#"
╔══════════════════════════════════════════════════════════════╗
║        Ancestry v1.0 — Cat Family Tree Generator             ║
║        Founding couple → generations of descendants          ║
╚══════════════════════════════════════════════════════════════╝

Usage: ancestry <command> [options]

Commands:
  generate <depth> [min-kits] [max-kits] [partner-chance] [seed]  Generate and save a tree
  estimate <depth> <min-kits> <max-kits> <partner-chance>         Estimate tree size
  list                                                            List saved trees
  show     <slug>                                                 Show a tree by generation
  chart    <slug> [output-file]                                   Export family-chart JSON
  demo                                                            Run full interactive demo

Examples:
  ancestry generate 4 1 3 0.7
  ancestry generate 3 2 4 0.5 12345
  ancestry estimate 6 2 5 0.8
  ancestry show tree-abc123-xyz
  ancestry chart tree-abc123-xyz chart.json
  ancestry demo
"#
    );
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        return;
    }

    match args[1].as_str() {
        "generate" => cmd_generate(&args[2..]).await,
        "estimate" => cmd_estimate(&args[2..]),
        "list" => cmd_list(),
        "show" => cmd_show(&args[2..]),
        "chart" => cmd_chart(&args[2..]),
        "demo" => cmd_demo().await,
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage();
        }
    }
}

fn load_store() -> TreeStore {
    let store = TreeStore::open(STORE_FILE, "local");
    if !store.trees.is_empty() {
        println!("  Loaded {} trees from {}", store.trees.len(), STORE_FILE);
    }
    store
}

fn save_store(store: &TreeStore) {
    if let Err(e) = store.save() {
        eprintln!("  Failed to save: {}", e);
    } else {
        println!("  Saved to {}", STORE_FILE);
    }
}

fn demo_founders() -> FoundingCoupleInput {
    FoundingCoupleInput {
        mother: FounderInput {
            params: CatParams {
                pelt_name: "Tabby".to_string(),
                colour: "GINGER".to_string(),
                eye_colour: "GREEN".to_string(),
                skin_colour: "PINK".to_string(),
                ..CatParams::default()
            },
            name: None,
            history_profile_id: None,
        },
        father: FounderInput {
            params: CatParams {
                pelt_name: "SingleColour".to_string(),
                colour: "BLACK".to_string(),
                eye_colour: "AMBER".to_string(),
                skin_colour: "BLACK".to_string(),
                ..CatParams::default()
            },
            name: None,
            history_profile_id: None,
        },
    }
}

async fn cmd_generate(args: &[String]) {
    if args.is_empty() {
        eprintln!("Usage: ancestry generate <depth> [min-kits] [max-kits] [partner-chance] [seed]");
        return;
    }

    let depth: u32 = args[0].parse().expect("depth must be a number");
    let min_children: u32 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(1);
    let max_children: u32 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(4);
    let partner_chance: f64 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(0.5);
    let seed: Option<u64> = args.get(4).and_then(|s| s.parse().ok());

    let config = TreeGenerationConfig {
        depth,
        min_children,
        max_children,
        partner_chance,
        ..TreeGenerationConfig::default()
    };

    let request = GenerationRequest {
        config,
        founding_couple: demo_founders(),
        pool: MutationPool::standard(),
        tree_name: Some(format!("Generated depth-{} tree", depth)),
        seed,
    };

    println!("\n  Generating {} generations...", depth);
    let mut handle = spawn_generation(request);
    while let Some(progress) = handle.progress.recv().await {
        println!(
            "  Generation {}/{}: {} cats so far",
            progress.generation, progress.total_generations, progress.cat_count
        );
    }
    let tree = match handle.join().await {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("  Generation failed: {}", e);
            return;
        }
    };

    println!("\n  Done: '{}' with {} cats", tree.name, tree.cats.len());
    let mut store = load_store();
    let slug = store.put(tree);
    println!("  Stored as: {}", slug);
    save_store(&store);
}

fn cmd_estimate(args: &[String]) {
    if args.len() < 4 {
        eprintln!("Usage: ancestry estimate <depth> <min-kits> <max-kits> <partner-chance>");
        return;
    }

    let depth: u32 = args[0].parse().expect("depth must be a number");
    let min_children: f64 = args[1].parse().expect("min-kits must be a number");
    let max_children: f64 = args[2].parse().expect("max-kits must be a number");
    let partner_chance: f64 = args[3].parse().expect("partner-chance must be a number");

    let avg = (min_children + max_children) / 2.0;
    let estimated = estimate_cat_count(depth, avg, partner_chance);

    println!("\n  Estimated cats: {}", estimated);
    if estimated > REFUSE_THRESHOLD {
        println!("  Too large: generation would be refused (limit {})", REFUSE_THRESHOLD);
    } else if estimated > WARN_THRESHOLD {
        println!("  Large tree: expect a slow run (comfort threshold {})", WARN_THRESHOLD);
    } else {
        println!("  Comfortable size.");
    }
}

fn cmd_list() {
    let store = load_store();
    if store.trees.is_empty() {
        println!("\n  No trees. Use 'ancestry generate' or 'ancestry demo' to get started.");
        return;
    }
    println!("\n  Trees ({}):", store.trees.len());
    println!("  {}", "-".repeat(70));
    for tree in store.list_recent() {
        println!(
            "  {} | '{}' | {} cats | depth {}",
            tree.slug,
            tree.name,
            tree.cats.len(),
            tree.config.depth
        );
    }
    println!("  {}", store.summary());
}

fn cmd_show(args: &[String]) {
    let Some(slug) = args.first() else {
        eprintln!("Usage: ancestry show <slug>");
        return;
    };

    let store = load_store();
    let Some(tree) = store.get(slug) else {
        eprintln!("  No tree stored under '{}'", slug);
        return;
    };

    println!("\n  '{}' ({} cats)", tree.name, tree.cats.len());
    println!("  {}", "=".repeat(60));
    for (generation, cats) in cats_by_generation(tree) {
        println!("  Generation {} ({} cats):", generation, cats.len());
        for cat in cats {
            println!(
                "    {} | {} | {} {} | {} partners, {} kits",
                &cat.id[..8],
                cat.name.full,
                cat.params.colour,
                cat.params.pelt_name,
                cat.partner_ids.len(),
                cat.children_ids.len()
            );
        }
    }
}

fn cmd_chart(args: &[String]) {
    let Some(slug) = args.first() else {
        eprintln!("Usage: ancestry chart <slug> [output-file]");
        return;
    };

    let store = load_store();
    let Some(tree) = store.get(slug) else {
        eprintln!("  No tree stored under '{}'", slug);
        return;
    };

    let nodes = convert_to_family_chart(tree, None);
    let json = match serde_json::to_string_pretty(&nodes) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("  Failed to serialize chart: {}", e);
            return;
        }
    };

    match args.get(1) {
        Some(path) => {
            if let Err(e) = std::fs::write(path, &json) {
                eprintln!("  Failed to write {}: {}", path, e);
            } else {
                println!("  Wrote {} chart nodes -> {}", nodes.len(), path);
            }
        }
        None => println!("{}", json),
    }
}

async fn cmd_demo() {
    println!(
        r#"
╔══════════════════════════════════════════════════════════════╗
║              Ancestry v1.0 — Full Demo                       ║
║      Generation + Genetics + Edits + Chart Export            ║
╚══════════════════════════════════════════════════════════════╝
"#
    );

    // Step 1: Size estimate
    println!("Step 1: Estimating tree size...");
    println!("{}", "-".repeat(60));
    let config = TreeGenerationConfig {
        depth: 3,
        min_children: 2,
        max_children: 4,
        partner_chance: 0.7,
        ..TreeGenerationConfig::default()
    };
    println!(
        "  depth={} | kits 2..4 | partner chance 0.7 -> ~{} cats",
        config.depth,
        config.estimated_cat_count()
    );

    // Step 2: Off-thread generation with progress
    println!("\nStep 2: Generating the full tree off-thread...");
    println!("{}", "-".repeat(60));
    let request = GenerationRequest {
        config,
        founding_couple: demo_founders(),
        pool: MutationPool::standard(),
        tree_name: Some("Demo Tree".to_string()),
        seed: Some(2024),
    };
    let mut handle = spawn_generation(request);
    while let Some(progress) = handle.progress.recv().await {
        println!(
            "  Generation {}/{}: {} cats",
            progress.generation, progress.total_generations, progress.cat_count
        );
    }
    let serialized = match handle.join().await {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("  Generation failed: {}", e);
            return;
        }
    };
    println!("  Generated '{}' with {} cats", serialized.name, serialized.cats.len());

    // Step 3: Rehydrate and edit
    println!("\nStep 3: Editing the tree...");
    println!("{}", "-".repeat(60));
    let mut manager = match TreeManager::deserialize(serialized, MutationPool::standard()) {
        Ok(manager) => manager,
        Err(e) => {
            eprintln!("  Failed to rehydrate: {}", e);
            return;
        }
    };

    let mother_id = manager.tree().founding_mother_id.clone();
    let outsider_params = CatParams {
        pelt_name: "Bengal".to_string(),
        colour: "GOLDEN".to_string(),
        eye_colour: "COPPER".to_string(),
        skin_colour: "PINK".to_string(),
        ..CatParams::default()
    };

    match manager.assign_partner(&mother_id, Some(outsider_params.clone()), None, false) {
        Ok(partner_id) => {
            let partner = manager.get_cat(&partner_id).unwrap();
            println!("  Assigned new partner to founding mother: {}", partner.name.full);
        }
        Err(e) => eprintln!("  assign_partner failed: {}", e),
    }

    match manager.add_parent(&mother_id, outsider_params.clone(), ParentKind::Father) {
        Ok(parent_id) => {
            let parent = manager.get_cat(&parent_id).unwrap();
            println!("  Extended the tree upward: {} is now her father", parent.name.full);
        }
        Err(e) => eprintln!("  add_parent failed: {}", e),
    }

    // A forced-gender single kit for the founders
    let father_id = manager.tree().founding_father_id.clone();
    let mut request = OffspringRequest::new(mother_id.clone(), father_id, 1);
    request.forced_gender = Some(Gender::F);
    request.litter_size = Some(1);
    match manager.generate_offspring(request) {
        Ok(kits) => {
            let kit = manager.get_cat(&kits[0]).unwrap();
            println!("  New she-kit for the founders: {}", kit.name.full);
        }
        Err(e) => eprintln!("  generate_offspring failed: {}", e),
    }

    manager.tree().store.check_integrity().expect("graph stayed consistent");
    println!("  Graph integrity verified after edits.");

    // Step 4: Queries
    println!("\nStep 4: Relationship queries...");
    println!("{}", "-".repeat(60));
    let tree = manager.serialize();
    let mother = tree.cats.iter().find(|c| c.id == mother_id).unwrap();
    if let Some(first_child) = mother.children_ids.first() {
        let siblings = get_siblings(&tree, first_child);
        println!("  First child has {} siblings", siblings.len());
    }
    for (generation, cats) in cats_by_generation(&tree) {
        println!("  Generation {}: {} cats", generation, cats.len());
    }

    // Step 5: Chart export
    println!("\nStep 5: Converting to family-chart nodes...");
    println!("{}", "-".repeat(60));
    let nodes = convert_to_family_chart(&tree, None);
    println!("  {} chart nodes ready for rendering", nodes.len());

    // Step 6: Persistence
    println!("\nStep 6: Saving to the local store...");
    println!("{}", "-".repeat(60));
    let mut store = load_store();
    let slug = store.put(tree);
    save_store(&store);

    println!(
        r#"
╔══════════════════════════════════════════════════════════════╗
║              Ancestry v1.0 Demo Complete!                    ║
║                                                              ║
║  - Generated a 3-generation tree with inherited genetics     ║
║  - Streamed progress from the blocking worker                ║
║  - Edited the graph: partner, parent, forced-gender kit      ║
║  - Verified referential integrity after every edit           ║
║  - Exported family-chart nodes for rendering                 ║
╚══════════════════════════════════════════════════════════════╝

  Run 'ancestry show {slug}' to browse the saved tree.
"#,
        slug = slug
    );
}
