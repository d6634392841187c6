use serde_json::{json, Map, Value};
use token_gen_core::engine::language::{LanguageModel, LanguageRegistry};
use token_gen_core::engine::numbering::Notation;
use token_gen_core::engine::scaler::GridInfo;
use token_gen_core::engine::settings::{ReplaceMode, Settings};
use token_gen_core::engine::token_engine::{PlacementInput, TokenEngine};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Compile a language model from a raw word list; hosts with prebuilt
    // JSON dictionaries would use LanguageRegistry::from_dir instead
    let words: Vec<String> = [
        "grashnak", "ugluk", "snaga", "gorbag", "shagrat", "muzgash",
        "lugdush", "grishnakh", "uzgash", "bolgrim", "ghashur", "narzug",
    ]
    .into_iter()
    .map(str::to_owned)
    .collect();
    let orcish = LanguageModel::from_words(&words)?;

    let mut languages = LanguageRegistry::new();
    languages.insert("orcish", orcish);

    // Replace proposed names with generated ones, suffix with a roman
    // numeral, and pick a front adjective
    let mut settings = Settings::default();
    settings.name.replace = ReplaceMode::Replace;
    settings.name.options.default_language = "orcish".to_owned();
    settings.name.options.min = 5;
    settings.name.options.max = 9;
    settings.name.number.notation = Notation::Roman;

    let mut engine = TokenEngine::new(settings, languages);
    engine.set_adjectives(vec![
        "Sneaky".to_owned(),
        "Rabid".to_owned(),
        "Grim".to_owned(),
        "One-Eyed".to_owned(),
    ]);

    // Place five tokens of the same actor onto one scene: each gets a
    // fresh generated name and an advancing suffix
    println!("-- placements --");
    for _ in 0..5 {
        let input = PlacementInput {
            scene_id: "cave".to_owned(),
            grid: GridInfo {
                grid_type: 1,
                units: "ft".to_owned(),
                distance: 5.0,
            },
            actor_id: "orc-warrior".to_owned(),
            actor_link: false,
            actor: json!({"system": {"traits": {"size": "lg"}}}),
            proposed: Map::from_iter([("name".to_owned(), Value::from("Orc Warrior"))]),
            existing_tokens: Vec::new(),
            keep_base_name: false,
        };

        let patch = engine.place_token(&input)?;
        let size = patch.size.expect("size scaling is enabled");
        println!(
            "{:24} footprint {}x{} at scale {:.2}",
            patch.name.unwrap_or_default(),
            size.width,
            size.height,
            size.scale
        );
    }

    // Resetting a scene restarts its sequences
    engine.reset_counters("cave", None);
    println!("\n-- after reset --");
    let input = PlacementInput {
        scene_id: "cave".to_owned(),
        grid: GridInfo {
            grid_type: 1,
            units: "ft".to_owned(),
            distance: 5.0,
        },
        actor_id: "orc-warrior".to_owned(),
        actor_link: false,
        actor: json!({"system": {"traits": {"size": "lg"}}}),
        proposed: Map::from_iter([("name".to_owned(), Value::from("Orc Warrior"))]),
        existing_tokens: Vec::new(),
        keep_base_name: false,
    };
    println!("{}", engine.place_token(&input)?.name.unwrap_or_default());

    // Standalone generation, outside any placement
    println!("\n-- standalone names --");
    for i in 0..10 {
        println!("Generated name {}: {}", i + 1, engine.generate_name(Some("orcish"), 5, 9)?);
    }

    // Asking for an unregistered language fails cleanly
    match engine.generate_name(Some("elvish"), 5, 9) {
        Ok(_) => println!("Should not happen"),
        Err(_) => println!("\nThis language ('elvish') is not registered"),
    }

    Ok(())
}
