/// Forest Friends — generate a few stories and render one to disk.
///
/// Run with: cargo run --example forest_friends

use storybook_engine::core::consistency::check_consistency;
use storybook_engine::{generate_story, Storybook, StorybookConfig, Style};

fn main() {
    let prompts = [
        "A shy fox named Poppy who learns to share sunshine with the forest",
        "a little purple unicorn with wings who loves magic",
        "a mouse who loves music",
    ];

    for prompt in prompts {
        let story = generate_story(prompt, Style::Watercolor);
        println!("=== {} ===", story.title);
        if let Some(hero) = story.protagonist() {
            println!("  starring {} ({})", hero.name, hero.description);
        }
        if let Some(first) = story.page(1) {
            println!("  {}", first.text);
        }
        println!("  {} consistency notes\n", check_consistency(&story).len());
    }

    let config = StorybookConfig {
        output_dir: std::env::temp_dir().join("forest_friends"),
        ..StorybookConfig::default()
    };
    match Storybook::from_config(&config) {
        Ok(storybook) => {
            let production = storybook.produce(prompts[0], &config);
            match production.document {
                Some(path) => println!("Book written to {}", path.display()),
                None => println!("No book could be written"),
            }
        }
        Err(e) => eprintln!("Failed to set up storybook: {e}"),
    }
}
