/// Preview — interactive shell for trying prompts against the theme templates.
///
/// Usage: preview [--themes <path>] [--seed <n>] [--style <style>]
///
/// Commands:
///   story <prompt>     — generate and print a full story
///   analyze <prompt>   — show extracted name, species, description, theme
///   style <style>      — set the illustration style
///   seed <n>           — set RNG seed
///   check              — consistency report for the last story
///   json               — print the last story as JSON
///   help               — list commands
///   quit               — exit
///
/// Any other input is treated as a prompt for `story`.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use storybook_engine::core::consistency::{check_consistency, enhance_story, CharacterRegistry};
use storybook_engine::{Story, StoryGenerator, Style};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return;
    }

    let mut themes_path = None;
    let mut seed: u64 = 0;
    let mut style = Style::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--themes" if i + 1 < args.len() => {
                i += 1;
                themes_path = Some(PathBuf::from(&args[i]));
            }
            "--seed" if i + 1 < args.len() => {
                i += 1;
                seed = args[i].parse().unwrap_or(0);
            }
            "--style" if i + 1 < args.len() => {
                i += 1;
                style = Style::parse_or_default(&args[i]);
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let mut generator = match build_generator(themes_path.as_ref(), seed) {
        Some(g) => g,
        None => std::process::exit(1),
    };

    println!("Loaded {} themes", generator.themes().themes.len());
    println!("Seed: {seed}  Style: {style}");
    println!("Type 'help' for commands.\n");

    let mut last_story: Option<Story> = None;

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("preview> ");
        stdout.flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).is_err() || line.is_empty() {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (cmd, rest) = match line.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd.to_lowercase(), rest.trim()),
            None => (line.to_lowercase(), ""),
        };

        match cmd.as_str() {
            "quit" | "exit" | "q" => {
                println!("Goodbye.");
                break;
            }
            "help" | "h" | "?" => print_help(),
            "analyze" => {
                if rest.is_empty() {
                    println!("Usage: analyze <prompt>");
                    continue;
                }
                let profile = generator.analyze(rest);
                println!("  name:        {}", profile.name);
                println!("  species:     {}", profile.species);
                println!("  description: {}", profile.description);
                println!("  theme:       {} ({})", profile.theme.name(), profile.theme.label());
            }
            "style" => match Style::parse(rest) {
                Some(s) => {
                    style = s;
                    println!("Style set to {style}");
                }
                None => {
                    let labels: Vec<&str> = Style::ALL.iter().map(|s| s.label()).collect();
                    println!("Unknown style. Choose one of: {}", labels.join(", "));
                }
            },
            "seed" => match rest.parse::<u64>() {
                Ok(n) => {
                    if let Some(g) = build_generator(themes_path.as_ref(), n) {
                        generator = g;
                        seed = n;
                        println!("Seed set to {seed}");
                    }
                }
                Err(_) => println!("Usage: seed <n>"),
            },
            "check" => match &last_story {
                Some(story) => {
                    let issues = check_consistency(story);
                    if issues.is_empty() {
                        println!("No consistency issues.");
                    }
                    for issue in issues {
                        println!("  - {issue}");
                    }
                }
                None => println!("No story yet."),
            },
            "json" => match &last_story {
                Some(story) => match serde_json::to_string_pretty(story) {
                    Ok(json) => println!("{json}"),
                    Err(e) => println!("Serialization error: {e}"),
                },
                None => println!("No story yet."),
            },
            "story" if rest.is_empty() => println!("Usage: story <prompt>"),
            _ => {
                let prompt = if cmd == "story" { rest } else { line };
                let story = generator.generate(prompt, style);
                let story = enhance_story(story, style, &mut CharacterRegistry::new());
                print_story(&story);
                last_story = Some(story);
            }
        }
    }
}

fn build_generator(themes_path: Option<&PathBuf>, seed: u64) -> Option<StoryGenerator> {
    let mut builder = StoryGenerator::builder().seed(seed);
    if let Some(path) = themes_path {
        builder = builder.themes_file(path);
    }
    match builder.build() {
        Ok(g) => Some(g),
        Err(e) => {
            eprintln!("Failed to build generator: {e}");
            None
        }
    }
}

fn print_story(story: &Story) {
    println!("\n=== {} ===", story.title);
    for character in &story.characters {
        println!("  {} — {}", character.name, character.description);
    }
    for page in &story.pages {
        println!("\n--- Page {} ---", page.page);
        println!("{}", page.text);
        println!("  [image] {}", page.image_prompt);
    }
    println!();
}

fn print_usage() {
    println!("Usage: preview [--themes <path>] [--seed <n>] [--style <style>]");
}

fn print_help() {
    println!("Commands:");
    println!("  story <prompt>     — generate and print a full story");
    println!("  analyze <prompt>   — show extracted name, species, description, theme");
    println!("  style <style>      — set the illustration style");
    println!("  seed <n>           — set RNG seed");
    println!("  check              — consistency report for the last story");
    println!("  json               — print the last story as JSON");
    println!("  help               — list commands");
    println!("  quit               — exit");
    println!("Anything else is used as a story prompt.");
}
