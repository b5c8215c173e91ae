/// Storybook — generate a storybook from a prompt and render it to disk.
///
/// Usage: storybook <prompt> [--config <file>] [--style <style>] [--size <WxH>]
///                  [--out <dir>] [--seed <n>] [--themes <file>] [--no-narration]
///
/// The story is printed to stdout as JSON; rendered files go under the
/// output directory.

use std::path::PathBuf;
use std::process;

use storybook_engine::schema::style::{ImageSize, Style};
use storybook_engine::{Storybook, StorybookConfig};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: storybook <prompt> [--config <file>] [--style <style>] [--size <WxH>] \
[--out <dir>] [--seed <n>] [--themes <file>] [--no-narration]";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("{USAGE}");
        process::exit(0);
    }

    let prompt = &args[1];
    let mut config_path = None;
    let mut style = None;
    let mut size = None;
    let mut out = None;
    let mut seed = None;
    let mut themes = None;
    let mut narration = true;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--config" if i + 1 < args.len() => {
                i += 1;
                config_path = Some(PathBuf::from(&args[i]));
            }
            "--style" if i + 1 < args.len() => {
                i += 1;
                style = match Style::parse(&args[i]) {
                    Some(s) => Some(s),
                    None => {
                        eprintln!("Unknown style '{}', using cartoon", args[i]);
                        Some(Style::Cartoon)
                    }
                };
            }
            "--size" if i + 1 < args.len() => {
                i += 1;
                size = Some(ImageSize::parse(&args[i]));
            }
            "--out" if i + 1 < args.len() => {
                i += 1;
                out = Some(PathBuf::from(&args[i]));
            }
            "--seed" if i + 1 < args.len() => {
                i += 1;
                seed = match args[i].parse::<u64>() {
                    Ok(s) => Some(s),
                    Err(_) => {
                        eprintln!("Invalid seed '{}'", args[i]);
                        process::exit(1);
                    }
                };
            }
            "--themes" if i + 1 < args.len() => {
                i += 1;
                themes = Some(PathBuf::from(&args[i]));
            }
            "--no-narration" => narration = false,
            other => {
                eprintln!("Unknown argument '{other}'\n{USAGE}");
                process::exit(1);
            }
        }
        i += 1;
    }

    let mut config = match config_path {
        Some(path) => match StorybookConfig::load_from_ron(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config {}: {e}", path.display());
                process::exit(1);
            }
        },
        None => StorybookConfig::default(),
    };

    if let Some(style) = style {
        config.style = style;
    }
    if let Some(size) = size {
        config.image_size = size;
    }
    if let Some(out) = out {
        config.output_dir = out;
    }
    if let Some(seed) = seed {
        config.seed = seed;
    }
    if themes.is_some() {
        config.themes = themes;
    }
    if !narration {
        config.narration = false;
    }

    let storybook = match Storybook::from_config(&config) {
        Ok(storybook) => storybook,
        Err(e) => {
            eprintln!("Failed to set up storybook: {e}");
            process::exit(1);
        }
    };

    let production = storybook.produce(prompt, &config);

    match serde_json::to_string_pretty(&production.story) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Failed to serialize story: {e}");
            process::exit(1);
        }
    }

    eprintln!("\n=== {} ===", production.story.title);
    eprintln!("Illustrations: {}/5", production.images.len());
    eprintln!("Narration scripts: {}", production.narration.len());
    match &production.document {
        Some(path) => eprintln!("Book: {}", path.display()),
        None => eprintln!("Book: not written"),
    }
    for issue in &production.issues {
        eprintln!("Consistency: {issue}");
    }
}
