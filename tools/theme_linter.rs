/// Theme Linter — validates theme template files.
///
/// Usage: theme_linter <theme_file_or_dir> [--strict]
///
/// With `--strict`, warnings also fail the run.

use std::path::Path;
use std::process;

use storybook_engine::core::template::{Bindings, Field, ThemeBook};
use storybook_engine::schema::theme::Theme;
use tracing_subscriber::EnvFilter;

/// Rendered page length considered comfortable for read-aloud.
const MIN_WORDS: usize = 25;
const MAX_WORDS: usize = 90;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: theme_linter <theme_file_or_dir> [--strict]");
        process::exit(0);
    }

    let theme_path = Path::new(&args[1]);
    let strict = args[2..].iter().any(|a| a == "--strict");

    let mut book = ThemeBook::default();
    let mut errors = Vec::new();

    if theme_path.is_file() {
        match ThemeBook::load_from_ron(theme_path) {
            Ok(loaded) => book.merge(loaded),
            Err(e) => errors.push(format!("{}: {e}", theme_path.display())),
        }
    } else if theme_path.is_dir() {
        load_themes_recursive(theme_path, &mut book, &mut errors);
    } else {
        eprintln!("ERROR: Path '{}' does not exist", theme_path.display());
        process::exit(1);
    }

    println!("Loaded {} themes", book.themes.len());

    let warnings = lint_themes(&book);

    println!("\n=== Theme Lint Report ===\n");

    if errors.is_empty() && warnings.is_empty() {
        println!("All checks passed!");
    }

    for warning in &warnings {
        println!("WARNING: {warning}");
    }

    for error in &errors {
        println!("ERROR: {error}");
    }

    println!(
        "\nSummary: {} errors, {} warnings",
        errors.len(),
        warnings.len()
    );

    if errors.is_empty() && !(strict && !warnings.is_empty()) {
        process::exit(0);
    } else {
        process::exit(1);
    }
}

fn load_themes_recursive(dir: &Path, book: &mut ThemeBook, errors: &mut Vec<String>) {
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                load_themes_recursive(&path, book, errors);
            } else if path.extension().and_then(|s| s.to_str()) == Some("ron") {
                match ThemeBook::load_from_ron(&path) {
                    Ok(loaded) => {
                        println!("  Loaded: {}", path.display());
                        book.merge(loaded);
                    }
                    Err(e) => errors.push(format!("{}: {e}", path.display())),
                }
            }
        }
    }
}

fn lint_themes(book: &ThemeBook) -> Vec<String> {
    let mut warnings = Vec::new();

    // Long sample values so length warnings err on the long side.
    let sample = Bindings {
        name: "Whiskers",
        species: "unicorn",
        description: "small unicorn, with purple fur, curious and adventurous",
        style: "watercolor",
    };

    for theme in Theme::ALL {
        let Some(template) = book.get(theme) else {
            warnings.push(format!(
                "theme '{}' is missing; prompts about {} get the skeleton story",
                theme.name(),
                theme.label()
            ));
            continue;
        };

        for (i, page) in template.pages.iter().enumerate() {
            let number = i + 1;
            if !page.text.uses(Field::Name) {
                warnings.push(format!(
                    "{} page {number}: text never mentions {{name}}",
                    theme.name()
                ));
            }
            if page.scene.uses(Field::Description) || page.scene.uses(Field::Style) {
                warnings.push(format!(
                    "{} page {number}: scene repeats {{description}} or {{style}}, which the image prompt already carries",
                    theme.name()
                ));
            }

            let words = page.text.render(&sample).split_whitespace().count();
            if !(MIN_WORDS..=MAX_WORDS).contains(&words) {
                warnings.push(format!(
                    "{} page {number}: {words} words (expected {MIN_WORDS}-{MAX_WORDS})",
                    theme.name()
                ));
            }
        }
    }

    warnings
}
