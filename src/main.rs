use quickhelp_reader::{HelpReader, HelpSystem, LoadOptions, UriKind};
use std::env;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <path-to-hlp-file> [--raw]", args[0]);
        std::process::exit(1);
    }

    let hlp_path = &args[1];
    let raw = args.iter().skip(2).any(|arg| arg == "--raw");
    let options = LoadOptions::default().process_commands(!raw);

    println!("Reading help file: {}", hlp_path);
    if raw {
        println!("Command processing disabled.");
    }
    println!("{}", "=".repeat(60));

    let loaded = match HelpReader::with_options(options).load_file(hlp_path) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("\nERROR: Failed to read help file");
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    };

    let mut system = HelpSystem::new();
    let mut total_errors = 0;
    for item in loaded {
        let db = &item.database;
        println!("\nDatabase: {}", db.name());
        println!("  Topics: {}", db.topics().len());
        println!("  Context strings: {}", db.context_count());
        println!("  Case sensitive: {}", db.is_case_sensitive());
        println!("  Locked: {}", db.locked);
        println!("  Display width: {}", db.display_width);
        println!("  Control character: {:?}", db.control_character);

        println!("\n  Sample topics (first 10):");
        for (i, topic) in db.topics().iter().take(10).enumerate() {
            let contexts = db.topic_context(i);
            println!(
                "  {}. {} ({} lines) [{}]",
                i,
                topic,
                topic.lines.len(),
                contexts.join(", ")
            );
        }
        if db.topics().len() > 10 {
            println!("  ... and {} more", db.topics().len() - 10);
        }

        if !item.errors.is_empty() {
            println!("\n  Topics with errors:");
            for error in &item.errors {
                println!("  {}", error);
            }
        }
        total_errors += item.errors.len();

        if let Err(e) = system.add_database(item.database) {
            eprintln!("WARNING: {}", e);
        }
    }

    // Check every hyperlink against the databases of this file.
    let mut unresolved = 0;
    for (db_index, db) in system.databases().iter().enumerate() {
        for topic in db.topics() {
            for span in topic.lines.iter().flat_map(|line| line.links()) {
                let navigable = !matches!(span.uri.kind(), UriKind::Command | UriKind::File | UriKind::None);
                if navigable && system.resolve_uri(Some(db_index), span.uri).is_none() {
                    unresolved += 1;
                    if unresolved <= 10 {
                        println!("  Cannot resolve link '{}' in {} / {}", span.uri, db.name(), topic);
                    }
                }
            }
        }
    }

    println!("\n{}", "=".repeat(60));
    println!("Unresolved links: {}", unresolved);
    println!(
        "Loaded {} database(s), {} topic(s) with errors.",
        system.databases().len(),
        total_errors
    );
}
