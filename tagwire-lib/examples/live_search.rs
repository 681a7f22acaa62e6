//! Interactive word search against the Datamuse API.
//!
//! Run with: `cargo run --example live_search`
//!
//! Type a prefix and press Enter to search. `+N` toggles result number N
//! in the tag selection, `+some text` adds a custom tag, and an empty line
//! prints the current tags. Ctrl-D exits.

use std::io::BufRead;
use std::time::Duration;

use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use tagwire_lib::Candidate;
use tagwire_lib::RemoteSearch;
use tagwire_lib::SearchConfig;
use tagwire_lib::SelectionConfig;
use tagwire_lib::TagSelection;
use tagwire_lib::Trigger;
use tagwire_lib::change_channel;
use tagwire_lib::selection_channel;

#[tokio::main]
async fn main() {
    let _ = TermLogger::init(
        LevelFilter::Warn,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );

    let (notifier, mut changes) = change_channel();
    let search = RemoteSearch::builder(
        SearchConfig::new("https://api.datamuse.com/words?max=8&sp={{value}}*")
            .trigger(Trigger::Debounce)
            .rate(Duration::from_millis(200))
            .timeout(Duration::from_secs(10)),
    )
    .notifier(notifier)
    .build();

    let (emit, mut emitted) = selection_channel();
    let selection = TagSelection::new(
        SelectionConfig::new().text_path("word").value_path("word"),
        emit,
    );

    println!("search a word prefix; `+N` toggles result N; `+text` adds a custom tag");
    let stdin = std::io::stdin();

    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        let line = line.trim().to_string();

        if line.is_empty() {
            print_tags(&selection.items());
            continue;
        }

        if let Some(rest) = line.strip_prefix('+') {
            match rest.trim().parse::<usize>() {
                Ok(index) => match search.results().get(index) {
                    Some(record) => selection.toggle(&Candidate::from(record)),
                    None => println!("no result #{index}"),
                },
                Err(_) => selection.add_custom(rest),
            }
            if let Ok(tags) = emitted.try_recv() {
                print_tags(&tags);
            }
            continue;
        }

        search.submit(&line);

        // First signal marks loading, a later one marks the conclusion.
        while changes.changed().await {
            if !search.is_loading() {
                break;
            }
        }

        for (index, record) in search.results().iter().enumerate() {
            let word = record["word"].as_str().unwrap_or("?");
            println!("  [{index}] {word}");
        }
    }

    search.cancel_pending();
}

fn print_tags(tags: &[tagwire_lib::Tag]) {
    let labels: Vec<&str> = tags.iter().map(|t| t.label.as_str()).collect();
    println!("tags: {labels:?}");
}
