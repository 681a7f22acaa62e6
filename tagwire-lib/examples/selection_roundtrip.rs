//! Selection walkthrough without any network.
//!
//! Run with: `cargo run --example selection_roundtrip`
//!
//! Shows how API-shaped records and free-typed text canonicalize into tags,
//! and how the selection round-trips through its serialized form.

use serde_json::json;

use tagwire_lib::SelectionConfig;
use tagwire_lib::TagSelection;
use tagwire_lib::selection_channel;

fn main() {
    let (emit, mut emitted) = selection_channel();
    let config = SelectionConfig::new().text_path("name").value_path("id");
    let selection = TagSelection::new(config.clone(), emit);

    // Records as a search API would return them.
    selection.toggle(&json!({"id": 1, "name": "Cat", "kind": "mammal"}).into());
    selection.toggle(&json!({"id": 2, "name": "Cormorant", "kind": "bird"}).into());
    selection.add_custom("hand-typed");

    // Same id, different label: still the same entry, so this deselects.
    selection.toggle(&json!({"id": 1, "name": "Felis catus"}).into());

    while let Ok(tags) = emitted.try_recv() {
        let labels: Vec<&str> = tags.iter().map(|t| t.label.as_str()).collect();
        println!("emitted: {labels:?}");
    }

    // What the host would persist, and what a fresh controller makes of it.
    let stored = serde_json::to_value(selection.items()).unwrap_or_default();
    println!("stored:  {stored}");

    let (emit, _emitted) = selection_channel();
    let restored = TagSelection::with_value(config, &stored, emit);
    println!(
        "restored {} tags, first label {:?}",
        restored.len(),
        restored.items().first().map(|t| t.label.clone())
    );
}
