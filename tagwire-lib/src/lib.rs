//! Remote-search tag selection library
//!
//! Building blocks for tag-style multi-select inputs backed by a remote
//! search API: a throttled/debounced [`RemoteSearch`] controller that turns
//! raw keystrokes into rate-limited fetches, and a [`TagSelection`]
//! controller that canonicalizes heterogeneous candidates into
//! `{value, label}` tags and keeps the selection synced with an external
//! JSON representation.
//!
//! The two controllers are independent: wire them together through their
//! channels, or use either on its own. Both are cheap-to-clone handles over
//! shared state, safe to hand to spawned tasks.

pub mod client;
pub mod config;
pub mod error;
pub mod notify;
pub mod path;
pub mod search;
pub mod selection;
pub mod transport;

pub use client::QUERY_PLACEHOLDER;
pub use client::SearchClient;
pub use config::SearchConfig;
pub use config::SelectionConfig;
pub use config::Trigger;
pub use error::SearchError;
pub use notify::ChangeListener;
pub use notify::ChangeNotifier;
pub use notify::change_channel;
pub use search::RemoteSearch;
pub use search::RemoteSearchBuilder;
pub use selection::Candidate;
pub use selection::SelectionReceiver;
pub use selection::SelectionSender;
pub use selection::Tag;
pub use selection::TagSelection;
pub use selection::selection_channel;
pub use transport::HttpTransport;
pub use transport::Transport;
pub use transport::TransportResponse;
