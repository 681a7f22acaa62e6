//! Controller configuration.
//!
//! Both config structs deserialize from the camelCase JSON options object a
//! host configuration panel would produce, and both double as builders for
//! programmatic construction.

use std::time::Duration;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

/// When a [`RemoteSearch`](crate::search::RemoteSearch) issues its fetch
/// relative to the stream of submitted queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    /// Fire immediately when outside the rate window, otherwise coalesce
    /// into a single trailing fetch at the window boundary.
    Throttle,
    /// Wait for a full rate window of idle time after the last submission.
    #[default]
    Debounce,
}

/// Configuration for [`RemoteSearch`](crate::search::RemoteSearch).
///
/// # Example
///
/// ```
/// use tagwire_lib::config::{SearchConfig, Trigger};
///
/// let config: SearchConfig = serde_json::from_str(
///     r#"{
///         "url": "https://api.example.com/search?q={{value}}",
///         "resultsPath": "data.results",
///         "trigger": "throttle",
///         "rate": 250
///     }"#,
/// )
/// .unwrap();
/// assert_eq!(config.trigger, Trigger::Throttle);
/// assert_eq!(config.rate.as_millis(), 250);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchConfig {
    /// Endpoint URL template. Every `{{value}}` occurrence is replaced with
    /// the percent-encoded query.
    pub url: String,
    /// Dot-delimited path to the results array within the response body.
    /// Absent or empty means the body itself is the array.
    #[serde(deserialize_with = "empty_as_none")]
    pub results_path: Option<String>,
    /// When to fire the fetch.
    pub trigger: Trigger,
    /// Rate window in milliseconds.
    #[serde(with = "duration_ms")]
    pub rate: Duration,
    /// Per-request timeout in milliseconds for the default transport.
    #[serde(with = "opt_duration_ms")]
    pub timeout: Option<Duration>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            results_path: None,
            trigger: Trigger::default(),
            rate: Duration::from_millis(500),
            timeout: None,
        }
    }
}

impl SearchConfig {
    /// Creates a config for `url` with default trigger and rate.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Sets the dot-delimited path to the results array.
    ///
    /// An empty path means the response root, same as leaving it unset.
    pub fn results_path(mut self, path: impl Into<String>) -> Self {
        self.results_path = Some(path.into()).filter(|p| !p.is_empty());
        self
    }

    /// Sets the trigger mode.
    pub fn trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = trigger;
        self
    }

    /// Sets the rate window.
    pub fn rate(mut self, rate: Duration) -> Self {
        self.rate = rate;
        self
    }

    /// Sets the per-request timeout for the default transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Configuration for [`TagSelection`](crate::selection::TagSelection).
///
/// Both paths are dot-delimited and walk into candidate records. An empty
/// string deserializes to absent, matching hosts that persist cleared text
/// fields as `""`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SelectionConfig {
    /// Path to the display text within a candidate record.
    #[serde(deserialize_with = "empty_as_none")]
    pub text_path: Option<String>,
    /// Path to the stored value. Falls back to `text_path` when absent.
    #[serde(deserialize_with = "empty_as_none")]
    pub value_path: Option<String>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            text_path: Some("name".to_string()),
            value_path: None,
        }
    }
}

impl SelectionConfig {
    /// Creates the default config (`text_path` of `name`, no `value_path`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the path to the display text.
    ///
    /// An empty path is treated as absent.
    pub fn text_path(mut self, path: impl Into<String>) -> Self {
        self.text_path = Some(path.into()).filter(|p| !p.is_empty());
        self
    }

    /// Sets the path to the stored value.
    ///
    /// An empty path is treated as absent.
    pub fn value_path(mut self, path: impl Into<String>) -> Self {
        self.value_path = Some(path.into()).filter(|p| !p.is_empty());
        self
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

mod duration_ms {
    use std::time::Duration;

    use serde::Deserialize;
    use serde::Deserializer;
    use serde::Serializer;

    pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let ms = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(ms))
    }
}

mod opt_duration_ms {
    use std::time::Duration;

    use serde::Deserialize;
    use serde::Deserializer;
    use serde::Serializer;

    pub fn serialize<S>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(duration) => serializer.serialize_some(&(duration.as_millis() as u64)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let ms = Option::<u64>::deserialize(deserializer)?;
        Ok(ms.map(Duration::from_millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_config_defaults() {
        let config: SearchConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.url, "");
        assert_eq!(config.results_path, None);
        assert_eq!(config.trigger, Trigger::Debounce);
        assert_eq!(config.rate, Duration::from_millis(500));
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn test_search_config_full_options() {
        let config: SearchConfig = serde_json::from_str(
            r#"{
                "url": "https://api.example.com/items?q={{value}}",
                "resultsPath": "data.results",
                "trigger": "throttle",
                "rate": 250,
                "timeout": 5000
            }"#,
        )
        .unwrap();
        assert_eq!(config.url, "https://api.example.com/items?q={{value}}");
        assert_eq!(config.results_path.as_deref(), Some("data.results"));
        assert_eq!(config.trigger, Trigger::Throttle);
        assert_eq!(config.rate, Duration::from_millis(250));
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_empty_results_path_means_absent() {
        let config: SearchConfig = serde_json::from_str(r#"{"resultsPath": ""}"#).unwrap();
        assert_eq!(config.results_path, None);
    }

    #[test]
    fn test_setters_treat_empty_paths_as_absent() {
        let search = SearchConfig::new("https://api.example.com/{{value}}").results_path("");
        assert_eq!(search.results_path, None);

        let selection = SelectionConfig::new().text_path("").value_path("");
        assert_eq!(selection.text_path, None);
        assert_eq!(selection.value_path, None);
    }

    #[test]
    fn test_rate_round_trips_as_milliseconds() {
        let config = SearchConfig::new("https://api.example.com/{{value}}")
            .rate(Duration::from_millis(750));
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["rate"], 750);

        let back: SearchConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back.rate, Duration::from_millis(750));
    }

    #[test]
    fn test_selection_config_defaults() {
        let config: SelectionConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.text_path.as_deref(), Some("name"));
        assert_eq!(config.value_path, None);
    }

    #[test]
    fn test_selection_config_empty_paths_mean_absent() {
        let config: SelectionConfig =
            serde_json::from_str(r#"{"textPath": "", "valuePath": ""}"#).unwrap();
        assert_eq!(config.text_path, None);
        assert_eq!(config.value_path, None);
    }

    #[test]
    fn test_selection_config_builder() {
        let config = SelectionConfig::new().text_path("title").value_path("id");
        assert_eq!(config.text_path.as_deref(), Some("title"));
        assert_eq!(config.value_path.as_deref(), Some("id"));
    }
}
