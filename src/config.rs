// Session configuration: entered once at startup (see `ui::collect_config`)
// and read-only for the rest of the process.

use std::fmt;

/// Label used for the answer banner when no display name was given.
pub const DEFAULT_LABEL: &str = "AI";

/// Everything needed to ask the completion endpoint about a screenshot.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub prompt_prefix: String,
    pub api_key: String,
    /// Full completions endpoint, path included. It is POSTed to as-is.
    pub base_url: String,
    pub model: String,
    pub display_name: String,
}

impl Config {
    /// Build a config from raw terminal answers. Every field is trimmed.
    pub fn new(
        prompt_prefix: &str,
        api_key: &str,
        base_url: &str,
        model: &str,
        display_name: &str,
    ) -> Self {
        Config {
            prompt_prefix: prompt_prefix.trim().to_string(),
            api_key: api_key.trim().to_string(),
            base_url: base_url.trim().to_string(),
            model: model.trim().to_string(),
            display_name: display_name.trim().to_string(),
        }
    }

    /// Name shown in the answer banner and progress messages.
    pub fn label(&self) -> &str {
        if self.display_name.is_empty() {
            DEFAULT_LABEL
        } else {
            &self.display_name
        }
    }
}

// The API key must never reach logs, so Debug is written by hand.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("prompt_prefix", &self.prompt_prefix)
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("display_name", &self.display_name)
            .finish()
    }
}
