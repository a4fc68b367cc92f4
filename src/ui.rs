// UI layer: terminal prompts built on `dialoguer`. Collects the session
// configuration once and reads commands for the session loop.

use crate::config::Config;
use crate::session::Console;
use anyhow::{Context, Result};
use dialoguer::{Input, Password};
use reqwest::Url;

const COMMAND_PROMPT: &str = "Type 'screenshot' to capture a screenshot or 'stop' to exit";

/// Ask for prompt prefix, API key, endpoint URL, model and display name.
pub fn collect_config() -> Result<Config> {
    let prompt_prefix: String = Input::new()
        .with_prompt("Enter the prompt prefix (e.g., 'describe this image')")
        .interact_text()
        .context("Reading prompt prefix")?;
    // `Password` keeps the key off the screen.
    let api_key: String = Password::new()
        .with_prompt("Enter your API key")
        .interact()
        .context("Reading API key")?;
    let base_url: String = Input::new()
        .with_prompt(
            "Enter the full URL of the AI chat completions endpoint \
             (e.g., https://generativelanguage.googleapis.com/v1beta/openai/chat/completions)",
        )
        .validate_with(|s: &String| validate_endpoint(s))
        .interact_text()
        .context("Reading endpoint URL")?;
    let model: String = Input::new()
        .with_prompt("Enter the image AI model name you want to use")
        .interact_text()
        .context("Reading model name")?;
    let display_name: String = Input::new()
        .with_prompt("Enter the AI name (optional, for display purposes)")
        .allow_empty(true)
        .interact_text()
        .context("Reading display name")?;

    let config = Config::new(&prompt_prefix, &api_key, &base_url, &model, &display_name);
    log::info!("Configured: {:?}", config);
    Ok(config)
}

/// Syntax check only; the endpoint is not contacted until the first run.
pub fn validate_endpoint(input: &str) -> Result<(), String> {
    let url = Url::parse(input.trim()).map_err(|e| format!("Not a valid URL: {e}"))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("Unsupported scheme '{other}', use http or https")),
    }
}

/// Reads commands from the terminal.
pub struct TerminalConsole;

impl Console for TerminalConsole {
    fn read_command(&mut self) -> Result<String> {
        let cmd: String = Input::new()
            .with_prompt(COMMAND_PROMPT)
            .allow_empty(true)
            .interact_text()
            .context("Reading command")?;
        Ok(cmd)
    }
}
