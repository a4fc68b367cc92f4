// Library root
// -----------
// This crate exposes the pieces of the screen-ask CLI. The binary
// (`main.rs`) wires them together.
//
// Module responsibilities:
// - `config`: the one-time session configuration.
// - `selector`: fullscreen overlay for dragging out a screen region.
// - `capture`: screen grab of the primary monitor, cropped to the region.
// - `encode`: PNG + base64 data URL for the captured image.
// - `api`: the HTTP request to the completion endpoint and answer parsing.
// - `session`: the command loop and the capture-and-ask pipeline.
// - `ui`: terminal prompts for configuration and commands.
pub mod api;
pub mod capture;
pub mod config;
pub mod encode;
pub mod selector;
pub mod session;
pub mod ui;
