// Library root
// -----------
// This crate exposes a small library surface for the `vapor` binary.
//
// Module responsibilities:
// - `api`: blocking HTTP calls to the Vapor Cloud API (signup, login,
//   profile, SSH keys) and the wire types they exchange.
// - `resource`: project detection and path derivation for scaffolded
//   model/migration/controller files.
// - `cli`: the clap command tree.
// - `ui`: prompts, spinners and printing; delegates to `api` and `resource`.
// - `error`: the error type shared by `api` and `resource`.
pub mod api;
pub mod cli;
pub mod error;
pub mod resource;
pub mod ui;

pub use error::{Result, ToolboxError};
