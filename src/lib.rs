// Library root
// -----------
// This crate exposes the library surface shared by the two binaries:
// `jobbot` (search / apply / stats / config) and `jobbot-monitor` (watch
// criteria and background monitor control).
//
// Module responsibilities:
// - `api`: blocking HTTP client for the backend, behind the `JobService`
//   and `MonitorService` traits.
// - `models`: request/response shapes exchanged with the backend.
// - `error`: typed client errors (unreachable, bad status, ...).
// - `config`: the per-user configuration file.
// - `session`: the cached last search result set used by apply.
// - `ui`: the output sink, terminal rendering and interactive prompts.
// - `jobs` / `monitor`: one method per command.
// - `cli` / `context`: argument parsing and startup preflight.
pub mod api;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod jobs;
pub mod models;
pub mod monitor;
pub mod session;
pub mod ui;
