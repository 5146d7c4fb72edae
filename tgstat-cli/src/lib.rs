//! # tgstat-cli
//!
//! The `tgstat` binary: env config, replay of channel dumps, analysis commands and report
//! sinks.
//!
//! ## Modules
//!
//! - [`cli`] – clap parser; flags to AcquisitionWindow and AnalysisQuery
//! - [`config`] – AppConfig from env
//! - [`replay`] – ReplayArchive (MessageSource + ChannelResolver over a JSON dump)
//! - [`export`] – JsonExporter, TerminalReport
//! - [`app`] – analyze / channels handlers

pub mod app;
pub mod cli;
pub mod config;
pub mod export;
pub mod replay;

pub use app::{emit_reports, run_analyze, run_channels, Analysis};
pub use cli::{AnalyzeArgs, Cli, Commands, ExportFormat};
pub use config::AppConfig;
pub use export::{JsonExporter, TerminalReport};
pub use replay::{ChannelDump, DumpChannel, ReplayArchive};
