// THEORY:
// This file is the main entry point for the `derma_vision` library crate.
//
// The library classifies images by sampling pixels: every Nth pixel of an RGBA
// buffer is tested against hand-tuned color rules, the results are reduced to
// aggregate ratios and means, and fixed-weight formulas turn those aggregates into
// either an upload decision (does this photo show hair and scalp?) or four cosmetic
// skin metrics for a live camera session.
//
// The public surface is layered:
// - `pipeline`: `ScalpValidator`, `SkinAnalyzer` and batch validation, the entry
//   points most callers want.
// - `live_session`: the fixed-cadence driver for a camera feed.
// - `core_modules`: the pure building blocks, for callers that already hold pixels.

pub mod config;
pub mod core_modules;
pub mod error;
pub mod live_session;
pub mod pipeline;

pub use config::{CosmeticConfig, GateConfig, LiveConfig, VisionConfig};
pub use core_modules::aggregator::AggregateStats;
pub use core_modules::cosmetic_scorer::SkinMetrics;
pub use core_modules::skin_report::SessionReport;
pub use core_modules::validity_gate::{GateResult, RejectionReason};
pub use error::{Result, VisionError};
pub use live_session::{LiveFrame, LiveSession, LiveSessionHandle, SessionUpdate};
pub use pipeline::{BoundingBox, ScalpValidator, SkinAnalyzer, validate_paths};
