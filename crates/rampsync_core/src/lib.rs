//! Core reconciliation library for rampsync (ramp model, views, curve diffing).

/// Order-preserving removal helpers.
pub mod algo;
/// Configuration loading and defaults.
pub mod config;
/// Shared defaults and environment variable names.
pub mod constants;
/// Curve-editor diff adapter.
pub mod curve;
/// Ramp error types.
pub mod error;
/// In-process stand-in for the remote cook.
pub mod loopback;
/// Ramp data models (points, events, interpolation vocabularies).
pub mod models;
/// Ramp parameter entity.
pub mod parameter;
/// Parameter arena, handles and edit context.
pub mod store;
/// Multi-selection ramp view.
pub mod view;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::Config;
pub use curve::{CurveEdit, CurveEditorAdapter, CurveKey, CurveSource};
pub use error::RampError;
pub use models::event::ModificationEvent;
pub use models::interpolation::{InterpolationKind, UiInterpolation};
pub use models::point::{LinearColor, PointBindings, RampPoint, RampValue, RampValueKind};
pub use parameter::RampParameter;
pub use store::{AssetId, CookMonitor, EditContext, Idle, RampHandle, RampStore};
pub use view::{PointTarget, RampView, ReplicationReport};
