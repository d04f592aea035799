//! Ramp data models shared by parameters, views and curve adapters.

/// Queued insert/delete operations awaiting the engine.
pub mod event;
/// Engine and curve-widget interpolation vocabularies.
pub mod interpolation;
/// Ramp points and value domains.
pub mod point;
