//! Shared constants used across rampsync crates.

/// Instance index carried by points that the engine has not assigned a slot yet.
pub const NO_INSTANCE: i32 = -1;

/// Raw delete index meaning "the last point at call time".
pub const LAST_POINT_INDEX: i32 = -1;

/// Position used as the left neighbour when inserting at the start of a ramp.
pub const RAMP_START_POSITION: f32 = 0.0;
/// Position used as the right neighbour when inserting at the end of a ramp.
pub const RAMP_END_POSITION: f32 = 1.0;

/// Value given to new float ramp points when the caller does not supply one.
pub const DEFAULT_FLOAT_INSERT_VALUE: f32 = 1.0;

/// Environment variable toggling global cooking.
pub const ENV_COOKING_ENABLED: &str = "RAMPSYNC_COOKING_ENABLED";
/// Environment variable setting auto-update for newly created parameters.
pub const ENV_AUTO_UPDATE: &str = "RAMPSYNC_AUTO_UPDATE";
/// Environment variable holding the tracing filter used by binaries.
pub const ENV_LOG_FILTER: &str = "RAMPSYNC_LOG";

/// Default tracing filter for binaries.
pub const DEFAULT_LOG_FILTER: &str = "rampsync=info";
