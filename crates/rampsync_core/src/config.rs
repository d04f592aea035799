//! Configuration loading from environment variables.

use crate::constants::{DEFAULT_LOG_FILTER, ENV_AUTO_UPDATE, ENV_COOKING_ENABLED, ENV_LOG_FILTER};
use crate::store::EditContext;
use serde::Deserialize;
use std::env;

/// Runtime configuration for rampsync.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Snapshot of the process-wide cooking switch.
    pub cooking_enabled: bool,
    /// Auto-update mode given to newly created parameters.
    pub auto_update: bool,
    /// Tracing filter installed by binaries.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cooking_enabled: true,
            auto_update: true,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

/// Boolean spellings accepted by the rampsync switches, case-insensitively.
const TRUTHY: [&str; 4] = ["1", "true", "yes", "on"];
const FALSY: [&str; 5] = ["", "0", "false", "no", "off"];

fn flag_value(raw: &str) -> Option<bool> {
    let raw = raw.trim();
    if TRUTHY.iter().any(|word| word.eq_ignore_ascii_case(raw)) {
        Some(true)
    } else if FALSY.iter().any(|word| word.eq_ignore_ascii_case(raw)) {
        Some(false)
    } else {
        None
    }
}

/// Read a rampsync switch from the environment.
///
/// A missing variable yields `default`. So does a value that is not a
/// recognised boolean spelling, which is logged at `warn` level.
pub fn env_flag_or(name: &str, default: bool) -> bool {
    let Ok(raw) = env::var(name) else {
        return default;
    };
    flag_value(&raw).unwrap_or_else(|| {
        tracing::warn!(
            variable = name,
            value = raw.as_str(),
            default,
            "Ignoring unrecognised rampsync switch value"
        );
        default
    })
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cooking_enabled: env_flag_or(ENV_COOKING_ENABLED, defaults.cooking_enabled),
            auto_update: env_flag_or(ENV_AUTO_UPDATE, defaults.auto_update),
            log_filter: env::var(ENV_LOG_FILTER)
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or(defaults.log_filter),
        }
    }

    /// Edit context for a caller that has no cook monitor of its own.
    pub fn edit_context(&self) -> EditContext<'static> {
        EditContext::new(self.cooking_enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{env_lock, EnvGuard};

    const SWITCH: &str = "RAMPSYNC_TEST_SWITCH";

    #[test]
    fn switches_fall_back_to_the_default_when_missing_or_unrecognised() {
        let _lock = env_lock().lock().expect("env lock");
        {
            let _unset = EnvGuard::remove(SWITCH);
            assert!(env_flag_or(SWITCH, true));
            assert!(!env_flag_or(SWITCH, false));
        }
        let _garbage = EnvGuard::set(SWITCH, "sometimes");
        assert!(env_flag_or(SWITCH, true));
        assert!(!env_flag_or(SWITCH, false));
    }

    #[test]
    fn switches_read_both_spellings_against_the_default() {
        let _lock = env_lock().lock().expect("env lock");
        for (raw, expected) in [(" ON ", true), ("Yes", true), ("off", false), ("", false)] {
            let _guard = EnvGuard::set(SWITCH, raw);
            assert_eq!(env_flag_or(SWITCH, !expected), expected, "value: {:?}", raw);
        }
    }

    #[test]
    fn from_env_uses_defaults_when_unset() {
        let _lock = env_lock().lock().expect("env lock");
        let _cooking = EnvGuard::remove(ENV_COOKING_ENABLED);
        let _auto = EnvGuard::remove(ENV_AUTO_UPDATE);
        let _log = EnvGuard::remove(ENV_LOG_FILTER);

        assert_eq!(Config::from_env(), Config::default());
    }

    #[test]
    fn from_env_reads_overrides_and_ignores_garbage_flags() {
        let _lock = env_lock().lock().expect("env lock");
        let _cooking = EnvGuard::set(ENV_COOKING_ENABLED, "off");
        let _auto = EnvGuard::set(ENV_AUTO_UPDATE, "sometimes");
        let _log = EnvGuard::set(ENV_LOG_FILTER, " rampsync=trace ");

        let config = Config::from_env();
        assert!(!config.cooking_enabled);
        assert!(config.auto_update, "garbage must fall back to the default");
        assert_eq!(config.log_filter, "rampsync=trace");
        assert!(!config.edit_context().cooking_enabled());
    }
}
