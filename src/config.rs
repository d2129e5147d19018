//! # Router Configuration Module
//!
//! Environment variable based configuration for how a [`crate::Router`] turns
//! lookup results into dispatch decisions.
//!
//! ## Environment Variables
//!
//! ### `ROUTETREE_REDIRECT_TRAILING_SLASH`
//!
//! Redirect `/foo/` to `/foo` (or the reverse) when only the other form is
//! registered. Default: `true`
//!
//! ### `ROUTETREE_REDIRECT_FIXED_PATH`
//!
//! When no route matches, retry with a case-insensitive walk and redirect to
//! the registered spelling. Default: `false`
//!
//! ### `ROUTETREE_HANDLE_METHOD_NOT_ALLOWED`
//!
//! Answer `405 Method Not Allowed` with an `Allow` list instead of `404` when
//! the path exists under other methods. Default: `false`
//!
//! Boolean values accept `1/true/yes/on` and `0/false/no/off`
//! (case-insensitive). Anything else keeps the default.
//!
//! ## Usage
//!
//! ```rust
//! use routetree::config::RouterConfig;
//!
//! let config = RouterConfig::from_env();
//! println!("Trailing slash redirects: {}", config.redirect_trailing_slash);
//! ```

use std::env;

pub const ENV_REDIRECT_TRAILING_SLASH: &str = "ROUTETREE_REDIRECT_TRAILING_SLASH";
pub const ENV_REDIRECT_FIXED_PATH: &str = "ROUTETREE_REDIRECT_FIXED_PATH";
pub const ENV_HANDLE_METHOD_NOT_ALLOWED: &str = "ROUTETREE_HANDLE_METHOD_NOT_ALLOWED";

/// Dispatch behavior switches.
///
/// Load this at startup using [`RouterConfig::from_env()`] and attach it with
/// [`crate::RouterBuilder::with_config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouterConfig {
    /// Redirect when the path only differs by a trailing separator (default: true)
    pub redirect_trailing_slash: bool,
    /// Redirect to the case-corrected path when one exists (default: false)
    pub redirect_fixed_path: bool,
    /// Answer 405 instead of 404 when another method matches (default: false)
    pub handle_method_not_allowed: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            redirect_trailing_slash: true,
            redirect_fixed_path: false,
            handle_method_not_allowed: false,
        }
    }
}

impl RouterConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup. Used by
    /// [`RouterConfig::from_env`] and by tests that must not touch the process
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let flag = |key: &str, default: bool| {
            lookup(key)
                .and_then(|val| parse_bool(&val))
                .unwrap_or(default)
        };
        RouterConfig {
            redirect_trailing_slash: flag(
                ENV_REDIRECT_TRAILING_SLASH,
                defaults.redirect_trailing_slash,
            ),
            redirect_fixed_path: flag(ENV_REDIRECT_FIXED_PATH, defaults.redirect_fixed_path),
            handle_method_not_allowed: flag(
                ENV_HANDLE_METHOD_NOT_ALLOWED,
                defaults.handle_method_not_allowed,
            ),
        }
    }
}

fn parse_bool(val: &str) -> Option<bool> {
    match val.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
