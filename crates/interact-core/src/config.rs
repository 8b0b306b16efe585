#![forbid(unsafe_code)]

//! Engine configuration and platform detection.
//!
//! # Example
//!
//! ```
//! use interact_core::config::{InteractConfig, Platform};
//! use web_time::Duration;
//!
//! let config = InteractConfig::default()
//!     .with_debug(true)
//!     .with_platform(Platform::Mac)
//!     .with_collapse_delay(Duration::from_millis(10)) // too short
//!     .validated();
//!
//! assert_eq!(config.collapse_delay.as_millis(), 50);
//! ```

use web_time::Duration;

use crate::event::Modifiers;

/// Default delay before a click on a marked node collapses the selection.
pub const DEFAULT_COLLAPSE_DELAY_MS: u64 = 600;
/// Lower clamp for the collapse delay.
pub const MIN_COLLAPSE_DELAY_MS: u64 = 50;
/// Upper clamp for the collapse delay.
pub const MAX_COLLAPSE_DELAY_MS: u64 = 5000;

/// Substring of a user-agent string that identifies macOS.
const MAC_USER_AGENT_MARKER: &str = "Mac OS X";

/// Host platform, which decides the command modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Platform {
    /// macOS: command is Meta/Super.
    Mac,
    /// Everything else: command is Ctrl.
    #[default]
    Other,
}

impl Platform {
    /// Platform of the compile target.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(target_os = "macos") {
            Self::Mac
        } else {
            Self::Other
        }
    }

    /// Detect the platform from a browser user-agent string.
    #[must_use]
    pub fn from_user_agent(user_agent: &str) -> Self {
        if user_agent.contains(MAC_USER_AGENT_MARKER) {
            Self::Mac
        } else {
            Self::Other
        }
    }

    /// The modifier that toggles marking on this platform.
    #[must_use]
    pub const fn command_modifier(self) -> Modifiers {
        match self {
            Self::Mac => Modifiers::SUPER,
            Self::Other => Modifiers::CTRL,
        }
    }

    /// Whether `modifiers` holds this platform's command modifier.
    #[must_use]
    pub fn is_command(self, modifiers: Modifiers) -> bool {
        modifiers.contains(self.command_modifier())
    }
}

/// Configuration for one [`Interact`](crate::Interact) instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InteractConfig {
    /// Emit `debug`-level events for every handled operation.
    /// Default: false.
    pub debug: bool,

    /// Delay before a click on a marked node collapses the selection to it.
    /// Default: 600ms.
    pub collapse_delay: Duration,

    /// Platform used to pick the command modifier.
    /// Default: the compile target.
    pub platform: Platform,
}

impl Default for InteractConfig {
    fn default() -> Self {
        Self {
            debug: false,
            collapse_delay: Duration::from_millis(DEFAULT_COLLAPSE_DELAY_MS),
            platform: Platform::current(),
        }
    }
}

impl InteractConfig {
    /// Toggle debug logging.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set the collapse delay.
    #[must_use]
    pub fn with_collapse_delay(mut self, delay: Duration) -> Self {
        self.collapse_delay = delay;
        self
    }

    /// Set the platform.
    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Load config from environment variables.
    ///
    /// Reads:
    /// - `INTERACT_DEBUG`: "1" or "true" enables debug logging
    /// - `INTERACT_COLLAPSE_DELAY_MS`: collapse delay in milliseconds
    /// - `INTERACT_PLATFORM`: "mac" or "other"
    ///
    /// Values are clamped with [`InteractConfig::validated`].
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("INTERACT_DEBUG") {
            config.debug = val == "1" || val.eq_ignore_ascii_case("true");
        }

        if let Ok(val) = std::env::var("INTERACT_COLLAPSE_DELAY_MS")
            && let Ok(ms) = val.trim().parse::<u64>()
        {
            config.collapse_delay = Duration::from_millis(ms);
        }

        if let Ok(val) = std::env::var("INTERACT_PLATFORM") {
            match val.trim().to_ascii_lowercase().as_str() {
                "mac" | "macos" => config.platform = Platform::Mac,
                "other" => config.platform = Platform::Other,
                _ => {}
            }
        }

        config.validated()
    }

    /// Clamp `collapse_delay` to 50-5000ms.
    #[must_use]
    pub fn validated(mut self) -> Self {
        let ms = u64::try_from(self.collapse_delay.as_millis()).unwrap_or(u64::MAX);
        self.collapse_delay =
            Duration::from_millis(ms.clamp(MIN_COLLAPSE_DELAY_MS, MAX_COLLAPSE_DELAY_MS));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = InteractConfig::default();
        assert!(!config.debug);
        assert_eq!(config.collapse_delay, Duration::from_millis(600));
        assert_eq!(config.platform, Platform::current());
    }

    #[test]
    fn validated_clamps_both_ends() {
        let low = InteractConfig::default()
            .with_collapse_delay(Duration::ZERO)
            .validated();
        assert_eq!(low.collapse_delay, Duration::from_millis(MIN_COLLAPSE_DELAY_MS));

        let high = InteractConfig::default()
            .with_collapse_delay(Duration::from_secs(3600))
            .validated();
        assert_eq!(high.collapse_delay, Duration::from_millis(MAX_COLLAPSE_DELAY_MS));

        let ok = InteractConfig::default()
            .with_collapse_delay(Duration::from_millis(250))
            .validated();
        assert_eq!(ok.collapse_delay, Duration::from_millis(250));
    }

    #[test]
    fn user_agent_detection() {
        let mac = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";
        let linux = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36";
        assert_eq!(Platform::from_user_agent(mac), Platform::Mac);
        assert_eq!(Platform::from_user_agent(linux), Platform::Other);
    }

    #[test]
    fn command_modifier_per_platform() {
        assert!(Platform::Mac.is_command(Modifiers::SUPER | Modifiers::SHIFT));
        assert!(!Platform::Mac.is_command(Modifiers::CTRL));
        assert!(Platform::Other.is_command(Modifiers::CTRL));
        assert!(!Platform::Other.is_command(Modifiers::SUPER));
        assert!(!Platform::Other.is_command(Modifiers::NONE));
    }
}
