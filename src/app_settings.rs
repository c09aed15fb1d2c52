// SPDX-License-Identifier: GPL-3.0-only

//! Centralized keyboard settings and constants.

/// Delay before a held key triggers its long-press behavior, in milliseconds.
pub const LONG_PRESS_DELAY_MS: u64 = 1000;

/// Period of the backspace repeat once long press kicked in, in milliseconds.
pub const BACKSPACE_REPEAT_INTERVAL_MS: u64 = 200;

/// Class name set on a key while it is held.
pub const PRESSED_CLASS: &str = "pressed";

/// Class name set on keys that cannot be used.
pub const DISABLED_CLASS: &str = "disabled";

/// Text inserted by the enter key in multi-line fields.
pub const LINE_BREAK: &str = "\n";

/// Text inserted by the space bar.
pub const SPACE: &str = " ";

/// Default tracing directive installed by `init_logging`.
pub const LOG_DIRECTIVE: &str = "wpe_keyboard=info";
