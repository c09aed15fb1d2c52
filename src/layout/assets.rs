// SPDX-License-Identifier: GPL-3.0-only

//! Bundled layout and icon assets.
//!
//! The default layout payload and the key icons are compiled into the crate
//! so a host can start the keyboard without shipping extra files.

use rust_embed::RustEmbed;
use std::borrow::Cow;

/// File name of the bundled default layout.
pub const DEFAULT_LAYOUT_FILE: &str = "default.json";

#[derive(RustEmbed)]
#[folder = "resources/layouts/"]
struct LayoutAssets;

#[derive(RustEmbed)]
#[folder = "resources/icons/"]
struct IconAssets;

/// Returns the JSON text of a bundled layout.
pub fn layout_json(file_name: &str) -> Option<Cow<'static, str>> {
    LayoutAssets::get(file_name).and_then(|file| utf8(file.data))
}

/// Returns the SVG source of the named icon (e.g. `"backspace"`).
pub fn icon_svg(name: &str) -> Option<Cow<'static, str>> {
    IconAssets::get(&format!("{name}.svg")).and_then(|file| utf8(file.data))
}

/// Returns true if an icon with this name is bundled.
pub fn has_icon(name: &str) -> bool {
    IconAssets::get(&format!("{name}.svg")).is_some()
}

fn utf8(data: Cow<'static, [u8]>) -> Option<Cow<'static, str>> {
    match data {
        Cow::Borrowed(bytes) => std::str::from_utf8(bytes).ok().map(Cow::Borrowed),
        Cow::Owned(bytes) => String::from_utf8(bytes).ok().map(Cow::Owned),
    }
}
