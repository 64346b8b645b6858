//! Browser assets for the visa directory.
//!
//! The map script and stylesheet are compiled into the binary with
//! `rust-embed`, so the server and the static builder ship the same bytes.
//! Paths are relative to the crate's `assets/` directory and are published
//! under `/assets/` by both.

use std::borrow::Cow;

/// URL prefix assets are served under.
pub const URL_PREFIX: &str = "/assets/";

/// Path of the map script.
pub const MAP_SCRIPT: &str = "map.js";

/// Path of the stylesheet.
pub const STYLESHEET: &str = "styles.css";

#[derive(rust_embed::RustEmbed)]
#[folder = "assets/"]
struct Assets;

/// Get an asset by path.
///
/// Returns the file contents if the asset exists, `None` otherwise.
pub fn get(path: &str) -> Option<Cow<'static, [u8]>> {
    Assets::get(path).map(|f| f.data)
}

/// Iterate all asset paths.
pub fn iter() -> impl Iterator<Item = Cow<'static, str>> {
    Assets::iter()
}

/// Public URL of an asset.
pub fn url(path: &str) -> String {
    format!("{URL_PREFIX}{path}")
}

/// Return the MIME type for the given file path.
pub fn mime_for(path: &str) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_owned()
}
