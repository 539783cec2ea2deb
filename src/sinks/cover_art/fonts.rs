use ab_glyph::FontVec;
use anyhow::{anyhow, Context, Result};
use std::path::Path;

/// Name selecting the font compiled into the binary.
pub const BUNDLED: &str = "bundled";

/// Load the cover font based on font name configuration.
///
/// Supports:
/// - "bundled" - DejaVu Serif, compiled into the binary
/// - Path like "./lib/bookman-antiqua.ttf" - loaded from disk
///
/// A font that can't be found or parsed is fatal; there is no fallback.
pub fn load(font_name: &str) -> Result<FontVec> {
    match font_name {
        BUNDLED => load_bundled(),
        _ => load_from_path(Path::new(font_name)),
    }
}

fn load_bundled() -> Result<FontVec> {
    FontVec::try_from_vec(include_bytes!("../../../assets/fonts/DejaVuSerif.ttf").to_vec())
        .map_err(|e| anyhow!("Failed to load bundled DejaVuSerif.ttf: {e}"))
}

fn load_from_path(path: &Path) -> Result<FontVec> {
    if !path.is_file() {
        return Err(anyhow!(
            "Font file not found: {}\nHint: set `cover.font` in binder.toml to \"{BUNDLED}\" or to a .ttf file",
            path.display()
        ));
    }
    let data = std::fs::read(path)
        .with_context(|| format!("Failed to read font file: {}", path.display()))?;
    FontVec::try_from_vec(data)
        .map_err(|e| anyhow!("Failed to parse font file {}: {e}", path.display()))
}
