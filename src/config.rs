use std::path::{Path, PathBuf};

use anyhow::Context as _;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::assets::color::{AccentColor, pick_accent};
use crate::foundation::core::Fps;
use crate::foundation::error::{TypebannerError, TypebannerResult};
use crate::render::layout::DEFAULT_OVERLAY_OPACITY;
use crate::sequence::assembler::AssembleOpts;
use crate::sequence::plan::DEFAULT_HOLD_FRAMES;

/// Largest attachment most chat communities accept without boosts (24 MiB).
pub const DEFAULT_ATTACHMENT_LIMIT_BYTES: u64 = 24 * 1024 * 1024;

/// Welcome-greeting configuration, usually loaded from a JSON file.
///
/// Every field is optional in the file; omitted fields take the defaults below.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WelcomeConfig {
    /// Background image. A missing file is not an error.
    pub background: PathBuf,
    /// Video frame rate.
    pub fps: Fps,
    /// Number of times the completed banner is repeated.
    pub hold_frames: u32,
    /// Fixed accent color; `None` picks one from the palette per greeting.
    pub text_color: Option<AccentColor>,
    /// Opacity of the black overlay drawn over the background image.
    pub overlay_opacity: f32,
    /// Videos larger than this are replaced by a text greeting.
    pub attachment_limit_bytes: u64,
    /// Extra directories searched for fonts.
    pub font_dirs: Vec<PathBuf>,
}

impl Default for WelcomeConfig {
    fn default() -> Self {
        Self {
            background: PathBuf::from("bg.png"),
            fps: Fps::WELCOME,
            hold_frames: DEFAULT_HOLD_FRAMES,
            text_color: None,
            overlay_opacity: DEFAULT_OVERLAY_OPACITY,
            attachment_limit_bytes: DEFAULT_ATTACHMENT_LIMIT_BYTES,
            font_dirs: Vec::new(),
        }
    }
}

impl WelcomeConfig {
    /// Load and validate a JSON config file.
    pub fn from_path(path: &Path) -> TypebannerResult<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&raw)
    }

    /// Parse and validate JSON config text.
    pub fn from_json_str(raw: &str) -> TypebannerResult<Self> {
        let cfg: Self = serde_json::from_str(raw)
            .map_err(|e| TypebannerError::serde(format!("invalid config json: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check value ranges the types cannot express.
    pub fn validate(&self) -> TypebannerResult<()> {
        if !(0.0..=1.0).contains(&self.overlay_opacity) {
            return Err(TypebannerError::validation(format!(
                "overlay_opacity must be within [0, 1], got {}",
                self.overlay_opacity
            )));
        }
        if self.attachment_limit_bytes == 0 {
            return Err(TypebannerError::validation(
                "attachment_limit_bytes must be > 0",
            ));
        }
        Ok(())
    }

    /// `true` when the configured background file exists.
    pub fn background_present(&self) -> bool {
        self.background.is_file()
    }

    /// The configured color, or a palette pick from `rng`.
    pub fn pick_color<R: Rng + ?Sized>(&self, rng: &mut R) -> AccentColor {
        self.text_color.unwrap_or_else(|| pick_accent(rng))
    }

    /// Assembler options for one greeting in `color`.
    pub fn assemble_opts(&self, color: AccentColor) -> AssembleOpts {
        AssembleOpts {
            fps: self.fps,
            hold_frames: self.hold_frames,
            background: Some(self.background.clone()),
            color,
            overlay_opacity: self.overlay_opacity,
            font_dirs: self.font_dirs.clone(),
            verbose: false,
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
