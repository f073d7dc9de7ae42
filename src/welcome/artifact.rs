use std::path::{Path, PathBuf};

use rand::Rng;

use crate::config::WelcomeConfig;
use crate::encode::sink::FrameSink;
use crate::foundation::error::TypebannerResult;
use crate::render::frame::FrameRenderer;
use crate::sequence::assembler::{AssembleOpts, AssemblyReport, assemble_into, assemble_with};

/// Banner line typed for `display_name`.
pub fn welcome_text(display_name: &str) -> String {
    format!("Welcome {display_name}!")
}

/// Anything that can produce a welcome video for a member.
///
/// Generation is blocking and CPU-bound; async callers run it on a blocking worker.
pub trait ArtifactGenerator: Send + Sync {
    /// Write the greeting video for `display_name` to `output_path` and return that path.
    fn generate(&self, display_name: &str, output_path: &Path) -> TypebannerResult<PathBuf>;
}

/// Welcome video generator backed by a long-lived [`FrameRenderer`].
pub struct WelcomeArtifacts {
    renderer: FrameRenderer,
    background: Option<PathBuf>,
    config: WelcomeConfig,
}

impl WelcomeArtifacts {
    /// Generator for `config`; fonts are loaded once here.
    pub fn new(config: WelcomeConfig) -> Self {
        Self {
            renderer: FrameRenderer::with_font_dirs(&config.font_dirs),
            background: Some(config.background.clone()),
            config,
        }
    }

    /// Replace the configured background; `None` renders on the flat fill.
    pub fn with_background(mut self, background: Option<PathBuf>) -> Self {
        self.background = background;
        self
    }

    /// Configuration in use.
    pub fn config(&self) -> &WelcomeConfig {
        &self.config
    }

    fn opts_with<R: Rng + ?Sized>(&self, rng: &mut R, display_name: &str) -> AssembleOpts {
        let color = self.config.pick_color(rng);
        tracing::debug!(name = display_name, %color, "generating welcome video");
        let mut opts = self.config.assemble_opts(color);
        opts.background = self.background.clone();
        opts
    }

    /// Stream the greeting frames for `display_name` into `sink`, accent color drawn from `rng`.
    pub fn render_into<R, K>(
        &self,
        rng: &mut R,
        display_name: &str,
        sink: &mut K,
    ) -> TypebannerResult<AssemblyReport>
    where
        R: Rng + ?Sized,
        K: FrameSink + ?Sized,
    {
        let opts = self.opts_with(rng, display_name);
        let report = assemble_into(&self.renderer, &welcome_text(display_name), &opts, sink)?;
        warn_on_skips(&report, display_name);
        Ok(report)
    }

    /// Generate with the accent color drawn from `rng`.
    pub fn generate_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        display_name: &str,
        output_path: &Path,
    ) -> TypebannerResult<PathBuf> {
        let opts = self.opts_with(rng, display_name);
        let (path, report) =
            assemble_with(&self.renderer, &welcome_text(display_name), output_path, &opts)?;
        warn_on_skips(&report, display_name);
        Ok(path)
    }
}

fn warn_on_skips(report: &AssemblyReport, display_name: &str) {
    if !report.skipped.is_empty() {
        tracing::warn!(
            skipped = report.skipped.len(),
            name = display_name,
            "welcome video has skipped frames"
        );
    }
}

impl ArtifactGenerator for WelcomeArtifacts {
    fn generate(&self, display_name: &str, output_path: &Path) -> TypebannerResult<PathBuf> {
        self.generate_with(&mut rand::thread_rng(), display_name, output_path)
    }
}

/// Render the welcome video for `display_name` to `output_path` (6 fps, 30 hold frames, random
/// palette color).
pub fn generate_welcome_artifact(
    display_name: &str,
    output_path: &Path,
    background_ref: Option<&Path>,
) -> TypebannerResult<PathBuf> {
    generate_welcome_artifact_with(
        &mut rand::thread_rng(),
        display_name,
        output_path,
        background_ref,
    )
}

/// [`generate_welcome_artifact`] with the color drawn from `rng`.
pub fn generate_welcome_artifact_with<R: Rng + ?Sized>(
    rng: &mut R,
    display_name: &str,
    output_path: &Path,
    background_ref: Option<&Path>,
) -> TypebannerResult<PathBuf> {
    WelcomeArtifacts::new(WelcomeConfig::default())
        .with_background(background_ref.map(Path::to_path_buf))
        .generate_with(rng, display_name, output_path)
}

#[cfg(test)]
#[path = "../../tests/unit/welcome/artifact.rs"]
mod tests;
