// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image session — owns the loaded image (current + pristine original) and
// runs load, save, reset and transforms against it.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use bildwerk_core::error::{BildwerkError, Result};
use bildwerk_core::BildwerkConfig;
use tracing::{debug, info, instrument, warn};

use crate::buffer::PixelBuffer;
use crate::store::codec;
use crate::transform::Transform;
use crate::transform::recipe::Recipe;

/// A loaded image: the working buffer and the snapshot taken at load time.
#[derive(Debug, Clone)]
pub struct ImageState {
    source: PathBuf,
    /// Never mutated after construction.
    original: PixelBuffer,
    current: PixelBuffer,
}

impl ImageState {
    fn new(source: PathBuf, buffer: PixelBuffer) -> Self {
        Self {
            source,
            original: buffer.clone(),
            current: buffer,
        }
    }

    pub fn current(&self) -> &PixelBuffer {
        &self.current
    }

    pub fn original(&self) -> &PixelBuffer {
        &self.original
    }

    /// Path the image was loaded from.
    pub fn source_path(&self) -> &Path {
        &self.source
    }

    /// Whether any transform has changed the working buffer.
    pub fn is_modified(&self) -> bool {
        self.current != self.original
    }
}

/// Image store for one editing session.
///
/// Starts unloaded. A successful `load` moves it to loaded; after that every
/// transform and `reset` keep it loaded, and only `clear` unloads it again.
/// `save`, `reset` and transforms on an unloaded session fail with
/// `BildwerkError::NotLoaded`.
///
/// Every mutating call commits atomically: on error the previous buffers are
/// left exactly as they were.
///
/// ```ignore
/// let mut session = ImageSession::new(BildwerkConfig::default());
/// session.load("photo.jpg")?;
/// session.grayscale()?;
/// session.blur(5)?;
/// session.save("photo-soft.png")?;
/// session.reset()?;
/// ```
#[derive(Debug, Default)]
pub struct ImageSession {
    config: BildwerkConfig,
    state: Option<ImageState>,
}

impl ImageSession {
    // -- Construction ---------------------------------------------------------

    pub fn new(config: BildwerkConfig) -> Self {
        Self {
            config,
            state: None,
        }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn config(&self) -> &BildwerkConfig {
        &self.config
    }

    pub fn is_loaded(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> Option<&ImageState> {
        self.state.as_ref()
    }

    /// The working buffer, for display.
    pub fn current(&self) -> Result<&PixelBuffer> {
        self.loaded().map(ImageState::current)
    }

    /// The buffer as it was at load time.
    pub fn original(&self) -> Result<&PixelBuffer> {
        self.loaded().map(ImageState::original)
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.state.as_ref().map(ImageState::source_path)
    }

    // -- Lifecycle ------------------------------------------------------------

    /// Decode `path` and make it the session's image.
    ///
    /// On failure the previously loaded image, if any, stays in place.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<&ImageState> {
        let path = path.as_ref();
        let buffer = codec::decode_file(path, self.config.load_mode)?;
        info!(
            width = buffer.width(),
            height = buffer.height(),
            channels = buffer.channels(),
            "Image loaded"
        );
        Ok(self.state.insert(ImageState::new(path.to_path_buf(), buffer)))
    }

    /// Encode the working buffer to `path`; the extension picks the format.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let current = self.current()?;
        codec::encode_file(current, path.as_ref(), self.config.jpeg_quality)?;
        info!("Image saved");
        Ok(())
    }

    /// Replace the working buffer with a copy of the original.
    #[instrument(skip(self))]
    pub fn reset(&mut self) -> Result<&PixelBuffer> {
        let state = self.loaded_mut()?;
        state.current = state.original.clone();
        info!("Image reset to original");
        Ok(&state.current)
    }

    /// Drop the loaded image, returning the session to unloaded.
    pub fn clear(&mut self) {
        if self.state.take().is_some() {
            debug!("Session cleared");
        }
    }

    // -- Transforms -----------------------------------------------------------

    /// Apply one transform to the working buffer.
    #[instrument(skip(self), fields(op = transform.name()))]
    pub fn apply(&mut self, transform: Transform) -> Result<&PixelBuffer> {
        let state = self.loaded_mut()?;
        let next = transform.apply(&state.current)?;
        info!(
            %transform,
            channels = next.channels(),
            "Transform applied"
        );
        state.current = next;
        Ok(&state.current)
    }

    /// Apply every step of `recipe`; nothing is committed unless all succeed.
    #[instrument(skip_all, fields(steps = recipe.steps.len()))]
    pub fn apply_recipe(&mut self, recipe: &Recipe) -> Result<&PixelBuffer> {
        let state = self.loaded_mut()?;
        if recipe.is_empty() {
            debug!("Empty recipe; nothing to apply");
            return Ok(&state.current);
        }
        let next = recipe.apply(&state.current)?;
        info!("Recipe applied");
        state.current = next;
        Ok(&state.current)
    }

    pub fn grayscale(&mut self) -> Result<&PixelBuffer> {
        self.apply(Transform::Grayscale)
    }

    /// Gaussian blur with an odd `kernel_size` and the configured sigma.
    pub fn blur(&mut self, kernel_size: u32) -> Result<&PixelBuffer> {
        let sigma = self.config.blur_sigma;
        self.apply(Transform::Blur { kernel_size, sigma })
    }

    pub fn edge_detect(&mut self, low: f32, high: f32) -> Result<&PixelBuffer> {
        self.apply(Transform::EdgeDetect { low, high })
    }

    pub fn adjust_brightness(&mut self, factor: f32) -> Result<&PixelBuffer> {
        self.apply(Transform::Brightness { factor })
    }

    pub fn adjust_contrast(&mut self, factor: f32) -> Result<&PixelBuffer> {
        self.apply(Transform::Contrast { factor })
    }

    /// Brightness then contrast as a single step.
    pub fn apply_adjustments(&mut self, brightness: f32, contrast: f32) -> Result<&PixelBuffer> {
        self.apply_recipe(&Recipe::new(vec![
            Transform::Brightness { factor: brightness },
            Transform::Contrast { factor: contrast },
        ]))
    }

    // -- Helpers --------------------------------------------------------------

    fn loaded(&self) -> Result<&ImageState> {
        self.state.as_ref().ok_or(BildwerkError::NotLoaded)
    }

    fn loaded_mut(&mut self) -> Result<&mut ImageState> {
        match self.state.as_mut() {
            Some(state) => Ok(state),
            None => {
                warn!("Operation requires a loaded image");
                Err(BildwerkError::NotLoaded)
            }
        }
    }
}

/// An `ImageSession` behind a single lock, for hosts that call in from more
/// than one thread. Each closure passed to `with` runs as one exclusive
/// load/transform/save sequence.
#[derive(Debug, Clone, Default)]
pub struct SharedSession {
    inner: Arc<Mutex<ImageSession>>,
}

impl SharedSession {
    pub fn new(session: ImageSession) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Run `f` with exclusive access to the session.
    ///
    /// A poisoned lock is recovered: operations only replace the buffers
    /// after they succeed, so the session is consistent even if a caller
    /// panicked mid-sequence.
    pub fn with<R>(&self, f: impl FnOnce(&mut ImageSession) -> R) -> R {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Copy of the working buffer, for rendering outside the lock.
    pub fn snapshot(&self) -> Result<PixelBuffer> {
        self.with(|session| session.current().cloned())
    }
}
