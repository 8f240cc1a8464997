//! Power-of-two mip pyramids and their asynchronous, generation-checked construction.
//!
//! Level 0 is always the original image, so a pyramid is usable for drawing from the moment an
//! image is loaded. Further levels are appended as they finish; a frame simply renders with
//! whatever prefix is available.

use std::sync::mpsc;
use std::sync::{Arc, Mutex, MutexGuard};

use image::imageops::FilterType;

use crate::foundation::core::Which;
use crate::foundation::error::{WipeviewError, WipeviewResult};
use crate::raster::image::RasterImage;

/// Images with an edge shorter than this get a single-level pyramid.
pub const MIN_PYRAMID_EDGE: u32 = 4;

/// Scales below this threshold step down one mip level.
const LEVEL_STEP_THRESHOLD: f64 = 0.5;

/// Lazy sequence of downsampled levels (level 1, 2, ...) for one image.
///
/// Each step halves both dimensions (floor, minimum 1 px). The sequence ends once either
/// dimension reaches 1 px, and is empty for images smaller than [`MIN_PYRAMID_EDGE`].
pub struct MipLevels {
    current: RasterImage,
    done: bool,
}

/// Start the lazy level sequence for `image`.
pub fn mip_levels(image: &RasterImage) -> MipLevels {
    MipLevels {
        current: image.clone(),
        done: image.width() < MIN_PYRAMID_EDGE || image.height() < MIN_PYRAMID_EDGE,
    }
}

impl Iterator for MipLevels {
    type Item = WipeviewResult<RasterImage>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.current.width() <= 1 || self.current.height() <= 1 {
            self.done = true;
            return None;
        }
        match downsample_half(&self.current) {
            Ok(next) => {
                self.current = next.clone();
                Some(Ok(next))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

fn downsample_half(src: &RasterImage) -> WipeviewResult<RasterImage> {
    let w = (src.width() / 2).max(1);
    let h = (src.height() / 2).max(1);
    let buf = image::RgbaImage::from_raw(src.width(), src.height(), src.data().to_vec())
        .ok_or_else(|| WipeviewError::image("mip source buffer does not match its dimensions"))?;
    // Data stays premultiplied through the filter.
    let out = image::imageops::resize(&buf, w, h, FilterType::Triangle);
    RasterImage::from_premul_rgba8(w, h, out.into_raw())
}

/// Index of the level to draw at `scale` given `level_count` available levels.
///
/// Starting at level 0, while the running scale is below one half and a further level
/// exists, the running scale doubles and the level advances.
pub fn select_level_index(level_count: usize, scale: f64) -> usize {
    let mut running = scale;
    let mut level = 0;
    while running < LEVEL_STEP_THRESHOLD && level + 1 < level_count {
        running *= 2.0;
        level += 1;
    }
    level
}

/// Bilinear smoothing is only used when minifying; zoomed-in views stay pixel-crisp.
pub fn smoothing_for_scale(scale: f64) -> bool {
    scale < 1.0
}

/// Immutable snapshot of an image's pyramid, possibly still missing coarser levels.
#[derive(Clone, Debug)]
pub struct MipPyramid {
    levels: Vec<RasterImage>,
    complete: bool,
}

impl MipPyramid {
    /// Pyramid holding only the original image.
    pub fn single(image: RasterImage) -> Self {
        Self {
            levels: vec![image],
            complete: false,
        }
    }

    /// Build every level synchronously. A failing level truncates the pyramid.
    pub fn build(image: RasterImage) -> Self {
        let mut levels = vec![image.clone()];
        for level in mip_levels(&image) {
            match level {
                Ok(l) => levels.push(l),
                Err(e) => {
                    tracing::warn!(error = %e, levels = levels.len(), "mip build truncated");
                    break;
                }
            }
        }
        Self {
            levels,
            complete: true,
        }
    }

    /// The original image (level 0).
    pub fn base(&self) -> &RasterImage {
        &self.levels[0]
    }

    /// All available levels, finest first.
    pub fn levels(&self) -> &[RasterImage] {
        &self.levels
    }

    /// Number of available levels (at least 1).
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Always `false`: level 0 is present from construction.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// `true` once the build finished (successfully or truncated).
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Level to draw at `scale`; see [`select_level_index`].
    pub fn select_level(&self, scale: f64) -> &RasterImage {
        &self.levels[select_level_index(self.levels.len(), scale)]
    }
}

/// Result of one asynchronous pyramid build.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MipBuildOutcome {
    /// All levels were produced and published.
    Complete {
        /// Total level count including level 0.
        levels: usize,
    },
    /// A level failed; the pyramid stops at the last good level.
    Truncated {
        /// Total level count including level 0.
        levels: usize,
    },
    /// The slot was reloaded or cleared while building; results were discarded.
    Stale,
}

/// Handle on a running pyramid build.
pub struct MipBuild {
    which: Which,
    generation: u64,
    done: mpsc::Receiver<MipBuildOutcome>,
}

impl MipBuild {
    /// Slot the build belongs to.
    pub fn which(&self) -> Which {
        self.which
    }

    /// Generation tag the build publishes under.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Block until the build finishes.
    pub fn wait(self) -> MipBuildOutcome {
        self.done.recv().unwrap_or(MipBuildOutcome::Stale)
    }

    /// Non-blocking check for completion.
    pub fn try_outcome(&self) -> Option<MipBuildOutcome> {
        self.done.try_recv().ok()
    }
}

#[derive(Default)]
struct MipSlot {
    generation: u64,
    levels: Vec<RasterImage>,
    complete: bool,
}

#[derive(Clone)]
enum BuildExec {
    Inline,
    Global,
    Pool(Arc<rayon::ThreadPool>),
}

/// Per-slot pyramid store with generation-counter invalidation.
///
/// Every [`MipCache::load`] or [`MipCache::clear`] bumps the slot's generation. Build tasks
/// check the generation before publishing each level, so a stale build can never overwrite the
/// pyramid of a newer image.
pub struct MipCache {
    slots: [Arc<Mutex<MipSlot>>; 2],
    exec: BuildExec,
}

impl Default for MipCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MipCache {
    /// Cache that builds on rayon's global pool.
    pub fn new() -> Self {
        Self::with_exec(BuildExec::Global)
    }

    /// Cache that builds on a dedicated thread pool.
    pub fn with_pool(pool: Arc<rayon::ThreadPool>) -> Self {
        Self::with_exec(BuildExec::Pool(pool))
    }

    /// Cache that builds synchronously inside [`MipCache::load`].
    pub fn inline() -> Self {
        Self::with_exec(BuildExec::Inline)
    }

    fn with_exec(exec: BuildExec) -> Self {
        Self {
            slots: [
                Arc::new(Mutex::new(MipSlot::default())),
                Arc::new(Mutex::new(MipSlot::default())),
            ],
            exec,
        }
    }

    /// Install `image` in `which`, invalidating any build in flight, and start building its
    /// pyramid. Level 0 is usable immediately.
    pub fn load(&self, which: Which, image: RasterImage) -> MipBuild {
        let slot = Arc::clone(&self.slots[which.index()]);
        let generation = {
            let mut s = lock_slot(&slot);
            s.generation = s.generation.wrapping_add(1);
            s.levels = vec![image.clone()];
            s.complete = false;
            s.generation
        };

        let (tx, rx) = mpsc::channel();
        let task = move || {
            let outcome = run_build(&slot, which, generation, &image);
            let _ = tx.send(outcome);
        };
        match &self.exec {
            BuildExec::Inline => task(),
            BuildExec::Global => rayon::spawn(task),
            BuildExec::Pool(pool) => pool.spawn(task),
        }

        MipBuild {
            which,
            generation,
            done: rx,
        }
    }

    /// Drop the slot's image and invalidate any build in flight.
    pub fn clear(&self, which: Which) {
        let mut s = lock_slot(&self.slots[which.index()]);
        s.generation = s.generation.wrapping_add(1);
        s.levels.clear();
        s.complete = false;
    }

    /// Current generation tag of a slot.
    pub fn generation(&self, which: Which) -> u64 {
        lock_slot(&self.slots[which.index()]).generation
    }

    /// Snapshot of the slot's pyramid as built so far, or `None` when the slot is empty.
    pub fn pyramid(&self, which: Which) -> Option<MipPyramid> {
        let s = lock_slot(&self.slots[which.index()]);
        if s.levels.is_empty() {
            return None;
        }
        Some(MipPyramid {
            levels: s.levels.clone(),
            complete: s.complete,
        })
    }
}

fn lock_slot(slot: &Mutex<MipSlot>) -> MutexGuard<'_, MipSlot> {
    // A panicking build cannot leave the level list half-written; keep using it.
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn run_build(
    slot: &Mutex<MipSlot>,
    which: Which,
    generation: u64,
    image: &RasterImage,
) -> MipBuildOutcome {
    for level in mip_levels(image) {
        let mut s = lock_slot(slot);
        if s.generation != generation {
            tracing::warn!(?which, generation, current = s.generation, "discarding stale mip level");
            return MipBuildOutcome::Stale;
        }
        match level {
            Ok(l) => {
                tracing::debug!(
                    ?which,
                    level = s.levels.len(),
                    width = l.width(),
                    height = l.height(),
                    "mip level ready"
                );
                s.levels.push(l);
            }
            Err(e) => {
                tracing::warn!(?which, error = %e, levels = s.levels.len(), "mip build truncated");
                s.complete = true;
                return MipBuildOutcome::Truncated {
                    levels: s.levels.len(),
                };
            }
        }
    }

    let mut s = lock_slot(slot);
    if s.generation != generation {
        return MipBuildOutcome::Stale;
    }
    s.complete = true;
    MipBuildOutcome::Complete {
        levels: s.levels.len(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/mip.rs"]
mod tests;
