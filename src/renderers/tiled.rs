// Copyright @yucwang 2021

use crate::core::ray_batch::{RayBatch, TerminalState};
use crate::core::scene::Scene;
use crate::core::sensor::Sensor;
use crate::emitters::sky_dome::SkyDome;
use crate::integrators::geodesic::GeodesicTracer;
use crate::math::bitmap::Bitmap;
use crate::math::constants::Float;
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Instant;

pub use super::renderer::{Frame, RenderError, RenderStats, Renderer};

/// Splits the film into square tiles and marches each tile as one ray batch
/// on a pool of scoped worker threads.
pub struct TiledRenderer {
    block_size: usize,
    thread_count: Option<usize>,
    show_progress: bool,
    cancel: Option<Arc<AtomicBool>>,
}

struct Tile {
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
    colors: Vec<RGBSpectrum>,
    states: Vec<Option<TerminalState>>,
    steps: u64,
}

impl Default for TiledRenderer {
    fn default() -> Self {
        Self {
            block_size: 32,
            thread_count: None,
            show_progress: true,
            cancel: None,
        }
    }
}

impl TiledRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size.max(1);
        self
    }

    /// Fixed worker count; defaults to the available parallelism.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.thread_count = Some(threads.max(1));
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Setting the flag makes the render stop at the next integration step.
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

impl Renderer for TiledRenderer {
    fn render(&self, scene: &Scene, sky: &SkyDome, width: usize, height: usize, time: Float)
        -> Result<Frame, RenderError> {
        if width == 0 || height == 0 {
            return Ok(Frame::new(Bitmap::new(width, height), Vec::new(), RenderStats::default()));
        }

        let start = Instant::now();
        let camera = scene.camera(width, height);
        let tracer = GeodesicTracer::new(scene, sky, time);

        let block_size = self.block_size.max(1);
        let blocks_x = (width + block_size - 1) / block_size;
        let blocks_y = (height + block_size - 1) / block_size;
        let total_blocks = blocks_x * blocks_y;
        let thread_count = self.thread_count
            .unwrap_or_else(|| thread::available_parallelism().map(|n| n.get()).unwrap_or(1))
            .max(1)
            .min(total_blocks);

        log::info!("rendering {}x{} frame at t = {}: {} tiles on {} threads, {} steps max",
                   width, height, time, total_blocks, thread_count, tracer.max_steps());

        let progress = if self.show_progress {
            ProgressBar::new(total_blocks as u64)
        } else {
            ProgressBar::hidden()
        };
        progress.set_style(
            ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} tiles")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let next_block = AtomicUsize::new(0);
        let cancel: Option<&AtomicBool> = self.cancel.as_deref();
        let camera_ref = &camera;
        let tracer_ref = &tracer;
        let next_block_ref = &next_block;
        let (tx, rx) = mpsc::channel::<Result<Tile, RenderError>>();

        let mut colors = vec![RGBSpectrum::black(); width * height];
        let mut states: Vec<Option<TerminalState>> = vec![None; width * height];
        let mut integration_steps = 0u64;
        let mut failure: Option<RenderError> = None;

        thread::scope(|scope| {
            for _ in 0..thread_count {
                let tx = tx.clone();
                scope.spawn(move || {
                    loop {
                        let block_index = next_block_ref.fetch_add(1, Ordering::Relaxed);
                        if block_index >= total_blocks {
                            break;
                        }

                        let bx = block_index % blocks_x;
                        let by = block_index / blocks_x;
                        let x0 = bx * block_size;
                        let y0 = by * block_size;
                        let x1 = (x0 + block_size).min(width);
                        let y1 = (y0 + block_size).min(height);

                        let rays: Vec<Ray3f> = (y0..y1)
                            .flat_map(|y| (x0..x1).map(move |x| camera_ref.pixel_ray(x, y)))
                            .collect();
                        let mut batch = RayBatch::from_rays(&rays);
                        let result = tracer_ref.trace_batch(&mut batch, cancel).map(|steps| Tile {
                            x0,
                            y0,
                            x1,
                            y1,
                            colors: batch.colors().to_vec(),
                            states: batch.states().to_vec(),
                            steps,
                        });

                        let failed = result.is_err();
                        if tx.send(result).is_err() || failed {
                            break;
                        }
                    }
                });
            }

            drop(tx);
            for message in rx.iter() {
                match message {
                    Ok(tile) => {
                        let tile_width = tile.x1 - tile.x0;
                        for y in tile.y0..tile.y1 {
                            for x in tile.x0..tile.x1 {
                                let local = (x - tile.x0) + tile_width * (y - tile.y0);
                                colors[x + width * y] = tile.colors[local];
                                states[x + width * y] = tile.states[local];
                            }
                        }
                        integration_steps += tile.steps;
                        log::debug!("tile ({}, {})-({}, {}) done, {} steps", tile.x0, tile.y0, tile.x1, tile.y1, tile.steps);
                        progress.inc(1);
                    }
                    Err(err) => {
                        if failure.is_none() {
                            failure = Some(err);
                        }
                    }
                }
            }
        });
        progress.finish_and_clear();

        if let Some(err) = failure {
            log::warn!("render aborted: {}", err);
            return Err(err);
        }

        let missing = states.iter().filter(|s| s.is_none()).count();
        if missing > 0 {
            return Err(RenderError::Incomplete { missing });
        }
        let states: Vec<TerminalState> = states.into_iter().flatten().collect();

        let mut stats = RenderStats { integration_steps, ..RenderStats::default() };
        for state in states.iter() {
            stats.record(*state);
        }

        let mut bitmap = Bitmap::new(width, height);
        bitmap.pixels_mut().copy_from_slice(&colors);

        log::info!("render complete in {:.2} seconds: {} disk, {} horizon, {} sky pixels, {} integration steps",
                   start.elapsed().as_secs_f64(), stats.disk_hits, stats.horizon_hits, stats.sky_hits,
                   stats.integration_steps);

        Ok(Frame::new(bitmap, states, stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::emitter::Emitter;
    use crate::core::scene::SceneConstants;
    use crate::emitters::sky_dome::SkyDomeSettings;

    fn quiet() -> TiledRenderer {
        TiledRenderer::new().with_progress(false)
    }

    fn white_sky() -> SkyDome {
        let mut texture = Bitmap::new(32, 16);
        for c in texture.pixels_mut().iter_mut() {
            *c = RGBSpectrum::white();
        }
        SkyDome::from_bitmap(texture)
    }

    fn pitched_scene() -> Scene {
        let mut constants = SceneConstants::default();
        constants.pitch = 0.2;
        Scene::new(constants).unwrap()
    }

    #[test]
    fn test_reference_scene_small_frame() {
        let scene = Scene::new(SceneConstants::default()).unwrap();
        let sky = SkyDome::new(&SkyDomeSettings::default());
        let frame = quiet().render(&scene, &sky, 4, 3, 0.0).unwrap();

        assert_eq!(frame.states().len(), 12);
        assert_eq!(frame.stats().pixels(), 12);
        for &(x, y) in [(0, 0), (3, 0), (0, 2), (3, 2)].iter() {
            assert_ne!(frame.state(x, y), TerminalState::Horizon);
        }
        for y in 0..3 {
            for x in 0..4 {
                let c = frame.color(x, y);
                if frame.state(x, y) == TerminalState::Sky {
                    assert!(c.is_black() || c == RGBSpectrum::white());
                }
            }
        }
    }

    #[test]
    fn test_corners_show_sky_not_horizon() {
        let scene = Scene::new(SceneConstants::default()).unwrap();
        let sky = white_sky();
        let frame = quiet().render(&scene, &sky, 4, 3, 0.0).unwrap();
        for &(x, y) in [(0, 0), (3, 0), (0, 2), (3, 2)].iter() {
            assert!(!frame.color(x, y).is_black());
        }
    }

    #[test]
    fn test_center_pixel_is_black() {
        let scene = Scene::new(SceneConstants::default()).unwrap();
        let sky = white_sky();
        let frame = quiet().render(&scene, &sky, 5, 3, 0.0).unwrap();
        assert_eq!(frame.state(2, 1), TerminalState::Horizon);
        assert_eq!(frame.color(2, 1), RGBSpectrum::black());
        assert_ne!(frame.state(0, 0), TerminalState::Horizon);
    }

    #[test]
    fn test_tilted_view_sees_all_three_outcomes() {
        let scene = pitched_scene();
        let sky = white_sky();
        let frame = quiet().render(&scene, &sky, 9, 7, 0.0).unwrap();

        assert_eq!(frame.state(4, 3), TerminalState::Horizon);
        assert_eq!(frame.color(4, 3), RGBSpectrum::black());
        assert_eq!(frame.state(4, 1), TerminalState::Disk);
        assert!(!frame.color(4, 1).is_black());
        assert_eq!(frame.state(0, 0), TerminalState::Sky);
        assert_eq!(frame.state(8, 6), TerminalState::Sky);
        assert_eq!(frame.color(8, 6), RGBSpectrum::white());

        let stats = frame.stats();
        assert_eq!(stats.pixels(), 63);
        assert!(stats.disk_hits > 0 && stats.horizon_hits > 0 && stats.sky_hits > 0);
        assert!(stats.integration_steps > 0);
    }

    #[test]
    fn test_output_independent_of_partitioning() {
        let scene = pitched_scene();
        let sky = SkyDome::new(&SkyDomeSettings { seed: 11, ..SkyDomeSettings::default() });
        let reference = quiet().with_threads(1).with_block_size(64).render(&scene, &sky, 9, 7, 1.5).unwrap();
        for &(threads, block) in [(3, 2), (4, 3), (2, 1)].iter() {
            let frame = quiet().with_threads(threads).with_block_size(block).render(&scene, &sky, 9, 7, 1.5).unwrap();
            assert_eq!(frame.bitmap().pixels(), reference.bitmap().pixels());
            assert_eq!(frame.states(), reference.states());
            assert_eq!(frame.stats(), reference.stats());
        }
    }

    #[test]
    fn test_repeated_renders_identical() {
        let scene = pitched_scene();
        let sky = SkyDome::new(&SkyDomeSettings::default());
        let a = quiet().render(&scene, &sky, 8, 6, 0.0).unwrap();
        let b = quiet().render(&scene, &sky, 8, 6, 0.0).unwrap();
        assert_eq!(a.bitmap().pixels(), b.bitmap().pixels());
        assert_eq!(a.states(), b.states());
    }

    #[test]
    fn test_sky_pixels_match_direct_lookup() {
        let scene = Scene::new(SceneConstants::default()).unwrap();
        let sky = SkyDome::new(&SkyDomeSettings { stars: 20000, ..SkyDomeSettings::default() });
        let frame = quiet().render(&scene, &sky, 6, 4, 0.0).unwrap();
        let tracer = GeodesicTracer::new(&scene, &sky, 0.0);
        let camera = scene.camera(6, 4);
        for y in 0..4 {
            for x in 0..6 {
                let record = tracer.trace_ray(&camera.pixel_ray(x, y));
                if record.state == TerminalState::Sky {
                    assert_eq!(frame.color(x, y), sky.eval_direction(&record.direction));
                }
            }
        }
    }

    #[test]
    fn test_cancelled_render() {
        let scene = Scene::new(SceneConstants::default()).unwrap();
        let sky = white_sky();
        let cancel = Arc::new(AtomicBool::new(true));
        let result = quiet().with_cancel_flag(cancel).render(&scene, &sky, 8, 8, 0.0);
        assert!(matches!(result, Err(RenderError::Cancelled)));
    }

    #[test]
    fn test_empty_frame() {
        let scene = Scene::new(SceneConstants::default()).unwrap();
        let sky = white_sky();
        let frame = quiet().render(&scene, &sky, 0, 5, 0.0).unwrap();
        assert_eq!(frame.width(), 0);
        assert!(frame.states().is_empty());
    }
}
