//! Frame orchestration over a fixed pool of chunk workers.

use std::sync::atomic::Ordering;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::chunk::split_columns;
use crate::error::{RenderError, RenderResult};
use crate::framebuffer::FrameBuffer;
use crate::lighting::{FrameSettings, LightingMode, RenderSettings};
use crate::scene::Scene;
use crate::worker::{FrameJob, Job, Message, WorkerHandle};

/// Worker pool configuration, fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    pub worker_count: usize,
    /// How long to block on the completion channel before checking worker health
    pub poll_interval: Duration,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            worker_count: num_cpus::get(),
            poll_interval: Duration::from_millis(2),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameStats {
    pub frame_id: u64,
    /// Wall time from job hand-off until the last chunk reported
    pub elapsed: Duration,
    pub slowest_chunk: Duration,
    pub workers: usize,
}

/// Receives each finished frame.
pub trait Presenter {
    fn present(&mut self, framebuffer: &FrameBuffer, stats: &FrameStats) -> RenderResult<()>;
}

/// Renders frames by splitting the framebuffer into column chunks, one per
/// long-lived worker thread.
pub struct ChunkRenderer {
    workers: Vec<WorkerHandle>,
    from_workers: Receiver<Message>,
    framebuffer: Arc<FrameBuffer>,
    settings: RenderSettings,
    config: RendererConfig,
    next_frame_id: u64,
    shut_down: bool,
}

impl ChunkRenderer {
    /// Allocate the framebuffer and spawn the worker pool.
    pub fn new(width: u32, height: u32, config: RendererConfig) -> RenderResult<Self> {
        let framebuffer = Arc::new(FrameBuffer::new(width, height)?);
        let worker_count = config.worker_count.max(1);

        let (to_parent, from_workers) = std::sync::mpsc::channel();
        let mut workers = Vec::with_capacity(worker_count);
        for chunk in split_columns(width, worker_count) {
            workers.push(WorkerHandle::spawn(chunk, to_parent.clone())?);
        }

        log::info!(
            "Started {} chunk workers for {}x{} frames",
            workers.len(),
            width,
            height
        );

        Ok(Self {
            workers,
            from_workers,
            framebuffer,
            settings: RenderSettings::default(),
            config,
            next_frame_id: 0,
            shut_down: false,
        })
    }

    /// Render one frame of `scene` into the framebuffer and wait for every
    /// worker to finish its chunk.
    ///
    /// Settings are snapshotted here, so toggles made during a frame apply
    /// to the next one. If a worker has died the frame fails with
    /// `WorkerDied`, but only after the surviving workers finished their
    /// chunks, so nothing writes to the framebuffer once this returns. Every
    /// later frame fails the same way.
    pub fn render_frame(&mut self, scene: &Arc<Scene>) -> RenderResult<FrameStats> {
        if self.shut_down {
            return Err(RenderError::ShutDown);
        }

        let frame_id = self.next_frame_id;
        self.next_frame_id += 1;

        let frame = Arc::new(FrameSettings::new(
            self.framebuffer.width(),
            self.framebuffer.height(),
            scene.camera,
            &self.settings,
        ));

        let start = Instant::now();
        let mut unreachable = false;
        for worker in &self.workers {
            worker.done.store(false, Ordering::Release);
            let job = FrameJob {
                frame_id,
                scene: Arc::clone(scene),
                settings: Arc::clone(&frame),
                target: Arc::clone(&self.framebuffer),
            };
            // A closed job channel means the thread already exited
            if worker.tx.send(Job::Render(job)).is_err() {
                log::error!(
                    "Chunk worker {} is gone, frame {} cannot complete",
                    worker.id,
                    frame_id
                );
                unreachable = true;
            }
        }
        if unreachable {
            return Err(self.fail_frame(frame_id));
        }

        let mut remaining = self.workers.len();
        let mut slowest_chunk = Duration::ZERO;
        while remaining > 0 {
            match self.from_workers.recv_timeout(self.config.poll_interval) {
                Ok(Message::ChunkDone {
                    worker,
                    frame_id: done_id,
                    elapsed,
                }) => {
                    if done_id != frame_id {
                        log::warn!(
                            "Dropping stale completion from worker {} for frame {} (current {})",
                            worker,
                            done_id,
                            frame_id
                        );
                        continue;
                    }
                    slowest_chunk = slowest_chunk.max(elapsed);
                    remaining -= 1;
                }
                Err(RecvTimeoutError::Timeout) => {
                    if self.has_dead_worker() {
                        return Err(self.fail_frame(frame_id));
                    }
                }
                // Every worker dropped its sender, so the pending ones exited
                Err(RecvTimeoutError::Disconnected) => return Err(self.fail_frame(frame_id)),
            }
        }

        let stats = FrameStats {
            frame_id,
            elapsed: start.elapsed(),
            slowest_chunk,
            workers: self.workers.len(),
        };
        log::debug!(
            "Frame {} done in {:.2?} (slowest chunk {:.2?})",
            frame_id,
            stats.elapsed,
            stats.slowest_chunk
        );

        Ok(stats)
    }

    /// Render a frame and hand it to `presenter`.
    pub fn render(
        &mut self,
        scene: &Arc<Scene>,
        presenter: &mut impl Presenter,
    ) -> RenderResult<FrameStats> {
        let stats = self.render_frame(scene)?;
        presenter.present(&self.framebuffer, &stats)?;
        Ok(stats)
    }

    /// True if a worker thread exited while its chunk was still pending.
    fn has_dead_worker(&self) -> bool {
        self.workers.iter().any(|w| !w.is_done() && w.is_finished())
    }

    /// Block until every worker that is still alive has finished its chunk.
    ///
    /// Completions drained here are dropped.
    fn wait_for_live_workers(&self) {
        while self.workers.iter().any(|w| !w.is_done() && !w.is_finished()) {
            if let Err(RecvTimeoutError::Disconnected) =
                self.from_workers.recv_timeout(self.config.poll_interval)
            {
                break;
            }
        }
    }

    /// Abandon `frame_id` after a worker died.
    ///
    /// Waits for the surviving workers, then joins the lowest-numbered
    /// worker whose chunk is still pending and reports it.
    fn fail_frame(&mut self, frame_id: u64) -> RenderError {
        self.wait_for_live_workers();

        let Some(worker) = self.workers.iter_mut().find(|w| !w.is_done()) else {
            log::error!("All chunk workers hung up during frame {}", frame_id);
            return RenderError::WorkerDisconnected(0);
        };

        if let Some(handle) = worker.handle.take() {
            if handle.join().is_err() {
                log::error!("Chunk worker {} panicked", worker.id);
            }
        }
        log::error!("Chunk worker {} died during frame {}", worker.id, frame_id);
        RenderError::WorkerDied(worker.id)
    }

    /// Advance to the next lighting mode; returns the new mode.
    pub fn cycle_lighting_mode(&mut self) -> LightingMode {
        self.settings.lighting_mode = self.settings.lighting_mode.next();
        log::info!("Lighting mode: {}", self.settings.lighting_mode);
        self.settings.lighting_mode
    }

    /// Flip shadow rays on or off; returns the new state.
    pub fn toggle_shadows(&mut self) -> bool {
        self.settings.shadows_enabled = !self.settings.shadows_enabled;
        log::info!(
            "Shadows {}",
            if self.settings.shadows_enabled { "on" } else { "off" }
        );
        self.settings.shadows_enabled
    }

    pub fn set_mark_chunks(&mut self, mark_chunks: bool) {
        self.settings.mark_chunks = mark_chunks;
    }

    pub fn set_settings(&mut self, settings: RenderSettings) {
        self.settings = settings;
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn framebuffer(&self) -> &FrameBuffer {
        &self.framebuffer
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Number of frames started so far.
    pub fn frame_count(&self) -> u64 {
        self.next_frame_id
    }

    /// True when no worker has a pending chunk.
    pub fn is_idle(&self) -> bool {
        self.workers.iter().all(|w| w.is_done())
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Stop and join every worker. Further frames return `ShutDown`.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;

        for worker in &self.workers {
            // A worker that already exited has dropped its receiver
            let _ = worker.tx.send(Job::Shutdown);
        }
        for worker in &mut self.workers {
            if let Some(handle) = worker.handle.take() {
                if handle.join().is_err() {
                    log::error!("Chunk worker {} panicked", worker.id);
                }
            }
        }

        log::info!("Stopped {} chunk workers", self.workers.len());
    }
}

impl Drop for ChunkRenderer {
    fn drop(&mut self) {
        self.shutdown();
    }
}
