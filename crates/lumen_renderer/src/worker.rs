//! Long-lived render worker threads.
//!
//! A worker owns one column chunk for its whole lifetime. It blocks on its
//! job channel between frames, renders its chunk when a frame job arrives and
//! reports back on the shared completion channel.

use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::chunk::ColumnChunk;
use crate::error::RenderResult;
use crate::framebuffer::FrameBuffer;
use crate::lighting::{shade_pixel, FrameSettings};
use crate::scene::Scene;

/// Everything a worker needs to render its chunk of one frame.
pub struct FrameJob {
    pub frame_id: u64,
    pub scene: Arc<Scene>,
    pub settings: Arc<FrameSettings>,
    pub target: Arc<FrameBuffer>,
}

pub enum Job {
    Render(FrameJob),
    Shutdown,
}

pub enum Message {
    ChunkDone {
        worker: usize,
        frame_id: u64,
        elapsed: Duration,
    },
}

/// Orchestrator-side handle to one worker thread.
pub struct WorkerHandle {
    pub id: usize,
    pub chunk: ColumnChunk,
    pub tx: Sender<Job>,
    /// Set by the worker (release) when it finished its chunk
    pub done: Arc<AtomicBool>,
    pub handle: Option<JoinHandle<()>>,
}

impl WorkerHandle {
    /// Spawn a named worker thread for `chunk`.
    pub fn spawn(chunk: ColumnChunk, to_parent: Sender<Message>) -> RenderResult<Self> {
        let id = chunk.index;
        let (tx, from_parent) = std::sync::mpsc::channel();
        let done = Arc::new(AtomicBool::new(true));

        let worker_done = Arc::clone(&done);
        let columns = chunk.columns.clone();
        let handle = std::thread::Builder::new()
            .name(format!("ChunkWorker-{}", id))
            .spawn(move || launch(id, columns, &worker_done, &to_parent, &from_parent))?;

        Ok(Self {
            id,
            chunk,
            tx,
            done,
            handle: Some(handle),
        })
    }

    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    /// True if the thread exited, e.g. after a panic.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }
}

/// Worker thread body: loop until told to stop or the parent hangs up.
fn launch(
    id: usize,
    columns: Range<u32>,
    done: &AtomicBool,
    to_parent: &Sender<Message>,
    from_parent: &Receiver<Job>,
) {
    log::debug!("Chunk worker {}: Begin, columns {:?}", id, columns);

    // Blocking recv, workers sleep between frames
    while let Ok(job) = from_parent.recv() {
        let job = match job {
            Job::Render(job) => job,
            Job::Shutdown => {
                log::debug!("Chunk worker {}: Shutdown requested", id);
                break;
            }
        };

        let frame_id = job.frame_id;
        let start = Instant::now();
        render_chunk(id, &columns, job);
        let elapsed = start.elapsed();

        done.store(true, Ordering::Release);
        log::trace!("Chunk worker {}: Frame {} done in {:.2?}", id, frame_id, elapsed);

        if to_parent
            .send(Message::ChunkDone {
                worker: id,
                frame_id,
                elapsed,
            })
            .is_err()
        {
            log::warn!("Chunk worker {}: Parent disconnected", id);
            break;
        }
    }

    log::debug!("Chunk worker {}: End", id);
}

/// Render the columns of one frame, column by column, top to bottom.
///
/// Consumes the job so the scene and framebuffer references are released
/// before completion is signaled.
fn render_chunk(id: usize, columns: &Range<u32>, job: FrameJob) {
    let FrameJob {
        scene,
        settings,
        target,
        ..
    } = job;

    let height = settings.height.min(target.height());
    let end = columns.end.min(target.width());

    for x in columns.start..end {
        for y in 0..height {
            let pixel = if settings.mark_chunks {
                id as u32
            } else {
                shade_pixel(&scene, &settings, x, y)
            };
            target.set(x, y, pixel);
        }
    }
}
