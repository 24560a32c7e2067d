use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, SyncSender, TrySendError};
use std::sync::{Arc, RwLock, Weak};
use std::thread::{self, JoinHandle};

/// CPU-visible copy of the height channel of one displacement layer.
///
/// The surface tiles the world plane, so sampling wraps at the tile edges.
#[derive(Clone, Debug, Default)]
pub struct HeightSnapshot {
  size: usize,
  tile_length: f32,
  heights: Vec<f32>,
}

impl HeightSnapshot {
  pub fn new(size: usize, tile_length: f32, heights: Vec<f32>) -> Self {
    debug_assert_eq!(heights.len(), size * size);
    Self {
      size,
      tile_length,
      heights,
    }
  }

  pub fn empty() -> Self {
    Self::default()
  }

  /// Nearest-texel sample at a world position, wrapping over the tiled
  /// domain. An empty snapshot reads as a flat surface.
  pub fn sample(&self, world_x: f32, world_z: f32) -> f32 {
    if self.size == 0 || self.tile_length <= 0.0 {
      return 0.0;
    }
    let n = self.size as i64;
    let tx = (world_x / self.tile_length * self.size as f32).floor() as i64;
    let tz = (world_z / self.tile_length * self.size as f32).floor() as i64;
    let x = tx.rem_euclid(n) as usize;
    let z = tz.rem_euclid(n) as usize;
    self.heights[z * self.size + x]
  }
}

struct Shared {
  snapshot: RwLock<HeightSnapshot>,
  failed: AtomicBool,
}

/// Asynchronous copy-back of height data from the compute domain.
///
/// `request` is non-blocking; the worker thread publishes the snapshot some
/// bounded number of ticks later, so `height_at` is eventually consistent
/// and callers must tolerate the staleness. A bounded channel of depth one
/// guarantees that no two in-flight requests alias: while one is pending,
/// further requests are dropped and the snapshot simply lags one more tick.
pub struct HeightReadback {
  shared: Arc<Shared>,
  sender: Option<SyncSender<HeightSnapshot>>,
  worker: Option<JoinHandle<()>>,
}

impl HeightReadback {
  pub fn new() -> Self {
    let shared = Arc::new(Shared {
      snapshot: RwLock::new(HeightSnapshot::empty()),
      failed: AtomicBool::new(false),
    });

    let (sender, receiver) = mpsc::sync_channel::<HeightSnapshot>(1);

    // The worker holds only a weak reference: a completion that lands
    // after the owner tore the readback down is discarded instead of
    // writing into a dead snapshot.
    let weak: Weak<Shared> = Arc::downgrade(&shared);
    let worker = thread::Builder::new()
      .name("height-readback".into())
      .spawn(move || {
        while let Ok(snapshot) = receiver.recv() {
          match weak.upgrade() {
            Some(shared) => {
              let mut slot = shared
                .snapshot
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
              *slot = snapshot;
            }
            None => break,
          }
        }
      })
      .ok();

    if worker.is_none() {
      shared.failed.store(true, Ordering::Relaxed);
      log::warn!("height readback worker could not be spawned; queries stay at last known good");
    }

    Self {
      shared,
      sender: Some(sender),
      worker,
    }
  }

  /// Issue a non-blocking readback request for this tick.
  pub fn request(&self, snapshot: HeightSnapshot) {
    let Some(sender) = &self.sender else {
      return;
    };
    match sender.try_send(snapshot) {
      Ok(()) => {}
      Err(TrySendError::Full(_)) => {
        // Previous request still in flight; skipping keeps requests from
        // aliasing and only grows staleness by one tick.
        log::trace!("height readback still in flight, skipping tick");
      }
      Err(TrySendError::Disconnected(_)) => {
        if !self.shared.failed.swap(true, Ordering::Relaxed) {
          log::warn!("height readback worker gone; queries stay at last known good snapshot");
        }
      }
    }
  }

  /// Replace the CPU-visible snapshot immediately, bypassing the
  /// asynchronous path. Used to seed a deterministic baseline.
  pub fn publish_now(&self, snapshot: HeightSnapshot) {
    let mut slot = self
      .shared
      .snapshot
      .write()
      .unwrap_or_else(|poisoned| poisoned.into_inner());
    *slot = snapshot;
  }

  /// Eventually-consistent height query; never blocks, never panics.
  pub fn height_at(&self, world_x: f32, world_z: f32) -> f32 {
    self
      .shared
      .snapshot
      .read()
      .unwrap_or_else(|poisoned| poisoned.into_inner())
      .sample(world_x, world_z)
  }

  /// True once the readback path has failed; the snapshot then stays at
  /// the last known good state.
  pub fn is_failed(&self) -> bool {
    self.shared.failed.load(Ordering::Relaxed)
  }
}

impl Drop for HeightReadback {
  fn drop(&mut self) {
    // Closing the channel wakes the worker; join so an in-flight write
    // cannot outlive the owner.
    self.sender.take();
    if let Some(worker) = self.worker.take() {
      let _ = worker.join();
    }
  }
}
