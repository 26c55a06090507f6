//! Background generation driver.
//!
//! [`GenerationRun`] owns a worker thread that executes the stage pipeline
//! and publishes progress snapshots a UI thread can poll without blocking
//! generation. Callers that don't need a background thread use
//! [`generate`] and get the same pipeline synchronously.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::GenError;
use crate::factions::Faction;
use crate::map::OverworldMap;
use crate::pipeline::{default_stages, run_pipeline, WorldState};
use crate::settings::GenerationSettings;

/// Lifecycle of a generation run, as seen by pollers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationState {
    NotStarted,
    InProgress,
    Finished,
    Failed,
    Cancelled,
}

/// Point-in-time progress report. Cheap to clone; the map itself is not
/// part of the snapshot.
#[derive(Debug, Clone)]
pub struct ProgressSnapshot {
    pub state: GenerationState,
    /// Fraction of the pipeline completed, in `[0, 1]`.
    pub fraction: f32,
    /// Status message for the stage currently running.
    pub message: String,
}

impl Default for ProgressSnapshot {
    fn default() -> Self {
        Self {
            state: GenerationState::NotStarted,
            fraction: 0.0,
            message: String::from("Not started"),
        }
    }
}

/// Everything a finished run produces.
pub struct GenerationResult {
    pub settings: GenerationSettings,
    pub map: OverworldMap,
    pub factions: Vec<Faction>,
    pub volcanoes: Vec<(usize, usize)>,
}

struct Shared {
    progress: Mutex<ProgressSnapshot>,
    cancel: AtomicBool,
    outcome: Mutex<Option<Result<GenerationResult, GenError>>>,
}

// A poisoned progress mutex only means a holder panicked mid-update; the
// snapshot inside is still a valid value, so recover it.
fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// Run the whole pipeline on the calling thread.
pub fn generate(settings: &GenerationSettings) -> Result<GenerationResult, GenError> {
    settings.validate()?;
    let cancel = AtomicBool::new(false);
    run_to_result(settings.clone(), &cancel, &mut |_, _| {})
}

fn run_to_result(
    settings: GenerationSettings,
    cancel: &AtomicBool,
    progress: &mut dyn FnMut(f32, &str),
) -> Result<GenerationResult, GenError> {
    let mut world = WorldState::new(&settings);
    let mut rng = StdRng::seed_from_u64(settings.seed);
    run_pipeline(&mut world, &settings, &mut rng, &default_stages(), progress, cancel)?;
    Ok(GenerationResult {
        settings,
        map: world.map,
        factions: world.factions,
        volcanoes: world.volcanoes,
    })
}

/// Handle to a (possibly background) generation run.
pub struct GenerationRun {
    settings: GenerationSettings,
    shared: Arc<Shared>,
    handle: Option<JoinHandle<()>>,
    preview: Option<Box<dyn Fn(&ProgressSnapshot) + Send>>,
}

impl GenerationRun {
    /// Validate `settings` and prepare a run without starting it.
    pub fn new(settings: GenerationSettings) -> Result<Self, GenError> {
        settings.validate()?;
        Ok(Self {
            settings,
            shared: Arc::new(Shared {
                progress: Mutex::new(ProgressSnapshot::default()),
                cancel: AtomicBool::new(false),
                outcome: Mutex::new(None),
            }),
            handle: None,
            preview: None,
        })
    }

    /// Install a hook invoked from the worker thread at every stage
    /// boundary, after the snapshot has been published. Must be set
    /// before [`start`](Self::start).
    pub fn with_preview(mut self, hook: impl Fn(&ProgressSnapshot) + Send + 'static) -> Self {
        self.preview = Some(Box::new(hook));
        self
    }

    /// Spawn the worker thread. Calling `start` twice is a no-op.
    pub fn start(&mut self) {
        if self.handle.is_some() {
            return;
        }
        {
            let mut progress = lock_unpoisoned(&self.shared.progress);
            progress.state = GenerationState::InProgress;
            progress.message = String::from("Starting");
        }
        let settings = self.settings.clone();
        let shared = Arc::clone(&self.shared);
        let preview = self.preview.take();
        self.handle = Some(std::thread::spawn(move || {
            worker(settings, shared, preview);
        }));
    }

    /// Current progress. Never blocks on the worker.
    pub fn snapshot(&self) -> ProgressSnapshot {
        lock_unpoisoned(&self.shared.progress).clone()
    }

    pub fn state(&self) -> GenerationState {
        lock_unpoisoned(&self.shared.progress).state
    }

    /// Request cancellation. The worker honors it at the next stage
    /// boundary; already-finished runs ignore it.
    pub fn cancel(&self) {
        self.shared.cancel.store(true, Ordering::Relaxed);
    }

    /// Wait for the run to finish and take its outcome. Starts the run
    /// first if the caller never did.
    pub fn join(mut self) -> Result<GenerationResult, GenError> {
        self.start();
        let panicked = match self.handle.take() {
            Some(handle) => handle.join().is_err(),
            None => false,
        };
        if panicked {
            // catch_unwind in the worker should have recorded the panic;
            // this covers a panic outside that guard.
            let mut outcome = lock_unpoisoned(&self.shared.outcome);
            if outcome.is_none() {
                *outcome = Some(Err(GenError::WorkerPanic(String::from(
                    "worker thread terminated abnormally",
                ))));
            }
        }
        lock_unpoisoned(&self.shared.outcome)
            .take()
            .unwrap_or_else(|| {
                Err(GenError::WorkerPanic(String::from("worker produced no outcome")))
            })
    }
}

fn worker(
    settings: GenerationSettings,
    shared: Arc<Shared>,
    preview: Option<Box<dyn Fn(&ProgressSnapshot) + Send>>,
) {
    let body = {
        let shared = Arc::clone(&shared);
        move || {
            let mut publish = |fraction: f32, message: &str| {
                let snapshot = {
                    let mut progress = lock_unpoisoned(&shared.progress);
                    progress.fraction = fraction;
                    progress.message = message.to_owned();
                    progress.clone()
                };
                if let Some(hook) = &preview {
                    hook(&snapshot);
                }
            };
            run_to_result(settings, &shared.cancel, &mut publish)
        }
    };

    let result = match catch_unwind(AssertUnwindSafe(body)) {
        Ok(result) => result,
        Err(payload) => {
            let message = if let Some(s) = payload.downcast_ref::<&str>() {
                (*s).to_owned()
            } else if let Some(s) = payload.downcast_ref::<String>() {
                s.clone()
            } else {
                String::from("worker panicked")
            };
            log::error!("generation worker panicked: {message}");
            Err(GenError::WorkerPanic(message))
        }
    };

    let state = match &result {
        Ok(_) => GenerationState::Finished,
        Err(GenError::Cancelled) => GenerationState::Cancelled,
        Err(_) => GenerationState::Failed,
    };
    {
        let mut progress = lock_unpoisoned(&shared.progress);
        progress.state = state;
        if state == GenerationState::Finished {
            progress.fraction = 1.0;
            progress.message = String::from("Done");
        } else if state == GenerationState::Cancelled {
            progress.message = String::from("Cancelled");
        } else if let Err(e) = &result {
            progress.message = e.to_string();
        }
    }
    *lock_unpoisoned(&shared.outcome) = Some(result);
}
