//! Port fakes and a fully wired state for router tests.

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::response::Response;
use http_body_util::BodyExt;

use pumpkinpi_app::device_state::DeviceState;
use pumpkinpi_app::event_bus::InProcessEventBus;
use pumpkinpi_app::ports::{
    CommandOutput, CommandRunner, FileEntry, FileKind, FileSystem, Level, OutputPin,
};
use pumpkinpi_app::services::feature_service::FeatureService;
use pumpkinpi_app::services::led_service::LedService;
use pumpkinpi_app::services::photo_service::{CaptureSettings, PhotoService};
use pumpkinpi_app::services::sound_service::SoundService;
use pumpkinpi_domain::catalog::Catalog;
use pumpkinpi_domain::error::PumpkinError;

use crate::state::AppState;

pub(crate) const PHOTOS_DIR: &str = "/srv/photos";

pub(crate) struct NullPin;

impl OutputPin for NullPin {
    fn write(&self, _level: Level) -> Result<(), PumpkinError> {
        Ok(())
    }
}

/// Directory listing kept in memory, keyed by full path.
#[derive(Default)]
pub(crate) struct MemoryFs {
    files: Mutex<BTreeMap<PathBuf, FileEntry>>,
}

impl MemoryFs {
    pub fn add_photo(&self, name: &str, modified: &str) {
        self.insert(Path::new(PHOTOS_DIR).join(name), modified.parse().ok());
    }

    fn insert(&self, path: PathBuf, modified: Option<pumpkinpi_domain::time::Timestamp>) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let entry = FileEntry {
            name,
            kind: FileKind::File,
            modified,
        };
        self.files.lock().unwrap().insert(path, entry);
    }
}

impl FileSystem for MemoryFs {
    fn list_dir(
        &self,
        dir: &Path,
    ) -> impl Future<Output = Result<Vec<FileEntry>, PumpkinError>> + Send {
        let entries = self
            .files
            .lock()
            .unwrap()
            .iter()
            .filter(|(path, _)| path.parent() == Some(dir))
            .map(|(_, entry)| entry.clone())
            .collect();
        async move { Ok(entries) }
    }

    fn stat(
        &self,
        path: &Path,
    ) -> impl Future<Output = Result<Option<FileEntry>, PumpkinError>> + Send {
        let entry = self.files.lock().unwrap().get(path).cloned();
        async move { Ok(entry) }
    }
}

/// Runner that records spawned programs and fakes a capture by creating
/// the destination (its last argument) in [`MemoryFs`].
pub(crate) struct FakeRunner {
    fs: Arc<MemoryFs>,
    spawned: Mutex<Vec<String>>,
    produce: AtomicBool,
}

impl FakeRunner {
    fn new(fs: Arc<MemoryFs>) -> Self {
        Self {
            fs,
            spawned: Mutex::new(Vec::new()),
            produce: AtomicBool::new(true),
        }
    }

    pub fn spawned(&self) -> Vec<String> {
        self.spawned.lock().unwrap().clone()
    }

    pub fn produce_files(&self, produce: bool) {
        self.produce.store(produce, Ordering::SeqCst);
    }
}

impl CommandRunner for FakeRunner {
    fn spawn(&self, program: &str, args: &[String]) -> Result<(), PumpkinError> {
        self.spawned
            .lock()
            .unwrap()
            .push(format!("{program} {}", args.join(" ")));
        Ok(())
    }

    fn run(
        &self,
        _program: &str,
        args: &[String],
    ) -> impl Future<Output = Result<CommandOutput, PumpkinError>> + Send {
        let produce = self.produce.load(Ordering::SeqCst);
        if let Some(destination) = args.last().filter(|_| produce) {
            self.fs
                .insert(PathBuf::from(destination), Some(pumpkinpi_domain::time::now()));
        }
        async {
            Ok(CommandOutput {
                exit_code: Some(1),
                ..CommandOutput::default()
            })
        }
    }
}

pub(crate) type TestState =
    AppState<NullPin, Arc<InProcessEventBus>, Arc<FakeRunner>, Arc<MemoryFs>>;

/// Default catalog wired to in-memory fakes and a real event bus.
pub(crate) struct TestApp {
    pub state: TestState,
    pub runner: Arc<FakeRunner>,
    pub fs: Arc<MemoryFs>,
}

impl TestApp {
    pub fn new() -> Self {
        let catalog = Catalog::default();
        let pins: HashMap<String, NullPin> = catalog
            .leds
            .iter()
            .map(|led| (led.id.clone(), NullPin))
            .collect();
        let device_state = Arc::new(DeviceState::new(&catalog, pins, "/srv/sounds", PHOTOS_DIR));
        let event_bus = Arc::new(InProcessEventBus::new(16));
        let fs = Arc::new(MemoryFs::default());
        let runner = Arc::new(FakeRunner::new(Arc::clone(&fs)));

        let leds = Arc::new(LedService::new(
            Arc::clone(&device_state),
            Arc::clone(&event_bus),
        ));
        let features = Arc::new(FeatureService::new(
            Arc::clone(&device_state),
            Arc::clone(&event_bus),
        ));
        let sounds = Arc::new(SoundService::new(
            Arc::clone(&device_state),
            catalog.sounds.clone(),
            Arc::clone(&runner),
            "aplay",
        ));
        let photos = Arc::new(PhotoService::new(
            device_state,
            Arc::clone(&leds),
            Arc::clone(&sounds),
            Arc::clone(&runner),
            Arc::clone(&fs),
            Arc::clone(&event_bus),
            CaptureSettings::default(),
        ));

        let state = AppState::from_arcs(leds, features, sounds, photos, event_bus);
        Self { state, runner, fs }
    }

    pub fn router(&self) -> Router {
        crate::router::build(self.state.clone(), Path::new(PHOTOS_DIR))
    }
}

pub(crate) async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
