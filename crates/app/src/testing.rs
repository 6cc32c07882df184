//! In-memory port fakes shared by the unit tests of this crate.

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::{Arc, Mutex};

use pumpkinpi_domain::catalog::Catalog;
use pumpkinpi_domain::error::{DeviceError, PumpkinError};
use pumpkinpi_domain::event::{Event, Topic};
use pumpkinpi_domain::time::Timestamp;

use crate::device_state::DeviceState;
use crate::ports::{
    CommandOutput, CommandRunner, EventPublisher, FileEntry, FileKind, FileSystem, Level, OutputPin,
};
use crate::services::feature_service::FeatureService;
use crate::services::led_service::LedService;
use crate::services::photo_service::{CaptureSettings, PhotoService};
use crate::services::sound_service::SoundService;

pub(crate) fn parse_ts(raw: &str) -> Timestamp {
    raw.parse().unwrap()
}

fn io_failure(what: &str) -> PumpkinError {
    DeviceError::FileSystem(Box::new(std::io::Error::other(what.to_string()))).into()
}

/// Output pin that records every level written to it.
#[derive(Clone, Default)]
pub(crate) struct RecordingPin {
    levels: Arc<Mutex<Vec<Level>>>,
    fail: Arc<AtomicBool>,
}

impl RecordingPin {
    pub fn levels(&self) -> Vec<Level> {
        self.levels.lock().unwrap().clone()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

impl OutputPin for RecordingPin {
    fn write(&self, level: Level) -> Result<(), PumpkinError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(
                DeviceError::Actuator(Box::new(std::io::Error::other("pin write failed"))).into(),
            );
        }
        self.levels.lock().unwrap().push(level);
        Ok(())
    }
}

/// Publisher that keeps every event.
#[derive(Clone, Default)]
pub(crate) struct SpyPublisher {
    events: Arc<Mutex<Vec<Event>>>,
}

impl SpyPublisher {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn topics(&self) -> Vec<Topic> {
        self.events().iter().map(Event::topic).collect()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl EventPublisher for SpyPublisher {
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), PumpkinError>> + Send {
        self.events.lock().unwrap().push(event);
        async { Ok(()) }
    }
}

/// File system backed by a map of absolute paths.
#[derive(Clone, Default)]
pub(crate) struct MemoryFs {
    entries: Arc<Mutex<BTreeMap<PathBuf, FileEntry>>>,
    fail: Arc<AtomicBool>,
}

impl MemoryFs {
    fn insert(&self, path: &Path, kind: FileKind, modified: Option<Timestamp>) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.entries.lock().unwrap().insert(
            path.to_path_buf(),
            FileEntry {
                name,
                kind,
                modified,
            },
        );
    }

    pub fn add_file(&self, path: impl AsRef<Path>, modified: Timestamp) {
        self.insert(path.as_ref(), FileKind::File, Some(modified));
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        self.insert(path.as_ref(), FileKind::Directory, None);
    }

    pub fn fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

impl FileSystem for MemoryFs {
    fn list_dir(
        &self,
        dir: &Path,
    ) -> impl Future<Output = Result<Vec<FileEntry>, PumpkinError>> + Send {
        let result = if self.fail.load(Ordering::SeqCst) {
            Err(io_failure("read_dir failed"))
        } else {
            Ok(self
                .entries
                .lock()
                .unwrap()
                .iter()
                .filter(|(path, _)| path.parent() == Some(dir))
                .map(|(_, entry)| entry.clone())
                .collect())
        };
        async { result }
    }

    fn stat(
        &self,
        path: &Path,
    ) -> impl Future<Output = Result<Option<FileEntry>, PumpkinError>> + Send {
        let result = if self.fail.load(Ordering::SeqCst) {
            Err(io_failure("stat failed"))
        } else {
            Ok(self.entries.lock().unwrap().get(path).cloned())
        };
        async { result }
    }
}

type Invocation = (String, Vec<String>);

/// Command runner that records invocations.
///
/// `run` treats its last argument as the capture destination and, unless
/// told otherwise, creates a file there in the shared [`MemoryFs`].
#[derive(Clone)]
pub(crate) struct ScriptedRunner {
    fs: MemoryFs,
    spawned: Arc<Mutex<Vec<Invocation>>>,
    runs: Arc<Mutex<Vec<Invocation>>>,
    fail_spawns: Arc<AtomicBool>,
    create_files: Arc<AtomicBool>,
    create_dirs: Arc<AtomicBool>,
    exit_code: Arc<AtomicI32>,
}

impl ScriptedRunner {
    pub fn new(fs: MemoryFs) -> Self {
        Self {
            fs,
            spawned: Arc::default(),
            runs: Arc::default(),
            fail_spawns: Arc::default(),
            create_files: Arc::new(AtomicBool::new(true)),
            create_dirs: Arc::default(),
            exit_code: Arc::default(),
        }
    }

    pub fn spawned(&self) -> Vec<Invocation> {
        self.spawned.lock().unwrap().clone()
    }

    pub fn runs(&self) -> Vec<Invocation> {
        self.runs.lock().unwrap().clone()
    }

    pub fn fail_spawns(&self, fail: bool) {
        self.fail_spawns.store(fail, Ordering::SeqCst);
    }

    pub fn create_files(&self, create: bool) {
        self.create_files.store(create, Ordering::SeqCst);
    }

    pub fn create_dirs(&self, create: bool) {
        self.create_dirs.store(create, Ordering::SeqCst);
    }

    pub fn exit_with(&self, code: i32) {
        self.exit_code.store(code, Ordering::SeqCst);
    }
}

impl CommandRunner for ScriptedRunner {
    fn spawn(&self, program: &str, args: &[String]) -> Result<(), PumpkinError> {
        if self.fail_spawns.load(Ordering::SeqCst) {
            return Err(
                DeviceError::Command(Box::new(std::io::Error::other("no such program"))).into(),
            );
        }
        self.spawned
            .lock()
            .unwrap()
            .push((program.to_string(), args.to_vec()));
        Ok(())
    }

    fn run(
        &self,
        program: &str,
        args: &[String],
    ) -> impl Future<Output = Result<CommandOutput, PumpkinError>> + Send {
        self.runs
            .lock()
            .unwrap()
            .push((program.to_string(), args.to_vec()));
        if let Some(destination) = args.last() {
            if self.create_files.load(Ordering::SeqCst) {
                self.fs.add_file(destination, pumpkinpi_domain::time::now());
            } else if self.create_dirs.load(Ordering::SeqCst) {
                self.fs.add_dir(destination);
            }
        }
        let output = CommandOutput {
            exit_code: Some(self.exit_code.load(Ordering::SeqCst)),
            stdout: String::new(),
            stderr: "--- Opening /dev/video0...".to_string(),
        };
        async { Ok(output) }
    }
}

pub(crate) type TestLeds = LedService<RecordingPin, SpyPublisher>;
pub(crate) type TestSounds = SoundService<RecordingPin, ScriptedRunner>;
pub(crate) type TestPhotos = PhotoService<RecordingPin, SpyPublisher, ScriptedRunner, MemoryFs>;

/// The default catalog wired to fakes, with sounds under `/srv/sounds`
/// and photos under `/srv/photos`.
pub(crate) struct Harness {
    pub state: Arc<DeviceState<RecordingPin>>,
    pub pins: HashMap<String, RecordingPin>,
    pub publisher: SpyPublisher,
    pub runner: ScriptedRunner,
    pub fs: MemoryFs,
    pub leds: Arc<TestLeds>,
    pub features: FeatureService<RecordingPin, SpyPublisher>,
    pub sounds: Arc<TestSounds>,
    pub photos: Arc<TestPhotos>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_pins(&["led1", "led2"])
    }

    pub fn with_pins(ids: &[&str]) -> Self {
        let catalog = Catalog::default();
        let pins: HashMap<String, RecordingPin> = ids
            .iter()
            .map(|id| ((*id).to_string(), RecordingPin::default()))
            .collect();
        let state = Arc::new(DeviceState::new(
            &catalog,
            pins.clone(),
            "/srv/sounds",
            "/srv/photos",
        ));
        let publisher = SpyPublisher::default();
        let fs = MemoryFs::default();
        let runner = ScriptedRunner::new(fs.clone());

        let leds = Arc::new(LedService::new(Arc::clone(&state), publisher.clone()));
        let features = FeatureService::new(Arc::clone(&state), publisher.clone());
        let sounds = Arc::new(SoundService::new(
            Arc::clone(&state),
            catalog.sounds.clone(),
            runner.clone(),
            "aplay",
        ));
        let photos = Arc::new(PhotoService::new(
            Arc::clone(&state),
            Arc::clone(&leds),
            Arc::clone(&sounds),
            runner.clone(),
            fs.clone(),
            publisher.clone(),
            CaptureSettings::default(),
        ));

        Self {
            state,
            pins,
            publisher,
            runner,
            fs,
            leds,
            features,
            sounds,
            photos,
        }
    }

    pub fn pin(&self, id: &str) -> &RecordingPin {
        &self.pins[id]
    }
}
