use booktape::domain::pipeline::{PipelineService, PipelineSettings};
use booktape::domain::shared::RunStatistics;
use booktape::infrastructure::extractors::ExtractorRegistry;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use test_context::AsyncTestContext;

pub mod fakes;

pub use fakes::{decode_segment, FakeCodec, FakeTts, MS_PER_CHAR};

/// One isolated working tree per test: sources, downloads, outputs and done
/// directories under a fresh temp dir, plus a scriptable TTS provider.
pub struct TestContext {
    pub settings: PipelineSettings,
    pub tts: Arc<FakeTts>,
    _root: TempDir,
}

impl AsyncTestContext for TestContext {
    fn setup() -> impl std::future::Future<Output = Self> + Send {
        async {
            let root = tempfile::tempdir().expect("Failed to create temp dir");

            // Four characters per chunk, two full chunks per segment
            let settings = PipelineSettings {
                sources_dir: root.path().join("sources"),
                downloads_dir: root.path().join("downloads"),
                outputs_dir: root.path().join("outputs"),
                done_dir: root.path().join("done"),
                voice: "shimmer".to_string(),
                chunk_max_chars: 4,
                max_segment_ms: 8 * MS_PER_CHAR,
                delete_intermediate: false,
                synthesis_concurrency: 3,
                synthesis_max_attempts: 2,
                synthesis_retry_backoff: Duration::from_millis(1),
            };
            std::fs::create_dir_all(&settings.sources_dir).expect("Failed to create sources dir");

            Self {
                settings,
                tts: Arc::new(FakeTts::new()),
                _root: root,
            }
        }
    }

    fn teardown(self) -> impl std::future::Future<Output = ()> + Send {
        async {
            // Temp dir is removed on drop
        }
    }
}

impl TestContext {
    pub fn pipeline(&self) -> PipelineService {
        self.pipeline_with(self.settings.clone())
    }

    pub fn pipeline_with(&self, settings: PipelineSettings) -> PipelineService {
        PipelineService::new(
            settings,
            ExtractorRegistry::default(),
            self.tts.clone(),
            Arc::new(FakeCodec),
            Arc::new(RunStatistics::new()),
        )
    }

    pub fn add_source(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.settings.sources_dir.join(name);
        std::fs::write(&path, contents).expect("Failed to write source");
        path
    }

    pub fn chunk_dir(&self, document: &str) -> PathBuf {
        self.settings.downloads_dir.join(document)
    }

    pub fn output_dir(&self, document: &str) -> PathBuf {
        self.settings.outputs_dir.join(document)
    }

    pub fn chunk_files(&self, document: &str) -> Vec<String> {
        list_files(&self.chunk_dir(document))
    }

    pub fn output_files(&self, document: &str) -> Vec<String> {
        list_files(&self.output_dir(document))
    }

    pub fn done_files(&self) -> Vec<String> {
        list_files(&self.settings.done_dir)
    }

    pub fn source_files(&self) -> Vec<String> {
        list_files(&self.settings.sources_dir)
    }

    pub fn read_output(&self, document: &str, file_name: &str) -> Vec<u8> {
        std::fs::read(self.output_dir(document).join(file_name)).expect("Failed to read output")
    }
}

/// Sorted names of the files in `dir`; a missing directory is empty.
pub fn list_files(dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
