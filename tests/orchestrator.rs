//! End-to-end orchestration tests against mock services.

use async_trait::async_trait;
use image_compressor::{
    BatchRequest, CompressionEngine, CompressionOptions, Compressor, CompressorError,
    CompressorResult, DialogService, DropEvent, DropListener, JobPhase, MetadataService, Notice,
    NoticeLevel, Notifier, OutputFormat,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, Notify};

/// Engine that records every request and replays queued responses. With an
/// empty queue it reports one success line per input file.
#[derive(Default)]
struct ScriptedEngine {
    calls: AtomicUsize,
    requests: Mutex<Vec<BatchRequest>>,
    responses: Mutex<VecDeque<CompressorResult<Vec<String>>>>,
}

impl ScriptedEngine {
    fn push_response(&self, response: CompressorResult<Vec<String>>) {
        self.responses.lock().unwrap().push_back(response);
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_request(&self) -> BatchRequest {
        self.requests.lock().unwrap().last().unwrap().clone()
    }
}

#[async_trait]
impl CompressionEngine for ScriptedEngine {
    async fn compress_batch(&self, request: &BatchRequest) -> CompressorResult<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        match self.responses.lock().unwrap().pop_front() {
            Some(response) => response,
            None => Ok(request
                .src_paths
                .iter()
                .map(|path| format!("成功: {}", path))
                .collect()),
        }
    }
}

/// Engine that parks until released, for observing in-flight state.
#[derive(Default)]
struct GatedEngine {
    started: Notify,
    release: Notify,
}

#[async_trait]
impl CompressionEngine for GatedEngine {
    async fn compress_batch(&self, _request: &BatchRequest) -> CompressorResult<Vec<String>> {
        self.started.notify_one();
        self.release.notified().await;
        Ok(vec!["成功: /out/a.jpg".to_string()])
    }
}

/// Metadata sized by path length; paths containing "missing" fail.
struct SizeByPath;

#[async_trait]
impl MetadataService for SizeByPath {
    async fn file_size(&self, path: &str) -> CompressorResult<u64> {
        if path.contains("missing") {
            Err(CompressorError::io("no such file"))
        } else {
            Ok(path.len() as u64)
        }
    }
}

/// Metadata lookup that parks until released.
#[derive(Default)]
struct GatedMetadata {
    started: Notify,
    release: Notify,
}

#[async_trait]
impl MetadataService for GatedMetadata {
    async fn file_size(&self, _path: &str) -> CompressorResult<u64> {
        self.started.notify_one();
        self.release.notified().await;
        Ok(7)
    }
}

struct NoDialogs;

#[async_trait]
impl DialogService for NoDialogs {
    async fn pick_images(&self) -> Option<Vec<String>> {
        None
    }

    async fn pick_directory(&self) -> Option<String> {
        None
    }
}

struct PresetDialogs {
    images: Vec<String>,
    directory: String,
}

#[async_trait]
impl DialogService for PresetDialogs {
    async fn pick_images(&self) -> Option<Vec<String>> {
        Some(self.images.clone())
    }

    async fn pick_directory(&self) -> Option<String> {
        Some(self.directory.clone())
    }
}

#[derive(Default)]
struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

fn session(engine: Arc<dyn CompressionEngine>) -> Compressor {
    Compressor::with_services(engine, Arc::new(SizeByPath), Arc::new(NoDialogs))
}

#[tokio::test]
async fn registration_dedups_across_and_within_calls() {
    let engine = Arc::new(ScriptedEngine::default());
    let compressor = session(engine);

    let added = compressor
        .register_paths(vec!["/in/a.png".into(), "/in/b.jpg".into()])
        .await
        .unwrap();
    assert_eq!(added, 2);

    let added = compressor
        .register_paths(vec!["/in/b.jpg".into(), "/in/c.webp".into()])
        .await
        .unwrap();
    assert_eq!(added, 1);

    let added = compressor
        .register_paths(vec!["/in/a.png".into(), "/in/d.png".into(), "/in/a.png".into()])
        .await
        .unwrap();
    assert_eq!(added, 1);

    let paths: Vec<String> = compressor
        .files()
        .await
        .into_iter()
        .map(|record| record.path)
        .collect();
    assert_eq!(paths, vec!["/in/a.png", "/in/b.jpg", "/in/c.webp", "/in/d.png"]);
}

#[tokio::test]
async fn empty_registration_is_a_no_op() {
    let engine = Arc::new(ScriptedEngine::default());
    let compressor = session(engine);

    assert_eq!(compressor.register_paths(Vec::new()).await.unwrap(), 0);
    assert_eq!(compressor.file_count().await, 0);
    assert_eq!(compressor.phase(), JobPhase::Idle);

    // The slot reopened: the next sweep goes through.
    let added = compressor
        .register_paths(vec!["/in/a.png".into()])
        .await
        .unwrap();
    assert_eq!(added, 1);
}

#[tokio::test]
async fn metadata_failure_keeps_file_with_zero_size() {
    let engine = Arc::new(ScriptedEngine::default());
    let compressor = session(engine);

    compressor
        .register_paths(vec!["/in/a.png".into(), "/in/missing.png".into()])
        .await
        .unwrap();

    let files = compressor.files().await;
    assert_eq!(files.len(), 2);
    assert_eq!(files[0].size, "/in/a.png".len() as u64);
    assert_eq!(files[1].size, 0);
    assert_eq!(files[1].name, "missing.png");
}

#[tokio::test]
async fn concurrent_sweep_is_rejected_without_mutation() {
    let metadata = Arc::new(GatedMetadata::default());
    let engine = Arc::new(ScriptedEngine::default());
    let compressor = Arc::new(Compressor::with_services(
        engine,
        metadata.clone(),
        Arc::new(NoDialogs),
    ));

    // Prime one file with the gate already open, then drain the stale
    // start signal.
    metadata.release.notify_one();
    compressor
        .register_paths(vec!["/in/z.png".into()])
        .await
        .unwrap();
    metadata.started.notified().await;
    compressor.set_output_dir("/out").await;

    let sweep = {
        let compressor = compressor.clone();
        tokio::spawn(async move { compressor.register_paths(vec!["/in/a.png".into()]).await })
    };
    metadata.started.notified().await;
    assert_eq!(compressor.phase(), JobPhase::Loading);

    let rejected = compressor
        .register_paths(vec!["/in/b.png".into()])
        .await
        .unwrap_err();
    assert!(rejected.is_busy());

    let rejected = compressor.compress().await.unwrap_err();
    assert!(rejected.is_busy());
    assert_eq!(compressor.file_count().await, 1);

    metadata.release.notify_one();
    assert_eq!(sweep.await.unwrap().unwrap(), 1);
    assert_eq!(compressor.file_count().await, 2);
    assert_eq!(compressor.phase(), JobPhase::Idle);
}

#[tokio::test]
async fn concurrent_compress_is_rejected_not_queued() {
    let engine = Arc::new(GatedEngine::default());
    let compressor = Arc::new(Compressor::with_services(
        engine.clone(),
        Arc::new(SizeByPath),
        Arc::new(NoDialogs),
    ));
    compressor
        .register_paths(vec!["/in/a.png".into()])
        .await
        .unwrap();
    compressor.set_output_dir("/out").await;

    let job = {
        let compressor = compressor.clone();
        tokio::spawn(async move { compressor.compress().await })
    };
    engine.started.notified().await;
    assert_eq!(compressor.phase(), JobPhase::Compressing);

    let rejected = compressor.compress().await.unwrap_err();
    assert!(rejected.is_busy());

    let rejected = compressor
        .register_paths(vec!["/in/b.png".into()])
        .await
        .unwrap_err();
    assert!(rejected.is_busy());
    assert_eq!(compressor.file_count().await, 1);

    engine.release.notify_one();
    let summary = job.await.unwrap().unwrap();
    assert_eq!(summary.success, 1);
    assert_eq!(compressor.phase(), JobPhase::Idle);
    assert_eq!(compressor.progress(), 100);
}

#[tokio::test]
async fn compress_requires_registered_files() {
    let engine = Arc::new(ScriptedEngine::default());
    let compressor = session(engine.clone());
    compressor.set_output_dir("/out").await;

    let err = compressor.compress().await.unwrap_err();
    assert!(matches!(err, CompressorError::Validation(_)));
    assert_eq!(engine.calls(), 0);
    assert_eq!(compressor.progress(), 0);
    assert_eq!(compressor.phase(), JobPhase::Idle);
}

#[tokio::test]
async fn compress_requires_output_directory() {
    let engine = Arc::new(ScriptedEngine::default());
    let compressor = session(engine.clone());
    compressor
        .register_paths(vec!["/in/a.png".into()])
        .await
        .unwrap();

    let err = compressor.compress().await.unwrap_err();
    assert!(matches!(err, CompressorError::Validation(_)));
    assert_eq!(engine.calls(), 0);
    assert_eq!(compressor.progress(), 0);
}

#[tokio::test]
async fn compress_sends_one_request_with_session_snapshot() {
    let engine = Arc::new(ScriptedEngine::default());
    let compressor = session(engine.clone());
    compressor
        .register_paths(vec!["/in/b.png".into(), "/in/a.jpg".into()])
        .await
        .unwrap();
    compressor.set_output_dir("/out").await;
    compressor
        .set_options(CompressionOptions {
            format: OutputFormat::Webp,
            quality: 60,
            alpha_quality: Some(50),
            filter: None,
            compression: None,
        })
        .await
        .unwrap();

    let summary = compressor.compress().await.unwrap();
    assert_eq!(summary.success, 2);
    assert_eq!(summary.failure, 0);
    assert_eq!(engine.calls(), 1);

    let request = engine.last_request();
    assert_eq!(request.src_paths, vec!["/in/b.png", "/in/a.jpg"]);
    assert_eq!(request.dest_dir, "/out");
    assert_eq!(request.options.format, OutputFormat::Webp);
    assert_eq!(request.options.quality, 60);
    assert_eq!(request.options.alpha_quality, Some(50));

    assert_eq!(compressor.progress(), 100);
    assert_eq!(compressor.phase(), JobPhase::Idle);
}

#[tokio::test]
async fn engine_failure_collapses_into_single_error_line() {
    let engine = Arc::new(ScriptedEngine::default());
    engine.push_response(Err(CompressorError::engine("boom")));
    let compressor = session(engine);
    compressor
        .register_paths(vec!["/in/a.png".into()])
        .await
        .unwrap();
    compressor.set_output_dir("/out").await;

    let summary = compressor.compress().await.unwrap();
    assert_eq!(summary.success, 0);
    assert_eq!(summary.failure, 1);

    let results = compressor.results().await;
    assert_eq!(results, vec!["错误: Engine error: boom".to_string()]);

    // The job still finishes: full progress, slot reopened.
    assert_eq!(compressor.progress(), 100);
    assert_eq!(compressor.phase(), JobPhase::Idle);
}

#[tokio::test]
async fn results_are_replaced_by_the_next_run() {
    let engine = Arc::new(ScriptedEngine::default());
    engine.push_response(Ok(vec!["成功: /out/a.jpg".into(), "成功: /out/b.jpg".into()]));
    engine.push_response(Ok(vec!["失败: /in/a.png - decode error".into()]));
    let compressor = session(engine);
    compressor
        .register_paths(vec!["/in/a.png".into(), "/in/b.png".into()])
        .await
        .unwrap();
    compressor.set_output_dir("/out").await;

    let first = compressor.compress().await.unwrap();
    assert_eq!(first.success, 2);
    assert_eq!(compressor.results().await.len(), 2);

    let second = compressor.compress().await.unwrap();
    assert_eq!(second.failure, 1);
    assert_eq!(
        compressor.results().await,
        vec!["失败: /in/a.png - decode error".to_string()]
    );
}

#[tokio::test]
async fn mixed_results_summarize_by_marker_prefix() {
    let engine = Arc::new(ScriptedEngine::default());
    engine.push_response(Ok(vec![
        "成功: /out/a.jpg".into(),
        "失败: /in/b.png - corrupt header".into(),
        "成功: /out/c.jpg".into(),
    ]));
    let compressor = session(engine);
    compressor
        .register_paths(vec![
            "/in/a.png".into(),
            "/in/b.png".into(),
            "/in/c.png".into(),
        ])
        .await
        .unwrap();
    compressor.set_output_dir("/out").await;

    let summary = compressor.compress().await.unwrap();
    assert_eq!(summary.success, 2);
    assert_eq!(summary.failure, 1);
    assert_eq!(summary.total(), 3);
    assert_eq!(compressor.summary().await, summary);

    // Lines are stored exactly as the engine emitted them.
    assert_eq!(
        compressor.results().await,
        vec![
            "成功: /out/a.jpg".to_string(),
            "失败: /in/b.png - corrupt header".to_string(),
            "成功: /out/c.jpg".to_string(),
        ]
    );
}

#[tokio::test]
async fn remove_and_clear_manage_the_working_set() {
    let engine = Arc::new(ScriptedEngine::default());
    let compressor = session(engine);
    compressor
        .register_paths(vec![
            "/in/a.png".into(),
            "/in/b.png".into(),
            "/in/c.png".into(),
        ])
        .await
        .unwrap();
    compressor.set_output_dir("/out").await;

    let removed = compressor.remove_file(1).await.unwrap();
    assert_eq!(removed.path, "/in/b.png");
    assert!(compressor.remove_file(9).await.is_none());

    compressor.compress().await.unwrap();
    assert_eq!(compressor.progress(), 100);
    assert!(!compressor.results().await.is_empty());

    compressor.clear().await;
    assert_eq!(compressor.file_count().await, 0);
    assert!(compressor.results().await.is_empty());
    assert_eq!(compressor.progress(), 0);
}

#[tokio::test]
async fn cancelled_dialogs_change_nothing() {
    let engine = Arc::new(ScriptedEngine::default());
    let compressor = session(engine);

    assert_eq!(compressor.select_files().await.unwrap(), 0);
    assert!(compressor.select_output_dir().await.is_none());
    assert_eq!(compressor.file_count().await, 0);
    assert_eq!(compressor.output_dir().await, "");
}

#[tokio::test]
async fn picked_files_flow_through_registration() {
    let engine = Arc::new(ScriptedEngine::default());
    let dialogs = Arc::new(PresetDialogs {
        images: vec!["/pick/a.png".into(), "/pick/a.png".into(), "/in/z.jpg".into()],
        directory: "/picked".into(),
    });
    let compressor = Compressor::with_services(engine, Arc::new(SizeByPath), dialogs);

    compressor
        .register_paths(vec!["/in/z.jpg".into()])
        .await
        .unwrap();

    // The duplicate inside the pick and the already registered path both
    // collapse away.
    assert_eq!(compressor.select_files().await.unwrap(), 1);
    assert_eq!(compressor.file_count().await, 2);

    assert_eq!(
        compressor.select_output_dir().await.as_deref(),
        Some("/picked")
    );
    assert_eq!(compressor.output_dir().await, "/picked");
}

#[tokio::test]
async fn drop_events_feed_registration() {
    let engine = Arc::new(ScriptedEngine::default());
    let compressor = Arc::new(session(engine));
    let notifier = Arc::new(RecordingNotifier::default());
    let (drops, events) = mpsc::channel(4);
    let listener = DropListener::bind(compressor.clone(), events, notifier.clone());

    drops
        .send(DropEvent {
            paths: vec!["/in/a.png".into(), "/in/b.JPG".into()],
        })
        .await
        .unwrap();

    let mut registered = 0;
    for _ in 0..200 {
        registered = compressor.file_count().await;
        if registered == 2 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(registered, 2);
    assert!(notifier.notices().is_empty());

    listener.close().await;
}

#[tokio::test]
async fn one_bad_path_rejects_the_whole_drop() {
    let engine = Arc::new(ScriptedEngine::default());
    let compressor = Arc::new(session(engine));
    let notifier = Arc::new(RecordingNotifier::default());
    let (drops, events) = mpsc::channel(4);
    let listener = DropListener::bind(compressor.clone(), events, notifier.clone());

    drops
        .send(DropEvent {
            paths: vec!["/in/a.png".into(), "/doc/notes.txt".into()],
        })
        .await
        .unwrap();
    // Sentinel event: once it lands, the rejected one has been handled.
    drops
        .send(DropEvent {
            paths: vec!["/in/ok.png".into()],
        })
        .await
        .unwrap();

    let mut files = Vec::new();
    for _ in 0..200 {
        files = compressor.files().await;
        if !files.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path, "/in/ok.png");

    let notices = notifier.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);

    listener.close().await;
}

#[tokio::test]
async fn closed_listener_stops_consuming_events() {
    let engine = Arc::new(ScriptedEngine::default());
    let compressor = Arc::new(session(engine));
    let notifier = Arc::new(RecordingNotifier::default());
    let (drops, events) = mpsc::channel(4);
    let listener = DropListener::bind(compressor.clone(), events, notifier);

    listener.close().await;

    let send = drops
        .send(DropEvent {
            paths: vec!["/in/a.png".into()],
        })
        .await;
    assert!(send.is_err());
    assert_eq!(compressor.file_count().await, 0);
}

#[tokio::test]
async fn invalid_options_are_refused() {
    let engine = Arc::new(ScriptedEngine::default());
    let compressor = session(engine);

    let mut options = CompressionOptions::default();
    options.quality = 0;
    let err = compressor.set_options(options).await.unwrap_err();
    assert!(matches!(err, CompressorError::Validation(_)));

    // The stored options are untouched.
    assert_eq!(compressor.options().await.quality, 80);
}
