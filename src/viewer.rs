//! The viewer shell: async loads feeding a cooperative render tick
//!
//! Loads run on background tasks and never block frame production. Each
//! request carries a sequence number; when a load completes, its prepared
//! generation is installed only if no newer request has been installed
//! already. A stale completion is built, then discarded, and never becomes
//! visible. Failures leave the previously displayed model active.

use std::f32::consts::TAU;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use vantage_assets::{LoadedModel, ProgressSink};
use vantage_view::{
    FrameSnapshot, HelperState, ModelStats, SceneLighting, SceneManager, VisualizationMode,
};

use crate::settings::ViewerSettings;

/// A finished load, successful or not, tagged with its request sequence.
struct LoadOutcome {
    seq: u64,
    file_name: String,
    result: anyhow::Result<LoadedModel>,
}

/// Owns the scene manager and drives it from load completions and mode
/// requests, one tick at a time.
pub struct Viewer {
    manager: SceneManager,
    lighting: SceneLighting,
    helpers: HelperState,
    outcome_tx: mpsc::UnboundedSender<LoadOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<LoadOutcome>,
    pending_mode: Option<VisualizationMode>,
    request_seq: u64,
    installed_seq: u64,
    in_flight: u64,
    turntable_speed: f32,
    spin: f32,
}

impl Viewer {
    pub fn new(settings: &ViewerSettings) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let mut viewer = Self {
            manager: SceneManager::new(settings.framing_config()),
            lighting: SceneLighting::default(),
            helpers: settings.helper_state(),
            outcome_tx,
            outcome_rx,
            pending_mode: None,
            request_seq: 0,
            installed_seq: 0,
            in_flight: 0,
            turntable_speed: settings.display.turntable_speed,
            spin: 0.0,
        };

        match settings.display.initial_mode.parse() {
            Ok(mode) => viewer.queue_mode(mode),
            Err(e) => error!("ignoring configured initial mode: {e}"),
        }
        viewer
    }

    /// Kick off a background load of the given file. Returns immediately;
    /// the result is applied by a later tick.
    pub fn request_load(&mut self, path: PathBuf) {
        self.request_seq += 1;
        let seq = self.request_seq;
        self.in_flight += 1;

        let tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            let result = load_file(&path, &file_name).await;
            let _ = tx.send(LoadOutcome {
                seq,
                file_name,
                result,
            });
        });
    }

    /// Ask for a visualization mode change; applied on the next tick.
    pub fn queue_mode(&mut self, mode: VisualizationMode) {
        self.pending_mode = Some(mode);
    }

    /// One cooperative frame: advance animation, apply any pending mode
    /// transition, absorb completed loads, and emit the frame snapshot.
    /// Nothing in here blocks.
    pub fn tick(&mut self, dt: f32) -> FrameSnapshot {
        self.spin = (self.spin + self.turntable_speed * dt) % TAU;

        if let Some(mode) = self.pending_mode.take() {
            if let Err(e) = self.manager.set_mode(mode) {
                error!("mode transition failed: {e}");
            }
        }

        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            self.apply_outcome(outcome);
        }

        self.manager.frame(self.spin, self.lighting, self.helpers)
    }

    fn apply_outcome(&mut self, outcome: LoadOutcome) {
        match outcome.result {
            Ok(model) => {
                let generation = self.manager.prepare(model);
                if outcome.seq > self.installed_seq {
                    self.installed_seq = outcome.seq;
                    if let Err(e) = self.manager.swap(generation) {
                        error!("failed to install '{}': {e}", outcome.file_name);
                    }
                } else {
                    debug!(
                        "'{}' was superseded by a newer load, discarding",
                        outcome.file_name
                    );
                    if let Err(e) = self.manager.discard(generation) {
                        error!("failed to discard superseded load: {e}");
                    }
                }
            }
            Err(e) => {
                // The previously displayed model stays active and interactive
                error!("failed to load '{}': {e:#}", outcome.file_name);
            }
        }
    }

    pub fn stats(&self) -> Option<&ModelStats> {
        self.manager.current().map(|generation| generation.stats())
    }

    pub fn manager(&self) -> &SceneManager {
        &self.manager
    }

    /// Loads requested but not yet applied by a tick
    pub fn pending_loads(&self) -> u64 {
        self.in_flight
    }

    #[cfg(test)]
    fn inject_outcome(&mut self, seq: u64, file_name: &str, result: anyhow::Result<LoadedModel>) {
        self.in_flight += 1;
        self.request_seq = self.request_seq.max(seq);
        let _ = self.outcome_tx.send(LoadOutcome {
            seq,
            file_name: file_name.to_string(),
            result,
        });
    }
}

/// Read and parse one model file off the render path. Progress percentages
/// are forwarded to the log; they carry no control-flow meaning.
async fn load_file(path: &Path, file_name: &str) -> anyhow::Result<LoadedModel> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    info!("loading '{}' ({} bytes)", file_name, bytes.len());

    let (progress, mut progress_rx) = ProgressSink::channel();
    let progress_name = file_name.to_string();
    let progress_task = tokio::spawn(async move {
        while let Some(update) = progress_rx.recv().await {
            debug!("loading {}: {}%", progress_name, update.percent);
        }
    });

    let parse_name = file_name.to_string();
    let model =
        tokio::task::spawn_blocking(move || vantage_assets::load(&bytes, &parse_name, &progress))
            .await??;

    let _ = progress_task.await;
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vantage_assets::load;

    const TRI_OBJ: &[u8] = b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
    const CUBE_OBJ: &[u8] = b"\
v -0.5 -0.5 -0.5
v  0.5 -0.5 -0.5
v  0.5  0.5 -0.5
v -0.5  0.5 -0.5
v -0.5 -0.5  0.5
v  0.5 -0.5  0.5
v  0.5  0.5  0.5
v -0.5  0.5  0.5
f 1 2 3 4
f 6 5 8 7
f 5 1 4 8
f 2 6 7 3
f 4 3 7 8
f 5 6 2 1
";

    fn model(bytes: &[u8], name: &str) -> LoadedModel {
        load(bytes, name, &ProgressSink::disabled()).unwrap()
    }

    fn viewer() -> Viewer {
        let mut viewer = Viewer::new(&ViewerSettings::default());
        viewer.turntable_speed = 0.0;
        viewer
    }

    #[tokio::test]
    async fn completed_load_installs_on_the_next_tick() {
        let mut viewer = viewer();
        viewer.inject_outcome(1, "tri.obj", Ok(model(TRI_OBJ, "tri.obj")));

        let frame = viewer.tick(0.016);
        assert!(frame.generation.is_some());
        assert_eq!(viewer.stats().unwrap().vertices, 3);
        assert_eq!(viewer.pending_loads(), 0);
    }

    #[tokio::test]
    async fn failed_load_keeps_the_previous_model_active() {
        let mut viewer = viewer();
        viewer.inject_outcome(1, "cube.obj", Ok(model(CUBE_OBJ, "cube.obj")));
        let before = viewer.tick(0.016).generation;

        // A truncated OBJ fails the parse wholesale
        let truncated = load(b"v 0 0\n", "broken.obj", &ProgressSink::disabled());
        viewer.inject_outcome(2, "broken.obj", truncated.map_err(Into::into));

        let after = viewer.tick(0.016);
        assert_eq!(after.generation, before);
        assert_eq!(viewer.stats().unwrap().file_name, "cube.obj");
    }

    #[tokio::test]
    async fn stale_completion_never_becomes_visible() {
        let mut viewer = viewer();

        // Request 2 (model B) completed first and installs
        viewer.inject_outcome(2, "b.obj", Ok(model(TRI_OBJ, "b.obj")));
        viewer.tick(0.016);
        let installed = viewer.tick(0.016).generation;

        // Request 1 (model A) completes late: prepared, then discarded
        viewer.inject_outcome(1, "a.obj", Ok(model(CUBE_OBJ, "a.obj")));
        let frame = viewer.tick(0.016);

        assert_eq!(frame.generation, installed);
        assert_eq!(viewer.stats().unwrap().file_name, "b.obj");

        // Everything the stale generation allocated has been released
        let registry = viewer.manager().registry();
        assert_eq!(
            registry.live_count(),
            viewer.manager().current().unwrap().handle_count()
        );
    }

    #[tokio::test]
    async fn later_request_completing_later_still_wins() {
        let mut viewer = viewer();
        viewer.inject_outcome(1, "a.obj", Ok(model(CUBE_OBJ, "a.obj")));
        viewer.tick(0.016);
        viewer.inject_outcome(2, "b.obj", Ok(model(TRI_OBJ, "b.obj")));
        viewer.tick(0.016);
        assert_eq!(viewer.stats().unwrap().file_name, "b.obj");
    }

    #[tokio::test]
    async fn mode_changes_apply_on_the_tick() {
        let mut viewer = viewer();
        viewer.inject_outcome(1, "cube.obj", Ok(model(CUBE_OBJ, "cube.obj")));
        viewer.tick(0.016);

        viewer.queue_mode(VisualizationMode::VertexCloud);
        let frame = viewer.tick(0.016);
        assert_eq!(frame.mode, VisualizationMode::VertexCloud);
        assert!(frame.overlay.is_some());
    }

    #[tokio::test]
    async fn background_load_round_trips_through_the_filesystem() {
        let dir = std::env::temp_dir();
        let path = dir.join("vantage_viewer_test_tri.obj");
        tokio::fs::write(&path, TRI_OBJ).await.unwrap();

        let mut viewer = viewer();
        viewer.request_load(path.clone());

        // Tick until the background task reports in
        for _ in 0..500 {
            viewer.tick(0.016);
            if viewer.pending_loads() == 0 {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }

        assert_eq!(viewer.pending_loads(), 0);
        assert_eq!(viewer.stats().unwrap().vertices, 3);
        let _ = tokio::fs::remove_file(&path).await;
    }
}
