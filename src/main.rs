use anyhow::Context;
use gcodeview::{
    init_logging, LayerProgress, PlaybackJob, ToolpathModel, ToolpathModelBuilder, Viewer,
    ViewerSettings, BUILD_DATE, BUILD_PROFILE, VERSION,
};
use glam::DVec3;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Cadence of simulated progress reports from the transport side
const PROGRESS_INTERVAL: Duration = Duration::from_millis(500);

/// Cadence of the UI refresh tick
const REFRESH_INTERVAL: Duration = Duration::from_millis(100);

const DEMO_STEPS: usize = 20;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;
    info!(
        "GCodeView {} ({} build, {})",
        VERSION, BUILD_PROFILE, BUILD_DATE
    );

    let settings = load_settings()?;
    let mut viewer = Viewer::new(settings);

    let model = synthetic_model(12, 16).context("building demo toolpath")?;
    let total_lines = model
        .layers()
        .last()
        .and_then(|layer| layer.last_line())
        .unwrap_or(0);
    viewer.load_model(model);
    viewer.fit();
    viewer.set_visible_layer_count(usize::MAX);
    viewer.begin_job();

    let job = PlaybackJob::new(total_lines, DEMO_STEPS);
    let handle = viewer.progress_handle();
    let mut producer = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(PROGRESS_INTERVAL);
        for step in 0..job.steps() {
            ticker.tick().await;
            handle.set_from_progress(job.line_for_step(step));
        }
    });

    let mut refresh = tokio::time::interval(REFRESH_INTERVAL);
    loop {
        tokio::select! {
            _ = refresh.tick() => {
                if viewer.take_redraw_request() {
                    log_frame(&viewer);
                }
            }
            result = &mut producer => {
                result.context("progress task failed")?;
                break;
            }
        }
    }

    if viewer.take_redraw_request() {
        log_frame(&viewer);
    }
    info!("Playback finished");
    Ok(())
}

fn load_settings() -> anyhow::Result<ViewerSettings> {
    let path = match std::env::args().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => match ViewerSettings::default_path() {
            Ok(path) => path,
            Err(e) => {
                warn!("No configuration directory ({}), using defaults", e);
                return Ok(ViewerSettings::default());
            }
        },
    };

    ViewerSettings::load_or_default(&path)
        .with_context(|| format!("loading settings from {}", path.display()))
}

/// Square spiral toolpath: `layers` layers of `segments` moves each
fn synthetic_model(layers: usize, segments: usize) -> gcodeview::Result<ToolpathModel> {
    let mut builder = ToolpathModelBuilder::new();
    let mut line = 1;
    let mut position = DVec3::new(80.0, 80.0, 0.0);

    for layer in 0..layers {
        let z = 0.2 * (layer + 1) as f64;
        for segment in 0..segments {
            let side = 40.0 - segment as f64;
            let next = match segment % 4 {
                0 => DVec3::new(80.0 + side, position.y, z),
                1 => DVec3::new(position.x, 80.0 + side, z),
                2 => DVec3::new(80.0 - side, position.y, z),
                _ => DVec3::new(position.x, 80.0 - side, z),
            };
            builder.push_move(line, position, next);
            position = next;
            line += 1;
        }
        // Travel moves and comments between layers
        line += 3;
    }

    builder.build()
}

fn log_frame(viewer: &Viewer) {
    let Some(plan) = viewer.draw_plan() else {
        return;
    };
    let count = |progress: LayerProgress| {
        plan.layers
            .iter()
            .filter(|layer| layer.progress == progress)
            .count()
    };

    info!(
        "Cutoff {} vertices: {} printed, {} partial, {} pending layers",
        plan.cutoff,
        count(LayerProgress::Printed),
        count(LayerProgress::Partial),
        count(LayerProgress::Unprinted)
    );
}
