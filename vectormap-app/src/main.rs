use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use vectormap::prelude::*;

/// Headless vectormap driver: renders a view into a call log, runs road and
/// location searches and reports what lies under a pixel
#[derive(Parser, Debug)]
#[command(version)]
struct Cli {
    /// Store document with objects, locations and a gazetteer
    #[arg(long, default_value = "demos/roads.json")]
    data: PathBuf,

    /// Layer style document; the bundled style when omitted
    #[arg(long)]
    style: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Clone)]
struct ViewArgs {
    #[arg(long, default_value = "42.3610", allow_hyphen_values = true)]
    lat: f64,

    #[arg(long, default_value = "-71.0890", allow_hyphen_values = true)]
    lon: f64,

    /// Zoom level, 1 (country) to 10 (street)
    #[arg(long, default_value = "8")]
    zoom: u8,

    #[arg(long, default_value = "800")]
    width: u32,

    #[arg(long, default_value = "600")]
    height: u32,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Draw one frame and print the draw calls
    Render {
        #[command(flatten)]
        view: ViewArgs,

        /// Skip labels, as during an animation
        #[arg(long, default_value_t = false)]
        geometry_only: bool,

        /// Print every call rather than a summary
        #[arg(long, default_value_t = false)]
        verbose: bool,
    },
    /// Resolve a free-text address such as "150 Main St Cambridge MA", or
    /// words naming a place such as "books"
    Search {
        query: String,

        /// Slide the view to the first result and report the frames drawn
        #[arg(long, default_value_t = false)]
        show: bool,
    },
    /// Report the object under a device pixel
    Hit {
        #[command(flatten)]
        view: ViewArgs,

        #[arg(long)]
        x: i16,

        #[arg(long)]
        y: i16,

        /// Open the balloon when a pin is hit
        #[arg(long, default_value_t = false)]
        select: bool,
    },
}

fn load_document(path: &Path) -> Result<StoreDocument> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("reading store document {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("parsing {}", path.display()))
}

fn load_scene(path: Option<&Path>) -> Result<Scene> {
    match path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading style {}", path.display()))?;
            Ok(Scene::from_json(&json)?)
        }
        None => Ok(Scene::default_style()?),
    }
}

fn build_map(scene: Scene, view: &ViewArgs) -> Result<Map> {
    let view = MapView::new(
        WorldPoint::new(view.lat, view.lon),
        view.zoom,
        Dimensions::new(view.width, view.height),
    )
    .context("invalid view")?;
    Ok(Map::new(view, scene, MapConfig::default()))
}

fn describe(call: &DrawCall) -> String {
    match call {
        DrawCall::Fill {
            style,
            texture_origin,
        } => format!(
            "fill {:?} origin ({:.1}, {:.1})",
            style.color, texture_origin.x, texture_origin.y
        ),
        DrawCall::Polyline { points, style } => format!(
            "polyline {} pts width {:.1}",
            points.len(),
            style.line_width
        ),
        DrawCall::Polygon { points, .. } => format!("polygon {} pts", points.len()),
        DrawCall::Label { text, anchor, .. } => {
            format!("label '{}' at ({}, {})", text, anchor.x, anchor.y)
        }
    }
}

fn render(
    store: &MemoryStore,
    scene: Scene,
    view: &ViewArgs,
    geometry_only: bool,
    verbose: bool,
) -> Result<()> {
    let mut map = build_map(scene, view)?;
    map.refresh(store)?;

    let flags = if geometry_only {
        DrawFlags::GEOMETRY
    } else {
        DrawFlags::ALL
    };
    let mut backend = RecordingBackend::new();
    let stats = map.draw(&mut backend, flags)?;

    let metrics = map.render_metrics()?;
    let zoom = metrics.zoom_row()?;
    println!(
        "zoom {} ({}), bucket {}, {} deg/px",
        zoom.level,
        zoom.scale_label(),
        zoom.style_bucket,
        metrics.degrees_per_pixel()
    );
    if verbose {
        for call in &backend.calls {
            println!("  {}", describe(call));
        }
    }
    println!(
        "{} steps: {} fills, {} polylines, {} polygons, {} labels ({} culled, {} clipped, {} skipped)",
        stats.steps,
        stats.fills,
        stats.polylines,
        stats.polygons,
        stats.labels,
        stats.culled,
        stats.clipped,
        stats.skipped
    );
    Ok(())
}

fn search(document: StoreDocument, scene: Scene, query: &str, show: bool) -> Result<()> {
    let gazetteer = document.gazetteer.clone();
    let store = MemoryStore::from_document(document);

    let results = search_all(query, &gazetteer, &store, &store)?;
    if results.is_empty() {
        println!("no match for '{}'", query);
        return Ok(());
    }
    for result in &results {
        let source = match result.source {
            MatchSource::Road { road_id, side } => format!("road {} [{:?}]", road_id, side),
            MatchSource::Location { location_id } => format!("location {}", location_id),
        };
        println!(
            "{} {}\n  {}",
            source,
            result.point,
            result.text.replace('\n', "\n  ")
        );
    }

    if show {
        let first = &results[0];
        let view = ViewArgs {
            lat: first.point.latitude,
            lon: first.point.longitude,
            zoom: first.zoom_level,
            width: 800,
            height: 600,
        };
        let mut map = build_map(scene, &view)?;
        // Start a little south so the session has somewhere to slide from
        map.pan_pixels(0.0, 120.0)?;
        let mut session = MapSession::new(map);

        let start = Instant::now();
        session.show_search_result(first, start)?;
        let mut backend = RecordingBackend::new();
        let mut frames = 0;
        for step in 0..=20u64 {
            let now = start + Duration::from_millis(step * 50);
            if let Some(flags) = session.tick(now) {
                session.render(&store, &mut backend, flags)?;
                frames += 1;
            }
        }
        println!(
            "slid to {} in {} frame(s), {} history entries",
            session.map().center(),
            frames,
            session.history().len()
        );
    }
    Ok(())
}

fn hit(
    store: &MemoryStore,
    scene: Scene,
    view: &ViewArgs,
    x: i16,
    y: i16,
    select: bool,
) -> Result<()> {
    let mut session = MapSession::new(build_map(scene, view)?);
    session.map_mut().refresh(store)?;

    let position = ScreenPoint::new(x, y);
    let border = session.border_direction(position);
    if border != Direction::None {
        println!("({}, {}) is on the {:?} scroll border", x, y, border);
    }

    match session.map().hit_test_screen(position) {
        Some(hit) => println!("{}: {:?}", hit.text, hit.kind),
        None => println!("nothing at ({}, {})", x, y),
    }

    if select {
        if let Some(outcome) = session.click(position) {
            println!("click: {:?}", outcome);
        }
        for selection in session.map().selections().iter() {
            println!(
                "balloon {} '{}' {:?}, {} link(s)",
                selection.location_id,
                selection.name,
                selection.info_box_rect,
                selection.urls.len()
            );
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let document = load_document(&cli.data)?;
    let scene = load_scene(cli.style.as_deref())?;
    log::info!(
        "loaded {} object(s) and {} location(s) from {}",
        document.objects.len(),
        document.locations.len(),
        cli.data.display()
    );

    match cli.command {
        Command::Render {
            view,
            geometry_only,
            verbose,
        } => {
            let store = MemoryStore::from_document(document);
            render(&store, scene, &view, geometry_only, verbose)
        }
        Command::Search { query, show } => search(document, scene, &query, show),
        Command::Hit { view, x, y, select } => {
            let store = MemoryStore::from_document(document);
            hit(&store, scene, &view, x, y, select)
        }
    }
}
