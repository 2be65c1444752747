/// TriInk terminal viewer and converter
///
/// `triink [FILE]` opens the interactive viewer (the demo tetrahedron when
/// no file is given). The `export-vf`, `export-inserter` and `stats`
/// subcommands run without a terminal UI.
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use triink_core::{Viewer, ViewerConfig};
use triink_terminal::TerminalApp;

#[derive(Parser)]
#[command(name = "triink")]
#[command(about = "Software OBJ viewer with vertex/face and scene-insertion exports", long_about = None)]
struct Cli {
    /// TOML config file; flags override its values
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Option<Command>,

    /// Mesh to open in the viewer
    file: Option<PathBuf>,
}

#[derive(Args, Default)]
struct Overrides {
    /// Maximum triangles kept on load (clamped to 50..=50000)
    #[arg(long, global = true)]
    limit: Option<i64>,

    /// Field of view in degrees (clamped to 20..=140)
    #[arg(long, global = true)]
    fov: Option<f64>,

    /// Draw every triangle in one flat colour
    #[arg(long, global = true)]
    no_colors: bool,

    /// Enable backface culling
    #[arg(long, global = true)]
    cull: bool,

    /// Spin the model continuously
    #[arg(long, global = true)]
    auto_rotate: bool,

    /// Mesh identifier for the scene-insertion export (clamped to 1..=999)
    #[arg(long, global = true)]
    mesh_id: Option<i64>,

    /// Set the cull flag in the scene-insertion export
    #[arg(long, global = true)]
    backcull: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Open the interactive viewer
    View {
        file: Option<PathBuf>,
        /// Directory for in-session exports
        #[arg(long, default_value = ".")]
        export_dir: PathBuf,
    },
    /// Print the vertex/face export of a mesh
    ExportVf {
        file: PathBuf,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the scene-insertion script for a mesh
    ExportInserter {
        file: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print vertex, triangle and skipped-line counts
    Stats { file: PathBuf },
}

impl Overrides {
    fn apply(&self, mut config: ViewerConfig) -> ViewerConfig {
        if let Some(limit) = self.limit {
            config.triangle_limit = limit;
        }
        if let Some(fov) = self.fov {
            config.fov_degrees = fov;
        }
        if let Some(mesh_id) = self.mesh_id {
            config.mesh_id = mesh_id;
        }
        if self.no_colors {
            config.colors = false;
        }
        if self.cull {
            config.backface_cull = true;
        }
        if self.auto_rotate {
            config.auto_rotate = true;
        }
        if self.backcull {
            config.insert_backcull = true;
        }
        config.sanitized()
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let base = match &cli.config {
        Some(path) => ViewerConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ViewerConfig::default(),
    };
    let config = cli.overrides.apply(base);

    match cli.command {
        None => view(config, cli.file.as_deref(), PathBuf::from(".")),
        Some(Command::View { file, export_dir }) => view(config, file.as_deref(), export_dir),
        Some(Command::ExportVf { file, output }) => {
            let viewer = open(config, &file)?;
            emit(&viewer.export_vertex_face(), output.as_deref())
        }
        Some(Command::ExportInserter { file, output }) => {
            let viewer = open(config, &file)?;
            emit(&viewer.export_scene_inserter(), output.as_deref())
        }
        Some(Command::Stats { file }) => {
            let mut viewer = Viewer::new(config);
            let report = viewer
                .load_path(&file)
                .with_context(|| format!("Failed to load OBJ {}", file.display()))?;
            println!("Parsed: {} verts, {} tris", report.parsed_vertices, report.parsed_triangles);
            println!("Kept: {} verts, {} tris", report.vertices, report.triangles);
            println!("Skipped lines: {}", report.skipped_lines);
            Ok(())
        }
    }
}

fn open(config: ViewerConfig, file: &Path) -> Result<Viewer> {
    let mut viewer = Viewer::new(config);
    viewer
        .load_path(file)
        .with_context(|| format!("Failed to load OBJ {}", file.display()))?;
    Ok(viewer)
}

fn emit(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, text)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            let mut out = std::io::stdout().lock();
            out.write_all(text.as_bytes())?;
            out.flush()?;
            Ok(())
        }
    }
}

fn view(config: ViewerConfig, file: Option<&Path>, export_dir: PathBuf) -> Result<()> {
    let viewer = match file {
        Some(path) => open(config, path)?,
        None => Viewer::with_demo(config),
    };

    let mut app = TerminalApp::new(viewer, export_dir).context("failed to start terminal")?;
    app.run().context("terminal session failed")?;
    Ok(())
}
