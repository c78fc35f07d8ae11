use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use phenoraster::buffer::Buffer;
use phenoraster::notes::render_notes;
use phenoraster::scene::Scene;

/// Render a scene description into piano-roll note events.
#[derive(Parser, Debug)]
#[command(name = "render-notes", version)]
struct Cli {
    /// Input scene JSON.
    scene: PathBuf,

    /// Output JSON path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Print the downsampled velocity grid to stderr, highest note on top.
    #[arg(long, default_value_t = false)]
    preview: bool,

    /// Log verbosity; repeat for more.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let scene = Scene::from_path(&cli.scene)
        .with_context(|| format!("load scene '{}'", cli.scene.display()))?;
    let buffer = scene.render().context("render scene")?;
    let notes = render_notes(
        &buffer,
        scene.note_offset[0],
        scene.note_offset[1],
        scene.pixel_width,
    );
    tracing::info!(notes = notes.len(), "rendered");

    if cli.preview {
        let mut stderr = std::io::stderr().lock();
        write_preview(&mut stderr, &buffer).context("write preview")?;
    }

    let json = serde_json::to_string_pretty(&notes)?;
    match cli.out {
        Some(out) => {
            if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            std::fs::write(&out, json).with_context(|| format!("write '{}'", out.display()))?;
            eprintln!("wrote {} notes to {}", notes.len(), out.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// One character per pixel, denser for higher velocity. Rows map to note
/// numbers, so the last buffer row is printed first.
fn write_preview(w: &mut impl std::io::Write, buffer: &Buffer) -> std::io::Result<()> {
    const RAMP: &[u8] = b" .:-=+*#%@";
    for y in (0..buffer.height() as i64).rev() {
        let row: String = (0..buffer.width() as i64)
            .map(|x| match buffer.phenotype_at(x, y) {
                None => ' ',
                Some(p) => {
                    let level = (p.velocity.clamp(0.0, 1.0) * (RAMP.len() - 1) as f64).round();
                    char::from(RAMP[level as usize])
                }
            })
            .collect();
        writeln!(w, "{}", row.trim_end())?;
    }
    Ok(())
}
