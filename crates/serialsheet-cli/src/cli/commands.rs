use crate::cli::config::{GenerateConfig, LayoutConfig};
use crate::cli::manifest::{ManifestCanvas, ManifestEncoder};
use anyhow::{Context, bail};
use serde::Serialize;
use serialsheet::{
    Batch, PageCanvas, Placement, RenderSummary, SerialGenerator, SheetLayout, StickerGeometry,
    ThreadRandom, render_sheet, sheet_file_name,
};
use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

/// Layout file contents: the geometry, the page and every placement.
#[derive(Serialize)]
struct LayoutDocument<'a> {
    sticker: &'a StickerGeometry,
    page_width: f64,
    page_height: f64,
    pages: usize,
    placements: &'a [Placement<'a>],
}

impl<'a> LayoutDocument<'a> {
    fn new(sticker: &'a StickerGeometry, sheet: &SheetLayout, placements: &'a [Placement<'a>]) -> Self {
        let (page_width, page_height) = sheet.page_size();
        Self {
            sticker,
            page_width,
            page_height,
            pages: sheet.page_count(placements.len()),
            placements,
        }
    }
}

/// Files written for one batch.
#[derive(Debug)]
pub struct BatchOutput {
    pub batch: Batch,
    pub folder: PathBuf,
    pub csv: PathBuf,
    pub layout: PathBuf,
    pub sheet: PathBuf,
    pub summary: RenderSummary,
}

pub fn presets() -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    for geometry in StickerGeometry::presets() {
        writeln!(stdout, "{}", geometry.description())?;
    }
    Ok(())
}

pub fn generate(config: &GenerateConfig) -> anyhow::Result<()> {
    let output = write_batch(config)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(
        stdout,
        "{}: {} serials on {} page(s) in {}",
        output.batch.name,
        output.batch.count(),
        output.summary.pages,
        output.folder.display()
    )?;
    writeln!(stdout, "{}", output.csv.display())?;
    writeln!(stdout, "{}", output.layout.display())?;
    writeln!(stdout, "{}", output.sheet.display())?;
    Ok(())
}

/// Generates a batch and writes `serials.csv`, `layout.json` and the sheet
/// manifest into `<out_dir>/<batch_id>/`.
///
/// Without an explicit id the batch takes the next free number. An existing
/// batch folder is only overwritten when `force` is set.
pub fn write_batch(config: &GenerateConfig) -> anyhow::Result<BatchOutput> {
    let sheet = SheetLayout::new(&config.geometry, config.page)?;
    let batch_id = match config.batch_id {
        Some(id) => id,
        None => next_batch_id(&config.out_dir)?,
    };
    let generator = SerialGenerator::from_components(ThreadRandom, config.alphabet, config.length);
    let serials = generator.generate(config.count)?;
    let batch = Batch::new(batch_id, config.name.as_deref(), &config.geometry, serials)?;

    tracing::info!(
        batch = batch.id,
        name = %batch.name,
        count = batch.count(),
        sticker = %config.geometry.description(),
        "generated batch"
    );

    let folder = config.out_dir.join(batch.id.to_string());
    claim_folder(&config.out_dir, &folder, config.force)?;

    let csv = folder.join("serials.csv");
    let file = File::create(&csv).with_context(|| format!("failed to create {}", csv.display()))?;
    batch.write_csv(BufWriter::new(file))?;

    let placements = sheet.place(batch.serials());
    let layout = folder.join("layout.json");
    write_json(&layout, &LayoutDocument::new(&config.geometry, &sheet, &placements))?;

    let encoder = ManifestEncoder::new("symbols");
    let mut canvas = ManifestCanvas::new(sheet.page_size());
    let summary = render_sheet(&placements, &encoder, &mut canvas, &config.render)?;
    let sheet_path = folder.join(format!("{}.json", sheet_file_name(&batch.geometry_name)));
    let sheet_path = canvas
        .save(&sheet_path)
        .with_context(|| format!("failed to write {}", sheet_path.display()))?;

    tracing::info!(
        pages = summary.pages,
        placements = summary.placements,
        folder = %folder.display(),
        "wrote batch output"
    );

    Ok(BatchOutput {
        batch,
        folder,
        csv,
        layout,
        sheet: sheet_path,
        summary,
    })
}

pub fn layout(config: &LayoutConfig) -> anyhow::Result<()> {
    let serials = read_serials(&config.input)?;
    let sheet = SheetLayout::new(&config.geometry, config.page)?;
    let placements = sheet.place(&serials);

    tracing::info!(
        count = placements.len(),
        pages = sheet.page_count(placements.len()),
        "laid out serials"
    );

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(
        &mut stdout,
        &LayoutDocument::new(&config.geometry, &sheet, &placements),
    )?;
    writeln!(stdout)?;
    Ok(())
}

/// One more than the highest numeric folder name under `out_dir`; `1` when
/// there is none or `out_dir` does not exist yet.
pub fn next_batch_id(out_dir: &Path) -> anyhow::Result<u64> {
    let entries = match fs::read_dir(out_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(1),
        Err(e) => return Err(e).with_context(|| format!("failed to list {}", out_dir.display())),
    };

    let mut highest = 0_u64;
    for entry in entries {
        let entry = entry.with_context(|| format!("failed to list {}", out_dir.display()))?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        if let Some(id) = entry.file_name().to_str().and_then(|n| n.parse::<u64>().ok()) {
            highest = highest.max(id);
        }
    }
    highest
        .checked_add(1)
        .context("no batch ids left under the output folder")
}

/// Creates `folder`, refusing to reuse an existing one unless `force` is set.
fn claim_folder(out_dir: &Path, folder: &Path, force: bool) -> anyhow::Result<()> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;
    match fs::create_dir(folder) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            if !force {
                bail!(
                    "batch folder {} already exists; pass --force to overwrite it",
                    folder.display()
                );
            }
            tracing::warn!(folder = %folder.display(), "overwriting existing batch output");
            Ok(())
        }
        Err(e) => Err(e).with_context(|| format!("failed to create {}", folder.display())),
    }
}

/// One serial per line; surrounding whitespace, blank lines and lines
/// starting with `#` are ignored.
pub fn read_serials(path: &Path) -> anyhow::Result<Vec<String>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_owned)
        .collect())
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
