//! A [`PageCanvas`] that records draw operations as a JSON sheet manifest.
//!
//! The manifest lists, page by page, where each symbol and caption goes in
//! PDF points. A downstream renderer (or a print shop template) rasterises
//! the symbols named in it; this binary does not link a PDF or QR backend.

use serde::Serialize;
use serialsheet::{PageCanvas, SymbolEncoder};
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("begin_page called while page {0} is open")]
    PageAlreadyOpen(usize),
    #[error("{0} called with no open page")]
    NoOpenPage(&'static str),
    #[error("cannot save while page {0} is open")]
    UnclosedPage(usize),
    #[error("identifier {0:?} cannot name a symbol file")]
    UnsafeIdentifier(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Reference to the raster a symbol should be drawn from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SymbolRef {
    /// Data the symbol encodes.
    pub payload: String,
    /// Where the raster is expected, relative to the manifest.
    pub raster: String,
}

/// Maps each identifier to `<dir>/<identifier>.png`.
#[derive(Clone, Debug)]
pub struct ManifestEncoder {
    dir: PathBuf,
}

impl ManifestEncoder {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl SymbolEncoder for ManifestEncoder {
    type Image = SymbolRef;
    type Error = ManifestError;

    fn encode(&self, identifier: &str) -> Result<SymbolRef, ManifestError> {
        if identifier.is_empty()
            || identifier == "."
            || identifier == ".."
            || identifier.contains(['/', '\\'])
        {
            return Err(ManifestError::UnsafeIdentifier(identifier.to_owned()));
        }
        let raster = self.dir.join(format!("{identifier}.png"));
        Ok(SymbolRef {
            payload: identifier.to_owned(),
            raster: raster.to_string_lossy().into_owned(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    Image {
        #[serde(flatten)]
        symbol: SymbolRef,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Label {
        text: String,
        x: f64,
        y: f64,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ManifestPage {
    pub index: usize,
    pub ops: Vec<DrawOp>,
}

#[derive(Serialize)]
struct Manifest<'a> {
    unit: &'static str,
    page_width: f64,
    page_height: f64,
    pages: &'a [ManifestPage],
}

/// Collects pages in memory and writes them on [`PageCanvas::save`].
#[derive(Clone, Debug)]
pub struct ManifestCanvas {
    page_width: f64,
    page_height: f64,
    pages: Vec<ManifestPage>,
    open: Option<ManifestPage>,
}

impl ManifestCanvas {
    /// `page_width` and `page_height` are in points.
    pub fn new((page_width, page_height): (f64, f64)) -> Self {
        Self {
            page_width,
            page_height,
            pages: Vec::new(),
            open: None,
        }
    }

    /// Finished pages.
    pub fn pages(&self) -> &[ManifestPage] {
        &self.pages
    }

    fn open_page(&mut self, op: &'static str) -> Result<&mut ManifestPage, ManifestError> {
        self.open.as_mut().ok_or(ManifestError::NoOpenPage(op))
    }
}

impl PageCanvas for ManifestCanvas {
    type Image = SymbolRef;
    type Error = ManifestError;

    fn begin_page(&mut self) -> Result<(), ManifestError> {
        if let Some(page) = &self.open {
            return Err(ManifestError::PageAlreadyOpen(page.index));
        }
        self.open = Some(ManifestPage {
            index: self.pages.len(),
            ops: Vec::new(),
        });
        Ok(())
    }

    fn draw_image(
        &mut self,
        image: &SymbolRef,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<(), ManifestError> {
        self.open_page("draw_image")?.ops.push(DrawOp::Image {
            symbol: image.clone(),
            x,
            y,
            width,
            height,
        });
        Ok(())
    }

    fn draw_label(&mut self, text: &str, x: f64, y: f64) -> Result<(), ManifestError> {
        self.open_page("draw_label")?.ops.push(DrawOp::Label {
            text: text.to_owned(),
            x,
            y,
        });
        Ok(())
    }

    fn end_page(&mut self) -> Result<(), ManifestError> {
        let page = self.open.take().ok_or(ManifestError::NoOpenPage("end_page"))?;
        self.pages.push(page);
        Ok(())
    }

    fn save(&mut self, path: &Path) -> Result<PathBuf, ManifestError> {
        if let Some(page) = &self.open {
            return Err(ManifestError::UnclosedPage(page.index));
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let manifest = Manifest {
            unit: "pt",
            page_width: self.page_width,
            page_height: self.page_height,
            pages: &self.pages,
        };
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, &manifest)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serialsheet::{PageSize, RenderOptions, SheetLayout, StickerGeometry, render_sheet};

    fn render(serials: &[&str], rows: usize, cols: usize) -> ManifestCanvas {
        let geometry = StickerGeometry::new("test", 20.0, 20.0, 5.0, 5.0, rows, cols);
        let sheet = SheetLayout::new(&geometry, PageSize::A4).unwrap();
        let placements = sheet.place(serials);
        let mut canvas = ManifestCanvas::new(sheet.page_size());
        render_sheet(
            &placements,
            &ManifestEncoder::new("symbols"),
            &mut canvas,
            &RenderOptions::default(),
        )
        .unwrap();
        canvas
    }

    #[test]
    fn records_one_page_per_grid_fill() {
        let canvas = render(&["A1", "B2", "C3", "D4", "E5"], 2, 2);
        let pages = canvas.pages();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].index, 0);
        assert_eq!(pages[1].index, 1);
        // image + label per sticker
        assert_eq!(pages[0].ops.len(), 8);
        assert_eq!(pages[1].ops.len(), 2);
        match &pages[1].ops[0] {
            DrawOp::Image { symbol, .. } => assert_eq!(symbol.payload, "E5"),
            other => panic!("expected image, got {other:?}"),
        }
        match &pages[1].ops[1] {
            DrawOp::Label { text, .. } => assert_eq!(text, "E5"),
            other => panic!("expected label, got {other:?}"),
        }
    }

    #[test]
    fn encoder_names_rasters_after_identifiers() {
        let symbol = ManifestEncoder::new("out/symbols").encode("K3Q9").unwrap();
        assert_eq!(symbol.payload, "K3Q9");
        assert_eq!(
            PathBuf::from(symbol.raster),
            Path::new("out/symbols").join("K3Q9.png")
        );
    }

    #[test]
    fn encoder_rejects_path_like_identifiers() {
        let encoder = ManifestEncoder::new("symbols");
        for id in ["", "..", "a/b", "a\\b"] {
            assert!(matches!(
                encoder.encode(id),
                Err(ManifestError::UnsafeIdentifier(_))
            ));
        }
    }

    #[test]
    fn canvas_enforces_page_protocol() {
        let mut canvas = ManifestCanvas::new((100.0, 100.0));
        assert!(matches!(
            canvas.draw_label("x", 0.0, 0.0),
            Err(ManifestError::NoOpenPage("draw_label"))
        ));
        canvas.begin_page().unwrap();
        assert!(matches!(
            canvas.begin_page(),
            Err(ManifestError::PageAlreadyOpen(0))
        ));
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            canvas.save(&dir.path().join("sheet.json")),
            Err(ManifestError::UnclosedPage(0))
        ));
        canvas.end_page().unwrap();
        assert!(canvas.end_page().is_err());
    }

    #[test]
    fn save_writes_tagged_json() {
        let mut canvas = render(&["A1", "B2", "C3"], 2, 2);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("test_sheet.json");

        let written = canvas.save(&path).unwrap();
        assert_eq!(written, path);

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["unit"], "pt");
        assert_eq!(value["pages"].as_array().unwrap().len(), 1);
        let first = &value["pages"][0]["ops"][0];
        assert_eq!(first["op"], "image");
        assert_eq!(first["payload"], "A1");
        assert_eq!(value["pages"][0]["ops"][1]["op"], "label");
    }
}
