//! Drives a [`SymbolEncoder`] and a [`PageCanvas`] over laid-out placements.
//!
//! Encoding is embarrassingly parallel and runs on scoped worker threads;
//! drawing is stateful and runs on the calling thread, strictly in placement
//! order. Every symbol is encoded before the canvas is touched, so an encoder
//! failure leaves the canvas untouched.

use std::thread;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{Error, PageCanvas, Placement, RenderError, Result, SymbolEncoder};

/// Default distance, in points, between a sticker's lower edge and its
/// caption.
pub const DEFAULT_LABEL_OFFSET: f64 = 12.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderOptions {
    /// Upper bound on encoder threads. `0` and `1` both encode inline.
    pub workers: usize,
    /// Print the serial as text under each symbol.
    pub labels: bool,
    pub label_offset: f64,
}

impl RenderOptions {
    pub const fn with_workers(self, workers: usize) -> Self {
        Self { workers, ..self }
    }

    pub const fn with_labels(self, labels: bool) -> Self {
        Self { labels, ..self }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            workers: 1,
            labels: true,
            label_offset: DEFAULT_LABEL_OFFSET,
        }
    }
}

/// What a successful [`render_sheet`] produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderSummary {
    pub pages: usize,
    pub placements: usize,
}

/// Encodes the identifier of every placement, returning images in placement
/// order.
///
/// Work is split into contiguous chunks across at most `workers` scoped
/// threads and joined before returning.
///
/// # Errors
///
/// Returns [`RenderError::Encode`] for the first failing identifier (in
/// placement order) or [`RenderError::WorkerPanicked`].
pub fn encode_all<E>(
    placements: &[Placement<'_>],
    encoder: &E,
    workers: usize,
) -> Result<Vec<E::Image>>
where
    E: SymbolEncoder,
{
    let workers = workers.clamp(1, placements.len().max(1));
    if workers == 1 {
        return encode_chunk(placements, encoder);
    }

    let chunk_len = placements.len().div_ceil(workers);
    thread::scope(|s| -> Result<Vec<E::Image>> {
        let handles: Vec<_> = placements
            .chunks(chunk_len)
            .map(|chunk| s.spawn(move || encode_chunk(chunk, encoder)))
            .collect();

        let mut images = Vec::with_capacity(placements.len());
        for handle in handles {
            let chunk = handle.join().map_err(|_| RenderError::WorkerPanicked)??;
            images.extend(chunk);
        }
        Ok(images)
    })
}

fn encode_chunk<E>(placements: &[Placement<'_>], encoder: &E) -> Result<Vec<E::Image>>
where
    E: SymbolEncoder,
{
    placements
        .iter()
        .map(|p| {
            encoder.encode(p.identifier).map_err(|e| {
                Error::from(RenderError::Encode {
                    identifier: p.identifier.to_owned(),
                    source: Box::new(e),
                })
            })
        })
        .collect()
}

fn canvas_error<T>(operation: &'static str) -> impl FnOnce(T) -> Error
where
    T: core::error::Error + Send + Sync + 'static,
{
    move |e| {
        RenderError::Canvas {
            operation,
            source: Box::new(e),
        }
        .into()
    }
}

/// Renders `placements` onto `canvas`.
///
/// `begin_page` is called exactly once before the first placement of each
/// page and `end_page` exactly once after its last, including a final partial
/// page. An empty slice opens no page. The caller saves the canvas.
///
/// Placements are only borrowed, so a failed render can be retried with the
/// same placements.
///
/// # Errors
///
/// - [`Error::InvalidArgument`] if page indices decrease along the slice.
/// - [`Error::Render`] if the encoder or the canvas fails.
#[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all, fields(count = placements.len(), workers = options.workers)))]
pub fn render_sheet<E, C>(
    placements: &[Placement<'_>],
    encoder: &E,
    canvas: &mut C,
    options: &RenderOptions,
) -> Result<RenderSummary>
where
    E: SymbolEncoder,
    C: PageCanvas<Image = E::Image>,
{
    if let Some(pair) = placements.windows(2).find(|pair| pair[1].page < pair[0].page) {
        return Err(Error::invalid(format!(
            "placement for {} on page {} follows page {}",
            pair[1].identifier, pair[1].page, pair[0].page
        )));
    }

    let images = encode_all(placements, encoder, options.workers)?;

    let mut current_page = None;
    let mut pages = 0;
    for (placement, image) in placements.iter().zip(&images) {
        if current_page != Some(placement.page) {
            if current_page.is_some() {
                canvas.end_page().map_err(canvas_error("end_page"))?;
            }
            canvas.begin_page().map_err(canvas_error("begin_page"))?;
            current_page = Some(placement.page);
            pages += 1;

            #[cfg(feature = "tracing")]
            tracing::trace!(page = placement.page, "began page");
        }

        canvas
            .draw_image(
                image,
                placement.x,
                placement.y,
                placement.width,
                placement.height,
            )
            .map_err(canvas_error("draw_image"))?;

        if options.labels {
            let (x, y) = placement.label_anchor(options.label_offset);
            canvas
                .draw_label(placement.identifier, x, y)
                .map_err(canvas_error("draw_label"))?;
        }
    }
    if current_page.is_some() {
        canvas.end_page().map_err(canvas_error("end_page"))?;
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(pages, placements = placements.len(), "rendered sheet");
    Ok(RenderSummary {
        pages,
        placements: placements.len(),
    })
}
