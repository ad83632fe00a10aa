use chrono::{Local, NaiveDateTime, Timelike};

use crate::{Error, Result, StickerGeometry};

/// A generated batch: metadata plus its serials in generation order.
///
/// Persisting batches is the job of an external store; this type only carries
/// what the exports need.
///
/// Deserialization goes through the same checks as [`Batch::with_timestamp`],
/// so a document with repeated serials is rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "BatchRepr"))]
pub struct Batch {
    pub id: u64,
    pub name: String,
    /// Local time, truncated to whole seconds.
    pub created_at: NaiveDateTime,
    pub geometry_name: String,
    serials: Vec<String>,
}

impl Batch {
    /// Creates a batch stamped with the current local time.
    ///
    /// A blank or missing `name` falls back to [`Self::default_name`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `serials` contains a duplicate.
    pub fn new(
        id: u64,
        name: Option<&str>,
        geometry: &StickerGeometry,
        serials: Vec<String>,
    ) -> Result<Self> {
        let now = Local::now().naive_local();
        Self::with_timestamp(id, name, geometry, serials, now)
    }

    /// Like [`Self::new`] with an explicit creation time.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `serials` contains a duplicate.
    pub fn with_timestamp(
        id: u64,
        name: Option<&str>,
        geometry: &StickerGeometry,
        serials: Vec<String>,
        created_at: NaiveDateTime,
    ) -> Result<Self> {
        Self::from_parts(id, name, geometry.name.clone(), serials, created_at)
    }

    fn from_parts(
        id: u64,
        name: Option<&str>,
        geometry_name: String,
        serials: Vec<String>,
        created_at: NaiveDateTime,
    ) -> Result<Self> {
        let mut seen = std::collections::HashSet::with_capacity(serials.len());
        if let Some(dup) = serials.iter().find(|s| !seen.insert(s.as_str())) {
            return Err(Error::invalid(format!(
                "batch contains duplicate serial {dup}"
            )));
        }

        let created_at = created_at.with_nanosecond(0).unwrap_or(created_at);
        let name = match name.map(str::trim) {
            Some(name) if !name.is_empty() => name.to_owned(),
            _ => Self::default_name(created_at),
        };
        Ok(Self {
            id,
            name,
            created_at,
            geometry_name,
            serials,
        })
    }

    /// `Batch <YYYYmmdd_HHMMSS>` for the given creation time.
    pub fn default_name(created_at: NaiveDateTime) -> String {
        format!("Batch {}", created_at.format("%Y%m%d_%H%M%S"))
    }

    pub fn serials(&self) -> &[String] {
        &self.serials
    }

    pub fn count(&self) -> usize {
        self.serials.len()
    }

    /// Creation time as `YYYY-mm-dd HH:MM`, for listings.
    pub fn created_display(&self) -> String {
        self.created_at.format("%Y-%m-%d %H:%M").to_string()
    }

    pub fn into_serials(self) -> Vec<String> {
        self.serials
    }
}

/// Unchecked wire form of [`Batch`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct BatchRepr {
    id: u64,
    name: String,
    created_at: NaiveDateTime,
    geometry_name: String,
    serials: Vec<String>,
}

#[cfg(feature = "serde")]
impl TryFrom<BatchRepr> for Batch {
    type Error = Error;

    fn try_from(repr: BatchRepr) -> Result<Self> {
        Self::from_parts(
            repr.id,
            Some(&repr.name),
            repr.geometry_name,
            repr.serials,
            repr.created_at,
        )
    }
}

/// File stem of the printable sheet for a geometry: spaces become
/// underscores and `_sheet` is appended.
pub fn sheet_file_name(geometry_name: &str) -> String {
    format!("{}_sheet", geometry_name.replace(' ', "_"))
}
