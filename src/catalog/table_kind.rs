use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::CatalogError;

/// Classification of a catalog table. Determines which entry fields are
/// meaningful; the entry itself stores the tag without interpreting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    Structured,
    Video,
    Image,
    Document,
    Pdf,
    SystemStructured,
    MaterializedView,
}

impl TableKind {
    pub const ALL: [TableKind; 7] = [
        TableKind::Structured,
        TableKind::Video,
        TableKind::Image,
        TableKind::Document,
        TableKind::Pdf,
        TableKind::SystemStructured,
        TableKind::MaterializedView,
    ];

    /// Persisted tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            TableKind::Structured => "structured",
            TableKind::Video => "video",
            TableKind::Image => "image",
            TableKind::Document => "document",
            TableKind::Pdf => "pdf",
            TableKind::SystemStructured => "system_structured",
            TableKind::MaterializedView => "materialized_view",
        }
    }

    /// Stable numeric code, for consumers that store the kind as an integer.
    pub fn code(&self) -> u8 {
        match self {
            TableKind::Video => 1,
            TableKind::Structured => 2,
            TableKind::Image => 3,
            TableKind::Document => 4,
            TableKind::Pdf => 5,
            TableKind::SystemStructured => 6,
            TableKind::MaterializedView => 7,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        TableKind::ALL.iter().copied().find(|k| k.code() == code)
    }

    /// Tables backed by media files rather than rows.
    pub fn is_media(&self) -> bool {
        matches!(self, TableKind::Video | TableKind::Image | TableKind::Document | TableKind::Pdf)
    }

    pub fn is_view(&self) -> bool { matches!(self, TableKind::MaterializedView) }
}

impl Display for TableKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for TableKind {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        // Accept the upper-case enum spellings used by SQL front ends too
        let tag = lower.strip_suffix("_data").unwrap_or(&lower);
        match tag {
            "structured" => Ok(TableKind::Structured),
            "video" => Ok(TableKind::Video),
            "image" => Ok(TableKind::Image),
            "document" => Ok(TableKind::Document),
            "pdf" => Ok(TableKind::Pdf),
            "system_structured" => Ok(TableKind::SystemStructured),
            "materialized_view" => Ok(TableKind::MaterializedView),
            _ => Err(CatalogError::invalid(format!("unknown table kind '{}'", s))),
        }
    }
}
