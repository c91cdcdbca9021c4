use serde::{Deserialize, Serialize};

/// Raw artwork row as returned by the metadata store.
///
/// Collection records are patchy: everything except the inventory number
/// may be missing. Display fallbacks are applied when building a summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtworkRecord {
    pub inventory_number: String,
    pub title: Option<String>,
    pub artist: Option<String>,
    /// Free-text dating as catalogued ("ca. 1630", "1880-1890", ...).
    pub dating: Option<String>,
    /// Normalized creation year, when one could be derived from the dating.
    pub year: Option<i32>,
    /// Source collection the record came from.
    pub source: Option<String>,
    /// Image path, either absolute or relative to the image base URL.
    pub image_path: Option<String>,
}

/// Display-ready artwork summary for result previews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtworkSummary {
    pub inventory_number: String,
    pub title: String,
    pub artist: String,
    pub dating: String,
    pub image_url: String,
}

impl ArtworkRecord {
    /// Build the display summary, filling gaps with neutral placeholder text.
    pub fn to_summary(&self, image_base_url: &str) -> ArtworkSummary {
        ArtworkSummary {
            inventory_number: self.inventory_number.clone(),
            title: self
                .title
                .clone()
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| "Untitled".to_string()),
            artist: self
                .artist
                .clone()
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| "Unknown Artist".to_string()),
            dating: self
                .dating
                .clone()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| "N/A".to_string()),
            image_url: join_image_url(image_base_url, self.image_path.as_deref().unwrap_or("")),
        }
    }
}

/// Join an image path onto the base URL. Absolute URLs pass through.
fn join_image_url(base: &str, path: &str) -> String {
    if path.is_empty() || path.starts_with("http") {
        return path.to_string();
    }
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}
