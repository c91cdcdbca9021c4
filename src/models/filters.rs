/// Filter criteria for the artwork metadata store.
///
/// Text fields are case-insensitive substring matches; the year range is
/// inclusive on both ends; `sources` is set membership (empty = no source
/// restriction).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArtworkFilter {
    pub artist: Option<String>,
    pub title: Option<String>,
    pub inventory_number: Option<String>,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    pub sources: Vec<String>,
}

impl ArtworkFilter {
    pub fn is_empty(&self) -> bool {
        self.artist.is_none()
            && self.title.is_none()
            && self.inventory_number.is_none()
            && self.year_from.is_none()
            && self.year_to.is_none()
            && self.sources.is_empty()
    }
}
