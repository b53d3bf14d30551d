use serde::{Deserialize, Serialize};

use crate::link::LinkSterilizer;

/// MenuLinkRequest
///
/// Input payload for creating or editing a navigation menu entry. Only the step that
/// screens the link lives in this crate; persisting the entry is the caller's job.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct MenuLinkRequest {
    pub title: String,
    pub url: String,
    pub icon: String,
    pub display_order: i32,
    pub is_open_in_new_tab: bool,
}

impl MenuLinkRequest {
    /// sterilize
    ///
    /// Trims the title and url and replaces the url with its sterilized form. Must run
    /// before the entry is persisted, on both create and update.
    pub fn sterilize(self, sterilizer: &LinkSterilizer) -> Self {
        let raw = self.url.trim();
        let url = sterilizer.sterilize(raw);
        tracing::info!("Sterilized URL from '{}' to '{}'", self.url, url);

        Self {
            title: self.title.trim().to_string(),
            url,
            ..self
        }
    }
}
