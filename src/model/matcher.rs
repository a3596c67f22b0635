// Free-text search over posts.
//
// A query matches when it occurs, ignoring case, anywhere in the post's search
// text: image name, owner, notes, every platform caption (enabled or not),
// tags and the status label, joined by spaces in that order.

use crate::model::post::Post;

impl Post {
    pub fn search_text(&self) -> String {
        let mut fields = vec![
            self.image_name.as_str(),
            self.owner.as_str(),
            self.notes.as_str(),
        ];
        fields.extend(self.platforms.values().map(|e| e.caption.as_str()));
        fields.extend(self.tags.iter().map(String::as_str));
        fields.push(self.status.label());
        fields.join(" ")
    }

    /// Case-insensitive substring match. Blank queries match everything.
    pub fn matches_search_term(&self, query: &str) -> bool {
        if query.trim().is_empty() {
            return true;
        }
        self.search_text()
            .to_lowercase()
            .contains(&query.to_lowercase())
    }
}
