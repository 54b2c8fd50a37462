use std::collections::HashMap;

/// Reserved counter offset for the memory and file backends; the first
/// allocated id is `BASE_ID + 1`.
pub(crate) const BASE_ID: i64 = 999;

/// The in-memory lookup structures shared by the memory and file backends.
///
/// `url_to_id` and `id_to_url` are exact inverses, `user_urls` keeps each
/// owner's ids in creation order, and `last_id` never goes backward. All
/// mutation goes through [`Tables::record`], which keeps the three maps and
/// the counter consistent in one step; callers serialize access with a
/// single mutex.
#[derive(Debug)]
pub(crate) struct Tables {
    last_id: i64,
    url_to_id: HashMap<String, i64>,
    id_to_url: HashMap<i64, String>,
    user_urls: HashMap<String, Vec<i64>>,
}

impl Tables {
    pub(crate) fn new() -> Self {
        Self {
            last_id: BASE_ID,
            url_to_id: HashMap::new(),
            id_to_url: HashMap::new(),
            user_urls: HashMap::new(),
        }
    }

    /// Returns the id already assigned to `url`, if any.
    pub(crate) fn id_for(&self, url: &str) -> Option<i64> {
        self.url_to_id.get(url).copied()
    }

    /// The id the next allocation will use.
    pub(crate) fn next_id(&self) -> i64 {
        self.last_id + 1
    }

    /// Inserts a mapping with an explicit id, bumping the counter to at
    /// least that id. Used both for fresh allocations and for replaying
    /// persisted entries on startup.
    pub(crate) fn record(&mut self, url: &str, user: &str, id: i64) {
        self.url_to_id.insert(url.to_owned(), id);
        self.id_to_url.insert(id, url.to_owned());
        self.user_urls.entry(user.to_owned()).or_default().push(id);
        self.last_id = self.last_id.max(id);
    }

    /// Allocates the next id for a previously-unseen URL.
    pub(crate) fn insert(&mut self, url: &str, user: &str) -> i64 {
        let id = self.next_id();
        self.record(url, user, id);
        id
    }

    pub(crate) fn lookup(&self, id: i64) -> Option<&str> {
        self.id_to_url.get(&id).map(String::as_str)
    }

    /// Ids owned by `user`, in creation order. Empty slice if none.
    pub(crate) fn urls_for(&self, user: &str) -> &[i64] {
        self.user_urls.get(user).map_or(&[], Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocates_from_base_offset() {
        let mut tables = Tables::new();
        assert_eq!(tables.insert("https://one.example", ""), 1000);
        assert_eq!(tables.insert("https://two.example", ""), 1001);
    }

    #[test]
    fn replay_bumps_counter_to_max() {
        let mut tables = Tables::new();
        tables.record("https://one.example", "", 1003);
        tables.record("https://two.example", "", 1001);

        assert_eq!(tables.insert("https://three.example", ""), 1004);
    }

    #[test]
    fn maps_stay_inverse() {
        let mut tables = Tables::new();
        let id = tables.insert("https://one.example", "u1");

        assert_eq!(tables.id_for("https://one.example"), Some(id));
        assert_eq!(tables.lookup(id), Some("https://one.example"));
    }

    #[test]
    fn user_ids_keep_creation_order() {
        let mut tables = Tables::new();
        let a = tables.insert("https://a.example", "u1");
        tables.insert("https://b.example", "u2");
        let c = tables.insert("https://c.example", "u1");

        assert_eq!(tables.urls_for("u1"), &[a, c]);
        assert!(tables.urls_for("nobody").is_empty());
    }
}
