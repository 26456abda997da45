use serde::Serialize;

/// One search match with its upcoming show count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    pub count: usize,
    pub data: Vec<SearchHit>,
}

impl SearchResults {
    pub fn new(data: Vec<SearchHit>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}

/// Case-insensitive substring match on a name. An empty term matches every name.
///
/// Case is folded in Rust since SQLite's `LIKE` and `lower()` only fold ASCII.
pub fn name_matches(name: &str, search_term: &str) -> bool {
    search_term.is_empty() || name.to_lowercase().contains(&search_term.to_lowercase())
}
