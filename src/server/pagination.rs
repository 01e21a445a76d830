use serde::Deserialize;

pub const QUESTIONS_PER_PAGE: usize = 10;

/// `?page=N`, 1-based. Non-numeric values are rejected by the extractor.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
}

impl PageQuery {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1)
    }
}

/// Slice `[(page - 1) * 10, page * 10)` out of `items`. Page 0 and pages past
/// the end come back empty.
pub fn paginate<T>(page: u64, items: Vec<T>) -> Vec<T> {
    let Some(index) = page.checked_sub(1) else {
        return Vec::new();
    };
    let start = usize::try_from(index)
        .unwrap_or(usize::MAX)
        .saturating_mul(QUESTIONS_PER_PAGE);
    items
        .into_iter()
        .skip(start)
        .take(QUESTIONS_PER_PAGE)
        .collect()
}
