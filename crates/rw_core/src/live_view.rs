use crate::record::ArticleRecord;

/// Project the bounded live view from the full archive.
///
/// Pure function: stable-sorts a copy by date descending and truncates to
/// `limit`. The stable sort keeps archive insertion order for equal dates, so
/// the result matches the archive's own ordering. Recomputed from the complete
/// archive on every run; never maintained incrementally.
pub fn project(records: &[ArticleRecord], limit: usize) -> Vec<ArticleRecord> {
    let mut view: Vec<ArticleRecord> = records.to_vec();
    view.sort_by(|a, b| b.date.cmp(&a.date));
    view.truncate(limit);
    view
}
