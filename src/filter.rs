// User-driven narrowing of the cleaned snapshot. Every function copies the
// rows it keeps; the snapshot itself is never touched.
use crate::types::{CleanOrder, Traffic};
use chrono::NaiveDate;

/// Orders placed strictly before the cutoff date.
pub fn before_date(data: &[CleanOrder], cutoff: NaiveDate) -> Vec<CleanOrder> {
    data.iter()
        .filter(|o| o.order_date < cutoff)
        .cloned()
        .collect()
}

/// Orders whose traffic density is in the selected set.
pub fn with_traffic(data: &[CleanOrder], selected: &[Traffic]) -> Vec<CleanOrder> {
    data.iter()
        .filter(|o| selected.contains(&o.traffic))
        .cloned()
        .collect()
}
