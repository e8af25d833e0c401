//! Cumulative to daily conversion with data-quality cleaning and report-lag cutoff.

use chrono::NaiveDate;
use tracing::debug;

use crate::data::records::{DistrictDailyCumulative, DistrictDailyRow};

/// Cumulative counters after renaming to the model's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelCounts {
    pub positive: i64,
    pub total: i64,
}

/// Map a district's cumulative row onto `positive`/`total`.
///
/// The service publishes no test volume, so `total` is the cumulative count of
/// samples awaiting lab results. That proxy is suspect; replace it here only.
pub fn model_counts(row: &DistrictDailyCumulative) -> ModelCounts {
    ModelCounts {
        positive: row.confirmed_cumulative,
        total: row.awaiting_results_cumulative,
    }
}

/// Turn per-district cumulative counts into cleaned daily deltas.
///
/// Each district is differenced on its own, ordered by date; its first date is
/// dropped. Negative deltas are floored at zero, rows with `positive >= total`
/// are zeroed, and only dates strictly before `run_date` are kept. Output is
/// ordered by (district, date).
pub fn normalize(series: &[DistrictDailyCumulative], run_date: NaiveDate) -> Vec<DistrictDailyRow> {
    let mut sorted: Vec<&DistrictDailyCumulative> = series.iter().collect();
    sorted.sort_by(|a, b| (&a.district, a.date).cmp(&(&b.district, b.date)));

    let mut clipped = 0usize;
    let mut zeroed = 0usize;
    let mut truncated = 0usize;
    let mut out = Vec::with_capacity(sorted.len());

    for pair in sorted.windows(2) {
        let (prev, cur) = (pair[0], pair[1]);
        if prev.district != cur.district {
            continue;
        }
        if cur.date >= run_date {
            truncated += 1;
            continue;
        }
        let before = model_counts(prev);
        let after = model_counts(cur);
        let d_positive = after.positive.saturating_sub(before.positive);
        let d_total = after.total.saturating_sub(before.total);
        if d_positive < 0 || d_total < 0 {
            clipped += 1;
        }
        let mut positive = d_positive.max(0) as u64;
        let mut total = d_total.max(0) as u64;
        if positive >= total && (positive, total) != (0, 0) {
            zeroed += 1;
            positive = 0;
            total = 0;
        }
        out.push(DistrictDailyRow {
            district: cur.district.clone(),
            date: cur.date,
            positive,
            total,
        });
    }

    debug!(
        input = series.len(),
        output = out.len(),
        clipped,
        zeroed,
        truncated,
        %run_date,
        "normalized district series"
    );
    out
}
