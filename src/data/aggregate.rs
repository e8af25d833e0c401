//! Municipality to district roll-up.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::{
    data::records::{DistrictDailyCumulative, RawRecord},
    error::PipelineError,
};

type DistrictDay = (String, NaiveDate);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Counts {
    confirmed: i64,
    awaiting_results: i64,
}

impl Counts {
    fn checked_add(self, rhs: Counts) -> Option<Counts> {
        Some(Counts {
            confirmed: self.confirmed.checked_add(rhs.confirmed)?,
            awaiting_results: self.awaiting_results.checked_add(rhs.awaiting_results)?,
        })
    }
}

fn reduce<I>(pairs: I) -> Result<Vec<DistrictDailyCumulative>, PipelineError>
where
    I: IntoIterator<Item = (DistrictDay, Counts)>,
{
    let totals = pairs.into_iter().try_fold(
        BTreeMap::<DistrictDay, Counts>::new(),
        |mut acc, (key, counts)| {
            let sum = acc.get(&key).copied().unwrap_or_default().checked_add(counts);
            match sum {
                Some(sum) => {
                    acc.insert(key, sum);
                    Ok(acc)
                }
                None => Err(PipelineError::CounterOverflow {
                    district: key.0,
                    date: key.1,
                }),
            }
        },
    )?;
    Ok(totals
        .into_iter()
        .map(|((district, date), counts)| DistrictDailyCumulative {
            district,
            date,
            confirmed_cumulative: counts.confirmed,
            awaiting_results_cumulative: counts.awaiting_results,
        })
        .collect())
}

/// Sum cumulative counts across the municipalities of each district, one row
/// per (district, date), ordered by district then date. A sum that does not fit
/// in an `i64` is an error.
pub fn aggregate(records: &[RawRecord]) -> Result<Vec<DistrictDailyCumulative>, PipelineError> {
    reduce(records.iter().map(|r| {
        (
            (r.district.clone(), r.date),
            Counts {
                confirmed: r.confirmed_cumulative,
                awaiting_results: r.awaiting_results_cumulative,
            },
        )
    }))
}

/// Combine two aggregates, summing rows that share (district, date).
pub fn merge(
    left: Vec<DistrictDailyCumulative>,
    right: Vec<DistrictDailyCumulative>,
) -> Result<Vec<DistrictDailyCumulative>, PipelineError> {
    reduce(left.into_iter().chain(right).map(|row| {
        (
            (row.district, row.date),
            Counts {
                confirmed: row.confirmed_cumulative,
                awaiting_results: row.awaiting_results_cumulative,
            },
        )
    }))
}
