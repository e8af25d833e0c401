mod common;

use common::{day, record};
use proptest::prelude::*;
use pt_covid_data::data::{aggregate::{aggregate, merge}, records::RawRecord};

#[test]
fn municipalities_in_same_district_and_date_are_summed() {
    let records = vec![
        record("Lisboa", "Lisboa", day(1), 10, 40),
        record("Sintra", "Lisboa", day(1), 5, 25),
        record("Porto", "Porto", day(1), 8, 30),
    ];

    let rows = aggregate(&records).unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].district, "Lisboa");
    assert_eq!(rows[0].date, day(1));
    assert_eq!(rows[0].confirmed_cumulative, 15);
    assert_eq!(rows[0].awaiting_results_cumulative, 65);
    assert_eq!(rows[1].district, "Porto");
    assert_eq!(rows[1].confirmed_cumulative, 8);
}

#[test]
fn different_dates_stay_separate() {
    let records = vec![
        record("Sintra", "Lisboa", day(2), 6, 26),
        record("Lisboa", "Lisboa", day(1), 10, 40),
        record("Sintra", "Lisboa", day(1), 5, 25),
    ];

    let rows = aggregate(&records).unwrap();

    let dates: Vec<_> = rows.iter().map(|r| r.date).collect();
    assert_eq!(dates, vec![day(1), day(2)]);
    assert_eq!(rows[1].confirmed_cumulative, 6);
}

fn arb_record() -> impl Strategy<Value = RawRecord> {
    (
        prop::sample::select(vec!["Lisboa", "Sintra", "Porto", "Gaia", "Braga"]),
        prop::sample::select(vec!["Lisboa", "Porto", "Braga"]),
        1u32..6,
        0i64..10_000,
        0i64..10_000,
    )
        .prop_map(|(m, d, dd, c, a)| record(m, d, day(dd), c, a))
}

proptest! {
    #[test]
    fn aggregation_is_associative(
        records in prop::collection::vec(arb_record(), 0..60),
        split in 0usize..60,
    ) {
        let split = split.min(records.len());
        let (left, right) = records.split_at(split);
        let whole = aggregate(&records).unwrap();
        let pieced = merge(aggregate(left).unwrap(), aggregate(right).unwrap()).unwrap();
        prop_assert_eq!(whole, pieced);
    }

    #[test]
    fn one_row_per_district_and_date(records in prop::collection::vec(arb_record(), 0..60)) {
        let rows = aggregate(&records).unwrap();
        let mut keys: Vec<_> = rows.iter().map(|r| (r.district.clone(), r.date)).collect();
        let before = keys.len();
        keys.dedup();
        prop_assert_eq!(before, keys.len());
        let total: i64 = records.iter().map(|r| r.confirmed_cumulative).sum();
        prop_assert_eq!(total, rows.iter().map(|r| r.confirmed_cumulative).sum::<i64>());
    }
}
