use chrono::{DateTime, Duration, TimeZone, Utc};
use fifogains::entry::Entry;
use fifogains::fifo::{calculate_fifo, match_fifo};
use fifogains::file_entries::{read_file_entries, write_file_entries, FileEntries};
use fifogains::format::EntryFormat;
use fifogains::realized::{total_profit, Realized};
use proptest::prelude::*;

const EPS: f64 = 1e-9;

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 5, 17, 9, 30, 0).unwrap() + Duration::milliseconds(125)
}

fn entry(seconds: i64, volume: f64, price: f64, fee: f64) -> Entry {
    Entry::new(start() + Duration::seconds(seconds), volume, price, fee)
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPS,
        "expected {} got {}",
        expected,
        actual
    );
}

#[test]
fn one_buy_two_sells() {
    let buys = [entry(0, 10.0, 2.0, 0.1)];
    let sells = [entry(1, 5.0, 1.0, 0.05), entry(3, 5.0, 1.5, 0.08)];

    let realized = calculate_fifo(&buys, &sells);

    assert_eq!(
        realized,
        vec![
            Realized::new(buys[0].time, sells[0].time, 5.0, 2.0, 0.05, 1.0, 0.05),
            Realized::new(buys[0].time, sells[1].time, 5.0, 2.0, 0.05, 1.5, 0.08),
        ]
    );
}

#[test]
fn two_buys_one_sell() {
    let buys = [entry(0, 10.0, 2.0, 0.1), entry(0, 20.0, 3.0, 0.2)];
    let sells = [entry(1, 20.0, 4.0, 0.5)];

    let realized = calculate_fifo(&buys, &sells);

    assert_eq!(
        realized,
        vec![
            Realized::new(buys[0].time, sells[0].time, 10.0, 2.0, 0.1, 4.0, 10.0 / 20.0 * 0.5),
            Realized::new(
                buys[1].time,
                sells[0].time,
                10.0,
                3.0,
                10.0 / 20.0 * 0.2,
                4.0,
                10.0 / 20.0 * 0.5
            ),
        ]
    );
    // 10 * (4 - 2) + 10 * (4 - 3)
    assert_eq!(total_profit(&realized), 30.0);
}

#[test]
fn empty_side_gives_no_lots() {
    let some = [entry(0, 10.0, 2.0, 0.1)];
    assert!(calculate_fifo(&[], &some).is_empty());
    assert!(calculate_fifo(&some, &[]).is_empty());
    assert!(calculate_fifo(&[], &[]).is_empty());
}

#[test]
fn csv_round_trip_keeps_entries() {
    let expected = FileEntries {
        buy_entries: vec![entry(0, 10.0, 2.0, 0.1)],
        sell_entries: vec![entry(1, 5.0, 1.0, 0.05), entry(3, 5.0, 1.5, 0.08)],
    };

    // time, side, volume, price, fee
    let layouts = [
        EntryFormat::new(0, 2, 3, 4, 1, ','),
        EntryFormat::default(),
        EntryFormat::new(2, 0, 4, 1, 3, '\t'),
    ];
    for format in layouts.iter() {
        let mut text = Vec::new();
        write_file_entries(&mut text, &expected, format).unwrap();
        let entries = read_file_entries(text.as_slice(), format).unwrap();
        assert_eq!(entries, expected, "layout {:?}", format);
    }
}

#[test]
fn hand_written_rows_parse() {
    let text = "\
2023-05-17 09:30:00.125,buy,10,2,0.1
2023-05-17 09:30:01.125,sell,5,1,0.05
2023-05-17 09:30:03.125,sell,5,1.5,0.08
";
    let format = EntryFormat::new(0, 2, 3, 4, 1, ',');
    let entries = read_file_entries(text.as_bytes(), &format).unwrap();
    assert_eq!(entries.buy_entries, vec![entry(0, 10.0, 2.0, 0.1)]);
    assert_eq!(
        entries.sell_entries,
        vec![entry(1, 5.0, 1.0, 0.05), entry(3, 5.0, 1.5, 0.08)]
    );
}

#[test]
fn exchange_export_end_to_end() {
    const INPUT: &str = include_str!("data/trades.csv");
    let entries = read_file_entries(INPUT.as_bytes(), &EntryFormat::default()).unwrap();
    assert_eq!(entries.buy_entries.len(), 2);
    assert_eq!(entries.sell_entries.len(), 2);
    assert!(entries.is_time_ordered());

    let outcome = match_fifo(&entries.buy_entries, &entries.sell_entries);
    let volumes: Vec<f64> = outcome.realized.iter().map(|r| r.volume()).collect();
    assert_eq!(volumes.len(), 3);
    assert_close(volumes[0], 0.1);
    assert_close(volumes[1], 0.05);
    assert_close(volumes[2], 0.1);
    assert_close(outcome.realized[0].buy_fee(), 4.0);
    assert_close(outcome.realized[0].sell_fee(), 8.0);
    assert_close(outcome.realized[1].buy_fee(), 3.04);
    assert_close(total_profit(&outcome.realized), 3300.0);

    assert_eq!(outcome.unmatched_buys.len(), 1);
    assert_close(outcome.unmatched_buy_volume(), 0.05);
    assert_close(outcome.unmatched_buys[0].fee, 3.04);
    assert!(outcome.unmatched_sells.is_empty());
}

// (volume, price, fee); roughly one leg in five has zero volume
fn legs() -> impl Strategy<Value = Vec<(f64, f64, f64)>> {
    prop::collection::vec(
        (
            prop_oneof![1 => Just(0.0), 4 => 0.001f64..1_000.0],
            0.01f64..500.0,
            0.0f64..5.0,
        ),
        0..12,
    )
}

// buys land on even seconds and sells on odd ones, so a time identifies an entry
fn to_entries(legs: &[(f64, f64, f64)], offset: i64) -> Vec<Entry> {
    legs.iter()
        .enumerate()
        .map(|(i, &(volume, price, fee))| entry(offset + 2 * i as i64, volume, price, fee))
        .collect()
}

fn index_of(entries: &[Entry], time: DateTime<Utc>) -> usize {
    entries.iter().position(|e| e.time == time).unwrap()
}

fn near(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() <= 1e-9 * (1.0 + expected.abs())
}

proptest! {
    #[test]
    fn matched_volume_never_exceeds_entry_volume(buy_legs in legs(), sell_legs in legs()) {
        let (buys, sells) = (to_entries(&buy_legs, 0), to_entries(&sell_legs, 1));
        let realized = calculate_fifo(&buys, &sells);

        let mut used_buy = vec![0.0; buys.len()];
        let mut used_sell = vec![0.0; sells.len()];
        for r in realized.iter() {
            prop_assert!(r.volume() > 0.0);
            used_buy[index_of(&buys, r.buy_date())] += r.volume();
            used_sell[index_of(&sells, r.sell_date())] += r.volume();
        }
        for (used, e) in used_buy.iter().zip(buys.iter()) {
            prop_assert!(*used <= e.volume * (1.0 + 1e-9));
        }
        for (used, e) in used_sell.iter().zip(sells.iter()) {
            prop_assert!(*used <= e.volume * (1.0 + 1e-9));
        }
    }

    #[test]
    fn fees_are_proportional_to_volume(buy_legs in legs(), sell_legs in legs()) {
        let (buys, sells) = (to_entries(&buy_legs, 0), to_entries(&sell_legs, 1));
        for r in calculate_fifo(&buys, &sells).iter() {
            let buy = buys[index_of(&buys, r.buy_date())];
            let sell = sells[index_of(&sells, r.sell_date())];
            prop_assert!(buy.volume > 0.0 && sell.volume > 0.0);
            prop_assert!(near(r.buy_fee(), buy.fee * (r.volume() / buy.volume)));
            prop_assert!(near(r.sell_fee(), sell.fee * (r.volume() / sell.volume)));
            prop_assert_eq!(r.buy_price(), buy.price);
            prop_assert_eq!(r.sell_price(), sell.price);
        }
    }

    #[test]
    fn total_matched_is_smaller_side_total(buy_legs in legs(), sell_legs in legs()) {
        let (buys, sells) = (to_entries(&buy_legs, 0), to_entries(&sell_legs, 1));
        let total_buy: f64 = buys.iter().map(|e| e.volume).sum();
        let total_sell: f64 = sells.iter().map(|e| e.volume).sum();

        let outcome = match_fifo(&buys, &sells);
        let matched: f64 = outcome.realized.iter().map(|r| r.volume()).sum();
        prop_assert!(near(matched, total_buy.min(total_sell)));
        prop_assert!(near(matched + outcome.unmatched_sell_volume(), total_sell));
        prop_assert!(near(matched + outcome.unmatched_buy_volume(), total_buy));
    }

    #[test]
    fn lots_follow_fifo_order(buy_legs in legs(), sell_legs in legs()) {
        let (buys, sells) = (to_entries(&buy_legs, 0), to_entries(&sell_legs, 1));
        let realized = calculate_fifo(&buys, &sells);

        let mut consumed = 0.0;
        for pair in realized.windows(2) {
            let (b0, s0) = (
                index_of(&buys, pair[0].buy_date()),
                index_of(&sells, pair[0].sell_date()),
            );
            let (b1, s1) = (
                index_of(&buys, pair[1].buy_date()),
                index_of(&sells, pair[1].sell_date()),
            );
            prop_assert!(b1 >= b0 && s1 >= s0);
            // at least one side moves on, and only once exhausted
            prop_assert!(b1 > b0 || s1 > s0);
            consumed += pair[0].volume();
            if b1 > b0 {
                prop_assert!(buys[b0 + 1..b1].iter().all(|e| e.volume == 0.0));
                let bought: f64 = buys[..=b0].iter().map(|e| e.volume).sum();
                prop_assert!(near(consumed, bought));
            }
        }
    }
}
