//! Grouping of readings into seven-day observation blocks.
//!
//! A block keeps taking readings until it has seen seven distinct calendar
//! days and the next reading falls on an eighth. Totals of a complete block
//! leave out every reading of its first day.

use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDate;

use crate::entities::block::{Block, BlockTotals};
use crate::entities::reading::Reading;

/// Number of distinct calendar days in a complete block
pub const BLOCK_DAYS: usize = 7;

/// Group readings into blocks, newest block first and newest reading first
/// within each block.
///
/// The input may be in any order and is not modified. Readings sharing an
/// identical timestamp keep their relative input order (stable sort) before
/// the display reversal.
pub fn compute_blocks(readings: &[Reading]) -> Vec<Block> {
    let mut sorted: Vec<Reading> = readings.to_vec();
    sorted.sort_by_key(|reading| reading.timestamp);

    let mut blocks = Vec::new();
    let mut current = OpenBlock::default();

    for reading in sorted {
        let day = reading.day_key();

        if current.days_seen.len() == BLOCK_DAYS && !current.days_seen.contains(&day) {
            if let Some(block) = std::mem::take(&mut current).close() {
                blocks.push(block);
            }
        }

        current.days_seen.insert(day);
        current.entries.push(reading);
    }

    if let Some(block) = current.close() {
        blocks.push(block);
    }

    blocks.reverse();
    blocks
}

/// Block still accepting readings, entries in chronological order
#[derive(Debug, Default)]
struct OpenBlock {
    entries: Vec<Reading>,
    days_seen: HashSet<NaiveDate>,
}

impl OpenBlock {
    /// Finalize the block. `None` when no reading was ever added.
    fn close(self) -> Option<Block> {
        let first_day = first_day(&self.days_seen)?;
        let is_complete = self.days_seen.len() == BLOCK_DAYS;

        let totals = is_complete.then(|| {
            self.entries
                .iter()
                .filter(|reading| reading.day_key() != first_day)
                .fold(BlockTotals::default(), |mut totals, reading| {
                    totals.add(reading);
                    totals
                })
        });

        let mut entries = self.entries;
        entries.reverse();

        Some(Block {
            entries,
            days_seen: self.days_seen.into_iter().collect::<BTreeSet<_>>(),
            totals,
            is_complete,
            first_day_excluded: first_day,
        })
    }
}

/// Earliest day of a block, picked from its day set at close time
fn first_day(days: &HashSet<NaiveDate>) -> Option<NaiveDate> {
    days.iter().min().copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDateTime};

    fn day(n: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(n)
    }

    fn at(n: i64, hour: u32, minute: u32) -> NaiveDateTime {
        day(n).and_hms_opt(hour, minute, 0).unwrap()
    }

    fn reading(id: i64, timestamp: NaiveDateTime, base: i32) -> Reading {
        Reading {
            id,
            user_name: Some("Ada".to_string()),
            dob: Some("1960-02-01".to_string()),
            comment: None,
            timestamp,
            systolic1: base,
            diastolic1: base - 40,
            systolic2: base - 2,
            diastolic2: base - 42,
        }
    }

    /// One reading per day on days 0..n, sys1 = 100, 102, 104, ...
    fn one_per_day(n: i64) -> Vec<Reading> {
        (0..n)
            .map(|i| reading(i + 1, at(i, 8, 0), 100 + 2 * i as i32))
            .collect()
    }

    fn ids(block: &Block) -> Vec<i64> {
        block.entries.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_empty_input_gives_no_blocks() {
        assert!(compute_blocks(&[]).is_empty());
    }

    #[test]
    fn test_single_entry_is_incomplete_block() {
        let blocks = compute_blocks(&[reading(1, at(0, 9, 30), 120)]);

        assert_eq!(blocks.len(), 1);
        let block = &blocks[0];
        assert!(!block.is_complete);
        assert!(block.totals.is_none());
        assert_eq!(block.days_seen, BTreeSet::from([day(0)]));
        assert_eq!(block.first_day_excluded, day(0));
    }

    #[test]
    fn test_seven_days_make_a_complete_block() {
        let blocks = compute_blocks(&one_per_day(7));

        assert_eq!(blocks.len(), 1);
        let block = &blocks[0];
        assert!(block.is_complete);
        assert_eq!(block.days_seen.len(), 7);
        assert_eq!(block.first_day_excluded, day(0));

        let totals = block.totals.unwrap();
        assert_eq!(totals.sys1, 102 + 104 + 106 + 108 + 110 + 112);
        assert_eq!(totals.sys1, 642);
        assert_eq!(totals.dia1, 642 - 6 * 40);
        assert_eq!(totals.sys2, 642 - 6 * 2);
        assert_eq!(totals.dia2, 642 - 6 * 42);
    }

    #[test]
    fn test_several_entries_on_first_day_stay_in_one_block() {
        let mut readings = one_per_day(7);
        readings.push(reading(99, at(0, 20, 0), 150));

        let blocks = compute_blocks(&readings);

        assert_eq!(blocks.len(), 1);
        let block = &blocks[0];
        assert_eq!(block.entries.len(), 8);
        assert!(block.is_complete);
        // both day-0 readings (100 and 150) are left out
        assert_eq!(block.totals.unwrap().sys1, 642);
    }

    #[test]
    fn test_eighth_day_opens_a_new_block() {
        let blocks = compute_blocks(&one_per_day(8));

        assert_eq!(blocks.len(), 2);

        let newest = &blocks[0];
        assert!(!newest.is_complete);
        assert!(newest.totals.is_none());
        assert_eq!(ids(newest), vec![8]);
        assert_eq!(newest.days_seen, BTreeSet::from([day(7)]));

        let oldest = &blocks[1];
        assert!(oldest.is_complete);
        assert_eq!(oldest.days_seen.len(), 7);
        assert_eq!(oldest.totals.unwrap().sys1, 642);
    }

    #[test]
    fn test_repeat_day_after_seven_does_not_close_block() {
        let mut readings = one_per_day(7);
        // extra readings on already-seen days, one of them after the seventh day began
        readings.push(reading(50, at(3, 23, 0), 130));
        readings.push(reading(51, at(6, 22, 0), 131));

        let blocks = compute_blocks(&readings);

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].entries.len(), 9);
        assert_eq!(blocks[0].totals.unwrap().sys1, 642 + 130 + 131);
    }

    #[test]
    fn test_ordering_is_newest_first_regardless_of_input_order() {
        let mut readings = one_per_day(10);
        readings.reverse();
        readings.swap(2, 7);

        let blocks = compute_blocks(&readings);

        assert_eq!(blocks.len(), 2);
        assert_eq!(ids(&blocks[0]), vec![10, 9, 8]);
        assert_eq!(ids(&blocks[1]), vec![7, 6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_same_input_in_any_order_gives_same_blocks() {
        let readings = one_per_day(15);
        let mut shuffled = readings.clone();
        shuffled.reverse();
        shuffled.rotate_left(4);

        let first = compute_blocks(&readings);
        let second = compute_blocks(&readings);
        let third = compute_blocks(&shuffled);

        assert_eq!(first, second);
        assert_eq!(first, third);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn test_times_on_same_date_share_a_day_key() {
        let readings = vec![
            reading(1, at(0, 0, 0), 120),
            reading(2, at(1, 7, 0), 120),
            reading(3, at(2, 7, 0), 120),
            reading(4, at(3, 7, 0), 120),
            reading(5, at(4, 7, 0), 120),
            reading(6, at(5, 7, 0), 120),
            reading(7, at(6, 0, 1), 120),
            reading(8, at(6, 23, 59), 120),
        ];

        let blocks = compute_blocks(&readings);

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].days_seen.len(), 7);
        assert_eq!(ids(&blocks[0]), vec![8, 7, 6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_gaps_between_days_do_not_matter() {
        // seven distinct days spread over a month still form one block
        let readings: Vec<Reading> = [0, 3, 4, 10, 17, 20, 29]
            .iter()
            .enumerate()
            .map(|(i, d)| reading(i as i64 + 1, at(*d, 12, 0), 110))
            .collect();

        let blocks = compute_blocks(&readings);

        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].is_complete);
        assert_eq!(blocks[0].first_day_excluded, day(0));
        assert_eq!(blocks[0].totals.unwrap().sys1, 6 * 110);
    }

    #[test]
    fn test_identical_timestamps_keep_input_order() {
        let stamp = at(0, 8, 0);
        let readings = vec![reading(1, stamp, 120), reading(2, stamp, 121)];

        let blocks = compute_blocks(&readings);

        // stable ascending sort, then reversed for display
        assert_eq!(ids(&blocks[0]), vec![2, 1]);
    }
}
