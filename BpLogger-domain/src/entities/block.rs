use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::reading::Reading;

/// Sums of the four measurements over a complete block, first day excluded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockTotals {
    pub sys1: i64,
    pub dia1: i64,
    pub sys2: i64,
    pub dia2: i64,
}

impl BlockTotals {
    /// Add one reading's measurements to the running sums
    pub fn add(&mut self, reading: &Reading) {
        self.sys1 += i64::from(reading.systolic1);
        self.dia1 += i64::from(reading.diastolic1);
        self.sys2 += i64::from(reading.systolic2);
        self.dia2 += i64::from(reading.diastolic2);
    }
}

/// One observation cycle: consecutive readings spanning up to seven calendar days.
///
/// Blocks are derived on every read and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Readings of the block, newest first
    pub entries: Vec<Reading>,

    /// Distinct calendar days covered by `entries`
    pub days_seen: BTreeSet<NaiveDate>,

    /// Present only when the block is complete
    pub totals: Option<BlockTotals>,

    /// True when the block spans exactly seven distinct days
    pub is_complete: bool,

    /// Chronologically first day of the block, left out of `totals`
    pub first_day_excluded: NaiveDate,
}
