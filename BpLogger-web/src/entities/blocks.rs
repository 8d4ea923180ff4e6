use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use bp_logger_domain::entities::{Block, BlockTotals, Reading};

/// Public representation of a logged entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PublicReading {
    /// Identifier assigned by the store
    pub id: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,

    /// Date of birth as entered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    /// When the entry was recorded (server local time)
    #[schema(value_type = String, example = "2024-03-01T07:30:00")]
    pub timestamp: NaiveDateTime,

    pub systolic1: i32,
    pub diastolic1: i32,
    pub systolic2: i32,
    pub diastolic2: i32,
}

/// Sums over a complete block, first day excluded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PublicBlockTotals {
    pub sys1: i64,
    pub dia1: i64,
    pub sys2: i64,
    pub dia2: i64,
}

/// Public representation of a seven-day block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PublicBlock {
    /// Entries of the block, newest first
    pub entries: Vec<PublicReading>,

    /// Distinct calendar days covered, oldest first
    #[schema(value_type = Vec<String>, example = json!(["2024-03-01", "2024-03-02"]))]
    pub days_seen: Vec<NaiveDate>,

    /// Present only for complete blocks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub totals: Option<PublicBlockTotals>,

    /// True when the block spans seven distinct days
    pub is_complete: bool,

    /// First day of the block, not counted in `totals`
    #[schema(value_type = String, example = "2024-03-01")]
    pub first_day_excluded: NaiveDate,
}

impl From<Reading> for PublicReading {
    fn from(reading: Reading) -> Self {
        Self {
            id: reading.id,
            user_name: reading.user_name,
            dob: reading.dob,
            comment: reading.comment,
            timestamp: reading.timestamp,
            systolic1: reading.systolic1,
            diastolic1: reading.diastolic1,
            systolic2: reading.systolic2,
            diastolic2: reading.diastolic2,
        }
    }
}

impl From<BlockTotals> for PublicBlockTotals {
    fn from(totals: BlockTotals) -> Self {
        Self {
            sys1: totals.sys1,
            dia1: totals.dia1,
            sys2: totals.sys2,
            dia2: totals.dia2,
        }
    }
}

impl From<Block> for PublicBlock {
    fn from(block: Block) -> Self {
        Self {
            entries: block.entries.into_iter().map(PublicReading::from).collect(),
            days_seen: block.days_seen.into_iter().collect(),
            totals: block.totals.map(PublicBlockTotals::from),
            is_complete: block.is_complete,
            first_day_excluded: block.first_day_excluded,
        }
    }
}
