//! Shared test fixtures

use chrono::{FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

const WINTER_OFFSET_SECS: i32 = 3_600;
const SUMMER_OFFSET_SECS: i32 = 7_200;

/// Fixed-rule zone with one DST season in 2024
///
/// +01:00 in winter and +02:00 from 2024-03-31 to 2024-10-27. Local
/// 02:00-03:00 on 2024-03-31 does not exist, and local 02:00-03:00 on
/// 2024-10-27 happens twice.
#[derive(Debug, Clone, Copy)]
pub struct SeasonalZone;

fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(h, 0, 0))
        .unwrap()
}

fn offset(secs: i32) -> FixedOffset {
    FixedOffset::east_opt(secs).unwrap()
}

impl TimeZone for SeasonalZone {
    type Offset = FixedOffset;

    fn from_offset(_offset: &FixedOffset) -> Self {
        SeasonalZone
    }

    fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<FixedOffset> {
        self.offset_from_local_datetime(&local.and_time(NaiveTime::MIN))
    }

    fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
        let gap = at(2024, 3, 31, 2)..at(2024, 3, 31, 3);
        let overlap = at(2024, 10, 27, 2)..at(2024, 10, 27, 3);

        if gap.contains(local) {
            LocalResult::None
        } else if overlap.contains(local) {
            LocalResult::Ambiguous(offset(SUMMER_OFFSET_SECS), offset(WINTER_OFFSET_SECS))
        } else if *local >= gap.end && *local < overlap.start {
            LocalResult::Single(offset(SUMMER_OFFSET_SECS))
        } else {
            LocalResult::Single(offset(WINTER_OFFSET_SECS))
        }
    }

    fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
        self.offset_from_utc_datetime(&utc.and_time(NaiveTime::MIN))
    }

    fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
        let summer = at(2024, 3, 31, 1)..at(2024, 10, 27, 1);
        if summer.contains(utc) {
            offset(SUMMER_OFFSET_SECS)
        } else {
            offset(WINTER_OFFSET_SECS)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Offset;

    #[test]
    fn test_offsets_agree_in_both_directions() {
        let local = at(2024, 7, 1, 12);
        let utc = at(2024, 7, 1, 10);
        assert_eq!(
            SeasonalZone.offset_from_local_datetime(&local),
            LocalResult::Single(SeasonalZone.offset_from_utc_datetime(&utc))
        );
        assert_eq!(
            SeasonalZone.offset_from_utc_datetime(&utc).fix(),
            offset(SUMMER_OFFSET_SECS)
        );
    }
}
