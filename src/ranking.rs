// Groups trips by departure month and keeps the cheapest per month
use crate::pairing::TripCandidate;
use chrono::{Datelike, Month, NaiveDate};

pub const DEFAULT_OFFERS_PER_MONTH: usize = 5;
pub const DEFAULT_LOOKAHEAD_MONTHS: u32 = 5;
// One bucket per calendar month; the year is not part of the key
pub const MAX_LOOKAHEAD_MONTHS: u32 = 12;

#[derive(Debug, Clone, PartialEq)]
pub struct MonthBucket {
    pub month: Month,
    pub trips: Vec<TripCandidate>,
}

impl MonthBucket {
    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }
}

/// Consecutive calendar months starting at the month of `today`, wrapping
/// December to January.
pub fn upcoming_months(today: NaiveDate, count: u32) -> Vec<Month> {
    let mut month = month_of(today.month());
    let mut months = Vec::with_capacity(count as usize);
    for _ in 0..count {
        months.push(month);
        month = month.succ();
    }
    months
}

fn month_of(number: u32) -> Month {
    // Datelike::month is always in 1..=12
    Month::try_from(number as u8).unwrap_or(Month::January)
}

/// Buckets `trips` by the outbound departure month, one bucket per month of
/// the lookahead window, in window order.
///
/// Each bucket is sorted ascending by combined price with a stable sort and
/// cut to at most `offers_per_month` entries. Months without trips still get
/// an empty bucket; trips outside the window are dropped.
pub fn rank_by_month(
    trips: &[TripCandidate],
    today: NaiveDate,
    lookahead_months: u32,
    offers_per_month: usize,
) -> Vec<MonthBucket> {
    upcoming_months(today, lookahead_months)
        .into_iter()
        .map(|month| {
            let mut month_trips: Vec<TripCandidate> = trips
                .iter()
                .filter(|trip| month_of(trip.departure.month()) == month)
                .cloned()
                .collect();

            month_trips.sort_by(|a, b| a.combined_price().total_cmp(&b.combined_price()));
            month_trips.truncate(offers_per_month);

            MonthBucket {
                month,
                trips: month_trips,
            }
        })
        .collect()
}
