// Cross-joins outbound and return fares into round trips
use crate::error::ScoutError;
use crate::fares::Fare;
use chrono::{Duration, NaiveDateTime};

// Open interval of acceptable trip lengths, in whole days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationWindow {
    pub min_days: u32,
    pub max_days: u32,
}

impl DurationWindow {
    pub fn new(min_days: u32, max_days: u32) -> Result<Self, ScoutError> {
        if min_days == 0 {
            return Err(ScoutError::Config(
                "minimum trip length must be greater than 0 days".to_string(),
            ));
        }
        if max_days <= min_days {
            return Err(ScoutError::Config(format!(
                "maximum trip length ({} days) must be greater than minimum ({} days)",
                max_days, min_days
            )));
        }
        Ok(Self { min_days, max_days })
    }

    // Both bounds are exclusive
    pub fn contains(&self, trip: Duration) -> bool {
        trip > Duration::days(i64::from(self.min_days)) && trip < Duration::days(i64::from(self.max_days))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TripCandidate {
    pub outbound: Fare,
    pub inbound: Fare,
    pub departure: NaiveDateTime,
    pub return_departure: NaiveDateTime,
}

impl TripCandidate {
    pub fn combined_price(&self) -> f64 {
        self.outbound.price.value + self.inbound.price.value
    }

    pub fn duration(&self) -> Duration {
        self.return_departure - self.departure
    }
}

fn parse_departure(fare: &Fare) -> Result<NaiveDateTime, ScoutError> {
    fare.departure_time().map_err(|_| ScoutError::DateParse {
        flight: fare.label(),
        field: "departureDate",
        value: fare.departure_date.clone(),
    })
}

/// Returns every (outbound, return) pair whose return leaves strictly after
/// the outbound and strictly inside `window`.
///
/// Candidates come out in outbound-major order. Any unparseable departure
/// timestamp fails the whole call.
pub fn pair_trips(
    outbound_fares: &[Fare],
    return_fares: &[Fare],
    window: DurationWindow,
) -> Result<Vec<TripCandidate>, ScoutError> {
    // Parse everything up front so a bad timestamp fails even when the other side is empty
    let outbound_times = outbound_fares
        .iter()
        .map(parse_departure)
        .collect::<Result<Vec<_>, _>>()?;
    let return_times = return_fares
        .iter()
        .map(parse_departure)
        .collect::<Result<Vec<_>, _>>()?;

    let mut trips = Vec::new();
    for (outbound, departure) in outbound_fares.iter().zip(&outbound_times) {
        for (inbound, return_departure) in return_fares.iter().zip(&return_times) {
            if departure >= return_departure {
                continue;
            }
            if !window.contains(*return_departure - *departure) {
                continue;
            }

            trips.push(TripCandidate {
                outbound: outbound.clone(),
                inbound: inbound.clone(),
                departure: *departure,
                return_departure: *return_departure,
            });
        }
    }

    Ok(trips)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fares::test_support::{outbound_fare, return_fare};
    use test_case::test_case;

    fn fares(dates: &[&str], make: fn(&str, f64) -> Fare) -> Vec<Fare> {
        dates.iter().map(|date| make(date, 100.0)).collect()
    }

    fn default_window() -> DurationWindow {
        DurationWindow::new(3, 15).unwrap()
    }

    #[test_case(
        &["2024-10-05T19:15:00", "2024-10-06T11:25:00", "2024-11-11T06:25:00", "2024-11-12T06:25:00"],
        &["2024-10-12T19:15:00", "2024-10-10T11:25:00", "2024-11-16T06:25:00", "2024-11-18T06:25:00"],
        8; "#1 two months of cross pairs")]
    #[test_case(
        &["2024-10-05T19:15:00", "2024-10-06T11:25:00", "2024-10-07T06:25:00", "2024-10-08T06:25:00"],
        &["2024-10-12T19:15:00", "2024-10-13T11:25:00", "2024-10-14T06:25:00", "2024-10-15T06:25:00"],
        16; "#2 every combination matches")]
    #[test_case(
        &["2024-10-25T19:15:00", "2024-12-02T11:25:00", "2024-12-02T06:25:00", "2024-11-12T06:25:00"],
        &["2024-10-28T19:15:00", "2024-12-17T11:25:00", "2024-12-01T06:25:00", "2025-11-16T06:25:00"],
        0; "#3 transition between deadlines")]
    #[test_case(
        &["2024-10-29T19:15:00", "2024-12-01T11:25:00", "2024-12-02T06:25:00", "2024-04-02T06:25:00"],
        &["2024-10-29T19:15:00", "2024-12-10T11:25:00", "2024-12-02T06:25:00", "2024-12-02T06:25:00"],
        2; "#4 two trips")]
    #[test_case(
        &["2024-10-25T19:15:00", "2024-12-01T11:25:00", "2024-12-02T06:25:00", "2024-11-12T06:25:00"],
        &["2024-10-29T19:15:00", "2024-12-10T11:25:00", "2024-12-02T06:25:00", "2024-11-14T06:25:00"],
        3; "#5 three trips")]
    fn test_pair_counts(outbound_dates: &[&str], return_dates: &[&str], expected: usize) {
        let trips = pair_trips(
            &fares(outbound_dates, outbound_fare),
            &fares(return_dates, return_fare),
            default_window(),
        )
        .unwrap();
        assert_eq!(trips.len(), expected);

        for trip in &trips {
            assert!(trip.departure < trip.return_departure);
            assert!(default_window().contains(trip.duration()));
        }
    }

    #[test]
    fn test_two_by_two_scenario() {
        let outbound = fares(&["2024-10-05T19:15:00", "2024-10-06T11:25:00"], outbound_fare);
        let returns = fares(&["2024-10-12T19:15:00", "2024-10-10T11:25:00"], return_fare);

        let trips = pair_trips(&outbound, &returns, default_window()).unwrap();
        assert_eq!(trips.len(), 4);

        // Outbound-major order
        let order: Vec<(&str, &str)> = trips
            .iter()
            .map(|t| (t.outbound.departure_date.as_str(), t.inbound.departure_date.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("2024-10-05T19:15:00", "2024-10-12T19:15:00"),
                ("2024-10-05T19:15:00", "2024-10-10T11:25:00"),
                ("2024-10-06T11:25:00", "2024-10-12T19:15:00"),
                ("2024-10-06T11:25:00", "2024-10-10T11:25:00"),
            ]
        );
    }

    #[test_case("2024-10-04T10:00:00", 0; "#1 exactly min days")]
    #[test_case("2024-10-04T10:00:01", 1; "#2 one second over min")]
    #[test_case("2024-10-16T09:59:59", 1; "#3 one second under max")]
    #[test_case("2024-10-16T10:00:00", 0; "#4 exactly max days")]
    #[test_case("2024-10-01T10:00:00", 0; "#5 same instant")]
    #[test_case("2024-09-25T10:00:00", 0; "#6 return before outbound")]
    fn test_window_boundaries(return_date: &str, expected: usize) {
        let outbound = vec![outbound_fare("2024-10-01T10:00:00", 100.0)];
        let returns = vec![return_fare(return_date, 100.0)];

        let trips = pair_trips(&outbound, &returns, default_window()).unwrap();
        assert_eq!(trips.len(), expected);
    }

    #[test]
    fn test_invalid_timestamp_aborts() {
        let outbound = vec![outbound_fare("2024-10-01T10:00:00", 100.0)];
        let returns = vec![
            return_fare("2024-10-08T10:00:00", 100.0),
            return_fare("2024-10-09 10:00", 100.0),
        ];

        match pair_trips(&outbound, &returns, default_window()) {
            Err(ScoutError::DateParse { flight, field, value }) => {
                assert_eq!(flight, "FR1001 ALC->WMI 2024-10-09 10:00");
                assert_eq!(field, "departureDate");
                assert_eq!(value, "2024-10-09 10:00");
            }
            other => panic!("Expected date parse error, got {:?}", other),
        }

        // Still rejected when there is nothing to pair with
        let result = pair_trips(&[], &returns, default_window());
        assert!(matches!(result, Err(ScoutError::DateParse { .. })));
    }

    #[test]
    fn test_duration_window_validation() {
        assert!(DurationWindow::new(3, 15).is_ok());
        assert!(matches!(DurationWindow::new(0, 15), Err(ScoutError::Config(_))));
        assert!(matches!(DurationWindow::new(5, 5), Err(ScoutError::Config(_))));
        assert!(matches!(DurationWindow::new(10, 4), Err(ScoutError::Config(_))));
    }

    #[test]
    fn test_combined_price() {
        let outbound = vec![outbound_fare("2024-10-01T10:00:00", 120.5)];
        let returns = vec![return_fare("2024-10-06T10:00:00", 80.25)];

        let trips = pair_trips(&outbound, &returns, default_window()).unwrap();
        assert_eq!(trips[0].combined_price(), 200.75);
        assert_eq!(trips[0].duration(), Duration::days(5));
    }
}
