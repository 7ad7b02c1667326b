// Renders the ranked month buckets as a plain-text message
use crate::fares::Fare;
use crate::ranking::MonthBucket;

pub const NO_FLIGHTS_MARKER: &str = "No flights for this month";
pub const MONTH_RULE: &str = "------------------------------------------";

fn leg_line(fare: &Fare) -> String {
    format!(
        "{} ---> {} {} {:.2}{}\n",
        fare.departure_airport.name,
        fare.arrival_airport.name,
        fare.departure_date.replacen('T', " ", 1),
        fare.price.value,
        fare.price.currency_symbol
    )
}

pub fn build_message(buckets: &[MonthBucket]) -> String {
    let mut message = String::new();

    for bucket in buckets {
        message.push_str(bucket.month.name());
        message.push('\n');

        if bucket.is_empty() {
            message.push_str(NO_FLIGHTS_MARKER);
            message.push('\n');
        }

        for trip in &bucket.trips {
            message.push_str(&leg_line(&trip.outbound));
            message.push_str(&leg_line(&trip.inbound));
            message.push_str(&format!(
                "Total: {:.2}{}\n",
                trip.combined_price(),
                trip.outbound.price.currency_symbol
            ));
            message.push('\n');
        }

        message.push_str(MONTH_RULE);
        message.push('\n');
    }

    message
}
