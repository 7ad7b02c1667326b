// Fare data model shared by the search client and the pipeline stages
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// Fixed timestamp layout used by the fare search API (no offset, no zone)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

// Data structures for the fare search JSON response
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FareSearchResponse {
    pub fares: Vec<FareEntry>,
    #[serde(default)]
    pub next_page: Option<String>,
    #[serde(default)]
    pub size: usize,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct FareEntry {
    pub outbound: Fare,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Airport {
    pub iata_code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    pub value: f64,
    pub currency_code: String,
    pub currency_symbol: String,
}

// One priced one-way flight option
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fare {
    pub departure_airport: Airport,
    pub arrival_airport: Airport,
    pub departure_date: String,
    #[serde(default)]
    pub arrival_date: String,
    #[serde(default)]
    pub flight_number: String,
    pub price: Price,
}

impl Fare {
    /// Parses `departure_date` with [`TIMESTAMP_FORMAT`].
    pub fn departure_time(&self) -> Result<NaiveDateTime, chrono::ParseError> {
        NaiveDateTime::parse_from_str(&self.departure_date, TIMESTAMP_FORMAT)
    }

    // Short label used in logs and error messages
    pub fn label(&self) -> String {
        let flight = if self.flight_number.is_empty() {
            "?"
        } else {
            self.flight_number.as_str()
        };
        format!(
            "{} {}->{} {}",
            flight, self.departure_airport.iata_code, self.arrival_airport.iata_code, self.departure_date
        )
    }
}

impl From<FareSearchResponse> for Vec<Fare> {
    fn from(item: FareSearchResponse) -> Self {
        item.fares.into_iter().map(|entry| entry.outbound).collect()
    }
}

// A currency the report is expressed in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Currency {
    pub code: String,
    pub symbol: String,
}

impl Currency {
    pub fn new(code: &str, symbol: &str) -> Self {
        Self {
            code: code.to_string(),
            symbol: symbol.to_string(),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RESPONSE: &str = r#"{
        "arrivalAirportCategories": null,
        "fares": [
            {
                "outbound": {
                    "departureAirport": {
                        "countryName": "Hiszpania",
                        "iataCode": "ALC",
                        "name": "Alicante",
                        "seoName": "alicante",
                        "city": {"name": "Alicante", "code": "ALICANTE", "countryCode": "es"}
                    },
                    "arrivalAirport": {
                        "countryName": "Polska",
                        "iataCode": "WMI",
                        "name": "Warszawa-Modlin",
                        "seoName": "warsaw-modlin",
                        "city": {"name": "Warszawa", "code": "WARSAW", "macCode": "WWA", "countryCode": "pl"}
                    },
                    "departureDate": "2024-10-29T19:15:00",
                    "arrivalDate": "2024-10-29T22:55:00",
                    "price": {
                        "value": 95.0,
                        "valueMainUnit": "95",
                        "valueFractionalUnit": "00",
                        "currencyCode": "EUR",
                        "currencySymbol": "€"
                    },
                    "flightKey": "FR~1001~ ~~WMI~10/29/2024 19:15~ALC~10/29/2024 22:55~~",
                    "flightNumber": "FR1001",
                    "previousPrice": null,
                    "priceUpdated": 1729187269000
                },
                "summary": {
                    "price": {"value": 95.0, "currencyCode": "EUR", "currencySymbol": "€"},
                    "previousPrice": null,
                    "newRoute": false
                }
            }
        ],
        "nextPage": null,
        "size": 1
    }"#;

    #[test]
    fn test_deserialize_search_response() {
        let response: FareSearchResponse = serde_json::from_str(SAMPLE_RESPONSE).unwrap();
        assert_eq!(response.size, 1);
        assert!(response.next_page.is_none());

        let fares: Vec<Fare> = response.into();
        assert_eq!(fares.len(), 1);

        let fare = &fares[0];
        assert_eq!(fare.departure_airport.iata_code, "ALC");
        assert_eq!(fare.arrival_airport.name, "Warszawa-Modlin");
        assert_eq!(fare.flight_number, "FR1001");
        assert_eq!(fare.price.value, 95.0);
        assert_eq!(fare.price.currency_code, "EUR");
        assert_eq!(fare.price.currency_symbol, "€");
    }

    #[test]
    fn test_departure_time_parsing() {
        let fare = test_support::outbound_fare("2024-10-05T19:15:00", 100.0);
        let parsed = fare.departure_time().unwrap();
        assert_eq!(parsed.to_string(), "2024-10-05 19:15:00");

        // Offsets and date-only values are rejected
        let with_offset = test_support::outbound_fare("2024-10-05T19:15:00Z", 100.0);
        assert!(with_offset.departure_time().is_err());
        let date_only = test_support::outbound_fare("2024-10-05", 100.0);
        assert!(date_only.departure_time().is_err());
    }

    #[test]
    fn test_label() {
        let fare = test_support::return_fare("2024-10-12T19:15:00", 95.0);
        assert_eq!(fare.label(), "FR1001 ALC->WMI 2024-10-12T19:15:00");
    }
}
