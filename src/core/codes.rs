//! Static currency code table.
//!
//! Maps ISO-4217 codes to the English display names that search-result
//! pages print next to a converted amount. The scrape provider builds
//! its match pattern from these names, and the `codes` subcommand lists
//! them.

pub const CODES: &[(&str, &str)] = &[
    ("AED", "United Arab Emirates dirhams"),
    ("AUD", "Australian dollars"),
    ("BRL", "Brazilian reais"),
    ("CAD", "Canadian dollars"),
    ("CHF", "Swiss francs"),
    ("CLP", "Chilean pesos"),
    ("CNY", "Chinese yuan"),
    ("COP", "Colombian pesos"),
    ("CZK", "Czech koruny"),
    ("DKK", "Danish kroner"),
    ("EUR", "euros"),
    ("GBP", "British pounds"),
    ("HKD", "Hong Kong dollars"),
    ("HUF", "Hungarian forints"),
    ("IDR", "Indonesian rupiahs"),
    ("ILS", "Israeli new shekels"),
    ("INR", "Indian rupees"),
    ("JPY", "Japanese yen"),
    ("KRW", "South Korean won"),
    ("MXN", "Mexican pesos"),
    ("MYR", "Malaysian ringgits"),
    ("NOK", "Norwegian kroner"),
    ("NZD", "New Zealand dollars"),
    ("PHP", "Philippine pesos"),
    ("PLN", "Polish zlotys"),
    ("RON", "Romanian lei"),
    ("SEK", "Swedish kronor"),
    ("SGD", "Singapore dollars"),
    ("THB", "Thai baht"),
    ("TRY", "Turkish lira"),
    ("USD", "United States dollars"),
    ("ZAR", "South African rand"),
];

/// Display name for a code, or `None` if the code is not in the table.
pub fn display_name(code: &str) -> Option<&'static str> {
    CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

pub fn is_known(code: &str) -> bool {
    display_name(code).is_some()
}
