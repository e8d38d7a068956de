use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

const EPOCH_RFC3339: &str = "1970-01-01T00:00:00Z";

/// Current UTC time as an RFC 3339 string.
pub fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|error| {
            tracing::warn!(%error, "failed to format current UTC timestamp");
            EPOCH_RFC3339.to_string()
        })
}

/// Milliseconds since the Unix epoch.
pub fn now_unix_millis() -> i128 {
    OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000
}

#[cfg(test)]
mod tests {
    use super::now_rfc3339;
    use time::format_description::well_known::Rfc3339;
    use time::OffsetDateTime;

    #[test]
    fn now_rfc3339_round_trips_through_parser() {
        let stamp = now_rfc3339();
        assert!(OffsetDateTime::parse(&stamp, &Rfc3339).is_ok(), "{stamp}");
    }
}
