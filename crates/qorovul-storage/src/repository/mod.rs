//! Database repositories for each table.

pub mod accounts;
pub mod chats;
pub mod config;
pub mod messages;
pub mod suspensions;

pub use accounts::AccountsRepo;
pub use chats::ChatsRepo;
pub use config::ConfigRepo;
pub use messages::MessagesRepo;
pub use suspensions::SuspensionsRepo;

use chrono::{DateTime, Utc};

use crate::error::{Result, StorageError};

/// Parse an RFC 3339 timestamp column.
pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| StorageError::Corrupt(format!("invalid timestamp '{s}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_rfc3339_in_any_offset() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 2, 10, 15, 0).unwrap();
        assert_eq!(parse_datetime("2024-05-02T10:15:00+00:00").unwrap(), expected);
        assert_eq!(parse_datetime("2024-05-02T15:15:00+05:00").unwrap(), expected);
    }

    #[test]
    fn rejects_garbage_timestamps() {
        assert!(matches!(
            parse_datetime("2024-05-02 10:15:00"),
            Err(StorageError::Corrupt(_))
        ));
        assert!(matches!(
            parse_datetime("yesterday"),
            Err(StorageError::Corrupt(_))
        ));
    }
}
