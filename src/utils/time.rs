use chrono::{DateTime, Local, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Note ids are the creation instant in epoch milliseconds.
pub fn note_id(at: DateTime<Utc>) -> String {
    at.timestamp_millis().to_string()
}

/// Day/month/year, the way notes display their authoring date.
pub fn note_date(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%d/%m/%Y").to_string()
}
