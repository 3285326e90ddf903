/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Business dates (stock movement dates, event dates) carry no time of day.
pub type BusinessDate = chrono::NaiveDate;

/// Today's business date in the shop's local time zone.
pub fn today() -> BusinessDate {
    chrono::Local::now().date_naive()
}
