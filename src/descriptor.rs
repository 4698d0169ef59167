use chrono::NaiveDate;
use serde::Serialize;

/// Metadata decoded from the `$BOOTEFI$` record of a BIOS capsule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FirmwareDescriptor {
    pub board_name: String,
    pub brand: String,
    /// `None` when the raw date field is not a `month/day/year` triplet
    pub build_date: Option<NaiveDate>,
    pub build_number: String,
    /// File name the capsule is expected to carry, e.g. `PZ790EF.CAP`
    pub expected_name: String,
}
