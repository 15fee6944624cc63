//! Wire rendering of responses.

use ph_01_location_store::PositionRecord;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use super::{NearbyPlaces, TimeDiff};

/// `? <original>`: the message was invalid.
pub fn invalid_echo(original: &str) -> String {
    format!("? {original}")
}

/// `! <original>`: the message was valid but a collaborator failed.
pub fn failure_echo(original: &str) -> String {
    format!("! {original}")
}

/// `AT <server> <time_diff> <client_id> <coords> <client_time>`
pub fn at_line(server: &str, time_diff: TimeDiff, record: &PositionRecord) -> String {
    format!(
        "AT {server} {time_diff} {} {} {}",
        record.client_id, record.coordinates, record.client_time
    )
}

/// The places payload with a three-space indent.
pub fn render_places(places: &NearbyPlaces) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"   "));
    places.serialize(&mut serializer)?;
    // serde_json only ever emits UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// `AT ...\n<json>\n\n`
pub fn whatsat_response(at_line: &str, places: &NearbyPlaces) -> Result<String, serde_json::Error> {
    Ok(format!("{at_line}\n{}\n\n", render_places(places)?))
}
