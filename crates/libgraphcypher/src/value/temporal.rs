//! Parsing and fixed-width formatting of the temporal scalars.

use chrono::DateTime;
use chrono::FixedOffset;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::NaiveTime;
use chrono::Utc;

pub(crate) fn parse_datetime(input: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(input) {
        return Some(datetime);
    }
    // Offset-less input is read as UTC.
    parse_local_datetime(input).map(|local| local.and_utc().fixed_offset())
}

pub(crate) fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()
}

pub(crate) fn parse_local_time(input: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(input, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(input, "%H:%M"))
        .ok()
}

pub(crate) fn parse_local_datetime(input: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M"))
        .ok()
}

pub(crate) fn parse_time(input: &str) -> Option<(NaiveTime, FixedOffset)> {
    if let Some(local) = input.strip_suffix('Z') {
        let offset = FixedOffset::east_opt(0)?;
        return parse_local_time(local).map(|time| (time, offset));
    }

    let offset_start = input.len().checked_sub(6)
        .filter(|at| *at > 0 && input.is_char_boundary(*at));
    if let Some(at) = offset_start {
        let (local, offset) = input.split_at(at);
        if let Some(offset) = parse_offset(offset) {
            return parse_local_time(local).map(|time| (time, offset));
        }
    }

    let offset = FixedOffset::east_opt(0)?;
    parse_local_time(input).map(|time| (time, offset))
}

fn parse_offset(input: &str) -> Option<FixedOffset> {
    let sign = match input.chars().next()? {
        '+' => 1,
        '-' => -1,
        _ => return None,
    };
    let (hours, minutes) = input[1..].split_once(':')?;
    let seconds = hours.parse::<i32>().ok()? * 3600 + minutes.parse::<i32>().ok()? * 60;
    FixedOffset::east_opt(sign * seconds)
}

pub(crate) fn format_datetime(value: &DateTime<FixedOffset>) -> String {
    value.with_timezone(&Utc).format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

pub(crate) fn format_date(value: &NaiveDate) -> String {
    value.format("%Y-%m-%d").to_string()
}

pub(crate) fn format_local_time(value: &NaiveTime) -> String {
    value.format("%H:%M:%S%.9f").to_string()
}

pub(crate) fn format_local_datetime(value: &NaiveDateTime) -> String {
    value.format("%Y-%m-%dT%H:%M:%S%.9f").to_string()
}

pub(crate) fn format_time(time: &NaiveTime, offset: &FixedOffset) -> String {
    let local = format_local_time(time);
    if offset.local_minus_utc() == 0 {
        format!("{local}Z")
    } else {
        format!("{local}{offset}")
    }
}
