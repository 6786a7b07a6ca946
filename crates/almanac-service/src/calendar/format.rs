use almanac_engine::EventOccurrence;

const TIME_FORMAT: &str = "%H:%M";

/// ## Summary
/// Human-readable time of an occurrence: `"All day"`, `"09:00 - 10:00"`, or
/// the start time alone when the interval is degenerate.
#[must_use]
pub fn describe_time(occurrence: &EventOccurrence) -> String {
    match occurrence.time.filter(|_| !occurrence.all_day) {
        None => "All day".to_string(),
        Some(interval) if interval.is_degenerate() => {
            interval.start.format(TIME_FORMAT).to_string()
        }
        Some(interval) => format!(
            "{} - {}",
            interval.start.format(TIME_FORMAT),
            interval.end.format(TIME_FORMAT)
        ),
    }
}
