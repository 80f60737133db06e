use super::model::LyricLine;

/// Map elapsed time to the line being sung and the one after it.
///
/// `lines` must be sorted by time. Before the first timestamp nothing is
/// current and the first line is next; an empty set yields two empty strings.
pub fn current_and_next(lines: &[LyricLine], elapsed: f64) -> (&str, &str) {
    // Number of lines whose timestamp is <= elapsed.
    let reached = lines.partition_point(|l| l.time <= elapsed);
    match reached {
        0 => ("", lines.first().map_or("", |l| l.text.as_str())),
        n => (
            lines[n - 1].text.as_str(),
            lines.get(n).map_or("", |l| l.text.as_str()),
        ),
    }
}
