use std::sync::OnceLock;

use regex::Regex;

use super::model::LyricLine;

fn timestamp_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"\[(\d+):(\d+)\.(\d+)\]\s*(.*)").expect("timestamp pattern is valid")
    })
}

/// Seconds for an `mm`, `ss`, fraction triple.
///
/// The fraction is read as a decimal fraction, so `.5`, `.50` and `.500`
/// all mean half a second. `None` if the whole seconds overflow.
fn seconds(minutes: &str, secs: &str, fraction: &str) -> Option<f64> {
    let minutes: u64 = minutes.parse().ok()?;
    let secs: u64 = secs.parse().ok()?;
    let fraction: f64 = format!("0.{fraction}").parse().ok()?;
    let whole = minutes.checked_mul(60)?.checked_add(secs)?;
    Some(whole as f64 + fraction)
}

/// Parse LRC-style content into lines sorted by timestamp.
///
/// Lines without a `[mm:ss.xx]` tag are ignored, as are tagged lines whose
/// text is blank.
pub fn parse(content: &str) -> Vec<LyricLine> {
    let re = timestamp_regex();
    let mut lines: Vec<LyricLine> = content
        .lines()
        .filter_map(|line| {
            let caps = re.captures(line)?;
            let time = seconds(&caps[1], &caps[2], &caps[3])?;
            let text = caps[4].trim();
            if text.is_empty() {
                return None;
            }
            Some(LyricLine {
                time,
                text: text.to_string(),
            })
        })
        .collect();

    // Stable, so lines sharing a timestamp keep file order.
    lines.sort_by(|a, b| a.time.total_cmp(&b.time));
    lines
}
