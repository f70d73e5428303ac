use bson::DateTime;
use serde_json::Value;
use tracing::debug;

/// Round to two decimal places, the precision every reported rate and
/// average uses.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Share of a count within a total, as a percentage. Zero totals yield 0
/// rather than a division fault.
pub fn share_percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2(part as f64 / total as f64 * 100.0)
}

/// Share of ended meetings among all meetings hosted.
pub fn completion_rate(ended: u64, total: u64) -> f64 {
    share_percentage(ended, total)
}

/// A participant's share of the meeting's wall-clock duration.
///
/// Defined only when the denominator is known and positive; `None` is an
/// undefined ratio, not a zero — aggregate averages are the asymmetric
/// case (see [`Mean`]).
pub fn participation_percentage(
    participant_minutes: f64,
    meeting_total_minutes: Option<f64>,
) -> Option<f64> {
    match meeting_total_minutes {
        Some(total) if total > 0.0 => {
            Some(round2(participant_minutes / total * 100.0))
        }
        _ => None,
    }
}

/// Wall-clock minutes between two timestamps, when both are known.
pub fn minutes_between(start: Option<DateTime>, end: Option<DateTime>) -> Option<f64> {
    let (start, end) = (start?, end?);
    let ms = end.timestamp_millis() - start.timestamp_millis();
    Some(ms as f64 / 60_000.0)
}

/// Count the itemized violations recorded in the monitoring JSON.
///
/// The structure is written by the monitoring client and nothing about it
/// is trusted: the value may be an object, a JSON-encoded string, or
/// garbage. A well-formed object contributes the lengths of its
/// `warnings`, `detections`/`detection_events` and
/// `continuous_removals`/`removals` lists; anything else degrades to the
/// raw popup counter.
pub fn violations_count(violations: Option<&Value>, popup_count: Option<i64>) -> i64 {
    let fallback = popup_count.unwrap_or(0);

    let Some(value) = violations else {
        return fallback;
    };

    // A string column may itself hold encoded JSON
    let parsed;
    let object = match value {
        Value::Object(map) => map,
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => {
                parsed = map;
                &parsed
            }
            _ => {
                debug!("Unparseable violations payload, using popup counter");
                return fallback;
            }
        },
        _ => return fallback,
    };

    let warnings = list_len(object.get("warnings"));
    let detections = list_len(object.get("detections"))
        .or_else(|| list_len(object.get("detection_events")));
    let removals = list_len(object.get("continuous_removals"))
        .or_else(|| list_len(object.get("removals")));

    (warnings.unwrap_or(0) + detections.unwrap_or(0) + removals.unwrap_or(0)) as i64
}

fn list_len(value: Option<&Value>) -> Option<usize> {
    match value {
        Some(Value::Array(items)) => Some(items.len()),
        _ => None,
    }
}

/// Arithmetic mean over the non-null subset of a column.
///
/// An empty subset reports 0 — at the aggregate level "no data" is
/// displayed as a zero average, unlike the per-record
/// [`participation_percentage`] which stays undefined.
#[derive(Debug, Default, Clone, Copy)]
pub struct Mean {
    sum: f64,
    count: u64,
}

impl Mean {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    pub fn push_int(&mut self, value: Option<i64>) {
        self.push(value.map(|v| v as f64));
    }

    pub fn value(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        round2(self.sum / self.count as f64)
    }
}
