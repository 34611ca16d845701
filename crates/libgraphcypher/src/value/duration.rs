use regex::Regex;
use std::sync::OnceLock;

fn iso_duration_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"^(?P<sign>-)?P",
            r"(?:(?P<years>\d+)Y)?",
            r"(?:(?P<months>\d+)M)?",
            r"(?:(?P<weeks>\d+)W)?",
            r"(?:(?P<days>\d+)D)?",
            r"(?:T",
            r"(?:(?P<hours>\d+)H)?",
            r"(?:(?P<minutes>\d+)M)?",
            r"(?:(?P<seconds>\d+)(?:\.(?P<fraction>\d{1,9}))?S)?",
            r")?$",
        )).ok()
    }).as_ref()
}

/// A duration split into the components the database keeps apart: months and
/// days have no fixed length in seconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CypherDuration {
    pub months: i64,
    pub days: i64,
    pub seconds: i64,
    pub nanoseconds: i32,
}
impl CypherDuration {
    /// Parses the ISO-8601 duration formats `PnYnMnWnDTnHnMn.nS`. At least one
    /// component is required and a `T` must be followed by a time component.
    pub fn parse_iso(input: &str) -> Option<Self> {
        let captures = iso_duration_regex()?.captures(input)?;
        let component = |name: &str| -> Option<Option<i64>> {
            captures.name(name).map(|m| m.as_str().parse::<i64>()).transpose().ok()
        };

        let names = ["years", "months", "weeks", "days", "hours", "minutes", "seconds"];
        if names.iter().all(|name| captures.name(name).is_none()) {
            return None;
        }
        if input.ends_with('T') {
            return None;
        }

        // Out-of-range components reject the input.
        let months = component("years")?.unwrap_or(0)
            .checked_mul(12)?
            .checked_add(component("months")?.unwrap_or(0))?;
        let days = component("weeks")?.unwrap_or(0)
            .checked_mul(7)?
            .checked_add(component("days")?.unwrap_or(0))?;
        let seconds = component("hours")?.unwrap_or(0)
            .checked_mul(3600)?
            .checked_add(component("minutes")?.unwrap_or(0).checked_mul(60)?)?
            .checked_add(component("seconds")?.unwrap_or(0))?;
        let nanoseconds = match captures.name("fraction") {
            Some(fraction) => {
                let digits = fraction.as_str();
                let padded = format!("{digits:0<9}");
                padded.parse::<i32>().ok()?
            },
            None => 0,
        };

        let sign: i64 = if captures.name("sign").is_some() { -1 } else { 1 };
        Some(Self {
            months: sign * months,
            days: sign * days,
            seconds: sign * seconds,
            nanoseconds: sign as i32 * nanoseconds,
        })
    }

    fn is_negative(&self) -> bool {
        self.months <= 0
            && self.days <= 0
            && self.seconds <= 0
            && self.nanoseconds <= 0
            && (self.months, self.days, self.seconds, self.nanoseconds) != (0, 0, 0, 0)
    }
}
impl std::fmt::Display for CypherDuration {
    /// Canonical form: years and months, days, then hours/minutes/seconds,
    /// omitting zero components (`PT0S` for the empty duration).
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let negative = self.is_negative();
        let (months, days, seconds, nanos) = if negative {
            (-self.months, -self.days, -self.seconds, -self.nanoseconds)
        } else {
            (self.months, self.days, self.seconds, self.nanoseconds)
        };

        let mut out = String::new();
        if negative {
            out.push('-');
        }
        out.push('P');
        if months / 12 != 0 {
            out.push_str(&format!("{}Y", months / 12));
        }
        if months % 12 != 0 {
            out.push_str(&format!("{}M", months % 12));
        }
        if days != 0 {
            out.push_str(&format!("{days}D"));
        }

        let hours = seconds / 3600;
        let minutes = (seconds % 3600) / 60;
        let secs = seconds % 60;
        if hours != 0 || minutes != 0 || secs != 0 || nanos != 0 {
            out.push('T');
            if hours != 0 {
                out.push_str(&format!("{hours}H"));
            }
            if minutes != 0 {
                out.push_str(&format!("{minutes}M"));
            }
            if secs != 0 || nanos != 0 {
                if nanos != 0 {
                    let fraction = format!("{nanos:09}");
                    out.push_str(&format!("{secs}.{}S", fraction.trim_end_matches('0')));
                } else {
                    out.push_str(&format!("{secs}S"));
                }
            }
        } else if out.ends_with('P') {
            out.push_str("T0S");
        }

        write!(f, "{out}")
    }
}
