use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// A parsed record stamp at the resolution the stream provides.
/// Date-only streams compare at day resolution, so a visit dated the same
/// calendar day as the window edge still counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stamp {
    Moment(NaiveDateTime),
    Day(NaiveDate),
}

impl Stamp {
    pub fn on_or_after(&self, since: NaiveDateTime) -> bool {
        match self {
            Self::Moment(t) => *t >= since,
            Self::Day(d) => *d >= since.date(),
        }
    }

    pub fn on_or_before(&self, end: NaiveDateTime) -> bool {
        match self {
            Self::Moment(t) => *t <= end,
            Self::Day(d) => *d <= end.date(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            Self::Moment(t) => t.date(),
            Self::Day(d) => *d,
        }
    }

    /// Ordering key for recency comparisons; day stamps sort at midnight.
    fn order_key(&self) -> NaiveDateTime {
        match self {
            Self::Moment(t) => *t,
            Self::Day(d) => d.and_hms_opt(0, 0, 0).unwrap_or_default(),
        }
    }
}

/// Parse a backend stamp string. Accepts RFC 3339 datetimes (with offset),
/// plain `YYYY-MM-DD HH:MM:SS` / `YYYY-MM-DDTHH:MM:SS`, and bare
/// `YYYY-MM-DD` dates. Anything else is None: the record is excluded from
/// window evaluation rather than treated as an error.
pub fn parse_stamp(raw: &str) -> Option<Stamp> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(Stamp::Moment(dt.naive_utc()));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(Stamp::Moment(dt));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(Stamp::Moment(dt));
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(Stamp::Day(d));
    }
    None
}

/// Count records stamped within the trailing window [since, now] whose
/// content satisfies the predicate. Unstamped or unparseable records never
/// match.
pub fn count_within<R>(
    records: &[&R],
    stamp_of: impl Fn(&R) -> Option<&str>,
    predicate: impl Fn(&R) -> bool,
    since: NaiveDateTime,
    now: NaiveDateTime,
) -> usize {
    records
        .iter()
        .filter(|r| {
            let stamp = match stamp_of(r).and_then(parse_stamp) {
                Some(s) => s,
                None => return false,
            };
            stamp.on_or_after(since) && stamp.on_or_before(now) && predicate(r)
        })
        .count()
}

/// Does any record satisfying the predicate fall on exactly this calendar
/// date?
pub fn exists_on<R>(
    records: &[&R],
    stamp_of: impl Fn(&R) -> Option<&str>,
    predicate: impl Fn(&R) -> bool,
    date: NaiveDate,
) -> bool {
    records.iter().any(|r| {
        stamp_of(r)
            .and_then(parse_stamp)
            .is_some_and(|stamp| stamp.date() == date)
            && predicate(r)
    })
}

/// The most recent parseable record, by stamp. Ties resolve to the later
/// record in input order. Unstamped records are ignored.
pub fn latest_by_stamp<'a, R>(
    records: &[&'a R],
    stamp_of: impl Fn(&R) -> Option<&str>,
) -> Option<&'a R> {
    records
        .iter()
        .filter_map(|r| stamp_of(r).and_then(parse_stamp).map(|s| (s.order_key(), *r)))
        .max_by_key(|(key, _)| *key)
        .map(|(_, r)| r)
}
