//! Gap and duplicate detection over decoded archive names.

use indexmap::IndexMap;
use std::collections::{BTreeMap, BTreeSet};

use super::types::{
    ArchiveKey, DecodedName, DuplicateEntry, DuplicateKind, MissingEntry, SequenceSummary,
};

/// Outcome of reconciling one run of archive names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// One row per series, ascending; a single row without range when no
    /// name was parseable.
    pub summaries: Vec<SequenceSummary>,
    pub missing: Vec<MissingEntry>,
    /// Duplicate occurrences per series, then every unparseable name.
    pub duplicates: Vec<DuplicateEntry>,
}

impl Reconciliation {
    pub fn summary_for(&self, series: &str) -> Option<&SequenceSummary> {
        self.summaries.iter().find(|s| s.series == series)
    }
}

/// Split decoded names into parseable keys and unparseable names.
pub fn partition(decoded: &[DecodedName]) -> (Vec<&ArchiveKey>, Vec<&str>) {
    let mut keys = Vec::new();
    let mut unparseable = Vec::new();
    for d in decoded {
        match d {
            DecodedName::Parsed(key) => keys.push(key),
            DecodedName::Unparseable(name) => unparseable.push(name.as_str()),
        }
    }
    (keys, unparseable)
}

/// Reconcile all decoded names of a run.
///
/// `expected_total` only feeds the `expected_minus_unique` column.
pub fn reconcile(decoded: &[DecodedName], expected_total: i64) -> Reconciliation {
    let (keys, unparseable) = partition(decoded);
    let total_archives = decoded.len();

    let mut out = Reconciliation::default();

    if keys.is_empty() {
        out.summaries.push(SequenceSummary {
            series: String::new(),
            identity: String::new(),
            total_archives,
            valid_archives: 0,
            unparseable: unparseable.len(),
            min_number: None,
            max_number: None,
            unique_count: 0,
            duplicate_count: 0,
            missing_count: 0,
            expected_total,
            expected_minus_unique: expected_total,
        });
    } else {
        let mut by_series: BTreeMap<&str, Vec<&ArchiveKey>> = BTreeMap::new();
        for key in &keys {
            by_series.entry(key.series.as_str()).or_default().push(key);
        }

        for (series, group) in by_series {
            let summary = reconcile_series(
                series,
                &group,
                total_archives,
                unparseable.len(),
                expected_total,
                &mut out,
            );
            out.summaries.push(summary);
        }
    }

    out.duplicates
        .extend(unparseable.iter().map(|name| DuplicateEntry {
            series: String::new(),
            identity: String::new(),
            number: None,
            source_name: (*name).to_string(),
            kind: DuplicateKind::Unparseable,
        }));

    out
}

fn reconcile_series(
    series: &str,
    group: &[&ArchiveKey],
    total_archives: usize,
    unparseable: usize,
    expected_total: i64,
    out: &mut Reconciliation,
) -> SequenceSummary {
    let identities: BTreeSet<&str> = group.iter().map(|k| k.identity.as_str()).collect();
    let identity = identities.into_iter().collect::<Vec<_>>().join(",");

    // (identity, number) -> source names, in first-seen order
    let mut seen: IndexMap<(&str, u64), Vec<&str>> = IndexMap::new();
    for key in group {
        seen.entry((key.identity.as_str(), key.number))
            .or_default()
            .push(key.source_name.as_str());
    }

    let mut duplicate_count = 0;
    let mut unique: BTreeSet<u64> = BTreeSet::new();
    for ((ident, number), sources) in &seen {
        unique.insert(*number);
        if sources.len() > 1 {
            duplicate_count += sources.len() - 1;
            out.duplicates.extend(sources.iter().map(|src| DuplicateEntry {
                series: series.to_string(),
                identity: (*ident).to_string(),
                number: Some(*number),
                source_name: (*src).to_string(),
                kind: DuplicateKind::Duplicate,
            }));
        }
    }

    // groups are built from at least one key
    let min = unique.first().copied().unwrap_or_default();
    let max = unique.last().copied().unwrap_or_default();

    let mut missing_count = 0;
    let mut prev: Option<u64> = None;
    for &n in &unique {
        if let Some(p) = prev {
            for gap in (p + 1)..n {
                missing_count += 1;
                out.missing.push(MissingEntry {
                    series: series.to_string(),
                    identity: identity.clone(),
                    number: gap,
                });
            }
        }
        prev = Some(n);
    }

    let unique_count = unique.len();
    SequenceSummary {
        series: series.to_string(),
        identity,
        total_archives,
        valid_archives: group.len(),
        unparseable,
        min_number: Some(min),
        max_number: Some(max),
        unique_count,
        duplicate_count,
        missing_count,
        expected_total,
        expected_minus_unique: expected_total - unique_count as i64,
    }
}
