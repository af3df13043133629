#![forbid(unsafe_code)]

//! Sample score table standing in for the tutorial's external data
//! service. Loads and filters are plain functions over a constant so the
//! caching pages have something honest to memoize.

/// One row of the sample table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreRow {
    /// Display name.
    pub name: &'static str,
    /// Cohort the row belongs to.
    pub group: &'static str,
    /// Score out of 100.
    pub score: i64,
}

/// The whole table, three cohorts of four.
pub const SCORES: &[ScoreRow] = &[
    ScoreRow { name: "Ada", group: "A", score: 92 },
    ScoreRow { name: "Alan", group: "A", score: 68 },
    ScoreRow { name: "Edsger", group: "A", score: 45 },
    ScoreRow { name: "Grace", group: "A", score: 81 },
    ScoreRow { name: "Barbara", group: "B", score: 74 },
    ScoreRow { name: "Brian", group: "B", score: 52 },
    ScoreRow { name: "Bjarne", group: "B", score: 88 },
    ScoreRow { name: "Blaise", group: "B", score: 39 },
    ScoreRow { name: "Claude", group: "C", score: 61 },
    ScoreRow { name: "Carol", group: "C", score: 95 },
    ScoreRow { name: "Charles", group: "C", score: 33 },
    ScoreRow { name: "Christopher", group: "C", score: 57 },
];

/// Rows of `group` scoring at least `threshold`.
#[must_use]
pub fn passing(group: &str, threshold: i64) -> Vec<ScoreRow> {
    SCORES
        .iter()
        .filter(|row| row.group == group && row.score >= threshold)
        .copied()
        .collect()
}

/// Simulated service load: every `(name, score)` pair of one group.
#[must_use]
pub fn load_scores(group: &str) -> Vec<(String, i64)> {
    tracing::debug!(group, "loading scores");
    SCORES
        .iter()
        .filter(|row| row.group == group)
        .map(|row| (row.name.to_owned(), row.score))
        .collect()
}

/// Grand total over every row, the "expensive" recomputation the
/// background demo runs off-thread.
#[must_use]
pub fn total() -> i64 {
    SCORES.iter().map(|row| row.score).sum()
}
