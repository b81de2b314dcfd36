use serde::Serialize;

use super::targets::{ScanResult, TargetConfig};

/// Results of one category, in scan order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryGroup {
    pub category: String,
    pub results: Vec<ScanResult>,
}

impl CategoryGroup {
    pub fn total(&self) -> u64 {
        self.results.iter().map(|r| r.size).sum()
    }
}

/// Partition results by category. Categories appear in the order they are
/// first seen; results keep their relative order inside each group.
pub fn group_by_category(results: &[ScanResult]) -> Vec<CategoryGroup> {
    let mut groups: Vec<CategoryGroup> = Vec::new();
    for result in results {
        match groups.iter_mut().find(|g| g.category == result.category) {
            Some(group) => group.results.push(result.clone()),
            None => groups.push(CategoryGroup {
                category: result.category.clone(),
                results: vec![result.clone()],
            }),
        }
    }
    groups
}

/// Total size per category, in group order. Absent entries count as 0.
pub fn category_totals(groups: &[CategoryGroup]) -> Vec<(String, u64)> {
    groups
        .iter()
        .map(|g| (g.category.clone(), g.total()))
        .collect()
}

/// Sum of every result's size
pub fn grand_total(results: &[ScanResult]) -> u64 {
    results.iter().map(|r| r.size).sum()
}

/// The `n` largest present, non-empty results, largest first.
///
/// Equal sizes keep their scan order: the sort is stable, so for two entries of
/// the same size the one configured earlier ranks higher.
pub fn top_n(results: &[ScanResult], n: usize) -> Vec<ScanResult> {
    let mut ranked: Vec<ScanResult> = results
        .iter()
        .filter(|r| r.is_reclaimable())
        .cloned()
        .collect();
    ranked.sort_by(|a, b| b.size.cmp(&a.size));
    ranked.truncate(n);
    ranked
}

/// A catalog entry paired with what the scan found for it
#[derive(Debug, Clone)]
pub struct Deletable {
    pub target: TargetConfig,
    pub result: ScanResult,
}

/// Targets worth offering for deletion: present and non-empty, largest first
/// (ties in catalog order). Results are matched to targets by path.
pub fn deletable(targets: &[TargetConfig], results: &[ScanResult]) -> Vec<Deletable> {
    let mut out: Vec<Deletable> = targets
        .iter()
        .filter_map(|t| {
            results
                .iter()
                .find(|r| r.path == t.path)
                .filter(|r| r.is_reclaimable())
                .map(|r| Deletable {
                    target: t.clone(),
                    result: r.clone(),
                })
        })
        .collect();
    out.sort_by(|a, b| b.result.size.cmp(&a.result.size));
    out
}

/// Everything the reporting layer needs from one scan pass
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    /// When the scan finished
    pub timestamp: chrono::DateTime<chrono::Utc>,

    /// How long the scan took in seconds
    pub duration_secs: f64,

    /// Raw results, one per target, in catalog order
    pub results: Vec<ScanResult>,

    /// Per-category results and totals
    pub categories: Vec<CategorySummary>,

    /// Sum over all results
    pub grand_total: u64,

    /// Largest entries
    pub top: Vec<ScanResult>,

    /// Targets whose sizing failed
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategorySummary {
    pub category: String,
    pub total: u64,
    pub results: Vec<ScanResult>,
}

impl ScanReport {
    pub fn build(results: Vec<ScanResult>, top: usize, duration_secs: f64) -> Self {
        let groups = group_by_category(&results);
        let categories = groups
            .into_iter()
            .map(|g| CategorySummary {
                total: g.total(),
                category: g.category,
                results: g.results,
            })
            .collect();
        let warnings = results
            .iter()
            .filter_map(|r| r.error.as_ref().map(|e| format!("{}: {}", r.name, e)))
            .collect();

        Self {
            timestamp: chrono::Utc::now(),
            duration_secs,
            grand_total: grand_total(&results),
            top: top_n(&results, top),
            categories,
            results,
            warnings,
        }
    }
}
