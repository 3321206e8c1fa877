use perftest_results_model::Series;

/// Select the series to keep based on their subtest.
///
/// A series is kept if its subtest contains one of `metrics` (or `metrics` is empty) and does not
/// contain any of `exclude`.
pub fn filter_metrics(series: Vec<Series>, metrics: &[String], exclude: &[String]) -> Vec<Series> {
    series
        .into_iter()
        .filter(|s| metrics.is_empty() || metrics.iter().any(|m| s.subtest.contains(m.as_str())))
        .filter(|s| {
            let excluded = exclude.iter().any(|e| s.subtest.contains(e.as_str()));
            if excluded {
                log::debug!("Excluding metric {} from {}", s.subtest, s.name);
            }
            !excluded
        })
        .collect()
}
