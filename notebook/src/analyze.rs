use crate::model::StandardStats;
use anyhow::Context;
use polars::prelude::*;

pub(crate) fn frame_from_values(values: &[f64]) -> anyhow::Result<DataFrame> {
    Ok(df!("value" => values)?)
}

pub(crate) fn standard_stats(frame: DataFrame, column: &str) -> anyhow::Result<StandardStats> {
    let value_series = frame.column(column)?.as_materialized_series().clone();
    let count = value_series.len();

    let mean = value_series.mean().context("Mean")?;
    let std = value_series.std(0).context("Std")?;
    let min = value_series
        .min::<f64>()
        .context("Min")?
        .context("Missing min")?;
    let max = value_series
        .max::<f64>()
        .context("Max")?
        .context("Missing max")?;

    let out = frame
        .clone()
        .lazy()
        .select([col(column)
            .gt_eq(lit(mean - std))
            .and(col(column).lt_eq(lit(mean + std)))
            .alias("within_std")])
        .collect()?;

    let within = out
        .column("within_std")?
        .as_materialized_series()
        .sum::<usize>()
        .context("Within std sum")?;

    Ok(StandardStats {
        count,
        mean,
        std,
        min,
        max,
        within_std: within as f64 / count as f64,
    })
}
