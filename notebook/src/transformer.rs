use perftest_results_model::{DataPoint, Series};
use serde_json::Value;
use std::collections::BTreeMap;

/// Turns loaded documents into metric values.
///
/// Implementations extract `metric path -> values` from a single document. The values of every
/// document in a file group are then combined into [Series] by [transform_documents], which calls
/// [Transformer::merge] to combine series that describe the same metric.
pub trait Transformer {
    fn transform(&self, data: &Value) -> BTreeMap<String, Vec<f64>>;

    fn merge(&self, series: Vec<Series>) -> Vec<Series> {
        merge_series(series)
    }
}

/// The default transformer, which retrieves every numeric value from a JSON document.
#[derive(Debug, Default, Clone, Copy)]
pub struct SingleJsonRetriever;

impl Transformer for SingleJsonRetriever {
    fn transform(&self, data: &Value) -> BTreeMap<String, Vec<f64>> {
        flatten(data)
    }
}

/// A document loaded from a file in a file group
#[derive(Debug, Clone)]
pub struct Document {
    /// The name of the file the document was read from
    pub file: String,
    pub data: Value,
}

/// Flatten a JSON document into `dotted.path -> values`.
///
/// Object keys extend the path and array elements are flattened under the path of the array, so
/// `{"a": [{"b": 1}, {"b": 2}]}` becomes `a.b -> [1, 2]`. Non-numeric leaves are ignored.
pub fn flatten(data: &Value) -> BTreeMap<String, Vec<f64>> {
    let mut out = BTreeMap::new();
    flatten_into(data, "", &mut out);
    out
}

fn flatten_into(value: &Value, path: &str, out: &mut BTreeMap<String, Vec<f64>>) {
    match value {
        Value::Object(map) => {
            for (key, value) in map {
                let path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };
                flatten_into(value, &path, out);
            }
        }
        Value::Array(values) => {
            for value in values {
                flatten_into(value, path, out);
            }
        }
        Value::Number(n) => {
            if let Some(n) = n.as_f64() {
                out.entry(path.to_string()).or_default().push(n);
            }
        }
        other => {
            log::trace!("Ignoring non-numeric value at {path}: {other}");
        }
    }
}

/// Combine series with the same name and subtest, keeping the order they were first seen in.
pub fn merge_series(series: Vec<Series>) -> Vec<Series> {
    let mut merged: Vec<Series> = Vec::with_capacity(series.len());
    for s in series {
        match merged
            .iter_mut()
            .find(|m| m.name == s.name && m.subtest == s.subtest)
        {
            Some(existing) => existing.data.extend(s.data),
            None => merged.push(s),
        }
    }
    merged
}

/// Transform all documents of a file group into series named after the group.
///
/// Each document contributes points with an x-axis position of its 1-based index in `documents`.
pub fn transform_documents(
    transformer: &dyn Transformer,
    name: &str,
    documents: &[Document],
) -> Vec<Series> {
    let mut series = Vec::new();
    for (index, document) in documents.iter().enumerate() {
        let xaxis = index as u64 + 1;
        for (subtest, values) in transformer.transform(&document.data) {
            let mut s = Series::new(name, subtest);
            for value in values {
                s.push(DataPoint::new(value, xaxis, document.file.as_str()));
            }
            series.push(s);
        }
    }

    transformer.merge(series)
}
