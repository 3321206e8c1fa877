use perftest_notebook::test_data::{data, etls, FixtureFiles, FIXTURE_GROUP};
use perftest_notebook::transformer::Transformer;
use perftest_notebook::{EtlConfig, EtlError, FileGroup, PerftestEtl};
use perftest_results_model::{load_series, DataPoint};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;

const FIRST_PAINT: &str = "browserScripts.timings.firstPaint";

#[test]
fn fixture_etls_are_configured() -> anyhow::Result<()> {
    let files = FixtureFiles::create(&data())?;
    let etls = etls(&files);

    for etl in [&etls.ptetl_list, &etls.ptetl_str] {
        assert!(etl.sort_files());
        assert_eq!(etl.config().output, files.output());
        assert_eq!(
            etl.file_groups().keys().collect::<Vec<_>>(),
            vec![FIXTURE_GROUP]
        );
    }
    assert_eq!(
        etls.ptetl_str.file_groups()[FIXTURE_GROUP],
        FileGroup::Directory(files.resources_dir().to_path_buf())
    );
    Ok(())
}

#[test]
fn directory_grouping_finds_all_files() -> anyhow::Result<()> {
    let files = FixtureFiles::create(&data())?;
    let etls = etls(&files);

    let mut from_list =
        etls.ptetl_list.parse_file_grouping(&etls.ptetl_list.file_groups()[FIXTURE_GROUP])?;
    let mut from_dir =
        etls.ptetl_str.parse_file_grouping(&etls.ptetl_str.file_groups()[FIXTURE_GROUP])?;
    from_list.sort();
    from_dir.sort();

    assert_eq!(from_list.len(), 3);
    pretty_assertions::assert_eq!(from_list, from_dir);
    Ok(())
}

#[test]
fn directory_grouping_walks_subdirectories() -> anyhow::Result<()> {
    let files = FixtureFiles::create(&data())?;
    let sub = files.resources_dir().join("sub");
    std::fs::create_dir_all(&sub)?;
    let nested = sub.join("file_0.json");
    std::fs::write(&nested, r#"{"browserScripts": [{"timings": {"firstPaint": 1}}]}"#)?;

    let etl = etls(&files).ptetl_str;
    let found = etl.parse_file_grouping(&etl.file_groups()[FIXTURE_GROUP])?;
    assert_eq!(found.len(), 4);
    assert!(found.contains(&nested));

    let output = etl.process()?;
    let points = &output.data[0].data;
    // `resources/sub/file_0.json` sorts after the files directly in `resources`
    assert_eq!(points.len(), 7);
    assert_eq!(points.last().unwrap(), &DataPoint::new(1.0, 3, "file_0.json"));
    Ok(())
}

#[test]
fn process_list_grouping() -> anyhow::Result<()> {
    env_logger::try_init().ok();

    let files = FixtureFiles::create(&data())?;
    let output = etls(&files).ptetl_list.process()?;

    assert_eq!(output.file_output, files.output());
    assert_eq!(output.data.len(), 1);

    let series = &output.data[0];
    assert_eq!(series.name, FIXTURE_GROUP);
    assert_eq!(series.subtest, FIRST_PAINT);
    pretty_assertions::assert_eq!(
        series.data,
        vec![
            DataPoint::new(101.0, 1, "file_1.json"),
            DataPoint::new(102.0, 1, "file_1.json"),
            DataPoint::new(103.0, 1, "file_1.json"),
            DataPoint::new(201.0, 2, "file_2.json"),
            DataPoint::new(202.0, 2, "file_2.json"),
            DataPoint::new(203.0, 2, "file_2.json"),
        ]
    );
    Ok(())
}

#[test]
fn list_and_directory_groupings_agree() -> anyhow::Result<()> {
    env_logger::try_init().ok();

    let files = FixtureFiles::create(&data())?;
    let etls = etls(&files);

    let from_list = etls.ptetl_list.process()?;
    let from_dir = etls.ptetl_str.process()?;

    pretty_assertions::assert_eq!(from_list, from_dir);
    Ok(())
}

#[test]
fn process_writes_output_file() -> anyhow::Result<()> {
    let files = FixtureFiles::create(&data())?;
    let output = etls(&files).ptetl_str.process()?;

    assert!(files.output().is_file());
    let written = load_series(&output.file_output)?;
    pretty_assertions::assert_eq!(written, output.data);
    Ok(())
}

#[test]
fn unsorted_files_keep_given_order() -> anyhow::Result<()> {
    let files = FixtureFiles::create(&data())?;
    let reversed = files
        .resources()
        .values()
        .rev()
        .map(PathBuf::from)
        .collect::<Vec<_>>();

    let etl = PerftestEtl::new(
        BTreeMap::from([(FIXTURE_GROUP.to_string(), FileGroup::Files(reversed))]),
        EtlConfig::new(files.output()),
        false,
    );
    let output = etl.process()?;

    let first = &output.data[0].data[0];
    assert_eq!(first, &DataPoint::new(201.0, 1, "file_2.json"));
    let last = output.data[0].data.last().unwrap();
    assert_eq!(last, &DataPoint::new(103.0, 2, "file_1.json"));
    Ok(())
}

#[test]
fn metric_filters_apply_to_output() -> anyhow::Result<()> {
    let files = FixtureFiles::create(&data())?;
    let group = BTreeMap::from([(
        FIXTURE_GROUP.to_string(),
        FileGroup::Directory(files.resources_dir().to_path_buf()),
    )]);

    let excluded = PerftestEtl::new(
        group.clone(),
        EtlConfig::new(files.output()).exclude(vec!["firstPaint".to_string()]),
        true,
    )
    .process()?;
    assert!(excluded.data.is_empty());

    let missing = PerftestEtl::new(
        group,
        EtlConfig::new(files.output()).metrics(vec!["loadEventEnd".to_string()]),
        true,
    )
    .process()?;
    assert!(missing.data.is_empty());
    assert!(load_series(files.output())?.is_empty());
    Ok(())
}

#[test]
fn invalid_json_file_fails_processing() -> anyhow::Result<()> {
    let files = FixtureFiles::create(&data())?;
    let broken = files.resources_dir().join("file_4.json");
    std::fs::write(&broken, "{'browserScripts': []}")?;

    let err = etls(&files).ptetl_str.process().unwrap_err();
    let etl_err = err
        .downcast_ref::<EtlError>()
        .expect("Expected an ETL error");
    assert!(matches!(etl_err, EtlError::InvalidJson { path, .. } if path == &broken));
    Ok(())
}

#[test]
fn groups_without_data_produce_no_series() -> anyhow::Result<()> {
    let files = FixtureFiles::create(&data())?;
    let etl = PerftestEtl::new(
        BTreeMap::from([(
            "text_only".to_string(),
            FileGroup::Files(vec![PathBuf::from(&files.resources()["file_3"])]),
        )]),
        EtlConfig::new(files.output()),
        true,
    );

    assert!(etl.process()?.data.is_empty());
    Ok(())
}

struct MaxOnly;

impl Transformer for MaxOnly {
    fn transform(&self, data: &Value) -> BTreeMap<String, Vec<f64>> {
        perftest_notebook::transformer::flatten(data)
            .into_iter()
            .map(|(k, v)| {
                let max = v.into_iter().fold(f64::MIN, f64::max);
                (format!("{k}.max"), vec![max])
            })
            .collect()
    }
}

#[test]
fn custom_transformer() -> anyhow::Result<()> {
    let files = FixtureFiles::create(&data())?;
    let output = etls(&files)
        .ptetl_list
        .with_transformer(Box::new(MaxOnly))
        .process()?;

    assert_eq!(output.data.len(), 1);
    assert_eq!(output.data[0].subtest, format!("{FIRST_PAINT}.max"));
    assert_eq!(output.data[0].values(), vec![103.0, 203.0]);
    Ok(())
}

#[test]
fn processed_output_feeds_a_notebook() -> anyhow::Result<()> {
    let files = FixtureFiles::create(&data())?;
    let results = etls(&files).ptetl_list.process()?.into_results("browsertime");

    let summaries = perftest_notebook::test_data::notebook(results).summarize()?;
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].stats.count, 6);
    assert_eq!(summaries[0].stats.mean, 152.0);
    Ok(())
}
