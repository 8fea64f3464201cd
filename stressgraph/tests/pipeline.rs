//! End-to-end pipeline checks against a real file on disk, rendering
//! replaced by a recording sink so no fonts or image output are needed.

use std::fs;
use std::io::BufReader;

use stressgraph::chart::{self, ChartSink, ChartSpec, Error};
use stressgraph::config::Config;
use stressgraph_series::bucket::BucketSchema;
use stressgraph_series::layout::RowLayout;
use stressgraph_series::scan::scan;
use stressgraph_series::series::SeriesBuilder;

const SAMPLE_LOG: &str = "\
# hstress -c 10 -b 1,10,100 localhost 8080
1234567890\t3\t1\t0\t2\t10\t1\t5\t2\t1\t1
1234567891\t4\t0\t1\t2\t12\t0\t6\t2\t1\t1
garbage in the middle of the file
1234567892\t5\t0\t0\t2\t14\t0\t7\t3\t2\t1
1234567893\t5\t0
";

#[derive(Default)]
struct Recorder {
    titles: Vec<String>,
    layer_names: Vec<Vec<String>>,
}

impl ChartSink for Recorder {
    fn render(&mut self, spec: &ChartSpec) -> Result<(), Error> {
        self.titles.push(spec.title.to_string());
        self.layer_names.push(
            spec.layers
                .iter()
                .map(|layer| layer.name.to_string())
                .collect(),
        );
        Ok(())
    }
}

#[test]
fn file_to_charts() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let data_file = dir.path().join("hstress.log");
    fs::write(&data_file, SAMPLE_LOG).expect("write sample log");

    let config = Config::new(data_file.clone()).expect("file exists");
    let images_dir = config.ensure_images_dir().expect("create images dir");
    assert!(images_dir.is_dir());

    let schema = BucketSchema::new(&config.buckets).expect("default buckets are valid");
    let mut builder = SeriesBuilder::new(RowLayout::new(&schema));
    let file = fs::File::open(&data_file).expect("open sample log");
    let report = scan(BufReader::new(file), &mut builder).expect("scan sample log");

    assert_eq!(report.lines_read, 6);
    assert_eq!(report.rows_accepted, 3);
    assert_eq!(report.rows_skipped, 2);
    assert_eq!(report.malformed_rows, 1);

    let series = builder.finish();
    assert_eq!(series.row_count(), 3);
    assert_eq!(series.get("conn_close"), Some(&[6_u64, 7, 7][..]));

    let mut sink = Recorder::default();
    for spec in [
        chart::connections(&series).expect("series present"),
        chart::http_status(&series).expect("series present"),
        chart::buckets(&series, &schema).expect("series present"),
    ] {
        sink.render(&spec).expect("recorder never fails");
    }

    assert_eq!(sink.titles, ["Connections", "HTTP Status", "Buckets (ms)"]);
    assert_eq!(
        sink.layer_names[2],
        ["over_100", "under_100", "under_10", "under_1"]
    );
}

#[test]
fn double_scan_is_idempotent() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let data_file = dir.path().join("hstress.log");
    fs::write(&data_file, SAMPLE_LOG).expect("write sample log");

    let schema = BucketSchema::default();
    let mut sets = Vec::new();
    for _ in 0..2 {
        let mut builder = SeriesBuilder::new(RowLayout::new(&schema));
        let file = fs::File::open(&data_file).expect("open sample log");
        scan(BufReader::new(file), &mut builder).expect("scan sample log");
        sets.push(builder.finish());
    }
    assert_eq!(sets[0], sets[1]);
}
