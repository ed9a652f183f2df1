use floodviz::models::Sample;
use floodviz::storage::{save_csv, save_json};
use std::fs;
use tempfile::tempdir;

fn samples() -> Vec<Sample> {
    vec![
        Sample {
            series_key: "01646500".into(),
            timestamp: 1_493_683_200_000,
            value: 1520.0,
            time: "2017-05-02 00:00".into(),
            timezone: "EST".into(),
            display_name: "Potomac".into(),
        },
        Sample {
            series_key: "01638500".into(),
            timestamp: 1_493_686_800_000,
            value: 880.5,
            time: "2017-05-02 01:00".into(),
            timezone: "EST".into(),
            display_name: "=HYPERLINK(\"x\")".into(),
        },
    ]
}

#[test]
fn csv_has_header_and_rows() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.csv");
    let data = samples();
    let refs: Vec<&Sample> = data.iter().collect();
    save_csv(&refs, &path).unwrap();

    let txt = fs::read_to_string(&path).unwrap();
    let mut lines = txt.lines();
    assert_eq!(lines.next(), Some("key,name,time_mili,time,timezone,value"));
    assert!(lines.next().unwrap().starts_with("01646500,Potomac,1493683200000,"));
    let second = lines.next().unwrap();
    assert!(second.contains("'=HYPERLINK"), "formula neutralized: {second}");
    assert!(lines.next().is_none());
}

#[test]
fn json_round_trips_through_the_loader_format() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.json");
    let data = samples();
    let refs: Vec<&Sample> = data.iter().collect();
    save_json(&refs, &path).unwrap();

    let txt = fs::read_to_string(&path).unwrap();
    let v: serde_json::Value = serde_json::from_str(&txt).unwrap();
    assert_eq!(v[0]["key"], "01646500");
    assert_eq!(v[0]["time_mili"], 1_493_683_200_000i64);
    assert_eq!(v[1]["name"], "=HYPERLINK(\"x\")");

    let back = floodviz::source::load_samples(path.to_str().unwrap()).unwrap();
    assert_eq!(back, data);
}
