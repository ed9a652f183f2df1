use floodviz::models::Sample;
use floodviz::stats::series_summary;

fn s(key: &str, t: i64, v: f64) -> Sample {
    Sample {
        series_key: key.into(),
        timestamp: t,
        value: v,
        time: String::new(),
        timezone: String::new(),
        display_name: format!("Site {key}"),
    }
}

#[test]
fn summary_per_site() {
    let data = vec![
        s("B", 3, 10.0),
        s("A", 2, 4.0),
        s("A", 1, 1.0),
        s("A", 5, 3.0),
        s("B", 4, f64::NAN),
        s("A", 9, 2.0),
    ];
    let refs: Vec<&Sample> = data.iter().collect();
    let out = series_summary(&refs);

    assert_eq!(out.len(), 2);
    let a = &out[0];
    assert_eq!(a.key, "A");
    assert_eq!(a.name, "Site A");
    assert_eq!(a.count, 4);
    assert_eq!(a.min, Some(1.0));
    assert_eq!(a.max, Some(4.0));
    assert_eq!(a.mean, Some(2.5));
    assert_eq!(a.median, Some(2.5));
    assert_eq!((a.first, a.last), (Some(1), Some(9)));

    let b = &out[1];
    assert_eq!(b.count, 1);
    assert_eq!(b.median, Some(10.0));
    assert_eq!((b.first, b.last), (Some(3), Some(4)));
}

#[test]
fn empty_input_gives_no_rows() {
    assert!(series_summary(&[]).is_empty());
}
