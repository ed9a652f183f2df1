use floodviz::peak::{PeakPoint, parse_peak_data};

fn peak_lines() -> Vec<&'static str> {
    vec![
        "# US Geological Survey",
        "agency_cd\tsite_no\tpeak_dt\tpeak_tm\tpeak_va",
        "5s\t15s\t10d\t6s\t8s",
        "USGS\t01646500\t2014-05-01\t\t23000",
        "USGS\t01646500\t2015-06-28\t\t41500",
        "USGS\t01646500\t2015-12-01\t\t99999",
        "USGS\t01646500\t2016-02-26\t\t",
        "USGS\t01646500\t2016-03-02\t\t50000",
    ]
}

fn p(label: &str, value: f64) -> PeakPoint {
    PeakPoint {
        label: label.into(),
        value,
    }
}

#[test]
fn first_line_of_a_year_wins() {
    let out = parse_peak_data(Some(peak_lines().as_slice()), None);
    assert_eq!(out, vec![p("2014", 23000.0), p("2015", 41500.0)]);
}

#[test]
fn daily_values_fill_missing_years_only() {
    let dv = [
        "agency_cd\tsite_no\tdatetime\tvalue",
        "USGS\t01646500\t2017-05-01\t8760",
    ];
    let out = parse_peak_data(Some(peak_lines().as_slice()), Some(dv.as_slice()));
    assert_eq!(
        out,
        vec![p("2014", 23000.0), p("2015", 41500.0), p("2017", 8760.0)]
    );
}

#[test]
fn daily_scan_stops_at_a_known_year() {
    let dv = [
        "USGS\t01646500\t2015-05-01\t1",
        "USGS\t01646500\t2017-05-01\t2",
    ];
    let out = parse_peak_data(Some(peak_lines().as_slice()), Some(dv.as_slice()));
    assert!(out.iter().all(|x| x.label != "2017"));
}

#[test]
fn missing_inputs_give_empty_series() {
    assert!(parse_peak_data::<&str>(None, None).is_empty());
    let only_dv = ["USGS\tX\t2018-01-01\t12.5"];
    assert_eq!(
        parse_peak_data(None, Some(only_dv.as_slice())),
        vec![p("2018", 12.5)]
    );
}
