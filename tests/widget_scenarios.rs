use floodviz::map::{MapCall, RecordingMap};
use floodviz::models::{Dataset, Sample};
use floodviz::selection::{LineClass, Visibility};
use floodviz::source::parse_samples;
use floodviz::{ChartConfig, HydrographWidget};

const HOUR: i64 = 3_600_000;

fn site(key: &str, name: &str, base: f64, offset: i64) -> Vec<Sample> {
    (0..12)
        .map(|i| Sample {
            series_key: key.into(),
            timestamp: 1_493_683_200_000 + offset + i * HOUR,
            value: base * (1.0 + i as f64 / 4.0),
            time: format!("2017-05-02 {:02}:00", i),
            timezone: "EST".into(),
            display_name: name.into(),
        })
        .collect()
}

fn three_sites() -> Dataset {
    let mut all = site("A", "Potomac", 1_500.0, 0);
    all.extend(site("B", "Monocacy", 300.0, HOUR / 3));
    all.extend(site("C", "Seneca", 80.0, 2 * HOUR / 3));
    Dataset::from_samples(all).unwrap()
}

fn chart(display: &[&str]) -> HydrographWidget<RecordingMap> {
    let cfg = ChartConfig {
        display_ids: display.iter().map(|s| s.to_string()).collect(),
        ..Default::default()
    };
    let mut w = HydrographWidget::new(cfg, RecordingMap::new());
    w.load(three_sites());
    w
}

#[test]
fn load_accents_initial_selection() {
    let w = chart(&["A", "B"]);
    assert_eq!(
        w.map().calls(),
        &[MapCall::Accent("A".into()), MapCall::Accent("B".into())]
    );
    assert_eq!(w.lines().len(), 2);
    assert_eq!(w.render_count(), 1);
}

#[test]
fn change_lines_replaces_everything() {
    let mut w = chart(&["A", "B"]);
    w.map_mut().take();

    w.change_lines(["C"]);

    assert_eq!(w.display_ids(), ["C".to_string()]);
    assert_eq!(w.lines().len(), 1);
    assert_eq!(w.lines()[0].key, "C");
    let keys = w.surface().keys();
    assert_eq!(keys.len(), 1);
    assert!(keys.contains("C"));
    assert_eq!(w.surface().len(), 12);
    assert_eq!(w.map().calls(), &[MapCall::Accent("C".into())]);
}

#[test]
fn change_lines_only_accents_new_keys() {
    let mut w = chart(&["A", "B"]);
    w.map_mut().take();
    w.change_lines(["B", "C"]);
    assert_eq!(w.map().calls(), &[MapCall::Accent("C".into())]);
}

#[test]
fn show_then_hide_restores_selection() {
    let mut w = chart(&["A"]);
    let before = w.display_ids().to_vec();

    w.show(["B", "C"]);
    assert_eq!(w.display_ids().len(), 3);
    w.hide(["B", "C"]);

    assert_eq!(w.display_ids(), before.as_slice());
    assert_eq!(w.visibility("B"), Visibility::Hidden);
}

#[test]
fn unknown_ids_are_ignored() {
    let mut w = chart(&["A"]);
    w.map_mut().take();
    w.show(["nope"]);
    assert_eq!(w.display_ids(), ["A".to_string()]);
    assert!(w.map().calls().is_empty());
}

#[test]
fn hover_at_exact_position_notifies_map() {
    let mut w = chart(&["A", "B"]);
    w.map_mut().take();
    let target = w.dataset().unwrap().get("B").unwrap().samples()[5].clone();
    let (x, y) = w.scales().project(&target);

    w.pointer_move(x, y);

    assert_eq!(w.hovered(), Some(&target));
    assert_eq!(
        w.map().calls(),
        &[MapCall::MouseMove {
            name: "Monocacy".into(),
            key: "B".into()
        }]
    );
    let line = w.lines().iter().find(|l| l.key == "B").unwrap();
    assert_eq!(line.class, LineClass::Active);
    assert_eq!((w.focus().x, w.focus().y), (x, y));
    assert!(w.focus().label.starts_with("B: "));

    w.pointer_leave();
    assert_eq!(w.map().calls().last(), Some(&MapCall::MouseOut));
    assert!(w.focus().is_off_canvas());
    assert!(w.lines().iter().all(|l| l.class == LineClass::Inactive));
}

#[test]
fn moving_within_one_cell_notifies_once() {
    let mut w = chart(&["A"]);
    w.map_mut().take();
    let target = w.dataset().unwrap().get("A").unwrap().samples()[3].clone();
    let (x, y) = w.scales().project(&target);
    w.pointer_move(x, y);
    w.pointer_move(x + 0.5, y + 0.5);
    assert_eq!(w.map().calls().len(), 1);
}

#[test]
fn click_removes_exactly_one_key() {
    let mut w = chart(&["A", "B", "C"]);
    w.map_mut().take();
    let target = w.dataset().unwrap().get("A").unwrap().samples()[7].clone();
    let (x, y) = w.scales().project(&target);

    let removed = w.click(x, y);

    assert_eq!(removed.as_deref(), Some("A"));
    assert_eq!(w.display_ids(), ["B".to_string(), "C".to_string()]);
    assert_eq!(w.visibility("A"), Visibility::Hidden);
    assert!(w.map().calls().contains(&MapCall::RemoveAccent("A".into())));
    assert_eq!(w.activated(), Some("A"));
    assert!(!w.surface().keys().contains("A"));

    // Pointer activity does not bring it back.
    let others: Vec<Sample> = w.displayed_samples().into_iter().take(5).cloned().collect();
    for s in &others {
        let (x, y) = w.scales().project(s);
        w.pointer_move(x, y);
    }
    assert_eq!(w.visibility("A"), Visibility::Hidden);

    w.show(["A"]);
    assert_eq!(w.visibility("A"), Visibility::Visible);
}

#[test]
fn rerender_drops_hover_without_notifying() {
    let mut w = chart(&["A", "B"]);
    let target = w.dataset().unwrap().get("A").unwrap().samples()[2].clone();
    let (x, y) = w.scales().project(&target);
    w.pointer_move(x, y);
    w.map_mut().take();

    w.show(["C"]);

    assert!(w.hovered().is_none());
    assert!(w.focus().is_off_canvas());
    assert_eq!(w.map().calls(), &[MapCall::Accent("C".into())]);
}

#[test]
fn vertical_domain_follows_displayed_subset() {
    let mut w = chart(&["A", "C"]);
    assert_eq!(w.scales().y.domain(), (20.0, 1_500.0 * (1.0 + 11.0 / 4.0)));

    w.hide(["A"]);
    let (lo, hi) = w.scales().y.domain();
    assert_eq!(lo, 20.0);
    assert_eq!(hi, 80.0 * (1.0 + 11.0 / 4.0));
}

#[test]
fn empty_selection_has_no_hits() {
    let mut w = chart(&["A"]);
    w.change_lines(Vec::<String>::new());
    assert!(w.lines().is_empty());
    assert!(w.surface().is_empty());
    w.pointer_move(10.0, 10.0);
    assert!(w.hovered().is_none());
}

#[test]
fn extreme_timestamps_load_without_overflow() {
    let samples = parse_samples(
        r#"[
          {"key":"A","time_mili":-9e18,"value":"150","time":"t0","timezone":"EST","name":"Alpha"},
          {"key":"A","time_mili":9e18,"value":"300","time":"t1","timezone":"EST","name":"Alpha"}
        ]"#,
    )
    .unwrap();
    let cfg = ChartConfig {
        display_ids: vec!["A".into()],
        ..Default::default()
    };
    let mut w = HydrographWidget::new(cfg, RecordingMap::new());
    w.load(Dataset::from_samples(samples).unwrap());

    let xs: Vec<f64> = w.lines()[0].points.iter().map(|p| p.0).collect();
    assert_eq!(xs, vec![0.0, 890.0]);
    assert_eq!(w.surface().len(), 2);
    let last = w.dataset().unwrap().get("A").unwrap().samples()[1].clone();
    let (x, y) = w.scales().project(&last);
    w.pointer_move(x, y);
    assert_eq!(w.hovered(), Some(&last));
}

#[test]
fn below_floor_sample_has_no_cell() {
    let mk = |t: i64, v: f64| Sample {
        series_key: "A".into(),
        timestamp: t,
        value: v,
        time: format!("t{t}"),
        timezone: "EST".into(),
        display_name: "Alpha".into(),
    };
    let cfg = ChartConfig {
        display_ids: vec!["A".into()],
        ..Default::default()
    };
    let mut w = HydrographWidget::new(cfg, RecordingMap::new());
    w.load(Dataset::from_samples(vec![mk(0, 2_000.0), mk(500, 400.0), mk(1_000, 1.0)]).unwrap());

    // Drawn as part of the line, but projected under the bottom margin.
    assert_eq!(w.lines()[0].points.len(), 3);
    let low = w.dataset().unwrap().get("A").unwrap().samples()[2].clone();
    let (x, y) = w.scales().project(&low);
    assert!(y > 440.0 + 30.0, "y = {y}");

    assert_eq!(w.surface().len(), 2);
    for p in w.surface().points() {
        assert_eq!(w.surface().find(p.x, p.y).map(|h| &h.sample), Some(&p.sample));
    }
    w.map_mut().take();
    w.pointer_move(x, y);
    assert!(w.hovered().is_none());
    assert!(w.map().calls().is_empty());
}
