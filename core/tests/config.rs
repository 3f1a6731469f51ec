//! View configuration loading and its effect on chart requests.

use std::path::PathBuf;
use tradeview_core::{
    chart::HistoryWindow,
    command::ChartCommand,
    config::ViewConfig,
    resource::{Category, Direction, ResourceKind, CATEGORY_COUNT},
};

fn scratch_file(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("tradeview-{}-{name}", std::process::id()));
    std::fs::write(&path, content).expect("write scratch config");
    path
}

#[test]
fn empty_object_means_defaults() {
    let config = ViewConfig::from_json("{}").unwrap();
    assert_eq!(config, ViewConfig::default());
    assert_eq!(config.max_points, 300);
    assert_eq!(config.tooltip_tolerance, 0.02);
    assert!((0..CATEGORY_COUNT).all(|i| config.enabled().is_enabled(i)));
}

#[test]
fn partial_flags_override_only_what_they_name() {
    let config = ViewConfig::from_json(
        r#"{ "exports": { "fish": false }, "default_window": "last10_years", "default_direction": "export" }"#,
    )
    .unwrap();
    let enabled = config.enabled();
    assert!(!enabled.is_enabled(12));
    assert!((0..12).all(|i| enabled.is_enabled(i)));

    let request = config.chart_request();
    assert_eq!(request.direction, Direction::Export);
    assert_eq!(request.window, HistoryWindow::Last10Years);
}

#[test]
fn invalid_settings_are_rejected() {
    assert!(ViewConfig::from_json(r#"{ "max_points": 0 }"#).is_err());
    assert!(ViewConfig::from_json(r#"{ "tooltip_tolerance": 1.5 }"#).is_err());
    assert!(ViewConfig::from_json("not json").is_err());
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let _ = env_logger::builder().is_test(true).try_init();
    let path = std::env::temp_dir().join("tradeview-does-not-exist.json");
    assert_eq!(ViewConfig::load(&path).unwrap(), ViewConfig::default());
}

#[test]
fn config_file_is_read() {
    let path = scratch_file("view.json", r#"{ "imports": { "goods": false }, "max_points": 120 }"#);
    let config = ViewConfig::load(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(config.max_points, 120);
    assert!(!config.enabled().is_enabled(0));

    let broken = scratch_file("broken.json", "{ \"max_points\": ");
    let result = ViewConfig::load(&broken);
    std::fs::remove_file(&broken).ok();
    assert!(result.is_err());
}

#[test]
fn commands_edit_the_request() {
    let mut request = ViewConfig::default().chart_request();
    let goods = Category::new(Direction::Import, ResourceKind::Goods);

    assert!(ChartCommand::ToggleCategory { category: goods }.apply(&mut request));
    assert!(!request.enabled.is_enabled(0));
    assert!(!ChartCommand::SetCategory { category: goods, enabled: false }.apply(&mut request));
    assert!(ChartCommand::ToggleDirection.apply(&mut request));
    assert_eq!(request.direction, Direction::Export);
    assert!(!ChartCommand::SetDirection { direction: Direction::Export }.apply(&mut request));
    assert!(ChartCommand::SetWindow { window: HistoryWindow::Last25Years }.apply(&mut request));
}
