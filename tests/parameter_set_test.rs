// ==========================================
// ParameterSet 集成测试
// ==========================================
// 测试目标: 构造、依赖判定、差集、查询串与文件持久化
// ==========================================


use picam_params::{
    CameraParameter, ParamInput, Parameter, ParameterKind, ParameterSet, Scalar, TextEncoding,
};
use test_helpers::manual_set;

#[test]
fn test_dependency_gating_follows_modes() {
    test_helpers::init_logging();

    let manual = manual_set("off", "off");
    assert!(manual["shutter_speed"].is_active());
    assert!(manual["awb_gains"].is_active());

    let auto = manual_set("auto", "auto");
    assert!(!auto["shutter_speed"].is_active());
    assert!(!auto["awb_gains"].is_active());
    assert!(auto["iso"].is_active());
}

#[test]
fn test_cross_verify_does_not_reactivate() {
    let mut set = manual_set("auto", "off");
    assert!(!set["shutter_speed"].is_active());

    // 切换到手动曝光后，已失活的参数需要重新 validate() 才能激活
    set.insert(
        "exposure_mode",
        Parameter::validated(ParameterKind::ExposureMode, "off").unwrap(),
    );
    set.cross_verify();
    assert!(!set["shutter_speed"].is_active());

    set.get_mut("shutter_speed").unwrap().validate().unwrap();
    set.cross_verify();
    assert!(set["shutter_speed"].is_active());
}

#[test]
fn test_difference_reports_changes_only() {
    let current = manual_set("off", "off");
    let mut desired = current.copy();
    desired.insert(
        "iso",
        Parameter::validated(ParameterKind::Iso, 800).unwrap(),
    );

    let changes = &desired - &current;
    assert_eq!(changes.len(), 1);
    assert_eq!(changes["iso"].val(), Scalar::Int(800));

    assert!((&current - &current).is_empty());
}

#[test]
fn test_difference_keeps_entries_missing_from_other() {
    let full = manual_set("off", "off");
    let partial = ParameterSet::new(vec![("iso", 100)], false).unwrap();

    let diff = full.difference(&partial);
    assert_eq!(diff.len(), full.len() - 1);
    assert!(!diff.contains_key("iso"));
}

#[test]
fn test_query_string_round_trip() {
    let set = manual_set("off", "off");

    let query = set.urlencode(TextEncoding::Utf8).unwrap();
    let text = String::from_utf8(query.clone()).unwrap();
    assert!(text.contains("zoom=0.0%2C0.0%2C1.0%2C1.0"));
    assert!(text.contains("exposure_mode=off"));

    let mut restored = ParameterSet::from_query(&query, TextEncoding::Utf8).unwrap();
    restored.validate();
    restored.cross_verify();
    assert_eq!(restored, set);
}

#[test]
fn test_query_round_trip_with_latin1() {
    let set = ParameterSet::new(
        vec![
            ("awb_mode", ParamInput::from("sunlight")),
            ("resolution", ParamInput::from((1920, 1080))),
        ],
        false,
    )
    .unwrap();

    let query = set.urlencode(TextEncoding::Latin1).unwrap();
    let restored = ParameterSet::from_query(&query, TextEncoding::Latin1).unwrap();
    assert_eq!(restored, set);
}

#[test]
fn test_query_with_unsupported_and_duplicate_keys() {
    let set = ParameterSet::from_query(
        b"iso=200&iso=400&color_effects=128%2C128&brightness=",
        TextEncoding::Utf8,
    )
    .unwrap();
    assert_eq!(set.len(), 1);
    assert_eq!(set["iso"].val(), Scalar::Int(200));
}

#[test]
fn test_invalid_query_value_is_an_error() {
    assert!(ParameterSet::from_query(b"awb_mode=purple", TextEncoding::Utf8).is_err());
    assert!(ParameterSet::from_query(b"zoom=0%2C0%2C1", TextEncoding::Utf8).is_err());
}

#[test]
fn test_persist_and_load() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("params.json");

    let set = manual_set("off", "off");
    set.persist(&path).expect("Failed to persist");

    let loaded = ParameterSet::load_persisted(&path).expect("Failed to load");
    assert_eq!(loaded, set);
    assert_eq!(loaded.as_dict(), set.as_dict());
}

#[test]
fn test_load_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ParameterSet::load_persisted(dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, picam_params::ParamError::Io(_)));
}

#[test]
fn test_display_lists_external_values() {
    let set = ParameterSet::new(vec![("iso", 100)], false).unwrap();
    assert_eq!(set.to_string(), "ParameterSet({iso: 100})");
}
