// ==========================================
// 设备同步集成测试
// ==========================================
// 测试目标: 推送顺序、跳过规则、失败容忍与增益寄存器
// ==========================================


use picam_params::device::set_gain;
use picam_params::{
    CameraDevice, CameraParameter, GainKind, MemoryCamera, ParamError, Parameter, ParameterKind,
    ParameterSet, Rational, RawValue,
};
use test_helpers::{fresh_camera, manual_set};

fn written(camera: &MemoryCamera) -> Vec<&str> {
    camera.writes().iter().map(|(name, _)| name.as_str()).collect()
}

#[test]
fn test_modes_are_written_before_dependent_values() {
    test_helpers::init_logging();

    let set = manual_set("off", "off");
    let mut camera = fresh_camera();
    let snapshot = set.update_cam(&mut camera);

    // zoom 与设备一致，不写入
    assert_eq!(
        written(&camera),
        vec!["awb_mode", "exposure_mode", "iso", "awb_gains", "shutter_speed"]
    );
    assert_eq!(
        camera.attr("awb_gains"),
        Some(&RawValue::List(vec![RawValue::Float(1.5), RawValue::Float(1.2)]))
    );
    assert_eq!(snapshot["iso"], Some(RawValue::Int(100)));
    assert_eq!(snapshot["rotation"], None);
}

#[test]
fn test_second_push_is_a_no_op() {
    let set = manual_set("auto", "off");
    let mut camera = fresh_camera();

    set.update_cam(&mut camera);
    let first = camera.writes().len();
    assert_eq!(written(&camera), vec!["awb_mode", "iso", "awb_gains"]);

    set.update_cam(&mut camera);
    assert_eq!(camera.writes().len(), first);
}

#[test]
fn test_shutter_speed_compares_against_exposure_speed() {
    let set = manual_set("off", "auto");
    let mut camera = fresh_camera()
        .with_attr("exposure_mode", "off")
        .with_attr("exposure_speed", 20000)
        .with_attr("iso", 100);

    set.update_cam(&mut camera);
    assert!(written(&camera).is_empty());
}

#[test]
fn test_inactive_parameters_are_not_written() {
    let set = manual_set("auto", "auto");
    let mut camera = fresh_camera();
    set.update_cam(&mut camera);

    assert!(!written(&camera).contains(&"shutter_speed"));
    assert!(!written(&camera).contains(&"awb_gains"));
}

#[test]
fn test_exposure_speed_is_never_written() {
    let set = ParameterSet::new(vec![("exposure_speed", 5000)], false).unwrap();
    let mut camera = fresh_camera();
    set.update_cam(&mut camera);
    assert!(written(&camera).is_empty());
}

#[test]
fn test_rejected_write_does_not_stop_sync() {
    let set = manual_set("off", "off");
    let mut camera = fresh_camera().read_only("awb_mode").failing("iso");

    let snapshot = set.update_cam(&mut camera);
    assert_eq!(
        written(&camera),
        vec!["exposure_mode", "awb_gains", "shutter_speed"]
    );
    assert_eq!(snapshot["iso"], None);
    assert_eq!(snapshot["awb_mode"], Some(RawValue::Text("auto".to_string())));
}

#[test]
fn test_unreadable_attribute_falls_back_to_default() {
    let brightness = Parameter::validated(ParameterKind::Brightness, 70).unwrap();
    let camera = MemoryCamera::new();
    assert_eq!(brightness.read_back(&camera), RawValue::Int(50));
}

#[test]
fn test_gain_register_path() {
    let set = ParameterSet::new(vec![("analog_gain", 2.5), ("digital_gain", 1.5)], false).unwrap();
    let mut camera = MemoryCamera::new();

    assert_eq!(set.update_gains(&mut camera).unwrap(), 2);
    assert_eq!(camera.register(GainKind::Analog.register()), Rational::new(5, 2));
    assert_eq!(camera.register(0x1005A), Rational::new(3, 2));
    assert!(camera.get_attr("analog_gain").is_err());
}

#[test]
fn test_inactive_gain_is_skipped() {
    let mut set = ParameterSet::empty();
    set.insert(
        "analog_gain",
        Parameter::of(ParameterKind::AnalogGain, 3.0).unwrap(),
    );
    let mut camera = MemoryCamera::new();
    assert_eq!(set.update_gains(&mut camera).unwrap(), 0);
    assert_eq!(camera.register(0x10059), None);
}

#[test]
fn test_gain_driver_status_mapping() {
    let mut unsupported = MemoryCamera::new().with_register_status(4);
    let err = set_gain(&mut unsupported, "analog_gain", 2.0).unwrap_err();
    assert!(matches!(err, ParamError::DriverUnsupported { status: 4 }));

    let mut broken = MemoryCamera::new().with_register_status(7);
    let err = set_gain(&mut broken, "digital_gain", 2.0).unwrap_err();
    assert!(matches!(err, ParamError::DriverFailure { status: 7 }));
}

#[test]
fn test_unknown_gain_name_is_rejected() {
    let mut camera = MemoryCamera::new();
    let err = set_gain(&mut camera, "exposure_gain", 2.0).unwrap_err();
    assert!(matches!(err, ParamError::InvalidGain(_)));
}
