// ==========================================
// 单个参数集成测试
// ==========================================
// 测试目标: 转换、校验、对外/设备表示
// ==========================================


use picam_params::domain::{Bounds, Literal, ParameterSpec, ScalarKind, ScalarSpec};
use picam_params::{CameraParameter, ParamError, Parameter, ParameterKind, RawValue, Scalar};

/// 超出定义边界的元素值（区间两端之外各一个；枚举之外一个）
fn outside_bounds(spec: &ScalarSpec) -> Vec<RawValue> {
    let number = |v: f64| match spec.kind {
        ScalarKind::Integer => RawValue::Int(v as i64),
        _ => RawValue::Float(v),
    };

    match spec.bounds {
        Bounds::Range { min, max } => {
            let mut values = vec![number(min - 1.0)];
            if max.is_finite() {
                values.push(number(max + 1.0));
            }
            values
        }
        Bounds::Options(options) => match spec.kind {
            ScalarKind::Category => vec![RawValue::from("not-an-option")],
            _ => {
                let largest = options
                    .iter()
                    .filter_map(|o| o.to_scalar().as_f64())
                    .fold(f64::MIN, f64::max);
                vec![number(largest + 1.0), number(45.0)]
            }
        },
        Bounds::TypeOnly | Bounds::Undefined => Vec::new(),
    }
}

/// 在默认值基础上替换第一个元素
fn tuple_with_first(defaults: &[Literal], first: RawValue) -> RawValue {
    let mut items: Vec<RawValue> = defaults.iter().map(|l| l.to_raw()).collect();
    items[0] = first;
    RawValue::List(items)
}

#[test]
fn test_iso_accepts_listed_step() {
    test_helpers::init_logging();

    let mut iso = Parameter::of(ParameterKind::Iso, 100).expect("Failed to build iso");
    assert!(!iso.is_active(), "Parameter must stay inactive before validate()");

    assert!(iso.validate().expect("iso=100 should validate"));
    assert!(iso.is_active());
    assert_eq!(iso.val(), Scalar::Int(100));
}

#[test]
fn test_iso_rejects_value_outside_steps() {
    let mut iso = Parameter::of(ParameterKind::Iso, 150).expect("Failed to build iso");
    let err = iso.validate().unwrap_err();
    assert!(matches!(err, ParamError::Validation { ref name, .. } if name == "iso"));
    assert!(!iso.is_active());
}

#[test]
fn test_bounded_range_is_inclusive() {
    assert!(Parameter::validated(ParameterKind::Brightness, 100).is_ok());
    assert!(Parameter::validated(ParameterKind::Brightness, -100).is_ok());
    assert!(Parameter::validated(ParameterKind::Brightness, 101).is_err());
    assert!(Parameter::validated(ParameterKind::ExposureCompensation, -26).is_err());
}

#[test]
fn test_every_bounded_parameter_rejects_out_of_bounds_values() {
    let mut checked = 0;

    for kind in ParameterKind::ALL {
        let candidates: Vec<RawValue> = match kind.spec() {
            ParameterSpec::Scalar(spec) => outside_bounds(spec),
            ParameterSpec::Tuple(spec) => outside_bounds(spec.element)
                .into_iter()
                .map(|v| tuple_with_first(spec.default, v))
                .collect(),
        };
        assert!(!candidates.is_empty(), "{} has no bounds to check", kind);

        for value in candidates {
            let mut param = Parameter::of(kind, value.clone())
                .unwrap_or_else(|e| panic!("{} should build from {}: {}", kind, value, e));
            let result = param.validate();
            assert!(
                matches!(result, Err(ParamError::Validation { .. })),
                "{} accepted {}",
                kind,
                value
            );
            assert!(!param.is_active());
            checked += 1;
        }
    }

    assert!(checked > ParameterKind::ALL.len());
}

#[test]
fn test_specific_out_of_bounds_values() {
    assert!(Parameter::validated(ParameterKind::Rotation, 45).is_err());
    assert!(Parameter::validated(ParameterKind::Framerate, 30.5).is_err());
    assert!(Parameter::validated(ParameterKind::AnalogGain, 31.0).is_err());
    assert!(Parameter::validated(ParameterKind::DigitalGain, 31.0).is_err());
    assert!(Parameter::validated(ParameterKind::Saturation, -101).is_err());
    assert!(Parameter::validated(ParameterKind::Resolution, (3001, 960)).is_err());
    assert!(Parameter::validated(ParameterKind::AwbGains, "9,1").is_err());
    assert!(Parameter::validated(ParameterKind::AwbGains, "8,1").is_ok());
}

#[test]
fn test_text_input_is_coerced() {
    let iso = Parameter::validated(ParameterKind::Iso, "400").unwrap();
    assert_eq!(iso.val(), Scalar::Int(400));

    let framerate = Parameter::validated(ParameterKind::Framerate, "24").unwrap();
    assert_eq!(framerate.val(), Scalar::Float(24.0));
}

#[test]
fn test_uncoercible_text_fails_construction() {
    let err = Parameter::of(ParameterKind::Brightness, "bright").unwrap_err();
    assert!(matches!(err, ParamError::Coercion { .. }));
}

#[test]
fn test_category_membership() {
    assert!(Parameter::validated(ParameterKind::ExposureMode, "night").is_ok());
    assert!(Parameter::validated(ParameterKind::AwbMode, "tungsten").is_ok());
    assert!(Parameter::validated(ParameterKind::AwbMode, "purple").is_err());
}

#[test]
fn test_resolution_zero_is_valid() {
    let resolution = Parameter::validated(ParameterKind::Resolution, (0, 0)).unwrap();
    assert_eq!(resolution.val(), Scalar::Text("0,0".to_string()));
    assert_eq!(
        resolution.machine(),
        RawValue::List(vec![RawValue::Int(0), RawValue::Int(0)])
    );
}

#[test]
fn test_zoom_is_float_coerced() {
    let zoom = Parameter::validated(ParameterKind::Zoom, (0, 0, 1, 1)).unwrap();
    assert_eq!(zoom.val(), Scalar::Text("0.0,0.0,1.0,1.0".to_string()));
    assert_eq!(zoom.length(), 4);
}

#[test]
fn test_tuple_length_mismatch() {
    let err = Parameter::of(ParameterKind::AwbGains, "1,2,3").unwrap_err();
    assert!(matches!(
        err,
        ParamError::LengthMismatch {
            expected: 2,
            actual: 3,
            ..
        }
    ));
}

#[test]
fn test_tuple_element_out_of_bounds_blocks_activation() {
    let mut zoom = Parameter::of(ParameterKind::Zoom, (0.0, 0.0, 2.0, 1.0)).unwrap();
    assert!(zoom.validate().is_err());
    assert!(!zoom.is_active());
}

#[test]
fn test_tuple_val_round_trips() {
    let gains = Parameter::validated(ParameterKind::AwbGains, (1.5, 1.25)).unwrap();
    let Scalar::Text(text) = gains.val() else {
        panic!("tuple val must be text");
    };
    assert_eq!(text, "1.5,1.25");

    let reparsed = Parameter::validated(ParameterKind::AwbGains, text.as_str()).unwrap();
    assert_eq!(gains, reparsed);
}

#[test]
fn test_validate_is_idempotent() {
    let mut resolution = Parameter::of(ParameterKind::Resolution, (640, 480)).unwrap();
    assert!(resolution.validate().unwrap());
    assert!(resolution.validate().unwrap());
    assert_eq!(resolution.val(), Scalar::Text("640,480".to_string()));
}

#[test]
fn test_defaults() {
    let framerate = Parameter::with_default(ParameterKind::Framerate).unwrap();
    assert_eq!(framerate.val(), Scalar::Float(30.0));

    let awb_gains = Parameter::with_default(ParameterKind::AwbGains).unwrap();
    assert_eq!(awb_gains.val(), Scalar::Text("0.0,0.0".to_string()));

    let mode = Parameter::with_default(ParameterKind::ExposureMode).unwrap();
    assert_eq!(mode.val(), Scalar::Text("auto".to_string()));
}

#[test]
fn test_dependency_declarations() {
    assert!(ParameterKind::ShutterSpeed.is_dependent());
    assert!(ParameterKind::AwbGains.is_dependent());
    assert!(!ParameterKind::Iso.is_dependent());
    assert_eq!("zoom".parse::<ParameterKind>().unwrap(), ParameterKind::Zoom);
    assert!("color_effects".parse::<ParameterKind>().is_err());
}
