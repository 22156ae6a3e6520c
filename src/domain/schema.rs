// ==========================================
// 相机参数模型 - 参数注册表
// ==========================================
// 职责: 静态定义全部受支持参数的类型、默认值、边界与依赖
// 红线: 注册表只读，运行期不可修改
// ==========================================

use super::value::{Literal, Scalar, ScalarKind};
use crate::error::ParamError;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

// ==========================================
// 边界策略 (Bounds)
// ==========================================
// options 与 [min, max] 二选一；两者皆无属于配置错误
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bounds {
    /// 闭集枚举
    Options(&'static [Literal]),
    /// 数值闭区间 [min, max]
    Range { min: f64, max: f64 },
    /// 仅做类型检查（布尔参数）
    TypeOnly,
    /// 未定义边界（校验时报配置错误）
    Undefined,
}

impl Bounds {
    pub fn contains(&self, value: &Scalar) -> Option<bool> {
        match self {
            Bounds::Options(options) => {
                Some(options.iter().any(|o| o.to_scalar().loosely_eq(value)))
            }
            Bounds::Range { min, max } => value.as_f64().map(|v| v >= *min && v <= *max),
            Bounds::TypeOnly => Some(true),
            Bounds::Undefined => None,
        }
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bounds::Options(options) => {
                let items: Vec<String> = options.iter().map(|o| o.to_string()).collect();
                write!(f, "[{}]", items.join(", "))
            }
            Bounds::Range { min, max } => write!(f, "[{}, {}]", min, max),
            Bounds::TypeOnly => write!(f, "<any>"),
            Bounds::Undefined => write!(f, "<undefined>"),
        }
    }
}

// ==========================================
// 设备同步策略 (Sync Policy)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPolicy {
    /// 通用属性读写（按参数名）
    Attribute,
    /// 设备计算值，只读：推送为空操作
    ReadOnly,
    /// 写入自身属性，但从另一个属性读回（shutter_speed → exposure_speed）
    ReadBackFrom(&'static str),
    /// 走增益寄存器专用通道，通用推送为空操作
    GainRegister,
}

// ==========================================
// 参数定义
// ==========================================

/// 标量参数定义
#[derive(Debug, Clone, Copy)]
pub struct ScalarSpec {
    pub name: &'static str,
    pub kind: ScalarKind,
    pub default: Literal,
    pub bounds: Bounds,
    /// 浮点参数构造时保留的小数位
    pub round_digits: Option<i32>,
    pub depends_on: &'static [(&'static str, Literal)],
    pub sync: SyncPolicy,
}

/// 定长元组参数定义（由标量元素定义组合而成）
#[derive(Debug, Clone, Copy)]
pub struct TupleSpec {
    pub name: &'static str,
    pub length: usize,
    pub element: &'static ScalarSpec,
    pub default: &'static [Literal],
    pub depends_on: &'static [(&'static str, Literal)],
    pub sync: SyncPolicy,
}

/// 参数定义（标量 / 元组）
#[derive(Debug, Clone, Copy)]
pub enum ParameterSpec {
    Scalar(&'static ScalarSpec),
    Tuple(&'static TupleSpec),
}

impl ParameterSpec {
    pub fn name(&self) -> &'static str {
        match self {
            ParameterSpec::Scalar(s) => s.name,
            ParameterSpec::Tuple(t) => t.name,
        }
    }

    pub fn length(&self) -> usize {
        match self {
            ParameterSpec::Scalar(_) => 1,
            ParameterSpec::Tuple(t) => t.length,
        }
    }

    pub fn depends_on(&self) -> &'static [(&'static str, Literal)] {
        match self {
            ParameterSpec::Scalar(s) => s.depends_on,
            ParameterSpec::Tuple(t) => t.depends_on,
        }
    }
}

// ==========================================
// 参数种类 (Parameter Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParameterKind {
    AwbGains,
    AwbMode,
    ExposureMode,
    ShutterSpeed,
    ExposureSpeed,
    ExposureCompensation,
    Iso,
    Brightness,
    Rotation,
    Sharpness,
    Contrast,
    Zoom,
    Framerate,
    AnalogGain,
    DigitalGain,
    Resolution,
    Saturation,
}

impl ParameterKind {
    /// 全部受支持参数（注册顺序）
    pub const ALL: [ParameterKind; 17] = [
        ParameterKind::AwbGains,
        ParameterKind::AwbMode,
        ParameterKind::ExposureMode,
        ParameterKind::ShutterSpeed,
        ParameterKind::ExposureSpeed,
        ParameterKind::ExposureCompensation,
        ParameterKind::Iso,
        ParameterKind::Brightness,
        ParameterKind::Rotation,
        ParameterKind::Sharpness,
        ParameterKind::Contrast,
        ParameterKind::Zoom,
        ParameterKind::Framerate,
        ParameterKind::AnalogGain,
        ParameterKind::DigitalGain,
        ParameterKind::Resolution,
        ParameterKind::Saturation,
    ];

    pub fn spec(self) -> ParameterSpec {
        match self {
            ParameterKind::AwbGains => ParameterSpec::Tuple(&AWB_GAINS),
            ParameterKind::AwbMode => ParameterSpec::Scalar(&AWB_MODE),
            ParameterKind::ExposureMode => ParameterSpec::Scalar(&EXPOSURE_MODE),
            ParameterKind::ShutterSpeed => ParameterSpec::Scalar(&SHUTTER_SPEED),
            ParameterKind::ExposureSpeed => ParameterSpec::Scalar(&EXPOSURE_SPEED),
            ParameterKind::ExposureCompensation => ParameterSpec::Scalar(&EXPOSURE_COMPENSATION),
            ParameterKind::Iso => ParameterSpec::Scalar(&ISO),
            ParameterKind::Brightness => ParameterSpec::Scalar(&BRIGHTNESS),
            ParameterKind::Rotation => ParameterSpec::Scalar(&ROTATION),
            ParameterKind::Sharpness => ParameterSpec::Scalar(&SHARPNESS),
            ParameterKind::Contrast => ParameterSpec::Scalar(&CONTRAST),
            ParameterKind::Zoom => ParameterSpec::Tuple(&ZOOM),
            ParameterKind::Framerate => ParameterSpec::Scalar(&FRAMERATE),
            ParameterKind::AnalogGain => ParameterSpec::Scalar(&ANALOG_GAIN),
            ParameterKind::DigitalGain => ParameterSpec::Scalar(&DIGITAL_GAIN),
            ParameterKind::Resolution => ParameterSpec::Tuple(&RESOLUTION),
            ParameterKind::Saturation => ParameterSpec::Scalar(&SATURATION),
        }
    }

    pub fn name(self) -> &'static str {
        self.spec().name()
    }

    pub fn from_name(name: &str) -> Option<ParameterKind> {
        ParameterKind::ALL.iter().copied().find(|k| k.name() == name)
    }

    pub fn is_dependent(self) -> bool {
        !self.spec().depends_on().is_empty()
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ParameterKind {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParameterKind::from_name(s).ok_or_else(|| {
            warn!("Parameter {} not supported", s);
            ParamError::UnknownParameter(s.to_string())
        })
    }
}

/// 按名称查询参数定义
pub fn lookup(name: &str) -> Option<ParameterSpec> {
    ParameterKind::from_name(name).map(ParameterKind::spec)
}

/// 受支持的参数名称（注册顺序）
pub fn supported_names() -> impl Iterator<Item = &'static str> {
    ParameterKind::ALL.iter().map(|k| k.name())
}

// ==========================================
// 注册表常量
// ==========================================

const FLOAT_DIGITS: Option<i32> = Some(5);

const fn integer_range(name: &'static str, min: f64, max: f64, default: i64) -> ScalarSpec {
    ScalarSpec {
        name,
        kind: ScalarKind::Integer,
        default: Literal::Int(default),
        bounds: Bounds::Range { min, max },
        round_digits: None,
        depends_on: &[],
        sync: SyncPolicy::Attribute,
    }
}

const fn float_range(name: &'static str, min: f64, max: f64, default: f64) -> ScalarSpec {
    ScalarSpec {
        name,
        kind: ScalarKind::Float,
        default: Literal::Float(default),
        bounds: Bounds::Range { min, max },
        round_digits: FLOAT_DIGITS,
        depends_on: &[],
        sync: SyncPolicy::Attribute,
    }
}

// ===== 整数区间参数 =====

pub static SATURATION: ScalarSpec = integer_range("saturation", -100.0, 100.0, 0);
pub static SHARPNESS: ScalarSpec = integer_range("sharpness", -100.0, 100.0, 0);
pub static CONTRAST: ScalarSpec = integer_range("contrast", -100.0, 100.0, 0);
pub static BRIGHTNESS: ScalarSpec = integer_range("brightness", -100.0, 100.0, 50);
pub static EXPOSURE_COMPENSATION: ScalarSpec =
    integer_range("exposure_compensation", -25.0, 25.0, 0);

// ===== 整数枚举参数 =====

pub static ISO: ScalarSpec = ScalarSpec {
    name: "iso",
    kind: ScalarKind::Integer,
    default: Literal::Int(0),
    bounds: Bounds::Options(&[
        Literal::Int(0),
        Literal::Int(100),
        Literal::Int(200),
        Literal::Int(320),
        Literal::Int(400),
        Literal::Int(500),
        Literal::Int(640),
        Literal::Int(800),
    ]),
    round_digits: None,
    depends_on: &[],
    sync: SyncPolicy::Attribute,
};

pub static ROTATION: ScalarSpec = ScalarSpec {
    name: "rotation",
    kind: ScalarKind::Integer,
    default: Literal::Int(0),
    bounds: Bounds::Options(&[
        Literal::Int(0),
        Literal::Int(90),
        Literal::Int(180),
        Literal::Int(270),
    ]),
    round_digits: None,
    depends_on: &[],
    sync: SyncPolicy::Attribute,
};

// ===== 曝光 =====

pub static EXPOSURE_SPEED: ScalarSpec = ScalarSpec {
    sync: SyncPolicy::ReadOnly,
    ..integer_range("exposure_speed", 0.0, f64::INFINITY, 0)
};

pub static SHUTTER_SPEED: ScalarSpec = ScalarSpec {
    depends_on: &[("exposure_mode", Literal::Text("off"))],
    sync: SyncPolicy::ReadBackFrom("exposure_speed"),
    ..integer_range("shutter_speed", 0.0, f64::INFINITY, 0)
};

pub static EXPOSURE_MODE: ScalarSpec = ScalarSpec {
    name: "exposure_mode",
    kind: ScalarKind::Category,
    default: Literal::Text("auto"),
    bounds: Bounds::Options(&[
        Literal::Text("off"),
        Literal::Text("auto"),
        Literal::Text("night"),
        Literal::Text("nightpreview"),
        Literal::Text("backlight"),
        Literal::Text("spotlight"),
        Literal::Text("sports"),
        Literal::Text("snow"),
        Literal::Text("beach"),
        Literal::Text("verylong"),
        Literal::Text("fixedfps"),
        Literal::Text("antishake"),
        Literal::Text("fireworks"),
    ]),
    round_digits: None,
    depends_on: &[],
    sync: SyncPolicy::Attribute,
};

// ===== 白平衡 =====

pub static AWB_MODE: ScalarSpec = ScalarSpec {
    name: "awb_mode",
    kind: ScalarKind::Category,
    default: Literal::Text("auto"),
    bounds: Bounds::Options(&[
        Literal::Text("off"),
        Literal::Text("auto"),
        Literal::Text("sunlight"),
        Literal::Text("cloudy"),
        Literal::Text("shade"),
        Literal::Text("tungsten"),
        Literal::Text("fluorescent"),
        Literal::Text("incandescent"),
        Literal::Text("flash"),
        Literal::Text("horizon"),
    ]),
    round_digits: None,
    depends_on: &[],
    sync: SyncPolicy::Attribute,
};

pub static AWB_GAIN: ScalarSpec = float_range("awb_gain", 0.0, 8.0, 0.0);

pub static AWB_GAINS: TupleSpec = TupleSpec {
    name: "awb_gains",
    length: 2,
    element: &AWB_GAIN,
    default: &[Literal::Float(0.0), Literal::Float(0.0)],
    depends_on: &[("awb_mode", Literal::Text("off"))],
    sync: SyncPolicy::Attribute,
};

// ===== 帧率与增益 =====

pub static FRAMERATE: ScalarSpec = float_range("framerate", 0.0, 30.0, 30.0);

pub static ANALOG_GAIN: ScalarSpec = ScalarSpec {
    sync: SyncPolicy::GainRegister,
    ..float_range("analog_gain", 0.0, 30.0, 1.0)
};

pub static DIGITAL_GAIN: ScalarSpec = ScalarSpec {
    sync: SyncPolicy::GainRegister,
    ..float_range("digital_gain", 0.0, 30.0, 1.0)
};

// ===== 画面几何 =====

pub static ZOOM_COORD: ScalarSpec = float_range("zoom_coord", 0.0, 1.0, 0.0);

pub static ZOOM: TupleSpec = TupleSpec {
    name: "zoom",
    length: 4,
    element: &ZOOM_COORD,
    default: &[
        Literal::Float(0.0),
        Literal::Float(0.0),
        Literal::Float(1.0),
        Literal::Float(1.0),
    ],
    depends_on: &[],
    sync: SyncPolicy::Attribute,
};

pub static DIMENSION: ScalarSpec = integer_range("dimension", 0.0, 3000.0, 500);

pub static RESOLUTION: TupleSpec = TupleSpec {
    name: "resolution",
    length: 2,
    element: &DIMENSION,
    default: &[Literal::Int(1280), Literal::Int(960)],
    depends_on: &[],
    sync: SyncPolicy::Attribute,
};

// ===== 布尔参数模板 =====
// 注册表当前未登记布尔参数（vflip / hflip 等），保留模板供宿主自定义
pub const fn boolean(name: &'static str, default: bool) -> ScalarSpec {
    ScalarSpec {
        name,
        kind: ScalarKind::Bool,
        default: Literal::Bool(default),
        bounds: Bounds::TypeOnly,
        round_digits: None,
        depends_on: &[],
        sync: SyncPolicy::Attribute,
    }
}
