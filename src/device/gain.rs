// ==========================================
// 相机参数模型 - 增益寄存器写入
// ==========================================
// analog_gain / digital_gain 不能走通用属性写入，
// 需要以有理数写入相机控制端口的专用寄存器
// 状态码: 0 = 成功, 4 = 驱动版本不支持, 其他 = 通用失败
// ==========================================

use crate::domain::value::Rational;
use crate::error::{ParamError, ParamResult};
use std::fmt;
use std::str::FromStr;
use tracing::{error, info};

/// 相机参数组基址
pub const PARAMETER_GROUP_CAMERA: u32 = 0x0001_0000;

/// 有理数分母上限
pub const RATIONAL_DENOMINATOR_LIMIT: i64 = 65536;

/// 驱动返回: 功能不支持
pub const STATUS_UNSUPPORTED: i32 = 4;

// ==========================================
// GainKind - 增益种类
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GainKind {
    Analog,
    Digital,
}

impl GainKind {
    /// 寄存器编号
    pub fn register(self) -> u32 {
        match self {
            GainKind::Analog => PARAMETER_GROUP_CAMERA + 0x59,
            GainKind::Digital => PARAMETER_GROUP_CAMERA + 0x5A,
        }
    }

    /// 对应的参数名
    pub fn parameter_name(self) -> &'static str {
        match self {
            GainKind::Analog => "analog_gain",
            GainKind::Digital => "digital_gain",
        }
    }
}

impl fmt::Display for GainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.parameter_name())
    }
}

impl FromStr for GainKind {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "analog_gain" => Ok(GainKind::Analog),
            "digital_gain" => Ok(GainKind::Digital),
            other => {
                error!("Gain {} is not valid", other);
                Err(ParamError::InvalidGain(other.to_string()))
            }
        }
    }
}

// ==========================================
// GainRegisterPort Trait
// ==========================================
// 用途: 相机控制端口的有理数寄存器写入
// 实现者: 宿主程序对驱动调用的封装 / MemoryCamera
pub trait GainRegisterPort {
    /// 写入有理数寄存器，返回驱动状态码
    fn set_rational(&mut self, register: u32, value: Rational) -> i32;
}

/// 设置传感器增益
///
/// # 参数
/// - port: 相机控制端口
/// - gain: "analog_gain" 或 "digital_gain"
/// - value: 增益值（转换为分母不超过 65536 的有理数）
///
/// # 返回
/// - Err(InvalidGain): 增益名称无效或值无法表示为有理数
/// - Err(DriverUnsupported): 状态码 4
/// - Err(DriverFailure): 其他非零状态码
pub fn set_gain(port: &mut dyn GainRegisterPort, gain: &str, value: f64) -> ParamResult<()> {
    info!("Setting {} to {}", gain, value);
    let kind: GainKind = gain.parse()?;

    let rational = Rational::approximate(value, RATIONAL_DENOMINATOR_LIMIT)
        .ok_or_else(|| {
            error!("{} cannot be expressed as a rational", value);
            ParamError::InvalidGain(format!("{}={}", gain, value))
        })?;

    match port.set_rational(kind.register(), rational) {
        0 => Ok(()),
        STATUS_UNSUPPORTED => {
            error!("{} rejected by driver (status {})", kind, STATUS_UNSUPPORTED);
            Err(ParamError::DriverUnsupported {
                status: STATUS_UNSUPPORTED,
            })
        }
        status => {
            error!("{} rejected by driver (status {})", kind, status);
            Err(ParamError::DriverFailure { status })
        }
    }
}
