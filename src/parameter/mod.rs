// ==========================================
// 相机参数模型 - 参数层
// ==========================================
// 职责: 单个参数的转换、校验、对外/设备表示、设备同步
// 结构: CameraParameter 能力接口
//       ├── ScalarParameter（标量）
//       ├── TupleParameter （定长元组，组合标量元素）
//       └── Parameter      （二者的标签联合，供 ParameterSet 持有）
// ==========================================

pub mod scalar;
pub mod tuple;

pub use scalar::ScalarParameter;
pub use tuple::TupleParameter;

use crate::device::CameraDevice;
use crate::domain::schema::{ParameterKind, ParameterSpec, SyncPolicy};
use crate::domain::value::{Literal, RawValue, Scalar};
use crate::error::ParamResult;
use std::fmt;
use tracing::{debug, error, warn};

// ==========================================
// CameraParameter - 参数能力接口
// ==========================================
pub trait CameraParameter {
    /// 转换后的内部值类型
    type Value;

    /// 参数名（与设备属性名一致）
    fn name(&self) -> &'static str;

    /// 值长度（标量为 1）
    fn length(&self) -> usize;

    /// 将原始值转换为声明类型
    fn coerce(&self, raw: RawValue) -> ParamResult<Self::Value>;

    /// 校验类型与边界，成功后激活参数
    fn validate(&mut self) -> ParamResult<bool>;

    /// 对外表示（元组为逗号连接的字符串）
    fn val(&self) -> Scalar;

    /// 设备表示
    fn machine(&self) -> RawValue;

    /// 默认值的设备表示（读取失败时的替代值）
    fn default_machine(&self) -> RawValue;

    fn is_active(&self) -> bool;

    fn set_active(&mut self, active: bool);

    fn sync_policy(&self) -> SyncPolicy;

    /// 用同一定义包装一次设备读数，得到规范化的设备表示
    fn normalize(&self, raw: RawValue) -> ParamResult<RawValue>;

    /// 推送到设备
    ///
    /// 增益参数走寄存器专用通道，这里不做任何事
    fn update_cam(&self, device: &mut dyn CameraDevice) {
        if self.sync_policy() == SyncPolicy::GainRegister {
            debug!("{} is written through the gain register path", self.name());
            return;
        }
        self.push(device);
    }

    /// 比较设备当前值后写入
    ///
    /// 写入失败只记录日志，不向上传播
    fn push(&self, device: &mut dyn CameraDevice) {
        if self.sync_policy() == SyncPolicy::ReadOnly {
            debug!("{} is read-only on the device, skipping", self.name());
            return;
        }

        let desired = self.machine();
        let current = self.read_back(device);

        if desired != current && self.is_active() {
            if let Err(e) = device.set_attr(self.name(), desired.clone()) {
                error!("Could not SET parameter {} to {}: {}", self.name(), desired, e);
            }
        } else if desired == current {
            debug!("value of {} in camera already identical", self.name());
        } else {
            warn!("{} is not active", self.name());
        }
    }

    /// 读取设备当前值（shutter_speed 从 exposure_speed 读回）
    fn read_back(&self, device: &dyn CameraDevice) -> RawValue {
        let attribute = match self.sync_policy() {
            SyncPolicy::ReadBackFrom(attribute) => attribute,
            _ => self.name(),
        };
        self.read_attribute(device, attribute)
    }

    /// 读取指定设备属性并规范化
    ///
    /// 读取或转换失败时记录日志并返回默认值
    fn read_attribute(&self, device: &dyn CameraDevice, attribute: &str) -> RawValue {
        match device
            .get_attr(attribute)
            .and_then(|raw| self.normalize(raw))
        {
            Ok(value) => value,
            Err(e) => {
                error!("Could not GET parameter {} (attribute {}): {}", self.name(), attribute, e);
                self.default_machine()
            }
        }
    }
}

// ==========================================
// Parameter - 标量 / 元组 标签联合
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum Parameter {
    Scalar(ScalarParameter),
    Tuple(TupleParameter),
}

impl Parameter {
    /// 按参数种类构造
    ///
    /// # 参数
    /// - kind: 参数种类
    /// - value: 原始值；None 时使用默认值
    pub fn new(kind: ParameterKind, value: Option<RawValue>) -> ParamResult<Self> {
        match kind.spec() {
            ParameterSpec::Scalar(spec) => ScalarParameter::new(spec, value).map(Parameter::Scalar),
            ParameterSpec::Tuple(spec) => TupleParameter::new(spec, value).map(Parameter::Tuple),
        }
    }

    /// 以具体值构造
    pub fn of(kind: ParameterKind, value: impl Into<RawValue>) -> ParamResult<Self> {
        Parameter::new(kind, Some(value.into()))
    }

    /// 以默认值构造
    pub fn with_default(kind: ParameterKind) -> ParamResult<Self> {
        Parameter::new(kind, None)
    }

    /// 构造并立即校验
    pub fn validated(kind: ParameterKind, value: impl Into<RawValue>) -> ParamResult<Self> {
        let mut param = Parameter::of(kind, value)?;
        param.validate()?;
        Ok(param)
    }

    /// 参数种类（注册表外的自定义定义返回 None）
    pub fn kind(&self) -> Option<ParameterKind> {
        ParameterKind::from_name(self.name())
    }

    /// 依赖条件（参数名 → 所需值）
    pub fn depends_on(&self) -> &'static [(&'static str, Literal)] {
        match self {
            Parameter::Scalar(p) => p.spec().depends_on,
            Parameter::Tuple(p) => p.spec().depends_on,
        }
    }

    pub fn is_dependent(&self) -> bool {
        !self.depends_on().is_empty()
    }

    /// 是否由注册表中同名的定义构造（同名的宿主自定义定义不算）
    pub fn is_registered(&self) -> bool {
        match (self, self.kind().map(ParameterKind::spec)) {
            (Parameter::Scalar(p), Some(ParameterSpec::Scalar(spec))) => {
                std::ptr::eq(p.spec(), spec)
            }
            (Parameter::Tuple(p), Some(ParameterSpec::Tuple(spec))) => {
                std::ptr::eq(p.spec(), spec)
            }
            _ => false,
        }
    }

    /// 当前值是否等于给定的依赖值
    pub fn holds(&self, required: &Literal) -> bool {
        match self {
            Parameter::Scalar(p) => p.value().loosely_eq(&required.to_scalar()),
            Parameter::Tuple(p) => p.val() == Scalar::Text(required.to_string()),
        }
    }
}

impl CameraParameter for Parameter {
    type Value = RawValue;

    fn name(&self) -> &'static str {
        match self {
            Parameter::Scalar(p) => p.name(),
            Parameter::Tuple(p) => p.name(),
        }
    }

    fn length(&self) -> usize {
        match self {
            Parameter::Scalar(p) => p.length(),
            Parameter::Tuple(p) => p.length(),
        }
    }

    fn coerce(&self, raw: RawValue) -> ParamResult<RawValue> {
        match self {
            Parameter::Scalar(p) => p.coerce(raw).map(RawValue::from),
            Parameter::Tuple(p) => p
                .coerce(raw)
                .map(|values| RawValue::List(values.into_iter().map(RawValue::from).collect())),
        }
    }

    fn validate(&mut self) -> ParamResult<bool> {
        match self {
            Parameter::Scalar(p) => p.validate(),
            Parameter::Tuple(p) => p.validate(),
        }
    }

    fn val(&self) -> Scalar {
        match self {
            Parameter::Scalar(p) => p.val(),
            Parameter::Tuple(p) => p.val(),
        }
    }

    fn machine(&self) -> RawValue {
        match self {
            Parameter::Scalar(p) => p.machine(),
            Parameter::Tuple(p) => p.machine(),
        }
    }

    fn default_machine(&self) -> RawValue {
        match self {
            Parameter::Scalar(p) => p.default_machine(),
            Parameter::Tuple(p) => p.default_machine(),
        }
    }

    fn is_active(&self) -> bool {
        match self {
            Parameter::Scalar(p) => p.is_active(),
            Parameter::Tuple(p) => p.is_active(),
        }
    }

    fn set_active(&mut self, active: bool) {
        match self {
            Parameter::Scalar(p) => p.set_active(active),
            Parameter::Tuple(p) => p.set_active(active),
        }
    }

    fn sync_policy(&self) -> SyncPolicy {
        match self {
            Parameter::Scalar(p) => p.sync_policy(),
            Parameter::Tuple(p) => p.sync_policy(),
        }
    }

    fn normalize(&self, raw: RawValue) -> ParamResult<RawValue> {
        match self {
            Parameter::Scalar(p) => p.normalize(raw),
            Parameter::Tuple(p) => p.normalize(raw),
        }
    }
}

impl From<ScalarParameter> for Parameter {
    fn from(p: ScalarParameter) -> Self {
        Parameter::Scalar(p)
    }
}

impl From<TupleParameter> for Parameter {
    fn from(p: TupleParameter) -> Self {
        Parameter::Tuple(p)
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parameter::Scalar(p) => p.fmt(f),
            Parameter::Tuple(p) => p.fmt(f),
        }
    }
}
