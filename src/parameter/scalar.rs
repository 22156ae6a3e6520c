// ==========================================
// 相机参数模型 - 标量参数
// ==========================================
// 覆盖: 布尔 / 枚举类别 / 整数区间 / 浮点区间
// 行为差异全部由 ScalarSpec 描述，不再按类型派生
// ==========================================

use super::CameraParameter;
use crate::domain::schema::{Bounds, ScalarSpec, SyncPolicy};
use crate::domain::value::{CoercionFailure, RawValue, Scalar, ScalarKind};
use crate::error::{ParamError, ParamResult};
use std::fmt;
use tracing::error;

// ==========================================
// ScalarParameter - 标量参数
// ==========================================
#[derive(Debug, Clone)]
pub struct ScalarParameter {
    spec: &'static ScalarSpec,
    value: Scalar,
    active: bool,
}

impl ScalarParameter {
    /// 构造标量参数
    ///
    /// # 参数
    /// - spec: 参数定义
    /// - value: 原始值；None 时使用默认值，单元素列表会被解包
    ///
    /// # 返回
    /// - Err(Coercion): 原始值无法转换为声明类型
    pub fn new(spec: &'static ScalarSpec, value: Option<RawValue>) -> ParamResult<Self> {
        let raw = match value {
            None => spec.default.to_raw(),
            Some(v) => v.unwrap_single(),
        };
        let value = coerce_scalar(spec, &raw)?;
        Ok(Self {
            spec,
            value,
            active: false,
        })
    }

    pub fn spec(&self) -> &'static ScalarSpec {
        self.spec
    }

    pub fn value(&self) -> &Scalar {
        &self.value
    }
}

/// 按定义转换单个原始值（含浮点舍入）
pub(crate) fn coerce_scalar(spec: &ScalarSpec, raw: &RawValue) -> ParamResult<Scalar> {
    let value = spec.kind.coerce(spec.name, raw).map_err(coercion_error)?;
    Ok(round_value(spec, value))
}

/// 元组元素的无损转换
pub(crate) fn coerce_element(spec: &ScalarSpec, raw: &RawValue) -> ParamResult<Scalar> {
    let value = spec
        .kind
        .coerce_lossless(spec.name, raw)
        .map_err(coercion_error)?;
    Ok(round_value(spec, value))
}

fn round_value(spec: &ScalarSpec, value: Scalar) -> Scalar {
    match (value, spec.round_digits) {
        (Scalar::Float(v), Some(digits)) if v.is_finite() => {
            let factor = 10f64.powi(digits);
            Scalar::Float((v * factor).round() / factor)
        }
        (value, _) => value,
    }
}

pub(crate) fn coercion_error(failure: CoercionFailure) -> ParamError {
    error!(
        "Could not coerce {} to type {} (parameter {})",
        failure.input, failure.target, failure.name
    );
    ParamError::coercion(&failure.name, failure.input, failure.target)
}

impl CameraParameter for ScalarParameter {
    type Value = Scalar;

    fn name(&self) -> &'static str {
        self.spec.name
    }

    fn length(&self) -> usize {
        1
    }

    fn coerce(&self, raw: RawValue) -> ParamResult<Scalar> {
        coerce_scalar(self.spec, &raw.unwrap_single())
    }

    fn validate(&mut self) -> ParamResult<bool> {
        let name = self.spec.name;

        if !self.spec.kind.accepts(&self.value) {
            error!(
                "Passed value must be of type {}. You passed {} ({} type)",
                self.spec.kind,
                self.value,
                self.value.kind()
            );
            return Err(ParamError::validation(
                name,
                format!("期望类型 {}，实际类型 {}", self.spec.kind, self.value.kind()),
            ));
        }

        match self.spec.bounds.contains(&self.value) {
            Some(true) => {}
            Some(false) => {
                let message = match self.spec.bounds {
                    Bounds::Options(_) => format!(
                        "Passed value must be one of {}. You passed {}",
                        self.spec.bounds, self.value
                    ),
                    _ => format!(
                        "Passed value must be within {}. You passed {}",
                        self.spec.bounds, self.value
                    ),
                };
                error!("Param: {}. {}", name, message);
                return Err(ParamError::validation(name, message));
            }
            None => {
                error!("Param: {}. Please define either options OR (min AND max)", name);
                return Err(ParamError::Configuration {
                    name: name.to_string(),
                });
            }
        }

        self.active = true;
        Ok(self.active)
    }

    fn val(&self) -> Scalar {
        self.value.clone()
    }

    fn machine(&self) -> RawValue {
        RawValue::from(self.value.clone())
    }

    fn default_machine(&self) -> RawValue {
        RawValue::from(self.spec.default.to_scalar())
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn sync_policy(&self) -> SyncPolicy {
        self.spec.sync
    }

    fn normalize(&self, raw: RawValue) -> ParamResult<RawValue> {
        ScalarParameter::new(self.spec, Some(raw)).map(|p| p.machine())
    }
}

// 同一定义、同值、同激活状态即相等
impl PartialEq for ScalarParameter {
    fn eq(&self, other: &Self) -> bool {
        self.spec.name == other.spec.name
            && self.value == other.value
            && self.active == other.active
    }
}

impl fmt::Display for ScalarParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(value={})", self.spec.name, self.value)
    }
}

impl ScalarKind {
    pub(crate) fn accepts(&self, value: &Scalar) -> bool {
        value.kind() == *self
    }
}
