// ==========================================
// 相机参数模型 - 定长元组参数
// ==========================================
// 组合方式: 一个 TupleSpec + 元素的 ScalarSpec
// 元素以 ScalarParameter 保存，各自校验
// 实例: resolution (2 × dimension), zoom (4 × zoom_coord), awb_gains (2 × awb_gain)
// ==========================================

use super::scalar::{coerce_element, coerce_scalar, ScalarParameter};
use super::CameraParameter;
use crate::domain::schema::{SyncPolicy, TupleSpec};
use crate::domain::value::{RawValue, Scalar};
use crate::error::{ParamError, ParamResult};
use std::fmt;
use tracing::error;

// ==========================================
// TupleParameter - 元组参数
// ==========================================
#[derive(Debug, Clone)]
pub struct TupleParameter {
    spec: &'static TupleSpec,
    elements: Vec<ScalarParameter>,
    active: bool,
}

impl TupleParameter {
    /// 构造元组参数
    ///
    /// # 参数
    /// - spec: 元组定义
    /// - value: 原始值；None 时使用默认值
    ///   - 文本: 按逗号分隔，逐项转换（"1,1"）
    ///   - 列表: 逐项无损转换
    ///   - 有理数: 仅浮点元素可接受
    ///
    /// # 返回
    /// - Err(Coercion): 任一元素转换失败
    /// - Err(LengthMismatch): 元素个数与定义长度不符
    pub fn new(spec: &'static TupleSpec, value: Option<RawValue>) -> ParamResult<Self> {
        let raw = match value {
            None => RawValue::List(spec.default.iter().map(|l| l.to_raw()).collect()),
            Some(v) => v,
        };
        let values = coerce_tuple(spec, raw)?;
        let elements = values
            .into_iter()
            .map(|v| ScalarParameter::new(spec.element, Some(RawValue::from(v))))
            .collect::<ParamResult<Vec<_>>>()?;

        Ok(Self {
            spec,
            elements,
            active: false,
        })
    }

    pub fn spec(&self) -> &'static TupleSpec {
        self.spec
    }

    pub fn elements(&self) -> &[ScalarParameter] {
        &self.elements
    }

    /// 元素原始值
    pub fn values(&self) -> Vec<Scalar> {
        self.elements.iter().map(|e| e.val()).collect()
    }
}

fn coerce_tuple(spec: &TupleSpec, raw: RawValue) -> ParamResult<Vec<Scalar>> {
    let values = match raw {
        RawValue::Text(text) => text
            .split(',')
            .map(|token| coerce_scalar(spec.element, &RawValue::from(token.trim())))
            .collect::<ParamResult<Vec<_>>>()
            .map_err(|e| {
                error!(
                    "Could not coerce {} to a tuple of {} ({})",
                    text, spec.element.kind, spec.name
                );
                e
            })?,
        RawValue::List(items) => items
            .iter()
            .map(|item| coerce_element(spec.element, item))
            .collect::<ParamResult<Vec<_>>>()?,
        single => vec![coerce_scalar(spec.element, &single)?],
    };

    if values.len() != spec.length {
        error!(
            "{} expected data of length {}, received data of length {}",
            spec.name,
            spec.length,
            values.len()
        );
        return Err(ParamError::LengthMismatch {
            name: spec.name.to_string(),
            expected: spec.length,
            actual: values.len(),
        });
    }

    Ok(values)
}

impl CameraParameter for TupleParameter {
    type Value = Vec<Scalar>;

    fn name(&self) -> &'static str {
        self.spec.name
    }

    fn length(&self) -> usize {
        self.spec.length
    }

    fn coerce(&self, raw: RawValue) -> ParamResult<Vec<Scalar>> {
        coerce_tuple(self.spec, raw)
    }

    /// 校验元组
    ///
    /// 每个失败元素单独记录日志；任一元素失败则元组保持未激活并返回校验错误
    fn validate(&mut self) -> ParamResult<bool> {
        let name = self.spec.name;

        if self.elements.len() != self.spec.length {
            error!("value of {} is not of length {}", name, self.spec.length);
            return Err(ParamError::LengthMismatch {
                name: name.to_string(),
                expected: self.spec.length,
                actual: self.elements.len(),
            });
        }

        let mut failures = Vec::new();
        for (index, element) in self.elements.iter_mut().enumerate() {
            if let Err(e) = element.validate() {
                error!("At least one {} of {} is not valid: [{}] {}", element.name(), name, index, e);
                failures.push(format!("[{}] {}", index, e));
            }
        }

        if !failures.is_empty() {
            self.active = false;
            return Err(ParamError::validation(name, failures.join("; ")));
        }

        self.active = true;
        Ok(self.active)
    }

    /// 对外表示: 逗号连接的字符串（"1.0,1.0"）
    fn val(&self) -> Scalar {
        let parts: Vec<String> = self.elements.iter().map(|e| e.val().to_string()).collect();
        Scalar::Text(parts.join(","))
    }

    fn machine(&self) -> RawValue {
        RawValue::List(self.elements.iter().map(|e| e.machine()).collect())
    }

    fn default_machine(&self) -> RawValue {
        RawValue::List(self.spec.default.iter().map(|l| l.to_raw()).collect())
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
        TupleParameter::new(self.spec, Some(raw)).map(|p| p.machine())
    }
}

impl PartialEq for TupleParameter {
    fn eq(&self, other: &Self) -> bool {
        self.spec.name == other.spec.name
            && self.elements == other.elements
            && self.active == other.active
    }
}

impl fmt::Display for TupleParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(value={})", self.spec.name, self.machine())
    }
}
