// ==========================================
// 相机参数模型 - 参数集
// ==========================================
// 职责: 按名称持有参数；包装/转换输入；一致性校验；
//       依赖判定（cross verify）；差集；查询串编解码；设备同步
// 约束: 键必须等于参数名，否则在 validate() 中被丢弃
// ==========================================

mod codec;
mod sync;


pub use codec::TextEncoding;

use crate::domain::schema::{self, ParameterKind};
use crate::domain::value::{Rational, RawValue, Scalar};
use crate::error::ParamResult;
use crate::parameter::{CameraParameter, Parameter};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Index, Sub};
use tracing::{info, warn};

// ==========================================
// ParamInput - 参数集输入
// ==========================================
// 已构造的参数实例（视为已校验）或待包装的原始值
#[derive(Debug, Clone, PartialEq)]
pub enum ParamInput {
    Param(Parameter),
    Raw(RawValue),
}

impl From<Parameter> for ParamInput {
    fn from(p: Parameter) -> Self {
        ParamInput::Param(p)
    }
}

impl From<RawValue> for ParamInput {
    fn from(v: RawValue) -> Self {
        ParamInput::Raw(v)
    }
}

impl From<Scalar> for ParamInput {
    fn from(v: Scalar) -> Self {
        ParamInput::Raw(RawValue::from(v))
    }
}

macro_rules! raw_input_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for ParamInput {
                fn from(v: $t) -> Self {
                    ParamInput::Raw(RawValue::from(v))
                }
            }
        )*
    };
}

raw_input_from!(bool, i32, i64, u32, f64, &str, String, Rational);

impl<A: Into<RawValue>, B: Into<RawValue>> From<(A, B)> for ParamInput {
    fn from(v: (A, B)) -> Self {
        ParamInput::Raw(RawValue::from(v))
    }
}

impl<A, B, C, D> From<(A, B, C, D)> for ParamInput
where
    A: Into<RawValue>,
    B: Into<RawValue>,
    C: Into<RawValue>,
    D: Into<RawValue>,
{
    fn from(v: (A, B, C, D)) -> Self {
        ParamInput::Raw(RawValue::from(v))
    }
}

// ==========================================
// ParameterSet - 参数集
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSet {
    params: BTreeMap<String, Parameter>,
}

impl ParameterSet {
    /// 构造参数集
    ///
    /// # 参数
    /// - params: 参数名 → 参数实例或原始值
    /// - use_defaults: 是否先以全部受支持参数的默认值（已校验）打底
    ///
    /// # 规则
    /// 1. 不受支持的键: 记录警告并丢弃（同时移除同名的默认项）
    /// 2. 由该键注册定义构造的参数实例: 直接采用（视为已校验）；
    ///    其他实例取其设备表示重新包装
    /// 3. 其他输入: 按原始值构造对应参数并校验
    ///
    /// # 返回
    /// - Err: 原始值转换或校验失败
    pub fn new<I, K, V>(params: I, use_defaults: bool) -> ParamResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ParamInput>,
    {
        let mut set = if use_defaults {
            ParameterSet::with_defaults()?
        } else {
            ParameterSet::empty()
        };

        for (key, input) in params {
            let key = key.into();
            let Some(kind) = ParameterKind::from_name(&key) else {
                warn!("Parameter {} not supported. Ignoring it for now", key);
                set.params.remove(&key);
                continue;
            };

            let param = match input.into() {
                ParamInput::Param(p) if p.name() == key && p.is_registered() => p,
                ParamInput::Param(p) => {
                    warn!(
                        "Parameter {} passed under key {} is not the registered definition, re-wrapping its value",
                        p.name(),
                        key
                    );
                    Parameter::validated(kind, p.machine())?
                }
                ParamInput::Raw(raw) => Parameter::validated(kind, raw)?,
            };
            set.params.insert(key, param);
        }

        Ok(set)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// 全部受支持参数，均为默认值且已校验
    pub fn with_defaults() -> ParamResult<Self> {
        let mut params = BTreeMap::new();
        for kind in ParameterKind::ALL {
            let mut param = Parameter::with_default(kind)?;
            param.validate()?;
            params.insert(kind.name().to_string(), param);
        }
        Ok(Self { params })
    }

    // ==========================================
    // 校验与依赖判定
    // ==========================================

    /// 一致性校验
    ///
    /// 键与参数名不一致、键不在注册表中、或参数并非由该键注册的定义构造的条目
    /// 会被丢弃（记录警告）
    ///
    /// # 返回
    /// 被丢弃的键
    pub fn validate(&mut self) -> Vec<String> {
        let inconsistent: Vec<String> = self
            .params
            .iter()
            .filter(|(key, param)| {
                schema::lookup(key).is_none()
                    || key.as_str() != param.name()
                    || !param.is_registered()
            })
            .map(|(key, _)| key.clone())
            .collect();

        for key in &inconsistent {
            if let Some(param) = self.params.remove(key) {
                warn!(
                    "Parameter {} mapped to {}. Ignoring instance",
                    key,
                    param.name()
                );
            }
        }

        inconsistent
    }

    /// 依赖判定
    ///
    /// 仅处理有依赖且当前已激活的参数：所有依赖条件成立才保持激活，
    /// 依赖参数缺失视为条件不成立
    pub fn cross_verify(&mut self) {
        let verdicts: Vec<(String, bool)> = self
            .params
            .iter()
            .filter(|(_, p)| p.is_dependent() && p.is_active())
            .map(|(key, p)| {
                let satisfied = p.depends_on().iter().all(|(dep_name, required)| {
                    self.params
                        .get(*dep_name)
                        .map(|dep| dep.holds(required))
                        .unwrap_or(false)
                });
                (key.clone(), satisfied)
            })
            .collect();

        for (key, satisfied) in verdicts {
            if !satisfied {
                info!("Parameter {} cross verification failed", key);
            }
            if let Some(param) = self.params.get_mut(&key) {
                param.set_active(satisfied);
            }
        }
    }

    // ==========================================
    // 表示与比较
    // ==========================================

    /// 参数名 → 对外表示
    pub fn as_dict(&self) -> BTreeMap<String, Scalar> {
        self.params
            .values()
            .map(|p| (p.name().to_string(), p.val()))
            .collect()
    }

    /// 独立副本
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// 差集: 移除在 other 中存在且相等的条目，保留缺失或不同的条目
    pub fn difference(&self, other: &ParameterSet) -> ParameterSet {
        let params = self
            .params
            .iter()
            .filter(|(key, param)| other.params.get(*key) != Some(*param))
            .map(|(key, param)| (key.clone(), param.clone()))
            .collect();
        ParameterSet { params }
    }

    // ==========================================
    // 映射操作
    // ==========================================

    pub fn contains_key(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Parameter> {
        self.params.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Parameter> {
        self.params.get_mut(key)
    }

    /// 按参数种类读取
    pub fn param(&self, kind: ParameterKind) -> Option<&Parameter> {
        self.params.get(kind.name())
    }

    /// 按名称读取受支持参数（名称不在注册表中时返回 None）
    pub fn lookup(&self, name: &str) -> Option<&Parameter> {
        schema::lookup(name).and_then(|_| self.params.get(name))
    }

    /// 写入条目（不做校验，由 validate() 统一检查）
    pub fn insert(&mut self, key: impl Into<String>, param: Parameter) -> Option<Parameter> {
        self.params.insert(key.into(), param)
    }

    pub fn remove(&mut self, key: &str) -> Option<Parameter> {
        self.params.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.params.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &Parameter> {
        self.params.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Parameter)> {
        self.params.iter()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl Sub for &ParameterSet {
    type Output = ParameterSet;

    fn sub(self, other: &ParameterSet) -> ParameterSet {
        self.difference(other)
    }
}

impl Index<&str> for ParameterSet {
    type Output = Parameter;

    fn index(&self, key: &str) -> &Parameter {
        match self.params.get(key) {
            Some(param) => param,
            None => panic!("parameter {} not in set", key),
        }
    }
}

impl<'a> IntoIterator for &'a ParameterSet {
    type Item = (&'a String, &'a Parameter);
    type IntoIter = std::collections::btree_map::Iter<'a, String, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}

impl fmt::Display for ParameterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries: Vec<String> = self
            .as_dict()
            .iter()
            .map(|(k, v)| format!("{}: {}", k, v))
            .collect();
        write!(f, "ParameterSet({{{}}})", entries.join(", "))
    }
}
