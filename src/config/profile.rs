use crate::domain::value::Scalar;
use crate::error::ParamResult;
use crate::parameter_set::ParameterSet;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 相机参数档案（持久化对象）
///
/// 存储位置：档案目录下的 `{profile_id}.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraProfile {
    /// 档案 ID（同时作为文件名）
    pub profile_id: String,

    /// 显示名称
    pub title: String,

    /// 说明（可选）
    #[serde(default)]
    pub description: Option<String>,

    /// 是否以全部参数的默认值打底
    #[serde(default)]
    pub use_defaults: bool,

    /// 参数名 → 对外表示（与 ParameterSet::as_dict 一致）
    #[serde(default)]
    pub parameters: BTreeMap<String, Scalar>,

    /// 最近保存时间（由 ProfileManager 写入）
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl CameraProfile {
    pub fn new(profile_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            profile_id: profile_id.into(),
            title: title.into(),
            description: None,
            use_defaults: false,
            parameters: BTreeMap::new(),
            updated_at: None,
        }
    }

    /// 从参数集快照生成档案
    pub fn from_parameter_set(
        profile_id: impl Into<String>,
        title: impl Into<String>,
        set: &ParameterSet,
    ) -> Self {
        Self {
            parameters: set.as_dict(),
            ..Self::new(profile_id, title)
        }
    }

    /// 构建参数集（已校验，已完成依赖判定）
    pub fn to_parameter_set(&self) -> ParamResult<ParameterSet> {
        let mut set = ParameterSet::new(self.parameters.clone(), self.use_defaults)?;
        set.validate();
        set.cross_verify();
        Ok(set)
    }
}
