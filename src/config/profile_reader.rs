// ==========================================
// 相机参数模型 - 档案读取 Trait
// ==========================================
// 职责: 定义按档案 ID 构建参数集所需的读取接口
// 实现者: ProfileManager（JSON 目录存储）
// ==========================================

use super::profile::CameraProfile;
use crate::error::{ParamError, ParamResult};
use crate::parameter_set::ParameterSet;

pub trait ProfileReader {
    /// 读取档案
    ///
    /// # 返回
    /// - Ok(None): 档案不存在
    fn read_profile(&self, profile_id: &str) -> ParamResult<Option<CameraProfile>>;

    /// 读取档案并构建参数集
    ///
    /// # 逻辑
    /// 1. 读取档案，不存在时返回 Other 错误
    /// 2. 构建参数集，执行 validate() 与 cross_verify()
    fn build_parameter_set(&self, profile_id: &str) -> ParamResult<ParameterSet> {
        match self.read_profile(profile_id)? {
            Some(profile) => profile.to_parameter_set(),
            None => {
                tracing::error!("Profile {} does not exist", profile_id);
                Err(ParamError::Other(anyhow::anyhow!(
                    "档案不存在: {}",
                    profile_id
                )))
            }
        }
    }
}
