// ==========================================
// 相机参数模型 - 错误类型
// ==========================================
// 工具: thiserror 派生宏
// 分类: 转换 / 校验 / 长度 / 设备 / 驱动 / 持久化
// ==========================================

use thiserror::Error;

/// 参数模块错误类型
#[derive(Error, Debug)]
pub enum ParamError {
    // ===== 值转换错误 =====
    #[error("值转换失败 (参数 {name}): 无法将 {input} 转换为 {target}")]
    Coercion {
        name: String,
        input: String,
        target: String,
    },

    #[error("长度不匹配 (参数 {name}): 期望 {expected}，实际 {actual}")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    // ===== 校验错误 =====
    #[error("参数校验失败 (参数 {name}): {message}")]
    Validation { name: String, message: String },

    #[error("参数配置错误 (参数 {name}): 需定义 options 或 [min, max]")]
    Configuration { name: String },

    #[error("不支持的参数: {0}")]
    UnknownParameter(String),

    // ===== 设备错误 =====
    #[error("设备属性访问失败 (属性 {attribute}): {message}")]
    Device { attribute: String, message: String },

    #[error("驱动不支持该功能 (status={status})，请确认 userland 库是否为最新版本（增益设置需 2017 年末之后的版本）")]
    DriverUnsupported { status: i32 },

    #[error("驱动调用失败 (status={status})")]
    DriverFailure { status: i32 },

    #[error("无效的增益名称: {0}（仅支持 analog_gain / digital_gain）")]
    InvalidGain(String),

    // ===== 编码与持久化错误 =====
    #[error("文本编码失败 ({encoding}): {message}")]
    Encoding { encoding: String, message: String },

    #[error("文件读写失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("序列化失败: {0}")]
    Serialization(#[from] serde_json::Error),

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ParamError {
    pub(crate) fn coercion(name: &str, input: impl ToString, target: impl ToString) -> Self {
        ParamError::Coercion {
            name: name.to_string(),
            input: input.to_string(),
            target: target.to_string(),
        }
    }

    pub(crate) fn validation(name: &str, message: impl Into<String>) -> Self {
        ParamError::Validation {
            name: name.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn device(attribute: &str, message: impl Into<String>) -> Self {
        ParamError::Device {
            attribute: attribute.to_string(),
            message: message.into(),
        }
    }

    /// 驱动返回的状态码（仅驱动错误有值）
    pub fn status(&self) -> Option<i32> {
        match self {
            ParamError::DriverUnsupported { status } | ParamError::DriverFailure { status } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

/// Result 类型别名
pub type ParamResult<T> = Result<T, ParamError>;
