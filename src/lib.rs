// ==========================================
// 相机参数模型 - 核心库
// ==========================================
// 职责: 相机参数的声明、转换、校验、依赖判定、
//       查询串编解码与设备同步
// 系统定位: 调用方与相机驱动之间的参数层
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 值类型与参数注册表
pub mod domain;

// 参数层 - 单个参数（标量 / 元组）
pub mod parameter;

// 参数集 - 按名称持有参数
pub mod parameter_set;

// 设备层 - 相机属性接口与增益寄存器
pub mod device;

// 配置层 - 参数档案
pub mod config;

// 错误类型
pub mod error;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::schema::{Bounds, ParameterKind, ParameterSpec, SyncPolicy};
pub use domain::value::{Literal, Rational, RawValue, Scalar, ScalarKind};

// 参数
pub use parameter::{CameraParameter, Parameter, ScalarParameter, TupleParameter};
pub use parameter_set::{ParamInput, ParameterSet, TextEncoding};

// 设备
pub use device::{AttributeSnapshot, CameraDevice, GainKind, GainRegisterPort, MemoryCamera};

// 配置
pub use config::{CameraProfile, ProfileManager, ProfileReader};

// 错误
pub use error::{ParamError, ParamResult};

// ==========================================
// 常量定义
// ==========================================

// 库版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 库名称
pub const APP_NAME: &str = "picam-params";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
