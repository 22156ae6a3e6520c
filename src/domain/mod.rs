// ==========================================
// 相机参数模型 - 领域层
// ==========================================
// 职责: 值类型（标量、有理数、原始输入）与参数注册表
// 红线: 不含设备访问逻辑
// ==========================================

pub mod schema;
pub mod value;

// 重导出核心类型
pub use schema::{Bounds, ParameterKind, ParameterSpec, ScalarSpec, SyncPolicy, TupleSpec};
pub use value::{CoercionFailure, Literal, Rational, RawValue, Scalar, ScalarKind};
