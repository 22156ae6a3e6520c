// ==========================================
// 相机参数模型 - 设备接口
// ==========================================
// 职责: 定义参数同步所需的最小设备能力（不包含驱动实现）
// 红线: 核心只依赖按名称读写属性，不依赖具体相机 API
// ==========================================

pub mod gain;
pub mod memory;

pub use gain::{set_gain, GainKind, GainRegisterPort};
pub use memory::MemoryCamera;

use crate::domain::value::RawValue;
use crate::error::ParamResult;
use std::collections::BTreeMap;

// ==========================================
// CameraDevice Trait
// ==========================================
// 用途: 参数推送与读回
// 实现者: 宿主程序对真实相机的封装 / MemoryCamera（内存设备）
pub trait CameraDevice {
    /// 读取属性
    ///
    /// # 返回
    /// - Err(Device): 属性不存在或驱动读取失败
    fn get_attr(&self, name: &str) -> ParamResult<RawValue>;

    /// 写入属性
    ///
    /// # 返回
    /// - Err(Device): 属性只读或驱动拒绝该值
    fn set_attr(&mut self, name: &str, value: RawValue) -> ParamResult<()>;
}

/// 推送后读回的设备属性快照（属性缺失为 None）
pub type AttributeSnapshot = BTreeMap<String, Option<RawValue>>;
