// ==========================================
// 相机参数模型 - 内存设备
// ==========================================
// 用途: 无硬件环境下的演练与测试
// 行为: 属性表读写；可标记只读/故障属性；记录全部写入
// ==========================================

use super::gain::GainRegisterPort;
use super::CameraDevice;
use crate::domain::value::{Rational, RawValue};
use crate::error::{ParamError, ParamResult};
use std::collections::{HashMap, HashSet};
use tracing::warn;

#[derive(Debug, Clone, Default)]
pub struct MemoryCamera {
    attributes: HashMap<String, RawValue>,
    read_only: HashSet<String>,
    failing: HashSet<String>,
    writes: Vec<(String, RawValue)>,
    registers: HashMap<u32, Rational>,
    register_status: i32,
}

impl MemoryCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置属性值
    pub fn with_attr(mut self, name: &str, value: impl Into<RawValue>) -> Self {
        self.attributes.insert(name.to_string(), value.into());
        self
    }

    /// 标记只读属性（写入返回错误）
    pub fn read_only(mut self, name: &str) -> Self {
        self.read_only.insert(name.to_string());
        self
    }

    /// 标记故障属性（读写都返回错误）
    pub fn failing(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }

    /// 增益寄存器写入返回的状态码
    pub fn with_register_status(mut self, status: i32) -> Self {
        self.register_status = status;
        self
    }

    pub fn attr(&self, name: &str) -> Option<&RawValue> {
        self.attributes.get(name)
    }

    /// 成功写入记录（按时间顺序）
    pub fn writes(&self) -> &[(String, RawValue)] {
        &self.writes
    }

    pub fn register(&self, register: u32) -> Option<Rational> {
        self.registers.get(&register).copied()
    }
}

fn device_error(attribute: &str, message: &str) -> ParamError {
    warn!("Memory camera attribute {}: {}", attribute, message);
    ParamError::device(attribute, message)
}

impl CameraDevice for MemoryCamera {
    fn get_attr(&self, name: &str) -> ParamResult<RawValue> {
        if self.failing.contains(name) {
            return Err(device_error(name, "read failed"));
        }
        self.attributes
            .get(name)
            .cloned()
            .ok_or_else(|| device_error(name, "no such attribute"))
    }

    fn set_attr(&mut self, name: &str, value: RawValue) -> ParamResult<()> {
        if self.failing.contains(name) {
            return Err(device_error(name, "write failed"));
        }
        if self.read_only.contains(name) {
            return Err(device_error(name, "attribute is read-only"));
        }
        self.writes.push((name.to_string(), value.clone()));
        self.attributes.insert(name.to_string(), value);
        Ok(())
    }
}

impl GainRegisterPort for MemoryCamera {
    fn set_rational(&mut self, register: u32, value: Rational) -> i32 {
        if self.register_status == 0 {
            self.registers.insert(register, value);
        }
        self.register_status
    }
}
