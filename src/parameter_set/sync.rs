// ==========================================
// 参数集 - 设备同步
// ==========================================
// 两轮推送: 先无依赖参数，再有依赖参数
// （保证 exposure_mode 先于 shutter_speed 生效）
// 单个参数写入失败只记录日志，不阻断其他参数
// ==========================================

use super::ParameterSet;
use crate::device::gain::{set_gain, GainKind, GainRegisterPort};
use crate::device::{AttributeSnapshot, CameraDevice};
use crate::domain::schema;
use crate::domain::value::Scalar;
use crate::error::ParamResult;
use crate::parameter::{CameraParameter, Parameter};
use tracing::{debug, warn};

impl ParameterSet {
    /// 推送到设备并读回快照
    ///
    /// # 返回
    /// 全部受支持属性的设备读数（读取失败为 None）
    pub fn update_cam(&self, device: &mut dyn CameraDevice) -> AttributeSnapshot {
        let (independent, dependent): (Vec<&Parameter>, Vec<&Parameter>) =
            self.values().partition(|p| !p.is_dependent());

        for param in independent.into_iter().chain(dependent) {
            debug!("Pushing {}", param);
            param.update_cam(device);
        }

        schema::supported_names()
            .map(|name| (name.to_string(), device.get_attr(name).ok()))
            .collect()
    }

    /// 通过增益寄存器写入已激活的 analog_gain / digital_gain
    ///
    /// # 返回
    /// 成功写入的增益个数；驱动错误直接返回
    pub fn update_gains(&self, port: &mut dyn GainRegisterPort) -> ParamResult<usize> {
        let mut written = 0;
        for gain in [GainKind::Analog, GainKind::Digital] {
            let Some(param) = self.get(gain.parameter_name()) else {
                continue;
            };
            if !param.is_active() {
                warn!("{} is not active", gain);
                continue;
            }
            if let Scalar::Float(value) = param.val() {
                set_gain(port, gain.parameter_name(), value)?;
                written += 1;
            }
        }
        Ok(written)
    }
}
