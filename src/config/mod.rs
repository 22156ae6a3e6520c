// ==========================================
// 相机参数模型 - 配置层
// ==========================================
// 职责: 相机参数档案（profile）的持久化与加载
// 存储: 档案目录下的 <profile_id>.json
// ==========================================

pub mod profile;
pub mod profile_manager;
pub mod profile_reader;

// 重导出核心配置类型
pub use profile::CameraProfile;
pub use profile_manager::{config_keys, default_profile_dir, ProfileManager};
pub use profile_reader::ProfileReader;
