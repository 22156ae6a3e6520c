// ==========================================
// 相机参数模型 - 档案管理器
// ==========================================
// 职责: CameraProfile 的保存 / 读取 / 列举 / 删除
// 存储: <dir>/<profile_id>.json（pretty JSON）
// ==========================================

use super::profile::CameraProfile;
use super::profile_reader::ProfileReader;
use crate::error::{ParamError, ParamResult};
use anyhow::anyhow;
use chrono::Utc;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 档案目录（环境变量）
    pub const PROFILE_DIR_ENV: &str = "PICAM_PARAMS_PROFILE_DIR";

    // 档案文件扩展名
    pub const PROFILE_EXTENSION: &str = "json";

    // 默认目录名
    pub const PROFILE_DIR_NAME: &str = "picam-params";
    pub const PROFILE_DIR_NAME_DEV: &str = "picam-params-dev";
}

/// 获取默认档案目录
///
/// # 顺序
/// 1. 环境变量 PICAM_PARAMS_PROFILE_DIR（非空时）
/// 2. 用户配置目录下的 picam-params（debug 构建使用 picam-params-dev）
/// 3. 回退为 ./profiles
pub fn default_profile_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(config_keys::PROFILE_DIR_ENV) {
        let trimmed = dir.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    let Some(config_dir) = dirs::config_dir() else {
        return PathBuf::from("./profiles");
    };

    #[cfg(debug_assertions)]
    let name = config_keys::PROFILE_DIR_NAME_DEV;
    #[cfg(not(debug_assertions))]
    let name = config_keys::PROFILE_DIR_NAME;

    config_dir.join(name).join("profiles")
}

// ==========================================
// ProfileManager
// ==========================================
#[derive(Debug, Clone)]
pub struct ProfileManager {
    dir: PathBuf,
}

impl ProfileManager {
    /// 创建管理器（目录不存在时自动创建）
    pub fn new(dir: impl Into<PathBuf>) -> ParamResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        debug!("Profile directory: {}", dir.display());
        Ok(Self { dir })
    }

    /// 使用默认档案目录
    pub fn open_default() -> ParamResult<Self> {
        Self::new(default_profile_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, profile_id: &str) -> ParamResult<PathBuf> {
        let valid = !profile_id.is_empty()
            && profile_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            error!("Invalid profile id {:?}", profile_id);
            return Err(ParamError::Other(anyhow!(
                "无效的档案 ID: {:?}",
                profile_id
            )));
        }
        Ok(self
            .dir
            .join(format!("{}.{}", profile_id, config_keys::PROFILE_EXTENSION)))
    }

    /// 保存档案（覆盖同名档案，写入 updated_at）
    ///
    /// # 返回
    /// 实际写入的档案
    pub fn save(&self, profile: &CameraProfile) -> ParamResult<CameraProfile> {
        let path = self.path_for(&profile.profile_id)?;
        let mut stored = profile.clone();
        stored.updated_at = Some(Utc::now());

        let file = File::create(&path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), &stored)?;
        info!("Saved profile {} to {}", stored.profile_id, path.display());
        Ok(stored)
    }

    /// 读取档案（不存在时返回 None）
    pub fn load(&self, profile_id: &str) -> ParamResult<Option<CameraProfile>> {
        let path = self.path_for(profile_id)?;
        if !path.exists() {
            return Ok(None);
        }
        let file = File::open(&path)?;
        let profile = serde_json::from_reader(BufReader::new(file))?;
        Ok(Some(profile))
    }

    /// 列出全部档案 ID（按字典序）
    pub fn list(&self) -> ParamResult<Vec<String>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let is_profile = path
                .extension()
                .map(|ext| ext == config_keys::PROFILE_EXTENSION)
                .unwrap_or(false);
            if !is_profile {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// 删除档案
    ///
    /// # 返回
    /// 档案存在并已删除时为 true
    pub fn delete(&self, profile_id: &str) -> ParamResult<bool> {
        let path = self.path_for(profile_id)?;
        if !path.exists() {
            warn!("Profile {} does not exist", profile_id);
            return Ok(false);
        }
        fs::remove_file(&path)?;
        info!("Deleted profile {}", profile_id);
        Ok(true)
    }
}

impl ProfileReader for ProfileManager {
    fn read_profile(&self, profile_id: &str) -> ParamResult<Option<CameraProfile>> {
        self.load(profile_id)
    }
}
