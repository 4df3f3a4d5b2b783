// ==========================================
// 光纤线缆验证系统 - 配置管理
// ==========================================
// 职责: 配置加载、保存、校验
// 加载顺序: CABLE_VERIFIER_CONFIG → 用户配置目录 → ./config.json
// 红线: 配置缺失/损坏不阻断验证,回退默认值
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// 配置文件路径环境变量
pub const CONFIG_PATH_ENV: &str = "CABLE_VERIFIER_CONFIG";

const CONFIG_DIR_NAME: &str = "cable-verifier";
const CONFIG_FILE_NAME: &str = "config.json";

// ==========================================
// GeometryColumns - 几何表格列位置
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeometryColumns {
    pub serial: usize,
    pub date: usize,
    pub time: usize,
    pub result: usize,
}

impl Default for GeometryColumns {
    fn default() -> Self {
        Self {
            serial: 0,
            date: 3,
            time: 4,
            result: 6,
        }
    }
}

// ==========================================
// EngineConfig - 表格布局参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// 数据起始行（前面为固定表头块）
    pub data_start_row: usize,
    /// 单连接器文件的两个候选结果列（按优先级: 第二个优先）
    pub single_result_columns: [usize; 2],
    /// 合并文件的候选结果列（按顺序扫描,平局取先出现者）
    pub combined_result_columns: Vec<usize>,
    /// 时间列相对结果列的偏移
    pub timestamp_offset: usize,
    pub geometry_columns: GeometryColumns,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_start_row: 12,
            single_result_columns: [7, 8],
            combined_result_columns: vec![7, 8, 9, 10],
            timestamp_offset: 2,
            geometry_columns: GeometryColumns::default(),
        }
    }
}

// ==========================================
// VerifierConfig - 系统配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    /// ILRL 基础目录（其下按 OT 分子目录）
    pub ilrl_base_dir: PathBuf,
    /// 几何基础目录（文件名包含 OT）
    pub geo_base_dir: PathBuf,
    /// 验证结果日志数据库
    pub result_log_path: PathBuf,
    pub engine: EngineConfig,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            ilrl_base_dir: PathBuf::from("ILRL"),
            geo_base_dir: PathBuf::from("Geometria"),
            result_log_path: default_data_dir().join("verification_log.db"),
            engine: EngineConfig::default(),
        }
    }
}

impl VerifierConfig {
    /// 从指定路径加载配置
    ///
    /// # 行为
    /// - 文件不存在: 写出默认配置并返回默认值
    /// - 文件无法解析: 记录告警并返回默认值
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            let config = Self::default();
            match config.save(path) {
                Ok(()) => info!("配置文件不存在,已写出默认配置: {}", path.display()),
                Err(e) => warn!("默认配置写出失败 ({}): {}", path.display(), e),
            }
            return config;
        }

        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("配置加载失败,使用默认配置: {}", e);
                Self::default()
            }
        }
    }

    /// 从指定路径加载配置（严格模式）
    pub fn load(path: &Path) -> ImportResult<Self> {
        let raw = fs::read_to_string(path).map_err(|e| ImportError::ConfigReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&raw).map_err(|e| ImportError::ConfigReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// 保存配置（格式化 JSON）
    pub fn save(&self, path: &Path) -> ImportResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| ImportError::ConfigValueError {
            key: "*".to_string(),
            message: e.to_string(),
        })?;
        fs::write(path, json)?;
        Ok(())
    }

    /// 校验基础目录均存在
    pub fn validate(&self) -> ImportResult<()> {
        if !self.ilrl_base_dir.is_dir() {
            return Err(ImportError::ConfigValueError {
                key: "ilrl_base_dir".to_string(),
                message: format!("不是有效目录: {}", self.ilrl_base_dir.display()),
            });
        }
        if !self.geo_base_dir.is_dir() {
            return Err(ImportError::ConfigValueError {
                key: "geo_base_dir".to_string(),
                message: format!("不是有效目录: {}", self.geo_base_dir.display()),
            });
        }
        if self.engine.timestamp_offset == 0 {
            return Err(ImportError::ConfigValueError {
                key: "engine.timestamp_offset".to_string(),
                message: "时间列偏移不能为 0".to_string(),
            });
        }
        Ok(())
    }
}

/// 获取默认配置文件路径
///
/// # 返回
/// - 环境变量 CABLE_VERIFIER_CONFIG（非空时）
/// - 用户配置目录/cable-verifier/config.json
/// - 回退: ./config.json
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    match dirs::config_dir() {
        Some(dir) => dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME),
        None => PathBuf::from(CONFIG_FILE_NAME),
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("."))
}
