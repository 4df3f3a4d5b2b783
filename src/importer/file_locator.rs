// ==========================================
// 光纤线缆验证系统 - 候选文件定位
// ==========================================
// 职责: 按工单 (OT) 列出 ILRL / 几何候选文件
// - ILRL: <ilrl_base_dir>/<OT>/*.xlsx
// - 几何: <geo_base_dir>/*.xlsx 且文件名包含 OT
// 红线: 排除 "~$" 开头的锁文件; 目录不存在返回空列表
// ==========================================

use crate::config::VerifierConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// 锁文件前缀
const LOCK_FILE_PREFIX: &str = "~$";

/// 表格容器扩展名
const WORKBOOK_EXTENSION: &str = "xlsx";

pub struct FileLocator {
    ilrl_base_dir: PathBuf,
    geo_base_dir: PathBuf,
}

impl FileLocator {
    pub fn new(ilrl_base_dir: impl Into<PathBuf>, geo_base_dir: impl Into<PathBuf>) -> Self {
        Self {
            ilrl_base_dir: ilrl_base_dir.into(),
            geo_base_dir: geo_base_dir.into(),
        }
    }

    pub fn from_config(config: &VerifierConfig) -> Self {
        Self::new(config.ilrl_base_dir.clone(), config.geo_base_dir.clone())
    }

    /// ILRL 候选文件（按文件名排序）
    pub fn ilrl_candidates(&self, work_order: &str) -> Vec<PathBuf> {
        let dir = self.ilrl_base_dir.join(work_order);
        list_workbooks(&dir, |_| true)
    }

    /// 几何候选文件（文件名包含 OT,按文件名排序）
    pub fn geo_candidates(&self, work_order: &str) -> Vec<PathBuf> {
        list_workbooks(&self.geo_base_dir, |name| name.contains(work_order))
    }
}

/// 判断文件名是否为候选表格文件
pub fn is_candidate_workbook(file_name: &str) -> bool {
    if file_name.starts_with(LOCK_FILE_PREFIX) {
        return false;
    }
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(WORKBOOK_EXTENSION))
        .unwrap_or(false)
}

fn list_workbooks<F>(dir: &Path, accept: F) -> Vec<PathBuf>
where
    F: Fn(&str) -> bool,
{
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "候选目录不可读");
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "目录项读取失败");
                continue;
            }
        };
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if is_candidate_workbook(name) && accept(name) {
            files.push(path);
        }
    }

    files.sort();
    files
}
