// ==========================================
// 光纤线缆验证系统 - 验证编排器
// ==========================================
// 职责: 一次验证请求的完整流程
// 1. 读取候选文件 (GridSource)
// 2. ILRL: 按序列号后 4 位匹配文件 → 提取 → 合并 → 判定
// 3. 几何: 提取全部文件 → 取本序列号测量点 → 合并 → 判定
// 4. 严格 AND 合并两项判定
// 红线: 单个文件读取失败只记日志并跳过,不中断验证
// ==========================================

use crate::config::EngineConfig;
use crate::domain::cell::RawGrid;
use crate::domain::measurement::{
    format_geometry_timestamp, format_ilrl_timestamp, GeometryOutcome, GeometryPoint,
    IlrlOutcome, MeasurementPoint, VerificationReport,
};
use crate::domain::types::PhysicalTip;
use crate::engine::consolidator::Consolidated;
use crate::engine::geometry::GeometryExtractor;
use crate::engine::identifier::{extract_ilrl_key, is_valid_serial, SERIAL_LENGTH};
use crate::engine::ilrl_extractor::{display_file_name, IlrlExtractor};
use crate::engine::verdict::combine;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_locator::FileLocator;
use crate::importer::grid_reader::GridSource;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// ILRL 匹配使用的序列号后缀长度
const SUFFIX_LENGTH: usize = 4;

// ==========================================
// VerificationRequest - 已校验的查询
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationRequest {
    work_order: String,
    serial: String,
}

impl VerificationRequest {
    /// 校验并构造查询
    ///
    /// # 规则
    /// - 工单号去空白后转大写,不得为空
    /// - 序列号须为 13 位数字
    pub fn new(work_order: &str, serial: &str) -> ImportResult<Self> {
        let work_order = work_order.trim().to_uppercase();
        if work_order.is_empty() {
            return Err(ImportError::InvalidQuery {
                field: "work_order".to_string(),
                message: "工单号不能为空".to_string(),
            });
        }

        let serial = serial.trim();
        if !is_valid_serial(serial) {
            return Err(ImportError::InvalidQuery {
                field: "serial".to_string(),
                message: format!("序列号须为 {} 位数字: {}", SERIAL_LENGTH, serial),
            });
        }

        Ok(Self {
            work_order,
            serial: serial.to_string(),
        })
    }

    pub fn work_order(&self) -> &str {
        &self.work_order
    }

    pub fn serial(&self) -> &str {
        &self.serial
    }

    pub fn serial_suffix(&self) -> &str {
        &self.serial[self.serial.len() - SUFFIX_LENGTH..]
    }
}

// ==========================================
// CableVerifier
// ==========================================
pub struct CableVerifier {
    ilrl: IlrlExtractor,
    geometry: GeometryExtractor,
}

impl CableVerifier {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            ilrl: IlrlExtractor::new(config.clone()),
            geometry: GeometryExtractor::new(config),
        }
    }

    /// 通过文件定位器列出候选文件后执行验证
    pub fn verify_work_order(
        &self,
        request: &VerificationRequest,
        locator: &FileLocator,
        source: &dyn GridSource,
    ) -> VerificationReport {
        let ilrl_files = locator.ilrl_candidates(request.work_order());
        let geo_files = locator.geo_candidates(request.work_order());
        debug!(
            work_order = request.work_order(),
            ilrl_candidates = ilrl_files.len(),
            geo_candidates = geo_files.len(),
            "候选文件定位完成"
        );
        self.verify(request, &ilrl_files, &geo_files, source)
    }

    /// 对给定的候选文件执行验证
    ///
    /// # 参数
    /// - ilrl_files: ILRL 候选文件（按处理顺序）
    /// - geo_files: 几何候选文件（按处理顺序）
    /// - source: 表格读取器
    pub fn verify(
        &self,
        request: &VerificationRequest,
        ilrl_files: &[PathBuf],
        geo_files: &[PathBuf],
        source: &dyn GridSource,
    ) -> VerificationReport {
        let ilrl = self.verify_ilrl(request, ilrl_files, source);
        let geometry = self.verify_geometry(request, geo_files, source);
        let overall = combine(ilrl.verdict, geometry.verdict);

        info!(
            work_order = request.work_order(),
            serial = request.serial(),
            ilrl = %ilrl.verdict,
            geometry = %geometry.verdict,
            %overall,
            "验证完成"
        );

        VerificationReport {
            work_order: request.work_order().to_string(),
            serial: request.serial().to_string(),
            serial_suffix: request.serial_suffix().to_string(),
            ilrl,
            geometry,
            overall,
        }
    }

    fn verify_ilrl(
        &self,
        request: &VerificationRequest,
        files: &[PathBuf],
        source: &dyn GridSource,
    ) -> IlrlOutcome {
        let mut analyzed_files = Vec::new();
        let mut points: Vec<MeasurementPoint> = Vec::new();

        for path in files {
            let file_name = display_file_name(&path.to_string_lossy());
            let Some(key) = extract_ilrl_key(&file_name) else {
                debug!(file = %file_name, "文件名不符合 ILRL 命名,跳过");
                continue;
            };
            if key.serial_suffix != request.serial_suffix() {
                continue;
            }

            let Some(grid) = read_or_skip(source, path) else {
                continue;
            };
            match self.ilrl.extract(&grid, &file_name) {
                Some(extraction) => {
                    analyzed_files.push(file_name);
                    points.extend(extraction.points);
                }
                None => debug!(file = %file_name, "ILRL 文件无可用数据"),
            }
        }

        if points.is_empty() {
            return IlrlOutcome {
                analyzed_files,
                ..IlrlOutcome::not_found()
            };
        }

        let consolidated = Consolidated::from_points(&points);
        let verdict = consolidated.verdict(None);
        let latest_timestamp = consolidated.latest_timestamp();

        IlrlOutcome {
            verdict,
            latest_timestamp,
            latest_display: format_ilrl_timestamp(latest_timestamp),
            analyzed_files,
            points,
            retained: consolidated.into_points(),
        }
    }

    fn verify_geometry(
        &self,
        request: &VerificationRequest,
        files: &[PathBuf],
        source: &dyn GridSource,
    ) -> GeometryOutcome {
        let mut analyzed_files = Vec::new();
        let mut points: Vec<GeometryPoint> = Vec::new();

        for path in files {
            let file_name = display_file_name(&path.to_string_lossy());
            let Some(grid) = read_or_skip(source, path) else {
                continue;
            };
            let Some(extraction) = self.geometry.extract(&grid) else {
                debug!(file = %file_name, "几何文件无可用数据");
                continue;
            };

            let serial_points = extraction.points_for(request.serial());
            if serial_points.is_empty() {
                continue;
            }
            analyzed_files.push(file_name);
            points.extend_from_slice(serial_points);
        }

        if points.is_empty() {
            return GeometryOutcome {
                analyzed_files,
                ..GeometryOutcome::not_found()
            };
        }

        let consolidated = Consolidated::from_points(&points);
        let verdict = consolidated.verdict(Some(&PhysicalTip::REQUIRED[..]));
        // 只取本序列号的保留点,同文件其他序列号的测量不参与
        let latest_timestamp = consolidated.latest_timestamp();

        GeometryOutcome {
            verdict,
            latest_timestamp,
            latest_display: format_geometry_timestamp(latest_timestamp),
            analyzed_files,
            points,
            retained: consolidated.into_points(),
        }
    }
}

impl Default for CableVerifier {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

fn read_or_skip(source: &dyn GridSource, path: &Path) -> Option<RawGrid> {
    match source.read_grid(path) {
        Ok(grid) => Some(grid),
        Err(e) => {
            warn!(file = %path.display(), error = %e, "文件读取失败,按无可用数据处理");
            None
        }
    }
}
