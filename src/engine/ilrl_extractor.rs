// ==========================================
// 光纤线缆验证系统 - ILRL 提取器
// ==========================================
// 职责: 按解析出的布局生成测量行列表与文件级判定
// 输出: (文件判定, 最新时间, 测量行) 或 None（无可用数据）
// ==========================================

use crate::config::EngineConfig;
use crate::domain::cell::RawGrid;
use crate::domain::measurement::MeasurementPoint;
use crate::domain::types::{ConnectorTag, FileVerdict, IlrlFileType, TestResult};
use crate::engine::identifier::extract_ilrl_key;
use crate::engine::ilrl_layout::{IlrlLayout, IlrlLayoutResolver, LayoutResolution};
use crate::engine::timestamp::resolve_single;
use chrono::NaiveDateTime;
use tracing::debug;

// ==========================================
// IlrlExtraction - 单个文件的提取结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct IlrlExtraction {
    pub verdict: FileVerdict,
    pub latest_timestamp: Option<NaiveDateTime>,
    pub points: Vec<MeasurementPoint>,
    pub layout: IlrlLayout,
}

// ==========================================
// IlrlExtractor
// ==========================================
pub struct IlrlExtractor {
    config: EngineConfig,
    resolver: IlrlLayoutResolver,
}

impl IlrlExtractor {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            resolver: IlrlLayoutResolver::new(config.clone()),
            config,
        }
    }

    /// 提取单个 ILRL 文件
    ///
    /// # 返回
    /// - Some(IlrlExtraction): 至少一行有效 PASS/FAIL
    /// - None: 布局无法解析或无有效行
    ///
    /// # 说明
    /// - 结果列文本不是 PASS/FAIL 的行直接丢弃
    /// - 时间无法解析的行仍参与判定,时间记为 None,不参与最新时间计算
    pub fn extract(&self, grid: &RawGrid, file_name: &str) -> Option<IlrlExtraction> {
        let layout = match self.resolver.resolve(grid, file_name) {
            LayoutResolution::Found(layout) => layout,
            LayoutResolution::NotFound => return None,
        };

        let connector = connector_for(file_name, layout.file_type);
        let display_name = display_file_name(file_name);

        let mut points = Vec::new();
        for (row, _) in grid.rows_from(self.config.data_start_row) {
            let Some(result) = grid
                .cell(row, layout.result_column)
                .as_text()
                .and_then(|text| TestResult::parse(&text))
            else {
                continue;
            };

            let timestamp = resolve_single(grid.cell(row, layout.timestamp_column));
            points.push(MeasurementPoint {
                line_number: points.len() + 1,
                result,
                timestamp,
                file_name: display_name.clone(),
                file_type: layout.file_type,
                connector,
            });
        }

        let verdict = FileVerdict::from_results(points.iter().map(|p| p.result))?;
        let latest_timestamp = points.iter().filter_map(|p| p.timestamp).max();

        debug!(
            file = file_name,
            lines = points.len(),
            %verdict,
            "ILRL 文件提取完成"
        );

        Some(IlrlExtraction {
            verdict,
            latest_timestamp,
            points,
            layout,
        })
    }
}

impl Default for IlrlExtractor {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// 文件名去掉目录部分
pub(crate) fn display_file_name(file_name: &str) -> String {
    std::path::Path::new(file_name)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name)
        .to_string()
}

fn connector_for(file_name: &str, file_type: IlrlFileType) -> ConnectorTag {
    match extract_ilrl_key(file_name) {
        Some(key) => key.connector,
        None => match file_type {
            IlrlFileType::Sc => ConnectorTag::Sc,
            IlrlFileType::Combined => ConnectorTag::Sclc,
            IlrlFileType::Lc => ConnectorTag::Lc,
        },
    }
}
