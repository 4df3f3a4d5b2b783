// ==========================================
// 光纤线缆验证系统 - ILRL 布局解析器
// ==========================================
// 职责: 根据内容推断结果列与时间列
// 背景: 源文件无稳定表头,不同连接器/合并导出的结果列位置不同
// 红线: 找不到布局返回 LayoutResolution::NotFound,不抛错
// ==========================================

use crate::config::EngineConfig;
use crate::domain::cell::RawGrid;
use crate::domain::types::{IlrlFileType, TestResult};
use crate::engine::identifier::extract_ilrl_key;
use tracing::debug;

// ==========================================
// IlrlLayout - 已解析的列布局
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IlrlLayout {
    pub result_column: usize,
    pub timestamp_column: usize,
    pub file_type: IlrlFileType,
}

/// 布局解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutResolution {
    Found(IlrlLayout),
    NotFound,
}

impl LayoutResolution {
    pub fn layout(&self) -> Option<&IlrlLayout> {
        match self {
            LayoutResolution::Found(layout) => Some(layout),
            LayoutResolution::NotFound => None,
        }
    }
}

/// 由文件名判定 ILRL 文件类型
///
/// 优先使用规范文件名中的连接器段; 不规范的文件名按子串判断
pub fn classify_file_name(file_name: &str) -> IlrlFileType {
    if let Some(key) = extract_ilrl_key(file_name) {
        return key.connector.file_type();
    }
    let upper = file_name.to_uppercase();
    if upper.contains("SCLC") || upper.contains("LCSC") {
        IlrlFileType::Combined
    } else if upper.contains("SC") {
        IlrlFileType::Sc
    } else {
        IlrlFileType::Lc
    }
}

// ==========================================
// IlrlLayoutResolver
// ==========================================
pub struct IlrlLayoutResolver {
    config: EngineConfig,
}

impl IlrlLayoutResolver {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// 解析文件布局
    ///
    /// # 规则
    /// - 合并文件: 扫描全部候选列,取 PASS 计数最多者（平局取先出现者）
    /// - 单连接器文件: 比较两个固定候选列的 PASS/FAIL 计数,
    ///   第二列计数 >= 第一列且 > 0 时优先第二列
    /// - 时间列 = 结果列 + 偏移
    pub fn resolve(&self, grid: &RawGrid, file_name: &str) -> LayoutResolution {
        let file_type = classify_file_name(file_name);
        let result_column = match file_type {
            IlrlFileType::Combined => self.select_combined_column(grid),
            IlrlFileType::Lc | IlrlFileType::Sc => self.select_single_column(grid),
        };

        match result_column {
            Some(result_column) => {
                let layout = IlrlLayout {
                    result_column,
                    timestamp_column: result_column + self.config.timestamp_offset,
                    file_type,
                };
                debug!(file = file_name, ?layout, "ILRL 布局已解析");
                LayoutResolution::Found(layout)
            }
            None => {
                debug!(file = file_name, "ILRL 文件中未找到 PASS/FAIL 列");
                LayoutResolution::NotFound
            }
        }
    }

    fn select_combined_column(&self, grid: &RawGrid) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;
        for &col in &self.config.combined_result_columns {
            let count = self.count_matching(grid, col, |r| r == TestResult::Pass);
            // 严格大于: 平局保留先出现的列
            if count > 0 && best.map_or(true, |(_, best_count)| count > best_count) {
                best = Some((col, count));
            }
        }
        best.map(|(col, _)| col)
    }

    fn select_single_column(&self, grid: &RawGrid) -> Option<usize> {
        let [first, second] = self.config.single_result_columns;
        let first_count = self.count_matching(grid, first, |_| true);
        let second_count = self.count_matching(grid, second, |_| true);

        if second_count >= first_count && second_count > 0 {
            Some(second)
        } else if first_count > 0 {
            Some(first)
        } else {
            None
        }
    }

    fn count_matching<F>(&self, grid: &RawGrid, col: usize, accept: F) -> usize
    where
        F: Fn(TestResult) -> bool,
    {
        grid.rows_from(self.config.data_start_row)
            .filter_map(|(row, _)| grid.cell(row, col).as_text())
            .filter_map(|text| TestResult::parse(&text))
            .filter(|r| accept(*r))
            .count()
    }
}

impl Default for IlrlLayoutResolver {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
