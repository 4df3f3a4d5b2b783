// ==========================================
// 光纤线缆验证系统 - 几何提取器
// ==========================================
// 职责: 将几何表格解析为逐端点测量记录,并按序列号给出判定
// 列位置: 序列号 0 / 日期 3 / 时间 4 / 结果 6（可配置）
// ==========================================

use crate::config::EngineConfig;
use crate::domain::cell::RawGrid;
use crate::domain::measurement::GeometryPoint;
use crate::domain::types::SerialVerdict;
use crate::engine::consolidator::geometry_verdict;
use crate::engine::identifier::normalize_geo_serial;
use crate::engine::timestamp::resolve_pair;
use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use tracing::debug;

// ==========================================
// GeometryExtraction - 单个几何文件的提取结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryExtraction {
    /// 序列号 → 合并后的判定（无有效行的序列号不在表中）
    pub verdicts: BTreeMap<String, SerialVerdict>,
    /// 全文件最新测量时间
    pub latest_timestamp: Option<NaiveDateTime>,
    /// 序列号 → 全部有效测量点（未合并,供审计展示）
    pub points: BTreeMap<String, Vec<GeometryPoint>>,
}

impl GeometryExtraction {
    pub fn verdict_for(&self, serial: &str) -> SerialVerdict {
        self.verdicts
            .get(serial)
            .copied()
            .unwrap_or(SerialVerdict::NotFound)
    }

    pub fn points_for(&self, serial: &str) -> &[GeometryPoint] {
        self.points.get(serial).map(|v| v.as_slice()).unwrap_or(&[])
    }
}

// ==========================================
// GeometryExtractor
// ==========================================
pub struct GeometryExtractor {
    config: EngineConfig,
}

impl GeometryExtractor {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// 解析几何表格的全部有效行
    ///
    /// # 丢弃规则
    /// - 序列号或端点标签无法识别
    /// - 日期与时间单元格均为空
    pub fn parse_points(&self, grid: &RawGrid) -> Vec<GeometryPoint> {
        let cols = self.config.geometry_columns;
        let mut points = Vec::new();

        for (row, _) in grid.rows_from(self.config.data_start_row) {
            let Some(text) = grid.cell(row, cols.serial).as_text() else {
                continue;
            };
            let identity = normalize_geo_serial(&text);
            let (Some(serial), Some(tip)) = (identity.serial, identity.tip) else {
                debug!(row, cell = %text, "几何行标识无法识别,跳过");
                continue;
            };

            let date = grid.cell(row, cols.date);
            let time = grid.cell(row, cols.time);
            if date.is_empty() && time.is_empty() {
                debug!(row, %serial, "几何行缺少日期与时间,跳过");
                continue;
            }

            let result_text = grid.cell(row, cols.result).normalized_text();
            let passed = result_text.as_deref() == Some("PASS");

            points.push(GeometryPoint {
                serial,
                tip,
                result_text,
                passed,
                timestamp: resolve_pair(date, time),
                source_row: row,
            });
        }

        points
    }

    /// 提取几何文件
    ///
    /// # 返回
    /// - Some(GeometryExtraction): 至少一行有效
    /// - None: 无任何有效行
    pub fn extract(&self, grid: &RawGrid) -> Option<GeometryExtraction> {
        let parsed = self.parse_points(grid);
        if parsed.is_empty() {
            return None;
        }

        let latest_timestamp = parsed.iter().filter_map(|p| p.timestamp).max();

        let mut points: BTreeMap<String, Vec<GeometryPoint>> = BTreeMap::new();
        for point in parsed {
            points.entry(point.serial.clone()).or_default().push(point);
        }

        let verdicts = points
            .iter()
            .map(|(serial, serial_points)| (serial.clone(), geometry_verdict(serial_points)))
            .collect();

        Some(GeometryExtraction {
            verdicts,
            latest_timestamp,
            points,
        })
    }
}

impl Default for GeometryExtractor {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cell::CellValue;
    use crate::domain::types::TipLabel;
    use chrono::NaiveDate;

    fn row(serial: &str, date: CellValue, time: CellValue, result: &str) -> Vec<CellValue> {
        vec![
            CellValue::text(serial),
            CellValue::Empty,
            CellValue::Empty,
            date,
            time,
            CellValue::Empty,
            CellValue::text(result),
        ]
    }

    fn date() -> CellValue {
        CellValue::DateTime(
            NaiveDate::from_ymd_opt(2025, 5, 3)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        )
    }

    fn grid(data: Vec<Vec<CellValue>>) -> RawGrid {
        let mut rows: Vec<Vec<CellValue>> = (0..12)
            .map(|_| vec![CellValue::text("JO-2505000010001-1")])
            .collect();
        rows.extend(data);
        RawGrid::new(rows)
    }

    #[test]
    fn test_extract_approved_serial() {
        let g = grid(vec![
            row("JO-2505000010001-1", date(), CellValue::text("10:00:00"), "PASS"),
            row("JO-2505000010001-2", date(), CellValue::text("10:01:00"), "PASS"),
            row("JO-2505000010001-3", date(), CellValue::text("10:02:00"), "PASS"),
            row("JO-2505000010001-4", date(), CellValue::text("10:03:00"), "pass"),
        ]);

        let extraction = GeometryExtractor::default().extract(&g).unwrap();

        assert_eq!(extraction.verdict_for("2505000010001"), SerialVerdict::Approved);
        assert_eq!(extraction.points_for("2505000010001").len(), 4);
        assert_eq!(
            extraction.latest_timestamp,
            NaiveDate::from_ymd_opt(2025, 5, 3).unwrap().and_hms_opt(10, 3, 0)
        );
    }

    #[test]
    fn test_header_block_is_skipped() {
        // 表头块里的合法标识不计入
        let g = grid(vec![]);
        assert!(GeometryExtractor::default().extract(&g).is_none());
    }

    #[test]
    fn test_multiple_serials_get_independent_verdicts() {
        let g = grid(vec![
            row("JO-2505000010001-1", date(), CellValue::text("10:00:00"), "PASS"),
            row("JO-2505000010001-2", date(), CellValue::text("10:00:00"), "PASS"),
            row("JO-2505000010001-3", date(), CellValue::text("10:00:00"), "PASS"),
            row("JO-2505000010001-4", date(), CellValue::text("10:00:00"), "PASS"),
            row("JO-2505000010002-1", date(), CellValue::text("11:00:00"), "PASS"),
            row("JO-2505000010002-2", date(), CellValue::text("11:00:00"), "FAIL"),
        ]);

        let extraction = GeometryExtractor::default().extract(&g).unwrap();

        assert_eq!(extraction.verdict_for("2505000010001"), SerialVerdict::Approved);
        assert_eq!(extraction.verdict_for("2505000010002"), SerialVerdict::Rejected);
        assert_eq!(extraction.verdict_for("2505000010003"), SerialVerdict::NotFound);
        assert!(extraction.points_for("2505000010003").is_empty());
    }

    #[test]
    fn test_unusable_rows_are_dropped() {
        let g = grid(vec![
            row("JO-2505000010001-9", date(), CellValue::text("10:00:00"), "PASS"),
            row("JO-2505000010001", date(), CellValue::text("10:00:00"), "PASS"),
            row("SIN SERIE", date(), CellValue::text("10:00:00"), "PASS"),
            row("JO-2505000010001-1", CellValue::Empty, CellValue::Empty, "PASS"),
            vec![CellValue::Empty],
        ]);
        assert!(GeometryExtractor::default().extract(&g).is_none());
    }

    #[test]
    fn test_row_with_only_date_is_kept_without_timestamp() {
        let g = grid(vec![row("JO-2505000010001-R3", date(), CellValue::Empty, "FAIL")]);

        let extraction = GeometryExtractor::default().extract(&g).unwrap();
        let points = extraction.points_for("2505000010001");

        assert_eq!(points.len(), 1);
        assert_eq!(points[0].tip, TipLabel::parse("R3").unwrap());
        assert_eq!(points[0].timestamp, None);
        assert!(!points[0].passed);
        assert_eq!(points[0].source_row, 12);
        assert_eq!(extraction.latest_timestamp, None);
        assert_eq!(extraction.verdict_for("2505000010001"), SerialVerdict::Rejected);
    }

    #[test]
    fn test_detail_points_are_not_consolidated() {
        let g = grid(vec![
            row("JO-2505000010001-1", date(), CellValue::text("09:00:00"), "FAIL"),
            row("JO-2505000010001-R1", date(), CellValue::text("09:30:00"), "PASS"),
        ]);

        let extraction = GeometryExtractor::default().extract(&g).unwrap();
        assert_eq!(extraction.points_for("2505000010001").len(), 2);
    }
}
