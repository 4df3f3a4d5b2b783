// ==========================================
// 光纤线缆验证系统 - 时间戳解析器
// ==========================================
// 职责: 将 (日期, 时间) 单元格对或单一单元格解析为统一时间点
// 支持: 原生日期时间 / 表格序列号数值 / 文本（多种格式）
// 红线: 任何解析失败 → None（合法结果,不阻断判定）
// ==========================================

use crate::domain::cell::CellValue;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// 表格序列号纪元（Windows 1900 日期系统）
const SERIAL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// 低于此值的序列号需做 1900 闰日修正
const LEAP_BUG_THRESHOLD: f64 = 60.0;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

const TIME_FORMAT: &str = "%H:%M:%S";
const ISO_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DAY_FIRST_FORMAT: &str = "%d/%m/%Y %H:%M";

/// 表格序列号 → 日期时间
///
/// # 规则
/// - 纪元 1899-12-30
/// - 原始值 < 60 时减 1 天（补偿表格格式虚构的 1900-02-29）
/// - 小数部分为一天内的时间
pub fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let corrected = if serial < LEAP_BUG_THRESHOLD {
        serial - 1.0
    } else {
        serial
    };
    let (y, m, d) = SERIAL_EPOCH;
    let epoch = NaiveDate::from_ymd_opt(y, m, d)?.and_hms_opt(0, 0, 0)?;
    epoch.checked_add_signed(fractional_days(corrected)?)
}

/// 小数天数 → 时长（毫秒精度）
fn fractional_days(days: f64) -> Option<Duration> {
    if !days.is_finite() {
        return None;
    }
    let millis = (days * MILLIS_PER_DAY).round();
    if millis.abs() > i64::MAX as f64 {
        return None;
    }
    Some(Duration::milliseconds(millis as i64))
}

/// 去掉 "." 之后的秒小数部分
fn truncate_subseconds(text: &str) -> &str {
    text.split('.').next().unwrap_or(text).trim()
}

/// 解析 HH:MM:SS 时间文本（截断秒小数）
pub fn parse_time_text(text: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(truncate_subseconds(text), TIME_FORMAT).ok()
}

/// 解析 (日期, 时间) 单元格对
///
/// # 解析顺序
/// 1. 日期/时间均为原生日期时间 → 日期部分 + 时间部分
/// 2. 日期原生、时间为数值 → 时间按小数天数加到日期上
/// 3. 日期原生、时间为文本 → 按 HH:MM:SS 解析后合并
/// 4. 日期为数值 → 按序列号换算,再按 2 / 3 处理时间
/// 5. 日期/时间均为文本 → 按 YYYY-MM-DD HH:MM:SS 解析
/// 6. 其余情况或任一步失败 → None
pub fn resolve_pair(date: &CellValue, time: &CellValue) -> Option<NaiveDateTime> {
    match (date, time) {
        (CellValue::DateTime(d), CellValue::DateTime(t)) => Some(d.date().and_time(t.time())),
        (CellValue::DateTime(d), CellValue::Number(t)) => {
            d.checked_add_signed(fractional_days(*t)?)
        }
        (CellValue::DateTime(d), CellValue::Text(t)) => Some(d.date().and_time(parse_time_text(t)?)),
        (CellValue::Number(serial), time) => {
            let base = serial_to_datetime(*serial)?;
            match time {
                CellValue::Number(t) => base.checked_add_signed(fractional_days(*t)?),
                CellValue::Text(t) => Some(base.date().and_time(parse_time_text(t)?)),
                CellValue::DateTime(t) => Some(base.date().and_time(t.time())),
                CellValue::Empty => None,
            }
        }
        (CellValue::Text(d), CellValue::Text(t)) => {
            let combined = format!("{} {}", truncate_subseconds(d), truncate_subseconds(t));
            NaiveDateTime::parse_from_str(&combined, ISO_DATETIME_FORMAT).ok()
        }
        _ => None,
    }
}

/// 解析单一时间单元格（ILRL 时间列）
///
/// # 规则
/// - 原生日期时间 → 原值
/// - 数值 → 按表格序列号换算
/// - 文本 → 依次尝试 DD/MM/YYYY HH:MM 与 YYYY-MM-DD HH:MM:SS（截断秒小数）
pub fn resolve_single(cell: &CellValue) -> Option<NaiveDateTime> {
    match cell {
        CellValue::DateTime(dt) => Some(*dt),
        CellValue::Number(serial) => serial_to_datetime(*serial),
        CellValue::Text(text) => {
            let text = truncate_subseconds(text);
            NaiveDateTime::parse_from_str(text, DAY_FIRST_FORMAT)
                .or_else(|_| NaiveDateTime::parse_from_str(text, ISO_DATETIME_FORMAT))
                .ok()
        }
        CellValue::Empty => None,
    }
}
