// ==========================================
// 光纤线缆验证系统 - 标识符规范化
// ==========================================
// 职责:
// - ILRL 文件名 → (工单号数字段, 连接器类型, 序列号后 4 位)
// - 几何单元格文本 → (13 位序列号, 端点标签)
// 红线: 无法识别不是错误,返回 None 表示"与本次匹配无关"
// ==========================================

use crate::domain::types::{ConnectorTag, TipLabel};
use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

lazy_static! {
    static ref ILRL_KEY_PATTERN: Regex =
        Regex::new(r"^JMO-(\d+)-(SCLC|LCSC|LC|SC)-(\d{4})$").expect("ILRL 文件名正则无效");
    static ref GEO_PREFIX_PATTERN: Regex =
        Regex::new(r"^\s*[JM]O\s*[\-\s]*").expect("几何序列号前缀正则无效");
}

/// 返工标记后缀
const REWORK_SUFFIX: &str = "-F";

/// 序列号长度
pub const SERIAL_LENGTH: usize = 13;

// ==========================================
// IlrlKey - ILRL 文件名解析结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IlrlKey {
    pub work_order: String,
    pub connector: ConnectorTag,
    pub serial_suffix: String,
    pub rework: bool,
}

/// 从 ILRL 文件名中提取匹配键
///
/// # 规则
/// - 文件名主干须为 `JMO-<数字>-<LC|SC|SCLC|LCSC>-<4位数字>`
/// - 末尾可选 `-F` 返工标记,匹配前剥离
///
/// # 返回
/// - Some(IlrlKey): 匹配成功
/// - None: 文件与 ILRL 匹配无关
pub fn extract_ilrl_key(file_name: &str) -> Option<IlrlKey> {
    let stem = Path::new(file_name.trim())
        .file_stem()
        .and_then(|s| s.to_str())?
        .trim()
        .to_uppercase();

    let (stem, rework) = match stem.strip_suffix(REWORK_SUFFIX) {
        Some(base) => (base.to_string(), true),
        None => (stem, false),
    };

    let caps = ILRL_KEY_PATTERN.captures(&stem)?;
    let connector = ConnectorTag::parse(&caps[2])?;

    Some(IlrlKey {
        work_order: caps[1].to_string(),
        connector,
        serial_suffix: caps[3].to_string(),
        rework,
    })
}

// ==========================================
// 几何序列号规范化
// ==========================================

/// 几何单元格规范化结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoIdentity {
    pub serial: Option<String>,
    pub tip: Option<TipLabel>,
}

/// 规范化几何表格第 0 列的序列号文本
///
/// # 规则
/// 1. TRIM + UPPER,去掉开头的 JO / MO 前缀及分隔符
/// 2. 取第一段至少 13 位数字串的前 13 位作为序列号
/// 3. 序列号之后的文本（含多出的数字）去掉前导分隔符,作为端点标签
/// 4. 标签含 R 时: 去掉全部 R 与连字符,再在前面补一个 R（R-1-R → R1）
/// 5. 标签不在 {1,2,3,4,R1,R2,R3,R4} 内 → tip = None
pub fn normalize_geo_serial(cell_text: &str) -> GeoIdentity {
    let text = cell_text.trim().to_uppercase();
    let text = GEO_PREFIX_PATTERN.replace(&text, "");

    let Some((start, end)) = find_serial_run(&text) else {
        return GeoIdentity {
            serial: None,
            tip: None,
        };
    };

    let serial = text[start..end].to_string();
    let remainder = text[end..]
        .trim()
        .trim_start_matches(|c: char| c == '-' || c.is_whitespace());

    GeoIdentity {
        serial: Some(serial),
        tip: canonical_tip(remainder),
    }
}

/// 查找第一段至少 13 位的连续数字,返回其前 13 位的字节区间
fn find_serial_run(text: &str) -> Option<(usize, usize)> {
    let bytes = text.as_bytes();
    let mut idx = 0;
    while idx < bytes.len() {
        if bytes[idx].is_ascii_digit() {
            let start = idx;
            while idx < bytes.len() && bytes[idx].is_ascii_digit() {
                idx += 1;
            }
            if idx - start >= SERIAL_LENGTH {
                return Some((start, start + SERIAL_LENGTH));
            }
        } else {
            idx += 1;
        }
    }
    None
}

fn canonical_tip(raw: &str) -> Option<TipLabel> {
    if raw.is_empty() {
        return None;
    }
    if raw.contains('R') {
        let digits: String = raw
            .chars()
            .filter(|c| *c != 'R' && *c != '-' && !c.is_whitespace())
            .collect();
        TipLabel::parse(&format!("R{}", digits))
    } else {
        TipLabel::parse(raw)
    }
}

/// 判断字符串是否为 13 位数字序列号
pub fn is_valid_serial(serial: &str) -> bool {
    serial.len() == SERIAL_LENGTH && serial.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_ilrl_key_basic() {
        let key = extract_ilrl_key("JMO-250500001-SC-0001.xlsx").unwrap();
        assert_eq!(key.work_order, "250500001");
        assert_eq!(key.connector, ConnectorTag::Sc);
        assert_eq!(key.serial_suffix, "0001");
        assert!(!key.rework);
    }

    #[test]
    fn test_extract_ilrl_key_rework_marker() {
        let key = extract_ilrl_key("JMO-250500001-SC-0042-F.xlsx").unwrap();
        assert_eq!(key.work_order, "250500001");
        assert_eq!(key.serial_suffix, "0042");
        assert!(key.rework);
    }

    #[test]
    fn test_extract_ilrl_key_all_connector_tags() {
        for (tag, expected) in [
            ("LC", ConnectorTag::Lc),
            ("SC", ConnectorTag::Sc),
            ("SCLC", ConnectorTag::Sclc),
            ("LCSC", ConnectorTag::Lcsc),
        ] {
            let name = format!("JMO-123-{}-9999.xlsx", tag);
            assert_eq!(extract_ilrl_key(&name).unwrap().connector, expected);
        }
    }

    #[test]
    fn test_extract_ilrl_key_accepts_full_path_and_lowercase() {
        let key = extract_ilrl_key("/data/ILRL/250500001/jmo-250500001-lc-0007.xlsx").unwrap();
        assert_eq!(key.connector, ConnectorTag::Lc);
        assert_eq!(key.serial_suffix, "0007");
    }

    #[test]
    fn test_extract_ilrl_key_rejects_other_shapes() {
        assert_eq!(extract_ilrl_key("JMO-250500001-FC-0001.xlsx"), None);
        assert_eq!(extract_ilrl_key("JMO-250500001-SC-001.xlsx"), None);
        assert_eq!(extract_ilrl_key("JMO-250500001-SC-00012.xlsx"), None);
        assert_eq!(extract_ilrl_key("XMO-250500001-SC-0001.xlsx"), None);
        assert_eq!(extract_ilrl_key("JMO--SC-0001.xlsx"), None);
        assert_eq!(extract_ilrl_key("reporte.xlsx"), None);
        assert_eq!(extract_ilrl_key(""), None);
    }

    #[test]
    fn test_normalize_geo_serial_primary_tip() {
        let id = normalize_geo_serial("JO-2505000010001-1");
        assert_eq!(id.serial.as_deref(), Some("2505000010001"));
        assert_eq!(id.tip, TipLabel::parse("1"));
    }

    #[test]
    fn test_normalize_geo_serial_reversed_variants() {
        for raw in [
            "JO-2505000010001-R1",
            "JO-2505000010001-R1-R",
            "JO-2505000010001-R-1",
            "JO-2505000010001-1R",
            "MO 2505000010001 R-1-R",
        ] {
            let id = normalize_geo_serial(raw);
            assert_eq!(id.serial.as_deref(), Some("2505000010001"), "{}", raw);
            assert_eq!(id.tip, TipLabel::parse("R1"), "{}", raw);
        }
    }

    #[test]
    fn test_normalize_geo_serial_lowercase_prefix() {
        let id = normalize_geo_serial("  jo-2505000010001 - r4 ");
        assert_eq!(id.serial.as_deref(), Some("2505000010001"));
        assert_eq!(id.tip, TipLabel::parse("R4"));
    }

    #[test]
    fn test_normalize_geo_serial_unrecognized_tip() {
        let id = normalize_geo_serial("JO-2505000010001-5");
        assert_eq!(id.serial.as_deref(), Some("2505000010001"));
        assert_eq!(id.tip, None);

        let id = normalize_geo_serial("JO-2505000010001");
        assert_eq!(id.serial.as_deref(), Some("2505000010001"));
        assert_eq!(id.tip, None);
    }

    #[test]
    fn test_normalize_geo_serial_requires_13_digits() {
        assert_eq!(normalize_geo_serial("JO-250500001000-1").serial, None);
        assert_eq!(normalize_geo_serial("JO-25050-00010001-1").serial, None);
        assert_eq!(normalize_geo_serial("SERIE").serial, None);
        assert_eq!(normalize_geo_serial("").serial, None);
    }

    #[test]
    fn test_normalize_geo_serial_glued_tip_digit() {
        let id = normalize_geo_serial("JO-25050000100011");
        assert_eq!(id.serial.as_deref(), Some("2505000010001"));
        assert_eq!(id.tip, TipLabel::parse("1"));

        let id = normalize_geo_serial("JO-2505000010001R2");
        assert_eq!(id.serial.as_deref(), Some("2505000010001"));
        assert_eq!(id.tip, TipLabel::parse("R2"));
    }

    #[test]
    fn test_normalize_geo_serial_long_run_leaves_unknown_tip() {
        let id = normalize_geo_serial("JO-25050000100011-1");
        assert_eq!(id.serial.as_deref(), Some("2505000010001"));
        assert_eq!(id.tip, None);
    }

    #[test]
    fn test_is_valid_serial() {
        assert!(is_valid_serial("2505000010001"));
        assert!(!is_valid_serial("250500001000"));
        assert!(!is_valid_serial("25050000100A1"));
    }
}
