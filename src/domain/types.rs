// ==========================================
// 光纤线缆验证系统 - 领域类型定义
// ==========================================
// 职责: 测试结果 / 判定 / 连接器类型 / 端点标签
// 序列化格式: SCREAMING_SNAKE_CASE (与结果日志一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 单点测试结果 (PASS / FAIL)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestResult {
    Pass,
    Fail,
}

impl TestResult {
    /// 解析结果单元格文本（TRIM + UPPER 后必须恰为 PASS / FAIL）
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_uppercase().as_str() {
            "PASS" => Some(TestResult::Pass),
            "FAIL" => Some(TestResult::Fail),
            _ => None,
        }
    }

    pub fn is_pass(self) -> bool {
        self == TestResult::Pass
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestResult::Pass => write!(f, "PASS"),
            TestResult::Fail => write!(f, "FAIL"),
        }
    }
}

// ==========================================
// 连接器标签（ILRL 文件名中的类型段）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectorTag {
    Lc,
    Sc,
    Sclc,
    Lcsc,
}

impl ConnectorTag {
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "LC" => Some(ConnectorTag::Lc),
            "SC" => Some(ConnectorTag::Sc),
            "SCLC" => Some(ConnectorTag::Sclc),
            "LCSC" => Some(ConnectorTag::Lcsc),
            _ => None,
        }
    }

    pub fn file_type(self) -> IlrlFileType {
        match self {
            ConnectorTag::Lc => IlrlFileType::Lc,
            ConnectorTag::Sc => IlrlFileType::Sc,
            ConnectorTag::Sclc | ConnectorTag::Lcsc => IlrlFileType::Combined,
        }
    }
}

impl fmt::Display for ConnectorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectorTag::Lc => write!(f, "LC"),
            ConnectorTag::Sc => write!(f, "SC"),
            ConnectorTag::Sclc => write!(f, "SCLC"),
            ConnectorTag::Lcsc => write!(f, "LCSC"),
        }
    }
}

// ==========================================
// ILRL 文件类型标记
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IlrlFileType {
    Lc,
    Sc,
    Combined,
}

impl fmt::Display for IlrlFileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IlrlFileType::Lc => write!(f, "LC"),
            IlrlFileType::Sc => write!(f, "SC"),
            IlrlFileType::Combined => write!(f, "COMBINED"),
        }
    }
}

// ==========================================
// 文件级判定
// ==========================================
// "无有效行" 不是判定值,由调用方以 None 表示
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileVerdict {
    Approved,
    Rejected,
}

impl FileVerdict {
    /// 全部结果为 PASS 才判定通过
    pub fn from_results<I>(results: I) -> Option<Self>
    where
        I: IntoIterator<Item = TestResult>,
    {
        let mut seen = false;
        let mut all_pass = true;
        for result in results {
            seen = true;
            all_pass &= result.is_pass();
        }
        match (seen, all_pass) {
            (false, _) => None,
            (true, true) => Some(FileVerdict::Approved),
            (true, false) => Some(FileVerdict::Rejected),
        }
    }
}

impl fmt::Display for FileVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileVerdict::Approved => write!(f, "APPROVED"),
            FileVerdict::Rejected => write!(f, "REJECTED"),
        }
    }
}

// ==========================================
// 序列号级判定（单一测试族: ILRL 或 几何）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SerialVerdict {
    Approved,
    Rejected,
    NotFound,
}

impl SerialVerdict {
    pub fn as_str(self) -> &'static str {
        match self {
            SerialVerdict::Approved => "APPROVED",
            SerialVerdict::Rejected => "REJECTED",
            SerialVerdict::NotFound => "NOT_FOUND",
        }
    }
}

impl fmt::Display for SerialVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==========================================
// 线缆总判定
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverallVerdict {
    Approved,
    Rejected,
    NotFound,
}

impl OverallVerdict {
    pub fn as_str(self) -> &'static str {
        match self {
            OverallVerdict::Approved => "APPROVED",
            OverallVerdict::Rejected => "REJECTED",
            OverallVerdict::NotFound => "NOT_FOUND",
        }
    }
}

impl fmt::Display for OverallVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==========================================
// 几何测量端点标签
// ==========================================
// 取值: 1..4 与 R1..R4; 同数字的 R/非 R 标签为同一物理端点的两个方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipOrientation {
    Direct,
    Reversed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TipLabel {
    pub tip: PhysicalTip,
    pub orientation: TipOrientation,
}

impl TipLabel {
    /// 解析规范化后的标签文本（"1".."4" / "R1".."R4"）
    pub fn parse(text: &str) -> Option<Self> {
        let (orientation, digits) = match text.strip_prefix('R') {
            Some(rest) => (TipOrientation::Reversed, rest),
            None => (TipOrientation::Direct, text),
        };
        let tip = PhysicalTip::parse(digits)?;
        Some(Self { tip, orientation })
    }

    pub fn physical(self) -> PhysicalTip {
        self.tip
    }
}

impl fmt::Display for TipLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.orientation {
            TipOrientation::Direct => write!(f, "{}", self.tip),
            TipOrientation::Reversed => write!(f, "R{}", self.tip),
        }
    }
}

impl Serialize for TipLabel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TipLabel {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        TipLabel::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("无效的端点标签: {}", raw)))
    }
}

/// 物理端点（1..4）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PhysicalTip(u8);

impl PhysicalTip {
    /// 几何判定要求的完整端点集合
    pub const REQUIRED: [PhysicalTip; 4] = [
        PhysicalTip(1),
        PhysicalTip(2),
        PhysicalTip(3),
        PhysicalTip(4),
    ];

    pub fn new(number: u8) -> Option<Self> {
        (1..=4).contains(&number).then_some(PhysicalTip(number))
    }

    fn parse(text: &str) -> Option<Self> {
        match text {
            "1" => Some(PhysicalTip(1)),
            "2" => Some(PhysicalTip(2)),
            "3" => Some(PhysicalTip(3)),
            "4" => Some(PhysicalTip(4)),
            _ => None,
        }
    }
}

impl fmt::Display for PhysicalTip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
