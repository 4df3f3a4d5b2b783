// ==========================================
// 光纤线缆验证系统 - 引擎层
// ==========================================
// 职责: 标识规范化、时间解析、布局推断、提取、合并、判定
// 红线: 引擎不做 IO,不抛错; 无法识别/无可用数据以 Option / 枚举表达
// ==========================================

pub mod consolidator;
pub mod geometry;
pub mod identifier;
pub mod ilrl_extractor;
pub mod ilrl_layout;
pub mod timestamp;
pub mod verdict;
pub mod verifier;

// 重导出核心引擎
pub use consolidator::{geometry_verdict, Consolidated, Measured};
pub use geometry::{GeometryExtraction, GeometryExtractor};
pub use identifier::{extract_ilrl_key, normalize_geo_serial, GeoIdentity, IlrlKey};
pub use ilrl_extractor::{IlrlExtraction, IlrlExtractor};
pub use ilrl_layout::{IlrlLayout, IlrlLayoutResolver, LayoutResolution};
pub use timestamp::{resolve_pair, resolve_single, serial_to_datetime};
pub use verdict::combine;
pub use verifier::{CableVerifier, VerificationRequest};
