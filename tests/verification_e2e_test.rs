// ==========================================
// 验证流程端到端测试
// ==========================================
// 目标: 候选文件 → 表格 → ILRL / 几何判定 → 总判定
// 表格来自内存源,不依赖磁盘文件
// ==========================================


#[cfg(test)]
mod verification_e2e_test {
    use crate::test_helpers::*;
    use cable_verifier::domain::cell::CellValue;
    use cable_verifier::domain::types::{OverallVerdict, SerialVerdict};
    use cable_verifier::importer::FileLocator;
    use cable_verifier::{CableVerifier, VerificationRequest};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn request() -> VerificationRequest {
        VerificationRequest::new(WORK_ORDER, SERIAL).unwrap()
    }

    fn ilrl_path(name: &str) -> PathBuf {
        PathBuf::from("/ilrl").join(WORK_ORDER).join(name)
    }

    fn geo_path(name: &str) -> PathBuf {
        PathBuf::from("/geo").join(name)
    }

    fn passing_ilrl() -> cable_verifier::RawGrid {
        ilrl_grid(&[
            ("PASS", "03/05/2025 09:00"),
            ("PASS", "03/05/2025 09:01"),
            ("PASS", "03/05/2025 09:02"),
            ("PASS", "03/05/2025 09:03"),
        ])
    }

    // ==========================================
    // 基本场景
    // ==========================================

    #[test]
    fn test_all_pass_is_approved() {
        cable_verifier::logging::init_test();
        let ilrl = ilrl_path("JMO-250500001-LC-0001.xlsx");
        let geo = geo_path("Geometria 250500001.xlsx");
        let source = MemorySource::new()
            .with(ilrl.clone(), passing_ilrl())
            .with(geo.clone(), geo_grid_for_serial(SERIAL, ["PASS"; 4]));

        let report = CableVerifier::default().verify(&request(), &[ilrl], &[geo], &source);

        assert_eq!(report.ilrl.verdict, SerialVerdict::Approved);
        assert_eq!(report.geometry.verdict, SerialVerdict::Approved);
        assert_eq!(report.overall, OverallVerdict::Approved);
        assert_eq!(report.serial_suffix, "0001");
        assert_eq!(report.ilrl.points.len(), 4);
        assert_eq!(report.ilrl.latest_display, "03/05/2025 09:03");
        assert_eq!(report.geometry.latest_display, "03/05/2025 10:03:00");
        assert_eq!(report.geometry.analyzed_files, vec!["Geometria 250500001.xlsx"]);
    }

    #[test]
    fn test_one_geometry_fail_rejects() {
        let ilrl = ilrl_path("JMO-250500001-LC-0001.xlsx");
        let geo = geo_path("Geometria 250500001.xlsx");
        let source = MemorySource::new()
            .with(ilrl.clone(), passing_ilrl())
            .with(
                geo.clone(),
                geo_grid_for_serial(SERIAL, ["PASS", "PASS", "FAIL", "PASS"]),
            );

        let report = CableVerifier::default().verify(&request(), &[ilrl], &[geo], &source);

        assert_eq!(report.ilrl.verdict, SerialVerdict::Approved);
        assert_eq!(report.geometry.verdict, SerialVerdict::Rejected);
        assert_eq!(report.overall, OverallVerdict::Rejected);
    }

    #[test]
    fn test_no_ilrl_match_rejects_even_with_geometry_approved() {
        let ilrl = ilrl_path("JMO-250500001-LC-0002.xlsx");
        let geo = geo_path("Geometria 250500001.xlsx");
        let source = MemorySource::new()
            .with(ilrl.clone(), passing_ilrl())
            .with(geo.clone(), geo_grid_for_serial(SERIAL, ["PASS"; 4]));

        let report = CableVerifier::default().verify(&request(), &[ilrl], &[geo], &source);

        assert_eq!(report.ilrl.verdict, SerialVerdict::NotFound);
        assert_eq!(report.ilrl.latest_display, "N/A");
        assert_eq!(report.geometry.verdict, SerialVerdict::Approved);
        assert_eq!(report.overall, OverallVerdict::Rejected);
    }

    #[test]
    fn test_nothing_found_is_not_found() {
        let report =
            CableVerifier::default().verify(&request(), &[], &[], &MemorySource::new());

        assert_eq!(report.ilrl.verdict, SerialVerdict::NotFound);
        assert_eq!(report.geometry.verdict, SerialVerdict::NotFound);
        assert_eq!(report.overall, OverallVerdict::NotFound);
    }

    // ==========================================
    // ILRL 细节
    // ==========================================

    #[test]
    fn test_ilrl_fail_line_rejects() {
        let ilrl = ilrl_path("JMO-250500001-SC-0001.xlsx");
        let source = MemorySource::new().with(
            ilrl.clone(),
            ilrl_grid(&[("PASS", "03/05/2025 09:00"), ("fail", "03/05/2025 09:01")]),
        );

        let report = CableVerifier::default().verify(&request(), &[ilrl], &[], &source);

        assert_eq!(report.ilrl.verdict, SerialVerdict::Rejected);
    }

    #[test]
    fn test_rework_file_overrides_original() {
        let original = ilrl_path("JMO-250500001-LC-0001.xlsx");
        let rework = ilrl_path("JMO-250500001-LC-0001-F.xlsx");
        let source = MemorySource::new()
            .with(
                original.clone(),
                ilrl_grid(&[("PASS", "03/05/2025 09:00"), ("FAIL", "03/05/2025 09:01")]),
            )
            .with(
                rework.clone(),
                ilrl_grid(&[("PASS", "05/05/2025 14:00"), ("PASS", "05/05/2025 14:01")]),
            );

        let report =
            CableVerifier::default().verify(&request(), &[original, rework], &[], &source);

        assert_eq!(report.ilrl.verdict, SerialVerdict::Approved);
        assert_eq!(report.ilrl.retained.len(), 2);
        assert_eq!(report.ilrl.latest_display, "05/05/2025 14:01");
        assert_eq!(
            report.ilrl.analyzed_files,
            vec!["JMO-250500001-LC-0001.xlsx", "JMO-250500001-LC-0001-F.xlsx"]
        );
    }

    #[test]
    fn test_combined_file_uses_column_with_most_passes() {
        let ilrl = ilrl_path("JMO-250500001-SCLC-0001.xlsx");
        let grid = GridBuilder::new()
            .row(vec![
                (7, CellValue::text("FAIL")),
                (9, CellValue::text("PASS")),
                (11, CellValue::text("03/05/2025 12:00")),
            ])
            .row(vec![
                (7, CellValue::text("FAIL")),
                (9, CellValue::text("PASS")),
                (11, CellValue::text("03/05/2025 12:05")),
            ])
            .build();
        let source = MemorySource::new().with(ilrl.clone(), grid);

        let report = CableVerifier::default().verify(&request(), &[ilrl], &[], &source);

        assert_eq!(report.ilrl.verdict, SerialVerdict::Approved);
        assert_eq!(report.ilrl.latest_display, "03/05/2025 12:05");
    }

    #[test]
    fn test_ilrl_without_layout_is_not_found() {
        let ilrl = ilrl_path("JMO-250500001-LC-0001.xlsx");
        let grid = GridBuilder::new()
            .ilrl_line(8, "OK", "03/05/2025 09:00")
            .build();
        let source = MemorySource::new().with(ilrl.clone(), grid);

        let report = CableVerifier::default().verify(&request(), &[ilrl], &[], &source);

        assert_eq!(report.ilrl.verdict, SerialVerdict::NotFound);
        assert!(report.ilrl.analyzed_files.is_empty());
    }

    #[test]
    fn test_unreadable_file_is_skipped() {
        let unreadable = ilrl_path("JMO-250500001-SC-0001.xlsx");
        let readable = ilrl_path("JMO-250500001-LC-0001.xlsx");
        let source = MemorySource::new().with(readable.clone(), passing_ilrl());

        let report =
            CableVerifier::default().verify(&request(), &[unreadable, readable], &[], &source);

        assert_eq!(report.ilrl.verdict, SerialVerdict::Approved);
        assert_eq!(report.ilrl.analyzed_files, vec!["JMO-250500001-LC-0001.xlsx"]);
    }

    // ==========================================
    // 几何细节
    // ==========================================

    #[test]
    fn test_geometry_retest_overrides_earlier_fail() {
        let geo = geo_path("Geometria 250500001.xlsx");
        let label = |tip: &str| format!("JO-{}-{}", SERIAL, tip);
        let (l1, l2, l3, l4, r2) = (label("1"), label("2"), label("3"), label("4"), label("R2"));
        let grid = geo_grid(&[
            (l1.as_str(), "10:00:00", "PASS"),
            (l2.as_str(), "10:01:00", "FAIL"),
            (l3.as_str(), "10:02:00", "PASS"),
            (l4.as_str(), "10:03:00", "PASS"),
            (r2.as_str(), "11:00:00", "PASS"),
        ]);
        let source = MemorySource::new().with(geo.clone(), grid);

        let report = CableVerifier::default().verify(&request(), &[], &[geo], &source);

        assert_eq!(report.geometry.verdict, SerialVerdict::Approved);
        assert_eq!(report.geometry.points.len(), 5);
        assert_eq!(report.geometry.retained.len(), 4);
        assert_eq!(report.geometry.latest_display, "03/05/2025 11:00:00");
    }

    #[test]
    fn test_geometry_missing_tip_rejects() {
        let geo = geo_path("Geometria 250500001.xlsx");
        let label = |tip: &str| format!("JO-{}-{}", SERIAL, tip);
        let (l1, l2, l3) = (label("1"), label("2"), label("3"));
        let grid = geo_grid(&[
            (l1.as_str(), "10:00:00", "PASS"),
            (l2.as_str(), "10:01:00", "PASS"),
            (l3.as_str(), "10:02:00", "PASS"),
        ]);
        let source = MemorySource::new().with(geo.clone(), grid);

        let report = CableVerifier::default().verify(&request(), &[], &[geo], &source);

        assert_eq!(report.geometry.verdict, SerialVerdict::Rejected);
    }

    #[test]
    fn test_geometry_tip_glued_to_serial_counts() {
        let geo = geo_path("Geometria 250500001.xlsx");
        let (l1, l2) = (format!("JO-{}1", SERIAL), format!("JO-{}-2", SERIAL));
        let (l3, l4) = (format!("JO-{}3", SERIAL), format!("JO-{}4", SERIAL));
        let grid = geo_grid(&[
            (l1.as_str(), "10:00:00", "PASS"),
            (l2.as_str(), "10:01:00", "PASS"),
            (l3.as_str(), "10:02:00", "PASS"),
            (l4.as_str(), "10:03:00", "PASS"),
        ]);
        let source = MemorySource::new().with(geo.clone(), grid);

        let report = CableVerifier::default().verify(&request(), &[], &[geo], &source);

        assert_eq!(report.geometry.verdict, SerialVerdict::Approved);
        assert_eq!(report.geometry.retained.len(), 4);
    }

    #[test]
    fn test_geometry_tips_spread_across_files() {
        let first = geo_path("Geometria 250500001 A.xlsx");
        let second = geo_path("Geometria 250500001 B.xlsx");
        let label = |tip: &str| format!("JO-{}-{}", SERIAL, tip);
        let (l1, l2, l3, l4) = (label("1"), label("2"), label("3"), label("4"));
        let other = format!("JO-{}-1", "2505000010002");
        let source = MemorySource::new()
            .with(
                first.clone(),
                geo_grid(&[(l1.as_str(), "10:00:00", "PASS"), (l2.as_str(), "10:01:00", "PASS")]),
            )
            .with(
                second.clone(),
                geo_grid(&[
                    (l3.as_str(), "10:02:00", "PASS"),
                    (l4.as_str(), "10:03:00", "PASS"),
                    (other.as_str(), "10:04:00", "FAIL"),
                ]),
            );

        let report =
            CableVerifier::default().verify(&request(), &[], &[first, second], &source);

        assert_eq!(report.geometry.verdict, SerialVerdict::Approved);
        assert_eq!(report.geometry.analyzed_files.len(), 2);
        assert_eq!(report.geometry.latest_display, "03/05/2025 10:03:00");
    }

    #[test]
    fn test_geometry_numeric_serial_date() {
        let geo = geo_path("Geometria 250500001.xlsx");
        let mut builder = GridBuilder::new();
        for tip in 1..=4 {
            builder = builder.geo_line(
                &format!("JO-{}-{}", SERIAL, tip),
                CellValue::Number(45780.0),
                "08:30:15",
                "PASS",
            );
        }
        let source = MemorySource::new().with(geo.clone(), builder.build());

        let report = CableVerifier::default().verify(&request(), &[], &[geo], &source);

        assert_eq!(report.geometry.verdict, SerialVerdict::Approved);
        assert_eq!(report.geometry.latest_display, "03/05/2025 08:30:15");
    }

    // ==========================================
    // 文件定位
    // ==========================================

    #[test]
    fn test_verify_work_order_uses_locator() {
        let ilrl_dir = TempDir::new().unwrap();
        let geo_dir = TempDir::new().unwrap();

        let ilrl = touch(
            &ilrl_dir
                .path()
                .join(WORK_ORDER)
                .join("JMO-250500001-LC-0001.xlsx"),
        );
        touch(
            &ilrl_dir
                .path()
                .join(WORK_ORDER)
                .join("~$JMO-250500001-LC-0001.xlsx"),
        );
        let geo = touch(&geo_dir.path().join("Geometria 250500001.xlsx"));
        touch(&geo_dir.path().join("Geometria 250500002.xlsx"));

        let source = MemorySource::new()
            .with(ilrl, passing_ilrl())
            .with(geo, geo_grid_for_serial(SERIAL, ["PASS"; 4]));
        let locator = FileLocator::new(ilrl_dir.path(), geo_dir.path());

        let report = CableVerifier::default().verify_work_order(&request(), &locator, &source);

        assert_eq!(report.overall, OverallVerdict::Approved);
        assert_eq!(report.ilrl.analyzed_files, vec!["JMO-250500001-LC-0001.xlsx"]);
        assert_eq!(report.geometry.analyzed_files, vec!["Geometria 250500001.xlsx"]);
    }
}
