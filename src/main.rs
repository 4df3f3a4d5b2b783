// ==========================================
// 光纤线缆验证系统 - 命令行入口
// ==========================================
// 用法:
//   cable-verifier <OT> <SERIAL> [--json] [--no-log]
//
// 退出码: 任何判定均返回 0; 查询无效或配置/日志 IO 失败返回非 0
// ==========================================

use anyhow::{bail, Context, Result};
use cable_verifier::config::{default_config_path, VerifierConfig};
use cable_verifier::db::open_sqlite_connection;
use cable_verifier::domain::measurement::VerificationReport;
use cable_verifier::{
    logging, CableVerifier, FileLocator, ResultLogRepository, VerificationLogEntry,
    VerificationRequest, WorkbookReader, APP_NAME, VERSION,
};
use std::sync::{Arc, Mutex};

struct CliArgs {
    work_order: String,
    serial: String,
    json: bool,
    no_log: bool,
}

fn parse_args() -> Result<CliArgs> {
    let mut positional = Vec::new();
    let mut json = false;
    let mut no_log = false;

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            "--no-log" => no_log = true,
            flag if flag.starts_with("--") => bail!("未知参数: {}", flag),
            _ => positional.push(arg),
        }
    }

    if positional.len() != 2 {
        bail!("用法: cable-verifier <OT> <SERIAL> [--json] [--no-log]");
    }
    let serial = positional.pop().unwrap_or_default();
    let work_order = positional.pop().unwrap_or_default();

    Ok(CliArgs {
        work_order,
        serial,
        json,
        no_log,
    })
}

fn main() -> Result<()> {
    logging::init();

    let args = parse_args()?;
    let request = VerificationRequest::new(&args.work_order, &args.serial)
        .context("查询参数无效")?;

    tracing::info!("{} v{}", APP_NAME, VERSION);

    let config_path = default_config_path();
    let config = VerifierConfig::load_or_default(&config_path);
    tracing::info!("使用配置: {}", config_path.display());
    if let Err(e) = config.validate() {
        tracing::warn!("配置校验未通过,继续执行: {}", e);
    }

    let verifier = CableVerifier::new(config.engine.clone());
    let locator = FileLocator::from_config(&config);
    let report = verifier.verify_work_order(&request, &locator, &WorkbookReader);

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("报告序列化失败")?;
        println!("{}", json);
    } else {
        print!("{}", render_report(&report));
    }

    if !args.no_log {
        append_log(&config, &report)?;
    }

    Ok(())
}

fn append_log(config: &VerifierConfig, report: &VerificationReport) -> Result<()> {
    if let Some(parent) = config.result_log_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("无法创建日志目录: {}", parent.display()))?;
        }
    }

    let conn = open_sqlite_connection(&config.result_log_path).with_context(|| {
        format!("无法打开结果日志: {}", config.result_log_path.display())
    })?;
    let repo = ResultLogRepository::new(Arc::new(Mutex::new(conn)));
    repo.ensure_schema().context("结果日志建表失败")?;

    let log_id = repo
        .append(&VerificationLogEntry::from_report(report))
        .context("结果日志写入失败")?;
    tracing::debug!(%log_id, "验证结果已记录");
    Ok(())
}

fn render_report(report: &VerificationReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "OT {}  序列号 {} (后缀 {})\n",
        report.work_order, report.serial, report.serial_suffix
    ));

    out.push_str(&format!(
        "\n[ILRL] {}  最新测量: {}\n",
        report.ilrl.verdict, report.ilrl.latest_display
    ));
    for file in &report.ilrl.analyzed_files {
        out.push_str(&format!("  文件: {}\n", file));
    }
    for point in &report.ilrl.points {
        out.push_str(&format!(
            "  {:<32} #{:<3} {:<4} {}\n",
            point.file_name,
            point.line_number,
            point.result.to_string(),
            point.display_timestamp()
        ));
    }

    out.push_str(&format!(
        "\n[几何] {}  最新测量: {}\n",
        report.geometry.verdict, report.geometry.latest_display
    ));
    for file in &report.geometry.analyzed_files {
        out.push_str(&format!("  文件: {}\n", file));
    }
    for point in &report.geometry.points {
        out.push_str(&format!(
            "  端点 {:<3} {:<6} {}\n",
            point.tip.to_string(),
            point.display_result(),
            point.display_timestamp()
        ));
    }

    out.push_str(&format!("\n总判定: {}\n", report.overall));
    out
}
