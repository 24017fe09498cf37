use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use risk_core::{HighRiskPatient, RiskConfig, RiskDomain};
use risk_engine::rank_roster_str;

#[derive(Parser, Debug)]
#[command(
    name = "risk-cli",
    about = "Xếp hạng bệnh nhân nguy cơ cao từ danh sách hồ sơ JSON."
)]
struct Args {
    /// Đường dẫn tới file JSON chứa danh sách bệnh nhân.
    #[arg(short, long)]
    input: PathBuf,

    /// File JSON cấu hình ngưỡng (có thể chỉ ghi đè một phần).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Số bệnh nhân tối đa hiển thị.
    #[arg(short, long)]
    limit: Option<usize>,

    /// In toàn bộ báo cáo dưới dạng JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Không đọc được file cấu hình {path:?}"))?;
            RiskConfig::from_json_str(&raw)?
        }
        None => RiskConfig::default(),
    };
    if let Some(limit) = args.limit {
        config.rank_limit = limit;
    }
    log::debug!("using config {config:?}");

    let data = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Không đọc được file {:?}", args.input))?;
    let report = rank_roster_str(&data, &config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "Generated at: {}\nEvaluated: {}\nHigh risk: {}",
        report.generated_at, report.evaluated, report.flagged
    );
    for (rank, row) in report.patients.iter().enumerate() {
        println!("{:>2}. {}", rank + 1, describe(row));
    }

    Ok(())
}

fn describe(row: &HighRiskPatient) -> String {
    let name = row.patient.name.as_deref().unwrap_or("(unnamed)");
    let id = row.patient.id.as_deref().unwrap_or("-");
    let notes: Vec<String> = row
        .reasons
        .iter()
        .map(|reason| match (reason.note(), reason.score()) {
            (Some(note), _) => note.to_string(),
            (None, Some(score)) => {
                let domain = match reason.domain {
                    RiskDomain::Cardio => "cardio",
                    RiskDomain::Diabetes => "diabetes",
                };
                format!("{domain} model {:.0}%", score * 100.0)
            }
            (None, None) => String::new(),
        })
        .collect();

    format!(
        "{name} [{id}] score {:.2}: {}",
        row.score,
        notes.join(", ")
    )
}
