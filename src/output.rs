//! Helpers for rendering generation results for the terminal

use crate::generator::GenerationReport;
use serde_json::{Value, json};

/// Combined structured and human-readable representation of a generation
#[derive(Debug, Clone)]
pub struct RenderedReport {
    /// Structured JSON representation suitable for downstream consumers
    pub json: Value,
    /// Human-readable lines for terminal presentation
    pub human: Vec<String>,
}

/// Render a generation report into both JSON and human-readable forms.
pub fn render_report(report: &GenerationReport) -> RenderedReport {
    let json = report_value(report);

    let mut human = Vec::new();
    human.push(format!("QR code saved to {}", report.path.display()));
    human.push(format!("  Content: {}", report.content));
    human.push(format!(
        "  Symbol: version {} ({}x{} modules, ECC {})",
        report.version, report.modules, report.modules, report.ecc_level
    ));
    human.push(format!(
        "  Image: {}x{} px, {} bytes",
        report.width, report.height, report.file_size
    ));
    if report.verified {
        human.push("  Verified: decoded content matches".to_string());
    }

    RenderedReport { json, human }
}

/// Produce a structured JSON representation of the report.
pub fn report_value(report: &GenerationReport) -> Value {
    json!({
        "path": report.path.display().to_string(),
        "content": report.content,
        "symbol": {
            "version": report.version,
            "modules": report.modules,
            "ecc_level": report.ecc_level,
        },
        "image": {
            "width": report.width,
            "height": report.height,
            "file_size": report.file_size,
        },
        "generated_at": report.generated_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
        "verified": report.verified,
    })
}

/// Render a failure for `--json` consumers.
pub fn error_value(err: &crate::Error) -> Value {
    json!({
        "error": err.to_string(),
        "exit_code": err.exit_code(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::path::PathBuf;

    fn sample() -> GenerationReport {
        GenerationReport {
            path: PathBuf::from("qr_codes/QRCode_20240101120000.png"),
            content: "https://example.com/repo".to_string(),
            version: 2,
            modules: 25,
            width: 330,
            height: 330,
            file_size: 1234,
            ecc_level: "M".to_string(),
            generated_at: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            verified: true,
        }
    }

    #[test]
    fn test_json_shape() {
        let value = report_value(&sample());
        assert_eq!(value["path"], "qr_codes/QRCode_20240101120000.png");
        assert_eq!(value["symbol"]["version"], 2);
        assert_eq!(value["image"]["file_size"], 1234);
        assert_eq!(value["generated_at"], "2024-01-01T12:00:00");
        assert_eq!(value["verified"], true);
    }

    #[test]
    fn test_human_lines() {
        let rendered = render_report(&sample());
        assert_eq!(
            rendered.human[0],
            "QR code saved to qr_codes/QRCode_20240101120000.png"
        );
        assert!(rendered.human.iter().any(|l| l.contains("25x25 modules")));
        assert!(rendered.human.iter().any(|l| l.starts_with("  Verified")));
    }

    #[test]
    fn test_error_value() {
        let value = error_value(&crate::Error::InvalidUrl("nope".to_string()));
        assert_eq!(value["exit_code"], 2);
        assert!(value["error"].as_str().unwrap().contains("Invalid URL"));
    }
}
