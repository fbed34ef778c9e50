//! qrstamp command-line entrypoint

use clap::Parser;
use qrstamp::output::{error_value, render_report};
use qrstamp::{QrGenerator, QrstampConfig, Result, logging};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(
    name = "qrstamp",
    version,
    about = "Generate a timestamped QR code PNG from a URL or text"
)]
struct Cli {
    /// Optional configuration file (toml/yaml). Defaults to qrstamp.{toml,yaml} in cwd/XDG config.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Text to encode (overrides QR_CONTENT)
    #[arg(long, value_name = "TEXT", conflicts_with = "url")]
    content: Option<String>,

    /// URL to encode; must be an absolute http(s) URL
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Directory receiving the generated image (overrides QR_OUTPUT_DIR)
    #[arg(long, value_name = "PATH")]
    output_dir: Option<PathBuf>,

    /// Dark module color, by name or #RRGGBB
    #[arg(long, value_name = "COLOR")]
    fill_color: Option<String>,

    /// Background color, by name or #RRGGBB
    #[arg(long, value_name = "COLOR")]
    back_color: Option<String>,

    /// Pixels per module
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    scale: Option<u32>,

    /// Quiet zone width in modules
    #[arg(long, value_name = "N")]
    border: Option<u32>,

    /// Skip decoding the written file
    #[arg(long)]
    no_verify: bool,

    /// Output the result as formatted JSON instead of human-readable text
    #[arg(long)]
    json: bool,
}

impl Cli {
    /// Apply command-line overrides, which take precedence over file and env.
    fn apply(&self, config: &mut QrstampConfig) {
        if let Some(ref content) = self.content {
            config.qr.content = content.clone();
        }
        if let Some(ref url) = self.url {
            config.qr.content = url.clone();
            config.qr.require_url = true;
        }
        if let Some(ref dir) = self.output_dir {
            config.output.directory = dir.clone();
        }
        if let Some(ref color) = self.fill_color {
            config.qr.fill_color = color.clone();
        }
        if let Some(ref color) = self.back_color {
            config.qr.back_color = color.clone();
        }
        if let Some(scale) = self.scale {
            config.qr.scale = scale;
        }
        if let Some(border) = self.border {
            config.qr.border = border;
        }
        if self.no_verify {
            config.output.verify = false;
        }
    }
}

/// Exit code for malformed command lines, shared with configuration errors
const USAGE_EXIT_CODE: u8 = 1;

/// Exit code for a clap parse failure; `--help` and `--version` are successes.
fn parse_failure_code(err: &clap::Error) -> u8 {
    if err.use_stderr() { USAGE_EXIT_CODE } else { 0 }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return ExitCode::from(parse_failure_code(&err));
        }
    };

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if cli.json {
                if let Ok(text) = serde_json::to_string_pretty(&error_value(&err)) {
                    println!("{text}");
                }
            } else {
                eprintln!("Error: {err}");
            }
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = QrstampConfig::load(cli.config.as_deref())?;
    cli.apply(&mut config);

    logging::init(&config.logging)?;

    match config.source {
        Some(ref path) => info!("Using configuration file: {}", path.display()),
        None => debug!("No qrstamp.toml / qrstamp.yaml found, using defaults"),
    }

    info!(
        output_dir = %config.output.directory.display(),
        require_url = config.qr.require_url,
        verify = config.output.verify,
        "Generating QR code"
    );

    let generator = QrGenerator::from_config(&config)?;
    let report = generator.generate_report(
        &config.qr.content,
        &config.output.directory,
        chrono::Local::now().naive_local(),
    )?;

    let rendered = render_report(&report);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&rendered.json)?);
    } else {
        for line in &rendered.human {
            println!("{line}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use qrstamp::Error;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_url_flag_enables_url_mode() {
        let cli = Cli::parse_from(["qrstamp", "--url", "https://example.com/custom"]);
        let mut config = QrstampConfig::default();
        cli.apply(&mut config);

        assert_eq!(config.qr.content, "https://example.com/custom");
        assert!(config.qr.require_url);
    }

    #[test]
    fn test_defaults_without_flags() {
        let cli = Cli::parse_from(["qrstamp"]);
        let mut config = QrstampConfig::default();
        cli.apply(&mut config);

        assert_eq!(config.qr.content, qrstamp::config::DEFAULT_CONTENT);
        assert!(!config.qr.require_url);
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "qrstamp",
            "--content",
            "plain text",
            "--output-dir",
            "out",
            "--fill-color",
            "blue",
            "--back-color",
            "yellow",
            "--scale",
            "4",
            "--border",
            "1",
            "--no-verify",
        ]);
        let mut config = QrstampConfig::default();
        cli.apply(&mut config);

        assert_eq!(config.qr.content, "plain text");
        assert_eq!(config.output.directory, PathBuf::from("out"));
        assert_eq!(config.qr.fill_color, "blue");
        assert_eq!(config.qr.back_color, "yellow");
        assert_eq!(config.qr.scale, 4);
        assert_eq!(config.qr.border, 1);
        assert!(!config.output.verify);
    }

    #[test]
    fn test_zero_scale_rejected() {
        let err = Cli::try_parse_from(["qrstamp", "--scale", "0"]).unwrap_err();
        assert_eq!(parse_failure_code(&err), 1);
    }

    #[test]
    fn test_usage_errors_do_not_share_encoding_exit_code() {
        let err = Cli::try_parse_from(["qrstamp", "--bogus"]).unwrap_err();
        assert_eq!(parse_failure_code(&err), USAGE_EXIT_CODE);
        assert_ne!(
            parse_failure_code(&err),
            Error::Encoding("x".into()).exit_code()
        );

        let err = Cli::try_parse_from(["qrstamp", "--content", "a", "--url", "https://b"])
            .unwrap_err();
        assert_eq!(parse_failure_code(&err), USAGE_EXIT_CODE);
    }

    #[test]
    fn test_help_exits_successfully() {
        let err = Cli::try_parse_from(["qrstamp", "--help"]).unwrap_err();
        assert_eq!(parse_failure_code(&err), 0);
    }

    #[test]
    fn test_verification_exit_code() {
        let err = Error::Verification {
            path: PathBuf::from("x.png"),
            expected: "a".into(),
            found: "b".into(),
        };
        assert_eq!(err.exit_code(), 4);
    }
}
