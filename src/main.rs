use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use report_mailer::channels::{CliChooser, SmtpDirectShare, SystemUrlDispatcher};
use report_mailer::config::MailerConfig;
use report_mailer::delivery::attachment::has_scheme;
use report_mailer::delivery::{AttachmentInput, DocumentMailer, Platform};

/// Send a generated report by email, falling back through whatever channel
/// the machine offers.
#[derive(Debug, Parser)]
#[command(name = "report-mailer", version)]
struct Cli {
    /// Recipient address (repeatable).
    #[arg(long = "to", value_name = "ADDRESS")]
    to: Vec<String>,

    #[arg(long, default_value = "")]
    subject: String,

    /// Message body, HTML allowed.
    #[arg(long, default_value = "")]
    body: String,

    /// MIME type of the first attachment.
    #[arg(long)]
    mime_type: Option<String>,

    /// Platform profile; overrides MAILER_PLATFORM.
    #[arg(long)]
    platform: Option<Platform>,

    /// Files to send; the first one is the report itself.
    #[arg(value_name = "FILE")]
    attachments: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Install rustls crypto provider before any TLS usage
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        tracing::debug!("rustls crypto provider already installed");
    }

    let cli = Cli::parse();
    let mut config = MailerConfig::from_env().context("invalid mailer configuration")?;
    if let Some(platform) = cli.platform {
        config.platform = platform;
    }

    eprintln!("📨 Report Mailer v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Platform: {}", config.platform);
    eprintln!(
        "   SMTP: {}",
        config
            .smtp
            .as_ref()
            .map(|s| format!("{}:{}", s.host, s.port))
            .unwrap_or_else(|| "disabled".to_string())
    );

    let cwd = std::env::current_dir().context("cannot resolve the working directory")?;
    let attachments = attachment_inputs(cli.attachments, cli.mime_type, &cwd);

    let mailer = DocumentMailer::new(
        config.platform,
        Arc::new(SmtpDirectShare::new(config.smtp.clone())),
        Arc::new(CliChooser::new(config.chooser_interactive)),
        Arc::new(SystemUrlDispatcher::new()),
    );

    let result = mailer
        .send(&cli.to, &cli.subject, &cli.body, &attachments)
        .await;

    println!("{}", serde_json::to_string(&result)?);
    if !result.is_ok() {
        std::process::exit(1);
    }
    Ok(())
}

/// Attach the MIME type, if given, to the first file only. Relative paths are
/// resolved against `cwd`.
fn attachment_inputs(
    paths: Vec<String>,
    mime_type: Option<String>,
    cwd: &Path,
) -> Vec<AttachmentInput> {
    paths
        .into_iter()
        .map(|path| absolute_path(path, cwd))
        .enumerate()
        .map(|(i, path)| match (&mime_type, i) {
            (Some(mime), 0) => AttachmentInput::with_mime(path, mime.clone()),
            _ => AttachmentInput::Path(path),
        })
        .collect()
}

/// Join a relative filesystem path onto `cwd`. Locators with a scheme,
/// absolute paths and blank arguments are returned as given.
fn absolute_path(path: String, cwd: &Path) -> String {
    if path.trim().is_empty() || has_scheme(&path) || Path::new(&path).is_absolute() {
        return path;
    }
    cwd.join(&path).to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_are_resolved() {
        let inputs = attachment_inputs(
            vec!["reports/a.pdf".into(), "/tmp/b.pdf".into()],
            None,
            Path::new("/home/me"),
        );
        assert_eq!(
            inputs,
            vec![
                AttachmentInput::from("/home/me/reports/a.pdf"),
                AttachmentInput::from("/tmp/b.pdf"),
            ]
        );
    }

    #[test]
    fn locators_and_blank_paths_are_untouched() {
        let cwd = Path::new("/home/me");
        assert_eq!(absolute_path("content://media/7".into(), cwd), "content://media/7");
        assert_eq!(absolute_path("file:///x.pdf".into(), cwd), "file:///x.pdf");
        assert_eq!(absolute_path("".into(), cwd), "");
    }

    #[test]
    fn mime_type_goes_to_first_file_only() {
        let inputs = attachment_inputs(
            vec!["/a.pdf".into(), "b.csv".into()],
            Some("application/pdf".into()),
            Path::new("/w"),
        );
        assert_eq!(inputs[0], AttachmentInput::with_mime("/a.pdf", "application/pdf"));
        assert_eq!(inputs[1], AttachmentInput::from("/w/b.csv"));
    }
}
