use clap::Parser;
use dialoguer::Input;
use metron_common::workflow::{run_submission, Submission, SubmissionOutcome};
use metron_common::{Backend, TaskHandle};
use metron_chat::{backend, cli, config, error, records, scanner, surface};
use backend::{HttpBackend, UploadSpec};
use cli::{Cli, Commands};
use config::Config;
use error::{ChatCliError, Result};
use surface::TerminalSurface;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn is_failure(outcome: &SubmissionOutcome) -> bool {
    matches!(
        outcome,
        SubmissionOutcome::UploadRejected | SubmissionOutcome::Failed | SubmissionOutcome::CommunicationError
    )
}

/// 引数・設定の順に探し、無ければ入力を求める
fn resolve_user_id(flag: Option<i64>, config: &Config) -> Result<i64> {
    if let Some(id) = flag.or(config.user_id) {
        return Ok(id);
    }

    let answer: String = Input::new()
        .with_prompt("Digite o ID do usuário (user_id)")
        .interact_text()?;
    answer
        .trim()
        .parse()
        .map_err(|_| ChatCliError::InvalidUserId(answer.trim().to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load()?;
    let server_url = cli.server.clone().unwrap_or_else(|| config.server_url());
    tracing::debug!(server = %server_url, "接続先");
    let backend = HttpBackend::new(server_url, config.timeout())?;

    match cli.command {
        Commands::Chat { message } => {
            let message = message.join(" ");
            let mut surface = TerminalSurface::new(&[]);
            let outcome = run_submission(
                &backend,
                &mut surface,
                Submission::Chat { message },
                config.poll_interval(),
                tokio::time::sleep,
            )
            .await;
            tracing::debug!(?outcome, "チャット完了");
            if is_failure(&outcome) {
                std::process::exit(1);
            }
        }

        Commands::Upload { paths, command, pdf_url, output } => {
            println!("📄 Metron - envio de certificados\n");

            let files = scanner::collect_pdfs(&paths)?;
            if files.is_empty() && pdf_url.is_none() {
                let target = paths
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                return Err(ChatCliError::NoPdfsFound(target));
            }
            println!("{}", metron_common::message::text::files_loaded(files.len()));
            for file in &files {
                println!("  - {}", file.display());
            }

            let upload = UploadSpec::load(&files, command.clone(), pdf_url).await?;
            let mut surface = TerminalSurface::new(&files);
            let submission = Submission::Upload {
                upload,
                message: command,
            };
            let outcome = run_submission(
                &backend,
                &mut surface,
                submission,
                config.poll_interval(),
                tokio::time::sleep,
            )
            .await;
            tracing::debug!(?outcome, "送信完了");

            if let Some(output) = output {
                if surface.store().is_empty() {
                    println!("{}", metron_common::message::text::NO_DATA);
                } else {
                    records::save_records(&output, surface.store().records())?;
                    println!("✔ Resultado salvo: {}", output.display());
                }
            }
            if is_failure(&outcome) {
                std::process::exit(1);
            }
        }

        Commands::Status { task_id } => {
            let report = backend.fetch_status(&TaskHandle::new(task_id)).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Commands::Insert { input, user_id } => {
            let records = records::load_records(&input)?;
            let user_id = resolve_user_id(user_id, &config)?;
            println!("- {} instrumento(s) para user_id {}", records.len(), user_id);

            let reply = backend.insert(&records, user_id).await?;
            if reply.success {
                println!("✅ {}", reply.message);
            } else {
                println!("❌ {}", reply.message);
                std::process::exit(1);
            }
        }

        Commands::Sql { input, output } => {
            let records = records::load_records(&input)?;
            let sql = backend.generate_sql(&records).await?;
            let output = output.unwrap_or_else(|| records::timestamped_path("sql"));
            std::fs::write(&output, sql)?;
            println!("{} ({})", metron_common::message::text::SQL_DOWNLOADED, output.display());
        }

        Commands::ClearCache => {
            backend.clear_cache().await?;
            println!("✔ {}", metron_common::message::text::SESSION_CLEARED);
        }

        Commands::Config { set_server, set_user_id, show } => {
            let mut config = config;

            if let Some(url) = set_server {
                config.set_server_url(url)?;
                println!("✔ Servidor configurado");
            }

            if let Some(id) = set_user_id {
                config.set_user_id(id)?;
                println!("✔ user_id configurado");
            }

            if show {
                println!("Configuração:");
                println!("  Servidor: {}", config.server_url());
                println!("  user_id: {}", config.user_id.map(|id| id.to_string()).unwrap_or_else(|| "não definido".into()));
                println!("  Intervalo de consulta: {}ms", config.poll_interval_ms);
                println!("  Timeout: {}s", config.timeout_seconds);
            }
        }
    }

    Ok(())
}
