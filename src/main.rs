mod cli;
mod error;

use crate::cli::{ArchiveArgs, Cli, Command};
use crate::error::{ErrorKind, Result};
use clap::Parser;
use docket_catalog::FileType;
use docket_config::Config;
use docket_library::{ArchiveProperties, archive_file, existing_tags};
use docket_storage::backend::{LocalBackend, ReadOnlyBackend};
use docket_storage::{BackendHandle, Tenant, layout};
use exn::ResultExt;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use time::{OffsetDateTime, PrimitiveDateTime};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "DOCKET_LOG";

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e:?}");
            ExitCode::FAILURE
        },
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    match cli.command {
        Command::Archive(args) => archive(&config, args).await,
        Command::Tags { file_type } => tags(&config, &file_type).await,
        Command::Classify { files } => {
            for file in files {
                classify(&config, &file);
            }
            Ok(())
        },
    }
}

fn backend(config: &Config) -> Result<BackendHandle> {
    let root = config.root().or_raise(|| ErrorKind::Config)?;
    let tenant = Tenant::from(config.tenant.clone());
    let local = LocalBackend::new(tenant.to_string(), layout::tenant_namespace(root, &tenant))
        .or_raise(|| ErrorKind::Config)?;
    if config.dry_run {
        return Ok(Arc::new(ReadOnlyBackend::new(Arc::new(local))));
    }
    Ok(Arc::new(local))
}

/// Current wall-clock time, in the local offset when it can be determined.
fn now() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| {
        tracing::debug!("Local offset unavailable; using UTC");
        OffsetDateTime::now_utc()
    });
    PrimitiveDateTime::new(now.date(), now.time().replace_nanosecond(0).unwrap_or(now.time()))
}

async fn archive(config: &Config, args: ArchiveArgs) -> Result<()> {
    let backend = backend(config)?;
    let file_type = FileType::from_path(&args.file);
    let mut props = ArchiveProperties::for_file_type(file_type, now(), &config.time_defaults)
        .with_description(args.description)
        .with_tags(args.tags);
    if let Some(date) = args.date {
        props.date = date;
    }
    if let Some(time) = args.time {
        props = props.with_time(time);
    } else if args.no_time {
        props = props.with_time(None);
    }

    let archived = archive_file(&backend, &args.file, &props).await.or_raise(|| ErrorKind::Archive(args.file.clone()))?;
    println!("{}", archived.display());
    Ok(())
}

async fn tags(config: &Config, name: &str) -> Result<()> {
    let file_type = FileType::from_name(name).or_raise(|| ErrorKind::FileType(name.to_string()))?;
    let backend = backend(config)?;
    for tag in existing_tags(&backend, file_type).await.or_raise(|| ErrorKind::Tags)? {
        println!("{tag}");
    }
    Ok(())
}

fn classify(config: &Config, file: &Path) {
    let file_type = FileType::from_path(file);
    let uses_time = config.time_defaults.get(file_type.as_str()).copied().unwrap_or(file_type.uses_time_by_default());
    println!(
        "{}\t{file_type}\t{}\t{}",
        file.display(),
        file_type.group(),
        if uses_time { "date+time" } else { "date" }
    );
}
