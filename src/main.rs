use clap::Parser;
use miette::{IntoDiagnostic, Result};
use quorumvault::application::coordinator::TransferCoordinator;
use quorumvault::domain::ports::{ApprovalTrackerBox, SignerRegistryBox, TransferLedgerBox};
use quorumvault::domain::transfer::Address;
use quorumvault::infrastructure::in_memory::InMemoryLedger;
use quorumvault::infrastructure::registry::StaticSignerRegistry;
#[cfg(feature = "storage-rocksdb")]
use quorumvault::infrastructure::rocksdb::RocksDbLedger;
use quorumvault::interfaces::csv::command_reader::CommandReader;
use quorumvault::interfaces::csv::view_writer::ViewWriter;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input commands CSV file
    input: PathBuf,

    /// Registered signer addresses, comma separated
    #[arg(long, value_delimiter = ',', required = true)]
    signers: Vec<String>,

    /// Number of distinct approvals required to execute a transfer
    #[arg(long)]
    quorum: u32,

    /// Address the final projection is rendered for (defaults to the first
    /// signer)
    #[arg(long)]
    viewer: Option<String>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let signers = cli
        .signers
        .iter()
        .map(|s| s.parse::<Address>())
        .collect::<Result<Vec<_>, _>>()
        .into_diagnostic()?;
    let viewer = match &cli.viewer {
        Some(s) => s.parse::<Address>().into_diagnostic()?,
        None => signers[0].clone(),
    };
    let registry: SignerRegistryBox =
        Box::new(StaticSignerRegistry::new(signers, cli.quorum).into_diagnostic()?);

    #[cfg(feature = "storage-rocksdb")]
    let coordinator = if let Some(db_path) = &cli.db_path {
        // Use persistent storage (RocksDB)
        let store = RocksDbLedger::open(db_path).into_diagnostic()?;

        let ledger: TransferLedgerBox = Box::new(store.clone());
        let approvals: ApprovalTrackerBox = Box::new(store);
        TransferCoordinator::new(registry, ledger, approvals)
    } else {
        let store = InMemoryLedger::new();
        let ledger: TransferLedgerBox = Box::new(store.clone());
        let approvals: ApprovalTrackerBox = Box::new(store);
        TransferCoordinator::new(registry, ledger, approvals)
    };
    #[cfg(not(feature = "storage-rocksdb"))]
    let coordinator = {
        if cli.db_path.is_some() {
            eprintln!(
                "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
            );
        }
        let store = InMemoryLedger::new();
        let ledger: TransferLedgerBox = Box::new(store.clone());
        let approvals: ApprovalTrackerBox = Box::new(store);
        TransferCoordinator::new(registry, ledger, approvals)
    };

    // Process commands
    let file = File::open(cli.input).into_diagnostic()?;
    let reader = CommandReader::new(file);
    for result in reader.commands() {
        match result {
            Ok(cmd) => {
                if let Err(e) = coordinator.process_command(cmd).await {
                    tracing::warn!(error = %e, "command rejected");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed row");
            }
        }
    }

    let balance = coordinator.vault_balance().await.into_diagnostic()?;
    tracing::info!(vault = %balance, "final vault balance");

    // Output the final projection
    let view = coordinator.current_transfer(&viewer).await.into_diagnostic()?;
    let stdout = io::stdout();
    let mut writer = ViewWriter::new(stdout.lock());
    writer.write_view(view.as_ref()).into_diagnostic()?;

    Ok(())
}
