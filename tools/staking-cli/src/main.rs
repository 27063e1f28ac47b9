use std::{
    fs,
    io::{self, BufRead, Write},
    path::PathBuf,
    sync::Arc,
    time::Duration,
};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use staking_tx::{
    format::format_amount, ApprovalGatedExecutor, ConfirmOutcome, ExecutorConfig, SelfStakeModal,
    TracingNotifier,
};
use staking_types::{ChainConfig, ChainReader};
use time::OffsetDateTime;

mod record;
mod rpc;

use record::{append_stake_record, StakeRecord};
use rpc::EthersChain;

/// Stake GTC on yourself through the Identity Staking contract.
///
/// Approves the staking contract to spend GTC first when the current allowance does not
/// cover the amount, and only then submits the stake.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// JSON-RPC endpoint of the target chain.
    #[arg(long, env = "RPC_URL")]
    rpc_url: String,

    /// Path to a file containing the staker's private key.
    #[arg(long, env = "PRIV_KEY_PATH", conflicts_with = "private_key")]
    private_key_path: Option<PathBuf>,

    /// Private key (hex string, 0x...).
    #[arg(long, env = "PKEY", conflicts_with = "private_key_path")]
    private_key: Option<String>,

    /// Chain config JSON (id, name, gtcContractAddr, stakingContractAddr, explorerUrl).
    #[arg(long, env = "CHAIN_CONFIG", default_value = "chain.json")]
    chain_config: PathBuf,

    /// Give up waiting for a receipt after this many seconds (0 waits forever).
    #[arg(long, default_value_t = 600)]
    receipt_timeout_secs: u64,

    /// Receipt polling interval.
    #[arg(long, default_value_t = 2_000)]
    poll_interval_ms: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the wallet's GTC allowance for the staking contract.
    Allowance,

    /// Stake on yourself, or update the existing self stake.
    SelfStake {
        /// GTC to add (decimal). 0 only extends the lockup.
        #[arg(long)]
        amount: String,

        /// Lockup period in months (30 days each).
        #[arg(long)]
        months: u64,

        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,

        /// Append the result to this JSON file.
        #[arg(long)]
        record: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing();
    let cli = Cli::parse();

    let config = load_chain_config(&cli)?;
    let private_key = resolve_private_key(&cli)?;
    let chain = Arc::new(EthersChain::connect(
        &cli.rpc_url,
        &private_key,
        config.id,
        Duration::from_millis(cli.poll_interval_ms),
    )?);
    let settings = ExecutorConfig {
        receipt_timeout: (cli.receipt_timeout_secs > 0)
            .then(|| Duration::from_secs(cli.receipt_timeout_secs)),
    };
    let executor = ApprovalGatedExecutor::new(
        chain.clone(),
        config.clone(),
        chain.address(),
        Arc::new(TracingNotifier),
        settings,
    );

    match cli.command {
        Command::Allowance => {
            let allowance = executor
                .refresh_allowance()
                .await
                .context("failed reading allowance")?;
            println!(
                "{} allows {} GTC to {}",
                chain.address(),
                format_amount(allowance),
                config.staking_contract_addr
            );
            Ok(())
        }
        Command::SelfStake {
            amount,
            months,
            yes,
            record,
        } => self_stake(chain, executor, &config, &amount, months, yes, record).await,
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
}

fn load_chain_config(cli: &Cli) -> Result<ChainConfig> {
    let raw = fs::read_to_string(&cli.chain_config)
        .with_context(|| format!("failed reading {}", cli.chain_config.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed parsing chain config {}", cli.chain_config.display()))
}

fn resolve_private_key(cli: &Cli) -> Result<String> {
    if let Some(ref path) = cli.private_key_path {
        return fs::read_to_string(path)
            .map(|key| key.trim().to_string())
            .with_context(|| format!("failed reading private key from {}", path.display()));
    }
    cli.private_key.clone().ok_or_else(|| {
        anyhow!(
            "missing staker key: provide --private-key-path or --private-key (or set PRIV_KEY_PATH/PKEY)"
        )
    })
}

async fn self_stake(
    chain: Arc<EthersChain>,
    executor: ApprovalGatedExecutor<EthersChain>,
    config: &ChainConfig,
    amount: &str,
    months: u64,
    yes: bool,
    record: Option<PathBuf>,
) -> Result<()> {
    let current = chain
        .self_stake(config.staking_contract_addr, chain.address(), config.id)
        .await
        .context("failed reading current self stake")?;

    let modal = SelfStakeModal::self_stake(
        executor,
        amount,
        months,
        current.as_ref(),
        OffsetDateTime::now_utc(),
    )?;
    modal.open();

    let content = modal.content();
    println!("{}", content.title);
    for line in &content.lines {
        let marker = if line.emphasis { "*" } else { " " };
        println!("{marker} {:<18} {}", line.label, line.value);
    }

    if !yes && !prompt(&format!("{}? [y/N] ", content.button_text))? {
        modal.close();
        println!("Cancelled");
        return Ok(());
    }

    match modal.confirm().await {
        ConfirmOutcome::Succeeded => {}
        ConfirmOutcome::Failed(err) => {
            if let Some(tx_hash) = err.pending_tx() {
                eprintln!("See {}", config.tx_link(&tx_hash));
            }
            return Err(err).context("staking failed");
        }
        ConfirmOutcome::Ignored => bail!("a staking attempt is already running"),
    }

    let tx = modal.action();
    let execution = tx
        .last_execution()
        .ok_or_else(|| anyhow!("stake confirmed without an execution record"))?;
    let link = config.tx_link(&execution.receipt.tx_hash);
    println!("Confirmed in block {}: {link}", execution.receipt.block_number);

    if let Some(path) = record {
        let entry = StakeRecord {
            staker: tx.intent().staker.to_string(),
            function: tx.target().function_name().to_string(),
            amount_wei: tx.intent().amount.to_string(),
            lockup_seconds: tx.intent().lockup.seconds(),
            approval_tx: execution.approval.map(|hash| hash.to_string()),
            stake_tx: execution.receipt.tx_hash.to_string(),
            block_number: execution.receipt.block_number,
            explorer_link: link,
        };
        append_stake_record(&path, &config.name, &entry)?;
    }
    Ok(())
}

fn prompt(question: &str) -> Result<bool> {
    print!("{question}");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
