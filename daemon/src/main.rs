//! Oracle feeder daemon: submits commit-reveal price votes for a validator.

use anyhow::Context;
use clap::Parser;
use feeder_crypto::{parse_val_address, HdSigner, Signer};
use feeder_oracle::{
    OracleConfig, OracleQuerier, PriceOracle, PriceProvider, StopHandle, TxBroadcaster,
    TxCoordinator, VoteCycle,
};
use feeder_price::PriceSource;
use feeder_rpc::{subscribe_new_blocks, TendermintClient};
use feeder_utils::{init_logging, LogFormat};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "feeder-daemon", about = "Oracle price feeder daemon")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "FEEDER_CONFIG")]
    config: Option<PathBuf>,

    /// Tendermint RPC endpoint, e.g. "http://127.0.0.1:26657".
    #[arg(long, env = "FEEDER_RPC_URL")]
    rpc_url: Option<String>,

    /// Websocket endpoint for new block events.
    #[arg(long, env = "FEEDER_WS_URL")]
    ws_url: Option<String>,

    #[arg(long, env = "FEEDER_CHAIN_ID")]
    chain_id: Option<String>,

    /// Operator address of the validator to feed for.
    #[arg(long, env = "FEEDER_VALIDATOR")]
    validator: Option<String>,

    #[arg(long, env = "FEEDER_BECH32_PREFIX")]
    bech32_prefix: Option<String>,

    /// "fixed:<decimal>" or an HTTP(S) base URL.
    #[arg(long, env = "FEEDER_PRICE_SOURCE")]
    price_source: Option<String>,

    /// Stop after this many seconds; 0 runs until the node goes away.
    #[arg(long, env = "FEEDER_RUN_TIMEOUT_SECS")]
    run_timeout_secs: Option<u64>,

    /// Broadcast attempts per transaction.
    #[arg(long, env = "FEEDER_SUBMIT_ATTEMPTS")]
    submit_attempts: Option<u32>,

    /// Log format: "human" or "json".
    #[arg(long, env = "FEEDER_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "FEEDER_LOG_LEVEL")]
    log_level: Option<String>,

    /// BIP39 mnemonic of the feeder account.
    #[arg(long, env = "FEEDER_MNEMONIC", hide_env_values = true)]
    mnemonic: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Run the vote loop.
    Run,
    /// Print the feeder account address derived from the mnemonic.
    Address,
}

impl Cli {
    /// File (or default) config with flags and env vars layered on top.
    fn resolve_config(&self) -> anyhow::Result<OracleConfig> {
        let mut config = match &self.config {
            Some(path) => OracleConfig::from_toml_file(&path.to_string_lossy())
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => OracleConfig::default(),
        };

        if let Some(v) = &self.rpc_url {
            config.rpc_url = v.clone();
        }
        if let Some(v) = &self.ws_url {
            config.ws_url = v.clone();
        }
        if let Some(v) = &self.chain_id {
            config.chain_id = v.clone();
        }
        if let Some(v) = &self.validator {
            config.validator = v.clone();
        }
        if let Some(v) = &self.bech32_prefix {
            config.bech32_prefix = v.clone();
        }
        if let Some(v) = &self.price_source {
            config.price_source = v.clone();
        }
        if let Some(v) = self.run_timeout_secs {
            config.run_timeout_secs = v;
        }
        if let Some(v) = self.submit_attempts {
            config.submit_attempts = v;
        }
        if let Some(v) = self.log_format {
            config.log_format = v;
        }
        if let Some(v) = &self.log_level {
            config.log_level = v.clone();
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;
    init_logging(config.log_format, &config.log_level);

    let mnemonic = cli
        .mnemonic
        .as_deref()
        .context("a mnemonic is required (--mnemonic or FEEDER_MNEMONIC)")?;
    let signer = HdSigner::from_mnemonic(mnemonic, &config.bech32_prefix)?;

    match cli.command {
        Command::Address => {
            println!("{}", signer.address());
            Ok(())
        }
        Command::Run => run(config, signer).await,
    }
}

async fn run(config: OracleConfig, signer: HdSigner) -> anyhow::Result<()> {
    config.validate()?;
    let validator = parse_val_address(&config.validator, &config.bech32_prefix)
        .with_context(|| format!("invalid validator address {}", config.validator))?;

    let source = PriceSource::parse(&config.price_source)?;
    let prices: Arc<dyn PriceProvider> = Arc::from(source.build());
    let client = Arc::new(TendermintClient::new(config.rpc_url.clone())?);
    let signer: Arc<dyn Signer> = Arc::new(signer);

    tracing::info!(
        validator = %validator,
        feeder = %signer.address(),
        chain = %config.chain_id,
        prices = prices.name(),
        "starting voter"
    );

    let coordinator = TxCoordinator::new(
        client.clone() as Arc<dyn OracleQuerier>,
        client.clone() as Arc<dyn TxBroadcaster>,
        signer,
        config.chain_id.clone(),
        config.fee(),
    )
    .with_retry(config.retry_policy());
    let cycle = VoteCycle::new(
        client.clone() as Arc<dyn OracleQuerier>,
        prices,
        coordinator,
        validator,
    );
    let oracle = PriceOracle::new(client as Arc<dyn OracleQuerier>, cycle)
        .with_run_timeout(config.run_timeout());

    let blocks = subscribe_new_blocks(&config.ws_url)
        .await
        .with_context(|| format!("subscribing to {}", config.ws_url))?;

    let stop = Arc::new(StopHandle::new());
    let signals = stop.clone();
    tokio::spawn(async move { signals.stop_on_signal().await });

    let exit = oracle.run(blocks, stop.listener()).await?;
    tracing::info!(?exit, "feeder stopped");
    Ok(())
}
