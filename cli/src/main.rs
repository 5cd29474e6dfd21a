mod http;
mod keypair;
mod render;


use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use clap::{Args, Parser, Subcommand};
use market::config::{ConfigError, GATEWAY_URL_VAR, MarketConfig, PROGRAM_ID_VAR, PinningCredentials, RPC_URL_VAR};
use market::error::user_message;
use market::gateway::{Attribute, AttributeValue, NftMetadata, ipfs_url};
use market::listings::{ListingView, MarketStats, SortOrder, filter_and_sort, stamp_first_seen};
use market::pda::ListingAddresses;
use market::rpc::{self, SignatureStatus};
use market::service::{self, MarketSession};
use market::signer::WalletSigner as _;
use market::validation::{ValidationError, parse_fee_bps, validate_name};
use market::{MarketError, Pubkey};
use serde_json::{Value, json};
use tokio::time::{Instant, MissedTickBehavior};

use http::{HttpGateway, HttpRpc, Pinner};
use keypair::{KeypairError, KeypairSigner};

const CONFIRM_POLL: Duration = Duration::from_secs(2);

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Keypair(#[from] KeypairError),
    #[error("missing keypair; pass --keypair or set MARKET_KEYPAIR")]
    MissingKeypair,
    #[error("pinning is not configured; set PINATA_API_KEY and PINATA_SECRET_API_KEY")]
    MissingPinning,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{message}")]
    Rejected {
        message: String,
        #[source]
        source: MarketError,
    },
    #[error(transparent)]
    Market(#[from] MarketError),
    #[error("mint {0} is not listed")]
    NotListed(Pubkey),
    #[error("transaction {signature} failed: {error}")]
    TransactionFailed { signature: String, error: String },
    #[error("transaction {0} was not confirmed in time")]
    ConfirmTimeout(String),
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("http client setup failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "nft-market", about = "NFT marketplace command-line client")]
struct Cli {
    #[arg(long, env = "MARKET_RPC_URL", default_value = "https://api.devnet.solana.com")]
    rpc_url: String,

    #[arg(long, env = "MARKET_PROGRAM_ID")]
    program_id: Option<String>,

    #[arg(long, env = "MARKET_GATEWAY_URL", default_value = "https://gateway.pinata.cloud")]
    gateway_url: String,

    #[arg(long, env = "PINATA_API_URL", default_value = "https://api.pinata.cloud")]
    pinning_api_url: String,

    /// Keypair file used to sign transactions.
    #[arg(long, env = "MARKET_KEYPAIR")]
    keypair: Option<PathBuf>,

    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug)]
struct CliContext {
    rpc_url: String,
    program_id: Option<String>,
    gateway_url: String,
    pinning_api_url: String,
    keypair: Option<PathBuf>,
    json: bool,
    http: reqwest::Client,
}

impl CliContext {
    fn config(&self) -> Result<MarketConfig, CliError> {
        let config = MarketConfig::from_lookup(|key| match key {
            RPC_URL_VAR => Some(self.rpc_url.clone()),
            PROGRAM_ID_VAR => self.program_id.clone(),
            GATEWAY_URL_VAR => Some(self.gateway_url.clone()),
            _ => None,
        })?;
        Ok(config)
    }

    fn rpc(&self, config: &MarketConfig) -> HttpRpc {
        HttpRpc::new(self.http.clone(), &config.rpc_url)
    }

    fn gateway(&self) -> HttpGateway {
        HttpGateway::new(self.http.clone())
    }

    fn signer(&self) -> Result<KeypairSigner, CliError> {
        let path = self.keypair.as_deref().ok_or(CliError::MissingKeypair)?;
        Ok(KeypairSigner::from_file(path)?)
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show active listings.
    Browse(BrowseArgs),
    /// Poll listings and print arrivals and removals.
    Watch(WatchArgs),
    /// Show NFTs held by a wallet (default: the keypair's).
    Owned {
        #[arg(long)]
        owner: Option<Pubkey>,
    },
    /// Show the marketplace configuration account.
    Marketplace,
    /// Print every program-derived address for a mint.
    Derive { mint: Pubkey },
    /// Put an NFT up for sale.
    List {
        #[arg(long)]
        mint: String,
        /// Price in SOL.
        #[arg(long)]
        price: String,
        #[command(flatten)]
        submit: SubmitArgs,
    },
    /// Buy a listed NFT.
    Buy {
        #[arg(long)]
        mint: Pubkey,
        /// Listing maker; looked up from the listing when omitted.
        #[arg(long)]
        seller: Option<Pubkey>,
        #[command(flatten)]
        submit: SubmitArgs,
    },
    /// Cancel your listing and take the NFT back.
    Delist {
        #[arg(long)]
        mint: Pubkey,
        #[command(flatten)]
        submit: SubmitArgs,
    },
    /// Create the marketplace with the keypair as admin.
    Init {
        #[arg(long)]
        name: String,
        /// Fee in basis points, 0 to 10000.
        #[arg(long)]
        fee: String,
        #[command(flatten)]
        submit: SubmitArgs,
    },
    /// Change the marketplace fee.
    UpdateFee {
        /// Fee in basis points, 0 to 10000.
        #[arg(long)]
        fee: String,
        #[command(flatten)]
        submit: SubmitArgs,
    },
    /// Show the status of a submitted transaction.
    Status { signature: String },
    /// Upload an image and its metadata document to the pinning service.
    Pin(PinArgs),
}

#[derive(Args, Debug)]
struct BrowseArgs {
    #[arg(long)]
    seller: Option<Pubkey>,

    /// Case-insensitive match on name or description.
    #[arg(long, default_value = "")]
    search: String,

    /// newest, price-low, or price-high.
    #[arg(long, default_value = "newest")]
    sort: SortOrder,
}

#[derive(Args, Debug)]
struct WatchArgs {
    #[arg(long)]
    seller: Option<Pubkey>,

    #[arg(long, default_value_t = 30, help = "Seconds between polls")]
    interval: u64,
}

#[derive(Args, Debug)]
struct SubmitArgs {
    /// Wait until the transaction is confirmed.
    #[arg(long, default_value_t = false)]
    wait: bool,

    #[arg(long, default_value_t = 60, help = "Seconds to wait for confirmation")]
    timeout: u64,
}

#[derive(Args, Debug)]
struct PinArgs {
    /// Image file to upload.
    image: PathBuf,

    #[arg(long)]
    name: String,

    #[arg(long)]
    symbol: Option<String>,

    #[arg(long)]
    description: Option<String>,

    /// Trait as `type=value`; repeatable.
    #[arg(long = "attribute", value_parser = parse_attribute)]
    attributes: Vec<Attribute>,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let ctx = CliContext {
        rpc_url: cli.rpc_url,
        program_id: cli.program_id,
        gateway_url: cli.gateway_url,
        pinning_api_url: cli.pinning_api_url,
        keypair: cli.keypair,
        json: cli.json,
        http: reqwest::Client::builder().build()?,
    };

    match cli.command {
        Command::Browse(args) => run_browse(&ctx, args).await,
        Command::Watch(args) => run_watch(&ctx, args).await,
        Command::Owned { owner } => run_owned(&ctx, owner).await,
        Command::Marketplace => run_marketplace(&ctx).await,
        Command::Derive { mint } => run_derive(&ctx, &mint),
        Command::List { mint, price, submit } => run_list(&ctx, &mint, &price, &submit).await,
        Command::Buy { mint, seller, submit } => run_buy(&ctx, mint, seller, &submit).await,
        Command::Delist { mint, submit } => run_delist(&ctx, mint, &submit).await,
        Command::Init { name, fee, submit } => run_init(&ctx, &name, &fee, &submit).await,
        Command::UpdateFee { fee, submit } => run_update_fee(&ctx, &fee, &submit).await,
        Command::Status { signature } => run_status(&ctx, &signature).await,
        Command::Pin(args) => run_pin(&ctx, args).await,
    }
}

async fn run_browse(ctx: &CliContext, args: BrowseArgs) -> Result<(), CliError> {
    let config = ctx.config()?;
    let listings = service::fetch_listings(
        &ctx.rpc(&config),
        &ctx.gateway(),
        &config.program_id,
        &config.gateway_url,
        args.seller.as_ref(),
        now_ms(),
    )
    .await?;
    let visible = filter_and_sort(&listings, &args.search, args.sort);

    if ctx.json {
        return print_json(&serde_json::to_value(&visible)?);
    }
    if visible.is_empty() {
        println!("{}", empty_message(&args.search));
        return Ok(());
    }
    for listing in &visible {
        println!("{}", render::listing_row(listing));
    }
    println!("{}", render::stats_line(&MarketStats::from_listings(&listings)));
    Ok(())
}

fn empty_message(search: &str) -> &'static str {
    if search.trim().is_empty() {
        "No NFTs are currently listed for sale."
    } else {
        "No listings match the search."
    }
}

async fn run_watch(ctx: &CliContext, args: WatchArgs) -> Result<(), CliError> {
    let config = ctx.config()?;
    let rpc = ctx.rpc(&config);
    let gateway = ctx.gateway();
    let mut ticker = tokio::time::interval(Duration::from_secs(args.interval.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut known: Vec<ListingView> = Vec::new();
    let mut primed = false;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => return Ok(()),
            _ = ticker.tick() => {}
        }
        let fresh = match service::fetch_listings(
            &rpc,
            &gateway,
            &config.program_id,
            &config.gateway_url,
            args.seller.as_ref(),
            now_ms(),
        )
        .await
        {
            Ok(fresh) => stamp_first_seen(&known, fresh),
            Err(e) => {
                tracing::warn!(code = e.error_code(), error = %e, "listing poll failed");
                continue;
            }
        };

        if primed {
            let diff = render::diff_listings(&known, &fresh);
            for listing in &diff.added {
                print_event(ctx, "listed", listing)?;
            }
            for listing in &diff.removed {
                print_event(ctx, "removed", listing)?;
            }
        } else {
            for listing in &fresh {
                print_event(ctx, "listed", listing)?;
            }
            tracing::info!(count = fresh.len(), "watching listings");
            primed = true;
        }
        known = fresh;
    }
}

fn print_event(ctx: &CliContext, event: &str, listing: &ListingView) -> Result<(), CliError> {
    if ctx.json {
        println!("{}", serde_json::to_string(&json!({ "event": event, "listing": listing }))?);
    } else {
        let marker = if event == "removed" { '-' } else { '+' };
        println!("{marker} {}", render::listing_row(listing));
    }
    Ok(())
}

async fn run_owned(ctx: &CliContext, owner: Option<Pubkey>) -> Result<(), CliError> {
    let config = ctx.config()?;
    let owner = match owner {
        Some(owner) => owner,
        None => ctx.signer()?.pubkey(),
    };
    let nfts = service::fetch_owned_nfts(&ctx.rpc(&config), &ctx.gateway(), &owner, &config.gateway_url).await?;

    if ctx.json {
        return print_json(&serde_json::to_value(&nfts)?);
    }
    if nfts.is_empty() {
        println!("{owner} holds no NFTs.");
    }
    for nft in &nfts {
        println!("{}", render::owned_row(nft));
    }
    Ok(())
}

async fn run_marketplace(ctx: &CliContext) -> Result<(), CliError> {
    let config = ctx.config()?;
    let marketplace = service::fetch_marketplace(&ctx.rpc(&config), &config.program_id).await?;

    match (marketplace, ctx.json) {
        (None, true) => print_json(&Value::Null),
        (None, false) => {
            println!("Marketplace not initialized for program {}.", config.program_id);
            Ok(())
        }
        (Some(market), true) => print_json(&json!({
            "name": market.name,
            "authority": market.authority.to_string(),
            "fee_bps": market.fee_bps,
            "treasury": market.treasury.to_string(),
        })),
        (Some(market), false) => {
            println!("{}", render::aligned(&render::marketplace_rows(&market)));
            Ok(())
        }
    }
}

fn run_derive(ctx: &CliContext, mint: &Pubkey) -> Result<(), CliError> {
    let config = ctx.config()?;
    let rows = render::address_rows(&ListingAddresses::derive(&config.program_id, mint));
    if ctx.json {
        let map: serde_json::Map<String, Value> =
            rows.into_iter().map(|(label, value)| (label.to_owned(), Value::String(value))).collect();
        return print_json(&Value::Object(map));
    }
    println!("{}", render::aligned(&rows));
    Ok(())
}

/// Turn a failed write into its user-facing message, logging the cause.
fn rejected(fallback: &'static str) -> impl Fn(MarketError) -> CliError {
    move |source| {
        tracing::warn!(code = source.error_code(), error = %source, action = fallback, "operation failed");
        CliError::Rejected { message: user_message(&source, fallback), source }
    }
}

async fn run_list(ctx: &CliContext, mint: &str, price: &str, submit: &SubmitArgs) -> Result<(), CliError> {
    let config = ctx.config()?;
    let signer = ctx.signer()?;
    let rpc = ctx.rpc(&config);
    let session = MarketSession::new(&rpc, config.program_id).with_signer(Some(&signer));
    let signature = session.submit_listing_form(mint, price).await.map_err(rejected("Failed to list NFT"))?;
    finish_submit(ctx, &session, &signature, submit).await
}

async fn run_buy(ctx: &CliContext, mint: Pubkey, seller: Option<Pubkey>, submit: &SubmitArgs) -> Result<(), CliError> {
    let config = ctx.config()?;
    let signer = ctx.signer()?;
    let rpc = ctx.rpc(&config);
    let seller = match seller {
        Some(seller) => seller,
        None => {
            service::fetch_listing(&rpc, &config.program_id, &mint)
                .await?
                .ok_or(CliError::NotListed(mint))?
                .maker
        }
    };
    let session = MarketSession::new(&rpc, config.program_id).with_signer(Some(&signer));
    let signature = session.purchase_nft(&seller, &mint).await.map_err(rejected("Failed to purchase NFT"))?;
    finish_submit(ctx, &session, &signature, submit).await
}

async fn run_delist(ctx: &CliContext, mint: Pubkey, submit: &SubmitArgs) -> Result<(), CliError> {
    let config = ctx.config()?;
    let signer = ctx.signer()?;
    let rpc = ctx.rpc(&config);
    let session = MarketSession::new(&rpc, config.program_id).with_signer(Some(&signer));
    let signature = session.delist_nft(&mint).await.map_err(rejected("Failed to delist NFT"))?;
    finish_submit(ctx, &session, &signature, submit).await
}

async fn run_init(ctx: &CliContext, name: &str, fee: &str, submit: &SubmitArgs) -> Result<(), CliError> {
    let fee = parse_fee_bps(fee)?;
    validate_name(name)?;
    let config = ctx.config()?;
    let signer = ctx.signer()?;
    let rpc = ctx.rpc(&config);
    let session = MarketSession::new(&rpc, config.program_id).with_signer(Some(&signer));
    let signature = session
        .initialize_marketplace(name, fee)
        .await
        .map_err(rejected("Failed to initialize marketplace"))?;
    finish_submit(ctx, &session, &signature, submit).await
}

async fn run_update_fee(ctx: &CliContext, fee: &str, submit: &SubmitArgs) -> Result<(), CliError> {
    let fee = parse_fee_bps(fee)?;
    let config = ctx.config()?;
    let signer = ctx.signer()?;
    let rpc = ctx.rpc(&config);
    let session = MarketSession::new(&rpc, config.program_id).with_signer(Some(&signer));
    let signature = session.update_fee(fee).await.map_err(rejected("Failed to update fee"))?;
    finish_submit(ctx, &session, &signature, submit).await
}

async fn finish_submit(
    ctx: &CliContext,
    session: &MarketSession<'_, HttpRpc, KeypairSigner>,
    signature: &str,
    submit: &SubmitArgs,
) -> Result<(), CliError> {
    let status = if submit.wait {
        Some(wait_for_confirmation(session, signature, Duration::from_secs(submit.timeout)).await?)
    } else {
        None
    };

    if ctx.json {
        return print_json(&json!({
            "signature": signature,
            "status": status.as_ref().map(render::status_label),
        }));
    }
    println!("{signature}");
    if let Some(status) = status {
        println!("{}", render::status_label(&status));
    }
    Ok(())
}

async fn wait_for_confirmation(
    session: &MarketSession<'_, HttpRpc, KeypairSigner>,
    signature: &str,
    timeout: Duration,
) -> Result<SignatureStatus, CliError> {
    let deadline = Instant::now() + timeout;
    loop {
        match session.confirm(signature).await? {
            SignatureStatus::Pending => {}
            SignatureStatus::Failed(error) => {
                return Err(CliError::TransactionFailed { signature: signature.to_owned(), error });
            }
            done => return Ok(done),
        }
        if Instant::now() >= deadline {
            return Err(CliError::ConfirmTimeout(signature.to_owned()));
        }
        tokio::time::sleep(CONFIRM_POLL).await;
    }
}

async fn run_status(ctx: &CliContext, signature: &str) -> Result<(), CliError> {
    let config = ctx.config()?;
    let status = rpc::get_signature_status(&ctx.rpc(&config), signature)
        .await
        .map_err(MarketError::from)?;
    if ctx.json {
        return print_json(&json!({ "signature": signature, "status": render::status_label(&status) }));
    }
    println!("{}", render::status_label(&status));
    Ok(())
}

async fn run_pin(ctx: &CliContext, args: PinArgs) -> Result<(), CliError> {
    let name = validate_name(&args.name)?.trim().to_owned();
    let credentials = PinningCredentials::from_env().ok_or(CliError::MissingPinning)?;
    let bytes = std::fs::read(&args.image)
        .map_err(|source| CliError::Read { path: args.image.display().to_string(), source })?;
    let draft = NftMetadata {
        name: Some(name),
        symbol: args.symbol,
        description: args.description,
        attributes: (!args.attributes.is_empty()).then_some(args.attributes),
        ..NftMetadata::default()
    };

    let gateway_url = ctx.gateway_url.trim_end_matches('/');
    let pinner = Pinner::new(ctx.http.clone(), credentials, &ctx.pinning_api_url);
    let pinned = pinner
        .upload_nft(&args.image, bytes, draft, gateway_url)
        .await
        .map_err(rejected("Failed to upload to IPFS"))?;

    let image_url = ipfs_url(gateway_url, &pinned.image_hash);
    let metadata_url = ipfs_url(gateway_url, &pinned.metadata_hash);
    if ctx.json {
        return print_json(&json!({
            "image_hash": pinned.image_hash,
            "metadata_hash": pinned.metadata_hash,
            "image_url": image_url,
            "metadata_url": metadata_url,
        }));
    }
    println!("image     {image_url}");
    println!("metadata  {metadata_url}");
    Ok(())
}

/// Parse `--attribute type=value`; numeric values stay numbers.
fn parse_attribute(input: &str) -> Result<Attribute, String> {
    let (trait_type, value) = input.split_once('=').ok_or_else(|| format!("expected type=value, got `{input}`"))?;
    let trait_type = trait_type.trim();
    if trait_type.is_empty() {
        return Err("attribute type must not be empty".to_owned());
    }
    let value = value.trim();
    let value = match value.parse::<serde_json::Number>() {
        Ok(number) => AttributeValue::Number(number),
        Err(_) => AttributeValue::Text(value.to_owned()),
    };
    Ok(Attribute { trait_type: trait_type.to_owned(), value })
}

fn now_ms() -> u64 {
    let Ok(duration) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    u64::try_from(duration.as_millis()).unwrap_or(0)
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
