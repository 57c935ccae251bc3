use anyhow::{Context, Result, bail};
use clap::Parser;
use log::debug;
use planrelay::domain::model::{
    Cancellation, CallContext, CreatePlanRequest, Currency, DeletePlanRequest, GetPlanRequest,
    Interval, ListPlansRequest, RangeFilter, UpdatePlanRequest,
};
use planrelay::{ClientConfig, PlanClient};
use secrecy::SecretString;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;

/// planrelay - manage Stripe recurring billing plans
///
/// Provider rejections (declined cards, unknown plans, bad keys) are printed
/// as JSON and exit successfully. The exit status is non-zero only when the
/// request is invalid or the call runs out of time.
///
/// Examples:
///   planrelay create gold --name Gold --amount 2000 --currency usd --interval month
///   planrelay list --limit 5
#[derive(Parser, Debug)]
#[command(author, version = env!("PLANRELAY_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Secret or restricted API key
    #[arg(
        long = "api-key",
        env = "STRIPE_API_KEY",
        value_name = "KEY",
        hide_env_values = true,
        global = true
    )]
    pub api_key: Option<String>,

    /// API base URL (defaults to https://api.stripe.com)
    #[arg(long = "api-url", env = "PLANRELAY_API_URL", value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Give up retrying after this many seconds
    #[arg(long, value_name = "SECONDS", global = true)]
    pub timeout: Option<u64>,

    /// Idempotency key sent with the request
    #[arg(long = "idempotency-key", value_name = "KEY", global = true)]
    pub idempotency_key: Option<String>,

    /// Connected account to act on behalf of
    #[arg(long, value_name = "ACCOUNT", global = true)]
    pub account: Option<String>,

    /// Extra request header, may be repeated
    #[arg(long = "header", value_name = "NAME=VALUE", value_parser = parse_key_value, global = true)]
    pub headers: Vec<(String, String)>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Create a plan
    Create(CreateArgs),

    /// Show a plan
    Get(IdArgs),

    /// Change the name, descriptor, trial or metadata of a plan
    Update(UpdateArgs),

    /// Delete a plan
    Delete(IdArgs),

    /// List plans, following pages until exhausted
    List(ListArgs),
}

#[derive(clap::Args, Debug)]
pub struct IdArgs {
    #[arg(value_name = "PLAN_ID")]
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct CreateArgs {
    #[arg(value_name = "PLAN_ID")]
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    /// Price in the currency's minor unit
    #[arg(long, default_value_t = 0)]
    pub amount: i64,

    /// ISO currency code, e.g. usd
    #[arg(long)]
    pub currency: Option<Currency>,

    /// day, week, month or year
    #[arg(long)]
    pub interval: Option<Interval>,

    #[arg(long = "interval-count", default_value_t = 0)]
    pub interval_count: u64,

    #[arg(long = "trial-days", default_value_t = 0)]
    pub trial_period_days: u64,

    #[arg(long = "statement-descriptor")]
    pub statement_descriptor: Option<String>,

    #[arg(long = "metadata", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub metadata: Vec<(String, String)>,
}

#[derive(clap::Args, Debug)]
pub struct UpdateArgs {
    #[arg(value_name = "PLAN_ID")]
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long = "trial-days", default_value_t = 0)]
    pub trial_period_days: u64,

    #[arg(long = "statement-descriptor")]
    pub statement_descriptor: Option<String>,

    #[arg(long = "metadata", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub metadata: Vec<(String, String)>,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Page size
    #[arg(long, default_value_t = 0)]
    pub limit: u64,

    #[arg(long = "starting-after", value_name = "PLAN_ID")]
    pub starting_after: Option<String>,

    #[arg(long = "ending-before", value_name = "PLAN_ID")]
    pub ending_before: Option<String>,

    #[arg(long = "created-gt", value_name = "UNIX_SECONDS")]
    pub created_gt: Option<i64>,

    #[arg(long = "created-gte", value_name = "UNIX_SECONDS")]
    pub created_gte: Option<i64>,

    #[arg(long = "created-lt", value_name = "UNIX_SECONDS")]
    pub created_lt: Option<i64>,

    #[arg(long = "created-lte", value_name = "UNIX_SECONDS")]
    pub created_lte: Option<i64>,
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", s)),
    }
}

impl From<CreateArgs> for CreatePlanRequest {
    fn from(args: CreateArgs) -> Self {
        CreatePlanRequest {
            id: args.id,
            amount: args.amount,
            currency: args.currency.unwrap_or_default(),
            name: args.name.unwrap_or_default(),
            interval: args.interval.unwrap_or_default(),
            interval_count: args.interval_count,
            metadata: args.metadata.into_iter().collect::<HashMap<_, _>>(),
            statement_descriptor: args.statement_descriptor.unwrap_or_default(),
            trial_period_days: args.trial_period_days,
        }
    }
}

impl From<UpdateArgs> for UpdatePlanRequest {
    fn from(args: UpdateArgs) -> Self {
        UpdatePlanRequest {
            id: args.id,
            name: args.name.unwrap_or_default(),
            metadata: args.metadata.into_iter().collect::<HashMap<_, _>>(),
            statement_descriptor: args.statement_descriptor.unwrap_or_default(),
            trial_period_days: args.trial_period_days,
        }
    }
}

impl From<ListArgs> for ListPlansRequest {
    fn from(args: ListArgs) -> Self {
        let created = RangeFilter {
            gt: args.created_gt,
            gte: args.created_gte,
            lt: args.created_lt,
            lte: args.created_lte,
        };
        ListPlansRequest {
            starting_after: args.starting_after.unwrap_or_default(),
            ending_before: args.ending_before.unwrap_or_default(),
            limit: args.limit,
            created: (!created.is_empty()).then_some(created),
        }
    }
}

impl Cli {
    fn client_config(&self) -> Result<ClientConfig> {
        let Some(api_key) = &self.api_key else {
            bail!("No API key given; pass --api-key or set STRIPE_API_KEY");
        };

        let mut config = ClientConfig::new(SecretString::from(api_key.clone()))?;
        if let Some(url) = &self.api_url {
            config = config.with_api_url(url.clone());
        }
        if let Some(seconds) = self.timeout {
            let timeout = Duration::from_secs(seconds);
            if timeout < config.request_timeout {
                config = config.with_request_timeout(timeout);
            }
        }
        Ok(config)
    }

    fn call_context(&self, cancellation: Cancellation) -> CallContext {
        let mut ctx = CallContext::new().with_cancellation(cancellation);
        if let Some(seconds) = self.timeout {
            ctx = ctx.with_timeout(Duration::from_secs(seconds));
        }
        if let Some(key) = &self.idempotency_key {
            ctx = ctx.with_idempotency_key(key.clone());
        }
        if let Some(account) = &self.account {
            ctx = ctx.with_account(account.clone());
        }
        for (name, value) in &self.headers {
            ctx = ctx.with_header(name.clone(), value.clone());
        }
        ctx
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to encode response")?;
    println!("{}", json);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let config = cli.client_config()?;
    debug!("Using {:?}", config);
    let client = PlanClient::from_config(&config)?;

    let cancellation = Cancellation::new();
    let on_interrupt = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });
    let ctx = cli.call_context(cancellation);

    match cli.command {
        Commands::Create(args) => print_json(&client.create(&args.into(), &ctx).await?)?,
        Commands::Get(args) => {
            print_json(&client.get(&GetPlanRequest { id: args.id }, &ctx).await?)?
        }
        Commands::Update(args) => print_json(&client.update(&args.into(), &ctx).await?)?,
        Commands::Delete(args) => {
            print_json(&client.delete(&DeletePlanRequest { id: args.id }, &ctx).await?)?
        }
        Commands::List(args) => {
            let req: ListPlansRequest = args.into();
            let mut plans = client.list(Some(&req), &ctx).await?;
            while plans.advance().await {
                if let Some(response) = plans.current() {
                    print_json(&response)?;
                }
            }
        }
    }
    Ok(())
}
