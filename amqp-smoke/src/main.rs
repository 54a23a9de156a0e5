//! Command line entry point for the smoke-test clients.
//!
//! Runs one client, prints its counters as one line of JSON on stdout (the
//! test suite parses that line) and exits nonzero when the run failed.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use amqp_smoke::config::ClientConfigBuilder;
use amqp_smoke::{
    content, ClientConfig, ClientError, Container, ReceiverClient, ResultData, SenderClient,
};

#[derive(Parser, Debug)]
#[command(name = "amqp-smoke", version, about = "AMQP 1.0 smoke-test clients")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send messages until the target count has been accepted.
    Send(SendArgs),
    /// Receive messages until the target count has arrived.
    Receive(ReceiveArgs),
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Endpoint, e.g. amqp://localhost:5672/queue-1.
    #[arg(long)]
    url: String,

    /// Link address, overriding the URL path.
    #[arg(long)]
    address: Option<String>,

    /// Target number of messages.
    #[arg(long, default_value_t = 100)]
    count: u64,

    /// Deadline for the whole run, in seconds.
    #[arg(long, default_value_t = 600)]
    timeout: u64,

    /// Container id announced on open.
    #[arg(long)]
    container_id: Option<String>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, default_value = "info")]
    log: String,
}

#[derive(Args, Debug)]
struct SendArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Payload sent in every message.
    #[arg(long)]
    message_content: Option<String>,

    /// File to read the payload from.
    #[arg(long, conflicts_with = "message_content")]
    message_content_file: Option<PathBuf>,

    /// Generate a payload of this many bytes instead.
    #[arg(long, conflicts_with_all = ["message_content", "message_content_file"])]
    message_size: Option<usize>,

    /// Upper bound on deliveries kept in flight.
    #[arg(long, default_value_t = 10)]
    window: u32,
}

#[derive(Args, Debug)]
struct ReceiveArgs {
    #[command(flatten)]
    common: CommonArgs,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let log = match &cli.command {
        Command::Send(args) => args.common.log.as_str(),
        Command::Receive(args) => args.common.log.as_str(),
    };
    init_logging(log);

    let results = match cli.command {
        Command::Send(args) => run_send(args).await,
        Command::Receive(args) => run_receive(args).await,
    };

    // The test suite parses this line
    println!("{results}");

    if results.errormsg.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn init_logging(log: &str) {
    let level = log.parse::<Level>().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");
}

async fn run_send(args: SendArgs) -> ResultData {
    let config = match send_config(args) {
        Ok(config) => config,
        Err(error) => return failed(ResultData::default(), &error),
    };
    let mut client = SenderClient::new(&config);
    let run = Container::new(config).run_sender(&mut client).await;
    let results = client.into_results();
    match run {
        Ok(()) => results,
        Err(error) => failed(results, &error),
    }
}

async fn run_receive(args: ReceiveArgs) -> ResultData {
    let config = match receive_config(args) {
        Ok(config) => config,
        Err(error) => return failed(ResultData::default(), &error),
    };
    let mut client = ReceiverClient::new(&config);
    let run = Container::new(config).run_receiver(&mut client).await;
    let results = client.into_results();
    match run {
        Ok(()) => results,
        Err(error) => failed(results, &error),
    }
}

fn send_config(args: SendArgs) -> Result<ClientConfig, ClientError> {
    let SendArgs {
        common,
        message_content,
        message_content_file,
        message_size,
        window,
    } = args;
    let mut builder = common_config(common).window(window);
    if let Some(body) = message_content {
        builder = builder.body(body);
    } else if let Some(path) = message_content_file {
        builder = builder.body(content::content_from_file(path)?);
    } else if let Some(size) = message_size {
        builder = builder.body(content::generate_content(size));
    }
    builder.build()
}

fn receive_config(args: ReceiveArgs) -> Result<ClientConfig, ClientError> {
    common_config(args.common).build()
}

fn common_config(common: CommonArgs) -> ClientConfigBuilder {
    let mut builder = ClientConfig::builder()
        .url(common.url)
        .count(common.count)
        .timeout(Duration::from_secs(common.timeout));
    if let Some(address) = common.address {
        builder = builder.address(address);
    }
    if let Some(container_id) = common.container_id {
        builder = builder.container_id(container_id);
    }
    builder
}

fn failed(mut results: ResultData, error: &ClientError) -> ResultData {
    results.errormsg = match error {
        ClientError::Timeout => error.to_string(),
        other => format!("Unexpected error: {other}"),
    };
    results
}
