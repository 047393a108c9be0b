#![forbid(unsafe_code)]

use anyhow::{Result, anyhow};
use clap::Parser;
use clap::error::ErrorKind;
use optclient::OptimizerClient;
use optclient::cli::app::{Cli, Command, ConnectionArgs};
use optclient::cli::commands::{self, ServiceFailure};
use optclient::config::OptimizerConfig;

const EXIT_SUCCESS: i32 = 0;
const EXIT_RUNTIME_FAILURE: i32 = 1;
const EXIT_SERVICE_ERROR: i32 = 2;
const EXIT_USAGE_ERROR: i32 = 64;

fn main() {
    init_tracing();
    std::process::exit(run());
}

fn run() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => return exit_code_for_parse_error(error),
    };
    let command_name = command_name(&cli.command);
    println!("optclient: starting `{command_name}`");

    match execute(cli) {
        Ok(()) => {
            println!("optclient: completed `{command_name}` (exit_code={EXIT_SUCCESS})");
            EXIT_SUCCESS
        }
        Err(error) => {
            let exit_code = classify_runtime_error(&error);
            eprintln!("optclient: failed `{command_name}` (exit_code={exit_code})");
            eprintln!("{error:#}");
            exit_code
        }
    }
}

fn execute(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli.connection)?;
    let client = OptimizerClient::new(config)?;

    match cli.command {
        Command::Authenticate => commands::session::authenticate(&client),
        Command::Status(args) => commands::session::status(&client, &args),
        Command::DeleteWorkload(args) => commands::session::delete_workload(&client, &args),
        Command::Tenant(args) => commands::session::tenant(&client, &args),
        Command::CreateTenant(args) => commands::session::create_tenant(&client, &args),
        Command::Upload(args) => commands::upload::run(&client, &args),
        Command::UploadStatus(args) => commands::upload::status(&client, &args),
        Command::TopTables(args) => commands::insights::top_tables(&client, &args),
        Command::TableDetails(args) => commands::insights::table_details(&client, &args),
        Command::QueryRisk(args) => commands::insights::query_risk(&client, &args),
        Command::QueryCompatibility(args) => {
            commands::insights::query_compatibility(&client, &args)
        }
        Command::SimilarQueries(args) => commands::insights::similar_queries(&client, &args),
        Command::TopFilters(args) => commands::insights::top_filters(&client, &args),
        Command::TopAggs(args) => commands::insights::top_aggs(&client, &args),
        Command::TopColumns(args) => commands::insights::top_columns(&client, &args),
        Command::TopJoins(args) => commands::insights::top_joins(&client, &args),
        Command::TopDatabases => commands::insights::top_databases(&client),
    }
}

fn resolve_config(args: &ConnectionArgs) -> Result<OptimizerConfig> {
    let api_url = setting(args.api_url.clone(), "OPTIMIZER_API_URL")
        .ok_or_else(|| anyhow!("service URL is not set; pass --api-url or OPTIMIZER_API_URL"))?;
    let mut config = OptimizerConfig::new(api_url)?;

    if let Some(email) = setting(args.email.clone(), "OPTIMIZER_EMAIL") {
        config = config.with_email(email);
    }
    if let Some(password) = env_setting("OPTIMIZER_EMAIL_PASSWORD") {
        config = config.with_email_password(password);
    }
    if let Some(name) = setting(args.product_name.clone(), "OPTIMIZER_PRODUCT_NAME") {
        config = config.with_product_name(name);
    }
    if let Some(secret) = setting(args.product_secret.clone(), "OPTIMIZER_PRODUCT_SECRET") {
        config = config.with_product_secret(secret);
    }
    if let Some(secret) = setting(
        args.product_auth_secret.clone(),
        "OPTIMIZER_PRODUCT_AUTH_SECRET",
    ) {
        config = config.with_product_auth_secret(secret);
    }
    if let Some(path) = args
        .cli_path
        .clone()
        .or_else(|| env_setting("OPTIMIZER_CLI_PATH").map(Into::into))
    {
        config = config.with_cli_path(path);
    }
    if args.insecure {
        config = config.with_tls_verify(false);
    }

    Ok(config)
}

fn setting(flag: Option<String>, env_name: &str) -> Option<String> {
    flag.or_else(|| env_setting(env_name))
}

fn env_setting(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

fn classify_runtime_error(error: &anyhow::Error) -> i32 {
    if error.downcast_ref::<ServiceFailure>().is_some() {
        EXIT_SERVICE_ERROR
    } else {
        EXIT_RUNTIME_FAILURE
    }
}

fn exit_code_for_parse_error(error: clap::Error) -> i32 {
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = error.print();
            EXIT_SUCCESS
        }
        _ => {
            let _ = error.print();
            EXIT_USAGE_ERROR
        }
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Authenticate => "authenticate",
        Command::Status(_) => "status",
        Command::DeleteWorkload(_) => "delete-workload",
        Command::Tenant(_) => "tenant",
        Command::CreateTenant(_) => "create-tenant",
        Command::Upload(_) => "upload",
        Command::UploadStatus(_) => "upload-status",
        Command::TopTables(_) => "top-tables",
        Command::TableDetails(_) => "table-details",
        Command::QueryRisk(_) => "query-risk",
        Command::QueryCompatibility(_) => "query-compatibility",
        Command::SimilarQueries(_) => "similar-queries",
        Command::TopFilters(_) => "top-filters",
        Command::TopAggs(_) => "top-aggs",
        Command::TopColumns(_) => "top-columns",
        Command::TopJoins(_) => "top-joins",
        Command::TopDatabases => "top-databases",
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
