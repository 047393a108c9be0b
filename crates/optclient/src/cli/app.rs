use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::commands::{
    insights::{
        DbTableListArgs, QueryCompatibilityArgs, QueryRiskArgs, SimilarQueriesArgs,
        TableDetailsArgs, TopTablesArgs,
    },
    session::{CreateTenantArgs, TenantArgs, TokenArgs},
    upload::{UploadArgs, UploadStatusArgs},
};

#[derive(Debug, Parser)]
#[command(name = "optclient", version, about = "Workload optimizer advisory client")]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Connection settings; every flag falls back to its `OPTIMIZER_*`
/// environment variable.
#[derive(Debug, Clone, Args)]
pub struct ConnectionArgs {
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    #[arg(long, global = true, value_name = "EMAIL")]
    pub email: Option<String>,

    #[arg(long, global = true, value_name = "NAME")]
    pub product_name: Option<String>,

    #[arg(long, global = true, value_name = "SECRET")]
    pub product_secret: Option<String>,

    #[arg(long, global = true, value_name = "SECRET")]
    pub product_auth_secret: Option<String>,

    #[arg(long, global = true, value_name = "PATH")]
    pub cli_path: Option<PathBuf>,

    /// Skip TLS certificate verification.
    #[arg(long, global = true, default_value_t = false)]
    pub insecure: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Authenticate,
    Status(TokenArgs),
    DeleteWorkload(TokenArgs),
    Tenant(TenantArgs),
    CreateTenant(CreateTenantArgs),
    Upload(UploadArgs),
    UploadStatus(UploadStatusArgs),
    TopTables(TopTablesArgs),
    TableDetails(TableDetailsArgs),
    QueryRisk(QueryRiskArgs),
    QueryCompatibility(QueryCompatibilityArgs),
    SimilarQueries(SimilarQueriesArgs),
    TopFilters(DbTableListArgs),
    TopAggs(DbTableListArgs),
    TopColumns(DbTableListArgs),
    TopJoins(DbTableListArgs),
    TopDatabases,
}
