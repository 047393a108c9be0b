use anyhow::Result;
use clap::Args;

use crate::client::OptimizerClient;

use super::emit;

#[derive(Debug, Clone, Args)]
pub struct TopTablesArgs {
    #[arg(long, value_name = "DB", default_value = "default")]
    pub db_name: String,
}

#[derive(Debug, Clone, Args)]
pub struct TableDetailsArgs {
    #[arg(long, value_name = "DB")]
    pub db_name: String,

    #[arg(long, value_name = "TABLE")]
    pub table_name: String,
}

#[derive(Debug, Clone, Args)]
pub struct QueryRiskArgs {
    #[arg(value_name = "SQL")]
    pub query: String,
}

#[derive(Debug, Clone, Args)]
pub struct QueryCompatibilityArgs {
    #[arg(long, value_name = "PLATFORM")]
    pub source_platform: String,

    #[arg(long, value_name = "PLATFORM")]
    pub target_platform: String,

    #[arg(value_name = "SQL")]
    pub query: String,
}

#[derive(Debug, Clone, Args)]
pub struct SimilarQueriesArgs {
    #[arg(long, value_name = "PLATFORM")]
    pub source_platform: String,

    #[arg(value_name = "SQL")]
    pub query: String,
}

#[derive(Debug, Clone, Args)]
pub struct DbTableListArgs {
    /// Optional `database.table` identifiers to scope the recommendation.
    #[arg(value_name = "DB.TABLE")]
    pub db_tables: Vec<String>,
}

pub fn top_tables(client: &OptimizerClient, args: &TopTablesArgs) -> Result<()> {
    emit(client.top_tables(&args.db_name)?)
}

pub fn table_details(client: &OptimizerClient, args: &TableDetailsArgs) -> Result<()> {
    emit(client.table_details(&args.db_name, &args.table_name)?)
}

pub fn query_risk(client: &OptimizerClient, args: &QueryRiskArgs) -> Result<()> {
    emit(client.query_risk(&args.query)?)
}

pub fn query_compatibility(client: &OptimizerClient, args: &QueryCompatibilityArgs) -> Result<()> {
    emit(client.query_compatibility(&args.source_platform, &args.target_platform, &args.query)?)
}

pub fn similar_queries(client: &OptimizerClient, args: &SimilarQueriesArgs) -> Result<()> {
    emit(client.similar_queries(&args.source_platform, &args.query)?)
}

pub fn top_filters(client: &OptimizerClient, args: &DbTableListArgs) -> Result<()> {
    emit(client.top_filters(&args.db_tables)?)
}

pub fn top_aggs(client: &OptimizerClient, args: &DbTableListArgs) -> Result<()> {
    emit(client.top_aggs(&args.db_tables)?)
}

pub fn top_columns(client: &OptimizerClient, args: &DbTableListArgs) -> Result<()> {
    emit(client.top_columns(&args.db_tables)?)
}

pub fn top_joins(client: &OptimizerClient, args: &DbTableListArgs) -> Result<()> {
    emit(client.top_joins(&args.db_tables)?)
}

pub fn top_databases(client: &OptimizerClient) -> Result<()> {
    emit(client.top_databases()?)
}
