use anyhow::Result;
use clap::Args;

use crate::client::OptimizerClient;

use super::emit;

#[derive(Debug, Clone, Args)]
pub struct TokenArgs {
    /// Session token; authenticates first when omitted.
    #[arg(long, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Overrides the configured account email for this call.
    #[arg(long = "account-email", value_name = "EMAIL")]
    pub account_email: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct TenantArgs {
    #[arg(long = "lookup-email", value_name = "EMAIL")]
    pub lookup_email: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct CreateTenantArgs {
    #[arg(long, value_name = "GROUP")]
    pub user_group: String,
}

pub fn authenticate(client: &OptimizerClient) -> Result<()> {
    emit(client.authenticate()?)
}

pub fn status(client: &OptimizerClient, args: &TokenArgs) -> Result<()> {
    let token = resolve_token(client, args)?;
    emit(client.get_status(&token, args.account_email.as_deref())?)
}

pub fn delete_workload(client: &OptimizerClient, args: &TokenArgs) -> Result<()> {
    let token = resolve_token(client, args)?;
    emit(client.delete_workload(&token, args.account_email.as_deref())?)
}

pub fn tenant(client: &OptimizerClient, args: &TenantArgs) -> Result<()> {
    emit(client.get_tenant(args.lookup_email.as_deref())?)
}

pub fn create_tenant(client: &OptimizerClient, args: &CreateTenantArgs) -> Result<()> {
    emit(client.create_tenant(&args.user_group)?)
}

fn resolve_token(client: &OptimizerClient, args: &TokenArgs) -> Result<String> {
    match &args.token {
        Some(token) => Ok(token.clone()),
        None => Ok(client.auth_token(false)?),
    }
}
