use std::cell::RefCell;

use serde_json::json;
use tracing::debug;

use crate::config::OptimizerConfig;
use crate::error::{OptimizerError, OptimizerResult};
use crate::models::ServiceResponse;
use crate::transport::{CliTransport, RestTransport};
use crate::upload::{self, UploadData, UploadFormat};

/// Client adapter for the optimizer advisory service.
///
/// The service exposes two access mechanisms: a thick CLI tool for bulk and
/// analytic operations and thin REST endpoints for session lifecycle. This
/// client hides the split behind one response shape and one error type. It is
/// fully synchronous and holds no state across calls beyond the cached auth
/// token; callers wanting concurrency run one client per thread.
#[derive(Debug)]
pub struct OptimizerClient {
    config: OptimizerConfig,
    product_name: String,
    cli: CliTransport,
    rest: RestTransport,
    token: RefCell<Option<String>>,
}

impl OptimizerClient {
    /// Builds a client from `config`. When no product name is configured the
    /// service's tenant lookup supplies one, which requires an email.
    pub fn new(config: OptimizerConfig) -> OptimizerResult<Self> {
        let cli = CliTransport::new(&config);
        let rest = RestTransport::new(&config);

        let product_name = match config.product_name() {
            Some(name) => name.to_string(),
            None => {
                let email = config.email().ok_or_else(|| {
                    OptimizerError::Configuration(
                        "no product name configured and no email available for tenant lookup"
                            .to_string(),
                    )
                })?;
                let response = cli.execute("get-tenant", &args(&[("--email", email)]))?;
                response
                    .string_field("tenant")
                    .map(str::to_string)
                    .ok_or_else(|| {
                        OptimizerError::transport("tenant lookup reply carried no `tenant` field")
                    })?
            }
        };
        debug!(%product_name, "optimizer client ready");

        Ok(Self {
            config,
            product_name,
            cli,
            rest,
            token: RefCell::new(None),
        })
    }

    #[must_use]
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// The workload namespace every command addresses.
    #[must_use]
    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    // --- session lifecycle (REST path) ---

    pub fn authenticate(&self) -> OptimizerResult<ServiceResponse> {
        self.rest.post_json(
            "/api/authenticate",
            json!({
                "productName": self.product_name,
                "productSecret": self.config.product_secret(),
            }),
        )
    }

    /// The cached session token, fetched on first use. Pass `force` to
    /// discard the cache and re-authenticate.
    pub fn auth_token(&self, force: bool) -> OptimizerResult<String> {
        if !force && let Some(token) = self.token.borrow().clone() {
            return Ok(token);
        }

        let response = self.authenticate()?;
        let token = response
            .string_field("token")
            .map(str::to_string)
            .ok_or_else(|| {
                OptimizerError::transport("authenticate reply carried no `token` field")
            })?;
        self.token.borrow_mut().replace(token.clone());
        Ok(token)
    }

    pub fn get_status(&self, token: &str, email: Option<&str>) -> OptimizerResult<ServiceResponse> {
        self.rest.post_json(
            "/api/getStatus",
            json!({
                "email": email.or_else(|| self.config.email()),
                "token": token,
            }),
        )
    }

    pub fn delete_workload(
        &self,
        token: &str,
        email: Option<&str>,
    ) -> OptimizerResult<ServiceResponse> {
        self.rest.post_json(
            "/api/deleteWorkload",
            json!({
                "email": email.or_else(|| self.config.email()),
                "token": token,
            }),
        )
    }

    // --- tenant administration ---

    pub fn get_tenant(&self, email: Option<&str>) -> OptimizerResult<ServiceResponse> {
        let email = email.or_else(|| self.config.email()).ok_or_else(|| {
            OptimizerError::Configuration("no email available for tenant lookup".to_string())
        })?;
        self.cli.execute("get-tenant", &args(&[("--email", email)]))
    }

    pub fn create_tenant(&self, user_group: &str) -> OptimizerResult<ServiceResponse> {
        self.cli
            .execute("create-tenant", &args(&[("--user-group", user_group)]))
    }

    // --- telemetry upload ---

    /// Stages `data` as the service's CSV-plus-manifest payload and runs the
    /// upload command. The staged temp files are removed when this returns,
    /// whether it succeeded or failed.
    pub fn upload(
        &self,
        data: UploadData,
        format: UploadFormat,
        source_platform: &str,
        workload_id: Option<&str>,
    ) -> OptimizerResult<ServiceResponse> {
        let staged = upload::stage(format, data, &self.product_name, source_platform)?;

        let mut cli_args = vec![
            "--cli-input-json".to_string(),
            format!("file://{}", staged.manifest_path().display()),
        ];
        if let Some(workload_id) = workload_id {
            cli_args.push("--workload-id".to_string());
            cli_args.push(workload_id.to_string());
        }

        self.cli.execute("upload", &cli_args)
    }

    pub fn upload_status(&self, workload_id: &str) -> OptimizerResult<ServiceResponse> {
        self.cli.execute(
            "upload-status",
            &self.tenant_args(&[("--workload-id", workload_id)]),
        )
    }

    // --- recommendations ---
    //
    // Identifiers (database names, table names, platform tags) are lowercased
    // before transmission; the service matches them case-insensitively.

    pub fn top_tables(&self, database_name: &str) -> OptimizerResult<ServiceResponse> {
        self.cli.execute(
            "get-top-tables",
            &self.tenant_args(&[("--db-name", &database_name.to_lowercase())]),
        )
    }

    pub fn table_details(
        &self,
        database_name: &str,
        table_name: &str,
    ) -> OptimizerResult<ServiceResponse> {
        self.cli.execute(
            "get-tables-detail",
            &self.tenant_args(&[
                ("--db-name", &database_name.to_lowercase()),
                ("--table-name", &table_name.to_lowercase()),
            ]),
        )
    }

    pub fn query_compatibility(
        &self,
        source_platform: &str,
        target_platform: &str,
        query: &str,
    ) -> OptimizerResult<ServiceResponse> {
        self.cli.execute(
            "get-query-compatible",
            &self.tenant_args(&[
                ("--source-platform", &source_platform.to_lowercase()),
                ("--target-platform", &target_platform.to_lowercase()),
                ("--query", query),
            ]),
        )
    }

    pub fn query_risk(&self, query: &str) -> OptimizerResult<ServiceResponse> {
        self.cli
            .execute("get-query-risk", &self.tenant_args(&[("--query", query)]))
    }

    pub fn similar_queries(
        &self,
        source_platform: &str,
        query: &str,
    ) -> OptimizerResult<ServiceResponse> {
        self.cli.execute(
            "get-similar-queries",
            &self.tenant_args(&[
                ("--source-platform", &source_platform.to_lowercase()),
                ("--query", query),
            ]),
        )
    }

    pub fn top_filters(&self, db_tables: &[String]) -> OptimizerResult<ServiceResponse> {
        self.cli
            .execute("get-top-filters", &self.db_table_args(db_tables))
    }

    pub fn top_aggs(&self, db_tables: &[String]) -> OptimizerResult<ServiceResponse> {
        self.cli
            .execute("get-top-aggs", &self.db_table_args(db_tables))
    }

    pub fn top_columns(&self, db_tables: &[String]) -> OptimizerResult<ServiceResponse> {
        self.cli
            .execute("get-top-columns", &self.db_table_args(db_tables))
    }

    pub fn top_joins(&self, db_tables: &[String]) -> OptimizerResult<ServiceResponse> {
        self.cli
            .execute("get-top-joins", &self.db_table_args(db_tables))
    }

    pub fn top_databases(&self) -> OptimizerResult<ServiceResponse> {
        self.cli
            .execute("get-top-data-bases", &self.tenant_args(&[]))
    }

    fn tenant_args(&self, pairs: &[(&str, &str)]) -> Vec<String> {
        let mut out = vec!["--tenant".to_string(), self.product_name.clone()];
        out.extend(args(pairs));
        out
    }

    /// `--tenant` plus, when tables are given, a `--db-table-list` flag
    /// followed by one lowercased `database.table` token per entry.
    fn db_table_args(&self, db_tables: &[String]) -> Vec<String> {
        let mut out = self.tenant_args(&[]);
        if !db_tables.is_empty() {
            out.push("--db-table-list".to_string());
            out.extend(db_tables.iter().map(|entry| entry.to_lowercase()));
        }
        out
    }
}

fn args(pairs: &[(&str, &str)]) -> Vec<String> {
    let mut out = Vec::with_capacity(pairs.len() * 2);
    for (flag, value) in pairs {
        out.push((*flag).to_string());
        out.push((*value).to_string());
    }
    out
}
