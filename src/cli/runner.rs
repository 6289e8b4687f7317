//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, ListArgs, OutputFormat};
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpPageSource};
use crate::operation::{load_catalog, CatalogDefinition};
use crate::pagination::PagedFetcher;
use crate::projection::Projection;
use crate::types::{QueryParams, StringMap};
use futures::StreamExt;
use serde_json::{json, Value};
use std::io::{self, Write};
use std::pin::pin;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
    cancel: CancellationToken,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self {
            cli,
            cancel: CancellationToken::new(),
        }
    }

    /// Token that stops a running `list` when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run the CLI command against stdout and stderr
    pub async fn run(&self) -> Result<()> {
        self.run_with(&mut io::stdout(), &mut io::stderr()).await
    }

    /// Run the CLI command
    ///
    /// Items go to `out`; the resume token goes to `err` so that piping
    /// `out` elsewhere keeps it visible.
    pub async fn run_with<W: Write, E: Write>(&self, out: &mut W, err: &mut E) -> Result<()> {
        match &self.cli.command {
            Commands::List(args) => self.list(args, out, err).await,
            Commands::Operations => self.operations(out),
            Commands::Validate => self.validate(out),
        }
    }

    /// Load the operation catalog
    fn load_catalog(&self) -> Result<CatalogDefinition> {
        let path = self
            .cli
            .catalog
            .as_ref()
            .ok_or_else(|| Error::config("Catalog file not specified (use -c flag)"))?;
        load_catalog(path)
    }

    /// Run a listing operation
    async fn list<W: Write, E: Write>(
        &self,
        args: &ListArgs,
        out: &mut W,
        err: &mut E,
    ) -> Result<()> {
        let catalog = self.load_catalog()?;
        let op = catalog.find(&args.operation)?;
        let projection: Projection = args.select.as_deref().unwrap_or("*").parse()?;

        let mut options = op.fetch_options().with_manual_paging(args.manual);
        if let Some(count) = args.max_items {
            options = options.with_target_count(count);
        }
        if let Some(token) = &args.starting_token {
            options = options.with_starting_cursor(token);
        }

        let client = Arc::new(HttpClient::with_config(catalog.client_config())?);
        let source = HttpPageSource::new(client, op.endpoint());
        let fetcher: PagedFetcher<_, QueryParams, Value> =
            PagedFetcher::new(source, options)?.with_cancellation(self.cancel.clone());

        let overrides: StringMap = args.params.iter().cloned().collect();
        let params = op.merged_params(&overrides);

        let mut resume = args.starting_token.clone();
        let mut retrieved = 0usize;
        let mut pages = pin!(fetcher.pages(params));

        while let Some(page) = pages.next().await {
            let page = page?;
            retrieved += page.len();
            resume = page.next_cursor;
            for item in page.items {
                self.write_item(out, &projection.apply(item))?;
            }
            out.flush()?;
        }

        info!("{} returned {retrieved} items", op.name);

        if let Some(token) = resume {
            writeln!(err, "NextToken: {token}")?;
        }

        Ok(())
    }

    /// List catalog operations
    fn operations<W: Write>(&self, out: &mut W) -> Result<()> {
        let catalog = self.load_catalog()?;

        for op in &catalog.operations {
            match self.cli.format {
                OutputFormat::Json => {
                    let entry = json!({
                        "name": op.name,
                        "description": op.description,
                        "method": op.method.as_str(),
                        "path": op.path,
                        "server_page_cap": op.server_page_cap,
                        "continue_rule": op.continue_rule,
                    });
                    writeln!(out, "{}", serde_json::to_string(&entry)?)?;
                }
                OutputFormat::Pretty => {
                    let description = op.description.as_deref().unwrap_or("");
                    writeln!(out, "{:<32} {description}", op.name)?;
                }
            }
        }

        Ok(())
    }

    /// Validate the catalog
    fn validate<W: Write>(&self, out: &mut W) -> Result<()> {
        let catalog = self.load_catalog()?;

        writeln!(
            out,
            "Catalog '{}' v{} is valid with {} operations",
            catalog.name,
            catalog.version,
            catalog.operations.len()
        )?;

        Ok(())
    }

    /// Output one item
    fn write_item<W: Write>(&self, out: &mut W, item: &Value) -> Result<()> {
        match (self.cli.format, item) {
            (OutputFormat::Json, _) => writeln!(out, "{}", serde_json::to_string(item)?)?,
            (OutputFormat::Pretty, Value::String(s)) => writeln!(out, "{s}")?,
            (OutputFormat::Pretty, _) => {
                writeln!(out, "{}", serde_json::to_string_pretty(item)?)?;
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for Runner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner")
            .field("command", &self.cli.command)
            .finish_non_exhaustive()
    }
}
