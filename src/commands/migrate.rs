use anyhow::{Context, Result};
use std::path::PathBuf;

use ont2wb::config::Config;
use ont2wb::error::{Error, Ont2WbError};
use ont2wb::graph::turtle::load_source;
use ont2wb::migrate::Migrator;
use ont2wb::wikibase::{DryRunSession, EntityClient, LoginMethod, WikibaseSession};

/// Command-line overrides of the `migrate` command
#[derive(Debug, Default)]
pub struct MigrateParams {
    pub input: Option<String>,
    pub api_url: Option<String>,
    pub link_file: Option<PathBuf>,
    pub base_uri: Option<String>,
    pub dry_run: bool,
    pub debug_claims: bool,
    pub bot: bool,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl MigrateParams {
    fn apply(&self, config: &mut Config) {
        if let Some(api_url) = &self.api_url {
            config.wikibase.api_url = api_url.clone();
        }
        if let Some(link_file) = &self.link_file {
            config.migration.link_file = link_file.clone();
        }
        if let Some(base_uri) = &self.base_uri {
            config.migration.base_uri = Some(base_uri.clone());
        }
        if self.bot {
            config.wikibase.login_method = LoginMethod::Bot;
        }
        config.migration.dry_run |= self.dry_run;
        config.migration.debug_claims |= self.debug_claims;
    }
}

pub async fn migrate(mut config: Config, params: MigrateParams) -> Result<()> {
    params.apply(&mut config);
    config.validate().context("Invalid configuration")?;

    let source = super::ontology_source(&config, params.input.as_deref());
    let graph = load_source(&source, config.request_timeout())
        .await
        .map_err(|e| super::failure(e, format!("Failed to load ontology from {source}")))?;

    let mut client: Box<dyn EntityClient> = if config.migration.dry_run {
        tracing::info!("Dry run, no changes are made to the wiki");
        Box::new(DryRunSession::default())
    } else {
        let user = params
            .user
            .as_deref()
            .context("No wiki user given (set USER or pass --user)")?;
        let password = params
            .password
            .as_deref()
            .context("No wiki password given (set PASSWD or pass --password)")?;

        let mut session = WikibaseSession::new(config.session_config())
            .map_err(|e| super::failure(e, "Failed to set up the wiki session".to_string()))?;
        session
            .authenticate(config.wikibase.login_method, user, password)
            .await
            .map_err(|e| super::failure(e, "Failed to log into the wiki".to_string()))?;
        Box::new(session)
    };

    let mut migrator = Migrator::new(&graph, &config.migration, client.as_mut());
    let report = match migrator.run().await {
        Ok(report) => report,
        Err(err) => {
            let err = Error::from(err);
            tracing::error!(
                category = %err.category(),
                report = %migrator.report(),
                error = %err,
                "Migration aborted"
            );
            return Err(err.into());
        }
    };

    println!("Migration of {source} finished");
    println!("  Wiki: {}", config.wikibase.api_url);
    println!("  Link store: {}", config.migration.link_file.display());
    println!("  {report}");

    Ok(())
}
