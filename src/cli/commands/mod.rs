pub mod entries;
pub mod projects;

use crate::cli::api_client::ApiClient;
use crate::cli::args::{Cli, Commands};
use crate::cli::config::CliContext;
use crate::cli::login;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Resolves the per-invocation context and runs the selected command.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let context =
        CliContext::resolve(cli.server_url, cli.config_dir, |name| std::env::var(name).ok())
            .await?;
    let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;

    let connect = || ApiClient::new(http.clone(), &context);

    match cli.command {
        Commands::Login(args) => {
            let mut oauth = context.oauth.clone();
            if let Some(provider) = args.provider {
                oauth.provider = provider;
            }
            login::login(oauth, context.store.clone()).await?;
            eprintln!("Login was successful.");
            Ok(())
        }
        Commands::AddProject(args) => projects::add_project(&mut connect().await?, args).await,
        Commands::GetProject(args) => projects::get_project(&mut connect().await?, args).await,
        Commands::UpdateProject(args) => {
            projects::update_project(&mut connect().await?, args).await
        }
        Commands::ListProjects => projects::list_projects(&mut connect().await?).await,
        Commands::AddEntry(args) => entries::add_entry(&mut connect().await?, args).await,
        Commands::GetEntries(args) => entries::get_entries(&mut connect().await?, args).await,
        Commands::Start(args) => entries::start(&mut connect().await?, args).await,
        Commands::Stop(args) => entries::stop(&mut connect().await?, args).await,
        Commands::UpdateEntry(args) => entries::update_entry(&mut connect().await?, args).await,
    }
}
