use clap::{Parser, Subcommand, ValueEnum};
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;

use amaterus_ingest::app::fetch_use_case::FetchUseCase;
use amaterus_ingest::app::submit_use_case::SubmitUseCase;
use amaterus_ingest::config::AppConfig;
use amaterus_ingest::domain::{AssociationSelection, NormalizedArtifact, PlatformKind, TweetImage};
use amaterus_ingest::infra::graphql_client::HasuraGraphql;
use amaterus_ingest::infra::http_client::ReqwestHttp;
use amaterus_ingest::logging;
use amaterus_ingest::pipeline::catalog::Catalogger;

#[derive(Parser)]
#[command(name = "amaterus_ingest")]
#[command(about = "Registers program broadcast artifacts from YouTube/Niconico/Twitter")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PlatformArg {
    YoutubeLive,
    YoutubeVideo,
    NiconicoVideo,
    TwitterPost,
}

impl From<PlatformArg> for PlatformKind {
    fn from(arg: PlatformArg) -> Self {
        match arg {
            PlatformArg::YoutubeLive => PlatformKind::YouTubeLive,
            PlatformArg::YoutubeVideo => PlatformKind::YouTubeVideo,
            PlatformArg::NiconicoVideo => PlatformKind::NiconicoVideo,
            PlatformArg::TwitterPost => PlatformKind::TwitterPost,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve an URL/ID, fetch platform metadata, and print the normalized
    /// artifact for review. Never writes to the datastore.
    Fetch {
        #[arg(long, value_enum)]
        platform: PlatformArg,
        /// Platform URL or bare ID
        input: String,
    },
    /// Fetch and upsert an artifact against the datastore (idempotent:
    /// resubmitting the same remote artifact merges instead of duplicating).
    Submit {
        #[arg(long, value_enum)]
        platform: PlatformArg,
        /// Platform URL or bare ID
        input: String,
        #[arg(long)]
        program_id: Uuid,
        #[arg(long)]
        person_id: Uuid,
        /// Required for Niconico videos
        #[arg(long)]
        project_id: Option<Uuid>,
        /// Pre-selected twitter account; resolved by screen name when omitted
        #[arg(long)]
        twitter_account_id: Option<Uuid>,
        /// Mark a YouTube video as a premiere
        #[arg(long)]
        premiere: bool,
        /// Zero-based tweet image index (requires --image-url)
        #[arg(long, requires = "image_url")]
        image_index: Option<i32>,
        #[arg(long, requires = "image_index")]
        image_url: Option<String>,
    },
    /// Print the project/person/twitter-account dropdown seed data
    InitialData,
    /// Print a project's programs, newest start time first
    Programs {
        #[arg(long)]
        project_id: Uuid,
    },
}

#[tokio::main]
async fn main() {
    logging::init_logging();
    let cli = Cli::parse();
    let config = AppConfig::load();

    if let Err(e) = run(cli, config).await {
        error!("command failed: {e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: AppConfig) -> amaterus_ingest::Result<()> {
    match cli.command {
        Commands::Fetch { platform, input } => {
            let fetch = FetchUseCase::new(Arc::new(ReqwestHttp::new()), config.youtube_api_key);
            let artifact = fetch.run(platform.into(), &input).await?;
            println!("{}", serde_json::to_string_pretty(&artifact)?);
        }
        Commands::Submit {
            platform,
            input,
            program_id,
            person_id,
            project_id,
            twitter_account_id,
            premiere,
            image_index,
            image_url,
        } => {
            let fetch =
                FetchUseCase::new(Arc::new(ReqwestHttp::new()), config.youtube_api_key.clone());
            let mut artifact = fetch.run(platform.into(), &input).await?;
            if let NormalizedArtifact::YouTubeVideo(video) = &mut artifact {
                video.is_premiere = premiere;
            }

            let selection = AssociationSelection {
                project_id,
                program_id: Some(program_id),
                person_id: Some(person_id),
                twitter_account_id,
                tweet_image: match (image_index, image_url) {
                    (Some(index), Some(url)) => Some(TweetImage { index, url }),
                    _ => None,
                },
            };

            let submit = SubmitUseCase::new(hasura(&config)?);
            let result = submit.run(&artifact, &selection).await?;
            println!("{}", result.database_id);
        }
        Commands::InitialData => {
            let catalog = Catalogger::new(hasura(&config)?);
            let initial = catalog.fetch_initial_data().await?;
            for project in &initial.projects {
                println!("project\t{}\t{}", project.id, project.name);
            }
            for person in &initial.persons {
                println!("person\t{}\t{}", person.id, person.name);
            }
            for account in &initial.twitter_accounts {
                println!(
                    "twitter_account\t{}\t{} (@{})",
                    account.id, account.name, account.twitter_screen_name
                );
            }
        }
        Commands::Programs { project_id } => {
            let catalog = Catalogger::new(hasura(&config)?);
            for program in catalog.fetch_programs_by_project(project_id).await? {
                println!("{}\t{}", program.id, program.title);
            }
        }
    }
    Ok(())
}

fn hasura(config: &AppConfig) -> amaterus_ingest::Result<Arc<HasuraGraphql>> {
    Ok(Arc::new(HasuraGraphql::new(
        config.hasura_endpoint()?.to_string(),
        config.hasura_admin_secret.clone(),
    )))
}
