//! Folio CLI — command-line client for the Folio portfolio platform.
//!
//! Set FOLIO_BAAS_URL and FOLIO_BAAS_ANON_KEY. Commands acting on behalf of
//! a user additionally need FOLIO_ACCESS_TOKEN (obtain one with `login`).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use bytes::Bytes;
use clap::{Parser, Subcommand};
use uuid::Uuid;

use folio_baas::BaasClient;
use folio_cli::{content_type_of, init_tracing};
use folio_core::models::FormField;
use folio_records::BaasRecords;
use folio_services::{
    FollowService, ProfileService, ProjectService, PublishPipeline, UploadSession,
};
use folio_storage::BaasStorage;

#[derive(Parser)]
#[command(name = "folio", about = "Folio portfolio platform CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Signup {
        email: String,
        password: String,
    },
    /// Sign in and print the access token to export as FOLIO_ACCESS_TOKEN
    Login {
        email: String,
        password: String,
    },
    /// Publish a project from local image files
    Publish {
        /// Project title (required, must be non-empty)
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// Creator name shown on the detail page
        #[arg(long)]
        creator: Option<String>,
        /// Link to the live project
        #[arg(long)]
        project_link: Option<String>,
        /// Link to the source repository
        #[arg(long)]
        repo_link: Option<String>,
        /// Standalone thumbnail image; overrides the gallery-head default
        #[arg(long)]
        thumbnail: Option<PathBuf>,
        /// Gallery images, in display order
        #[arg(long = "image")]
        gallery: Vec<PathBuf>,
    },
    /// List the latest published projects
    Feed,
    /// Show one project with its images and owner
    Show {
        /// Project UUID
        id: Uuid,
    },
    /// Delete a project and its stored images
    Delete {
        /// Project UUID
        id: Uuid,
    },
    /// Follow or unfollow a user (toggles)
    Follow {
        /// User UUID
        user: Uuid,
    },
    /// Show a profile page; defaults to the signed-in user's own
    Profile {
        /// User UUID
        user: Option<Uuid>,
    },
    /// Upload a new profile cover photo
    Cover {
        /// Path to the image file
        file: PathBuf,
    },
}

fn read_image(path: &Path) -> Result<(String, String, Bytes)> {
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("Not a file path: {}", path.display()))?;
    let data = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let content_type = content_type_of(&filename).to_string();
    Ok((filename, content_type, Bytes::from(data)))
}

struct Services {
    identity: Arc<BaasClient>,
    storage: Arc<BaasStorage>,
    records: Arc<BaasRecords>,
}

impl Services {
    fn from_env() -> Result<Self> {
        let client = BaasClient::from_env()
            .context("Failed to create BaaS client. Set FOLIO_BAAS_URL and FOLIO_BAAS_ANON_KEY")?;
        Ok(Self {
            identity: Arc::new(client.clone()),
            storage: Arc::new(BaasStorage::new(client.clone())),
            records: Arc::new(BaasRecords::new(client)),
        })
    }

    fn projects(&self) -> ProjectService {
        ProjectService::new(
            self.storage.clone(),
            self.records.clone(),
            self.records.clone(),
            self.records.clone(),
        )
    }

    fn profiles(&self) -> ProfileService {
        ProfileService::new(
            self.identity.clone(),
            self.storage.clone(),
            self.records.clone(),
            self.records.clone(),
            self.records.clone(),
            self.records.clone(),
        )
    }
}

fn print_cards(cards: &[folio_services::ProjectCard]) {
    for card in cards {
        println!("{}  {}", card.id, card.title);
        if let Some(description) = &card.description {
            println!("    {}", description);
        }
        if let Some(url) = &card.image_url {
            println!("    {}", url);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Signup { email, password } => {
            let client = BaasClient::from_env()?;
            let session = client.sign_up(&email, &password).await?;
            println!("Signed up as {}", session.user.id);
            println!("export FOLIO_ACCESS_TOKEN={}", session.access_token);
        }
        Commands::Login { email, password } => {
            let client = BaasClient::from_env()?;
            let session = client.sign_in_with_password(&email, &password).await?;
            println!("Signed in as {}", session.user.id);
            println!("export FOLIO_ACCESS_TOKEN={}", session.access_token);
        }
        Commands::Publish {
            title,
            description,
            creator,
            project_link,
            repo_link,
            thumbnail,
            gallery,
        } => {
            let services = Services::from_env()?;
            let pipeline = PublishPipeline::new(
                services.identity.clone(),
                services.storage.clone(),
                services.records.clone(),
            );

            let mut session = UploadSession::new();
            session.edit_field(FormField::Title, title);
            if let Some(value) = description {
                session.edit_field(FormField::Description, value);
            }
            if let Some(value) = creator {
                session.edit_field(FormField::CreatorName, value);
            }
            if let Some(value) = project_link {
                session.edit_field(FormField::ProjectLink, value);
            }
            if let Some(value) = repo_link {
                session.edit_field(FormField::RepoLink, value);
            }

            if !gallery.is_empty() {
                session.begin_gallery_build();
                for path in &gallery {
                    let staged = read_image(path)?;
                    session.add_gallery_files([staged]);
                }
                session.finish_gallery_build();
            }
            if let Some(path) = &thumbnail {
                let (name, content_type, data) = read_image(path)?;
                session.select_thumbnail_file(name, content_type, data);
            }

            let id = session.publish(&pipeline).await?;
            println!("Published project {}", id);
        }
        Commands::Feed => {
            let services = Services::from_env()?;
            let cards = services.projects().feed().await?;
            print_cards(&cards);
        }
        Commands::Show { id } => {
            let services = Services::from_env()?;
            let detail = services.projects().detail(id).await?;
            println!("{}", detail.project.title);
            println!("by {}", detail.owner_name);
            if let Some(description) = &detail.project.description {
                println!("{}", description);
            }
            if let Some(link) = &detail.project.project_link {
                println!("live: {}", link);
            }
            if let Some(link) = &detail.project.repo_link {
                println!("repo: {}", link);
            }
            for url in &detail.image_urls {
                println!("  {}", url);
            }
        }
        Commands::Delete { id } => {
            let services = Services::from_env()?;
            services.projects().delete(id).await?;
            println!("Deleted project {}", id);
        }
        Commands::Follow { user } => {
            let services = Services::from_env()?;
            let follows = FollowService::new(services.identity.clone(), services.records.clone());
            if follows.toggle(user).await? {
                println!("Now following {}", user);
            } else {
                println!("No longer following {}", user);
            }
        }
        Commands::Profile { user } => {
            let services = Services::from_env()?;
            let view = services.profiles().view(user).await?;
            println!("{}  ({})", view.display_name, view.user_id);
            if let Some(bio) = &view.bio {
                println!("{}", bio);
            }
            if view.is_own_profile {
                println!("(your profile)");
            } else if view.is_following {
                println!("(following)");
            } else if view.is_followed_by {
                println!("(follows you)");
            }
            if !view.works.is_empty() {
                println!("works:");
                print_cards(&view.works);
            }
        }
        Commands::Cover { file } => {
            let services = Services::from_env()?;
            let (filename, content_type, data) = read_image(&file)?;
            let reference = services
                .profiles()
                .upload_cover(&filename, &content_type, data)
                .await?;
            println!("Cover updated: {}", reference);
        }
    }

    Ok(())
}
