use clap::{Parser, Subcommand};
use newsdesk_core::config::resolve_data_dir;
use newsdesk_core::content::{image_count, parse_content, ContentSegment};
use newsdesk_core::models::format_millis;
use newsdesk_core::repositories::articles::ArticleRepository;
use newsdesk_core::repositories::users::UserRepository;
use newsdesk_core::{DocumentStore, FileDocumentStore, NewsError, Slug};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "newsdesk")]
#[command(about = "Newsdesk site administration CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the latest articles
    List {
        /// Maximum number of articles to show
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Show an article with its body split into segments
    Show {
        /// Article slug
        slug: String,
    },
    /// Split a local body file into segments
    Render {
        /// Path to a text file containing an article body
        file: String,
    },
    /// Check whether a slug is valid and free
    CheckSlug {
        /// Requested slug (lower-cased before checking)
        slug: String,
    },
    /// List registered users
    Users,
    /// Give a user admin rights
    GrantAdmin {
        /// User id
        uid: String,
    },
    /// Take admin rights away from a user
    RevokeAdmin {
        /// User id
        uid: String,
    },
}

fn print_segments(segments: &[ContentSegment]) {
    if segments.is_empty() {
        println!("(empty body)");
    }
    for (i, segment) in segments.iter().enumerate() {
        match segment {
            ContentSegment::Text { text } => println!("{:>3} Text  {:?}", i, text),
            ContentSegment::Image { url } => println!("{:>3} Image {}", i, url),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let open_store = || -> Result<Arc<dyn DocumentStore>, Box<dyn std::error::Error>> {
        let data_dir = resolve_data_dir(std::env::var("NEWSDESK_DATA_DIR").ok())?;
        Ok(Arc::new(FileDocumentStore::new(data_dir)))
    };

    match cli.command {
        Some(Commands::List { limit }) => {
            let articles = ArticleRepository::new(open_store()?).latest(limit);
            match articles {
                Ok(articles) if articles.is_empty() => println!("No articles found."),
                Ok(articles) => {
                    for article in articles {
                        println!(
                            "{}  {}  {} ({} images)",
                            format_millis(article.timestamp),
                            article.slug,
                            article.title,
                            image_count(&article.full_desc)
                        );
                    }
                }
                Err(e) => eprintln!("Error listing articles: {}", e),
            }
        }
        Some(Commands::Show { slug }) => {
            let repo = ArticleRepository::new(open_store()?);
            match Slug::parse(&slug).map_err(NewsError::from).and_then(|s| repo.require(&s)) {
                Ok(article) => {
                    println!("Title:     {}", article.title);
                    println!("Published: {}", format_millis(article.timestamp));
                    println!("Summary:   {}", article.short_desc);
                    if !article.image_url.is_empty() {
                        println!("Cover:     {}", article.image_url);
                    }
                    println!();
                    print_segments(&parse_content(&article.full_desc));
                }
                Err(e) => eprintln!("Error showing article: {}", e),
            }
        }
        Some(Commands::Render { file }) => match std::fs::read_to_string(&file) {
            Ok(body) => print_segments(&parse_content(&body)),
            Err(e) => eprintln!("Error reading {}: {}", file, e),
        },
        Some(Commands::CheckSlug { slug }) => match Slug::parse(&slug.trim().to_lowercase()) {
            Ok(slug) => match ArticleRepository::new(open_store()?).get(&slug) {
                Ok(Some(_)) => println!("Slug '{}' is already taken", slug),
                Ok(None) => println!("Slug '{}' is available", slug),
                Err(e) => eprintln!("Error checking slug: {}", e),
            },
            Err(e) => eprintln!("Invalid slug: {}", e),
        },
        Some(Commands::Users) => match UserRepository::new(open_store()?).list() {
            Ok(users) if users.is_empty() => println!("No users found."),
            Ok(users) => {
                for user in users {
                    let role = if user.is_admin { "admin" } else { "reader" };
                    println!("{}  {}  {}", user.uid, user.email, role);
                }
            }
            Err(e) => eprintln!("Error listing users: {}", e),
        },
        Some(Commands::GrantAdmin { uid }) => {
            match UserRepository::new(open_store()?).set_admin(&uid, true) {
                Ok(profile) => println!("Granted admin to {} ({})", profile.uid, profile.email),
                Err(e) => eprintln!("Error granting admin: {}", e),
            }
        }
        Some(Commands::RevokeAdmin { uid }) => {
            match UserRepository::new(open_store()?).set_admin(&uid, false) {
                Ok(profile) => println!("Revoked admin from {} ({})", profile.uid, profile.email),
                Err(e) => eprintln!("Error revoking admin: {}", e),
            }
        }
        None => {
            println!("Use 'newsdesk --help' for commands");
        }
    }

    Ok(())
}
