use clap::Subcommand;
use osn_core::{Error, ProjectStats, RepoStats, Result};
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

use crate::manager::CurationManager;

#[derive(Subcommand, Clone, Debug)]
pub enum ArticleCommands {
    /// Analyze text, resolve the projects it mentions and save the article
    Analyze {
        /// Text to analyze. Read from --file or stdin when omitted.
        text: Option<String>,
        /// Read the text from a file
        #[arg(long, short)]
        file: Option<PathBuf>,
        /// Print the result without saving it
        #[arg(long)]
        no_save: bool,
    },
    /// List saved articles, newest first
    List {
        /// Only show articles whose title contains this text
        #[arg(long, short)]
        search: Option<String>,
    },
    /// Print a saved article
    Show {
        filename: String,
    },
    /// Look up star/fork counts for one or more project names
    Resolve {
        #[arg(required = true)]
        names: Vec<String>,
    },
}

pub async fn handle_command(command: ArticleCommands, manager: &CurationManager) -> Result<()> {
    match command {
        ArticleCommands::Analyze { text, file, no_save } => {
            let text = read_input(text, file).await?;
            if no_save {
                let analysis = manager.analyze(&text).await;
                if let Some(notice) = &analysis.notice {
                    eprintln!("⚠️ {}", notice);
                }
                let projects = manager.enrich(&analysis.extraction.projects).await;
                print_article(&analysis.extraction.title, &analysis.extraction.body, &projects, &analysis.extraction.companies);
            } else {
                let outcome = manager.process(&text).await?;
                for notice in &outcome.notices {
                    eprintln!("⚠️ {}", notice);
                }
                let article = &outcome.article;
                print_article(&article.title, &article.body, &article.projects, &article.companies);
                if let Some(filename) = outcome.filename {
                    println!("✅ Article saved: {}", filename);
                }
            }
        }
        ArticleCommands::List { search } => {
            let articles = manager.list(search.as_deref()).await?;
            if articles.is_empty() {
                println!("📝 No saved articles yet");
            }
            for article in articles {
                println!(
                    "📅 {}  {}  ({})",
                    article.created_at.format("%Y-%m-%d %H:%M"),
                    article.title,
                    article.filename
                );
            }
        }
        ArticleCommands::Show { filename } => {
            println!("{}", manager.read(&filename).await?);
        }
        ArticleCommands::Resolve { names } => {
            for name in names {
                let stats = manager.resolve(&name).await;
                println!("{}", format_project(&ProjectStats { name, stats }));
            }
        }
    }
    Ok(())
}

async fn read_input(text: Option<String>, file: Option<PathBuf>) -> Result<String> {
    let text = match (text, file) {
        (Some(text), _) => text,
        (None, Some(path)) => tokio::fs::read_to_string(&path).await?,
        (None, None) => {
            let mut buffer = String::new();
            tokio::io::stdin().read_to_string(&mut buffer).await?;
            buffer
        }
    };
    if text.trim().is_empty() {
        return Err(Error::InvalidInput("No text to analyze".to_string()));
    }
    Ok(text)
}

fn format_project(project: &ProjectStats) -> String {
    let marker = match project.stats {
        RepoStats::Found { .. } => "📦",
        RepoStats::NotFound { .. } => "🔍",
        RepoStats::FetchError { .. } => "⚠️",
    };
    format!(
        "{} {} - ⭐ {} | 🔄 {} - {}",
        marker,
        project.name,
        project.stats.stars_label(),
        project.stats.forks_label(),
        project.stats.url()
    )
}

fn print_article(title: &str, body: &str, projects: &[ProjectStats], companies: &[String]) {
    if !title.is_empty() {
        println!("# {}\n", title);
    }
    for project in projects {
        println!("{}", format_project(project));
    }
    if !companies.is_empty() {
        println!("🏢 {}", companies.join(", "));
    }
    if !body.is_empty() {
        println!("\n{}\n", body);
    }
}
