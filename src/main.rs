use anyhow::Context;
use clap::Parser;
use homedir::my_home;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

mod analysis;
mod app;
mod bookmarks;
mod cli;
mod config;
mod eid;
mod scrape;
mod storage;
#[cfg(test)]
mod tests;

use app::{AddOpts, AppError, AppLocal};
use bookmarks::Bookmark;
use config::Config;

pub fn parse_tags(tags: String) -> Vec<String> {
    tags.split(',')
        .flat_map(|value| value.split(' ').filter(|value| !value.is_empty()))
        .map(|s| s.to_lowercase())
        .collect::<Vec<_>>()
}

fn base_path() -> anyhow::Result<String> {
    if let Ok(base_path) = std::env::var("SHELF_BASE_PATH") {
        return Ok(base_path);
    }

    let home = my_home()
        .context("could not determine home directory")?
        .context("home directory path is empty")?;
    Ok(format!("{}/.local/share/linkshelf", home.to_string_lossy()))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = cli::Args::parse();

    let base_path = base_path()?;
    let config = Config::load_with(&base_path)?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async move {
            let app = AppLocal::new(config, &base_path)?;
            run(app, args.command).await
        })
}

async fn run(app: AppLocal, command: cli::Command) -> anyhow::Result<()> {
    match command {
        cli::Command::Analyze { url } => print_json(&app.analyze_url(&url).await),

        cli::Command::Check { url, owner } => print_json(&app.check_duplicate(&owner, &url)?),

        cli::Command::Add {
            url,
            name,
            owner,
            description,
            category,
            color,
            tags,
            favorite,
            force,
            no_wait,
        } => {
            let bmark_create = bookmarks::BookmarkCreate {
                owner_id: owner,
                name,
                url,
                description,
                category,
                color_tag: color,
                tags: tags.map(parse_tags),
                is_favorite: Some(favorite),
            };

            let (bmark, job) = match app.create(bmark_create, AddOpts { force }) {
                Ok(created) => created,
                Err(AppError::Duplicate { matched_id, similarity }) => {
                    let matched = matched_id.map(|id| id.to_string()).unwrap_or_default();
                    anyhow::bail!(
                        "looks like a duplicate of bookmark {matched} (similarity {similarity:.3}), use --force to add anyway"
                    );
                }
                Err(err) => return Err(err.into()),
            };

            // the runtime goes away with the process, so the job is always awaited
            if no_wait {
                print_json(&bmark.view())?;
                job.wait().await;
                return Ok(());
            }

            job.wait().await;
            print_json(&app.find_by_id(bmark.id)?.view())
        }

        cli::Command::Update {
            id,
            url,
            name,
            description,
            tags,
        } => {
            let bmark_update = bookmarks::BookmarkUpdate {
                url,
                name,
                description,
                tags: tags.map(parse_tags),
                ..Default::default()
            };

            if bmark_update.url.is_none()
                && bmark_update.name.is_none()
                && bmark_update.description.is_none()
                && bmark_update.tags.is_none()
            {
                println!("This update request does nothing");
                return Ok(());
            }

            let (bmark, job) = app.update(id, bmark_update)?;
            match job {
                Some(job) => {
                    job.wait().await;
                    print_json(&app.find_by_id(id)?.view())
                }
                None => print_json(&bmark.view()),
            }
        }

        cli::Command::Reanalyze { id } => {
            app.reanalyze(id)?.wait().await;
            print_json(&app.find_by_id(id)?.view())
        }

        cli::Command::Show { id } => print_json(&app.find_by_id(id)?.view()),

        cli::Command::List { owner } => {
            let bmarks = app.list(&owner)?;
            print_json(&bmarks.iter().map(Bookmark::view).collect::<Vec<_>>())
        }

        cli::Command::Favorite { id } => print_json(&app.toggle_favorite(id)?.view()),
    }
}
