//! Coursesync CLI - syncs course structures from the course platform.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use coursesync::config::Config;
use coursesync::console::Console;
use coursesync::sync::{CourseRef, SyncOutcome};
use coursesync::{PlatformClient, Translator};

/// Course structure synchronizer.
#[derive(Parser, Debug)]
#[command(name = "coursesync")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sync one course's structure document.
    Sync {
        /// Site course identifier (mapped name).
        course_id: String,

        /// Product code on the course platform.
        original_course_id: String,

        /// Human-readable course name.
        course_name: String,

        /// Version label to sync.
        version: String,

        /// Platform version identifier.
        version_id: String,
    },

    /// List whitelisted courses with their active versions.
    Courses,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let console = Console::new();

    let config = Config::load().context("Failed to load configuration")?;

    if !config.api.is_configured() {
        let config_path = Config::config_path()?;
        console.warning(&format!(
            "Session token not configured. Please edit: {}",
            config_path.display()
        ));
        console.info("Set your platform session token in the config file and run again.");
        std::process::exit(1);
    }

    match args.command {
        Command::Sync {
            course_id,
            original_course_id,
            course_name,
            version,
            version_id,
        } => {
            config.validate(true).context("Invalid configuration")?;

            let api = PlatformClient::new(
                &config.api.base_url,
                &config.api.effective_session_token(),
            )?;
            let translator = Translator::new(
                config.translation_api.clone(),
                config.prompts.title_translation.clone(),
            );

            let course = CourseRef {
                course_id,
                original_course_id,
                course_name,
                version,
                version_id,
            };

            console.section(&format!("Syncing {}", course.course_id));

            let outcome = coursesync::sync::sync_course(
                &course,
                &config.sync.structures_dir,
                &config.api.image_base_url,
                &api,
                &translator,
                &console,
            )
            .await
            .with_context(|| format!("Sync failed for {}", course.course_id))?;

            match outcome {
                SyncOutcome::Skipped { version } => {
                    console.info(&format!("Version {} already synced, nothing to do", version));
                }
                SyncOutcome::Written {
                    path,
                    section_count,
                } => {
                    console.success(&format!(
                        "Wrote {} top-level sections to {}",
                        section_count,
                        path.display()
                    ));
                }
            }
        }

        Command::Courses => {
            config.validate(false).context("Invalid configuration")?;

            let api = PlatformClient::new(
                &config.api.base_url,
                &config.api.effective_session_token(),
            )?;

            let listings = coursesync::sync::list_courses(&api, &console).await?;
            if listings.is_empty() {
                anyhow::bail!("No whitelisted courses found");
            }

            for listing in listings {
                println!(
                    "{}:{}:{}",
                    listing.course_id, listing.version, listing.version_id
                );
            }
        }
    }

    Ok(())
}
