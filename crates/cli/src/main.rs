mod demo;
mod render;

use anyhow::{bail, Context};
use api_client::HttpCollaborator;
use blueprint_core::config::{base_url_from_env_value, request_timeout_from_env_value};
use blueprint_core::monitor::{FlagStatus, Severity};
use blueprint_core::trend::Polarity;
use blueprint_core::vault::MetricMatching;
use blueprint_core::{
    load_photos, BlueprintPage, BlueprintStore, ClientConfig, GalleryPage, Lifetime, LoadOutcome,
    MonitorPage, MonitorStore, SaveOutcome, SectionEditor, SectionKey, VaultStore, ViewFilter,
};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "blueprint")]
#[command(about = "Personal health blueprint CLI")]
struct Cli {
    /// Use built-in demo data instead of the API
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show every blueprint section and overall completion
    Sections,
    /// Set one or more fields of a section and save it
    Edit {
        /// Section key, e.g. identityContext or treatments
        section: SectionKey,
        /// Field assignments as field=value
        #[arg(required = true, value_parser = parse_assignment)]
        fields: Vec<(String, String)>,
    },
    /// Save an empty record for a section
    Clear {
        /// Section key
        section: SectionKey,
    },
    /// List before/after comparisons with metric changes
    Gallery {
        /// Category to show, or "all"
        #[arg(long, default_value = "all")]
        category: String,
        /// Case-insensitive text search
        #[arg(long, default_value = "")]
        search: String,
        /// Pair before/after metrics by name rather than position
        #[arg(long)]
        by_name: bool,
        /// Metric names where a decrease counts as improvement (repeatable)
        #[arg(long = "lower-is-better")]
        lower_is_better: Vec<String>,
    },
    /// Pair two photos as a before/after comparison
    Compare {
        /// Before photo id
        before: String,
        /// After photo id
        after: String,
    },
    /// Delete a comparison
    Uncompare {
        /// Comparison id
        id: String,
    },
    /// List vault photos
    Photos {
        /// Category to show, or "all"
        #[arg(long, default_value = "all")]
        category: String,
        /// Case-insensitive text search
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Show red flags
    Flags {
        /// Only flags with this status (active, dismissed, snoozed)
        #[arg(long, value_parser = parse_status)]
        status: Option<FlagStatus>,
        /// Only flags at or above this severity (low, medium, high, critical)
        #[arg(long, value_parser = parse_severity)]
        min_severity: Option<Severity>,
        /// Category to show, or "all"
        #[arg(long, default_value = "all")]
        category: String,
        /// Dismiss a flag for this view (repeatable)
        #[arg(long)]
        dismiss: Vec<String>,
        /// Snooze a flag for this view (repeatable)
        #[arg(long)]
        snooze: Vec<String>,
    },
}

fn parse_assignment(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((field, value)) if !field.trim().is_empty() => {
            Ok((field.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected field=value, got '{s}'")),
    }
}

fn parse_status(s: &str) -> Result<FlagStatus, String> {
    FlagStatus::parse(s).ok_or_else(|| format!("unknown status '{s}'"))
}

fn parse_severity(s: &str) -> Result<Severity, String> {
    Severity::parse(s).ok_or_else(|| format!("unknown severity '{s}'"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("blueprint_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Use 'blueprint --help' for commands");
        return Ok(());
    };

    let lifetime = Lifetime::new();
    let watcher = lifetime.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, abandoning in-flight requests");
            watcher.close();
        }
    });

    if cli.offline {
        let store = Arc::new(demo::offline_store()?);
        run(store, command, lifetime).await
    } else {
        let base_url = base_url_from_env_value(std::env::var("BLUEPRINT_API_URL").ok())?;
        let timeout =
            request_timeout_from_env_value(std::env::var("BLUEPRINT_REQUEST_TIMEOUT_SECS").ok())?;
        let cfg = ClientConfig::new(base_url, timeout)?;
        tracing::debug!("using API at {}", cfg.base_url());
        let store = Arc::new(HttpCollaborator::new(cfg)?);
        run(store, command, lifetime).await
    }
}

async fn run<C>(store: Arc<C>, command: Commands, lifetime: Lifetime) -> anyhow::Result<()>
where
    C: BlueprintStore + VaultStore + MonitorStore,
{
    match command {
        Commands::Sections => {
            let mut page = BlueprintPage::mount_with(Arc::clone(&store), lifetime);
            page.load_all().await;
            for editor in page.editors() {
                print!("{}", render::section_block(editor.record()));
            }
            println!();
            for list in page.lists() {
                print!("{}", render::list_block(list));
            }
            println!();
            println!("{}", render::completion_line(page.completion()));
        }
        Commands::Edit { section, fields } => {
            let mut editor = load_for_edit(store, section, lifetime).await?;
            for (field, value) in fields {
                editor.update_field(&field, value)?;
            }
            save(&mut editor).await?;
            print!("{}", render::section_block(editor.record()));
        }
        Commands::Clear { section } => {
            let mut editor = load_for_edit(store, section, lifetime).await?;
            for field in editor.schema().fields {
                editor.update_field(field.name, "")?;
            }
            save(&mut editor).await?;
            println!("Cleared {}", editor.schema().title);
        }
        Commands::Gallery {
            category,
            search,
            by_name,
            lower_is_better,
        } => {
            let Some(mut gallery) = lifetime.run(GalleryPage::load(store.as_ref())).await else {
                bail!("interrupted");
            };
            gallery.filter = ViewFilter::new(&category, &search);

            let matching = if by_name {
                MetricMatching::ByName
            } else {
                MetricMatching::Positional
            };
            let polarity_of = |name: &str| {
                if lower_is_better.iter().any(|m| m.eq_ignore_ascii_case(name)) {
                    Polarity::LowerIsBetter
                } else {
                    Polarity::HigherIsBetter
                }
            };

            let visible = gallery.filter.apply(gallery.comparisons());
            if visible.is_empty() {
                println!("No comparisons found.");
            }
            for comparison in visible {
                let metrics = comparison.metric_deltas_by(matching, polarity_of);
                print!("{}", render::comparison_block(comparison, &metrics));
            }
        }
        Commands::Compare { before, after } => {
            let mut gallery = GalleryPage::from_comparisons(Vec::new());
            let created = lifetime
                .run(gallery.create(store.as_ref(), &before, &after))
                .await
                .context("interrupted")?
                .context("failed to create comparison")?;
            print!(
                "{}",
                render::comparison_block(created, &created.metric_deltas())
            );
        }
        Commands::Uncompare { id } => {
            let Some(mut gallery) = lifetime.run(GalleryPage::load(store.as_ref())).await else {
                bail!("interrupted");
            };
            lifetime
                .run(gallery.remove(store.as_ref(), &id))
                .await
                .context("interrupted")?
                .with_context(|| format!("failed to delete comparison {id}"))?;
            println!(
                "Deleted {id}; {} comparison(s) remain",
                gallery.comparisons().len()
            );
        }
        Commands::Photos { category, search } => {
            let filter = ViewFilter::new(&category, &search);
            let Some(photos) = lifetime.run(load_photos(store.as_ref(), &filter)).await else {
                bail!("interrupted");
            };
            if photos.is_empty() {
                println!("No photos found.");
            }
            for photo in &photos {
                println!("{}", render::photo_line(photo));
            }
        }
        Commands::Flags {
            status,
            min_severity,
            category,
            dismiss,
            snooze,
        } => {
            let Some(mut monitor) = lifetime.run(MonitorPage::load(store.as_ref())).await else {
                bail!("interrupted");
            };
            for id in &dismiss {
                if !monitor.board.dismiss(id) {
                    tracing::warn!("no red flag with id {}", id);
                }
            }
            for id in &snooze {
                if !monitor.board.snooze(id) {
                    tracing::warn!("no red flag with id {}", id);
                }
            }
            monitor.filter.view.set_category(&category);
            monitor.filter.status = status;
            monitor.filter.min_severity = min_severity;

            let visible = monitor.visible();
            if visible.is_empty() {
                println!("No red flags found.");
            }
            for flag in visible {
                print!("{}", render::flag_block(flag));
            }
            println!(
                "{} active flag(s) at high severity or above",
                monitor.board.active_at_least(Severity::High)
            );
        }
    }

    Ok(())
}

/// Load a section and enter editing. Refuses to continue if the load failed, since saving
/// would overwrite stored fields with blanks.
async fn load_for_edit<C: BlueprintStore>(
    store: Arc<C>,
    section: SectionKey,
    lifetime: Lifetime,
) -> anyhow::Result<SectionEditor<C>> {
    let mut editor = SectionEditor::new(store, section, lifetime);
    match editor.load().await {
        LoadOutcome::Loaded | LoadOutcome::Empty => {}
        LoadOutcome::Failed => bail!("could not load {section}; not saving over it"),
        LoadOutcome::Cancelled => bail!("interrupted"),
        LoadOutcome::Skipped => bail!("{section} is already being edited"),
    }
    editor.edit();
    Ok(editor)
}

async fn save<C: BlueprintStore>(editor: &mut SectionEditor<C>) -> anyhow::Result<()> {
    match editor.save().await {
        SaveOutcome::Saved => Ok(()),
        SaveOutcome::Retained => bail!(
            "save failed, changes not stored: {}",
            editor.last_error().unwrap_or("unknown error")
        ),
        SaveOutcome::Cancelled => bail!("interrupted before the save completed"),
        SaveOutcome::Skipped => bail!("{} was not in edit mode", editor.key()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blueprint_core::MemoryStore;

    #[test]
    fn assignments_split_on_first_equals() {
        assert_eq!(
            parse_assignment("name=Alex"),
            Ok(("name".to_string(), "Alex".to_string()))
        );
        assert_eq!(
            parse_assignment("notes=a=b"),
            Ok(("notes".to_string(), "a=b".to_string()))
        );
        assert_eq!(
            parse_assignment("bloodType="),
            Ok(("bloodType".to_string(), String::new()))
        );
        assert!(parse_assignment("name").is_err());
        assert!(parse_assignment("=Alex").is_err());
    }

    #[test]
    fn cli_parses_section_aliases() {
        let cli = Cli::try_parse_from(["blueprint", "edit", "identity", "name=Alex"])
            .expect("valid args");
        match cli.command {
            Some(Commands::Edit { section, fields }) => {
                assert_eq!(section, SectionKey::IdentityContext);
                assert_eq!(fields, vec![("name".to_string(), "Alex".to_string())]);
            }
            _ => panic!("expected edit"),
        }

        assert!(Cli::try_parse_from(["blueprint", "edit", "nonsense", "a=b"]).is_err());
    }

    #[tokio::test]
    async fn edit_saves_fields() {
        let store = Arc::new(MemoryStore::new());
        let command = Commands::Edit {
            section: SectionKey::IdentityContext,
            fields: vec![("name".into(), "Alex".into())],
        };
        run(Arc::clone(&store), command, Lifetime::new())
            .await
            .expect("edit succeeds");

        let stored = store
            .stored_section(SectionKey::IdentityContext)
            .expect("section stored");
        assert_eq!(stored["name"], "Alex");
    }

    #[tokio::test]
    async fn edit_reports_retained_draft_on_failure() {
        let store = Arc::new(MemoryStore::new());
        store.fail_next_saves(1);
        let command = Commands::Edit {
            section: SectionKey::Treatments,
            fields: vec![("procedures".into(), "MRI".into())],
        };
        let err = run(Arc::clone(&store), command, Lifetime::new())
            .await
            .expect_err("save fails");
        assert!(err.to_string().contains("save failed"));
        assert!(store.stored_section(SectionKey::Treatments).is_none());
    }

    #[tokio::test]
    async fn edit_refuses_after_failed_load() {
        let store = Arc::new(MemoryStore::new());
        store.set_failing_loads(true);
        let command = Commands::Edit {
            section: SectionKey::IdentityContext,
            fields: vec![("name".into(), "Alex".into())],
        };
        assert!(run(Arc::clone(&store), command, Lifetime::new())
            .await
            .is_err());
        assert_eq!(store.save_attempts(), 0);
    }

    #[tokio::test]
    async fn unknown_field_is_an_error() {
        let store = Arc::new(MemoryStore::new());
        let command = Commands::Edit {
            section: SectionKey::IdentityContext,
            fields: vec![("shoeSize".into(), "9".into())],
        };
        assert!(run(Arc::clone(&store), command, Lifetime::new())
            .await
            .is_err());
        assert_eq!(store.save_attempts(), 0);
    }

    #[tokio::test]
    async fn clear_stores_blank_fields() {
        let store = Arc::new(demo::offline_store().expect("seed"));
        run(
            Arc::clone(&store),
            Commands::Clear {
                section: SectionKey::IdentityContext,
            },
            Lifetime::new(),
        )
        .await
        .expect("clear succeeds");

        let stored = store
            .stored_section(SectionKey::IdentityContext)
            .expect("section stored");
        assert_eq!(stored["name"], "");
        assert_eq!(stored["bloodType"], "");
    }

    #[tokio::test]
    async fn compare_then_uncompare_offline() {
        let store = Arc::new(demo::offline_store().expect("seed"));
        run(
            Arc::clone(&store),
            Commands::Compare {
                before: "p3".into(),
                after: "p1".into(),
            },
            Lifetime::new(),
        )
        .await
        .expect("compare succeeds");
        assert_eq!(store.list_comparisons().await.expect("list").len(), 3);

        run(
            Arc::clone(&store),
            Commands::Uncompare { id: "c1".into() },
            Lifetime::new(),
        )
        .await
        .expect("uncompare succeeds");
        assert_eq!(store.list_comparisons().await.expect("list").len(), 2);

        let missing = run(
            Arc::clone(&store),
            Commands::Uncompare { id: "nope".into() },
            Lifetime::new(),
        )
        .await;
        assert!(missing.is_err());
    }

    #[tokio::test]
    async fn closed_lifetime_interrupts_views() {
        let store = Arc::new(demo::offline_store().expect("seed"));
        let lifetime = Lifetime::new();
        lifetime.close();
        let result = run(
            store,
            Commands::Photos {
                category: "all".into(),
                search: String::new(),
            },
            lifetime,
        )
        .await;
        assert!(result.is_err());
    }
}
