use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;

use artifact_lifecycle::persistence::traits::NameSanitizer;
use artifact_lifecycle::persistence::{
    actions_for, available_actions, classify_reference, ActionSet, ArtifactSafeNames, Locality,
    PersistenceAction, PersistenceState,
};
use artifact_lifecycle::{init_telemetry, LifecycleConfig};

#[derive(Parser)]
#[command(name = "artifact-lifecycle")]
#[command(about = "Inspect the persistence lifecycle of artifact references")]
#[command(long_about = "Classifies artifact references into lifecycle states and shows which \
                       save, rename and delete actions each state offers.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a reference and list the actions it offers
    Classify {
        /// Artifact reference; omit for an unsaved object
        #[arg(long)]
        uri: Option<String>,
        /// The reference was branched from a remote artifact
        #[arg(long)]
        has_remote: bool,
        /// Treat the session as cloud hosted regardless of configuration
        #[arg(long)]
        cloud: bool,
        /// Treat the caller as signed in
        #[arg(long)]
        authenticated: bool,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the action table for every state
    Table {
        /// Apply the authentication gate for a signed-out caller
        #[arg(long)]
        unauthenticated: bool,
    },
    /// Print the backend-safe form of an artifact name
    Sanitize {
        /// Raw user supplied name
        name: String,
    },
}

#[derive(Serialize)]
struct Classification {
    state: PersistenceState,
    label: &'static str,
    actions: ActionSet,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _ = LifecycleConfig::load_env_file();
    let config = LifecycleConfig::load()?;
    init_telemetry(&config.observability)?;

    match cli.command {
        Commands::Classify {
            uri,
            has_remote,
            cloud,
            authenticated,
            json,
        } => {
            let locality = if cloud {
                Locality::Cloud
            } else {
                config.session.locality()
            };
            let state = classify_reference(uri.as_deref(), has_remote, locality)?;
            let classification = Classification {
                state,
                label: state.label(),
                actions: available_actions(state, authenticated),
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&classification)?);
            } else {
                print_classification(&classification);
            }
        }
        Commands::Table { unauthenticated } => {
            for state in PersistenceState::ALL {
                let actions = if unauthenticated {
                    available_actions(state, false)
                } else {
                    actions_for(state)
                };
                println!(
                    "{:<32} {:<12} {:<14} {}",
                    state.as_str(),
                    slot_name(actions.store),
                    slot_name(actions.rename),
                    slot_name(actions.delete),
                );
            }
        }
        Commands::Sanitize { name } => {
            println!("{}", ArtifactSafeNames.to_safe_name(&name));
        }
    }

    Ok(())
}

fn print_classification(classification: &Classification) {
    println!("state: {} ({})", classification.state, classification.label);
    if classification.actions.is_empty() {
        println!("actions: none");
        return;
    }
    println!("actions:");
    for action in classification.actions.iter() {
        println!("  {:<14} {}", action.as_str(), action.label());
    }
}

fn slot_name<A: Into<PersistenceAction>>(action: Option<A>) -> &'static str {
    action
        .map(|a| Into::<PersistenceAction>::into(a).as_str())
        .unwrap_or("-")
}
