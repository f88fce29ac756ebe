//! IPFS storage CLI
//!
//! Pins a local file through the pinning service and retrieves it back by CID.
//! Credentials come from `PINATA_API_KEY` / `PINATA_SECRET_API_KEY` or from
//! a JSON config file.

use bytesize::ByteSize;
use clap::{Arg, ArgMatches, Command};
use ipfs_storage::{
    sha256_hex, Cid, FileBlob, PinataClient, RetrieveOptions, StorageClient, StorageConfig,
    WorkflowController, WorkflowState,
};
use std::path::PathBuf;
use std::str::FromStr;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = Command::new("ipfs-storage")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Pin files to IPFS and retrieve them by CID")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Verbose output")
                .action(clap::ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("JSON configuration file (credentials fall back to the environment)")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true),
        )
        .subcommand(
            Command::new("upload")
                .about("Pin a file and print its gateway link")
                .arg(
                    Arg::new("file")
                        .help("File to upload")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("retrieve")
                .about("Fetch pinned content by CID")
                .arg(Arg::new("cid").help("Content identifier").required(true))
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("Where to write the content (defaults to the CID)")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("roundtrip")
                .about("Upload a file, retrieve it back and verify its digest")
                .arg(
                    Arg::new("file")
                        .help("File to upload")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("Where to write the retrieved copy")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
        .get_matches();

    let verbose = matches.get_flag("verbose");
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if verbose { "debug" } else { "warn" }),
    )
    .init();

    let config = load_config(&matches)?;

    match matches.subcommand() {
        Some(("upload", sub_matches)) => {
            let path = required_path(sub_matches, "file")?;
            let controller = WorkflowController::from_config(config)?;

            controller.select_file(FileBlob::from_path(&path).await?);
            controller.upload().await;
            render(&controller);
            exit_on_error(&controller.state());
        }
        Some(("retrieve", sub_matches)) => {
            let cid = sub_matches
                .get_one::<String>("cid")
                .ok_or("A CID is required")?;
            let cid = Cid::from_str(cid)?;
            let output = sub_matches
                .get_one::<PathBuf>("output")
                .cloned()
                .unwrap_or_else(|| PathBuf::from(cid.as_str()));

            let client = PinataClient::new(config)?;
            let options = if verbose {
                RetrieveOptions::new().on_progress(|progress| {
                    eprintln!(
                        "Download progress: {} ({}%)",
                        ByteSize(progress.bytes_downloaded as u64),
                        (progress.percentage * 100.0) as u32
                    );
                })
            } else {
                RetrieveOptions::new()
            };

            let response = client.retrieve_with(&cid, options).await?;
            tokio::fs::write(&output, &response.bytes).await?;
            println!(
                "Retrieved {} ({}, {}) to {}",
                cid,
                ByteSize(response.size() as u64),
                response.content_type.as_deref().unwrap_or("unknown type"),
                output.display()
            );
        }
        Some(("roundtrip", sub_matches)) => {
            let path = required_path(sub_matches, "file")?;
            let controller = WorkflowController::from_config(config)?;
            let file = FileBlob::from_path(&path).await?;
            let expected = file.sha256();
            let output = sub_matches
                .get_one::<PathBuf>("output")
                .cloned()
                .unwrap_or_else(|| PathBuf::from(format!("{}.retrieved", file.name())));

            let mut updates = controller.subscribe();
            let progress = tokio::spawn(async move {
                while updates.changed().await.is_ok() {
                    if updates.borrow_and_update().is_loading {
                        println!("Processing...");
                    }
                }
            });

            controller.select_file(file);
            controller.upload().await;
            render(&controller);
            exit_on_error(&controller.state());

            controller.retrieve().await;
            render(&controller);
            exit_on_error(&controller.state());

            let written = controller.save_artifact(&output).await?;
            let state = controller.state();
            let actual = state
                .retrieved
                .as_ref()
                .map(|artifact| artifact.sha256.clone())
                .unwrap_or_else(|| sha256_hex(&[]));

            drop(controller);
            progress.abort();

            println!(
                "Saved {} to {}",
                ByteSize(written as u64),
                output.display()
            );
            if actual != expected {
                eprintln!("Digest mismatch: uploaded {} retrieved {}", expected, actual);
                std::process::exit(1);
            }
            println!("Digest verified: {}", actual);
        }
        _ => {
            eprintln!("No subcommand provided. Use --help for usage information.");
            std::process::exit(1);
        }
    }

    Ok(())
}

fn load_config(matches: &ArgMatches) -> ipfs_storage::Result<StorageConfig> {
    match matches.get_one::<PathBuf>("config") {
        Some(path) => {
            let config = StorageConfig::from_file(path)?;
            config.validate()?;
            Ok(config)
        }
        None => StorageConfig::from_env(),
    }
}

fn required_path(matches: &ArgMatches, name: &str) -> Result<PathBuf, String> {
    matches
        .get_one::<PathBuf>(name)
        .cloned()
        .ok_or_else(|| format!("Missing argument: {}", name))
}

fn render<C: StorageClient>(controller: &WorkflowController<C>) {
    let state = controller.state();

    if let Some(file) = &state.selected_file {
        println!("Selected: {} ({})", file.name(), ByteSize(file.size() as u64));
    }
    if let Some(link) = controller.upload_link() {
        println!("IPFS Link: {}", link);
    }
    if let (Some(label), Some(artifact)) = (state.download_label(), &state.retrieved) {
        println!(
            "Retrieved File: {} ({}, {})",
            label,
            ByteSize(artifact.size as u64),
            artifact.content_type.as_deref().unwrap_or("unknown type")
        );
    }
    if state.has_error() {
        eprintln!("Error: {}", state.error_message);
    }
}

fn exit_on_error(state: &WorkflowState) {
    if state.has_error() {
        std::process::exit(1);
    }
}
