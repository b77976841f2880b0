use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use merkle_inclusion::{
    DuplicatePolicy, MerkleTree, MerkleTreeOptions, Proof, bytes32_to_hex, hex_to_bytes32,
};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const SAMPLE_VALUES: [&str; 8] = [
    "alice", "bob", "charlie", "david", "erin", "fiona", "george", "hannah",
];

#[derive(Parser)]
#[command(name = "merkle-inclusion")]
#[command(about = "Build SHA-256 Merkle trees over strings and check inclusion proofs")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the root digest
    Root(TreeArgs),
    /// Print the inclusion proof for one value
    Prove {
        /// Value to prove
        #[arg(long)]
        value: String,
        /// Emit the proof as JSON
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        tree: TreeArgs,
    },
    /// Check a JSON proof against a root digest
    Verify {
        /// Root digest in hex
        #[arg(long)]
        root: String,
        /// Value the proof is for
        #[arg(long)]
        value: String,
        /// File holding the proof as written by `prove --json`
        #[arg(long)]
        proof: PathBuf,
    },
    /// Draw the tree
    Render(TreeArgs),
}

#[derive(Args)]
struct TreeArgs {
    /// Leaf values in order; defaults to a sample list of eight names
    values: Vec<String>,
    /// Fail instead of letting the last duplicate win the value lookup
    #[arg(long)]
    reject_duplicates: bool,
    /// Hash tree levels in parallel (needs the `rayon` feature)
    #[arg(long)]
    parallel: bool,
}

impl TreeArgs {
    fn build(&self) -> Result<MerkleTree> {
        let values: Vec<&str> = if self.values.is_empty() {
            debug!("no values given, using sample values");
            SAMPLE_VALUES.to_vec()
        } else {
            self.values.iter().map(String::as_str).collect()
        };

        let duplicates = if self.reject_duplicates {
            DuplicatePolicy::Reject
        } else {
            DuplicatePolicy::LastWins
        };
        let options = MerkleTreeOptions::new()
            .with_duplicates(duplicates)
            .with_parallel(self.parallel);

        Ok(MerkleTree::of(&values, options)?)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Root(args) => {
            let tree = args.build()?;
            println!("{}", tree.root_hex());
        }
        Command::Prove { value, json, tree } => {
            let tree = tree.build()?;
            let proof = tree.get_proof(&value)?;
            info!(value = %value, steps = proof.len(), "generated proof");

            if json {
                println!("{}", serde_json::to_string_pretty(&proof)?);
            } else {
                println!("root: {}", tree.root_hex());
                for (i, step) in proof.iter().enumerate() {
                    println!("{i}: {:?} {}", step.position, bytes32_to_hex(&step.sibling));
                }
            }
        }
        Command::Verify { root, value, proof } => {
            let root = hex_to_bytes32(&root).context("invalid root digest")?;
            let raw = std::fs::read_to_string(&proof)
                .with_context(|| format!("reading proof from {}", proof.display()))?;
            let proof: Proof = serde_json::from_str(&raw).context("invalid proof JSON")?;

            if !MerkleTree::verify(&root, &value, &proof) {
                bail!("proof does not verify for {value:?}");
            }
            println!("valid");
        }
        Command::Render(args) => {
            let tree = args.build()?;
            println!("{}", tree.render()?);
        }
    }

    Ok(())
}
