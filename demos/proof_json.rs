//! Proof transport example.
//!
//! Serializes an inclusion proof to JSON and verifies it on the other side
//! with nothing but the hex root and the value.
//!
//! Run: `cargo run --example proof_json`

use merkle_inclusion::{MerkleTree, Proof, hex_to_bytes32};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

fn main() -> Result<()> {
    let tree = MerkleTree::build(&["north", "east", "south", "west", "up"])?;

    // Sender side: publish the root and hand out a proof.
    let root_hex = tree.root_hex();
    let json = serde_json::to_string_pretty(&tree.get_proof("south")?)?;

    println!("Root: {root_hex}");
    println!("Proof JSON:\n{json}\n");

    // Receiver side: no tree, only the published root.
    let root = hex_to_bytes32(&root_hex)?;
    let proof: Proof = serde_json::from_str(&json)?;

    println!("south: {}", MerkleTree::verify(&root, "south", &proof));
    println!("north: {}", MerkleTree::verify(&root, "north", &proof));

    Ok(())
}
