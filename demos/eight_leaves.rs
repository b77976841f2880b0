//! Eight-leaf walk-through.
//!
//! Builds a tree over eight names, proves one of them and shows that the
//! proof stops verifying once its steps are reordered.
//!
//! Run: `cargo run --example eight_leaves`

use merkle_inclusion::{MerkleTree, build, bytes32_to_hex, prove, verify};

fn main() -> merkle_inclusion::Result<()> {
    let values = [
        "alice", "bob", "charlie", "david", "erin", "fiona", "george", "hannah",
    ];

    let tree = build(&values)?;

    println!("Root: {}", tree.root_hex());
    println!("Leaves: {}, height: {}\n", tree.len(), tree.height());

    println!("Tree structure:");
    println!("{}\n", tree.render()?);

    let proof = prove(&tree, "david")?;
    println!("Proof for david:");
    for step in &proof {
        println!("  {:?} {}", step.position, bytes32_to_hex(&step.sibling));
    }
    println!("  Valid: {}\n", verify(tree.root(), "david", &proof));

    let mut reordered = proof.clone();
    reordered.steps.reverse();
    println!(
        "Reordered proof valid: {}",
        MerkleTree::verify(tree.root(), "david", &reordered)
    );

    match prove(&tree, "nonexistent") {
        Ok(_) => println!("unexpected proof for a missing value"),
        Err(e) => println!("Missing value: {e}"),
    }

    Ok(())
}
