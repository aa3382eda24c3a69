use std::process::Command;

use anyhow::{Context, Result};

/// Workspace crates, checked one at a time so feature unification across the
/// workspace cannot hide a dependency feature a crate forgot to enable.
const WORKSPACE_CRATES: &[&str] = &[
    "jenkins-trigger-domain",
    "jenkins-trigger-core",
    "jenkins-trigger-infra",
    "jenkins-trigger-cli",
];

/// Check that every crate compiles on its own.
pub fn check_crates_standalone() -> Result<()> {
    println!("Checking {} crates in isolation...", WORKSPACE_CRATES.len());

    for (index, name) in WORKSPACE_CRATES.iter().enumerate() {
        println!("\n[{}/{}] cargo check -p {name} --all-targets", index + 1, WORKSPACE_CRATES.len());

        let status = Command::new("cargo")
            .args(["check", "-p", name, "--all-targets"])
            .status()
            .with_context(|| format!("Failed to run cargo check for '{name}'"))?;

        if !status.success() {
            anyhow::bail!("Crate '{name}' failed to compile on its own");
        }

        println!("✅ {name} compiled successfully");
    }

    println!("\n✅ All {} crates compile on their own!", WORKSPACE_CRATES.len());

    Ok(())
}
