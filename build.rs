//! Build script for the Testaustime CLI.
//!
//! Copies the `.env.example` template next to where the client looks for its
//! `.env` file, so users find a ready-to-edit example after installation:
//! - Linux: `~/.local/share/testaustime-cli/.env.example`
//! - macOS: `~/Library/Application Support/testaustime-cli/.env.example`
//! - Windows: `%LOCALAPPDATA%/testaustime-cli/.env.example`
//!
//! A missing template only produces a cargo warning.

use std::{env, fs, path::PathBuf};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let env_example_path = manifest_dir.join(".env.example");

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("testaustime-cli");

    if env_example_path.is_file() {
        fs::create_dir_all(&out_dir)?;
        let contents = fs::read_to_string(&env_example_path)?;
        fs::write(out_dir.join(".env.example"), contents)?;
    } else {
        println!(
            "cargo:warning=.env.example not found at {}",
            env_example_path.display()
        );
    }

    Ok(())
}
