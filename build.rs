//! Build script for the Track Lister.
//!
//! Copies `.env.example` from the crate root into the user's local data
//! directory (`tracklister/.env.example`) so a configuration template sits
//! next to the `.env` the server loads at startup:
//! - Linux: `~/.local/share/tracklister/.env.example`
//! - macOS: `~/Library/Application Support/tracklister/.env.example`
//! - Windows: `%LOCALAPPDATA%/tracklister/.env.example`
//!
//! A missing template only produces a cargo warning; directory or copy
//! failures fail the build.

use std::{env, fs, path::PathBuf};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let env_example_path = manifest_dir.join(".env.example");

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("tracklister");
    fs::create_dir_all(&out_dir)?;

    if env_example_path.is_file() {
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
