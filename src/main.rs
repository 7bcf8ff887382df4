//! # discpak
//!
//! ```bash
//! # Build ./manifest.toml into ./game.gcm
//! discpak build apploader.img runtime.dol
//!
//! # Build another project into a chosen image
//! discpak build apploader.img runtime.dol ../ore-hunter -o ore-hunter.gcm
//!
//! # Inspect the results
//! discpak inspect-pak overworld.PAK
//! discpak list-fst ore-hunter.gcm
//! ```
//!
//! Log verbosity follows `RUST_LOG` and defaults to `info`.

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use discpak::{
    compose::{build, BuildOptions},
    container::PakReader,
    fst::FstNode,
    gcm::read_fst,
};

#[derive(Parser, Debug)]
#[command(name = "discpak")]
#[command(about = "Packs glTF levels into PAK containers and a bootable GCM image")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pack every level of a project and assemble the disc image
    Build {
        /// Retail-compatible apploader image
        bootloader: PathBuf,
        /// Runtime executable (DOL)
        runtime: PathBuf,
        /// Project root holding manifest.toml and assets/
        #[arg(default_value = ".")]
        project: PathBuf,
        /// Output image, defaults to <PROJECT>/game.gcm
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the assets and tables of a packed level
    InspectPak { path: PathBuf },
    /// Print the file tree of a disc image
    ListFst { path: PathBuf },
}

fn main() -> Result<()> {
    let env = env_logger::Env::default().default_filter_or("info");
    if let Err(e) = env_logger::Builder::from_env(env).try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    };

    match Args::parse().command {
        Command::Build {
            bootloader,
            runtime,
            project,
            output,
        } => {
            build(&BuildOptions {
                bootloader,
                runtime,
                project,
                output,
            })?;
        }
        Command::InspectPak { path } => {
            let bytes = fs::read(&path)
                .with_context(|| format!("failed to read \"{}\"", path.display()))?;
            inspect_pak(&bytes)?;
        }
        Command::ListFst { path } => {
            let bytes = fs::read(&path)
                .with_context(|| format!("failed to read \"{}\"", path.display()))?;
            print_fst(&read_fst(&bytes)?, 0);
        }
    }
    Ok(())
}

fn inspect_pak(bytes: &[u8]) -> Result<()> {
    let pak = PakReader::new(bytes)?;
    for entry in pak.directory()? {
        let model = pak.model(&entry)?;
        println!("{} @ {:#x}", pak.name(entry.name).unwrap_or("?"), entry.offset);
        println!("  accessors  {:>5}", model.accessor_table_count);
        println!("  materials  {:>5}", model.material_table_count);
        println!("  primitives {:>5}", model.primitive_table_count);
        println!("  meshes     {:>5}", model.mesh_table_count);
        println!("  nodes      {:>5}", model.node_table_count);
        println!("  scenes     {:>5}", model.scene_table_count);
        println!("  indices    {:>5}", model.index_table_count);
    }
    Ok(())
}

fn print_fst(node: &FstNode, depth: usize) {
    let indent = "  ".repeat(depth);
    match node {
        FstNode::File {
            name,
            offset,
            length,
        } => println!("{indent}{name} ({length} bytes @ {offset:#x})"),
        FstNode::Directory { name, children } => {
            println!("{indent}{name}/");
            for child in children {
                print_fst(child, depth + 1);
            }
        }
    }
}
