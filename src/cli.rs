use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "memdev")]
#[command(about = "List memory modules and current memory usage")]
pub struct Cli {
    /// Configuration file (default: ~/.config/memdev/config.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Memory counter file to read instead of /proc/meminfo
    #[arg(long, global = true)]
    pub meminfo: Option<PathBuf>,

    /// SMBIOS table to scan instead of /sys/firmware/dmi/tables/DMI
    #[arg(long, global = true)]
    pub dmi_table: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Memory modules and usage counters in one report
    Inventory {
        /// Output format (json, yaml, or pretty)
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },
    /// Summary of a single memory module
    Module {
        /// Module index, starting at 0
        #[arg(short, long)]
        index: usize,

        /// Output format (json, yaml, or pretty)
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },
    /// Full attribute records of every memory module
    Records {
        /// Output format (json or yaml)
        #[arg(short, long, default_value = "json")]
        format: String,
    },
    /// Current memory usage counters (kB)
    Usage {
        /// Output format (json, yaml, or pretty)
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },
    /// Raw hardware tree produced by the SMBIOS scan
    Tree {
        /// Output format (json or yaml)
        #[arg(short, long, default_value = "json")]
        format: String,
    },
}
