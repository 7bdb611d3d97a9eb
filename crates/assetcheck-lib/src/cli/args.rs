use clap::{ArgAction, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber;

#[derive(Debug, Clone)]
pub enum Command {
    Check {
        config_path: Option<String>,
        manifest_path: Option<String>,
        max_retries: Option<usize>,
        fetch_parallelism: Option<usize>,
    },
    VerifyFile {
        file_path: String,
        digest: String,
        length: Option<u64>,
    },
    CheckZip {
        file_path: String,
        members: Vec<String>,
    },
}

pub struct Args {
    pub command: Command,
    pub log_level: Level,
}

#[derive(Debug, Parser)]
#[command(
    name = "assetcheck",
    version,
    about = "Verify that downloaded binary assets match their expected digests, sizes and archive manifests"
)]
struct Cli {
    #[arg(
        short = 'v',
        long = "verbose",
        help = "Sets the level of verbosity",
        action = ArgAction::Count,
        global = true
    )]
    verbose: u8,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Fetch every asset in a manifest and verify digests, sizes and archive members
    Check {
        #[arg(
            short = 'c',
            long = "config",
            value_name = "FILE",
            help = "Optional config file providing manifest path and fetch defaults"
        )]
        config: Option<String>,

        #[arg(
            short = 'm',
            long = "manifest",
            value_name = "FILE",
            help = "Sets the asset manifest path"
        )]
        manifest: Option<String>,

        #[arg(
            long = "max-retries",
            value_name = "N",
            help = "Maximum retry attempts for failed HTTP fetches"
        )]
        max_retries: Option<usize>,

        #[arg(
            long = "fetch-parallelism",
            value_name = "N",
            help = "Maximum number of simultaneous fetches"
        )]
        fetch_parallelism: Option<usize>,
    },

    /// Verify a local file against an expected digest and optional length
    #[command(name = "verify-file")]
    VerifyFile {
        #[arg(value_name = "FILE", help = "File to verify")]
        file: String,

        #[arg(
            short = 'd',
            long = "digest",
            value_name = "ALGO:HEX",
            help = "Expected digest, e.g. SHA1:da39a3ee5e6b4b0d3255bfef95601890afd80709"
        )]
        digest: String,

        #[arg(
            short = 'l',
            long = "length",
            value_name = "BYTES",
            help = "Expected file length in bytes"
        )]
        length: Option<u64>,
    },

    /// Validate a local ZIP archive's structure and optional member list
    #[command(name = "check-zip")]
    CheckZip {
        #[arg(value_name = "FILE", help = "ZIP archive to validate")]
        file: String,

        #[arg(
            long = "member",
            value_name = "NAME",
            help = "Filename that must be present in the archive (repeatable)",
            action = ArgAction::Append
        )]
        members: Vec<String>,
    },
}

pub fn parse_args() -> Args {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(log_level.into())
                .from_env_lossy()
                .add_directive("hyper_util=warn".parse().unwrap()),
        )
        .init();

    let command = match cli.command {
        CliCommand::Check {
            config,
            manifest,
            max_retries,
            fetch_parallelism,
        } => Command::Check {
            config_path: config,
            manifest_path: manifest,
            max_retries,
            fetch_parallelism,
        },
        CliCommand::VerifyFile {
            file,
            digest,
            length,
        } => Command::VerifyFile {
            file_path: file,
            digest,
            length,
        },
        CliCommand::CheckZip { file, members } => Command::CheckZip {
            file_path: file,
            members,
        },
    };

    Args { command, log_level }
}
