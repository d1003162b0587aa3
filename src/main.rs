mod operation;
mod store;
mod user;

use std::env;
use std::ffi::OsString;
use std::io::{self, Write};

use clap::Parser;
use operation::Arguments;

/// Manage user records kept as a JSON array in a file
#[derive(Debug, Parser)]
#[clap(author, version, about, args_override_self = true)]
struct Args {
    /// One of add, list, findById, remove
    #[clap(long)]
    operation: Option<String>,

    /// User id for findById and remove
    #[clap(long, allow_hyphen_values = true)]
    id: Option<String>,

    /// JSON encoded user for add
    #[clap(long, allow_hyphen_values = true)]
    item: Option<String>,

    /// Record file, created if absent
    #[clap(long = "fileName", allow_hyphen_values = true)]
    file_name: Option<String>,
}

impl From<Args> for Arguments {
    fn from(args: Args) -> Self {
        Self {
            operation: args.operation.unwrap_or_default(),
            id: args.id.unwrap_or_default(),
            item: args.item.unwrap_or_default(),
            file_name: args.file_name.unwrap_or_default(),
        }
    }
}

const LONG_FLAGS: [&str; 6] = ["operation", "id", "item", "fileName", "help", "version"];

/// Accept `-flag` as well as `--flag` for the long flags
fn normalize_flags<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut normalized = Vec::new();
    let mut passthrough = false;

    for arg in args {
        if passthrough {
            normalized.push(arg);
            continue;
        }

        let rewritten = match arg.to_str() {
            Some("--") => {
                passthrough = true;
                None
            }
            Some(s) if s.starts_with('-') && !s.starts_with("--") => {
                let name = s[1..].split('=').next().unwrap_or_default();
                LONG_FLAGS.contains(&name).then(|| OsString::from(format!("-{s}")))
            }
            _ => None,
        };

        normalized.push(rewritten.unwrap_or(arg));
    }

    normalized
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse_from(normalize_flags(env::args_os()));

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    operation::perform(&args.into(), &mut handle)?;
    handle.flush()?;

    Ok(())
}
