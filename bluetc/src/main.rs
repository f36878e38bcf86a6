use std::io::{self, Write};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use bluetc::{hex, registry, BuilderOptions, MessageBuilder, ParseNumError, QdiscError};

#[derive(Parser, Debug)]
#[command(name = "bluetc")]
#[command(about = "Encode and decode tc qdisc options", version)]
struct Cli {
    /// Upper bound on the encoded message, in bytes
    #[arg(long, default_value_t = bluetc_wire::DEFAULT_MAX_LEN)]
    max_len: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the known qdiscs
    List,
    /// Parse qdisc arguments and print the TCA_OPTIONS attribute as hex
    Encode {
        kind: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Print the options carried by a hex TCA_OPTIONS attribute
    Show {
        kind: String,
        #[arg(value_name = "HEX")]
        data: String,
    },
    /// Print a hex extended statistics payload
    Xstats {
        kind: String,
        #[arg(value_name = "HEX")]
        data: String,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Qdisc(#[from] QdiscError),
    #[error("invalid hex input: {0}")]
    Hex(#[from] ParseNumError),
    #[error("IO error: {0:?}")]
    Io(#[from] io::Error),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let status = execute(cli, &mut io::stdout().lock(), &mut io::stderr().lock());
    ExitCode::from(status)
}

/// Runs `cli` and returns the process exit status. Errors are reported on `err`.
fn execute(cli: Cli, out: &mut dyn Write, err: &mut dyn Write) -> u8 {
    match run(cli, out, err) {
        Ok(()) => 0,
        Err(e) => {
            let _ = writeln!(err, "{e}");
            1
        }
    }
}

/// Every subcommand renders its full output before writing, so a failure leaves `out`
/// untouched.
fn run(cli: Cli, out: &mut dyn Write, err: &mut dyn Write) -> Result<(), CliError> {
    let mut buf = Vec::new();

    match cli.command {
        Command::List => {
            for id in registry().ids() {
                writeln!(buf, "{id}")?;
            }
        }
        Command::Encode { kind, args } => {
            let util = registry().lookup(&kind)?;
            let args: Vec<&str> = args.iter().map(String::as_str).collect();

            let options = BuilderOptions::default().with_max_len(cli.max_len);
            let mut builder = MessageBuilder::new(options);
            if let Err(e) = util.parse_opt(&args, &mut builder) {
                if matches!(e, QdiscError::ParseFailed(_)) {
                    err.write_all(util.usage().as_bytes())?;
                }
                return Err(e.into());
            }

            tracing::debug!(kind = %kind, len = builder.len(), "encoded options");
            writeln!(buf, "{}", hex::encode(builder.as_bytes()))?;
        }
        Command::Show { kind, data } => {
            let util = registry().lookup(&kind)?;
            let opt = hex::decode(&data)?;

            write!(buf, "qdisc {kind} ")?;
            util.print_opt(&mut buf, Some(&opt))?;
            writeln!(buf)?;
        }
        Command::Xstats { kind, data } => {
            let util = registry().lookup(&kind)?;
            let xstats = hex::decode(&data)?;

            util.print_xstats(&mut buf, Some(&xstats))?;
            writeln!(buf)?;
        }
    }

    out.write_all(&buf)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bluetc::blue::QdiscOptions;
    use bluetc::tc::blue::{ExtendedStats, MAX_PROB};
    use clap::CommandFactory;

    /// Runs the CLI on `args` and returns the exit status, stdout and stderr.
    fn bluetc(args: &[&str]) -> (u8, String, String) {
        let cli = Cli::try_parse_from(std::iter::once("bluetc").chain(args.iter().copied()))
            .unwrap();

        let mut out = Vec::new();
        let mut err = Vec::new();
        let status = execute(cli, &mut out, &mut err);
        (status, String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
    }

    fn encoded_hex(opts: QdiscOptions) -> String {
        let mut builder = MessageBuilder::default();
        opts.encode(&mut builder).unwrap();
        hex::encode(builder.as_bytes())
    }

    #[test]
    fn command_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn list() {
        let (status, out, err) = bluetc(&["list"]);
        assert_eq!(status, 0);
        assert_eq!(out, "bfifo\nblue_csc573\npfifo\n");
        assert!(err.is_empty());
    }

    #[test]
    fn encode() {
        let (status, out, err) = bluetc(&["encode", "blue_csc573", "limit", "100000"]);
        assert_eq!(status, 0);
        assert_eq!(out, format!("{}\n", encoded_hex(QdiscOptions::default().with_limit(100_000))));
        assert!(err.is_empty());
    }

    #[test]
    fn encode_parse_failure_prints_usage() {
        let (status, out, err) = bluetc(&["encode", "blue_csc573", "limit", "10", "bogus"]);
        assert_eq!(status, 1);
        assert!(out.is_empty());
        assert!(err.starts_with("Usage: ... blue_csc573"), "{err}");
        assert!(err.ends_with("What is \"bogus\"?\n"), "{err}");
    }

    #[test]
    fn encode_overflow() {
        let (status, out, err) = bluetc(&["--max-len", "8", "encode", "blue_csc573"]);
        assert_eq!(status, 1);
        assert!(out.is_empty());
        assert_eq!(err, "message exceeded bound of 8 bytes (needs 12)\n");
    }

    #[test]
    fn unknown_qdisc() {
        let (status, out, err) = bluetc(&["encode", "sfb"]);
        assert_eq!(status, 1);
        assert!(out.is_empty());
        assert_eq!(err, "unknown qdisc \"sfb\"\n");
    }

    #[test]
    fn show() {
        let data = encoded_hex(QdiscOptions::default().with_limit(1000));
        let (status, out, err) = bluetc(&["show", "blue_csc573", &data]);
        assert_eq!(status, 0);
        assert_eq!(out, "qdisc blue_csc573 limit 1000p \n");
        assert!(err.is_empty());
    }

    #[test]
    fn show_malformed_writes_nothing() {
        // A TCA_OPTIONS attribute whose payload is two stray bytes.
        let (status, out, err) = bluetc(&["show", "blue_csc573", "0600020001020000"]);
        assert_eq!(status, 1);
        assert!(out.is_empty(), "{out}");
        assert_eq!(err, "malformed attribute: missing TCA_FIFO_PARMS\n");

        let (status, out, err) = bluetc(&["show", "blue_csc573", "0c0"]);
        assert_eq!(status, 1);
        assert!(out.is_empty());
        assert!(err.starts_with("invalid hex input"), "{err}");
    }

    #[test]
    fn xstats() {
        let stats = ExtendedStats { queuedrop: 9, avgprob: MAX_PROB, ..Default::default() };
        let data = hex::encode(&stats.to_bytes());

        let (status, out, _) = bluetc(&["xstats", "blue_csc573", &data]);
        assert_eq!(status, 0);
        assert_eq!(out, format!("{stats}\n"));

        let (status, out, err) = bluetc(&["xstats", "blue_csc573", &data[..16]]);
        assert_eq!(status, 1);
        assert!(out.is_empty());
        assert_eq!(err, "malformed attribute: xstats too short\n");
    }
}
