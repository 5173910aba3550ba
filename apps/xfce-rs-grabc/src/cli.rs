use std::ffi::OsString;

use clap::Parser;
use tracing::warn;
use xfce_rs_colorpick::OutputFormat;

const KNOWN_FLAGS: &[char] = &['h', 'd', '#', 'n', 'v'];

/// Command line, getopt style: single-letter flags that may be clustered,
/// the last of each pair winning.
#[derive(Parser, Debug, Default, PartialEq)]
#[command(
    name = "grabc",
    disable_help_flag = true,
    disable_version_flag = true,
    args_override_self = true
)]
pub struct Args {
    /// Print the color as hex (default)
    #[arg(short = 'h', overrides_with = "decimal")]
    pub hex: bool,

    /// Print the color as decimal r,g,b
    #[arg(short = 'd', overrides_with = "hex")]
    pub decimal: bool,

    /// Prefix hex output with '#'
    #[arg(short = '#', overrides_with = "no_prefix")]
    pub prefix: bool,

    /// No prefix (default)
    #[arg(short = 'n', overrides_with = "prefix")]
    pub no_prefix: bool,

    /// Print the version and exit
    #[arg(short = 'v')]
    pub version: bool,
}

impl Args {
    /// Format chosen on the command line, if any.
    pub fn format(&self) -> Option<OutputFormat> {
        if self.decimal {
            Some(OutputFormat::Decimal)
        } else if self.hex {
            Some(OutputFormat::Hex)
        } else {
            None
        }
    }

    pub fn prefix(&self) -> Option<bool> {
        if self.prefix {
            Some(true)
        } else if self.no_prefix {
            Some(false)
        } else {
            None
        }
    }
}

/// Drop everything the parser does not know, warning about unknown flags.
///
/// Positional arguments are ignored and option parsing stops at `--`.
pub fn sanitize<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args = args.into_iter().map(Into::into);
    let mut kept: Vec<OsString> = args.next().into_iter().collect();

    for arg in args {
        let arg = arg.to_string_lossy().into_owned();
        if arg == "--" {
            break;
        }
        if arg.starts_with("--") {
            warn!("invalid flag: {}", arg);
            continue;
        }
        let Some(flags) = arg.strip_prefix('-').filter(|f| !f.is_empty()) else {
            continue;
        };

        let mut cluster = String::from("-");
        for c in flags.chars() {
            if KNOWN_FLAGS.contains(&c) {
                cluster.push(c);
            } else {
                warn!("invalid flag: {}", c);
            }
        }
        if cluster.len() > 1 {
            kept.push(cluster.into());
        }
    }
    kept
}

pub fn parse<I, T>(args: I) -> Args
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    Args::try_parse_from(sanitize(args)).unwrap_or_else(|e| {
        warn!("Ignoring command line: {}", e);
        Args::default()
    })
}
