//! Command-line interface for fanrun.
//!
//! Parses arguments using clap and provides the [`Cli`] struct containing
//! all user-specified options.

use clap::Parser;

/// Command-line arguments for fanrun.
///
/// # Examples
///
/// ```bash
/// # Run uptime on three hosts, 2 at a time
/// fanrun --hosts web1,web2,web3 -n 2 uptime
///
/// # Pipe a host list in and interleave output as it arrives
/// cat hosts.txt | fanrun -i tail -1 /var/log/syslog
///
/// # Resolve a round-robin DNS name into the host list
/// fanrun -d workers.example.com uptime
/// ```
#[derive(Parser, Debug)]
#[command(name = "fanrun")]
#[command(version)]
#[command(about = "Run a shell command on many hosts at once over ssh")]
#[command(long_about = "Fanrun runs one command on every host in a list, in parallel.\n\n\
    Hosts come from --hosts, from DNS resolution of a name (-d), or one per\n\
    line on piped stdin. Output is grouped per host by default, or\n\
    interleaved line by line with -i.")]
pub struct Cli {
    /// The command to run on every host, joined with spaces.
    #[arg(value_name = "COMMAND", trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,

    /// Verbose output (logs the dispatch plan and per-host events).
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Prefix for the command echo on every block or line.
    #[arg(short = 'p', long, value_name = "PREFIX")]
    pub prefix: Option<String>,

    /// Comma-separated list of hosts (bypasses stdin).
    #[arg(long, value_name = "HOST,HOST")]
    pub hosts: Option<String>,

    /// DNS name that resolves to the host list (round-robin records).
    #[arg(short = 'd', long = "dns", value_name = "NAME")]
    pub dns: Option<String>,

    /// Hosts to run in parallel (worker pool).
    #[arg(short = 'n', long = "parallel", value_name = "COUNT")]
    pub parallel: Option<usize>,

    /// Run hosts in sequential groups of COUNT instead of a worker pool.
    ///
    /// Each group runs fully concurrent; the next group starts only after
    /// the previous one has finished.
    #[arg(short = 'm', long = "group", value_name = "COUNT")]
    pub group: Option<usize>,

    /// Interleave output lines as they become available.
    #[arg(short = 'i', long)]
    pub interleave: bool,

    /// Suppress the [host] tag on interleaved lines.
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

impl Cli {
    /// The command string sent to every host.
    pub fn command_string(&self) -> String {
        self.command.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_command_words_join() {
        let cli = Cli::parse_from(["fanrun", "--hosts", "a,b", "echo", "hi"]);
        assert_eq!(cli.command_string(), "echo hi");
        assert_eq!(cli.hosts.as_deref(), Some("a,b"));
    }

    #[test]
    fn test_mode_flags() {
        let cli = Cli::parse_from(["fanrun", "-i", "-q", "-n", "4", "true"]);
        assert!(cli.interleave);
        assert!(cli.quiet);
        assert_eq!(cli.parallel, Some(4));
        assert!(cli.group.is_none());
    }

    #[test]
    fn test_group_flag_selects_batch_variant() {
        let cli = Cli::parse_from(["fanrun", "-m", "8", "true"]);
        assert_eq!(cli.group, Some(8));
    }

    #[test]
    fn test_no_command_is_allowed_by_the_parser() {
        // An empty command prints usage at run time rather than failing
        // argument parsing.
        let cli = Cli::parse_from(["fanrun"]);
        assert!(cli.command.is_empty());
    }
}
