use clap::{ArgAction, Parser, Subcommand, ValueHint};

#[derive(Parser)]
#[command(
    author,
    version,
    about,
    help_template = "{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}",
    arg_required_else_help = true
)]
pub struct Args {
    /// Set output verbosity
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress outputs
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output as json
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Provide custom config file
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<String>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the id → login mapping of users seen before a cutoff date
    #[clap(name = "users")]
    Users {
        /// Cutoff date (YYYY-MM-DD); defaults to `since` from the config
        #[arg(required = false, short, long)]
        since: Option<String>,
    },

    /// Drop and recreate the example schema
    #[clap(name = "init")]
    Init {
        /// Load the sample rows after creating the tables
        #[arg(required = false, long)]
        seed: bool,
    },

    /// Print the CREATE TABLE statements of the example schema
    #[clap(name = "schema")]
    Schema,

    /// Generate default config
    #[clap(name = "defconfig")]
    DefConfig,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_args_debug_assert() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_global_flags() {
        let args = Args::parse_from(["sqlchain", "users", "-vv", "--since", "2011-05-01"]);
        assert_eq!(args.verbose, 2);
        assert!(matches!(
            args.command,
            Commands::Users { since: Some(ref s) } if s == "2011-05-01"
        ));
    }
}
