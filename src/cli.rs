use clap::{Parser, Subcommand};

/// Top-level CLI entry point for the personal environment manager.
#[derive(Parser, Debug)]
#[command(
    name = "myenv",
    about = "Personal environment manager: selector-driven profiles reconciled into $HOME",
    version = crate::commands::version::version()
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Override the profile directory (default: $MYENV_DIR or ~/.myenv)
    #[arg(long, global = true)]
    pub dir: Option<std::path::PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new profile and open it in $EDITOR
    Create(ProfileNameOpts),
    /// Open a profile in $EDITOR, creating it if missing
    Edit(ProfileNameOpts),
    /// Link and copy files of all active profiles into $HOME
    Install,
    /// Print the shell startup script (use with eval "$(myenv profile)")
    Profile,
    /// List profiles and whether they are active
    List,
    /// Run git inside the profile directory
    Git(GitOpts),
    /// Print version information
    Version,
}

impl Command {
    /// Name used for the log file of this command.
    #[must_use]
    pub const fn log_name(&self) -> &'static str {
        match self {
            Self::Create(_) => "create",
            Self::Edit(_) => "edit",
            Self::Install => "install",
            Self::Profile => "profile",
            Self::List => "list",
            Self::Git(_) => "git",
            Self::Version => "version",
        }
    }
}

/// Options for the `create` and `edit` subcommands.
#[derive(Parser, Debug, Clone)]
pub struct ProfileNameOpts {
    /// Profile name (a directory inside the profile directory)
    pub name: String,
}

/// Options for the `git` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct GitOpts {
    /// Arguments passed to git unchanged
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_install_dry_run() {
        let cli = Cli::parse_from(["myenv", "--dry-run", "install"]);
        assert!(cli.global.dry_run);
        assert!(matches!(cli.command, Command::Install));
    }

    #[test]
    fn parse_install_dry_run_short_after_subcommand() {
        let cli = Cli::parse_from(["myenv", "install", "-d"]);
        assert!(cli.global.dry_run);
    }

    #[test]
    fn parse_create_name() {
        let cli = Cli::parse_from(["myenv", "create", "work"]);
        assert!(
            matches!(&cli.command, Command::Create(opts) if opts.name == "work"),
            "Expected Create command"
        );
    }

    #[test]
    fn parse_edit_requires_name() {
        assert!(Cli::try_parse_from(["myenv", "edit"]).is_err());
    }

    #[test]
    fn parse_git_passes_hyphenated_args_through() {
        let cli = Cli::parse_from(["myenv", "git", "log", "--oneline", "-n", "3"]);
        assert!(
            matches!(&cli.command, Command::Git(_)),
            "Expected Git command"
        );
        if let Command::Git(opts) = cli.command {
            assert_eq!(opts.args, vec!["log", "--oneline", "-n", "3"]);
        }
    }

    #[test]
    fn parse_dir_override() {
        let cli = Cli::parse_from(["myenv", "--dir", "/tmp/profiles", "list"]);
        assert_eq!(
            cli.global.dir,
            Some(std::path::PathBuf::from("/tmp/profiles"))
        );
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::parse_from(["myenv", "-v", "profile"]);
        assert!(cli.verbose);
        assert_eq!(cli.command.log_name(), "profile");
    }

    #[test]
    fn parse_version() {
        let cli = Cli::parse_from(["myenv", "version"]);
        assert!(matches!(cli.command, Command::Version));
    }
}
