use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "tubemirror",
    version,
    about = "Keep local mirrors of YouTube playlists up to date"
)]
pub struct Cli {
    /// Configuration file
    #[arg(short = 'c', long, env = "TUBEMIRROR_CONFIG", default_value = "config.toml")]
    pub config: PathBuf,

    /// Only sync the named playlist(s)
    #[arg(long = "only", value_name = "NAME")]
    pub only: Vec<String>,

    /// Print the downloader invocations as JSON instead of running them
    #[arg(long)]
    pub dry_run: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["tubemirror"]).unwrap();
        assert!(!cli.dry_run);
        assert!(cli.only.is_empty());
    }

    #[test]
    fn test_repeated_only() {
        let cli = Cli::try_parse_from([
            "tubemirror",
            "--config",
            "/etc/tubemirror.toml",
            "--only",
            "Lectures",
            "--only",
            "Mixes",
            "--dry-run",
        ])
        .unwrap();

        assert_eq!(cli.config, PathBuf::from("/etc/tubemirror.toml"));
        assert_eq!(cli.only, vec!["Lectures", "Mixes"]);
        assert!(cli.dry_run);
    }

    #[test]
    fn test_rejects_unknown_flag() {
        assert!(Cli::try_parse_from(["tubemirror", "--quiet"]).is_err());
    }
}
