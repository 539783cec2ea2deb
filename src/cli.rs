use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Binds a crawled novel into one EPUB per volume, then converts them with kindlegen
    Novel {
        /// Crawled novel directory, containing one directory per volume
        input: PathBuf,
        /// Only write the EPUBs, don't run kindlegen
        #[clap(long)]
        no_convert: bool,
    },
    /// Binds a directory of crawled manga pages with kcc
    Manga {
        /// Crawled manga directory
        input: PathBuf,
    },
    /// Converts every EPUB in a directory with kindlegen
    Convert {
        /// Directory holding the EPUBs
        dir: PathBuf,
    },
    /// Generates a binder.toml config file with the default settings
    Config,
}

#[derive(Parser, Debug)]
#[clap(author, version, about)]
pub struct Cli {
    /// Configuration file to use instead of ./binder.toml
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log every step, including external program output
    #[clap(short, long, global = true)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Commands,
}

#[cfg(test)]
mod test {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn can_parse_novel_command() {
        let cli = Cli::try_parse_from(["novel-binder", "novel", "crawl/novel_x", "--no-convert"])
            .expect("can parse novel command");
        match cli.command {
            Commands::Novel { input, no_convert } => {
                assert_eq!(input, PathBuf::from("crawl/novel_x"));
                assert!(no_convert);
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(cli.config.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::try_parse_from([
            "novel-binder",
            "manga",
            "crawl/one_piece",
            "--config",
            "other.toml",
            "-v",
        ])
        .expect("can parse manga command");
        assert!(matches!(cli.command, Commands::Manga { .. }));
        assert_eq!(cli.config, Some(PathBuf::from("other.toml")));
        assert!(cli.verbose);
    }

    #[test]
    fn input_is_required() {
        assert!(Cli::try_parse_from(["novel-binder", "novel"]).is_err());
    }
}
