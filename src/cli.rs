use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::Category;

#[derive(Parser, Debug)]
#[command(author, version, about = "dream-badminton backend")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Start the backend server
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Detect the format of pasted BWF ranking text without storing anything
    Detect {
        /// File containing the tab-separated ranking rows
        file: PathBuf,
    },
    /// Import pasted BWF ranking text into the database
    Import {
        /// File containing the tab-separated ranking rows
        file: PathBuf,
        /// Ranking category (MS, WS, MD, WD, XD)
        #[arg(short, long)]
        category: Category,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_import_with_category() {
        let cli = Cli::try_parse_from(["dream_badminton", "import", "rows.tsv", "-c", "XD"]).unwrap();

        assert_eq!(
            cli.command,
            Command::Import {
                file: PathBuf::from("rows.tsv"),
                category: Category::XD,
            }
        );
    }

    #[test]
    fn rejects_unknown_category() {
        let result = Cli::try_parse_from(["dream_badminton", "import", "rows.tsv", "--category", "ZZ"]);
        assert!(result.is_err());
    }

    #[test]
    fn serve_defaults_to_port_3000() {
        let cli = Cli::try_parse_from(["dream_badminton", "serve"]).unwrap();
        assert_eq!(cli.command, Command::Serve { port: 3000 });
    }
}
