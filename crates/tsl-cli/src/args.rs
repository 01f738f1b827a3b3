use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the tsl binary.
#[derive(Parser, Debug)]
#[command(
    name = "tsl",
    version,
    about = "Type-aware lint rules over host-dumped TypeScript programs"
)]
pub struct CliArgs {
    /// Program dumps (`*.json`) or directories to search for them.
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Lint configuration file. Without one, every rule runs at error severity.
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Output format for diagnostics.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, ignore_case = true)]
    pub format: OutputFormat,

    /// Enable color in text output. Defaults to whether stdout is a terminal.
    #[arg(long)]
    pub pretty: Option<bool>,

    /// Worker threads used to lint files in parallel (0 lets rayon decide).
    #[arg(long, default_value_t = 0)]
    pub threads: usize,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// `file(line,col): error rule-id: message`
    #[default]
    Text,
    /// One JSON document with every file's diagnostics.
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let args = CliArgs::try_parse_from([
            "tsl",
            "--config",
            "lint.json",
            "--format",
            "JSON",
            "--pretty",
            "false",
            "--threads",
            "4",
            "dumps/",
            "extra.json",
        ])
        .unwrap();
        assert_eq!(
            args.inputs,
            vec![PathBuf::from("dumps/"), PathBuf::from("extra.json")]
        );
        assert_eq!(args.config, Some(PathBuf::from("lint.json")));
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.pretty, Some(false));
        assert_eq!(args.threads, 4);
    }

    #[test]
    fn defaults() {
        let args = CliArgs::try_parse_from(["tsl", "a.json"]).unwrap();
        assert_eq!(args.format, OutputFormat::Text);
        assert_eq!(args.pretty, None);
        assert_eq!(args.config, None);
        assert_eq!(args.threads, 0);
    }

    #[test]
    fn inputs_are_required() {
        assert!(CliArgs::try_parse_from(["tsl"]).is_err());
    }
}
