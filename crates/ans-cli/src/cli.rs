use std::path::PathBuf;

use ans_config::ConverterConfig;
use clap::Parser;

/// Top-level CLI parser for the `html2ans` binary.
#[derive(Debug, Parser)]
#[command(name = "html2ans", version, about = "Convert HTML into ANS content elements")]
pub struct Cli {
    /// HTML file to convert (reads stdin when omitted)
    pub file: Option<PathBuf>,

    /// Element whose children are converted
    #[arg(long)]
    pub start_tag: Option<String>,

    /// ANS version stamped on versioned elements
    #[arg(long)]
    pub ans_version: Option<String>,

    /// Skip failing parsers instead of aborting
    #[arg(long)]
    pub suppress_exceptions: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Overlay command-line flags on loaded configuration.
    pub fn apply(&self, config: &mut ConverterConfig) {
        if let Some(start_tag) = &self.start_tag {
            config.start_tag.clone_from(start_tag);
        }
        if let Some(version) = &self.ans_version {
            config.ans_version.clone_from(version);
        }
        if self.suppress_exceptions {
            config.suppress_exceptions = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn clap_command_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from([
            "html2ans",
            "story.html",
            "--start-tag",
            "article",
            "--ans-version",
            "0.10.7",
            "--suppress-exceptions",
        ])
        .expect("cli should parse");

        let mut config = ConverterConfig::default();
        cli.apply(&mut config);
        assert_eq!(cli.file, Some(PathBuf::from("story.html")));
        assert_eq!(config.start_tag, "article");
        assert_eq!(config.ans_version, "0.10.7");
        assert!(config.suppress_exceptions);
    }

    #[test]
    fn absent_flags_keep_config() {
        let cli = Cli::try_parse_from(["html2ans"]).expect("cli should parse");
        let mut config = ConverterConfig {
            suppress_exceptions: true,
            ..ConverterConfig::default()
        };
        cli.apply(&mut config);
        assert_eq!(cli.file, None);
        assert_eq!(config.start_tag, "body");
        assert!(config.suppress_exceptions);
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        assert!(Cli::try_parse_from(["html2ans", "-q", "-v"]).is_err());
    }
}
