//! CLI argument parsing definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Set the log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Scenario file path or http(s) URL
    #[arg(long, value_name = "SOURCE", global = true)]
    pub scenario: Option<String>,

    /// Host the load generator sends traffic to
    #[arg(long, value_name = "URL", global = true)]
    pub host: Option<String>,

    /// Base URL of the load generator's web API
    #[arg(long, value_name = "URL", global = true)]
    pub control_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a scenario against the load generator until it completes
    Run,

    /// Check a scenario document without contacting the load generator
    Validate {
        /// Scenario file path or URL (overrides --scenario)
        #[arg(value_name = "SOURCE")]
        source: Option<String>,
    },

    /// Print the schedule a scenario would follow
    Plan {
        /// Scenario file path or URL (overrides --scenario)
        #[arg(value_name = "SOURCE")]
        source: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: PlanFormat,
    },

    /// Generate a synthetic scenario from a preset
    Generate(GenerateArgs),

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        config_cmd: ConfigCommands,
    },
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Preset name (see --list)
    #[arg(value_name = "PRESET", required_unless_present = "list")]
    pub preset: Option<String>,

    /// List available presets
    #[arg(long)]
    pub list: bool,

    /// Output directory
    #[arg(long, value_name = "PATH", default_value = "output")]
    pub output_dir: PathBuf,

    /// RNG seed for reproducibility
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// ConfigMap metadata.name
    #[arg(long, value_name = "NAME", default_value = "test-scenario")]
    pub configmap_name: String,

    /// ConfigMap metadata.namespace
    #[arg(long, value_name = "NAMESPACE", default_value = "microservices-demo")]
    pub namespace: String,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlanFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Validate a configuration file
    Validate {
        /// Path to the configuration file
        #[arg(long, value_name = "PATH")]
        config_file: PathBuf,
    },

    /// Generate a sample configuration file
    Generate {
        /// Output file path; stdout when omitted
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_overrides_after_subcommand() {
        let cli = Cli::try_parse_from([
            "swarmpilot",
            "run",
            "--scenario",
            "scenario.json",
            "--host",
            "http://frontend:80",
            "--control-url",
            "http://locust:8089",
        ])
        .unwrap();

        assert!(matches!(cli.command, Some(Commands::Run)));
        assert_eq!(cli.scenario.as_deref(), Some("scenario.json"));
        assert_eq!(cli.host.as_deref(), Some("http://frontend:80"));
        assert_eq!(cli.control_url.as_deref(), Some("http://locust:8089"));
    }

    #[test]
    fn test_generate_defaults() {
        let cli = Cli::try_parse_from(["swarmpilot", "generate", "1h_spike"]).unwrap();
        match cli.command {
            Some(Commands::Generate(args)) => {
                assert_eq!(args.preset.as_deref(), Some("1h_spike"));
                assert_eq!(args.output_dir, PathBuf::from("output"));
                assert_eq!(args.configmap_name, "test-scenario");
                assert_eq!(args.namespace, "microservices-demo");
                assert!(args.seed.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_generate_needs_preset_or_list() {
        assert!(Cli::try_parse_from(["swarmpilot", "generate"]).is_err());
        assert!(Cli::try_parse_from(["swarmpilot", "generate", "--list"]).is_ok());
    }

    #[test]
    fn test_plan_format() {
        let cli = Cli::try_parse_from(["swarmpilot", "plan", "s.json", "--format", "json"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Plan {
                format: PlanFormat::Json,
                ..
            })
        ));
    }
}
