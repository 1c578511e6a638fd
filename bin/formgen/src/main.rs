//! formgen CLI
//!
//! Renders the built-in form templates to formatted HTML.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use formgen::cmd::{self, build::BuildArgs};

/// Command-line interface for formgen.
#[derive(Parser)]
#[command(
    name = "formgen",
    version,
    about = "Generate formatted HTML documents from form templates"
)]
struct Cli {
    /// Path to configuration file (optional, defaults apply when absent)
    #[arg(short, long, default_value = "formgen.toml")]
    config: PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Render every template and copy the fonts
    Build {
        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Font source directory
        #[arg(long)]
        assets: Option<PathBuf>,
        /// Override the URL baked into the templates
        #[arg(long)]
        url: Option<String>,
        /// Keep existing files in the output directory
        #[arg(long)]
        no_clean: bool,
    },
    /// List registered templates
    List,
    /// Print one template as formatted HTML
    Render {
        /// Template name
        name: String,
        /// Override the URL baked into the template
        #[arg(long)]
        url: Option<String>,
    },
    /// Render a template and substitute its placeholders
    Fill {
        /// Template name
        name: String,
        /// Placeholder value (key=value), repeatable
        #[arg(long = "var", value_parser = parse_var)]
        vars: Vec<(String, String)>,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate configuration, assets and templates
    Check {
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
}

fn parse_var(s: &str) -> std::result::Result<(String, String), String> {
    cmd::fill::parse_var(s).map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    formgen::init_tracing(cli.verbose);

    match cli.command {
        Commands::Build {
            output,
            assets,
            url,
            no_clean,
        } => {
            let args = BuildArgs {
                output,
                assets,
                url,
                no_clean,
            };
            cmd::build::run(&cli.config, &args)?;
        }
        Commands::List => {
            cmd::list::run()?;
        }
        Commands::Render { name, url } => {
            cmd::render::run(&cli.config, &name, url.as_deref())?;
        }
        Commands::Fill { name, vars, output } => {
            cmd::fill::run(&cli.config, &name, &vars, output.as_deref())?;
        }
        Commands::Check { strict } => {
            cmd::check::run(&cli.config, strict)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_cli_build_command_parsing() {
        let args = ["formgen", "build", "--output", "dist"];
        let cli = Cli::parse_from(args);

        assert_eq!(cli.config, PathBuf::from("formgen.toml"));
        assert_eq!(cli.verbose, 0);

        match cli.command {
            Commands::Build {
                output,
                assets,
                url,
                no_clean,
            } => {
                assert_eq!(output, Some(PathBuf::from("dist")));
                assert!(assets.is_none());
                assert!(url.is_none());
                assert!(!no_clean);
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_build_with_overrides() {
        let args = [
            "formgen",
            "build",
            "--assets",
            "static/fonts",
            "--url",
            "https://example.org",
            "--no-clean",
        ];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Build {
                assets,
                url,
                no_clean,
                ..
            } => {
                assert_eq!(assets, Some(PathBuf::from("static/fonts")));
                assert_eq!(url.as_deref(), Some("https://example.org"));
                assert!(no_clean);
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_list_command_parsing() {
        let cli = Cli::parse_from(["formgen", "list"]);
        assert!(matches!(cli.command, Commands::List));
    }

    #[test]
    fn test_cli_render_command_parsing() {
        let cli = Cli::parse_from(["formgen", "render", "pdf", "--url", "https://a.test"]);

        match cli.command {
            Commands::Render { name, url } => {
                assert_eq!(name, "pdf");
                assert_eq!(url.as_deref(), Some("https://a.test"));
            }
            _ => panic!("Expected Render command"),
        }
    }

    #[test]
    fn test_cli_fill_command_parsing() {
        let args = [
            "formgen",
            "fill",
            "pdf",
            "--var",
            "name=Jane Doe",
            "--var",
            "date=17 October 2026",
            "-o",
            "out/pdf.html",
        ];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Fill { name, vars, output } => {
                assert_eq!(name, "pdf");
                assert_eq!(
                    vars,
                    vec![
                        ("name".to_string(), "Jane Doe".to_string()),
                        ("date".to_string(), "17 October 2026".to_string()),
                    ]
                );
                assert_eq!(output, Some(PathBuf::from("out/pdf.html")));
            }
            _ => panic!("Expected Fill command"),
        }
    }

    #[test]
    fn test_cli_fill_rejects_malformed_var() {
        let result = Cli::try_parse_from(["formgen", "fill", "pdf", "--var", "oops"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_check_command_parsing() {
        let cli = Cli::parse_from(["formgen", "check", "--strict"]);

        match cli.command {
            Commands::Check { strict } => {
                assert!(strict);
            }
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn test_cli_verbosity_flags() {
        let cli = Cli::parse_from(["formgen", "-vvv", "build"]);
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn test_cli_custom_config_path() {
        let cli = Cli::parse_from(["formgen", "--config", "forms.toml", "list"]);
        assert_eq!(cli.config, PathBuf::from("forms.toml"));
    }
}
