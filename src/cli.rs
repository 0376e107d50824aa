use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Get the default settings file location
/// Uses platform-specific config directories:
/// - Linux: ~/.config/mastersample/settings.toml
/// - macOS: ~/Library/Application Support/mastersample/settings.toml
/// - Windows: %APPDATA%/mastersample/settings.toml
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("mastersample").join("settings.toml"))
}

#[derive(Parser, Debug, Clone)]
#[command(name = "mastersample")]
#[command(about = "Reshape merge master sample exports and find the products needed to merge them")]
#[command(version)]
pub struct CliArgs {
    /// TOML file with default values for any option below
    /// Default: ~/.config/mastersample/settings.toml when it exists
    #[arg(long, global = true, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Field delimiter of the input and output files (default: ',')
    #[arg(long, global = true, value_name = "CHAR")]
    pub delimiter: Option<char>,

    /// Override console width for table output (default: auto-detect)
    #[arg(long, global = true, value_name = "COLUMNS")]
    pub console_width: Option<usize>,

    /// Show debug logging (RUST_LOG takes precedence when set)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Reshape an export into the transposed label layout
    Labels(LabelsArgs),
    /// List the products needed to rebuild the mother product's parts list
    Merge(MergeArgs),
}

#[derive(Args, Debug, Clone)]
pub struct LabelsArgs {
    /// Master sample export (delimited text, header in the first row)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Column after which product columns are renamed
    #[arg(long, value_name = "COLUMN")]
    pub start_column: Option<String>,

    /// Number of trailing characters replaced by the marker in product names
    #[arg(long, short = 'n', value_name = "N")]
    pub characters_to_replace: Option<usize>,

    /// Applicability symbol used in the export (e.g. "●")
    #[arg(long, short = 's', value_name = "SYMBOL")]
    pub symbol: Option<String>,

    /// Output path (default: <INPUT stem>_Automated.<ext> next to the input)
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Do not write the leading row-number column
    #[arg(long)]
    pub no_index: bool,

    /// Print the first N rows of the edited data
    #[arg(long, value_name = "ROWS")]
    pub preview: Option<usize>,
}

#[derive(Args, Debug, Clone)]
pub struct MergeArgs {
    /// Parts x products table (delimited text, header in the first row)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Applicability symbol used in the table (e.g. "●")
    #[arg(long, short = 's', value_name = "SYMBOL")]
    pub symbol: Option<String>,

    /// Column holding the branch identifiers
    #[arg(long, short = 'b', value_name = "COLUMN")]
    pub branch_column: Option<String>,

    /// Identifier columns that are not products
    /// Can specify multiple: --drop-columns PartNo PartsName
    #[arg(long, value_name = "COLUMN", num_args = 1..)]
    pub drop_columns: Vec<String>,

    /// Also save the report as JSON
    #[arg(long = "output-json", value_name = "PATH")]
    pub json: Option<PathBuf>,

    /// Also save the report as Markdown
    #[arg(long = "output-markdown", value_name = "PATH")]
    pub markdown: Option<PathBuf>,
}

impl CliArgs {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        CliArgs::parse()
    }

    /// Validate argument combinations
    pub fn validate(&self) -> Result<(), String> {
        if let Some(d) = self.delimiter
            && !d.is_ascii()
        {
            return Err(format!("--delimiter must be a single ASCII character, got '{}'", d));
        }

        let input = match &self.command {
            Command::Labels(args) => {
                if args.preview == Some(0) {
                    return Err("--preview needs at least one row".to_string());
                }
                &args.input
            }
            Command::Merge(args) => {
                if args.json.is_some() && args.json == args.markdown {
                    return Err("--output-json and --output-markdown must be different files".to_string());
                }
                &args.input
            }
        };

        if !input.is_file() {
            return Err(format!("Input file not found: {}", input.display()));
        }

        Ok(())
    }

    /// Input file of whichever subcommand was given
    pub fn input(&self) -> &PathBuf {
        match &self.command {
            Command::Labels(args) => &args.input,
            Command::Merge(args) => &args.input,
        }
    }
}
