use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "notes-converter",
    version,
    about = "Convert exported study notes into ordered documents"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Convert(ConvertArgs),
    Cite(CiteArgs),
    Tags(TagsArgs),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct DataArgs {
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    #[arg(long)]
    pub order_path: Option<PathBuf>,

    #[arg(long)]
    pub names_path: Option<PathBuf>,
}

impl DataArgs {
    pub fn order_path(&self) -> PathBuf {
        self.order_path
            .clone()
            .unwrap_or_else(|| self.data_dir.join("standard_works_order.json"))
    }

    pub fn names_path(&self) -> PathBuf {
        self.names_path
            .clone()
            .unwrap_or_else(|| self.data_dir.join("display_names.json"))
    }
}

#[derive(Args, Debug, Clone)]
pub struct ConvertArgs {
    #[arg(short, long = "input", required = true)]
    pub inputs: Vec<PathBuf>,

    #[arg(short, long)]
    pub output: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[arg(long)]
    pub template: Option<PathBuf>,

    #[arg(long, default_value = "templates")]
    pub template_dir: PathBuf,

    #[command(flatten)]
    pub data: DataArgs,

    #[arg(long)]
    pub staging_db: Option<PathBuf>,

    #[arg(long)]
    pub report_path: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct CiteArgs {
    #[arg(long)]
    pub url: String,

    #[command(flatten)]
    pub data: DataArgs,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct TagsArgs {
    #[arg(short, long = "input", required = true)]
    pub inputs: Vec<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}
