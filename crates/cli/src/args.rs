use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use models::{ManagementMode, ScenarioId};

#[derive(Parser, Debug)]
#[command(
    name = "roi",
    author,
    version,
    about = "Multifamily investment calculator: metrics, reports and saved scenarios"
)]
pub struct Cli {
    /// Path to settings.json (defaults to ./settings.json when present)
    #[arg(short, long, global = true)]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write the default assumption set to a JSON file
    Template {
        #[arg(short, long)]
        out: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Compute metrics for an input file
    Analyze {
        #[arg(short, long)]
        input: PathBuf,

        /// Print the full metrics snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render the text report for an input file
    Report {
        #[arg(short, long)]
        input: PathBuf,

        /// Write the report here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Set one field of an input file (non-numeric text becomes 0)
    Set {
        #[arg(short, long)]
        input: PathBuf,

        /// Field name as it appears in the JSON, e.g. purchasePrice
        #[arg(short, long)]
        field: String,

        #[arg(short, long, allow_hyphen_values = true)]
        value: String,
    },

    /// Switch the management fee between percent-of-gross and flat
    Mode {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(value_parser = parse_mode)]
        mode: ManagementMode,
    },

    /// Edit the rent roll of an input file
    #[command(subcommand)]
    Unit(UnitCommand),

    /// Manage saved scenarios
    #[command(subcommand)]
    Scenario(ScenarioCommand),
}

#[derive(Args, Debug, Default)]
pub struct UnitFields {
    #[arg(long)]
    pub bedrooms: Option<String>,

    #[arg(long)]
    pub bathrooms: Option<String>,

    /// Monthly rent
    #[arg(long, allow_hyphen_values = true)]
    pub rent: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum UnitCommand {
    /// Append a unit
    Add {
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        fields: UnitFields,
    },

    /// Remove a unit by id
    Remove {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(long)]
        id: u32,
    },

    /// Change fields of an existing unit
    Set {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(long)]
        id: u32,

        #[command(flatten)]
        fields: UnitFields,
    },
}

#[derive(Subcommand, Debug)]
pub enum ScenarioCommand {
    /// List saved scenarios with their headline metrics
    List,

    /// Save an input file as a new scenario
    Save {
        #[arg(short, long, default_value = "")]
        name: String,

        #[arg(short, long)]
        input: PathBuf,
    },

    /// Replace a scenario's assumptions with an input file
    Update {
        #[arg(long)]
        id: ScenarioId,

        #[arg(short, long)]
        input: PathBuf,
    },

    /// Delete a scenario
    Delete {
        #[arg(long)]
        id: ScenarioId,
    },

    /// Show a scenario's metrics, or its full report
    Show {
        #[arg(long)]
        id: ScenarioId,

        #[arg(long)]
        report: bool,
    },

    /// Write a scenario's assumptions to an input file for editing
    Export {
        #[arg(long)]
        id: ScenarioId,

        #[arg(short, long)]
        out: PathBuf,
    },
}

fn parse_mode(raw: &str) -> Result<ManagementMode, String> {
    raw.parse().map_err(|e: models::FieldError| e.to_string())
}
