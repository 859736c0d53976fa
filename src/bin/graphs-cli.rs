use std::path::PathBuf;

use clap::{Parser, Subcommand};

use explorer_graphs::{
    log, render_contract_charts, update_frontend_data, AggregateMode, FactField,
    DEFAULT_DATA_SCRIPT_PATH,
};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render binned contract graphs as PNG line charts.
    Chart {
        /// Path to the explorer store.
        #[clap(long, default_value = "explorer.db")]
        db_path: PathBuf,
        /// Graph field. All four are rendered when omitted, each to a file
        /// named after its chart title.
        #[clap(long)]
        field: Option<FactField>,
        /// Output image path, honored for single-field runs.
        #[clap(long, default_value = "out.png")]
        output: PathBuf,
        /// Aggregation applied per block-week bin.
        #[clap(long, default_value = "average")]
        mode: AggregateMode,
    },
    /// Regenerate the data script the static frontend loads.
    FrontendData {
        /// Path to the explorer store.
        #[clap(long, default_value = "explorer.db")]
        db_path: PathBuf,
        /// Graph field.
        #[clap(long, default_value = "active-contract-cost")]
        field: FactField,
        /// Output script path.
        #[clap(long, default_value = DEFAULT_DATA_SCRIPT_PATH)]
        output: PathBuf,
        /// Aggregation applied per block-week bin.
        #[clap(long, default_value = "average")]
        mode: AggregateMode,
    },
}

fn main() -> anyhow::Result<()> {
    log::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Chart {
            db_path,
            field,
            output,
            mode,
        } => {
            render_contract_charts(&db_path, field, &output, mode)?;
        }
        Commands::FrontendData {
            db_path,
            field,
            output,
            mode,
        } => {
            update_frontend_data(&db_path, field, &output, mode)?;
        }
    }

    Ok(())
}
