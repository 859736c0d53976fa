mod binning;
mod block_facts;
mod charts;
mod env;
mod frontend_data;
pub mod log;
mod units;

pub use binning::{bin_series, AggregateMode, FactField, GraphPoint, BLOCK_WEEK};
pub use block_facts::{
    decode_block_fact, BlockFact, DecodeError, ExplorerDb, StoreError, BLOCK_FACTS_TREE,
};
pub use charts::{render_contract_charts, render_line_chart, ChartConfig};
pub use frontend_data::{update_frontend_data, write_data_script, DEFAULT_DATA_SCRIPT_PATH};
pub use units::{scale_to_f64, ConversionError, Hastings};
