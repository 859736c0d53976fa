use std::{fmt::Display, str::FromStr};

use num_bigint::BigUint;
use num_traits::Zero;
use serde::Serialize;
use thiserror::Error;

use crate::{
    block_facts::BlockFact,
    units::{scale_to_f64, ConversionError, BYTES_PER_GIGABYTE, HASTINGS_PER_SIACOIN},
};

/// 1008 blocks, roughly one week at the target block interval. One bin per
/// block-week.
pub const BLOCK_WEEK: usize = 1008;

/// One output point: `x` is the 0-based bin index, `y` the unit-scaled
/// aggregate over that bin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GraphPoint {
    pub x: u64,
    pub y: f64,
}

/// The fact field a graph is built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FactField {
    ActiveContractCost,
    ActiveContractSize,
    TotalContractCost,
    TotalContractSize,
}

use FactField::*;

impl FactField {
    pub fn all() -> [FactField; 4] {
        [
            ActiveContractCost,
            ActiveContractSize,
            TotalContractCost,
            TotalContractSize,
        ]
    }

    pub fn select(&self, fact: &BlockFact) -> BigUint {
        match self {
            ActiveContractCost => fact.active_contract_cost.amount().clone(),
            ActiveContractSize => BigUint::from(fact.active_contract_size),
            TotalContractCost => fact.total_contract_cost.amount().clone(),
            TotalContractSize => BigUint::from(fact.total_contract_size),
        }
    }

    /// Base-unit to display-unit divisor: hastings to siacoins for cost
    /// fields, bytes to gigabytes for size fields.
    pub fn scale(&self) -> &'static BigUint {
        match self {
            ActiveContractCost | TotalContractCost => &HASTINGS_PER_SIACOIN,
            ActiveContractSize | TotalContractSize => &BYTES_PER_GIGABYTE,
        }
    }
}

#[derive(Debug, Error)]
pub enum ParseFieldError {
    #[error("unknown graph field {0}")]
    UnknownField(String),
}

impl FromStr for FactField {
    type Err = ParseFieldError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active-contract-cost" => Ok(ActiveContractCost),
            "active-contract-size" => Ok(ActiveContractSize),
            "total-contract-cost" => Ok(TotalContractCost),
            "total-contract-size" => Ok(TotalContractSize),
            unknown_field => Err(ParseFieldError::UnknownField(unknown_field.to_string())),
        }
    }
}

impl Display for FactField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActiveContractCost => write!(f, "active-contract-cost"),
            ActiveContractSize => write!(f, "active-contract-size"),
            TotalContractCost => write!(f, "total-contract-cost"),
            TotalContractSize => write!(f, "total-contract-size"),
        }
    }
}

/// How a full bin collapses into its output value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AggregateMode {
    /// Sum divided by the bin size.
    Average,
    /// Raw sum.
    Cumulative,
}

#[derive(Debug, Error)]
pub enum ParseModeError {
    #[error("unknown aggregate mode {0}")]
    UnknownMode(String),
}

impl FromStr for AggregateMode {
    type Err = ParseModeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "average" => Ok(AggregateMode::Average),
            "cumulative" => Ok(AggregateMode::Cumulative),
            unknown_mode => Err(ParseModeError::UnknownMode(unknown_mode.to_string())),
        }
    }
}

impl Display for AggregateMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AggregateMode::Average => write!(f, "average"),
            AggregateMode::Cumulative => write!(f, "cumulative"),
        }
    }
}

/// Collapse an ascending fact sequence into one point per full window of
/// `bin_size` facts. Accumulation stays in the big domain; only the final
/// scaled value per bin becomes an f64. Facts past the last full window are
/// dropped.
pub fn bin_series(
    facts: &[BlockFact],
    bin_size: usize,
    field: FactField,
    mode: AggregateMode,
) -> Result<Vec<GraphPoint>, ConversionError> {
    assert!(bin_size > 0, "bin size must be positive");

    let mut points = Vec::with_capacity(facts.len() / bin_size);
    let mut accumulator = BigUint::zero();
    let mut count = 0usize;

    for fact in facts {
        accumulator += field.select(fact);
        count += 1;
        if count == bin_size {
            let aggregate = match mode {
                AggregateMode::Average => &accumulator / (bin_size as u64),
                AggregateMode::Cumulative => accumulator.clone(),
            };
            points.push(GraphPoint {
                x: points.len() as u64,
                y: scale_to_f64(&aggregate, field.scale())?,
            });
            accumulator.set_zero();
            count = 0;
        }
    }

    Ok(points)
}
