use std::{
    iter::once,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use plotters::prelude::*;
use tracing::info;

use crate::{
    binning::{bin_series, AggregateMode, FactField, GraphPoint, BLOCK_WEEK},
    block_facts::ExplorerDb,
};

pub const CHART_WIDTH: u32 = 800;
pub const CHART_HEIGHT: u32 = 500;

/// Presentation settings for one chart, passed explicitly to the render
/// call. There is exactly one chart shape, so a plain record is all the
/// styling machinery needed.
#[derive(Clone, Debug)]
pub struct ChartConfig {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub stroke_width: u32,
    pub color: RGBColor,
}

impl ChartConfig {
    pub fn for_field(field: FactField) -> Self {
        let (title, y_label) = match field {
            FactField::ActiveContractCost => ("Active Contract Cost", "siacoins"),
            FactField::ActiveContractSize => ("Active Contract Size", "gigabytes"),
            FactField::TotalContractCost => ("Total Contract Cost", "siacoins"),
            FactField::TotalContractSize => ("Total Contract Size", "gigabytes"),
        };
        Self {
            title: title.to_string(),
            x_label: "block height".to_string(),
            y_label: y_label.to_string(),
            stroke_width: 2,
            color: BLUE,
        }
    }

    /// File name used when a run renders more than one chart.
    pub fn default_file_name(&self) -> String {
        format!("{}.png", self.title.to_lowercase().replace(' ', "-"))
    }
}

/// Render the series as a single continuous stroke on a fixed 800x500
/// canvas, with a title band and labeled axes. The x axis is in block
/// heights with ticks at the usual reference heights plus the final one.
pub fn render_line_chart(series: &[GraphPoint], config: &ChartConfig, path: &Path) -> Result<()> {
    let final_height = series
        .last()
        .map_or(BLOCK_WEEK as u64, |point| (point.x + 1) * BLOCK_WEEK as u64);
    let y_max = series.iter().map(|point| point.y).fold(0.0, f64::max);
    let y_max = if y_max > 0.0 { y_max * 1.05 } else { 1.0 };
    let x_ticks: Vec<u64> = [0u64, 50_000, 100_000]
        .into_iter()
        .filter(|tick| *tick < final_height)
        .chain(once(final_height))
        .collect();

    let root = BitMapBackend::new(path, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(config.title.as_str(), ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d((0u64..final_height).with_key_points(x_ticks), 0f64..y_max)?;

    chart
        .configure_mesh()
        .x_desc(config.x_label.as_str())
        .y_desc(config.y_label.as_str())
        .draw()?;

    chart.draw_series(LineSeries::new(
        series
            .iter()
            .map(|point| (point.x * BLOCK_WEEK as u64, point.y)),
        config.color.stroke_width(config.stroke_width),
    ))?;

    root.present()?;
    Ok(())
}

/// Read the store once and render one chart per requested field. When no
/// field is given all four are rendered, each to a file named after its
/// title; an explicit output path is honored for single-field runs.
pub fn render_contract_charts(
    db_path: &Path,
    field: Option<FactField>,
    output: &Path,
    mode: AggregateMode,
) -> Result<Vec<PathBuf>> {
    let facts = ExplorerDb::open(db_path)?.read_block_facts()?;

    let targets: Vec<(FactField, PathBuf)> = match field {
        Some(field) => vec![(field, output.to_path_buf())],
        None => FactField::all()
            .into_iter()
            .map(|field| {
                let file_name = ChartConfig::for_field(field).default_file_name();
                (field, PathBuf::from(file_name))
            })
            .collect(),
    };

    let mut rendered = Vec::with_capacity(targets.len());
    for (field, path) in targets {
        let series = bin_series(&facts, BLOCK_WEEK, field, mode)?;
        let config = ChartConfig::for_field(field);
        render_line_chart(&series, &config, &path)
            .with_context(|| format!("failed to render {}", config.title))?;
        info!(
            points = series.len(),
            "rendered {} to {}",
            config.title,
            path.display()
        );
        rendered.push(path);
    }

    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

    #[test]
    fn default_file_name_derives_from_title() {
        assert_eq!(
            ChartConfig::for_field(FactField::ActiveContractCost).default_file_name(),
            "active-contract-cost.png"
        );
        assert_eq!(
            ChartConfig::for_field(FactField::TotalContractSize).default_file_name(),
            "total-contract-size.png"
        );
    }

    #[test]
    fn renders_a_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");
        let series: Vec<_> = (0..120u64)
            .map(|x| GraphPoint {
                x,
                y: (x as f64).sin().abs() * 1_000.0,
            })
            .collect();
        let config = ChartConfig::for_field(FactField::ActiveContractCost);

        render_line_chart(&series, &config, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], &PNG_MAGIC[..]);
    }

    #[test]
    fn renders_an_empty_series() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.png");
        let config = ChartConfig::for_field(FactField::TotalContractCost);

        render_line_chart(&[], &config, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], &PNG_MAGIC[..]);
    }
}

