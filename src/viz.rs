//! Rendering cohort reports to the terminal and to PNG charts using Plotters

use crate::error::Error;
use crate::locale::Language;
use crate::report::{CohortReport, Distribution, Rgb};
use colored::Colorize;
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Widest text bar, in characters
const TEXT_BAR_WIDTH: usize = 40;

const CHART_SIZE: (u32, u32) = (800, 500);

impl From<Rgb> for RGBColor {
    fn from(Rgb(r, g, b): Rgb) -> Self {
        RGBColor(r, g, b)
    }
}

/// Format a distribution as a horizontal text bar chart
///
/// Bars are scaled so the most frequent value spans [`TEXT_BAR_WIDTH`]
/// characters. Colors are applied only when `colored` is set.
pub fn format_distribution(distribution: &Distribution, language: Language, colored: bool) -> String {
    let field = distribution.field;
    let mut out = format!(
        "{}\n  {} / {}\n",
        field.chart_title(language),
        field.title(language),
        language.texts().count_axis
    );

    let label_width = distribution
        .bars
        .iter()
        .map(|b| b.answer.label(language).chars().count())
        .max()
        .unwrap_or(0);
    let max = distribution.max_count().max(1);

    for bar in &distribution.bars {
        let length = (bar.count * TEXT_BAR_WIDTH).div_ceil(max);
        let blocks = "█".repeat(length);
        let blocks = if colored {
            let Rgb(r, g, b) = bar.color;
            blocks.truecolor(r, g, b).to_string()
        } else {
            blocks
        };

        let label = bar.answer.label(language);
        let padding = label_width - label.chars().count();
        out.push_str(&format!(
            "  {label}{} │ {blocks} {}\n",
            " ".repeat(padding),
            bar.count
        ));
    }

    out
}

/// Print headline, description, cohort size and the five text charts
pub fn print_report(report: &CohortReport, language: Language) {
    let texts = language.texts();

    println!();
    println!("{}", language.headline(&report.profile.name).bold());
    println!("{}", report.profile.description);
    println!();
    println!("{}: {}", texts.metric_label, report.cohort_size.to_string().bold());
    println!();
    println!("{}", texts.cohort_header.bold().underline());

    for distribution in &report.distributions {
        println!();
        print!("{}", format_distribution(distribution, language, true));
    }
}

/// Draw one distribution as a bar chart into a PNG file
pub fn render_distribution(
    distribution: &Distribution,
    language: Language,
    output_path: &Path,
) -> Result<(), Error> {
    draw_distribution(distribution, language, output_path)
        .map_err(|e| Error::Render(format!("{}: {e}", output_path.display())))
}

fn draw_distribution(
    distribution: &Distribution,
    language: Language,
    output_path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let field = distribution.field;
    let labels: Vec<&str> = distribution
        .bars
        .iter()
        .map(|b| b.answer.label(language))
        .collect();
    let colors: Vec<RGBColor> = distribution.bars.iter().map(|b| b.color.into()).collect();
    let y_max = distribution.max_count() as u32 + 1;

    let root = BitMapBackend::new(output_path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            field.chart_title(language),
            ("sans-serif", 26).into_font().color(&BLACK),
        )
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d((0..labels.len().max(1)).into_segmented(), 0u32..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(field.title(language))
        .y_desc(language.texts().count_axis)
        .axis_desc_style(("sans-serif", 16).into_font().color(&BLACK))
        .label_style(("sans-serif", 13).into_font().color(&BLACK))
        .x_label_formatter(&|value| match value {
            SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => {
                labels.get(*i).map(|l| l.to_string()).unwrap_or_default()
            }
            SegmentValue::Last => String::new(),
        })
        .draw()?;

    // No legend: each bar is already labeled on the x axis
    chart.draw_series(
        Histogram::vertical(&chart)
            .margin(12)
            .style_func(|value, _| {
                let index = match value {
                    SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => *i,
                    SegmentValue::Last => 0,
                };
                colors.get(index).copied().unwrap_or(BLACK).filled()
            })
            .data(
                distribution
                    .bars
                    .iter()
                    .enumerate()
                    .map(|(i, bar)| (i, bar.count as u32)),
            ),
    )?;

    root.present()?;
    Ok(())
}

/// Write one PNG chart per field into `output_dir`
///
/// # Returns
/// * Paths of the written files, in column order
pub fn render_charts(
    report: &CohortReport,
    language: Language,
    output_dir: &Path,
) -> Result<Vec<PathBuf>, Error> {
    std::fs::create_dir_all(output_dir)
        .map_err(|e| Error::Render(format!("{}: {e}", output_dir.display())))?;

    let mut written = Vec::with_capacity(report.distributions.len());
    for distribution in &report.distributions {
        let path = output_dir.join(format!("{}.png", distribution.field.column()));
        render_distribution(distribution, language, &path)?;
        debug!(path = %path.display(), "chart written");
        written.push(path);
    }

    Ok(written)
}
