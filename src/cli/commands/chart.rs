//! `trainreg chart` command - Grouped counts as a text chart

use clap::ValueEnum;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::commands::utils::{FilterArgs, Workspace};
use crate::cli::helpers::{escape_csv, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::aggregate::{group_counts, GroupCount};
use crate::core::record::Field;

/// Slices kept in a pie chart
const PIE_SLICES: usize = 10;

/// Width of the longest bar
const BAR_WIDTH: usize = 40;

/// Label column width
const LABEL_WIDTH: usize = 28;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChartField {
    Employee,
    Course,
    #[value(alias = "date")]
    CompletionDate,
}

impl From<ChartField> for Field {
    fn from(field: ChartField) -> Self {
        match field {
            ChartField::Employee => Field::Employee,
            ChartField::Course => Field::Course,
            ChartField::CompletionDate => Field::CompletionDate,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChartKind {
    #[default]
    Bar,
    Pie,
    Line,
}

#[derive(clap::Args, Debug)]
pub struct ChartArgs {
    /// Field to group by
    #[arg(long, short = 'b', default_value = "course")]
    pub by: ChartField,

    /// Chart type
    #[arg(long, short = 'k', default_value = "bar")]
    pub kind: ChartKind,

    #[command(flatten)]
    pub filter: FilterArgs,
}

pub fn run(args: ChartArgs, global: &GlobalOpts) -> Result<()> {
    let ws = Workspace::open(global)?;
    let filter = args.filter.to_filter();
    let field: Field = args.by.into();

    let mut groups = group_counts(filter.apply(ws.store.records()), field, ws.date_format());
    if args.kind == ChartKind::Pie {
        groups = pie_slices(groups);
    }

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&groups).into_diagnostic()?);
        }
        OutputFormat::Yaml => print!("{}", serde_yml::to_string(&groups).into_diagnostic()?),
        OutputFormat::Csv => {
            println!("{},count", field);
            for g in &groups {
                println!("{},{}", escape_csv(&g.label), g.count);
            }
        }
        OutputFormat::Md => {
            println!("| {} | Count |", field);
            println!("|---|---|");
            for g in &groups {
                println!("| {} | {} |", g.label.replace('|', "\\|"), g.count);
            }
        }
        OutputFormat::Id => {
            for g in &groups {
                println!("{}", g.key);
            }
        }
        OutputFormat::Auto | OutputFormat::Tsv => {
            if groups.is_empty() {
                println!("No data to chart.");
                return Ok(());
            }
            if !global.quiet {
                println!("{}", style(format!("Records by {}", field)).bold());
                println!();
            }
            let lines = match args.kind {
                ChartKind::Bar => bar_lines(&groups, '█'),
                ChartKind::Line => line_lines(&groups),
                ChartKind::Pie => pie_lines(&groups),
            };
            for line in lines {
                println!("{}", line);
            }
        }
    }

    Ok(())
}

/// Largest groups first, capped at the pie slice count
fn pie_slices(mut groups: Vec<GroupCount>) -> Vec<GroupCount> {
    groups.sort_by(|a, b| b.count.cmp(&a.count));
    groups.truncate(PIE_SLICES);
    groups
}

fn scaled(count: usize, max: usize) -> usize {
    if max == 0 {
        0
    } else {
        (count * BAR_WIDTH).div_ceil(max)
    }
}

fn label(g: &GroupCount) -> String {
    format!("{:<w$}", truncate_str(&g.label, LABEL_WIDTH), w = LABEL_WIDTH)
}

fn bar_lines(groups: &[GroupCount], glyph: char) -> Vec<String> {
    let max = groups.iter().map(|g| g.count).max().unwrap_or(0);
    groups
        .iter()
        .map(|g| {
            let bar: String = std::iter::repeat(glyph).take(scaled(g.count, max)).collect();
            format!("{} {} {}", label(g), bar, g.count)
        })
        .collect()
}

fn line_lines(groups: &[GroupCount]) -> Vec<String> {
    let max = groups.iter().map(|g| g.count).max().unwrap_or(0);
    groups
        .iter()
        .map(|g| {
            let offset = scaled(g.count, max).saturating_sub(1);
            format!("{} {}● {}", label(g), " ".repeat(offset), g.count)
        })
        .collect()
}

fn pie_lines(groups: &[GroupCount]) -> Vec<String> {
    let total: usize = groups.iter().map(|g| g.count).sum();
    groups
        .iter()
        .map(|g| {
            let share = if total == 0 {
                0.0
            } else {
                g.count as f64 / total as f64 * 100.0
            };
            let bar: String = std::iter::repeat('■')
                .take((share / 100.0 * BAR_WIDTH as f64).round() as usize)
                .collect();
            format!("{} {:>5.1}% {} ({})", label(g), share, bar, g.count)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(label: &str, count: usize) -> GroupCount {
        GroupCount {
            key: label.to_string(),
            label: label.to_string(),
            count,
        }
    }

    #[test]
    fn test_bar_scales_to_largest_group() {
        let lines = bar_lines(&[group("NR-10", 4), group("NR-35", 2)], '█');
        assert_eq!(lines[0].matches('█').count(), BAR_WIDTH);
        assert_eq!(lines[1].matches('█').count(), BAR_WIDTH / 2);
        assert!(lines[0].ends_with(" 4"));
    }

    #[test]
    fn test_pie_keeps_ten_largest() {
        let groups: Vec<GroupCount> = (1..=12).map(|n| group(&format!("C{}", n), n)).collect();
        let slices = pie_slices(groups);
        assert_eq!(slices.len(), PIE_SLICES);
        assert_eq!(slices[0].label, "C12");
        assert_eq!(slices[9].label, "C3");
    }

    #[test]
    fn test_pie_shares_are_percentages() {
        let lines = pie_lines(&[group("A", 3), group("B", 1)]);
        assert!(lines[0].contains("75.0%"));
        assert!(lines[1].contains("25.0%"));
    }

    #[test]
    fn test_line_marks_every_group() {
        let lines = line_lines(&[group("2024-01-01", 1), group("2024-01-02", 3)]);
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.contains('●')));
    }
}
