use anyhow::{Result, bail};
use clap::{Parser, ValueEnum};
use ratatui::crossterm::style::Stylize;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DatasetKind {
    /// Risk-based inspection assessments for piping and pressure vessels
    Rbi,
    WorkOrders,
    WorkRequests,
    /// One column per header found in the file
    Auto,
}

#[derive(Debug, Parser, Clone)]
#[command(about = "Asset integrity records in the terminal")]
pub struct Args {
    /// Records file (.csv, .csv.gz or .json)
    #[arg(short = 'r', long)]
    pub read: PathBuf,

    /// Column layout to use for the records
    #[arg(short = 'k', long, value_enum, default_value_t = DatasetKind::Auto)]
    pub kind: DatasetKind,

    /// Rows per page
    #[arg(short = 'p', long, default_value_t = 10)]
    pub page_size: usize,

    /// Directory that receives CSV exports
    #[arg(short = 'e', long, default_value = "./exports")]
    pub export_dir: PathBuf,

    /// Log file (the terminal belongs to the UI)
    #[arg(long, default_value = "./assetdesk.log")]
    pub log_file: PathBuf,

    /// Disable deleting records
    #[arg(long)]
    pub read_only: bool,
}

impl Args {
    pub fn validate(&self) -> Result<()> {
        let name = self
            .read
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_lowercase();

        if !(name.ends_with(".csv") || name.ends_with(".csv.gz") || name.ends_with(".json")) {
            bail!(
                "{} --read must be a .csv, .csv.gz or .json file (found {})",
                "[ERROR]".red().bold(),
                self.read.display()
            );
        }

        if !self.read.exists() {
            bail!(
                "{} {} does not exist",
                "[ERROR]".red().bold(),
                self.read.display()
            );
        }

        if self.page_size == 0 {
            bail!("{} --page-size must be at least 1", "[PROHIBITED]".red().bold());
        }

        Ok(())
    }

    pub fn dataset_name(&self) -> String {
        let name = self
            .read
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "records".into());
        name.split('.').next().unwrap_or("records").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("assetdesk").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults() {
        let args = parse(&["--read", "orders.csv.gz"]);
        assert_eq!(args.kind, DatasetKind::Auto);
        assert_eq!(args.page_size, 10);
        assert!(!args.read_only);
        assert_eq!(args.dataset_name(), "orders");
    }

    #[test]
    fn kind_names_are_kebab_case() {
        let args = parse(&["-r", "x.json", "--kind", "work-orders", "-p", "25"]);
        assert_eq!(args.kind, DatasetKind::WorkOrders);
        assert_eq!(args.page_size, 25);
    }

    #[test]
    fn rejects_unknown_extension() {
        let args = parse(&["-r", "records.xlsx"]);
        assert!(args.validate().is_err());
    }
}
