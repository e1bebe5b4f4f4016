//! Command-line surface.

use std::path::PathBuf;

use clap::Parser;
use covidcases_core::{AreaKind, CaseKind, Pipeline};

#[derive(Parser, Debug)]
#[command(name = "covidcases")]
#[command(about = "Fetch, reshape and plot UK COVID-19 case data", long_about = None)]
#[command(after_help = "Prints the case table unless --plot, -j or --list is given.")]
pub struct Cli {
    /// Do not attempt to update data
    #[arg(short = 'd', long = "no-download")]
    pub offline: bool,

    /// Read region data (default: local authorities)
    #[arg(short = 'r', long)]
    pub region: bool,

    /// Use daily new cases instead of cumulative totals
    #[arg(short = 'D', long)]
    pub delta: bool,

    /// Keep only the named areas
    #[arg(short = 'n', value_name = "region", num_args = 1..)]
    pub region_name: Vec<String>,

    /// Centred rolling average over this many days
    #[arg(short = 'a', value_name = "Number", allow_negative_numbers = true)]
    pub average: Option<i64>,

    /// Rescale all values to the range 0..1
    #[arg(short = 'N', long = "normalise")]
    pub normalise: bool,

    /// List the areas data is collected for
    #[arg(short = 'l', long = "list")]
    pub list: bool,

    /// Plot the data in the terminal
    #[arg(short = 'p', long = "plot")]
    pub plot: bool,

    /// Output the data merged into GeoJSON, to a file or stdout
    #[arg(short = 'j', value_name = "path", num_args = 0..=1)]
    pub json: Option<Option<PathBuf>>,

    /// Directory holding the cached API documents
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Directory holding EER.json and LAD.json
    #[arg(long, value_name = "DIR")]
    pub geojson_dir: Option<PathBuf>,
}

impl Cli {
    pub fn area_kind(&self) -> AreaKind {
        if self.region {
            AreaKind::Region
        } else {
            AreaKind::Ltla
        }
    }

    pub fn case_kind(&self) -> CaseKind {
        CaseKind::from_cumulative(!self.delta)
    }

    /// Area names are only listed when no selection was requested
    pub fn should_list(&self) -> bool {
        self.list && self.region_name.is_empty()
    }

    pub fn pipeline(&self) -> Pipeline {
        Pipeline {
            areas: self.region_name.clone(),
            rolling_window: self
                .average
                .map(|a| a.unsigned_abs() as usize)
                .filter(|w| *w > 0),
            normalise: self.normalise,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["covidcases"]);
        assert_eq!(cli.area_kind(), AreaKind::Ltla);
        assert_eq!(cli.case_kind(), CaseKind::Cumulative);
        assert!(cli.json.is_none());
        let pipeline = cli.pipeline();
        assert!(pipeline.areas.is_empty());
        assert_eq!(pipeline.rolling_window, None);
        assert!(!pipeline.normalise);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from([
            "covidcases", "-d", "-r", "-D", "-N", "-a", "-7", "-n", "London", "North East",
        ]);
        assert!(cli.offline);
        assert_eq!(cli.area_kind(), AreaKind::Region);
        assert_eq!(cli.case_kind(), CaseKind::Delta);
        let pipeline = cli.pipeline();
        assert_eq!(pipeline.areas, vec!["London", "North East"]);
        assert_eq!(pipeline.rolling_window, Some(7));
        assert!(pipeline.normalise);
    }

    #[test]
    fn test_zero_window_disables_average() {
        let cli = Cli::parse_from(["covidcases", "-a", "0"]);
        assert_eq!(cli.pipeline().rolling_window, None);
    }

    #[test]
    fn test_json_with_and_without_path() {
        let cli = Cli::parse_from(["covidcases", "-j"]);
        assert_eq!(cli.json, Some(None));

        let cli = Cli::parse_from(["covidcases", "-j", "out.json"]);
        assert_eq!(cli.json, Some(Some(PathBuf::from("out.json"))));
    }

    #[test]
    fn test_list_suppressed_by_selection() {
        assert!(Cli::parse_from(["covidcases", "-l"]).should_list());
        assert!(!Cli::parse_from(["covidcases", "-l", "-n", "Leeds"]).should_list());
    }
}
