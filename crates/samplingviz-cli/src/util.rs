use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::Context;
use rand::SeedableRng as _;
use rand_pcg::Pcg64Mcg;
use samplingviz_chart::{config::PageConfig, page::Page};
use serde::Serialize;

/// A command's report destination: the `--output` file, or stdout without one.
pub(crate) struct Report {
    path: Option<PathBuf>,
    sink: Box<dyn Write>,
}

impl Report {
    pub fn open(path: Option<&Path>) -> anyhow::Result<Self> {
        let sink: Box<dyn Write> = match path {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Cannot create report file {}", path.display()))?;
                Box::new(BufWriter::new(file))
            }
            None => Box::new(io::stdout().lock()),
        };
        Ok(Self {
            path: path.map(Path::to_path_buf),
            sink,
        })
    }

    fn destination(&self) -> String {
        self.path
            .as_ref()
            .map_or_else(|| "stdout".to_owned(), |p| p.display().to_string())
    }

    /// Writes `value` as pretty-printed JSON and finishes the report.
    pub fn json<T>(mut self, value: &T) -> anyhow::Result<()>
    where
        T: Serialize + ?Sized,
    {
        serde_json::to_writer_pretty(&mut *self.sink, value)
            .with_context(|| format!("Cannot serialize report to {}", self.destination()))?;
        self.text(|out| writeln!(out))
    }

    /// Hands the sink to `write`, then flushes it.
    pub fn text<F>(mut self, write: F) -> anyhow::Result<()>
    where
        F: FnOnce(&mut dyn Write) -> io::Result<()>,
    {
        write(&mut *self.sink)
            .and_then(|()| self.sink.flush())
            .with_context(|| format!("Cannot write report to {}", self.destination()))
    }
}

/// Input page and the optional configuration overriding the built-in one.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PageArg {
    /// HTML page holding the data tables
    #[clap(long)]
    page: PathBuf,
    /// Page configuration file (JSON). Defaults to the sampling-distribution page
    #[clap(long)]
    config: Option<PathBuf>,
}

impl PageArg {
    pub fn load(&self) -> anyhow::Result<Page> {
        let config = match &self.config {
            Some(path) => load_config(path)?,
            None => PageConfig::default(),
        };
        let html = fs::read_to_string(&self.page)
            .with_context(|| format!("Failed to read page: {}", self.page.display()))?;
        let page = Page::load(&html, &config)
            .with_context(|| format!("Failed to load charts from {}", self.page.display()))?;
        tracing::info!(
            "Loaded {} charts from {}",
            page.charts().len(),
            self.page.display()
        );
        Ok(page)
    }
}

fn load_config(path: &Path) -> anyhow::Result<PageConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read page config: {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("Invalid page config in {}", path.display()))?;
    tracing::debug!("Using page config {}", path.display());
    Ok(config)
}

/// Seeded generator for reproducible samples, or an entropy-seeded one.
pub fn rng(seed: Option<u64>) -> Pcg64Mcg {
    match seed {
        Some(seed) => Pcg64Mcg::seed_from_u64(seed),
        None => Pcg64Mcg::from_os_rng(),
    }
}

/// Bins of one chart, written `<chart>:<i,j,..>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSelection {
    pub chart: String,
    pub bins: Vec<usize>,
}

impl FromStr for ChartSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (chart, bins) = s
            .rsplit_once(':')
            .ok_or_else(|| format!("expected <chart>:<bins>, got '{s}'"))?;
        if chart.is_empty() {
            return Err(format!("missing chart id in '{s}'"));
        }
        let bins = parse_bin_list(bins)?;
        Ok(Self {
            chart: chart.to_owned(),
            bins,
        })
    }
}

/// Collects repeated selections into one sorted bin list per chart, without
/// duplicates.
pub fn merge_selections(selections: &[ChartSelection]) -> BTreeMap<&str, Vec<usize>> {
    let mut merged = BTreeMap::<&str, Vec<usize>>::new();
    for ChartSelection { chart, bins } in selections {
        merged.entry(chart.as_str()).or_default().extend(bins);
    }
    for bins in merged.values_mut() {
        bins.sort_unstable();
        bins.dedup();
    }
    merged
}

/// Parses a comma-separated list of bin indices. An empty string is an empty list.
pub fn parse_bin_list(s: &str) -> Result<Vec<usize>, String> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse()
                .map_err(|e| format!("invalid bin index '{part}': {e}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::Rng as _;

    use super::*;

    #[test]
    fn test_parse_chart_selection() {
        let selection = "sampling-dist-fish:3,4, 5".parse::<ChartSelection>().unwrap();
        assert_eq!(selection.chart, "sampling-dist-fish");
        assert_eq!(selection.bins, [3, 4, 5]);

        let empty = "fish:".parse::<ChartSelection>().unwrap();
        assert!(empty.bins.is_empty());

        assert!("fish".parse::<ChartSelection>().is_err());
        assert!(":1".parse::<ChartSelection>().is_err());
        assert!("fish:1,x".parse::<ChartSelection>().is_err());
    }

    #[test]
    fn test_merge_selections_drops_duplicates() {
        let selections = ["fish:3,3", "grades:1", "fish:5,2,3"]
            .map(|s| s.parse::<ChartSelection>().unwrap());
        let merged = merge_selections(&selections);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged["fish"], [2, 3, 5]);
        assert_eq!(merged["grades"], [1]);
    }

    #[test]
    fn test_load_config_reports_path() {
        let dir = std::env::temp_dir().join(format!("samplingviz-util-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("broken.json"));

        let missing = load_config(&dir.join("missing.json")).unwrap_err();
        assert!(missing.to_string().starts_with("Failed to read page config"));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_report_writes_json_file() {
        let dir = std::env::temp_dir().join(format!("samplingviz-report-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("report.json");
        Report::open(Some(&path))
            .unwrap()
            .json(&[1, 2])
            .unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(serde_json::from_str::<Vec<u32>>(&written).unwrap(), [1, 2]);
        assert!(written.ends_with('\n'));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let a = rng(Some(3)).random::<u64>();
        let b = rng(Some(3)).random::<u64>();
        assert_eq!(a, b);
    }
}
