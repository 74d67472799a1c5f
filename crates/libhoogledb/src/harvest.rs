use std::{fs, io::Write};

use tracing::{debug, info, warn};

use crate::{
    config::Config,
    discovery::SymbolDiscovery,
    error::Result,
    fetch::Fetch,
    filter::ExclusionSet,
    module::{ModuleName, render_module},
    sink::OutputSink,
};

/// A module that contributed nothing because it failed to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleFailure {
    /// The module that was skipped.
    pub module: ModuleName,
    /// Human-readable cause.
    pub reason: String,
}

/// What a run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    /// Names returned by discovery.
    pub discovered: usize,
    /// Names left after exclusions.
    pub selected: usize,
    /// Modules written to the database, in output order.
    pub written: Vec<ModuleName>,
    /// Modules skipped because of a fetch, parse or page structure failure.
    pub failed: Vec<ModuleFailure>,
    /// Bytes of database text written.
    pub bytes: usize,
}

/// Harvest builds a Hoogle database from HTML documentation.
///
/// Discovery lists the candidate modules, the exclusion set narrows them, and every remaining
/// module is fetched, rendered and written in turn. A module that fails is logged and skipped;
/// a failure of discovery or of the output aborts the run.
#[derive(Debug, Clone)]
pub struct Harvester {
    /// Run settings.
    config: Config,
    /// Compiled exclusion patterns.
    exclusions: ExclusionSet,
}

impl Harvester {
    /// Create a harvester, compiling the configured exclusion patterns.
    pub fn new(config: Config) -> Result<Self> {
        let exclusions = ExclusionSet::new(&config.exclusions)?;
        debug!(patterns = config.exclusions.len(), "compiled exclusion patterns");
        Ok(Self { config, exclusions })
    }

    /// The settings in use.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Discover modules, keeping those no exclusion pattern matches.
    pub fn select_modules(
        &self,
        discovery: &dyn SymbolDiscovery,
    ) -> Result<(usize, Vec<ModuleName>)> {
        let names = discovery.list_qualified_names(&self.config.root_namespace)?;
        let discovered = names.len();
        let selected = self.exclusions.select(names);
        info!(discovered, selected = selected.len(), "selected modules");
        Ok((discovered, selected))
    }

    /// Fetch and render one module into its complete output block.
    pub fn process_module(&self, module: &ModuleName, fetcher: &dyn Fetch) -> Result<String> {
        let url = module.page_url(&self.config.base_url);
        debug!(module = %module, url, "processing module");
        let page = fetcher.fetch(&url)?;
        render_module(module, &page, &self.config.base_url)
    }

    /// Write every module to `sink`, skipping modules that fail.
    ///
    /// Only write errors are returned.
    pub fn write_modules<W: Write>(
        &self,
        modules: &[ModuleName],
        fetcher: &dyn Fetch,
        sink: &mut OutputSink<W>,
    ) -> Result<Summary> {
        let mut summary = Summary {
            selected: modules.len(),
            ..Summary::default()
        };
        for module in modules {
            match self.process_module(module, fetcher) {
                Ok(block) => {
                    sink.write(&block)?;
                    summary.written.push(module.clone());
                }
                Err(e) => {
                    warn!("Unable to generate for module {module}: {e}");
                    summary.failed.push(ModuleFailure {
                        module: module.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }
        summary.bytes = sink.written();
        Ok(summary)
    }

    /// Run end to end, writing the database to the configured output file.
    ///
    /// If writing fails the partial file is removed.
    pub fn run(&self, discovery: &dyn SymbolDiscovery, fetcher: &dyn Fetch) -> Result<Summary> {
        let (discovered, modules) = self.select_modules(discovery)?;

        let output = &self.config.output;
        let mut sink = OutputSink::create(output)?;
        let result = self
            .write_modules(&modules, fetcher, &mut sink)
            .and_then(|summary| sink.finish().map(|_| summary));

        match result {
            Ok(summary) => {
                info!(
                    output = %output.display(),
                    written = summary.written.len(),
                    failed = summary.failed.len(),
                    bytes = summary.bytes,
                    "database written"
                );
                Ok(Summary {
                    discovered,
                    ..summary
                })
            }
            Err(e) => {
                if let Err(remove) = fs::remove_file(output) {
                    warn!(output = %output.display(), "could not remove partial output: {remove}");
                }
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{discovery::StaticDiscovery, error::HoogleError, fetch::StaticFetcher};
    use pretty_assertions::assert_eq;
    use std::io;

    const BASE: &str = "http://host/doc";

    /// Accepts nothing.
    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("broken pipe"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn harvester() -> Harvester {
        Harvester::new(Config::default().with_base_url(BASE)).unwrap()
    }

    #[test]
    fn selection_applies_exclusions() {
        let discovery =
            StaticDiscovery::new(["frege.Prelude", "frege.compiler.Main", "frege.Version"]);
        let (discovered, selected) = harvester().select_modules(&discovery).unwrap();
        assert_eq!(discovered, 3);
        assert_eq!(selected, vec![ModuleName::new("frege.Prelude")]);
    }

    #[test]
    fn invalid_exclusion_fails_construction() {
        let config = Config::default().with_exclusions(["[unclosed"]);
        assert!(matches!(
            Harvester::new(config),
            Err(HoogleError::InvalidPattern(_))
        ));
    }

    #[test]
    fn failed_modules_are_skipped() {
        let fetcher = StaticFetcher::new()
            .with_html(
                "http://host/doc/frege/Good.html",
                "<h1>Good</h1><p>Fine.</p>",
            )
            .unwrap()
            .with_html("http://host/doc/frege/NoTitle.html", "<p>x</p>")
            .unwrap();
        let modules: Vec<ModuleName> = ["frege.Missing", "frege.Good", "frege.NoTitle"]
            .into_iter()
            .map(ModuleName::from)
            .collect();
        let mut sink = OutputSink::new(Vec::new(), "memory");
        let summary = harvester()
            .write_modules(&modules, &fetcher, &mut sink)
            .unwrap();
        assert_eq!(summary.written, vec![ModuleName::new("frege.Good")]);
        assert_eq!(
            summary
                .failed
                .iter()
                .map(|f| f.module.as_str())
                .collect::<Vec<_>>(),
            vec!["frege.Missing", "frege.NoTitle"]
        );
        let text = String::from_utf8(sink.finish().unwrap()).unwrap();
        assert_eq!(text, "-- | Fine.\nmodule frege.Good\n\n");
        assert_eq!(summary.bytes, text.len());
    }

    #[test]
    fn write_failures_abort() {
        let fetcher = StaticFetcher::new()
            .with_html("http://host/doc/frege/A.html", "<h1>A</h1>")
            .unwrap()
            .with_html("http://host/doc/frege/B.html", "<h1>B</h1>")
            .unwrap();
        let modules = vec![ModuleName::new("frege.A"), ModuleName::new("frege.B")];
        let mut sink = OutputSink::new(Broken, "broken");
        assert!(matches!(
            harvester().write_modules(&modules, &fetcher, &mut sink),
            Err(HoogleError::Write { .. })
        ));
    }

    #[test]
    fn discovery_failure_aborts_before_output() {
        struct Failing;
        impl SymbolDiscovery for Failing {
            fn list_qualified_names(&self, root: &str) -> Result<Vec<String>> {
                Err(HoogleError::Discovery {
                    root: root.to_string(),
                    reason: "no class path".to_string(),
                })
            }
        }

        let dir = tempfile::TempDir::new().unwrap();
        let output = dir.path().join("db.txt");
        let harvester =
            Harvester::new(Config::default().with_base_url(BASE).with_output(&output)).unwrap();
        let result = harvester.run(&Failing, &StaticFetcher::new());
        assert!(matches!(result, Err(HoogleError::Discovery { .. })));
        assert!(!output.exists());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn output_failure_removes_the_partial_file() {
        use std::os::unix::fs::symlink;

        let dir = tempfile::TempDir::new().unwrap();
        let output = dir.path().join("db.txt");
        symlink("/dev/full", &output).unwrap();
        let fetcher = StaticFetcher::new()
            .with_html("http://host/doc/frege/A.html", "<h1>A</h1><p>Some prose.</p>")
            .unwrap();
        let harvester =
            Harvester::new(Config::default().with_base_url(BASE).with_output(&output)).unwrap();

        let result = harvester.run(&StaticDiscovery::new(["frege.A"]), &fetcher);
        assert!(matches!(result, Err(HoogleError::Write { .. })));
        assert!(fs::symlink_metadata(&output).is_err());
    }
}
