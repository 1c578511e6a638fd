//! Build orchestration.
//!
//! Renders every registered template to `<output>/<name>.html` and copies the
//! asset tree, both in parallel, then joins them into a [`BuildReport`].
//! Failures of individual documents or of the asset copy are part of the
//! report; only preparing the output directory can abort a build.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

use formgen_core::Config;
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    assets::{AssetError, AssetManifest, AssetProcessor},
    html::{HtmlError, Renderer},
    template::{TemplateError, TemplateParams, TemplateRegistry, TemplateUnit},
};

/// Build errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Template error.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// HTML generation error.
    #[error("HTML error: {0}")]
    Html(#[from] HtmlError),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Outcome of rendering and writing one template.
#[derive(Debug)]
pub struct WriteOutcome {
    /// Registry key.
    pub key: String,

    /// Template name.
    pub name: String,

    /// Output file.
    pub path: PathBuf,

    /// Bytes written, or the failure.
    pub result: Result<usize>,
}

impl WriteOutcome {
    /// Whether the document was written.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcome of the asset copy.
#[derive(Debug)]
pub struct AssetOutcome {
    /// Source directory.
    pub source: PathBuf,

    /// Destination directory.
    pub dest: PathBuf,

    /// Copied files, or the failure.
    pub result: std::result::Result<AssetManifest, AssetError>,
}

/// A registry entry that was not written because a later entry claims the
/// same output path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowedEntry {
    /// Key of the shadowed entry.
    pub key: String,

    /// Key of the entry written instead.
    pub by: String,

    /// Contested output file.
    pub path: PathBuf,
}

/// Aggregate result of a build.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// One outcome per written template, in registry order.
    pub writes: Vec<WriteOutcome>,

    /// Asset copy outcome; `None` when no asset directory is configured.
    pub assets: Option<AssetOutcome>,

    /// Entries superseded by a later entry with the same output path.
    pub shadowed: Vec<ShadowedEntry>,

    /// Build duration in milliseconds.
    pub duration_ms: u64,
}

impl BuildReport {
    /// Whether every document and the asset copy succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.writes.iter().all(WriteOutcome::is_ok)
            && self.assets.as_ref().is_none_or(|a| a.result.is_ok())
    }

    /// Number of documents written.
    #[must_use]
    pub fn written(&self) -> usize {
        self.writes.iter().filter(|w| w.is_ok()).count()
    }

    /// Outcomes of documents that failed.
    pub fn failed_writes(&self) -> impl Iterator<Item = &WriteOutcome> {
        self.writes.iter().filter(|w| !w.is_ok())
    }

    /// Number of asset files copied.
    #[must_use]
    pub fn assets_copied(&self) -> usize {
        self.assets
            .as_ref()
            .and_then(|a| a.result.as_ref().ok())
            .map_or(0, AssetManifest::len)
    }

    /// Human-readable failure descriptions.
    #[must_use]
    pub fn failures(&self) -> Vec<String> {
        let mut failures: Vec<String> = self
            .failed_writes()
            .filter_map(|w| {
                w.result
                    .as_ref()
                    .err()
                    .map(|e| format!("{} ({}): {e}", w.key, w.path.display()))
            })
            .collect();

        if let Some(AssetOutcome {
            source,
            result: Err(e),
            ..
        }) = &self.assets
        {
            failures.push(format!("assets ({}): {e}", source.display()));
        }

        failures
    }
}

/// One planned document write.
#[derive(Debug)]
struct PlannedWrite<'a> {
    key: &'a str,
    unit: &'a TemplateUnit,
    path: PathBuf,
}

/// Document builder that orchestrates the build process.
#[derive(Debug)]
pub struct Builder {
    config: Config,
    registry: TemplateRegistry,
    renderer: Renderer,
    params: TemplateParams,
}

impl Builder {
    /// Create a new builder.
    #[must_use]
    pub fn new(config: Config, registry: TemplateRegistry) -> Self {
        let renderer = Renderer::from_config(&config);
        let params = TemplateParams::from_config(&config);
        Self {
            config,
            registry,
            renderer,
            params,
        }
    }

    /// Use a different renderer.
    #[must_use]
    pub fn with_renderer(mut self, renderer: Renderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Use different template parameters.
    #[must_use]
    pub fn with_params(mut self, params: TemplateParams) -> Self {
        self.params = params;
        self
    }

    /// Output directory.
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.config.output_dir()
    }

    /// Execute the full build process.
    pub fn build(&self) -> Result<BuildReport> {
        let start = Instant::now();
        let output_dir = self.output_dir();

        info!(
            output = %output_dir.display(),
            templates = self.registry.len(),
            "starting build"
        );

        self.prepare_output(&output_dir)?;

        let (planned, shadowed) = self.plan(&output_dir);

        let (assets, writes) = rayon::join(
            || self.copy_assets(),
            || self.write_documents(&planned),
        );

        let report = BuildReport {
            writes,
            assets,
            shadowed,
            duration_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        };

        if report.is_success() {
            info!(
                written = report.written(),
                assets = report.assets_copied(),
                duration_ms = report.duration_ms,
                "build complete"
            );
        } else {
            warn!(
                written = report.written(),
                failed = report.failures().len(),
                duration_ms = report.duration_ms,
                "build finished with failures"
            );
        }

        Ok(report)
    }

    /// Clean (if configured) and create the output directory.
    fn prepare_output(&self, output_dir: &Path) -> Result<()> {
        if self.config.build.clean && output_dir.exists() {
            if is_unsafe_to_clean(output_dir) {
                return Err(BuildError::Config(format!(
                    "refusing to clean output directory {}",
                    output_dir.display()
                )));
            }
            debug!(dir = %output_dir.display(), "cleaning output directory");
            fs::remove_dir_all(output_dir)?;
        }
        fs::create_dir_all(output_dir)?;
        Ok(())
    }

    /// Map registry entries to output paths; the last entry for a path wins.
    fn plan<'a>(&'a self, output_dir: &Path) -> (Vec<PlannedWrite<'a>>, Vec<ShadowedEntry>) {
        let mut planned: Vec<Option<PlannedWrite<'a>>> = Vec::with_capacity(self.registry.len());
        let mut by_path: HashMap<PathBuf, usize> = HashMap::new();
        let mut shadowed = Vec::new();

        for (key, unit) in self.registry.iter() {
            let path = unit.output_path(output_dir);

            let previous = by_path
                .insert(path.clone(), planned.len())
                .and_then(|i| planned[i].take());
            if let Some(prev) = previous {
                warn!(
                    key = prev.key,
                    by = key,
                    path = %path.display(),
                    "template output is overwritten by a later template"
                );
                shadowed.push(ShadowedEntry {
                    key: prev.key.to_string(),
                    by: key.to_string(),
                    path: path.clone(),
                });
            }

            planned.push(Some(PlannedWrite { key, unit, path }));
        }

        (planned.into_iter().flatten().collect(), shadowed)
    }

    /// Render and write all planned documents in parallel.
    fn write_documents(&self, planned: &[PlannedWrite<'_>]) -> Vec<WriteOutcome> {
        info!(count = planned.len(), "writing documents");

        planned
            .par_iter()
            .map(|entry| {
                let result = self.write_document(entry);
                if let Err(ref e) = result {
                    warn!(
                        template = entry.key,
                        path = %entry.path.display(),
                        error = %e,
                        "failed to write document"
                    );
                }
                WriteOutcome {
                    key: entry.key.to_string(),
                    name: entry.unit.name().to_string(),
                    path: entry.path.clone(),
                    result,
                }
            })
            .collect()
    }

    fn write_document(&self, entry: &PlannedWrite<'_>) -> Result<usize> {
        entry.unit.validate()?;
        let html = self.renderer.render(entry.unit, &self.params)?;
        fs::write(&entry.path, &html)?;
        debug!(path = %entry.path.display(), bytes = html.len(), "wrote document");
        Ok(html.len())
    }

    /// Copy the asset directory, if one is configured.
    fn copy_assets(&self) -> Option<AssetOutcome> {
        let source = self.config.assets_dir()?;
        let dest = self.config.assets_dest();

        let result = AssetProcessor::new().process(&source, &dest);
        if let Err(ref e) = result {
            warn!(source = %source.display(), error = %e, "failed to copy assets");
        }

        Some(AssetOutcome {
            source,
            dest,
            result,
        })
    }
}

/// The filesystem root and the working directory are never wiped.
fn is_unsafe_to_clean(dir: &Path) -> bool {
    let Ok(resolved) = dir.canonicalize() else {
        return false;
    };
    let cwd = std::env::current_dir().ok().and_then(|d| d.canonicalize().ok());
    resolved.parent().is_none() || cwd.is_some_and(|cwd| cwd.starts_with(&resolved))
}

#[cfg(test)]
mod tests {
    use formgen_core::{Element, Node};
    use tempfile::TempDir;

    use super::*;
    use crate::{
        format::MarkupFormatter,
        render::{MarkupRenderer, RenderOptions},
    };

    #[derive(Debug)]
    struct EchoMarkup;

    impl MarkupRenderer for EchoMarkup {
        fn render(&self, tree: &Node, _: &RenderOptions) -> crate::render::Result<String> {
            Ok(tree.text_content())
        }
    }

    #[derive(Debug)]
    struct Passthrough;

    impl MarkupFormatter for Passthrough {
        fn format(&self, markup: &str) -> crate::format::Result<String> {
            Ok(markup.to_string())
        }
    }

    fn fake_renderer() -> Renderer {
        Renderer::new()
            .with_markup_renderer(EchoMarkup)
            .with_formatter(Passthrough)
    }

    fn first(_: &TemplateParams) -> Node {
        Element::new("p").text("first").into()
    }

    fn second(_: &TemplateParams) -> Node {
        Element::new("p").text("second").into()
    }

    fn link(params: &TemplateParams) -> Node {
        Element::new("a").attr("href", &params.url).text(&params.url).into()
    }

    fn test_config(root: &Path) -> Config {
        let mut config = Config::default();
        config.build.output_dir = root.join("out").to_string_lossy().to_string();
        config.build.assets_dir = None;
        config
    }

    #[test]
    fn test_build_writes_every_template() {
        let dir = TempDir::new().unwrap();
        let registry = TemplateRegistry::new()
            .with("one", TemplateUnit::new("one", first))
            .with("two", TemplateUnit::new("two", second));

        let builder = Builder::new(test_config(dir.path()), registry).with_renderer(fake_renderer());
        let report = builder.build().unwrap();

        assert!(report.is_success());
        assert_eq!(report.written(), 2);
        assert!(report.assets.is_none());
        assert_eq!(report.writes[0].key, "one");
        assert_eq!(report.writes[1].key, "two");

        let out = dir.path().join("out");
        assert_eq!(fs::read_to_string(out.join("one.html")).unwrap(), "first");
        assert_eq!(fs::read_to_string(out.join("two.html")).unwrap(), "second");
    }

    #[test]
    fn test_build_uses_params() {
        let dir = TempDir::new().unwrap();
        let registry = TemplateRegistry::new().with("link", TemplateUnit::new("link", link));

        let builder = Builder::new(test_config(dir.path()), registry)
            .with_renderer(fake_renderer())
            .with_params(TemplateParams::default().with_url("https://forms.test"));
        builder.build().unwrap();

        let html = fs::read_to_string(dir.path().join("out/link.html")).unwrap();
        assert_eq!(html, "https://forms.test");
    }

    #[test]
    fn test_colliding_names_last_write_wins() {
        let dir = TempDir::new().unwrap();
        let registry = TemplateRegistry::new()
            .with("a", TemplateUnit::new("doc", first))
            .with("b", TemplateUnit::new("other", first))
            .with("c", TemplateUnit::new("doc", second));

        let builder = Builder::new(test_config(dir.path()), registry).with_renderer(fake_renderer());
        let report = builder.build().unwrap();

        assert!(report.is_success());
        assert_eq!(report.writes.len(), 2);
        assert_eq!(report.shadowed.len(), 1);
        assert_eq!(report.shadowed[0].key, "a");
        assert_eq!(report.shadowed[0].by, "c");

        let html = fs::read_to_string(dir.path().join("out/doc.html")).unwrap();
        assert_eq!(html, "second");
    }

    #[test]
    fn test_invalid_name_is_reported_not_fatal() {
        let dir = TempDir::new().unwrap();
        let registry = TemplateRegistry::new()
            .with("bad", TemplateUnit::new("../escape", first))
            .with("good", TemplateUnit::new("good", second));

        let builder = Builder::new(test_config(dir.path()), registry).with_renderer(fake_renderer());
        let report = builder.build().unwrap();

        assert!(!report.is_success());
        assert_eq!(report.written(), 1);
        let failed: Vec<_> = report.failed_writes().map(|w| w.key.as_str()).collect();
        assert_eq!(failed, vec!["bad"]);
        assert!(matches!(
            report.writes[0].result,
            Err(BuildError::Template(TemplateError::InvalidName(_)))
        ));
        assert!(!dir.path().join("escape.html").exists());
    }

    #[test]
    fn test_format_failure_is_reported() {
        #[derive(Debug)]
        struct Reject;

        impl MarkupFormatter for Reject {
            fn format(&self, _: &str) -> crate::format::Result<String> {
                Err(crate::format::FormatError::Unclosed("p".to_string()))
            }
        }

        let dir = TempDir::new().unwrap();
        let registry = TemplateRegistry::new().with("one", TemplateUnit::new("one", first));
        let renderer = Renderer::new().with_formatter(Reject);

        let report = Builder::new(test_config(dir.path()), registry)
            .with_renderer(renderer)
            .build()
            .unwrap();

        assert!(!report.is_success());
        assert_eq!(report.failures().len(), 1);
        assert!(report.failures()[0].contains("one"));
        assert!(!dir.path().join("out/one.html").exists());
    }

    #[test]
    fn test_missing_assets_still_writes_documents() {
        let dir = TempDir::new().unwrap();
        let mut config = test_config(dir.path());
        config.build.assets_dir = Some(dir.path().join("nope").to_string_lossy().to_string());

        let registry = TemplateRegistry::new().with("one", TemplateUnit::new("one", first));
        let report = Builder::new(config, registry)
            .with_renderer(fake_renderer())
            .build()
            .unwrap();

        assert!(!report.is_success());
        assert_eq!(report.written(), 1);
        assert!(dir.path().join("out/one.html").exists());
        let assets = report.assets.as_ref().unwrap();
        assert!(matches!(assets.result, Err(AssetError::MissingSource(_))));
        assert!(report.failures().iter().any(|f| f.starts_with("assets")));
    }

    #[test]
    fn test_assets_copied_into_output() {
        let dir = TempDir::new().unwrap();
        let fonts = dir.path().join("fonts-src");
        fs::create_dir_all(&fonts).unwrap();
        fs::write(fonts.join("Inter-Regular.ttf"), b"ttf").unwrap();

        let mut config = test_config(dir.path());
        config.build.assets_dir = Some(fonts.to_string_lossy().to_string());

        let report = Builder::new(config, TemplateRegistry::new())
            .with_renderer(fake_renderer())
            .build()
            .unwrap();

        assert!(report.is_success());
        assert_eq!(report.assets_copied(), 1);
        assert!(dir.path().join("out/fonts/Inter-Regular.ttf").exists());
    }

    #[test]
    fn test_hidden_assets_mirrored() {
        let dir = TempDir::new().unwrap();
        let fonts = dir.path().join("fonts-src");
        fs::create_dir_all(fonts.join(".variable")).unwrap();
        fs::write(fonts.join("Inter.ttf"), b"regular").unwrap();
        fs::write(fonts.join(".Inter-Italic.ttf"), b"italic").unwrap();
        fs::write(fonts.join(".variable/Inter-VF.ttf"), b"vf").unwrap();

        let mut config = test_config(dir.path());
        config.build.assets_dir = Some(fonts.to_string_lossy().to_string());

        let report = Builder::new(config, TemplateRegistry::new())
            .with_renderer(fake_renderer())
            .build()
            .unwrap();

        assert!(report.is_success());
        assert_eq!(report.assets_copied(), 3);
        let out = dir.path().join("out/fonts");
        assert_eq!(fs::read(out.join(".Inter-Italic.ttf")).unwrap(), b"italic");
        assert_eq!(fs::read(out.join(".variable/Inter-VF.ttf")).unwrap(), b"vf");
    }

    #[test]
    fn test_clean_removes_stale_files() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        fs::create_dir_all(&out).unwrap();
        fs::write(out.join("stale.html"), "old").unwrap();

        let registry = TemplateRegistry::new().with("one", TemplateUnit::new("one", first));
        Builder::new(test_config(dir.path()), registry.clone())
            .with_renderer(fake_renderer())
            .build()
            .unwrap();
        assert!(!out.join("stale.html").exists());

        fs::write(out.join("stale.html"), "old").unwrap();
        let mut config = test_config(dir.path());
        config.build.clean = false;
        Builder::new(config, registry)
            .with_renderer(fake_renderer())
            .build()
            .unwrap();
        assert!(out.join("stale.html").exists());
    }

    #[test]
    fn test_write_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let registry = TemplateRegistry::new().with("one", TemplateUnit::new("one", first));
        let mut config = test_config(dir.path());
        config.build.clean = false;

        // A directory where the document should go makes the write fail.
        fs::create_dir_all(dir.path().join("out/one.html")).unwrap();

        let report = Builder::new(config, registry)
            .with_renderer(fake_renderer())
            .build()
            .unwrap();

        assert!(!report.is_success());
        assert!(matches!(report.writes[0].result, Err(BuildError::Io(_))));
    }

    #[test]
    fn test_build_report_default() {
        let report = BuildReport::default();
        assert!(report.is_success());
        assert_eq!(report.written(), 0);
        assert_eq!(report.assets_copied(), 0);
        assert!(report.failures().is_empty());
    }
}
