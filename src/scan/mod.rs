//! Directory scans: name grouping, divergence detection, lookup and catalog
//!
//! A scan walks the tree once, extracts a dominant color per image (in
//! parallel unless disabled), and never aborts on a bad image: files that
//! fail extraction are logged and listed in [`ScanReport::skipped`]. Only a
//! missing or unreadable scan root is fatal.
//!
//! Output order is stable: groups sorted by name, members by path.

mod names;
mod walk;

pub use names::{read_name_list, read_names, NAME_COLUMN};
pub use walk::{category_path, collect_images, group_by_name, logical_name, NameGroup};

use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::{PipelineConfig, ScanConfig};
use crate::extraction::{ColorExtractionStrategy, ColorSample};
use crate::matching::{ColorDivergence, ColorMatcher};
use crate::Result;

/// A file that could not be analyzed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Scan results with bookkeeping
#[derive(Debug, Clone, PartialEq)]
pub struct ScanReport<T> {
    pub entries: Vec<T>,
    /// Number of images extraction was attempted on
    pub scanned: usize,
    pub skipped: Vec<SkippedFile>,
}

impl<T> ScanReport<T> {
    /// Number of images extracted successfully
    pub fn succeeded(&self) -> usize {
        self.scanned - self.skipped.len()
    }
}

/// One image of a reported group, with its category path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMember {
    pub group_name: String,
    pub sample: ColorSample,
    pub category: String,
}

/// One image of a directory catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// File stem as written on disk
    pub name: String,
    pub sample: ColorSample,
}

/// Extracted samples of one name group
struct ExtractedGroup {
    name: String,
    samples: Vec<ColorSample>,
}

/// Scans directory trees with one extraction strategy and one matcher
pub struct ColorScanner {
    strategy: Box<dyn ColorExtractionStrategy>,
    matcher: ColorMatcher,
    config: ScanConfig,
}

impl ColorScanner {
    pub fn new(
        strategy: Box<dyn ColorExtractionStrategy>,
        matcher: ColorMatcher,
        config: ScanConfig,
    ) -> Self {
        Self {
            strategy,
            matcher,
            config,
        }
    }

    /// Build a scanner from a pipeline configuration
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(
            config.strategy.build(config),
            ColorMatcher::from_config(&config.matching),
            config.scan.clone(),
        )
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    pub fn matcher(&self) -> &ColorMatcher {
        &self.matcher
    }

    /// Find same-named images whose colors diverge
    ///
    /// Every unordered pair of successfully extracted members of a group is
    /// compared; each non-matching pair yields one [`ColorDivergence`].
    /// Groups with fewer than two members are ignored.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::DirectoryError` if `root` cannot be scanned
    pub fn group_and_compare(&self, root: &Path) -> Result<ScanReport<ColorDivergence>> {
        let (groups, scanned, skipped) = self.extract_groups(root)?;

        let mut divergences = Vec::new();
        for group in &groups {
            divergences.extend(self.divergent_pairs(root, group));
        }

        info!(
            root = %root.display(),
            scanned,
            skipped = skipped.len(),
            divergences = divergences.len(),
            "comparison complete"
        );

        Ok(ScanReport {
            entries: divergences,
            scanned,
            skipped,
        })
    }

    /// Every member of every group with at least one divergent pair
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::DirectoryError` if `root` cannot be scanned
    pub fn collect_divergent_groups(&self, root: &Path) -> Result<ScanReport<GroupMember>> {
        let (groups, scanned, skipped) = self.extract_groups(root)?;

        let mut members = Vec::new();
        let mut divergent_groups = 0;
        for group in groups {
            if self.divergent_pairs(root, &group).is_empty() {
                continue;
            }
            divergent_groups += 1;
            members.extend(group.samples.into_iter().map(|sample| GroupMember {
                category: category_path(root, &sample.path),
                group_name: group.name.clone(),
                sample,
            }));
        }

        info!(
            root = %root.display(),
            scanned,
            skipped = skipped.len(),
            groups = divergent_groups,
            members = members.len(),
            "divergent group collection complete"
        );

        Ok(ScanReport {
            entries: members,
            scanned,
            skipped,
        })
    }

    /// Every image whose name is in `names`, compared case-insensitively
    ///
    /// Reported names are upper-cased.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::DirectoryError` if `root` cannot be scanned
    pub fn lookup_named_colors(
        &self,
        root: &Path,
        names: &[String],
    ) -> Result<ScanReport<GroupMember>> {
        let wanted: HashSet<String> = names.iter().map(|n| n.trim().to_uppercase()).collect();

        let files: Vec<PathBuf> = collect_images(root, &self.config)?
            .into_iter()
            .filter(|path| wanted.contains(&logical_name(path, false)))
            .collect();

        let (samples, skipped) = self.extract_all(&files);
        let scanned = files.len();

        let members: Vec<GroupMember> = samples
            .into_iter()
            .map(|sample| GroupMember {
                group_name: logical_name(&sample.path, false),
                category: category_path(root, &sample.path),
                sample,
            })
            .collect();

        info!(
            root = %root.display(),
            names = wanted.len(),
            found = members.len(),
            skipped = skipped.len(),
            "name lookup complete"
        );

        Ok(ScanReport {
            entries: members,
            scanned,
            skipped,
        })
    }

    /// Dominant color of every image under `root`
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::DirectoryError` if `root` cannot be scanned
    pub fn catalog_directory(&self, root: &Path) -> Result<ScanReport<CatalogEntry>> {
        let files = collect_images(root, &self.config)?;
        let (samples, skipped) = self.extract_all(&files);

        let entries: Vec<CatalogEntry> = samples
            .into_iter()
            .map(|sample| CatalogEntry {
                name: logical_name(&sample.path, true),
                sample,
            })
            .collect();

        info!(
            root = %root.display(),
            scanned = files.len(),
            skipped = skipped.len(),
            "catalog complete"
        );

        Ok(ScanReport {
            entries,
            scanned: files.len(),
            skipped,
        })
    }

    /// Walk, group, and extract every member of comparable groups
    fn extract_groups(
        &self,
        root: &Path,
    ) -> Result<(Vec<ExtractedGroup>, usize, Vec<SkippedFile>)> {
        let files = collect_images(root, &self.config)?;
        let groups: Vec<NameGroup> = group_by_name(&files, self.config.case_sensitive)
            .into_iter()
            .filter(NameGroup::is_comparable)
            .collect();

        debug!(
            files = files.len(),
            groups = groups.len(),
            strategy = self.strategy.name(),
            "grouped images by name"
        );

        let paths: Vec<PathBuf> = groups.iter().flat_map(|g| g.paths.iter().cloned()).collect();
        let results = self.extract_each(&paths);

        let mut results = results.into_iter();
        let mut skipped = Vec::new();
        let mut extracted = Vec::with_capacity(groups.len());

        for group in groups {
            let mut samples = Vec::with_capacity(group.paths.len());
            for (path, result) in group.paths.iter().zip(results.by_ref()) {
                match result {
                    Ok(sample) => samples.push(sample),
                    Err(reason) => skipped.push(SkippedFile {
                        path: path.clone(),
                        reason,
                    }),
                }
            }
            extracted.push(ExtractedGroup {
                name: group.name,
                samples,
            });
        }

        Ok((extracted, paths.len(), skipped))
    }

    /// Divergences among the samples of one group, pairs in member order
    fn divergent_pairs(&self, root: &Path, group: &ExtractedGroup) -> Vec<ColorDivergence> {
        let mut pairs = Vec::new();
        for (i, a) in group.samples.iter().enumerate() {
            for b in &group.samples[i + 1..] {
                if self.matcher.samples_match(a, b) {
                    continue;
                }
                debug!(
                    group = %group.name,
                    a = %a.hex(),
                    b = %b.hex(),
                    distance = self.matcher.distance(a.rgb, b.rgb),
                    "color divergence"
                );
                pairs.push(ColorDivergence {
                    group_name: group.name.clone(),
                    sample_a: a.clone(),
                    sample_b: b.clone(),
                    category_a: category_path(root, &a.path),
                    category_b: category_path(root, &b.path),
                });
            }
        }
        pairs
    }

    /// Extract every file, splitting successes from skips
    fn extract_all(&self, paths: &[PathBuf]) -> (Vec<ColorSample>, Vec<SkippedFile>) {
        let mut samples = Vec::with_capacity(paths.len());
        let mut skipped = Vec::new();

        for (path, result) in paths.iter().zip(self.extract_each(paths)) {
            match result {
                Ok(sample) => samples.push(sample),
                Err(reason) => skipped.push(SkippedFile {
                    path: path.clone(),
                    reason,
                }),
            }
        }

        (samples, skipped)
    }

    /// Extract every file in input order, mapping failures to skip reasons
    fn extract_each(&self, paths: &[PathBuf]) -> Vec<std::result::Result<ColorSample, String>> {
        let extract = |path: &PathBuf| {
            self.strategy.extract_path(path).map_err(|e| {
                warn!(path = %path.display(), error = %e, "skipping image");
                e.skip_reason()
            })
        };

        if self.config.parallel {
            paths.par_iter().map(extract).collect()
        } else {
            paths.iter().map(extract).collect()
        }
    }
}
