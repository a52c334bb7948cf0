//! Deception manager module
//!
//! Plants decoy credential files ("honeypots") in plausible locations and
//! registers them with the integrity monitor so any access to a decoy is
//! itself a drift signal. Decoys are never deleted by the engine; they
//! persist until an operator removes them.

use crate::config::{ConfigError, DecoyCatalog};
use crate::constants::PASSWORD_TOKEN;
use crate::models::ObjectKind;
use crate::registry::Monitor;
use anyhow::Context;
use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Manages decoy templates, placement, and decoy-membership queries
#[derive(Debug)]
pub struct DeceptionManager {
    name_templates: Vec<String>,
    content_templates: Vec<String>,
    /// Resolved and verified destination directories
    place_candidates: Vec<PathBuf>,
    filler_tokens: Vec<String>,
    known_decoys: HashSet<PathBuf>,
}

impl DeceptionManager {
    /// Build a manager from a loaded catalog
    ///
    /// Placement candidates are resolved and verified as directories here;
    /// invalid candidates are dropped silently like watch-list paths. A
    /// catalog left with no usable section is a configuration error.
    pub fn new(
        catalog: DecoyCatalog,
        resolver: &crate::profile::PathResolver,
    ) -> Result<Self, ConfigError> {
        catalog.validate()?;

        let place_candidates: Vec<PathBuf> = catalog
            .places
            .iter()
            .filter_map(|candidate| {
                let resolved = resolver.resolve(candidate);
                if resolver.verify(&resolved, ObjectKind::Dir) {
                    Some(resolved)
                } else {
                    debug!(
                        "dropping decoy place candidate {}: failed verification",
                        resolved.display()
                    );
                    None
                }
            })
            .collect();

        if place_candidates.is_empty() {
            return Err(ConfigError::EmptySection("places"));
        }

        Ok(Self {
            name_templates: catalog.names,
            content_templates: catalog.contents,
            place_candidates,
            filler_tokens: catalog.fillers,
            known_decoys: HashSet::new(),
        })
    }

    /// Generate a plausible-looking fake credential
    ///
    /// Three components (random decimal, random hex, random filler token)
    /// joined with no separator in a shuffled order, so the shape defeats
    /// naive pattern-matching by an intruder inspecting the decoy.
    pub fn generate_fake_credential(&self) -> String {
        let mut rng = rand::thread_rng();

        let decimal = rng.gen_range(0..=crate::constants::CREDENTIAL_BOUND).to_string();
        let hex = format!("{:x}", rng.gen_range(0..=crate::constants::CREDENTIAL_BOUND));
        let filler = self
            .filler_tokens
            .choose(&mut rng)
            .cloned()
            .unwrap_or_default();

        let mut components = [decimal, hex, filler];
        components.shuffle(&mut rng);
        components.concat()
    }

    /// Substitute the password placeholder in a content template
    pub fn fill_template(&self, content: &str) -> String {
        content.replace(PASSWORD_TOKEN, &self.generate_fake_credential())
    }

    /// Write `count` decoys and register them with the monitor
    ///
    /// Each iteration draws a name, content template, and destination
    /// independently with replacement, so duplicates across iterations are
    /// possible. A write failure is fatal for the whole call: decoys
    /// already written stay on disk and in the known set, but nothing is
    /// registered with the monitor. On success the extended watch list is
    /// adopted via `set_valuables`, which rebases so fresh decoys get a
    /// real baseline instead of reporting as instant drift.
    pub fn place(
        &mut self,
        monitor: &mut dyn Monitor,
        count: usize,
    ) -> anyhow::Result<Vec<PathBuf>> {
        let mut placed = Vec::with_capacity(count);

        {
            let mut rng = rand::thread_rng();
            for _ in 0..count {
                let name = self
                    .name_templates
                    .choose(&mut rng)
                    .context("no decoy name templates")?
                    .clone();
                let content = self
                    .content_templates
                    .choose(&mut rng)
                    .context("no decoy content templates")?
                    .clone();
                let place = self
                    .place_candidates
                    .choose(&mut rng)
                    .context("no decoy place candidates")?
                    .clone();

                let full_path = place.join(&name);
                let filled = self.fill_template(&content);
                fs::write(&full_path, filled)
                    .with_context(|| format!("cannot write decoy {}", full_path.display()))?;

                debug!("placed decoy {}", full_path.display());
                self.known_decoys.insert(full_path.clone());
                placed.push(full_path);
            }
        }

        let mut valuables = monitor.valuables().clone();
        valuables.files.extend(placed.iter().cloned());
        monitor.set_valuables(valuables);

        info!("placed {} decoys", placed.len());
        Ok(placed)
    }

    /// Whether the path belongs to a planted decoy
    pub fn is_decoy(&self, path: &Path) -> bool {
        self.known_decoys.contains(path)
    }
}

impl crate::registry::Deceiver for DeceptionManager {
    fn place(&mut self, monitor: &mut dyn Monitor, count: usize) -> anyhow::Result<Vec<PathBuf>> {
        DeceptionManager::place(self, monitor, count)
    }

    fn is_decoy(&self, path: &Path) -> bool {
        DeceptionManager::is_decoy(self, path)
    }
}
