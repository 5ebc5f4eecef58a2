// Application state and orchestration logic.
//
// Owns both source rosters and the last generated batch, applies edits,
// runs the generator and mirrors every change into the store so the next
// invocation resumes where this one stopped.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use squadmix_core::{
    FranchiseInfo, GenerateError, GeneratedBatch, Generation, Player, Role, Roster, Source,
};

use crate::config::Config;
use crate::db::Store;
use crate::export::{self, ExportFormat};
use crate::franchises;

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state.
pub struct AppState {
    pub config: Config,
    pub store: Store,
    pub team_a: Roster,
    pub team_b: Roster,
    /// Last generated batch; empty until generation succeeds and after any
    /// roster edit.
    pub batch: GeneratedBatch,
    pub generated_at: Option<DateTime<Utc>>,
}

impl AppState {
    /// Build the state from whatever the store holds. Missing or malformed
    /// blobs fall back to empty rosters and no batch.
    pub fn load(config: Config, store: Store) -> Self {
        let team_a = store.load_roster(Source::A).unwrap_or_default();
        let team_b = store.load_roster(Source::B).unwrap_or_default();
        let batch = store.load_batch().unwrap_or_default();
        let generated_at = if batch.is_empty() {
            None
        } else {
            store.load_generated_at()
        };

        info!(
            "Restored state: {} has {} players, {} has {} players, {} generated teams",
            team_a.display_name(Source::A),
            team_a.len(),
            team_b.display_name(Source::B),
            team_b.len(),
            batch.len()
        );

        AppState {
            config,
            store,
            team_a,
            team_b,
            batch,
            generated_at,
        }
    }

    pub fn roster(&self, side: Source) -> &Roster {
        match side {
            Source::A => &self.team_a,
            Source::B => &self.team_b,
        }
    }

    fn roster_mut(&mut self, side: Source) -> &mut Roster {
        match side {
            Source::A => &mut self.team_a,
            Source::B => &mut self.team_b,
        }
    }

    // -----------------------------------------------------------------------
    // Roster editing
    // -----------------------------------------------------------------------

    pub fn add_player(&mut self, side: Source, name: &str, role: Role) -> Result<Player> {
        let player = self.roster_mut(side).add_player(name, role)?.clone();
        info!("Added {} ({}) to {}", player.name, player.role, side);
        self.roster_changed(side)?;
        Ok(player)
    }

    /// Remove the player at the zero-based `index` of `side`.
    pub fn remove_player(&mut self, side: Source, index: usize) -> Result<Player> {
        let player = self.roster_mut(side).remove_player(index)?;
        info!("Removed {} from {}", player.name, side);
        self.roster_changed(side)?;
        Ok(player)
    }

    /// Label `side` with a catalog franchise. A franchise already used by
    /// the other side is rejected.
    pub fn select_franchise(&mut self, side: Source, id: &str) -> Result<FranchiseInfo> {
        let Some(info) = franchises::find(id) else {
            bail!("unknown franchise `{id}`; run `squadmix franchises` to list them");
        };
        let taken = self
            .roster(side.other())
            .franchise
            .as_ref()
            .is_some_and(|other| other.id == info.id);
        if taken {
            bail!("{} is already selected for {}", info.name, side.other());
        }

        self.roster_mut(side).select_franchise(info.clone());
        info!("{} is now {}", side, info.name);
        self.roster_changed(side)?;
        Ok(info)
    }

    pub fn clear_roster(&mut self, side: Source) -> Result<()> {
        self.roster_mut(side).clear();
        info!("Cleared {}", side);
        self.roster_changed(side)
    }

    /// Forget the generated batch without touching the rosters.
    pub fn clear_batch(&mut self) -> Result<()> {
        self.batch = GeneratedBatch::default();
        self.generated_at = None;
        self.persist_batch()
    }

    fn roster_changed(&mut self, side: Source) -> Result<()> {
        self.store
            .save_roster(side, self.roster(side))
            .with_context(|| format!("failed to save {side}"))?;
        if !self.batch.is_empty() {
            info!("Discarding {} generated teams after roster edit", self.batch.len());
        }
        self.clear_batch()
    }

    fn persist_batch(&self) -> Result<()> {
        self.store
            .save_batch(&self.batch)
            .context("failed to save generated teams")?;
        self.store.save_generated_at(self.generated_at)
    }

    // -----------------------------------------------------------------------
    // Generation and export
    // -----------------------------------------------------------------------

    /// Generate a fresh batch, replacing the stored one. `seed` overrides the
    /// configured seed.
    pub async fn generate(&mut self, seed: Option<u64>) -> Result<&GeneratedBatch> {
        for side in Source::BOTH {
            let roster = self.roster(side);
            if !roster.is_complete() {
                return Err(GenerateError::IncompleteRoster {
                    side,
                    count: roster.len(),
                }
                .into());
            }
        }

        let seed = seed.or(self.config.generator.seed);
        let generation =
            generate_off_thread(self.team_a.clone(), self.team_b.clone(), seed).await?;
        info!(
            "Generated {} teams ({} structured, {} fallback after {} attempts)",
            generation.batch.len(),
            generation.stats.structured,
            generation.stats.fallback,
            generation.stats.fallback_attempts
        );

        self.batch = generation.batch;
        self.generated_at = Some(Utc::now());
        self.persist_batch()?;
        Ok(&self.batch)
    }

    /// Write the current batch to the configured export directory.
    pub fn export(&self, format: ExportFormat) -> Result<PathBuf> {
        export::write_export(Path::new(&self.config.export.dir), &self.batch, format)
    }
}

/// Run the generator on the blocking pool so callers on the runtime stay
/// responsive. Engine errors keep their type inside the returned error.
pub async fn generate_off_thread(a: Roster, b: Roster, seed: Option<u64>) -> Result<Generation> {
    let handle = tokio::task::spawn_blocking(move || squadmix_core::generate(&a, &b, seed));
    match handle.await {
        Ok(result) => Ok(result?),
        Err(e) => {
            warn!("Generation task failed: {}", e);
            Err(GenerateError::Computation(e.to_string()).into())
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
