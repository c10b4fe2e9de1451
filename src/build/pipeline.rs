use rayon::prelude::*;

use crate::{
    build::assemble::{CompositionGraph, assemble},
    build::compiler::{CompiledTrack, TrackCompiler},
    build::options::{BuildOptions, UnknownTrackPolicy},
    build::registry::SourceRegistry,
    build::validate::{validate_graph, validate_track_ids, validate_tracks},
    foundation::error::{StageContext as _, WeaveError, WeaveResult},
    metadata::catalog::MediaCatalog,
    metadata::document::{MetadataDocument, TimelineInfo, Track},
    metadata::files::ExistenceChecker,
    store::backend::MobStore,
};

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// A track left out of the composition under [`UnknownTrackPolicy::Skip`].
pub struct SkippedTrack {
    /// Track identifier.
    pub track_id: u32,
    /// Track name.
    pub name: String,
    /// Why it was dropped.
    pub reason: String,
}

#[derive(Clone, Debug, serde::Serialize)]
/// Outcome of a build.
pub struct BuildReport {
    /// The validated graph.
    pub graph: CompositionGraph,
    /// Tracks dropped from the composition.
    pub skipped_tracks: Vec<SkippedTrack>,
    /// Container size in bytes, once committed.
    pub bytes: Option<u64>,
}

/// Build and validate the composition graph of `doc` inside `store` without committing it.
///
/// Stages run in order: track id check, media catalog, existence check, source registry, track
/// compilation, assembly, validation. Failures up to the existence check return before `store`
/// is touched.
#[tracing::instrument(skip_all, fields(timeline = %doc.timeline.name))]
pub fn build_graph(
    doc: &MetadataDocument,
    store: &mut dyn MobStore,
    checker: &dyn ExistenceChecker,
    opts: &BuildOptions,
) -> WeaveResult<BuildReport> {
    validate_track_ids(&doc.tracks)?;
    let catalog = MediaCatalog::from_document(doc)?;
    tracing::info!(
        media = catalog.len(),
        total_frames = doc.timeline.total_frames,
        edit_rate = %doc.timeline.edit_rate,
        "media catalog built"
    );

    let missing = checker.missing(&catalog.files());
    if !missing.is_empty() {
        return Err(WeaveError::MissingSourceFiles(missing));
    }

    let registry =
        SourceRegistry::populate(&catalog, store, doc.timeline.edit_rate, opts.linkage)?;

    let (tracks, skipped_tracks) = compile_tracks(&doc.timeline, &doc.tracks, &registry, opts)?;
    validate_tracks(&tracks, &registry)?;

    let graph = assemble(store, &doc.timeline, tracks, &registry)?;
    validate_graph(&graph, store, &registry)?;

    Ok(BuildReport {
        graph,
        skipped_tracks,
        bytes: None,
    })
}

/// [`build_graph`] followed by a commit of `store`.
///
/// The commit only happens once the graph validated, so a failed build leaves no output behind.
pub fn build_and_commit(
    doc: &MetadataDocument,
    store: &mut dyn MobStore,
    checker: &dyn ExistenceChecker,
    opts: &BuildOptions,
) -> WeaveResult<BuildReport> {
    let mut report = build_graph(doc, store, checker, opts)?;
    let bytes = store.commit().stage("commit")?;
    tracing::info!(bytes, "composition committed");
    report.bytes = Some(bytes);
    Ok(report)
}

fn compile_tracks(
    timeline: &TimelineInfo,
    tracks: &[Track],
    registry: &SourceRegistry,
    opts: &BuildOptions,
) -> WeaveResult<(Vec<CompiledTrack>, Vec<SkippedTrack>)> {
    let mut compiler = TrackCompiler::new(registry);
    if opts.pad_to_timeline {
        compiler = compiler.pad_to(timeline.total_frames);
    }

    let results: Vec<WeaveResult<CompiledTrack>> = if opts.parallel_tracks {
        tracks.par_iter().map(|t| compiler.compile(t)).collect()
    } else {
        tracks.iter().map(|t| compiler.compile(t)).collect()
    };

    let mut compiled = Vec::with_capacity(tracks.len());
    let mut skipped = Vec::new();
    for (track, result) in tracks.iter().zip(results) {
        match result {
            Ok(c) => compiled.push(c),
            Err(e)
                if e.is_track_local() && opts.unknown_track_policy == UnknownTrackPolicy::Skip =>
            {
                tracing::warn!(
                    track_id = track.track_id,
                    name = %track.name,
                    "{e}; skipping track"
                );
                skipped.push(SkippedTrack {
                    track_id: track.track_id,
                    name: track.name.clone(),
                    reason: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        }
    }
    Ok((compiled, skipped))
}

#[cfg(test)]
#[path = "../../tests/unit/build/pipeline.rs"]
mod tests;
