//! Prefab name resolution.
//!
//! Spawners name their prefabs loosely (`"apple"`), while the scene names
//! nodes precisely (`"apple_01"`). Resolution turns the requested names into
//! concrete template entities once, at startup:
//!
//! 1. Flatten the scene graph depth-first, root first, children in order.
//! 2. For each requested name, look for a node with exactly that name.
//! 3. Otherwise take the first node whose name contains the requested name, or
//!    whose prefix before the first `_` is contained in the requested name.
//! 4. Names that match nothing are skipped with a warning.
//!
//! Order and repetitions of the requested names are kept, so listing a name
//! twice makes it twice as likely to be picked.
//!
//! Traversal uses an explicit stack with a visited set and a depth cap; a
//! malformed hierarchy with cycles cannot hang or overflow it.

use std::hash::Hash;

use bevy_ecs::hierarchy::{ChildOf, Children};
use bevy_ecs::prelude::*;
use fastrand::Rng;
use log::{info, warn};
use rustc_hash::FxHashSet;

use crate::components::nodename::{NodeName, SceneRoot};
use crate::components::spawner::Spawner;

/// Deepest level visited when walking a scene graph.
pub const MAX_SCENE_DEPTH: usize = 256;

/// Outcome of resolving a list of names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution<N> {
    /// Matched nodes, in request order.
    pub targets: Vec<N>,
    /// Requested names that matched nothing.
    pub unresolved: Vec<String>,
}

/// Depth-first pre-order walk from `root`.
///
/// Each node is visited at most once and nothing deeper than
/// [`MAX_SCENE_DEPTH`] is expanded.
pub fn flatten_depth_first<N, F, I>(root: N, mut children: F) -> Vec<N>
where
    N: Copy + Eq + Hash,
    F: FnMut(N) -> I,
    I: IntoIterator<Item = N>,
{
    let mut order = Vec::new();
    let mut visited: FxHashSet<N> = FxHashSet::default();
    let mut stack: Vec<(N, usize)> = vec![(root, 0)];

    while let Some((node, depth)) = stack.pop() {
        if !visited.insert(node) {
            continue;
        }
        order.push(node);
        if depth >= MAX_SCENE_DEPTH {
            continue;
        }
        let kids: Vec<N> = children(node).into_iter().collect();
        // Reversed so the first child is popped first
        for child in kids.into_iter().rev() {
            if !visited.contains(&child) {
                stack.push((child, depth + 1));
            }
        }
    }
    order
}

/// Loose name match used when no node carries the exact requested name.
///
/// True if `node_name` contains `requested`, or if `requested` contains the
/// part of `node_name` before its first underscore. An empty prefix never
/// matches.
pub fn fuzzy_matches(requested: &str, node_name: &str) -> bool {
    if node_name.contains(requested) {
        return true;
    }
    let prefix = node_name.split('_').next().unwrap_or(node_name);
    !prefix.is_empty() && requested.contains(prefix)
}

/// Resolve `names` against flattened `(node, name)` pairs.
pub fn resolve_targets<N, S>(names: &[S], nodes: &[(N, &str)]) -> Resolution<N>
where
    N: Copy,
    S: AsRef<str>,
{
    let mut targets = Vec::with_capacity(names.len());
    let mut unresolved = Vec::new();

    for requested in names.iter().map(AsRef::as_ref) {
        if requested.is_empty() {
            warn!("prefab resolver: empty name skipped");
            unresolved.push(String::new());
            continue;
        }
        let exact = nodes.iter().find(|(_, name)| *name == requested);
        let found = exact.or_else(|| nodes.iter().find(|(_, name)| fuzzy_matches(requested, name)));
        match found {
            Some((node, _)) => targets.push(*node),
            None => {
                warn!("prefab resolver: no node matches '{}'", requested);
                unresolved.push(requested.to_string());
            }
        }
    }

    Resolution {
        targets,
        unresolved,
    }
}

/// Pick a uniformly random target. `None` when there is nothing to pick.
pub fn pick_target<N: Copy>(targets: &[N], rng: &mut Rng) -> Option<N> {
    if targets.is_empty() {
        return None;
    }
    Some(targets[rng.usize(0..targets.len())])
}

/// Named nodes of the scene in traversal order.
///
/// Starts at the first [`SceneRoot`]; without one, every parentless entity is
/// a root, taken in spawn order.
pub fn flatten_scene(
    scene_roots: &Query<Entity, With<SceneRoot>>,
    orphans: &Query<Entity, Without<ChildOf>>,
    children: &Query<&Children>,
    names: &Query<&NodeName>,
) -> Vec<(Entity, String)> {
    let mut roots: Vec<Entity> = match scene_roots.iter().next() {
        Some(root) => vec![root],
        None => {
            let mut all: Vec<Entity> = orphans.iter().collect();
            all.sort_by_key(|e| e.index());
            all
        }
    };
    roots.dedup();

    let mut seen: FxHashSet<Entity> = FxHashSet::default();
    let mut nodes = Vec::new();
    for root in roots {
        let walked = flatten_depth_first(root, |e| {
            children
                .get(e)
                .map(|c| c.iter().collect::<Vec<Entity>>())
                .unwrap_or_default()
        });
        for entity in walked {
            if !seen.insert(entity) {
                continue;
            }
            if let Ok(name) = names.get(entity) {
                nodes.push((entity, name.0.clone()));
            }
        }
    }
    nodes
}

/// Resolve the target names of every spawner not resolved yet.
///
/// Runs every frame but only does work for new spawners, so in practice it
/// resolves once at startup.
pub fn resolve_spawner_targets(
    mut spawners: Query<(Entity, &mut Spawner)>,
    scene_roots: Query<Entity, With<SceneRoot>>,
    orphans: Query<Entity, Without<ChildOf>>,
    children: Query<&Children>,
    names: Query<&NodeName>,
) {
    if spawners.iter().all(|(_, s)| s.resolved) {
        return;
    }
    if scene_roots.is_empty() {
        warn!("prefab resolver: no SceneRoot, searching every top-level entity");
    }

    let owned = flatten_scene(&scene_roots, &orphans, &children, &names);
    let nodes: Vec<(Entity, &str)> = owned.iter().map(|(e, n)| (*e, n.as_str())).collect();

    for (entity, mut spawner) in spawners.iter_mut() {
        if spawner.resolved {
            continue;
        }
        let resolution = resolve_targets(&spawner.target_names, &nodes);
        info!(
            "spawner {:?}: resolved {}/{} prefab names",
            entity,
            resolution.targets.len(),
            spawner.target_names.len()
        );
        if resolution.targets.is_empty() {
            warn!("spawner {:?}: no prefab resolved, spawning disabled", entity);
        }
        spawner.targets = resolution.targets;
        spawner.resolved = true;
    }
}
