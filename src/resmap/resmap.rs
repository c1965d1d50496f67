//! ResMap - an ordered collection of resources with unique current ids.

use super::error::ResMapError;
use crate::patch::{compare_nodes, strategic_merge};
use crate::resid::{IdSet, ResId};
use crate::resource::{Behavior, Resource};
use crate::selector::Selector;
use crate::yaml::{Node, StructuredNode};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use tracing::{debug, trace, warn};

/// A resource handle shared between a collection and its shallow copies.
pub type ResourceRef = Rc<RefCell<Resource>>;

const ROLE_BINDING_KIND: &str = "RoleBinding";
const DOCUMENT_SEPARATOR: &str = "---\n";

/// ResMap is an insertion-ordered collection of resources.
///
/// No two resources in a ResMap share a current id. Original ids may
/// repeat.
///
/// Handles returned by queries are shared with the collection: mutating a
/// resource through one is visible to the collection and to every
/// [`ResMap::shallow_copy`]. Callers that change identifying fields
/// through a handle must keep current ids unique themselves.
#[derive(Debug, Default)]
pub struct ResMap {
    resources: Vec<ResourceRef>,
}

fn new_ref(resource: Resource) -> ResourceRef {
    Rc::new(RefCell::new(resource))
}

/// Takes a resource out of its handle, cloning if the handle is shared.
fn take_resource(handle: ResourceRef) -> Resource {
    match Rc::try_unwrap(handle) {
        Ok(cell) => cell.into_inner(),
        Err(shared) => shared.borrow().clone(),
    }
}

/// Finds the absorb target for `id`: a unique original-id match, else a
/// unique current-id match.
fn index_for_id(resources: &[Resource], id: &ResId) -> Result<Option<usize>, ResMapError> {
    let by_orig: Vec<usize> = positions(resources, |r| r.orig_id() == id);
    if by_orig.len() == 1 {
        return Ok(Some(by_orig[0]));
    }
    let by_cur: Vec<usize> = positions(resources, |r| r.cur_id() == id);
    match by_cur.len() {
        1 => Ok(Some(by_cur[0])),
        0 if by_orig.is_empty() => Ok(None),
        0 => Err(ResMapError::ambiguous(id, by_orig.len())),
        n => Err(ResMapError::ambiguous(id, n)),
    }
}

fn positions(resources: &[Resource], pred: impl Fn(&Resource) -> bool) -> Vec<usize> {
    resources
        .iter()
        .enumerate()
        .filter(|(_, r)| pred(r))
        .map(|(i, _)| i)
        .collect()
}

/// The payload with build annotations removed, as compared by the
/// equality checks.
fn comparable_node(resource: &Resource) -> Result<Node, ResMapError> {
    let mut copy = resource.clone();
    copy.remove_build_annotations()?;
    Ok(copy.into_node().into_node())
}

impl ResMap {
    pub fn new() -> Self {
        ResMap::default()
    }

    /// A collection holding just `resource`.
    pub fn from_resource(resource: Resource) -> Self {
        ResMap {
            resources: vec![new_ref(resource)],
        }
    }

    /// Builds a collection by appending each resource in turn.
    pub fn from_resources(resources: Vec<Resource>) -> Result<Self, ResMapError> {
        let mut m = ResMap::new();
        for r in resources {
            m.append(r)?;
        }
        Ok(m)
    }

    pub fn size(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Handles to every resource, in collection order.
    pub fn resources(&self) -> Vec<ResourceRef> {
        self.resources.clone()
    }

    /// Appends a resource. Fails if its current id is already present.
    pub fn append(&mut self, resource: Resource) -> Result<(), ResMapError> {
        let id = resource.cur_id().clone();
        if self.get_index_of_current_id(&id)?.is_some() {
            return Err(ResMapError::id_collision(&id));
        }
        trace!(id = %id, "appending resource");
        self.resources.push(new_ref(resource));
        Ok(())
    }

    /// Appends every resource of `other`.
    ///
    /// Either all resources are appended or, on the first current-id
    /// collision, none are.
    pub fn append_all(&mut self, other: ResMap) -> Result<(), ResMapError> {
        let mut seen: IdSet = self.all_ids().into_iter().collect();
        for r in &other.resources {
            let id = r.borrow().cur_id().clone();
            if !seen.insert(id.clone()) {
                return Err(ResMapError::id_collision(&id));
            }
        }
        trace!(count = other.size(), "appending resources");
        self.resources
            .extend(other.resources.into_iter().map(|r| new_ref(take_resource(r))));
        Ok(())
    }

    /// Appends, merges or replaces the resources of `other`.
    ///
    /// An incoming resource whose id matches an existing resource (by
    /// original id first, then by current id) must have behavior `Merge`
    /// or `Replace`; one without a match must not. The call is atomic: on
    /// error the collection is unchanged.
    pub fn absorb_all(&mut self, other: ResMap) -> Result<(), ResMapError> {
        let base_len = self.resources.len();
        let mut work: Vec<Resource> = self.resources.iter().map(|r| r.borrow().clone()).collect();
        let mut dirty = vec![false; base_len];

        for incoming in other.resources.into_iter().map(take_resource) {
            let id = incoming.cur_id().clone();
            match (index_for_id(&work, &id)?, incoming.behavior()) {
                (Some(i), Behavior::Merge) => {
                    debug!(id = %id, "merging resource");
                    work[i] = work[i].merged_with(&incoming)?;
                    if i < base_len {
                        dirty[i] = true;
                    }
                }
                (Some(i), Behavior::Replace) => {
                    if work
                        .iter()
                        .enumerate()
                        .any(|(j, r)| j != i && r.cur_id() == &id)
                    {
                        return Err(ResMapError::id_collision(&id));
                    }
                    debug!(id = %id, "replacing resource");
                    work[i] = incoming;
                    if i < base_len {
                        dirty[i] = true;
                    }
                }
                (Some(_), behavior @ (Behavior::Create | Behavior::Unspecified)) => {
                    return Err(ResMapError::BehaviorMismatch {
                        id,
                        behavior,
                        reason: "a resource with this id already exists; use merge or replace",
                    });
                }
                (None, behavior @ (Behavior::Merge | Behavior::Replace)) => {
                    return Err(ResMapError::BehaviorMismatch {
                        id,
                        behavior,
                        reason: "there is no existing resource to merge or replace",
                    });
                }
                (None, _) => {
                    trace!(id = %id, "absorbing new resource");
                    work.push(incoming);
                }
            }
        }

        for (i, resource) in work.into_iter().enumerate() {
            if i >= base_len {
                self.resources.push(new_ref(resource));
            } else if dirty[i] {
                *self.resources[i].borrow_mut() = resource;
            }
        }
        Ok(())
    }

    /// Serializes every resource, separated by `---` lines.
    pub fn as_yaml(&self) -> Result<String, ResMapError> {
        let docs = self
            .resources
            .iter()
            .map(|r| r.borrow().as_yaml())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(docs.join(DOCUMENT_SEPARATOR))
    }

    /// Returns the resource at `index`, or `None` when out of range.
    pub fn get_by_index(&self, index: usize) -> Option<ResourceRef> {
        self.resources.get(index).cloned()
    }

    /// Returns the position of the resource with current id `id`.
    ///
    /// `Ok(None)` when absent; an error if more than one resource matches.
    pub fn get_index_of_current_id(&self, id: &ResId) -> Result<Option<usize>, ResMapError> {
        let found: Vec<usize> = self
            .resources
            .iter()
            .enumerate()
            .filter(|(_, r)| r.borrow().cur_id() == id)
            .map(|(i, _)| i)
            .collect();
        match found.len() {
            0 => Ok(None),
            1 => Ok(Some(found[0])),
            n => Err(ResMapError::ambiguous(id, n)),
        }
    }

    pub fn get_matching_resources_by_current_id(
        &self,
        matches: impl Fn(&ResId) -> bool,
    ) -> Vec<ResourceRef> {
        self.filter(|r| matches(r.cur_id()))
    }

    pub fn get_matching_resources_by_original_id(
        &self,
        matches: impl Fn(&ResId) -> bool,
    ) -> Vec<ResourceRef> {
        self.filter(|r| matches(r.orig_id()))
    }

    /// Resources whose original or current id satisfies `matches`.
    pub fn get_matching_resources_by_any_id(
        &self,
        matches: impl Fn(&ResId) -> bool,
    ) -> Vec<ResourceRef> {
        self.filter(|r| matches(r.orig_id()) || matches(r.cur_id()))
    }

    pub fn get_by_current_id(&self, id: &ResId) -> Result<ResourceRef, ResMapError> {
        exactly_one(id, self.get_matching_resources_by_current_id(|x| x == id))
    }

    pub fn get_by_original_id(&self, id: &ResId) -> Result<ResourceRef, ResMapError> {
        exactly_one(id, self.get_matching_resources_by_original_id(|x| x == id))
    }

    /// Looks `id` up as an original id, then as a current id.
    pub fn get_by_id(&self, id: &ResId) -> Result<ResourceRef, ResMapError> {
        self.get_by_original_id(id)
            .or_else(|_| self.get_by_current_id(id))
    }

    /// Namespaceable resources keyed by current namespace; an empty
    /// namespace is grouped under `default`.
    pub fn grouped_by_current_namespace(&self) -> BTreeMap<String, Vec<ResourceRef>> {
        self.grouped_by(|r| r.cur_id())
    }

    /// Like [`ResMap::grouped_by_current_namespace`], by original namespace.
    pub fn grouped_by_original_namespace(&self) -> BTreeMap<String, Vec<ResourceRef>> {
        self.grouped_by(|r| r.orig_id())
    }

    /// Resources of cluster-scoped kinds.
    pub fn non_namespaceable(&self) -> Vec<ResourceRef> {
        self.filter(|r| r.cur_id().is_cluster_scoped())
    }

    /// Current ids of all resources, in order.
    pub fn all_ids(&self) -> Vec<ResId> {
        self.resources
            .iter()
            .map(|r| r.borrow().cur_id().clone())
            .collect()
    }

    /// Replaces the resource with the same current id, keeping its
    /// position, and returns that position.
    pub fn replace(&mut self, resource: Resource) -> Result<usize, ResMapError> {
        let id = resource.cur_id().clone();
        let index = self
            .get_index_of_current_id(&id)?
            .ok_or_else(|| ResMapError::not_found(&id))?;
        trace!(id = %id, index, "replacing resource");
        *self.resources[index].borrow_mut() = resource;
        Ok(index)
    }

    /// Removes the resource with current id `id`.
    pub fn remove(&mut self, id: &ResId) -> Result<(), ResMapError> {
        let index = self
            .get_index_of_current_id(id)?
            .ok_or_else(|| ResMapError::not_found(id))?;
        trace!(id = %id, "removing resource");
        self.resources.remove(index);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.resources.clear();
    }

    /// The resources `referrer` could refer to.
    ///
    /// A cluster-scoped referrer sees everything. Otherwise cluster-scoped
    /// resources and resources in the referrer's namespace are kept; a
    /// RoleBinding also sees the namespaces of its subjects. Handles are
    /// shared with `self`.
    pub fn subset_that_could_be_referenced_by_resource(
        &self,
        referrer: &Resource,
    ) -> Result<ResMap, ResMapError> {
        let referrer_id = referrer.cur_id();
        if referrer_id.is_cluster_scoped() {
            return Ok(self.shallow_copy());
        }
        let subject_namespaces = if referrer_id.gvk.kind == ROLE_BINDING_KIND {
            subject_namespaces(referrer.node())?
        } else {
            Vec::new()
        };
        let resources = self.filter(|candidate| {
            let id = candidate.cur_id();
            id.is_cluster_scoped()
                || id.is_ns_equals(referrer_id)
                || subject_namespaces
                    .iter()
                    .any(|ns| ns == id.effective_namespace())
        });
        Ok(ResMap { resources })
    }

    /// A new collection with independent copies of every resource.
    pub fn deep_copy(&self) -> ResMap {
        ResMap {
            resources: self
                .resources
                .iter()
                .map(|r| new_ref(r.borrow().clone()))
                .collect(),
        }
    }

    /// A new collection sharing every resource with `self`.
    pub fn shallow_copy(&self) -> ResMap {
        ResMap {
            resources: self.resources.clone(),
        }
    }

    /// Fails unless both collections hold the same resources, in any order.
    ///
    /// Resources are paired by current id and compared by content, ignoring
    /// build annotations.
    pub fn error_if_not_equal_sets(&self, other: &ResMap) -> Result<(), ResMapError> {
        if self.size() != other.size() {
            return Err(ResMapError::not_equal(format!(
                "{} resources != {} resources",
                self.size(),
                other.size()
            )));
        }
        for (i, mine) in self.resources.iter().enumerate() {
            let mine = mine.borrow();
            let theirs = other.get_by_current_id(mine.cur_id()).map_err(|e| {
                ResMapError::not_equal(format!("resource {} ({}): {}", i, mine.cur_id(), e))
            })?;
            let theirs = theirs.borrow();
            let comparison = compare_nodes(&comparable_node(&mine)?, &comparable_node(&theirs)?);
            if !comparison.is_same() {
                return Err(ResMapError::not_equal(format!(
                    "resource {} differs:\n{}",
                    mine.cur_id(),
                    comparison
                )));
            }
        }
        Ok(())
    }

    /// Fails unless both collections hold resources with the same content,
    /// in the same order. Build annotations are ignored.
    pub fn error_if_not_equal_lists(&self, other: &ResMap) -> Result<(), ResMapError> {
        if self.size() != other.size() {
            return Err(ResMapError::not_equal(format!(
                "{} resources != {} resources",
                self.size(),
                other.size()
            )));
        }
        for (i, (mine, theirs)) in self.resources.iter().zip(&other.resources).enumerate() {
            let (mine, theirs) = (mine.borrow(), theirs.borrow());
            let comparison = compare_nodes(&comparable_node(&mine)?, &comparable_node(&theirs)?);
            if !comparison.is_same() {
                return Err(ResMapError::not_equal(format!(
                    "resource {} ({} vs {}) differs:\n{}",
                    i,
                    mine.cur_id(),
                    theirs.cur_id(),
                    comparison
                )));
            }
        }
        Ok(())
    }

    /// Logs every resource at debug level.
    pub fn debug(&self, title: &str) {
        debug!("---------------------------- {} ----------------------------", title);
        for (i, r) in self.resources.iter().enumerate() {
            let r = r.borrow();
            match r.as_yaml() {
                Ok(yaml) => debug!(index = i, id = %r.cur_id(), "\n{}", yaml),
                Err(e) => debug!(index = i, id = %r.cur_id(), error = %e, "unprintable resource"),
            }
        }
    }

    /// Resources matched by `selector`.
    ///
    /// Name and namespace may match either the original or the current id;
    /// namespaces are compared in their effective form.
    pub fn select(&self, selector: &Selector) -> Result<Vec<ResourceRef>, ResMapError> {
        let compiled = selector.compile()?;
        let mut selected = Vec::new();
        for handle in &self.resources {
            let r = handle.borrow();
            let (orig, cur) = (r.orig_id(), r.cur_id());
            if !compiled.match_gvk(&cur.gvk) {
                continue;
            }
            if !compiled.match_name(&orig.name) && !compiled.match_name(&cur.name) {
                continue;
            }
            if !compiled.match_namespace(orig.effective_namespace())
                && !compiled.match_namespace(cur.effective_namespace())
            {
                continue;
            }
            if !r.node().matches_labels(compiled.labels())?
                || !r.node().matches_annotations(compiled.annotations())?
            {
                continue;
            }
            selected.push(Rc::clone(handle));
        }
        Ok(selected)
    }

    /// Copies of every payload, in order.
    pub fn to_node_slice(&self) -> Vec<Node> {
        self.resources
            .iter()
            .map(|r| r.borrow().node().node().clone())
            .collect()
    }

    /// Applies a strategic merge patch to every resource whose current id
    /// is in `targets`.
    ///
    /// The patch is adapted to each target's kind, name and namespace
    /// before merging, so identities never change. A target deleted by a
    /// `$patch: delete` directive leaves the collection. Fails without
    /// changes if any target id is absent.
    pub fn apply_sm_patch(&mut self, targets: &IdSet, patch: &Resource) -> Result<(), ResMapError> {
        for id in targets.iter() {
            if self.get_index_of_current_id(id)?.is_none() {
                return Err(ResMapError::not_found(id));
            }
        }
        let mut results = Vec::new();
        for (i, handle) in self.resources.iter().enumerate() {
            let r = handle.borrow();
            if !targets.contains(r.cur_id()) {
                continue;
            }
            let mut adapted = patch.node().copy();
            adapted.set_gvk(&r.cur_id().gvk)?;
            adapted.set_name(&r.cur_id().name)?;
            adapted.set_namespace(&r.cur_id().namespace)?;
            let patched = strategic_merge(r.node().node(), adapted.node())?;
            debug!(id = %r.cur_id(), deleted = patched.is_none(), "applied patch");
            results.push((i, patched));
        }
        for (i, patched) in results.iter_mut().rev() {
            match patched.take() {
                Some(node) => *self.resources[*i].borrow_mut().node_mut() = StructuredNode::from_node(node),
                None => {
                    self.resources.remove(*i);
                }
            }
        }
        Ok(())
    }

    /// Removes the build annotations from every resource. Resources whose
    /// metadata cannot be read are left alone.
    pub fn remove_id_annotations(&mut self) {
        for handle in &self.resources {
            let mut r = handle.borrow_mut();
            if let Err(e) = r.remove_build_annotations() {
                warn!(id = %r.cur_id(), error = %e, "cannot remove build annotations");
            }
        }
    }

    fn filter(&self, pred: impl Fn(&Resource) -> bool) -> Vec<ResourceRef> {
        self.resources
            .iter()
            .filter(|r| pred(&r.borrow()))
            .cloned()
            .collect()
    }

    fn grouped_by(&self, id_of: impl Fn(&Resource) -> &ResId) -> BTreeMap<String, Vec<ResourceRef>> {
        let mut groups: BTreeMap<String, Vec<ResourceRef>> = BTreeMap::new();
        for handle in &self.resources {
            let r = handle.borrow();
            let id = id_of(&r);
            if id.is_cluster_scoped() {
                continue;
            }
            groups
                .entry(id.effective_namespace().to_string())
                .or_default()
                .push(Rc::clone(handle));
        }
        groups
    }
}

fn exactly_one(id: &ResId, mut found: Vec<ResourceRef>) -> Result<ResourceRef, ResMapError> {
    if found.len() == 1 {
        if let Some(r) = found.pop() {
            return Ok(r);
        }
    }
    Err(ResMapError::for_count(id, found.len()))
}

/// Namespaces named by `subjects[].namespace`.
fn subject_namespaces(node: &StructuredNode) -> Result<Vec<String>, ResMapError> {
    let subjects = match node.get_slice("subjects") {
        Ok(subjects) => subjects,
        Err(e) if e.is_no_field() => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    Ok(subjects
        .iter()
        .filter_map(|s| s.as_map())
        .filter_map(|m| m.get("namespace"))
        .filter_map(|ns| ns.as_str())
        .filter(|ns| !ns.is_empty())
        .map(str::to_string)
        .collect())
}
