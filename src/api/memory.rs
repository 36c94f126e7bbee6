use super::{ApiError, CategoryApi, CreateCategory, UpdateCategory};
use crate::category::{CategoryId, CategoryNode, MAX_LEVEL, ROOT_LEVEL};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Backend {
    forest: Vec<CategoryNode>,
    in_use: HashSet<CategoryId>,
    fail_next: Option<u16>,
    fail_next_fetch: Option<u16>,
}

/// In-process category backend.
///
/// Behaves like the REST service: ids are assigned on create, blank names
/// and children below the deepest level are refused with 422, deletes
/// cascade, and categories marked with [`mark_in_use`](Self::mark_in_use)
/// refuse deletion with [`ApiError::InUse`]. Every call is counted so callers
/// can assert that rejected operations never reached the backend.
#[derive(Debug)]
pub struct MemoryCategoryApi {
    backend: Mutex<Backend>,
    next_id: AtomicU64,
    calls: AtomicUsize,
}

impl Default for MemoryCategoryApi {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl MemoryCategoryApi {
    pub fn new(forest: Vec<CategoryNode>) -> Self {
        Self {
            backend: Mutex::new(Backend {
                forest,
                ..Backend::default()
            }),
            next_id: AtomicU64::new(1000),
            calls: AtomicUsize::new(0),
        }
    }

    /// A small bookstore catalogue for `--demo`.
    pub fn with_sample_catalogue() -> Self {
        let mut fiction = CategoryNode::new("1", "Fiction", 1)
            .with_description("Novels, novellas and short stories")
            .with_children(vec![
                CategoryNode::new("11", "Fantasy", 2).with_children(vec![
                    CategoryNode::new("111", "Epic Fantasy", 3).with_children(vec![
                        CategoryNode::new("1111", "Sword & Sorcery", 4),
                    ]),
                    CategoryNode::new("112", "Urban Fantasy", 3),
                ]),
                CategoryNode::new("12", "Mystery", 2),
                CategoryNode::new("13", "Science Fiction", 2),
            ]);
        fiction.background_image = Some("https://cdn.example.com/covers/fiction.jpg".to_string());

        Self::new(vec![
            fiction,
            CategoryNode::new("2", "Non-Fiction", 1).with_children(vec![
                CategoryNode::new("21", "History", 2),
                CategoryNode::new("22", "Biography", 2),
            ]),
            CategoryNode::new("3", "Children's Books", 1).pinned(true),
            CategoryNode::new("4", "Comics & Graphic Novels", 1),
        ])
    }

    /// Make deletes of `id` fail as if books were still attached.
    pub fn mark_in_use(&self, id: impl Into<CategoryId>) {
        self.lock().in_use.insert(id.into());
    }

    /// Fail the next call with the given HTTP status.
    pub fn fail_next(&self, status: u16) {
        self.lock().fail_next = Some(status);
    }

    /// Fail the next `fetch_tree` only, letting mutations through.
    pub fn fail_next_fetch(&self, status: u16) {
        self.lock().fail_next_fetch = Some(status);
    }

    /// Number of calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The backend's current forest.
    pub fn snapshot(&self) -> Vec<CategoryNode> {
        self.lock().forest.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Backend> {
        // A panic while holding the lock cannot leave the forest half-edited:
        // every mutation below is a single push/retain/assignment.
        self.backend
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Count the call and take any injected failure.
    fn begin(&self) -> Result<MutexGuard<'_, Backend>, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut backend = self.lock();
        match backend.fail_next.take() {
            Some(status) => Err(ApiError::HttpStatus(status)),
            None => Ok(backend),
        }
    }
}

fn find_mut<'a>(nodes: &'a mut [CategoryNode], id: &CategoryId) -> Option<&'a mut CategoryNode> {
    for node in nodes {
        if &node.id == id {
            return Some(node);
        }
        if let Some(found) = find_mut(&mut node.children, id) {
            return Some(found);
        }
    }
    None
}

/// Remove `id` (and its subtree) wherever it sits. Returns the removed node.
fn remove(nodes: &mut Vec<CategoryNode>, id: &CategoryId) -> Option<CategoryNode> {
    if let Some(pos) = nodes.iter().position(|n| &n.id == id) {
        return Some(nodes.remove(pos));
    }
    nodes.iter_mut().find_map(|n| remove(&mut n.children, id))
}

fn subtree_ids(node: &CategoryNode, out: &mut Vec<CategoryId>) {
    out.push(node.id.clone());
    for child in &node.children {
        subtree_ids(child, out);
    }
}

impl CategoryApi for MemoryCategoryApi {
    async fn fetch_tree(&self) -> Result<Vec<CategoryNode>, ApiError> {
        let mut backend = self.begin()?;
        if let Some(status) = backend.fail_next_fetch.take() {
            return Err(ApiError::HttpStatus(status));
        }
        Ok(backend.forest.clone())
    }

    async fn create_category(&self, payload: CreateCategory) -> Result<CategoryNode, ApiError> {
        let mut backend = self.begin()?;
        if payload.name.trim().is_empty() {
            return Err(ApiError::HttpStatus(422));
        }
        let id = CategoryId::new(self.next_id.fetch_add(1, Ordering::SeqCst).to_string());

        let mut node = CategoryNode::new(id, payload.name, ROOT_LEVEL);
        node.description = payload.description;

        match payload.parent_id {
            Some(parent_id) => {
                let parent = find_mut(&mut backend.forest, &parent_id)
                    .ok_or(ApiError::HttpStatus(404))?;
                if parent.level >= MAX_LEVEL {
                    return Err(ApiError::HttpStatus(422));
                }
                node.level = parent.level + 1;
                parent.children.push(node.clone());
            }
            None => {
                node.background_image = payload.image;
                backend.forest.push(node.clone());
            }
        }
        Ok(node)
    }

    async fn update_category(
        &self,
        id: &CategoryId,
        payload: UpdateCategory,
    ) -> Result<(), ApiError> {
        let mut backend = self.begin()?;
        let node = find_mut(&mut backend.forest, id).ok_or(ApiError::HttpStatus(404))?;
        if payload.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(ApiError::HttpStatus(422));
        }

        if let Some(pinned) = payload.is_pinned {
            if !node.can_pin() {
                return Err(ApiError::HttpStatus(422));
            }
            node.is_pinned = pinned;
        }
        if let Some(name) = payload.name {
            node.name = name;
        }
        if let Some(description) = payload.description {
            node.description = Some(description).filter(|d| !d.is_empty());
        }
        if let Some(image) = payload.image {
            if node.accepts_image() {
                node.background_image = Some(image).filter(|i| !i.is_empty());
            }
        }
        Ok(())
    }

    async fn delete_category(&self, id: &CategoryId) -> Result<(), ApiError> {
        let mut backend = self.begin()?;

        let mut doomed = Vec::new();
        match crate::category::find_node(&backend.forest, id) {
            Some(node) => subtree_ids(node, &mut doomed),
            None => return Err(ApiError::HttpStatus(404)),
        }
        if doomed.iter().any(|d| backend.in_use.contains(d)) {
            return Err(ApiError::InUse);
        }

        remove(&mut backend.forest, id);
        Ok(())
    }
}
