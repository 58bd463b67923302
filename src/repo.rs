//! Task and category repositories.
//!
//! Each repository exclusively owns its collection and writes the whole
//! collection back through the shared `Persistence` after every successful
//! mutation. Operations on an unknown id are silent no-ops that return `false`;
//! they never raise and never write.

use std::rc::Rc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::category::{Category, CategoryDraft, CategoryPatch};
use crate::ids::IdGenerator;
use crate::store::Persistence;
use crate::task::{normalise_tags, Task, TaskDraft, TaskPatch};

/// Owns the task collection in insertion order.
#[derive(Debug)]
pub struct TaskRepository {
    tasks: Vec<Task>,
    ids: IdGenerator,
    storage: Rc<Persistence>,
}

impl TaskRepository {
    /// Load the stored tasks. Tags of loaded tasks are re-normalised.
    pub fn load(storage: Rc<Persistence>) -> Self {
        let mut tasks = storage.load_tasks();
        for t in tasks.iter_mut() {
            t.tags = normalise_tags(&t.tags);
        }
        let ids = IdGenerator::seeded(tasks.iter().map(|t| t.id));
        TaskRepository { tasks, ids, storage }
    }

    pub fn all(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Append a new task and return its id.
    ///
    /// Title non-emptiness is the caller's responsibility.
    pub fn create(&mut self, draft: TaskDraft) -> u64 {
        let tasks = &self.tasks;
        let id = self.ids.next_free(|id| tasks.iter().any(|t| t.id == id));
        let task = draft.into_task(id, Utc::now());
        debug!(id, title = %task.title, "task created");
        self.tasks.push(task);
        self.save();
        id
    }

    /// Flip the completion flag. Returns `false` if the id is unknown.
    pub fn toggle(&mut self, id: u64) -> bool {
        let Some(t) = self.get_mut(id) else {
            return false;
        };
        t.completed = !t.completed;
        debug!(id, completed = t.completed, "task toggled");
        self.save();
        true
    }

    /// Merge `patch` onto the task. `id` and `created_at` never change.
    /// Returns `false` if the id is unknown.
    pub fn update(&mut self, id: u64, patch: TaskPatch) -> bool {
        let Some(t) = self.get_mut(id) else {
            return false;
        };
        patch.apply_to(t);
        debug!(id, "task updated");
        self.save();
        true
    }

    /// Remove the task. Returns `false` if the id is unknown.
    pub fn delete(&mut self, id: u64) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return false;
        }
        debug!(id, "task deleted");
        self.save();
        true
    }

    fn get_mut(&mut self, id: u64) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    fn save(&self) {
        if let Err(e) = self.storage.save_tasks(&self.tasks) {
            warn!(error = %e, "failed to save tasks");
        }
    }
}

/// Owns the category collection in insertion order.
///
/// Renaming or deleting a category does not touch tasks that reference it by
/// name; those keep the old string.
#[derive(Debug)]
pub struct CategoryRepository {
    categories: Vec<Category>,
    ids: IdGenerator,
    storage: Rc<Persistence>,
}

impl CategoryRepository {
    pub fn load(storage: Rc<Persistence>) -> Self {
        let categories = storage.load_categories();
        let ids = IdGenerator::seeded(categories.iter().map(|c| c.id));
        CategoryRepository {
            categories,
            ids,
            storage,
        }
    }

    pub fn all(&self) -> &[Category] {
        &self.categories
    }

    pub fn get(&self, id: u64) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn create(&mut self, draft: CategoryDraft) -> u64 {
        let categories = &self.categories;
        let id = self.ids.next_free(|id| categories.iter().any(|c| c.id == id));
        let category = draft.into_category(id);
        debug!(id, name = %category.name, "category created");
        self.categories.push(category);
        self.save();
        id
    }

    pub fn update(&mut self, id: u64, patch: CategoryPatch) -> bool {
        let Some(c) = self.categories.iter_mut().find(|c| c.id == id) else {
            return false;
        };
        patch.apply_to(c);
        debug!(id, "category updated");
        self.save();
        true
    }

    pub fn delete(&mut self, id: u64) -> bool {
        let before = self.categories.len();
        self.categories.retain(|c| c.id != id);
        if self.categories.len() == before {
            return false;
        }
        debug!(id, "category deleted");
        self.save();
        true
    }

    fn save(&self) {
        if let Err(e) = self.storage.save_categories(&self.categories) {
            warn!(error = %e, "failed to save categories");
        }
    }
}
