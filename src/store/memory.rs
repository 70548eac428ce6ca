//! # In-Memory Store
//!
//! The development and test backend: an id-ordered map behind a single
//! `parking_lot::RwLock`. Iteration order over the map is id order, which is
//! creation order, so listings are stable without extra sorting. Id counters
//! only ever increase; deleting a task never frees its id.
//!
//! The lock is never held across an await point.

use async_trait::async_trait;
use chrono::{Duration, NaiveTime, Utc};
use parking_lot::RwLock;
use std::collections::BTreeMap;

use crate::access::Caller;
use crate::models::{
    DeletedTask, Role, Task, TaskDraft, TaskPatch, TaskStatus, User, UserSummary,
};
use crate::quadrant::{self, Quadrant};
use crate::store::{StoreError, TaskStore};

#[derive(Debug)]
struct MemoryInner {
    tasks: BTreeMap<i64, Task>,
    users: BTreeMap<i64, User>,
    next_task_id: i64,
    next_user_id: i64,
}

/// Lock-protected in-memory backend.
#[derive(Debug)]
pub struct MemoryStore {
    inner: RwLock<MemoryInner>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryInner {
                tasks: BTreeMap::new(),
                users: BTreeMap::new(),
                next_task_id: 1,
                next_user_id: 1,
            }),
        }
    }

    /// Register a user and return the stored record. Intended for seeding
    /// from embedding code and tests; tokens are provisioned out of band in
    /// production setups.
    pub fn add_user(
        &self,
        nickname: impl Into<String>,
        email: impl Into<String>,
        role: Role,
        api_token: impl Into<String>,
    ) -> User {
        let mut inner = self.inner.write();
        let id = inner.next_user_id;
        inner.next_user_id += 1;

        let user = User {
            id,
            nickname: nickname.into(),
            email: email.into(),
            role,
            api_token: api_token.into(),
        };
        inner.users.insert(id, user.clone());
        user
    }

    fn collect_visible<F>(&self, caller: &Caller, keep: F) -> Vec<Task>
    where
        F: Fn(&Task) -> bool,
    {
        self.inner
            .read()
            .tasks
            .values()
            .filter(|task| caller.can_view(task) && keep(task))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn list_tasks(&self, caller: &Caller) -> Result<Vec<Task>, StoreError> {
        Ok(self.collect_visible(caller, |_| true))
    }

    async fn get_task(&self, caller: &Caller, id: i64) -> Result<Task, StoreError> {
        let inner = self.inner.read();
        inner
            .tasks
            .get(&id)
            .filter(|task| caller.can_view(task))
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn tasks_by_quadrant(
        &self,
        caller: &Caller,
        quadrant: Quadrant,
    ) -> Result<Vec<Task>, StoreError> {
        Ok(self.collect_visible(caller, |task| task.quadrant == quadrant))
    }

    async fn tasks_by_status(
        &self,
        caller: &Caller,
        status: TaskStatus,
    ) -> Result<Vec<Task>, StoreError> {
        Ok(self.collect_visible(caller, |task| task.status() == status))
    }

    async fn tasks_due_today(&self, caller: &Caller) -> Result<Vec<Task>, StoreError> {
        let day_start = Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc();
        let day_end = day_start + Duration::days(1);
        Ok(self.collect_visible(caller, |task| {
            task.deadline_at >= day_start && task.deadline_at < day_end
        }))
    }

    async fn search_tasks(&self, caller: &Caller, query: &str) -> Result<Vec<Task>, StoreError> {
        let needle = query.to_lowercase();
        Ok(self.collect_visible(caller, |task| {
            task.title.to_lowercase().contains(&needle)
                || task
                    .description
                    .as_ref()
                    .is_some_and(|description| description.to_lowercase().contains(&needle))
        }))
    }

    async fn create_task(&self, caller: &Caller, draft: TaskDraft) -> Result<Task, StoreError> {
        let mut inner = self.inner.write();
        let id = inner.next_task_id;
        inner.next_task_id += 1;

        let task = Task::from_draft(id, caller.user_id, draft, Utc::now());
        inner.tasks.insert(id, task.clone());
        Ok(task)
    }

    async fn update_task(
        &self,
        caller: &Caller,
        id: i64,
        patch: TaskPatch,
    ) -> Result<Task, StoreError> {
        let mut inner = self.inner.write();
        let task = inner
            .tasks
            .get_mut(&id)
            .filter(|task| caller.can_view(task))
            .ok_or(StoreError::NotFound)?;

        patch.apply(task);
        if patch.touches_classification() {
            task.quadrant = Quadrant::classify(
                task.is_important,
                quadrant::is_urgent(task.deadline_at, Utc::now()),
            );
        }
        Ok(task.clone())
    }

    async fn complete_task(&self, caller: &Caller, id: i64) -> Result<Task, StoreError> {
        let mut inner = self.inner.write();
        let task = inner
            .tasks
            .get_mut(&id)
            .filter(|task| caller.can_view(task))
            .ok_or(StoreError::NotFound)?;

        // Repeat completion keeps the original completed_at.
        if !task.completed {
            task.completed = true;
            task.completed_at = Some(Utc::now());
        }
        Ok(task.clone())
    }

    async fn delete_task(&self, caller: &Caller, id: i64) -> Result<DeletedTask, StoreError> {
        let mut inner = self.inner.write();
        let visible = inner
            .tasks
            .get(&id)
            .is_some_and(|task| caller.can_view(task));
        if !visible {
            return Err(StoreError::NotFound);
        }

        let task = inner.tasks.remove(&id).ok_or(StoreError::NotFound)?;
        Ok(DeletedTask {
            id: task.id,
            title: task.title,
        })
    }

    async fn find_user_by_token(&self, token: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read();
        Ok(inner
            .users
            .values()
            .find(|user| user.api_token == token)
            .cloned())
    }

    async fn list_users_with_counts(&self) -> Result<Vec<UserSummary>, StoreError> {
        let inner = self.inner.read();
        Ok(inner
            .users
            .values()
            .map(|user| UserSummary {
                id: user.id,
                nickname: user.nickname.clone(),
                email: user.email.clone(),
                role: user.role,
                tasks_count: inner
                    .tasks
                    .values()
                    .filter(|task| task.owner_id == user.id)
                    .count() as i64,
            })
            .collect())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
