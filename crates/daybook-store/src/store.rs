//! The Record Store surface the rest of the service programs against.
//!
//! All reads and writes are scoped to one owner; an implementation must
//! derive its partition from the owner so one user's query can never see
//! another user's records.

use crate::error::StoreError;
use daybook_domain::{Folder, RecordId, Schedule, Task, UserId, UserProfile};
use std::future::Future;

/// Partial update for a task. At least one field is expected to be set;
/// callers validate that before reaching the store.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.completed.is_none()
    }
}

/// Partial update for a schedule entry.
#[derive(Debug, Clone, Default)]
pub struct SchedulePatch {
    pub subject: Option<String>,
    pub time: Option<String>,
    pub date: Option<chrono::NaiveDate>,
}

impl SchedulePatch {
    pub fn is_empty(&self) -> bool {
        self.subject.is_none() && self.time.is_none() && self.date.is_none()
    }
}

pub trait RecordStore: Send + Sync + 'static {
    // Tasks
    fn list_tasks(&self, owner: &UserId)
        -> impl Future<Output = Result<Vec<Task>, StoreError>> + Send;
    fn put_task(&self, task: &Task) -> impl Future<Output = Result<(), StoreError>> + Send;
    fn update_task(
        &self,
        owner: &UserId,
        id: &RecordId,
        patch: TaskPatch,
    ) -> impl Future<Output = Result<Task, StoreError>> + Send;
    fn delete_task(
        &self,
        owner: &UserId,
        id: &RecordId,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    // Folders (notes travel embedded in their folder)
    fn list_folders(
        &self,
        owner: &UserId,
    ) -> impl Future<Output = Result<Vec<Folder>, StoreError>> + Send;
    fn get_folder(
        &self,
        owner: &UserId,
        id: &RecordId,
    ) -> impl Future<Output = Result<Folder, StoreError>> + Send;
    fn put_folder(&self, folder: &Folder) -> impl Future<Output = Result<(), StoreError>> + Send;
    fn delete_folder(
        &self,
        owner: &UserId,
        id: &RecordId,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    // Schedules
    fn list_schedules(
        &self,
        owner: &UserId,
    ) -> impl Future<Output = Result<Vec<Schedule>, StoreError>> + Send;
    fn put_schedule(
        &self,
        schedule: &Schedule,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
    fn update_schedule(
        &self,
        owner: &UserId,
        id: &RecordId,
        patch: SchedulePatch,
    ) -> impl Future<Output = Result<Schedule, StoreError>> + Send;
    fn delete_schedule(
        &self,
        owner: &UserId,
        id: &RecordId,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    // Profile
    fn get_profile(
        &self,
        owner: &UserId,
    ) -> impl Future<Output = Result<Option<UserProfile>, StoreError>> + Send;
    fn put_profile(
        &self,
        profile: &UserProfile,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}
