//! In-memory Record Store for router tests and local development.

use crate::error::StoreError;
use crate::store::{RecordStore, SchedulePatch, TaskPatch};
use daybook_domain::{Folder, RecordId, Schedule, Task, UserId, UserProfile};
use std::collections::HashMap;
use std::sync::Mutex;

type Key = (String, String);

#[derive(Default)]
pub struct MemoryRecordStore {
    tasks: Mutex<HashMap<Key, Task>>,
    folders: Mutex<HashMap<Key, Folder>>,
    schedules: Mutex<HashMap<Key, Schedule>>,
    profiles: Mutex<HashMap<String, UserProfile>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(owner: &UserId, id: &RecordId) -> Key {
        (owner.as_str().to_string(), id.as_str().to_string())
    }

    fn list_for<T: Clone>(map: &Mutex<HashMap<Key, T>>, owner: &UserId) -> Vec<(String, T)> {
        let map = map.lock().unwrap();
        let mut items: Vec<(String, T)> = map
            .iter()
            .filter(|((o, _), _)| o == owner.as_str())
            .map(|((_, id), v)| (id.clone(), v.clone()))
            .collect();
        // ULIDs sort by creation instant, which stands in for insertion order.
        items.sort_by(|(a, _), (b, _)| a.cmp(b));
        items
    }
}

impl RecordStore for MemoryRecordStore {
    async fn list_tasks(&self, owner: &UserId) -> Result<Vec<Task>, StoreError> {
        Ok(Self::list_for(&self.tasks, owner)
            .into_iter()
            .map(|(_, t)| t)
            .collect())
    }

    async fn put_task(&self, task: &Task) -> Result<(), StoreError> {
        self.tasks
            .lock()
            .unwrap()
            .insert(Self::key(&task.owner, &task.id), task.clone());
        Ok(())
    }

    async fn update_task(
        &self,
        owner: &UserId,
        id: &RecordId,
        patch: TaskPatch,
    ) -> Result<Task, StoreError> {
        let mut tasks = self.tasks.lock().unwrap();
        let task = tasks
            .get_mut(&Self::key(owner, id))
            .ok_or(StoreError::NotFound)?;
        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(completed) = patch.completed {
            task.completed = completed;
        }
        Ok(task.clone())
    }

    async fn delete_task(&self, owner: &UserId, id: &RecordId) -> Result<(), StoreError> {
        self.tasks.lock().unwrap().remove(&Self::key(owner, id));
        Ok(())
    }

    async fn list_folders(&self, owner: &UserId) -> Result<Vec<Folder>, StoreError> {
        Ok(Self::list_for(&self.folders, owner)
            .into_iter()
            .map(|(_, f)| f)
            .collect())
    }

    async fn get_folder(&self, owner: &UserId, id: &RecordId) -> Result<Folder, StoreError> {
        self.folders
            .lock()
            .unwrap()
            .get(&Self::key(owner, id))
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn put_folder(&self, folder: &Folder) -> Result<(), StoreError> {
        self.folders
            .lock()
            .unwrap()
            .insert(Self::key(&folder.owner, &folder.id), folder.clone());
        Ok(())
    }

    async fn delete_folder(&self, owner: &UserId, id: &RecordId) -> Result<(), StoreError> {
        self.folders.lock().unwrap().remove(&Self::key(owner, id));
        Ok(())
    }

    async fn list_schedules(&self, owner: &UserId) -> Result<Vec<Schedule>, StoreError> {
        Ok(Self::list_for(&self.schedules, owner)
            .into_iter()
            .map(|(_, s)| s)
            .collect())
    }

    async fn put_schedule(&self, schedule: &Schedule) -> Result<(), StoreError> {
        self.schedules
            .lock()
            .unwrap()
            .insert(Self::key(&schedule.owner, &schedule.id), schedule.clone());
        Ok(())
    }

    async fn update_schedule(
        &self,
        owner: &UserId,
        id: &RecordId,
        patch: SchedulePatch,
    ) -> Result<Schedule, StoreError> {
        let mut schedules = self.schedules.lock().unwrap();
        let schedule = schedules
            .get_mut(&Self::key(owner, id))
            .ok_or(StoreError::NotFound)?;
        if let Some(subject) = patch.subject {
            schedule.subject = subject;
        }
        if let Some(time) = patch.time {
            schedule.time = time;
        }
        if let Some(date) = patch.date {
            schedule.date = date;
        }
        Ok(schedule.clone())
    }

    async fn delete_schedule(&self, owner: &UserId, id: &RecordId) -> Result<(), StoreError> {
        self.schedules.lock().unwrap().remove(&Self::key(owner, id));
        Ok(())
    }

    async fn get_profile(&self, owner: &UserId) -> Result<Option<UserProfile>, StoreError> {
        Ok(self
            .profiles
            .lock()
            .unwrap()
            .get(owner.as_str())
            .cloned())
    }

    async fn put_profile(&self, profile: &UserProfile) -> Result<(), StoreError> {
        self.profiles
            .lock()
            .unwrap()
            .insert(profile.owner.as_str().to_string(), profile.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(s: &str) -> UserId {
        UserId::from_string(s.to_string()).unwrap()
    }

    #[tokio::test]
    async fn tasks_are_scoped_to_their_owner() {
        let store = MemoryRecordStore::new();
        let alice = user("alice");
        let bob = user("bob");
        let task = Task::new("Alice's task".to_string(), alice.clone()).unwrap();
        store.put_task(&task).await.unwrap();

        assert_eq!(store.list_tasks(&alice).await.unwrap().len(), 1);
        assert!(store.list_tasks(&bob).await.unwrap().is_empty());

        // Another owner cannot update or observe the record.
        let patch = TaskPatch {
            completed: Some(true),
            ..Default::default()
        };
        assert!(matches!(
            store.update_task(&bob, &task.id, patch).await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn update_task_applies_only_given_fields() {
        let store = MemoryRecordStore::new();
        let owner = user("alice");
        let task = Task::new("Original".to_string(), owner.clone()).unwrap();
        store.put_task(&task).await.unwrap();

        let updated = store
            .update_task(
                &owner,
                &task.id,
                TaskPatch {
                    completed: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(updated.completed);
        assert_eq!(updated.title, "Original");
    }

    #[tokio::test]
    async fn folders_round_trip_with_notes() {
        let store = MemoryRecordStore::new();
        let owner = user("alice");
        let mut folder = Folder::new("Ideas".to_string(), String::new(), owner.clone()).unwrap();
        folder.add_note(daybook_domain::Note::new("n".to_string(), "c".to_string()).unwrap());
        store.put_folder(&folder).await.unwrap();

        let fetched = store.get_folder(&owner, &folder.id).await.unwrap();
        assert_eq!(fetched.notes.len(), 1);

        store.delete_folder(&owner, &folder.id).await.unwrap();
        assert!(matches!(
            store.get_folder(&owner, &folder.id).await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn profile_is_absent_until_written() {
        let store = MemoryRecordStore::new();
        let owner = user("alice");
        assert!(store.get_profile(&owner).await.unwrap().is_none());

        let profile = UserProfile::new(owner.clone(), "Alice".to_string(), None);
        store.put_profile(&profile).await.unwrap();
        let fetched = store.get_profile(&owner).await.unwrap().unwrap();
        assert_eq!(fetched.username, "Alice");
    }
}
