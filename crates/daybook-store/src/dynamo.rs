//! DynamoDB-backed Record Store.
//!
//! Single-table layout, partitioned by owner so every query is scoped to
//! the authenticated user:
//!
//! ```text
//! PK              SK              body
//! USER#{owner}    TASK#{id}       flat attributes
//! USER#{owner}    SCHED#{id}      flat attributes
//! USER#{owner}    FOLDER#{id}     Data = folder JSON (embedded notes)
//! USER#{owner}    PROFILE         Data = profile JSON
//! ```
//!
//! Items that fail to parse are logged and skipped; a listing never aborts
//! on one bad record.

use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_sdk_dynamodb::Client;
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::{error, info, instrument};

use crate::error::StoreError;
use crate::store::{RecordStore, SchedulePatch, TaskPatch};
use daybook_domain::{Folder, RecordId, Schedule, Task, Timestamp, UserId, UserProfile};

#[derive(Clone)]
pub struct DynamoRecordStore {
    client: Client,
    table_name: String,
}

fn pk(owner: &UserId) -> String {
    format!("USER#{}", owner.as_str())
}

fn task_sk(id: &RecordId) -> String {
    format!("TASK#{}", id.as_str())
}

fn folder_sk(id: &RecordId) -> String {
    format!("FOLDER#{}", id.as_str())
}

fn schedule_sk(id: &RecordId) -> String {
    format!("SCHED#{}", id.as_str())
}

/// Stored timestamps predate the normalized shape: older items carry an
/// RFC 3339 string, newer ones epoch milliseconds.
fn read_timestamp(item: &HashMap<String, AttributeValue>, attr: &str) -> Option<Timestamp> {
    match item.get(attr)? {
        AttributeValue::N(n) => n.parse::<i64>().ok().and_then(Timestamp::from_millis),
        AttributeValue::S(s) => Timestamp::parse(s),
        _ => None,
    }
}

fn read_string(item: &HashMap<String, AttributeValue>, attr: &str) -> Option<String> {
    item.get(attr)?.as_s().ok().cloned()
}

fn item_to_task(item: &HashMap<String, AttributeValue>) -> Option<Task> {
    Some(Task {
        id: RecordId::from_string(read_string(item, "id")?).ok()?,
        title: read_string(item, "title")?,
        completed: *item.get("completed")?.as_bool().ok()?,
        owner: UserId::from_string(read_string(item, "owner")?).ok()?,
        created_at: read_timestamp(item, "created_at"),
    })
}

fn item_to_schedule(item: &HashMap<String, AttributeValue>) -> Option<Schedule> {
    let date = NaiveDate::parse_from_str(&read_string(item, "date")?, "%Y-%m-%d").ok()?;
    Some(Schedule {
        id: RecordId::from_string(read_string(item, "id")?).ok()?,
        subject: read_string(item, "subject")?,
        time: read_string(item, "time")?,
        date,
        owner: UserId::from_string(read_string(item, "owner")?).ok()?,
        created_at: read_timestamp(item, "created_at"),
    })
}

fn map_sdk_error(e: impl std::fmt::Display) -> StoreError {
    StoreError::Database(e.to_string())
}

/// A failed existence condition on an update means the record is absent
/// or belongs to someone else, not that the database misbehaved.
fn map_update_error(e: UpdateItemError) -> StoreError {
    if e.is_conditional_check_failed_exception() {
        StoreError::NotFound
    } else {
        StoreError::Database(e.to_string())
    }
}

impl DynamoRecordStore {
    pub async fn new(table_name: &str) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let client = Client::new(&config);
        Self {
            client,
            table_name: table_name.to_string(),
        }
    }

    async fn query_prefix(
        &self,
        owner: &UserId,
        sk_prefix: &str,
    ) -> Result<Vec<HashMap<String, AttributeValue>>, StoreError> {
        let result = self
            .client
            .query()
            .table_name(&self.table_name)
            .key_condition_expression("PK = :pk AND begins_with(SK, :sk_prefix)")
            .expression_attribute_values(":pk", AttributeValue::S(pk(owner)))
            .expression_attribute_values(":sk_prefix", AttributeValue::S(sk_prefix.to_string()))
            .send()
            .await
            .map_err(map_sdk_error)?;
        Ok(result.items().to_vec())
    }

    async fn delete(&self, owner: &UserId, sk: String) -> Result<(), StoreError> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key("PK", AttributeValue::S(pk(owner)))
            .key("SK", AttributeValue::S(sk))
            .send()
            .await
            .map_err(map_sdk_error)?;
        Ok(())
    }

    async fn put_json(
        &self,
        owner: &UserId,
        sk: String,
        entity_type: &str,
        body: String,
    ) -> Result<(), StoreError> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .item("PK", AttributeValue::S(pk(owner)))
            .item("SK", AttributeValue::S(sk))
            .item("EntityType", AttributeValue::S(entity_type.to_string()))
            .item("Data", AttributeValue::S(body))
            .item(
                "UpdatedAt",
                AttributeValue::S(chrono::Utc::now().to_rfc3339()),
            )
            .send()
            .await
            .map_err(map_sdk_error)?;
        Ok(())
    }

    fn parse_data<T: serde::de::DeserializeOwned>(
        item: &HashMap<String, AttributeValue>,
        entity: &str,
    ) -> Option<T> {
        let AttributeValue::S(data) = item.get("Data")? else {
            return None;
        };
        match serde_json::from_str(data) {
            Ok(value) => Some(value),
            Err(e) => {
                error!(error = %e, entity, "Failed to deserialize stored record");
                None
            }
        }
    }
}

impl RecordStore for DynamoRecordStore {
    #[instrument(skip(self), fields(owner = %owner))]
    async fn list_tasks(&self, owner: &UserId) -> Result<Vec<Task>, StoreError> {
        let items = self.query_prefix(owner, "TASK#").await?;
        Ok(items.iter().filter_map(item_to_task).collect())
    }

    async fn put_task(&self, task: &Task) -> Result<(), StoreError> {
        let mut request = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .item("PK", AttributeValue::S(pk(&task.owner)))
            .item("SK", AttributeValue::S(task_sk(&task.id)))
            .item("EntityType", AttributeValue::S("Task".to_string()))
            .item("id", AttributeValue::S(task.id.as_str().to_string()))
            .item("title", AttributeValue::S(task.title.clone()))
            .item("completed", AttributeValue::Bool(task.completed))
            .item("owner", AttributeValue::S(task.owner.as_str().to_string()));
        if let Some(ts) = task.created_at {
            request = request.item("created_at", AttributeValue::N(ts.millis().to_string()));
        }
        request.send().await.map_err(map_sdk_error)?;

        info!(task_id = task.id.as_str(), owner = task.owner.as_str(), "Task saved");
        Ok(())
    }

    async fn update_task(
        &self,
        owner: &UserId,
        id: &RecordId,
        patch: TaskPatch,
    ) -> Result<Task, StoreError> {
        let mut update_parts = Vec::new();
        let mut builder = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key("PK", AttributeValue::S(pk(owner)))
            .key("SK", AttributeValue::S(task_sk(id)))
            .condition_expression("attribute_exists(PK)")
            .return_values(ReturnValue::AllNew);

        if let Some(title) = patch.title {
            update_parts.push("title = :title");
            builder = builder.expression_attribute_values(":title", AttributeValue::S(title));
        }
        if let Some(completed) = patch.completed {
            update_parts.push("completed = :completed");
            builder =
                builder.expression_attribute_values(":completed", AttributeValue::Bool(completed));
        }

        let expression = format!("SET {}", update_parts.join(", "));
        let result = builder
            .update_expression(expression)
            .send()
            .await
            .map_err(|e| map_update_error(e.into_service_error()))?;

        let item = result.attributes().ok_or(StoreError::NotFound)?;
        item_to_task(item)
            .ok_or_else(|| StoreError::Serialization("Failed to parse updated task".to_string()))
    }

    async fn delete_task(&self, owner: &UserId, id: &RecordId) -> Result<(), StoreError> {
        self.delete(owner, task_sk(id)).await
    }

    #[instrument(skip(self), fields(owner = %owner))]
    async fn list_folders(&self, owner: &UserId) -> Result<Vec<Folder>, StoreError> {
        let items = self.query_prefix(owner, "FOLDER#").await?;
        Ok(items
            .iter()
            .filter_map(|item| Self::parse_data::<Folder>(item, "Folder"))
            .collect())
    }

    async fn get_folder(&self, owner: &UserId, id: &RecordId) -> Result<Folder, StoreError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("PK", AttributeValue::S(pk(owner)))
            .key("SK", AttributeValue::S(folder_sk(id)))
            .send()
            .await
            .map_err(map_sdk_error)?;

        let item = output.item.ok_or(StoreError::NotFound)?;
        Self::parse_data::<Folder>(&item, "Folder")
            .ok_or_else(|| StoreError::Serialization("Failed to parse folder".to_string()))
    }

    async fn put_folder(&self, folder: &Folder) -> Result<(), StoreError> {
        let body = serde_json::to_string(folder)?;
        self.put_json(&folder.owner, folder_sk(&folder.id), "Folder", body)
            .await?;
        info!(
            folder_id = folder.id.as_str(),
            owner = folder.owner.as_str(),
            notes = folder.notes.len(),
            "Folder saved"
        );
        Ok(())
    }

    async fn delete_folder(&self, owner: &UserId, id: &RecordId) -> Result<(), StoreError> {
        self.delete(owner, folder_sk(id)).await
    }

    #[instrument(skip(self), fields(owner = %owner))]
    async fn list_schedules(&self, owner: &UserId) -> Result<Vec<Schedule>, StoreError> {
        let items = self.query_prefix(owner, "SCHED#").await?;
        Ok(items.iter().filter_map(item_to_schedule).collect())
    }

    async fn put_schedule(&self, schedule: &Schedule) -> Result<(), StoreError> {
        let mut request = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .item("PK", AttributeValue::S(pk(&schedule.owner)))
            .item("SK", AttributeValue::S(schedule_sk(&schedule.id)))
            .item("EntityType", AttributeValue::S("Schedule".to_string()))
            .item("id", AttributeValue::S(schedule.id.as_str().to_string()))
            .item("subject", AttributeValue::S(schedule.subject.clone()))
            .item("time", AttributeValue::S(schedule.time.clone()))
            .item("date", AttributeValue::S(schedule.date.to_string()))
            .item(
                "owner",
                AttributeValue::S(schedule.owner.as_str().to_string()),
            );
        if let Some(ts) = schedule.created_at {
            request = request.item("created_at", AttributeValue::N(ts.millis().to_string()));
        }
        request.send().await.map_err(map_sdk_error)?;
        Ok(())
    }

    async fn update_schedule(
        &self,
        owner: &UserId,
        id: &RecordId,
        patch: SchedulePatch,
    ) -> Result<Schedule, StoreError> {
        let mut update_parts = Vec::new();
        let mut builder = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key("PK", AttributeValue::S(pk(owner)))
            .key("SK", AttributeValue::S(schedule_sk(id)))
            .condition_expression("attribute_exists(PK)")
            .return_values(ReturnValue::AllNew);

        if let Some(subject) = patch.subject {
            update_parts.push("subject = :subject");
            builder = builder.expression_attribute_values(":subject", AttributeValue::S(subject));
        }
        if let Some(time) = patch.time {
            // `time` needs an alias: it collides with a reserved word.
            update_parts.push("#t = :time");
            builder = builder
                .expression_attribute_names("#t", "time")
                .expression_attribute_values(":time", AttributeValue::S(time));
        }
        if let Some(date) = patch.date {
            update_parts.push("#d = :date");
            builder = builder
                .expression_attribute_names("#d", "date")
                .expression_attribute_values(":date", AttributeValue::S(date.to_string()));
        }

        let expression = format!("SET {}", update_parts.join(", "));
        let result = builder
            .update_expression(expression)
            .send()
            .await
            .map_err(|e| map_update_error(e.into_service_error()))?;

        let item = result.attributes().ok_or(StoreError::NotFound)?;
        item_to_schedule(item)
            .ok_or_else(|| StoreError::Serialization("Failed to parse updated schedule".to_string()))
    }

    async fn delete_schedule(&self, owner: &UserId, id: &RecordId) -> Result<(), StoreError> {
        self.delete(owner, schedule_sk(id)).await
    }

    async fn get_profile(&self, owner: &UserId) -> Result<Option<UserProfile>, StoreError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("PK", AttributeValue::S(pk(owner)))
            .key("SK", AttributeValue::S("PROFILE".to_string()))
            .send()
            .await
            .map_err(map_sdk_error)?;

        Ok(output
            .item
            .as_ref()
            .and_then(|item| Self::parse_data::<UserProfile>(item, "Profile")))
    }

    async fn put_profile(&self, profile: &UserProfile) -> Result<(), StoreError> {
        let body = serde_json::to_string(profile)?;
        self.put_json(&profile.owner, "PROFILE".to_string(), "Profile", body)
            .await
    }
}
