use chrono::{Datelike, NaiveDate, Utc};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::domain::models::child::{Child, ScheduledChild};
use crate::domain::reminder_service::ReminderNotifier;
use crate::domain::vaccination_schedule::ScheduleRules;
use crate::error::{RegistryError, RegistryResult};
use crate::storage::ChildStorage;
use shared::SubmitChildRequest;

const MAX_NAME_LENGTH: usize = 100;
const MAX_PARENT_ID_LENGTH: usize = 100;
const MAX_EMAIL_LENGTH: usize = 254;
const MAX_GENDER_LENGTH: usize = 32;

/// Record intake and listing over the record store
#[derive(Clone)]
pub struct ChildService {
    storage: Arc<dyn ChildStorage>,
    rules: Arc<ScheduleRules>,
    store_timeout: Duration,
    notifier: Option<Arc<dyn ReminderNotifier>>,
}

impl ChildService {
    pub fn new(storage: Arc<dyn ChildStorage>, rules: Arc<ScheduleRules>, store_timeout: Duration) -> Self {
        Self {
            storage,
            rules,
            store_timeout,
            notifier: None,
        }
    }

    /// Send a schedule reminder to the guardian after each successful intake
    pub fn with_notifier(mut self, notifier: Arc<dyn ReminderNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn rules(&self) -> &ScheduleRules {
        &self.rules
    }

    /// Validate and durably store a new registration.
    ///
    /// Nothing is written unless every required field is present and well formed.
    pub async fn submit_child(&self, request: SubmitChildRequest) -> RegistryResult<Child> {
        let today = Utc::now().date_naive();
        let child = self.validate_submission(&request, today)?;

        // Not wrapped in a timeout: dropping an in-flight insert does not stop
        // it from committing. The store bounds its own wait for the database.
        info!("Storing child {} for parent {}", child.id, child.parent_id);
        if let Err(e) = self.storage.store_child(&child).await {
            error!("Failed to store child {}: {:#}", child.id, e);
            return Err(RegistryError::storage(e));
        }
        info!("Stored child {}", child.id);

        self.dispatch_reminder(&child);

        Ok(child)
    }

    /// All stored registrations in insertion order, each with its derived schedule
    pub async fn list_children(&self) -> RegistryResult<Vec<ScheduledChild>> {
        let children = self
            .with_read_timeout("list children", self.storage.list_children())
            .await?;

        debug!("Deriving schedules for {} children", children.len());
        let scheduled = children
            .into_iter()
            .map(|child| {
                let schedule = self.rules.derive_schedule(child.dob, &child.gender);
                ScheduledChild { child, schedule }
            })
            .collect();

        Ok(scheduled)
    }

    /// Bound a read-only store call; abandoning it leaves no side effects
    async fn with_read_timeout<T>(
        &self,
        operation: &str,
        fut: impl Future<Output = anyhow::Result<T>>,
    ) -> RegistryResult<T> {
        match tokio::time::timeout(self.store_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                error!("Failed to {}: {:#}", operation, e);
                Err(RegistryError::storage(e))
            }
            Err(_) => {
                error!("Timed out trying to {} after {:?}", operation, self.store_timeout);
                Err(RegistryError::Storage(format!(
                    "{} timed out after {}ms",
                    operation,
                    self.store_timeout.as_millis()
                )))
            }
        }
    }

    fn dispatch_reminder(&self, child: &Child) {
        let Some(notifier) = self.notifier.clone() else {
            return;
        };

        let schedule = self.rules.derive_schedule(child.dob, &child.gender);
        let child = child.clone();
        tokio::spawn(async move {
            if let Err(e) = notifier.send_schedule_reminder(&child, &schedule).await {
                warn!("Failed to send schedule reminder for {}: {:#}", child.id, e);
            }
        });
    }

    /// Check the submission field by field and build the record to store
    fn validate_submission(&self, request: &SubmitChildRequest, today: NaiveDate) -> RegistryResult<Child> {
        let name = Self::required(&request.child_name, "childName", "Child name")?;
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(RegistryError::validation(
                "childName",
                format!("Child name cannot exceed {} characters", MAX_NAME_LENGTH),
            ));
        }

        let parent_id = Self::required(&request.parent_id, "parentId", "Parent ID")?;
        if parent_id.chars().count() > MAX_PARENT_ID_LENGTH {
            return Err(RegistryError::validation(
                "parentId",
                format!("Parent ID cannot exceed {} characters", MAX_PARENT_ID_LENGTH),
            ));
        }

        let parent_email = Self::required(&request.parent_email, "parentEmail", "Parent email")?;
        if !Self::is_valid_email(parent_email) {
            return Err(RegistryError::validation(
                "parentEmail",
                "Parent email must be a valid email address",
            ));
        }

        let gender = request.gender.as_deref().map(str::trim).unwrap_or_default();
        if gender.chars().count() > MAX_GENDER_LENGTH {
            return Err(RegistryError::validation(
                "gender",
                format!("Gender cannot exceed {} characters", MAX_GENDER_LENGTH),
            ));
        }

        let dob = Self::required(&request.dob, "dob", "Date of birth")?;
        let dob = Self::parse_dob(dob, today)?;

        Ok(Child {
            id: Child::generate_id(),
            name: name.to_string(),
            parent_id: parent_id.to_string(),
            parent_email: parent_email.to_string(),
            gender: gender.to_string(),
            dob,
            created_at: Utc::now(),
        })
    }

    fn required<'a>(value: &'a Option<String>, field: &str, label: &str) -> RegistryResult<&'a str> {
        match value.as_deref().map(str::trim) {
            None => Err(RegistryError::validation(field, format!("{} is required", label))),
            Some("") => Err(RegistryError::validation(field, format!("{} cannot be empty", label))),
            Some(value) => Ok(value),
        }
    }

    fn parse_dob(dob: &str, today: NaiveDate) -> RegistryResult<NaiveDate> {
        let invalid = |message: &str| RegistryError::validation("dob", message);

        // chrono accepts unpadded fields; the wire format does not
        if dob.len() != 10 {
            return Err(invalid("Date of birth must be in YYYY-MM-DD format"));
        }
        let date = NaiveDate::parse_from_str(dob, "%Y-%m-%d")
            .map_err(|_| invalid("Date of birth must be a valid YYYY-MM-DD date"))?;

        if date.year() < 1900 {
            return Err(invalid("Date of birth cannot be before 1900"));
        }
        if date > today {
            return Err(invalid("Date of birth cannot be in the future"));
        }

        Ok(date)
    }

    /// Syntactic check only: `local@domain.tld`, no whitespace
    fn is_valid_email(email: &str) -> bool {
        if email.len() > MAX_EMAIL_LENGTH || email.chars().any(char::is_whitespace) {
            return false;
        }

        let Some((local, domain)) = email.split_once('@') else {
            return false;
        };
        if local.is_empty() || local.len() > 64 || domain.contains('@') {
            return false;
        }

        let labels: Vec<&str> = domain.split('.').collect();
        labels.len() >= 2
            && labels.iter().all(|label| {
                !label.is_empty()
                    && !label.starts_with('-')
                    && !label.ends_with('-')
                    && label.chars().all(|c| c.is_alphanumeric() || c == '-')
            })
    }
}
