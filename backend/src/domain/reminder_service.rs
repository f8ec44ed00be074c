//! Schedule reminders sent to the guardian after a registration.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::info;

use crate::domain::models::child::Child;
use crate::domain::models::schedule::ScheduledDose;

/// Delivers a child's derived schedule to their guardian
#[async_trait]
pub trait ReminderNotifier: Send + Sync {
    async fn send_schedule_reminder(&self, child: &Child, schedule: &[ScheduledDose]) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub smtp_server: String,
    pub smtp_port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from_email: String,
}

/// Subject and body of the reminder for `child`, listing doses that are not
/// yet past on `today`. `None` when nothing is left to remind about.
pub fn compose_reminder(
    child: &Child,
    schedule: &[ScheduledDose],
    today: NaiveDate,
) -> Option<(String, String)> {
    let upcoming: Vec<String> = schedule
        .iter()
        .filter(|dose| dose.end.unwrap_or(dose.start) >= today)
        .map(|dose| format!("- {}", dose.label()))
        .collect();

    if upcoming.is_empty() {
        return None;
    }

    let subject = format!("Vaccination schedule for {}", child.name);
    let body = format!(
        "Dear Parent,\n\n{} has been registered with the immunization programme.\n\
         The following vaccinations are scheduled:\n\n{}\n\n\
         Please make sure to visit the vaccination center on the scheduled dates.\n\n\
         Best regards,\nImmunization Team",
        child.name,
        upcoming.join("\n")
    );

    Some((subject, body))
}

pub struct SmtpReminderNotifier {
    from: Mailbox,
    transport: SmtpTransport,
}

impl SmtpReminderNotifier {
    pub fn new(config: SmtpConfig) -> Result<Self> {
        info!(
            "📧 Initializing reminder mail transport for {}:{}",
            config.smtp_server, config.smtp_port
        );

        let from = config
            .from_email
            .parse::<Mailbox>()
            .context("Failed to parse reminder sender address")?;

        let mut builder = SmtpTransport::starttls_relay(&config.smtp_server)
            .context("Failed to create SMTP relay")?
            .port(config.smtp_port);
        if let (Some(username), Some(password)) = (config.username, config.password) {
            builder = builder.credentials(Credentials::new(username, password));
        }

        Ok(Self {
            from,
            transport: builder.build(),
        })
    }
}

#[async_trait]
impl ReminderNotifier for SmtpReminderNotifier {
    async fn send_schedule_reminder(&self, child: &Child, schedule: &[ScheduledDose]) -> Result<()> {
        let today = chrono::Utc::now().date_naive();
        let Some((subject, body)) = compose_reminder(child, schedule, today) else {
            info!("📧 No upcoming doses for {}, skipping reminder", child.id);
            return Ok(());
        };

        let to = child
            .parent_email
            .parse::<Mailbox>()
            .with_context(|| format!("Failed to parse guardian address for {}", child.id))?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .body(body)
            .context("Failed to build reminder email")?;

        // SmtpTransport is blocking
        let transport = self.transport.clone();
        tokio::task::spawn_blocking(move || transport.send(&email))
            .await
            .context("Reminder send task panicked")?
            .context("Failed to send reminder email")?;

        info!("📧 Schedule reminder sent for {}", child.id);
        Ok(())
    }
}
