use crate::api::RentalApi;
use crate::error::Result;
use crate::models::{Notification, NotificationId};
use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

/// The signed-in user's notifications and their read flags
#[derive(Debug, Default)]
pub struct NotificationCenter {
    notifications: Vec<Notification>,
}

impl NotificationCenter {
    pub async fn refresh(&mut self, api: &dyn RentalApi) -> Result<()> {
        let notifications = api.list_notifications().await.map_err(|e| {
            warn!("Failed to fetch notifications: {}", e);
            e
        })?;
        self.notifications = notifications;
        info!("{} notifications, {} unread", self.notifications.len(), self.unread_count());
        Ok(())
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.is_read).count()
    }

    /// Navigation badge: nothing when all is read, capped at "9+"
    pub fn badge(&self) -> Option<String> {
        badge(self.unread_count() as u64)
    }

    pub async fn mark_as_read(&mut self, api: &dyn RentalApi, id: NotificationId) -> Result<()> {
        api.mark_notification_read(id).await.map_err(|e| {
            warn!("Failed to mark notification {} as read: {}", id, e);
            e
        })?;
        if let Some(n) = self.notifications.iter_mut().find(|n| n.id == id) {
            n.is_read = true;
        }
        Ok(())
    }

    pub async fn mark_all_as_read(&mut self, api: &dyn RentalApi) -> Result<()> {
        api.mark_all_notifications_read().await.map_err(|e| {
            warn!("Failed to mark all notifications as read: {}", e);
            e
        })?;
        self.notifications.iter_mut().for_each(|n| n.is_read = true);
        Ok(())
    }
}

pub fn badge(unread: u64) -> Option<String> {
    match unread {
        0 => None,
        1..=9 => Some(unread.to_string()),
        _ => Some("9+".to_string()),
    }
}

/// How a notification's timestamp is shown: relative today, weekday within
/// the last week, full date otherwise.
pub fn when(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    if created_at.date_naive() == now.date_naive() {
        let minutes = (now - created_at).num_minutes().max(0);
        return match minutes {
            0 => "just now".to_string(),
            1 => "1 minute ago".to_string(),
            2..=59 => format!("{minutes} minutes ago"),
            60..=119 => "1 hour ago".to_string(),
            _ => format!("{} hours ago", minutes / 60),
        };
    }
    if created_at > now - Duration::days(7) {
        return created_at.format("%A").to_string();
    }
    created_at.format("%B %-d, %Y").to_string()
}
