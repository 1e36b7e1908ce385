//! Long-polling bot dispatcher

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use super::commands::Command;
use crate::application::errors::ApplicationError;
use crate::application::{AlertScanService, ReportService};
use crate::infrastructure::chat::telegram::{Message, TelegramClient};
use crate::infrastructure::chat::ChatTransport;
use crate::infrastructure::registry::RecipientRegistry;

/// Delay before retrying after a failed getUpdates call.
const POLL_RETRY_DELAY: Duration = Duration::from_secs(3);

/// Dispatches incoming Telegram messages to command handlers.
pub struct BotDispatcher {
    telegram: Arc<TelegramClient>,
    registry: Arc<dyn RecipientRegistry>,
    scanner: Arc<dyn AlertScanService>,
    reporter: Arc<dyn ReportService>,
    activation_token: String,
}

impl BotDispatcher {
    pub fn new(
        telegram: Arc<TelegramClient>,
        registry: Arc<dyn RecipientRegistry>,
        scanner: Arc<dyn AlertScanService>,
        reporter: Arc<dyn ReportService>,
        activation_token: String,
    ) -> Self {
        Self {
            telegram,
            registry,
            scanner,
            reporter,
            activation_token,
        }
    }

    /// Poll for updates forever. Handler errors are logged and the loop
    /// keeps running; only the caller can stop it (e.g. via ctrl-c).
    pub async fn run(&self) {
        info!("bot started");
        let mut offset = 0i64;

        loop {
            let updates = match self.telegram.get_updates(offset).await {
                Ok(updates) => updates,
                Err(e) => {
                    warn!(error = %e, "polling failed, retrying");
                    tokio::time::sleep(POLL_RETRY_DELAY).await;
                    continue;
                }
            };

            for update in updates {
                offset = offset.max(update.update_id + 1);
                let Some(message) = update.message else {
                    continue;
                };
                if let Err(e) = self.handle_message(&message).await {
                    error!(chat_id = message.chat.id, error = %e, "failed to handle message");
                }
            }
        }
    }

    async fn handle_message(&self, message: &Message) -> Result<(), ApplicationError> {
        let Some(text) = message.text.as_deref() else {
            return Ok(());
        };

        match Command::parse(text) {
            Some(Command::Start) => self.cmd_start(message).await,
            Some(Command::Activate { token }) => self.cmd_activate(message, token).await,
            Some(Command::Status) => self.cmd_status(message).await,
            Some(Command::Update) => self.cmd_update(message).await,
            None => self.unknown_message(message).await,
        }
    }

    fn first_name(message: &Message) -> &str {
        message
            .from
            .as_ref()
            .map(|user| user.first_name.as_str())
            .unwrap_or("")
    }

    async fn cmd_start(&self, message: &Message) -> Result<(), ApplicationError> {
        let chat_id = message.chat.id;
        let first_name = Self::first_name(message);

        let reply = if self.registry.is_registered(chat_id).await? {
            format!(
                "👋 Привет, {}!\n\n\
                 ✅ Вы уже активированы.\n\n\
                 Доступные команды:\n\
                 • /status - статус активации\n\
                 • /update - проверить уязвимости\n",
                first_name
            )
        } else {
            format!(
                "👋 Привет, {}!\n\n\
                 🔒 Этот бот мониторит GitHub Security Alerts.\n\n\
                 Для активации используйте команду:\n\
                 `/activate <ваш_токен>`\n\n\
                 Токен активации можно получить у администратора.",
                first_name
            )
        };

        self.telegram.send_message(chat_id, &reply).await?;
        Ok(())
    }

    async fn cmd_activate(
        &self,
        message: &Message,
        token: Option<String>,
    ) -> Result<(), ApplicationError> {
        let chat_id = message.chat.id;

        if self.registry.is_registered(chat_id).await? {
            self.telegram
                .send_message(chat_id, "✅ Вы уже активированы!")
                .await?;
            return Ok(());
        }

        let Some(token) = token else {
            self.telegram
                .send_message(chat_id, "❌ Использование: `/activate <токен>`")
                .await?;
            return Ok(());
        };

        if token != self.activation_token {
            let username = message.from.as_ref().and_then(|u| u.username.as_deref());
            warn!(chat_id, username, "failed activation attempt");
            self.telegram
                .send_message(chat_id, "❌ Неверный токен активации.")
                .await?;
            return Ok(());
        }

        let username = message
            .from
            .as_ref()
            .and_then(|user| user.username.as_deref())
            .or_else(|| {
                let first_name = Self::first_name(message);
                (!first_name.is_empty()).then_some(first_name)
            });

        let is_new = self.registry.register(chat_id, username).await?;

        let reply = if is_new {
            info!(chat_id, username, "user activated");
            "✅ Активация успешна!\n\n\
             Теперь вы будете получать ежедневные отчёты о безопасности.\n\n\
             Доступные команды:\n\
             • /status - статус активации\n\
             • /update - проверить уязвимости прямо сейчас"
        } else {
            "✅ Вы уже были активированы ранее."
        };

        self.telegram.send_message(chat_id, reply).await?;
        Ok(())
    }

    async fn cmd_status(&self, message: &Message) -> Result<(), ApplicationError> {
        let chat_id = message.chat.id;

        if !self.registry.is_registered(chat_id).await? {
            self.telegram
                .send_message(
                    chat_id,
                    "❌ Вы не активированы.\n\n\
                     Используйте `/activate <токен>` для активации.",
                )
                .await?;
            return Ok(());
        }

        let activated_at = self
            .registry
            .get(chat_id)
            .await?
            .map(|registration| registration.activated_at)
            .unwrap_or_else(|| "N/A".to_string());

        let reply = format!(
            "✅ *Статус: Активирован*\n\n\
             📅 Дата активации: `{}`\n\
             🆔 Chat ID: `{}`\n\n\
             Используйте /update для проверки уязвимостей.",
            activated_at, chat_id
        );
        self.telegram.send_message(chat_id, &reply).await?;
        Ok(())
    }

    async fn cmd_update(&self, message: &Message) -> Result<(), ApplicationError> {
        let chat_id = message.chat.id;

        if !self.registry.is_registered(chat_id).await? {
            self.telegram
                .send_message(
                    chat_id,
                    "❌ Команда доступна только для активированных пользователей.\n\n\
                     Используйте `/activate <токен>` для активации.",
                )
                .await?;
            return Ok(());
        }

        self.telegram
            .send_message(chat_id, "🔍 Проверяю репозитории на уязвимости...")
            .await?;

        match self.scanner.aggregate_all().await {
            Ok(buckets) => {
                let report = self.reporter.render_text(&buckets);
                self.telegram.send_message(chat_id, &report).await?;
            }
            Err(e) => {
                error!(chat_id, error = %e, "alert scan failed");
                self.telegram
                    .send_message(chat_id, &format!("❌ Ошибка при проверке: {}", e))
                    .await?;
            }
        }
        Ok(())
    }

    async fn unknown_message(&self, message: &Message) -> Result<(), ApplicationError> {
        let chat_id = message.chat.id;

        // Activated chats can chat freely; only nudge the others.
        if !self.registry.is_registered(chat_id).await? {
            self.telegram
                .send_message(
                    chat_id,
                    "🔒 Бот требует активации.\n\n\
                     Используйте `/activate <токен>` или напишите /start",
                )
                .await?;
        }
        Ok(())
    }
}
