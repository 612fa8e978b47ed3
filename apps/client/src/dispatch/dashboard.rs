//! The dashboard's actions: start the bot, email the report, download it.

use parking_lot::Mutex;
use tracing::info;

use super::{ActionDescriptor, ActionDispatcher, ActionMessages, ActionOutcome, SuccessEffect};
use crate::api::endpoints;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotStatus {
    Idle,
    Running,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Excel,
    Pdf,
}

pub fn run_bot_action() -> ActionDescriptor {
    ActionDescriptor::post(
        endpoints::RUN_BOT,
        ActionMessages::new(
            "Starting the bot...",
            "Bot started successfully in background.",
            "Failed to trigger bot.",
        ),
    )
    .with_effect(SuccessEffect::MarkBotRunning)
}

pub fn email_report_action() -> ActionDescriptor {
    ActionDescriptor::post(
        endpoints::SEND_EMAIL,
        ActionMessages::new(
            "Sending your report...",
            "Report sent to your email.",
            "Failed to send report.",
        ),
    )
}

pub fn download_report_action(format: ReportFormat) -> ActionDescriptor {
    let (endpoint, label) = match format {
        ReportFormat::Excel => (endpoints::DOWNLOAD_EXCEL, "Excel"),
        ReportFormat::Pdf => (endpoints::DOWNLOAD_PDF, "PDF"),
    };
    ActionDescriptor::download(
        endpoint,
        ActionMessages::new(
            &format!("Preparing your {label} report..."),
            "Download started.",
            &format!("Failed to download {label} report."),
        ),
    )
}

pub struct Dashboard {
    dispatcher: ActionDispatcher,
    bot_status: Mutex<BotStatus>,
}

impl Dashboard {
    pub fn new(dispatcher: ActionDispatcher) -> Self {
        Self {
            dispatcher,
            bot_status: Mutex::new(BotStatus::Idle),
        }
    }

    pub fn bot_status(&self) -> BotStatus {
        *self.bot_status.lock()
    }

    pub async fn run_bot(&self) -> ActionOutcome {
        self.dispatch(&run_bot_action()).await
    }

    pub async fn email_report(&self) -> ActionOutcome {
        self.dispatch(&email_report_action()).await
    }

    pub async fn download_report(&self, format: ReportFormat) -> ActionOutcome {
        self.dispatch(&download_report_action(format)).await
    }

    async fn dispatch(&self, action: &ActionDescriptor) -> ActionOutcome {
        let outcome = self.dispatcher.invoke(action).await;
        if let ActionOutcome::Succeeded { effect, .. } = &outcome {
            self.apply(*effect);
        }
        outcome
    }

    fn apply(&self, effect: SuccessEffect) {
        match effect {
            SuccessEffect::None => {}
            SuccessEffect::MarkBotRunning => {
                info!("Bot marked as running");
                *self.bot_status.lock() = BotStatus::Running;
            }
        }
    }
}
