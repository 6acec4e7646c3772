use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Attachment, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use time::OffsetDateTime;
use tracing::info;

use crate::config::SmtpConfig;

/// Delivery collaborator for rendered reports. Failures are the sender's
/// problem to log; ledger state is never affected.
#[async_trait]
pub trait ReportMailer: Send + Sync {
    async fn send_report(&self, to: &str, pdf: Vec<u8>) -> anyhow::Result<()>;
}

/// Sends reports over SMTP (SMTPS, port 465 by default, matching the Gmail
/// setup this service started with).
pub struct SmtpMailer {
    config: SmtpConfig,
}

impl SmtpMailer {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ReportMailer for SmtpMailer {
    async fn send_report(&self, to: &str, pdf: Vec<u8>) -> anyhow::Result<()> {
        let from: Mailbox = format!("Finance Tracker <{}>", self.config.from).parse()?;
        let now = OffsetDateTime::now_utc();
        let filename = format!(
            "Finance_Report_{}-{:02}.pdf",
            now.year(),
            u8::from(now.month())
        );
        let greeting = to.split('@').next().unwrap_or(to);
        let html = format!(
            "<h2>Hi {greeting},</h2>\
             <p>Here's your <strong>Finance Tracker Monthly Report</strong> 📈</p>\
             <p>Keep managing your money smartly and achieve your savings goals 💰</p>\
             <br>\
             <p>— The Finance Tracker Team</p>"
        );

        let email = Message::builder()
            .from(from)
            .to(to.parse()?)
            .subject("📊 Your Monthly Finance Report")
            .multipart(
                MultiPart::mixed()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html),
                    )
                    .singlepart(
                        Attachment::new(filename)
                            .body(pdf, ContentType::parse("application/pdf")?),
                    ),
            )?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.host)?
            .credentials(Credentials::new(
                self.config.username.clone(),
                self.config.password.clone(),
            ))
            .build();

        transport.send(email).await?;
        info!(to = %to, "report delivered");
        Ok(())
    }
}
