//! Sends the report digest over SMTP.

use anyhow::{Context, Result};
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::MailConfig;

/// Send the rendered report table as a single HTML email.
pub async fn send_report_email(config: &MailConfig, table_html: &str) -> Result<()> {
    let body = format!(
        "<html><body><h3>{}</h3>{}</body></html>",
        config.subject, table_html
    );

    let email = Message::builder()
        .from(config.from.parse().context("MAIL_FROM is not a valid address")?)
        .to(config.to.parse().context("MAIL_TO is not a valid address")?)
        .subject(&config.subject)
        .header(ContentType::TEXT_HTML)
        .body(body)
        .context("failed to build digest email")?;

    // Port 465 means implicit TLS; anything else (587 in practice) STARTTLS.
    let builder = if config.smtp_port == 465 {
        AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
    } else {
        AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
    }
    .context("failed to configure SMTP transport")?;

    let transport = builder
        .port(config.smtp_port)
        .credentials(Credentials::new(
            config.username.clone(),
            config.password.clone(),
        ))
        .build();

    transport
        .send(email)
        .await
        .context("failed to send digest email")?;

    Ok(())
}
