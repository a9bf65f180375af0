//! OTP mail delivery.

use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use shelfwise_auth::otp::OTP_TTL_MINUTES;
use shelfwise_auth::{EmailError, EmailSender};

use crate::config::SmtpConfig;

const OTP_SUBJECT: &str = "Password Reset OTP";

/// Sends mail through an SMTP relay.
pub struct SmtpEmailSender {
    from: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpEmailSender {
    pub fn new(config: &SmtpConfig) -> Result<Self, EmailError> {
        let from: Mailbox = format!("{} <{}>", config.from_name, config.from_email)
            .parse()
            .map_err(|e| EmailError(format!("invalid sender address: {e}")))?;

        let builder = if config.tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                .map_err(|e| EmailError(format!("invalid smtp relay: {e}")))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
        }
        .port(config.port);

        let builder = match (&config.username, &config.password) {
            (Some(username), Some(password)) => {
                builder.credentials(Credentials::new(username.clone(), password.clone()))
            }
            _ => builder,
        };

        Ok(Self {
            from,
            transport: builder.build(),
        })
    }
}

#[async_trait::async_trait]
impl EmailSender for SmtpEmailSender {
    async fn send_otp_email(&self, to: &str, otp_code: &str) -> Result<(), EmailError> {
        let to_mailbox: Mailbox = to
            .parse()
            .map_err(|e| EmailError(format!("invalid recipient address: {e}")))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to_mailbox)
            .subject(OTP_SUBJECT)
            .header(ContentType::TEXT_HTML)
            .body(render_otp_html(otp_code))
            .map_err(|e| EmailError(format!("failed to build message: {e}")))?;

        self.transport.send(message).await.map_err(|e| {
            tracing::error!(to = %to, error = %e, "failed to send OTP email");
            EmailError(e.to_string())
        })?;

        tracing::info!(to = %to, "OTP email sent");
        Ok(())
    }
}

/// Used when SMTP is not configured. Every send fails, so forgot-password
/// reports a delivery failure instead of pretending a code went out.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredEmailSender;

#[async_trait::async_trait]
impl EmailSender for UnconfiguredEmailSender {
    async fn send_otp_email(&self, to: &str, _otp_code: &str) -> Result<(), EmailError> {
        tracing::error!(to = %to, "SMTP not configured, cannot send OTP email");
        Err(EmailError("SMTP not configured".into()))
    }
}

/// Development-only sender that writes the code to the log.
///
/// Selected by `DEV_LOG_OTP=true` when SMTP is not configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingEmailSender;

#[async_trait::async_trait]
impl EmailSender for LoggingEmailSender {
    async fn send_otp_email(&self, to: &str, otp_code: &str) -> Result<(), EmailError> {
        tracing::warn!(to = %to, otp_code = %otp_code, "DEV_LOG_OTP enabled, OTP logged instead of mailed");
        Ok(())
    }
}

fn render_otp_html(otp_code: &str) -> String {
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
    <h2>Password Reset Request</h2>
    <p>Use the code below to verify your identity and reset your password:</p>
    <div style="background-color: #f4f4f4; padding: 20px; text-align: center; border-radius: 8px;">
        <h1 style="letter-spacing: 10px; margin: 0;">{otp_code}</h1>
    </div>
    <p>This code expires in <strong>{OTP_TTL_MINUTES} minutes</strong>.</p>
    <p>If you did not request this, you can ignore this email.</p>
</div>"#
    )
}
