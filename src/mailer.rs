use anyhow::Context;
use axum::async_trait;
use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials, AsyncSmtpTransport,
    AsyncTransport, Message, Tokio1Executor,
};

use crate::config::SmtpConfig;

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: String,
}

impl SmtpMailer {
    pub fn new(cfg: &SmtpConfig) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&cfg.host)
            .context("smtp relay")?
            .port(cfg.port)
            .credentials(Credentials::new(cfg.user.clone(), cfg.password.clone()))
            .build();
        Ok(Self {
            transport,
            sender: cfg.sender.clone(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        let message = Message::builder()
            .from(self.sender.parse().context("parse sender address")?)
            .to(to.parse().context("parse recipient address")?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .context("build email message")?;
        self.transport.send(message).await.context("smtp send")?;
        Ok(())
    }
}

pub fn welcome_email(name: &str) -> (String, String) {
    (
        "Welcome to Our Platform!".to_string(),
        format!(
            "Hello {name},\n\nThank you for registering at our platform. \
             We're excited to have you on board!\n\nBest regards,\nThe Team"
        ),
    )
}

pub fn verify_otp_email(name: &str, otp: &str) -> (String, String) {
    (
        "Your Account Verification OTP".to_string(),
        format!(
            "Hello {name},\n\nYour OTP for account verification is: {otp}\n\
             This OTP is valid for 24 hours.\n\nBest regards,\nThe Team"
        ),
    )
}

pub fn reset_otp_email(name: &str, otp: &str) -> (String, String) {
    (
        "Your Password Reset OTP".to_string(),
        format!(
            "Hello {name},\n\nYour OTP for password reset is: {otp}\n\
             This OTP is valid for 15 minutes.\n\nBest regards,\nThe Team"
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn otp_emails_carry_the_code() {
        let (subject, body) = verify_otp_email("Alice", "123456");
        assert_eq!(subject, "Your Account Verification OTP");
        assert!(body.contains("123456"));
        assert!(body.contains("24 hours"));

        let (subject, body) = reset_otp_email("Alice", "654321");
        assert_eq!(subject, "Your Password Reset OTP");
        assert!(body.contains("654321"));
        assert!(body.contains("15 minutes"));
    }

    #[test]
    fn welcome_email_greets_by_name() {
        let (subject, body) = welcome_email("Alice");
        assert_eq!(subject, "Welcome to Our Platform!");
        assert!(body.starts_with("Hello Alice,"));
    }
}
