use crate::config::EmailConfig;
use crate::error::{AppError, Result};
use lettre::message::header;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::info;

/// One-time passcode email sender
#[derive(Clone)]
pub struct OtpMailer {
    smtp_server: String,
    smtp_port: u16,
    smtp_username: Option<String>,
    smtp_password: Option<String>,
    from_email: String,
    from_name: Option<String>,
}

impl OtpMailer {
    /// Build a mailer from configuration; credentials come from the env vars
    /// the config names
    pub fn from_config(config: &EmailConfig) -> Result<Self> {
        let smtp_server = config
            .smtp_server
            .clone()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::Configuration("SMTP server cannot be empty".to_string()))?;

        let from_email = config
            .from_email
            .clone()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::Configuration("From email cannot be empty".to_string()))?;

        let smtp_username = config
            .smtp_username_env
            .as_deref()
            .and_then(|var| std::env::var(var).ok());
        let smtp_password = config
            .smtp_password_env
            .as_deref()
            .and_then(|var| std::env::var(var).ok());

        Ok(Self {
            smtp_server,
            smtp_port: config.smtp_port,
            smtp_username,
            smtp_password,
            from_email,
            from_name: config.from_name.clone(),
        })
    }

    /// Send a passcode to the given address
    pub async fn send_otp(&self, to: &str, otp: &str) -> Result<()> {
        let message = self.build_message(to, otp)?;

        let result = tokio::task::spawn_blocking({
            let smtp_server = self.smtp_server.clone();
            let smtp_port = self.smtp_port;
            let username = self.smtp_username.clone();
            let password = self.smtp_password.clone();

            move || {
                let mut transport_builder = SmtpTransport::relay(&smtp_server)
                    .map_err(|e| AppError::Configuration(format!("Invalid SMTP server: {}", e)))?
                    .port(smtp_port);

                if let (Some(user), Some(pass)) = (username, password) {
                    transport_builder = transport_builder.credentials(Credentials::new(user, pass));
                }

                let mailer = transport_builder.build();

                mailer
                    .send(&message)
                    .map_err(|e| AppError::Internal(format!("Failed to send email: {}", e)))?;

                Ok::<(), AppError>(())
            }
        })
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?;

        result?;

        info!(recipient = %to, "OTP email sent");
        Ok(())
    }

    fn build_message(&self, to: &str, otp: &str) -> Result<Message> {
        let from_mailbox = if let Some(name) = &self.from_name {
            format!("{} <{}>", name, self.from_email)
        } else {
            self.from_email.clone()
        };

        let from = from_mailbox
            .parse()
            .map_err(|e| AppError::Configuration(format!("Invalid from address: {}", e)))?;

        let to_address = to
            .parse()
            .map_err(|e| AppError::Validation(format!("Invalid recipient address '{}': {}", to, e)))?;

        Message::builder()
            .from(from)
            .to(to_address)
            .subject("Your verification code")
            .header(header::ContentType::TEXT_PLAIN)
            .body(format!(
                "Your verification code is {}. It expires in 10 minutes.",
                otp
            ))
            .map_err(|e| AppError::Internal(format!("Failed to build email: {}", e)))
    }
}
