//! Savings alert delivery over SMTP.

use lettre::{
    AsyncSmtpTransport,
    AsyncTransport,
    Message,
    Tokio1Executor,
    message::Mailbox,
    transport::smtp::authentication::Credentials,
};

use crate::{cli::SmtpArgs, core::score::ScoredOffer, prelude::*};

pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpArgs {
    /// Build the mailer, or `None` when any delivery setting is missing:
    /// an unconfigured mailbox disables alerts instead of failing the run.
    pub fn build_mailer(&self) -> Result<Option<Mailer>> {
        let (Some(from), Some(to), Some(host), Some(user), Some(password)) =
            (&self.from, &self.to, &self.host, &self.user, &self.password)
        else {
            return Ok(None);
        };
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .with_context(|| format!("failed to set up the SMTP relay `{host}`"))?
            .port(self.port)
            .credentials(Credentials::new(user.clone(), password.clone()))
            .build();
        Ok(Some(Mailer {
            transport,
            from: format!("Frugal <{from}>")
                .parse()
                .with_context(|| format!("invalid sender address `{from}`"))?,
            to: to.parse().with_context(|| format!("invalid recipient address `{to}`"))?,
        }))
    }
}

impl Mailer {
    /// Send the one summary message for the qualifying offers.
    #[instrument(skip_all, fields(n_matches = matches.len()))]
    pub async fn send_savings_alert(&self, matches: &[&ScoredOffer]) -> Result {
        info!("sending the savings alert…");
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject("⚡ New cheap electricity plans found")
            .body(build_alert_body(matches))
            .context("failed to build the alert message")?;
        self.transport.send(message).await.context("failed to send the alert")?;
        Ok(())
    }
}

fn build_alert_body(matches: &[&ScoredOffer]) -> String {
    let mut lines =
        vec![format!("Found {} plans cheaper than the current setup:", matches.len()), String::new()];
    for offer in matches {
        lines.push(format!(
            "{} - {}, {} monthly fee, saves {}",
            offer.display_company, offer.price, offer.monthly_fee, offer.savings_vs_current,
        ));
    }
    lines.join("\n")
}
