mod peek;
mod watch;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use self::{peek::peek, watch::watch};
use crate::quantity::{Cost, KilowattHourRate, KilowattHours};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Main command: fetch the offers, store the scored batch, and mail a savings alert.
    Watch(Box<WatchArgs>),

    /// Fetch and score the offers, print them as a table, and touch nothing.
    Peek(Box<PeekArgs>),
}

#[derive(Parser)]
pub struct WatchArgs {
    #[clap(flatten)]
    pub filter: FilterArgs,

    #[clap(flatten)]
    pub baseline: BaselineArgs,

    #[clap(flatten)]
    pub db: DbArgs,

    #[clap(flatten)]
    pub smtp: SmtpArgs,

    /// Savings at or above which an offer makes it into the alert.
    #[clap(long = "notify-savings", default_value = "10.00", env = "NOTIFY_BELOW_SAVINGS")]
    pub notify_savings: Cost,
}

#[derive(Parser)]
pub struct PeekArgs {
    #[clap(flatten)]
    pub filter: FilterArgs,

    #[clap(flatten)]
    pub baseline: BaselineArgs,
}

#[derive(Clone, Parser)]
pub struct FilterArgs {
    /// Keep only offers of this rate type. An empty string disables the filter.
    #[clap(long = "rate-type", default_value = "Fixed", env = "RATE_TYPE")]
    pub rate_type: String,

    /// Drop offers with a contract term shorter than this many months. `0` disables the filter.
    #[clap(long = "term-length", default_value = "12", env = "TERM_LENGTH")]
    pub min_term_length: i64,
}

#[derive(Copy, Clone, Parser)]
pub struct BaselineArgs {
    /// Average monthly consumption in kilowatt-hours.
    #[clap(long = "avg-monthly-kwh", default_value = "1000", env = "AVG_MONTHLY_KWH")]
    pub avg_monthly_kwh: KilowattHours,

    /// Per-kilowatt-hour price of the current plan.
    #[clap(long = "current-price-per-kwh", default_value = "0.09", env = "CURRENT_PRICE_PER_KWH")]
    pub current_price: KilowattHourRate,

    /// Monthly standing fee of the current plan.
    #[clap(long = "current-monthly-fee", default_value = "5.00", env = "CURRENT_MONTHLY_FEE")]
    pub current_monthly_fee: Cost,
}

impl BaselineArgs {
    /// The user's monthly cost under the current plan, used as the comparison
    /// anchor for every offer in a run.
    pub fn current_cost(&self) -> Cost {
        self.current_price * self.avg_monthly_kwh + self.current_monthly_fee
    }
}

#[derive(Parser)]
pub struct DbArgs {
    /// SQLite database path.
    #[clap(long = "db-path", default_value = "data/energy_rates.db", env = "DB_PATH")]
    pub path: PathBuf,
}

#[derive(Parser)]
pub struct SmtpArgs {
    /// Alert sender address.
    #[clap(long = "email-from", env = "EMAIL_FROM")]
    pub from: Option<String>,

    /// Alert recipient address.
    #[clap(long = "email-to", env = "EMAIL_TO")]
    pub to: Option<String>,

    /// SMTP relay host.
    #[clap(long = "email-smtp", env = "EMAIL_SMTP")]
    pub host: Option<String>,

    /// SMTP relay port.
    #[clap(long = "email-port", default_value = "587", env = "EMAIL_PORT")]
    pub port: u16,

    /// SMTP user name.
    #[clap(long = "email-user", env = "EMAIL_USER")]
    pub user: Option<String>,

    /// SMTP password.
    #[clap(long = "email-password", env = "EMAIL_PASS")]
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn verify_args() {
        Args::command().debug_assert();
    }

    #[test]
    fn default_baseline_cost() {
        let baseline = BaselineArgs {
            avg_monthly_kwh: KilowattHours(1000.0),
            current_price: KilowattHourRate(0.09),
            current_monthly_fee: Cost(5.0),
        };
        assert_abs_diff_eq!(baseline.current_cost().0, 95.0, epsilon = 1e-9);
    }
}
