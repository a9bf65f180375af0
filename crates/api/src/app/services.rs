//! Service wiring: stores, email delivery and the domain services built on them.

use std::sync::Arc;

use anyhow::Context;

use shelfwise_auth::{CredentialManager, EmailSender, TokenConfig, TokenService};
use shelfwise_catalog::CatalogService;
use shelfwise_infra::{AppConfig, LoggingEmailSender, SmtpEmailSender, Stores, UnconfiguredEmailSender};
use shelfwise_inventory::{StockLedger, StockPolicy};
use shelfwise_purchasing::PurchaseService;

pub struct AppServices {
    pub credentials: CredentialManager,
    pub catalog: CatalogService,
    pub ledger: StockLedger,
    pub purchases: PurchaseService,
}

impl AppServices {
    pub fn new(stores: Stores, email: Arc<dyn EmailSender>, token: TokenConfig, policy: StockPolicy) -> Self {
        let credentials = CredentialManager::new(
            stores.users,
            stores.otps,
            stores.refresh_tokens,
            email,
            TokenService::new(token),
        );
        let catalog = CatalogService::new(
            stores.categories,
            stores.sub_categories,
            stores.units,
            stores.products,
            stores.product_counts,
        );
        let ledger = StockLedger::new(stores.product_levels, policy);
        let purchases = PurchaseService::new(stores.purchases, ledger.clone());

        Self {
            credentials,
            catalog,
            ledger,
            purchases,
        }
    }
}

pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let stores = Stores::connect(config.database_url.as_deref())
        .await
        .context("failed to initialize stores")?;

    let email = email_sender(config)?;

    Ok(AppServices::new(stores, email, config.token.clone(), config.stock_policy))
}

fn email_sender(config: &AppConfig) -> anyhow::Result<Arc<dyn EmailSender>> {
    Ok(match &config.smtp {
        Some(smtp) => Arc::new(SmtpEmailSender::new(smtp).context("invalid SMTP configuration")?),
        None if config.dev_log_otp => {
            tracing::warn!("SMTP not configured, DEV_LOG_OTP set: OTP codes will be logged");
            Arc::new(LoggingEmailSender)
        }
        None => {
            tracing::warn!("SMTP not configured, password recovery emails will fail");
            Arc::new(UnconfiguredEmailSender)
        }
    })
}
