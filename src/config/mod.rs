pub mod schema;

pub use schema::{
    ArchiveConfig, CheckerConfig, CmsConfig, Config, ExportConfig, GatewayConfig, WebhookConfig,
};
