pub mod cd_key;
pub mod proxy_config;
pub mod proxy_installer;
pub mod settings_store;
