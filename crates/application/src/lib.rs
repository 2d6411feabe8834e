//! Application services and ports.

#![forbid(unsafe_code)]

mod form_config_ports;
mod form_config_service;

pub use form_config_ports::{
    FormConfigListQuery, FormConfigPage, FormConfigRepository, FormLinkGenerator, PageWindow,
};
pub use form_config_service::{
    DEFAULT_PAGE_LIMIT, FormConfigListRequest, FormConfigListing, FormConfigService,
    MAX_FORM_LINK_ATTEMPTS, MAX_PAGE_LIMIT, RandomFormLinkGenerator,
};
