pub mod custom_domain;
